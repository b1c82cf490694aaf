//! # payplan-revenue
//!
//! Compensation plan arithmetic. Every calculator here is a pure function
//! of its inputs and recovers silently from bad configuration: missing
//! settings fall back to defaults, zero denominators yield 0 and negative
//! intermediate results are clamped to 0.
//!
//! ## Modules
//!
//! - [`splits`]: Revenue split and the AI-credit cost/profit split
//! - [`cycles`]: Binary cycle match estimate
//! - [`caps`]: Daily earning cap progress and flush
//! - [`ratio`]: Guarded percentage helpers
//! - [`settings`]: Flat settings map to typed plan configuration

pub mod caps;
pub mod cycles;
pub mod ratio;
pub mod settings;
pub mod splits;

/// Error types for revenue operations.
#[derive(Debug, thiserror::Error)]
pub enum RevenueError {
    /// An amount supplied by a caller could not be parsed.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Arithmetic overflow while aggregating amounts.
    #[error("arithmetic overflow in revenue calculation")]
    Overflow,
}

/// Convenience result type for revenue operations.
pub type Result<T> = std::result::Result<T, RevenueError>;
