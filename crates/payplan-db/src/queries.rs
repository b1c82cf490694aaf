//! Database query functions organized by domain.

pub mod earnings;
pub mod legs;
pub mod revenue;
pub mod settings;
