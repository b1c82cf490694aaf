//! IPC command handlers.
//!
//! Each submodule implements the commands for one IPC category.

pub mod compute;
pub mod dashboard;
pub mod ingest;

use payplan_revenue::settings::parse_amount;
use payplan_types::Decimal;
use serde_json::Value;

use crate::rpc::RpcError;

type Result<T> = std::result::Result<T, RpcError>;

/// Required decimal parameter, given either as a JSON string or number.
fn decimal_param(params: &Value, name: &str) -> Result<Decimal> {
    optional_decimal_param(params, name)?
        .ok_or_else(|| RpcError::invalid_params(&format!("{name} required")))
}

/// Optional decimal parameter, given either as a JSON string or number.
fn optional_decimal_param(params: &Value, name: &str) -> Result<Option<Decimal>> {
    let raw = match params.get(name) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            return Err(RpcError::invalid_params(&format!(
                "{name} must be a string or number"
            )))
        }
    };
    parse_amount(&raw)
        .map(Some)
        .map_err(|e| RpcError::invalid_params(&format!("{name}: {e}")))
}

/// Required string parameter.
fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RpcError::invalid_params(&format!("{name} required")))
}

/// Map an internal failure to an RPC error, logging the cause.
fn internal(e: impl std::fmt::Display) -> RpcError {
    tracing::error!(error = %e, "command failed");
    RpcError::internal_error(&e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_param_forms() {
        let params = serde_json::json!({"a": "12.50", "b": 7, "c": 0.5, "d": true, "e": null});
        assert_eq!(decimal_param(&params, "a").expect("a"), Decimal::new(1250, 2));
        assert_eq!(decimal_param(&params, "b").expect("b"), Decimal::from(7));
        assert_eq!(decimal_param(&params, "c").expect("c"), Decimal::new(5, 1));
        assert!(decimal_param(&params, "d").is_err());
        assert!(decimal_param(&params, "e").is_err());
        assert_eq!(optional_decimal_param(&params, "missing").expect("missing"), None);
    }

    #[test]
    fn test_str_param() {
        let params = serde_json::json!({"member_id": "m1", "blank": ""});
        assert_eq!(str_param(&params, "member_id").expect("m1"), "m1");
        assert!(str_param(&params, "blank").is_err());
        assert!(str_param(&params, "absent").is_err());
    }
}
