//! Inclusion state — whether unknown devices are admitted into the registry.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Snapshot of the inclusion flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionState {
    pub active: bool,
    /// When an active window closes on its own; `None` for no expiry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
}

impl InclusionState {
    #[must_use]
    pub fn active_until(expires_at: Option<Timestamp>) -> Self {
        Self {
            active: true,
            expires_at,
        }
    }

    #[must_use]
    pub fn inactive() -> Self {
        Self::default()
    }
}

/// Interpret the loose truthy forms hosts use for the inclusion flag.
///
/// `true`, `1` (integer or float), `"true"` and `"1"` activate; everything
/// else deactivates.
#[must_use]
pub fn parse_flag(value: &serde_json::Value) -> bool {
    use serde_json::Value;

    match value {
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| (n - 1.0).abs() < f64::EPSILON),
        Value::String(s) => matches!(s.as_str(), "true" | "1"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_accept_truthy_forms() {
        for value in [json!(true), json!(1), json!(1.0), json!("true"), json!("1")] {
            assert!(parse_flag(&value), "{value} should activate");
        }
    }

    #[test]
    fn should_treat_anything_else_as_false() {
        for value in [
            json!(false),
            json!(0),
            json!(2),
            json!(0.5),
            json!("yes"),
            json!("TRUE"),
            json!(null),
            json!([]),
        ] {
            assert!(!parse_flag(&value), "{value} should not activate");
        }
    }

    #[test]
    fn should_default_to_inactive() {
        assert_eq!(InclusionState::default(), InclusionState::inactive());
        assert!(!InclusionState::inactive().active);
    }
}
