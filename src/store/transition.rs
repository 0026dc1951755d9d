//! Transitions flowing through the store

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::spec_errors::SPEC_ADD_ERROR;
use crate::violation::ViolationList;

/// A typed state-change request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Transition type, matched by reducers
    #[serde(rename = "type")]
    pub kind: String,
    /// Application data for the transition
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
    /// Violation list, carried only by error reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violations: Option<ViolationList>,
}

impl Transition {
    /// A transition with no payload
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Value::Null,
            violations: None,
        }
    }

    /// A transition carrying application data
    pub fn with_payload(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
            violations: None,
        }
    }

    /// The error report dispatched after each validation pass
    pub fn report_errors(violations: ViolationList) -> Self {
        Self {
            kind: SPEC_ADD_ERROR.to_string(),
            payload: Value::Null,
            violations: Some(violations),
        }
    }

    pub fn is_error_report(&self) -> bool {
        self.kind == SPEC_ADD_ERROR
    }
}
