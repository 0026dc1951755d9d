//! Validation violations
//!
//! Violations are data, not errors: a validation pass always yields a
//! (possibly empty) [`ViolationList`], which the middleware routes into the
//! store's error slice.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single mismatch between the state and the aggregate schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// JSON Pointer to the offending value in the state, empty for the root
    pub path: String,
    /// JSON Pointer to the schema keyword that failed
    pub schema_path: String,
    /// Human-readable description
    pub message: String,
}

impl Violation {
    pub fn new(
        path: impl Into<String>,
        schema_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            schema_path: schema_path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Ordered violations from one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViolationList(Vec<Violation>);

impl ViolationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    /// Whether any violation points at or below the given state path
    pub fn touches(&self, path: &str) -> bool {
        self.0.iter().any(|v| {
            v.path == path || v.path.starts_with(&format!("{}/", path.trim_end_matches('/')))
        })
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.0
    }
}

impl From<Vec<Violation>> for ViolationList {
    fn from(violations: Vec<Violation>) -> Self {
        Self(violations)
    }
}

impl FromIterator<Violation> for ViolationList {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ViolationList {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ViolationList {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ViolationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_display() {
        let v = Violation::new("/todos", "/properties/todos/type", r#""x" is not of type "array""#);
        assert_eq!(v.to_string(), r#"/todos: "x" is not of type "array""#);

        let root = Violation::new("", "/required", r#""todos" is a required property"#);
        assert!(root.to_string().starts_with("(root)"));
    }

    #[test]
    fn test_touches() {
        let list: ViolationList = vec![
            Violation::new("/todos/0/text", "", "bad"),
            Violation::new("/filter", "", "bad"),
        ]
        .into();

        assert!(list.touches("/todos"));
        assert!(list.touches("/filter"));
        assert!(!list.touches("/todo"));
        assert!(!list.touches("/visibility"));
    }

    #[test]
    fn test_serializes_as_array() {
        let list: ViolationList = vec![Violation::new("/a", "/type", "wrong")].into();
        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"path": "/a", "schema_path": "/type", "message": "wrong"}])
        );
    }
}
