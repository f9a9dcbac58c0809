//! Validation output.

use std::fmt;

use serde::Serialize;

/// A single constraint violation found while evaluating an instance.
///
/// This is the normal output of [`crate::Schema::validate`], not a fault.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ValidationError {
    /// Human-readable description of the violation.
    pub description: String,
    /// JSON Pointer to the offending value inside the instance.
    pub instance_path: String,
    /// Keyword that produced the violation (`"$ref"` for a broken reference).
    pub keyword: String,
}

impl ValidationError {
    pub(crate) fn new(
        keyword: &str,
        instance_path: &str,
        description: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            instance_path: instance_path.to_string(),
            keyword: keyword.to_string(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.description)
        } else {
            write!(f, "{}: {}", self.instance_path, self.description)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_marks_root() {
        let err = ValidationError::new("minimum", "", "-1 is less than the minimum of 0");
        assert_eq!(err.to_string(), "(root): -1 is less than the minimum of 0");
    }

    #[test]
    fn display_uses_instance_path() {
        let err = ValidationError::new("required", "/a/0", "missing required property 'b'");
        assert_eq!(err.to_string(), "/a/0: missing required property 'b'");
    }

    #[test]
    fn serializes_all_fields() {
        let err = ValidationError::new("type", "/x", "wrong type");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["keyword"], "type");
        assert_eq!(value["instance_path"], "/x");
        assert_eq!(value["description"], "wrong type");
    }
}
