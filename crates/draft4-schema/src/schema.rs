//! The compiled, resolved schema handed to callers.

use std::io::Read;

use serde_json::Value;
use url::Url;

use crate::compile::Compiler;
use crate::error::{ReferenceError, SchemaError};
use crate::evaluate::Evaluator;
use crate::graph::{Graph, SlotId};
use crate::options::CompileOptions;
use crate::resolve::Resolver;
use crate::violation::ValidationError;

/// A draft-4 schema, compiled and with every reachable `$ref` resolved.
///
/// Immutable once built; `validate` only reads the graph, so a `Schema`
/// can be shared across threads and validated against concurrently.
#[derive(Debug)]
pub struct Schema {
    graph: Graph,
    root: SlotId,
}

impl Schema {
    /// Compile a decoded schema document with local references only.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::StructuralParse`] when the top level is not an
    /// object.
    pub fn compile(document: &Value) -> Result<Self, SchemaError> {
        Self::compile_with(document, &CompileOptions::new())
    }

    /// Compile a decoded schema document under explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::StructuralParse`] when the top level is not an
    /// object. Unresolvable references are not errors here; see
    /// [`Schema::reference_errors`].
    pub fn compile_with(document: &Value, options: &CompileOptions<'_>) -> Result<Self, SchemaError> {
        let Value::Object(root) = document else {
            return Err(SchemaError::StructuralParse {
                reason: format!("top level is {}", type_name(document)),
            });
        };
        let mut graph = Graph::default();
        let (_, root) = Compiler::compile_document(&mut graph, root, None);
        Resolver::new(&mut graph, *options).resolve(root);
        tracing::info!(
            nodes = graph.nodes.len(),
            documents = graph.documents.len(),
            reference_errors = graph.reference_errors.len(),
            "schema compiled"
        );
        Ok(Self { graph, root })
    }

    /// Decode and compile a schema from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::StructuralParse`] when the bytes are not JSON
    /// or not an object.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SchemaError> {
        Self::from_slice_with(bytes, &CompileOptions::new())
    }

    /// [`Schema::from_slice`] under explicit options.
    pub fn from_slice_with(bytes: &[u8], options: &CompileOptions<'_>) -> Result<Self, SchemaError> {
        let document: Value =
            serde_json::from_slice(bytes).map_err(|e| SchemaError::StructuralParse {
                reason: e.to_string(),
            })?;
        Self::compile_with(&document, options)
    }

    /// Read, decode and compile a schema from a stream.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Io`] when reading fails and
    /// [`SchemaError::StructuralParse`] for malformed content.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, SchemaError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_slice(&bytes)
    }

    /// Every violation of this schema by `instance`, in evaluation order.
    /// An empty list means the instance is valid.
    pub fn validate(&self, instance: &Value) -> Vec<ValidationError> {
        Evaluator::new(&self.graph).evaluate(self.root, instance, "")
    }

    /// Whether `instance` produces no violations.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validate(instance).is_empty()
    }

    /// References that could not be resolved during compilation. Each one
    /// turned its referencing schema into one that rejects everything.
    pub fn reference_errors(&self) -> &[ReferenceError] {
        &self.graph.reference_errors
    }

    /// URIs of the external documents compiled into this schema.
    pub fn external_documents(&self) -> impl Iterator<Item = &Url> {
        self.graph.documents.iter().filter_map(|d| d.uri.as_ref())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_object_documents() {
        for doc in [json!([]), json!("s"), json!(1), json!(null), json!(true)] {
            assert!(matches!(
                Schema::compile(&doc),
                Err(SchemaError::StructuralParse { .. })
            ));
        }
    }

    #[test]
    fn rejects_undecodable_bytes() {
        assert!(matches!(
            Schema::from_slice(b"{\"type\":"),
            Err(SchemaError::StructuralParse { .. })
        ));
    }

    #[test]
    fn reads_from_a_stream() {
        let schema = Schema::from_reader(&br#"{"type":"string"}"#[..]).unwrap();
        assert!(schema.is_valid(&json!("x")));
        assert!(!schema.is_valid(&json!(1)));
    }

    #[test]
    fn empty_schema_accepts_everything() {
        let schema = Schema::compile(&json!({})).unwrap();
        for instance in [json!(null), json!(1), json!("a"), json!([1]), json!({"a": 1})] {
            assert!(schema.is_valid(&instance));
        }
    }

    #[test]
    fn schema_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
    }
}
