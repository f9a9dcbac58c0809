//! # Schema Compiler
//!
//! Turns a decoded JSON object into a node of the constraint graph:
//!
//! 1. Every key is looked up in the keyword table. Recognized keywords are
//!    decoded into their typed constraint; a value of the wrong shape drops
//!    that one keyword and nothing else.
//! 2. Unrecognized keys become opaque constraints, which evaluate to nothing
//!    but keep any embedded schemas reachable for `$ref`.
//! 3. Once the table is complete, each constraint gets read access to its
//!    siblings (neighbor binding).
//!
//! Embedded schemas are compiled recursively into the same arena. Each
//! JSON object of the document is compiled at most once; an object reached
//! again (an opaque container exposing members that a keyword already
//! compiled) gets the slot it received the first time.

use std::collections::HashMap;
use std::marker::PhantomData;

use serde_json::{Map, Value};

use crate::constraint::{Constraint, Opaque};
use crate::error::KeywordDecodeError;
use crate::graph::{DocumentId, Graph, Keywords, Node, NodeId, SlotId};
use crate::keyword::Keyword;

/// Compiles the objects of one document (borrowed for `'d`) into a [`Graph`].
pub(crate) struct Compiler<'g, 'd> {
    graph: &'g mut Graph,
    document: DocumentId,
    /// Slots of already compiled objects, keyed by their address inside the
    /// borrowed document.
    compiled: HashMap<*const Map<String, Value>, SlotId>,
    _document: PhantomData<&'d Map<String, Value>>,
}

impl<'g, 'd> Compiler<'g, 'd> {
    pub(crate) fn new(graph: &'g mut Graph, document: DocumentId) -> Self {
        Self {
            graph,
            document,
            compiled: HashMap::new(),
            _document: PhantomData,
        }
    }

    /// Compile a whole document and register it in the graph.
    pub(crate) fn compile_document(
        graph: &mut Graph,
        root: &Map<String, Value>,
        uri: Option<url::Url>,
    ) -> (DocumentId, SlotId) {
        let document = graph.next_document_id();
        let (root_node, root_slot) = Compiler::new(graph, document).compile_node(root);
        let registered = graph.push_document(root_node, root_slot, uri);
        debug_assert_eq!(registered, document);
        (document, root_slot)
    }

    /// Compile one object into a node and return a slot bound to it.
    pub(crate) fn compile_object(&mut self, object: &'d Map<String, Value>) -> SlotId {
        let key: *const Map<String, Value> = object;
        if let Some(slot) = self.compiled.get(&key) {
            return *slot;
        }
        let (_, slot) = self.compile_node(object);
        self.compiled.insert(key, slot);
        slot
    }

    fn compile_node(&mut self, object: &'d Map<String, Value>) -> (NodeId, SlotId) {
        let mut keywords = Keywords::new();
        for (name, value) in object {
            let constraint = match Keyword::from_name(name) {
                Some(keyword) => match Constraint::decode(keyword, value, self) {
                    Ok(constraint) => constraint,
                    Err(reason) => {
                        let err = KeywordDecodeError::new(name, reason);
                        tracing::debug!(keyword = %name, "{err}");
                        continue;
                    }
                },
                None => Constraint::Other(Opaque::decode(value, self)),
            };
            keywords.insert(name.clone(), constraint);
        }
        bind_neighbors(&mut keywords);
        self.graph.push_node(Node {
            keywords,
            document: self.document,
            resolved: false,
        })
    }

    /// Compile a value that must be a schema object.
    pub(crate) fn compile_child(&mut self, value: &'d Value) -> Result<SlotId, String> {
        match value {
            Value::Object(object) => Ok(self.compile_object(object)),
            other => Err(format!("expected a schema object, got {}", shape_of(other))),
        }
    }

    /// Compile every element of a schema array; any non-object fails the lot.
    pub(crate) fn compile_children(&mut self, values: &'d [Value]) -> Result<Vec<SlotId>, String> {
        values.iter().map(|v| self.compile_child(v)).collect()
    }
}

/// Let every constraint read the full sibling table and adjust itself.
fn bind_neighbors(keywords: &mut Keywords) {
    let names: Vec<String> = keywords.keys().cloned().collect();
    for name in names {
        let Some(mut constraint) = keywords.remove(&name) else {
            continue;
        };
        if let Some(binder) = constraint.as_binder() {
            binder.bind_neighbors(keywords);
        }
        keywords.insert(name, constraint);
    }
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
