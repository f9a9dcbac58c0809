//! # Reference Resolver
//!
//! Runs once per compile, before the graph is frozen into a
//! [`crate::Schema`]. Two operations drive it:
//!
//! - **resolve-self**: while the node behind a slot is a `$ref`, follow
//!   the pointer and rebind the slot to the target. Chains are followed
//!   transitively; a chain that revisits a node is a
//!   [`ReferenceError::Cycle`].
//! - **resolve-below**: for a node that is not a reference, apply
//!   resolve-self to every embedded slot and descend. A per-node `resolved`
//!   flag keeps each node from being walked twice, which is also what makes
//!   recursive schemas terminate.
//!
//! A reference that cannot be followed breaks only its own slot: the slot
//! becomes a sentinel that fails every instance, and the error is kept for
//! diagnostics.
//!
//! ## Dereferencing
//!
//! An absolute URI requires [`ResolvePolicy::allow_external`]; the document
//! is fetched through the configured [`Retrieve`] (at most once per pass),
//! compiled into the same graph, and the URI fragment is looked up against
//! its root. Anything else is a pointer into the referencing node's own
//! document. Pointers are limited to two segments: `keyword` (its unnamed
//! child) or `keyword/key`.
//!
//! [`ResolvePolicy::allow_external`]: crate::ResolvePolicy
//! [`Retrieve`]: crate::Retrieve

use std::collections::HashMap;

use url::Url;

use crate::compile::Compiler;
use crate::error::ReferenceError;
use crate::graph::{DocumentId, Graph, NodeId, Slot, SlotId};
use crate::options::CompileOptions;
use crate::pointer;

pub(crate) struct Resolver<'g, 'o> {
    graph: &'g mut Graph,
    options: CompileOptions<'o>,
    /// External documents by URI (fragment removed), including failures.
    remote: HashMap<String, Result<DocumentId, ReferenceError>>,
}

impl<'g, 'o> Resolver<'g, 'o> {
    pub(crate) fn new(graph: &'g mut Graph, options: CompileOptions<'o>) -> Self {
        Self {
            graph,
            options,
            remote: HashMap::new(),
        }
    }

    /// Resolve everything reachable from `root`.
    pub(crate) fn resolve(mut self, root: SlotId) {
        self.resolve_self_and_below(root);
        if !self.graph.reference_errors.is_empty() {
            tracing::warn!(
                unresolved = self.graph.reference_errors.len(),
                "schema compiled with unresolved references"
            );
        }
    }

    fn resolve_self_and_below(&mut self, start: SlotId) {
        let mut pending = vec![start];
        while let Some(slot) = pending.pop() {
            let Some(node) = self.resolve_self(slot) else {
                continue;
            };
            let node = self.graph.node_mut(node);
            if node.resolved {
                continue;
            }
            node.resolved = true;
            pending.extend(node.embedded_slots());
        }
    }

    /// Follow the reference chain at `slot`. Returns the terminal node, or
    /// `None` when the slot is (or has just become) broken.
    fn resolve_self(&mut self, slot: SlotId) -> Option<NodeId> {
        if let Slot::Broken(_) = self.graph.slot(slot) {
            return None;
        }
        let mut chain = Vec::new();
        match self.follow(slot, &mut chain) {
            Ok(node) => Some(node),
            Err(err) => {
                tracing::warn!("{err}");
                self.graph.break_slot(slot, err);
                None
            }
        }
    }

    fn follow(&mut self, slot: SlotId, chain: &mut Vec<NodeId>) -> Result<NodeId, ReferenceError> {
        let node = match self.graph.slot(slot) {
            Slot::Bound(node) => node,
            Slot::Broken(index) => return Err(self.graph.reference_errors[index].clone()),
        };
        let Some(pointer) = self.graph.node(node).reference().map(str::to_owned) else {
            return Ok(node);
        };
        if chain.contains(&node) {
            return Err(ReferenceError::Cycle { pointer });
        }
        chain.push(node);

        let document = self.graph.node(node).document;
        let target = self.dereference(&pointer, document)?;
        let terminal = self.follow(target, chain)?;
        self.graph.rebind(slot, terminal);
        Ok(terminal)
    }

    /// Map a pointer string onto the slot it addresses.
    fn dereference(&mut self, pointer: &str, document: DocumentId) -> Result<SlotId, ReferenceError> {
        match Url::parse(pointer) {
            Ok(uri) => {
                let document = self.external_document(&uri)?;
                self.lookup(document, uri.fragment().unwrap_or(""), pointer)
            }
            Err(e) if has_scheme(pointer) => Err(ReferenceError::Unparsable {
                pointer: pointer.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => self.lookup(document, pointer, pointer),
        }
    }

    fn lookup(
        &self,
        document: DocumentId,
        fragment: &str,
        pointer: &str,
    ) -> Result<SlotId, ReferenceError> {
        let document = self.graph.document(document);
        let root = self.graph.node(document.root_node);
        let not_found = || ReferenceError::NotFound {
            pointer: pointer.to_string(),
        };
        let (keyword, key) = match pointer::segments(fragment).as_slice() {
            [] => return Ok(document.root_slot),
            [keyword] => (keyword.clone(), String::new()),
            [keyword, key] => (keyword.clone(), key.clone()),
            _ => return Err(not_found()),
        };
        root.keywords
            .get(&keyword)
            .and_then(|constraint| constraint.as_embedder())
            .and_then(|embedder| embedder.embedded_at(&key))
            .ok_or_else(not_found)
    }

    fn external_document(&mut self, uri: &Url) -> Result<DocumentId, ReferenceError> {
        if !self.options.policy.allow_external {
            return Err(ReferenceError::ExternalDisabled {
                uri: uri.to_string(),
            });
        }
        let mut location = uri.clone();
        location.set_fragment(None);
        let key = location.to_string();
        if let Some(cached) = self.remote.get(&key) {
            return cached.clone();
        }
        let loaded = self.load_external(location);
        self.remote.insert(key, loaded.clone());
        loaded
    }

    fn load_external(&mut self, location: Url) -> Result<DocumentId, ReferenceError> {
        let uri = location.to_string();
        let retriever = self.options.retriever.ok_or_else(|| ReferenceError::Fetch {
            uri: uri.clone(),
            reason: "no retriever configured".into(),
        })?;
        let bytes = retriever
            .retrieve(&location)
            .map_err(|e| ReferenceError::Fetch {
                uri: uri.clone(),
                reason: e.to_string(),
            })?;
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| ReferenceError::ExternalParse {
                uri: uri.clone(),
                reason: e.to_string(),
            })?;
        let serde_json::Value::Object(root) = value else {
            return Err(ReferenceError::ExternalParse {
                uri,
                reason: "top level is not an object".into(),
            });
        };
        let (document, _) = Compiler::compile_document(self.graph, &root, Some(location));
        tracing::info!(%uri, "compiled external schema document");
        Ok(document)
    }
}

/// Whether `s` starts with a URI scheme (`alpha *( alpha / digit / "+" / "-" / "." ) ":"`).
fn has_scheme(s: &str) -> bool {
    let Some((scheme, _)) = s.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
