//! # Constraint Graph Storage
//!
//! Compiled schemas live in one arena per compile. Nodes are never moved or
//! aliased; every embedded schema is addressed through a [`SlotId`], an
//! indirection cell that initially points at the node compiled from the
//! document and may be rebound exactly once by the resolver:
//!
//! - to the node a `$ref` chain terminates at, or
//! - to a broken-reference sentinel that rejects every instance.
//!
//! Rebinding a slot instead of copying node contents is what lets recursive
//! schemas (`{"properties": {"next": {"$ref": "#"}}}`) become cyclic graphs
//! without unbounded expansion.

use std::collections::BTreeMap;

use url::Url;

use crate::constraint::Constraint;
use crate::error::ReferenceError;

/// Keyword table of one schema node.
pub(crate) type Keywords = BTreeMap<String, Constraint>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct SlotId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct DocumentId(pub(crate) usize);

/// One compiled JSON object.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) keywords: Keywords,
    /// Document whose root local pointers in this node resolve against.
    pub(crate) document: DocumentId,
    /// Set once the resolver has walked this node's embedded schemas.
    pub(crate) resolved: bool,
}

impl Node {
    /// The `$ref` pointer, if this node is a reference.
    pub(crate) fn reference(&self) -> Option<&str> {
        match self.keywords.get("$ref") {
            Some(Constraint::Ref(pointer)) => Some(pointer),
            _ => None,
        }
    }

    /// Every slot embedded by any constraint of this node.
    pub(crate) fn embedded_slots(&self) -> Vec<SlotId> {
        self.keywords
            .values()
            .filter_map(Constraint::as_embedder)
            .flat_map(|e| e.embedded().into_iter().map(|(_, slot)| slot))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Bound(NodeId),
    /// Index into [`Graph::reference_errors`].
    Broken(usize),
}

/// A compiled document: the caller's root, or one fetched for an
/// absolute-URI reference.
#[derive(Debug)]
pub(crate) struct Document {
    /// Node compiled from the top-level object. Pointer segments are looked
    /// up here even after the root slot has been rebound.
    pub(crate) root_node: NodeId,
    pub(crate) root_slot: SlotId,
    pub(crate) uri: Option<Url>,
}

#[derive(Debug, Default)]
pub(crate) struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) slots: Vec<Slot>,
    pub(crate) documents: Vec<Document>,
    pub(crate) reference_errors: Vec<ReferenceError>,
}

impl Graph {
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub(crate) fn slot(&self, id: SlotId) -> Slot {
        self.slots[id.0]
    }

    pub(crate) fn document(&self, id: DocumentId) -> &Document {
        &self.documents[id.0]
    }

    /// Store a node and return it with a fresh slot bound to it.
    pub(crate) fn push_node(&mut self, node: Node) -> (NodeId, SlotId) {
        let node_id = NodeId(self.nodes.len());
        self.nodes.push(node);
        let slot = SlotId(self.slots.len());
        self.slots.push(Slot::Bound(node_id));
        (node_id, slot)
    }

    /// Reserve the id the next registered document will receive.
    pub(crate) fn next_document_id(&self) -> DocumentId {
        DocumentId(self.documents.len())
    }

    pub(crate) fn push_document(
        &mut self,
        root_node: NodeId,
        root_slot: SlotId,
        uri: Option<Url>,
    ) -> DocumentId {
        let id = DocumentId(self.documents.len());
        self.documents.push(Document {
            root_node,
            root_slot,
            uri,
        });
        id
    }

    pub(crate) fn rebind(&mut self, slot: SlotId, node: NodeId) {
        self.slots[slot.0] = Slot::Bound(node);
    }

    /// Turn `slot` into an always-fail sentinel carrying `error`.
    pub(crate) fn break_slot(&mut self, slot: SlotId, error: ReferenceError) {
        let index = self.reference_errors.len();
        self.reference_errors.push(error);
        self.slots[slot.0] = Slot::Broken(index);
    }
}
