//! # Compile Options
//!
//! Resolution policy is explicit state passed into every compile. There is
//! no process-wide switch for external fetching.

use std::fmt;

use crate::retrieve::Retrieve;

/// Whether `$ref` may leave the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvePolicy {
    /// Allow absolute-URI references to be fetched. Default `false`.
    pub allow_external: bool,
}

impl ResolvePolicy {
    /// Policy with external fetching enabled.
    pub fn external() -> Self {
        Self {
            allow_external: true,
        }
    }
}

/// Options for one compile/resolve pass.
#[derive(Clone, Copy, Default)]
pub struct CompileOptions<'a> {
    /// The resolution policy.
    pub policy: ResolvePolicy,
    /// Where absolute-URI documents come from when the policy allows them.
    pub retriever: Option<&'a dyn Retrieve>,
}

impl<'a> CompileOptions<'a> {
    /// Local references only; no retriever.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable external references.
    pub fn allow_external(mut self, allow: bool) -> Self {
        self.policy.allow_external = allow;
        self
    }

    /// Set the retriever consulted for absolute URIs.
    pub fn with_retriever(mut self, retriever: &'a dyn Retrieve) -> Self {
        self.retriever = Some(retriever);
        self
    }
}

impl fmt::Debug for CompileOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileOptions")
            .field("policy", &self.policy)
            .field("retriever", &self.retriever.map(|_| "<dyn Retrieve>"))
            .finish()
    }
}
