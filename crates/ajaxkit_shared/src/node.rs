use derive_more::Display;

/// Handle to a node of a document. A handle stays valid until its node is removed; after that every
/// lookup through it fails. Handles are never reused by the same document.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The document node itself
    pub const ROOT: NodeId = NodeId(0);

    #[must_use]
    pub fn root() -> Self {
        Self::ROOT
    }

    /// The handle allocated after this one. Saturates instead of wrapping around.
    #[must_use]
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl From<NodeId> for usize {
    fn from(value: NodeId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_allocated_in_order() {
        let first = NodeId::root().next();
        assert_eq!(first, NodeId::from(1usize));
        assert!(NodeId::ROOT < first);
        assert_eq!(usize::from(NodeId::from(usize::MAX).next()), usize::MAX);
        assert_eq!(first.to_string(), "1");
    }
}
