use crate::insertion::{InsertionStrategy, ResolvedInsertion};
use ajaxkit_shared::errors::Error;
use ajaxkit_shared::node::NodeId;
use ajaxkit_shared::traits::dom::{Dom, Insertion};
use ajaxkit_shared::types::Result;
use log::debug;

/// Separates the strategy from the node id in `strategy#id` targets
pub const TARGET_SEPARATOR: char = '#';

/// Where an update goes: a node handle, a node id, or a `strategy#id` pair like `"bottom#list"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Node(NodeId),
    Ref(String),
}

impl From<NodeId> for Target {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl From<&str> for Target {
    fn from(reference: &str) -> Self {
        Self::Ref(reference.to_string())
    }
}

impl From<String> for Target {
    fn from(reference: String) -> Self {
        Self::Ref(reference)
    }
}

/// Splits a target reference into `(strategy, node id)`. Only a reference with exactly one
/// separator carries a strategy; anything else is a node id as a whole.
pub fn split_reference(reference: &str) -> (Option<&str>, &str) {
    let mut parts = reference.split(TARGET_SEPARATOR);

    match (parts.next(), parts.next(), parts.next()) {
        (Some(strategy), Some(id), None) => (Some(strategy), id),
        _ => (None, reference),
    }
}

/// A target that has been checked against the document
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    pub node: NodeId,
    pub insertion: ResolvedInsertion,
}

impl Target {
    /// Resolves the node and the insertion to use:
    ///
    /// 1. a `strategy#id` reference names both, its strategy beats `insertion`
    /// 2. a reference without separator is a node id, `insertion` is kept
    /// 3. a node handle is used as-is
    /// 4. a named `insertion` must be one of the built-ins
    /// 5. without any strategy, `default` is used
    ///
    /// Fails with `InvalidTarget` for unknown ids and `UnknownInsertionStrategy` for unknown names.
    pub fn resolve(
        &self,
        dom: &dyn Dom,
        insertion: Option<InsertionStrategy>,
        default: Insertion,
    ) -> Result<ResolvedTarget> {
        let (node, insertion) = match self {
            Target::Node(node) => (*node, insertion),
            Target::Ref(reference) => {
                let (parsed, id) = split_reference(reference);

                let node = dom
                    .node_by_named_id(id)
                    .ok_or_else(|| Error::InvalidTarget(id.to_string()))?;

                (node, parsed.map(InsertionStrategy::from).or(insertion))
            }
        };

        let insertion = match insertion {
            Some(strategy) => strategy.resolve()?,
            None => ResolvedInsertion::Builtin(default),
        };

        debug!("updater: target {self:?} resolved to node {node} with {insertion:?}");
        Ok(ResolvedTarget { node, insertion })
    }
}
