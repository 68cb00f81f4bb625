use crate::color::Rgb;
use crate::errors::Error;
use crate::node::NodeId;
use crate::types::Result;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The fixed set of insertion primitives a document must provide. Each one places new content
/// relative to a target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Insertion {
    /// Replace the contents of the node
    Inside,
    /// Replace the node itself
    Replace,
    /// Insert as the previous sibling of the node
    Before,
    /// Insert as the next sibling of the node
    After,
    /// Insert as the first child of the node
    Top,
    /// Insert as the last child of the node
    Bottom,
}

impl Insertion {
    pub const ALL: [Insertion; 6] = [
        Insertion::Inside,
        Insertion::Replace,
        Insertion::Before,
        Insertion::After,
        Insertion::Top,
        Insertion::Bottom,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Insertion::Inside => "inside",
            Insertion::Replace => "replace",
            Insertion::Before => "before",
            Insertion::After => "after",
            Insertion::Top => "top",
            Insertion::Bottom => "bottom",
        }
    }
}

impl Display for Insertion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Insertion {
    type Err = Error;

    /// Names are matched exactly (lowercase)
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Insertion::ALL
            .into_iter()
            .find(|insertion| insertion.name() == s)
            .ok_or_else(|| Error::UnknownInsertionStrategy(s.to_string()))
    }
}

/// The document collaborator. Implementations own the node tree; the updater only ever talks to
/// it through node handles.
pub trait Dom: 'static {
    /// Returns the handle of the element carrying the given "id" attribute
    fn node_by_named_id(&self, id: &str) -> Option<NodeId>;

    /// Places `content` relative to `node` using the given primitive. Returns the elements that
    /// were placed at the top level of the new content, in document order.
    fn insert(&mut self, node: NodeId, insertion: Insertion, content: &str) -> Result<Vec<NodeId>>;

    /// Background colour of the node, `None` when transparent
    fn background_color(&self, node: NodeId) -> Result<Option<Rgb>>;

    fn set_background_color(&mut self, node: NodeId, color: Option<Rgb>) -> Result<()>;

    /// Opacity of the node in `0.0..=1.0`
    fn opacity(&self, node: NodeId) -> Result<f32>;

    fn set_opacity(&mut self, node: NodeId, opacity: f32) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("inside", Insertion::Inside)]
    #[test_case("replace", Insertion::Replace)]
    #[test_case("before", Insertion::Before)]
    #[test_case("after", Insertion::After)]
    #[test_case("top", Insertion::Top)]
    #[test_case("bottom", Insertion::Bottom)]
    fn parses_known_names(name: &str, expected: Insertion) {
        assert_eq!(name.parse::<Insertion>(), Ok(expected));
        assert_eq!(expected.to_string(), name);
    }

    #[test_case("Inside"; "wrong case")]
    #[test_case(""; "empty")]
    #[test_case("sideways"; "unknown")]
    fn rejects_unknown_names(name: &str) {
        assert_eq!(
            name.parse::<Insertion>(),
            Err(Error::UnknownInsertionStrategy(name.to_string()))
        );
    }
}
