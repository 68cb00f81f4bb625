use ajaxkit_shared::node::NodeId;
use ajaxkit_shared::traits::dom::{Dom, Insertion};
use ajaxkit_shared::types::Result;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Signature of a caller supplied insertion. Like [`Dom::insert`] it returns the top level elements
/// it placed.
pub type InsertionFn = dyn Fn(&mut dyn Dom, NodeId, &str) -> Result<Vec<NodeId>>;

/// How fetched content gets placed relative to the target node.
///
/// Callers may name a strategy (validated when the update is resolved), pick one of the built-in
/// [`Insertion`]s directly, or supply their own function.
#[derive(Clone)]
pub enum InsertionStrategy {
    Named(String),
    Builtin(Insertion),
    Custom(Rc<InsertionFn>),
}

impl InsertionStrategy {
    pub fn custom(f: impl Fn(&mut dyn Dom, NodeId, &str) -> Result<Vec<NodeId>> + 'static) -> Self {
        Self::Custom(Rc::new(f))
    }

    /// Turns a named strategy into its built-in. Fails with `UnknownInsertionStrategy`.
    pub fn resolve(self) -> Result<ResolvedInsertion> {
        match self {
            Self::Named(name) => Ok(ResolvedInsertion::Builtin(name.parse()?)),
            Self::Builtin(insertion) => Ok(ResolvedInsertion::Builtin(insertion)),
            Self::Custom(f) => Ok(ResolvedInsertion::Custom(f)),
        }
    }
}

impl From<&str> for InsertionStrategy {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for InsertionStrategy {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<Insertion> for InsertionStrategy {
    fn from(insertion: Insertion) -> Self {
        Self::Builtin(insertion)
    }
}

impl Debug for InsertionStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Builtin(insertion) => f.debug_tuple("Builtin").field(insertion).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A strategy that is known to exist
#[derive(Clone)]
pub enum ResolvedInsertion {
    Builtin(Insertion),
    Custom(Rc<InsertionFn>),
}

impl ResolvedInsertion {
    pub fn apply(&self, dom: &mut dyn Dom, node: NodeId, content: &str) -> Result<Vec<NodeId>> {
        match self {
            Self::Builtin(insertion) => dom.insert(node, *insertion, content),
            Self::Custom(f) => f(dom, node, content),
        }
    }

    /// The built-in, `None` for custom functions
    pub fn builtin(&self) -> Option<Insertion> {
        match self {
            Self::Builtin(insertion) => Some(*insertion),
            Self::Custom(_) => None,
        }
    }
}

impl Debug for ResolvedInsertion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builtin(insertion) => write!(f, "{insertion}"),
            Self::Custom(_) => f.write_str("custom"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ajaxkit_dom::Document;
    use ajaxkit_shared::errors::Error;

    #[test]
    fn named_resolves_to_builtin() {
        let resolved = InsertionStrategy::from("top").resolve().unwrap();
        assert_eq!(resolved.builtin(), Some(Insertion::Top));

        let resolved = InsertionStrategy::from(Insertion::After).resolve().unwrap();
        assert_eq!(resolved.builtin(), Some(Insertion::After));
    }

    #[test]
    fn unknown_name_fails() {
        let err = InsertionStrategy::from("middle").resolve().unwrap_err();
        assert_eq!(
            Error::kind_of(&err),
            Some(&Error::UnknownInsertionStrategy("middle".into()))
        );
    }

    #[test]
    fn custom_function_is_applied() {
        let mut doc = Document::new();
        let p = doc.create_element(doc.get_root(), "p", Some("p")).unwrap();

        let shout = InsertionStrategy::custom(|dom, node, content| {
            dom.insert(node, Insertion::Inside, &content.to_uppercase())
        });
        let resolved = shout.resolve().unwrap();
        assert_eq!(resolved.builtin(), None);

        resolved.apply(&mut doc, p, "hello").unwrap();
        assert_eq!(doc.inner_html(p).unwrap(), "HELLO");
    }
}
