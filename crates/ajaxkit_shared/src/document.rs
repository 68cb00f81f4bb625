use crate::traits::dom::Dom;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt::Debug;
use std::rc::Rc;

/// Shared handle to a document. The updater, its effects and its timer callbacks all hold clones
/// of the same handle, and only ever borrow it for the duration of a single mutation.
pub struct DocumentHandle<D: Dom>(pub Rc<RefCell<D>>);

impl<D: Dom> DocumentHandle<D> {
    /// Create a new DocumentHandle from a document
    pub fn create(document: D) -> Self {
        DocumentHandle(Rc::new(RefCell::new(document)))
    }

    /// Returns the document as referenced by the handle
    pub fn get(&self) -> Ref<'_, D> {
        self.0.borrow()
    }

    /// Returns the document mutably
    pub fn get_mut(&self) -> RefMut<'_, D> {
        self.0.borrow_mut()
    }
}

impl<D: Dom + Debug> Debug for DocumentHandle<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0.borrow())
    }
}

// Required for structs holding a handle that derive Clone
impl<D: Dom> Clone for DocumentHandle<D> {
    fn clone(&self) -> DocumentHandle<D> {
        DocumentHandle(Rc::clone(&self.0))
    }
}
