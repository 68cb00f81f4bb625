//! Error results that can be returned from the updater and its collaborators
use thiserror::Error;

/// Errors that callers may want to tell apart. Crates return them wrapped in an
/// [`anyhow::Error`] (see [`crate::types::Result`]), use `downcast_ref::<Error>()` to get the kind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// No node with the given identifier exists in the document
    #[error("invalid target: no node with id '{0}'")]
    InvalidTarget(String),

    /// The insertion strategy name is not one of the known strategies
    #[error("unknown insertion strategy: '{0}'")]
    UnknownInsertionStrategy(String),

    /// The effect or highlight colour name is not known
    #[error("unknown effect: '{0}'")]
    UnknownEffect(String),

    /// The source locator was empty
    #[error("invalid locator: the source url is empty")]
    InvalidLocator,

    /// A periodic update was requested with a zero delay
    #[error("invalid delay: periodic updates need a delay greater than zero")]
    InvalidDelay,

    /// The fetch was rejected, timed out or returned a non-successful status
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The document refused a mutation
    #[error("dom error: {0}")]
    Dom(String),
}

impl Error {
    /// Returns the kind of the given error when it (or its source) is an ajaxkit error
    #[must_use]
    pub fn kind_of(err: &anyhow::Error) -> Option<&Error> {
        err.downcast_ref::<Error>()
    }
}
