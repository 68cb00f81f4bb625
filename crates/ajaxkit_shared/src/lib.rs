//! Shared functionality
//!
//! This crate supplies the types that every other ajaxkit crate agrees on: node handles, colours,
//! the error taxonomy and the traits for the collaborators (document and HTTP client) that the
//! content updater is wired to.
//!

pub mod color;
pub mod document;
pub mod errors;
pub mod node;
pub mod traits;
pub mod types;
