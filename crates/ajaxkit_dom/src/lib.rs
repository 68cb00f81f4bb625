//! In-memory document
//!
//! A small node tree that implements the [`Dom`](ajaxkit_shared::traits::dom::Dom) collaborator.
//! Elements are addressable by their "id" attribute. Content spliced in by an update is parsed into
//! nodes first, so ids arriving with it can be looked up like any other.

pub mod document;
pub mod node;
pub mod parser;

pub use document::Document;
