//! Networking functionality
//!
//! The HTTP client collaborator of the updater. A [`http::fetcher::Fetcher`] resolves locators
//! against a base url, performs the request through a [`http::fetcher::RequestAgent`] and hands
//! the body back as text.

pub mod errors;
pub mod http;
pub mod testing;
