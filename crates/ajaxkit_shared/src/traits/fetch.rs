use crate::types::Result;
use std::future::Future;

/// The HTTP client collaborator: fetches a resource and hands back its body as text.
///
/// Implementations decide on timeouts and on what counts as a failure; a failed fetch must resolve
/// to an error instead of an empty body.
pub trait TextFetcher: 'static {
    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<String>>;
}
