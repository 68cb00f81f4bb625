//! A canned [`TextFetcher`] for tests and offline use

use ajaxkit_shared::errors::Error;
use ajaxkit_shared::traits::fetch::TextFetcher;
use ajaxkit_shared::types::Result;
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Route {
    Body(String),
    Failure(String),
}

/// Serves fixed bodies per url and records every requested url. Unknown urls fail like a 404.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    routes: RefCell<HashMap<String, Route>>,
    requests: RefCell<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_body(self, url: &str, body: &str) -> Self {
        self.set_body(url, body);
        self
    }

    #[must_use]
    pub fn with_failure(self, url: &str, reason: &str) -> Self {
        self.routes
            .borrow_mut()
            .insert(url.to_string(), Route::Failure(reason.to_string()));
        self
    }

    /// Changes the body served for `url` from now on
    pub fn set_body(&self, url: &str, body: &str) {
        self.routes
            .borrow_mut()
            .insert(url.to_string(), Route::Body(body.to_string()));
    }

    /// Urls requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl TextFetcher for StaticFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.requests.borrow_mut().push(url.to_string());

        let route = self.routes.borrow().get(url).cloned();
        match route {
            Some(Route::Body(body)) => Ok(body),
            Some(Route::Failure(reason)) => Err(Error::NetworkFailure(format!("{url}: {reason}")).into()),
            None => Err(Error::NetworkFailure(format!("{url}: 404 Not Found")).into()),
        }
    }
}
