use std::fmt::Debug;
use std::future::Future;
use url::{ParseError, Url};

use ajaxkit_shared::errors::Error as UpdateError;
use ajaxkit_shared::traits::fetch::TextFetcher;
use ajaxkit_shared::types::Result;
use log::info;

use crate::errors::Error;
use crate::http::request::Request;
use crate::http::request_impl::RequestImpl;

use super::response::Response;

/// The transport underneath a [`Fetcher`]
pub trait RequestAgent: Debug + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    fn new() -> Self;

    fn send(&self, req: &Request) -> impl Future<Output = Result<Response>>;
}

/// Fetches http(s) and file urls. Relative urls are resolved against the base url.
#[derive(Debug)]
pub struct Fetcher<A: RequestAgent = RequestImpl> {
    base_url: Url,
    client: A,
}

impl Fetcher {
    pub fn new(base: Url) -> Self {
        Self::with_agent(base, RequestImpl::new())
    }
}

impl<A: RequestAgent> Fetcher<A> {
    pub fn with_agent(base: Url, client: A) -> Self {
        Self { base_url: base, client }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get_url(&self, url: &Url) -> Result<Response> {
        let resp = match url.scheme() {
            "http" | "https" => self.client.send(&Request::get(url.as_str()).xhr()).await?,
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|()| Error::UnsupportedScheme(format!("file url without a path: {url}")))?;

                let body = std::fs::read(path).map_err(Error::from)?;

                Response::ok(body)
            }
            scheme => return Err(Error::UnsupportedScheme(scheme.to_string()).into()),
        };

        Ok(resp)
    }

    pub async fn get(&self, url: &str) -> Result<Response> {
        let url = self.parse_url(url)?;

        self.get_url(&url).await
    }

    /// Sends a prepared request. Only http(s) urls are accepted here.
    pub async fn send(&self, req: &Request) -> Result<Response> {
        let url = self.parse_url(&req.uri)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::UnsupportedScheme(url.scheme().to_string()).into());
        }

        let mut req = req.clone();
        req.uri = url.to_string();

        self.client.send(&req).await
    }

    pub fn parse_url(&self, url: &str) -> Result<Url> {
        let mut parsed_url = Url::parse(url);

        if parsed_url == Err(ParseError::RelativeUrlWithoutBase) {
            parsed_url = self.base_url.join(url);
        }

        Ok(parsed_url.map_err(Error::from)?)
    }
}

impl<A: RequestAgent> TextFetcher for Fetcher<A> {
    /// Any transport failure and any non-2xx status becomes a `NetworkFailure`
    async fn fetch_text(&self, url: &str) -> Result<String> {
        info!("net: fetching {url}");

        let response = self
            .get(url)
            .await
            .map_err(|err| UpdateError::NetworkFailure(format!("{url}: {err:#}")))?;

        if !response.is_success() {
            let status = Error::Status {
                url: url.to_string(),
                status: response.status,
                status_text: response.status_text.clone(),
            };
            return Err(UpdateError::NetworkFailure(status.to_string()).into());
        }

        Ok(response.text())
    }
}
