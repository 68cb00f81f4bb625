use crate::errors::Error;
use crate::http::fetcher::RequestAgent;
use crate::http::headers::Headers;
use crate::http::request::Request;
use crate::http::response::Response;
use ajaxkit_config::config;
use ajaxkit_shared::types::Result;
use log::{debug, warn};
use reqwest::header::COOKIE;
use reqwest::{Client, Method};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ReqwestAgent {
    client: Client,
}

impl From<Client> for ReqwestAgent {
    fn from(value: Client) -> Self {
        Self { client: value }
    }
}

impl RequestAgent for ReqwestAgent {
    type Error = reqwest::Error;

    /// Builds a client with the configured timeout (`net.http.timeout_ms`, 0 disables it) and
    /// user agent
    fn new() -> Self {
        let timeout_ms = config!(uint "net.http.timeout_ms");
        let user_agent = config!(string "net.http.user_agent");

        let mut builder = Client::builder().user_agent(user_agent);
        if timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(timeout_ms as u64));
        }

        match builder.build() {
            Ok(client) => client.into(),
            Err(err) => {
                warn!("net: cannot build configured http client, using defaults: {err}");
                Client::new().into()
            }
        }
    }

    async fn send(&self, req: &Request) -> Result<Response> {
        debug!("net: {} {}", req.method, req.uri);

        let method = Method::from_bytes(req.method.as_bytes())?;
        let mut builder = self.client.request(method, &req.uri);

        for (name, value) in req.headers.iter() {
            builder = builder.header(name, value);
        }
        if let Some(cookies) = req.cookie_header() {
            builder = builder.header(COOKIE, cookies);
        }
        if !req.body.is_empty() {
            builder = builder.body(req.body.clone());
        }

        let response = builder.send().await.map_err(Error::from)?;
        into_response(response).await
    }
}

async fn into_response(value: reqwest::Response) -> Result<Response> {
    let status = value.status();
    let version = format!("{:?}", value.version());

    let headers: Headers = value
        .headers()
        .iter()
        .map(|(name, header)| (name.as_str(), header.to_str().unwrap_or_default()))
        .collect();

    let body = value.bytes().await.map_err(Error::from)?.to_vec();

    Ok(Response {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        version,
        headers,
        body,
    })
}
