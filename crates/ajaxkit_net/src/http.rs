//! Http transport: requests, responses and the fetcher that drives them
use crate::http::fetcher::RequestAgent;

pub mod fetcher;
pub mod headers;
pub mod request;
pub mod request_impl;
pub mod response;

pub type HttpError = <request_impl::RequestImpl as RequestAgent>::Error;
