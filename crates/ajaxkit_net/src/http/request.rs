use crate::http::headers::Headers;
use cookie::{Cookie, CookieJar};
use core::fmt::{Display, Formatter};

/// Header that marks a request as issued by a script rather than by navigation
pub const X_REQUESTED_WITH: &str = "X-Requested-With";

/// An outgoing request, built up with the `with_*` methods
#[derive(Debug, Default, Clone)]
pub struct Request {
    pub method: String,
    pub uri: String,
    pub headers: Headers,
    pub cookies: CookieJar,
    pub body: Vec<u8>,
}

impl Request {
    pub fn new(method: &str, uri: &str) -> Self {
        Self {
            method: method.to_string(),
            uri: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new("GET", uri)
    }

    /// Marks the request as a background (XMLHttpRequest style) fetch
    #[must_use]
    pub fn xhr(self) -> Self {
        self.with_header(X_REQUESTED_WITH, "XMLHttpRequest")
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.set(name, value);
        self
    }

    #[must_use]
    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.add(Cookie::new(name.to_string(), value.to_string()));
        self
    }

    /// Value for the `Cookie` header, sorted by cookie name. `None` without cookies.
    pub fn cookie_header(&self) -> Option<String> {
        let mut pairs: Vec<_> = self.cookies.iter().map(|c| format!("{}={}", c.name(), c.value())).collect();
        if pairs.is_empty() {
            return None;
        }

        pairs.sort();
        Some(pairs.join("; "))
    }
}

impl Display for Request {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{} {}", self.method, self.uri)?;
        for (name, value) in self.headers.iter() {
            writeln!(f, "{name}: {value}")?;
        }
        if let Some(cookies) = self.cookie_header() {
            writeln!(f, "cookie: {cookies}")?;
        }
        write!(f, "({} bytes)", self.body.len())
    }
}
