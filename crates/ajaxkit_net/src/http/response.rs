use crate::http::headers::Headers;
use core::fmt::{Display, Formatter};

/// A received response with the body fully read
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub version: String,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl Response {
    /// A `200 OK` carrying `body`. Used for content that did not come over http, like files.
    #[must_use]
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            body,
            ..Self::default()
        }
    }

    /// True for 2xx statuses
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type")
    }

    /// The body decoded as UTF-8. Invalid sequences are replaced, never rejected.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl Display for Response {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{} {}", self.status, self.status_text)?;
        for (name, value) in self.headers.iter() {
            writeln!(f, "{name}: {value}")?;
        }
        write!(f, "({} bytes)", self.body.len())
    }
}
