//! Read-only views over the host's request/response pair.
//!
//! The collector never touches host types directly; a host adapts its own
//! request/response objects to these traits at finish time. Every accessor is
//! allowed to come back empty.

/// Request side of the finish context.
pub trait RequestView {
    /// HTTP method as sent by the client (e.g. `GET`).
    fn method(&self) -> &str;
    /// Header value by case-insensitive name.
    fn header(&self, name: &str) -> Option<&str>;
}

/// Response side of the finish context.
pub trait ResponseView {
    fn status_code(&self) -> u16;
    /// Header value by case-insensitive name.
    fn header(&self, name: &str) -> Option<&str>;
}

/// Everything the collector may read when a request finishes.
///
/// Returning `None` from `request()` or `response()` turns the finish step
/// into a no-op; it is the host's way of saying "this was not an HTTP exchange".
pub trait FinishContext {
    fn request(&self) -> Option<&dyn RequestView>;
    fn response(&self) -> Option<&dyn ResponseView>;
    /// Identifier of the route-matched controller, if routing happened.
    fn controller(&self) -> Option<&str>;
}

/// Owned request/response snapshot.
///
/// Useful for hosts that prefer copying a handful of fields over implementing
/// the view traits on their own types, and for tests.
#[derive(Debug, Clone, Default)]
pub struct HttpExchange {
    pub controller: Option<String>,
    pub request: Option<HttpRequestParts>,
    pub response: Option<HttpResponseParts>,
}

#[derive(Debug, Clone, Default)]
pub struct HttpRequestParts {
    pub method: String,
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default)]
pub struct HttpResponseParts {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

impl RequestView for HttpRequestParts {
    fn method(&self) -> &str {
        &self.method
    }

    fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

impl ResponseView for HttpResponseParts {
    fn status_code(&self) -> u16 {
        self.status
    }

    fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

impl FinishContext for HttpExchange {
    fn request(&self) -> Option<&dyn RequestView> {
        self.request.as_ref().map(|r| r as &dyn RequestView)
    }

    fn response(&self) -> Option<&dyn ResponseView> {
        self.response.as_ref().map(|r| r as &dyn ResponseView)
    }

    fn controller(&self) -> Option<&str> {
        self.controller.as_deref()
    }
}
