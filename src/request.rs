use std::io::Read;


pub const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";

pub const HTTP_200: u16 = 200;
pub const HTTP_405: u16 = 405;
pub const HTTP_500: u16 = 500;

const CONTENT_TYPE_JSON: &str = "application/json";


/// Incoming webhook call as seen by the dispatcher
pub trait InboundRequest {
    fn method(&self) -> &str;

    /// First value of header `name`, matched case-insensitively
    fn first_header(&self, name: &str) -> Option<&str>;

    fn body(&mut self) -> &mut dyn Read;
}

/// Terminal writes of a webhook response, one of them is called per dispatch
pub trait ResponseSink {
    fn ok_with_body(&mut self, body: String);
    fn ok(&mut self);
    fn bad_method(&mut self, allowed: &str);
    fn internal_error(&mut self);
}


/// Buffered write-once response flushed by the host after dispatch
#[derive(Debug, Default)]
pub struct OutboundResponse {
    status: Option<u16>,
    body: String,
    headers: Vec<(&'static str, String)>,
}

impl OutboundResponse {
    pub fn new() -> OutboundResponse {
        OutboundResponse::default()
    }

    /// Status written so far, `None` until a terminal write happened
    pub fn status(&self) -> Option<u16> { self.status }
    pub fn body(&self) -> &str { &self.body }
    pub fn headers(&self) -> &[(&'static str, String)] { &self.headers }

    pub fn into_parts(self) -> (Option<u16>, String, Vec<(&'static str, String)>) {
        (self.status, self.body, self.headers)
    }

    fn write(&mut self, status: u16, body: String, headers: Vec<(&'static str, String)>) {
        if let Some(written) = self.status {
            error!("[RESPONSE] Response already written with status {}, dropping status {}", written, status);
            return;
        }
        self.status = Some(status);
        self.body = body;
        self.headers = headers;
    }
}

fn error_message(code: u16, reason: &str, details: &str) -> String {
    if details.is_empty() {
        format!("{}: {}", code, reason)
    } else {
        format!("{}: {}\n\n{}", code, reason, details)
    }
}

impl ResponseSink for OutboundResponse {
    fn ok_with_body(&mut self, body: String) {
        self.write(HTTP_200, body, vec![("Content-Type", CONTENT_TYPE_JSON.to_string())]);
    }

    fn ok(&mut self) {
        self.write(HTTP_200, String::new(), Vec::new());
    }

    fn bad_method(&mut self, allowed: &str) {
        let body = error_message(HTTP_405, "Method Not Allowed", &format!("Allowed method: {}", allowed));
        self.write(HTTP_405, body, vec![("Allow", allowed.to_string())]);
    }

    fn internal_error(&mut self) {
        self.write(HTTP_500, error_message(HTTP_500, "Internal Server Error", ""), Vec::new());
    }
}


/// `InboundRequest` view over a tiny_http request
pub struct TinyHttpRequest<'a> {
    inner: &'a mut tiny_http::Request,
}

impl<'a> TinyHttpRequest<'a> {
    pub fn new(inner: &'a mut tiny_http::Request) -> TinyHttpRequest<'a> {
        TinyHttpRequest { inner }
    }
}

impl InboundRequest for TinyHttpRequest<'_> {
    fn method(&self) -> &str {
        self.inner.method().as_str()
    }

    fn first_header(&self, name: &str) -> Option<&str> {
        self.inner.headers().iter()
            .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    fn body(&mut self) -> &mut dyn Read {
        self.inner.as_reader()
    }
}
