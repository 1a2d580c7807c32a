//! Request context module
//!
//! One `RequestContext` exists per inbound request. It owns the response
//! sink and the stash, and borrows nothing: handlers that need to log take
//! the logger from the `App` they were built with.

mod json;
mod stash;

pub use stash::{Stash, StashError};

use crate::error::HandlerResult;
use crate::http::{ResponseWriter, HTML_CONTENT_TYPE};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE, LOCATION};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, StatusCode, Uri};
use serde::Serialize;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug)]
pub struct RequestContext {
    request: Parts,
    writer: ResponseWriter,
    stash: Stash,
}

impl RequestContext {
    /// Build a fresh context; the request body is not read
    pub fn new<B>(req: Request<B>) -> Self {
        let (request, _body) = req.into_parts();
        Self {
            request,
            writer: ResponseWriter::new(),
            stash: Stash::new(),
        }
    }

    /// Incoming request head
    pub const fn request(&self) -> &Parts {
        &self.request
    }

    pub const fn method(&self) -> &Method {
        &self.request.method
    }

    pub const fn uri(&self) -> &Uri {
        &self.request.uri
    }

    pub fn path(&self) -> &str {
        self.request.uri.path()
    }

    pub fn response_writer(&mut self) -> &mut ResponseWriter {
        &mut self.writer
    }

    /// Scratch space shared by every handler in the chain
    pub const fn stash(&self) -> &Stash {
        &self.stash
    }

    pub fn stash_mut(&mut self) -> &mut Stash {
        &mut self.stash
    }

    /// Write `value` as JSON followed by a newline
    ///
    /// `<`, `>` and `&` inside strings are written as `\u` escapes. Nothing is
    /// written when encoding fails.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> HandlerResult {
        let encoded = json::encode(value)?;

        self.writer
            .header_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        self.writer.write_body(&encoded);
        Ok(())
    }

    /// Write `text` followed by a newline as HTML
    pub fn html(&mut self, text: &str) -> HandlerResult {
        let headers = self.writer.header_mut();
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE));
        }
        self.writer.write_body(text.as_bytes());
        self.writer.write_body(b"\n");
        Ok(())
    }

    /// 302 Found to `location`
    pub fn redirect(&mut self, location: &str) -> HandlerResult {
        self.redirect_with(location, StatusCode::FOUND)
    }

    /// 301 Moved Permanently to `location`
    pub fn redirect_permanently(&mut self, location: &str) -> HandlerResult {
        self.redirect_with(location, StatusCode::MOVED_PERMANENTLY)
    }

    fn redirect_with(&mut self, location: &str, status: StatusCode) -> HandlerResult {
        let value = HeaderValue::from_str(location)?;
        self.writer.header_mut().insert(LOCATION, value);
        self.writer.write_header(status);
        Ok(())
    }

    /// Sink state after the chain has run
    pub(crate) const fn writer(&self) -> &ResponseWriter {
        &self.writer
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        self.writer.into_response()
    }
}
