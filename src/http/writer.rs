//! Response sink module
//!
//! `ResponseWriter` buffers one response and reproduces the usual
//! response-writer contract of an HTTP server:
//! - headers stay mutable until the status is committed
//! - the first `write_header` call or the first body write commits the status
//!   (an implicit 200 for writes) together with a snapshot of the headers
//! - later header mutations and later `write_header` calls have no effect
//! - without an explicit Content-Type, one is sniffed from the body

use super::sniff;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use std::io;

#[derive(Debug, Default)]
pub struct ResponseWriter {
    headers: HeaderMap,
    committed: Option<(StatusCode, HeaderMap)>,
    body: Vec<u8>,
    superfluous_write_headers: usize,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header map sent with the response
    ///
    /// Changes made after the status is committed are not sent.
    pub fn header_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Headers as they will be sent (or are staged to be sent)
    pub fn headers(&self) -> &HeaderMap {
        match &self.committed {
            Some((_, headers)) => headers,
            None => &self.headers,
        }
    }

    /// Commit the status code and the current headers
    pub fn write_header(&mut self, status: StatusCode) {
        if self.committed.is_some() {
            self.superfluous_write_headers += 1;
            return;
        }
        self.committed = Some((status, self.headers.clone()));
    }

    /// Append body bytes, committing an implicit 200 on first use
    pub fn write_body(&mut self, data: &[u8]) {
        if self.committed.is_none() {
            self.write_header(StatusCode::OK);
        }
        self.body.extend_from_slice(data);
    }

    /// Status that is (or will be) sent
    pub fn status(&self) -> StatusCode {
        self.committed
            .as_ref()
            .map_or(StatusCode::OK, |(status, _)| *status)
    }

    pub const fn is_committed(&self) -> bool {
        self.committed.is_some()
    }

    /// Body bytes written so far
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Number of `write_header` calls that arrived after the commit
    pub const fn superfluous_write_headers(&self) -> usize {
        self.superfluous_write_headers
    }

    /// Finish the response
    ///
    /// An untouched writer produces an empty 200 with its staged headers.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let (status, mut headers) = self
            .committed
            .unwrap_or((StatusCode::OK, self.headers));

        if !headers.contains_key(CONTENT_TYPE) && !self.body.is_empty() {
            let sniffed = sniff::detect_content_type(&self.body);
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(sniffed));
        }

        let mut response = Response::new(Full::new(Bytes::from(self.body)));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

impl io::Write for ResponseWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_body(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
