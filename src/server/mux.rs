//! Demo request multiplexer
//!
//! Pattern routing for the bundled server binary. A pattern ending in `/`
//! matches its whole subtree, any other pattern matches exactly, and the
//! longest matching pattern wins.

use crate::handler::{Dispatcher, StaticResponder};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE, LOCATION};
use hyper::{Request, Response, StatusCode};

/// What a pattern is bound to
#[derive(Debug, Clone)]
pub enum Endpoint {
    Dispatch(Dispatcher),
    Static(StaticResponder),
}

#[derive(Debug, Clone, Default)]
pub struct Mux {
    routes: Vec<(String, Endpoint)>,
}

impl Mux {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `endpoint` for `pattern`; a repeated pattern replaces the old one
    #[must_use]
    pub fn handle(mut self, pattern: &str, endpoint: Endpoint) -> Self {
        self.routes.retain(|(p, _)| p != pattern);
        self.routes.push((pattern.to_string(), endpoint));
        self
    }

    /// Find the endpoint for `path`
    pub fn route(&self, path: &str) -> Option<&Endpoint> {
        self.routes
            .iter()
            .filter(|(pattern, _)| pattern_matches(pattern, path))
            .max_by_key(|(pattern, _)| pattern.len())
            .map(|(_, endpoint)| endpoint)
    }

    pub async fn serve<B>(&self, req: Request<B>) -> Response<Full<Bytes>> {
        let path = req.uri().path().to_string();

        // "/hello" is redirected to a registered "/hello/" subtree
        if !path.ends_with('/') && self.has_pattern(&path) == Some(false) {
            let mut target = format!("{path}/");
            if let Some(query) = req.uri().query() {
                target = format!("{target}?{query}");
            }
            return simple_response(StatusCode::MOVED_PERMANENTLY, Some(&target), "");
        }

        match self.route(&path) {
            Some(Endpoint::Dispatch(dispatcher)) => dispatcher.handle(req),
            Some(Endpoint::Static(responder)) => responder.handle(req).await,
            None => simple_response(StatusCode::NOT_FOUND, None, "404 page not found\n"),
        }
    }

    /// `Some(true)` when `path` is registered exactly, `Some(false)` when only
    /// `path/` is, `None` otherwise
    fn has_pattern(&self, path: &str) -> Option<bool> {
        let slashed = format!("{path}/");
        if self.routes.iter().any(|(p, _)| p == path) {
            Some(true)
        } else if self.routes.iter().any(|(p, _)| *p == slashed) {
            Some(false)
        } else {
            None
        }
    }
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    if pattern.ends_with('/') {
        path.starts_with(pattern)
    } else {
        path == pattern
    }
}

fn simple_response(status: StatusCode, location: Option<&str>, body: &str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    if let Some(value) = location.and_then(|l| HeaderValue::from_str(l).ok()) {
        response.headers_mut().insert(LOCATION, value);
    }
    if !body.is_empty() {
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
    }
    response
}
