//! HTTP response building module
//!
//! Fixed HTML pages written by the static responder. Both go through the
//! same `ResponseWriter` contract as handler output.

use super::writer::ResponseWriter;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::StatusCode;

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
pub const NOT_FOUND_BODY: &str = "<h1>File Not Found</h1>\n";
pub const INTERNAL_ERROR_BODY: &str = "<h1>Internal Server Error</h1>\n";

/// Write the 404 Not Found page
pub fn write_404_page(w: &mut ResponseWriter) {
    write_html_page(w, StatusCode::NOT_FOUND, NOT_FOUND_BODY);
}

/// Write the 500 Internal Server Error page
pub fn write_500_page(w: &mut ResponseWriter) {
    write_html_page(w, StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY);
}

fn write_html_page(w: &mut ResponseWriter, status: StatusCode, body: &str) {
    w.header_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE));
    w.write_header(status);
    w.write_body(body.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_404_page() {
        let mut w = ResponseWriter::new();
        write_404_page(&mut w);
        let resp = w.into_response();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), HTML_CONTENT_TYPE);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"<h1>File Not Found</h1>\n");
    }

    #[tokio::test]
    async fn test_500_page() {
        let mut w = ResponseWriter::new();
        write_500_page(&mut w);
        let resp = w.into_response();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), HTML_CONTENT_TYPE);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"<h1>Internal Server Error</h1>\n");
    }
}
