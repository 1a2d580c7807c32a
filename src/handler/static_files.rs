//! Static file serving module
//!
//! Maps a URL path onto a file below the configured root and copies it into
//! the response. Missing files and directories get the 404 page; a file that
//! passes the stat check but cannot be opened gets the 500 page. No
//! Content-Type is set here, the response sink sniffs it from the bytes.

use crate::http::{self, ResponseWriter};
use crate::logger::Logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncReadExt;

/// Chunk size used when copying a file into the response
const COPY_BUF_SIZE: usize = 32 * 1024;

#[derive(Clone)]
pub struct StaticResponder {
    root: Arc<PathBuf>,
    logger: Logger,
}

impl StaticResponder {
    pub fn new(root: impl Into<PathBuf>, logger: Logger) -> Self {
        Self {
            root: Arc::new(root.into()),
            logger,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve the file named by the request path
    pub async fn handle<B>(&self, req: Request<B>) -> Response<Full<Bytes>> {
        let uri = req.into_parts().0.uri;
        let mut w = ResponseWriter::new();
        self.serve(uri.path(), &mut w).await;
        w.into_response()
    }

    async fn serve(&self, url_path: &str, w: &mut ResponseWriter) {
        let file_path = match resolve_path(&self.root, url_path) {
            Ok(p) => p,
            Err(PathRejection::Malformed) => {
                self.logger
                    .log_warning(&format!("Malformed request path rejected: {url_path}"));
                http::write_404_page(w);
                return;
            }
            Err(PathRejection::OutsideRoot) => {
                self.logger
                    .log_warning(&format!("Path outside static root rejected: {url_path}"));
                http::write_404_page(w);
                return;
            }
        };

        // File not found is common (404), no need to log it
        match fs::metadata(&file_path).await {
            Ok(meta) if !meta.is_dir() => {}
            _ => {
                http::write_404_page(w);
                return;
            }
        }

        // Symlinks may still point outside the root
        let root_canonical = match fs::canonicalize(self.root.as_path()).await {
            Ok(p) => p,
            Err(e) => {
                self.logger.log_warning(&format!(
                    "Static directory not found or inaccessible '{}': {e}",
                    self.root.display()
                ));
                http::write_404_page(w);
                return;
            }
        };
        let Ok(file_canonical) = fs::canonicalize(&file_path).await else {
            http::write_404_page(w);
            return;
        };
        if !file_canonical.starts_with(&root_canonical) {
            self.logger.log_warning(&format!(
                "Path traversal attempt blocked: {url_path} -> {}",
                file_canonical.display()
            ));
            http::write_404_page(w);
            return;
        }

        let mut file = match fs::File::open(&file_canonical).await {
            Ok(f) => f,
            Err(e) => {
                self.logger.log_error(&format!(
                    "Failed to open file '{}': {e}",
                    file_path.display()
                ));
                http::write_500_page(w);
                return;
            }
        };

        let mut buf = vec![0_u8; COPY_BUF_SIZE];
        loop {
            match file.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => w.write_body(&buf[..n]),
                Err(e) => {
                    self.logger.log_error(&format!(
                        "Failed to read file '{}': {e}",
                        file_path.display()
                    ));
                    break;
                }
            }
        }
    }
}

impl std::fmt::Debug for StaticResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticResponder")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// Why a URL path could not be mapped below the root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRejection {
    /// Not UTF-8 after percent-decoding, or a segment holds a backslash or NUL
    Malformed,
    /// A `..` segment climbs above the root
    OutsideRoot,
}

/// Join a percent-encoded URL path onto `root`
///
/// `.` and empty segments are dropped and `..` removes the previous segment.
/// The check is lexical; symlinks are resolved by the caller.
pub fn resolve_path(root: &Path, url_path: &str) -> Result<PathBuf, PathRejection> {
    let decoded = urlencoding::decode(url_path).map_err(|_| PathRejection::Malformed)?;

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop().ok_or(PathRejection::OutsideRoot)?;
            }
            s if s.contains('\\') || s.contains('\0') => return Err(PathRejection::Malformed),
            s => segments.push(s),
        }
    }

    let mut path = root.to_path_buf();
    path.extend(segments);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::header::CONTENT_TYPE;
    use hyper::StatusCode;
    use std::fs as std_fs;

    const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0\x00\x10JFIF\x00\x01\x01\x00\x00\x01\x00\x01\x00\x00\xFF\xD9";

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let bar = dir.path().join("foo/bar");
        std_fs::create_dir_all(&bar).unwrap();
        std_fs::write(bar.join("index.html"), "<h1>Hello world</h1>\n").unwrap();
        std_fs::write(bar.join("index.txt"), "Hello world\n").unwrap();
        std_fs::write(bar.join("test.jpg"), JPEG_BYTES).unwrap();
        dir
    }

    async fn get(responder: &StaticResponder, path: &str) -> (StatusCode, Option<String>, Vec<u8>) {
        let resp = responder
            .handle(Request::get(path).body(()).unwrap())
            .await;
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = resp.into_body().collect().await.unwrap().to_bytes().to_vec();
        (status, content_type, body)
    }

    #[tokio::test]
    async fn test_static_table() {
        let dir = fixture();
        let responder = StaticResponder::new(dir.path(), Logger::buffer());

        let cases: &[(&str, StatusCode, &str, &[u8])] = &[
            (
                "/foo/bar.html",
                StatusCode::NOT_FOUND,
                "text/html; charset=utf-8",
                b"<h1>File Not Found</h1>\n",
            ),
            (
                "/foo/bar/index.html",
                StatusCode::OK,
                "text/html; charset=utf-8",
                b"<h1>Hello world</h1>\n",
            ),
            (
                "/foo/bar/index.txt",
                StatusCode::OK,
                "text/plain; charset=utf-8",
                b"Hello world\n",
            ),
            ("/foo/bar/test.jpg", StatusCode::OK, "image/jpeg", JPEG_BYTES),
            (
                "/foo/bar/",
                StatusCode::NOT_FOUND,
                "text/html; charset=utf-8",
                b"<h1>File Not Found</h1>\n",
            ),
        ];

        for (path, status, content_type, body) in cases {
            let (got_status, got_type, got_body) = get(&responder, path).await;
            assert_eq!(got_status, *status, "status for {path}");
            assert_eq!(got_type.as_deref(), Some(*content_type), "type for {path}");
            assert_eq!(&got_body[..], *body, "body for {path}");
        }
    }

    #[tokio::test]
    async fn test_directory_matches_missing_file() {
        let dir = fixture();
        let responder = StaticResponder::new(dir.path(), Logger::buffer());
        assert_eq!(get(&responder, "/foo").await, get(&responder, "/nope").await);
        assert_eq!(get(&responder, "/").await, get(&responder, "/nope").await);
    }

    #[tokio::test]
    async fn test_repeated_requests_are_identical() {
        let dir = fixture();
        let responder = StaticResponder::new(dir.path(), Logger::buffer());
        let first = get(&responder, "/foo/bar/test.jpg").await;
        let second = get(&responder, "/foo/bar/test.jpg").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_large_file_is_copied_verbatim() {
        let dir = fixture();
        let data: Vec<u8> = (0..COPY_BUF_SIZE * 3 + 17)
            .map(|i| u8::try_from(i % 251).unwrap())
            .collect();
        std_fs::write(dir.path().join("blob.bin"), &data).unwrap();

        let responder = StaticResponder::new(dir.path(), Logger::buffer());
        let (status, _, body) = get(&responder, "/blob.bin").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, data);
    }

    #[tokio::test]
    async fn test_percent_encoded_path() {
        let dir = fixture();
        std_fs::write(dir.path().join("hello world.txt"), "spaced\n").unwrap();
        let responder = StaticResponder::new(dir.path(), Logger::buffer());

        let (status, _, body) = get(&responder, "/hello%20world.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"spaced\n");
    }

    #[tokio::test]
    async fn test_escaping_path_is_not_found() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("public");
        std_fs::create_dir_all(&root).unwrap();
        std_fs::write(outer.path().join("secret.txt"), "secret\n").unwrap();

        let logger = Logger::buffer();
        let responder = StaticResponder::new(&root, logger.clone());
        let (status, _, body) = get(&responder, "/..%2Fsecret.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, b"<h1>File Not Found</h1>\n");
        assert!(logger.contents().contains("[WARN]"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unopenable_file_is_internal_error() {
        // A socket passes the stat check but cannot be opened as a file
        let dir = fixture();
        let socket_path = dir.path().join("app.sock");
        let _listener = std::os::unix::net::UnixListener::bind(&socket_path).unwrap();

        let logger = Logger::buffer();
        let responder = StaticResponder::new(dir.path(), logger.clone());
        let (status, content_type, body) = get(&responder, "/app.sock").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert_eq!(body, b"<h1>Internal Server Error</h1>\n");
        assert!(logger.contents().starts_with("[ERROR] Failed to open file"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_out_of_root_is_not_found() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("public");
        std_fs::create_dir_all(&root).unwrap();
        std_fs::write(outer.path().join("secret.txt"), "secret\n").unwrap();
        std_fs::write(root.join("inside.txt"), "inside\n").unwrap();
        std::os::unix::fs::symlink("../secret.txt", root.join("link.txt")).unwrap();
        std::os::unix::fs::symlink("inside.txt", root.join("alias.txt")).unwrap();

        let logger = Logger::buffer();
        let responder = StaticResponder::new(&root, logger.clone());

        let (status, _, body) = get(&responder, "/link.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, b"<h1>File Not Found</h1>\n");
        assert!(logger
            .contents()
            .starts_with("[WARN] Path traversal attempt blocked: /link.txt"));

        // Links that stay below the root are followed
        let (status, _, body) = get(&responder, "/alias.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"inside\n");
    }

    #[tokio::test]
    async fn test_malformed_path_is_logged_separately() {
        let dir = fixture();
        let logger = Logger::buffer();
        let responder = StaticResponder::new(dir.path(), logger.clone());

        let (status, _, _) = get(&responder, "/%FF.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _, _) = get(&responder, "/a%00b").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let log = logger.contents();
        assert_eq!(log.matches("[WARN] Malformed request path rejected").count(), 2);
        assert!(!log.contains("outside static root"));
    }

    #[test]
    fn test_resolve_path() {
        let root = Path::new("static");
        assert_eq!(
            resolve_path(root, "/foo/bar/index.html"),
            Ok(PathBuf::from("static/foo/bar/index.html"))
        );
        assert_eq!(
            resolve_path(root, "/foo/./baz/../bar//x.txt"),
            Ok(PathBuf::from("static/foo/bar/x.txt"))
        );
        assert_eq!(resolve_path(root, "/"), Ok(PathBuf::from("static")));
        assert_eq!(
            resolve_path(root, "/../etc/passwd"),
            Err(PathRejection::OutsideRoot)
        );
        assert_eq!(resolve_path(root, "/foo/../../x"), Err(PathRejection::OutsideRoot));
        assert_eq!(resolve_path(root, "/%2e%2e/x"), Err(PathRejection::OutsideRoot));
        assert_eq!(resolve_path(root, "/%FF"), Err(PathRejection::Malformed));
        assert_eq!(resolve_path(root, "/a%5Cb"), Err(PathRejection::Malformed));
    }
}
