// Connection handling module
// Serves one accepted TCP connection on its own task

use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use super::mux::Mux;
use crate::logger::Logger;

/// Serve `stream` with HTTP/1.1 in a spawned task.
///
/// Every request on the connection is routed through `mux`; handler chains
/// run to completion inside the task before the response is sent.
pub fn serve_connection(stream: TcpStream, mux: Arc<Mux>, logger: Logger) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let service = service_fn(move |req| {
            let mux = Arc::clone(&mux);
            async move { Ok::<_, std::convert::Infallible>(mux.serve(req).await) }
        });

        if let Err(err) = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(io, service)
            .await
        {
            logger.log_connection_error(&err);
        }
    });
}
