//! Handler chain dispatch module
//!
//! A `Dispatcher` runs an ordered list of handlers against one fresh
//! `RequestContext` per request and stops at the first failure.

use crate::context::RequestContext;
use crate::error::{Error, HandlerResult};
use crate::logger::Logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::sync::Arc;

/// A single step of a chain
pub type HandlerFunc = Arc<dyn Fn(&mut RequestContext) -> HandlerResult + Send + Sync>;

/// Wrap a closure or function as a `HandlerFunc`
pub fn handler<F>(f: F) -> HandlerFunc
where
    F: Fn(&mut RequestContext) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// How a chain run ended
#[derive(Debug)]
pub enum ChainOutcome {
    /// Every handler returned `Ok`
    Completed,
    /// Handler at `index` (0-based) failed; later handlers did not run
    Failed { index: usize, error: Error },
}

/// Invoke `handlers` in order against `ctx`, halting on the first error
pub fn run_chain(handlers: &[HandlerFunc], ctx: &mut RequestContext) -> ChainOutcome {
    for (index, handler) in handlers.iter().enumerate() {
        if let Err(error) = handler(&mut *ctx) {
            return ChainOutcome::Failed { index, error };
        }
    }
    ChainOutcome::Completed
}

#[derive(Clone)]
pub struct Dispatcher {
    handlers: Arc<[HandlerFunc]>,
    logger: Logger,
}

impl Dispatcher {
    pub fn new(handlers: Vec<HandlerFunc>, logger: Logger) -> Self {
        Self {
            handlers: handlers.into(),
            logger,
        }
    }

    pub fn builder(logger: Logger) -> DispatcherBuilder {
        DispatcherBuilder {
            handlers: Vec::new(),
            logger,
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Handle one request
    ///
    /// The response is whatever the handlers left in the sink, including
    /// partial output from a failing handler.
    pub fn handle<B>(&self, req: Request<B>) -> Response<Full<Bytes>> {
        let mut ctx = RequestContext::new(req);
        self.logger.log_request(ctx.method(), ctx.uri());

        if let ChainOutcome::Failed { error, .. } = run_chain(&self.handlers, &mut ctx) {
            self.logger.log_error(&error.to_string());
        }

        let superfluous = ctx.writer().superfluous_write_headers();
        if superfluous > 0 {
            self.logger.log_warning(&format!(
                "{superfluous} superfluous write_header call(s) on {}",
                ctx.path()
            ));
        }

        ctx.into_response()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handlers", &self.handlers.len())
            .finish_non_exhaustive()
    }
}

/// Collects handlers in call order
pub struct DispatcherBuilder {
    handlers: Vec<HandlerFunc>,
    logger: Logger,
}

impl DispatcherBuilder {
    #[must_use]
    pub fn then<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut RequestContext) -> HandlerResult + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(f));
        self
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher::new(self.handlers, self.logger)
    }
}
