use clap::Parser;
use gomint::config::Config;
use gomint::server::{self, Endpoint, Mux};
use gomint::App;

/// Demo server: two handler chains and a static file subtree
#[derive(Parser, Debug)]
#[command(
    name = "gomint-dispatch",
    after_help = "Settings may also be given as GOMINT_* environment variables,\ne.g. GOMINT_STATIC_DIR=./static GOMINT_SERVER__PORT=5000"
)]
struct Cli {
    /// Configuration file, extension optional (default: gomint)
    #[arg(long, value_name = "PATH")]
    config: Option<String>,
    /// Directory served below /foo/bar/
    #[arg(long, value_name = "DIR")]
    static_dir: Option<String>,
    /// Listening port
    #[arg(long)]
    port: Option<u16>,
}

impl Cli {
    /// Load the configuration and apply command-line overrides
    fn load_config(&self) -> Result<Config, config::ConfigError> {
        let mut cfg = match self.config.as_deref() {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        self.apply(&mut cfg);
        Ok(cfg)
    }

    fn apply(&self, cfg: &mut Config) {
        if let Some(dir) = &self.static_dir {
            cfg.static_dir.clone_from(dir);
        }
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Cli::parse().load_config()?;

    // Create Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let app = App::from_config(&cfg)?;
    let logger = app.logger().clone();

    let mux = Mux::new()
        .handle(
            "/",
            Endpoint::Dispatch(app.chain().then(|ctx| ctx.html("This is /")).build()),
        )
        .handle(
            "/hello/",
            Endpoint::Dispatch(app.chain().then(|ctx| ctx.html("Hello world")).build()),
        )
        .handle("/foo/bar/", Endpoint::Static(app.static_responder()));

    let listener = server::create_listener(addr)?;
    logger.log_server_start(&addr, &cfg);

    server::run(listener, mux, logger, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await;
    Ok(())
}
