#[macro_use] extern crate log;

use std::sync::Arc;

use clap::Parser;
use tiny_http::{Request, Server};

use tgwebhook::config::Config;
use tgwebhook::context::Context;
use tgwebhook::handlers::handle_webhook;
use tgwebhook::logger;
use tgwebhook::utils::ResultV;
use tgwebhook::WebhookDispatcher;


const MODULE: &str = "MAIN";

/// Webhook endpoint for bot platform updates
#[derive(Parser, Debug)]
#[command(author, version, about, long_about)]
struct Args {
    /// Path to the configurational file
    config_fn: String,
}

fn handle_request(r: Request, dispatcher: &WebhookDispatcher, mut ctx: Context) {
    info!("New Request [qid={}]: method: {}; url: {}", ctx.qid, r.method(), r.url());

    // Failures are already logged by `respond`
    handle_webhook(r, dispatcher, &mut ctx).ok();
}


fn main() -> ResultV {
    let args = Args::parse();
    let cfg = Config::load(&args.config_fn).map_err(|e| {
        eprintln!("[{}] Could not load config from {}: {}", MODULE, args.config_fn, e);
        "load config error"
    })?;
    logger::init_logger(&cfg)?;

    let addr = cfg.address();
    let reporter = logger::get_reporter(MODULE, "Start server", "init server error");
    let server = Server::http(&addr).map_err(&reporter)?;

    info!("[{}] Starting webhook service at {}", MODULE, addr);
    info!("[{}] Config loaded from {}", MODULE, args.config_fn);

    let pool = threadpool::ThreadPool::new(cfg.server.workers);

    let dispatcher = Arc::new(WebhookDispatcher::default());
    for r in server.incoming_requests() {
        let dispatcher_ = dispatcher.clone();
        pool.execute(move || {
            handle_request(r, &dispatcher_, Context::new());
        })
    };
    Ok(())
}
