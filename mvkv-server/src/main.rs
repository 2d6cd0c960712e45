use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use log::{error, info};
use tokio::net::TcpListener;

use mvkv::clock::SystemClock;
use mvkv::mvcc::engine::MVCC;
use mvkv_server::config::ConfigLoad;
use mvkv_server::session::Session;
use mvkv_server::trace;

#[derive(Debug, Parser, PartialEq)]
#[command(version, author, about)]
pub struct Args {
    #[clap(short, long, help = "debug model")]
    debug: bool,

    /// Configuration file path, default 'config/mvkv.toml'
    #[clap(
        short = 'c',
        long = "config",
        help = "Configuration file path",
        default_value = "config/mvkv.toml"
    )]
    config: String,

    /// Listen address, overrides the configuration file
    #[clap(short = 'a', long = "addr", help = "Listen address")]
    addr: Option<String>,

    #[clap(short = 'l', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
pub async fn main() -> Result<()> {
    eprintln!();
    eprintln!("███    ███ ██    ██ ██   ██ ██    ██");
    eprintln!("████  ████ ██    ██ ██  ██  ██    ██");
    eprintln!("██ ████ ██ ██    ██ █████   ██    ██  MVCC KV Storage");
    eprintln!("██  ██  ██  ██  ██  ██  ██   ██  ██");
    eprintln!("██      ██   ████   ██   ██   ████");
    eprintln!();

    let args = Args::parse();
    if args.debug {
        println!("{:?}", args);
    }

    let mut cfg = match ConfigLoad::new(args.config.as_ref()) {
        Ok(c) => c,
        Err(_err) => ConfigLoad::default(),
    };
    if let Some(addr) = args.addr.clone() {
        cfg.set_listen_addr(addr);
    }

    let _guards = trace::init_logging(&cfg.get_log_dir(), &args.log_level)?;
    info!("mvkv-server start args: {:?}", &args);
    info!("mvkv-server start config: {:?}", &cfg);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        println!("received Ctrl+C!");
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");

    let mut engine = MVCC::new(Box::new(SystemClock::new()));
    // A fresh server answers `GET intro` out of the box.
    engine.set(b"intro", b"Hello, World!".to_vec(), None)?;
    let engine = Arc::new(Mutex::new(engine));

    let addr = cfg.get_listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {}", addr);
    println!("mvkv-server listening on {}", addr);

    // Poll the shutdown flag between short accept windows so Ctrl+C lands
    // within half a second.
    while running.load(Ordering::SeqCst) {
        match tokio::time::timeout(Duration::from_millis(500), listener.accept()).await {
            Ok(Ok((stream, peer))) => {
                info!("client connected: {}", peer);
                let session = Session::new(engine.clone());
                tokio::spawn(async move {
                    if let Err(err) = session.serve(stream).await {
                        error!("session {} failed: {}", peer, err);
                    }
                });
            }
            Ok(Err(err)) => {
                error!("accept failed: {}", err);
            }
            Err(_elapsed) => {}
        }
    }

    let status = engine.lock().map_err(|_| anyhow!("engine mutex poisoned"))?.status();
    info!("mvkv-server stopping, status: {:?}", status);
    println!("Bye~");

    Ok(())
}
