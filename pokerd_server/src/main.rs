//! Poker daemon entry point.
//!
//! Binds the listener, spawns the table actor, and hands every accepted
//! connection its own session task.

use std::net::SocketAddr;

use anyhow::{Context, Error};
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;
use pokerd::{TableActor, TableConfig, server};
use tokio::net::TcpListener;

const HELP: &str = "\
Run a poker table daemon

USAGE:
  pokerd_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env POKERD_BIND or 0.0.0.0:9204]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  POKERD_BIND              Listen address (e.g., 127.0.0.1:9204)
  RUST_LOG                 Log filter (e.g., info, pokerd=debug)
";

struct Args {
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.value_from_str("--bind").unwrap_or_else(|_| {
            std::env::var("POKERD_BIND")
                .unwrap_or_else(|_| server::DEFAULT_BIND.to_string())
                .parse()
                .expect("Invalid POKERD_BIND address")
        }),
    };

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    env_logger::builder().format_target(false).init();
    info!("Starting poker daemon at {}", args.bind);

    let table = TableActor::spawn(TableConfig::default());
    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", args.bind))?;

    server::serve(listener, table).await?;
    Ok(())
}
