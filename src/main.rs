//! Switchyard command line.
//!
//! # Commands
//!
//! ```text
//!   dispatch <METHOD> <PATH>   resolve a request, show handler, params, middleware
//!   url <TARGET> [PARAMS...]   reverse-route a handler target
//!   routes                     dump the compiled table as JSON
//!   compile                    rebuild the table and publish it to the cache
//!   watch                      recompile on file change, resolve stdin lines
//! ```
//!
//! Global flags pick the route file, the environment (`SWITCHYARD_ENV`), the
//! cache directory and the log level. Any error exits with status 1.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

use switchyard::cache::RouteCacheGateway;
use switchyard::config::watcher::ConfigWatcher;
use switchyard::config::{load_config, Environment};
use switchyard::lifecycle::signals::wait_for_signal;
use switchyard::lifecycle::startup::cache_store;
use switchyard::lifecycle::{build_router, Shutdown, StartupOptions};
use switchyard::observability::logging::init_logging;
use switchyard::routing::dispatch;
use switchyard::routing::table::RouteTable;
use switchyard::{RequestType, RouteRequest, Router, RouterResult};

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "switchyard")]
#[command(about = "Compile, inspect and exercise switchyard route tables", long_about = None)]
struct Cli {
    /// Route definition file.
    #[arg(short, long, default_value = "routes.toml", global = true)]
    config: PathBuf,

    /// Environment name; `development` rebuilds the table on every start.
    #[arg(short, long, env = "SWITCHYARD_ENV", default_value = "production", global = true)]
    environment: String,

    /// Directory for the compiled table. Nothing is persisted without it.
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a request against the table
    Dispatch {
        method: String,
        path: String,
        #[arg(long = "type", default_value = "http")]
        request_type: RequestType,
    },
    /// Build the URI for a handler target
    Url {
        target: String,
        params: Vec<String>,
    },
    /// Print the compiled table
    Routes,
    /// Force a rebuild and publish it to the cache
    Compile,
    /// Recompile on change and resolve `METHOD PATH` lines from stdin
    Watch,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult {
    let environment = Environment::new(&cli.environment);

    match cli.command {
        Commands::Dispatch {
            method,
            path,
            request_type,
        } => {
            let router = open_router(&cli.config, &environment, cli.cache_dir)?;
            let request = RouteRequest::new(method, path, request_type);
            let resolved = router.resolve(&request)?;
            let table = router.table();

            let report = json!({
                "handler_id": resolved.handler_id,
                "handler": resolved.handler,
                "params": resolved.params,
                "request_middleware": chain(table.request(), &request)?,
                "response_middleware": chain(table.response(), &request)?,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Url { target, params } => {
            let router = open_router(&cli.config, &environment, cli.cache_dir)?;
            println!("{}", router.route_to(&target, params)?);
        }
        Commands::Routes => {
            let router = open_router(&cli.config, &environment, cli.cache_dir)?;
            println!("{}", serde_json::to_string_pretty(&*router.table())?);
        }
        Commands::Compile => {
            let config = load_config(&cli.config, &environment)?;
            let gateway = RouteCacheGateway::new(cache_store(cli.cache_dir.as_deref()));
            let table = gateway.rebuild(&config)?;

            match &cli.cache_dir {
                Some(dir) => println!(
                    "compiled {} routes into {}",
                    table.routes().len(),
                    dir.display()
                ),
                None => println!(
                    "compiled {} routes (no --cache-dir, nothing persisted)",
                    table.routes().len()
                ),
            }
        }
        Commands::Watch => watch(cli.config, environment, cli.cache_dir).await?,
    }

    Ok(())
}

fn open_router(
    config: &std::path::Path,
    environment: &Environment,
    cache_dir: Option<PathBuf>,
) -> Result<Router, Box<dyn Error>> {
    let router = build_router(StartupOptions {
        config_path: config.to_path_buf(),
        environment: environment.clone(),
        cache_dir,
        skip_middleware: true,
        ..StartupOptions::default()
    })?;
    Ok(router)
}

/// Middleware names `table` would run for `request`; empty when none match.
fn chain(table: &RouteTable, request: &RouteRequest) -> RouterResult<Vec<String>> {
    match dispatch(table, request) {
        Ok(resolution) => Ok(resolution.target.handlers().map(String::from).collect()),
        Err(e) if e.is_not_found() => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

async fn watch(config: PathBuf, environment: Environment, cache_dir: Option<PathBuf>) -> CliResult {
    let router = Arc::new(open_router(&config, &environment, cache_dir.clone())?);
    let gateway = RouteCacheGateway::new(cache_store(cache_dir.as_deref()));

    let (watcher, mut updates) = ConfigWatcher::new(&config, environment);
    let _watcher = watcher.run()?;

    let shutdown = Shutdown::new();
    let mut stop = shutdown.subscribe();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = stop.recv() => break,
            Some(table) = updates.recv() => {
                if let Err(e) = router.reload_and_publish(table, &gateway) {
                    tracing::error!(error = %e, "Reloaded table rejected, keeping current table");
                }
            }
            line = lines.next_line() => match line? {
                Some(line) => print_resolution(&router, &line),
                None => break,
            },
        }
    }

    tracing::info!("Watch mode stopped");
    Ok(())
}

fn print_resolution(router: &Router, line: &str) {
    let mut parts = line.split_whitespace();
    let Some(method) = parts.next() else {
        return;
    };
    let path = parts.next().unwrap_or("");

    let request = RouteRequest::http(method, path);
    match router.resolve(&request) {
        Ok(resolved) => {
            let params: Vec<String> = resolved
                .params
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect();
            println!(
                "{} /{} -> {} [{}]",
                request.method(),
                request.path(),
                resolved.handler_id,
                params.join(", ")
            );
        }
        Err(e) => println!("{} /{} -> {}", request.method(), request.path(), e),
    }
}
