use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::{LogFormat, RouterConfig};
use crate::logging::init_logging;
use crate::manifest::RouteManifest;
use crate::router::{PathPattern, RouteParams};
use crate::server::{RawRequest, Server};

/// Command-line interface for routegate
///
/// Tries out path patterns and route manifests without wiring up a
/// transport.
#[derive(Debug, Parser)]
#[command(name = "routegate")]
#[command(about = "routegate CLI", long_about = None)]
pub struct Cli {
    /// Router config file (TOML)
    #[arg(long, global = true, env = "ROUTEGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format; overrides the config file
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands for routegate
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Match a single path against a single pattern
    Match {
        /// Route pattern, e.g. `/pets/{id}` or `/files/:`
        #[arg(long)]
        pattern: String,

        /// Request path
        #[arg(long)]
        path: String,
    },
    /// Dispatch one request through the routes of a manifest
    Resolve {
        /// Route manifest (TOML)
        #[arg(short, long)]
        routes: PathBuf,

        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request path, optionally with `?query`
        #[arg(long)]
        path: String,

        /// Query string without the leading `?`; appended to any query in `--path`
        #[arg(short, long)]
        query: Option<String>,

        /// Request body
        #[arg(long)]
        body: Option<String>,

        /// Upstream request id used as the dispatch id when it is a valid ULID
        #[arg(long)]
        request_id: Option<String>,
    },
    /// List the routes a manifest installs, grouped by method
    Routes {
        /// Route manifest (TOML)
        #[arg(short, long)]
        routes: PathBuf,
    },
}

/// Parse the process arguments, set up logging and run the chosen command.
///
/// The command's JSON result is printed to stdout; logs go to stderr.
///
/// # Errors
///
/// Returns an error if the config or manifest cannot be loaded, or if a
/// pattern is malformed.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let mut config = RouterConfig::load(cli.config.as_deref())?;
    if let Some(format) = cli.log_format {
        config.log.format = format;
    }
    init_logging(&config.log)?;

    let output = execute(&cli.command, &config)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Run a command and return its result as JSON.
///
/// # Errors
///
/// See [`run_cli`].
pub fn execute(command: &Commands, config: &RouterConfig) -> Result<Value> {
    match command {
        Commands::Match { pattern, path } => match_command(pattern, path),
        Commands::Resolve {
            routes,
            method,
            path,
            query,
            body,
            request_id,
        } => {
            let server = load_server(routes, config)?;
            let mut request =
                RawRequest::from_target(method, path, body.clone().unwrap_or_default());
            if let Some(extra) = query.as_deref().filter(|q| !q.is_empty()) {
                if request.query.is_empty() {
                    request.query = extra.to_string();
                } else {
                    request.query = format!("{}&{extra}", request.query);
                }
            }
            if let Some(id) = request_id {
                request = request.with_request_id(id.as_str());
            }
            Ok(resolve_command(&server, &request))
        }
        Commands::Routes { routes } => {
            let server = load_server(routes, config)?;
            let table: Vec<Value> = server
                .dispatcher()
                .routes()
                .describe()
                .into_iter()
                .map(|(method, pattern)| json!({ "method": method, "pattern": pattern }))
                .collect();
            Ok(json!({ "routes": table }))
        }
    }
}

fn match_command(pattern: &str, path: &str) -> Result<Value> {
    let parsed = PathPattern::parse(pattern)
        .with_context(|| format!("malformed pattern {pattern:?}"))?;
    let result = parsed.match_path(path);
    debug!(pattern, path, matched = result.is_some(), "Pattern match");

    let params = result.as_ref().map(RouteParams::to_map);
    Ok(json!({
        "pattern": pattern,
        "path": path,
        "matched": params.is_some(),
        "params": params,
    }))
}

fn load_server(routes: &std::path::Path, config: &RouterConfig) -> Result<Server> {
    let manifest = RouteManifest::load(routes)?;
    let server = Server::with_config(config);
    let installed = manifest.install(server.dispatcher())?;
    info!(manifest = %routes.display(), installed, "Routes installed");
    Ok(server)
}

fn resolve_command(server: &Server, request: &RawRequest) -> Value {
    let response = server.handle(request);
    let body = serde_json::from_slice::<Value>(&response.body)
        .unwrap_or_else(|_| Value::String(response.body_string()));
    let headers: BTreeMap<&str, &str> = response
        .headers
        .iter()
        .map(|(k, v)| (&**k, v.as_str()))
        .collect();
    json!({
        "method": request.method,
        "path": request.path,
        "query": request.query,
        "status": response.status,
        "headers": headers,
        "body": body,
    })
}
