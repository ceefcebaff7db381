use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use edge_gateway::config::read_config;
use edge_gateway::routing::RouteTable;
use edge_gateway::session::credential::{inspect, unix_now, CredentialStatus};
use edge_gateway::session::GatePolicy;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Diagnostics for the edge gateway", long_about = None)]
struct Cli {
    /// Gateway TOML configuration; session and routing settings come from here
    #[arg(short, long, global = true, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a session credential locally (no signature check)
    InspectToken {
        token: String,
        /// Expiry grace window in seconds (defaults to session.grace_secs)
        #[arg(long)]
        grace: Option<i64>,
    },
    /// Show what the gate does for a page navigation
    Gate {
        path: String,
        #[arg(long)]
        token: Option<String>,
    },
    /// List the API route table in match order
    Routes,
    /// Resolve a public API path to its backend target
    Resolve {
        method: String,
        /// Path below the API prefix, query allowed (e.g. /societe?page=2)
        path: String,
    },
    /// Query a running gateway's health probe
    Health {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = read_config(cli.config.as_deref())?;

    match cli.command {
        Commands::InspectToken { token, grace } => {
            let grace = grace.unwrap_or(config.session.grace_secs);
            let report = match inspect(&token, unix_now(), grace) {
                CredentialStatus::Valid(claims) => {
                    json!({ "status": "valid", "exp": claims.exp, "claims": claims.payload })
                }
                CredentialStatus::Expired(claims) => {
                    json!({ "status": "expired", "exp": claims.exp, "claims": claims.payload })
                }
                CredentialStatus::Invalid(e) => json!({ "status": "invalid", "error": e.to_string() }),
            };
            print_json(&report)?;
        }
        Commands::Gate { path, token } => {
            let policy = GatePolicy::from_config(&config);
            let (path, query) = split_query(&path);
            let decision = policy.evaluate(path, query, token.as_deref(), unix_now());
            println!("{:?}", decision);
        }
        Commands::Routes => {
            let table = RouteTable::default();
            for route in table.routes() {
                println!(
                    "{:<7} {:<40} -> {}{}",
                    route.method.as_str(),
                    route.public.to_string(),
                    route.backend,
                    if route.query == edge_gateway::routing::table::QueryPolicy::Forward {
                        " (+query)"
                    } else {
                        ""
                    }
                );
            }
            println!("{:<7} {:<40} -> (verbatim path and query)", "*", "/**");
        }
        Commands::Resolve { method, path } => {
            let method = method.to_ascii_uppercase().parse::<axum::http::Method>()?;
            let (path, query) = split_query(&path);
            let resolved = RouteTable::default().resolve(&method, path, query);
            print_json(&json!({ "route": resolved.label, "backend_path": resolved.backend_path }))?;
        }
        Commands::Health { url } => {
            let res = reqwest::get(format!("{}/healthz", url.trim_end_matches('/'))).await?;
            let status = res.status();
            if !status.is_success() {
                eprintln!("Error: gateway returned status {}", status);
                std::process::exit(1);
            }
            let body: Value = res.json().await?;
            print_json(&body)?;
        }
    }

    Ok(())
}

fn split_query(input: &str) -> (&str, Option<&str>) {
    match input.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (input, None),
    }
}

fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
