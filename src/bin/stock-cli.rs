use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use stock_web_shell::app::AppShell;
use stock_web_shell::client::{ClientError, ClientResponse, RequestOptions};
use stock_web_shell::config::{load_or_default, validate_config, ConfigError};
use stock_web_shell::observability::logging;

#[derive(Parser)]
#[command(name = "stock-cli")]
#[command(about = "Inspect the stock web shell: routes and backend requests", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override http.base_url
    #[arg(short, long)]
    base_url: Option<String>,

    /// Override http.timeout_ms (0 disables the deadline)
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the route table
    Routes,
    /// Resolve a path against the route table
    Resolve { path: String },
    /// Render a path through the application shell
    Render { path: String },
    /// Send a GET through the configured client
    Get {
        path: String,
        /// Query parameter as key=value, repeatable
        #[arg(short, long)]
        query: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.http.base_url = base_url;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.http.timeout_ms = timeout_ms;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    if config.observability.log_level.is_none() {
        config.observability.log_level = Some("stock_web_shell=warn".to_string());
    }
    logging::init(&config.observability)?;

    let shell = AppShell::bootstrap(&config)?;

    match cli.command {
        Commands::Routes => {
            for (name, pattern) in shell.router().routes() {
                println!("{name:<12} {pattern}");
            }
        }
        Commands::Resolve { path } => match shell.router().resolve(&path) {
            Ok(matched) => {
                println!("route: {}", matched.name);
                println!("pattern: {}", matched.pattern);
                for (key, value) in &matched.params {
                    println!("param {key} = {value}");
                }
            }
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        Commands::Render { path } => {
            let rendered = shell.render_path(&path);
            println!("{}", rendered.html);
        }
        Commands::Get { path, query } => {
            let mut options = RequestOptions::new();
            for pair in &query {
                let Some((key, value)) = pair.split_once('=') else {
                    return Err(format!("query '{pair}' must be key=value").into());
                };
                options = options.query(key, value);
            }
            match shell.client().request(reqwest::Method::GET, &path, options).await {
                Ok(response) => print_response(&response)?,
                Err(ClientError::Status { response }) => {
                    eprintln!("Error: backend returned status {}", response.status);
                    eprintln!("Response: {}", response.text());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn print_response(response: &ClientResponse) -> Result<(), Box<dyn std::error::Error>> {
    match response.json::<Value>() {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", response.text()),
    }
    Ok(())
}
