use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "registry-cli")]
#[command(about = "Management CLI for the configuration registry", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show request statistics
    Health,
    /// Dump every provider's configuration
    Providers,
    /// Show one provider's configuration
    Provider { id: String },
    /// List a provider's backends
    Backends { provider: String },
    /// List a provider's frontends
    Frontends { provider: String },
    /// Replace the web provider's configuration with a JSON file
    Put { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Health => client.get(format!("{base}/health")),
        Commands::Providers => client.get(format!("{base}/api/providers")),
        Commands::Provider { id } => client.get(format!("{base}/api/providers/{id}")),
        Commands::Backends { provider } => {
            client.get(format!("{base}/api/providers/{provider}/backends"))
        }
        Commands::Frontends { provider } => {
            client.get(format!("{base}/api/providers/{provider}/frontends"))
        }
        Commands::Put { file } => {
            let body = std::fs::read(&file)?;
            // Fail locally on malformed files rather than round-tripping a 400.
            serde_json::from_slice::<Value>(&body)?;
            client
                .put(format!("{base}/api/providers/web"))
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body)
        }
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: registry returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text.trim_end());
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
