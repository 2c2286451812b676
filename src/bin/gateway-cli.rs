use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use chain_gateway::transactions::date_range::parse_date;
use chain_gateway::transactions::types::DateBound;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the chain gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(long, default_value = "/crypto-transactions")]
    transactions_prefix: String,

    #[arg(long, default_value = "/ipfs-storage")]
    ipfs_prefix: String,

    #[arg(long, default_value = "/token-balance")]
    balance_prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and cache the latest transactions of an address
    Latest {
        address: String,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Query cached transactions sent by an address
    History {
        address: String,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    /// Whole-token ERC20 balance of a wallet
    Balance { wallet: String, token: String },
    /// Pin a text payload to IPFS
    AddFile { data: String },
    /// Read back a pinned file
    GetFile { hash: String },
    /// Gateway liveness
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Latest { address, limit } => {
            let mut request = client.get(format!("{}{}/{}/latest", base, cli.transactions_prefix, address));
            if let Some(limit) = limit {
                request = request.query(&[("limit", limit.to_string())]);
            }
            request
        }
        Commands::History { address, from, to } => {
            // Catch typos locally before a round trip.
            if let Some(from) = &from {
                parse_date(from, DateBound::From)?;
            }
            if let Some(to) = &to {
                parse_date(to, DateBound::To)?;
            }
            let mut params = Vec::new();
            if let Some(from) = from {
                params.push(("dateFrom", from));
            }
            if let Some(to) = to {
                params.push(("dateTo", to));
            }
            client
                .get(format!("{}{}/{}", base, cli.transactions_prefix, address))
                .query(&params)
        }
        Commands::Balance { wallet, token } => client
            .get(format!("{}{}", base, cli.balance_prefix))
            .query(&[("walletAddress", wallet), ("tokenContractAddress", token)]),
        Commands::AddFile { data } => client
            .post(format!("{}{}/add-file", base, cli.ipfs_prefix))
            .json(&json!({ "data": data })),
        Commands::GetFile { hash } => {
            client.get(format!("{}{}/get-file/{}", base, cli.ipfs_prefix, hash))
        }
        Commands::Health => client.get(format!("{}/health", base)),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let body = res.text().await?;
    println!("{}", render(status, &body)?);
    Ok(())
}

/// Pretty JSON for a success, an error carrying the status and body otherwise.
fn render(status: reqwest::StatusCode, body: &str) -> Result<String, Box<dyn std::error::Error>> {
    if !status.is_success() {
        return Err(format!("gateway returned status {}: {}", status, body.trim()).into());
    }
    let json: Value = serde_json::from_str(body)?;
    Ok(serde_json::to_string_pretty(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_render_success() {
        let out = render(StatusCode::OK, r#"{"balance":"12"}"#).unwrap();
        assert_eq!(out, "{\n  \"balance\": \"12\"\n}");
    }

    #[test]
    fn test_render_error_status_fails() {
        let err = render(StatusCode::BAD_REQUEST, r#"{"error":"Invalid wallet address"}"#).unwrap_err();
        assert!(err.to_string().contains("400"));
        assert!(err.to_string().contains("Invalid wallet address"));

        assert!(render(StatusCode::from_u16(522).unwrap(), "").is_err());
    }
}
