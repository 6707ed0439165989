//! Demo 1: Public market data
//!
//! Showcases: unauthenticated calls, query parameters, error classification
//!
//! Run: cargo run --bin public_market -- EUR

use clevercoin_rest::{CallSpec, ClevercoinClient, ClientConfig, Method, RestError};
use colored::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let currency = std::env::args().nth(1).unwrap_or_else(|| "EUR".to_string());

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  CLEVERCOIN PUBLIC MARKET DATA".cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let mut config = ClientConfig::new();
    if let Ok(base_url) = std::env::var(clevercoin_rest::ENV_BASE_URL) {
        config = config.with_base_url(base_url);
    }
    let client = ClevercoinClient::with_config(config)?;

    for name in ["ticker", "orderbook", "trades"] {
        let call = CallSpec::public(Method::Get, name).query("currency", currency.as_str());

        match client.execute(&call).await {
            Ok(object) => {
                println!("{} {}", "✓".green(), name.bold());
                println!("{}", serde_json::to_string_pretty(&object)?);
            }
            Err(err) => print_error(name, &err),
        }
        println!();
    }

    client.close();
    Ok(())
}

fn print_error(name: &str, err: &RestError) {
    let kind = match err {
        RestError::Validation(_) => "validation",
        RestError::Transport(_) => "transport",
        RestError::Protocol { .. } => "protocol",
        RestError::Api { .. } => "api",
    };
    println!("{} {} [{}] {}", "✗".red(), name.bold(), kind.yellow(), err);
    if err.is_retryable() {
        println!("  {}", "(safe to retry)".dimmed());
    }
}
