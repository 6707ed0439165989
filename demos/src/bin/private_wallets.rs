//! Demo 2: Private wallet listing
//!
//! Showcases: credentials from the environment, signed requests
//!
//! Run: CLEVERCOIN_API_KEY=... CLEVERCOIN_API_SECRET=... cargo run --bin private_wallets

use clevercoin_rest::{CallSpec, ClevercoinClient, ClientConfig, Method};
use colored::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  CLEVERCOIN WALLETS".cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            println!("{} {}", "✗".red(), err);
            println!(
                "  Set {} and {} to run this demo.",
                clevercoin_auth::ENV_API_KEY,
                clevercoin_auth::ENV_API_SECRET
            );
            return Ok(());
        }
    };

    let client = ClevercoinClient::with_config(config)?;
    println!("{} Signed request to {}/v1/wallets", "✓".green(), client.base_url());

    let wallets = client
        .execute(&CallSpec::private(Method::Get, "wallets"))
        .await?;
    println!("{}", serde_json::to_string_pretty(&wallets)?);

    client.close();
    Ok(())
}
