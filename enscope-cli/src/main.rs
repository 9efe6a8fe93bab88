//! ENScope CLI
//!
//! Command-line interface for resolving ENS names into enriched profiles.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use enscope_api::{ApiConfig, ApiServer};
use enscope_core::constants::{DEFAULT_INDEXER_BASE_URL, DEFAULT_RESOLVER_BASE_URL, DEFAULT_TIMEOUT_SECONDS};
use enscope_core::types::{parse_name_list, BatchResolution, ResolvedProfile, TokenHolding};
use enscope_ens::{EnrichmentPolicy, NameResolver, ResolverConfig};

/// ENScope - ENS profile lookup
#[derive(Parser)]
#[command(name = "enscope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Sim API key; enables balance, transaction and contract lookups
    #[arg(long, env = "SIM_API_KEY", global = true, hide_env_values = true)]
    sim_api_key: Option<String>,

    /// Name-resolution gateway base URL
    #[arg(long, env = "ENS_RESOLVER_URL", global = true, default_value = DEFAULT_RESOLVER_BASE_URL)]
    resolver_url: String,

    /// Indexer base URL
    #[arg(long, env = "SIM_API_URL", global = true, default_value = DEFAULT_INDEXER_BASE_URL)]
    indexer_url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    timeout: u64,

    /// Stop enrichment at the first failed indexer lookup
    #[arg(long, global = true)]
    shared_boundary: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an ENS name to a profile
    Resolve {
        /// ENS name to resolve (prompted for when omitted)
        name: Option<String>,
        /// Print the profile as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve several ENS names
    Batch {
        /// Names, separated by spaces or commas
        #[arg(required = true)]
        names: Vec<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },
}

impl Cli {
    fn resolver_config(&self) -> ResolverConfig {
        let policy = if self.shared_boundary {
            EnrichmentPolicy::SharedBoundary
        } else {
            EnrichmentPolicy::Isolated
        };

        ResolverConfig::default()
            .with_resolver_url(&self.resolver_url)
            .with_indexer_url(&self.indexer_url)
            .with_timeout(self.timeout)
            .with_policy(policy)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "enscope=debug,info"
    } else {
        "enscope=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = cli.resolver_config();
    let credential = cli.sim_api_key.clone().filter(|k| !k.trim().is_empty());

    match cli.command {
        Commands::Resolve { name, json } => cmd_resolve(config, credential, name, json).await,
        Commands::Batch { names, json } => cmd_batch(config, credential, &names, json).await,
        Commands::Serve { port, bind } => cmd_serve(config, credential, port, &bind).await,
    }
}

/// Resolve one name
async fn cmd_resolve(
    config: ResolverConfig,
    credential: Option<String>,
    name: Option<String>,
    json: bool,
) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("Enter ENS name")
            .default("vitalik.eth".into())
            .interact_text()
            .context("Failed to read ENS name")?,
    };

    let resolver = NameResolver::with_config(config).context("Invalid resolver configuration")?;

    if !json {
        println!("{} {}", "🔍 Resolving:".cyan().bold(), name);
    }

    let profile = resolver
        .resolve(&name, credential.as_deref())
        .await
        .context("Failed to resolve ENS name")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print_profile(&profile);
    }

    Ok(())
}

/// Resolve a list of names
async fn cmd_batch(
    config: ResolverConfig,
    credential: Option<String>,
    raw_names: &[String],
    json: bool,
) -> Result<()> {
    let names: Vec<String> = raw_names.iter().flat_map(|n| parse_name_list(n)).collect();
    if names.is_empty() {
        anyhow::bail!("No names given");
    }

    let resolver = NameResolver::with_config(config).context("Invalid resolver configuration")?;

    let pb = if json {
        ProgressBar::hidden()
    } else {
        println!("{} {} names", "🔍 Resolving".cyan().bold(), names.len());
        ProgressBar::new(names.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let batch = resolver
        .resolve_batch_with_progress(&names, credential.as_deref(), |name, _| {
            pb.set_message(name.to_string());
            pb.inc(1);
        })
        .await;

    pb.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    } else {
        print_batch(&batch);
    }

    Ok(())
}

/// Run API server
async fn cmd_serve(
    config: ResolverConfig,
    credential: Option<String>,
    port: u16,
    bind: &str,
) -> Result<()> {
    println!("{}", "🚀 Starting ENScope API server...".cyan().bold());
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    if credential.is_none() {
        println!("   {}", "No SIM_API_KEY set: enrichment disabled".yellow());
    }
    println!("\n   Press Ctrl+C to stop.\n");

    let server = ApiServer::new(ApiConfig {
        resolver: config,
        sim_api_key: credential,
    })
    .context("Failed to start API server")?;

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    server.run(addr).await?;

    Ok(())
}

fn print_profile(profile: &ResolvedProfile) {
    println!("\n{}", "✅ Resolved profile:".green().bold());
    println!("   {} {}", "ENS Name:".dimmed(), profile.name.trim());
    println!("   {} {}", "Address:".yellow(), profile.address);

    let well_known = profile.well_known_records();
    for (label, value) in &well_known {
        println!("   {} {}", format!("{}:", label).dimmed(), value);
    }
    let other = profile.records.len().saturating_sub(well_known.len());
    if other > 0 {
        println!("   {} {} more record(s), use --json to see all", "…".dimmed(), other);
    }

    match &profile.enrichment {
        Some(enrichment) => {
            println!("\n{}", "📈 On-chain:".cyan().bold());
            match &enrichment.balance {
                Some(balance) => println!("   {} {}", "ETH Balance:".dimmed(), format_balance(balance)),
                None => println!("   {} {}", "ETH Balance:".dimmed(), "unknown".dimmed()),
            }
            match enrichment.tx_count {
                Some(count) => println!("   {} {}", "Transactions:".dimmed(), count),
                None => println!("   {} {}", "Transactions:".dimmed(), "unknown".dimmed()),
            }
            println!("   {} {}", "Contract:".dimmed(), if enrichment.is_contract { "yes" } else { "no" });
            if !enrichment.token_holdings.is_empty() {
                println!("   {}", "Token holdings:".dimmed());
                for holding in &enrichment.token_holdings {
                    println!("     - {}", format_holding(holding));
                }
            }
        }
        None => println!("\n   {}", "Set SIM_API_KEY for on-chain data.".dimmed()),
    }

    for step in &profile.degraded {
        println!("   {} {} lookup failed", "⚠️ ".yellow(), step);
    }
}

fn print_batch(batch: &BatchResolution) {
    println!(
        "\n{} {} resolved, {} failed",
        "✅".green(),
        batch.resolved.len(),
        batch.failed.len()
    );

    for (name, address) in batch.addresses() {
        println!("   {:<32} {}", name, address);
    }
    for failure in &batch.failed {
        println!("   {:<32} {}", failure.name, failure.error.red());
    }
}

/// Renders a wei amount as ETH, keeping the raw value for non-integers.
fn format_balance(wei: &str) -> String {
    let digits = wei.trim();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return wei.to_string();
    }

    let padded = format!("{:0>19}", digits);
    let (whole, fraction) = padded.split_at(padded.len() - 18);
    let whole = whole.trim_start_matches('0');
    let whole = if whole.is_empty() { "0" } else { whole };
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        format!("{} ETH", whole)
    } else {
        format!("{}.{} ETH", whole, fraction)
    }
}

/// One holding as `SYMBOL (Name): amount | USD Value: $x | Price: $y`.
///
/// Zero or missing USD figures are left out.
fn format_holding(holding: &TokenHolding) -> String {
    let amount = match holding.scaled_amount() {
        Some(amount) => format!("{:.4}", amount),
        None => holding.amount.clone(),
    };

    let mut line = format!("{} ({}): {}", holding.symbol, holding.name, amount);
    if let Some(usd) = holding.value_usd.filter(|v| *v != 0.0) {
        line.push_str(&format!(" | USD Value: ${:.2}", usd));
    }
    if let Some(price) = holding.price_usd.filter(|v| *v != 0.0) {
        line.push_str(&format!(" | Price: ${:.2}", price));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_balance() {
        assert_eq!(format_balance("1500000000000000000"), "1.5 ETH");
        assert_eq!(format_balance("1000000000000000000"), "1 ETH");
        assert_eq!(format_balance("42"), "0.000000000000000042 ETH");
        assert_eq!(format_balance("0"), "0 ETH");
        assert_eq!(format_balance("12.5"), "12.5");
    }

    #[test]
    fn test_format_holding() {
        let usdc = TokenHolding {
            symbol: "USDC".into(),
            name: "USD Coin".into(),
            amount: "2500000".into(),
            decimals: Some(6),
            value_usd: Some(2.5),
            price_usd: Some(1.0),
        };
        assert_eq!(format_holding(&usdc), "USDC (USD Coin): 2.5000 | USD Value: $2.50 | Price: $1.00");

        let unpriced = TokenHolding {
            symbol: "XYZ".into(),
            name: "Xyz".into(),
            amount: "7".into(),
            value_usd: Some(0.0),
            ..Default::default()
        };
        assert_eq!(format_holding(&unpriced), "XYZ (Xyz): 7.0000");
    }

    #[test]
    fn test_cli_parses_resolve() {
        let cli = Cli::try_parse_from([
            "enscope",
            "--resolver-url",
            "http://localhost:8080",
            "--shared-boundary",
            "resolve",
            "vitalik.eth",
        ])
        .unwrap();

        let config = cli.resolver_config();
        assert_eq!(config.resolver_base_url, "http://localhost:8080");
        assert_eq!(config.enrichment_policy, EnrichmentPolicy::SharedBoundary);
        assert!(matches!(cli.command, Commands::Resolve { name: Some(ref n), json: false } if n == "vitalik.eth"));
    }

    #[test]
    fn test_cli_batch_requires_names() {
        assert!(Cli::try_parse_from(["enscope", "batch"]).is_err());
    }
}
