//! Pre-warmed domain browsing and ordering.

use clap::Subcommand;

use outflow_api::types::OrderPrewarmedRequest;
use outflow_api::CampaignApiClient;

use crate::prompt;

#[derive(Debug, Subcommand)]
pub(crate) enum DomainsCommands {
    /// List pre-warmed domains available to order
    Prewarmed {
        /// Domain extensions to browse
        #[arg(long, value_delimiter = ',', default_value = "com,org,co")]
        extensions: Vec<String>,
    },
    /// List placed domain orders
    Orders {
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    /// Quote a pre-warmed domain order, optionally placing it
    Order {
        domain: String,
        /// Email accounts to provision on the domain
        #[arg(long, default_value_t = 1)]
        accounts: u32,
        /// Actually place the order after showing the quote
        #[arg(long)]
        place: bool,
    },
}

pub(crate) async fn run(client: &CampaignApiClient, command: DomainsCommands) -> anyhow::Result<()> {
    match command {
        DomainsCommands::Prewarmed { extensions } => {
            let extensions: Vec<&str> = extensions.iter().map(String::as_str).collect();
            let domains = client.prewarmed_domains(&extensions).await?;
            if domains.is_empty() {
                println!("no pre-warmed domains available right now — try again later");
                return Ok(());
            }
            println!("{} pre-warmed domains available:", domains.len());
            for domain in &domains {
                println!("  {domain}");
            }
        }
        DomainsCommands::Orders { limit } => {
            let orders = client.domain_orders(limit).await?;
            if orders.is_empty() {
                println!("no domain orders yet");
                return Ok(());
            }
            for order in &orders {
                let created = order
                    .timestamp_created
                    .map_or_else(|| "-".to_owned(), |d| d.format("%Y-%m-%d").to_string());
                let status = if order.timestamp_cancelled.is_some() {
                    "cancelled"
                } else {
                    "active"
                };
                println!("{:<30} {status:<10} ordered {created}", order.domain);
            }
        }
        DomainsCommands::Order {
            domain,
            accounts,
            place,
        } => {
            // Always quote first; placing is a separate consented call.
            let quote = client
                .order_prewarmed(&OrderPrewarmedRequest {
                    domain: domain.clone(),
                    number_of_accounts: accounts,
                    simulation: true,
                })
                .await?;

            if !quote.order_is_valid {
                println!("the order is not valid for {domain}");
                return Ok(());
            }
            println!(
                "{domain}: {} account(s), ${:.2} today, then ${:.2}/month (${:.2}/year per domain)",
                quote.number_of_accounts_ordered,
                quote.total_price,
                quote.total_price_per_month,
                quote.price_per_domain_per_year
            );

            if !place {
                println!("re-run with --place to order");
                return Ok(());
            }
            if !prompt::confirm(&format!("place the order for ${:.2}?", quote.total_price))? {
                println!("cancelled");
                return Ok(());
            }

            let placed = client
                .order_prewarmed(&OrderPrewarmedRequest {
                    domain: domain.clone(),
                    number_of_accounts: accounts,
                    simulation: false,
                })
                .await?;
            if placed.order_placed {
                println!("order placed for {domain}");
            } else {
                println!("the order was not placed — check the sending platform workspace");
            }
        }
    }
    Ok(())
}
