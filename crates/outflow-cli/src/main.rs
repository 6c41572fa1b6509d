//! `outflow` — dashboard and campaign wizard for the cold-outreach backend.

mod dashboard;
mod domains;
mod linkedin;
mod prompt;
mod quick;
mod wizard;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use outflow_api::CampaignApiClient;

#[derive(Debug, Parser)]
#[command(name = "outflow")]
#[command(about = "Cold-outreach campaign dashboard and creation wizard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show aggregated stats and the campaign list
    Dashboard,
    /// Show one campaign's live analytics and its sourced leads
    Campaign { campaign_id: String },
    /// Run the six-step campaign creation wizard
    Wizard,
    /// Streamed one-form campaign creation, skipping the wizard
    Quick {
        /// Campaign name
        #[arg(long)]
        name: String,
        /// Your website URL
        #[arg(long)]
        url: String,
        /// Who the campaign targets
        #[arg(long)]
        audience: String,
        /// Sender name used in the email signature
        #[arg(long)]
        sender: String,
        /// How many leads to source
        #[arg(long, default_value_t = 3)]
        leads: u32,
    },
    /// Browse and order pre-warmed sending domains
    Domains {
        #[command(subcommand)]
        command: domains::DomainsCommands,
    },
    /// Launch LinkedIn outreach for an existing campaign
    Linkedin {
        #[command(subcommand)]
        command: linkedin::LinkedinCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = outflow_core::load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let client = CampaignApiClient::new(&config)?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Dashboard => dashboard::run(&client).await,
        Commands::Campaign { campaign_id } => dashboard::show_campaign(&client, &campaign_id).await,
        Commands::Wizard => wizard::run(client, &config).await,
        Commands::Quick {
            name,
            url,
            audience,
            sender,
            leads,
        } => quick::run(&client, &name, &url, &audience, &sender, leads).await,
        Commands::Domains { command } => domains::run(&client, command).await,
        Commands::Linkedin { command } => linkedin::run(client, command).await,
    }
}
