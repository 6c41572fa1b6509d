//! LinkedIn outreach commands.

use clap::Subcommand;

use outflow_api::CampaignApiClient;
use outflow_wizard::{LinkedinFlow, LinkedinLauncher};

use crate::prompt;

#[derive(Debug, Subcommand)]
pub(crate) enum LinkedinCommands {
    /// Show connected LinkedIn accounts
    Accounts,
    /// Launch LinkedIn outreach for a campaign
    Launch { campaign_id: String },
}

pub(crate) async fn run(client: CampaignApiClient, command: LinkedinCommands) -> anyhow::Result<()> {
    match command {
        LinkedinCommands::Accounts => {
            let status = client.linkedin_accounts().await?;
            if !status.has_account {
                let auth_url = client.linkedin_connect(None).await?;
                println!("no LinkedIn account connected — finish the hosted auth flow at:");
                println!("{auth_url}");
                return Ok(());
            }
            for account in &status.accounts {
                println!("{} ({})", account.name, account.id);
            }
            Ok(())
        }
        LinkedinCommands::Launch { campaign_id } => launch(client, &campaign_id).await,
    }
}

async fn launch(client: CampaignApiClient, campaign_id: &str) -> anyhow::Result<()> {
    let mut launcher = LinkedinLauncher::new(client);
    launcher.begin(campaign_id).await?;

    loop {
        match launcher.flow().clone() {
            LinkedinFlow::Idle => return Ok(()),
            LinkedinFlow::ConnectPrompt { auth_url } => {
                println!("connect your LinkedIn account first, then re-run this command:");
                println!("{auth_url}");
                return Ok(());
            }
            LinkedinFlow::SelectAccount { accounts, .. } => {
                for (i, account) in accounts.iter().enumerate() {
                    println!("{}. {} ({})", i + 1, account.name, account.id);
                }
                let Some(index) = prompt::index("send from which account?", accounts.len())? else {
                    println!("cancelled");
                    return Ok(());
                };
                launcher.choose_account(&accounts[index].id).await?;
            }
            LinkedinFlow::Compose { message, leads, .. } => {
                println!("generated message:\n{message}");
                println!("{} leads with LinkedIn profiles", leads.len());
                let edited = prompt::line("edit message (empty keeps current)")?;
                if !edited.is_empty() {
                    launcher.edit_message(&edited)?;
                }
                launcher.request_launch()?;
            }
            LinkedinFlow::ConfirmLaunch { leads, .. } => {
                println!(
                    "this will send LinkedIn messages to {} leads and incur sending costs",
                    leads.len()
                );
                if prompt::confirm("launch now?")? {
                    launcher.confirm_launch().await?;
                } else {
                    launcher.cancel_launch()?;
                    println!("back to composing");
                }
            }
            LinkedinFlow::Launched {
                sent_count,
                connection_requests_sent,
            } => {
                println!(
                    "launched: {sent_count} messages sent, {connection_requests_sent} connection requests"
                );
                return Ok(());
            }
        }
    }
}
