//! Streamed one-form campaign creation.
//!
//! The non-wizard flow: one request carries the whole form, the backend does
//! everything, and progress arrives as a stream with a mid-stream lead
//! approval gate. Falls back to the one-shot endpoint when the streaming
//! session cannot be opened.

use outflow_api::types::CampaignStreamRequest;
use outflow_api::{CampaignApiClient, CampaignEvent, CancelToken, Frame};

use crate::prompt;

pub(crate) async fn run(
    client: &CampaignApiClient,
    name: &str,
    url: &str,
    audience: &str,
    sender: &str,
    leads: u32,
) -> anyhow::Result<()> {
    if !prompt::confirm(&format!(
        "this will generate AI copy, search {leads} leads, and create a campaign (est. $0.10 - $5.00)"
    ))? {
        println!("cancelled");
        return Ok(());
    }

    let request = CampaignStreamRequest {
        campaign_name: name.to_owned(),
        url: url.to_owned(),
        target_audience: audience.to_owned(),
        sender_name: sender.to_owned(),
        lead_count: leads,
        user_id: client.user_id().to_owned(),
    };

    let token = CancelToken::new();
    let mut stream = match client.create_campaign_stream(&request, token.clone()).await {
        Ok(stream) => stream,
        Err(err) => {
            // Streaming refused — fall back to the one-shot endpoint.
            tracing::warn!(error = %err, "streamed creation unavailable, using one-shot fallback");
            let created = client.create_campaign(url, audience).await?;
            println!("campaign {} created ({} variants)", created.campaign_id, created.variants.len());
            return Ok(());
        }
    };

    while let Some(frame) = stream.next_frame().await? {
        match frame {
            Frame::Event(CampaignEvent::Progress(update)) => {
                if let Some(message) = &update.message {
                    println!("[step {}] {message}", update.step);
                }
                if let Some(log) = &update.log {
                    println!("         {log}");
                }
            }
            Frame::Event(CampaignEvent::AwaitingLeadConfirmation(gate)) => {
                println!("review the scraped leads before they are added:");
                for lead in &gate.leads {
                    println!(
                        "  {} {} <{}>",
                        lead.first_name.as_deref().unwrap_or(""),
                        lead.last_name.as_deref().unwrap_or(""),
                        lead.email
                    );
                }
                if prompt::confirm("add these leads to the campaign?")? {
                    client.confirm_leads(&gate.session_id, true).await?;
                } else {
                    token.cancel();
                    println!("campaign creation cancelled");
                    return Ok(());
                }
            }
            Frame::Event(CampaignEvent::Done(done)) => {
                println!("campaign {} created", done.campaign_id);
                return Ok(());
            }
            Frame::Event(CampaignEvent::Error { message }) => {
                anyhow::bail!("campaign creation failed: {message}");
            }
            Frame::Malformed { line, error } => {
                tracing::warn!(line = %line, error = %error, "skipping malformed stream frame");
            }
        }
    }

    anyhow::bail!("the stream ended before the campaign was confirmed")
}
