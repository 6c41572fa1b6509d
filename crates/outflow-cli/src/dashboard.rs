//! Dashboard view: aggregated stats and the campaign table.

use outflow_api::CampaignApiClient;
use outflow_wizard::summarize;

pub(crate) async fn run(client: &CampaignApiClient) -> anyhow::Result<()> {
    let campaigns = client.list_campaigns().await?;
    let stats = summarize(&campaigns);

    println!("campaigns: {} ({} active)", stats.total_campaigns, stats.active_campaigns);
    println!(
        "sent: {}   opened: {}   replied: {}   avg open rate: {}%   avg reply rate: {}%",
        stats.total_sent,
        stats.total_opened,
        stats.total_replied,
        stats.avg_open_rate,
        stats.avg_reply_rate
    );
    println!();

    if campaigns.is_empty() {
        println!("no campaigns yet — run `outflow wizard` to create one");
        return Ok(());
    }

    println!(
        "{:<36} {:<10} {:>6} {:>10} {:>11}  {}",
        "URL", "STATUS", "SENT", "OPEN RATE", "REPLY RATE", "CREATED"
    );
    for campaign in &campaigns {
        let created = campaign
            .created_at
            .map_or_else(|| "-".to_owned(), |d| d.format("%Y-%m-%d").to_string());
        println!(
            "{:<36} {:<10} {:>6} {:>9}% {:>10}%  {}",
            truncate(&campaign.url, 36),
            campaign.status,
            campaign.sent,
            campaign.open_rate.round(),
            campaign.reply_rate.round(),
            created
        );
    }
    Ok(())
}

/// Detail view for one campaign: stored row, live sending-platform counters,
/// and the sourced leads when a lead list exists.
pub(crate) async fn show_campaign(
    client: &CampaignApiClient,
    campaign_id: &str,
) -> anyhow::Result<()> {
    let campaigns = client.list_campaigns().await?;
    let Some(campaign) = campaigns.iter().find(|c| c.campaign_id == campaign_id) else {
        anyhow::bail!("no campaign with id '{campaign_id}'");
    };

    println!("{} ({})", campaign.url, campaign.status);
    println!("targeting: {}", campaign.target_audience);

    let analytics = client.campaign_analytics(campaign_id).await?;
    println!(
        "sent: {}   opened: {}   clicked: {}   replied: {}",
        analytics.sent, analytics.opened, analytics.clicked, analytics.replied
    );

    let Some(list_id) = &campaign.supersearch_list_id else {
        println!("no lead list recorded for this campaign");
        return Ok(());
    };
    let leads = client.list_leads(list_id).await?;
    if leads.is_empty() {
        println!("leads are still enriching — check back in a few minutes");
        return Ok(());
    }
    println!("\n{} leads:", leads.len());
    for lead in &leads {
        println!(
            "  {} {} <{}> {}",
            lead.first_name.as_deref().unwrap_or(""),
            lead.last_name.as_deref().unwrap_or(""),
            lead.email,
            lead.company_name.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_owned()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
