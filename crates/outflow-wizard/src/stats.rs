//! Dashboard aggregation over the user's campaigns.

use outflow_api::types::Campaign;

/// Aggregated counters for the dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignStats {
    pub total_campaigns: usize,
    pub active_campaigns: usize,
    pub total_sent: u64,
    pub total_opened: u64,
    pub total_clicked: u64,
    pub total_replied: u64,
    /// Whole-percent averages; zero when nothing has been sent.
    pub avg_open_rate: u64,
    pub avg_reply_rate: u64,
}

/// Aggregate campaign counters. Rates are whole percents of the totals, not
/// averages of per-campaign rates, and guard the zero-sent case.
#[must_use]
pub fn summarize(campaigns: &[Campaign]) -> CampaignStats {
    let mut stats = CampaignStats {
        total_campaigns: campaigns.len(),
        ..CampaignStats::default()
    };

    for campaign in campaigns {
        if campaign.status == "active" {
            stats.active_campaigns += 1;
        }
        stats.total_sent += campaign.sent;
        stats.total_opened += campaign.opened;
        stats.total_clicked += campaign.clicked;
        stats.total_replied += campaign.replied;
    }

    if stats.total_sent > 0 {
        stats.avg_open_rate = percent_of(stats.total_opened, stats.total_sent);
        stats.avg_reply_rate = percent_of(stats.total_replied, stats.total_sent);
    }
    stats
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn percent_of(part: u64, whole: u64) -> u64 {
    ((part as f64 / whole as f64) * 100.0).round() as u64
}
