//! Interactive drive of the six-step campaign wizard.
//!
//! This module is a pure projection of [`WizardController`] state onto the
//! terminal: it renders the current step, collects input, and relays
//! confirmation gates as y/n prompts. All decisions live in the controller.

use outflow_api::CampaignApiClient;
use outflow_core::AppConfig;
use outflow_wizard::{
    CampaignProgress, ConfirmationKind, ConfirmationRequest, LeadSearchOutcome, VariantField,
    WizardController, WizardError, WizardOptions, WizardStep,
};

use crate::prompt;

pub(crate) async fn run(client: CampaignApiClient, config: &AppConfig) -> anyhow::Result<()> {
    let mut wizard = WizardController::new(client, WizardOptions::from_app_config(config));

    loop {
        match wizard.state().step {
            WizardStep::Analyze => {
                if !step_analyze(&mut wizard).await? {
                    return Ok(());
                }
            }
            WizardStep::ChooseProfile => step_choose_profile(&mut wizard).await?,
            WizardStep::ReviewLeads => step_review_leads(&mut wizard).await?,
            WizardStep::ReviewEmails => step_review_emails(&mut wizard).await?,
            WizardStep::SendingSetup => step_sending_setup(&mut wizard).await?,
            WizardStep::Launched => {
                step_launched(&wizard);
                return Ok(());
            }
        }
    }
}

/// Returns `false` when the user wants out.
async fn step_analyze(wizard: &mut WizardController) -> anyhow::Result<bool> {
    println!("\n== step 1/6: website analysis ==");
    let url = prompt::line("your website URL (empty to quit)")?;
    if url.is_empty() {
        return Ok(false);
    }
    wizard.set_source_url(url);

    let count = prompt::line("number of leads to find [10]")?;
    if let Ok(count) = count.parse::<u32>() {
        wizard.set_requested_lead_count(count);
    }

    println!("analyzing the website — this can take a few minutes...");
    match wizard.start_analysis().await {
        Ok(found) => println!("found {found} suggested customer profiles"),
        Err(err) => report(&err),
    }
    Ok(true)
}

async fn step_choose_profile(wizard: &mut WizardController) -> anyhow::Result<()> {
    println!("\n== step 2/6: pick your ideal customer profile ==");
    for (i, icp) in wizard.state().suggested_icps.iter().enumerate() {
        println!("{}. {} ({})", i + 1, icp.name, icp.company_size);
        println!("   {}", icp.description);
        for pain in &icp.pain_points {
            println!("   - {pain}");
        }
    }

    let count = wizard.state().suggested_icps.len();
    let Some(index) = prompt::index("select a profile (empty to go back)", count)? else {
        wizard.back().ok();
        return Ok(());
    };

    println!("searching for leads — this can take up to two minutes...");
    match wizard.select_icp(index).await {
        Ok(LeadSearchOutcome::Complete { found }) => println!("found {found} enriched leads"),
        Ok(LeadSearchOutcome::Exhausted { found }) => println!(
            "lead enrichment is taking longer than expected; continuing with {found} leads — the rest will be ready in the sending platform"
        ),
        Err(err) => report(&err),
    }
    Ok(())
}

async fn step_review_leads(wizard: &mut WizardController) -> anyhow::Result<()> {
    println!("\n== step 3/6: review found leads ==");
    if wizard.state().leads.is_empty() {
        println!("no leads are enriched yet; they will appear in the sending platform shortly");
    }
    for (i, lead) in wizard.state().leads.iter().enumerate() {
        println!(
            "{}. {} {} <{}> {} {}",
            i + 1,
            lead.first_name.as_deref().unwrap_or(""),
            lead.last_name.as_deref().unwrap_or(""),
            lead.email,
            lead.company_name.as_deref().unwrap_or("-"),
            lead.title.as_deref().unwrap_or("-"),
        );
    }

    if prompt::confirm("continue to email generation?")? {
        println!("generating email variants...");
        match wizard.generate_emails().await {
            Ok(count) => println!("generated {count} variants"),
            Err(err) => report(&err),
        }
    } else {
        wizard.back().ok();
    }
    Ok(())
}

async fn step_review_emails(wizard: &mut WizardController) -> anyhow::Result<()> {
    println!("\n== step 4/6: review and edit email variants ==");
    for (i, variant) in wizard.state().edited_variants.iter().enumerate() {
        println!("--- variant {} ---", i + 1);
        println!("subject: {}", variant.subject);
        println!("{}", variant.body);
    }

    let choice = prompt::line("[c]ontinue, [r]egenerate N, [e]dit N, [b]ack")?;
    let mut parts = choice.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("r"), Some(n)) => {
            if let Ok(n) = n.parse::<usize>() {
                match wizard.regenerate_variant(n.saturating_sub(1)).await {
                    Ok(()) => println!("variant {n} regenerated"),
                    Err(err) => report(&err),
                }
            }
        }
        (Some("e"), Some(n)) => {
            if let Ok(n) = n.parse::<usize>() {
                let subject = prompt::line("new subject (empty keeps current)")?;
                if !subject.is_empty() {
                    if let Err(err) =
                        wizard.edit_variant(n.saturating_sub(1), VariantField::Subject, &subject)
                    {
                        report(&err);
                    }
                }
                let body = prompt::line("new body (empty keeps current)")?;
                if !body.is_empty() {
                    if let Err(err) =
                        wizard.edit_variant(n.saturating_sub(1), VariantField::Body, &body)
                    {
                        report(&err);
                    }
                }
            }
        }
        (Some("b"), _) => {
            wizard.back().ok();
        }
        _ => {
            println!("matching sending domains and accounts...");
            match wizard.match_domains().await {
                Ok((domains, accounts)) => {
                    println!("found {domains} DFY domains and {accounts} existing accounts");
                }
                Err(err) => report(&err),
            }
        }
    }
    Ok(())
}

async fn step_sending_setup(wizard: &mut WizardController) -> anyhow::Result<()> {
    println!("\n== step 5/6: sending setup ==");

    let domains: Vec<String> = wizard
        .state()
        .matched_domains
        .iter()
        .map(|d| d.domain.clone())
        .collect();
    for domain in &wizard.state().matched_domains {
        let marker = if wizard.state().selected_domains.contains(&domain.domain) {
            "[x]"
        } else {
            "[ ]"
        };
        println!(
            "{marker} {} (score {}/100) — {}",
            domain.domain, domain.score, domain.reasoning
        );
    }
    let accounts: Vec<String> = wizard
        .state()
        .existing_accounts
        .iter()
        .map(|a| a.email.clone())
        .collect();
    for account in &wizard.state().existing_accounts {
        let marker = if wizard.state().selected_accounts.contains(&account.email) {
            "[x]"
        } else {
            "[ ]"
        };
        let warmed = if account.is_pre_warmed { " (warmed up)" } else { "" };
        println!(
            "{marker} {} — {} {}{warmed}",
            account.email, account.first_name, account.last_name
        );
    }
    if domains.is_empty() && accounts.is_empty() {
        println!("no DFY domains or existing accounts available; the campaign can still be created and accounts configured later");
    }

    let choice = prompt::line("[d]omain N toggle, [a]ccount N toggle, [c]reate, [b]ack")?;
    let mut parts = choice.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("d"), Some(n)) => {
            if let Some(domain) = n
                .parse::<usize>()
                .ok()
                .and_then(|n| domains.get(n.saturating_sub(1)))
            {
                wizard.toggle_domain(domain);
            }
        }
        (Some("a"), Some(n)) => {
            if let Some(email) = n
                .parse::<usize>()
                .ok()
                .and_then(|n| accounts.get(n.saturating_sub(1)))
            {
                wizard.toggle_account(email);
            }
        }
        (Some("b"), _) => {
            wizard.back().ok();
        }
        _ => {
            let name = prompt::line("campaign name")?;
            wizard.set_campaign_name(name);
            let sender = prompt::line("your name (sender)")?;
            wizard.set_sender_name(sender);

            match wizard.create_campaign() {
                Ok(CampaignProgress::AwaitingConfirmation) => {
                    drive_confirmations(wizard).await?;
                }
                Ok(_) => {}
                Err(err) => report(&err),
            }
        }
    }
    Ok(())
}

/// Relay confirmation gates until the stream completes, is cancelled, or
/// fails.
async fn drive_confirmations(wizard: &mut WizardController) -> anyhow::Result<()> {
    loop {
        let Some(pending) = wizard.confirmation() else {
            return Ok(());
        };
        render_gate(pending);
        let approve = prompt::confirm("continue?")?;

        match wizard.resolve_confirmation(approve).await {
            Ok(CampaignProgress::AwaitingConfirmation) => {
                print_progress(wizard);
            }
            Ok(CampaignProgress::Completed { campaign_id }) => {
                println!("campaign {campaign_id} created");
                return Ok(());
            }
            Ok(CampaignProgress::Cancelled) => {
                println!("campaign creation cancelled");
                return Ok(());
            }
            Err(WizardError::Cancelled) => {
                println!("campaign creation cancelled");
                return Ok(());
            }
            Err(err) => {
                report(&err);
                return Ok(());
            }
        }
    }
}

fn render_gate(request: &ConfirmationRequest) {
    println!("\n{}", request.title);
    println!("{}", request.message);
    if let Some(cost) = &request.estimated_cost {
        println!("{cost}");
    }
    if let ConfirmationKind::LeadApproval { leads, .. } = &request.kind {
        for lead in leads {
            println!(
                "  {} {} <{}>",
                lead.first_name.as_deref().unwrap_or(""),
                lead.last_name.as_deref().unwrap_or(""),
                lead.email
            );
        }
    }
}

fn print_progress(wizard: &WizardController) {
    for step in wizard.state().progress.steps() {
        println!("  [{:?}] {}", step.status, step.message);
    }
}

fn step_launched(wizard: &WizardController) {
    println!("\n== step 6/6: campaign created ==");
    if let Some(id) = &wizard.state().campaign_id {
        println!("campaign id: {id}");
    }
    println!("leads: {}", wizard.state().leads.len());
    println!("email variants: {}", wizard.state().edited_variants.len());
    println!("sending accounts: {}", wizard.state().selected_accounts.len());
}

fn report(err: &WizardError) {
    match err {
        WizardError::Cancelled => println!("cancelled"),
        WizardError::Timeout { .. } => {
            println!("{err} — the website analysis took too long, please try again");
        }
        other => println!("error: {other}"),
    }
}
