use crate::infra::{
    demo_roster, parse_date, parse_family, parse_tier, RecordingProposalGateway,
    SeededAwardHistories, SeededPersonnelDirectory, SeededUnitDirectory,
};
use chrono::{Datelike, Local, NaiveDate};
use clap::Args;
use khen_thuong::config::AppConfig;
use khen_thuong::error::AppError;
use khen_thuong::workflows::awards::{
    AssignmentOutcome, MedalFamily, MedalTier, PersonnelId, ProposalService, ProposalType,
    RequestContext, RequirementTable, Role, TitleCode,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date for eligibility checks (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Proposal year. Defaults to the configured year, then the as-of year.
    #[arg(long)]
    pub(crate) year: Option<i32>,
}

#[derive(Args, Debug)]
pub(crate) struct EligibilityArgs {
    /// Personnel identifier from the seeded demo roster
    #[arg(long)]
    pub(crate) personnel_id: String,
    /// Medal family (HCCSVV, HC_QKQT, KNC_VSNXD_QDNDVN, HCBVTQ)
    #[arg(long, value_parser = parse_family)]
    pub(crate) family: MedalFamily,
    /// Medal tier (HANG_BA, HANG_NHI, HANG_NHAT)
    #[arg(long, value_parser = parse_tier, default_value = "HANG_BA")]
    pub(crate) tier: MedalTier,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

type DemoService = ProposalService<
    SeededPersonnelDirectory,
    SeededAwardHistories,
    SeededUnitDirectory,
    RecordingProposalGateway,
>;

fn seeded_service() -> (Arc<DemoService>, Arc<RecordingProposalGateway>) {
    let gateway = Arc::new(RecordingProposalGateway::default());
    let service = Arc::new(ProposalService::new(
        Arc::new(SeededPersonnelDirectory::default()),
        Arc::new(SeededAwardHistories::default()),
        Arc::new(SeededUnitDirectory::default()),
        gateway.clone(),
        RequirementTable::standard(),
    ));
    (service, gateway)
}

pub(crate) fn run_eligibility_check(args: EligibilityArgs) -> Result<(), AppError> {
    let EligibilityArgs {
        personnel_id,
        family,
        tier,
        as_of,
    } = args;

    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let (service, _gateway) = seeded_service();
    let assessment =
        service.check_eligibility(&PersonnelId(personnel_id.clone()), family, tier, as_of)?;

    println!(
        "Eligibility of {personnel_id} for {} {} as of {as_of}:",
        family.label(),
        tier.label()
    );
    if assessment.eligible {
        println!("  eligible");
    } else {
        println!("  not eligible: {}", assessment.reason_text());
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { as_of, year } = args;

    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let config = AppConfig::load()?;
    let year = year.or(config.proposals.year).unwrap_or_else(|| as_of.year());

    println!("Award proposal demo (year {year}, as of {as_of})");

    let (service, gateway) = seeded_service();

    println!("\nLong-service candidate sweep ({}):", MedalFamily::Hccsvv.label());
    for record in demo_roster() {
        let assessment = service.check_eligibility(
            &record.id,
            MedalFamily::Hccsvv,
            MedalTier::HangBa,
            as_of,
        )?;
        let verdict = if assessment.eligible {
            "eligible".to_string()
        } else {
            assessment.reason_text()
        };
        println!("  {} ({}): {verdict}", record.full_name, record.id.0);
    }

    println!("\nAssembling a nien-han proposal draft:");
    let draft_id = service.start_draft(ProposalType::NienHan, year);
    let senior = PersonnelId("qn-0003".to_string());
    let veteran = PersonnelId("qn-0001".to_string());
    service.add_personnel(&draft_id, senior.clone())?;
    service.add_personnel(&draft_id, veteran.clone())?;
    println!("  nominated {} and {}", senior.0, veteran.0);

    let mut assigned = 0usize;
    for (nominee, title) in [
        (&senior, TitleCode::HccsvvHangNhat),
        (&veteran, TitleCode::HccsvvHangBa),
    ] {
        match service.assign_title(&draft_id, &nominee.0, title, as_of)? {
            AssignmentOutcome::Applied { state } => {
                println!("  assigned {} to {} (draft now {state:?})", title.code(), nominee.0);
                assigned += 1;
            }
            AssignmentOutcome::TitleConflict { reason }
            | AssignmentOutcome::Ineligible { reason } => {
                println!("  assignment refused for {}: {reason}", nominee.0);
            }
        }
    }

    // A title from a second family, attempted against a draft that already
    // carries another nominee's HCCSVV title, trips the grouping rule.
    match service.assign_title(&draft_id, &senior.0, TitleCode::KncVsnxdQdndvn, as_of)? {
        AssignmentOutcome::Applied { .. } => {
            println!("  unexpected: cross-family title accepted");
        }
        AssignmentOutcome::TitleConflict { reason } => {
            println!("  grouping rule held: {reason}");
        }
        AssignmentOutcome::Ineligible { reason } => {
            println!("  assignment refused: {reason}");
        }
    }

    if assigned == 2 {
        let ctx = RequestContext::new("demo-manager", Role::Manager);
        let receipt = service.submit(&draft_id, &ctx)?;
        println!(
            "\nSubmitted {} with {} entries as proposal {}",
            draft_id.0, receipt.accepted_entries, receipt.proposal_id
        );
        println!("Gateway holds {} submission(s)", gateway.submissions().len());
    } else {
        println!("\nDraft {} left open; nothing to submit", draft_id.0);
    }

    Ok(())
}
