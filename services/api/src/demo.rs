use crate::infra::InMemoryApplicantRepository;
use chrono::{Duration, Utc};
use clap::Args;
use recruit_portal::config::PortalConfig;
use recruit_portal::error::AppError;
use recruit_portal::workflows::recruitment::applicants::{
    AnswerBundle, ApplicantProfile, ApplicantRecord, DynamicField, PortalService, ReviewStatus,
    Reviewer,
};
use recruit_portal::workflows::recruitment::{
    DepartmentRegistry, ListingQuery, SortKey, StatisticsReport,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct StatsArgs {
    /// JSON file holding an array of applicant records
    #[arg(long)]
    pub(crate) records: PathBuf,
    /// Restrict the report to one department (aliases accepted)
    #[arg(long)]
    pub(crate) department: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Rows per listing page (defaults to the configured page size)
    #[arg(long)]
    pub(crate) page_size: Option<usize>,
    /// Show the listing as the lead of this department would see it
    #[arg(long)]
    pub(crate) lead: Option<String>,
}

pub(crate) fn run_stats(args: StatsArgs) -> Result<(), AppError> {
    let StatsArgs {
        records,
        department,
    } = args;

    let raw = std::fs::read_to_string(&records)?;
    let records: Vec<ApplicantRecord> = serde_json::from_str(&raw)?;
    let registry = DepartmentRegistry::standard();
    let scope = department.map(|raw| registry.normalize(&raw));

    let report = StatisticsReport::build(&registry, &records, scope.as_ref());
    render_statistics(&report);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { page_size, lead } = args;

    let mut config = PortalConfig::default();
    if let Some(page_size) = page_size {
        config.page_size = page_size.max(1);
    }

    let registry = Arc::new(DepartmentRegistry::standard());
    let repository = Arc::new(InMemoryApplicantRepository::default());
    let service = PortalService::new(repository, registry.clone(), config);

    println!("Recruitment portal demo");
    let start = Utc::now();
    let applicants = [
        ("Asha Menon", &["ai-ml", "dev"][..], true),
        ("Bilal Khan", &["design"][..], true),
        ("Chen Li", &["socialMedia", "pr"][..], true),
        ("Dana Ortiz", &["dev"][..], false),
        ("Eitan Cohen", &[][..], false),
    ];

    let mut seeded = Vec::new();
    for (offset, (name, departments, submit)) in applicants.into_iter().enumerate() {
        let now = start + Duration::minutes(offset as i64);
        let email = name.to_lowercase().replace(' ', ".");
        let record = service.register(
            ApplicantProfile {
                name: Some(name.to_string()),
                email: Some(format!("{email}@campus.example")),
                registration_number: Some(format!("23BCE{:04}", 1000 + offset)),
                phone: None,
            },
            now,
        )?;
        service.select_departments(&record.id, departments)?;
        for department in departments {
            service.save_answers(&record.id, department, demo_answers(name, department))?;
        }

        let progress = service.progress(&record.id)?;
        println!(
            "- {} ({}) selected [{}] -> {}% complete",
            name,
            record.id.0,
            progress
                .selected
                .iter()
                .map(|code| code.label())
                .collect::<Vec<_>>()
                .join(", "),
            progress.percent
        );

        if submit {
            service.submit(&record.id, now + Duration::minutes(30))?;
        }
        seeded.push(record.id);
    }

    let decisions = [
        (0, "ai-ml", ReviewStatus::Approved, Some("Strong ML portfolio")),
        (0, "dev", ReviewStatus::Rejected, None),
        (1, "design", ReviewStatus::Rejected, Some("Needs more visual work")),
    ];
    for (index, department, status, feedback) in decisions {
        let reviewer = Reviewer::DepartmentLead(registry.normalize(department));
        let review_time = start + Duration::hours(2);
        service.review(
            &reviewer,
            &seeded[index],
            department,
            status,
            feedback.map(str::to_string),
            review_time,
        )?;
    }

    let scope = lead.map(|raw| registry.normalize(&raw));
    let report = service.statistics(scope.as_ref())?;
    println!();
    render_statistics(&report);

    let query = ListingQuery {
        scope,
        sort: SortKey::Name,
        ..ListingQuery::default()
    };
    let page = service.listing(&query)?;
    println!(
        "\nApplicants (page {} of {}, {} matching)",
        page.page, page.total_pages, page.total_items
    );
    for row in &page.items {
        let submitted = if row.submitted {
            "submitted"
        } else {
            "in progress"
        };
        println!(
            "  - {:<12} {:<28} {:<11} {:>3}% {}",
            row.name, row.email, submitted, row.progress_percent, row.status_label
        );
    }

    Ok(())
}

fn demo_answers(name: &str, department: &str) -> AnswerBundle {
    AnswerBundle {
        dynamic_fields: [(
            "motivation".to_string(),
            DynamicField {
                value: json!(format!("{name} wants to join {department}")),
                label: Some("Why this department?".to_string()),
            },
        )]
        .into_iter()
        .collect(),
        fields: Default::default(),
    }
}

fn render_statistics(report: &StatisticsReport) {
    match &report.scope {
        Some(scope) => println!("Statistics for {}", scope.label()),
        None => println!("Statistics for all departments"),
    }
    let overall = &report.overall;
    println!(
        "- {} applicants | {} submitted | {} not submitted",
        overall.total, overall.submitted, overall.not_submitted
    );
    println!(
        "- {} pending | {} approved | {} rejected",
        overall.pending, overall.approved, overall.rejected
    );

    println!("By department:");
    for row in &report.departments {
        let marker = if row.known { "" } else { " (unrecognized)" };
        println!(
            "  - {}{}: {} applicants | {} submitted | {} pending | {} approved | {} rejected",
            row.label,
            marker,
            row.stats.total,
            row.stats.submitted,
            row.stats.pending,
            row.stats.approved,
            row.stats.rejected
        );
    }
}
