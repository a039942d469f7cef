//! Recalc command implementation.
//!
//! Loads a snapshot into memory and recomputes one or all tenders.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

use tender_core::TenderId;
use tender_engine::{BatchOutcome, RecalculationOrchestratorBuilder, RecalculationReport};
use tender_ext_memory::InMemoryStore;

use crate::cli::{Cli, OutputFormat};
use crate::commands::load_config;
use crate::error::CliError;
use crate::output::{
    format_money, print_error, print_header, print_json, print_table, print_warning, KeyValue,
};

/// Arguments for the recalc command.
#[derive(Args, Debug)]
pub struct RecalcArgs {
    /// Snapshot file (JSON)
    #[arg(short, long)]
    pub snapshot: PathBuf,

    /// Only recalculate this tender
    #[arg(short, long)]
    pub tender: Option<String>,

    /// Reject items whose commercial amount exceeds this multiple of base
    #[arg(long)]
    pub sanity_factor: Option<Decimal>,
}

/// One row of the positions table.
#[derive(Debug, Tabled)]
struct PositionRow {
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Base materials")]
    base_materials: String,
    #[tabled(rename = "Base works")]
    base_works: String,
    #[tabled(rename = "Comm. materials")]
    commercial_materials: String,
    #[tabled(rename = "Comm. works")]
    commercial_works: String,
    #[tabled(rename = "Comm. total")]
    commercial_total: String,
}

/// One row of the issues table.
#[derive(Debug, Tabled)]
struct IssueRow {
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Detail")]
    message: String,
}

/// JSON shape of one tender's outcome.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TenderOutput<'a> {
    tender_id: &'a TenderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a RecalculationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute the recalc command.
pub async fn execute(args: &RecalcArgs, cli: &Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(factor) = args.sanity_factor {
        config = config.with_sanity_factor(factor);
    }

    let store = Arc::new(
        InMemoryStore::load_snapshot_file(&args.snapshot)
            .with_context(|| format!("Failed to load snapshot {}", args.snapshot.display()))?,
    );

    let engine = RecalculationOrchestratorBuilder::new()
        .with_config(config)
        .with_items(store.clone())
        .with_profiles(store.clone())
        .with_sink(store)
        .build()?;

    let outcomes = match &args.tender {
        Some(id) => {
            let tender_id = TenderId::new(id.as_str());
            let result = engine.recalculate(&tender_id).await;
            vec![BatchOutcome { tender_id, result }]
        }
        None => engine.recalculate_all().await?.outcomes,
    };

    match cli.format {
        OutputFormat::Table => print_outcomes(&outcomes),
        OutputFormat::Json => {
            let rows: Vec<TenderOutput<'_>> = outcomes
                .iter()
                .map(|o| TenderOutput {
                    tender_id: &o.tender_id,
                    report: o.result.as_ref().ok(),
                    error: o.result.as_ref().err().map(ToString::to_string),
                })
                .collect();
            print_json(&rows)?;
        }
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        return Err(CliError::BatchFailed {
            failed,
            total: outcomes.len(),
        }
        .into());
    }

    Ok(())
}

fn print_outcomes(outcomes: &[BatchOutcome]) {
    if outcomes.is_empty() {
        println!("No tenders in snapshot.");
    }

    for outcome in outcomes {
        match &outcome.result {
            Ok(report) => print_report(report),
            Err(e) => {
                print_header(&format!("Tender {}", outcome.tender_id));
                print_error(&e.to_string());
            }
        }
    }
}

fn print_report(report: &RecalculationReport) {
    let totals = &report.tender_totals;
    print_header(&format!("Tender {}", report.tender_id));

    print_table(&[
        KeyValue::money("Base total", totals.base_total),
        KeyValue::money("Commercial total", totals.commercial_total),
        KeyValue::pct("Effective markup", totals.effective_markup_pct),
        KeyValue::new("Items priced", report.item_results.len().to_string()),
        KeyValue::new("Items rejected", report.issues.len().to_string()),
    ]);

    let positions: Vec<PositionRow> = report
        .position_totals
        .iter()
        .map(|p| PositionRow {
            position: p.position_id.to_string(),
            base_materials: format_money(p.base_materials),
            base_works: format_money(p.base_works),
            commercial_materials: format_money(p.commercial_materials),
            commercial_works: format_money(p.commercial_works),
            commercial_total: format_money(p.commercial_total()),
        })
        .collect();
    print_header("Positions");
    print_table(&positions);

    if !report.issues.is_empty() {
        print_warning(&format!(
            "{} item(s) rejected; totals exclude them",
            report.issues.len()
        ));
        let issues: Vec<IssueRow> = report
            .issues
            .iter()
            .map(|i| IssueRow {
                item: i.item_id.to_string(),
                position: i.position_id.to_string(),
                kind: i.kind.to_string(),
                message: i.message.clone(),
            })
            .collect();
        print_header("Rejected items");
        print_table(&issues);
    }

    if !report.complete && !report.persisted {
        print_warning("Totals not persisted: result incomplete");
    }
}
