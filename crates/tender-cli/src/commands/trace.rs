//! Trace command implementation.
//!
//! Shows how one item's base amount becomes its commercial amount.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

use tender_core::cascade::{markup_coefficient, CascadeTrace, Stage};
use tender_core::{trace_cascade, CostItem, PricedItem};
use tender_ext_memory::TenderSnapshot;

use crate::cli::{Cli, OutputFormat};
use crate::commands::load_config;
use crate::error::CliError;
use crate::output::{
    format_money, format_pct, print_error, print_header, print_json, print_table, KeyValue,
};

/// Arguments for the trace command.
#[derive(Args, Debug)]
pub struct TraceArgs {
    /// Snapshot file (JSON)
    #[arg(short, long)]
    pub snapshot: PathBuf,

    /// Tender containing the item
    #[arg(short, long)]
    pub tender: String,

    /// Item to trace
    #[arg(short, long)]
    pub item: String,

    /// Reject items whose commercial amount exceeds this multiple of base
    #[arg(long)]
    pub sanity_factor: Option<Decimal>,
}

/// Whether the traced result would be accepted by a recalculation.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
enum TraceStatus {
    Ok,
    SanityCheckFailed,
}

/// One row of the stages table.
#[derive(Debug, Tabled)]
struct StageRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Stage")]
    stage: String,
    #[tabled(rename = "Pct")]
    pct: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TraceOutput<'a> {
    tender_id: &'a str,
    item_id: &'a str,
    coefficient: Decimal,
    status: TraceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    trace: &'a CascadeTrace,
}

/// Execute the trace command.
///
/// The stages are always shown. An item that fails the sanity check is
/// marked as such and the command exits with that error.
pub fn execute(args: &TraceArgs, cli: &Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(factor) = args.sanity_factor {
        config = config.with_sanity_factor(factor);
    }
    config.validate()?;

    let snapshot = TenderSnapshot::from_file(&args.snapshot)
        .with_context(|| format!("Failed to load snapshot {}", args.snapshot.display()))?;

    let tender = snapshot
        .tender(&args.tender.as_str().into())
        .ok_or_else(|| CliError::TenderNotFound(args.tender.clone()))?;
    let profile = tender
        .profile
        .as_ref()
        .ok_or_else(|| CliError::NoProfile(args.tender.clone()))?;
    let raw = tender
        .items
        .iter()
        .find(|i| i.id.as_str() == args.item)
        .ok_or_else(|| CliError::ItemNotFound {
            tender: args.tender.clone(),
            item: args.item.clone(),
        })?;

    let item = CostItem::try_from_raw(raw)?;
    let trace = trace_cascade(item.base_amount, item.category, profile)?;
    let coefficient = markup_coefficient(item.category, profile)?;
    let sanity = PricedItem::price(&item, profile)?.check_sanity(config.sanity_factor);
    let status = if sanity.is_ok() {
        TraceStatus::Ok
    } else {
        TraceStatus::SanityCheckFailed
    };

    match cli.format {
        OutputFormat::Json => print_json(&TraceOutput {
            tender_id: &args.tender,
            item_id: &args.item,
            coefficient,
            status,
            error: sanity.as_ref().err().map(ToString::to_string),
            trace: &trace,
        })?,
        OutputFormat::Table => {
            print_header(&format!("Item {} ({})", args.item, trace.category));
            let rows: Vec<StageRow> = trace
                .steps
                .iter()
                .enumerate()
                .map(|(i, step)| StageRow {
                    index: i + 1,
                    stage: describe(step.stage),
                    pct: format_pct(step.pct),
                    value: format_money(step.value),
                })
                .collect();
            print_table(&rows);
            print_table(&[
                KeyValue::money("Base", trace.base),
                KeyValue::money("Commercial", trace.result),
                KeyValue::new("Coefficient", coefficient.normalize().to_string()),
            ]);
            if let Err(e) = &sanity {
                print_error(&format!("Rejected by recalculation: {}", e));
            }
        }
    }

    sanity?;
    Ok(())
}

fn describe(stage: Stage) -> String {
    match stage {
        Stage::Compound(field) => field.to_string(),
        Stage::BaseDelta(field) => format!("{} (on base)", field),
    }
}
