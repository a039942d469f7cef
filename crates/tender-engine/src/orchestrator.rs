//! Recalculation entry point.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use tender_core::{CostItem, MarkupProfile, PricedItem, RawCostItem, TenderId, TenderResult};
use tender_rollup::{maybe_parallel_map, PositionAggregator, TenderRollupAggregator};
use tender_traits::{CostItemSource, MarkupProfileSource, TotalsSink};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::report::{BatchOutcome, BatchRecalculation, ItemIssue, RecalculationReport};

/// Recomputes every commercial amount and total of a tender from base amounts.
///
/// Collaborators are injected; the orchestrator itself holds no mutable state,
/// so one instance can serve concurrent calls.
pub struct RecalculationOrchestrator {
    items: Arc<dyn CostItemSource>,
    profiles: Arc<dyn MarkupProfileSource>,
    sink: Arc<dyn TotalsSink>,
    config: EngineConfig,
}

impl RecalculationOrchestrator {
    /// Creates an orchestrator.
    pub fn new(
        items: Arc<dyn CostItemSource>,
        profiles: Arc<dyn MarkupProfileSource>,
        sink: Arc<dyn TotalsSink>,
        config: EngineConfig,
    ) -> Self {
        Self {
            items,
            profiles,
            sink,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Recalculates one tender and persists the result according to the
    /// configured [`PersistPolicy`](crate::PersistPolicy).
    ///
    /// Fails without touching the sink when the tender has no active profile
    /// or a collaborator errors. Items that cannot be priced are reported in
    /// the returned report and left out of the totals.
    pub async fn recalculate(
        &self,
        tender_id: &TenderId,
    ) -> Result<RecalculationReport, EngineError> {
        info!(engine = %self.config.name, tender_id = %tender_id, "Recalculating tender");

        // Taken before the profile read; sinks order results by it.
        let read_at = Utc::now();
        let profile = self
            .profiles
            .active_profile(tender_id)
            .await
            .map_err(EngineError::Source)?
            .ok_or_else(|| {
                warn!(tender_id = %tender_id, "No active markup profile");
                EngineError::ConfigurationMissing {
                    tender_id: tender_id.clone(),
                }
            })?;

        let items = self
            .items
            .cost_items(tender_id)
            .await
            .map_err(EngineError::Source)?;
        debug!(tender_id = %tender_id, items = items.len(), "Loaded cost items");

        let mut report =
            recalculate_snapshot_at(&self.config, tender_id, &profile, &items, read_at)?;

        if self.config.persist_policy.allows(report.complete) {
            self.sink
                .store(&report.to_record())
                .await
                .map_err(EngineError::Sink)?;
            report.persisted = true;
        } else {
            debug!(
                tender_id = %tender_id,
                policy = ?self.config.persist_policy,
                complete = report.complete,
                "Not persisting totals"
            );
        }

        info!(
            run_id = %report.run_id,
            tender_id = %tender_id,
            base_total = %report.tender_totals.base_total,
            commercial_total = %report.tender_totals.commercial_total,
            issues = report.issues.len(),
            persisted = report.persisted,
            "Recalculation finished"
        );

        Ok(report)
    }

    /// Computes a report from data already in memory, without collaborators.
    pub fn recalculate_snapshot(
        &self,
        tender_id: &TenderId,
        profile: &MarkupProfile,
        items: &[RawCostItem],
    ) -> Result<RecalculationReport, EngineError> {
        recalculate_snapshot(&self.config, tender_id, profile, items)
    }

    /// Recalculates every tender the item source knows about.
    ///
    /// A failing tender does not stop the batch. Only a failure to list the
    /// tenders is returned as an error.
    pub async fn recalculate_all(&self) -> Result<BatchRecalculation, EngineError> {
        let start = Instant::now();
        let tender_ids = self.items.tender_ids().await.map_err(EngineError::Source)?;
        info!(tenders = tender_ids.len(), "Starting batch recalculation");

        let mut outcomes = Vec::with_capacity(tender_ids.len());
        let mut succeeded = 0;
        let mut failed = 0;

        for tender_id in tender_ids {
            let result = self.recalculate(&tender_id).await;
            match &result {
                Ok(_) => succeeded += 1,
                Err(e) => {
                    failed += 1;
                    warn!(tender_id = %tender_id, error = %e, "Tender recalculation failed");
                }
            }
            outcomes.push(BatchOutcome { tender_id, result });
        }

        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(succeeded, failed, elapsed_ms, "Batch recalculation finished");

        Ok(BatchRecalculation {
            outcomes,
            succeeded,
            failed,
            elapsed_ms,
        })
    }
}

/// Prices every item of a tender and rolls the accepted ones up.
///
/// This is the whole calculation; [`RecalculationOrchestrator::recalculate`]
/// only adds loading and persistence around it. The report is stamped with
/// the current time.
pub fn recalculate_snapshot(
    config: &EngineConfig,
    tender_id: &TenderId,
    profile: &MarkupProfile,
    items: &[RawCostItem],
) -> Result<RecalculationReport, EngineError> {
    recalculate_snapshot_at(config, tender_id, profile, items, Utc::now())
}

/// Like [`recalculate_snapshot`], stamping the report with `computed_at`.
///
/// `computed_at` should be taken no later than the moment the profile was
/// read, since sinks order results by it.
pub fn recalculate_snapshot_at(
    config: &EngineConfig,
    tender_id: &TenderId,
    profile: &MarkupProfile,
    items: &[RawCostItem],
    computed_at: DateTime<Utc>,
) -> Result<RecalculationReport, EngineError> {
    let run_id = Uuid::new_v4();

    for (field, value) in profile.suspicious_fields(config.suspicious_pct) {
        warn!(
            tender_id = %tender_id,
            field = field.name(),
            value = %value,
            threshold = %config.suspicious_pct,
            "Suspicious markup percentage"
        );
    }

    let results = maybe_parallel_map(items, &config.rollup, |raw| {
        price_raw(raw, profile, config)
    });

    let mut item_results = Vec::with_capacity(items.len());
    let mut issues = Vec::new();
    for (raw, result) in items.iter().zip(results) {
        match result {
            Ok(priced) => item_results.push(priced),
            Err(error) => {
                let issue = ItemIssue::from_error(raw.id.clone(), raw.position_id.clone(), &error);
                warn!(
                    tender_id = %tender_id,
                    item_id = %raw.id,
                    kind = %issue.kind,
                    error = %error,
                    "Item rejected"
                );
                issues.push(issue);
            }
        }
    }

    let position_totals =
        PositionAggregator::new(config.rollup.clone()).aggregate_priced(&item_results)?;
    let tender_totals = TenderRollupAggregator::aggregate(tender_id, &position_totals)?;

    debug!(
        run_id = %run_id,
        tender_id = %tender_id,
        priced = item_results.len(),
        rejected = issues.len(),
        positions = position_totals.len(),
        "Tender computed"
    );

    Ok(RecalculationReport {
        run_id,
        tender_id: tender_id.clone(),
        computed_at,
        item_results,
        position_totals,
        tender_totals,
        complete: issues.is_empty(),
        issues,
        persisted: false,
    })
}

fn price_raw(
    raw: &RawCostItem,
    profile: &MarkupProfile,
    config: &EngineConfig,
) -> TenderResult<PricedItem> {
    let item = CostItem::try_from_raw(raw)?;
    let priced = PricedItem::price(&item, profile)?;
    priced.check_sanity(config.sanity_factor)?;
    Ok(priced)
}
