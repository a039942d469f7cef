//! Integration tests for the recalculation orchestrator.
//!
//! Run against the in-memory store plus a few failing collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use tender_core::{MarkupProfile, PositionId, RawCostItem, TenderId};
use tender_engine::{
    EngineConfig, EngineError, IssueKind, PersistPolicy, RecalculationOrchestrator,
    RecalculationOrchestratorBuilder,
};
use tender_ext_memory::InMemoryStore;
use tender_traits::{CostItemSource, TotalsRecord, TotalsSink, TraitError};

// =============================================================================
// Helpers
// =============================================================================

fn works_profile() -> MarkupProfile {
    MarkupProfile::builder()
        .works_primary_markup_pct(dec!(20))
        .works_growth_pct(dec!(10))
        .contingency_pct(dec!(3))
        .overhead_own_forces_pct(dec!(50))
        .general_costs_ex_subcontract_pct(dec!(8))
        .profit_own_forces_pct(dec!(10))
        .build()
        .unwrap()
}

fn subcontract_profile() -> MarkupProfile {
    MarkupProfile::builder()
        .subcontract_works_growth_pct(dec!(10))
        .overhead_subcontract_pct(dec!(10))
        .profit_subcontract_pct(dec!(16))
        .build()
        .unwrap()
}

fn item(id: &str, position: &str, category: &str, base: Decimal) -> RawCostItem {
    RawCostItem::new(id, position, category, Some(base))
}

fn orchestrator(store: &Arc<InMemoryStore>, config: EngineConfig) -> RecalculationOrchestrator {
    RecalculationOrchestrator::new(store.clone(), store.clone(), store.clone(), config)
}

/// Sink that counts writes and always fails.
#[derive(Default)]
struct FailingSink {
    calls: AtomicUsize,
}

#[async_trait]
impl TotalsSink for FailingSink {
    async fn store(&self, _record: &TotalsRecord) -> Result<(), TraitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TraitError::DatabaseError("disk full".into()))
    }
}

/// Item source whose reads fail for one tender.
struct FlakySource {
    inner: Arc<InMemoryStore>,
    broken: TenderId,
}

#[async_trait]
impl CostItemSource for FlakySource {
    async fn cost_items(&self, tender_id: &TenderId) -> Result<Vec<RawCostItem>, TraitError> {
        if tender_id == &self.broken {
            return Err(TraitError::ConnectionFailed("reset by peer".into()));
        }
        self.inner.cost_items(tender_id).await
    }

    async fn tender_ids(&self) -> Result<Vec<TenderId>, TraitError> {
        self.inner.tender_ids().await
    }
}

/// Item source that notes when it was read, then stalls.
struct SlowSource {
    inner: Arc<InMemoryStore>,
    read_at: Mutex<Option<DateTime<Utc>>>,
}

#[async_trait]
impl CostItemSource for SlowSource {
    async fn cost_items(&self, tender_id: &TenderId) -> Result<Vec<RawCostItem>, TraitError> {
        *self.read_at.lock().unwrap() = Some(Utc::now());
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.inner.cost_items(tender_id).await
    }

    async fn tender_ids(&self) -> Result<Vec<TenderId>, TraitError> {
        self.inner.tender_ids().await
    }
}

// =============================================================================
// Concrete scenarios
// =============================================================================

#[tokio::test]
async fn test_works_scenario() {
    let store = Arc::new(InMemoryStore::new());
    let tender = TenderId::new("T-1");
    store.set_profile(tender.clone(), works_profile());
    store.put_items(tender.clone(), vec![item("I-1", "P-1", "work", dec!(1000000))]);

    let report = orchestrator(&store, EngineConfig::default())
        .recalculate(&tender)
        .await
        .unwrap();

    // 1,000,000 -> 1,200,000 -> 1,320,000; +30,000 contingency -> 1,350,000
    // -> 2,025,000 -> 2,187,000 -> 2,405,700
    assert!(report.complete);
    assert!(report.persisted);
    assert_eq!(report.item_results[0].commercial_amount, dec!(2405700));
    assert_eq!(report.position_totals[0].commercial_works, dec!(2405700));
    assert_eq!(report.position_totals[0].commercial_materials, Decimal::ZERO);
    assert_eq!(report.tender_totals.effective_markup_pct, dec!(140.57));

    let stored = store.totals(&tender).unwrap();
    assert_eq!(stored.tender_totals, report.tender_totals);
    assert_eq!(stored.computed_at, report.computed_at);
}

#[tokio::test]
async fn test_subcontract_works_scenario() {
    let store = Arc::new(InMemoryStore::new());
    let tender = TenderId::new("T-1");
    store.set_profile(tender.clone(), subcontract_profile());
    store.put_items(tender.clone(), vec![item("I-1", "P-1", "sub_work", dec!(500000))]);

    let report = orchestrator(&store, EngineConfig::default())
        .recalculate(&tender)
        .await
        .unwrap();

    assert_eq!(report.tender_totals.base_total, dec!(500000));
    assert_eq!(report.tender_totals.commercial_total, dec!(701800));
    assert_eq!(report.tender_totals.effective_markup_pct, dec!(40.36));
}

#[tokio::test]
async fn test_positions_split_materials_and_works() {
    let store = Arc::new(InMemoryStore::new());
    let tender = TenderId::new("T-1");
    store.set_profile(tender.clone(), subcontract_profile());
    store.put_items(
        tender.clone(),
        vec![
            item("I-1", "P-2", "sub_work", dec!(100)),
            item("I-2", "P-1", "sub_material", dec!(100)),
            item("I-3", "P-1", "work", dec!(100)),
            RawCostItem::new("I-4", "P-1", "material", None),
        ],
    );

    let report = orchestrator(&store, EngineConfig::default())
        .recalculate(&tender)
        .await
        .unwrap();

    assert!(report.complete);
    let ids: Vec<&PositionId> = report.position_totals.iter().map(|p| &p.position_id).collect();
    assert_eq!(ids, vec![&PositionId::new("P-1"), &PositionId::new("P-2")]);

    let p1 = &report.position_totals[0];
    assert_eq!(p1.base_materials, dec!(100));
    assert_eq!(p1.base_works, dec!(100));
    // sub_material: only the subcontract overhead and profit apply
    assert_eq!(p1.commercial_materials, dec!(127.6));
    // in-house work: no in-house percentage set
    assert_eq!(p1.commercial_works, dec!(100));

    let p2 = &report.position_totals[1];
    assert_eq!(p2.commercial_works, dec!(140.36));
    assert_eq!(report.tender_totals.commercial_total, dec!(367.96));
}

// =============================================================================
// Idempotence and isolation
// =============================================================================

#[tokio::test]
async fn test_recalculation_is_idempotent() {
    let store = Arc::new(InMemoryStore::new());
    let tender = TenderId::new("T-1");
    store.set_profile(tender.clone(), works_profile());
    store.put_items(
        tender.clone(),
        vec![
            item("I-1", "P-1", "work", dec!(1234.56)),
            item("I-2", "P-1", "material", dec!(789.01)),
            item("I-3", "P-2", "sub_work", dec!(42)),
        ],
    );
    let engine = orchestrator(&store, EngineConfig::default());

    let first = engine.recalculate(&tender).await.unwrap();
    let second = engine.recalculate(&tender).await.unwrap();

    assert!(first.same_figures(&second));
    assert_ne!(first.run_id, second.run_id);
    assert_eq!(store.totals(&tender).unwrap().tender_totals, second.tender_totals);
}

#[tokio::test]
async fn test_new_profile_reprices_everything() {
    let store = Arc::new(InMemoryStore::new());
    let tender = TenderId::new("T-1");
    store.set_profile(tender.clone(), MarkupProfile::zero());
    store.put_items(tender.clone(), vec![item("I-1", "P-1", "sub_work", dec!(500000))]);
    let engine = orchestrator(&store, EngineConfig::default());

    let before = engine.recalculate(&tender).await.unwrap();
    assert_eq!(before.tender_totals.commercial_total, dec!(500000));

    store.set_profile(tender.clone(), subcontract_profile());
    let after = engine.recalculate(&tender).await.unwrap();
    assert_eq!(after.tender_totals.commercial_total, dec!(701800));
    assert_eq!(
        store.totals(&tender).unwrap().tender_totals.commercial_total,
        dec!(701800)
    );
}

#[tokio::test]
async fn test_tenders_are_independent() {
    let store = Arc::new(InMemoryStore::new());
    store.set_profile("T-1".into(), works_profile());
    store.set_profile("T-2".into(), subcontract_profile());
    store.put_items("T-1".into(), vec![item("I-1", "P-1", "work", dec!(1000000))]);
    store.put_items("T-2".into(), vec![item("I-1", "P-1", "work", dec!(1000000))]);
    let engine = orchestrator(&store, EngineConfig::default());

    let t1 = engine.recalculate(&"T-1".into()).await.unwrap();
    let t2 = engine.recalculate(&"T-2".into()).await.unwrap();

    assert_eq!(t1.tender_totals.commercial_total, dec!(2405700));
    assert_eq!(t2.tender_totals.commercial_total, dec!(1000000));
}

// =============================================================================
// Failure handling
// =============================================================================

#[tokio::test]
async fn test_missing_profile_aborts_without_persisting() {
    let store = Arc::new(InMemoryStore::new());
    let tender = TenderId::new("T-1");
    store.put_items(tender.clone(), vec![item("I-1", "P-1", "work", dec!(100))]);

    let err = orchestrator(&store, EngineConfig::default())
        .recalculate(&tender)
        .await
        .unwrap_err();

    assert!(err.is_configuration_missing());
    assert!(matches!(err, EngineError::ConfigurationMissing { tender_id } if tender_id == tender));
    assert!(store.totals(&tender).is_none());
}

#[tokio::test]
async fn test_invalid_items_are_reported() {
    let store = Arc::new(InMemoryStore::new());
    let tender = TenderId::new("T-1");
    store.set_profile(tender.clone(), subcontract_profile());
    store.put_items(
        tender.clone(),
        vec![
            item("I-1", "P-1", "sub_work", dec!(500000)),
            item("I-2", "P-1", "equipment", dec!(10)),
            item("I-3", "P-1", "work", dec!(-5)),
        ],
    );

    let report = orchestrator(&store, EngineConfig::default())
        .recalculate(&tender)
        .await
        .unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.issues_of(IssueKind::InvalidInput).count(), 2);
    assert!(report.issues[0].message.contains("equipment"));
    assert!(report.issues[1].message.contains("negative"));
    assert_eq!(report.tender_totals.commercial_total, dec!(701800));
    // default policy keeps incomplete results out of storage
    assert!(!report.persisted);
    assert!(store.totals(&tender).is_none());
}

#[tokio::test]
async fn test_sanity_check_failure() {
    let store = Arc::new(InMemoryStore::new());
    let tender = TenderId::new("T-1");
    store.set_profile(
        tender.clone(),
        MarkupProfile::builder()
            .materials_growth_pct(dec!(200))
            .overhead_own_forces_pct(dec!(200))
            .profit_own_forces_pct(dec!(500))
            .build()
            .unwrap(),
    );
    store.put_items(tender.clone(), vec![item("I-1", "P-1", "material", dec!(1000))]);

    let report = orchestrator(&store, EngineConfig::default())
        .recalculate(&tender)
        .await
        .unwrap();

    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].kind, IssueKind::SanityCheckFailed);
    assert_eq!(report.issues[0].item_id.as_str(), "I-1");
    assert!(report.item_results.is_empty());
    assert_eq!(report.tender_totals.base_total, Decimal::ZERO);
}

#[tokio::test]
async fn test_persist_always_stores_partial_results() {
    let store = Arc::new(InMemoryStore::new());
    let tender = TenderId::new("T-1");
    store.set_profile(tender.clone(), MarkupProfile::zero());
    store.put_items(
        tender.clone(),
        vec![item("I-1", "P-1", "work", dec!(10)), item("I-2", "P-1", "??", dec!(10))],
    );

    let config = EngineConfig::default().with_persist_policy(PersistPolicy::Always);
    let report = orchestrator(&store, config).recalculate(&tender).await.unwrap();

    assert!(!report.complete);
    assert!(report.persisted);
    assert_eq!(store.totals(&tender).unwrap().tender_totals.base_total, dec!(10));
}

#[tokio::test]
async fn test_persist_never() {
    let store = Arc::new(InMemoryStore::new());
    let tender = TenderId::new("T-1");
    store.set_profile(tender.clone(), MarkupProfile::zero());
    store.put_items(tender.clone(), vec![item("I-1", "P-1", "work", dec!(10))]);

    let config = EngineConfig::default().with_persist_policy(PersistPolicy::Never);
    let report = orchestrator(&store, config).recalculate(&tender).await.unwrap();

    assert!(report.complete);
    assert!(!report.persisted);
    assert!(store.totals(&tender).is_none());
}

#[tokio::test]
async fn test_sink_failure_is_reported() {
    let store = Arc::new(InMemoryStore::new());
    let sink = Arc::new(FailingSink::default());
    let tender = TenderId::new("T-1");
    store.set_profile(tender.clone(), MarkupProfile::zero());
    store.put_items(tender.clone(), vec![item("I-1", "P-1", "work", dec!(10))]);

    let engine = RecalculationOrchestrator::new(
        store.clone(),
        store.clone(),
        sink.clone(),
        EngineConfig::default(),
    );
    let err = engine.recalculate(&tender).await.unwrap_err();

    assert!(matches!(err, EngineError::Sink(TraitError::DatabaseError(_))));
    assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_profile_never_reaches_sink() {
    let store = Arc::new(InMemoryStore::new());
    let sink = Arc::new(FailingSink::default());

    let engine = RecalculationOrchestrator::new(
        store.clone(),
        store.clone(),
        sink.clone(),
        EngineConfig::default(),
    );
    assert!(engine.recalculate(&"T-1".into()).await.is_err());
    assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Batch
// =============================================================================

#[tokio::test]
async fn test_recalculate_all_continues_past_failures() {
    let store = Arc::new(InMemoryStore::new());
    store.set_profile("T-1".into(), subcontract_profile());
    store.put_items("T-1".into(), vec![item("I-1", "P-1", "sub_work", dec!(500000))]);
    // T-2 has items but no profile
    store.put_items("T-2".into(), vec![item("I-1", "P-1", "work", dec!(1))]);
    store.set_profile("T-3".into(), MarkupProfile::zero());
    store.put_items("T-3".into(), vec![item("I-1", "P-1", "work", dec!(7))]);

    let batch = orchestrator(&store, EngineConfig::default())
        .recalculate_all()
        .await
        .unwrap();

    assert_eq!(batch.succeeded, 2);
    assert_eq!(batch.failed, 1);
    let order: Vec<&str> = batch.outcomes.iter().map(|o| o.tender_id.as_str()).collect();
    assert_eq!(order, vec!["T-1", "T-2", "T-3"]);

    let failures: Vec<_> = batch.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0.as_str(), "T-2");
    assert!(failures[0].1.is_configuration_missing());

    assert_eq!(batch.reports().count(), 2);
    assert!(store.totals(&"T-1".into()).is_some());
    assert!(store.totals(&"T-3".into()).is_some());
}

#[tokio::test]
async fn test_recalculate_all_reports_source_errors_per_tender() {
    let store = Arc::new(InMemoryStore::new());
    store.set_profile("T-1".into(), MarkupProfile::zero());
    store.set_profile("T-2".into(), MarkupProfile::zero());
    store.put_items("T-1".into(), vec![item("I-1", "P-1", "work", dec!(1))]);
    store.put_items("T-2".into(), vec![item("I-1", "P-1", "work", dec!(1))]);

    let source = Arc::new(FlakySource {
        inner: store.clone(),
        broken: "T-1".into(),
    });
    let engine = RecalculationOrchestratorBuilder::new()
        .with_items(source)
        .with_profiles(store.clone())
        .with_sink(store.clone())
        .build()
        .unwrap();

    let batch = engine.recalculate_all().await.unwrap();
    assert_eq!(batch.succeeded, 1);
    assert!(matches!(
        batch.outcomes[0].result,
        Err(EngineError::Source(TraitError::ConnectionFailed(_)))
    ));
}

#[tokio::test]
async fn test_result_is_stamped_when_inputs_are_read() {
    let store = Arc::new(InMemoryStore::new());
    let tender = TenderId::new("T-1");
    store.set_profile(tender.clone(), MarkupProfile::zero());
    store.put_items(tender.clone(), vec![item("I-1", "P-1", "work", dec!(10))]);

    let source = Arc::new(SlowSource {
        inner: store.clone(),
        read_at: Mutex::new(None),
    });
    let engine = RecalculationOrchestratorBuilder::new()
        .with_items(source.clone())
        .with_profiles(store.clone())
        .with_sink(store.clone())
        .build()
        .unwrap();

    let report = engine.recalculate(&tender).await.unwrap();
    let items_read_at = source.read_at.lock().unwrap().unwrap();

    // Pricing finishes well after the items were read; the stamp predates both.
    assert!(report.computed_at <= items_read_at);
    assert_eq!(store.totals(&tender).unwrap().computed_at, report.computed_at);
}

// =============================================================================
// Builder
// =============================================================================

#[test]
fn test_builder_requires_collaborators() {
    let err = RecalculationOrchestratorBuilder::new().build().err().unwrap();
    assert!(matches!(err, EngineError::ConfigError(_)));
}

#[test]
fn test_builder_validates_config() {
    let store = Arc::new(InMemoryStore::new());
    let result = RecalculationOrchestratorBuilder::new()
        .with_config(EngineConfig::default().with_sanity_factor(Decimal::ZERO))
        .with_items(store.clone())
        .with_profiles(store.clone())
        .with_sink(store)
        .build();
    assert!(matches!(result, Err(EngineError::ConfigError(_))));
}
