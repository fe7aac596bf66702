//! End-to-end session flows through the station's command port.

use feedmix::app::commands::AppCommand;
use feedmix::app::events::AppEvent;
use feedmix::app::ports::CommandHandler;
use feedmix::app::replies::{AppReply, SessionStatus, StopResult, UsageOutcome};
use feedmix::error::{ConflictError, Error, ValidationError};
use feedmix::ledger::{LEDGER_KEY, LEDGER_NAMESPACE, LedgerDocument};
use feedmix::recipe::Recipe;

use crate::mock_hw::{MemoryStore, TestStation, mix1, station, stepping};

// ── Helpers ───────────────────────────────────────────────────

fn start(st: &TestStation, recipe: Recipe, total_weight: f64) -> Result<AppReply, Error> {
    st.dispatch(AppCommand::Start {
        recipe: Some(recipe),
        total_weight,
    })
}

fn create(st: &TestStation, recipe: Recipe) {
    st.dispatch(AppCommand::CreateRecipe { recipe }).unwrap();
}

fn read(st: &TestStation) -> f64 {
    match st.dispatch(AppCommand::Weight).unwrap() {
        AppReply::Weight(w) => w.value,
        other => panic!("expected weight, got {other:?}"),
    }
}

fn stop(st: &TestStation) -> StopResult {
    match st.dispatch(AppCommand::Stop).unwrap() {
        AppReply::Stopped(r) => r,
        other => panic!("expected stop result, got {other:?}"),
    }
}

fn status(st: &TestStation) -> SessionStatus {
    match st.dispatch(AppCommand::Status).unwrap() {
        AppReply::Status(s) => s,
        other => panic!("expected status, got {other:?}"),
    }
}

fn ledger(store: &MemoryStore) -> LedgerDocument {
    let bytes = store.raw(LEDGER_NAMESPACE, LEDGER_KEY).expect("ledger written");
    serde_json::from_slice(&bytes).unwrap()
}

// ── Tests ─────────────────────────────────────────────────────

#[test]
fn mix1_to_eighty_percent_attributes_usage() {
    let store = MemoryStore::new();
    let st = station(stepping(20.0), store.clone());
    create(&st, mix1());

    start(&st, mix1(), 100.0).unwrap();
    let readings: Vec<f64> = (0..4).map(|_| read(&st)).collect();
    assert_eq!(readings, vec![20.0, 40.0, 60.0, 80.0]);

    let result = stop(&st);
    assert_eq!(result.completion_percentage, 80.0);
    assert_eq!(result.final_weight, 80.0);
    assert_eq!(result.usage, UsageOutcome::Recorded);

    let doc = ledger(&store);
    assert_eq!(doc.total_usage["corn"].total_kg, 48.0);
    assert_eq!(doc.total_usage["alfalfa"].total_kg, 32.0);
    assert_eq!(doc.month("2026-10").unwrap()["corn"].total_kg, 48.0);
}

#[test]
fn immediate_stop_records_zero_but_counts_session() {
    let store = MemoryStore::new();
    let st = station(stepping(20.0), store.clone());
    create(&st, mix1());

    start(&st, mix1(), 50.0).unwrap();
    let result = stop(&st);
    assert_eq!(result.completion_percentage, 0.0);
    assert_eq!(result.final_weight, 0.0);

    let doc = ledger(&store);
    assert_eq!(doc.total_usage["corn"].total_kg, 0.0);
    assert_eq!(doc.total_usage["corn"].total_sessions, 1);
    assert_eq!(doc.total_usage["alfalfa"].total_sessions, 1);
}

#[test]
fn deleted_recipe_closes_session_without_ledger_update() {
    let store = MemoryStore::new();
    let st = station(stepping(20.0), store.clone());
    create(&st, mix1());

    start(&st, mix1(), 100.0).unwrap();
    read(&st);
    st.dispatch(AppCommand::DeleteRecipe {
        name: "Mix1".into(),
    })
    .unwrap();

    let result = stop(&st);
    assert_eq!(result.usage, UsageOutcome::RecipeMissing);
    assert_eq!(result.completion_percentage, 20.0);
    assert!(store.raw(LEDGER_NAMESPACE, LEDGER_KEY).is_none());
    assert!(!status(&st).in_progress);
}

#[test]
fn ledger_write_failure_still_closes_session() {
    let store = MemoryStore::new();
    let st = station(stepping(20.0), store.clone());
    create(&st, mix1());

    start(&st, mix1(), 100.0).unwrap();
    read(&st);
    store.fail_writes(true);

    let result = stop(&st);
    assert!(matches!(result.usage, UsageOutcome::Failed { .. }));
    assert_eq!(status(&st), SessionStatus::idle());
    st.with_motors(|m| assert!(!m.any_on()));
}

#[test]
fn second_start_conflicts_and_keeps_first_session() {
    let st = station(stepping(20.0), MemoryStore::new());
    start(&st, mix1(), 100.0).unwrap();

    let other = Recipe::new("Other", [("corn", 100.0)]);
    let err = start(&st, other, 30.0).unwrap_err();
    assert_eq!(err, Error::Conflict(ConflictError::SessionInProgress));

    let s = status(&st);
    assert_eq!(s.recipe_id.as_deref(), Some("Mix1"));
    assert_eq!(s.total_weight_target, 100.0);
}

#[test]
fn stop_and_weight_while_idle_conflict() {
    let st = station(stepping(20.0), MemoryStore::new());
    assert_eq!(
        st.dispatch(AppCommand::Stop).unwrap_err(),
        Error::Conflict(ConflictError::NoSessionInProgress)
    );
    assert_eq!(
        st.dispatch(AppCommand::Weight).unwrap_err(),
        Error::Conflict(ConflictError::NoSessionInProgress)
    );
}

#[test]
fn start_validation_rejects_missing_recipe_and_bad_target() {
    let st = station(stepping(20.0), MemoryStore::new());

    let err = st
        .dispatch(AppCommand::Start {
            recipe: None,
            total_weight: 100.0,
        })
        .unwrap_err();
    assert_eq!(err, Error::Validation(ValidationError::MissingRecipe));

    let err = start(&st, mix1(), -5.0).unwrap_err();
    assert_eq!(err, Error::Validation(ValidationError::NonPositiveTarget(-5.0)));

    let empty = Recipe::new("Empty", Vec::<(&str, f64)>::new());
    let err = start(&st, empty, 100.0).unwrap_err();
    assert_eq!(err, Error::Validation(ValidationError::NoIngredients));

    assert!(!status(&st).in_progress);
}

#[test]
fn readings_clamp_at_target_and_next_session_restarts_at_zero() {
    let st = station(stepping(30.0), MemoryStore::new());
    start(&st, mix1(), 70.0).unwrap();
    let readings: Vec<f64> = (0..5).map(|_| read(&st)).collect();
    assert_eq!(readings, vec![30.0, 60.0, 70.0, 70.0, 70.0]);
    assert!(status(&st).target_reached);
    stop(&st);

    start(&st, mix1(), 70.0).unwrap();
    assert_eq!(read(&st), 30.0);
}

#[test]
fn status_reports_idle_defaults_and_live_session() {
    let st = station(stepping(20.0), MemoryStore::new());
    assert_eq!(status(&st), SessionStatus::idle());

    let handle = match start(&st, mix1(), 100.0).unwrap() {
        AppReply::Started(h) => h,
        other => panic!("expected handle, got {other:?}"),
    };
    read(&st);

    let s = status(&st);
    assert!(s.in_progress);
    assert_eq!(s.session_start, Some(handle.started_at));
    assert_eq!(s.current_weight, 20.0);
    assert_eq!(handle.session_id, handle.started_at.to_rfc3339());
}

#[test]
fn motors_follow_session_lifecycle() {
    let st = station(stepping(20.0), MemoryStore::new());
    st.with_motors(|m| assert!(!m.any_on()));

    start(&st, mix1(), 100.0).unwrap();
    st.with_motors(|m| assert!(m.all_running()));

    stop(&st);
    st.with_motors(|m| assert!(!m.any_on()));
}

#[test]
fn events_trace_the_session() {
    let st = station(stepping(50.0), MemoryStore::new());
    create(&st, mix1());
    start(&st, mix1(), 100.0).unwrap();
    read(&st);
    read(&st);
    stop(&st);

    st.with_sink(|sink| {
        assert_eq!(sink.count(|e| matches!(e, AppEvent::SessionStarted { .. })), 1);
        assert_eq!(sink.count(|e| matches!(e, AppEvent::WeightSampled(_))), 2);
        assert_eq!(sink.count(|e| matches!(e, AppEvent::TargetReached { .. })), 1);
        assert_eq!(sink.count(|e| matches!(e, AppEvent::UsageRecorded { .. })), 1);
        assert_eq!(sink.count(|e| matches!(e, AppEvent::SessionStopped { .. })), 1);
        assert_eq!(sink.count(|e| matches!(e, AppEvent::StateChanged { .. })), 2);
    });
}

#[test]
fn usage_report_is_stamped_with_clock() {
    let store = MemoryStore::new();
    let st = station(stepping(20.0), store);
    match st.dispatch(AppCommand::Usage).unwrap() {
        AppReply::Usage(report) => {
            assert!(report.resource_usage.is_empty());
            assert_eq!(report.timestamp.to_rfc3339(), "2026-10-18T09:00:00+00:00");
        }
        other => panic!("expected usage report, got {other:?}"),
    }
}
