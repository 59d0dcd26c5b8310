//! End-to-end engine scenarios: schedule a full workday, let time pass,
//! and verify the pending projection tracks sink truth.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use workday_core::{MemorySink, Reconciler, ValidationError};

fn nine_am() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 12, 9, 0, 0).unwrap()
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 12, hour, minute, 0).unwrap()
}

#[tokio::test]
async fn full_workday_with_four_hour_lunch_offset() {
    let sink = Arc::new(MemorySink::new());
    let reconciler = Reconciler::new(Arc::clone(&sink));

    let pending = reconciler
        .schedule_alerts_at(nine_am(), Duration::hours(4), nine_am())
        .await
        .unwrap();

    // 3 primaries + 3 warnings, ascending, loop follow-ups excluded.
    assert_eq!(pending.len(), 6);
    let times: Vec<DateTime<Utc>> = pending.iter().map(|a| a.fire_at).collect();
    assert_eq!(
        times,
        vec![
            at(12, 58), // warning: lunch-out
            at(13, 0),  // lunch-out
            at(13, 28), // warning: lunch-in
            at(13, 30), // lunch-in
            at(17, 28), // warning: day-out
            at(17, 30), // day-out
        ]
    );
    assert_eq!(pending[1].title, "Clock-out for lunch");
    assert_eq!(pending[3].title, "Clock-in after lunch");
    assert_eq!(pending[5].title, "Clock-out for the day");
    assert!(pending[0].title.contains("clock-out for lunch"));
}

#[tokio::test]
async fn purge_after_lunch_out_drops_only_the_lunch_out_pair() {
    let sink = Arc::new(MemorySink::new());
    let reconciler = Reconciler::new(Arc::clone(&sink));

    reconciler
        .schedule_alerts_at(nine_am(), Duration::hours(4), nine_am())
        .await
        .unwrap();

    // Past lunch-out, before lunch-in.
    let pending = reconciler.purge_obsolete_and_recompute_at(at(13, 10)).await;

    let titles: Vec<&str> = pending.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(pending.len(), 4);
    assert!(!titles.contains(&"Clock-out for lunch"));
    assert!(titles.contains(&"Clock-in after lunch"));
    assert!(titles.contains(&"Clock-out for the day"));

    // The standing repeat alarm survives purges.
    assert!(sink
        .requests()
        .iter()
        .any(|r| r.id == workday_core::REPEAT_ALARM_ID));

    // Nothing new to purge a moment later.
    let again = reconciler.purge_obsolete_and_recompute_at(at(13, 10)).await;
    assert_eq!(again, pending);
}

#[tokio::test]
async fn boundary_offsets_are_rejected_end_to_end() {
    let sink = Arc::new(MemorySink::new());
    let reconciler = Reconciler::new(Arc::clone(&sink));

    let err = reconciler
        .schedule_alerts_at(nine_am(), Duration::minutes(4 * 60 + 30), nine_am())
        .await
        .unwrap_err();
    assert_eq!(err, ValidationError::TooLate);

    let err = reconciler
        .schedule_alerts_at(nine_am(), Duration::zero(), nine_am())
        .await
        .unwrap_err();
    assert_eq!(err, ValidationError::TooEarly);

    assert!(sink.requests().is_empty());
    assert!(reconciler.pending().await.is_empty());
}

#[tokio::test]
async fn foreground_pass_after_day_end_leaves_a_clean_slate() {
    let sink = Arc::new(MemorySink::new());
    let reconciler = Reconciler::new(Arc::clone(&sink));

    reconciler
        .schedule_alerts_at(nine_am(), Duration::hours(3), nine_am())
        .await
        .unwrap();

    // Next morning: everything one-shot is obsolete.
    let next_day = nine_am() + Duration::days(1);
    reconciler.on_foreground_activate().await;
    let pending = reconciler.purge_obsolete_and_recompute_at(next_day).await;

    assert!(pending.is_empty());
    assert!(sink.requests().is_empty());
    assert_eq!(sink.badge_count(), 0);
}
