pub mod activate;
pub mod config;
pub mod list;
pub mod purge;
pub mod schedule;

use workday_core::{Database, Reconciler, ScheduledAlert, StoredSink};

/// The engine is async at every sink boundary; the CLI drives it through a
/// current-thread runtime per invocation.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

pub(crate) fn open_reconciler() -> Result<Reconciler<StoredSink>, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(Reconciler::new(StoredSink::new(db)))
}

pub(crate) fn print_pending(
    pending: &[ScheduledAlert],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(pending)?);
        return Ok(());
    }
    if pending.is_empty() {
        println!("No alerts scheduled");
        return Ok(());
    }
    for alert in pending {
        let local = alert.fire_at.with_timezone(&chrono::Local);
        println!("{}  {}", local.format("%Y-%m-%d %H:%M"), alert.title);
    }
    Ok(())
}
