/// Mirrors the app's foreground transition: stop the repeating loop alarm,
/// reset out-of-band signals, then run a purge pass.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let reconciler = super::open_reconciler()?;
    let pending = super::runtime()?.block_on(async {
        reconciler.on_foreground_activate().await;
        reconciler.purge_obsolete_and_recompute().await
    });
    println!("loop alarm stopped; {} alert(s) pending", pending.len());
    Ok(())
}
