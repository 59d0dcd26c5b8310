pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let reconciler = super::open_reconciler()?;
    let pending = super::runtime()?.block_on(reconciler.purge_obsolete_and_recompute());
    println!("{} alert(s) still pending", pending.len());
    Ok(())
}
