use clap::Args;

#[derive(Args)]
pub struct ListArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let reconciler = super::open_reconciler()?;
    // Reconcile before showing: anything already fired is noise.
    let pending = super::runtime()?.block_on(reconciler.purge_obsolete_and_recompute());
    super::print_pending(&pending, args.json)
}
