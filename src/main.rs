extern crate env_logger;
#[macro_use]
extern crate log;

use std::io::{stdout, Write};

use anyhow::{Context, Result};
use clap::Parser;

mod block;
mod cli;
mod filter;
mod phred;
mod pipeline;
mod plot;
mod record;
mod report;
mod stats;
mod writer;

use cli::Cli;
use filter::FilterOpts;

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    info!("qualfilter v{}", cli::VERSION);

    let opts = FilterOpts::new(cli.length_min, cli.length_max, cli.quality_threshold)
        .context("Invalid filter thresholds")?;
    info!(
        "Retaining reads of length {}-{} with mean quality above {}",
        opts.length_min, opts.length_max, opts.quality_threshold
    );

    let stats = pipeline::run(&cli.input, &cli.output, &opts)?;

    let mut out = stdout().lock();
    report::write_summary(&stats, &mut out)?;
    out.flush()?;

    plot::save_histograms(&stats, &cli.graph)?;

    if cli.d {
        if let Err(e) = plot::show(&cli.graph) {
            warn!("Could not display {}: {}", cli.graph, e);
        }
    }

    info!("Completed successfully.");
    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        std::process::exit(1);
    }
}
