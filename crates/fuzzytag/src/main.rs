//! fuzzytag
//!
//! Reads lines from a file or stdin, classifies each against the configured
//! match nodes, and prints the winners.
//!
//! ## Usage
//!
//! ```bash
//! fuzzytag --search apple --input fruit.csv --separator , --position 1
//! fuzzytag --config nodes.yaml --input fruit.csv --format jsonl
//! ```
//!
//! `RUST_LOG` overrides the log level (default: info, or debug with `--debug`).

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};

use clap::Parser;
use tracing::{error, info};

use fuzzytag::output::sink_for;
use fuzzytag::{Args, Settings};
use fuzzytag_core::{Dispatcher, Pipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let settings = Settings::from_args(&args);
    let debug = args.debug || settings.as_ref().map(|s| s.debug).unwrap_or(false);
    fuzzytag::tracing::init_with_filter(if debug { "debug" } else { "info" });

    let plan = settings
        .and_then(Settings::into_plan)
        .inspect_err(|e| error!(error = %e, "invalid configuration"))?;

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => {
            let file = File::open(path).inspect_err(|e| {
                error!(path = %path.display(), error = %e, "failed to open input")
            })?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        nodes = plan.rules.len(),
        "starting fuzzytag"
    );

    let dispatcher = Dispatcher::from_rules(plan.rules, plan.dispatch);
    let mut pipeline = Pipeline::new(dispatcher, plan.lines);

    let stdout = io::stdout().lock();
    let mut sink = sink_for(args.format, BufWriter::new(stdout));

    let result = pipeline.run(reader, sink.as_mut()).await;
    pipeline.shutdown().await;

    let stats = result.inspect_err(|e| error!(error = %e, "run failed"))?;
    info!(matched = stats.matched, read = stats.read, "done");
    Ok(())
}
