use anyhow::Result;
use benchdelta::{cli::Cli, report, source};
use clap::Parser;
use std::io::Write;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    // Reject bad settings before reading any input
    let config = args.compare_config();
    config.validate()?;

    let collection = source::load_collection(&args.files)?;
    let output = report::generate(&collection, &config, args.output_format())?;

    std::io::stdout().lock().write_all(output.as_bytes())?;
    Ok(())
}
