use anyhow::Result;
use clap::Parser;

use keyseq::cli::{self, CliArgs};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    keyseq::tracing::init(keyseq::tracing::level_for_verbosity(args.verbose));

    let stdout = std::io::stdout();
    cli::run(args, &mut stdout.lock())
}
