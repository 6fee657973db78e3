//! gitingester CLI — turn a directory into a single text digest.
//!
//! Merges `.gitignore`-derived excludes with `--incl`/`--excl` patterns and
//! writes `_processed/<dir>@<date>@<time>[-suffix].txt`.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
