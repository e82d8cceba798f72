use clap::Parser;
use clumpy_cli::{init_tracing, run, Cli};

fn main() -> anyhow::Result<()> {
    init_tracing();
    run(Cli::parse())
}
