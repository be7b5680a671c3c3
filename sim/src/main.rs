use anyhow::Result;
use clap::Parser;

use sim::{Args, init_tracing, run};

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    run(&args)
}
