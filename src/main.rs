use clap::Parser;
use pgwait::Cli;

fn main() -> anyhow::Result<()> {
    pgwait::run(Cli::parse())
}
