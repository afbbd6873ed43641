use clap::Parser;
use raksha_tui::Cli;
use raksha_tui::run_main;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_main(cli)
}
