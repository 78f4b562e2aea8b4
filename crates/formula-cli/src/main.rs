use clap::Parser;
use formula_cli::{Cli, logging, run};
use tracing::error;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.json_logs);

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(err) => {
            error!(error = %format!("{err:#}"), "Command failed");
            Err(err)
        }
    }
}
