use clap::Parser;
use flexform::{configure_logging, report_failure, run, Cli};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    configure_logging(&cli);

    match run(cli).await {
        Ok(code) => code,
        Err(error) => report_failure(&error),
    }
}
