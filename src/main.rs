//! Template service adapter entry point.
//!
//! Parses the broker's arguments, runs one adapter operation and writes its result to
//! stdout. Failures are reported on stderr; the exit status is 10 for operations the
//! adapter does not offer and 1 for every other error.

use anyhow::Result;
use clap::Parser;
use template_service_adapter::cli::Cli;
use template_service_adapter::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(error_ctx.exit_code());
        }
    }
}
