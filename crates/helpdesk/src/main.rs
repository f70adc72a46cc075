mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use helpdesk_core::HelpdeskClient;

use crate::cli::{Cli, Command};
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(mut cli: Cli) -> Result<(), CliError> {
    // Completions need neither config nor account.
    if let Command::Completions(args) = cli.command {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Cli::command();
        generate(args.shell, &mut cmd, "helpdesk", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = helpdesk_config::load_config()?;
    cli.global.output = Some(config::output_format(&cli.global, &cfg));

    match cli.command {
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        cmd => {
            let client_config = config::build_client_config(&cli.global, &cfg)?;
            let client = HelpdeskClient::new(client_config)?;

            tracing::debug!(command = ?cmd, base_url = %client.base_url().as_url(), "dispatching command");
            let result = commands::dispatch(cmd, &client, &cli.global);

            let stats = client.cache().stats();
            tracing::debug!(hits = stats.hits, misses = stats.misses, "cache usage");
            result
        }
    }
}
