mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
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

    // stderr keeps stdout clean for json/yaml/plain output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        mut global,
        command,
    } = cli;

    let command = match command {
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "frontdesk", &mut std::io::stdout());
            return Ok(());
        }
        other => other,
    };

    let cfg = config::load(&global)?;
    config::apply_display_defaults(&mut global, &cfg);

    match command {
        // These never talk to the content API
        Command::Config(args) => commands::config_cmd::handle(args, &cfg, &global),
        Command::Logout => commands::session::logout(&global),

        cmd => {
            let desk = config::build_desk(&cfg, &global)?;
            tracing::debug!(command = ?cmd, api_url = %desk.config().api_url, "dispatching command");
            commands::dispatch(cmd, &desk, &global).await
        }
    }
}
