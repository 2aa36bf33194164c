use poa_genesis::cli::{Cli, Command, CredentialsArgs, CredentialsCommand, MintArgs, NewArgs};
use poa_genesis::fixtures::{test_balance, test_credential_addresses, test_credentials};
use poa_genesis::genesis::GenesisDoc;
use poa_genesis::output;

use clap::Parser;
use eyre::Context;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.no_color);
    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> eyre::Result<()> {
    match command {
        Command::Validate { path } => validate(&path),
        Command::New(args) => new_genesis(&args),
        Command::Credentials(args) => credentials(&args),
    }
}

fn validate(path: &Path) -> eyre::Result<()> {
    let doc = GenesisDoc::from_file(path)?;
    output::print_genesis_summary(&doc);
    output::print_valid(path);
    Ok(())
}

fn new_genesis(args: &NewArgs) -> eyre::Result<()> {
    let mut doc = args.build()?;
    doc.validate_and_complete()?;
    doc.save_as(&args.out)?;

    output::print_genesis_summary(&doc);
    output::print_saved(&args.out);
    Ok(())
}

fn credentials(args: &CredentialsArgs) -> eyre::Result<()> {
    if let Some(CredentialsCommand::Mint(mint)) = &args.action {
        return mint_credential(mint);
    }

    output::print_credentials(&test_credential_addresses(), test_balance());
    if args.verify {
        for credential in test_credentials() {
            credential
                .signer()
                .wrap_err_with(|| format!("credential {} failed", credential.address))?;
            debug!(address = %credential.address, "Verified test credential");
        }
        output::print_credentials_verified(test_credentials().len());
    }
    Ok(())
}

fn mint_credential(args: &MintArgs) -> eyre::Result<()> {
    let credential = args.mint()?;
    let json = serde_json::to_string_pretty(&credential)
        .wrap_err("Failed to encode credential")?;
    debug!(
        address = %credential.address,
        iterations = args.iterations,
        "Minted test credential"
    );
    println!("{json}");
    Ok(())
}

fn init_tracing(log_level: &str, no_color: bool) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .init();
}
