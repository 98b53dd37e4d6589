//! `vetclinic`: command-line front end for the clinic records.
//!
//! Successful commands print JSON on stdout. A form that fails
//! validation prints its field → message map and exits with status 2.

mod cli;
mod commands;
mod fields;

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::{Report, Result, WrapErr};
use serde_json::json;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;
use vetclinic_core::{ClinicError, ClinicService};
use vetclinic_db::ClinicDb;

use crate::cli::{Cli, Command, LogFormat};

/// Exit status for a submission rejected by field validation.
const EXIT_INVALID: u8 = 2;

fn init_tracing(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(
        "vetclinic=info"
            .parse::<Directive>()
            .wrap_err("invalid log directive")?,
    );
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.log_format)?;

    let clinic = ClinicDb::connect(&cli.db.config())
        .await
        .wrap_err("failed to open the clinic database")?;

    let rules = cli.rules();
    let command = match cli.command {
        Command::Migrate => {
            println!("{}", json!({ "schema_version": clinic.schema_version() }));
            return Ok(ExitCode::SUCCESS);
        }
        Command::Records(command) => command,
    };

    let service = ClinicService::new(clinic.store(), rules);

    match commands::execute(&service, command).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(ClinicError::Validation(errors)) => {
            println!("{}", serde_json::to_string_pretty(&errors)?);
            Ok(ExitCode::from(EXIT_INVALID))
        }
        Err(other) => Err(Report::new(other).wrap_err("command failed")),
    }
}
