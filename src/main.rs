mod batch;
mod checksum;
mod error;
mod logging;
mod reference;
mod server;
mod validation;

use batch::{validate_file, BatchReport};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;
use validation::validate_iban;

#[derive(Parser)]
#[command(name = "iban-check")]
#[command(about = "IBAN structural validation service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve GET /validate?iban=... over HTTP
    Serve(ServeArgs),
    /// Validate IBANs given on the command line
    Check(CheckArgs),
    /// Validate every IBAN in a CSV or line-per-IBAN file
    Batch(BatchArgs),
}

#[derive(Parser)]
struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
}

#[derive(Parser)]
struct CheckArgs {
    #[arg(required = true)]
    ibans: Vec<String>,
}

#[derive(Parser)]
struct BatchArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, default_value = "iban")]
    column: String,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    logging::init_logging("iban-check")?;
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => run_serve(args),
        Command::Check(args) => run_check(args),
        Command::Batch(args) => run_batch(args),
    }
}

fn run_serve(args: ServeArgs) -> Result<(), String> {
    let runtime = tokio::runtime::Runtime::new().map_err(|err| err.to_string())?;
    runtime.block_on(server::serve(args.bind))
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let mut invalid = 0usize;
    for iban in &args.ibans {
        match validate_iban(iban) {
            (true, _) => emit_info_line(&format!("{iban}: valid")),
            (false, err) => {
                invalid += 1;
                let reason = err.map(|err| err.to_string()).unwrap_or_default();
                emit_info_line(&format!("{iban}: invalid ({reason})"));
            }
        }
    }

    if invalid > 0 {
        return Err(format!(
            "{} of {} IBAN(s) invalid",
            invalid,
            args.ibans.len()
        ));
    }
    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<(), String> {
    let start = Instant::now();
    let report = validate_file(&args.input, &args.column, args.output.as_deref())?;
    let elapsed = start.elapsed();

    log_batch_report(&report);
    if let Some(output) = &args.output {
        emit_info_line(&format!("Batch output written to {}", output.display()));
    }
    emit_info_line(&format!("Batch time: {} ms", elapsed.as_millis()));
    Ok(())
}

fn log_batch_report(report: &BatchReport) {
    emit_info_line(&format!(
        "Batch: total={} valid={} invalid={}",
        report.total, report.valid, report.invalid
    ));
    for (err, count) in &report.by_error {
        emit_info_line(&format!("Batch errors: {} = {}", err.kind(), count));
    }
}

fn emit_info_line(message: &str) {
    if log::log_enabled!(log::Level::Info) {
        log::info!("{}", message);
    } else {
        println!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_defaults_to_local_port_8080() {
        let cli = Cli::try_parse_from(["iban-check", "serve"]).unwrap();
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.bind, "127.0.0.1:8080".parse::<SocketAddr>().unwrap())
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn check_requires_an_iban() {
        assert!(Cli::try_parse_from(["iban-check", "check"]).is_err());
    }

    #[test]
    fn check_reports_invalid_inputs() {
        let ok = run_check(CheckArgs {
            ibans: vec!["GB82WEST12345698765432".to_string()],
        });
        assert!(ok.is_ok());

        let err = run_check(CheckArgs {
            ibans: vec![
                "GB82WEST12345698765432".to_string(),
                "GB83WEST12345698765432".to_string(),
            ],
        })
        .unwrap_err();
        assert_eq!(err, "1 of 2 IBAN(s) invalid");
    }
}
