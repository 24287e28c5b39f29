use crate::report::{run_export, run_generate, run_report, ExportArgs, GenerateArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mediscope::config::AppConfig;
use mediscope::error::AppError;
use mediscope::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "MediScope",
    about = "Serve and inspect a simulated hospital census from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Generate a fresh scored population and write it to the snapshot
    Generate(GenerateArgs),
    /// Print the census dashboard to the terminal
    Report(ReportArgs),
    /// Write the filtered patient table as CSV
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Generate(args) => run_generate(&config, args),
        Command::Report(args) => run_report(&config, args),
        Command::Export(args) => run_export(&config, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["mediscope-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn report_accepts_filters() {
        let cli = Cli::try_parse_from([
            "mediscope-api",
            "report",
            "--days",
            "14",
            "--department",
            "Intensive Care Unit (ICU)",
            "--risk-level",
            "High",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Report(args)) => {
                assert_eq!(args.days, 14);
                assert_eq!(args.limit, 25);
                assert_eq!(
                    args.filter.department.as_deref(),
                    Some("Intensive Care Unit (ICU)")
                );
                assert_eq!(args.filter.risk_level.as_deref(), Some("High"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn generate_takes_count_and_seed() {
        let cli = Cli::try_parse_from(["mediscope-api", "generate", "--count", "10", "--seed", "9"])
            .expect("parses");
        match cli.command {
            Some(Command::Generate(args)) => {
                assert_eq!(args.count, Some(10));
                assert_eq!(args.seed, Some(9));
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
