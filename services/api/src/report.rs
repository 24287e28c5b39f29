use crate::infra::{open_census, parse_filter};
use chrono::Local;
use clap::Args;
use mediscope::analytics::{flow_window, DashboardSnapshot, FilterQuery, DEFAULT_FLOW_DAYS};
use mediscope::config::AppConfig;
use mediscope::error::AppError;
use mediscope::patients::export::{export_file_name, write_csv};
use mediscope::patients::{PatientGenerator, PopulationStore};
use mediscope::risk::RiskScorer;
use mediscope::{Census, CensusSettings};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// Dashboard filter selections shared by `report` and `export`.
#[derive(Args, Debug, Default)]
pub(crate) struct FilterArgs {
    /// Department name, e.g. "Cardiology" or "Intensive Care Unit (ICU)"
    #[arg(long)]
    pub(crate) department: Option<String>,
    /// Risk level: Low, Medium, High, or Critical
    #[arg(long)]
    pub(crate) risk_level: Option<String>,
    /// Admitted or Discharged
    #[arg(long)]
    pub(crate) status: Option<String>,
    /// Case-insensitive match on name, MRN, or room
    #[arg(long)]
    pub(crate) search: Option<String>,
}

impl From<FilterArgs> for FilterQuery {
    fn from(args: FilterArgs) -> Self {
        Self {
            department: args.department,
            risk_level: args.risk_level,
            status: args.status,
            search: args.search,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// Number of patients to generate (defaults to MEDISCOPE_INITIAL_PATIENTS)
    #[arg(long)]
    pub(crate) count: Option<usize>,
    /// Seed for reproducible generation and scoring
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Snapshot to write (defaults to MEDISCOPE_DATA_PATH)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Days of admissions and discharges to include in the flow table
    #[arg(long, default_value_t = DEFAULT_FLOW_DAYS, value_parser = parse_days)]
    pub(crate) days: u32,
    /// Maximum patient rows to print
    #[arg(long, default_value_t = 25)]
    pub(crate) limit: usize,
    #[command(flatten)]
    pub(crate) filter: FilterArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Destination file, or "-" for stdout (defaults to patient_data_YYYYMMDD.csv)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) filter: FilterArgs,
}

fn parse_days(value: &str) -> Result<u32, String> {
    let days: u32 = value.parse().map_err(|err: std::num::ParseIntError| err.to_string())?;
    flow_window(days).map_err(|err| err.to_string())
}

pub(crate) fn run_generate(config: &AppConfig, args: GenerateArgs) -> Result<(), AppError> {
    let mut data = config.data.clone();
    if let Some(count) = args.count {
        data.initial_patients = count;
    }
    if args.seed.is_some() {
        data.seed = args.seed;
    }
    if let Some(output) = args.output {
        data.snapshot_path = output;
    }

    let generator = match data.seed {
        Some(seed) => PatientGenerator::seeded(seed),
        None => PatientGenerator::from_entropy(),
    };
    let mut census = Census::new(
        PopulationStore::new(&data.snapshot_path),
        RiskScorer::standard(data.seed.map(|seed| seed.wrapping_add(1))),
        generator,
        CensusSettings::from(&data),
    );
    census.regenerate()?;
    info!(path = %data.snapshot_path.display(), "wrote patient snapshot");
    println!(
        "Generated {} patients into {}",
        census.patients().len(),
        data.snapshot_path.display()
    );
    Ok(())
}

pub(crate) fn run_report(config: &AppConfig, args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        days,
        limit,
        filter,
    } = args;
    let filter = parse_filter(filter.into())?;
    let census = open_census(&config.data)?;
    let snapshot = census.dashboard(&filter, days);

    let stdout = io::stdout();
    render_dashboard(&snapshot, limit, &mut stdout.lock())?;
    Ok(())
}

pub(crate) fn run_export(config: &AppConfig, args: ExportArgs) -> Result<(), AppError> {
    let filter = parse_filter(args.filter.into())?;
    let census = open_census(&config.data)?;
    let rows = census.rows(&filter);

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(export_file_name(Local::now().date_naive())));
    let encode = |err| AppError::Census(mediscope::CensusError::Export(err));

    if output.as_os_str() == "-" {
        write_csv(&rows, io::stdout().lock()).map_err(encode)?;
    } else {
        let file = BufWriter::new(File::create(&output)?);
        write_csv(&rows, file).map_err(encode)?;
        println!("Exported {} patients to {}", rows.len(), output.display());
    }
    Ok(())
}

pub(crate) fn render_dashboard<W: Write>(
    snapshot: &DashboardSnapshot,
    limit: usize,
    out: &mut W,
) -> io::Result<()> {
    writeln!(
        out,
        "MediScope census as of {}",
        snapshot.generated_at.format("%Y-%m-%d %H:%M")
    )?;

    match &snapshot.statistics {
        Some(stats) => {
            writeln!(
                out,
                "- {} patients | {} admitted | {} discharged",
                stats.total_patients, stats.admitted, stats.discharged
            )?;
            writeln!(
                out,
                "- Average age {:.1} | average risk score {:.2}",
                stats.average_age, stats.average_risk_score
            )?;
            writeln!(out, "Risk distribution:")?;
            for (level, count) in &stats.risk_distribution {
                writeln!(out, "  - {level}: {count}")?;
            }
        }
        None => writeln!(out, "- No patient data available")?,
    }

    writeln!(out, "\nBed occupancy")?;
    for entry in &snapshot.bed_occupancy {
        writeln!(
            out,
            "  - {:<26} {:>3}/{:<3} occupied ({:.1}%) | {} available",
            entry.department.label(),
            entry.occupied,
            entry.total,
            entry.occupancy_rate,
            entry.available
        )?;
    }

    writeln!(out, "\nPatient flow (last {} days)", snapshot.flow_days)?;
    for entry in &snapshot.patient_flow {
        writeln!(
            out,
            "  - {}: +{} admitted | -{} discharged",
            entry.date, entry.admissions, entry.discharges
        )?;
    }

    if let Some(breakdown) = &snapshot.risk_breakdown {
        writeln!(out, "\n{} risk by department", breakdown.risk_level)?;
        if breakdown.departments.is_empty() {
            writeln!(out, "  - none")?;
        }
        for entry in &breakdown.departments {
            writeln!(out, "  - {}: {}", entry.department, entry.count)?;
        }
    }

    writeln!(out, "\nPatients ({} matching)", snapshot.patients.len())?;
    for row in snapshot.patients.iter().take(limit) {
        writeln!(
            out,
            "  - {} | {} | {} | {} | {} | {} ({})",
            row.mrn, row.name, row.department, row.room, row.status, row.risk_level, row.risk_score
        )?;
    }
    if snapshot.patients.len() > limit {
        writeln!(out, "  ... {} more", snapshot.patients.len() - limit)?;
    }

    Ok(())
}
