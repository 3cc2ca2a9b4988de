use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use cruzeiro_stats::io::excel_read::ExcelWorkbook;
use cruzeiro_stats::io::excel_write;
use cruzeiro_stats::model::{CompetitionSelection, ReportMode};
use cruzeiro_stats::orchestrate::{self, ReportRequest};
use cruzeiro_stats::report::{Report, ReportBody};
use cruzeiro_stats::{Result, StatsError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing(cli.verbose).and_then(|_| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| StatsError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    let mut workbook = ExcelWorkbook::open(&cli.workbook)?;

    match cli.command {
        Command::Competitions => {
            for option in orchestrate::competition_options(&workbook) {
                println!("{option}");
            }
            Ok(())
        }
        Command::Report(args) => {
            let request = args.to_request();
            let report = orchestrate::run_report(&mut workbook, &request)?;

            match args.format {
                OutputFormat::Table => print_table(&report),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }

            if let Some(export) = &args.export {
                excel_write::write_report(export, workbook.path(), &report)?;
            }
            Ok(())
        }
    }
}

fn print_table(report: &Report) {
    println!("📊 {}", report.mode.title());
    println!("{}", report.title);
    println!();

    if report.is_empty() {
        println!("{}", report.empty_message());
    } else {
        match &report.body {
            ReportBody::General(rows) => {
                println!("{:<32} {:>6} {:>6} {:>13}", "Competição", "Ano", "Gols", "Assistências");
                for row in rows {
                    println!(
                        "{:<32} {:>6} {:>6} {:>13}",
                        row.competition,
                        row.year.to_string(),
                        row.goals,
                        row.assists
                    );
                }
            }
            ReportBody::Ranking(entries) => {
                println!(
                    "{:>5} {:<32} {:>6} {:>13} {:>20}",
                    "Rank", "Jogador", "Gols", "Assistências", "Total Participações"
                );
                for entry in entries {
                    println!(
                        "{:>5} {:<32} {:>6} {:>13} {:>20}",
                        entry.rank, entry.player, entry.goals, entry.assists, entry.total
                    );
                }
            }
            ReportBody::Lines(_) => {
                for line in report.numbered_lines() {
                    println!("{line}");
                }
            }
        }
    }

    if !report.warnings.is_empty() {
        println!();
        for warning in &report.warnings {
            println!("⚠️ {warning}");
        }
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Goal and assist statistics from a workbook of match records."
)]
struct Cli {
    /// Workbook with one sheet per competition.
    #[arg(long, global = true, default_value = "Cruzeiro Mineiro.xlsx")]
    workbook: PathBuf,

    /// Log progress at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the selectable competitions.
    Competitions,
    /// Compute one report.
    Report(ReportArgs),
}

#[derive(clap::Args)]
struct ReportArgs {
    /// Report to compute.
    #[arg(long, value_enum)]
    mode: ModeKind,

    /// Exact player name; required by every mode except the rankings.
    #[arg(long)]
    player: Option<String>,

    /// Competition (sheet) to analyse, or "Todas" for every sheet.
    #[arg(long, default_value = CompetitionSelection::ALL_LABEL)]
    competition: String,

    /// Year filter; text that is not a number shows every year.
    #[arg(long)]
    year: Option<String>,

    /// How to print the report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Also write the report to a new .xlsx file.
    #[arg(long)]
    export: Option<PathBuf>,
}

impl ReportArgs {
    fn to_request(&self) -> ReportRequest {
        let mode = ReportMode::from(self.mode);
        let year = self
            .year
            .as_deref()
            .and_then(orchestrate::parse_year_filter);
        ReportRequest::new(mode)
            .with_player(self.player.as_deref().unwrap_or_default())
            .with_competition(CompetitionSelection::from_label(&self.competition))
            .with_year(year)
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeKind {
    General,
    Games,
    Ranking,
    RankingByYear,
    Goals,
    Assists,
}

impl From<ModeKind> for ReportMode {
    fn from(kind: ModeKind) -> Self {
        match kind {
            ModeKind::General => ReportMode::GeneralNumbers,
            ModeKind::Games => ReportMode::GamesWithParticipation,
            ModeKind::Ranking => ReportMode::Ranking,
            ModeKind::RankingByYear => ReportMode::RankingByYear,
            ModeKind::Goals => ReportMode::GoalList,
            ModeKind::Assists => ReportMode::AssistList,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}
