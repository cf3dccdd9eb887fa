mod config;
mod error;
mod exam;
mod ipc;
mod model;
mod roster;
mod store;
mod table;
mod workspace;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "examd", about = "Exam results ingestion sidecar", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer JSON-lines requests on stdin (default)
    Serve,
    /// Merge a roster and/or exam CSVs into a data directory
    Import {
        /// Directory holding students.json and exams/
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Roster CSV with id,name columns
        #[arg(long)]
        students: Option<PathBuf>,
        /// Exam CSV as <csv>=<examName>; the name defaults to the file stem
        #[arg(long = "exam", value_parser = parse_exam_arg)]
        exams: Vec<ExamArg>,
        /// Config file used instead of <data-dir>/examd.json
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct ExamArg {
    csv: PathBuf,
    name: String,
}

fn parse_exam_arg(raw: &str) -> Result<ExamArg, String> {
    let (csv, name) = match raw.rsplit_once('=') {
        Some((csv, name)) => (PathBuf::from(csv), name.trim().to_string()),
        None => {
            let csv = PathBuf::from(raw);
            let stem = csv
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            (csv, stem)
        }
    };
    if name.is_empty() {
        return Err(format!("no exam name in {raw:?}"));
    }
    Ok(ExamArg { csv, name })
}

fn main() -> anyhow::Result<()> {
    // stdout is the response channel; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(),
        Commands::Import {
            data_dir,
            students,
            exams,
            config,
        } => run_import(data_dir, students, exams, config.as_deref()),
    }
}

fn serve() -> anyhow::Result<()> {
    let mut state = ipc::AppState::default();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                let resp = ipc::err("", "bad_json", e.to_string(), None);
                writeln!(stdout, "{}", resp)?;
                stdout.flush()?;
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        writeln!(stdout, "{}", resp)?;
        stdout.flush()?;
    }
    Ok(())
}

fn run_import(
    data_dir: PathBuf,
    students: Option<PathBuf>,
    exams: Vec<ExamArg>,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    let ws = match config_path {
        Some(path) => {
            let cfg = config::ImportConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            workspace::Workspace::open_with_config(&data_dir, cfg)?
        }
        None => workspace::Workspace::open(&data_dir)
            .with_context(|| format!("failed to open data dir {}", data_dir.display()))?,
    };

    let mut stdout = io::stdout();
    if let Some(csv) = students {
        let outcome = ws
            .import_roster(&csv)
            .with_context(|| format!("roster import from {} failed", csv.display()))?;
        writeln!(
            stdout,
            "{}",
            json!({ "op": "students", "added": outcome.added_count() })
        )?;
    }

    for exam in exams {
        let summary = ws
            .import_exam(&exam.csv, &exam.name)
            .with_context(|| format!("exam import from {} failed", exam.csv.display()))?;
        writeln!(stdout, "{}", json!({ "op": "exam", "summary": summary }))?;
    }
    Ok(())
}
