use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use pgerd::measure::WidthRule;
use pgerd::schema::SchemaSnapshot;
use pgerd::{Config, Result, render_snapshot};
use tracing_subscriber::EnvFilter;

/// Render an ER diagram from a JSON schema snapshot.
#[derive(Parser, Debug)]
#[command(name = "pgerd", version, about)]
struct Cli {
    /// Schema snapshot (JSON)
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write to "ER <database>.svg" when no output file is given
    #[arg(long, conflicts_with = "output")]
    auto_name: bool,

    /// Layout and theme settings (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gap between boxes, levels and regions
    #[arg(long)]
    spacing: Option<i32>,

    /// Character width rule: latin1 or unicode
    #[arg(long, value_enum)]
    width_rule: Option<WidthRule>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pgerd=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(spacing) = cli.spacing {
        config.spacing = spacing;
    }
    if let Some(rule) = cli.width_rule {
        config.metrics.width_rule = rule;
    }

    let snapshot = SchemaSnapshot::from_json(&fs::read_to_string(&cli.input)?)?;
    tracing::info!(
        database = snapshot.database.as_deref().unwrap_or("-"),
        tables = snapshot.tables.len(),
        "loaded schema snapshot"
    );

    let svg = render_snapshot(&snapshot, &config)?;

    let output = match cli.output {
        Some(path) => Some(path),
        None if cli.auto_name => {
            let database = snapshot.database.as_deref().unwrap_or("schema");
            Some(PathBuf::from(format!("ER {}.svg", database)))
        }
        None => None,
    };

    match output {
        Some(path) => {
            fs::write(&path, &svg)?;
            tracing::info!(path = %path.display(), "wrote diagram");
        }
        None => print!("{}", svg),
    }

    Ok(())
}
