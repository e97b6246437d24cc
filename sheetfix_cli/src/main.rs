use clap::{Parser, Subcommand};
use sheetfix_core::*;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sheetfix")]
#[command(about = "Exercise catalog spreadsheet corrector", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: $XDG_CONFIG_HOME/sheetfix/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Input workbook (.xlsx)
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Corrected CSV output
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    /// SQL script output
    #[arg(long, global = true)]
    sql: Option<PathBuf>,

    /// Keyword vocabulary for level inference (spanish, english)
    #[arg(long, global = true)]
    vocabulary: Option<Vocabulary>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Correct the workbook and write the CSV and SQL outputs (default)
    Run,

    /// Print statistics for the corrected catalog without writing files
    Report {
        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the keyword table used for level inference
    Rules,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    sheetfix_core::logging::init_with_level(sheetfix_core::logging::level_for_verbosity(
        cli.verbose,
    ));

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Run failed ({:?}): {}", e.kind(), e);
            eprintln!("\n✗ ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Command-line flags win over the config file
    if let Some(input) = cli.input {
        config.paths.input = input;
    }
    if let Some(csv) = cli.csv {
        config.paths.csv_output = csv;
    }
    if let Some(sql) = cli.sql {
        config.paths.sql_output = sql;
    }
    if let Some(vocabulary) = cli.vocabulary {
        config.rules.vocabulary = vocabulary;
    }

    match cli.command {
        Some(Commands::Run) | None => cmd_run(&config),
        Some(Commands::Report { json }) => cmd_report(&config, json),
        Some(Commands::Rules) => cmd_rules(&config),
    }
}

fn cmd_run(config: &Config) -> Result<()> {
    println!("{}", "=".repeat(80));
    println!("EXERCISE CATALOG CORRECTION");
    println!("{}", "=".repeat(80));
    println!("  Excel input: {}", config.paths.input.display());
    println!("  CSV output:  {}", config.paths.csv_output.display());
    println!("  SQL output:  {}", config.paths.sql_output.display());
    println!("  Vocabulary:  {}", config.rules.vocabulary);
    println!();

    let summary = run(config)?;

    for (idx, record) in summary.records.iter().take(3).enumerate() {
        display_record(idx + 1, record);
    }
    println!();
    println!("✓ Mapped {} exercises", summary.records.len());
    println!("✓ CSV written: {}", summary.csv_path.display());
    println!("✓ SQL written: {}", summary.sql_path.display());
    println!();

    println!("{}", Report::from_records(&summary.records));
    println!();

    println!("Next steps:");
    println!("  1. Review {} and adjust levels if needed", summary.csv_path.display());
    println!("  2. Run the script: psql ... -f {}", summary.sql_path.display());
    println!("  3. Or import the CSV directly into the database");

    Ok(())
}

fn cmd_report(config: &Config, json: bool) -> Result<()> {
    let records = load_records(config)?;
    let report = Report::from_records(&records);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    Ok(())
}

fn cmd_rules(config: &Config) -> Result<()> {
    let source = if config.rules.table.is_some() {
        "custom table from config"
    } else {
        "built-in table"
    };
    println!("Vocabulary: {} ({})", config.rules.vocabulary, source);
    print!("{}", config.rules.active_table());
    Ok(())
}

fn display_record(position: usize, record: &ExerciseRecord) {
    println!("✓ Exercise {}: {}", position, record.name);
    println!("  - Level:     {}", record.level);
    println!("  - Category:  {}", record.category);
    println!("  - Pattern:   {}", record.pattern);
    println!("  - Equipment: {}", record.equipment);
}
