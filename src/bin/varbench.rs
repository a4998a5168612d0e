//! CLI binary for varbench - compares detected variant positions against a truth set

use clap::Parser;
use env_logger::Env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use varbench_rs::{
    compare::{compare_tables, ComparisonResult},
    fasta::reference_length,
    report::{format_rate, write_report},
    table::PositionTable,
    utils::{validate_file_readable, Timer},
    validate_table_config, TableConfig, VarbenchError, VarbenchResult,
};

#[derive(Parser)]
#[command(name = "varbench")]
#[command(about = "Benchmark detected variant positions against a set of true positions")]
#[command(long_about = "
varbench compares a table of detected variant positions with a table of true
positions and reports confusion-matrix statistics. Every position of the
reference genome that was not detected counts as a true negative, so the
summed sequence length of the reference FASTA is used as the universe size.

Both tables are tab-separated. The first line is a header starting with '#'
and must be identical in the two files. Every other line is:

    chrom<TAB>position<TAB>status<TAB>base1<TAB>base2...

Only rows whose status equals the valid label are compared. Plain and gzip
compressed inputs are accepted.

The report is one header line and one data line. Rates with a zero
denominator are printed as NA.
")]
struct Args {
    /// Path to the table of true variant positions
    #[arg(long, value_name = "FILE")]
    variants_true: PathBuf,

    /// Path to the table of detected variant positions
    #[arg(long, value_name = "FILE")]
    variants_detected: PathBuf,

    /// Path to the reference genome FASTA file
    #[arg(long, value_name = "FILE")]
    reference_genome: PathBuf,

    /// Status label of rows that take part in the comparison
    #[arg(long, default_value = "valid")]
    valid_status: String,

    /// Write the report to this file instead of standard output
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Force overwrite of output file if it exists
    #[arg(short, long)]
    force: bool,
}

fn run() -> VarbenchResult<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_secs()
        .init();

    run_with(args)
}

/// Compare the tables named by `args` and write the report
fn run_with(args: Args) -> VarbenchResult<()> {
    log::info!("Starting varbench comparison");
    log::info!("True variants: {:?}", args.variants_true);
    log::info!("Detected variants: {:?}", args.variants_detected);
    log::info!("Reference genome: {:?}", args.reference_genome);

    validate_file_readable(&args.variants_true)?;
    validate_file_readable(&args.variants_detected)?;
    validate_file_readable(&args.reference_genome)?;

    if let Some(output) = &args.output {
        if output.exists() && !args.force {
            return Err(VarbenchError::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("Output file {:?} already exists. Use --force to overwrite.", output),
            )));
        }
    }

    let config = TableConfig {
        valid_status: args.valid_status.clone(),
        ..TableConfig::default()
    };
    validate_table_config(&config)?;

    let result = benchmark(
        &args.variants_true,
        &args.variants_detected,
        &args.reference_genome,
        &config,
    )?;

    log::info!("Results summary:");
    for (name, value) in result.rates() {
        log::info!("  {}: {}", name, format_rate(value));
    }

    match &args.output {
        Some(output) => {
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            write_report(&result, BufWriter::new(File::create(output)?))?;
            log::info!("Report written to: {:?}", output);
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write_report(&result, &mut handle)?;
            handle.flush()?;
        }
    }

    Ok(())
}

/// Load both tables and the reference length, then compare them
fn benchmark(
    variants_true: &Path,
    variants_detected: &Path,
    reference_genome: &Path,
    config: &TableConfig,
) -> VarbenchResult<ComparisonResult> {
    let reference_size = {
        let _timer = Timer::new("Reading reference genome");
        reference_length(reference_genome)?
    };

    let (truth, detected) = {
        let _timer = Timer::new("Reading position tables");
        (
            PositionTable::from_path(variants_true, config)?,
            PositionTable::from_path(variants_detected, config)?,
        )
    };

    let _timer = Timer::new("Comparing positions");
    compare_tables(&truth, &detected, reference_size)
}

/// Handle application errors and provide user-friendly messages
fn handle_error(error: VarbenchError) -> ! {
    match error {
        VarbenchError::FileNotFound(path) => {
            eprintln!("Error: File not found: {}", path);
            eprintln!("Please check that the file exists and is readable.");
        }
        VarbenchError::InvalidHeader(msg) => {
            eprintln!("Error: Invalid table header: {}", msg);
            eprintln!("The first line of a position table must start with '#'.");
        }
        VarbenchError::InvalidRecord(msg) => {
            eprintln!("Error: Invalid table row: {}", msg);
            eprintln!("Rows must be chrom<TAB>position<TAB>status[<TAB>base...] with a numeric position.");
        }
        VarbenchError::HeaderMismatch(msg) => {
            eprintln!("Error: Table headers differ: {}", msg);
            eprintln!("Both tables must list the same genomes in the same order.");
        }
        VarbenchError::InvalidReference(msg) => {
            eprintln!("Error: Invalid reference genome: {}", msg);
            eprintln!("Please check that the reference is a FASTA file.");
        }
        VarbenchError::InvalidInput(msg) => {
            eprintln!("Error: Invalid input: {}", msg);
        }
        VarbenchError::InvalidConfig(msg) => {
            eprintln!("Error: Invalid configuration: {}", msg);
            eprintln!("Please check the --valid-status argument.");
        }
        VarbenchError::Csv(ref e) => {
            eprintln!("Error: Table processing error: {}", e);
            eprintln!("Please check that your tables are tab-separated UTF-8 text.");
        }
        VarbenchError::Io(ref e) => {
            eprintln!("Error: I/O error: {}", e);
            eprintln!("Please check file permissions and that inputs are well formed.");
        }
    }
    std::process::exit(1);
}

fn main() {
    if let Err(e) = run() {
        handle_error(e);
    }
}
