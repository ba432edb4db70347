//! CWR validator CLI
//!
//! ```bash
//! cwr-validator validate CW130001EMI_059.V21        # Line-by-line format check
//! cwr-validator check CW130001EMI_059.V21 --json    # Format + document structure
//! cwr-validator rewrite CW130001EMI_059.V21 -o out.V21
//! cwr-validator schema                              # List record types
//! cwr-validator schema NWR                          # Show one layout
//! ```
//!
//! Exit status is 1 when any record or the document structure is invalid,
//! 2 when the input cannot be read at all.

use clap::{Args, Parser, Subcommand};
use cwr_validator::{
    assemble, error_report, read_file_auto, validate_file, DuplicateGroupPolicy, RejectionReason,
    SchemaRegistry, UnknownRecordPolicy, ValidateOptions, ValidationOutcome, ValidationReport, Validator,
    ValidatorConfig, LOG_BROADCASTER,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cwr-validator")]
#[command(about = "Validate CWR fixed-width interchange files", long_about = None)]
struct Cli {
    /// Do not echo progress logs to stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every line against its record layout
    Validate {
        /// Input CWR file
        input: PathBuf,

        /// Print the JSON report on stdout
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Check record layouts and the header/group/trailer structure
    Check {
        /// Input CWR file
        input: PathBuf,

        /// Print the JSON report on stdout
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Write the records back in canonical order
    Rewrite {
        /// Input CWR file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Show registered record layouts
    Schema {
        /// Record type code (all types if omitted)
        code: Option<String>,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Report unknown record types as invalid lines instead of aborting
    #[arg(long)]
    reject_unknown: bool,

    /// Drop groups repeating a transaction type without reporting them
    #[arg(long)]
    legacy_duplicates: bool,

    /// Number of rejected lines printed in detail
    #[arg(long)]
    max_reported: Option<usize>,

    /// Accept any file extension
    #[arg(long)]
    any_extension: bool,
}

impl ScanArgs {
    fn config(&self) -> Result<ValidatorConfig, Box<dyn std::error::Error>> {
        let mut config = ValidatorConfig::from_env()?;
        if self.reject_unknown {
            config = config.with_unknown_record_policy(UnknownRecordPolicy::Reject);
        }
        if self.legacy_duplicates {
            config = config.with_duplicate_group_policy(DuplicateGroupPolicy::Legacy);
        }
        if let Some(max) = self.max_reported {
            config = config.with_max_reported(max);
        }
        if self.any_extension {
            config.allowed_extensions.clear();
        }
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();
    LOG_BROADCASTER.set_quiet(cli.quiet);

    let result = match cli.command {
        Commands::Validate { input, json, scan } => cmd_scan(&input, &scan, json, false),
        Commands::Check { input, json, scan } => cmd_scan(&input, &scan, json, true),
        Commands::Rewrite { input, output, scan } => cmd_rewrite(&input, output.as_deref(), &scan),
        Commands::Schema { code } => cmd_schema(code.as_deref()),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

/// Returns whether the input is valid.
fn cmd_scan(
    input: &Path,
    scan: &ScanArgs,
    json: bool,
    structure: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut options = ValidateOptions::from_config(scan.config()?);
    if !structure {
        options = options.flat();
    }

    let outcome = match validate_file(input, &options) {
        Ok(outcome) => outcome,
        Err(e) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&error_report(&e.to_string()))?);
            }
            return Err(e.into());
        }
    };

    let valid = outcome.is_valid();
    if json {
        let report = ValidationReport::from(outcome).with_source(input.display().to_string());
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&outcome, options.config.max_reported);
    }
    Ok(valid)
}

fn print_summary(outcome: &ValidationOutcome, max_reported: usize) {
    let partition = &outcome.partition;
    println!(
        "Records: {} valid, {} invalid",
        partition.valid_records.len(),
        partition.invalid_records.len()
    );
    for rejection in partition.rejections.iter().take(max_reported) {
        println!("  line {} ({}): {}", rejection.line, rejection.type_code, rejection.reason);
        if let RejectionReason::Format(mismatch) = &rejection.reason {
            for field in &mismatch.fields {
                println!(
                    "    field {} at {} ({} x{}): {:?}",
                    field.index, field.offset, field.kind, field.width, field.found
                );
            }
        }
    }
    if partition.rejections.len() > max_reported {
        println!("  ... {} more", partition.rejections.len() - max_reported);
    }

    if let Some(document) = &outcome.document {
        let status = if document.is_rejected() { "rejected" } else { "accepted" };
        println!("Structure: {} ({} group(s))", status, document.group_count());
        for message in document.all_messages() {
            println!("  {}", message);
        }
    }
}

fn cmd_rewrite(input: &Path, output: Option<&Path>, scan: &ScanArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let config = scan.config()?;
    let decoded = read_file_auto(input, &config)?;

    let mut validator = Validator::new().with_unknown_record_policy(config.on_unknown_record);
    validator.validate_document_format(&decoded.lines)?;

    let mut document = assemble(validator.take_records(), config.duplicate_groups);
    document.validate();

    let rendered = document.render();
    match output {
        Some(path) => {
            fs::write(path, &rendered)?;
            eprintln!("Output written to: {}", path.display());
        }
        None => print!("{}", rendered),
    }

    for message in document.all_messages() {
        eprintln!("{}", message);
    }
    Ok(!document.is_rejected())
}

fn cmd_schema(code: Option<&str>) -> Result<bool, Box<dyn std::error::Error>> {
    let registry = SchemaRegistry::global();

    let Some(code) = code else {
        for code in registry.codes() {
            if let Some(layout) = registry.get(code) {
                println!("{code}  {:>4}  {}", layout.total_width(), layout.name());
            }
        }
        return Ok(true);
    };

    let code = code.to_uppercase();
    let layout = registry
        .get(&code)
        .ok_or_else(|| format!("Unknown record type '{code}'"))?;

    println!("{} - {} ({}, {} characters)", code, layout.name(), layout.kind(), layout.total_width());
    for (index, (field, offset)) in layout.fields().iter().zip(layout.offsets()).enumerate() {
        println!("  {index:>2}  {offset:>4}  {field}");
    }
    Ok(true)
}
