//! fgd - FGD entity schema inspector
//!
//! Parses an FGD file and prints its entity classes.
//!
//! # Usage
//!
//! ```bash
//! fgd base.fgd                      # JSON entity list
//! fgd base.fgd --format summary     # one line per class
//! fgd base.fgd --class light        # editable fields of one class
//! fgd base.fgd --class light --field wait
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use fgd_core::{
    error::Result,
    fgd::{self, ParserConfig, ScanLimit},
    schema::{validate_schema, Schema},
    FGD_EXTENSION,
};

/// Output format for the parsed schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Entity classes as pretty-printed JSON
    Json,
    /// One line per entity class
    Summary,
    /// Classnames with descriptions
    Classes,
}

/// FGD entity schema inspector
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the FGD file
    #[arg(value_name = "FGD_FILE")]
    fgd_file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Print the editable fields of this entity class instead
    #[arg(short, long, value_name = "CLASSNAME")]
    class: Option<String>,

    /// Print a single field of `--class`
    #[arg(long, value_name = "FIELD", requires = "class")]
    field: Option<String>,

    /// Cap bounded scans at a fixed number of characters
    #[arg(long, value_name = "N")]
    scan_limit: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    let extension = args.fgd_file.extension().and_then(|e| e.to_str());
    if !extension.is_some_and(|e| e.eq_ignore_ascii_case(FGD_EXTENSION)) {
        log::warn!(
            "{} does not have a .{} extension",
            args.fgd_file.display(),
            FGD_EXTENSION
        );
    }

    let config = match args.scan_limit {
        Some(limit) => ParserConfig::new().with_scan_limit(ScanLimit::Fixed(limit)),
        None => ParserConfig::new(),
    };

    // Parse the FGD file
    let document = fgd::parse_file(&args.fgd_file, &config)?;
    if !document.diagnostics.is_empty() {
        log::info!("{} recoverable problems while parsing", document.diagnostics.len());
    }

    // Build and validate the schema
    let schema = Schema::from_entities(document.entities, Some(args.fgd_file.clone()))?;
    validate_schema(&schema)?;

    if let (Some(classname), Some(name)) = (&args.class, &args.field) {
        let field = schema.field(classname, name)?;
        println!("{}", serde_json::to_string_pretty(&field)?);
        return Ok(());
    }

    if let Some(classname) = &args.class {
        let fields = schema.fields_for(classname)?;
        println!("{}", serde_json::to_string_pretty(&fields)?);
        return Ok(());
    }

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(schema.classes())?),
        Format::Summary => print_summary(&schema),
        Format::Classes => {
            for option in schema.class_options() {
                println!("{}\t{}", option.classname, option.description);
            }
        }
    }

    Ok(())
}

fn print_summary(schema: &Schema) {
    let source = schema
        .source()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    println!("FGD: {} ({} classes)", source, schema.classes().len());
    for class in schema.classes() {
        let base = class.base.as_deref().unwrap_or("-");
        println!(
            "  {:<12} {:<32} {:>3} attributes  base: {}",
            class.class_type,
            class.classname,
            class.attributes.len(),
            base
        );
    }
}
