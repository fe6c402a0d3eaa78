//! repogen CLI - generate data-access code from table structures
//!
//! Reads repogen.yaml plus a schema file (or directory), then writes the
//! default repositories, default managers and facade units.

use clap::{Args, Parser, Subcommand};
use repogen::codegen::{Generator, GeneratorConfig, TableStructureSource, YamlStructureSource};
use repogen::runtime::{entity_key, query_key, Parameters, SqlValue};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "repogen")]
#[command(version, about = "Schema-driven generator for repositories, managers and facades", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Inputs {
    /// Path to repogen.yaml
    #[arg(short, long, default_value = "repogen.yaml")]
    config: PathBuf,

    /// Schema file, or directory of schema files
    #[arg(short, long, default_value = "schema")]
    schema: PathBuf,

    /// Restrict the run to these tables (repeatable)
    #[arg(short, long = "table")]
    tables: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate default repositories, default managers and facades
    Generate {
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Report generated files that are missing, modified or orphaned
    Check {
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Validate configuration and schema without writing anything
    Validate {
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Print a result-cache key
    CacheKey {
        #[command(subcommand)]
        key: CacheKeyCommand,
    },
}

#[derive(Subcommand)]
enum CacheKeyCommand {
    /// Key of one entity, from its ordered primary-key values
    Entity {
        table: String,
        values: Vec<String>,
    },

    /// Key of a query result set
    Query {
        table: String,
        sql: String,

        /// Named parameter as name=value (repeatable, order matters)
        #[arg(short, long = "param", conflicts_with = "positional")]
        params: Vec<String>,

        /// Positional parameter value (repeatable)
        #[arg(long = "positional")]
        positional: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repogen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate { inputs } => generate(inputs),
        Commands::Check { inputs } => check(inputs),
        Commands::Validate { inputs } => validate(inputs),
        Commands::CacheKey { key } => cache_key(key),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load(inputs: &Inputs) -> Result<(Generator, YamlStructureSource), String> {
    let config = GeneratorConfig::from_file(&inputs.config).map_err(|e| e.to_string())?;
    let generator = Generator::new(config).map_err(|e| e.to_string())?;
    Ok((generator, YamlStructureSource::new(&inputs.schema)))
}

fn generate(inputs: Inputs) -> Result<(), String> {
    let (generator, source) = load(&inputs)?;
    let report = generator
        .generate(&source, &inputs.tables)
        .map_err(|e| e.to_string())?;

    println!("✓ {}", report);
    Ok(())
}

fn check(inputs: Inputs) -> Result<(), String> {
    let (generator, source) = load(&inputs)?;
    let tables = source.retrieve(&inputs.tables).map_err(|e| e.to_string())?;
    let stale = generator.check(&tables).map_err(|e| e.to_string())?;

    if stale.is_empty() {
        println!("✓ Generated code is up to date");
        return Ok(());
    }

    for unit in &stale {
        println!("  {}: {}", unit.staleness, unit.path.display());
    }
    Err(format!(
        "{} generated file(s) out of date; run `repogen generate`",
        stale.len()
    ))
}

fn validate(inputs: Inputs) -> Result<(), String> {
    let (generator, source) = load(&inputs)?;
    let tables = source.retrieve(&inputs.tables).map_err(|e| e.to_string())?;
    let rendering = generator.render(&tables).map_err(|e| e.to_string())?;

    println!("✓ Configuration valid: output namespace {}", generator.namespaces().output);
    println!("✓ {} table(s), {} finder(s)", rendering.report.tables, rendering.report.finders);
    if !rendering.report.skipped_tables.is_empty() {
        println!(
            "  ℹ Skipped tables: {}",
            rendering.report.skipped_tables.join(", ")
        );
    }
    Ok(())
}

/// JSON scalars (`1`, `true`, `null`, `"1"`) keep their type; anything
/// else is text.
fn parse_value(raw: &str) -> SqlValue {
    serde_json::from_str(raw).unwrap_or_else(|_| SqlValue::Text(raw.to_string()))
}

fn cache_key(key: CacheKeyCommand) -> Result<(), String> {
    match key {
        CacheKeyCommand::Entity { table, values } => {
            let values: Vec<SqlValue> = values.iter().map(|raw| parse_value(raw)).collect();
            println!("{}", entity_key(&table, &values));
        }
        CacheKeyCommand::Query {
            table,
            sql,
            params,
            positional,
        } => {
            let parameters = if params.is_empty() {
                Parameters::positional(positional.iter().map(|raw| parse_value(raw)))
            } else {
                let mut named = Vec::with_capacity(params.len());
                for param in &params {
                    let (name, raw) = param
                        .split_once('=')
                        .ok_or_else(|| format!("Expected name=value, got '{}'", param))?;
                    named.push((name.trim_start_matches(':').to_string(), parse_value(raw)));
                }
                Parameters::named(named)
            };
            println!("{}", query_key(&table, &sql, &parameters));
        }
    }
    Ok(())
}
