//! Name Trends Core - classification and narrative enrichment
//!
//! The entry point for nt-core:
//! - Enrich boys/girls snapshots in place (or into an output directory)
//! - Inspect rule classifications without writing anything
//! - Validate configuration and snapshot shape
//! - Print JSON Schema for the persisted documents

use std::path::{Path, PathBuf};

use clap::{ArgGroup, Args, Parser, Subcommand};
use nt_common::{Error, Gender, NameRecord, OutputFormat, StructuredError, SCHEMA_VERSION};
use nt_config::{load_config, LoadedConfig, ValidationError, CONFIG_SCHEMA_VERSION};
use nt_core::classify::{
    classify_historic, classify_recent, matching_rules, ClusterJoin, HistoricFeatures, LabelTable,
    RecentFeatures, Rule, HISTORIC_RULES, RECENT_RULES,
};
use nt_core::exit_codes::ExitCode;
use nt_core::logging::{generate_run_id, init_logging, LogConfig, LogFormat};
use nt_core::pipeline::{check_shapes, enrich, EnrichmentReport, LabelTables};
use nt_core::schema::{available_schemas, generate_all_schemas, generate_schema};
use nt_core::snapshot::{
    load_collection, load_snapshot, save_partition, save_search_index, SnapshotError,
};
use serde_json::{json, Value};
use tracing::{error, info, info_span, warn};

/// Column holding the label in the five-year and historic archetype tables.
const ARCHETYPE_COLUMN: &str = "archetype";

/// Name Trends Core - baby-name trend classification and narratives
#[derive(Parser)]
#[command(name = "nt-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to trends.json (overrides NAME_TRENDS_CONFIG and the XDG lookup)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    quiet: u8,

    /// Log line format on stderr: human or jsonl
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every enrichment pass over the gender snapshots
    Enrich(EnrichArgs),

    /// Show rule labels for a snapshot without modifying it
    Classify(ClassifyArgs),

    /// Validate configuration and, when given, snapshot shape
    Check(CheckArgs),

    /// Print JSON Schema for persisted documents
    Schema(SchemaArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("snapshots").required(true).multiple(true).args(["boys", "girls"])))]
struct EnrichArgs {
    /// Boys snapshot (JSON array of name records)
    #[arg(long)]
    boys: Option<PathBuf>,

    /// Girls snapshot (JSON array of name records)
    #[arg(long)]
    girls: Option<PathBuf>,

    /// Write enriched snapshots into this directory instead of in place
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Five-year archetype table (name, optional gender, archetype)
    #[arg(long)]
    five_year: Option<PathBuf>,

    /// Popular-bucket cluster features (name, optional gender, cluster_kmeans)
    #[arg(long, requires_all = ["popular_archetypes", "unpopular_features", "unpopular_archetypes"])]
    popular_features: Option<PathBuf>,

    /// Popular-bucket cluster archetypes (cluster, archetype)
    #[arg(long, requires = "popular_features")]
    popular_archetypes: Option<PathBuf>,

    /// Unpopular-bucket cluster features
    #[arg(long, requires = "popular_features")]
    unpopular_features: Option<PathBuf>,

    /// Unpopular-bucket cluster archetypes
    #[arg(long, requires = "popular_features")]
    unpopular_archetypes: Option<PathBuf>,

    /// Historic archetype overrides (name, gender, archetype)
    #[arg(long)]
    historic_archetypes: Option<PathBuf>,

    /// Also write the search index to this path
    #[arg(long)]
    search_index: Option<PathBuf>,

    /// Run every pass but write nothing
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    /// Snapshot to read
    snapshot: PathBuf,

    /// Only records with this name (case-insensitive)
    #[arg(long)]
    name: Option<String>,

    /// List every matching rule with its condition, not just the winner
    #[arg(long)]
    explain: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[arg(long)]
    boys: Option<PathBuf>,

    #[arg(long)]
    girls: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type to print (see --list)
    type_name: Option<String>,

    /// List available schema types
    #[arg(long, conflicts_with_all = ["type_name", "all"])]
    list: bool,

    /// Print every schema keyed by type name
    #[arg(long, conflicts_with = "type_name")]
    all: bool,
}

struct RunContext<'a> {
    global: &'a GlobalOpts,
    run_id: String,
}

/// A command failure with the file it concerns, when there is one.
struct Failure {
    error: Error,
    path: Option<PathBuf>,
}

impl Failure {
    fn at(error: Error, path: &Path) -> Self {
        Failure {
            error,
            path: Some(path.to_path_buf()),
        }
    }
}

impl From<Error> for Failure {
    fn from(error: Error) -> Self {
        Failure { error, path: None }
    }
}

impl From<SnapshotError> for Failure {
    fn from(err: SnapshotError) -> Self {
        Failure::at(Error::from(&err), err.path())
    }
}

fn main() {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env(None, cli.global.log_format);
    log_config.level = log_config
        .level
        .adjusted(cli.global.verbose, cli.global.quiet);
    init_logging(&log_config);

    let ctx = RunContext {
        global: &cli.global,
        run_id: generate_run_id(),
    };
    let span = info_span!("run", run_id = %ctx.run_id);
    let _entered = span.enter();

    let result = match &cli.command {
        Commands::Enrich(args) => run_enrich(&ctx, args),
        Commands::Classify(args) => run_classify(&ctx, args),
        Commands::Check(args) => run_check(&ctx, args),
        Commands::Schema(args) => run_schema(&ctx, args),
        Commands::Version => {
            print_version(&ctx);
            Ok(ExitCode::Clean)
        }
    };
    let exit_code = result.unwrap_or_else(|failure| report_failure(&ctx, &failure));

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Commands
// ============================================================================

fn run_enrich(ctx: &RunContext, args: &EnrichArgs) -> Result<ExitCode, Failure> {
    let loaded = load_trends(ctx.global)?;
    let tables = load_tables(args)?;
    let mut collection = load_collection(args.boys.as_deref(), args.girls.as_deref())?;

    let report = enrich(&mut collection, &tables, &loaded.config);

    let mut written = Vec::new();
    if args.dry_run {
        info!("dry run; nothing written");
    } else {
        for (source, gender) in [
            (args.boys.as_deref(), Gender::Boy),
            (args.girls.as_deref(), Gender::Girl),
        ] {
            let Some(source) = source else { continue };
            let target = output_path(source, args.output_dir.as_deref());
            save_partition(&target, &collection, gender)?;
            written.push(target);
        }
        if let Some(index) = &args.search_index {
            save_search_index(index, &collection)?;
            written.push(index.clone());
        }
    }

    let exit_code = if report.is_clean() {
        ExitCode::Clean
    } else {
        warn!(issues = report.issues.len(), "some records had structural issues");
        ExitCode::PartialFail
    };

    match ctx.global.format {
        OutputFormat::Json => print_json(&envelope(
            ctx,
            "enrich",
            json!({
                "dry_run": args.dry_run,
                "config_source": loaded.source.to_string(),
                "written": written,
                "report": report,
                "exit_code": exit_code.code_name(),
            }),
        )),
        OutputFormat::Summary => println!(
            "[{}] enriched {} records, {} issues{}",
            ctx.run_id,
            report.records,
            report.issues.len(),
            if args.dry_run { " (dry run)" } else { "" }
        ),
        OutputFormat::Md => println!("{}", report_markdown(&report)),
    }
    Ok(exit_code)
}

fn run_classify(ctx: &RunContext, args: &ClassifyArgs) -> Result<ExitCode, Failure> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let records = &snapshot.records;
    let wanted = args.name.as_deref().map(|n| n.trim().to_lowercase());
    let selected: Vec<&NameRecord> = records
        .iter()
        .filter(|r| {
            wanted
                .as_deref()
                .map_or(true, |w| r.name.trim().to_lowercase() == w)
        })
        .collect();
    if selected.is_empty() {
        warn!(name = ?args.name, "no matching records");
    }

    match ctx.global.format {
        OutputFormat::Json => {
            let rows: Vec<Value> = selected
                .iter()
                .map(|r| classification_row(r, args.explain))
                .collect();
            let unreadable: Vec<Value> = snapshot
                .unreadable
                .iter()
                .map(|e| json!({ "index": e.index, "name": e.name, "reason": e.reason }))
                .collect();
            print_json(&envelope(
                ctx,
                "classify",
                json!({ "snapshot": args.snapshot, "records": rows, "unreadable": unreadable }),
            ));
        }
        OutputFormat::Summary => println!(
            "[{}] classified {} of {} records, {} unreadable",
            ctx.run_id,
            selected.len(),
            records.len(),
            snapshot.unreadable.len()
        ),
        OutputFormat::Md => {
            println!("| name | recent | historic |");
            println!("|------|--------|----------|");
            for r in &selected {
                println!(
                    "| {} | {} | {} |",
                    r.name,
                    classify_recent(&r.rank_from_1996),
                    classify_historic(&r.rank_historic)
                );
            }
        }
    }
    Ok(ExitCode::Clean)
}

fn run_check(ctx: &RunContext, args: &CheckArgs) -> Result<ExitCode, Failure> {
    let loaded = load_trends(ctx.global)?;
    let mut issues = Vec::new();
    let mut records = 0;
    if args.boys.is_some() || args.girls.is_some() {
        let mut collection = load_collection(args.boys.as_deref(), args.girls.as_deref())?;
        records = collection.len();
        issues = check_shapes(&mut collection);
    }
    let exit_code = if issues.is_empty() {
        ExitCode::Clean
    } else {
        ExitCode::PartialFail
    };

    match ctx.global.format {
        OutputFormat::Json => print_json(&envelope(
            ctx,
            "check",
            json!({
                "config": {
                    "status": "ok",
                    "source": loaded.source.to_string(),
                    "path": loaded.path,
                },
                "records": records,
                "issues": issues,
                "exit_code": exit_code.code_name(),
            }),
        )),
        OutputFormat::Summary => println!(
            "[{}] config ok ({}), {} records, {} issues",
            ctx.run_id,
            loaded.source,
            records,
            issues.len()
        ),
        OutputFormat::Md => {
            println!("# nt-core check\n");
            println!("- config: ok ({})", loaded.source);
            println!("- records: {records}");
            for issue in &issues {
                println!(
                    "- {} #{} `{}`: {}",
                    issue.gender, issue.index, issue.name, issue.issue
                );
            }
        }
    }
    Ok(exit_code)
}

fn run_schema(ctx: &RunContext, args: &SchemaArgs) -> Result<ExitCode, Failure> {
    if args.list {
        match ctx.global.format {
            OutputFormat::Json => {
                let types: Vec<Value> = available_schemas()
                    .into_iter()
                    .map(|(name, description)| json!({ "name": name, "description": description }))
                    .collect();
                print_json(&json!({ "schemas": types }));
            }
            _ => {
                for (name, description) in available_schemas() {
                    println!("{name:<16} {description}");
                }
            }
        }
        return Ok(ExitCode::Clean);
    }

    match args.type_name.as_deref() {
        Some(name) if !args.all => match generate_schema(name) {
            Some(schema) => print_json(&schema),
            None => {
                eprintln!("nt-core: unknown schema type '{name}' (see `nt-core schema --list`)");
                return Ok(ExitCode::ArgsError);
            }
        },
        _ => print_json(&json!(generate_all_schemas())),
    }
    Ok(ExitCode::Clean)
}

fn print_version(ctx: &RunContext) {
    match ctx.global.format {
        OutputFormat::Json => print_json(&json!({
            "schema_version": SCHEMA_VERSION,
            "config_schema_version": CONFIG_SCHEMA_VERSION,
            "nt_core_version": env!("CARGO_PKG_VERSION"),
            "rust_version": env!("CARGO_PKG_RUST_VERSION"),
        })),
        _ => {
            println!("nt-core {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {SCHEMA_VERSION}");
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn load_trends(global: &GlobalOpts) -> Result<LoadedConfig, Failure> {
    let loaded = load_config(global.config.as_deref()).map_err(|e| Failure {
        error: match e {
            ValidationError::VersionMismatch { expected, actual } => {
                Error::SchemaVersion(format!("{actual} (this build reads {expected})"))
            }
            other => Error::Config(other.to_string()),
        },
        path: global.config.clone(),
    })?;
    info!(source = %loaded.source, path = ?loaded.path, "configuration loaded");
    Ok(loaded)
}

fn load_tables(args: &EnrichArgs) -> Result<LabelTables, Failure> {
    let load = |path: &Path| {
        LabelTable::load(path, ARCHETYPE_COLUMN).map_err(|e| Failure::at(e, path))
    };
    let five_year = args.five_year.as_deref().map(load).transpose()?;
    let historic_archetypes = args.historic_archetypes.as_deref().map(load).transpose()?;
    let recent_clusters = match (
        &args.popular_features,
        &args.popular_archetypes,
        &args.unpopular_features,
        &args.unpopular_archetypes,
    ) {
        (Some(pf), Some(pa), Some(uf), Some(ua)) => Some(ClusterJoin::load(pf, pa, uf, ua)?),
        _ => None,
    };
    Ok(LabelTables {
        five_year,
        recent_clusters,
        historic_archetypes,
    })
}

fn output_path(source: &Path, output_dir: Option<&Path>) -> PathBuf {
    match (output_dir, source.file_name()) {
        (Some(dir), Some(file)) => dir.join(file),
        _ => source.to_path_buf(),
    }
}

fn classification_row(record: &NameRecord, explain: bool) -> Value {
    let mut row = json!({
        "name": record.name,
        "gender": record.gender,
        "recent": classify_recent(&record.rank_from_1996).label(),
        "historic": classify_historic(&record.rank_historic).label(),
    });
    if explain {
        let recent = RecentFeatures::from_values(&record.rank_from_1996);
        let historic = HistoricFeatures::from_values(&record.rank_historic);
        row["recent_matches"] = json!(explain_rules(RECENT_RULES, recent.as_ref()));
        row["historic_matches"] = json!(explain_rules(HISTORIC_RULES, historic.as_ref()));
    }
    row
}

fn explain_rules<F, L>(rules: &[Rule<F, L>], features: Option<&F>) -> Vec<Value>
where
    L: Copy + std::fmt::Display,
{
    let Some(features) = features else {
        return Vec::new();
    };
    matching_rules(rules, features)
        .into_iter()
        .map(|rule| json!({ "label": rule.label.to_string(), "condition": rule.description }))
        .collect()
}

fn report_markdown(report: &EnrichmentReport) -> String {
    let mut out = format!("# Enrichment report\n\nRecords: {}\n", report.records);
    for (title, counts) in [
        ("Five-year", &report.five_year),
        ("Recent", &report.recent),
        ("Historic", &report.historic),
        ("Tags", &report.tags),
    ] {
        if counts.is_empty() {
            continue;
        }
        out.push_str(&format!("\n## {title}\n\n| label | records |\n|-------|---------|\n"));
        for (label, n) in counts {
            out.push_str(&format!("| {label} | {n} |\n"));
        }
    }
    out.push_str(&format!(
        "\nRetargeted: {}, overridden: {}, refined: {}, issues: {}\n",
        report.retargeted,
        report.overridden,
        report.refined,
        report.issues.len()
    ));
    out
}

fn envelope(ctx: &RunContext, command: &str, payload: Value) -> Value {
    let mut doc = json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": ctx.run_id,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "command": command,
    });
    if let (Some(fields), Value::Object(extra)) = (doc.as_object_mut(), payload) {
        fields.extend(extra);
    }
    doc
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("nt-core: failed to render output: {e}"),
    }
}

fn report_failure(ctx: &RunContext, failure: &Failure) -> ExitCode {
    let err = &failure.error;
    let exit_code = ExitCode::for_error(err);
    error!(code = err.code(), category = %err.category(), path = ?failure.path, "{err}");

    match ctx.global.format {
        OutputFormat::Json => {
            let mut structured = StructuredError::from(err);
            if let Some(path) = &failure.path {
                structured = structured.with_context("path", path.display().to_string());
            }
            print_json(&envelope(
                ctx,
                "error",
                json!({ "error": structured, "exit_code": exit_code.code_name() }),
            ));
        }
        _ => {
            eprintln!("nt-core: {}: {err}", err.headline());
            eprintln!("  {}", err.remediation());
        }
    }
    exit_code
}
