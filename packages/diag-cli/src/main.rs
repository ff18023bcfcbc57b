//! Command-line front end for the diagnostics pipeline.
//!
//! Ingests log files into a SQLite database, reprocesses stored readings
//! and prints per-order overviews.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use diagnostics::{
    CaptureStage, DisabledExtractor, ExtractedFields, Field, FieldExtractor, IngestRequest,
    IngestResponse, OpenAiFieldExtractor, Processor, ReprocessResponse, RequestContext,
    SqliteStore,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::config::Config;

type CliProcessor = Processor<SqliteStore, Box<dyn FieldExtractor>>;

#[derive(Parser)]
#[command(name = "diag")]
#[command(about = "Ingest and inspect hardware diagnostic logs")]
struct Cli {
    /// Print the JSON response instead of a summary
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a log file as a new reading
    Ingest {
        file: PathBuf,
        #[arg(long)]
        order: Uuid,
        #[arg(long)]
        device: Uuid,
        /// initial, post_repair or final
        #[arg(long, default_value = "initial", value_parser = parse_stage)]
        stage: CaptureStage,
        /// Explicit tenant; otherwise the session tenant or the order owner
        #[arg(long)]
        tenant: Option<Uuid>,
        #[arg(long)]
        session_tenant: Option<Uuid>,
    },

    /// Extract and score a log file without storing it
    Inspect { file: PathBuf },

    /// Re-run extraction over a stored reading
    Reprocess { id: Uuid },

    /// Show the readings of an order by stage
    ShowOrder { order: Uuid },

    /// Record which tenant owns an order
    RegisterOrder {
        order: Uuid,
        #[arg(long)]
        tenant: Uuid,
    },
}

fn parse_stage(s: &str) -> std::result::Result<CaptureStage, String> {
    CaptureStage::parse(s).ok_or_else(|| format!("unknown stage {s:?}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,diagnostics=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let processor = build_processor(&config).await?;

    match cli.command {
        Commands::Ingest {
            file,
            order,
            device,
            stage,
            tenant,
            session_tenant,
        } => {
            let content = read_log(&file).await?;
            let file_name = file_name(&file);
            let mut request = IngestRequest::new(order, device, stage, file_name, content);
            request.tenant_id = tenant;
            let context = RequestContext {
                session_tenant_id: session_tenant,
            };
            cmd_ingest(&processor, request, &context, cli.json).await
        }
        Commands::Inspect { file } => {
            let content = read_log(&file).await?;
            cmd_inspect(&processor, &file_name(&file), &content).await
        }
        Commands::Reprocess { id } => cmd_reprocess(&processor, id, cli.json).await,
        Commands::ShowOrder { order } => cmd_show_order(&processor, order, cli.json).await,
        Commands::RegisterOrder { order, tenant } => {
            processor.store().register_order_owner(order, tenant).await?;
            println!("{} order {} → tenant {}", "✓".green(), order, tenant);
            Ok(())
        }
    }
}

async fn build_processor(config: &Config) -> Result<CliProcessor> {
    let store = SqliteStore::new(&config.database_url)
        .await
        .context("Failed to open database")?;

    let extractor: Box<dyn FieldExtractor> = match &config.openai_api_key {
        Some(key) => {
            let mut openai = OpenAiFieldExtractor::new(key.clone());
            if let Some(model) = &config.openai_model {
                openai = openai.with_model(model.clone());
            }
            tracing::info!(model = openai.model(), "Fallback extraction enabled");
            Box::new(openai)
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set; fallback extraction disabled");
            Box::new(DisabledExtractor)
        }
    };

    Ok(Processor::with_config(store, extractor, config.pipeline()))
}

/// Read a log, replacing invalid UTF-8 rather than rejecting the upload.
async fn read_log(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn cmd_ingest(
    processor: &CliProcessor,
    request: IngestRequest,
    context: &RequestContext,
    json: bool,
) -> Result<()> {
    let result = processor.ingest(request, context).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&IngestResponse::from(&result))?);
        return Ok(());
    }

    match result {
        Ok(outcome) => {
            let reading = &outcome.reading;
            println!("{} reading {}", "✓".green(), reading.id);
            println!("  family:   {}", reading.source_family);
            println!("  score:    {}", score_label(reading.health_score));
            if reading.fallback_used {
                println!("  {}", "fallback service contributed".yellow());
            }
            print_fields(&reading.fields);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e.user_message());
            Err(e.into())
        }
    }
}

async fn cmd_inspect(processor: &CliProcessor, file_name: &str, content: &str) -> Result<()> {
    let analysis = processor.analyze(file_name, content).await?;
    println!("{} {}", "family:".bold(), analysis.extraction.family);
    println!("{} {}", "score:".bold(), score_label(analysis.breakdown.score));
    println!(
        "{} {:?}",
        "stages:".bold(),
        analysis.extraction.stages_run
    );
    for field in &analysis.extraction.from_fallback {
        println!("  {} {}", "from fallback:".yellow(), field);
    }
    print_fields(&analysis.extraction.fields);
    Ok(())
}

async fn cmd_reprocess(processor: &CliProcessor, id: Uuid, json: bool) -> Result<()> {
    let result = processor.reprocess(id).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&ReprocessResponse::from(&result))?);
        return Ok(());
    }

    let outcome = result?;
    println!("{} reprocessed {}", "✓".green(), outcome.reading_id);
    println!("  family:   {}", outcome.source_family);
    println!("  score:    {}", score_label(outcome.health_score));
    print_fields(&outcome.updated_fields);
    Ok(())
}

async fn cmd_show_order(processor: &CliProcessor, order: Uuid, json: bool) -> Result<()> {
    let overview = processor.order_overview(order).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
        return Ok(());
    }

    println!(
        "{} {} ({} readings)",
        "Order".bold(),
        overview.order_id,
        overview.reading_count
    );
    for snapshot in &overview.stages {
        println!();
        println!(
            "{} {}  score {}",
            "▸".cyan(),
            snapshot.stage.as_str().bold(),
            score_label(snapshot.health_score)
        );
        print_fields(&snapshot.fields);
    }
    println!();
    println!("{}", "Latest values".bold());
    print_fields(&overview.latest);
    Ok(())
}

fn score_label(score: u8) -> String {
    let text = score.to_string();
    match score {
        0 => "no data".dimmed().to_string(),
        1..=59 => text.red().to_string(),
        60..=84 => text.yellow().to_string(),
        _ => text.green().to_string(),
    }
}

fn print_fields(fields: &ExtractedFields) {
    for field in Field::ALL {
        if let Some(value) = fields.get(field) {
            println!("  {:<28} {}", field.name().dimmed(), value);
        }
    }
}
