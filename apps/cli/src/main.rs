use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use client_core::{
    render::render_result, BriefEdit, BriefStore, GenerationBackend, HttpGenerationBackend,
    SubmissionController, SubmitOutcome,
};
use shared::domain::CampaignBrief;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, normalize_endpoint_url};

/// Submit a campaign brief to the asset generator and print the ranked assets.
#[derive(Parser, Debug)]
struct Args {
    /// Config file (defaults to ./client.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Generator base URL; overrides config and environment.
    #[arg(long)]
    endpoint: Option<String>,
    /// JSON file holding a whole brief.
    #[arg(long)]
    brief: Option<PathBuf>,
    /// Field edit applied after `--brief`, e.g. `--set platform=instagram,tiktok`.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,
    /// Only query the generator's health endpoint.
    #[arg(long)]
    check_health: bool,
}

fn parse_assignment(raw: &str) -> Result<BriefEdit> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected FIELD=VALUE, got '{raw}'"))?;
    Ok(BriefEdit::parse(field, value)?)
}

fn load_brief(path: &Path) -> Result<CampaignBrief> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read brief file '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse brief file '{}'", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(endpoint) = &args.endpoint {
        settings.endpoint_url = normalize_endpoint_url(endpoint)?;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let backend = match settings.request_timeout() {
        Some(timeout) => HttpGenerationBackend::with_timeout(&settings.endpoint_url, timeout)?,
        None => HttpGenerationBackend::new(&settings.endpoint_url),
    };
    let backend = Arc::new(backend);

    if args.check_health {
        backend
            .health()
            .await
            .with_context(|| format!("generator at {} is not healthy", backend.server_url()))?;
        println!("generator at {} is healthy", backend.server_url());
        return Ok(());
    }

    let briefs = Arc::new(BriefStore::default());
    if let Some(path) = &args.brief {
        briefs.replace(load_brief(path)?);
    }
    for assignment in &args.set {
        briefs.set_field(parse_assignment(assignment)?);
    }

    let controller = SubmissionController::new_with_backend(briefs, backend);
    match controller.submit().await {
        SubmitOutcome::Succeeded(result) => {
            if result.is_empty() {
                info!("generator returned no assets");
            }
            print!("{}", render_result(Some(&result)));
            if let Some(report) = &result.report {
                println!("report: csv={} pdf={}", report.csv, report.pdf);
            }
            Ok(())
        }
        SubmitOutcome::Failed(err) => bail!(err.notice()),
        SubmitOutcome::Ignored => bail!("a submission is already in flight"),
    }
}
