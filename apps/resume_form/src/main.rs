use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_form::backend::{HttpBackend, ResumeBackend, Upload};
use resume_form::config::Config;
use resume_form::controller::{DirectorySurface, FormSyncController};
use resume_form::form::{FieldId, FormState, GroupKind};

/// Headless driver for the resume form. The form lives in a JSON file and is
/// written back after every command.
#[derive(Parser, Debug)]
#[command(name = "resume-form", version)]
struct Cli {
    /// Form state file; created on first write if missing.
    #[arg(long, default_value = "form.json")]
    form: PathBuf,
    /// Overrides RESUME_API_BASE.
    #[arg(long)]
    api_base: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the .docx resume from the form.
    Generate,
    /// Rewrite one field through the backend enhancer.
    Enhance { field: FieldId },
    /// Fill the form from a resume file.
    Analyze { file: Option<PathBuf> },
    /// Fill the form from pasted resume text.
    AnalyzeText { text: String },
    /// Ask for a career review of a resume file.
    Review { file: Option<PathBuf> },
    /// Append an empty education or experience group.
    AddGroup { kind: GroupKind },
    /// Remove the group at INDEX (0-based).
    RemoveGroup { kind: GroupKind, index: usize },
    /// Check that the backend is reachable.
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(base) = cli.api_base.as_deref() {
        config.override_api_base(base);
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(api_base = %config.api_base, "Starting resume-form v{}", env!("CARGO_PKG_VERSION"));

    let backend = Arc::new(HttpBackend::new(&config).context("Failed to build HTTP client")?);
    let touches_form = !matches!(cli.command, Command::Health);

    let form = load_form(&cli.form).await?;
    let controller = FormSyncController::new(
        Arc::new(Mutex::new(form)),
        backend.clone(),
        Arc::new(DirectorySurface::new(&config.download_dir)),
        config.summary_policy,
    );

    let outcome = run(&controller, backend.as_ref(), cli.command).await;

    // Saved even when the command failed: failures update the status line.
    if touches_form {
        save_form(&cli.form, &controller.snapshot().await).await?;
    }
    outcome
}

async fn run(
    controller: &FormSyncController,
    backend: &dyn ResumeBackend,
    command: Command,
) -> Result<()> {
    match command {
        Command::Generate => {
            let file_name = controller.generate().await?;
            println!("saved {file_name}");
        }
        Command::Enhance { field } => {
            let value = controller.enhance(field).await?;
            println!("{value}");
        }
        Command::Analyze { file } => {
            let upload = read_upload(file.as_deref()).await?;
            let outcome = controller.analyze(upload).await;
            println!("{}", controller.snapshot().await.status);
            outcome?;
        }
        Command::AnalyzeText { text } => {
            let outcome = controller.analyze_text(&text).await;
            println!("{}", controller.snapshot().await.status);
            outcome?;
        }
        Command::Review { file } => {
            let upload = read_upload(file.as_deref()).await?;
            let outcome = controller.review(upload).await;
            let form = controller.snapshot().await;
            println!("{}", form.status);
            outcome?;
            println!("{}", form.review);
        }
        Command::AddGroup { kind } => {
            let index = controller.form().lock().await.add_group(kind);
            println!("added group {index}");
        }
        Command::RemoveGroup { kind, index } => {
            if !controller.form().lock().await.remove_group(kind, index) {
                anyhow::bail!("no group at index {index}");
            }
        }
        Command::Health => {
            println!("{}", backend.health().await?);
        }
    }
    Ok(())
}

async fn read_upload(path: Option<&Path>) -> Result<Option<Upload>> {
    match path {
        Some(path) => Ok(Some(
            Upload::from_path(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
        )),
        None => Ok(None),
    }
}

async fn load_form(path: &Path) -> Result<FormState> {
    match tokio::fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .with_context(|| format!("{} is not a valid form file", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FormState::default()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

async fn save_form(path: &Path, form: &FormState) -> Result<()> {
    let json = serde_json::to_vec_pretty(form)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
