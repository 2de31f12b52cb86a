//! Command-line front for the applicant intake API.
//!
//! Reads INTAKE_API_URL, INTAKE_TIMEOUT_SECS and INTAKE_FALLBACK_PATH. Submissions and
//! analytics are parked in the fallback file when the backend cannot be reached.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use applicant_intake::{
    client::{
        assemble, AnalyticsRecorder, ApplicationForm, ClientConfig, FallbackStore, FileEncoder,
        JsonFileFallbackStore, SelectedFile, SubmissionClient,
    },
    modules::application::{ApplicationStatus, FileCategory},
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "intake-apply", about = "Applicant intake CLI")]
struct Cli {
    /// Backend base URL, including the /api prefix [default: $INTAKE_API_URL]
    #[arg(long)]
    api_url: Option<String>,
    /// Seconds before a remote call counts as unreachable [default: $INTAKE_TIMEOUT_SECS]
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Local JSON document used when the backend is unreachable
    #[arg(long, env = "INTAKE_FALLBACK_PATH", default_value = "intake-fallback.json")]
    fallback_path: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode documents and submit a new application
    Apply {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        experience: Option<String>,
        #[arg(long)]
        message: Option<String>,
        /// Passport copy (required, repeatable)
        #[arg(long)]
        passport: Vec<PathBuf>,
        #[arg(long)]
        cv: Vec<PathBuf>,
        #[arg(long)]
        certificates: Vec<PathBuf>,
        #[arg(long = "other-documents")]
        other_documents: Vec<PathBuf>,
    },
    /// List active applications
    List,
    /// Change the review status of an application
    Status {
        id: String,
        /// pending, reviewed, accepted, rejected or any custom value
        status: String,
    },
    /// Archive an application; it is deleted for good 14 days later
    Archive { id: String },
    /// Delete an application immediately
    Delete { id: String },
    /// Count a page view for today
    PageView,
    /// Count a click on a social link for today
    SocialClick { platform: String },
    /// Show the analytics summary
    Analytics,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

async fn select_files(
    encoder: &mut FileEncoder,
    category: FileCategory,
    paths: Vec<PathBuf>,
) -> anyhow::Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(SelectedFile::from_path(path).await?);
    }
    encoder.select(category, files)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config = ClientConfig::new(api_url).with_timeout(config.timeout);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let fallback: Arc<dyn FallbackStore> = Arc::new(JsonFileFallbackStore::new(cli.fallback_path));
    let submissions = SubmissionClient::new(&config, fallback.clone())?;
    let analytics = AnalyticsRecorder::new(&config, fallback)?;

    match cli.command {
        Commands::Apply {
            name,
            email,
            phone,
            experience,
            message,
            passport,
            cv,
            certificates,
            other_documents,
        } => {
            let mut encoder = FileEncoder::new();
            select_files(&mut encoder, FileCategory::Passport, passport).await?;
            select_files(&mut encoder, FileCategory::Cv, cv).await?;
            select_files(&mut encoder, FileCategory::Certificates, certificates).await?;
            select_files(&mut encoder, FileCategory::OtherDocuments, other_documents).await?;
            let files = encoder.encode().await?;

            let form = ApplicationForm { name, email, phone, experience, message };
            let application = assemble(form, files)?;

            let page_view = analytics.record_page_view();
            let ack = submissions.submit(&application).await?;
            page_view.await.ok();

            print_json(&serde_json::json!({
                "success": true,
                "id": application.id,
                "delivery": ack.delivery,
                "message": ack.message,
            }))?;
        }
        Commands::List => {
            print_json(&submissions.list().await?)?;
        }
        Commands::Status { id, status } => {
            let ack = submissions.update_status(&id, ApplicationStatus::from(status)).await?;
            print_json(&serde_json::json!({ "success": true, "message": ack.message }))?;
        }
        Commands::Archive { id } => {
            let (ack, archived) = submissions.archive(&id).await?;
            print_json(&serde_json::json!({
                "success": true,
                "message": ack.message,
                "data": archived,
            }))?;
        }
        Commands::Delete { id } => {
            let ack = submissions.delete(&id).await?;
            print_json(&serde_json::json!({ "success": true, "message": ack.message }))?;
        }
        Commands::PageView => {
            analytics.record_page_view().await.context("Analytics task panicked")?;
        }
        Commands::SocialClick { platform } => {
            analytics.record_social_click(platform).await.context("Analytics task panicked")?;
        }
        Commands::Analytics => {
            print_json(&analytics.summary().await?)?;
        }
    }

    Ok(())
}
