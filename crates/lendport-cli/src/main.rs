//! Lendport CLI: upload product artifacts through a presigned URL.
//!
//! Set LENDPORT_API_KEY and LENDPORT_API_URL (or API_URL). Uses X-API-Key auth
//! unless LENDPORT_AUTH_SCHEME=bearer.

use anyhow::Context;
use clap::{Parser, Subcommand};
use lendport_api_client::ApiClient;
use lendport_cli::{init_tracing, upload_file, UploadArgs};
use lendport_core::{ArtifactKind, UploadError};
use lendport_storage::PresignedPutTransfer;
use lendport_upload::UploadCoordinator;
use serde::Serialize;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "lendport", about = "Lendport artifact upload CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a product image or document template
    Upload {
        /// Path to the file to upload
        file: std::path::PathBuf,
        /// Owner entity id (e.g. product id)
        #[arg(long)]
        owner: String,
        /// Version number the artifact belongs to
        #[arg(long)]
        version: u32,
        /// Artifact kind: image, document-template
        #[arg(long, default_value = "image")]
        kind: ArtifactKind,
        /// Override the MIME type guessed from the file extension
        #[arg(long)]
        content_type: Option<String>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = ApiClient::from_env().context(
        "Failed to create API client. Set LENDPORT_API_KEY and LENDPORT_API_URL (or API_URL)",
    )?;
    let coordinator = UploadCoordinator::new(PresignedPutTransfer::new()?);

    match cli.command {
        Commands::Upload {
            file,
            owner,
            version,
            kind,
            content_type,
        } => {
            let args = UploadArgs {
                path: &file,
                kind,
                owner_id: &owner,
                version,
                content_type: content_type.as_deref(),
            };
            let uploaded = upload_file(&args, &client, &coordinator).await?;
            tracing::info!(storage_key = %uploaded.storage_key, "Upload complete");
            print_json(&uploaded)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // UploadError already folds its cause into the message
            match err.downcast_ref::<UploadError>() {
                Some(upload_err) => eprintln!("{}", upload_err),
                None => eprintln!("{:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}
