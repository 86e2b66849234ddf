//! Document picker and `fassist upload`.
//!
//! The picker checks the extension before anything is read or sent, and
//! reports its own short-lived status next to the orchestrator's timeline
//! entries.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result, bail};
use console::style;

use formassist_core::backend::AssistantBackend;
use formassist_core::download::ArtifactSink;
use formassist_core::orchestrator::Orchestrator;
use formassist_types::backend::{ACCEPTED_UPLOAD_EXTENSIONS, UploadFile, UploadReceipt};
use formassist_types::error::OperationError;
use formassist_types::operation::Transition;

use crate::cli::output::{format_message, spinner};
use crate::state::AppState;

/// Transient status shown by the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerStatus {
    Uploading(String),
    Uploaded(String),
    Failed(String),
}

impl fmt::Display for PickerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickerStatus::Uploading(name) => write!(f, "Uploading {name}..."),
            PickerStatus::Uploaded(name) => write!(f, "Uploaded: {name}"),
            PickerStatus::Failed(reason) => write!(f, "Upload failed: {reason}"),
        }
    }
}

/// Read a document for upload, rejecting unsupported types up front.
pub async fn pick_document(path: &Path) -> Result<UploadFile> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("not a file path: {}", path.display()))?
        .to_string();

    let probe = UploadFile::new(filename.as_str(), Vec::new());
    if !probe.is_accepted_type() {
        bail!(
            "File type not allowed: {filename} (accepted: {})",
            ACCEPTED_UPLOAD_EXTENSIONS.join(", ")
        );
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(UploadFile::new(filename, bytes))
}

/// Run one upload, reporting picker status through `report`.
///
/// `Ok(None)` means another upload was already in flight.
pub async fn upload_with_status<B, S>(
    orchestrator: &Orchestrator<B, S>,
    file: UploadFile,
    mut report: impl FnMut(PickerStatus),
) -> Result<Option<UploadReceipt>, OperationError>
where
    B: AssistantBackend,
    S: ArtifactSink,
{
    report(PickerStatus::Uploading(file.filename.clone()));
    let result = orchestrator.upload_file(file).await;
    match &result {
        Ok(Some(receipt)) => report(PickerStatus::Uploaded(receipt.filename.clone())),
        Ok(None) => {}
        Err(err) => report(PickerStatus::Failed(err.reason.clone())),
    }
    result
}

/// `fassist upload <paths>... [--fill <form>]`.
pub async fn upload(
    state: &AppState,
    paths: &[std::path::PathBuf],
    fill: Option<&str>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let orchestrator = state.orchestrator(false)?;
    let hidden = json || quiet;

    let mut uploaded = Vec::new();
    let mut failures = Vec::new();

    for path in paths {
        let file = match pick_document(path).await {
            Ok(file) => file,
            Err(err) => {
                if !json {
                    eprintln!("  {} {err:#}", style("✗").red().bold());
                }
                failures.push(format!("{err:#}"));
                continue;
            }
        };

        let progress = spinner(String::new(), hidden);
        let result = upload_with_status(&orchestrator, file, |status| {
            if let PickerStatus::Uploading(_) = status {
                progress.set_message(status.to_string());
            } else {
                progress.finish_and_clear();
                if !hidden {
                    println!("  {status}");
                }
            }
        })
        .await;

        match result {
            Ok(Some(receipt)) => uploaded.push(receipt),
            Ok(None) => {}
            Err(err) => failures.push(err.reason),
        }
    }

    let mut saved = None;
    if let Some(form_id) = fill {
        let progress = spinner("Loading forms...", hidden);
        let loaded = orchestrator.load_forms().await;
        progress.finish_and_clear();
        if let Some(reason) = loaded.failure() {
            bail!("failed to load forms: {reason}");
        }
        orchestrator.select_form(form_id)?;

        let progress = spinner(format!("Filling {form_id}..."), hidden);
        let outcome = orchestrator.fill_form().await;
        progress.finish_and_clear();

        match outcome {
            Transition::Completed(download) => saved = Some(download),
            Transition::Failed(reason) => bail!("Form Fill Error: {reason}"),
            Transition::Skipped(reason) => bail!("form fill skipped: {reason}"),
        }
    }

    if json {
        let out = serde_json::json!({
            "session_id": orchestrator.session().id,
            "uploaded": uploaded,
            "failed": failures,
            "download": saved.as_ref().map(|s| serde_json::json!({
                "filename": s.filename,
                "path": s.path.display().to_string(),
            })),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if !quiet {
        let snapshot = orchestrator.snapshot();
        println!();
        for message in snapshot.timeline().snapshot() {
            println!("{}", format_message(message));
        }
        if let Some(download) = &saved {
            println!();
            println!(
                "  {} Saved to {}",
                style("✓").green().bold(),
                style(download.path.display()).cyan()
            );
        }
        println!();
    }

    if !failures.is_empty() {
        bail!("{} of {} upload(s) failed", failures.len(), paths.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn picker_status_text() {
        assert_eq!(
            PickerStatus::Uploading("scan.pdf".to_string()).to_string(),
            "Uploading scan.pdf..."
        );
        assert_eq!(
            PickerStatus::Uploaded("scan.pdf".to_string()).to_string(),
            "Uploaded: scan.pdf"
        );
        assert_eq!(
            PickerStatus::Failed("File type not allowed".to_string()).to_string(),
            "Upload failed: File type not allowed"
        );
    }

    #[tokio::test]
    async fn pick_reads_accepted_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Passport.JPG");
        std::fs::write(&path, b"jpeg bytes").unwrap();

        let file = pick_document(&path).await.unwrap();
        assert_eq!(file.filename, "Passport.JPG");
        assert_eq!(file.bytes, b"jpeg bytes");
    }

    #[tokio::test]
    async fn pick_rejects_unsupported_type_without_reading() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("payload.exe");

        let err = pick_document(&missing).await.unwrap_err();
        assert!(err.to_string().starts_with("File type not allowed: payload.exe"));
    }

    #[tokio::test]
    async fn pick_reports_missing_file() {
        let dir = tempdir().unwrap();
        let err = pick_document(&dir.path().join("gone.pdf")).await.unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
