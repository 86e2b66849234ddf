//! Main chat loop.
//!
//! Operations run as tasks in a `JoinSet` against a shared orchestrator, so
//! the prompt stays responsive while a reply, upload, or fill is in flight.
//! Leaving the loop waits for those tasks; a call already sent to the
//! backend always finishes. All output goes through the readline
//! `SharedWriter`.

use std::io::Write;
use std::sync::Arc;

use anyhow::anyhow;
use console::style;
use rustyline_async::SharedWriter;
use tokio::task::JoinSet;
use tracing::debug;

use formassist_core::state::ControllerState;
use formassist_types::form::CatalogStatus;
use formassist_types::operation::{OperationKind, SkipReason, Transition};

use crate::cli::output::{format_banner, format_message};
use crate::cli::upload::{pick_document, upload_with_status};
use crate::state::{AppState, ConcreteOrchestrator};

use super::banner::welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::render::{RenderEvent, TimelineCursor};

fn prompt(busy: bool) -> String {
    if busy {
        format!("  {} ", style("... >").yellow().bold())
    } else {
        format!("  {} ", style("You >").green().bold())
    }
}

/// Run an interactive session until the user exits.
pub async fn run_chat_loop(state: &AppState, form: Option<String>) -> anyhow::Result<()> {
    let orchestrator = Arc::new(state.orchestrator(true)?);
    let (mut input, mut writer) = ChatInput::new(prompt(false))
        .map_err(|e| anyhow!("Failed to initialize input: {e}"))?;

    write!(
        writer,
        "{}",
        welcome_banner(
            &state.config.backend_url,
            orchestrator.session().id.as_str(),
            &state.download_dir,
        )
    )?;

    let mut rx = orchestrator.subscribe();
    let mut cursor = TimelineCursor::new(false);
    let mut busy = false;
    let initial = rx.borrow_and_update().clone();
    render(&mut writer, &mut cursor, &initial)?;

    let mut tasks = JoinSet::new();
    spawn_catalog_load(&mut tasks, &orchestrator, form, writer.clone());

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                render(&mut writer, &mut cursor, &snapshot)?;

                let now_busy =
                    snapshot.busy() || snapshot.operation(OperationKind::Upload).in_flight;
                if now_busy != busy {
                    input.update_prompt(&prompt(now_busy));
                    busy = now_busy;
                }
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(err) = joined {
                    debug!(error = %err, "chat task ended abnormally");
                }
            }
            event = input.read_line() => match event {
                InputEvent::Eof => break,
                InputEvent::Interrupted => {
                    writeln!(writer, "  {}", style("Press Ctrl+D to exit, or keep chatting.").dim())?;
                }
                InputEvent::Line(text) if text.is_empty() => {}
                InputEvent::Line(text) => {
                    let Some(command) = commands::parse(&text) else {
                        spawn_chat(&mut tasks, &orchestrator, text, writer.clone());
                        continue;
                    };
                    if command == ChatCommand::Exit {
                        break;
                    }
                    run_command(&mut tasks, &orchestrator, command, &mut writer)?;
                }
            },
        }
    }

    drain_tasks(&mut tasks, &mut writer).await?;
    let last = rx.borrow_and_update().clone();
    render(&mut writer, &mut cursor, &last)?;
    writeln!(writer, "\n  {}", style("Session ended.").dim())?;

    input.flush();
    Ok(())
}

/// Wait for every operation still running.
async fn drain_tasks(tasks: &mut JoinSet<()>, writer: &mut impl Write) -> std::io::Result<()> {
    if tasks.is_empty() {
        return Ok(());
    }
    writeln!(
        writer,
        "  {}",
        style(format!("Waiting for {} operation(s) to finish...", tasks.len())).dim()
    )?;
    while let Some(joined) = tasks.join_next().await {
        if let Err(err) = joined {
            debug!(error = %err, "chat task ended abnormally");
        }
    }
    Ok(())
}

fn render(
    writer: &mut SharedWriter,
    cursor: &mut TimelineCursor,
    snapshot: &ControllerState,
) -> std::io::Result<()> {
    for event in cursor.advance(snapshot.timeline().snapshot(), snapshot.banner()) {
        match event {
            RenderEvent::Message(message) => writeln!(writer, "{}", format_message(&message))?,
            RenderEvent::Banner(text) => writeln!(writer, "{}", format_banner(&text))?,
            RenderEvent::BannerCleared => {}
        }
    }
    Ok(())
}

fn run_command(
    tasks: &mut JoinSet<()>,
    orchestrator: &Arc<ConcreteOrchestrator>,
    command: ChatCommand,
    writer: &mut SharedWriter,
) -> std::io::Result<()> {
    match command {
        ChatCommand::Help => write!(writer, "{}", commands::help_text())?,
        ChatCommand::Exit => {}
        ChatCommand::Forms => print_forms(tasks, orchestrator, writer)?,
        ChatCommand::Select(id) => match orchestrator.select_form(&id) {
            Ok(()) => {
                let snapshot = orchestrator.snapshot();
                let name = snapshot.catalog().display_name(&id).to_string();
                writeln!(writer, "  {} Selected {}", style("✓").green().bold(), style(name).cyan())?;
            }
            Err(err) => writeln!(
                writer,
                "  {} {err}. Type /forms to list them.",
                style("?").yellow().bold()
            )?,
        },
        ChatCommand::Upload(path) => spawn_upload(tasks, orchestrator, path, writer.clone()),
        ChatCommand::Fill => spawn_fill(tasks, orchestrator, writer.clone()),
        ChatCommand::History => {
            writeln!(writer)?;
            for message in orchestrator.snapshot().timeline().snapshot() {
                writeln!(writer, "{}", format_message(message))?;
            }
            writeln!(writer)?;
        }
        ChatCommand::Dismiss => orchestrator.dismiss_banner(),
        ChatCommand::Unknown(name) => writeln!(
            writer,
            "  {} Unknown command: {}. Type /help for available commands.",
            style("?").yellow().bold(),
            style(name).dim()
        )?,
    }
    Ok(())
}

fn print_forms(
    tasks: &mut JoinSet<()>,
    orchestrator: &Arc<ConcreteOrchestrator>,
    writer: &mut SharedWriter,
) -> std::io::Result<()> {
    let snapshot = orchestrator.snapshot();
    let catalog = snapshot.catalog();

    match catalog.status() {
        CatalogStatus::Pending | CatalogStatus::Loading => {
            writeln!(writer, "  {}", style("Forms are still loading.").dim())?;
        }
        CatalogStatus::Failed => {
            writeln!(writer, "  {}", style("Retrying form catalog...").dim())?;
            spawn_catalog_load(tasks, orchestrator, None, writer.clone());
        }
        CatalogStatus::Loaded if catalog.is_empty() => {
            writeln!(writer, "  {}", style("No forms available.").dim())?;
        }
        CatalogStatus::Loaded => {
            let selected = catalog.selected_id();
            writeln!(writer)?;
            for form in catalog.forms() {
                let marker = if selected == Some(form.id.as_str()) { "›" } else { " " };
                writeln!(
                    writer,
                    "  {} {:<12} {}",
                    style(marker).cyan().bold(),
                    style(&form.id).bold(),
                    style(form.display_name()).dim()
                )?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn spawn_catalog_load(
    tasks: &mut JoinSet<()>,
    orchestrator: &Arc<ConcreteOrchestrator>,
    form: Option<String>,
    mut writer: SharedWriter,
) {
    let orchestrator = Arc::clone(orchestrator);
    tasks.spawn(async move {
        if !orchestrator.load_forms().await.is_completed() {
            return;
        }
        if let Some(id) = form {
            if let Err(err) = orchestrator.select_form(&id) {
                let _ = writeln!(writer, "  {} {err}", style("?").yellow().bold());
            }
        }
    });
}

fn spawn_chat(
    tasks: &mut JoinSet<()>,
    orchestrator: &Arc<ConcreteOrchestrator>,
    text: String,
    mut writer: SharedWriter,
) {
    let orchestrator = Arc::clone(orchestrator);
    tasks.spawn(async move {
        match orchestrator.send_message(&text).await {
            Transition::Completed(reply) if reply.suggests_fill() => {
                let snapshot = orchestrator.snapshot();
                let hint = match snapshot.catalog().selected() {
                    Some(form) if snapshot.can_fill() => {
                        format!("Type /fill to generate {}.", form.display_name())
                    }
                    Some(_) => "A form is already being generated.".to_string(),
                    None => "Pick a form with /select <id>, then type /fill.".to_string(),
                };
                let _ = writeln!(writer, "  {}", style(hint).dim());
            }
            Transition::Skipped(reason) => {
                debug!(%reason, "chat message not sent");
                let _ = writeln!(writer, "  {}", style("Still waiting on the previous reply.").dim());
            }
            _ => {}
        }
    });
}

fn spawn_upload(
    tasks: &mut JoinSet<()>,
    orchestrator: &Arc<ConcreteOrchestrator>,
    path: std::path::PathBuf,
    mut writer: SharedWriter,
) {
    let orchestrator = Arc::clone(orchestrator);
    tasks.spawn(async move {
        let file = match pick_document(&path).await {
            Ok(file) => file,
            Err(err) => {
                let _ = writeln!(writer, "  {}", style(format!("Upload failed: {err:#}")).red());
                return;
            }
        };
        let result = upload_with_status(&orchestrator, file, |status| {
            let _ = writeln!(writer, "  {}", style(status).dim());
        })
        .await;
        if let Ok(None) = result {
            let _ = writeln!(writer, "  {}", style("Another upload is still running.").dim());
        }
    });
}

fn spawn_fill(
    tasks: &mut JoinSet<()>,
    orchestrator: &Arc<ConcreteOrchestrator>,
    mut writer: SharedWriter,
) {
    let orchestrator = Arc::clone(orchestrator);
    tasks.spawn(async move {
        let outcome = orchestrator.fill_form().await;
        if outcome.skipped() == Some(SkipReason::InFlight) {
            let _ = writeln!(writer, "  {}", style("A form is already being generated.").dim());
        }
        if let Transition::Completed(saved) = outcome {
            let _ = writeln!(
                writer,
                "  {} Saved to {}",
                style("✓").green().bold(),
                style(saved.path.display()).cyan()
            );
        }
    });
}
