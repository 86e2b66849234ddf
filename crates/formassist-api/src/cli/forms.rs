//! `fassist forms` -- list the form catalog.

use anyhow::{Result, bail};
use console::style;

use formassist_types::operation::Transition;

use crate::cli::output::spinner;
use crate::state::AppState;

/// Load the catalog and print it, marking the default selection.
pub async fn list_forms(state: &AppState, json: bool, quiet: bool) -> Result<()> {
    let orchestrator = state.orchestrator(false)?;

    let progress = spinner("Loading forms...", json || quiet);
    let outcome = orchestrator.load_forms().await;
    progress.finish_and_clear();

    if let Transition::Failed(reason) = outcome {
        let banner = orchestrator
            .snapshot()
            .banner()
            .map(str::to_string)
            .unwrap_or_default();
        bail!("{banner} ({reason})");
    }

    let snapshot = orchestrator.snapshot();
    let catalog = snapshot.catalog();
    let selected = catalog.selected_id();

    if json {
        let forms: Vec<_> = catalog
            .forms()
            .iter()
            .map(|form| {
                serde_json::json!({
                    "id": form.id,
                    "name": form.name,
                    "selected": selected == Some(form.id.as_str()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&forms)?);
        return Ok(());
    }

    if catalog.is_empty() {
        println!();
        println!("  {}", style("No forms available.").dim());
        println!();
        return Ok(());
    }

    println!();
    for form in catalog.forms() {
        let marker = if selected == Some(form.id.as_str()) {
            style("›").cyan().bold()
        } else {
            style(" ")
        };
        println!(
            "  {} {:<12} {}",
            marker,
            style(&form.id).bold(),
            style(form.display_name()).dim()
        );
    }
    println!();
    if !quiet {
        println!(
            "  {}",
            style(format!("{} form(s). Use --form <id> with `fassist chat` to pick one.", catalog.len())).dim()
        );
        println!();
    }

    Ok(())
}
