//! `fassist ask` -- one chat turn in a fresh session.

use anyhow::{Result, bail};
use console::style;

use formassist_types::operation::Transition;

use crate::cli::output::spinner;
use crate::state::AppState;

pub async fn ask(state: &AppState, message: &str, json: bool, quiet: bool) -> Result<()> {
    let orchestrator = state.orchestrator(false)?;

    let progress = spinner("thinking...", json || quiet);
    let outcome = orchestrator.send_message(message).await;
    progress.finish_and_clear();

    let reply = match outcome {
        Transition::Completed(reply) => reply,
        Transition::Failed(reason) => bail!("Chat Error: {reason}"),
        Transition::Skipped(reason) => bail!("nothing sent: {reason}"),
    };

    if json {
        let out = serde_json::json!({
            "session_id": orchestrator.session().id,
            "reply": reply.reply,
            "action_needed": reply.action_needed,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {}", reply.reply.trim());
    if reply.suggests_fill() && !quiet {
        println!();
        println!(
            "  {}",
            style("Upload your documents with `fassist upload <files> --fill <form>` to generate the form.").dim()
        );
    }
    println!();

    Ok(())
}
