//! Welcome banner for interactive sessions.

use std::path::Path;

use console::style;

/// Welcome banner text shown when a session starts.
pub fn welcome_banner(backend_url: &str, session_id: &str, download_dir: &Path) -> String {
    let short_id = &session_id[..8.min(session_id.len())];
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("  {}\n", style("formassist").cyan().bold()));
    out.push_str(&format!(
        "  {}\n\n",
        style("Immigration form assistant").dim()
    ));
    out.push_str(&format!(
        "  {}  {}\n",
        style("Backend:").bold(),
        style(backend_url).dim()
    ));
    out.push_str(&format!(
        "  {}  {}\n",
        style("Session:").bold(),
        style(short_id).dim()
    ));
    out.push_str(&format!(
        "  {}    {}\n\n",
        style("Saves:").bold(),
        style(download_dir.display()).dim()
    ));
    out.push_str(&format!(
        "  {}\n",
        style("Type /help for commands, Ctrl+D to exit").dim()
    ));
    out.push_str(&format!("  {}\n", style("---").dim()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_shortens_session_id() {
        console::set_colors_enabled(false);
        let banner = welcome_banner(
            "http://localhost:5001",
            "0b6f8a3c-9d1e-4f7a-8c2b-5e4d3c2b1a09",
            Path::new("/tmp/forms"),
        );
        assert!(banner.contains("0b6f8a3c"));
        assert!(!banner.contains("9d1e"));
        assert!(banner.contains("http://localhost:5001"));
    }

    #[test]
    fn banner_handles_short_ids() {
        let banner = welcome_banner("http://x", "abc", Path::new("."));
        assert!(banner.contains("abc"));
    }
}
