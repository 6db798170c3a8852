//! `lab check` command implementation.

use std::path::PathBuf;

use clap::Args;
use lab_config::{LabConfig, Settings, parse_document};
use lab_renderer::TagEngine;

use super::read_document;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Lab folder (checks its README.md) or markdown file.
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file (default: auto-discover lab.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, front matter or tag structure is
    /// invalid, or the document cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let settings = Settings::load(self.config.as_deref(), None)?;
        let (path, text) = read_document(&self.path)?;
        let document = parse_document(&text)?;

        let ctx = settings.render_context()?;
        let mut engine = TagEngine::new(&ctx);
        let template = engine.parse(document.body)?;

        output.heading(&format!("Lab: {}", path.display()));
        match &document.config {
            Some(config) => {
                for (key, value) in summarize(config) {
                    output.entry(key, &value);
                }
            }
            None => output.warning("  No front matter"),
        }

        output.tag_warnings(engine.warnings());
        output.success(&format!(
            "Tags OK ({} top-level nodes)",
            template.nodes().len()
        ));

        Ok(())
    }
}

/// One entry per configured front matter key.
fn summarize(config: &LabConfig) -> Vec<(&'static str, String)> {
    let mut entries = Vec::new();
    if let Some(url) = &config.url {
        entries.push(("url", url.clone()));
    }
    if !config.files.is_empty() {
        entries.push(("files", config.files.join(", ")));
    }
    if let Some(cmd) = &config.cmd {
        entries.push(("cmd", cmd.clone()));
    }
    if let Some(port) = config.port {
        entries.push(("port", port.to_string()));
    }
    if !config.window.is_empty() {
        let windows: Vec<&str> = config.window.iter().map(|w| w.as_str()).collect();
        entries.push(("window", windows.join(", ")));
    }
    if entries.is_empty() {
        entries.push(("front matter", "(empty)".to_owned()));
    }
    entries
}
