//! `lab render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use lab_config::{CliSettings, Settings, parse_document};
use lab_renderer::render_lab;

use super::read_document;
use crate::error::CliError;
use crate::output::Output;
use crate::shell::wrap_document;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Lab folder (renders its README.md) or markdown file.
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Render for a hosted environment (embedded video players).
    #[arg(long, conflicts_with = "no_hosted")]
    hosted: bool,

    /// Render for a local environment (video thumbnails).
    #[arg(long)]
    no_hosted: bool,

    /// Time zone for `{% local %}` tags (overrides config).
    #[arg(long)]
    timezone: Option<String>,

    /// Wrap the output in a complete HTML document.
    #[arg(long)]
    standalone: bool,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover lab.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, front matter or tag structure is
    /// invalid, or the document cannot be read or written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            hosted: self.resolve_hosted(),
            timezone: self.timezone.clone(),
            ..CliSettings::default()
        };
        let settings = Settings::load(self.config.as_deref(), Some(&cli_settings))?;

        let (path, text) = read_document(&self.path)?;
        let document = parse_document(&text)?;
        let ctx = settings.render_context()?;

        tracing::info!(
            path = %path.display(),
            hosted = ctx.hosted,
            timezone = %ctx.timezone,
            "Rendering lab"
        );
        let rendered = render_lab(document.body, &ctx, &settings.pipeline_options())?;

        output.tag_warnings(&rendered.warnings);

        let html = if self.standalone {
            wrap_document(&rendered.html, &path, &settings.shell)
        } else {
            rendered.html
        };

        if let Some(file) = &self.output {
            std::fs::write(file, html)?;
            output.success(&format!("Rendered {} to {}", path.display(), file.display()));
        } else {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
        }

        Ok(())
    }

    /// Resolve `hosted` from --hosted/--no-hosted flags.
    fn resolve_hosted(&self) -> Option<bool> {
        self.no_hosted
            .then_some(false)
            .or(self.hosted.then_some(true))
    }
}
