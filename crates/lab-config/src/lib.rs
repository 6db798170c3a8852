//! Configuration for lab rendering.
//!
//! Two sources feed a render:
//!
//! - **Front matter** at the top of each lab document, parsed into a
//!   [`LabConfig`] by [`parse_document`].
//! - **Workspace settings** from an optional `lab.toml`, auto-discovered in
//!   the current directory and its parents, with [`CliSettings`] applied on top.
//!
//! [`Settings::render_context`] turns the workspace settings into the
//! [`RenderContext`] passed to the renderer.

mod front_matter;

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use lab_renderer::tags::DEFAULT_TIME_CONVERTER_URL;
use lab_renderer::{PipelineOptions, RenderContext};
use serde::Deserialize;

pub use front_matter::{
    FrontMatterError, LabConfig, LabDocument, WindowKind, parse_document, split_front_matter,
};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "lab.toml";

/// Environment variable set to `true` inside hosted environments.
const HOSTED_ENV_VAR: &str = "CODESPACES";

const DEFAULT_TIMEZONE: &str = "America/New_York";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override hosted environment detection.
    pub hosted: Option<bool>,
    /// Override the time zone for `{% local %}` tags.
    pub timezone: Option<String>,
    /// Override the time zone converter URL.
    pub time_converter_url: Option<String>,
}

/// Workspace settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rendering configuration.
    pub render: RenderSettings,
    /// Standalone HTML document configuration.
    pub shell: ShellSettings,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[render]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Hosted environment flag; detected from the environment when unset.
    pub hosted: Option<bool>,
    /// IANA time zone name for `{% local %}` tags.
    pub timezone: String,
    /// Base URL of the time zone converter.
    pub time_converter_url: String,
    /// GitHub Flavored Markdown extensions.
    pub gfm: bool,
    /// Decode HTML entities after markdown conversion.
    pub decode_entities: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            hosted: None,
            timezone: DEFAULT_TIMEZONE.to_owned(),
            time_converter_url: DEFAULT_TIME_CONVERTER_URL.to_owned(),
            gfm: true,
            decode_entities: true,
        }
    }
}

/// `[shell]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShellSettings {
    /// Stylesheet linked from standalone documents.
    pub stylesheet: Option<String>,
    /// Script loaded by standalone documents.
    pub script: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.parse::<Tz>().map_err(|_| {
        ConfigError::Validation(format!("render.timezone: unknown time zone {name:?}"))
    })
}

/// Interpret the hosted environment variable.
fn hosted_from_env_value(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

impl Settings {
    /// Load settings from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `lab.toml` in current directory and parents,
    /// falling back to defaults.
    ///
    /// CLI settings are applied after loading, so CLI arguments take
    /// precedence over file values. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// a value is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut settings = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(overrides) = cli_settings {
            settings.apply_cli_settings(overrides);
        }
        settings.validate()?;

        Ok(settings)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(hosted) = settings.hosted {
            self.render.hosted = Some(hosted);
        }
        if let Some(timezone) = &settings.timezone {
            self.render.timezone.clone_from(timezone);
        }
        if let Some(url) = &settings.time_converter_url {
            self.render.time_converter_url.clone_from(url);
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load settings from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut settings: Self = toml::from_str(&content)?;
        settings.config_path = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), "Loaded workspace settings");
        Ok(settings)
    }

    /// Validate settings values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the time zone is unknown or the
    /// converter URL is not an http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_timezone(&self.render.timezone)?;
        require_non_empty(
            &self.render.time_converter_url,
            "render.time_converter_url",
        )?;
        require_http_url(
            &self.render.time_converter_url,
            "render.time_converter_url",
        )?;
        Ok(())
    }

    /// Hosted flag, falling back to the `CODESPACES` environment variable.
    #[must_use]
    pub fn hosted(&self) -> bool {
        self.render.hosted.unwrap_or_else(|| {
            hosted_from_env_value(std::env::var(HOSTED_ENV_VAR).ok().as_deref())
        })
    }

    /// Build the rendering context for these settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the time zone is unknown.
    pub fn render_context(&self) -> Result<RenderContext, ConfigError> {
        Ok(RenderContext::new()
            .with_hosted(self.hosted())
            .with_timezone(parse_timezone(&self.render.timezone)?)
            .with_time_converter_url(self.render.time_converter_url.clone()))
    }

    /// Markdown stage options for these settings.
    #[must_use]
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            gfm: self.render.gfm,
            decode_entities: self.render.decode_entities,
        }
    }
}
