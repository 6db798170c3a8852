//! Lab front matter: the `---` delimited YAML block at the top of a document.

use std::path::{Component, Path};

use serde::Deserialize;
use serde_yaml::Value;

const DELIMITER: &str = "---";

/// Error raised when front matter parses but is not an acceptable lab configuration.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    #[error("Invalid front matter: {0}")]
    Validation(String),
}

/// Editor pane a lab asks to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Terminal,
    Browser,
}

impl WindowKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Terminal => "terminal",
            Self::Browser => "browser",
        }
    }
}

/// Lab configuration read from front matter.
///
/// Unknown keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Page opened in the browser pane.
    pub url: Option<String>,
    /// Files opened in the editor, relative to the lab folder.
    pub files: Vec<String>,
    /// Command run in the lab terminal.
    pub cmd: Option<String>,
    /// Port forwarded for the browser pane.
    pub port: Option<u16>,
    /// Panes to show.
    pub window: Vec<WindowKind>,
    /// Accepted for compatibility; has no effect on rendering.
    pub readme: Option<bool>,
}

impl LabConfig {
    /// Check values that the YAML types alone cannot express.
    ///
    /// # Errors
    ///
    /// Returns `FrontMatterError::Validation` naming the first offending key.
    pub fn validate(&self) -> Result<(), FrontMatterError> {
        if let Some(url) = &self.url {
            let rest = url
                .strip_prefix("https://")
                .or_else(|| url.strip_prefix("http://"));
            if rest.is_none_or(str::is_empty) {
                return Err(FrontMatterError::Validation(format!(
                    "url must be an http:// or https:// URL, got {url:?}"
                )));
            }
        }

        for file in &self.files {
            validate_relative_path(file)?;
        }

        if let Some(cmd) = &self.cmd
            && cmd.trim().is_empty()
        {
            return Err(FrontMatterError::Validation(
                "cmd cannot be empty".to_owned(),
            ));
        }

        if self.port == Some(0) {
            return Err(FrontMatterError::Validation(
                "port must be between 1 and 65535".to_owned(),
            ));
        }

        Ok(())
    }
}

fn validate_relative_path(file: &str) -> Result<(), FrontMatterError> {
    if file.trim().is_empty() {
        return Err(FrontMatterError::Validation(
            "files cannot contain empty paths".to_owned(),
        ));
    }

    let path = Path::new(file);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(FrontMatterError::Validation(format!(
            "files must be relative paths inside the lab folder, got {file:?}"
        )));
    }

    Ok(())
}

/// A document split into its lab configuration and markdown body.
#[derive(Debug)]
pub struct LabDocument<'a> {
    /// Parsed configuration, `None` when the document has no usable front matter.
    pub config: Option<LabConfig>,
    /// Text handed to the renderer.
    pub body: &'a str,
}

/// Split `---` delimited front matter from the body without parsing it.
///
/// The opening delimiter must be the first line and the closing delimiter a
/// later line, each consisting of exactly `---`. Returns `(None, text)` when
/// either is missing.
#[must_use]
pub fn split_front_matter(text: &str) -> (Option<&str>, &str) {
    let Some(rest) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return (None, text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, text)
}

/// Split and parse a lab document.
///
/// Missing delimiters or front matter that is not YAML (or not a mapping)
/// leave the whole text as the body and log a warning. Front matter that is a
/// mapping must describe a valid [`LabConfig`].
///
/// # Errors
///
/// Returns `FrontMatterError::Validation` if the front matter has a wrongly
/// typed or out-of-range value.
pub fn parse_document(text: &str) -> Result<LabDocument<'_>, FrontMatterError> {
    let whole = LabDocument {
        config: None,
        body: text,
    };

    let (Some(raw), body) = split_front_matter(text) else {
        tracing::warn!("No front matter found, rendering the whole document");
        return Ok(whole);
    };

    let value: Value = match serde_yaml::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Front matter is not valid YAML, rendering the whole document");
            return Ok(whole);
        }
    };

    let config = match value {
        Value::Null => LabConfig::default(),
        Value::Mapping(_) => serde_yaml::from_str::<LabConfig>(raw)
            .map_err(|e| FrontMatterError::Validation(e.to_string()))?,
        _ => {
            tracing::warn!("Front matter is not a mapping, rendering the whole document");
            return Ok(whole);
        }
    };
    config.validate()?;

    Ok(LabDocument {
        config: Some(config),
        body,
    })
}
