//! Rendering context shared by all tags of one render.

use chrono_tz::Tz;

/// Default time zone for `{% local %}` tags.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

/// Default base URL of the external time zone converter.
pub const DEFAULT_TIME_CONVERTER_URL: &str = "https://time.cs50.io";

/// Inputs that tags may consult while rendering.
///
/// The context is created by the caller for each render and passed in
/// explicitly; tags never read process-wide state.
///
/// # Example
///
/// ```
/// use lab_renderer::RenderContext;
///
/// let ctx = RenderContext::new()
///     .with_hosted(true)
///     .with_timezone(chrono_tz::Europe::London);
/// assert!(ctx.hosted);
/// ```
#[derive(Clone, Debug)]
pub struct RenderContext {
    /// Whether the document is displayed in a remote hosted environment.
    ///
    /// Hosted environments can reach video embeds directly; elsewhere
    /// `{% video %}` renders a thumbnail that links out.
    pub hosted: bool,
    /// Time zone used to interpret and display `{% local %}` values.
    pub timezone: Tz,
    /// Base URL for "open in time zone converter" links.
    pub time_converter_url: String,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext {
    /// Create a context for a non-hosted environment in the default time zone.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hosted: false,
            timezone: DEFAULT_TIMEZONE,
            time_converter_url: DEFAULT_TIME_CONVERTER_URL.to_owned(),
        }
    }

    /// Set the hosted environment flag.
    #[must_use]
    pub fn with_hosted(mut self, hosted: bool) -> Self {
        self.hosted = hosted;
        self
    }

    /// Set the time zone for `{% local %}` tags.
    #[must_use]
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Set the time zone converter base URL.
    #[must_use]
    pub fn with_time_converter_url(mut self, url: impl Into<String>) -> Self {
        self.time_converter_url = url.into();
        self
    }
}
