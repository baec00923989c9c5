use serde::{Deserialize, Deserializer};

/// Duration sent when the caller does not pick one.
pub const DEFAULT_DURATION_SECS: i64 = 4;

/// Per-call generation settings. Every field is optional; unset fields fall
/// back to the client defaults when the request is built.
///
/// ```
/// use sora_video::GenerationOptions;
///
/// let base = GenerationOptions::default().with_duration(8);
/// let opts = base.merge(&GenerationOptions::default().with_resolution("1280x720"));
/// assert_eq!(opts.effective_duration(), 8);
/// assert_eq!(opts.resolution.as_deref(), Some("1280x720"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Clip length in seconds. Default: 4. Zero or negative means "let the provider decide".
    pub duration: Option<i64>,
    /// e.g. "1280x720". Sent as `size`.
    pub resolution: Option<String>,
    /// Overrides the client's default model.
    pub model: Option<String>,
}

impl GenerationOptions {
    /// Set the clip length in seconds. Zero or negative omits `seconds` from the request.
    pub fn with_duration(mut self, seconds: i64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Set the `size` label, e.g. "1280x720".
    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    /// Use this model instead of the client default.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Combine two option sets. Fields set in `overrides` win; the rest come from `self`.
    /// Neither input is modified.
    pub fn merge(&self, overrides: &GenerationOptions) -> GenerationOptions {
        GenerationOptions {
            duration: overrides.duration.or(self.duration),
            resolution: overrides
                .resolution
                .clone()
                .or_else(|| self.resolution.clone()),
            model: overrides.model.clone().or_else(|| self.model.clone()),
        }
    }

    /// Duration to submit: the one set, or [`DEFAULT_DURATION_SECS`].
    pub fn effective_duration(&self) -> i64 {
        self.duration.unwrap_or(DEFAULT_DURATION_SECS)
    }

    /// The model to submit with: the override if non-empty, otherwise `default_model`.
    pub fn effective_model<'a>(&'a self, default_model: &'a str) -> &'a str {
        non_empty(self.model.as_deref()).unwrap_or(default_model)
    }

    /// The resolution label, if one was given and it is not blank.
    pub fn effective_resolution(&self) -> Option<&str> {
        non_empty(self.resolution.as_deref())
    }
}

/// Snapshot of a generation task, returned by both submission and status lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoResult {
    pub task_id: String,
    /// Provider status, verbatim ("queued", "in_progress", "completed", "failed", ...).
    pub status: String,
    /// `true` only when `status` is exactly `"completed"`.
    pub completed: bool,
    pub video_url: Option<String>,
    /// Provider-reported failure message. Only set by status lookups.
    pub error: Option<String>,
    /// Percentage reported by the provider, 0 when absent.
    pub progress: i64,
}

impl VideoResult {
    /// Status is `"failed"` or the provider attached an error.
    pub fn is_failed(&self) -> bool {
        self.status == "failed" || self.error.is_some()
    }

    /// Terminal = polling again won't change anything.
    pub fn is_terminal(&self) -> bool {
        self.completed || self.is_failed()
    }
}

// ---------------------------------------------------------------------------
// Wire format (not part of the public API surface)
// ---------------------------------------------------------------------------

/// Body of `POST /videos` and `GET /videos/{id}`. Every field may be missing or null.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
pub(crate) struct ProviderResponse {
    pub id: Option<String>,
    pub object: Option<String>,
    pub model: Option<String>,
    pub status: Option<String>,
    pub progress: Option<i64>,
    pub created_at: Option<i64>,
    pub completed_at: Option<i64>,
    #[serde(deserialize_with = "lenient_string")]
    pub size: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub seconds: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub quality: Option<String>,
    /// Flat video location.
    pub video_url: Option<String>,
    /// Nested video location (`video.url`).
    pub video: Option<VideoLocation>,
    pub error: Option<ProviderErrorRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct VideoLocation {
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ProviderErrorRecord {
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ProviderResponse {
    /// The error message, if the provider sent a non-empty one.
    pub fn error_message(&self) -> Option<&str> {
        non_empty(self.error.as_ref().and_then(|e| e.message.as_deref()))
    }

    pub fn error_kind(&self) -> Option<&str> {
        non_empty(self.error.as_ref().and_then(|e| e.kind.as_deref()))
    }

    pub fn nested_video_url(&self) -> Option<&str> {
        self.video.as_ref().and_then(|v| v.url.as_deref())
    }
}

/// Treat `""` the same as a missing value.
pub(crate) fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Accept a string, a number or null. Some deployments echo `seconds` as an integer.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
