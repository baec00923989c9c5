use std::fmt;
use std::time::Duration;

use reqwest::Url;
use tracing::debug;

use crate::errors::{Result, SoraError};
use crate::models::{GenerationOptions, VideoResult};
use crate::request::SubmissionForm;
use crate::response::{normalize_status, normalize_submission};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "sora-2";
/// Environment variables checked, in order, when no API key is set explicitly.
pub const API_KEY_ENV_VARS: [&str; 2] = ["SORA_API_KEY", "OPENAI_API_KEY"];
/// Upper bound for a single HTTP round trip. Generation requests can be slow to acknowledge.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Builder for constructing a [`Client`] with custom configuration.
///
/// # Example
///
/// ```no_run
/// use sora_video::ClientBuilder;
///
/// # fn example() -> sora_video::Result<()> {
/// let client = ClientBuilder::new()
///     .api_key("sk-...")
///     .base_url("https://gateway.example.com/v1")
///     .model("sora-2-pro")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the base URL (defaults to `https://api.openai.com/v1`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Model used when a call does not override it (defaults to `sora-2`).
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Build the [`Client`].
    ///
    /// If no API key was set via [`api_key`](Self::api_key), `SORA_API_KEY`
    /// and then `OPENAI_API_KEY` are read from the environment.
    ///
    /// Returns [`SoraError::Authentication`] if no key is available and
    /// [`SoraError::Config`] if the base URL cannot be parsed.
    pub fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .or_else(|| {
                API_KEY_ENV_VARS
                    .iter()
                    .find_map(|var| std::env::var(var).ok().filter(|k| !k.is_empty()))
            })
            .ok_or_else(|| SoraError::Authentication {
                message: "API key is required. Pass it to ClientBuilder::api_key() \
                          or set the SORA_API_KEY environment variable."
                    .into(),
            })?;

        let mut base_url =
            Url::parse(self.base_url.trim_end_matches('/')).map_err(|e| SoraError::Config {
                message: format!("base URL {:?}: {e}", self.base_url),
            })?;
        if base_url.cannot_be_a_base() {
            return Err(SoraError::Config {
                message: format!("base URL {:?} cannot carry a path", self.base_url),
            });
        }
        base_url.set_query(None);
        base_url.set_fragment(None);

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SoraError::Config {
                message: format!("build HTTP client: {e}"),
            })?;

        Ok(Client {
            base_url,
            api_key,
            model: self.model,
            http,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for a Sora-style video generation API.
///
/// Every method is a single request/response round trip: nothing is retried
/// and nothing runs in the background. Configuration is fixed at
/// construction, so one client can be shared across tasks and threads.
///
/// # Example
///
/// ```no_run
/// use sora_video::{Client, GenerationOptions};
///
/// # async fn example() -> sora_video::Result<()> {
/// let client = Client::new("https://api.openai.com/v1", "sk-...", "sora-2")?;
///
/// let task = client
///     .generate_video("", "a paper boat drifting", &GenerationOptions::default())
///     .await?;
/// let status = client.get_task_status(&task.task_id).await?;
/// println!("{} is {} ({}%)", status.task_id, status.status, status.progress);
/// # Ok(())
/// # }
/// ```
pub struct Client {
    base_url: Url,
    api_key: String,
    model: String,
    http: reqwest::Client,
}

impl Client {
    /// Create a client for `base_url`, authenticating with `api_key`, using
    /// `model` unless a call overrides it.
    ///
    /// For environment-based configuration, use [`ClientBuilder`] instead.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        ClientBuilder::new()
            .base_url(base_url)
            .api_key(api_key)
            .model(model)
            .build()
    }

    /// API root that `/videos` is appended to, without a trailing `/`.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Default model for submissions.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Submit a generation job and return the provider's acknowledgement,
    /// usually with a `"queued"` or `"in_progress"` status.
    ///
    /// `image_url` may be empty for text-to-video. `prompt` is passed through
    /// unchecked.
    ///
    /// # Errors
    ///
    /// - [`SoraError::Http`] if the request could not be sent or timed out.
    /// - [`SoraError::Read`] if the response body could not be read.
    /// - [`SoraError::Api`] if the status is not 200 or 201; carries the raw body.
    /// - [`SoraError::Parse`] if the body is not the expected JSON.
    /// - [`SoraError::Provider`] if the reply carries an error message.
    pub async fn generate_video(
        &self,
        image_url: &str,
        prompt: &str,
        opts: &GenerationOptions,
    ) -> Result<VideoResult> {
        let form = SubmissionForm::build(image_url, prompt, opts, &self.model);
        let url = self.videos_url(None);
        debug!(
            %url,
            model = form.get("model").unwrap_or_default(),
            text_to_video = image_url.is_empty(),
            "submitting video generation"
        );

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .multipart(form.into_multipart())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(SoraError::Read)?;
        normalize_submission(status, &body)
    }

    /// Look up the current state of a task.
    ///
    /// The body is parsed whatever the HTTP status, and a provider-reported
    /// failure comes back as [`VideoResult::error`] instead of an `Err`, so a
    /// poll loop only stops when the caller decides it should.
    ///
    /// # Errors
    ///
    /// - [`SoraError::InvalidTaskId`] if `task_id` is empty, `.` or `..`.
    /// - [`SoraError::Http`] if the request could not be sent or timed out.
    /// - [`SoraError::Read`] if the response body could not be read.
    /// - [`SoraError::Parse`] if the body is not the expected JSON.
    pub async fn get_task_status(&self, task_id: &str) -> Result<VideoResult> {
        if matches!(task_id, "" | "." | "..") {
            return Err(SoraError::InvalidTaskId(task_id.to_string()));
        }
        let url = self.videos_url(Some(task_id));
        debug!(%url, "fetching video task status");

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let body = response.bytes().await.map_err(SoraError::Read)?;
        normalize_status(&body)
    }

    /// `{base_url}/videos[/{task_id}]`. The task id is percent-encoded as a
    /// single path segment, so `/`, `?` and `#` stay inside it.
    fn videos_url(&self, task_id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        // build() rejected cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("videos");
            if let Some(id) = task_id {
                segments.push(id);
            }
        }
        url
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url())
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_keeps_configuration() {
        let client = Client::new("https://api.example.com/v1/", "sk-test", "sora-2-pro").unwrap();
        assert_eq!(client.base_url(), "https://api.example.com/v1");
        assert_eq!(client.model(), "sora-2-pro");
    }

    #[test]
    fn builder_defaults() {
        let client = ClientBuilder::new().api_key("sk-test").build().unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[test]
    fn videos_url_escapes_task_id_as_one_segment() {
        let client = Client::new("https://api.example.com/v1/", "sk-test", "sora-2").unwrap();
        assert_eq!(
            client.videos_url(None).as_str(),
            "https://api.example.com/v1/videos"
        );
        assert_eq!(
            client.videos_url(Some("video_123")).as_str(),
            "https://api.example.com/v1/videos/video_123"
        );

        let url = client.videos_url(Some("../admin?x=1#frag"));
        assert_eq!(url.path(), "/v1/videos/..%2Fadmin%3Fx=1%23frag");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn bare_host_base_url() {
        let client = Client::new("http://127.0.0.1:8080", "sk-test", "sora-2").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080");
        assert_eq!(
            client.videos_url(Some("t1")).as_str(),
            "http://127.0.0.1:8080/videos/t1"
        );
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        for bad in ["not a url", "mailto:ops@example.com"] {
            let err = Client::new(bad, "sk-test", "sora-2").unwrap_err();
            assert!(matches!(err, SoraError::Config { .. }), "{bad}: {err:?}");
        }
    }

    #[tokio::test]
    async fn unaddressable_task_ids_are_rejected_before_sending() {
        // Nothing listens here; a request that got sent would fail as Http.
        let client = Client::new("http://127.0.0.1:1", "sk-test", "sora-2").unwrap();
        for id in ["", ".", ".."] {
            let err = client.get_task_status(id).await.unwrap_err();
            assert!(matches!(err, SoraError::InvalidTaskId(ref got) if got == id));
        }
    }

    #[test]
    fn debug_output_hides_api_key() {
        let client = Client::new("https://api.example.com/v1", "sk-very-secret", "sora-2").unwrap();
        let printed = format!("{client:?}");
        assert!(!printed.contains("sk-very-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
