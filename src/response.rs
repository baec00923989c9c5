//! Turns provider replies into [`VideoResult`]s.
//!
//! Submission and status lookup share the translation but differ on purpose
//! in how strict they are:
//!
//! | step                   | submission              | status lookup            |
//! |------------------------|-------------------------|--------------------------|
//! | HTTP status check      | must be 200 or 201      | skipped                  |
//! | JSON parse failure     | error                   | error                    |
//! | body is JSON `null`    | parse error             | empty snapshot           |
//! | provider `error` field | error                   | `VideoResult::error`     |
//!
//! Status lookups run inside a caller's poll loop, and the caller decides
//! when a failed task ends the loop.

use tracing::{debug, warn};

use crate::errors::{Result, SoraError};
use crate::models::{non_empty, ProviderResponse, VideoResult};

/// Status codes accepted from `POST /videos`.
const ACCEPTED_SUBMISSION_STATUS: [u16; 2] = [200, 201];

/// The one status string that means the video is ready. Compared exactly.
pub(crate) const COMPLETED_STATUS: &str = "completed";

/// Pick the video location out of the two places the provider may put it.
///
/// The flat `video_url` field wins whenever it is non-empty; the nested
/// `video.url` is used only as a fallback. Empty strings count as missing.
/// Read the location through this function only, never from either field.
pub fn resolve_video_url(flat: Option<&str>, nested: Option<&str>) -> Option<String> {
    non_empty(flat).or(non_empty(nested)).map(str::to_string)
}

/// Normalize a `POST /videos` reply. Any failure aborts the submission.
pub(crate) fn normalize_submission(status_code: u16, body: &[u8]) -> Result<VideoResult> {
    if !ACCEPTED_SUBMISSION_STATUS.contains(&status_code) {
        let body = String::from_utf8_lossy(body).into_owned();
        warn!(status_code, "video submission rejected");
        return Err(SoraError::Api { status_code, body });
    }

    let resp: ProviderResponse = serde_json::from_slice(body)?;

    if let Some(message) = resp.error_message() {
        warn!(kind = resp.error_kind(), "provider rejected submission: {message}");
        return Err(SoraError::Provider {
            message: message.to_string(),
            kind: resp.error_kind().map(str::to_string),
        });
    }

    Ok(to_video_result(resp, None))
}

/// Normalize a `GET /videos/{id}` reply, whatever its HTTP status.
/// A provider error is reported through [`VideoResult::error`]; a `null`
/// body yields an empty snapshot.
pub(crate) fn normalize_status(body: &[u8]) -> Result<VideoResult> {
    let resp = serde_json::from_slice::<Option<ProviderResponse>>(body)?.unwrap_or_default();

    let error = resp.error_message().map(str::to_string);
    if let Some(ref message) = error {
        warn!(task_id = resp.id.as_deref(), "task reported an error: {message}");
    }

    Ok(to_video_result(resp, error))
}

fn to_video_result(resp: ProviderResponse, error: Option<String>) -> VideoResult {
    let video_url = resolve_video_url(resp.video_url.as_deref(), resp.nested_video_url());
    let status = resp.status.unwrap_or_default();

    let result = VideoResult {
        task_id: resp.id.unwrap_or_default(),
        completed: status == COMPLETED_STATUS,
        status,
        video_url,
        error,
        progress: resp.progress.unwrap_or(0),
    };

    debug!(
        task_id = %result.task_id,
        status = %result.status,
        progress = result.progress,
        "normalized video task"
    );
    result
}
