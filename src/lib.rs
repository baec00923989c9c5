//! # sora-video
//!
//! Async Rust client for Sora-style video generation APIs. Submit a
//! text-to-video or image-to-video job, then poll its status until the
//! provider reports it finished.
//!
//! The client never polls on its own: each call is one HTTP round trip and
//! the caller owns the poll interval, retries and give-up policy.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::time::Duration;
//! use sora_video::{ClientBuilder, GenerationOptions};
//!
//! #[tokio::main]
//! async fn main() -> sora_video::Result<()> {
//!     // Reads SORA_API_KEY (or OPENAI_API_KEY) from the environment.
//!     let client = ClientBuilder::new().build()?;
//!
//!     let opts = GenerationOptions::default()
//!         .with_duration(8)
//!         .with_resolution("1280x720");
//!     let mut task = client
//!         .generate_video("https://example.com/first-frame.png", "a cat surfing", &opts)
//!         .await?;
//!
//!     while !task.is_terminal() {
//!         tokio::time::sleep(Duration::from_secs(10)).await;
//!         task = client.get_task_status(&task.task_id).await?;
//!         println!("{}: {}%", task.status, task.progress);
//!     }
//!
//!     match (task.video_url, task.error) {
//!         (Some(url), _) => println!("video ready: {url}"),
//!         (None, Some(err)) => eprintln!("generation failed: {err}"),
//!         (None, None) => eprintln!("finished without a video URL"),
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod errors;
mod models;
mod request;
mod response;

pub use client::{
    Client, ClientBuilder, API_KEY_ENV_VARS, DEFAULT_BASE_URL, DEFAULT_MODEL, REQUEST_TIMEOUT,
};
pub use errors::{Result, SoraError};
pub use models::{GenerationOptions, VideoResult, DEFAULT_DURATION_SECS};
pub use request::SubmissionForm;
pub use response::resolve_video_url;
