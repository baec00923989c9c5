//! Quick-start example for the sora-video client.
//!
//! Run with:
//!   SORA_API_KEY=sk-... cargo run --example quickstart -- "a lighthouse at dusk" [image-url]
//!
//! Set RUST_LOG=sora_video=debug to see each request.

use std::time::Duration;

use sora_video::{ClientBuilder, GenerationOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> sora_video::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let prompt = args
        .next()
        .unwrap_or_else(|| "a paper boat drifting down a rainy street".to_string());
    let image_url = args.next().unwrap_or_default();

    // -----------------------------------------------------------------------
    // 1. Create a client (reads SORA_API_KEY / OPENAI_API_KEY from environment)
    // -----------------------------------------------------------------------
    let client = ClientBuilder::new().build()?;

    // Or configure everything explicitly:
    // let client = sora_video::Client::new("https://api.openai.com/v1", "sk-...", "sora-2")?;

    // -----------------------------------------------------------------------
    // 2. Submit the job
    // -----------------------------------------------------------------------
    let opts = GenerationOptions::default()
        .with_duration(8)
        .with_resolution("1280x720");
    let mut task = client.generate_video(&image_url, &prompt, &opts).await?;
    println!("Submitted task {} (status: {})", task.task_id, task.status);

    // -----------------------------------------------------------------------
    // 3. Poll until the task is done. A failed lookup is reported and retried
    //    on the next tick instead of ending the loop.
    // -----------------------------------------------------------------------
    let poll_interval = Duration::from_secs(10);
    let mut attempts = 0;
    while !task.is_terminal() && attempts < 90 {
        tokio::time::sleep(poll_interval).await;
        attempts += 1;

        match client.get_task_status(&task.task_id).await {
            Ok(next) => {
                println!("  Status: {} ({}%)", next.status, next.progress);
                task = next;
            }
            Err(e) => eprintln!("  lookup failed, will retry: {e}"),
        }
    }

    // -----------------------------------------------------------------------
    // 4. Report
    // -----------------------------------------------------------------------
    if task.completed {
        match task.video_url {
            Some(url) => println!("Video ready: {url}"),
            None => println!("Task completed; download the content via the provider's API."),
        }
    } else if let Some(err) = task.error {
        eprintln!("Generation failed: {err}");
    } else {
        eprintln!("Gave up waiting; last status was {}", task.status);
    }

    Ok(())
}
