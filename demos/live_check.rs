//! Live API check - exercises every endpoint against a real deployment.
//!
//! Run with: `SNAPAPI_KEY=sk_live_xxx cargo run --example live_check`

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use snapapi::{
    AnalyzeOptions, BatchOptions, Client, ClientBuilder, Error, ExtractFormat, ExtractOptions,
    ImageFormat, Output, PdfOptions, PdfPageOptions, ResponseType, ScreenshotOptions,
    VideoOptions,
};
use std::future::Future;
use std::time::Duration;

const TEST_URL: &str = "https://example.com";

fn header(text: &str) {
    println!();
    println!("{}", format!(" {} ", text).on_blue().bold());
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn bytes_of(output: &Output, min: usize) -> Result<String, String> {
    match output.as_bytes() {
        Some(b) if b.len() >= min => Ok(format!("{} bytes", b.len())),
        Some(b) => Err(format!("payload too small: {} bytes", b.len())),
        None => Err("expected binary payload".into()),
    }
}

fn keys_of(value: &Value) -> Result<String, String> {
    match value.as_object() {
        Some(map) if !map.is_empty() => Ok(format!(
            "keys: {}",
            map.keys().take(5).cloned().collect::<Vec<_>>().join(",")
        )),
        _ => Err("empty JSON response".into()),
    }
}

/// Plan limitations are reported as skips rather than failures.
fn plan_limited(err: &Error) -> bool {
    err.message().to_lowercase().contains("plan")
}

#[derive(Default)]
struct Tally {
    passed: u32,
    failed: u32,
    skipped: u32,
    failures: Vec<String>,
}

impl Tally {
    async fn check<F>(&mut self, name: &str, fut: F)
    where
        F: Future<Output = Result<Result<String, String>, Error>>,
    {
        let pb = spinner(name);
        let outcome = fut.await;
        pb.finish_and_clear();

        match outcome {
            Ok(Ok(detail)) => {
                self.passed += 1;
                println!("{} {} {}", "✔".green(), name, detail.dimmed());
            }
            Ok(Err(reason)) => {
                self.failed += 1;
                println!("{} {}: {}", "✖".red(), name, reason);
                self.failures.push(format!("{}: {}", name, reason));
            }
            Err(err) if plan_limited(&err) => {
                self.skipped += 1;
                println!("{} {} {}", "⚠".yellow(), name, "skipped (plan limitation)".dimmed());
            }
            Err(err) => {
                self.failed += 1;
                println!("{} {}: {}", "✖".red(), name, err);
                self.failures.push(format!("{}: {}", name, err));
            }
        }
    }
}

fn screenshot_of(url: &str) -> ScreenshotOptions {
    ScreenshotOptions {
        url: Some(url.into()),
        ..Default::default()
    }
}

#[tokio::main]
async fn main() {
    let client: Client = match ClientBuilder::from_env().build() {
        Ok(client) => client,
        Err(err) => {
            eprintln!("{} {}", "✖".red(), err);
            eprintln!("Usage: SNAPAPI_KEY=sk_live_xxx cargo run --example live_check");
            std::process::exit(1);
        }
    };
    let mut tally = Tally::default();

    header("Account");
    tally
        .check("GET /v1/ping", async { Ok::<_, Error>(keys_of(&client.ping().await?)) })
        .await;
    tally
        .check("GET /v1/usage", async {
            let usage = client.get_usage().await?;
            Ok::<_, Error>(Ok(format!("used={:?} limit={:?}", usage.used(), usage.limit())))
        })
        .await;
    tally
        .check("GET /v1/devices", async {
            Ok::<_, Error>(keys_of(&client.get_devices().await?))
        })
        .await;
    tally
        .check("GET /v1/capabilities", async {
            Ok::<_, Error>(keys_of(&client.get_capabilities().await?))
        })
        .await;

    header("Screenshots");
    for format in [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Webp] {
        let name = format!("POST /v1/screenshot format={:?}", format);
        tally
            .check(&name, async {
                let out = client
                    .screenshot(ScreenshotOptions {
                        format: Some(format),
                        ..screenshot_of(TEST_URL)
                    })
                    .await?;
                Ok::<_, Error>(bytes_of(&out, 500))
            })
            .await;
    }
    for response_type in [ResponseType::Json, ResponseType::Base64] {
        let name = format!("POST /v1/screenshot responseType={:?}", response_type);
        tally
            .check(&name, async {
                let out = client
                    .screenshot(ScreenshotOptions {
                        response_type: Some(response_type),
                        include_metadata: Some(true),
                        ..screenshot_of(TEST_URL)
                    })
                    .await?;
                let checked = out
                    .as_json()
                    .ok_or_else(|| "expected JSON".to_string())
                    .and_then(keys_of);
                Ok::<_, Error>(checked)
            })
            .await;
    }
    tally
        .check("POST /v1/screenshot html", async {
            let out = client
                .screenshot_from_html("<html><body style=\"background:blue\"><h1>Test</h1></body></html>")
                .await?;
            Ok::<_, Error>(bytes_of(&out, 500))
        })
        .await;
    tally
        .check("POST /v1/screenshot markdown", async {
            let out = client
                .screenshot_from_markdown("# Hello\n\n**Bold** and *italic*.\n\n- Item 1\n- Item 2")
                .await?;
            Ok::<_, Error>(bytes_of(&out, 500))
        })
        .await;
    tally
        .check("POST /v1/screenshot device", async {
            let out = client.screenshot_device(TEST_URL, "iphone-15-pro").await?;
            Ok::<_, Error>(bytes_of(&out, 500))
        })
        .await;
    tally
        .check("POST /v1/screenshot css+js", async {
            let out = client
                .screenshot(ScreenshotOptions {
                    css: Some("body { background: red !important; }".into()),
                    javascript: Some("document.title = 'Modified';".into()),
                    ..screenshot_of(TEST_URL)
                })
                .await?;
            Ok::<_, Error>(bytes_of(&out, 500))
        })
        .await;
    tally
        .check("POST /v1/screenshot blocking", async {
            let out = client
                .screenshot(ScreenshotOptions {
                    block_ads: Some(true),
                    block_trackers: Some(true),
                    block_cookie_banners: Some(true),
                    block_chat_widgets: Some(true),
                    ..screenshot_of(TEST_URL)
                })
                .await?;
            Ok::<_, Error>(bytes_of(&out, 500))
        })
        .await;

    header("Documents");
    tally
        .check("POST /v1/pdf", async {
            let out = client
                .pdf(PdfOptions {
                    url: Some(TEST_URL.into()),
                    pdf_options: Some(PdfPageOptions {
                        page_size: Some("a4".into()),
                        landscape: Some(true),
                        print_background: Some(true),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .await?;
            Ok::<_, Error>(match out.as_bytes() {
                Some(b) if b.starts_with(b"%PDF") => Ok(format!("{} bytes", b.len())),
                _ => Err("not a PDF file".to_string()),
            })
        })
        .await;
    tally
        .check("POST /v1/video", async {
            let out = client
                .video(VideoOptions {
                    url: TEST_URL.into(),
                    duration: Some(3),
                    width: Some(800),
                    height: Some(600),
                    ..Default::default()
                })
                .await?;
            Ok::<_, Error>(bytes_of(&out, 1000))
        })
        .await;

    header("Batch and async jobs");
    tally
        .check("POST /v1/screenshot/batch", async {
            let job = client
                .batch(BatchOptions {
                    urls: vec![TEST_URL.into(), "https://example.org".into()],
                    format: Some(ImageFormat::Png),
                    ..Default::default()
                })
                .await?;
            let Some(id) = job.job_id() else {
                return Ok(Err("no job id returned".to_string()));
            };
            tokio::time::sleep(Duration::from_secs(3)).await;
            let status = client.get_batch_status(&id).await?;
            Ok::<_, Error>(Ok(format!("job={} status={:?}", id, status.status())))
        })
        .await;
    tally
        .check("POST /v1/screenshot async + poll", async {
            let job = client.screenshot_async(screenshot_of(TEST_URL)).await?;
            let Some(id) = job.job_id() else {
                return Ok(Err("no job id returned".to_string()));
            };
            for _ in 0..10 {
                tokio::time::sleep(Duration::from_secs(2)).await;
                let status = client.get_screenshot_status(&id).await?;
                if status.is_terminal() {
                    return Ok(Ok(format!("job={} status={:?}", id, status.status())));
                }
            }
            Ok::<_, Error>(Err(format!("job {} did not finish", id)))
        })
        .await;

    header("Content");
    for format in [
        ExtractFormat::Html,
        ExtractFormat::Text,
        ExtractFormat::Markdown,
        ExtractFormat::Article,
        ExtractFormat::Links,
        ExtractFormat::Images,
        ExtractFormat::Metadata,
        ExtractFormat::Structured,
    ] {
        let name = format!("POST /v1/extract format={:?}", format);
        tally
            .check(&name, async {
                let value = client
                    .extract(ExtractOptions {
                        url: TEST_URL.into(),
                        format: Some(format),
                        ..Default::default()
                    })
                    .await?;
                Ok::<_, Error>(keys_of(&value))
            })
            .await;
    }
    tally
        .check("POST /v1/analyze", async {
            let value = client
                .analyze(AnalyzeOptions {
                    url: TEST_URL.into(),
                    prompt: Some("What color is the background?".into()),
                    ..Default::default()
                })
                .await?;
            Ok::<_, Error>(keys_of(&value))
        })
        .await;

    header("Errors");
    tally
        .check("invalid URL is rejected by the API", async {
            Ok::<_, Error>(match client.screenshot(screenshot_of("not-a-url")).await {
                Err(Error::Api(err)) if err.status >= 400 => {
                    Ok(format!("code={} status={}", err.code, err.status))
                }
                Err(err) => Err(format!("unexpected error: {}", err)),
                Ok(_) => Err("should have failed".to_string()),
            })
        })
        .await;
    tally
        .check("missing source is rejected locally", async {
            Ok::<_, Error>(match client.screenshot(ScreenshotOptions::default()).await {
                Err(Error::Validation { message }) => Ok(message),
                Err(err) => Err(format!("unexpected error: {}", err)),
                Ok(_) => Err("should have failed".to_string()),
            })
        })
        .await;

    println!();
    println!(
        "Results: {} passed, {} failed, {} skipped",
        tally.passed.to_string().green().bold(),
        tally.failed.to_string().red().bold(),
        tally.skipped.to_string().yellow()
    );
    if !tally.failures.is_empty() {
        println!();
        println!("{}", "Failed checks:".red().bold());
        for failure in &tally.failures {
            println!("  - {}", failure);
        }
    }

    std::process::exit(if tally.failed > 0 { 1 } else { 0 });
}
