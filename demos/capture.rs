//! Basic capture example.
//!
//! Takes a full-page screenshot and a PDF of a page and writes them to disk.
//!
//! Run with: `SNAPAPI_KEY=your-key cargo run --example capture`

use snapapi::{ClientBuilder, ImageFormat, PdfOptions, PdfPageOptions, ScreenshotOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Reads SNAPAPI_KEY and optionally SNAPAPI_BASE_URL
    let client = ClientBuilder::from_env().build()?;

    let image = client
        .screenshot(ScreenshotOptions {
            url: Some("https://example.com".into()),
            format: Some(ImageFormat::Png),
            full_page: Some(true),
            ..Default::default()
        })
        .await?;
    let image = image.into_bytes();
    std::fs::write("example.png", &image)?;
    println!("Wrote example.png ({} bytes)", image.len());

    let pdf = client
        .pdf(PdfOptions {
            url: Some("https://example.com".into()),
            pdf_options: Some(PdfPageOptions {
                page_size: Some("a4".into()),
                print_background: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        })
        .await?;
    let pdf = pdf.into_bytes();
    std::fs::write("example.pdf", &pdf)?;
    println!("Wrote example.pdf ({} bytes)", pdf.len());

    let usage = client.get_usage().await?;
    println!(
        "Usage: {} of {} requests",
        usage.used().unwrap_or_default(),
        match usage.limit() {
            Some(limit) if limit >= 0.0 => limit.to_string(),
            _ => "unlimited".into(),
        }
    );

    Ok(())
}
