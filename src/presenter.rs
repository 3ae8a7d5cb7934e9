use chrono::{DateTime, Utc};
use image::ImageFormat;
use include_dir::{include_dir, Dir};

use crate::models::GeneratedImage;

static ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Looks up an embedded static file and guesses its content type from the extension.
pub fn asset(path: &str) -> Option<(&'static str, &'static [u8])> {
    let file = ASSETS.get_file(path)?;
    let content_type = match path.rsplit('.').next() {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    };
    Some((content_type, file.contents()))
}

pub fn form_page() -> &'static str {
    ASSETS
        .get_file("index.html")
        .and_then(|f| f.contents_utf8())
        .unwrap_or("<!doctype html><title>CozyCraft</title><p>Form unavailable.</p>")
}

/// `cozycraft-design-<unix millis>.<ext>`, extension taken from the MIME type.
pub fn download_name(mime_type: &str, now: DateTime<Utc>) -> String {
    let ext = ImageFormat::from_mime_type(mime_type)
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("jpg");
    format!("cozycraft-design-{}.{}", now.timestamp_millis(), ext)
}

pub fn result_page(image: &GeneratedImage, prompt: &str, now: DateTime<Utc>) -> String {
    let uri = escape_html(&image.data_uri());
    let name = download_name(&image.mime_type, now);
    let body = format!(
        r#"<h2>🖼️ Your Custom Design</h2>
<div class="preview-container">
  <img src="{uri}" alt="Generated clothing design" class="design-image">
  <div class="preview-actions">
    <a class="action-button download-button" href="{uri}" download="{name}">⬇️ Download Image</a>
    <a class="action-button" href="/">✏️ New Design</a>
  </div>
</div>
<div class="prompt-details">
  <details>
    <summary>📝 View Generation Prompt</summary>
    <p class="prompt-text">{prompt}</p>
  </details>
</div>"#,
        prompt = escape_html(prompt),
    );
    page("Your Custom Design", &body)
}

pub fn error_page(title: &str, messages: &[String]) -> String {
    let items: String = messages.iter().map(|m| format!("<li>{}</li>", escape_html(m))).collect();
    let body = format!(
        r#"<h2>⚠️ {}</h2>
<ul class="error-list">{}</ul>
<p><a class="action-button" href="/">← Back to the form</a></p>"#,
        escape_html(title),
        items
    );
    page(title, &body)
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>CozyCraft · {}</title>
<link rel="stylesheet" href="/assets/style.css">
</head>
<body>
<main class="design-preview">
{}
</main>
</body>
</html>"#,
        escape_html(title),
        body
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
