//! Standalone HTML export of a stored idea's landing page.

use crate::generation::fallback::escape_text;
use crate::store::WebsiteIdea;

/// Render the idea's landing page as a complete HTML document.
///
/// The first section is the landing page. Content that is already a full
/// document is returned as-is; a fragment is wrapped in a minimal shell.
pub fn render_landing_page(idea: &WebsiteIdea) -> String {
    let content = idea
        .sections
        .first()
        .map(|s| s.content.as_str())
        .unwrap_or_default();

    if is_complete_document(content) {
        return content.to_owned();
    }

    let title = escape_text(&idea.idea);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        body {{ margin: 0; padding: 0; }}
        @media (max-width: 768px) {{
            .container {{ padding: 1rem; }}
        }}
    </style>
</head>
<body>
{content}
</body>
</html>
"#
    )
}

/// Whether the content carries its own doctype.
pub fn is_complete_document(content: &str) -> bool {
    content.to_ascii_lowercase().contains("<!doctype html>")
}

/// Download file name: whitespace runs become `-`, lowercased, anything
/// outside `[a-z0-9-]` dropped, suffixed with `-landing-page.html`.
pub fn export_file_name(idea: &str) -> String {
    let slug = idea
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect::<String>();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        return "landing-page.html".to_owned();
    }
    format!("{slug}-landing-page.html")
}
