//! Deterministic, network-free landing page used when the model path fails.

use super::Section;

/// Name of the fallback section.
pub const FALLBACK_NAME: &str = "AI Generated Page";

/// Description of the fallback section.
pub const FALLBACK_DESCRIPTION: &str = "Complete landing page generated by AI";

/// Build the single fallback section for an idea. Total over all strings.
pub fn fallback_sections(idea: &str) -> Vec<Section> {
    vec![Section {
        name: FALLBACK_NAME.to_owned(),
        description: FALLBACK_DESCRIPTION.to_owned(),
        content: render_page(idea),
        order: 1,
    }]
}

fn render_page(idea: &str) -> String {
    let title = escape_text(&title_case(idea));
    let lowered = escape_text(&idea.to_lowercase());
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <script src="https://cdn.tailwindcss.com"></script>
  <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;600;700&display=swap" rel="stylesheet">
  <style>
    body {{ font-family: 'Inter', sans-serif; }}
  </style>
</head>
<body>
  <div class="min-h-screen bg-gray-50 flex items-center justify-center">
    <div class="max-w-4xl mx-auto p-8 text-center">
      <h1 class="text-5xl font-bold text-gray-900 mb-6">{title}</h1>
      <p class="text-xl text-gray-600 mb-8">
        Welcome to the future of {lowered}. Experience innovation and excellence in every interaction.
      </p>
      <button class="bg-blue-600 text-white px-8 py-3 rounded-lg font-semibold hover:bg-blue-700 transition-colors">
        Get Started
      </button>
    </div>
  </div>
</body>
</html>
"#
    )
}

/// Uppercase the first character of each space-separated word and lowercase
/// the rest. Runs of spaces are preserved.
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.as_str().to_lowercase().chars())
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape text for an HTML text node.
///
/// `<` and `>` are always escaped. `&` is escaped only where it would begin
/// a character reference (`&name;` or `&#...;`), so ordinary ampersands,
/// apostrophes and quotes pass through unchanged.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' if starts_reference(&text[i..]) => out.push_str("&amp;"),
            other => out.push(other),
        }
    }
    out
}

/// Whether `rest` (beginning with `&`) reads as a character reference.
fn starts_reference(rest: &str) -> bool {
    let body = rest.strip_prefix('&').unwrap_or(rest);
    let name_len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '#'))
        .unwrap_or(body.len());
    name_len > 0 && body[name_len..].starts_with(';')
}
