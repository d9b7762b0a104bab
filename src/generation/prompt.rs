//! Prompt construction for landing-page generation.

/// System-role directive: persona plus the hard output-format constraint.
pub const SYSTEM_PROMPT: &str = "\
You are an expert web designer and copywriter specializing in high-converting landing pages. \
Generate beautiful, modern website sections with professional Tailwind CSS styling. \
You must return ONLY valid JSON with no additional formatting or text.";

/// The two messages sent for one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// System-role message.
    pub system: String,
    /// User-role message with the idea embedded.
    pub user: String,
}

/// Build the instruction payload for an idea. Pure; accepts any string.
pub fn build_prompt(idea: &str) -> Prompt {
    Prompt {
        system: SYSTEM_PROMPT.to_owned(),
        user: user_prompt(idea),
    }
}

fn user_prompt(idea: &str) -> String {
    format!(
        r#"You are an AI web designer with unlimited creative freedom. Create a complete landing page for: "{idea}".

You have ZERO constraints. Design everything from scratch:
- Choose ANY color scheme that fits the topic
- Pick ANY fonts and typography style
- Create ANY layout structure you want
- Use ANY content tone (playful, serious, minimal, bold, etc.)
- Design ANY visual style (modern, vintage, artistic, corporate, fun, etc.)
- Include ANY sections you think are needed
- Write ALL content yourself based on the topic

Generate 1 complete HTML landing page in this JSON format:
[
  {{
    "name": "AI Generated Landing Page",
    "description": "Complete creative landing page",
    "content": "your_complete_html_page_here",
    "order": 1
  }}
]

Rules:
- Base EVERYTHING on the topic: "{idea}"
- Use your creativity to decide style, colors, layout, content
- Make it a complete HTML page with CSS
- Include CDN links for any CSS frameworks you want
- Write realistic content for the topic
- Make it professional and conversion-focused
- No restrictions on design choices

Return ONLY the JSON array, nothing else."#
    )
}
