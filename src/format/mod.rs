//! Lightweight markup to HTML.
//!
//! Not a markdown parser: a fixed pipeline of substitutions applied in order.
//! Later stages see the output of earlier ones, so reordering [`STAGES`]
//! changes the result. Running the pipeline twice re-escapes its own output.

pub mod stages;

pub type Stage = fn(&str) -> String;

/// The pipeline, in application order.
pub const STAGES: &[(&str, Stage)] = &[
    ("escape", stages::escape),
    ("fenced_code", stages::fenced_code),
    ("inline_code", stages::inline_code),
    ("headings", stages::headings),
    ("list_items", stages::list_items),
    ("wrap_lists", stages::wrap_lists),
    ("emphasis", stages::emphasis),
    ("line_breaks", stages::line_breaks),
    ("wrap_paragraph", stages::wrap_paragraph),
    ("cleanup", stages::cleanup),
];

/// Render `text` as HTML. Empty or absent input renders as an empty string.
pub fn to_html<'a>(text: impl Into<Option<&'a str>>) -> String {
    let Some(text) = text.into().filter(|t| !t.is_empty()) else {
        return String::new();
    };
    STAGES
        .iter()
        .fold(text.to_string(), |html, (_, stage)| stage(&html))
}
