//! Individual pipeline stages. Each takes the text so far and returns the next.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Tags that render as blocks and must not end up inside a `<p>`.
const BLOCK_TAGS: &str = "ul|pre|h[2-4]";

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^```([\w+#.-]*)[ \t]*\n(.*?)^```$").expect("valid fence regex")
});
static INLINE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("valid inline code regex"));

static H4_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^### (.*)$").expect("valid h4 regex"));
static H3_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## (.*)$").expect("valid h3 regex"));
static H2_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# (.*)$").expect("valid h2 regex"));

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^- (.*)$").expect("valid bullet regex"));
static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[0-9]+\. (.*)$").expect("valid numbered regex"));
static LI_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<li>.*</li>(?:\n<li>.*</li>)*").expect("valid list run regex")
});

static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold regex"));
static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("valid italic regex"));

static BLOCK_CLOSE_BR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"</({BLOCK_TAGS})><br>")).expect("valid block close regex")
});
static BR_BLOCK_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"<br><({BLOCK_TAGS})>")).expect("valid block open regex")
});
static P_BLOCK_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"<p><({BLOCK_TAGS})>")).expect("valid p-block regex")
});
static BLOCK_CLOSE_P_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"</({BLOCK_TAGS})></p>")).expect("valid block-p regex")
});
static EMPTY_P_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>\s*</p>").expect("valid empty paragraph regex"));

/// Escape `&`, `<` and `>`. Runs before any markup is introduced.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Triple-backtick fenced blocks. A missing language tag renders as `text`.
pub fn fenced_code(text: &str) -> String {
    FENCE_RE
        .replace_all(text, |caps: &Captures| {
            let lang = caps
                .get(1)
                .map(|m| m.as_str())
                .filter(|l| !l.is_empty())
                .unwrap_or("text");
            let code = caps.get(2).map_or("", |m| m.as_str()).trim();
            format!(r#"<pre><code class="language-{lang}">{code}</code></pre>"#)
        })
        .into_owned()
}

pub fn inline_code(text: &str) -> String {
    INLINE_CODE_RE
        .replace_all(text, "<code>${1}</code>")
        .into_owned()
}

/// Most specific prefix first, so `### x` never reads as `# ## x`.
pub fn headings(text: &str) -> String {
    let text = H4_RE.replace_all(text, "<h4>${1}</h4>");
    let text = H3_RE.replace_all(&text, "<h3>${1}</h3>");
    H2_RE.replace_all(&text, "<h2>${1}</h2>").into_owned()
}

pub fn list_items(text: &str) -> String {
    let text = BULLET_RE.replace_all(text, "<li>${1}</li>");
    NUMBERED_RE
        .replace_all(&text, "<li>${1}</li>")
        .into_owned()
}

/// Wrap each run of adjacent `<li>` lines in one `<ul>`. The newlines between
/// items stay until `line_breaks` so `emphasis` can't match across items.
pub fn wrap_lists(text: &str) -> String {
    LI_RUN_RE.replace_all(text, "<ul>${0}</ul>").into_owned()
}

/// Bold before italic, otherwise `**a**` becomes two empty italics.
pub fn emphasis(text: &str) -> String {
    let text = BOLD_RE.replace_all(text, "<strong>${1}</strong>");
    ITALIC_RE
        .replace_all(&text, "<em>${1}</em>")
        .into_owned()
}

/// Newlines between list items vanish; elsewhere `\n\n` ends a paragraph and
/// a single `\n` is a `<br>`.
pub fn line_breaks(text: &str) -> String {
    text.replace("</li>\n<li>", "</li><li>")
        .replace("\n\n", "</p><p>")
        .replace('\n', "<br>")
}

pub fn wrap_paragraph(text: &str) -> String {
    format!("<p>{text}</p>")
}

/// Pull block elements out of the paragraphs they were wrapped in, then drop
/// paragraphs left holding only whitespace.
///
/// Goes beyond unwrapping `<ul>` alone: `<pre>` and `<h2>`..`<h4>` are unwrapped
/// too, and a `<br>` touching any of them becomes a paragraph boundary. So
/// `# Title\ntext` renders `<h2>Title</h2><p>text</p>` rather than
/// `<p><h2>Title</h2><br>text</p>`.
pub fn cleanup(text: &str) -> String {
    let text = BLOCK_CLOSE_BR_RE.replace_all(text, "</${1}><p>");
    let text = BR_BLOCK_OPEN_RE.replace_all(&text, "</p><${1}>");
    let text = P_BLOCK_OPEN_RE.replace_all(&text, "<${1}>");
    let text = BLOCK_CLOSE_P_RE.replace_all(&text, "</${1}>");
    EMPTY_P_RE.replace_all(&text, "").into_owned()
}
