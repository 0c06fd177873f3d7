//! Markdown-to-HTML rendering for assistant replies.
//!
//! This module implements the small Markdown subset the course assistant
//! emits: fenced and inline code, ATX headers, bold/italic, links, flat
//! bullet and numbered lists, blockquotes, and paragraphs. The subset is
//! deliberately limited (no nested emphasis, no escaped punctuation, no
//! tables) and rendering is a pure function from text to markup.
//!
//! Passes run in a fixed order. Code content is extracted first, escaped,
//! and parked behind placeholder tokens so no later pass can touch it; the
//! placeholders are swapped back as the final pass.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::escape::escape;

static FENCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(\w+)?\n(.*?)```").expect("fenced code regex compiles"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("inline code regex compiles"));
static HEADING_3: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^### (.*)$").expect("h3 regex compiles"));
static HEADING_2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## (.*)$").expect("h2 regex compiles"));
static HEADING_1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# (.*)$").expect("h1 regex compiles"));
static BOLD_STARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^\*\n]+)\*\*").expect("bold regex compiles"));
static BOLD_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([^_\n]+)__").expect("bold regex compiles"));
static ITALIC_STARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^\*\n]+)\*").expect("italic regex compiles"));
static ITALIC_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([^_\n]+)_").expect("italic regex compiles"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link regex compiles"));
static UNORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*]\s+(.+)$").expect("bullet regex compiles"));
static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+(.+)$").expect("numbered regex compiles"));
static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^&gt;\s*(.+)$").expect("blockquote regex compiles"));
static BLOCK_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(<(h[1-6]|ul|ol|pre|blockquote)|___CODE_BLOCK_)")
        .expect("block start regex compiles")
});

/// Protected code spans extracted in the first pass.
///
/// Maps placeholder tokens (by index) to already-escaped HTML for fenced
/// blocks and inline code. Lives for a single [`render`] call.
#[derive(Debug, Default)]
struct ProtectedSpans {
    code_blocks: Vec<String>,
    inline_code: Vec<String>,
}

/// Renders a Markdown string to HTML.
///
/// Pure and deterministic: the same input always yields the same output.
/// Empty input yields empty output; unmatched markers (a stray `*`, an
/// unterminated backtick) are left as literal text.
///
/// # Example
///
/// ```
/// use lectern::markdown::render;
///
/// assert_eq!(
///     render("**Hello** and *world*"),
///     "<p><strong>Hello</strong> and <em>world</em></p>",
/// );
/// ```
pub fn render(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let (text, spans) = extract_protected(text);
    let text = replace_headings(&text);
    let text = replace_emphasis(&text);
    let text = replace_links(&text);
    let text = group_lists(&text);
    let text = replace_blockquotes(&text);
    let html = wrap_paragraphs(&text);
    restore_protected(html, &spans)
}

/// Pass 1: pull fenced blocks and inline code out of the text, escape their
/// contents, and leave unique placeholder tokens behind.
fn extract_protected(text: &str) -> (String, ProtectedSpans) {
    let mut spans = ProtectedSpans::default();

    let text = FENCED_CODE.replace_all(text, |caps: &Captures| {
        let lang = caps.get(1).map(|m| m.as_str()).unwrap_or("text");
        let code = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let index = spans.code_blocks.len();
        spans.code_blocks.push(format!(
            "<pre><code class=\"language-{lang}\">{}</code></pre>",
            escape(code.trim())
        ));
        format!("___CODE_BLOCK_{index}___")
    });

    let text = INLINE_CODE.replace_all(&text, |caps: &Captures| {
        let index = spans.inline_code.len();
        spans
            .inline_code
            .push(format!("<code>{}</code>", escape(&caps[1])));
        format!("___INLINE_CODE_{index}___")
    });

    (text.into_owned(), spans)
}

/// Pass 8: swap the placeholder tokens back. Each token occurs exactly once.
fn restore_protected(mut html: String, spans: &ProtectedSpans) -> String {
    for (index, block) in spans.code_blocks.iter().enumerate() {
        html = html.replacen(&format!("___CODE_BLOCK_{index}___"), block, 1);
    }
    for (index, code) in spans.inline_code.iter().enumerate() {
        html = html.replacen(&format!("___INLINE_CODE_{index}___"), code, 1);
    }
    html
}

/// Pass 2: ATX headers, most-specific prefix first so `##` never misfires
/// on a `###` line.
fn replace_headings(text: &str) -> String {
    let text = HEADING_3.replace_all(text, "<h3>$1</h3>");
    let text = HEADING_2.replace_all(&text, "<h2>$1</h2>");
    HEADING_1.replace_all(&text, "<h1>$1</h1>").into_owned()
}

/// Pass 3: bold before italic so `**x**` is never half-eaten by the italic
/// rule. Italic markers adjacent to word characters stay literal.
fn replace_emphasis(text: &str) -> String {
    let text = BOLD_STARS.replace_all(text, "<strong>$1</strong>");
    let text = BOLD_UNDERSCORES.replace_all(&text, "<strong>$1</strong>");
    let text = replace_italic(&text, &ITALIC_STARS);
    replace_italic(&text, &ITALIC_UNDERSCORES)
}

fn replace_italic(text: &str, pattern: &Regex) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in pattern.captures_iter(text) {
        let whole = caps.get(0).expect("capture 0 always present");
        if word_adjacent(text, whole.start(), whole.end()) {
            continue;
        }
        out.push_str(&text[last..whole.start()]);
        out.push_str("<em>");
        out.push_str(&caps[1]);
        out.push_str("</em>");
        last = whole.end();
    }
    out.push_str(&text[last..]);
    out
}

fn word_adjacent(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    before.is_some_and(is_word_char) || after.is_some_and(is_word_char)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Pass 4: `[label](url)` links, opened in a new context with no
/// back-reference to the opener.
fn replace_links(text: &str) -> String {
    LINK.replace_all(
        text,
        "<a href=\"$2\" target=\"_blank\" rel=\"noopener noreferrer\">$1</a>",
    )
    .into_owned()
}

/// Pass 5: group consecutive bullet lines into `<ul>` and numbered lines
/// into `<ol>`. A non-list line closes the open list; switching marker type
/// closes the old list and opens a new one with no blank line needed.
fn group_lists(text: &str) -> String {
    let mut processed: Vec<String> = Vec::new();
    let mut open: Option<&'static str> = None;

    for line in text.split('\n') {
        let trimmed = line.trim();
        if let Some(caps) = UNORDERED_ITEM.captures(trimmed) {
            if open != Some("ul") {
                if let Some(tag) = open.take() {
                    processed.push(format!("</{tag}>"));
                }
                processed.push("<ul>".to_string());
                open = Some("ul");
            }
            processed.push(format!("<li>{}</li>", &caps[1]));
        } else if let Some(caps) = ORDERED_ITEM.captures(trimmed) {
            if open != Some("ol") {
                if let Some(tag) = open.take() {
                    processed.push(format!("</{tag}>"));
                }
                processed.push("<ol>".to_string());
                open = Some("ol");
            }
            processed.push(format!("<li>{}</li>", &caps[1]));
        } else {
            if let Some(tag) = open.take() {
                processed.push(format!("</{tag}>"));
            }
            processed.push(line.to_string());
        }
    }
    if let Some(tag) = open {
        processed.push(format!("</{tag}>"));
    }
    processed.join("\n")
}

/// Pass 6: blockquotes. Matches the escaped `&gt;` sequence, since a raw `>`
/// would already have been escaped by the time it reaches this pass.
fn replace_blockquotes(text: &str) -> String {
    BLOCKQUOTE
        .replace_all(text, "<blockquote>$1</blockquote>")
        .into_owned()
}

/// Pass 7: split on blank lines into paragraphs. A paragraph already
/// starting with a block-level tag (or a fenced-code placeholder) stays
/// unwrapped; anything else is wrapped in `<p>` with inner newlines as
/// `<br>`.
fn wrap_paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(|para| {
            let para = para.trim();
            if para.is_empty() {
                String::new()
            } else if BLOCK_START.is_match(para) {
                para.to_string()
            } else {
                format!("<p>{}</p>", para.replace('\n', "<br>"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
