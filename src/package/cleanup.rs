//! Markup fixes applied to the standalone copy.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BASE_TAG: Regex = Regex::new(r"<base[^>]*>").unwrap();
    static ref WRAPPED_DISPLAY_MATH: Regex = Regex::new(r"(?s)<p>\s*(\$\$.*?\$\$)\s*</p>").unwrap();
    static ref DISPLAY_MATH: Regex = Regex::new(r"\$\$[^$]+\$\$").unwrap();
    static ref BLANK_RUN: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Class of the container placed around display math.
pub const MATH_DISPLAY_CLASS: &str = "math-display";

const MATH_DISPLAY_CSS: &str = r#"
        .math-display {
            margin: 1.5em 0;
            text-align: center;
            overflow-x: auto;
        }
    "#;

/// Run every cleanup step in order.
pub fn standalone_cleanup(html: &str) -> String {
    let html = strip_base_tag(html);
    let html = unwrap_display_math(&html);
    let html = wrap_display_math(&html);
    let html = collapse_blank_lines(&html);
    inject_math_css(&html)
}

/// Remove `<base>`; the bundle only uses relative paths.
pub fn strip_base_tag(html: &str) -> String {
    BASE_TAG.replace_all(html, "").into_owned()
}

/// `<p>$$...$$</p>` becomes the bare block on its own lines.
pub fn unwrap_display_math(html: &str) -> String {
    WRAPPED_DISPLAY_MATH
        .replace_all(html, "\n${1}\n")
        .into_owned()
}

/// Put a `math-display` div around every `$$...$$` block that stands on its
/// own: after a tag or line break, and before a tag or line break, with only
/// whitespace in between.
pub fn wrap_display_math(html: &str) -> String {
    let mut output = String::with_capacity(html.len());
    let mut copied = 0;

    for m in DISPLAY_MATH.find_iter(html) {
        if m.start() < copied {
            continue;
        }
        let Some(start) = block_start(html, copied, m.start()) else {
            continue;
        };
        let Some(end) = block_end(html, m.end()) else {
            continue;
        };

        output.push_str(&html[copied..start]);
        output.push_str(&format!(
            "\n<div class=\"{}\">\n{}\n</div>\n",
            MATH_DISPLAY_CLASS,
            m.as_str().trim()
        ));
        copied = end;
    }

    output.push_str(&html[copied..]);
    output
}

/// Earliest offset in the whitespace before `at` that directly follows `>`
/// or a newline.
fn block_start(html: &str, floor: usize, at: usize) -> Option<usize> {
    let gap_start = floor + html[floor..at].trim_end().len();
    if matches!(html[..gap_start].chars().next_back(), Some('>' | '\n')) {
        return Some(gap_start);
    }
    html[gap_start..at].find('\n').map(|i| gap_start + i + 1)
}

/// Latest offset in the whitespace after `end` that directly precedes `<`
/// or a newline.
fn block_end(html: &str, end: usize) -> Option<usize> {
    let rest = &html[end..];
    let gap_end = end + (rest.len() - rest.trim_start().len());
    if html[gap_end..].starts_with('<') {
        return Some(gap_end);
    }
    html[end..gap_end].rfind('\n').map(|i| end + i)
}

/// Squeeze runs of blank lines down to one.
pub fn collapse_blank_lines(html: &str) -> String {
    BLANK_RUN.replace_all(html, "\n\n").into_owned()
}

/// Add the `math-display` rule before the first `</style>`, if any.
pub fn inject_math_css(html: &str) -> String {
    match html.find("</style>") {
        Some(pos) => {
            let mut output = String::with_capacity(html.len() + MATH_DISPLAY_CSS.len() + 8);
            output.push_str(&html[..pos]);
            output.push_str(MATH_DISPLAY_CSS);
            output.push_str("\n    ");
            output.push_str(&html[pos..]);
            output
        }
        None => html.to_string(),
    }
}
