//! Markdown to HTML conversion.

use crate::math::{MathTable, Segment};
use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

fn options() -> Options {
    // Fenced code blocks are part of CommonMark itself.
    Options::ENABLE_TABLES
}

/// Convert protected Markdown to an HTML fragment, putting `math` back.
///
/// Inline math in running text is emitted verbatim. Inside code spans and
/// code blocks it is restored before escaping, so it reads as written. Raw
/// HTML, including the display math comments, is emitted unchanged and
/// restored afterwards.
pub fn to_html(input: &str, math: &MathTable) -> String {
    let mut events = Vec::new();
    let mut in_code_block = false;

    for event in Parser::new_ext(input, options()) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                events.push(Event::Start(Tag::CodeBlock(kind)));
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                events.push(Event::End(TagEnd::CodeBlock));
            }
            Event::Text(text) if in_code_block => {
                events.push(Event::Text(math.restore(&text).into()));
            }
            Event::Code(code) => events.push(Event::Code(math.restore(&code).into())),
            Event::Text(text) => {
                for segment in math.segments(&text) {
                    events.push(match segment {
                        Segment::Text(t) => Event::Text(t.to_string().into()),
                        Segment::Math(m) => Event::InlineHtml(m.to_string().into()),
                    });
                }
            }
            other => events.push(other),
        }
    }

    let mut output = String::with_capacity(input.len() * 3 / 2);
    html::push_html(&mut output, events.into_iter());
    math.restore(&output)
}

/// Plain text of the first level-1 heading, if any.
pub fn first_heading(input: &str) -> Option<String> {
    let mut in_heading = false;
    let mut text = String::new();

    for event in Parser::new_ext(input, options()) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => in_heading = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) if in_heading => {
                let title = text.trim();
                return (!title.is_empty()).then(|| title.to_string());
            }
            Event::Text(t) | Event::Code(t) if in_heading => text.push_str(&t),
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::protect;
    use pretty_assertions::assert_eq;

    fn render(input: &str) -> String {
        let protected = protect(input);
        to_html(&protected.text, &protected.table)
    }

    #[test]
    fn test_table() {
        let html = render("| A | B |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>A</th>"));
        assert!(html.contains("<td>2</td>"));
    }

    #[test]
    fn test_fenced_code() {
        let html = render("```python\nprint(1 < 2)\n```");
        assert!(html.contains(r#"<pre><code class="language-python">"#));
        assert!(html.contains("1 &lt; 2"));
    }

    #[test]
    fn test_comments_pass_through() {
        let html = render("text <!-- note --> more\n\n<!-- block -->\n");
        assert!(html.contains("<p>text <!-- note --> more</p>"));
        assert!(html.contains("<!-- block -->"));
    }

    #[test]
    fn test_math_restored_in_place() {
        assert_eq!(
            render("Let $a<b$ hold.\n\n$$\nx_1 * x_2\n$$\n"),
            "<p>Let $a<b$ hold.</p>\n$$\nx_1 * x_2\n$$\n"
        );
    }

    #[test]
    fn test_math_in_code_is_escaped() {
        assert_eq!(
            render("Run `$a<b$` first."),
            "<p>Run <code>$a&lt;b$</code> first.</p>\n"
        );
        let html = render("```\n$x$ and $$y$$\n```");
        assert!(html.contains("<pre><code>$x$ and $$y$$\n</code></pre>"));
    }

    #[test]
    fn test_first_heading() {
        assert_eq!(
            first_heading("intro\n\n## Sub\n\n# Main *Title*\n"),
            Some("Main Title".to_string())
        );
        assert_eq!(first_heading("## Only a subheading"), None);
    }
}
