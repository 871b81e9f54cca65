//! Shielding TeX math from the Markdown engine.
//!
//! A Markdown engine treats `_`, `*` and `\` inside `$...$` as markup. Before
//! conversion every math span is swapped for a sentinel; after conversion the
//! sentinels are swapped back.
//!
//! Display spans become HTML comments, so a `$$` block on its own lines
//! stays a raw block. Inline spans become plain alphanumeric words, which
//! leave the surrounding paragraph, list item or emphasis intact wherever
//! they sit on a line.
//!
//! ```rust
//! use mathdoc::math::protect;
//!
//! let protected = protect("Energy $E=mc^2$ and $$a_1 * b_2$$.");
//! assert_eq!(
//!     protected.text,
//!     "Energy MATHINLINE1END and <!--MATH_DISPLAY_0-->."
//! );
//! assert_eq!(protected.table.restore(&protected.text), "Energy $E=mc^2$ and $$a_1 * b_2$$.");
//! ```

mod lexer;

pub use lexer::{display_math, inline_math, inline_sentinel};

use lexer::SENTINEL_END;
use nom::IResult;

/// Which delimiter pair a math span used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathKind {
    Display,
    Inline,
}

/// One protected span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub kind: MathKind,
    /// Sentinel standing in for the span.
    pub token: String,
    /// Span text including its delimiters.
    pub original: String,
}

/// Piece of a text run after splitting out inline sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Math(&'a str),
}

/// Ordered placeholder table for one document.
///
/// Indices are shared between display and inline spans, so every token in a
/// document is distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MathTable {
    tag: String,
    entries: Vec<Placeholder>,
}

impl MathTable {
    /// Create a table whose sentinel tag does not occur in `source`.
    pub fn for_source(source: &str) -> Self {
        let mut tag = "MATH".to_string();
        let mut n = 0;
        while source.contains(&format!("<!--{}_", tag)) || source.contains(&format!("{}INLINE", tag))
        {
            n += 1;
            tag = format!("MATH{}", n);
        }
        Self {
            tag,
            entries: Vec::new(),
        }
    }

    fn inline_prefix(&self) -> String {
        format!("{}INLINE", self.tag)
    }

    /// Record a span and return its sentinel.
    fn push(&mut self, kind: MathKind, original: &str) -> String {
        let index = self.entries.len();
        let token = match kind {
            MathKind::Display => format!("<!--{}_DISPLAY_{}-->", self.tag, index),
            MathKind::Inline => format!("{}{}{}", self.inline_prefix(), index, SENTINEL_END),
        };
        self.entries.push(Placeholder {
            kind,
            token: token.clone(),
            original: original.to_string(),
        });
        token
    }

    pub fn entries(&self) -> &[Placeholder] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Put every original span back into `text`.
    pub fn restore(&self, text: &str) -> String {
        let mut output = text.to_string();
        for entry in &self.entries {
            if output.contains(&entry.token) {
                output = output.replace(&entry.token, &entry.original);
            }
        }
        output
    }

    /// Split a text run at its inline sentinels.
    ///
    /// Math segments carry the original span; a lookalike word that names no
    /// inline entry stays text.
    pub fn segments<'a>(&'a self, text: &'a str) -> Vec<Segment<'a>> {
        let prefix = self.inline_prefix();
        let mut segments = Vec::new();
        let mut copied = 0;
        let mut cursor = 0;

        while let Some(offset) = text[cursor..].find(&prefix) {
            let at = cursor + offset;
            let parsed: IResult<&str, usize> = inline_sentinel(&text[at..], &prefix);
            let entry = parsed.ok().and_then(|(rest, index)| {
                self.entries
                    .get(index)
                    .filter(|e| e.kind == MathKind::Inline)
                    .map(|e| (text.len() - rest.len(), e))
            });

            match entry {
                Some((end, entry)) => {
                    if at > copied {
                        segments.push(Segment::Text(&text[copied..at]));
                    }
                    segments.push(Segment::Math(&entry.original));
                    copied = end;
                    cursor = end;
                }
                None => cursor = at + prefix.len(),
            }
        }

        if copied < text.len() {
            segments.push(Segment::Text(&text[copied..]));
        }
        segments
    }
}

/// Text with its math replaced by sentinels.
#[derive(Debug, Clone)]
pub struct Protected {
    pub text: String,
    pub table: MathTable,
}

/// Replace display math, then inline math, with sentinels.
pub fn protect(source: &str) -> Protected {
    let mut table = MathTable::for_source(source);
    let text = substitute(source, MathKind::Display, &mut table);
    let text = substitute(&text, MathKind::Inline, &mut table);
    Protected { text, table }
}

/// One left-to-right pass replacing every span of `kind`.
fn substitute(input: &str, kind: MathKind, table: &mut MathTable) -> String {
    let mut output = String::with_capacity(input.len());
    let mut copied = 0;
    let mut cursor = 0;

    while let Some(offset) = input[cursor..].find('$') {
        let at = cursor + offset;
        // An inline span never starts right after another `$`.
        if kind == MathKind::Inline && at > 0 && input.as_bytes()[at - 1] == b'$' {
            cursor = at + 1;
            continue;
        }

        let parsed: IResult<&str, &str> = match kind {
            MathKind::Display => display_math(&input[at..]),
            MathKind::Inline => inline_math(&input[at..]),
        };

        match parsed {
            Ok((_, span)) => {
                let end = at + span.len();
                output.push_str(&input[copied..at]);
                output.push_str(&table.push(kind, span));
                copied = end;
                cursor = end;
            }
            Err(_) => cursor = at + 1,
        }
    }

    output.push_str(&input[copied..]);
    output
}
