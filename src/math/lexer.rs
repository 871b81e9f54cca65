//! Delimiter parsers for TeX math spans.

use nom::{
    bytes::complete::{is_not, tag, take_until},
    character::complete::{char, digit1},
    combinator::{map_res, not, recognize},
    sequence::{delimited, tuple},
    IResult,
};

/// Parse display math (`$$...$$`), shortest match, may span lines.
///
/// Returns the whole span including delimiters.
pub fn display_math(input: &str) -> IResult<&str, &str> {
    recognize(tuple((tag("$$"), take_until("$$"), tag("$$"))))(input)
}

/// Parse inline math (`$...$`) on a single line.
///
/// Neither delimiter may touch another `$`, so `$$` never opens or closes
/// an inline span. The caller checks the character before the opening `$`.
pub fn inline_math(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        char('$'),
        not(char('$')),
        is_not("$\n"),
        char('$'),
        not(char('$')),
    )))(input)
}

/// Parse an inline sentinel (`<prefix><index>END`), returning the index.
pub fn inline_sentinel<'a>(input: &'a str, prefix: &str) -> IResult<&'a str, usize> {
    delimited(
        tag(prefix),
        map_res(digit1, str::parse::<usize>),
        tag(SENTINEL_END),
    )(input)
}

/// Suffix closing an inline sentinel.
pub const SENTINEL_END: &str = "END";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_math() {
        assert_eq!(
            display_math("$$\\int_0^1 x dx$$ rest"),
            Ok((" rest", "$$\\int_0^1 x dx$$"))
        );
    }

    #[test]
    fn test_display_math_multiline_is_shortest() {
        assert_eq!(
            display_math("$$\na\n$$ b $$c$$"),
            Ok((" b $$c$$", "$$\na\n$$"))
        );
    }

    #[test]
    fn test_display_math_unclosed() {
        assert!(display_math("$$a + b").is_err());
    }

    #[test]
    fn test_inline_math() {
        assert_eq!(inline_math("$E = mc^2$ rest"), Ok((" rest", "$E = mc^2$")));
    }

    #[test]
    fn test_inline_math_rejects_display_delimiters() {
        assert!(inline_math("$$x$$").is_err());
        assert!(inline_math("$x$$").is_err());
    }

    #[test]
    fn test_inline_sentinel() {
        assert_eq!(
            inline_sentinel("MATHINLINE12END rest", "MATHINLINE"),
            Ok((" rest", 12))
        );
        assert!(inline_sentinel("MATHINLINE12 rest", "MATHINLINE").is_err());
        assert!(inline_sentinel("MATHINLINEEND", "MATHINLINE").is_err());
    }

    #[test]
    fn test_inline_math_single_line() {
        assert!(inline_math("$a\nb$").is_err());
        assert!(inline_math("$$").is_err());
    }
}
