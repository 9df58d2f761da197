//! Singular/plural message templates.
//!
//! A template marks each variable part as `{singular|plural}`. A part with no
//! `|` is plural-only, so `item{s}` reads "item" or "items".

/// Render `template` for `count` items.
///
/// An unterminated `{` is copied through as-is.
pub fn pluralise(template: &str, count: usize) -> String {
    let plural = count != 1;
    let mut out = String::with_capacity(template.len() + 8);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let inner = &rest[open + 1..];
        let Some(close) = inner.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let body = &inner[..close];
        let (singular, plural_form) = body.split_once('|').unwrap_or(("", body));
        out.push_str(if plural { plural_form } else { singular });
        rest = &inner[close + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONKEYS: &str =
        "There {is a|are} monkey{s} here and {it|they} want{s|} your banana{s}.";

    #[test]
    fn test_singular() {
        assert_eq!(
            pluralise(MONKEYS, 1),
            "There is a monkey here and it wants your banana."
        );
    }

    #[test]
    fn test_plural() {
        assert_eq!(
            pluralise(MONKEYS, 2),
            "There are monkeys here and they want your bananas."
        );
        assert_eq!(pluralise("item{s}", 0), "items");
    }

    #[test]
    fn test_unterminated_brace() {
        assert_eq!(pluralise("odd {one", 2), "odd {one");
        assert_eq!(pluralise("plain", 1), "plain");
    }
}
