/// Collapse every run of newlines into one newline and every run of spaces
/// into one space.
///
/// Single pass, so the result is already a fixed point: it never contains
/// `"\n\n"` or `"  "`.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if (c == '\n' || c == ' ') && prev == Some(c) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_newline_runs() {
        assert_eq!(normalize_whitespace("a\n\n\n\nb\n\nc"), "a\nb\nc");
    }

    #[test]
    fn collapses_space_runs() {
        assert_eq!(normalize_whitespace("Revenue   grew    12%"), "Revenue grew 12%");
    }

    #[test]
    fn leaves_mixed_whitespace_alone() {
        // Only identical runs collapse; a space between newlines survives.
        assert_eq!(normalize_whitespace("a\n \nb"), "a\n \nb");
        assert_eq!(normalize_whitespace("a\t\tb"), "a\t\tb");
    }

    #[test]
    fn output_has_no_double_newlines_or_spaces() {
        let inputs = [
            "",
            "   ",
            "\n\n\n",
            "Q3 results\n\n\n  Net income   rose\n \n\n  ",
            "page one\n\x0C\n\npage  two",
        ];
        for input in inputs {
            let out = normalize_whitespace(input);
            assert!(!out.contains("\n\n"), "double newline in {:?}", out);
            assert!(!out.contains("  "), "double space in {:?}", out);
        }
    }

    #[test]
    fn idempotent() {
        let once = normalize_whitespace("a  \n\n  b");
        assert_eq!(normalize_whitespace(&once), once);
    }
}
