//! Command-line tokenization for remote exec.
//!
//! Splits on whitespace while honoring double-quoted segments as single
//! tokens (quotes stripped). An unterminated quote consumes the rest of the
//! line.

/// Tokenize a command line for remote execution.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        tokens.push(current);
    }
    tokens
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(tokenize("ls -la /tmp"), vec!["ls", "-la", "/tmp"]);
    }

    #[test]
    fn quoted_segment_is_one_token() {
        assert_eq!(tokenize(r#"ls -la "my dir""#), vec!["ls", "-la", "my dir"]);
    }

    #[test]
    fn quotes_are_stripped() {
        assert_eq!(tokenize(r#"echo "hello world""#), vec!["echo", "hello world"]);
    }

    #[test]
    fn quote_adjacent_to_text_joins() {
        assert_eq!(tokenize(r#"--name="a b""#), vec!["--name=a b"]);
    }

    #[test]
    fn empty_quoted_string_is_empty_token() {
        assert_eq!(tokenize(r#"echo """#), vec!["echo", ""]);
    }

    #[test]
    fn unterminated_quote_consumes_rest() {
        assert_eq!(tokenize(r#"echo "a b c"#), vec!["echo", "a b c"]);
    }

    #[test]
    fn collapses_repeated_whitespace() {
        assert_eq!(tokenize("  ls   -l  "), vec!["ls", "-l"]);
    }

    #[test]
    fn empty_line_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }
}
