//! Top-level argument tokenizer for scraped marker calls.
//!
//! The portal page inlines one `SetMap(...)` call per station. The argument
//! list mixes quoted strings, bare numbers and `{...}` option literals, so a
//! plain split on commas is not enough: commas inside quotes or braces must
//! not terminate a token.

enum State {
    Outside,
    Quoted(char),
    Braced,
}

/// Split a raw argument-list string into top-level comma-separated tokens.
///
/// Tokens are emitted trimmed and in encounter order. A quote closes its
/// string only when not preceded by a backslash, and brace depth is tracked
/// so nested braces stay inside one token. Malformed input never fails:
/// an unterminated string or brace literal simply extends to end of text.
pub fn tokenize_args(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut args = Vec::new();
    let mut current = String::new();
    let mut state = State::Outside;
    let mut brace_depth = 0usize;

    for (i, &c) in chars.iter().enumerate() {
        match state {
            State::Outside => match c {
                '\'' | '"' => {
                    state = State::Quoted(c);
                    current.push(c);
                }
                '{' => {
                    state = State::Braced;
                    brace_depth = 1;
                    current.push(c);
                }
                ',' => {
                    let token = current.trim();
                    if !token.is_empty() {
                        args.push(token.to_string());
                    }
                    current.clear();
                }
                _ => current.push(c),
            },
            State::Quoted(quote) => {
                current.push(c);
                if c == quote && (i == 0 || chars[i - 1] != '\\') {
                    state = State::Outside;
                }
            }
            State::Braced => {
                current.push(c);
                if c == '{' {
                    brace_depth += 1;
                } else if c == '}' {
                    brace_depth -= 1;
                    if brace_depth == 0 {
                        state = State::Outside;
                    }
                }
            }
        }
    }

    let token = current.trim();
    if !token.is_empty() {
        args.push(token.to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commas_inside_quotes_and_braces_do_not_split() {
        let tokens = tokenize_args("'a,b', {x:1,y:2}, 3");
        assert_eq!(tokens, vec!["'a,b'", "{x:1,y:2}", "3"]);
    }

    #[test]
    fn test_escaped_quote_stays_inside_string() {
        let tokens = tokenize_args(r"'it\'s, fine', 2");
        assert_eq!(tokens, vec![r"'it\'s, fine'", "2"]);
    }

    #[test]
    fn test_nested_braces() {
        let tokens = tokenize_args("{a:{b:1},c:2}, 'x'");
        assert_eq!(tokens, vec!["{a:{b:1},c:2}", "'x'"]);
    }

    #[test]
    fn test_unterminated_string_extends_to_end() {
        let tokens = tokenize_args("1, 'oops");
        assert_eq!(tokens, vec!["1", "'oops"]);
    }

    #[test]
    fn test_unterminated_brace_extends_to_end() {
        let tokens = tokenize_args("1, {a:1, b:2");
        assert_eq!(tokens, vec!["1", "{a:1, b:2"]);
    }

    #[test]
    fn test_trailing_comma_ignored() {
        let tokens = tokenize_args("1, 2,");
        assert_eq!(tokens, vec!["1", "2"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize_args("").is_empty());
        assert!(tokenize_args("   ").is_empty());
    }

    #[test]
    fn test_double_quoted_strings() {
        let tokens = tokenize_args(r#""hello, world", 7"#);
        assert_eq!(tokens, vec![r#""hello, world""#, "7"]);
    }
}
