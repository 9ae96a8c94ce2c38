//! Splits a command line into tokens.
//!
//! Tokens are separated by spaces. A token that opens with `"` runs up to the
//! next `"`, spaces included.

pub const MAX_TOKENS: usize = 100;
pub const MAX_TOKEN_LEN: usize = 200;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Parse error: Open quotation marks detected")]
    UnbalancedQuotes,

    #[error("Parse error: Invalid token: Token was too large '{0}...'")]
    TokenTooLong(String),

    #[error("Parse error: Number of tokens entered exceeded the maximum amount of {}", MAX_TOKENS)]
    TooManyTokens,
}

pub fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    if line.matches('"').count() % 2 == 1 {
        return Err(ParseError::UnbalancedQuotes);
    }

    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.peek() == Some(&' ') {
            chars.next();
        }

        let delimiter = match chars.peek() {
            None => break,
            Some('"') => {
                chars.next();
                '"'
            }
            Some(_) => ' ',
        };

        let mut token = String::new();
        for c in chars.by_ref() {
            if c == delimiter {
                break;
            }
            token.push(c);
        }

        if token.chars().count() > MAX_TOKEN_LEN {
            return Err(ParseError::TokenTooLong(token.chars().take(10).collect()));
        }
        if tokens.len() == MAX_TOKENS {
            return Err(ParseError::TooManyTokens);
        }
        tokens.push(token);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_spaces() {
        assert_eq!(tokenize("set  x   10").unwrap(), vec!["set", "x", "10"]);
    }

    #[test]
    fn test_tokenize_empty_line() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("    ").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_quoted_token() {
        assert_eq!(
            tokenize(r#"echo "hello   world" done"#).unwrap(),
            vec!["echo", "hello   world", "done"]
        );
    }

    #[test]
    fn test_tokenize_empty_quotes() {
        assert_eq!(tokenize(r#"set "" x"#).unwrap(), vec!["set", "", "x"]);
    }

    #[test]
    fn test_tokenize_unbalanced_quotes() {
        assert_eq!(tokenize(r#"echo "oops"#), Err(ParseError::UnbalancedQuotes));
    }

    #[test]
    fn test_tokenize_token_too_long() {
        let line = format!("echo {}", "a".repeat(MAX_TOKEN_LEN + 1));
        assert!(matches!(tokenize(&line), Err(ParseError::TokenTooLong(_))));
    }

    #[test]
    fn test_tokenize_too_many_tokens() {
        let line = vec!["x"; MAX_TOKENS + 1].join(" ");
        assert_eq!(tokenize(&line), Err(ParseError::TooManyTokens));
        let line = vec!["x"; MAX_TOKENS].join(" ");
        assert_eq!(tokenize(&line).unwrap().len(), MAX_TOKENS);
    }
}
