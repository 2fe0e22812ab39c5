use log::trace;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    LeftParen,
    RightParen,
    Atom(String),
}

impl Token {
    pub fn as_str(&self) -> &str {
        match self {
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::Atom(text) => text,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Splits source text into parentheses and whitespace-separated atoms.
///
/// Comments run from `;` to the end of the line and produce no tokens. This
/// never fails: structural problems are reported by the parser.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut cursor = 0;
    let mut tokens = Vec::new();

    while let Some((bytes_read, token)) = next_token(&source[cursor..]) {
        cursor += bytes_read;
        tokens.push(token);
    }

    trace!("tokenized {} bytes into {} tokens", source.len(), tokens.len());
    tokens
}

fn next_token(text: &str) -> Option<(usize, Token)> {
    let mut cursor = 0;

    // skip whitespace and comments
    loop {
        let rest = &text[cursor..];
        let c = rest.chars().next()?;
        if c.is_whitespace() {
            cursor += c.len_utf8();
        } else if c == ';' {
            cursor += rest.find('\n').unwrap_or(rest.len());
        } else {
            break;
        }
    }

    let rest = &text[cursor..];
    match rest.as_bytes()[0] {
        b'(' => return Some((cursor + 1, Token::LeftParen)),
        b')' => return Some((cursor + 1, Token::RightParen)),
        _ => (),
    }

    let len = rest
        .find(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | ';'))
        .unwrap_or(rest.len());

    Some((cursor + len, Token::Atom(rest[..len].to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_strs(source: &str) -> Vec<String> {
        tokenize(source)
            .iter()
            .map(|token| token.to_string())
            .collect()
    }

    #[test]
    fn test_nested_lists() {
        assert_eq!(
            token_strs("(cat (dog (tomato)))"),
            vec!["(", "cat", "(", "dog", "(", "tomato", ")", ")", ")"]
        );
    }

    #[test]
    fn test_parens_adjacent_to_literals() {
        assert_eq!(
            token_strs("(+ 2 (- 5 3) 7 8)"),
            vec!["(", "+", "2", "(", "-", "5", "3", ")", "7", "8", ")"]
        );
        assert_eq!(token_strs("(foo bar)"), vec!["(", "foo", "bar", ")"]);
        assert_eq!(token_strs("-5.32"), vec!["-5.32"]);
    }

    #[test]
    fn test_comments() {
        assert!(tokenize("; nothing to see here").is_empty());
        assert!(tokenize("    ;; indented comment").is_empty());
        assert_eq!(token_strs("(define x 5) ; five"), vec!["(", "define", "x", "5", ")"]);
        assert_eq!(token_strs("x;comment"), vec!["x"]);
    }

    #[test]
    fn test_multi_line_source() {
        let source = "
            ; square a number
            (define (square x)
                (* x x)) ; done
        ";
        assert_eq!(
            token_strs(source),
            vec!["(", "define", "(", "square", "x", ")", "(", "*", "x", "x", ")", ")"]
        );
    }

    #[test]
    fn test_whitespace_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t\r\n ").is_empty());
        assert_eq!(token_strs("\ta\tb\t"), vec!["a", "b"]);
    }

    #[test]
    fn test_malformed_structure_is_not_rejected() {
        assert_eq!(token_strs(")("), vec![")", "("]);
        assert_eq!(tokenize("(((").len(), 3);
    }
}
