//! Tokenizer for calculator expressions.

use super::error::EvalError;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
}

impl Token {
    /// Short human description, used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Number(n) => format!("number {}", n),
            Self::Ident(name) => format!("'{}'", name),
            Self::Plus => "'+'".to_string(),
            Self::Minus => "'-'".to_string(),
            Self::Star => "'*'".to_string(),
            Self::Slash => "'/'".to_string(),
            Self::Caret => "'^'".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::LBracket => "'['".to_string(),
            Self::RBracket => "']'".to_string(),
            Self::Comma => "','".to_string(),
            Self::Semicolon => "';'".to_string(),
        }
    }
}

/// A token and the byte offset it starts at.
#[derive(Clone, Debug, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub pos: usize,
}

/// Split an expression into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, EvalError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];

        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        if c.is_ascii_digit() || c == b'.' {
            let end = number_end(bytes, pos);
            let text = &input[pos..end];
            let value: f64 = text
                .parse()
                .map_err(|_| EvalError::BadNumber(text.to_string()))?;
            tokens.push(Spanned {
                token: Token::Number(value),
                pos,
            });
            pos = end;
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            let mut end = pos + 1;
            while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
                end += 1;
            }
            tokens.push(Spanned {
                token: Token::Ident(input[pos..end].to_string()),
                pos,
            });
            pos = end;
            continue;
        }

        let token = match c {
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'^' => Token::Caret,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'[' => Token::LBracket,
            b']' => Token::RBracket,
            b',' => Token::Comma,
            b';' => Token::Semicolon,
            _ => {
                // Report the full (possibly multi-byte) character.
                let ch = input[pos..].chars().next().unwrap_or('?');
                return Err(EvalError::UnexpectedChar { ch, pos });
            }
        };
        tokens.push(Spanned { token, pos });
        pos += 1;
    }

    Ok(tokens)
}

/// Find where a numeric literal starting at `start` ends.
///
/// Accepts `3`, `3.14`, `.5`, `5.` and an optional exponent (`1e3`,
/// `2.5E-4`). An `e` that is not followed by digits is left alone so
/// that it can be read as the constant.
fn number_end(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            while exp < bytes.len() && bytes[exp].is_ascii_digit() {
                exp += 1;
            }
            end = exp;
        }
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn test_operators_and_numbers() {
        assert_eq!(
            kinds("2 + 3.5*x"),
            vec![
                Token::Number(2.0),
                Token::Plus,
                Token::Number(3.5),
                Token::Star,
                Token::Ident("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(kinds(".5"), vec![Token::Number(0.5)]);
        assert_eq!(kinds("5."), vec![Token::Number(5.0)]);
        assert_eq!(kinds("1e3"), vec![Token::Number(1000.0)]);
        assert_eq!(kinds("2.5E-2"), vec![Token::Number(0.025)]);
    }

    #[test]
    fn test_trailing_e_is_identifier() {
        assert_eq!(
            kinds("2e"),
            vec![Token::Number(2.0), Token::Ident("e".to_string())]
        );
    }

    #[test]
    fn test_lone_dot_is_rejected() {
        assert!(matches!(tokenize("."), Err(EvalError::BadNumber(_))));
    }

    #[test]
    fn test_unknown_character() {
        assert_eq!(
            tokenize("2 $ 3"),
            Err(EvalError::UnexpectedChar { ch: '$', pos: 2 })
        );
    }
}
