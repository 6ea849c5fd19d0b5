/// Numeric kind of a number token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumberToken {
    Int(i64),
    Float(f64),
}

/// A token is an integer iff its text round-trips through `i64` parsing.
pub fn classify_token(text: &str) -> NumberToken {
    match text.parse::<i64>() {
        Ok(i) => NumberToken::Int(i),
        Err(_) => NumberToken::Float(text.parse::<f64>().unwrap_or(f64::NAN)),
    }
}

impl NumberToken {
    pub fn is_zero(self) -> bool {
        match self {
            NumberToken::Int(i) => i == 0,
            NumberToken::Float(f) => f == 0.0,
        }
    }
}
