//! Tokenizer for cut formulas.
//!
//! Only numeric literals, the two dimension variables, the four arithmetic
//! operators and parentheses are recognized. Anything else is an error.

use super::{FormulaError, Variable};

/// Arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

/// Lexical token
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Variable(Variable),
    Operator(Operator),
    LeftParen,
    RightParen,
}

/// Split a formula into tokens
pub fn tokenize(source: &str) -> Result<Vec<Token>, FormulaError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        let token = match c {
            c if c.is_whitespace() => {
                pos += 1;
                continue;
            }
            '+' => Token::Operator(Operator::Add),
            '-' | '−' => Token::Operator(Operator::Sub),
            '*' | '×' => Token::Operator(Operator::Mul),
            '/' | '÷' => Token::Operator(Operator::Div),
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            c if c.is_ascii_digit() || c == '.' || c == ',' => {
                let (value, next) = read_number(&chars, pos)?;
                tokens.push(Token::Number(value));
                pos = next;
                continue;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = pos;
                while pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
                    pos += 1;
                }
                let name: String = chars[start..pos].iter().collect();
                let variable = Variable::from_name(&name).ok_or(FormulaError::UnknownIdentifier(name))?;
                tokens.push(Token::Variable(variable));
                continue;
            }
            other => return Err(FormulaError::UnexpectedCharacter(other, pos)),
        };
        tokens.push(token);
        pos += 1;
    }

    Ok(tokens)
}

/// Read a literal such as `12`, `0.5` or `0,5`
fn read_number(chars: &[char], start: usize) -> Result<(f64, usize), FormulaError> {
    let mut pos = start;
    let mut literal = String::new();
    let mut seen_separator = false;

    while pos < chars.len() {
        let c = chars[pos];
        if c.is_ascii_digit() {
            literal.push(c);
        } else if (c == '.' || c == ',') && !seen_separator {
            seen_separator = true;
            literal.push('.');
        } else {
            break;
        }
        pos += 1;
    }

    let text: String = chars[start..pos].iter().collect();
    if !literal.chars().any(|c| c.is_ascii_digit()) {
        return Err(FormulaError::InvalidNumber(text));
    }
    literal
        .parse::<f64>()
        .map(|value| (value, pos))
        .map_err(|_| FormulaError::InvalidNumber(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple() {
        let tokens = tokenize("L_TOTAL / 4").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Variable(Variable::Width),
                Token::Operator(Operator::Div),
                Token::Number(4.0),
            ]
        );
    }

    #[test]
    fn test_tokenize_unicode_operators() {
        let tokens = tokenize("(A_TOTAL − 60) × 2 ÷ 3").unwrap();
        assert_eq!(tokens.len(), 9);
        assert_eq!(tokens[2], Token::Operator(Operator::Sub));
        assert_eq!(tokens[5], Token::Operator(Operator::Mul));
        assert_eq!(tokens[7], Token::Operator(Operator::Div));
    }

    #[test]
    fn test_tokenize_decimal_literals() {
        assert_eq!(tokenize("0.5").unwrap(), vec![Token::Number(0.5)]);
        assert_eq!(tokenize("0,5").unwrap(), vec![Token::Number(0.5)]);
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Number(0.5)]);
        assert!(matches!(tokenize("."), Err(FormulaError::InvalidNumber(_))));
    }

    #[test]
    fn test_tokenize_rejects_identifiers() {
        assert_eq!(
            tokenize("L_TOTAL * FOO"),
            Err(FormulaError::UnknownIdentifier("FOO".to_string()))
        );
        assert_eq!(
            tokenize("Math.pow(2, 3)"),
            Err(FormulaError::UnknownIdentifier("Math".to_string()))
        );
    }

    #[test]
    fn test_tokenize_rejects_symbols() {
        assert_eq!(tokenize("L_TOTAL; 2"), Err(FormulaError::UnexpectedCharacter(';', 7)));
        assert_eq!(tokenize("2 ^ 3"), Err(FormulaError::UnexpectedCharacter('^', 2)));
    }
}
