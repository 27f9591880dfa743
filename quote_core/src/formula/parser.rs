//! Recursive-descent parser building a small arithmetic AST.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | VARIABLE | '(' expr ')'
//! ```

use super::lexer::{Operator, Token};
use super::{FormulaError, Variable};

/// Deepest nesting of parentheses/unary signs accepted
const MAX_DEPTH: usize = 64;

/// Longest token stream accepted. Operator chains nest the AST one level per
/// operator, so this also bounds evaluation depth.
const MAX_TOKENS: usize = 256;

/// Parsed formula
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(Variable),
    Negate(Box<Expr>),
    Binary(Operator, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluate with the given dimension values (mm)
    pub fn eval(&self, width_mm: f64, height_mm: f64) -> Result<f64, FormulaError> {
        match self {
            Expr::Number(value) => Ok(*value),
            Expr::Variable(Variable::Width) => Ok(width_mm),
            Expr::Variable(Variable::Height) => Ok(height_mm),
            Expr::Negate(inner) => Ok(-inner.eval(width_mm, height_mm)?),
            Expr::Binary(op, lhs, rhs) => {
                let a = lhs.eval(width_mm, height_mm)?;
                let b = rhs.eval(width_mm, height_mm)?;
                match op {
                    Operator::Add => Ok(a + b),
                    Operator::Sub => Ok(a - b),
                    Operator::Mul => Ok(a * b),
                    Operator::Div if b == 0.0 => Err(FormulaError::DivisionByZero),
                    Operator::Div => Ok(a / b),
                }
            }
        }
    }
}

/// Parse a token stream into an expression
pub fn parse(tokens: &[Token]) -> Result<Expr, FormulaError> {
    if tokens.is_empty() {
        return Err(FormulaError::Empty);
    }
    if tokens.len() > MAX_TOKENS {
        return Err(FormulaError::TooLong(tokens.len()));
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr(0)?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(FormulaError::UnexpectedToken(describe(token), parser.pos)),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self, depth: usize) -> Result<Expr, FormulaError> {
        let mut lhs = self.term(depth)?;
        while let Some(Token::Operator(op @ (Operator::Add | Operator::Sub))) = self.peek().copied() {
            self.pos += 1;
            let rhs = self.term(depth)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self, depth: usize) -> Result<Expr, FormulaError> {
        let mut lhs = self.unary(depth)?;
        while let Some(Token::Operator(op @ (Operator::Mul | Operator::Div))) = self.peek().copied() {
            self.pos += 1;
            let rhs = self.unary(depth)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self, depth: usize) -> Result<Expr, FormulaError> {
        if depth > MAX_DEPTH {
            return Err(FormulaError::TooDeep);
        }
        match self.peek().copied() {
            Some(Token::Operator(Operator::Sub)) => {
                self.pos += 1;
                Ok(Expr::Negate(Box::new(self.unary(depth + 1)?)))
            }
            Some(Token::Operator(Operator::Add)) => {
                self.pos += 1;
                self.unary(depth + 1)
            }
            _ => self.primary(depth),
        }
    }

    fn primary(&mut self, depth: usize) -> Result<Expr, FormulaError> {
        let at = self.pos;
        match self.next() {
            Some(Token::Number(value)) => Ok(Expr::Number(value)),
            Some(Token::Variable(variable)) => Ok(Expr::Variable(variable)),
            Some(Token::LeftParen) => {
                let inner = self.expr(depth + 1)?;
                match self.next() {
                    Some(Token::RightParen) => Ok(inner),
                    Some(other) => Err(FormulaError::UnexpectedToken(describe(&other), self.pos - 1)),
                    None => Err(FormulaError::UnbalancedParentheses),
                }
            }
            Some(other) => Err(FormulaError::UnexpectedToken(describe(&other), at)),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Number(value) => value.to_string(),
        Token::Variable(variable) => variable.name().to_string(),
        Token::Operator(Operator::Add) => "+".to_string(),
        Token::Operator(Operator::Sub) => "-".to_string(),
        Token::Operator(Operator::Mul) => "*".to_string(),
        Token::Operator(Operator::Div) => "/".to_string(),
        Token::LeftParen => "(".to_string(),
        Token::RightParen => ")".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::lexer::tokenize;

    fn eval(source: &str, width: f64, height: f64) -> Result<f64, FormulaError> {
        parse(&tokenize(source)?)?.eval(width, height)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2 + 3 * 4", 0.0, 0.0).unwrap(), 14.0);
        assert_eq!(eval("(2 + 3) * 4", 0.0, 0.0).unwrap(), 20.0);
        assert_eq!(eval("20 - 4 - 6", 0.0, 0.0).unwrap(), 10.0);
        assert_eq!(eval("100 / 5 / 2", 0.0, 0.0).unwrap(), 10.0);
    }

    #[test]
    fn test_variables() {
        assert_eq!(eval("L_TOTAL / 2 + 50", 2000.0, 1500.0).unwrap(), 1050.0);
        assert_eq!(eval("A_TOTAL - 60", 2000.0, 1500.0).unwrap(), 1440.0);
        assert_eq!(eval("(L_TOTAL + A_TOTAL) * 2", 1000.0, 500.0).unwrap(), 3000.0);
    }

    #[test]
    fn test_unary_signs() {
        assert_eq!(eval("-5 + 10", 0.0, 0.0).unwrap(), 5.0);
        assert_eq!(eval("--5", 0.0, 0.0).unwrap(), 5.0);
        assert_eq!(eval("+L_TOTAL", 7.0, 0.0).unwrap(), 7.0);
        assert_eq!(eval("2 * -3", 0.0, 0.0).unwrap(), -6.0);
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(eval("", 0.0, 0.0), Err(FormulaError::Empty));
        assert_eq!(eval("2 +", 0.0, 0.0), Err(FormulaError::UnexpectedEnd));
        assert_eq!(eval("(2 + 3", 0.0, 0.0), Err(FormulaError::UnbalancedParentheses));
        assert_eq!(eval("2 3", 0.0, 0.0), Err(FormulaError::UnexpectedToken("3".to_string(), 1)));
        assert_eq!(eval(")", 0.0, 0.0), Err(FormulaError::UnexpectedToken(")".to_string(), 0)));
        assert_eq!(eval("* 2", 0.0, 0.0), Err(FormulaError::UnexpectedToken("*".to_string(), 0)));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("L_TOTAL / 0", 10.0, 0.0), Err(FormulaError::DivisionByZero));
        assert_eq!(eval("L_TOTAL / (A_TOTAL - A_TOTAL)", 10.0, 5.0), Err(FormulaError::DivisionByZero));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(eval(&deep, 0.0, 0.0), Err(FormulaError::TooDeep));
        let shallow = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(eval(&shallow, 0.0, 0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_token_limit() {
        let flat = vec!["1"; 20_000].join("+");
        assert_eq!(eval(&flat, 0.0, 0.0), Err(FormulaError::TooLong(39_999)));

        let longest = vec!["1"; 128].join("+");
        assert_eq!(eval(&longest, 0.0, 0.0).unwrap(), 128.0);
    }
}
