use super::Var;
use crate::error;
use crate::lang::{Error, Int, Lexer, Operator, Token};

type Result<T> = std::result::Result<T, Error>;

/// Top tier: `expr` combined by `<`, `>`, `=`, each folding to 0 or 1.
/// Relations only nest through a parenthesized factor.
pub fn relation(lex: &mut Lexer, vars: &Var) -> Result<Int> {
    let mut r1 = expr(lex, vars)?;
    loop {
        let op = match lex.token() {
            Token::Operator(op @ (Operator::Less | Operator::Greater | Operator::Equal)) => *op,
            _ => return Ok(r1),
        };
        lex.advance()?;
        let r2 = expr(lex, vars)?;
        r1 = match op {
            Operator::Less => Int::from(r1 < r2),
            Operator::Greater => Int::from(r1 > r2),
            _ => Int::from(r1 == r2),
        };
    }
}

/// `term` combined by `+`, `-`, and the bitwise pair `&`, `|`, which
/// double as the dialect's only logical operators. Both operands are
/// always evaluated; addition and subtraction wrap.
pub fn expr(lex: &mut Lexer, vars: &Var) -> Result<Int> {
    let mut t1 = term(lex, vars)?;
    loop {
        let op = match lex.token() {
            Token::Operator(
                op @ (Operator::Plus | Operator::Minus | Operator::And | Operator::Or),
            ) => *op,
            _ => return Ok(t1),
        };
        lex.advance()?;
        let t2 = term(lex, vars)?;
        t1 = match op {
            Operator::Plus => t1.wrapping_add(t2),
            Operator::Minus => t1.wrapping_sub(t2),
            Operator::And => t1 & t2,
            _ => t1 | t2,
        };
    }
}

/// `factor` combined by `*`, `/`, `%`. Division and modulo are
/// truncating; a zero divisor is an arithmetic error, not a wrap.
fn term(lex: &mut Lexer, vars: &Var) -> Result<Int> {
    let mut f1 = factor(lex, vars)?;
    loop {
        let op = match lex.token() {
            Token::Operator(op @ (Operator::Multiply | Operator::Divide | Operator::Modulus)) => {
                *op
            }
            _ => return Ok(f1),
        };
        let column = lex.column();
        lex.advance()?;
        let f2 = factor(lex, vars)?;
        f1 = match op {
            Operator::Multiply => f1.wrapping_mul(f2),
            Operator::Divide => {
                if f2 == 0 {
                    return Err(error!(DivisionByZero, ..&column));
                }
                f1.wrapping_div(f2)
            }
            _ => {
                if f2 == 0 {
                    return Err(error!(DivisionByZero, ..&column));
                }
                f1.wrapping_rem(f2)
            }
        };
    }
}

/// Numeric literal, parenthesized relation, or variable value.
fn factor(lex: &mut Lexer, vars: &Var) -> Result<Int> {
    match *lex.token() {
        Token::Number(n) => {
            lex.advance()?;
            Ok(n)
        }
        Token::LParen => {
            lex.advance()?;
            let r = relation(lex, vars)?;
            lex.expect(&Token::RParen, "EXPECTED )")?;
            Ok(r)
        }
        Token::Variable(v) => {
            lex.advance()?;
            Ok(vars.fetch(v))
        }
        _ => Err(error!(SyntaxError, ..&lex.column(); "EXPECTED EXPRESSION")),
    }
}
