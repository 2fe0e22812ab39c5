use crate::{
    error::{syntax_error, Result},
    number::Number,
    tokenizer::Token,
};
use log::debug;
use std::fmt::{self, Display, Formatter};

pub const DEFINE: &str = "define";
pub const LAMBDA: &str = "lambda";

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Number),
    Symbol(String),
    List(Vec<Expr>),
}

impl Expr {
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expr::Symbol(name) => Some(name),
            _ => None,
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Symbol(name) => write!(f, "{}", name),
            Expr::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Parses exactly one expression; any tokens left after it are an error.
pub fn parse(tokens: &[Token]) -> Result<Expr> {
    check_balanced(tokens)?;

    if tokens.len() > 1
        && !(tokens.contains(&Token::LeftParen) && tokens.contains(&Token::RightParen))
    {
        debug!("rejecting {} bare tokens", tokens.len());
        return syntax_error("multiple expressions must be wrapped in parentheses");
    }

    let (expr, consumed) = parse_expression(tokens)?;
    if consumed != tokens.len() {
        return syntax_error(format!(
            "unexpected '{}' after the end of the expression",
            tokens[consumed]
        ));
    }

    Ok(expr)
}

/// Parses a sequence of top-level expressions, as found in a source file.
pub fn parse_program(tokens: &[Token]) -> Result<Vec<Expr>> {
    check_balanced(tokens)?;

    let mut consumed = 0;
    let mut program = Vec::new();

    while consumed < tokens.len() {
        let (expr, expr_consumed) = parse_expression(&tokens[consumed..])?;
        program.push(expr);
        consumed += expr_consumed;
    }

    Ok(program)
}

fn check_balanced(tokens: &[Token]) -> Result<()> {
    let opening = tokens.iter().filter(|t| **t == Token::LeftParen).count();
    let closing = tokens.iter().filter(|t| **t == Token::RightParen).count();

    if opening != closing {
        return syntax_error(format!(
            "unbalanced parentheses: {} '(' against {} ')'",
            opening, closing
        ));
    }
    Ok(())
}

fn parse_expression(tokens: &[Token]) -> Result<(Expr, usize)> {
    match tokens.first() {
        None => syntax_error("expected an expression"),
        Some(Token::RightParen) => syntax_error("unexpected ')'"),
        Some(Token::LeftParen) => {
            let mut consumed = 1;
            let mut items = Vec::new();

            loop {
                match tokens.get(consumed) {
                    None => return syntax_error("unexpected end of input, expected ')'"),
                    Some(Token::RightParen) => {
                        consumed += 1;
                        break;
                    }
                    Some(_) => {
                        let (item, item_consumed) = parse_expression(&tokens[consumed..])?;
                        items.push(item);
                        consumed += item_consumed;
                    }
                }
            }

            check_special_form(&items)?;
            Ok((Expr::List(items), consumed))
        }
        Some(Token::Atom(text)) => Ok((parse_atom(text), 1)),
    }
}

fn parse_atom(text: &str) -> Expr {
    match Number::parse(text) {
        Some(n) => Expr::Number(n),
        None => Expr::Symbol(text.to_string()),
    }
}

/// Validates the shape of a `define` or `lambda` form. Lists headed by any
/// other expression are left alone.
pub(crate) fn check_special_form(items: &[Expr]) -> Result<()> {
    match items.first().and_then(Expr::as_symbol) {
        Some(DEFINE) => check_define(items),
        Some(LAMBDA) => check_lambda(items),
        _ => Ok(()),
    }
}

pub(crate) fn check_define(items: &[Expr]) -> Result<()> {
    if items.len() != 3 {
        return syntax_error(format!(
            "define expects a name and a value, got {} operands",
            items.len().saturating_sub(1)
        ));
    }

    match &items[1] {
        Expr::Symbol(_) => Ok(()),
        Expr::List(signature) if signature.is_empty() => {
            syntax_error("define needs a function name, got ()")
        }
        Expr::List(signature) => match signature.iter().find(|e| e.as_symbol().is_none()) {
            Some(bad) => syntax_error(format!("'{}' cannot be used as a name in define", bad)),
            None => Ok(()),
        },
        target => syntax_error(format!("'{}' cannot be used as a name in define", target)),
    }
}

pub(crate) fn check_lambda(items: &[Expr]) -> Result<()> {
    if items.len() != 3 {
        return syntax_error(format!(
            "lambda expects a parameter list and a body, got {} operands",
            items.len().saturating_sub(1)
        ));
    }

    match &items[1] {
        Expr::List(params) => match params.iter().find(|e| e.as_symbol().is_none()) {
            Some(bad) => syntax_error(format!("lambda parameter '{}' is not a symbol", bad)),
            None => Ok(()),
        },
        other => syntax_error(format!("lambda parameters must be a list, got '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tokenizer::tokenize;

    // Helper function to tokenize and parse a string
    fn parse_str(input: &str) -> Result<Expr> {
        parse(&tokenize(input))
    }

    fn sym(name: &str) -> Expr {
        Expr::Symbol(name.to_string())
    }

    fn int(n: i64) -> Expr {
        Expr::Number(Number::Int(n))
    }

    #[test]
    fn test_nested_lists() -> Result<()> {
        let expr = parse_str("(cat (dog (tomato)))")?;
        assert_eq!(
            expr,
            Expr::List(vec![
                sym("cat"),
                Expr::List(vec![sym("dog"), Expr::List(vec![sym("tomato")])]),
            ])
        );
        Ok(())
    }

    #[test]
    fn test_arithmetic_tree() -> Result<()> {
        let expr = parse_str("(+ 2 (- 5 3) 7 8)")?;
        assert_eq!(
            expr,
            Expr::List(vec![
                sym("+"),
                int(2),
                Expr::List(vec![sym("-"), int(5), int(3)]),
                int(7),
                int(8),
            ])
        );
        assert_eq!(expr.to_string(), "(+ 2 (- 5 3) 7 8)");
        Ok(())
    }

    #[test]
    fn test_atoms() -> Result<()> {
        assert_eq!(parse_str("2")?, int(2));
        assert_eq!(parse_str("x")?, sym("x"));
        assert!(matches!(parse_str("-5.32")?, Expr::Number(Number::Float(n)) if n == -5.32));
        assert_eq!(parse_str("1.2.3.4")?, sym("1.2.3.4"));
        assert_eq!(parse_str("()")?, Expr::List(vec![]));
        Ok(())
    }

    #[test]
    fn test_function_definition_sugar() -> Result<()> {
        let expr = parse_str("(define (square x) (* x x))")?;
        assert_eq!(
            expr,
            Expr::List(vec![
                sym("define"),
                Expr::List(vec![sym("square"), sym("x")]),
                Expr::List(vec![sym("*"), sym("x"), sym("x")]),
            ])
        );
        Ok(())
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(matches!(parse_str("(+ 1 2"), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("(+ 1 2))"), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str(")"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_misplaced_closing_paren() {
        assert!(matches!(parse_str(")("), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str(") x ("), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_bare_and_leftover_tokens() {
        assert!(matches!(parse_str("1 2"), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("x y z"), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("(+ 1 2) 3"), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("(a) (b)"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_str(""), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("; only a comment"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_define_shape() {
        assert!(parse_str("(define x 5)").is_ok());
        assert!(parse_str("(define (f) 5)").is_ok());
        assert!(parse_str("(define (f a b) (+ a b))").is_ok());

        assert!(matches!(parse_str("(define x)"), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("(define x 1 2)"), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("(define 3 4)"), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("(define 3.5 4)"), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("(define () 4)"), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("(define (f 1) 4)"), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("(define (f (g)) 4)"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_lambda_shape() {
        assert!(parse_str("(lambda () 1)").is_ok());
        assert!(parse_str("(lambda (x y) (+ x y))").is_ok());

        assert!(matches!(parse_str("(lambda (x))"), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("(lambda x x)"), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("(lambda (x 2) x)"), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("(lambda (x) x x)"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_nested_special_forms_are_checked() {
        assert!(matches!(
            parse_str("(+ 1 (define 2 3))"),
            Err(Error::Syntax { .. })
        ));
        assert!(matches!(
            parse_str("((lambda (1) 1) 2)"),
            Err(Error::Syntax { .. })
        ));
    }

    #[test]
    fn test_keyword_outside_head_is_not_a_form() -> Result<()> {
        assert_eq!(parse_str("define")?, sym("define"));
        assert_eq!(
            parse_str("(f define)")?,
            Expr::List(vec![sym("f"), sym("define")])
        );
        Ok(())
    }

    #[test]
    fn test_program() -> Result<()> {
        let source = "
            (define x 5)
            (define (double n) (* 2 n))
            (double x)
            x
        ";
        let program = parse_program(&tokenize(source))?;
        assert_eq!(program.len(), 4);
        assert_eq!(program[3], sym("x"));

        assert!(parse_program(&tokenize(""))?.is_empty());
        assert!(matches!(
            parse_program(&tokenize("(define x 5) (x")),
            Err(Error::Syntax { .. })
        ));
        Ok(())
    }
}
