use crate::builtins::Primitive;
use crate::environment::Environment;
use crate::error::{evaluation_error, syntax_error, Error, Result};
use crate::number::Number;
use crate::parser::{
    check_define, check_lambda, parse, parse_program, Expr, DEFINE, LAMBDA,
};
use crate::tokenizer::tokenize;
use log::trace;
use std::{
    fmt::{self, Debug, Display, Formatter},
    rc::Rc,
};

#[derive(Clone)]
pub enum Value {
    Number(Number),
    Closure(Rc<Closure>),
    Primitive(Primitive),
    Keyword(Keyword),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Primitive(a), Value::Primitive(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Closure(c) => write!(f, "{}", c),
            Value::Primitive(p) => write!(f, "{}", p),
            Value::Keyword(k) => write!(f, "{}", k),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// A user-defined function. The captured environment is shared with its
/// creator, never copied.
pub struct Closure {
    params: Vec<String>,
    body: Expr,
    env: Environment,
}

impl Closure {
    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl Display for Closure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<function ({})>", self.params.join(" "))
    }
}

/// `define` and `lambda` looked up as plain names. Only reachable when the
/// name is not bound in any enclosing frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Define,
    Lambda,
}

impl Keyword {
    pub fn from_symbol(name: &str) -> Option<Keyword> {
        match name {
            DEFINE => Some(Keyword::Define),
            LAMBDA => Some(Keyword::Lambda),
            _ => None,
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Keyword::Define => write!(f, "{}", DEFINE),
            Keyword::Lambda => write!(f, "{}", LAMBDA),
        }
    }
}

/// Tokenizes, parses and evaluates a single expression.
pub fn interpret(source: &str, env: &Environment) -> Result<Value> {
    let tokens = tokenize(source);
    let expr = parse(&tokens)?;
    evaluate(&expr, env)
}

/// Evaluates every top-level expression of `source` in order and returns the
/// value of the last one, or `None` when there was nothing to evaluate.
pub fn interpret_program(source: &str, env: &Environment) -> Result<Option<Value>> {
    let tokens = tokenize(source);
    let program = parse_program(&tokens)?;

    let mut result = None;
    for expr in &program {
        result = Some(evaluate(expr, env)?);
    }
    Ok(result)
}

pub fn evaluate(expr: &Expr, env: &Environment) -> Result<Value> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Symbol(name) => evaluate_symbol(name, env),
        Expr::List(items) => evaluate_list(items, env),
    }
}

fn evaluate_symbol(name: &str, env: &Environment) -> Result<Value> {
    match env.lookup(name) {
        Ok(value) => Ok(value),
        Err(err @ Error::Name { .. }) => {
            Keyword::from_symbol(name).map(Value::Keyword).ok_or(err)
        }
        Err(err) => Err(err),
    }
}

fn evaluate_list(items: &[Expr], env: &Environment) -> Result<Value> {
    let Some((head, operands)) = items.split_first() else {
        return evaluation_error("cannot evaluate an empty expression ()");
    };

    match evaluate(head, env)? {
        Value::Primitive(primitive) => {
            // left to right: operands may define names used by later operands
            let args = operands
                .iter()
                .map(|operand| evaluate(operand, env))
                .collect::<Result<Vec<_>>>()?;
            primitive.call(&args)
        }
        Value::Keyword(Keyword::Define) => evaluate_define(items, env),
        Value::Keyword(Keyword::Lambda) => evaluate_lambda(items, env),
        Value::Closure(closure) => call_closure(&closure, operands, env),
        Value::Number(n) => evaluation_error(format!("{} is not callable", n)),
    }
}

fn evaluate_define(items: &[Expr], env: &Environment) -> Result<Value> {
    // the parser only checks forms spelled `define`; an alias bound to the
    // keyword reaches here unchecked
    check_define(items)?;

    let (name, value) = match &items[1] {
        Expr::Symbol(name) => (name.clone(), evaluate(&items[2], env)?),
        Expr::List(signature) => {
            let (name, params) = split_signature(signature)?;
            let closure = make_closure(params, items[2].clone(), env);
            (name, closure)
        }
        target => {
            return syntax_error(format!("'{}' cannot be used as a name in define", target))
        }
    };

    env.define(name, value.clone());
    Ok(value)
}

fn evaluate_lambda(items: &[Expr], env: &Environment) -> Result<Value> {
    check_lambda(items)?;

    match &items[1] {
        Expr::List(params) => Ok(make_closure(symbols(params)?, items[2].clone(), env)),
        other => syntax_error(format!("lambda parameters must be a list, got '{}'", other)),
    }
}

fn split_signature(signature: &[Expr]) -> Result<(String, Vec<String>)> {
    let mut names = symbols(signature)?;
    if names.is_empty() {
        return syntax_error("define needs a function name, got ()");
    }
    let name = names.remove(0);
    Ok((name, names))
}

fn symbols(exprs: &[Expr]) -> Result<Vec<String>> {
    exprs
        .iter()
        .map(|expr| match expr {
            Expr::Symbol(name) => Ok(name.clone()),
            other => syntax_error(format!("'{}' is not a symbol", other)),
        })
        .collect()
}

fn make_closure(params: Vec<String>, body: Expr, env: &Environment) -> Value {
    Value::Closure(Rc::new(Closure {
        params,
        body,
        env: env.clone(),
    }))
}

fn call_closure(closure: &Closure, operands: &[Expr], env: &Environment) -> Result<Value> {
    if operands.len() != closure.params.len() {
        return evaluation_error(format!(
            "{} expects {} arguments but got {}",
            closure,
            closure.params.len(),
            operands.len()
        ));
    }

    // arguments are evaluated where the call is written, not where the
    // closure was created
    let mut args = Vec::with_capacity(operands.len());
    for operand in operands {
        args.push(evaluate(operand, env)?);
    }

    let call_env = Environment::with_parent(&closure.env);
    for (param, arg) in closure.params.iter().zip(args) {
        call_env.define(param.clone(), arg);
    }

    trace!("calling {} with body {}", closure, closure.body);
    evaluate(&closure.body, &call_env)
}
