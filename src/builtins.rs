use crate::error::{evaluation_error, Result};
use crate::number::Number;
use crate::runtime::Value;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display, Formatter};

/// A fixed operator from the root frame, applied to already-evaluated
/// arguments.
#[derive(Clone, Copy)]
pub struct Primitive {
    name: &'static str,
    func: fn(&[Value]) -> Result<Value>,
}

impl Primitive {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.func)(args)
    }
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<built-in {}>", self.name)
    }
}

impl Debug for Primitive {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

pub fn create_builtin_table() -> HashMap<String, Value> {
    let mut table = HashMap::new();

    macro_rules! define_builtin {
        ($name:expr, $func:expr) => {
            table.insert(
                $name.to_string(),
                Value::Primitive(Primitive {
                    name: $name,
                    func: $func,
                }),
            );
        };
    }

    define_builtin!("+", |args| {
        let mut sum = Number::Int(0);
        for n in numbers("+", args)? {
            sum = sum.checked_add(n)?;
        }
        Ok(Value::Number(sum))
    });

    define_builtin!("-", |args| {
        let nums = numbers("-", args)?;
        match nums.split_first() {
            None => evaluation_error("- requires at least one argument"),
            Some((first, [])) => Ok(Value::Number(first.checked_neg()?)),
            Some((first, rest)) => {
                let mut subtrahend = Number::Int(0);
                for n in rest {
                    subtrahend = subtrahend.checked_add(*n)?;
                }
                Ok(Value::Number(first.checked_sub(subtrahend)?))
            }
        }
    });

    define_builtin!("*", |args| {
        let mut product = Number::Int(1);
        for n in numbers("*", args)? {
            product = product.checked_mul(n)?;
        }
        Ok(Value::Number(product))
    });

    define_builtin!("/", |args| {
        let nums = numbers("/", args)?;
        match nums.split_first() {
            None => evaluation_error("/ requires at least one argument"),
            Some((first, rest)) => {
                let mut quotient = *first;
                for n in rest {
                    quotient = quotient.checked_div(*n)?;
                }
                Ok(Value::Number(quotient))
            }
        }
    });

    table
}

fn numbers(name: &str, args: &[Value]) -> Result<Vec<Number>> {
    args.iter()
        .map(|arg| match arg {
            Value::Number(n) => Ok(*n),
            other => evaluation_error(format!("{} expects numbers, got {}", name, other)),
        })
        .collect()
}
