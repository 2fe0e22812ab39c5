use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    IO(#[from] std::io::Error),
    #[error("syntax error: {message}")]
    Syntax { message: String },
    #[error("name error: {message}")]
    Name { message: String },
    #[error("evaluation error: {message}")]
    Evaluation { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn syntax_error<T>(message: impl Into<String>) -> Result<T> {
    Err(Error::Syntax {
        message: message.into(),
    })
}

pub fn name_error<T>(message: impl Into<String>) -> Result<T> {
    Err(Error::Name {
        message: message.into(),
    })
}

pub fn evaluation_error<T>(message: impl Into<String>) -> Result<T> {
    Err(Error::Evaluation {
        message: message.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_labeled_by_kind() {
        let err = syntax_error::<()>("unbalanced parentheses").unwrap_err();
        assert_eq!(err.to_string(), "syntax error: unbalanced parentheses");

        let err = name_error::<()>("'x' is not defined").unwrap_err();
        assert_eq!(err.to_string(), "name error: 'x' is not defined");

        let err = evaluation_error::<()>("division by zero").unwrap_err();
        assert_eq!(err.to_string(), "evaluation error: division by zero");
    }
}
