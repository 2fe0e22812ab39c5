pub mod builtins;
pub mod cli;
pub mod environment;
pub mod error;
pub mod number;
pub mod parser;
pub mod repl;
pub mod runtime;
pub mod tokenizer;
