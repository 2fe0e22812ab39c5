use nu_ansi_term::{Color, Style};
use reedline::{
    Highlighter, Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus,
    StyledText, ValidationResult, Validator,
};
use std::borrow::Cow;

use crate::environment::Environment;
use crate::error::Error;
use crate::number::Number;
use crate::parser::{DEFINE, LAMBDA};
use crate::runtime::{interpret, Value};
use crate::tokenizer::{tokenize, Token};

/// Input that ends the session.
pub const QUIT: &str = "QUIT";

#[derive(Debug)]
pub enum Reply {
    Quit,
    Empty,
    Value(Value),
    Error(Error),
}

/// Runs one submission against the session environment. Errors leave the
/// environment as it was at the point of failure.
pub fn respond(input: &str, env: &Environment) -> Reply {
    let trimmed = input.trim();
    if trimmed == QUIT {
        return Reply::Quit;
    }
    if tokenize(trimmed).is_empty() {
        return Reply::Empty;
    }

    match interpret(input, env) {
        Ok(value) => Reply::Value(value),
        Err(err) => Reply::Error(err),
    }
}

#[derive(Clone)]
pub struct REPLPrompt;

impl Prompt for REPLPrompt {
    fn render_prompt_left(&self) -> Cow<str> {
        Cow::Borrowed("in")
    }

    fn render_prompt_right(&self) -> Cow<str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _edit_mode: PromptEditMode) -> Cow<str> {
        Cow::Borrowed("> ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<str> {
        Cow::Borrowed("  ... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}

/// Keeps the editor open while parentheses are unclosed. Surplus closing
/// parentheses are submitted so the parser can report them.
pub struct REPLValidator;

impl Validator for REPLValidator {
    fn validate(&self, line: &str) -> ValidationResult {
        let mut depth: i64 = 0;

        for token in tokenize(line) {
            match token {
                Token::LeftParen => depth += 1,
                Token::RightParen => {
                    depth -= 1;
                    if depth < 0 {
                        return ValidationResult::Complete;
                    }
                }
                Token::Atom(_) => (),
            }
        }

        if depth == 0 {
            ValidationResult::Complete
        } else {
            ValidationResult::Incomplete
        }
    }
}

pub static KEYWORD_COLOR: Color = Color::LightBlue;
pub static LITERAL_COLOR: Color = Color::Yellow;
pub static DEFAULT_COLOR: Color = Color::White;
pub static OPERATOR_COLOR: Color = Color::DarkGray;
pub static COMMENT_COLOR: Color = Color::Green;

pub struct SyntaxHighlighter;

impl SyntaxHighlighter {
    fn token_color(token: &Token) -> Color {
        match token {
            Token::LeftParen | Token::RightParen => OPERATOR_COLOR,
            Token::Atom(text) if text == DEFINE || text == LAMBDA => KEYWORD_COLOR,
            Token::Atom(text) if matches!(text.as_str(), "+" | "-" | "*" | "/") => OPERATOR_COLOR,
            Token::Atom(text) if Number::parse(text).is_some() => LITERAL_COLOR,
            Token::Atom(_) => DEFAULT_COLOR,
        }
    }
}

/// Text between tokens is whitespace or a comment.
fn push_gap(styled_text: &mut StyledText, gap: &str) {
    match gap.find(';') {
        Some(pos) => {
            if pos > 0 {
                styled_text.push((Style::new().fg(DEFAULT_COLOR), gap[..pos].to_string()));
            }
            styled_text.push((Style::new().fg(COMMENT_COLOR), gap[pos..].to_string()));
        }
        None => styled_text.push((Style::new().fg(DEFAULT_COLOR), gap.to_string())),
    }
}

impl Highlighter for SyntaxHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled_text = StyledText::new();
        let mut remaining = line;

        for token in tokenize(line) {
            let token_str = token.as_str();

            if let Some(pos) = remaining.find(token_str) {
                if pos > 0 {
                    push_gap(&mut styled_text, &remaining[..pos]);
                }

                let color = SyntaxHighlighter::token_color(&token);
                styled_text.push((Style::new().fg(color), token_str.to_string()));
                remaining = &remaining[pos + token_str.len()..];
            }
        }

        if !remaining.is_empty() {
            push_gap(&mut styled_text, remaining);
        }

        styled_text
    }
}
