use clap::Parser;
use dirs::home_dir;
use log::{debug, info};
use nu_ansi_term::{Color, Style};
use reedline::{DefaultHinter, FileBackedHistory, Reedline, Signal};
use snek::{
    cli::{Args, Commands},
    environment::Environment,
    error::Result,
    parser::parse_program,
    repl::{respond, REPLPrompt, REPLValidator, Reply, SyntaxHighlighter},
    runtime::interpret_program,
    tokenizer::tokenize,
};
use std::{fs, path::PathBuf};

fn run_file(file: PathBuf) -> Result<()> {
    let source = fs::read_to_string(file)?;
    let env = Environment::global();

    if let Some(value) = interpret_program(&source, &env)? {
        println!("{}", value);
    }

    Ok(())
}

fn check_file(file: PathBuf) -> Result<()> {
    let source = fs::read_to_string(file)?;

    let tokens = tokenize(&source);
    debug!("{} tokens", tokens.len());

    let program = parse_program(&tokens)?;
    println!("ok: {} expressions", program.len());

    Ok(())
}

fn run_repl(no_history: bool) -> Result<()> {
    let mut line_editor = Reedline::create()
        .with_hinter(Box::new(
            DefaultHinter::default().with_style(Style::new().italic().fg(Color::LightGray)),
        ))
        .with_highlighter(Box::new(SyntaxHighlighter))
        .with_validator(Box::new(REPLValidator));

    if !no_history {
        // Add file-backed history if possible
        if let Some(history) = home_dir()
            .map(|home| home.join(".snek_history"))
            .and_then(|path| FileBackedHistory::with_file(100, path).ok())
            .map(Box::new)
        {
            line_editor = line_editor.with_history(history);
        } else {
            eprintln!("NOTE: Failed to load history. Persistence is now disabled.")
        }
    }

    let prompt = REPLPrompt;
    let env = Environment::global();

    loop {
        match line_editor.read_line(&prompt)? {
            Signal::Success(buffer) => match respond(&buffer, &env) {
                Reply::Quit => break Ok(()),
                Reply::Empty => (),
                Reply::Value(value) => {
                    println!("{} {}", Color::DarkGray.paint("  out>"), value);
                }
                Reply::Error(err) => {
                    eprintln!("{}", Color::Red.paint(err.to_string()));
                }
            },
            Signal::CtrlD | Signal::CtrlC => {
                break Ok(());
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Commands::Run { file } => {
            info!("FILE MODE");
            debug!("file: {:?}", file);

            run_file(file)
                .inspect_err(|err| {
                    eprintln!("{}", err);
                })
                .ok();
        }
        Commands::Check { file } => {
            info!("CHECK MODE");
            debug!("file: {:?}", file);

            check_file(file)
                .inspect_err(|err| {
                    eprintln!("{}", err);
                })
                .ok();
        }
        Commands::Repl { no_history } => {
            info!("REPL MODE");

            run_repl(no_history)
                .inspect_err(|err| {
                    eprintln!("{}", err);
                })
                .ok();
        }
    }
    Ok(())
}
