//! The interactive driver: reads a line, evaluates it in the session and prints the result.

use std::path::PathBuf;

use miette::IntoDiagnostic;
use rustyline::{
    error::ReadlineError, history::DefaultHistory, validate::MatchingBracketValidator, Completer,
    Editor, Helper, Highlighter, Hinter, Validator,
};

use crate::error::RuntimeError;
use crate::session::Session;

const PROMPT: &str = "user> ";

/// Keeps asking for input while brackets are open, so forms can span several lines.
#[derive(Completer, Helper, Highlighter, Hinter, Validator)]
struct InputValidator {
    #[rustyline(Validator)]
    brackets: MatchingBracketValidator,
}

/// Prints an error to stderr. Syntax errors are rendered against `source` when it is known.
pub fn report(error: RuntimeError, source: Option<&str>) {
    match (error, source) {
        (RuntimeError::Syntax(error), Some(source)) => {
            let report = miette::Report::new(error).with_source_code(source.to_string());
            eprintln!("{report:?}");
        }
        (RuntimeError::Syntax(error), None) => {
            eprintln!("{:?}", miette::Report::new(error));
        }
        (error, _) => eprintln!("error: {error}"),
    }
}

pub fn run(session: &Session, history: Option<PathBuf>) -> miette::Result<()> {
    let mut rl: Editor<InputValidator, DefaultHistory> = Editor::new().into_diagnostic()?;
    rl.set_helper(Some(InputValidator {
        brackets: MatchingBracketValidator::new(),
    }));

    if let Some(path) = &history {
        if rl.load_history(path).is_err() {
            tracing::debug!(path = %path.display(), "no previous history");
        }
    }

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                rl.add_history_entry(line.as_str()).into_diagnostic()?;

                match session.rep(&line) {
                    Ok(Some(output)) => println!("{output}"),
                    Ok(None) => {}
                    Err(error) => report(error, Some(&line)),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(error) => return Err(error).into_diagnostic(),
        }
    }

    if let Some(path) = &history {
        if let Err(error) = rl.save_history(path) {
            tracing::warn!(path = %path.display(), %error, "cannot save history");
        }
    }

    Ok(())
}
