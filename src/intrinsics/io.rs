use rustyline::error::ReadlineError;

use crate::error::{Result, RuntimeError};
use crate::value::{CallScope, Trampoline, Value};

use super::string::join;

/// prn : a... -> nil
pub fn prn(scope: CallScope<'_>) -> Result<Trampoline> {
    println!("{}", join(&scope.args, true, " "));

    Ok(Trampoline::returning(Value::Nil))
}

/// println : a... -> nil
pub fn println(scope: CallScope<'_>) -> Result<Trampoline> {
    println!("{}", join(&scope.args, false, " "));

    Ok(Trampoline::returning(Value::Nil))
}

/// slurp : string -> string
pub fn slurp(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    let path = scope.at(0).assert_string()?;

    let contents = std::fs::read_to_string(&*path).map_err(|error| RuntimeError::Io {
        path: path.to_string(),
        message: error.to_string(),
    })?;

    Ok(Trampoline::returning(contents))
}

/// readline : string -> string | nil
///
/// Returns `nil` at the end of the input.
pub fn readline(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    let prompt = scope.at(0).assert_string()?;

    let io_error = |error: ReadlineError| RuntimeError::Io {
        path: "<stdin>".into(),
        message: error.to_string(),
    };

    let mut editor = rustyline::DefaultEditor::new().map_err(io_error)?;

    match editor.readline(&prompt) {
        Ok(line) => Ok(Trampoline::returning(line)),
        Err(ReadlineError::Eof | ReadlineError::Interrupted) => {
            Ok(Trampoline::returning(Value::Nil))
        }
        Err(error) => Err(io_error(error)),
    }
}

/// time-ms : number
///
/// Milliseconds elapsed on a monotonic clock since the session started.
pub fn time_ms(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(0)?;

    let elapsed = scope.env.epoch().elapsed().as_millis();
    let elapsed = i64::try_from(elapsed).map_err(|_| RuntimeError::Overflow("time-ms"))?;

    Ok(Trampoline::returning(elapsed))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::session::Session;

    #[test]
    fn slurp_reads_whole_files() {
        let path = std::env::temp_dir().join(format!("mal-slurp-{}.txt", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "line one\n\"two\"").unwrap();

        let session = Session::new(vec![]).unwrap();
        let result = session
            .rep(&format!("(slurp {:?})", path.display().to_string()))
            .unwrap()
            .unwrap();

        assert_eq!(result, r#""line one\n\"two\"""#);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn slurp_reports_missing_files() {
        let session = Session::new(vec![]).unwrap();
        let error = session
            .rep(r#"(slurp "/definitely/not/here.mal")"#)
            .unwrap_err();

        assert!(error.to_string().starts_with("/definitely/not/here.mal: "));
    }

    #[test]
    fn time_is_monotonic() {
        let session = Session::new(vec![]).unwrap();
        session.rep("(def! t0 (time-ms))").unwrap();

        assert_eq!(session.rep("(<= t0 (time-ms))").unwrap().unwrap(), "true");
        assert_eq!(session.rep("(number? t0)").unwrap().unwrap(), "true");
    }

    #[test]
    fn time_counts_from_the_session_start() {
        let session = Session::new(vec![]).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));

        let elapsed = session.rep("(time-ms)").unwrap().unwrap();
        assert!(elapsed.parse::<i64>().unwrap() >= 20);

        let fresh = Session::new(vec![]).unwrap();
        assert_eq!(fresh.rep("(< (time-ms) 1000000)").unwrap().unwrap(), "true");
    }

    #[test]
    fn printing_returns_nil() {
        let session = Session::new(vec![]).unwrap();

        assert_eq!(session.rep("(prn 1 \"a\")").unwrap().unwrap(), "nil");
        assert_eq!(session.rep("(println 1 \"a\")").unwrap().unwrap(), "nil");
    }
}
