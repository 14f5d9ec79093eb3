//! A session owns the root environment of one interpreter: the primitives, the prelude written
//! in the language itself and the command line arguments. Nothing is global, so several sessions
//! can live side by side.

use crate::environment::Env;
use crate::error::{Result, SyntaxError};
use crate::eval::eval;
use crate::intrinsics::register_intrinsics;
use crate::printer::print;
use crate::reader::{read, read_all};
use crate::value::Value;

/// Definitions that are easier to write in the language than as primitives.
const PRELUDE: &str = r#"
(def! not (fn* (a) (if a false true)))

(def! load-file
  (fn* (f)
    (eval (read-string (str "(do " (slurp f) "\nnil)")))))

(defmacro! cond
  (fn* (& xs)
    (if (> (count xs) 0)
      (list 'if (first xs)
        (if (> (count xs) 1)
          (nth xs 1)
          (throw "odd number of forms to cond"))
        (cons 'cond (rest (rest xs)))))))
"#;

pub struct Session {
    env: Env,
}

impl Session {
    /// Creates a session whose `*ARGV*` holds `argv`.
    pub fn new(argv: Vec<String>) -> Result<Session> {
        let env = Env::new();
        register_intrinsics(&env);
        env.bind(
            "*ARGV*".into(),
            Value::list(argv.into_iter().map(Value::from)),
        );

        let session = Session { env };
        session.eval_str(PRELUDE)?;

        tracing::debug!("session ready");

        Ok(session)
    }

    pub fn eval(&self, form: Value) -> Result<Value> {
        eval(form, self.env.clone())
    }

    /// Evaluates every form of `source` in order, returning the value of the last one.
    pub fn eval_str(&self, source: &str) -> Result<Value> {
        read_all(source)?
            .into_iter()
            .try_fold(Value::Nil, |_, form| self.eval(form))
    }

    /// Reads the first form of `line`, evaluates it and prints the result readably. A line
    /// without any form yields `None`.
    pub fn rep(&self, line: &str) -> Result<Option<String>> {
        let form = match read(line) {
            Ok(form) => form,
            Err(SyntaxError::NoForm) => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        let value = self.eval(form)?;

        Ok(Some(print(&value, true)))
    }

    /// Runs a file through the `load-file` function of the prelude.
    pub fn load_file(&self, path: &str) -> Result<Value> {
        tracing::debug!(path, "loading file");

        self.eval(Value::list([Value::symbol("load-file"), Value::string(path)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argv_is_a_list_of_strings() {
        let session = Session::new(vec!["a".into(), "b c".into()]).unwrap();

        assert_eq!(
            session.rep("*ARGV*").unwrap().unwrap(),
            r#"("a" "b c")"#
        );
        assert_eq!(
            Session::new(vec![]).unwrap().rep("*ARGV*").unwrap().unwrap(),
            "()"
        );
    }

    #[test]
    fn blank_lines_yield_nothing() {
        let session = Session::new(vec![]).unwrap();

        assert_eq!(session.rep("").unwrap(), None);
        assert_eq!(session.rep("   ; just a comment").unwrap(), None);
    }

    #[test]
    fn prelude_not_and_cond() {
        let session = Session::new(vec![]).unwrap();
        let rep = |source: &str| session.rep(source).unwrap().unwrap();

        assert_eq!(rep("(not nil)"), "true");
        assert_eq!(rep("(not 0)"), "false");
        assert_eq!(rep("(cond false 1 nil 2 :else 3)"), "3");
        assert_eq!(rep("(cond false 1)"), "nil");
        assert_eq!(rep("(cond)"), "nil");
        assert!(session.rep("(cond true)").is_err());
    }

    #[test]
    fn sessions_are_independent() {
        let first = Session::new(vec![]).unwrap();
        let second = Session::new(vec![]).unwrap();

        first.rep("(def! x 1)").unwrap();

        assert!(second.rep("x").is_err());
        assert!(second.env.find("x").is_none());
        assert_eq!(first.env.lookup("x").unwrap(), Value::Int(1));
    }

    #[test]
    fn load_file_evaluates_every_form() {
        let path = std::env::temp_dir().join(format!("mal-load-{}.mal", std::process::id()));
        std::fs::write(
            &path,
            ";; definitions\n(def! inc (fn* (x) (+ x 1)))\n(def! two (inc 1))\n",
        )
        .unwrap();

        let session = Session::new(vec![]).unwrap();
        let path = path.display().to_string();

        assert_eq!(session.load_file(&path).unwrap(), Value::Nil);
        assert_eq!(session.rep("two").unwrap().unwrap(), "2");
        assert_eq!(session.rep("(inc two)").unwrap().unwrap(), "3");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn eval_str_returns_the_last_value() {
        let session = Session::new(vec![]).unwrap();

        assert_eq!(session.eval_str("1 2 (+ 1 2)").unwrap(), Value::Int(3));
        assert_eq!(session.eval_str("").unwrap(), Value::Nil);
    }
}
