//! Macro expansion and the quasiquote transform. Both are plain rewrites of forms: macros run
//! before a list is evaluated, and quasiquote turns a template into `cons`/`concat`/`vec` calls
//! that the evaluator then runs like any other code.

use std::rc::Rc;

use crate::environment::Env;
use crate::error::Result;
use crate::eval::eval;
use crate::value::{Closure, Value};

/// Returns the macro closure if `form` is a list whose head is a symbol bound to a macro.
fn macro_call(form: &Value, env: &Env) -> Option<Rc<Closure>> {
    let Value::List(list) = form else {
        return None;
    };
    let Some(Value::Symbol(name)) = list.items.head() else {
        return None;
    };
    match env.find(name)? {
        Value::Closure(closure) if closure.is_macro => Some(closure),
        _ => None,
    }
}

/// Expands `form` until its head no longer names a macro. The macro body gets the remaining
/// elements of the form unevaluated. There is no limit on the number of rounds.
pub fn macroexpand(mut form: Value, env: &Env) -> Result<Value> {
    while let Some(closure) = macro_call(&form, env) {
        let Value::List(list) = &form else {
            break;
        };
        let args = list.items.skip(1).into_iter().collect();
        let frame = Env::create(&closure.env, &closure.params, args)?;

        tracing::trace!(form = %form, "expanding macro");
        form = eval(closure.body.clone(), frame)?;
    }

    Ok(form)
}

/// The operand of `form` when it is a two element list headed by the symbol `name`.
fn unary_call(form: &Value, name: &str) -> Option<Value> {
    match form {
        Value::List(list) if list.items.len() == 2 && list.items[0].is_symbol(name) => {
            Some(list.items[1].clone())
        }
        _ => None,
    }
}

/// Rewrites a quasiquoted template into code that builds it. `depth` counts how far inside the
/// template the rewrite is and only shows up in traces.
pub fn quasiquote(form: &Value, depth: usize) -> Value {
    tracing::trace!(depth, form = %form, "quasiquote");

    if let Some(operand) = unary_call(form, "unquote") {
        return operand;
    }

    match form {
        Value::List(seq) | Value::Vector(seq) => {
            let mut result = Value::list([]);

            for item in seq.items.iter().rev() {
                result = match unary_call(item, "splice-unquote") {
                    Some(spliced) => Value::list([Value::symbol("concat"), spliced, result]),
                    None => Value::list([
                        Value::symbol("cons"),
                        quasiquote(item, depth + 1),
                        result,
                    ]),
                };
            }

            match form {
                Value::Vector(_) => Value::list([Value::symbol("vec"), result]),
                _ => result,
            }
        }
        Value::Map(_) | Value::Symbol(_) => Value::list([Value::symbol("quote"), form.clone()]),
        _ => form.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeError;
    use crate::printer::print;
    use crate::reader::read;
    use crate::session::Session;

    fn expand(source: &str) -> String {
        print(&quasiquote(&read(source).unwrap(), 0), true)
    }

    fn session_error(setup: &str, source: &str) -> RuntimeError {
        let session = Session::new(vec![]).unwrap();
        session.rep(setup).unwrap();
        session.rep(source).unwrap_err()
    }

    #[test]
    fn failing_macro_bodies_abort_the_evaluation() {
        let error = session_error("(defmacro! bad (fn* () (throw :boom)))", "(+ 1 (bad))");
        assert!(matches!(&error, RuntimeError::Thrown(Value::Keyword(name)) if &**name == "boom"));
        assert_eq!(error.to_string(), "uncaught exception: :boom");

        let error = session_error("(defmacro! lost (fn* () missing))", "(lost)");
        assert!(matches!(error, RuntimeError::UnboundSymbol(name) if name == "missing"));

        let error = session_error(
            "(defmacro! bad (fn* () (throw :boom)))",
            "(macroexpand (bad))",
        );
        assert!(matches!(error, RuntimeError::Thrown(_)));
    }

    #[test]
    fn unquote_is_replaced_by_its_operand() {
        assert_eq!(expand("(unquote x)"), "x");
    }

    #[test]
    fn lists_become_cons_chains() {
        assert_eq!(expand("(a 1)"), "(cons (quote a) (cons 1 ()))");
        assert_eq!(expand("(a ~b)"), "(cons (quote a) (cons b ()))");
        assert_eq!(expand("()"), "()");
    }

    #[test]
    fn splices_are_concatenated() {
        assert_eq!(expand("(1 ~@xs 4)"), "(cons 1 (concat xs (cons 4 ())))");
    }

    #[test]
    fn vectors_are_wrapped_in_vec() {
        assert_eq!(expand("[1 ~@xs]"), "(vec (cons 1 (concat xs ())))");
        assert_eq!(expand("[unquote x]"), "(vec (cons (quote unquote) (cons (quote x) ())))");
    }

    #[test]
    fn maps_and_symbols_are_quoted() {
        assert_eq!(expand("{:a b}"), "(quote {:a b})");
        assert_eq!(expand("sym"), "(quote sym)");
        assert_eq!(expand(":kw"), ":kw");
        assert_eq!(expand("\"s\""), "\"s\"");
    }
}
