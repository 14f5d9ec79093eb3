use crate::error::{Result, RuntimeError};
use crate::value::{CallScope, Trampoline, Value};

/// eval : a -> b
///
/// Evaluates its argument in the root frame, whatever frame it is called from.
pub fn eval(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    Ok(Trampoline::Eval(scope.at(0), scope.env.root()))
}

/// throw : a -> !
pub fn throw(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    Err(RuntimeError::Thrown(scope.at(0)))
}

/// fn? : a -> bool
pub fn is_fn(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    let value = match scope.at(0) {
        Value::Primitive(_) => true,
        Value::Closure(closure) => !closure.is_macro,
        _ => false,
    };

    Ok(Trampoline::returning(value))
}

/// macro? : a -> bool
pub fn is_macro(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    let value = matches!(scope.at(0), Value::Closure(closure) if closure.is_macro);

    Ok(Trampoline::returning(value))
}

#[cfg(test)]
mod tests {
    use crate::error::RuntimeError;
    use crate::session::Session;
    use crate::value::Value;

    #[test]
    fn eval_uses_the_root_frame() {
        let session = Session::new(vec![]).unwrap();
        let rep = |source: &str| session.rep(source).unwrap().unwrap();

        rep("(def! x 1)");
        assert_eq!(rep("(let* (x 2) (eval 'x))"), "1");
        assert_eq!(rep("(let* (y 2) (eval '(def! y 3)))"), "3");
        assert_eq!(rep("y"), "3");
    }

    #[test]
    fn throw_carries_any_value() {
        let session = Session::new(vec![]).unwrap();

        match session.rep("(throw {:code 7})") {
            Err(RuntimeError::Thrown(value)) => {
                assert_eq!(value.to_string(), "{:code 7}");
            }
            other => panic!("expected a thrown value, got {other:?}"),
        }

        let error = session.rep("(throw \"boom\")").unwrap_err();
        assert_eq!(error.to_string(), "uncaught exception: \"boom\"");
        assert!(matches!(error, RuntimeError::Thrown(Value::Str(_))));
    }

    #[test]
    fn function_predicates() {
        let session = Session::new(vec![]).unwrap();
        let rep = |source: &str| session.rep(source).unwrap().unwrap();

        rep("(defmacro! m (fn* () 1))");
        assert_eq!(rep("(fn? +)"), "true");
        assert_eq!(rep("(fn? (fn* () 1))"), "true");
        assert_eq!(rep("(fn? m)"), "false");
        assert_eq!(rep("(macro? m)"), "true");
        assert_eq!(rep("(macro? +)"), "false");
        assert_eq!(rep("(fn? :k)"), "false");
    }
}
