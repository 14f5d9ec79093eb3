use crate::error::{Result, RuntimeError, SyntaxError};
use crate::printer::print;
use crate::reader;
use crate::value::{CallScope, Trampoline, Value};

/// Prints every argument and joins the results with `separator`.
pub(crate) fn join(args: &[Value], readable: bool, separator: &str) -> String {
    args.iter()
        .map(|arg| print(arg, readable))
        .collect::<Vec<_>>()
        .join(separator)
}

/// pr-str : a... -> string
pub fn pr_str(scope: CallScope<'_>) -> Result<Trampoline> {
    Ok(Trampoline::returning(join(&scope.args, true, " ")))
}

/// str : a... -> string
pub fn str(scope: CallScope<'_>) -> Result<Trampoline> {
    Ok(Trampoline::returning(join(&scope.args, false, "")))
}

/// string? : a -> bool
pub fn is_string(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    Ok(Trampoline::returning(matches!(scope.at(0), Value::Str(_))))
}

/// symbol : string -> symbol
pub fn symbol(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    let name = scope.at(0).assert_string()?;

    Ok(Trampoline::Return(Value::Symbol(name)))
}

/// symbol? : a -> bool
pub fn is_symbol(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    Ok(Trampoline::returning(matches!(scope.at(0), Value::Symbol(_))))
}

/// keyword : string | keyword -> keyword
pub fn keyword(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    match scope.at(0) {
        value @ Value::Keyword(_) => Ok(Trampoline::Return(value)),
        Value::Str(name) => Ok(Trampoline::Return(Value::Keyword(name))),
        value => Err(RuntimeError::type_mismatch("a string", &value)),
    }
}

/// keyword? : a -> bool
pub fn is_keyword(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    Ok(Trampoline::returning(matches!(scope.at(0), Value::Keyword(_))))
}

/// read-string : string -> a
///
/// Text without any form reads as `nil`.
pub fn read_string(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    let source = scope.at(0).assert_string()?;

    match reader::read(&source) {
        Ok(value) => Ok(Trampoline::Return(value)),
        Err(SyntaxError::NoForm) => Ok(Trampoline::Return(Value::Nil)),
        Err(error) => Err(error.into()),
    }
}

#[cfg(test)]
mod tests {
    use crate::session::Session;

    fn rep(source: &str) -> String {
        let session = Session::new(vec![]).unwrap();
        session.rep(source).unwrap().unwrap()
    }

    #[test]
    fn printing_to_strings() {
        assert_eq!(rep(r#"(pr-str "a" 1 :k)"#), r#""\"a\" 1 :k""#);
        assert_eq!(rep(r#"(str "a" 1 :k [2 "b"])"#), r#""a1:k[2 b]""#);
        assert_eq!(rep("(str)"), r#""""#);
        assert_eq!(rep("(pr-str)"), r#""""#);
    }

    #[test]
    fn symbols_and_keywords() {
        assert_eq!(rep(r#"(symbol "abc")"#), "abc");
        assert_eq!(rep(r#"(keyword "abc")"#), ":abc");
        assert_eq!(rep("(keyword :abc)"), ":abc");
        assert_eq!(rep("(symbol? 'a)"), "true");
        assert_eq!(rep("(keyword? :a)"), "true");
        assert_eq!(rep("(string? :a)"), "false");
    }

    #[test]
    fn reading_strings() {
        assert_eq!(rep(r#"(read-string "(1 [2] {:a 3})")"#), "(1 [2] {:a 3})");
        assert_eq!(rep(r#"(read-string ";; nothing")"#), "nil");
        assert_eq!(rep(r#"(read-string "")"#), "nil");
        assert_eq!(rep(r#"(eval (read-string "(+ 1 2)"))"#), "3");

        let session = Session::new(vec![]).unwrap();
        assert!(session.rep(r#"(read-string "(1 2")"#).is_err());
    }
}
