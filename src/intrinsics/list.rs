use std::rc::Rc;

use crate::error::{Result, RuntimeError};
use crate::eval;
use crate::value::{CallScope, Trampoline, Value};

/// list : a... -> list a
pub fn list(scope: CallScope<'_>) -> Result<Trampoline> {
    Ok(Trampoline::returning(Value::list(scope.args)))
}

/// list? : a -> bool
pub fn is_list(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    Ok(Trampoline::returning(matches!(scope.at(0), Value::List(_))))
}

/// sequential? : a -> bool
pub fn is_sequential(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    let value = scope.at(0);

    Ok(Trampoline::returning(matches!(
        value,
        Value::List(_) | Value::Vector(_)
    )))
}

/// cons : a -> seq a -> list a
pub fn cons(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(2)?;

    let head = scope.at(0);
    let mut tail = scope.at(1).assert_seq_or_nil()?;
    tail.push_front(head);

    Ok(Trampoline::returning(tail))
}

/// concat : seq a... -> list a
pub fn concat(scope: CallScope<'_>) -> Result<Trampoline> {
    let mut result = im::Vector::new();

    for arg in scope.args.iter() {
        result.append(arg.assert_seq_or_nil()?);
    }

    Ok(Trampoline::returning(result))
}

/// first : seq a -> a
pub fn first(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    let items = scope.at(0).assert_seq_or_nil()?;

    Ok(Trampoline::returning(
        items.head().cloned().unwrap_or(Value::Nil),
    ))
}

/// rest : seq a -> list a
pub fn rest(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    let items = scope.at(0).assert_seq_or_nil()?;
    let rest = if items.is_empty() {
        items
    } else {
        items.skip(1)
    };

    Ok(Trampoline::returning(rest))
}

/// nth : seq a -> number -> a
pub fn nth(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(2)?;

    let items = scope.at(0).assert_seq()?;
    let index = scope.at(1).assert_number()?;

    let value = usize::try_from(index)
        .ok()
        .and_then(|nth| items.get(nth))
        .cloned()
        .ok_or(RuntimeError::OutOfBounds {
            index,
            len: items.len(),
        })?;

    Ok(Trampoline::returning(value))
}

/// count : seq a -> number
pub fn count(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    let len = match scope.at(0) {
        Value::Map(dict) => dict.entries.len(),
        value => value.assert_seq_or_nil()?.len(),
    };

    Ok(Trampoline::returning(len as i64))
}

/// empty? : seq a -> bool
pub fn is_empty(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    let empty = match scope.at(0) {
        Value::Map(dict) => dict.entries.is_empty(),
        value => value.assert_seq_or_nil()?.is_empty(),
    };

    Ok(Trampoline::returning(empty))
}

/// conj : seq a -> a... -> seq a
///
/// Lists grow at the front, vectors at the back.
pub fn conj(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_at_least(1)?;

    let mut args = scope.args.into_iter();
    let collection = args.next().unwrap_or(Value::Nil);

    match collection {
        Value::Vector(mut seq) => {
            Rc::make_mut(&mut seq).items.extend(args);
            Ok(Trampoline::returning(Value::Vector(seq)))
        }
        Value::List(mut seq) => {
            let items = &mut Rc::make_mut(&mut seq).items;
            for arg in args {
                items.push_front(arg);
            }
            Ok(Trampoline::returning(Value::List(seq)))
        }
        Value::Nil => Ok(Trampoline::returning(
            args.rev().collect::<im::Vector<_>>(),
        )),
        value => Err(RuntimeError::type_mismatch("a list or vector", &value)),
    }
}

/// seq : seq a | string -> list a | nil
pub fn seq(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    let items = match scope.at(0) {
        Value::Str(string) => string
            .chars()
            .map(|chr| Value::from(chr.to_string()))
            .collect(),
        value => value.assert_seq_or_nil()?,
    };

    if items.is_empty() {
        return Ok(Trampoline::returning(Value::Nil));
    }

    Ok(Trampoline::returning(items))
}

/// apply : (a... -> b) -> a... -> seq a -> b
///
/// The call itself is left to the evaluator, so applying a closure in tail position does not
/// grow the stack.
pub fn apply(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_at_least(2)?;

    let mut args = scope.args;
    let last = args.pop().unwrap_or(Value::Nil).assert_seq_or_nil()?;
    let callee = args.remove(0);
    args.extend(last);

    eval::apply(&callee, args, scope.env)
}

/// map : (a -> b) -> seq a -> list b
pub fn map(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(2)?;

    let callee = scope.at(0);
    let items = scope.at(1).assert_seq_or_nil()?;

    let result = items
        .into_iter()
        .map(|item| eval::call(&callee, vec![item], scope.env))
        .collect::<Result<im::Vector<_>>>()?;

    Ok(Trampoline::returning(result))
}

#[cfg(test)]
mod tests {
    use crate::session::Session;

    fn rep(source: &str) -> String {
        let session = Session::new(vec![]).unwrap();
        session.rep(source).unwrap().unwrap()
    }

    fn fails(source: &str) -> String {
        let session = Session::new(vec![]).unwrap();
        session.rep(source).unwrap_err().to_string()
    }

    #[test]
    fn building_lists() {
        assert_eq!(rep("(list)"), "()");
        assert_eq!(rep("(cons 1 [2 3])"), "(1 2 3)");
        assert_eq!(rep("(cons 1 nil)"), "(1)");
        assert_eq!(rep("(concat [1] (list 2) nil [])"), "(1 2)");
        assert_eq!(rep("(concat)"), "()");
    }

    #[test]
    fn taking_lists_apart() {
        assert_eq!(rep("(first [1 2])"), "1");
        assert_eq!(rep("(first nil)"), "nil");
        assert_eq!(rep("(first ())"), "nil");
        assert_eq!(rep("(rest [1 2])"), "(2)");
        assert_eq!(rep("(rest nil)"), "()");
        assert_eq!(rep("(nth [1 2 3] 2)"), "3");
        assert_eq!(fails("(nth [1 2 3] -1)"), "index -1 out of range for length 3");
        assert_eq!(fails("(nth () 0)"), "index 0 out of range for length 0");
    }

    #[test]
    fn counting() {
        assert_eq!(rep("(count [1 2])"), "2");
        assert_eq!(rep("(count nil)"), "0");
        assert_eq!(rep("(empty? ())"), "true");
        assert_eq!(rep("(empty? {:a 1})"), "false");
    }

    #[test]
    fn conj_respects_the_collection() {
        assert_eq!(rep("(conj (list 1 2) 3 4)"), "(4 3 1 2)");
        assert_eq!(rep("(conj [1 2] 3 4)"), "[1 2 3 4]");
        assert_eq!(rep("(conj nil 1 2)"), "(2 1)");
    }

    #[test]
    fn seq_normalizes() {
        assert_eq!(rep("(seq [1 2])"), "(1 2)");
        assert_eq!(rep("(seq [])"), "nil");
        assert_eq!(rep("(seq \"ab\")"), "(\"a\" \"b\")");
        assert_eq!(rep("(seq \"\")"), "nil");
    }

    #[test]
    fn apply_and_map() {
        assert_eq!(rep("(apply + 1 2 [3 4])"), "10");
        assert_eq!(rep("(apply (fn* (& xs) xs) [])"), "()");
        assert_eq!(rep("(map (fn* (x) (* x x)) [1 2 3])"), "(1 4 9)");
        assert_eq!(rep("(map first [[1] [2]])"), "(1 2)");
    }

    #[test]
    fn predicates() {
        assert_eq!(rep("(list? [1])"), "false");
        assert_eq!(rep("(list? ())"), "true");
        assert_eq!(rep("(sequential? [1])"), "true");
        assert_eq!(rep("(sequential? nil)"), "false");
    }
}
