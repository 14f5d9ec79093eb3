use crate::error::Result;
use crate::eval;
use crate::value::{CallScope, Trampoline, Value};

/// atom : a -> atom a
pub fn atom(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    Ok(Trampoline::returning(Value::atom(scope.at(0))))
}

/// atom? : a -> bool
pub fn is_atom(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    Ok(Trampoline::returning(matches!(scope.at(0), Value::Atom(_))))
}

/// deref : atom a -> a
pub fn deref(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    let cell = scope.at(0).assert_atom()?;
    let value = cell.borrow().clone();

    Ok(Trampoline::Return(value))
}

/// reset! : atom a -> a -> a
pub fn reset(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(2)?;

    let cell = scope.at(0).assert_atom()?;
    let value = scope.at(1);
    cell.replace(value.clone());

    Ok(Trampoline::Return(value))
}

/// swap! : atom a -> (a -> b... -> a) -> b... -> a
///
/// The function runs while the atom is not borrowed, so it may read or swap the same atom.
pub fn swap(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_at_least(2)?;

    let cell = scope.at(0).assert_atom()?;
    let callee = scope.at(1);

    let current = cell.borrow().clone();
    let mut args = vec![current];
    args.extend(scope.args.iter().skip(2).cloned());

    let value = eval::call(&callee, args, scope.env)?;
    cell.replace(value.clone());

    Ok(Trampoline::Return(value))
}
