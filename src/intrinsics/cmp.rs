use crate::error::Result;
use crate::value::{CallScope, Trampoline, Value};

fn compare(scope: CallScope<'_>, op: fn(&i64, &i64) -> bool) -> Result<Trampoline> {
    scope.assert_arity(2)?;

    let left = scope.at(0).assert_number()?;
    let right = scope.at(1).assert_number()?;

    Ok(Trampoline::returning(op(&left, &right)))
}

/// = : a -> b -> bool
pub fn eq(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(2)?;

    Ok(Trampoline::returning(scope.at(0) == scope.at(1)))
}

/// < : number -> number -> bool
pub fn less_than(scope: CallScope<'_>) -> Result<Trampoline> {
    compare(scope, i64::lt)
}

/// <= : number -> number -> bool
pub fn less_equal(scope: CallScope<'_>) -> Result<Trampoline> {
    compare(scope, i64::le)
}

/// > : number -> number -> bool
pub fn greater_than(scope: CallScope<'_>) -> Result<Trampoline> {
    compare(scope, i64::gt)
}

/// >= : number -> number -> bool
pub fn greater_equal(scope: CallScope<'_>) -> Result<Trampoline> {
    compare(scope, i64::ge)
}

/// nil? : a -> bool
pub fn is_nil(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    Ok(Trampoline::returning(matches!(scope.at(0), Value::Nil)))
}

/// true? : a -> bool
pub fn is_true(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    Ok(Trampoline::returning(matches!(scope.at(0), Value::Bool(true))))
}

/// false? : a -> bool
pub fn is_false(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    Ok(Trampoline::returning(matches!(scope.at(0), Value::Bool(false))))
}
