use crate::error::{Result, RuntimeError};
use crate::value::{CallScope, Trampoline, Value};

fn fold(
    scope: &CallScope<'_>,
    name: &'static str,
    initial: i64,
    op: fn(i64, i64) -> Option<i64>,
) -> Result<i64> {
    scope.args.iter().try_fold(initial, |result, arg| {
        op(result, arg.assert_number()?).ok_or(RuntimeError::Overflow(name))
    })
}

/// + : number... -> number
pub fn add(scope: CallScope<'_>) -> Result<Trampoline> {
    let result = fold(&scope, "+", 0, i64::checked_add)?;

    Ok(Trampoline::returning(result))
}

/// - : number -> number... -> number
pub fn sub(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_at_least(1)?;

    let first = scope.at(0).assert_number()?;
    if scope.args.len() == 1 {
        let negated = first.checked_neg().ok_or(RuntimeError::Overflow("-"))?;
        return Ok(Trampoline::returning(negated));
    }

    let mut result = first;
    for arg in scope.args.iter().skip(1) {
        result = result
            .checked_sub(arg.assert_number()?)
            .ok_or(RuntimeError::Overflow("-"))?;
    }

    Ok(Trampoline::returning(result))
}

/// * : number... -> number
pub fn mul(scope: CallScope<'_>) -> Result<Trampoline> {
    let result = fold(&scope, "*", 1, i64::checked_mul)?;

    Ok(Trampoline::returning(result))
}

/// / : number -> number... -> number
///
/// Truncates toward zero.
pub fn div(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_at_least(2)?;

    let mut result = scope.at(0).assert_number()?;

    for arg in scope.args.iter().skip(1) {
        let divisor = arg.assert_number()?;
        if divisor == 0 {
            return Err(RuntimeError::DivisionByZero);
        }
        result = result
            .checked_div(divisor)
            .ok_or(RuntimeError::Overflow("/"))?;
    }

    Ok(Trampoline::returning(result))
}

/// number? : a -> bool
pub fn is_number(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    Ok(Trampoline::returning(matches!(scope.at(0), Value::Int(_))))
}
