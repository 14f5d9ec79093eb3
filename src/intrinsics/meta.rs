use crate::error::Result;
use crate::value::{CallScope, Trampoline};

/// meta : a -> b | nil
pub fn meta(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    Ok(Trampoline::Return(scope.at(0).meta()?))
}

/// with-meta : a -> b -> a
pub fn with_meta(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(2)?;

    Ok(Trampoline::Return(scope.at(0).with_meta(scope.at(1))?))
}
