use std::rc::Rc;

use crate::error::Result;
use crate::value::{CallScope, Seq, Trampoline, Value};

/// vector : a... -> vector a
pub fn vector(scope: CallScope<'_>) -> Result<Trampoline> {
    Ok(Trampoline::returning(Value::vector(scope.args)))
}

/// vec : seq a -> vector a
pub fn vec(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    match scope.at(0) {
        value @ Value::Vector(_) => Ok(Trampoline::returning(value)),
        value => {
            let items = value.assert_seq_or_nil()?;
            Ok(Trampoline::returning(Value::Vector(Rc::new(Seq::new(items)))))
        }
    }
}

/// vector? : a -> bool
pub fn is_vector(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    Ok(Trampoline::returning(matches!(scope.at(0), Value::Vector(_))))
}
