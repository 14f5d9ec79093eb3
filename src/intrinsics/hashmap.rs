use crate::error::{Result, RuntimeError};
use crate::value::{CallScope, Key, Trampoline, Value};

fn insert_pairs(
    mut entries: im::OrdMap<Key, Value>,
    pairs: &[Value],
    name: &'static str,
) -> Result<Value> {
    if pairs.len() % 2 != 0 {
        return Err(RuntimeError::malformed(name, "keys and values must come in pairs"));
    }

    for pair in pairs.chunks(2) {
        entries.insert(Key::try_from(&pair[0])?, pair[1].clone());
    }

    Ok(Value::map(entries))
}

/// hash-map : (k v)... -> map k v
pub fn hash_map(scope: CallScope<'_>) -> Result<Trampoline> {
    let map = insert_pairs(im::OrdMap::new(), &scope.args, "hash-map")?;

    Ok(Trampoline::returning(map))
}

/// map? : a -> bool
pub fn is_map(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    Ok(Trampoline::returning(matches!(scope.at(0), Value::Map(_))))
}

/// assoc : map k v -> (k v)... -> map k v
pub fn assoc(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_at_least(1)?;

    let entries = scope.at(0).assert_map()?;
    let map = insert_pairs(entries, &scope.args[1..], "assoc")?;

    Ok(Trampoline::returning(map))
}

/// dissoc : map k v -> k... -> map k v
pub fn dissoc(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_at_least(1)?;

    let mut entries = scope.at(0).assert_map()?;
    for key in scope.args.iter().skip(1) {
        entries.remove(&Key::try_from(key)?);
    }

    Ok(Trampoline::returning(Value::map(entries)))
}

/// get : map k v -> k -> v | nil
pub fn get(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(2)?;

    let entries = scope.at(0).assert_map()?;
    let key = Key::try_from(&scope.at(1))?;

    Ok(Trampoline::returning(
        entries.get(&key).cloned().unwrap_or(Value::Nil),
    ))
}

/// contains? : map k v -> k -> bool
pub fn contains(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(2)?;

    let entries = scope.at(0).assert_map()?;
    let key = Key::try_from(&scope.at(1))?;

    Ok(Trampoline::returning(entries.contains_key(&key)))
}

/// keys : map k v -> list k
pub fn keys(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    let entries = scope.at(0).assert_map()?;

    Ok(Trampoline::returning(Value::list(
        entries.keys().cloned().map(Value::from),
    )))
}

/// vals : map k v -> list v
pub fn vals(scope: CallScope<'_>) -> Result<Trampoline> {
    scope.assert_arity(1)?;

    let entries = scope.at(0).assert_map()?;

    Ok(Trampoline::returning(Value::list(entries.values().cloned())))
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
    fn building_maps() {
        assert_eq!(rep("(hash-map :b 2 :a 1)"), "{:a 1 :b 2}");
        assert_eq!(rep("(hash-map)"), "{}");
        assert_eq!(rep("(assoc {:a 1} :a 2 \"b\" 3)"), "{\"b\" 3 :a 2}");
        assert_eq!(rep("(assoc nil 1 2)"), "{1 2}");
        assert_eq!(rep("(dissoc {:a 1 :b 2} :a :c)"), "{:b 2}");
        assert_eq!(
            fails("(hash-map :a)"),
            "malformed 'hash-map': keys and values must come in pairs"
        );
        assert_eq!(
            fails("(hash-map [1] 2)"),
            "expected a map key but got [1]"
        );
    }

    #[test]
    fn reading_maps() {
        assert_eq!(rep("(get {:a 1} :a)"), "1");
        assert_eq!(rep("(get {:a 1} :b)"), "nil");
        assert_eq!(rep("(get nil :b)"), "nil");
        assert_eq!(rep("(contains? {:a nil} :a)"), "true");
        assert_eq!(rep("(contains? {:a nil} \"a\")"), "false");
        assert_eq!(rep("(keys {:b 2 :a 1})"), "(:a :b)");
        assert_eq!(rep("(vals {:b 2 :a 1})"), "(1 2)");
        assert_eq!(rep("(map? {})"), "true");
        assert_eq!(rep("(map? [])"), "false");
    }
}
