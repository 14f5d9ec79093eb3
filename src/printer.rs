//! Serializes values back to text. The readable mode produces text the reader accepts again,
//! the display mode is what `str` and `println` show to humans.

use std::fmt::{self, Display, Write};

use crate::value::{Key, Value};

/// A value paired with the printing mode, so it can be used with `format!` and friends.
pub struct Printed<'a> {
    value: &'a Value,
    readable: bool,
}

impl<'a> Printed<'a> {
    pub fn readable(value: &'a Value) -> Self {
        Self {
            value,
            readable: true,
        }
    }

    fn nested<'b>(&self, value: &'b Value) -> Printed<'b> {
        Printed {
            value,
            readable: self.readable,
        }
    }

    fn sequence<'b>(
        &self,
        f: &mut fmt::Formatter<'_>,
        open: char,
        items: impl Iterator<Item = &'b Value>,
        close: char,
    ) -> fmt::Result {
        f.write_char(open)?;
        for (i, item) in items.enumerate() {
            if i != 0 {
                f.write_char(' ')?;
            }
            write!(f, "{}", self.nested(item))?;
        }
        f.write_char(close)
    }
}

impl Display for Printed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Nil => f.write_str("nil"),
            Value::Bool(bool) => write!(f, "{bool}"),
            Value::Int(int) => write!(f, "{int}"),
            Value::Symbol(name) => f.write_str(name),
            Value::Keyword(name) => write!(f, ":{name}"),
            Value::Str(string) if self.readable => write_escaped(f, string),
            Value::Str(string) => f.write_str(string),
            Value::List(seq) => self.sequence(f, '(', seq.items.iter(), ')'),
            Value::Vector(seq) => self.sequence(f, '[', seq.items.iter(), ']'),
            Value::Map(dict) => {
                f.write_char('{')?;
                for (i, (key, value)) in dict.entries.iter().enumerate() {
                    if i != 0 {
                        f.write_char(' ')?;
                    }
                    write_key(f, key, self.readable)?;
                    write!(f, " {}", self.nested(value))?;
                }
                f.write_char('}')
            }
            Value::Primitive(primitive) => write!(f, "#<builtin {}>", primitive.name),
            Value::Closure(closure) if closure.is_macro => f.write_str("#<macro>"),
            Value::Closure(_) => f.write_str("#<function>"),
            Value::Atom(cell) => write!(f, "(atom {})", self.nested(&cell.borrow())),
        }
    }
}

fn write_key(f: &mut fmt::Formatter<'_>, key: &Key, readable: bool) -> fmt::Result {
    let value = Value::from(key.clone());
    let printed = Printed { value: &value, readable };
    write!(f, "{printed}")
}

fn write_escaped(f: &mut fmt::Formatter<'_>, string: &str) -> fmt::Result {
    f.write_char('"')?;
    for chr in string.chars() {
        match chr {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '"' => f.write_str("\\\"")?,
            chr => f.write_char(chr)?,
        }
    }
    f.write_char('"')
}

/// Prints a value, escaping strings when `readable` is set.
pub fn print(value: &Value, readable: bool) -> String {
    Printed { value, readable }.to_string()
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Printed::readable(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_atoms() {
        assert_eq!(print(&Value::Nil, true), "nil");
        assert_eq!(print(&Value::Bool(false), true), "false");
        assert_eq!(print(&Value::Int(-42), true), "-42");
        assert_eq!(print(&Value::keyword("kw"), true), ":kw");
        assert_eq!(print(&Value::symbol("abc"), true), "abc");
    }

    #[test]
    fn escapes_strings_only_when_readable() {
        let string = Value::string("a \"b\"\n\\");

        assert_eq!(print(&string, true), r#""a \"b\"\n\\""#);
        assert_eq!(print(&string, false), "a \"b\"\n\\");
    }

    #[test]
    fn prints_collections() {
        let nested = Value::list([
            Value::Int(1),
            Value::vector([Value::string("x"), Value::Nil]),
            Value::list([]),
        ]);

        assert_eq!(print(&nested, true), r#"(1 ["x" nil] ())"#);
        assert_eq!(print(&nested, false), "(1 [x nil] ())");
    }

    #[test]
    fn prints_maps_in_key_order() {
        let map = Value::map(im::ordmap! {
            Key::Keyword("b".into()) => Value::Int(2),
            Key::Str("a".into()) => Value::string("v")
        });

        assert_eq!(print(&map, true), r#"{"a" "v" :b 2}"#);
        assert_eq!(print(&map, false), "{a v :b 2}");
    }

    #[test]
    fn prints_atoms_with_their_contents() {
        let atom = Value::atom(Value::list([Value::Int(1)]));

        assert_eq!(print(&atom, true), "(atom (1))");
    }
}
