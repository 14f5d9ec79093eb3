//! This module defines the values that are used by the interpreter. Every value is cheap to
//! clone: strings and symbols are reference counted, and sequences and maps are persistent
//! structures from [im], so the evaluator can pass values around by value.

use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::rc::Rc;

use crate::environment::Env;
use crate::error::{Result, RuntimeError};
use crate::printer::print;

/// Interned-ish name of a symbol or keyword.
pub type Symbol = Rc<str>;

/// Metadata attached to collections and functions. An empty [Meta] reads back as `nil`.
#[derive(Clone, Default)]
pub struct Meta(Option<Rc<Value>>);

impl Meta {
    pub fn new(value: Value) -> Self {
        match value {
            Value::Nil => Meta(None),
            value => Meta(Some(Rc::new(value))),
        }
    }

    pub fn get(&self) -> Value {
        self.0.as_deref().cloned().unwrap_or(Value::Nil)
    }
}

/// An ordered sequence, shared by lists and vectors.
#[derive(Clone, Default)]
pub struct Seq {
    pub items: im::Vector<Value>,
    pub meta: Meta,
}

impl Seq {
    pub fn new(items: im::Vector<Value>) -> Self {
        Self {
            items,
            meta: Meta::default(),
        }
    }
}

/// A hash-map literal or the result of `hash-map`/`assoc`.
#[derive(Clone, Default)]
pub struct Dict {
    pub entries: im::OrdMap<Key, Value>,
    pub meta: Meta,
}

impl Dict {
    pub fn new(entries: im::OrdMap<Key, Value>) -> Self {
        Self {
            entries,
            meta: Meta::default(),
        }
    }
}

/// The subset of values that can be used as map keys. The derived ordering is what fixes the
/// iteration order of maps.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Nil,
    Bool(bool),
    Int(i64),
    Str(Rc<str>),
    Keyword(Symbol),
    Symbol(Symbol),
}

impl TryFrom<&Value> for Key {
    type Error = RuntimeError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Nil => Ok(Key::Nil),
            Value::Bool(bool) => Ok(Key::Bool(*bool)),
            Value::Int(int) => Ok(Key::Int(*int)),
            Value::Str(string) => Ok(Key::Str(string.clone())),
            Value::Keyword(name) => Ok(Key::Keyword(name.clone())),
            Value::Symbol(name) => Ok(Key::Symbol(name.clone())),
            _ => Err(RuntimeError::type_mismatch("a map key", value)),
        }
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Nil => Value::Nil,
            Key::Bool(bool) => Value::Bool(bool),
            Key::Int(int) => Value::Int(int),
            Key::Str(string) => Value::Str(string),
            Key::Keyword(name) => Value::Keyword(name),
            Key::Symbol(name) => Value::Symbol(name),
        }
    }
}

/// What a primitive asks the evaluator to do next: either it already has the answer, or the
/// evaluator should continue its loop with a new form in a new environment.
pub enum Trampoline {
    Eval(Value, Env),
    Return(Value),
}

impl Trampoline {
    pub fn returning(value: impl Into<Value>) -> Self {
        Trampoline::Return(value.into())
    }
}

/// The arguments of a primitive call, already evaluated, and the environment of the caller.
pub struct CallScope<'a> {
    pub args: Vec<Value>,
    pub env: &'a Env,
}

impl CallScope<'_> {
    pub fn at(&self, nth: usize) -> Value {
        self.args.get(nth).cloned().unwrap_or(Value::Nil)
    }

    pub fn assert_arity(&self, size: usize) -> Result<()> {
        if self.args.len() != size {
            Err(RuntimeError::WrongArity(size, self.args.len()))
        } else {
            Ok(())
        }
    }

    pub fn assert_at_least(&self, size: usize) -> Result<()> {
        if self.args.len() < size {
            Err(RuntimeError::TooFewArguments(size, self.args.len()))
        } else {
            Ok(())
        }
    }
}

pub type Prim = fn(CallScope<'_>) -> Result<Trampoline>;

/// External functions that can be called from the interpreter.
#[derive(Clone)]
pub struct Primitive {
    pub name: &'static str,
    pub call: Prim,
    pub meta: Meta,
}

/// A closure is a function defined with `fn*`. Its body is evaluated by the evaluator loop itself
/// in a frame chained to the captured environment.
#[derive(Clone)]
pub struct Closure {
    pub params: Rc<[Symbol]>,
    pub body: Value,
    pub env: Env,
    pub is_macro: bool,
    pub meta: Meta,
}

#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Symbol(Symbol),
    Keyword(Symbol),
    Str(Rc<str>),
    List(Rc<Seq>),
    Vector(Rc<Seq>),
    Map(Rc<Dict>),
    Primitive(Rc<Primitive>),
    Closure(Rc<Closure>),
    Atom(Rc<RefCell<Value>>),
}

impl Value {
    pub fn symbol(name: &str) -> Self {
        Value::Symbol(name.into())
    }

    pub fn keyword(name: &str) -> Self {
        Value::Keyword(name.into())
    }

    pub fn string(value: &str) -> Self {
        Value::Str(value.into())
    }

    pub fn list<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::List(Rc::new(Seq::new(items.into_iter().collect())))
    }

    pub fn vector<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Vector(Rc::new(Seq::new(items.into_iter().collect())))
    }

    pub fn map(entries: im::OrdMap<Key, Value>) -> Self {
        Value::Map(Rc::new(Dict::new(entries)))
    }

    pub fn atom(value: Value) -> Self {
        Value::Atom(Rc::new(RefCell::new(value)))
    }

    /// Only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn is_symbol(&self, name: &str) -> bool {
        matches!(self, Value::Symbol(symbol) if &**symbol == name)
    }

    pub fn assert_number(&self) -> Result<i64> {
        match self {
            Value::Int(int) => Ok(*int),
            _ => Err(RuntimeError::type_mismatch("a number", self)),
        }
    }

    pub fn assert_symbol(&self) -> Result<Symbol> {
        match self {
            Value::Symbol(name) => Ok(name.clone()),
            _ => Err(RuntimeError::type_mismatch("a symbol", self)),
        }
    }

    pub fn assert_string(&self) -> Result<Rc<str>> {
        match self {
            Value::Str(string) => Ok(string.clone()),
            _ => Err(RuntimeError::type_mismatch("a string", self)),
        }
    }

    /// Elements of a list or a vector.
    pub fn assert_seq(&self) -> Result<im::Vector<Value>> {
        match self {
            Value::List(seq) | Value::Vector(seq) => Ok(seq.items.clone()),
            _ => Err(RuntimeError::type_mismatch("a list or vector", self)),
        }
    }

    /// Like [Value::assert_seq], but `nil` reads as the empty sequence.
    pub fn assert_seq_or_nil(&self) -> Result<im::Vector<Value>> {
        match self {
            Value::Nil => Ok(im::Vector::new()),
            _ => self.assert_seq(),
        }
    }

    /// Entries of a map, with `nil` reading as the empty map.
    pub fn assert_map(&self) -> Result<im::OrdMap<Key, Value>> {
        match self {
            Value::Map(dict) => Ok(dict.entries.clone()),
            Value::Nil => Ok(im::OrdMap::new()),
            _ => Err(RuntimeError::type_mismatch("a map", self)),
        }
    }

    pub fn assert_atom(&self) -> Result<Rc<RefCell<Value>>> {
        match self {
            Value::Atom(cell) => Ok(cell.clone()),
            _ => Err(RuntimeError::type_mismatch("an atom", self)),
        }
    }

    pub fn meta(&self) -> Result<Value> {
        match self {
            Value::List(seq) | Value::Vector(seq) => Ok(seq.meta.get()),
            Value::Map(dict) => Ok(dict.meta.get()),
            Value::Primitive(primitive) => Ok(primitive.meta.get()),
            Value::Closure(closure) => Ok(closure.meta.get()),
            _ => Err(RuntimeError::type_mismatch("a value with metadata", self)),
        }
    }

    /// Returns a shallow copy of the value carrying `meta`. The receiver is left untouched.
    pub fn with_meta(&self, meta: Value) -> Result<Value> {
        let meta = Meta::new(meta);
        match self {
            Value::List(seq) => Ok(Value::List(Rc::new(Seq {
                items: seq.items.clone(),
                meta,
            }))),
            Value::Vector(seq) => Ok(Value::Vector(Rc::new(Seq {
                items: seq.items.clone(),
                meta,
            }))),
            Value::Map(dict) => Ok(Value::Map(Rc::new(Dict {
                entries: dict.entries.clone(),
                meta,
            }))),
            Value::Primitive(primitive) => Ok(Value::Primitive(Rc::new(Primitive {
                meta,
                ..(**primitive).clone()
            }))),
            Value::Closure(closure) => Ok(Value::Closure(Rc::new(Closure {
                meta,
                ..(**closure).clone()
            }))),
            _ => Err(RuntimeError::type_mismatch("a value with metadata", self)),
        }
    }
}

/// Structural equality. Lists and vectors compare equal to each other element-wise, atoms compare
/// by identity and functions are never equal to anything.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Int(x), Value::Int(y)) => x == y,
            (Value::Symbol(x), Value::Symbol(y)) => x == y,
            (Value::Keyword(x), Value::Keyword(y)) => x == y,
            (Value::Str(x), Value::Str(y)) => x == y,
            (Value::List(x) | Value::Vector(x), Value::List(y) | Value::Vector(y)) => {
                x.items.len() == y.items.len()
                    && x.items.iter().zip(y.items.iter()).all(|(x, y)| x == y)
            }
            (Value::Map(x), Value::Map(y)) => {
                x.entries.len() == y.entries.len()
                    && x.entries
                        .iter()
                        .all(|(key, value)| y.entries.get(key).map_or(false, |other| value == other))
            }
            (Value::Atom(x), Value::Atom(y)) => Rc::ptr_eq(x, y),
            _ => false,
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", print(self, true))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value.into())
    }
}

impl From<im::Vector<Value>> for Value {
    fn from(items: im::Vector<Value>) -> Self {
        Value::List(Rc::new(Seq::new(items)))
    }
}
