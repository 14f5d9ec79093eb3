//! Evaluates forms into values. This is the main part of the interpreter: a single loop that
//! dispatches special forms and applies functions. Every form in tail position (the branches of
//! `if`, the last form of `do`, the body of `let*`, the result of `quasiquote` and the body of an
//! applied closure) replaces the current form instead of recursing, so tail calls never grow the
//! host stack.

use std::rc::Rc;

use crate::environment::Env;
use crate::error::{Result, RuntimeError};
use crate::expand::{macroexpand, quasiquote};
use crate::printer::print;
use crate::value::{CallScope, Closure, Dict, Key, Seq, Symbol, Trampoline, Value};

/// Symbols handled by dedicated evaluation rules instead of being called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecialForm {
    Def,
    DefMacro,
    Let,
    Do,
    If,
    Fn,
    Quote,
    Quasiquote,
    QuasiquoteExpand,
    MacroExpand,
}

impl SpecialForm {
    fn from_symbol(name: &str) -> Option<Self> {
        match name {
            "def!" => Some(SpecialForm::Def),
            "defmacro!" => Some(SpecialForm::DefMacro),
            "let*" => Some(SpecialForm::Let),
            "do" => Some(SpecialForm::Do),
            "if" => Some(SpecialForm::If),
            "fn*" => Some(SpecialForm::Fn),
            "quote" => Some(SpecialForm::Quote),
            "quasiquote" => Some(SpecialForm::Quasiquote),
            "quasiquoteexpand" => Some(SpecialForm::QuasiquoteExpand),
            "macroexpand" => Some(SpecialForm::MacroExpand),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            SpecialForm::Def => "def!",
            SpecialForm::DefMacro => "defmacro!",
            SpecialForm::Let => "let*",
            SpecialForm::Do => "do",
            SpecialForm::If => "if",
            SpecialForm::Fn => "fn*",
            SpecialForm::Quote => "quote",
            SpecialForm::Quasiquote => "quasiquote",
            SpecialForm::QuasiquoteExpand => "quasiquoteexpand",
            SpecialForm::MacroExpand => "macroexpand",
        }
    }
}

/// The `nth` operand of a special form, failing when the form is too short.
fn operand(items: &im::Vector<Value>, nth: usize, form: SpecialForm) -> Result<Value> {
    items
        .get(nth)
        .cloned()
        .ok_or_else(|| RuntimeError::malformed(form.name(), "missing operand"))
}

/// Evaluates everything that is not a non-empty list: symbols are looked up, vectors and maps
/// have their elements evaluated, anything else evaluates to itself.
fn eval_ast(form: &Value, env: &Env) -> Result<Value> {
    match form {
        Value::Symbol(name) => env.lookup(name),
        Value::Vector(seq) => {
            let items = seq
                .items
                .iter()
                .map(|item| eval(item.clone(), env.clone()))
                .collect::<Result<_>>()?;
            Ok(Value::Vector(Rc::new(Seq {
                items,
                meta: seq.meta.clone(),
            })))
        }
        Value::Map(dict) => {
            let mut entries = im::OrdMap::new();
            for (key, value) in dict.entries.iter() {
                let key = eval(Value::from(key.clone()), env.clone())?;
                let value = eval(value.clone(), env.clone())?;
                entries.insert(Key::try_from(&key)?, value);
            }
            Ok(Value::Map(Rc::new(Dict {
                entries,
                meta: dict.meta.clone(),
            })))
        }
        _ => Ok(form.clone()),
    }
}

/// Applies a function to already evaluated arguments. Closures are not run here: the caller gets
/// back the body and the frame to run it in.
pub fn apply(callee: &Value, args: Vec<Value>, env: &Env) -> Result<Trampoline> {
    match callee {
        Value::Closure(closure) => {
            tracing::debug!(arity = args.len(), is_macro = closure.is_macro, "applying closure");

            let frame = Env::create(&closure.env, &closure.params, args)?;
            Ok(Trampoline::Eval(closure.body.clone(), frame))
        }
        Value::Primitive(primitive) => (primitive.call)(CallScope { args, env }),
        _ => Err(RuntimeError::NotCallable(print(callee, true))),
    }
}

/// Calls a function and runs it to completion. Used by primitives that need the result of a
/// call, like `map` and `swap!`.
pub fn call(callee: &Value, args: Vec<Value>, env: &Env) -> Result<Value> {
    match apply(callee, args, env)? {
        Trampoline::Return(value) => Ok(value),
        Trampoline::Eval(form, env) => eval(form, env),
    }
}

fn params(form: &Value) -> Result<Rc<[Symbol]>> {
    form.assert_seq()?
        .iter()
        .map(Value::assert_symbol)
        .collect()
}

/// `def!` and `defmacro!`. A macro is bound as a flagged copy of the closure.
fn define(items: &im::Vector<Value>, special: SpecialForm, env: &Env) -> Result<Value> {
    let name = operand(items, 1, special)?.assert_symbol()?;
    let mut value = eval(operand(items, 2, special)?, env.clone())?;

    if special == SpecialForm::DefMacro {
        if let Value::Closure(closure) = &value {
            value = Value::Closure(Rc::new(Closure {
                is_macro: true,
                ..(**closure).clone()
            }));
        }
    }

    env.bind(name, value.clone());
    Ok(value)
}

/// Builds the frame of a `let*`, binding each name in turn so later bindings see earlier ones.
fn bind_let(items: &im::Vector<Value>, env: &Env) -> Result<Env> {
    let bindings = operand(items, 1, SpecialForm::Let)?.assert_seq()?;
    if bindings.len() % 2 != 0 {
        return Err(RuntimeError::malformed(
            "let*",
            "bindings must come in pairs",
        ));
    }

    let frame = env.child();
    let mut bindings = bindings.into_iter();
    while let (Some(name), Some(expr)) = (bindings.next(), bindings.next()) {
        let name = name.assert_symbol()?;
        let value = eval(expr, frame.clone())?;
        frame.bind(name, value);
    }

    Ok(frame)
}

fn lambda(items: &im::Vector<Value>, env: &Env) -> Result<Value> {
    let params = params(&operand(items, 1, SpecialForm::Fn)?)?;
    let body = operand(items, 2, SpecialForm::Fn)?;

    Ok(Value::Closure(Rc::new(Closure {
        params,
        body,
        env: env.clone(),
        is_macro: false,
        meta: Default::default(),
    })))
}

/// Evaluates the head and the arguments of a call, left to right, and applies them.
fn invoke(items: &im::Vector<Value>, env: &Env) -> Result<Trampoline> {
    let callee = eval(items[0].clone(), env.clone())?;
    let args = items
        .iter()
        .skip(1)
        .map(|arg| eval(arg.clone(), env.clone()))
        .collect::<Result<Vec<_>>>()?;

    apply(&callee, args, env)
}

/// Evaluates a form in an environment.
pub fn eval(mut form: Value, mut env: Env) -> Result<Value> {
    loop {
        if !matches!(&form, Value::List(list) if !list.items.is_empty()) {
            return eval_ast(&form, &env);
        }

        form = macroexpand(form, &env)?;

        let list = match &form {
            Value::List(list) if !list.items.is_empty() => list.clone(),
            _ => return eval_ast(&form, &env),
        };
        let items = &list.items;

        let special = match &items[0] {
            Value::Symbol(name) => SpecialForm::from_symbol(name),
            _ => None,
        };

        if let Some(special) = special {
            tracing::trace!(form = special.name(), "special form");
        }

        match special {
            Some(special @ (SpecialForm::Def | SpecialForm::DefMacro)) => {
                return define(items, special, &env);
            }
            Some(special @ SpecialForm::Let) => {
                env = bind_let(items, &env)?;
                form = operand(items, 2, special)?;
            }
            Some(SpecialForm::Do) => {
                if items.len() == 1 {
                    return Ok(Value::Nil);
                }
                for item in items.iter().skip(1).take(items.len() - 2) {
                    eval(item.clone(), env.clone())?;
                }
                form = items[items.len() - 1].clone();
            }
            Some(special @ SpecialForm::If) => {
                let condition = eval(operand(items, 1, special)?, env.clone())?;
                if condition.is_truthy() {
                    form = operand(items, 2, special)?;
                } else {
                    match items.get(3) {
                        Some(alternative) => form = alternative.clone(),
                        None => return Ok(Value::Nil),
                    }
                }
            }
            Some(SpecialForm::Fn) => return lambda(items, &env),
            Some(special @ SpecialForm::Quote) => return operand(items, 1, special),
            Some(special @ SpecialForm::Quasiquote) => {
                form = quasiquote(&operand(items, 1, special)?, 0);
            }
            Some(special @ SpecialForm::QuasiquoteExpand) => {
                return Ok(quasiquote(&operand(items, 1, special)?, 0));
            }
            Some(special @ SpecialForm::MacroExpand) => {
                return macroexpand(operand(items, 1, special)?, &env);
            }
            None => match invoke(items, &env)? {
                Trampoline::Return(value) => return Ok(value),
                Trampoline::Eval(body, frame) => {
                    form = body;
                    env = frame;
                }
            },
        }
    }
}
