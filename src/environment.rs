//! An environment is the context in which an expression is evaluated. It is a chain of frames,
//! each one mapping symbols to values and pointing to the frame it was created in. Frames are
//! shared: every closure keeps the frame it was created in alive, and so does every child frame.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use crate::error::{Result, RuntimeError};
use crate::value::{Prim, Primitive, Symbol, Value};

/// The symbol that marks the rest parameter of a parameter list.
pub const VARIADIC: &str = "&";

struct Frame {
    variables: RefCell<im::HashMap<Symbol, Value>>,
    outer: Option<Env>,
    epoch: Instant,
}

#[derive(Clone)]
pub struct Env(Rc<Frame>);

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Env")
    }
}

impl Env {
    /// Creates a root frame, without any outer frame. The creation time is the epoch of every
    /// frame chained to it.
    pub fn new() -> Env {
        Env(Rc::new(Frame {
            variables: RefCell::new(im::HashMap::new()),
            outer: None,
            epoch: Instant::now(),
        }))
    }

    /// Creates an empty frame chained to this one.
    pub fn child(&self) -> Env {
        Env(Rc::new(Frame {
            variables: RefCell::new(im::HashMap::new()),
            outer: Some(self.clone()),
            epoch: self.0.epoch,
        }))
    }

    /// When the root frame of this chain was created.
    pub fn epoch(&self) -> Instant {
        self.0.epoch
    }

    /// Creates a frame chained to `outer` binding `params` to `args` positionally. A `&` in the
    /// parameter list binds the following parameter to a list of the remaining arguments. Extra
    /// arguments are ignored.
    pub fn create(outer: &Env, params: &[Symbol], args: Vec<Value>) -> Result<Env> {
        let env = outer.child();
        let len = args.len();
        let mut args = args.into_iter();

        for (i, param) in params.iter().enumerate() {
            if &**param == VARIADIC {
                let Some(rest) = params.get(i + 1) else {
                    return Err(RuntimeError::malformed("fn*", "'&' must be followed by a parameter"));
                };
                env.bind(rest.clone(), Value::list(args));
                break;
            }

            let Some(arg) = args.next() else {
                return Err(RuntimeError::OutOfBounds {
                    index: i as i64,
                    len,
                });
            };
            env.bind(param.clone(), arg);
        }

        Ok(env)
    }

    /// Tries to find a variable in this frame or in any of the outer ones.
    pub fn find(&self, name: &str) -> Option<Value> {
        let mut env = self;
        loop {
            if let Some(value) = env.0.variables.borrow().get(name) {
                return Some(value.clone());
            }
            env = env.0.outer.as_ref()?;
        }
    }

    pub fn lookup(&self, name: &str) -> Result<Value> {
        self.find(name)
            .ok_or_else(|| RuntimeError::UnboundSymbol(name.to_string()))
    }

    /// Inserts a variable in this frame, shadowing outer frames and overwriting previous
    /// bindings of the same frame.
    pub fn bind(&self, name: Symbol, value: Value) {
        self.0.variables.borrow_mut().insert(name, value);
    }

    /// The outermost frame of the chain.
    pub fn root(&self) -> Env {
        let mut env = self;
        while let Some(outer) = &env.0.outer {
            env = outer;
        }
        env.clone()
    }

    pub fn register_external(&self, name: &'static str, call: Prim) {
        let primitive = Primitive {
            name,
            call,
            meta: Default::default(),
        };
        self.bind(name.into(), Value::Primitive(Rc::new(primitive)));
    }
}

impl Default for Env {
    fn default() -> Self {
        Env::new()
    }
}
