//! A small clojure-flavoured lisp. Source text is read into values, values are evaluated in a
//! chain of environments and the results are printed back as text. Functions are closures over
//! the environment they were created in, tail calls run in constant stack space and macros
//! rewrite code before it is evaluated.
//!
//! # Special forms
//! ```lisp
//! (def! <symbol> <expr>)
//! (defmacro! <symbol> <fn>)
//! (let* (<symbol> <expr>*) <body>)
//! (do <expr>*)
//! (if <condition> <then> <else>?)
//! (fn* (<symbol>* & <rest>?) <body>)
//! (quote <form>)
//! (quasiquote <template>)
//! (quasiquoteexpand <template>)
//! (macroexpand <form>)
//! ```
//!
//! Everything else is a function call, evaluated left to right.

pub mod cli;
pub mod environment;
pub mod error;
pub mod eval;
pub mod expand;
pub mod intrinsics;
pub mod printer;
pub mod reader;
pub mod repl;
pub mod session;
pub mod value;

pub use environment::Env;
pub use error::{Result, RuntimeError, SyntaxError};
pub use printer::print;
pub use reader::{read, read_all};
pub use session::Session;
pub use value::Value;
