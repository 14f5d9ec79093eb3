//! Definitions of errors that can occur while reading or evaluating.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::printer::print;
use crate::value::Value;

/// Errors raised by the reader. They never hold a [Value], so they can cross into a
/// [miette::Report] together with the text that failed to parse.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("no form to read")]
    #[diagnostic(code(mal::reader::empty))]
    NoForm,

    #[error("unbalanced delimiter, expected '{expected}'")]
    #[diagnostic(code(mal::reader::unbalanced))]
    UnbalancedDelimiter {
        expected: char,
        #[label("this is never closed")]
        span: SourceSpan,
    },

    #[error("unexpected '{found}'")]
    #[diagnostic(code(mal::reader::unexpected_delimiter))]
    UnexpectedDelimiter {
        found: char,
        #[label("nothing to close here")]
        span: SourceSpan,
    },

    #[error("unexpected end of input")]
    #[diagnostic(code(mal::reader::eof))]
    UnexpectedEof {
        #[label("expected a form after this")]
        span: SourceSpan,
    },

    #[error("unterminated string")]
    #[diagnostic(code(mal::reader::unterminated_string))]
    UnterminatedString {
        #[label("string starts here")]
        span: SourceSpan,
    },

    #[error("map literal has an odd number of forms")]
    #[diagnostic(code(mal::reader::odd_map))]
    OddMapEntries {
        #[label("missing a value")]
        span: SourceSpan,
    },

    #[error("this form cannot be used as a map key")]
    #[diagnostic(code(mal::reader::map_key))]
    InvalidMapKey {
        #[label("not a key")]
        span: SourceSpan,
    },
}

/// Runtime errors that can happen during the execution of the program.
#[derive(Error, Diagnostic, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("'{0}' not found")]
    #[diagnostic(code(mal::eval::unbound))]
    UnboundSymbol(String),

    #[error("expected {expected} but got {found}")]
    #[diagnostic(code(mal::eval::type_mismatch))]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("cannot call as function '{0}'")]
    #[diagnostic(code(mal::eval::not_callable))]
    NotCallable(String),

    #[error("malformed '{form}': {reason}")]
    #[diagnostic(code(mal::eval::malformed))]
    MalformedForm {
        form: &'static str,
        reason: &'static str,
    },

    #[error("wrong arity, expected {0} arguments, got {1}")]
    #[diagnostic(code(mal::eval::arity))]
    WrongArity(usize, usize),

    #[error("wrong arity, expected at least {0} arguments, got {1}")]
    #[diagnostic(code(mal::eval::arity))]
    TooFewArguments(usize, usize),

    #[error("index {index} out of range for length {len}")]
    #[diagnostic(code(mal::eval::bounds))]
    OutOfBounds { index: i64, len: usize },

    #[error("division by zero")]
    #[diagnostic(code(mal::eval::division_by_zero))]
    DivisionByZero,

    #[error("integer overflow in '{0}'")]
    #[diagnostic(code(mal::eval::overflow))]
    Overflow(&'static str),

    #[error("{path}: {message}")]
    #[diagnostic(code(mal::io))]
    Io { path: String, message: String },

    #[error("uncaught exception: {}", print(.0, true))]
    #[diagnostic(code(mal::thrown))]
    Thrown(Value),

    #[error("internal invariant violated: {0}")]
    #[diagnostic(code(mal::internal))]
    InvariantViolation(&'static str),
}

impl RuntimeError {
    pub fn type_mismatch(expected: &'static str, found: &Value) -> Self {
        RuntimeError::TypeMismatch {
            expected,
            found: print(found, true),
        }
    }

    pub fn malformed(form: &'static str, reason: &'static str) -> Self {
        RuntimeError::MalformedForm { form, reason }
    }
}

pub type Result<T, E = RuntimeError> = std::result::Result<T, E>;
