//! The reader is responsible for turning text into forms. The text is split into tokens by a
//! [Lexer] and then parsed by a recursive descent driven by a single token of lookahead. The
//! main functions are [read] and [read_all].

use std::iter::Peekable;
use std::rc::Rc;
use std::str::CharIndices;

use miette::SourceSpan;

use crate::error::SyntaxError;
use crate::value::{Key, Seq, Value};

type Result<T, E = SyntaxError> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'a> {
    text: &'a str,
    offset: usize,
}

impl Token<'_> {
    fn span(&self) -> SourceSpan {
        (self.offset, self.text.len()).into()
    }
}

/// Characters that end a symbol, number or keyword token.
fn is_delimiter(chr: char) -> bool {
    chr.is_whitespace()
        || matches!(
            chr,
            '[' | ']' | '{' | '}' | '(' | ')' | '\'' | '"' | '`' | ',' | ';'
        )
}

/// Splits the text into tokens. Whitespace, commas and comments are dropped here, so the parser
/// never sees them.
struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn position(&mut self) -> usize {
        self.chars
            .peek()
            .map_or(self.source.len(), |(index, _)| *index)
    }

    fn skip_while(&mut self, mut f: impl FnMut(char) -> bool) {
        while let Some(&(_, chr)) = self.chars.peek() {
            if !f(chr) {
                break;
            }
            self.chars.next();
        }
    }

    fn token(&mut self, start: usize) -> Token<'a> {
        let end = self.position();
        Token {
            text: &self.source[start..end],
            offset: start,
        }
    }

    /// Consumes a string body up to and including the closing quote, if there is one.
    fn string(&mut self) {
        while let Some((_, chr)) = self.chars.next() {
            match chr {
                '\\' => {
                    self.chars.next();
                }
                '"' => return,
                _ => {}
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            let (start, chr) = self.chars.next()?;
            match chr {
                ',' => continue,
                chr if chr.is_whitespace() => continue,
                ';' => self.skip_while(|chr| chr != '\n'),
                '~' => {
                    if let Some(&(_, '@')) = self.chars.peek() {
                        self.chars.next();
                    }
                    return Some(self.token(start));
                }
                '[' | ']' | '{' | '}' | '(' | ')' | '\'' | '`' | '^' | '@' => {
                    return Some(self.token(start))
                }
                '"' => {
                    self.string();
                    return Some(self.token(start));
                }
                _ => {
                    self.skip_while(|chr| !is_delimiter(chr));
                    return Some(self.token(start));
                }
            }
        }
    }
}

/// A reader over a piece of text. It can produce one form at a time, so a single text may hold
/// several top level forms.
pub struct Reader<'a> {
    tokens: Peekable<Lexer<'a>>,
    len: usize,
}

impl<'a> Reader<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            tokens: Lexer::new(source).peekable(),
            len: source.len(),
        }
    }

    /// Whether there is anything left to read. Comments and whitespace don't count.
    pub fn is_empty(&mut self) -> bool {
        self.tokens.peek().is_none()
    }

    pub fn read_form(&mut self) -> Result<Value> {
        let Some(token) = self.tokens.next() else {
            return Err(SyntaxError::UnexpectedEof {
                span: (self.len, 0).into(),
            });
        };

        match token.text {
            "(" => Ok(Value::List(Rc::new(Seq::new(self.read_seq(token, ')')?)))),
            "[" => Ok(Value::Vector(Rc::new(Seq::new(self.read_seq(token, ']')?)))),
            "{" => self.read_map(token),
            ")" | "]" | "}" => Err(SyntaxError::UnexpectedDelimiter {
                found: token.text.chars().next().unwrap_or(')'),
                span: token.span(),
            }),
            "'" => self.read_prefixed(token, "quote"),
            "`" => self.read_prefixed(token, "quasiquote"),
            "~" => self.read_prefixed(token, "unquote"),
            "~@" => self.read_prefixed(token, "splice-unquote"),
            "@" => self.read_prefixed(token, "deref"),
            "^" => {
                let meta = self.read_after(token)?;
                let form = self.read_after(token)?;
                Ok(Value::list([Value::symbol("with-meta"), form, meta]))
            }
            _ => read_atom(token),
        }
    }

    fn read_after(&mut self, token: Token<'_>) -> Result<Value> {
        if self.is_empty() {
            return Err(SyntaxError::UnexpectedEof { span: token.span() });
        }
        self.read_form()
    }

    fn read_prefixed(&mut self, token: Token<'_>, name: &str) -> Result<Value> {
        let form = self.read_after(token)?;
        Ok(Value::list([Value::symbol(name), form]))
    }

    fn read_seq(&mut self, open: Token<'_>, close: char) -> Result<im::Vector<Value>> {
        let mut items = im::Vector::new();

        loop {
            match self.tokens.peek() {
                None => {
                    return Err(SyntaxError::UnbalancedDelimiter {
                        expected: close,
                        span: open.span(),
                    })
                }
                Some(token) if token.text.len() == 1 && token.text.starts_with(close) => {
                    self.tokens.next();
                    return Ok(items);
                }
                Some(_) => items.push_back(self.read_form()?),
            }
        }
    }

    fn read_map(&mut self, open: Token<'_>) -> Result<Value> {
        let mut items = self.read_seq(open, '}')?.into_iter();
        let mut entries = im::OrdMap::new();

        while let Some(key) = items.next() {
            let Some(value) = items.next() else {
                return Err(SyntaxError::OddMapEntries { span: open.span() });
            };
            let key = Key::try_from(&key)
                .map_err(|_| SyntaxError::InvalidMapKey { span: open.span() })?;
            entries.insert(key, value);
        }

        Ok(Value::map(entries))
    }
}

fn read_atom(token: Token<'_>) -> Result<Value> {
    match token.text {
        "nil" => Ok(Value::Nil),
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        text => {
            if let Ok(int) = text.parse::<i64>() {
                Ok(Value::Int(int))
            } else if text.starts_with('"') {
                read_string(token)
            } else if let Some(name) = text.strip_prefix(':') {
                Ok(Value::keyword(name))
            } else {
                Ok(Value::symbol(text))
            }
        }
    }
}

/// Unescapes a string token. Only `\\`, `\n` and `\"` mean something, any other escaped
/// character is dropped together with its backslash.
fn read_string(token: Token<'_>) -> Result<Value> {
    let mut chars = token.text.chars().skip(1);
    let mut string = String::new();

    while let Some(chr) = chars.next() {
        match chr {
            '"' => return Ok(Value::from(string)),
            '\\' => match chars.next() {
                Some('\\') => string.push('\\'),
                Some('n') => string.push('\n'),
                Some('"') => string.push('"'),
                Some(_) => {}
                None => break,
            },
            chr => string.push(chr),
        }
    }

    Err(SyntaxError::UnterminatedString { span: token.span() })
}

/// Reads the first form of the text. Text holding only whitespace and comments fails with
/// [SyntaxError::NoForm].
pub fn read(source: &str) -> Result<Value> {
    let mut reader = Reader::new(source);
    if reader.is_empty() {
        return Err(SyntaxError::NoForm);
    }
    reader.read_form()
}

/// Reads every top level form of the text.
pub fn read_all(source: &str) -> Result<Vec<Value>> {
    let mut reader = Reader::new(source);
    let mut forms = Vec::new();

    while !reader.is_empty() {
        forms.push(reader.read_form()?);
    }

    Ok(forms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::print;

    fn tokens(source: &str) -> Vec<&str> {
        Lexer::new(source).map(|token| token.text).collect()
    }

    fn round(source: &str) -> String {
        print(&read(source).unwrap(), true)
    }

    #[test]
    fn splits_tokens() {
        assert_eq!(
            tokens("(+ 1, 2) ~@xs ~x 'a `b @c ^m"),
            vec!["(", "+", "1", "2", ")", "~@", "xs", "~", "x", "'", "a", "`", "b", "@", "c", "^", "m"]
        );
        assert_eq!(tokens(r#""a \" b" ; comment"#), vec![r#""a \" b""#]);
        assert_eq!(tokens("[a]{b}"), vec!["[", "a", "]", "{", "b", "}"]);
    }

    #[test]
    fn reads_atoms() {
        assert_eq!(read("nil").unwrap(), Value::Nil);
        assert_eq!(read("true").unwrap(), Value::Bool(true));
        assert_eq!(read("-12").unwrap(), Value::Int(-12));
        assert_eq!(read("+3").unwrap(), Value::Int(3));
        assert_eq!(read("-").unwrap(), Value::symbol("-"));
        assert_eq!(read(":key").unwrap(), Value::keyword("key"));
        assert_eq!(read("abc!").unwrap(), Value::symbol("abc!"));
    }

    #[test]
    fn reads_strings() {
        assert_eq!(read(r#""hello world""#).unwrap(), Value::string("hello world"));
        assert_eq!(read(r#""a\nb""#).unwrap(), Value::string("a\nb"));
        assert_eq!(read(r#""q\"\\""#).unwrap(), Value::string("q\"\\"));
        assert_eq!(read(r#""x\ty""#).unwrap(), Value::string("xy"));
    }

    #[test]
    fn expands_reader_macros() {
        assert_eq!(round("'a"), "(quote a)");
        assert_eq!(round("`(a ~b ~@c)"), "(quasiquote (a (unquote b) (splice-unquote c)))");
        assert_eq!(round("@a"), "(deref a)");
        assert_eq!(round("^{:a 1} [1 2]"), "(with-meta [1 2] {:a 1})");
    }

    #[test]
    fn reads_collections() {
        assert_eq!(round("( 1 (2 [3 ,4]) )"), "(1 (2 [3 4]))");
        assert_eq!(round(r#"{"b" 2 :a 1}"#), r#"{"b" 2 :a 1}"#);
        assert_eq!(round("()"), "()");
    }

    #[test]
    fn skips_comments_inside_forms() {
        assert_eq!(round("(1 ; one\n 2)"), "(1 2)");
        assert_eq!(read(";; nothing here"), Err(SyntaxError::NoForm));
        assert_eq!(read("   "), Err(SyntaxError::NoForm));
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(matches!(
            read("(1 2"),
            Err(SyntaxError::UnbalancedDelimiter { expected: ')', .. })
        ));
        assert!(matches!(
            read("[1 2"),
            Err(SyntaxError::UnbalancedDelimiter { expected: ']', .. })
        ));
        assert!(matches!(
            read(")"),
            Err(SyntaxError::UnexpectedDelimiter { found: ')', .. })
        ));
        assert!(matches!(
            read(r#""abc"#),
            Err(SyntaxError::UnterminatedString { .. })
        ));
        assert!(matches!(
            read(r#""abc\""#),
            Err(SyntaxError::UnterminatedString { .. })
        ));
        assert!(matches!(read("{:a}"), Err(SyntaxError::OddMapEntries { .. })));
        assert!(matches!(read("{(1) 2}"), Err(SyntaxError::InvalidMapKey { .. })));
        assert!(matches!(read("'"), Err(SyntaxError::UnexpectedEof { .. })));
    }

    #[test]
    fn reads_several_forms() {
        let forms = read_all("1 (2) ; trailing\n :x").unwrap();

        assert_eq!(
            forms,
            vec![Value::Int(1), Value::list([Value::Int(2)]), Value::keyword("x")]
        );
    }

    #[test]
    fn printed_forms_read_back() {
        let sources = [
            r#"(1 "two\n\"three\"" :four [five {:six 6}] nil true)"#,
            "(quote (a b))",
            r#"{"k" [1 2] :z ()}"#,
        ];

        for source in sources {
            let value = read(source).unwrap();
            let again = read(&print(&value, true)).unwrap();
            assert_eq!(value, again);
        }
    }
}
