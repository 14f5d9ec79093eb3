//! The primitive functions installed in the root frame of every session. Each submodule groups
//! the primitives of one kind of value; the doc comment over each primitive gives its name and
//! an informal signature.

use crate::environment::Env;

pub mod atom;
pub mod cmp;
pub mod hashmap;
pub mod io;
pub mod list;
pub mod meta;
pub mod num;
pub mod rt;
pub mod string;
pub mod vec;

pub fn register_intrinsics(env: &Env) {
    // num
    env.register_external("+", num::add);
    env.register_external("-", num::sub);
    env.register_external("*", num::mul);
    env.register_external("/", num::div);
    env.register_external("number?", num::is_number);

    // cmp
    env.register_external("=", cmp::eq);
    env.register_external("<", cmp::less_than);
    env.register_external("<=", cmp::less_equal);
    env.register_external(">", cmp::greater_than);
    env.register_external(">=", cmp::greater_equal);
    env.register_external("nil?", cmp::is_nil);
    env.register_external("true?", cmp::is_true);
    env.register_external("false?", cmp::is_false);

    // list
    env.register_external("list", list::list);
    env.register_external("list?", list::is_list);
    env.register_external("sequential?", list::is_sequential);
    env.register_external("cons", list::cons);
    env.register_external("concat", list::concat);
    env.register_external("first", list::first);
    env.register_external("rest", list::rest);
    env.register_external("nth", list::nth);
    env.register_external("count", list::count);
    env.register_external("empty?", list::is_empty);
    env.register_external("conj", list::conj);
    env.register_external("seq", list::seq);
    env.register_external("apply", list::apply);
    env.register_external("map", list::map);

    // vec
    env.register_external("vector", vec::vector);
    env.register_external("vec", vec::vec);
    env.register_external("vector?", vec::is_vector);

    // hashmap
    env.register_external("hash-map", hashmap::hash_map);
    env.register_external("map?", hashmap::is_map);
    env.register_external("assoc", hashmap::assoc);
    env.register_external("dissoc", hashmap::dissoc);
    env.register_external("get", hashmap::get);
    env.register_external("contains?", hashmap::contains);
    env.register_external("keys", hashmap::keys);
    env.register_external("vals", hashmap::vals);

    // meta
    env.register_external("meta", meta::meta);
    env.register_external("with-meta", meta::with_meta);

    // atom
    env.register_external("atom", atom::atom);
    env.register_external("atom?", atom::is_atom);
    env.register_external("deref", atom::deref);
    env.register_external("reset!", atom::reset);
    env.register_external("swap!", atom::swap);

    // string
    env.register_external("pr-str", string::pr_str);
    env.register_external("str", string::str);
    env.register_external("string?", string::is_string);
    env.register_external("symbol", string::symbol);
    env.register_external("symbol?", string::is_symbol);
    env.register_external("keyword", string::keyword);
    env.register_external("keyword?", string::is_keyword);
    env.register_external("read-string", string::read_string);

    // io
    env.register_external("prn", io::prn);
    env.register_external("println", io::println);
    env.register_external("slurp", io::slurp);
    env.register_external("readline", io::readline);
    env.register_external("time-ms", io::time_ms);

    // rt
    env.register_external("eval", rt::eval);
    env.register_external("throw", rt::throw);
    env.register_external("fn?", rt::is_fn);
    env.register_external("macro?", rt::is_macro);
}
