//! SMT-LIB2 rendering.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Write};

use crate::smt::term::{Func, Sort, Term};

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Bool(b) => write!(f, "{}", b),
            Term::Int(n) if *n < 0 => write!(f, "(- {})", n.unsigned_abs()),
            Term::Int(n) => write!(f, "{}", n),
            Term::Const(name, _) => write!(f, "{}", symbol(name)),
            Term::App(func, args) => {
                write!(f, "({}", symbol(func.name()))?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
            Term::Not(t) => write!(f, "(not {})", t),
            Term::And(ts) => nary(f, "and", ts),
            Term::Or(ts) => nary(f, "or", ts),
            Term::Implies(a, b) => write!(f, "(=> {} {})", a, b),
            Term::Eq(a, b) => write!(f, "(= {} {})", a, b),
            Term::Distinct(ts) => nary(f, "distinct", ts),
            Term::Lt(a, b) => write!(f, "(< {} {})", a, b),
            Term::Le(a, b) => write!(f, "(<= {} {})", a, b),
        }
    }
}

fn nary(f: &mut Formatter<'_>, op: &str, terms: &[Term]) -> std::fmt::Result {
    match terms {
        [] if op == "and" => write!(f, "true"),
        [] if op == "or" => write!(f, "false"),
        [] | [_] if op == "distinct" => write!(f, "true"),
        [t] => write!(f, "{}", t),
        _ => {
            write!(f, "({}", op)?;
            for t in terms {
                write!(f, " {}", t)?;
            }
            write!(f, ")")
        }
    }
}

/// Quote `name` unless it is a simple SMT-LIB symbol.
fn symbol(name: &str) -> String {
    let simple = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "~!@$%^&*_-+=<>.?/".contains(c));
    if simple {
        name.to_string()
    } else {
        format!("|{}|", name)
    }
}

fn declare_fun(out: &mut String, func: &Func) {
    let domain: Vec<String> = func.domain().iter().map(Sort::to_string).collect();
    let _ = writeln!(
        out,
        "(declare-fun {} ({}) {})",
        symbol(func.name()),
        domain.join(" "),
        func.range()
    );
}

/// Complete script checking the conjunction of `assertions`.
pub fn script<'a>(assertions: impl IntoIterator<Item = &'a Term>) -> String {
    let assertions: Vec<&Term> = assertions.into_iter().collect();

    let mut consts = BTreeMap::new();
    let mut funcs = BTreeMap::new();
    for term in &assertions {
        term.collect_symbols(&mut consts, &mut funcs);
    }

    let mut out = String::new();
    out.push_str("(set-option :produce-models false)\n");
    for (name, sort) in &consts {
        let _ = writeln!(out, "(declare-const {} {})", symbol(name), sort);
    }
    for func in funcs.values() {
        declare_fun(&mut out, func);
    }
    for term in assertions {
        let _ = writeln!(out, "(assert {})", term);
    }
    out.push_str("(check-sat)\n");
    out
}
