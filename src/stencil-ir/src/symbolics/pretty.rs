// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;

use super::expr::{Call, Expr, Indexed};
use super::number::Number;

fn is_negative_term(expr: &Expr) -> bool {
    match expr {
        Expr::Int(_) | Expr::Float(_) => Number::from_expr(expr).is_some_and(Number::is_negative),
        Expr::Mul(factors) => factors
            .first()
            .and_then(Number::from_expr)
            .is_some_and(Number::is_negative),
        _ => false,
    }
}

/// The printed form of `-expr` for a term where `is_negative_term` holds.
fn negated(expr: &Expr) -> String {
    match expr {
        Expr::Int(_) | Expr::Float(_) => match Number::from_expr(expr) {
            Some(n) => format!("{}", -n),
            None => pretty(expr),
        },
        Expr::Mul(factors) => match factors.split_first() {
            Some((first, rest)) => {
                let coeff = Number::from_expr(first).map(|n| -n);
                let rest = pretty_factors(rest);
                match coeff {
                    Some(c) if c.is_one() => rest,
                    Some(c) => format!("{c}*{rest}"),
                    None => pretty(expr),
                }
            }
            None => pretty(expr),
        },
        _ => pretty(expr),
    }
}

fn pretty_factor(expr: &Expr) -> String {
    match expr {
        Expr::Add(_) => format!("({})", pretty(expr)),
        _ => pretty(expr),
    }
}

fn pretty_factors(factors: &[Expr]) -> String {
    factors
        .iter()
        .map(pretty_factor)
        .collect::<Vec<_>>()
        .join("*")
}

fn pretty_list(exprs: &[Expr]) -> String {
    exprs.iter().map(pretty).collect::<Vec<_>>().join(", ")
}

pub fn pretty(expr: &Expr) -> String {
    match expr {
        Expr::Int(n) => format!("{n}"),
        Expr::Float(n) => format!("{:?}", n.0),
        Expr::Symbol(symbol) => symbol.to_string(),
        Expr::Dim(dim) => dim.name().to_string(),
        Expr::Call(call) => format!("{}({})", call.function().name(), pretty_list(call.args())),
        Expr::Indexed(indexed) => format!(
            "{}[{}]",
            indexed.function().name(),
            pretty_list(indexed.indices())
        ),
        Expr::Add(terms) => {
            // numeric terms print last: `x - 2*h_x + 4`
            let (numbers, others): (Vec<&Expr>, Vec<&Expr>) =
                terms.iter().partition(|t| t.is_number());
            let mut out = String::new();
            for (i, term) in others.into_iter().chain(numbers).enumerate() {
                let negative = is_negative_term(term);
                match (i, negative) {
                    (0, false) => out.push_str(&pretty(term)),
                    (0, true) => {
                        out.push('-');
                        out.push_str(&negated(term));
                    }
                    (_, false) => {
                        out.push_str(" + ");
                        out.push_str(&pretty(term));
                    }
                    (_, true) => {
                        out.push_str(" - ");
                        out.push_str(&negated(term));
                    }
                }
            }
            out
        }
        Expr::Mul(factors) => match factors.split_first() {
            Some((Expr::Int(-1), rest)) if !rest.is_empty() => {
                format!("-{}", pretty_factors(rest))
            }
            _ => pretty_factors(factors),
        },
        Expr::Pow(base, exp) => {
            let base = match base.as_ref() {
                Expr::Add(_) | Expr::Mul(_) | Expr::Pow(_, _) => format!("({})", pretty(base)),
                b if is_negative_term(b) => format!("({})", pretty(b)),
                b => pretty(b),
            };
            let exp = match exp.as_ref() {
                Expr::Add(_) | Expr::Mul(_) | Expr::Pow(_, _) => format!("({})", pretty(exp)),
                e => pretty(e),
            };
            format!("{base}**{exp}")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", pretty(self))
    }
}

impl fmt::Display for Indexed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}[{}]", self.function().name(), pretty_list(self.indices()))
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({})", self.function().name(), pretty_list(self.args()))
    }
}
