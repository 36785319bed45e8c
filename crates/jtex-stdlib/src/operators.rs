//! The default math operators
//!
//! Every operator here is injected into the two math commands and the matrix command.

use jtex::eval::{EvalKind, EvalToken};
use jtex::operator::Operator;

use crate::TARGETS;

/// Returns every default operator.
pub fn operators() -> Vec<Operator> {
    let mut ops = vec![fraction(), multiply(), power(), integral(), subscript(), set()];
    for (name, trigger, latex) in SINGLES {
        ops.push(Operator::new_single(name, trigger, move |t| t.replaced_by(latex)));
    }
    ops.into_iter()
        .map(|op| op.inject_into_all(&TARGETS))
        .collect()
}

/// Operators that replace their trigger token with a fixed macro.
const SINGLES: [(&str, EvalKind, &str); 7] = [
    ("implies", EvalKind::Implies, r"\implies{}"),
    ("impliedby", EvalKind::ImpliedBy, r"\impliedby{}"),
    ("iff", EvalKind::Iff, r"\iff{}"),
    ("ldots", EvalKind::TripleDot, r"\ldots{}"),
    ("colon", EvalKind::Colon, r"\colon{}"),
    ("coloneqq", EvalKind::ColonEquals, r"\coloneqq{}"),
    ("eqqcolon", EvalKind::EqualsColon, r"\eqqcolon{}"),
];

/// `a/b` becomes `\frac{a}{b}`.
pub fn fraction() -> Operator {
    Operator::new_binary("fraction", EvalKind::Fraction, |a, b| {
        Some(EvalToken::spanning(
            format![r"\frac{{{}}}{{{}}}", a.unwrapped(), b.unwrapped()],
            a,
            b,
        ))
    })
}

/// `a*b` becomes `a\cdot{}b`; the operands keep their parentheses.
pub fn multiply() -> Operator {
    Operator::new_binary("multiply", EvalKind::Multiply, |a, b| {
        Some(EvalToken::spanning(format![r"{a}\cdot{{}}{b}"], a, b))
    })
}

/// `a^b` becomes `{a}^{b}`, and `a^_` becomes `\overline{a}`.
pub fn power() -> Operator {
    Operator::new_binary("power", EvalKind::Power, |a, b| {
        let text = if b.kind() == EvalKind::Subscript && b.wraps() == 0 {
            format![r"\overline{{{}}}", a.unwrapped()]
        } else {
            format!["{{{a}}}^{{{}}}", b.unwrapped()]
        };
        Some(EvalToken::spanning(text, a, b))
    })
}

/// `a//b` becomes `\int_{a}^{b}`.
pub fn integral() -> Operator {
    Operator::new_binary("integral", EvalKind::Integral, |a, b| {
        Some(EvalToken::spanning(
            format![r"\int_{{{}}}^{{{}}}", a.unwrapped(), b.unwrapped()],
            a,
            b,
        ))
    })
}

/// `a_b` becomes `{a}_{b}`.
pub fn subscript() -> Operator {
    Operator::new_binary("subscript", EvalKind::Subscript, |a, b| {
        Some(EvalToken::spanning(
            format!["{{{a}}}_{{{}}}", b.unwrapped()],
            a,
            b,
        ))
    })
}

/// `$x` is a set operation for the mnemonics `u n d U N` and the literal set `{x}` otherwise.
pub fn set() -> Operator {
    Operator::new_unary("set", EvalKind::Set, |_, x| {
        let text = match (x.wraps(), x.text()) {
            (0, "u") => r"\cup{}".to_string(),
            (0, "U") => r"\bigcup".to_string(),
            (0, "n") => r"\cap{}".to_string(),
            (0, "N") => r"\bigcap".to_string(),
            (0, "d") => r"\setminus{}".to_string(),
            _ => format![r"\left\{{{}\right\}}", x.unwrapped()],
        };
        Some(x.replaced_by(text))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jtex::eval::{evaluate, Dispatch};
    use jtex::token::tokenize;
    use jtex::tree::{build, MATH_BRACKETS};

    fn eval(input: &str) -> String {
        let dispatch = Dispatch::new(&operators());
        let tree = build(tokenize(input), &MATH_BRACKETS).unwrap();
        evaluate(&tree, &dispatch)
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    macro_rules! operator_tests {
        ( $( ($name: ident, $input: expr, $want: expr), )+ ) => {
            $(
            #[test]
            fn $name() {
                assert_eq!(eval($input), $want);
            }
            )+
        };
    }

    operator_tests![
        (fraction, "a/b", r"\frac{a}{b}"),
        (fraction_drops_parentheses, "(a+b)/(c)", r"\frac{a+b}{c}"),
        (multiply, "a*b", r"a\cdot{}b"),
        (
            multiply_keeps_parentheses,
            "(a+b)*c",
            r"\left(a+b\right)\cdot{}c"
        ),
        (power, "a^2", "{a}^{2}"),
        (power_of_group, "a^(n+1)", "{a}^{n+1}"),
        (overline, "a^_", r"\overline{a}"),
        (integral, "0//1", r"\int_{0}^{1}"),
        (subscript, "x_i", "{x}_{i}"),
        (positional_fold, "a/b/c", r"\frac{\frac{a}{b}}{c}"),
        (power_then_fraction, "a^b/c", r"\frac{{a}^{b}}{c}"),
        (whitespace_around_operator, "a / b", r"\frac{a}{b}"),
        (set_union, "A $u B", r"A \cup{} B"),
        (set_big_union, "$U", r"\bigcup"),
        (set_intersection, "$n", r"\cap{}"),
        (set_big_intersection, "$N", r"\bigcap"),
        (set_minus, "$d", r"\setminus{}"),
        (set_literal, "$x", r"\left\{x\right\}"),
        (set_literal_group, "$(a, b)", r"\left\{a, b\right\}"),
        (set_without_operand, "a $", "a $"),
        (set_before_whitespace, "$ u", "$ u"),
        (implies, "a => b", r"a \implies{} b"),
        (impliedby, "a <= b", r"a \impliedby{} b"),
        (iff, "a <=> b", r"a \iff{} b"),
        (ldots, "1, ..., n", r"1, \ldots{}, n"),
        (colon, "f: A", r"f\colon{} A"),
        (coloneqq, "x := 1", r"x \coloneqq{} 1"),
        (eqqcolon, "1 =: x", r"1 \eqqcolon{} x"),
        (missing_right_operand, "a/", "a/"),
        (missing_left_operand, "/b", "/b"),
    ];

    #[test]
    fn every_operator_targets_every_math_command() {
        for op in operators() {
            for target in TARGETS {
                assert!(op.targets(target), "{} does not target {target}", op.name());
            }
        }
    }
}
