//! The expression evaluator
//!
//! Evaluation of a bracket tree happens in two phases.
//!
//! 1. Flatten: each leaf token becomes an [EvalToken].
//!     Each child node is evaluated recursively and the rendered result becomes a single
//!     opaque string token.
//!     Nodes opened by a parenthesis are wrapped one extra layer, so that operators
//!     may choose to drop the parentheses.
//!     Nodes opened by any other bracket keep their literal delimiters.
//!
//! 2. Reduce: a single left-to-right scan over the flattened tokens with an operand stack.
//!     At each position binary, unary and single operators are tried in that order.
//!     If none matches the token is pushed onto the stack.
//!
//! There is no precedence table.
//! Each operator consumes its immediate neighbours and pushes one result,
//!     which is then the left operand of the next operator to the right.
//! Thus `a/b/c` is `(a/b)/c` and `a^b/c` is `(a^b)/c`.

use std::collections::HashMap;

use crate::operator::{Category, Handler, Operator};
use crate::token::{Kind, Position, Token};
use crate::tree::{Child, NodeId, Tree};

pub mod token;

pub use token::{EvalKind, EvalToken};

/// Operators of a command, indexed by trigger kind.
#[derive(Clone, Default)]
pub struct Dispatch {
    binary: HashMap<EvalKind, Vec<Operator>>,
    unary: HashMap<EvalKind, Vec<Operator>>,
    single: HashMap<EvalKind, Vec<Operator>>,
}

impl Dispatch {
    pub fn new(operators: &[Operator]) -> Dispatch {
        let mut dispatch: Dispatch = Default::default();
        for op in operators {
            let map = match op.category() {
                Category::Binary => &mut dispatch.binary,
                Category::Unary => &mut dispatch.unary,
                Category::Single => &mut dispatch.single,
            };
            map.entry(op.trigger()).or_default().push(op.clone());
        }
        dispatch
    }

    pub fn is_empty(&self) -> bool {
        self.binary.is_empty() && self.unary.is_empty() && self.single.is_empty()
    }

    /// Tries to apply a binary operator triggered by `flat[i]`.
    ///
    /// Whitespace between the operator and either operand is skipped.
    /// On success the result is pushed onto the stack and the index of the right operand
    ///     is returned.
    /// Otherwise the stack is left as it was.
    pub fn try_binary(
        &self,
        flat: &[EvalToken],
        stack: &mut Vec<EvalToken>,
        i: usize,
    ) -> Option<usize> {
        let trigger = &flat[i];
        let candidates = candidates(&self.binary, trigger)?;
        let mut skipped = vec![];
        while stack.last().map_or(false, EvalToken::is_whitespace) {
            if let Some(t) = stack.pop() {
                skipped.push(t);
            }
        }
        let left = match stack.pop() {
            None => {
                restore(stack, skipped);
                return None;
            }
            Some(left) => left,
        };
        let mut j = i + 1;
        while j < flat.len() && flat[j].is_whitespace() {
            j += 1;
        }
        if let Some(right) = flat.get(j) {
            for op in &candidates {
                if let Handler::Binary(f) = op.handler() {
                    if let Some(result) = f(&left, right) {
                        stack.push(result);
                        return Some(j);
                    }
                }
            }
        }
        stack.push(left);
        restore(stack, skipped);
        None
    }

    /// Tries to apply a unary operator triggered by `flat[i]` to `flat[i+1]`.
    pub fn try_unary(
        &self,
        flat: &[EvalToken],
        stack: &mut Vec<EvalToken>,
        i: usize,
    ) -> Option<usize> {
        let trigger = &flat[i];
        let candidates = candidates(&self.unary, trigger)?;
        let operand = flat.get(i + 1)?;
        if operand.is_whitespace() {
            return None;
        }
        for op in candidates {
            if let Handler::Unary(f) = op.handler() {
                if let Some(result) = f(trigger, operand) {
                    stack.push(result);
                    return Some(i + 1);
                }
            }
        }
        None
    }

    /// Tries to apply a single operator to `flat[i]`.
    pub fn try_single(
        &self,
        flat: &[EvalToken],
        stack: &mut Vec<EvalToken>,
        i: usize,
    ) -> Option<usize> {
        let trigger = &flat[i];
        for op in candidates(&self.single, trigger)? {
            if let Handler::Single(f) = op.handler() {
                stack.push(f(trigger));
                return Some(i);
            }
        }
        None
    }
}

fn candidates<'a>(
    map: &'a HashMap<EvalKind, Vec<Operator>>,
    trigger: &EvalToken,
) -> Option<Vec<&'a Operator>> {
    let ops: Vec<&Operator> = map
        .get(&trigger.kind())?
        .iter()
        .filter(|op| op.accepts(trigger))
        .collect();
    if ops.is_empty() {
        None
    } else {
        Some(ops)
    }
}

fn restore(stack: &mut Vec<EvalToken>, mut skipped: Vec<EvalToken>) {
    while let Some(t) = skipped.pop() {
        stack.push(t);
    }
}

/// Evaluates the root of the tree and returns every surviving token.
pub fn evaluate(tree: &Tree, dispatch: &Dispatch) -> Vec<EvalToken> {
    evaluate_node(tree, tree.root(), dispatch)
}

/// Evaluates the whole tree as if it were enclosed in a parenthesized wrapper node.
///
/// All survivors of the tree's own fold are kept, in order, in the single atom that the
///     wrapper node sees.
/// The caller removes the wrapper's parenthesis layer before rendering.
pub fn evaluate_wrapped(tree: &Tree, dispatch: &Dispatch) -> Vec<EvalToken> {
    let node = tree.node(tree.root());
    evaluate_children_wrapped(tree, node.children(), dispatch)
}

/// Like [evaluate_wrapped], but for a slice of children of some node.
pub fn evaluate_children_wrapped(
    tree: &Tree,
    children: &[Child],
    dispatch: &Dispatch,
) -> Vec<EvalToken> {
    let survivors = reduce(flatten(tree, children, dispatch), dispatch);
    let mut atom = join_into_token(&survivors, Position::START);
    atom.wrap();
    reduce(vec![atom], dispatch)
}

fn evaluate_node(tree: &Tree, id: NodeId, dispatch: &Dispatch) -> Vec<EvalToken> {
    reduce(flatten(tree, tree.node(id).children(), dispatch), dispatch)
}

/// Converts children to evaluation tokens, evaluating child nodes recursively.
pub fn flatten(tree: &Tree, children: &[Child], dispatch: &Dispatch) -> Vec<EvalToken> {
    let mut flat = Vec::with_capacity(children.len());
    for child in children {
        match child {
            Child::Token(token) => {
                if token.kind().is_comment() {
                    continue;
                }
                flat.push(EvalToken::from_token(token));
            }
            Child::Node(id) => flat.push(atom(tree, *id, dispatch)),
        }
    }
    flat
}

fn atom(tree: &Tree, id: NodeId, dispatch: &Dispatch) -> EvalToken {
    let node = tree.node(id);
    let survivors = evaluate_node(tree, id, dispatch);
    let fallback = node.opening().map_or(Position::START, Token::position);
    let mut atom = join_into_token(&survivors, fallback);
    match node.opening() {
        Some(opening) if opening.kind() != Kind::ParenOpen => {
            let closing = node.closing().map_or("", Token::text);
            atom = atom.replaced_by(format!["{}{}{}", opening.text(), atom.text(), closing]);
        }
        _ => {
            atom.wrap();
        }
    }
    atom
}

fn join_into_token(survivors: &[EvalToken], fallback: Position) -> EvalToken {
    let text = join(survivors);
    match (survivors.first(), survivors.last()) {
        (Some(first), Some(last)) => EvalToken::spanning(text, first, last),
        _ => EvalToken::new(EvalKind::String, text, fallback, fallback),
    }
}

/// Folds a flat token sequence using the dispatch's operators.
pub fn reduce(flat: Vec<EvalToken>, dispatch: &Dispatch) -> Vec<EvalToken> {
    let mut stack = Vec::with_capacity(flat.len());
    let mut i = 0;
    while i < flat.len() {
        let consumed = match dispatch.try_binary(&flat, &mut stack, i) {
            Some(j) => Some(j),
            None => match dispatch.try_unary(&flat, &mut stack, i) {
                Some(j) => Some(j),
                None => dispatch.try_single(&flat, &mut stack, i),
            },
        };
        match consumed {
            Some(j) => i = j + 1,
            None => {
                stack.push(flat[i].clone());
                i += 1;
            }
        }
    }
    stack
}

/// Concatenates the rendered tokens.
pub fn join(tokens: &[EvalToken]) -> String {
    tokens.iter().map(|t| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;

    fn dispatch() -> Dispatch {
        Dispatch::new(&[
            Operator::new_binary("frac", EvalKind::Fraction, |a, b| {
                Some(EvalToken::spanning(
                    format![r"\frac{{{}}}{{{}}}", a.unwrapped(), b.unwrapped()],
                    a,
                    b,
                ))
            }),
            Operator::new_binary("mul", EvalKind::Multiply, |a, b| {
                Some(EvalToken::spanning(format![r"{a}\cdot{{}}{b}"], a, b))
            }),
            Operator::new_binary("pow", EvalKind::Power, |a, b| {
                let text = if b.kind() == EvalKind::Subscript && b.wraps() == 0 {
                    format![r"\overline{{{a}}}"]
                } else {
                    format!["{{{a}}}^{{{}}}", b.unwrapped()]
                };
                Some(EvalToken::spanning(text, a, b))
            }),
            Operator::new_unary("set", EvalKind::Set, |_, x| match x.text() {
                "u" => Some(x.replaced_by(r"\cup{}")),
                _ => Some(x.replaced_by(format![r"\left\{{{x}\right\}}"])),
            }),
            Operator::new_single("implies", EvalKind::Implies, |t| {
                t.replaced_by(r"\implies{}")
            }),
        ])
    }

    /// Builds a tree with parentheses as the only structural brackets.
    fn tree(input: &str) -> Tree {
        let mut tree = Tree::new();
        let mut current = tree.root();
        for token in tokenize(input) {
            match token.kind() {
                Kind::ParenOpen => current = tree.push_node(current, token),
                Kind::ParenClose => {
                    current = tree.close_node(current, token).unwrap();
                }
                _ => tree.push_token(current, token),
            }
        }
        tree
    }

    fn texts(tokens: &[EvalToken]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    macro_rules! evaluate_tests {
        ( $( ($name: ident, $input: expr, $( $want: expr ),* $(,)? ), )+ ) => {
            $(
            #[test]
            fn $name() {
                let tree = tree($input);
                let got = evaluate(&tree, &dispatch());
                let want: Vec<String> = vec![ $( $want.to_string() ),* ];
                assert_eq!(texts(&got), want);
            }
            )+
        };
    }

    evaluate_tests![
        (fraction, "a/b", r"\frac{a}{b}"),
        (power_of_underscore, "a^_", r"\overline{a}"),
        (power, "a^(b+c)", r"{a}^{b+c}"),
        (whitespace_around_binary, "a / b", r"\frac{a}{b}"),
        (
            positional_fold,
            "a/b/c",
            r"\frac{\frac{a}{b}}{c}",
        ),
        (power_then_fraction, "a^b/c", r"\frac{{a}^{b}}{c}"),
        (
            fraction_drops_parentheses,
            "(a+b)/c",
            r"\frac{a+b}{c}",
        ),
        (
            multiply_keeps_parentheses,
            "(a+b)*c",
            r"\left(a+b\right)\cdot{}c",
        ),
        (
            nested_parentheses,
            "((a))",
            r"\left(\left(a\right)\right)",
        ),
        (missing_right_operand, "a /", "a", " ", "/"),
        (missing_left_operand, "/b", "/", "b"),
        (unary_set, "$u", r"\cup{}"),
        (unary_literal_set, "$x", r"\left\{x\right\}"),
        (unary_without_operand, "$", "$"),
        (unary_before_whitespace, "$ u", "$", " ", "u"),
        (single, "a => b", "a", " ", r"\implies{}", " ", "b"),
        (unknown_tokens_survive, "a+b", "a", "+", "b"),
        (empty_parentheses, "()", r"\left(\right)"),
        (comments_are_dropped, "a% c\n/b", r"\frac{a}{b}"),
    ];

    #[test]
    fn empty_tree_has_no_survivors() {
        assert!(evaluate(&Tree::new(), &dispatch()).is_empty());
    }

    #[test]
    fn wrapped_evaluation_keeps_every_survivor() {
        let tree = tree("a + b/c");
        let survivors = evaluate_wrapped(&tree, &dispatch());
        assert_eq!(survivors.len(), 1);
        let mut result = survivors[0].clone();
        result.unwrap();
        assert_eq!(result.to_string(), r"a + \frac{b}{c}");
    }

    #[test]
    fn non_parenthesis_nodes_keep_delimiters() {
        let mut tree = Tree::new();
        let root = tree.root();
        let tokens = tokenize("{x}/y");
        let node = tree.push_node(root, tokens[0].clone());
        tree.push_token(node, tokens[1].clone());
        tree.close_node(node, tokens[2].clone());
        for token in &tokens[3..] {
            tree.push_token(root, token.clone());
        }
        let got = evaluate(&tree, &dispatch());
        assert_eq!(texts(&got), vec![r"\frac{{x}}{y}".to_string()]);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let tree = tree("a/(b*c)^d");
        let first = texts(&evaluate(&tree, &dispatch()));
        for _ in 0..10 {
            assert_eq!(texts(&evaluate(&tree, &dispatch())), first);
        }
    }

    #[test]
    fn empty_dispatch() {
        let d = Dispatch::new(&[]);
        assert!(d.is_empty());
        let tree = tree("a/b");
        assert_eq!(evaluate(&tree, &d).len(), 3);
    }
}
