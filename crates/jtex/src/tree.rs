//! Bracket trees
//!
//! A bracket tree records the bracket structure of a run of tokens.
//! Each node holds an ordered list of children; a child is either a token or another node
//! that was opened by a structural bracket.
//! Structural brackets are those in the bracket set passed to the tree builder
//! ([crate::vm::Context::build_tree]); they are consumed to create nodes and kept on the
//! node as its opening and closing tokens.
//! Every other token, including brackets outside of the active set, is a leaf.
//!
//! Nodes live in an arena and refer to their parent by index.

use crate::error::{Error, Result};
use crate::token::{Kind, Token};

/// A pair of bracket kinds that open and close a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketPair {
    pub open: Kind,
    pub close: Kind,
}

pub const PARENTHESES: BracketPair = BracketPair {
    open: Kind::ParenOpen,
    close: Kind::ParenClose,
};

pub const CURLY_BRACES: BracketPair = BracketPair {
    open: Kind::CurlyOpen,
    close: Kind::CurlyClose,
};

pub const SQUARE_BRACKETS: BracketPair = BracketPair {
    open: Kind::SquareOpen,
    close: Kind::SquareClose,
};

/// The default bracket set: `()`, `{}` and `[]`.
pub const DEFAULT_BRACKETS: [BracketPair; 3] = [PARENTHESES, CURLY_BRACES, SQUARE_BRACKETS];

/// Brackets that are structural inside math expressions.
pub const MATH_BRACKETS: [BracketPair; 1] = [PARENTHESES];

/// Index of a node in a [Tree].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Token(Token),
    Node(NodeId),
}

#[derive(Debug, Clone, Default)]
pub struct Node {
    children: Vec<Child>,
    parent: Option<NodeId>,
    opening: Option<Token>,
    closing: Option<Token>,
}

impl Node {
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The bracket that opened this node; [None] for the root.
    pub fn opening(&self) -> Option<&Token> {
        self.opening.as_ref()
    }

    /// The bracket that closed this node; [None] for the root.
    pub fn closing(&self) -> Option<&Token> {
        self.closing.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}

impl Tree {
    /// Creates a tree with an empty root.
    pub fn new() -> Tree {
        Tree {
            nodes: vec![Default::default()],
        }
    }

    /// Creates a tree whose root holds the tokens as leaves.
    pub fn from_tokens<I: IntoIterator<Item = Token>>(tokens: I) -> Tree {
        let mut tree = Tree::new();
        let root = tree.root();
        for token in tokens {
            tree.push_token(root, token);
        }
        tree
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn push_token(&mut self, parent: NodeId, token: Token) {
        self.nodes[parent.0].children.push(Child::Token(token));
    }

    /// Adds a new child node opened by `opening` and returns its id.
    pub fn push_node(&mut self, parent: NodeId, opening: Token) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            children: vec![],
            parent: Some(parent),
            opening: Some(opening),
            closing: None,
        });
        self.nodes[parent.0].children.push(Child::Node(id));
        id
    }

    /// Closes the node and returns its parent.
    ///
    /// An empty node receives an [Kind::Empty] placeholder so that no node is a zero-length
    /// list of leaves.
    pub fn close_node(&mut self, id: NodeId, closing: Token) -> Option<NodeId> {
        let node = &mut self.nodes[id.0];
        if node.children.is_empty() {
            node.children
                .push(Child::Token(Token::new_empty(closing.position())));
        }
        node.closing = Some(closing);
        node.parent
    }

    /// The leaf tokens in depth-first order, excluding structural brackets.
    pub fn leaves(&self) -> Vec<&Token> {
        let mut result = vec![];
        self.collect_leaves(self.root(), &mut result);
        result
    }

    fn collect_leaves<'a>(&'a self, id: NodeId, result: &mut Vec<&'a Token>) {
        for child in &self.node(id).children {
            match child {
                Child::Token(token) => result.push(token),
                Child::Node(id) => self.collect_leaves(*id, result),
            }
        }
    }

    /// Reconstructs the text covered by the tree, including structural brackets.
    pub fn text(&self) -> String {
        let mut s = String::new();
        self.write_text(self.root(), &mut s);
        s
    }

    fn write_text(&self, id: NodeId, s: &mut String) {
        let node = self.node(id);
        if let Some(opening) = &node.opening {
            s.push_str(opening.text());
        }
        for child in &node.children {
            match child {
                Child::Token(token) => s.push_str(token.text()),
                Child::Node(id) => self.write_text(*id, s),
            }
        }
        if let Some(closing) = &node.closing {
            s.push_str(closing.text());
        }
    }
}

/// Incremental construction of a bracket tree from a token sequence.
pub struct Builder<'b> {
    tree: Tree,
    current: NodeId,
    open: Vec<(BracketPair, Token)>,
    brackets: &'b [BracketPair],
}

impl<'b> Builder<'b> {
    pub fn new(brackets: &'b [BracketPair]) -> Builder<'b> {
        let tree = Tree::new();
        let current = tree.root();
        Builder {
            tree,
            current,
            open: vec![],
            brackets,
        }
    }

    /// Number of brackets that are currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Adds a token, opening or closing a node if it is a structural bracket.
    ///
    /// A closing bracket that does not match the innermost open bracket is an error.
    pub fn push(&mut self, token: Token) -> Result<()> {
        if let Some(pair) = opened_by(self.brackets, token.kind()) {
            self.current = self.tree.push_node(self.current, token.clone());
            self.open.push((pair, token));
            return Ok(());
        }
        if !is_closer(self.brackets, token.kind()) {
            self.push_leaf(token);
            return Ok(());
        }
        let text = token.text().to_string();
        match self.open.last() {
            Some((pair, _)) if pair.close == token.kind() => {
                self.open.pop();
                let root = self.tree.root();
                self.current = self.tree.close_node(self.current, token).unwrap_or(root);
                Ok(())
            }
            Some((_, opening)) => {
                let note = format![
                    "the bracket `{}` was opened at {}",
                    opening.text(),
                    opening.position()
                ];
                Err(Error::new_token_error(
                    token,
                    format!["the closing bracket `{text}` does not match the open bracket"],
                )
                .with_note(note))
            }
            None => Err(Error::new_token_error(
                token,
                format!["the closing bracket `{text}` was never opened"],
            )),
        }
    }

    /// Adds a token as a leaf of the current node, even if it is a bracket.
    pub fn push_leaf(&mut self, token: Token) {
        self.tree.push_token(self.current, token);
    }

    /// Returns the tree, failing if a bracket is still open.
    pub fn finish(mut self) -> Result<Tree> {
        match self.open.pop() {
            None => Ok(self.tree),
            Some((_, opening)) => {
                let text = opening.text().to_string();
                Err(
                    Error::new_token_error(opening, format!["the bracket `{text}` is never closed"])
                        .with_note("the input ended before a matching closing bracket"),
                )
            }
        }
    }
}

/// Builds a tree from a complete token sequence.
pub fn build<I: IntoIterator<Item = Token>>(tokens: I, brackets: &[BracketPair]) -> Result<Tree> {
    let mut builder = Builder::new(brackets);
    for token in tokens {
        builder.push(token)?;
    }
    builder.finish()
}

/// Returns the pair opened by the kind, if any.
pub fn opened_by(brackets: &[BracketPair], kind: Kind) -> Option<BracketPair> {
    brackets.iter().find(|pair| pair.open == kind).copied()
}

/// Whether the kind closes one of the pairs.
pub fn is_closer(brackets: &[BracketPair], kind: Kind) -> bool {
    brackets.iter().any(|pair| pair.close == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{tokenize, Position};

    #[test]
    fn close_inserts_placeholder_in_empty_node() {
        let mut tree = Tree::new();
        let root = tree.root();
        let child = tree.push_node(root, Token::new(Kind::ParenOpen, "(", Position::START));
        let parent = tree.close_node(child, Token::new(Kind::ParenClose, ")", Position::START));
        assert_eq!(parent, Some(root));
        let leaves = tree.leaves();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].kind(), Kind::Empty);
        assert_eq!(tree.text(), "()");
    }

    #[test]
    fn from_tokens_keeps_order() {
        let tokens = tokenize("a (b) c");
        let tree = Tree::from_tokens(tokens.clone());
        let leaves: Vec<Token> = tree.leaves().into_iter().cloned().collect();
        assert_eq!(leaves, tokens);
        assert_eq!(tree.node(tree.root()).parent(), None);
    }

    #[test]
    fn build_nests_structural_brackets() {
        let tree = build(tokenize("a(b[c])"), &MATH_BRACKETS).unwrap();
        let root = tree.node(tree.root());
        assert_eq!(root.children().len(), 2);
        let leaves: Vec<&str> = tree.leaves().iter().map(|t| t.text()).collect();
        assert_eq!(leaves, vec!["a", "b", "[", "c", "]"]);
    }

    #[test]
    fn build_errors() {
        let err = build(tokenize("(a]"), &DEFAULT_BRACKETS).unwrap_err();
        assert_eq!(err.position().column, 3);
        assert_eq!(err.notes().len(), 1);
        let err = build(tokenize("a)"), &DEFAULT_BRACKETS).unwrap_err();
        assert_eq!(err.position().column, 2);
        let err = build(tokenize("x{(a)"), &DEFAULT_BRACKETS).unwrap_err();
        assert_eq!(err.position().column, 2);
    }

    #[test]
    fn builder_depth() {
        let mut builder = Builder::new(&MATH_BRACKETS);
        for token in tokenize("((a)") {
            builder.push(token).unwrap();
        }
        assert_eq!(builder.depth(), 1);
        assert!(builder.finish().is_err());
    }

    #[test]
    fn bracket_lookup() {
        assert_eq!(
            opened_by(&DEFAULT_BRACKETS, Kind::CurlyOpen),
            Some(CURLY_BRACES)
        );
        assert_eq!(opened_by(&MATH_BRACKETS, Kind::CurlyOpen), None);
        assert!(is_closer(&DEFAULT_BRACKETS, Kind::SquareClose));
        assert!(!is_closer(&MATH_BRACKETS, Kind::SquareClose));
    }
}
