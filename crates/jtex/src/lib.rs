//! # JTeX: a shorthand markup that compiles to LaTeX
//!
//! A JTeX document is a LaTeX document with embedded commands.
//! Commands start with the escape sequence `--`; everything else passes through unchanged.
//! For example, with the standard library commands from the `jtex-stdlib` crate,
//!
//! ```text
//! The ratio is -- a/b; and so -- x => y;.
//! ```
//!
//! becomes
//!
//! ```text
//! The ratio is $\frac{a}{b}$ and so $x \implies{} y$.
//! ```
//!
//! This crate contains the machinery: the [lexer](token::Lexer), the
//!     [bracket tree builder](vm::Context::build_tree), the [expression evaluator](eval),
//!     the [command](command) and [operator](operator) model, the [driver](vm) and
//!     [plugin loading](plugin).
//! It defines no commands of its own.

pub mod color;
pub mod command;
pub mod error;
pub mod eval;
pub mod operator;
pub mod output;
pub mod plugin;
pub mod prelude;
pub mod spellcheck;
pub mod token;
pub mod tree;
pub mod vm;
pub mod warning;

pub use vm::convert;
