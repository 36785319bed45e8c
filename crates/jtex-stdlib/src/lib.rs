//! # The JTeX standard library
//!
//! This crate contains the default JTeX commands and operators:
//!
//! - [math]: inline math `-- expr;` and block math `--math expr;`.
//! - [packages]: package imports `--use amsmath, tikz`.
//! - [matrix]: matrices `--matrix[a, b; c, d]`.
//! - [operators]: the operators used inside math, like `a/b` and `x_i`.
//!
//! It also contains the [header] generator, which wraps a converted body into a complete
//!     LaTeX document, and, behind the default `json` feature, a [loader] for declarative
//!     operator plugins.

use jtex::command::{Command, Registry};
use jtex::plugin::Plugin;

pub mod header;
#[cfg(feature = "json")]
pub mod loader;
pub mod math;
pub mod matrix;
pub mod operators;
pub mod packages;

pub use operators::operators;

/// Names of the commands the default operators are injected into.
pub const TARGETS: [&str; 3] = [math::INLINE, math::BLOCK, matrix::MATRIX];

/// Returns every default command.
pub fn commands() -> Vec<Command> {
    vec![
        packages::get_use(),
        math::get_inline(),
        math::get_block(),
        matrix::get_matrix(),
    ]
}

/// Returns the default commands and operators as a plugin named `default`.
pub fn plugin() -> Plugin {
    Plugin::new("default")
        .with_commands(commands())
        .with_operators(operators())
}

/// Returns a registry with every default command and operator.
pub fn registry() -> Registry {
    Registry::new(commands(), operators())
}
