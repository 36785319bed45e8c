//! JTeX prelude.
//!
//! Everything a command implementation usually needs.

pub use crate::command::params;
pub use crate::command::{Call, Command, Registry};
pub use crate::error::{Error, Result};
pub use crate::eval::{Dispatch, EvalKind, EvalToken};
pub use crate::operator::Operator;
pub use crate::output::LineBuffer;
pub use crate::token::{Kind, Position, Token};
pub use crate::tree::Tree;
pub use crate::vm::{Context, Options};
pub use crate::warning::Warning;
