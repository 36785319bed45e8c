//! Inline and block math
//!
//! Both commands read an expression up to the first `;` outside of parentheses, or to the
//!     end of the input, and evaluate it with the operators injected into them.
//!
//! ```text
//! Inline: -- a/b;
//! Block:  --math.label(eq:ratio) a/b;
//! ```

use jtex::prelude::*;
use jtex::tree::MATH_BRACKETS;

pub const INLINE: &str = "default.math.inline";
pub const BLOCK: &str = "default.math.block";

/// Get the inline math command.
///
/// The command is triggered by whitespace after the escape sequence.
pub fn get_inline() -> Command {
    Command::new(INLINE, Kind::Whitespace, math_inline_fn)
        .with_doc("inline math `-- expr;`, rendered as `$expr$`")
}

/// Get the block math command.
pub fn get_block() -> Command {
    Command::new(BLOCK, Kind::Varname, math_block_fn)
        .with_checker(|token| token.text() == "math")
        .with_parameter("numbered")
        .with_parameter("label")
        .with_doc("display math `--math expr;`, optionally numbered or labelled")
}

fn math_inline_fn(call: &Call, buffer: &mut LineBuffer, ctx: &mut Context) -> Result<()> {
    let expr = read_expression(call, ctx)?;
    buffer.append(&format!["${expr}$"]);
    Ok(())
}

fn math_block_fn(call: &Call, buffer: &mut LineBuffer, ctx: &mut Context) -> Result<()> {
    let label = match call.params().get("label") {
        None => None,
        Some(param) => Some(param.single_argument()?),
    };
    let numbered = label.is_some() || call.params().contains("numbered");
    let expr = read_expression(call, ctx)?;
    if numbered {
        let begin = match label {
            None => r"\begin{equation}".to_string(),
            Some(label) => format![r"\begin{{equation}}\label{{{label}}}"],
        };
        buffer.append_many_new_line(&[begin, expr, r"\end{equation}".to_string()]);
    } else {
        buffer.append_many_new_line(&[r"\[", expr.as_str(), r"\]"]);
    }
    Ok(())
}

fn read_expression(call: &Call, ctx: &mut Context) -> Result<String> {
    if ctx.depth_of(INLINE) + ctx.depth_of(BLOCK) > 1 {
        return Err(Error::new_token_error(
            call.escape().clone(),
            format!["cannot run `{}` inside another math command", call.command().name()],
        )
        .with_note("math commands can not be nested; end the outer expression with `;` first"));
    }
    let tree = ctx.build_tree(|token| token.kind() == Kind::Semicolon, true, &MATH_BRACKETS)?;
    Ok(ctx.evaluate_expression(&tree, call.command().dispatch()))
}
