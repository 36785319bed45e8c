//! Package imports
//!
//! `--use amsmath, graphicx` becomes `\usepackage{amsmath, graphicx}` on a line of its own.
//! The package list ends at the end of the line, at a `;`, which is consumed, or at the
//!     first token that can not continue the list.
//! The name `default` stands for the configured default packages.

use jtex::prelude::*;

pub const USE: &str = "default.use";

/// Get the `use` command.
pub fn get_use() -> Command {
    Command::new(USE, Kind::Use, use_fn)
        .with_parameter("options")
        .with_doc("package import `--use a, b`, rendered as `\\usepackage{a, b}`")
}

fn use_fn(call: &Call, buffer: &mut LineBuffer, ctx: &mut Context) -> Result<()> {
    let mut token = match ctx.input().next_significant() {
        Some(token) => token,
        None => {
            return Err(Error::new_end_of_input_error(
                ctx.input().position(),
                "expected a package name after `use`",
            ))
        }
    };
    let mut packages: Vec<String> = vec![];
    loop {
        let name = read_package_name(ctx, token)?;
        if name == "default" {
            packages.extend(ctx.options().default_packages.iter().cloned());
        } else {
            packages.push(name);
        }
        token = match next_package(ctx)? {
            None => break,
            Some(token) => token,
        };
    }
    let line = match call.params().get("options") {
        None => format![r"\usepackage{{{}}}", packages.join(", ")],
        Some(param) => {
            let options: Vec<String> = param
                .required_args()?
                .groups()
                .iter()
                .map(params::Group::full_text)
                .collect();
            format![
                r"\usepackage[{}]{{{}}}",
                options.join(", "),
                packages.join(", ")
            ]
        }
    };
    buffer.append_new_line(&line);
    Ok(())
}

fn is_name_part(token: &Token) -> bool {
    matches!(token.kind(), Kind::Varname | Kind::Dash | Kind::Number)
}

fn read_package_name(ctx: &mut Context, first: Token) -> Result<String> {
    if !is_name_part(&first) {
        let text = first.text().to_string();
        return Err(Error::new_token_error(
            first,
            format!["expected a package name, found `{text}`"],
        ));
    }
    let mut name = first.text().to_string();
    while let Some(token) = ctx.input().peek() {
        if !is_name_part(token) {
            break;
        }
        name.push_str(token.text());
        ctx.input().next();
    }
    Ok(name)
}

/// Consumes the separator before the next package name and returns the first token of
///     that name, or [None] if the list has ended.
fn next_package(ctx: &mut Context) -> Result<Option<Token>> {
    let input = ctx.input();
    let space = if matches!(input.peek(), Some(t) if t.is_whitespace() && !t.text().contains('\n'))
    {
        input.next()
    } else {
        None
    };
    match input.peek().map(Token::kind) {
        Some(Kind::Semicolon) => {
            input.next();
            Ok(None)
        }
        Some(Kind::Comma) => {
            input.next();
            match input.next_significant() {
                Some(token) => Ok(Some(token)),
                None => Err(Error::new_end_of_input_error(
                    input.position(),
                    "expected another package name after `,`",
                )),
            }
        }
        _ => {
            if let Some(space) = space {
                input.back(space);
            }
            Ok(None)
        }
    }
}
