//! Matrices
//!
//! ```text
//! --matrix[a, b; c, d]
//! --matrix.type(bmatrix).store(m)[1, 0; 0, 1]
//! --matrix.load(m).set(pos: (1, 2), x/2).set(row: 2, (y, z))
//! ```
//!
//! Cells are separated by `,` and rows by `;`.
//! Parentheses and curly braces group, so `(a, b)` is a single cell.
//! Every cell is evaluated with the operators injected into the matrix command.
//!
//! Edits made with `set` are applied in the order they appear, after the body was read
//!     or the stored matrix was loaded.
//! Row and column numbers start at 1.

use jtex::eval;
use jtex::prelude::*;
use jtex::spellcheck;
use jtex::tree::{self, Child, CURLY_BRACES, PARENTHESES};

pub const MATRIX: &str = "default.matrix";

const BODY_BRACKETS: [tree::BracketPair; 2] = [PARENTHESES, CURLY_BRACES];

/// Get the matrix command.
pub fn get_matrix() -> Command {
    Command::new(MATRIX, Kind::Varname, matrix_fn)
        .with_checker(|token| token.text() == "matrix")
        .with_parameter("type")
        .with_parameter("load")
        .with_repeatable_parameter("set")
        .with_parameter("store")
        .with_parameter("hidden")
        .with_doc("matrix literal `--matrix[a, b; c, d]` with structural edits")
}

/// A rectangular matrix of rendered cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: Vec<Vec<String>>,
}

impl Matrix {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_cols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Renders the matrix in the named environment.
    pub fn render(&self, environment: &str) -> String {
        let rows: Vec<String> = self.rows.iter().map(|row| row.join(" & ")).collect();
        format![
            r"\begin{{{environment}}}{}\end{{{environment}}}",
            rows.join(r"\\")
        ]
    }
}

fn matrix_fn(call: &Call, buffer: &mut LineBuffer, ctx: &mut Context) -> Result<()> {
    let params = call.params();
    let mut matrix = match params.get("load") {
        Some(param) => load(param, ctx)?,
        None => read_body(call, ctx)?,
    };
    for param in params.all("set") {
        apply_set(&mut matrix, param, call.command().dispatch(), ctx)?;
    }
    if let Some(param) = params.get("store") {
        let name = param.single_argument()?;
        ctx.stores_mut().insert(&name, matrix.clone());
    }
    if params.contains("hidden") {
        return Ok(());
    }
    let environment = match params.get("type") {
        None => "pmatrix".to_string(),
        Some(param) => param.single_argument()?,
    };
    buffer.append(&matrix.render(&environment));
    Ok(())
}

fn load(param: &params::Param, ctx: &Context) -> Result<Matrix> {
    let name = param.single_argument()?;
    if let Some(matrix) = ctx.stores().get::<Matrix>(&name) {
        return Ok(matrix.clone());
    }
    let err = Error::new_token_error(
        param.token().clone(),
        format!["no matrix named `{name}` has been stored"],
    );
    let stored = ctx.stores().names::<Matrix>();
    Err(match spellcheck::find_close_words(&stored, &name).first() {
        Some(close) => err.with_note(format!["did you mean `{close}`?"]),
        None if stored.is_empty() => {
            err.with_note("matrices are stored with `.store(name)` before they can be loaded")
        }
        None => err.with_note(format!["the stored matrices are: {}", stored.join(", ")]),
    })
}

/// Reads the `[...]` body and evaluates every cell.
fn read_body(call: &Call, ctx: &mut Context) -> Result<Matrix> {
    ctx.input().skip_insignificant();
    let open = match ctx.input().next() {
        Some(token) if token.kind() == Kind::SquareOpen => token,
        Some(token) => {
            return Err(Error::new_token_error(
                token,
                "expected `[` to start the body of the matrix",
            )
            .with_note("a matrix without a body must be loaded with `.load(name)`"))
        }
        None => {
            return Err(Error::new_end_of_input_error(
                ctx.input().position(),
                "expected `[` to start the body of the matrix",
            ))
        }
    };
    let mut closed = false;
    let body = ctx.build_tree(
        |token| {
            closed = token.kind() == Kind::SquareClose;
            closed
        },
        true,
        &BODY_BRACKETS,
    )?;
    if !closed {
        return Err(Error::new_token_error(open, "the body of the matrix is never closed")
            .with_note("the input ended before the matching `]`"));
    }

    // Each row is the separator token that starts it, followed by its cells.
    let mut rows: Vec<(Token, Vec<Vec<Child>>)> = vec![(open.clone(), vec![vec![]])];
    for child in body.node(body.root()).children() {
        if let Child::Token(token) = child {
            match token.kind() {
                Kind::Semicolon => {
                    rows.push((token.clone(), vec![vec![]]));
                    continue;
                }
                Kind::Comma => {
                    if let Some((_, cells)) = rows.last_mut() {
                        cells.push(vec![]);
                    }
                    continue;
                }
                _ => {}
            }
        }
        if let Some(cell) = rows.last_mut().and_then(|(_, cells)| cells.last_mut()) {
            cell.push(child.clone());
        }
    }
    while rows.len() > 1 && rows.last().map_or(false, |(_, cells)| is_blank_row(cells)) {
        rows.pop();
    }
    if rows.iter().all(|(_, cells)| is_blank_row(cells)) {
        return Err(Error::new_token_error(open, "the matrix has no cells"));
    }

    let dispatch = call.command().dispatch();
    let num_cols = rows[0].1.len();
    let mut matrix = Matrix { rows: vec![] };
    for (i, (start, cells)) in rows.into_iter().enumerate() {
        if cells.len() != num_cols {
            return Err(Error::new_token_error(
                start,
                format!["row {} of the matrix has the wrong number of cells", i + 1],
            )
            .with_note(format![
                "the first row has {num_cols} cells but this row has {}",
                cells.len()
            ]));
        }
        let mut row = Vec::with_capacity(num_cols);
        for cell in cells {
            let survivors = eval::evaluate_children_wrapped(&body, &cell, dispatch);
            row.push(ctx.render_first(survivors));
        }
        matrix.rows.push(row);
    }
    Ok(matrix)
}

fn is_blank_row(cells: &[Vec<Child>]) -> bool {
    match cells {
        [cell] => cell.iter().all(|child| match child {
            Child::Token(token) => token.is_whitespace() || token.kind().is_comment(),
            Child::Node(_) => false,
        }),
        _ => false,
    }
}

const SET_MODES: [&str; 3] = ["pos", "row", "col"];

fn apply_set(
    matrix: &mut Matrix,
    param: &params::Param,
    dispatch: &Dispatch,
    ctx: &mut Context,
) -> Result<()> {
    let args = param.required_args()?;
    let (target, value) = match args.groups() {
        [target, value] => (target, value),
        _ => {
            return Err(Error::new_token_error(
                param.token().clone(),
                "the `set` parameter takes a target and a value",
            )
            .with_note(format!["got {} arguments", args.len()])
            .with_note("the forms are `set(pos: (i, j), v)`, `set(row: i, (v, ...))` and `set(col: j, (v, ...))`"))
        }
    };
    let mode = target.label().unwrap_or("");
    match mode {
        "pos" => {
            let coordinates = match target.as_tuple() {
                Some(coordinates) if coordinates.len() == 2 => coordinates,
                _ => {
                    return Err(set_error(
                        param,
                        target,
                        "expected a position of the form `pos: (row, column)`",
                    ))
                }
            };
            let i = index(param, &coordinates.groups()[0], matrix.num_rows(), "row")?;
            let j = index(param, &coordinates.groups()[1], matrix.num_cols(), "column")?;
            matrix.rows[i][j] = evaluate_group(value, dispatch, ctx)?;
        }
        "row" => {
            let i = index(param, target, matrix.num_rows(), "row")?;
            let values = evaluate_list(param, value, matrix.num_cols(), dispatch, ctx)?;
            matrix.rows[i] = values;
        }
        "col" => {
            let j = index(param, target, matrix.num_cols(), "column")?;
            let values = evaluate_list(param, value, matrix.num_rows(), dispatch, ctx)?;
            for (row, value) in matrix.rows.iter_mut().zip(values) {
                row[j] = value;
            }
        }
        _ => {
            let err = set_error(param, target, format!["unknown `set` target `{mode}`"]);
            return Err(match spellcheck::find_close_words(&SET_MODES, mode).first() {
                Some(close) if !mode.is_empty() => err.with_note(format!["did you mean `{close}`?"]),
                _ => err.with_note("the target must be labelled `pos:`, `row:` or `col:`"),
            });
        }
    }
    Ok(())
}

fn set_error<T: Into<String>>(param: &params::Param, group: &params::Group, title: T) -> Box<Error> {
    let token = group.token().unwrap_or(param.token()).clone();
    Error::new_token_error(token, title)
}

/// Converts a 1-based index in a group to a 0-based index below `len`.
fn index(param: &params::Param, group: &params::Group, len: usize, what: &str) -> Result<usize> {
    match group.number() {
        None => Err(set_error(
            param,
            group,
            format!["expected a {what} number, found `{}`", group.text()],
        )),
        Some(n) if n == 0 || n > len => Err(set_error(
            param,
            group,
            format!["{what} {n} is out of range"],
        )
        .with_note(format!["the matrix has {len} {what}s, numbered from 1"])),
        Some(n) => Ok(n - 1),
    }
}

/// Evaluates a value as written, so parentheses render the way they do in the body.
fn evaluate_group(
    group: &params::Group,
    dispatch: &Dispatch,
    ctx: &mut Context,
) -> Result<String> {
    let tree = tree::build(group.written_tokens().iter().cloned(), &BODY_BRACKETS)?;
    Ok(ctx.evaluate_expression(&tree, dispatch))
}

fn evaluate_list(
    param: &params::Param,
    group: &params::Group,
    len: usize,
    dispatch: &Dispatch,
    ctx: &mut Context,
) -> Result<Vec<String>> {
    let tuple = match group.as_tuple() {
        Some(tuple) => tuple,
        None => {
            return Err(set_error(
                param,
                group,
                "expected a parenthesized list of values",
            ))
        }
    };
    if tuple.len() != len {
        return Err(set_error(
            param,
            group,
            format!["expected {len} values, found {}", tuple.len()],
        ));
    }
    tuple
        .groups()
        .iter()
        .map(|value| evaluate_group(value, dispatch, ctx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;
    use jtex_testing::*;

    test_suite![
        conversion_tests(
            (
                two_by_two,
                "--matrix[a, b; c, d]",
                r"\begin{pmatrix}a & b\\c & d\end{pmatrix}"
            ),
            (
                in_text,
                "M = --matrix[1, 2] here",
                r"M = \begin{pmatrix}1 & 2\end{pmatrix} here"
            ),
            (column, "--matrix[1; 2; 3]", r"\begin{pmatrix}1\\2\\3\end{pmatrix}"),
            (
                cells_are_evaluated,
                "--matrix[a/b, x^2]",
                r"\begin{pmatrix}\frac{a}{b} & {x}^{2}\end{pmatrix}"
            ),
            (
                parentheses_group_commas,
                "--matrix[f(a, b), c]",
                r"\begin{pmatrix}f\left(a, b\right) & c\end{pmatrix}"
            ),
            (
                curly_braces_group_commas,
                r"--matrix[\text{a, b}, c]",
                r"\begin{pmatrix}\text{a, b} & c\end{pmatrix}"
            ),
            (
                multiline_body,
                "--matrix[\n  1, 0;\n  0, 1;\n]",
                r"\begin{pmatrix}1 & 0\\0 & 1\end{pmatrix}"
            ),
            (
                type_parameter,
                "--matrix.type(bmatrix)[1]",
                r"\begin{bmatrix}1\end{bmatrix}"
            ),
            (
                set_position,
                "--matrix.set(pos: (1, 2), x/2)[a, b; c, d]",
                r"\begin{pmatrix}a & \frac{x}{2}\\c & d\end{pmatrix}"
            ),
            (
                set_row,
                "--matrix.set(row: 2, (y, z))[a, b; c, d]",
                r"\begin{pmatrix}a & b\\y & z\end{pmatrix}"
            ),
            (
                set_column,
                "--matrix.set(col: 1, (y, z))[a, b; c, d]",
                r"\begin{pmatrix}y & b\\z & d\end{pmatrix}"
            ),
            (
                set_keeps_value_parentheses,
                "--matrix.set(pos: (1, 1), (a+b))[x]",
                r"\begin{pmatrix}\left(a+b\right)\end{pmatrix}"
            ),
            (
                set_row_keeps_value_parentheses,
                "--matrix.set(row: 1, ((a+b), c))[x, y]",
                r"\begin{pmatrix}\left(a+b\right) & c\end{pmatrix}"
            ),
            (
                set_value_matches_body,
                "--matrix[(a+b)/2]--matrix.set(pos: (1, 1), (a+b)/2)[x]",
                r"\begin{pmatrix}\frac{a+b}{2}\end{pmatrix}\begin{pmatrix}\frac{a+b}{2}\end{pmatrix}"
            ),
            (
                set_is_applied_in_order,
                "--matrix.set(row: 1, (y, z)).set(pos: (1, 1), w)[a, b; c, d]",
                r"\begin{pmatrix}w & z\\c & d\end{pmatrix}"
            ),
            (
                store_and_load,
                "--matrix.store(m)[1, 2] and --matrix.load(m).type(vmatrix)",
                r"\begin{pmatrix}1 & 2\end{pmatrix} and \begin{vmatrix}1 & 2\end{vmatrix}"
            ),
            (
                hidden,
                "A--matrix.store(m).hidden[1, 2]B --matrix.load(m).set(pos: (1, 1), 0)",
                r"AB \begin{pmatrix}0 & 2\end{pmatrix}"
            ),
            (
                loaded_matrix_is_a_copy,
                "--matrix.store(m).hidden[1]--matrix.load(m).set(pos: (1, 1), 2)--matrix.load(m)",
                r"\begin{pmatrix}2\end{pmatrix}\begin{pmatrix}1\end{pmatrix}"
            ),
            (
                inside_math,
                "-- A = --matrix[1, 2];",
                r"$A = \begin{pmatrix}1 & 2\end{pmatrix}$"
            ),
        ),
        failure_tests(
            (missing_body, "--matrix"),
            (body_not_bracket, "--matrix (a)"),
            (unclosed_body, "--matrix[a, b"),
            (empty_body, "--matrix[]"),
            (ragged_rows, "--matrix[a, b; c]"),
            (load_unknown, "--matrix.load(m)"),
            (position_out_of_range, "--matrix.set(pos: (3, 1), x)[a; b]"),
            (position_zero, "--matrix.set(pos: (0, 1), x)[a; b]"),
            (row_out_of_range, "--matrix.set(row: 2, (x))[a]"),
            (row_wrong_length, "--matrix.set(row: 1, (x, y, z))[a, b]"),
            (column_wrong_length, "--matrix.set(col: 1, (x))[a; b]"),
            (unknown_target, "--matrix.set(cell: 1, x)[a]"),
            (unlabelled_target, "--matrix.set(1, x)[a]"),
            (row_value_not_a_list, "--matrix.set(row: 1, x)[a]"),
            (unknown_parameter, "--matrix.tyep(bmatrix)[a]"),
        ),
    ];

    #[test]
    fn load_suggests_close_names() {
        let err = jtex::convert(
            "--matrix.store(rotation).hidden[1]--matrix.load(rotatoin)",
            &registry(),
            &Default::default(),
        )
        .unwrap_err();
        assert_eq!(err.notes(), &["did you mean `rotation`?".to_string()]);
    }

    #[test]
    fn render() {
        let matrix = Matrix {
            rows: vec![vec!["1".into(), "2".into()], vec!["3".into(), "4".into()]],
        };
        assert_eq!(matrix.num_rows(), 2);
        assert_eq!(matrix.num_cols(), 2);
        assert_eq!(
            matrix.render("Bmatrix"),
            r"\begin{Bmatrix}1 & 2\\3 & 4\end{Bmatrix}"
        );
    }
}
