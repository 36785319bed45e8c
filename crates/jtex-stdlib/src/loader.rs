//! Declarative operator plugins
//!
//! A [DirectoryProvider] turns every `.json` file in a directory into one plugin.
//! A plugin file lists operators:
//!
//! ```json
//! {
//!     "operators": [
//!         {"category": "single", "trigger": "string", "text": "inf", "output": "\\infty{}"},
//!         {"category": "binary", "trigger": "string", "text": "choose", "output": "\\binom{$1}{$2}"},
//!         {"category": "unary", "trigger": "string", "text": "bb", "output": "\\mathbb{$1}", "commands": ["default.math.inline"]}
//!     ]
//! }
//! ```
//!
//! The trigger is the name of an [EvalKind].
//! If `text` is given, the operator only fires for trigger tokens with exactly that text.
//! In the output `$1` and `$2` stand for the unwrapped left and right operands of a binary
//!     operator, and `$1` for the operand of a unary operator.
//! Operators without `commands` are injected into the default math and matrix commands.

use std::path::{Path, PathBuf};

use jtex::eval::{EvalKind, EvalToken};
use jtex::operator::Operator;
use jtex::plugin::{LoadError, Plugin, Provider};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PluginFile {
    #[serde(default)]
    operators: Vec<OperatorSpec>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Category {
    Binary,
    Unary,
    Single,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OperatorSpec {
    #[serde(default)]
    name: Option<String>,
    category: Category,
    trigger: String,
    #[serde(default)]
    text: Option<String>,
    output: String,
    #[serde(default)]
    commands: Option<Vec<String>>,
}

impl OperatorSpec {
    fn build(self, default_name: String) -> Result<Operator, String> {
        let trigger = match EvalKind::from_name(&self.trigger) {
            Some(trigger) => trigger,
            None => {
                let names: Vec<&str> = EvalKind::ALL.iter().map(EvalKind::name).collect();
                let mut reason = format!["unknown trigger `{}`", self.trigger];
                if let Some(word) = jtex::spellcheck::find_close_words(&names, &self.trigger).first()
                {
                    reason.push_str(&format!["; did you mean `{word}`?"]);
                }
                return Err(reason);
            }
        };
        let name = self.name.unwrap_or(default_name);
        let output = self.output;
        let op = match self.category {
            Category::Binary => Operator::new_binary(&name, trigger, move |a, b| {
                let text = substitute(&output, &[a.unwrapped(), b.unwrapped()]);
                Some(EvalToken::spanning(text, a, b))
            }),
            Category::Unary => Operator::new_unary(&name, trigger, move |_, x| {
                Some(x.replaced_by(substitute(&output, &[x.unwrapped()])))
            }),
            Category::Single => {
                Operator::new_single(&name, trigger, move |t| t.replaced_by(output.as_str()))
            }
        };
        let op = match self.text {
            None => op,
            Some(text) => op.with_checker(move |t| t.text() == text),
        };
        Ok(match self.commands {
            None => op.inject_into_all(&crate::TARGETS),
            Some(commands) => {
                let commands: Vec<&str> = commands.iter().map(String::as_str).collect();
                op.inject_into_all(&commands)
            }
        })
    }
}

/// Replaces `$1`, `$2`, ... in `output` with the operand texts.
///
/// The output is scanned once, so placeholders inside an operand are kept literally.
/// A placeholder without a matching operand is kept as written.
fn substitute(output: &str, operands: &[String]) -> String {
    let mut result = String::with_capacity(output.len());
    let mut rest = output;
    while let Some(i) = rest.find('$') {
        result.push_str(&rest[..i]);
        rest = &rest[i..];
        let operand = rest[1..]
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .and_then(|n| (n as usize).checked_sub(1))
            .and_then(|n| operands.get(n));
        match operand {
            Some(operand) => {
                result.push_str(operand);
                rest = &rest[2..];
            }
            None => {
                result.push('$');
                rest = &rest[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

/// Parses one plugin file.
///
/// Operators without an explicit name are named `<plugin>.<index>`.
pub fn parse_plugin(name: &str, json: &str) -> Result<Plugin, LoadError> {
    let error = |reason: String| LoadError {
        source: name.into(),
        reason,
    };
    let file: PluginFile = serde_json::from_str(json).map_err(|err| error(err.to_string()))?;
    let mut operators = Vec::with_capacity(file.operators.len());
    for (i, spec) in file.operators.into_iter().enumerate() {
        let op = spec
            .build(format!["{name}.{i}"])
            .map_err(|reason| error(format!["operator {i}: {reason}"]))?;
        operators.push(op);
    }
    Ok(Plugin::new(name).with_operators(operators))
}

/// Loads every `.json` file in a directory as a plugin.
///
/// Files are loaded in file name order; other files are ignored.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    dir: PathBuf,
}

impl DirectoryProvider {
    pub fn new<P: AsRef<Path>>(dir: P) -> DirectoryProvider {
        DirectoryProvider {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn files(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut files = vec![];
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl Provider for DirectoryProvider {
    fn name(&self) -> &str {
        self.dir.to_str().unwrap_or("<plugin directory>")
    }

    fn load(&self) -> Vec<Result<Plugin, LoadError>> {
        let files = match self.files() {
            Ok(files) => files,
            Err(err) => {
                return vec![Err(LoadError {
                    source: self.dir.display().to_string(),
                    reason: err.to_string(),
                })]
            }
        };
        files
            .into_iter()
            .map(|path| {
                let name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
                    .unwrap_or_default();
                match std::fs::read_to_string(&path) {
                    Ok(json) => parse_plugin(&name, &json),
                    Err(err) => Err(LoadError {
                        source: name,
                        reason: err.to_string(),
                    }),
                }
            })
            .collect()
    }
}
