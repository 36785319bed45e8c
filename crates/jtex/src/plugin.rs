//! Plugins
//!
//! A plugin is a named bundle of commands and operators.
//! Plugins come from [Provider]s; the built-in commands are one provider, and a directory
//!     of declarative plugin files is another.
//! [load] merges every plugin that loads successfully into a single [Registry].
//! A plugin that fails to load is skipped and reported as a [Warning].

use crate::command::{Command, Registry};
use crate::operator::Operator;
use crate::warning::Warning;

#[derive(Debug, Clone, Default)]
pub struct Plugin {
    pub name: String,
    pub commands: Vec<Command>,
    pub operators: Vec<Operator>,
}

impl Plugin {
    pub fn new(name: &str) -> Plugin {
        Plugin {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_commands(mut self, commands: Vec<Command>) -> Plugin {
        self.commands.extend(commands);
        self
    }

    pub fn with_operators(mut self, operators: Vec<Operator>) -> Plugin {
        self.operators.extend(operators);
        self
    }
}

/// Why a plugin could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    /// File name or other description of where the plugin came from.
    pub source: String,
    pub reason: String,
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source, self.reason)
    }
}

impl std::error::Error for LoadError {}

/// A source of plugins.
pub trait Provider {
    fn name(&self) -> &str;

    /// Loads the plugins; each plugin succeeds or fails independently.
    fn load(&self) -> Vec<Result<Plugin, LoadError>>;
}

impl Provider for Plugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Vec<Result<Plugin, LoadError>> {
        vec![Ok(self.clone())]
    }
}

/// Builds a registry from every plugin the providers supply.
///
/// Plugins are added in order.
/// A plugin that fails to load, or that defines a command name that is already taken,
///     is skipped in its entirety.
pub fn load(providers: &[&dyn Provider]) -> (Registry, Vec<Warning>) {
    let mut commands: Vec<Command> = vec![];
    let mut operators: Vec<Operator> = vec![];
    let mut warnings = vec![];
    for provider in providers {
        for result in provider.load() {
            let plugin = match result {
                Ok(plugin) => plugin,
                Err(err) => {
                    warnings.push(Warning::PluginSkipped {
                        source: err.source,
                        reason: err.reason,
                    });
                    continue;
                }
            };
            if let Some(clash) = plugin
                .commands
                .iter()
                .find(|c| commands.iter().any(|existing| existing.name() == c.name()))
            {
                warnings.push(Warning::PluginSkipped {
                    source: plugin.name.clone(),
                    reason: format!["the command `{}` is already defined", clash.name()],
                });
                continue;
            }
            commands.extend(plugin.commands);
            operators.extend(plugin.operators);
        }
    }
    (Registry::new(commands, operators), warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Call;
    use crate::error::Result;
    use crate::eval::EvalKind;
    use crate::output::LineBuffer;
    use crate::token::Kind;
    use crate::vm::Context;

    fn noop(_: &Call, _: &mut LineBuffer, _: &mut Context) -> Result<()> {
        Ok(())
    }

    struct Broken;

    impl Provider for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn load(&self) -> Vec<std::result::Result<Plugin, LoadError>> {
            vec![
                Err(LoadError {
                    source: "bad.json".into(),
                    reason: "expected value at line 1 column 1".into(),
                }),
                Ok(Plugin::new("good").with_operators(vec![Operator::new_single(
                    "inf",
                    EvalKind::String,
                    |t| t.replaced_by(r"\infty{}"),
                )
                .inject_into("a")])),
            ]
        }
    }

    #[test]
    fn failed_plugins_are_skipped() {
        let base = Plugin::new("base").with_commands(vec![Command::new("a", Kind::Varname, noop)]);
        let (registry, warnings) = load(&[&base, &Broken]);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            Warning::PluginSkipped { source, .. } if source == "bad.json"
        ));
        assert_eq!(registry.commands().len(), 1);
        assert_eq!(registry.get("a").unwrap().operators().len(), 1);
    }

    #[test]
    fn duplicate_command_names_skip_the_plugin() {
        let first = Plugin::new("first").with_commands(vec![Command::new("a", Kind::Varname, noop)]);
        let second = Plugin::new("second")
            .with_commands(vec![
                Command::new("b", Kind::Varname, noop),
                Command::new("a", Kind::Use, noop),
            ]);
        let (registry, warnings) = load(&[&first, &second]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(registry.commands().len(), 1);
        assert_eq!(registry.commands()[0].trigger(), Kind::Varname);
    }
}
