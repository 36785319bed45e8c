use std::collections::HashMap;

use super::Command;
use crate::operator::Operator;
use crate::token::{Kind, Token};

/// The set of commands and operators available during a conversion.
///
/// Operators are injected into commands by name.
/// Injection is a cross product of the two lists and is redone whenever either changes.
#[derive(Clone, Default, Debug)]
pub struct Registry {
    commands: Vec<Command>,
    operators: Vec<Operator>,
    by_trigger: HashMap<Kind, Vec<usize>>,
}

impl Registry {
    pub fn new(commands: Vec<Command>, operators: Vec<Operator>) -> Registry {
        let mut registry = Registry {
            commands,
            operators,
            by_trigger: Default::default(),
        };
        registry.inject();
        registry
    }

    pub fn add_command(&mut self, command: Command) {
        self.commands.push(command);
        self.inject();
    }

    pub fn add_operator(&mut self, operator: Operator) {
        self.operators.push(operator);
        self.inject();
    }

    pub fn extend(&mut self, commands: Vec<Command>, operators: Vec<Operator>) {
        self.commands.extend(commands);
        self.operators.extend(operators);
        self.inject();
    }

    fn inject(&mut self) {
        self.by_trigger.clear();
        for (i, command) in self.commands.iter_mut().enumerate() {
            command.clear_operators();
            self.by_trigger.entry(command.trigger()).or_default().push(i);
            for operator in &self.operators {
                if operator.targets(command.name()) {
                    command.push_operator(operator.clone());
                }
            }
            command.build_operators();
        }
    }

    /// Finds the command invoked by the trigger token.
    ///
    /// Candidates with the token's kind are checked in registration order.
    pub fn lookup(&self, token: &Token) -> Option<&Command> {
        self.by_trigger
            .get(&token.kind())?
            .iter()
            .map(|i| &self.commands[*i])
            .find(|command| command.accepts(token))
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name() == name)
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Operators that do not target any registered command.
    pub fn unattached_operators(&self) -> impl Iterator<Item = &Operator> {
        self.operators.iter().filter(|op| {
            !self
                .commands
                .iter()
                .any(|command| op.targets(command.name()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Call;
    use crate::error::Result;
    use crate::eval::EvalKind;
    use crate::output::LineBuffer;
    use crate::token::Position;
    use crate::vm::Context;

    fn noop(_: &Call, _: &mut LineBuffer, _: &mut Context) -> Result<()> {
        Ok(())
    }

    fn single(name: &str, targets: &[&str]) -> Operator {
        Operator::new_single(name, EvalKind::Iff, |t| t.clone()).inject_into_all(targets)
    }

    fn varname(text: &str) -> Token {
        Token::new(Kind::Varname, text, Position::START)
    }

    #[test]
    fn operators_are_injected_by_name() {
        let registry = Registry::new(
            vec![
                Command::new("a", Kind::Varname, noop),
                Command::new("b", Kind::Use, noop),
            ],
            vec![single("x", &["a"]), single("y", &["a", "b"]), single("z", &["c"])],
        );
        let names = |command: &str| -> Vec<String> {
            registry
                .get(command)
                .unwrap()
                .operators()
                .iter()
                .map(|op| op.name().to_string())
                .collect()
        };
        assert_eq!(names("a"), vec!["x", "y"]);
        assert_eq!(names("b"), vec!["y"]);
        let unattached: Vec<&str> = registry.unattached_operators().map(|op| op.name()).collect();
        assert_eq!(unattached, vec!["z"]);
    }

    #[test]
    fn injection_is_redone_when_lists_change() {
        let mut registry = Registry::new(vec![], vec![single("x", &["a"])]);
        registry.add_command(Command::new("a", Kind::Varname, noop));
        assert_eq!(registry.get("a").unwrap().operators().len(), 1);
        registry.add_operator(single("y", &["a"]));
        assert_eq!(registry.get("a").unwrap().operators().len(), 2);
        assert!(!registry.get("a").unwrap().dispatch().is_empty());
    }

    #[test]
    fn lookup_uses_first_accepting_command() {
        let registry = Registry::new(
            vec![
                Command::new("math", Kind::Varname, noop).with_checker(|t| t.text() == "math"),
                Command::new("any", Kind::Varname, noop),
                Command::new("shadowed", Kind::Varname, noop),
            ],
            vec![],
        );
        assert_eq!(registry.lookup(&varname("math")).unwrap().name(), "math");
        assert_eq!(registry.lookup(&varname("other")).unwrap().name(), "any");
        assert!(registry
            .lookup(&Token::new(Kind::Number, "1", Position::START))
            .is_none());
    }
}
