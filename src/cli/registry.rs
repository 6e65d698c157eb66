//! Command table for the shell: lookup with typo suggestions, usage text, and completion.

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Largest edit distance still offered as a "did you mean" suggestion.
pub const SUGGESTION_DISTANCE: usize = 3;

#[derive(Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub summary: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandSpec {
    pub const fn new(
        name: &'static str,
        summary: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            summary,
            usage,
            handler,
        }
    }
}

/// Result of resolving a typed command word.
#[derive(Clone, Copy)]
pub enum Lookup<'a> {
    Found(&'a CommandSpec),
    Unknown { suggestion: Option<&'static str> },
}

/// Commands kept in the order they were registered; a later registration replaces
/// an earlier one with the same name.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    specs: Vec<CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, spec: CommandSpec) {
        match self.position(spec.name) {
            Some(idx) => self.specs[idx] = spec,
            None => self.specs.push(spec),
        }
    }

    pub fn extend(&mut self, specs: impl IntoIterator<Item = CommandSpec>) {
        for spec in specs {
            self.register(spec);
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.specs
            .iter()
            .position(|spec| spec.name.eq_ignore_ascii_case(name))
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.position(name).map(|idx| &self.specs[idx])
    }

    pub fn lookup(&self, input: &str) -> Lookup<'_> {
        match self.get(input) {
            Some(spec) => Lookup::Found(spec),
            None => Lookup::Unknown {
                suggestion: self.closest(input),
            },
        }
    }

    pub fn usage(&self, name: &str) -> Option<&'static str> {
        self.get(name).map(|spec| spec.usage)
    }

    pub fn specs(&self) -> &[CommandSpec] {
        &self.specs
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.iter().map(|spec| spec.name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Names starting with `prefix`, alphabetically.
    pub fn completions(&self, prefix: &str) -> Vec<&'static str> {
        let needle = prefix.to_ascii_lowercase();
        let mut names: Vec<&'static str> =
            self.names().filter(|name| name.starts_with(&needle)).collect();
        names.sort_unstable();
        names
    }

    fn closest(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        self.names()
            .map(|name| (strsim::levenshtein(name, &needle), name))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }
}
