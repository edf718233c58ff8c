use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext) -> CommandResult;

/// A numbered menu entry and the handler it dispatches to.
pub struct CommandEntry {
    pub number: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        number: u8,
        name: &'static str,
        description: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            number,
            name,
            description,
            handler,
        }
    }
}

#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) {
        if self.entries.iter().all(|existing| {
            existing.number != entry.number && existing.name != entry.name
        }) {
            self.entries.push(entry);
        }
    }

    pub fn list(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }

    /// Resolves a typed choice by menu number or by name, ignoring case.
    pub fn resolve(&self, token: &str) -> Option<&CommandEntry> {
        let token = token.trim();
        if let Ok(number) = token.parse::<u8>() {
            return self.entries.iter().find(|entry| entry.number == number);
        }
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(token))
    }

    /// Closest entry name for an unrecognized token, if any is similar enough.
    pub fn suggest(&self, token: &str) -> Option<&'static str> {
        let needle = token.trim().to_ascii_lowercase();
        if needle.is_empty() || needle.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        self.entries
            .iter()
            .map(|entry| (entry.name, strsim::jaro_winkler(&needle, entry.name)))
            .filter(|(_, score)| *score >= 0.8)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(name, _)| name)
    }
}
