use crate::cli::commands;
use crate::cli::output::{current_preferences, format_message, MessageKind};
use crate::cli::registry::CommandRegistry;

pub const MENU_TITLE: &str = "Expense Tracker Menu";
pub const CHOICE_PROMPT: &str = "Enter your choice: ";

/// Registry holding the twelve menu entries.
pub fn build_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for entry in commands::definitions() {
        registry.register(entry);
    }
    registry
}

/// Numbered menu text, one entry per line with its typed name alongside.
pub fn render_menu(registry: &CommandRegistry) -> String {
    let name_width = registry
        .list()
        .iter()
        .map(|entry| entry.description.len())
        .max()
        .unwrap_or(0);

    let mut lines = vec![format_message(
        MessageKind::Section,
        MENU_TITLE,
        &current_preferences(),
    )];
    for entry in registry.list() {
        lines.push(format!(
            "{:>2}. {:<name_width$}  [{}]",
            entry.number, entry.description, entry.name
        ));
    }
    format!("\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_twelve_numbered_entries() {
        let registry = build_registry();
        let numbers: Vec<u8> = registry.list().iter().map(|entry| entry.number).collect();
        assert_eq!(numbers, (1..=12).collect::<Vec<u8>>());
        assert_eq!(registry.resolve("12").map(|entry| entry.name), Some("exit"));

        let names = [
            "add-today",
            "add-for-date",
            "view-all",
            "analyze-by-category",
            "month-total",
            "highest-expense",
            "category-report",
            "pie-chart",
            "monthly-bar-chart",
            "weekly-bar-chart",
            "delete",
            "exit",
        ];
        for (number, name) in (1u8..).zip(names) {
            assert_eq!(
                registry.resolve(name).map(|entry| entry.number),
                Some(number),
                "{name}"
            );
        }
        assert_eq!(
            registry.resolve("Weekly-Bar-Chart").map(|entry| entry.number),
            Some(10)
        );
    }

    #[test]
    fn menu_lists_every_entry() {
        let registry = build_registry();
        let menu = render_menu(&registry);
        assert!(menu.contains(MENU_TITLE));
        assert!(menu.contains(" 1. Add today's expense"));
        assert!(menu.contains("12. Exit"));
        assert!(menu.contains("[delete]"));
    }
}
