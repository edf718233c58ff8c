pub mod main_menu;

pub use main_menu::{build_registry, render_menu, CHOICE_PROMPT};
