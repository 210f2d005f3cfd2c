//! Type-safe key bindings shared by the clock and todo components.

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A single logical action bound to one or more key combinations.
///
/// Bindings carry optional help text so components can render a hint
/// line without duplicating the key names.
///
/// # Examples
///
/// ```rust
/// use handy_widgets::key::Binding;
/// use crossterm::event::{KeyCode, KeyModifiers};
///
/// let toggle = Binding::new(vec![(KeyCode::Char(' '), KeyModifiers::NONE)])
///     .with_help("space", "start/stop");
/// assert_eq!(toggle.help, "space");
/// ```
#[derive(Debug, Clone)]
pub struct Binding {
    /// Key combinations that trigger this binding.
    pub keys: Vec<(KeyCode, KeyModifiers)>,
    /// Short key label for help lines (e.g. "space").
    pub help: String,
    /// What the binding does (e.g. "start/stop").
    pub description: String,
}

impl Binding {
    /// Creates a binding for the given key combinations.
    pub fn new(keys: Vec<(KeyCode, KeyModifiers)>) -> Self {
        Self {
            keys,
            help: String::new(),
            description: String::new(),
        }
    }

    /// Attaches help text to the binding.
    pub fn with_help(mut self, help: impl Into<String>, description: impl Into<String>) -> Self {
        self.help = help.into();
        self.description = description.into();
        self
    }

    /// Returns true when the key message matches one of the bound combinations.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.keys
            .iter()
            .any(|(code, mods)| *code == msg.key && *mods == msg.modifiers)
    }

    /// Renders the binding as "key description" for help lines.
    pub fn help_entry(&self) -> String {
        format!("{} {}", self.help, self.description)
    }
}

/// Convenience check used in `update` loops.
pub fn matches_binding(msg: &KeyMsg, binding: &Binding) -> bool {
    binding.matches(msg)
}
