//! Single-line text field with externally reconciled value.
//!
//! The field owns its editing state (characters and cursor position) but
//! can be driven by an outer component that holds the authoritative
//! value: [`Model::sync_value`] forces the displayed text to match an
//! external value whenever it changes, without clobbering local edits
//! when nothing changed.
//!
//! Presentation attributes and event handlers are configured through two
//! explicitly separate maps on [`Config`] rather than being inferred
//! from naming conventions: `attributes` are plain string attributes
//! reapplied on every update, `handlers` map an [`EventKind`] to a
//! message built from the event's payload. A Change handler is
//! delivered in addition to the raw [`ChangedMsg`]; a Submit handler
//! replaces the default [`SubmitMsg`].
//!
//! # Basic Usage
//!
//! ```rust
//! use handy_widgets::textfield;
//!
//! let mut field = textfield::new();
//! field.config.attributes.insert("placeholder".into(), "add todo".into());
//! field.sync_value(60000u64);
//! assert_eq!(field.value(), "60000");
//! ```

use crate::Component;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Raw change event: sent after every edit that altered the value.
/// Always delivered; a configured [`EventKind::Change`] handler fires
/// in addition when this message is routed back through the field.
#[derive(Debug, Clone)]
pub struct ChangedMsg {
    /// The field that raised the event.
    pub id: i64,
    /// The value after the edit, exactly as typed.
    pub value: String,
}

/// Submit event: sent on Enter with the trimmed value, unless a
/// [`EventKind::Submit`] handler replaces it.
#[derive(Debug, Clone)]
pub struct SubmitMsg {
    /// The field that raised the event.
    pub id: i64,
    /// The value at submit time, trimmed of surrounding whitespace.
    pub value: String,
}

/// The kinds of events a handler can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The value changed through user editing. The handler receives the
    /// raw (untrimmed) value.
    Change,
    /// Enter was pressed. The handler receives the trimmed value.
    Submit,
}

/// Maps an event's payload to the message delivered for it.
pub type Handler = Box<dyn Fn(String) -> Msg + Send + Sync>;

/// Call-site configuration: disjoint attribute and handler maps.
///
/// Attributes understood by the field: `placeholder`, `prompt`, `width`
/// and `char-limit`. Unknown keys are kept but ignored. Attributes are
/// reapplied on every update, so mutating the map between updates takes
/// effect on the next message.
#[derive(Default)]
pub struct Config {
    /// Plain presentation attributes.
    pub attributes: HashMap<String, String>,
    /// Event handlers, keyed by the event they respond to.
    pub handlers: HashMap<EventKind, Handler>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("attributes", &self.attributes)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Single-line text field model.
pub struct Model {
    /// Prompt rendered before the text.
    pub prompt: String,
    /// Style for the prompt.
    pub prompt_style: Style,
    /// Style for typed text.
    pub text_style: Style,
    /// Placeholder shown while the field is empty.
    pub placeholder: String,
    /// Style for the placeholder.
    pub placeholder_style: Style,
    /// Style for the cell under the cursor while focused.
    pub cursor_style: Style,
    /// Maximum accepted length in characters; 0 means unlimited.
    pub char_limit: usize,
    /// Minimum rendered width in cells; shorter content is padded.
    pub width: usize,
    /// Attributes and handlers supplied by the call site.
    pub config: Config,

    value: Vec<char>,
    pos: usize,
    focus: bool,
    id: i64,
}

/// Creates a text field with default settings, not focused.
pub fn new() -> Model {
    Model {
        prompt: "> ".to_string(),
        prompt_style: Style::new(),
        text_style: Style::new(),
        placeholder: String::new(),
        placeholder_style: Style::new().foreground(Color::from("240")),
        cursor_style: Style::new().reverse(true),
        char_limit: 0,
        width: 0,
        config: Config::default(),
        value: Vec::new(),
        pos: 0,
        focus: false,
        id: next_id(),
    }
}

impl Default for Model {
    fn default() -> Self {
        new()
    }
}

impl Model {
    /// Returns the unique identifier of this field instance.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the current value.
    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    /// Replaces the value, moving the cursor to the end.
    pub fn set_value(&mut self, s: &str) {
        let mut runes: Vec<char> = s.chars().collect();
        if self.char_limit > 0 && runes.len() > self.char_limit {
            runes.truncate(self.char_limit);
        }
        self.value = runes;
        self.pos = self.value.len();
    }

    /// Forces the displayed text to match an externally supplied value.
    ///
    /// Applied only when the rendered form differs from the current
    /// value, so an outer component can call this on every update
    /// without disturbing in-progress edits.
    pub fn sync_value(&mut self, value: impl fmt::Display) {
        let external = value.to_string();
        if external != self.value() {
            self.set_value(&external);
        }
    }

    /// Clears the value and cursor.
    pub fn reset(&mut self) {
        self.value.clear();
        self.pos = 0;
    }

    // Attributes are reapplied wholesale on every update; the map is
    // the authority, not the fields it writes to.
    fn apply_attributes(&mut self) {
        if let Some(p) = self.config.attributes.get("placeholder") {
            self.placeholder = p.clone();
        }
        if let Some(p) = self.config.attributes.get("prompt") {
            self.prompt = p.clone();
        }
        if let Some(w) = self.config.attributes.get("width") {
            if let Ok(w) = w.parse() {
                self.width = w;
            }
        }
        if let Some(l) = self.config.attributes.get("char-limit") {
            if let Ok(l) = l.parse() {
                self.char_limit = l;
            }
        }
    }

    // The raw event always carries the default message; the Change
    // handler is dispatched separately when that message flows back
    // through update, so both reach the host.
    fn emit_changed(&self, value: String) -> Cmd {
        deliver(Box::new(ChangedMsg {
            id: self.id,
            value,
        }))
    }

    fn emit_submit(&self, value: String) -> Cmd {
        let msg: Msg = match self.config.handlers.get(&EventKind::Submit) {
            Some(handler) => handler(value),
            None => Box::new(SubmitMsg {
                id: self.id,
                value,
            }),
        };
        deliver(msg)
    }

    /// Processes key input. Returns the command delivering any raised
    /// change or submit event.
    ///
    /// Route the field's own [`ChangedMsg`] back through here: when a
    /// [`EventKind::Change`] handler is configured, the handler's
    /// message is delivered in addition to the raw event.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(changed) = msg.downcast_ref::<ChangedMsg>() {
            if changed.id == self.id {
                if let Some(handler) = self.config.handlers.get(&EventKind::Change) {
                    return Some(deliver(handler(changed.value.clone())));
                }
            }
            return None;
        }

        if !self.focus {
            return None;
        }
        self.apply_attributes();

        let key_msg = msg.downcast_ref::<KeyMsg>()?;
        let before = self.value();

        match key_msg.key {
            KeyCode::Enter => {
                let trimmed = self.value().trim().to_string();
                return Some(self.emit_submit(trimmed));
            }
            KeyCode::Backspace => {
                if self.pos > 0 {
                    self.value.remove(self.pos - 1);
                    self.pos -= 1;
                }
            }
            KeyCode::Delete => {
                if self.pos < self.value.len() {
                    self.value.remove(self.pos);
                }
            }
            KeyCode::Left => self.pos = self.pos.saturating_sub(1),
            KeyCode::Right => self.pos = (self.pos + 1).min(self.value.len()),
            KeyCode::Home => self.pos = 0,
            KeyCode::End => self.pos = self.value.len(),
            KeyCode::Char('u') if key_msg.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.drain(..self.pos);
                self.pos = 0;
            }
            KeyCode::Char(ch) => {
                if !key_msg.modifiers.contains(KeyModifiers::CONTROL)
                    && !key_msg.modifiers.contains(KeyModifiers::ALT)
                    && (self.char_limit == 0 || self.value.len() < self.char_limit)
                {
                    self.value.insert(self.pos, ch);
                    self.pos += 1;
                }
            }
            _ => {}
        }

        let after = self.value();
        if after != before {
            return Some(self.emit_changed(after));
        }
        None
    }

    /// Renders the field: prompt, text or placeholder, cursor cell.
    pub fn view(&self) -> String {
        let mut body = String::new();

        if self.value.is_empty() && !self.placeholder.is_empty() {
            if self.focus {
                let mut chars = self.placeholder.chars();
                if let Some(first) = chars.next() {
                    body.push_str(&self.cursor_style.render(&first.to_string()));
                }
                body.push_str(&self.placeholder_style.render(chars.as_str()));
            } else {
                body.push_str(&self.placeholder_style.render(&self.placeholder));
            }
        } else {
            let head: String = self.value[..self.pos].iter().collect();
            body.push_str(&self.text_style.render(&head));
            if self.focus {
                if self.pos < self.value.len() {
                    let under: String = self.value[self.pos..self.pos + 1].iter().collect();
                    body.push_str(&self.cursor_style.render(&under));
                    let tail: String = self.value[self.pos + 1..].iter().collect();
                    body.push_str(&self.text_style.render(&tail));
                } else {
                    body.push_str(&self.cursor_style.render(" "));
                }
            } else {
                let tail: String = self.value[self.pos..].iter().collect();
                body.push_str(&self.text_style.render(&tail));
            }
        }

        let content_width = UnicodeWidthStr::width(self.value().as_str())
            .max(UnicodeWidthStr::width(self.placeholder.as_str()));
        if self.width > content_width {
            body.push_str(&" ".repeat(self.width - content_width));
        }

        format!("{}{}", self.prompt_style.render(&self.prompt), body)
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

fn deliver(msg: Msg) -> Cmd {
    // Wrap the message in a no-delay tick so it flows through the
    // runtime like any other command output.
    let cell = std::sync::Mutex::new(Some(msg));
    bubbletea_tick(Duration::from_nanos(1), move |_| {
        cell.lock()
            .ok()
            .and_then(|mut guard| guard.take())
            .unwrap_or_else(|| Box::new(()) as Msg)
    })
}
