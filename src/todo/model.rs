//! Interactive todo list component.
//!
//! Binds a [`Store`] to a cursor-driven list view. A text field at the
//! bottom adds items; completion is toggled in place. All persistence
//! goes through the store, so the component works over any
//! [`Storage`](crate::storage::Storage) backend.

use crate::key::{matches_binding, Binding};
use crate::storage::{MemoryStorage, Storage};
use crate::textfield::{self, SubmitMsg};
use crate::todo::store::Store;
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::prelude::*;

/// Key bindings for the todo list.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Move the cursor up.
    pub up: Binding,
    /// Move the cursor down.
    pub down: Binding,
    /// Toggle completion of the item under the cursor.
    pub toggle: Binding,
    /// Remove the item under the cursor.
    pub remove: Binding,
    /// Focus the input field.
    pub add: Binding,
    /// Leave the input field without submitting.
    pub cancel: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            up: Binding::new(vec![
                (KeyCode::Up, KeyModifiers::NONE),
                (KeyCode::Char('k'), KeyModifiers::NONE),
            ])
            .with_help("↑/k", "up"),
            down: Binding::new(vec![
                (KeyCode::Down, KeyModifiers::NONE),
                (KeyCode::Char('j'), KeyModifiers::NONE),
            ])
            .with_help("↓/j", "down"),
            toggle: Binding::new(vec![(KeyCode::Char(' '), KeyModifiers::NONE)])
                .with_help("space", "toggle done"),
            remove: Binding::new(vec![
                (KeyCode::Char('x'), KeyModifiers::NONE),
                (KeyCode::Delete, KeyModifiers::NONE),
            ])
            .with_help("x", "remove"),
            add: Binding::new(vec![(KeyCode::Char('a'), KeyModifiers::NONE)]).with_help("a", "add"),
            cancel: Binding::new(vec![(KeyCode::Esc, KeyModifiers::NONE)]).with_help("esc", "cancel"),
        }
    }
}

/// Styles applied to list rows.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Style for pending items.
    pub pending: Style,
    /// Style for completed items.
    pub done: Style,
    /// Style for the cursor marker.
    pub cursor: Style,
    /// Style for the help line.
    pub help: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            pending: Style::new(),
            done: Style::new().strikethrough(true).foreground(Color::from("240")),
            cursor: Style::new().foreground(Color::from("170")),
            help: Style::new().foreground(Color::from("240")),
        }
    }
}

/// Todo list model over a storage backend.
pub struct Model<S: Storage> {
    /// The backing store.
    pub store: Store<S>,
    /// Key bindings.
    pub keymap: KeyMap,
    /// Row styles.
    pub styles: Styles,
    /// Input field for new items.
    pub input: textfield::Model,
    cursor: usize,
    err: Option<String>,
}

/// Creates a todo list over the given backend.
pub fn new<S: Storage>(storage: S) -> Model<S> {
    let mut input = textfield::new();
    input
        .config
        .attributes
        .insert("placeholder".to_string(), "add todo".to_string());
    Model {
        store: Store::load(storage),
        keymap: KeyMap::default(),
        styles: Styles::default(),
        input,
        cursor: 0,
        err: None,
    }
}

impl<S: Storage> Model<S> {
    /// Returns the index of the item under the cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn clamp_cursor(&mut self) {
        let last = self.store.items().len().saturating_sub(1);
        if self.cursor > last {
            self.cursor = last;
        }
    }

    fn record<T>(&mut self, result: Result<T, crate::storage::StorageError>) {
        if let Err(err) = result {
            self.err = Some(err.to_string());
        }
    }

    /// Processes input and submit events.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(submit) = msg.downcast_ref::<SubmitMsg>() {
            if submit.id == self.input.id() {
                if !submit.value.is_empty() {
                    let result = self.store.add_item(submit.value.clone());
                    self.record(result);
                }
                self.input.reset();
                self.input.blur();
                return None;
            }
        }

        if self.input.focused() {
            if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
                if matches_binding(key_msg, &self.keymap.cancel) {
                    self.input.reset();
                    self.input.blur();
                    return None;
                }
            }
            return self.input.update(msg);
        }

        let key_msg = msg.downcast_ref::<KeyMsg>()?;
        if matches_binding(key_msg, &self.keymap.up) {
            self.cursor = self.cursor.saturating_sub(1);
        } else if matches_binding(key_msg, &self.keymap.down) {
            if self.cursor + 1 < self.store.items().len() {
                self.cursor += 1;
            }
        } else if matches_binding(key_msg, &self.keymap.toggle) {
            if let Some(item) = self.store.items().get(self.cursor) {
                let id = item.id;
                let result = self.store.toggle_done(id);
                self.record(result);
            }
        } else if matches_binding(key_msg, &self.keymap.remove) {
            if let Some(item) = self.store.items().get(self.cursor) {
                let id = item.id;
                let result = self.store.remove_item(id);
                self.record(result);
                self.clamp_cursor();
            }
        } else if matches_binding(key_msg, &self.keymap.add) {
            return self.input.focus();
        }
        None
    }

    /// Renders the list, input field and help line.
    pub fn view(&self) -> String {
        let mut out = String::new();

        if self.store.items().is_empty() {
            out.push_str(&self.styles.help.render("Nothing to do.\n"));
        }
        for (index, item) in self.store.items().iter().enumerate() {
            let marker = if self.store.is_done(item.id) { "V" } else { "-" };
            let row_style = if self.store.is_done(item.id) {
                &self.styles.done
            } else {
                &self.styles.pending
            };
            let pointer = if index == self.cursor && !self.input.focused() {
                self.styles.cursor.render(">")
            } else {
                " ".to_string()
            };
            out.push_str(&format!(
                "{} {}\n",
                pointer,
                row_style.render(&format!("{} {}", marker, item.message))
            ));
        }

        out.push('\n');
        out.push_str(&self.input.view());
        out.push('\n');

        if let Some(err) = &self.err {
            out.push_str(&format!("{}\n", err));
        }

        let help = if self.input.focused() {
            "enter add • esc cancel".to_string()
        } else {
            [
                &self.keymap.up,
                &self.keymap.down,
                &self.keymap.toggle,
                &self.keymap.remove,
                &self.keymap.add,
            ]
            .iter()
            .map(|b| b.help_entry())
            .collect::<Vec<_>>()
            .join(" • ")
        };
        out.push_str(&self.styles.help.render(&help));
        out
    }
}

impl BubbleTeaModel for Model<MemoryStorage> {
    fn init() -> (Self, Option<Cmd>) {
        (new(MemoryStorage::new()), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn model() -> Model<MemoryStorage> {
        new(MemoryStorage::new())
    }

    #[test]
    fn test_cursor_movement_stays_in_bounds() {
        let mut m = model();
        m.update(key(KeyCode::Up));
        assert_eq!(m.cursor(), 0);
        for _ in 0..10 {
            m.update(key(KeyCode::Down));
        }
        assert_eq!(m.cursor(), 2);
    }

    #[test]
    fn test_space_toggles_item_under_cursor() {
        let mut m = model();
        m.update(key(KeyCode::Down));
        m.update(key(KeyCode::Char(' ')));
        assert!(m.store.is_done(2));
        m.update(key(KeyCode::Char(' ')));
        assert!(!m.store.is_done(2));
    }

    #[test]
    fn test_remove_moves_cursor_off_the_end() {
        let mut m = model();
        m.update(key(KeyCode::Down));
        m.update(key(KeyCode::Down));
        m.update(key(KeyCode::Char('x')));
        assert_eq!(m.store.items().len(), 2);
        assert_eq!(m.cursor(), 1);
    }

    #[test]
    fn test_add_key_focuses_input() {
        let mut m = model();
        assert!(!m.input.focused());
        m.update(key(KeyCode::Char('a')));
        assert!(m.input.focused());
    }

    #[test]
    fn test_list_keys_suspended_while_typing() {
        let mut m = model();
        m.update(key(KeyCode::Char('a')));
        m.update(key(KeyCode::Char('x')));
        // "x" goes into the field, not the remove binding
        assert_eq!(m.store.items().len(), 3);
        assert_eq!(m.input.value(), "x");
    }

    #[test]
    fn test_esc_cancels_input() {
        let mut m = model();
        m.update(key(KeyCode::Char('a')));
        m.update(key(KeyCode::Char('z')));
        m.update(key(KeyCode::Esc));
        assert!(!m.input.focused());
        assert_eq!(m.input.value(), "");
        assert_eq!(m.store.items().len(), 3);
    }

    #[test]
    fn test_submit_adds_item_and_blurs() {
        let mut m = model();
        m.update(key(KeyCode::Char('a')));
        let msg: Msg = Box::new(SubmitMsg {
            id: m.input.id(),
            value: "Date".to_string(),
        });
        m.update(msg);
        assert_eq!(m.store.items().len(), 4);
        assert_eq!(m.store.items()[3].id, 4);
        assert_eq!(m.store.items()[3].message, "Date");
        assert!(!m.input.focused());
    }

    #[test]
    fn test_empty_submit_adds_nothing() {
        let mut m = model();
        m.update(key(KeyCode::Char('a')));
        let msg: Msg = Box::new(SubmitMsg {
            id: m.input.id(),
            value: String::new(),
        });
        m.update(msg);
        assert_eq!(m.store.items().len(), 3);
        assert!(!m.input.focused());
    }

    #[test]
    fn test_foreign_submit_ignored() {
        let mut m = model();
        let msg: Msg = Box::new(SubmitMsg {
            id: m.input.id() + 1000,
            value: "Date".to_string(),
        });
        m.update(msg);
        assert_eq!(m.store.items().len(), 3);
    }

    #[test]
    fn test_view_markers() {
        let mut m = model();
        m.update(key(KeyCode::Char(' ')));
        let view = m.view();
        assert!(view.contains("V Apple"));
        assert!(view.contains("- Banana"));
    }

    #[test]
    fn test_full_session() {
        let mut m = model();
        // add "Date", toggle Banana, remove Apple
        m.update(key(KeyCode::Char('a')));
        let msg: Msg = Box::new(SubmitMsg {
            id: m.input.id(),
            value: "Date".to_string(),
        });
        m.update(msg);
        m.update(key(KeyCode::Down));
        m.update(key(KeyCode::Char(' ')));
        m.update(key(KeyCode::Up));
        m.update(key(KeyCode::Char('x')));

        let ids: Vec<u64> = m.store.items().iter().map(|t| t.id).collect();
        assert_eq!(ids, [2, 3, 4]);
        assert!(m.store.is_done(2));
    }
}
