//! Persistent todo list demo. State lands in `./todo-data/`.
//!
//! Keys: up/down move, space toggle, x remove, a add, q quit.

use bubbletea_rs::{quit, Cmd, KeyMsg, Model as BubbleTeaModel, Msg, Program};
use crossterm::event::{KeyCode, KeyModifiers};
use handy_widgets::storage::FileStorage;
use handy_widgets::{todo, Component};

struct App {
    list: todo::Model<FileStorage>,
}

impl BubbleTeaModel for App {
    fn init() -> (Self, Option<Cmd>) {
        let storage =
            FileStorage::new("todo-data").expect("cannot create todo-data directory");
        (
            App {
                list: todo::new(storage),
            },
            None,
        )
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            let ctrl_c = key_msg.key == KeyCode::Char('c')
                && key_msg.modifiers.contains(KeyModifiers::CONTROL);
            let quit_key = key_msg.key == KeyCode::Char('q') || ctrl_c;
            if quit_key && !self.list.input.focused() {
                return Some(quit());
            }
        }
        self.list.update(msg)
    }

    fn view(&self) -> String {
        format!("{}\n", self.list.view())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let program = Program::<App>::builder().build()?;
    program.run().await?;
    Ok(())
}
