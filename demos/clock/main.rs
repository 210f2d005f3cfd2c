//! Countdown clock demo.
//!
//! Keys: space pause/resume, r reset, e edit duration, q quit.

use bubbletea_rs::{quit, Cmd, KeyMsg, Model as BubbleTeaModel, Msg, Program};
use crossterm::event::{KeyCode, KeyModifiers};
use handy_widgets::{clock, Component};

struct App {
    clock: clock::Model,
}

impl BubbleTeaModel for App {
    fn init() -> (Self, Option<Cmd>) {
        let clock = clock::new();
        let cmd = clock.init();
        (App { clock }, cmd)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            let ctrl_c = key_msg.key == KeyCode::Char('c')
                && key_msg.modifiers.contains(KeyModifiers::CONTROL);
            let quit_key = key_msg.key == KeyCode::Char('q') || ctrl_c;
            if quit_key && !self.clock.input.focused() {
                return Some(quit());
            }
        }
        self.clock.update(msg)
    }

    fn view(&self) -> String {
        format!("{}\n", self.clock.view())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let program = Program::<App>::builder().build()?;
    program.run().await?;
    Ok(())
}
