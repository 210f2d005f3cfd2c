//! Circular countdown clock.
//!
//! Composes a [`ticker`](crate::ticker) for frame timing, a
//! [`dial`](crate::dial) for the arc rendering and a
//! [`textfield`](crate::textfield) for editing the duration. The clock
//! owns the elapsed-time arithmetic: it tracks the origin instant and
//! derives progress from the ticker's last observed time, so pausing
//! and resuming never causes the arc to jump.
//!
//! Progress is clamped at `1.0` once the countdown completes but the
//! clock keeps ticking; [`Model::reset`] rewinds it.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use handy_widgets::clock;
//! use bubbletea_rs::{Model as BubbleTeaModel, Msg, Cmd};
//!
//! struct App {
//!     clock: clock::Model,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let clock = clock::new();
//!         let cmd = clock.init();
//!         (App { clock }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.clock.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.clock.view()
//!     }
//! }
//! ```

use crate::dial;
use crate::key::{matches_binding, Binding};
use crate::textfield::{self, SubmitMsg};
use crate::ticker;
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::prelude::*;
use std::time::{Duration, SystemTime};
use thiserror::Error;

/// Default countdown duration.
pub const DEFAULT_TOTAL: Duration = Duration::from_secs(60);

/// Errors raised while configuring the clock.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// The requested total duration was zero.
    #[error("total duration must be positive")]
    NonPositiveTotal,
    /// The duration input could not be parsed as milliseconds.
    #[error("invalid duration {0:?}, expected milliseconds")]
    InvalidDuration(String),
}

/// Key bindings for the clock.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Pause or resume the countdown.
    pub toggle: Binding,
    /// Rewind to the start.
    pub reset: Binding,
    /// Edit the total duration.
    pub edit: Binding,
    /// Leave the duration editor without submitting.
    pub cancel: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            toggle: Binding::new(vec![(KeyCode::Char(' '), KeyModifiers::NONE)])
                .with_help("space", "pause/resume"),
            reset: Binding::new(vec![(KeyCode::Char('r'), KeyModifiers::NONE)])
                .with_help("r", "reset"),
            edit: Binding::new(vec![(KeyCode::Char('e'), KeyModifiers::NONE)])
                .with_help("e", "edit duration"),
            cancel: Binding::new(vec![(KeyCode::Esc, KeyModifiers::NONE)])
                .with_help("esc", "cancel"),
        }
    }
}

/// Countdown clock model.
pub struct Model {
    /// Frame source.
    pub ticker: ticker::Model,
    /// Arc renderer.
    pub dial: dial::Model,
    /// Duration editor.
    pub input: textfield::Model,
    /// Key bindings.
    pub keymap: KeyMap,
    /// Style for the time readout.
    pub readout_style: Style,
    /// Style for the help line.
    pub help_style: Style,

    total: Duration,
    origin: SystemTime,
    err: Option<ClockError>,
}

/// Creates a clock counting down [`DEFAULT_TOTAL`].
pub fn new() -> Model {
    build(DEFAULT_TOTAL)
}

/// Creates a clock counting down `total`.
pub fn new_with_total(total: Duration) -> Result<Model, ClockError> {
    if total.is_zero() {
        return Err(ClockError::NonPositiveTotal);
    }
    Ok(build(total))
}

fn build(total: Duration) -> Model {
    let ticker = ticker::new();
    let mut input = textfield::new();
    input
        .config
        .attributes
        .insert("placeholder".to_string(), "duration in ms".to_string());
    let origin = ticker.now();
    Model {
        ticker,
        dial: dial::new(&[
            dial::with_hub('•'),
            dial::with_hub_style(Style::new().bold(true)),
        ]),
        input,
        keymap: KeyMap::default(),
        readout_style: Style::new().bold(true),
        help_style: Style::new().foreground(Color::from("240")),
        total,
        origin,
        err: None,
    }
}

impl Default for Model {
    fn default() -> Self {
        new()
    }
}

impl Model {
    /// Arms the frame chain if the clock was started before boot. A
    /// fresh clock waits for the toggle key, matching its paused
    /// default.
    pub fn init(&self) -> Option<Cmd> {
        self.ticker.init()
    }

    /// Returns the configured total duration.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Returns the instant the countdown measures from.
    pub fn start_time(&self) -> SystemTime {
        self.origin
    }

    /// Moves the countdown's reference instant. A start in the future
    /// yields negative progress, which renders as an empty dial until
    /// time catches up.
    pub fn set_start(&mut self, start: SystemTime) {
        self.origin = start;
    }

    /// Replaces the total duration. Zero totals are rejected so
    /// progress arithmetic never divides by zero.
    pub fn set_total(&mut self, total: Duration) -> Result<(), ClockError> {
        if total.is_zero() {
            return Err(ClockError::NonPositiveTotal);
        }
        self.total = total;
        Ok(())
    }

    /// Milliseconds elapsed since the origin, as observed by the
    /// ticker. Negative only if the origin was rebased past the last
    /// frame, which renders as an empty arc.
    pub fn elapsed_ms(&self) -> i64 {
        match self.ticker.now().duration_since(self.origin) {
            Ok(ahead) => ahead.as_millis() as i64,
            Err(err) => -(err.duration().as_millis() as i64),
        }
    }

    /// Fraction of the countdown completed, clamped at `1.0`.
    pub fn progress(&self) -> f64 {
        let total_ms = self.total.as_millis() as f64;
        (self.elapsed_ms() as f64 / total_ms).min(1.0)
    }

    /// Returns whether the countdown has run to completion.
    pub fn done(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Rewinds elapsed time to zero without touching the run state.
    pub fn reset(&mut self) {
        self.origin = self.ticker.now();
    }

    fn remaining(&self) -> Duration {
        let elapsed = self.elapsed_ms().max(0) as u64;
        self.total
            .saturating_sub(Duration::from_millis(elapsed.min(u64::MAX)))
    }

    fn handle_submit(&mut self, raw: &str) {
        match raw.parse::<u64>() {
            Ok(ms) => match self.set_total(Duration::from_millis(ms)) {
                Ok(()) => {
                    self.err = None;
                    self.input.blur();
                }
                Err(err) => self.err = Some(err),
            },
            Err(_) => self.err = Some(ClockError::InvalidDuration(raw.to_string())),
        }
    }

    /// Routes messages to the ticker, the duration editor and the key
    /// bindings.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(start_stop) = msg.downcast_ref::<ticker::StartStopMsg>() {
            if start_stop.id == self.ticker.id() {
                // Capture elapsed before the ticker resamples its clock
                // so a resume continues from where the pause left off.
                let was_running = self.ticker.running();
                let held_ms = self.elapsed_ms();
                let cmd = self.ticker.update(msg);
                if !was_running && self.ticker.running() {
                    let now = self.ticker.now();
                    self.origin = if held_ms >= 0 {
                        now - Duration::from_millis(held_ms as u64)
                    } else {
                        now + Duration::from_millis((-held_ms) as u64)
                    };
                }
                return cmd;
            }
            return None;
        }

        if msg.downcast_ref::<ticker::TickMsg>().is_some() {
            return self.ticker.update(msg);
        }

        if let Some(submit) = msg.downcast_ref::<SubmitMsg>() {
            if submit.id == self.input.id() {
                let raw = submit.value.clone();
                self.handle_submit(&raw);
            }
            return None;
        }

        if self.input.focused() {
            if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
                if matches_binding(key_msg, &self.keymap.cancel) {
                    self.input.reset();
                    self.input.blur();
                    self.err = None;
                    return None;
                }
            }
            return self.input.update(msg);
        }

        let key_msg = msg.downcast_ref::<KeyMsg>()?;
        if matches_binding(key_msg, &self.keymap.toggle) {
            return Some(self.ticker.toggle());
        } else if matches_binding(key_msg, &self.keymap.reset) {
            self.reset();
        } else if matches_binding(key_msg, &self.keymap.edit) {
            self.input.sync_value(self.total.as_millis());
            return self.input.focus();
        }
        None
    }

    /// Renders the dial, the time readout and the help line.
    pub fn view(&self) -> String {
        let mut out = self.dial.view_with_track(self.progress());
        out.push('\n');

        let remaining = self.remaining();
        let readout = format!(
            "{:02}:{:02}.{:03}",
            remaining.as_secs() / 60,
            remaining.as_secs() % 60,
            remaining.subsec_millis()
        );
        out.push_str(&self.readout_style.render(&readout));
        if !self.ticker.running() {
            out.push_str(" (paused)");
        }
        out.push('\n');

        if self.input.focused() {
            out.push('\n');
            out.push_str(&self.input.view());
            out.push('\n');
        }
        if let Some(err) = &self.err {
            out.push_str(&format!("{}\n", err));
        }

        let help = [
            &self.keymap.toggle,
            &self.keymap.reset,
            &self.keymap.edit,
        ]
        .iter()
        .map(|b| b.help_entry())
        .collect::<Vec<_>>()
        .join(" • ");
        out.push('\n');
        out.push_str(&self.help_style.render(&help));
        out
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        let model = new();
        let cmd = model.init();
        (model, cmd)
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

    fn tick_to(clock: &mut Model, instant: SystemTime) {
        let msg: Msg = Box::new(ticker::TickMsg {
            id: clock.ticker.id(),
            now: instant,
            tag: clock.ticker.tag(),
        });
        clock.update(msg);
    }

    fn start(clock: &mut Model) {
        let msg: Msg = Box::new(ticker::StartStopMsg {
            id: clock.ticker.id(),
            running: true,
        });
        clock.update(msg);
    }

    fn stop(clock: &mut Model) {
        let msg: Msg = Box::new(ticker::StartStopMsg {
            id: clock.ticker.id(),
            running: false,
        });
        clock.update(msg);
    }

    #[test]
    fn test_progress_formula() {
        let mut clock = new_with_total(Duration::from_secs(60)).unwrap();
        start(&mut clock);
        let origin = clock.ticker.now();
        clock.origin = origin;

        tick_to(&mut clock, origin + Duration::from_secs(15));
        assert!((clock.progress() - 0.25).abs() < 1e-9);

        tick_to(&mut clock, origin + Duration::from_secs(45));
        assert!((clock.progress() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_progress_saturates_at_one() {
        let mut clock = new_with_total(Duration::from_secs(1)).unwrap();
        start(&mut clock);
        let origin = clock.ticker.now();
        clock.origin = origin;

        tick_to(&mut clock, origin + Duration::from_secs(30));
        assert_eq!(clock.progress(), 1.0);
        assert!(clock.done());
        assert_eq!(clock.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_progress_monotonic_while_running() {
        let mut clock = new_with_total(Duration::from_secs(10)).unwrap();
        start(&mut clock);
        let origin = clock.ticker.now();
        clock.origin = origin;

        let mut last = clock.progress();
        for ms in [100u64, 350, 900, 2500, 7000] {
            tick_to(&mut clock, origin + Duration::from_millis(ms));
            let p = clock.progress();
            assert!(p >= last);
            last = p;
        }
    }

    #[test]
    fn test_pause_resume_continuity() {
        let mut clock = new_with_total(Duration::from_secs(60)).unwrap();
        start(&mut clock);
        let origin = clock.ticker.now();
        clock.origin = origin;

        tick_to(&mut clock, origin + Duration::from_secs(12));
        stop(&mut clock);
        let held = clock.progress();

        // Wall time passes while paused
        std::thread::sleep(Duration::from_millis(20));
        start(&mut clock);
        let resumed = clock.progress();
        assert!((resumed - held).abs() < 0.01);
    }

    #[test]
    fn test_reset_rewinds_to_zero() {
        let mut clock = new_with_total(Duration::from_secs(10)).unwrap();
        start(&mut clock);
        let origin = clock.ticker.now();
        clock.origin = origin;
        tick_to(&mut clock, origin + Duration::from_secs(5));
        assert!(clock.progress() > 0.4);

        clock.reset();
        assert_eq!(clock.elapsed_ms(), 0);
    }

    #[test]
    fn test_zero_total_rejected() {
        assert!(matches!(
            new_with_total(Duration::ZERO).err(),
            Some(ClockError::NonPositiveTotal)
        ));
        let mut clock = new();
        assert!(clock.set_total(Duration::ZERO).is_err());
        assert_eq!(clock.total(), DEFAULT_TOTAL);
    }

    #[test]
    fn test_future_start_renders_empty_without_panic() {
        let mut clock = new_with_total(Duration::from_secs(10)).unwrap();
        clock.dial = dial::new(&[
            dial::with_fill('#'),
            dial::with_fill_style(Style::new()),
            dial::with_track('.'),
            dial::with_track_style(Style::new()),
        ]);
        clock.set_start(clock.ticker.now() + Duration::from_secs(30));

        assert!(clock.elapsed_ms() < 0);
        assert!(clock.progress() < 0.0);
        assert!(!clock.done());
        // Negative progress paints no fill cells
        assert_eq!(clock.view().matches('#').count(), 0);
    }

    #[test]
    fn test_resume_preserves_future_start() {
        let mut clock = new_with_total(Duration::from_secs(10)).unwrap();
        clock.set_start(clock.ticker.now() + Duration::from_secs(30));
        let held = clock.elapsed_ms();

        start(&mut clock);
        // Rebase keeps the negative offset instead of collapsing to zero
        assert!((clock.elapsed_ms() - held).abs() < 100);
        assert!(clock.elapsed_ms() < 0);
    }

    #[test]
    fn test_boots_paused() {
        let clock = new();
        assert!(!clock.ticker.running());
        assert!(clock.init().is_none());
    }

    #[test]
    fn test_submit_updates_total() {
        let mut clock = new();
        clock.input.focus();
        let msg: Msg = Box::new(SubmitMsg {
            id: clock.input.id(),
            value: "30000".to_string(),
        });
        clock.update(msg);
        assert_eq!(clock.total(), Duration::from_millis(30000));
        assert!(!clock.input.focused());
    }

    #[test]
    fn test_submit_rejects_garbage() {
        let mut clock = new();
        clock.input.focus();
        let msg: Msg = Box::new(SubmitMsg {
            id: clock.input.id(),
            value: "soon".to_string(),
        });
        clock.update(msg);
        assert_eq!(clock.total(), DEFAULT_TOTAL);
        assert!(clock.input.focused());
        assert!(matches!(clock.err, Some(ClockError::InvalidDuration(_))));
    }

    #[test]
    fn test_edit_key_prefills_input() {
        let mut clock = new();
        let msg: Msg = Box::new(KeyMsg {
            key: KeyCode::Char('e'),
            modifiers: KeyModifiers::NONE,
        });
        clock.update(msg);
        assert!(clock.input.focused());
        assert_eq!(clock.input.value(), "60000");
    }

    #[test]
    fn test_view_has_readout() {
        let clock = new();
        let view = clock.view();
        assert!(view.contains("01:00.000") || view.contains("00:59"));
    }
}
