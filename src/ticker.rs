//! Frame-driven "now" sampler for animated components.
//!
//! The ticker produces a monotonically non-decreasing stream of wall-clock
//! samples at a fixed frame cadence while it is running. It is the only
//! asynchronous primitive in this crate: each processed frame schedules
//! exactly one follow-up frame, and stopping the ticker leaves no live
//! scheduled frame able to advance the model.
//!
//! # Basic Usage
//!
//! ```rust
//! use handy_widgets::ticker::{new, new_with_fps};
//!
//! // 60 frames per second, the default
//! let ticker = new();
//!
//! // A coarser cadence for battery-friendly displays
//! let ticker = new_with_fps(10);
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Model as BubbleTeaModel, Msg, Cmd};
//! use handy_widgets::ticker;
//!
//! struct MyApp {
//!     ticker: ticker::Model,
//! }
//!
//! impl BubbleTeaModel for MyApp {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let ticker = ticker::new();
//!         let cmd = ticker.init();
//!         (Self { ticker }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         // Forward frame and start/stop messages
//!         self.ticker.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         format!("running: {}", self.ticker.running())
//!     }
//! }
//! ```

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, SystemTime};

// Internal ID management for ticker instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Default sampling cadence, matching a typical display refresh rate.
pub const DEFAULT_FPS: u32 = 60;

/// Message carrying one wall-clock sample, sent once per frame.
///
/// Samples are stamped when the frame fires, not when it was scheduled.
/// The ticker rejects samples with a foreign `id` or a stale `tag`, so a
/// frame scheduled before a stop (or before a restart) can never advance
/// the model after the fact.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// The unique identifier of the ticker that scheduled this frame.
    pub id: i64,
    /// The wall-clock time at which the frame fired.
    pub now: SystemTime,
    /// Arming generation; stale generations are rejected.
    pub(crate) tag: i64,
}

/// Message used to activate and deactivate ticker instances.
///
/// Produced by [`Model::start`], [`Model::stop`] and [`Model::toggle`];
/// the running flag is private so state only changes through those
/// methods.
#[derive(Debug, Clone)]
pub struct StartStopMsg {
    /// The unique identifier of the ticker this message targets.
    pub id: i64,
    pub(crate) running: bool,
}

/// Frame-driven time source.
///
/// While running, `now()` advances once per frame and never moves
/// backwards. While stopped, `now()` holds its last sample. Restarting
/// resamples the wall clock so consumers observe no gap for the stopped
/// interval.
#[derive(Debug, Clone)]
pub struct Model {
    /// Time between frames.
    pub interval: Duration,
    id: i64,
    /// Bumped on every start/stop edge; in-flight frames from a previous
    /// arming carry the old value and are dropped.
    tag: i64,
    running: bool,
    now: SystemTime,
}

/// Creates a ticker at the default 60 FPS cadence, not running.
pub fn new() -> Model {
    new_with_fps(DEFAULT_FPS)
}

/// Creates a ticker sampling at the given frames per second.
///
/// A zero `fps` is treated as 1 to keep the interval finite.
pub fn new_with_fps(fps: u32) -> Model {
    let fps = fps.max(1);
    Model {
        interval: Duration::from_nanos(1_000_000_000 / u64::from(fps)),
        id: next_id(),
        tag: 0,
        running: false,
        now: SystemTime::now(),
    }
}

impl Model {
    /// Returns the unique identifier of this ticker instance.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns whether the ticker is currently sampling.
    pub fn running(&self) -> bool {
        self.running
    }

    /// Returns the latest sample. Holds its last value while stopped.
    pub fn now(&self) -> SystemTime {
        self.now
    }

    pub(crate) fn tag(&self) -> i64 {
        self.tag
    }

    /// Returns the command that arms the first frame, if the ticker is
    /// already running. A stopped ticker has nothing to schedule.
    pub fn init(&self) -> Option<Cmd> {
        if self.running {
            Some(self.frame())
        } else {
            None
        }
    }

    /// Returns a command that activates the ticker.
    pub fn start(&self) -> Cmd {
        self.start_stop(true)
    }

    /// Returns a command that deactivates the ticker.
    ///
    /// Deactivation invalidates the outstanding scheduled frame: it may
    /// still fire, but its stale tag means it is discarded on arrival.
    pub fn stop(&self) -> Cmd {
        self.start_stop(false)
    }

    /// Returns a command that flips the running state.
    pub fn toggle(&self) -> Cmd {
        self.start_stop(!self.running)
    }

    fn start_stop(&self, running: bool) -> Cmd {
        let id = self.id;
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(StartStopMsg { id, running }) as Msg
        })
    }

    fn frame(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.interval, move |_| {
            Box::new(TickMsg {
                id,
                tag,
                now: SystemTime::now(),
            }) as Msg
        })
    }

    /// Processes start/stop edges and frame samples.
    ///
    /// Arming is edge-triggered: a `StartStopMsg` that starts an already
    /// running ticker schedules nothing, so there is always exactly one
    /// live frame while running and zero while stopped.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(start_stop) = msg.downcast_ref::<StartStopMsg>() {
            if start_stop.id != 0 && start_stop.id != self.id {
                return None;
            }
            let was_running = self.running;
            self.running = start_stop.running;
            if start_stop.running && !was_running {
                // Fresh sample on activation so elapsed-time consumers
                // don't observe the stopped interval as a jump.
                self.now = SystemTime::now();
                self.tag += 1;
                return Some(self.frame());
            }
            if !start_stop.running {
                self.tag += 1;
            }
            return None;
        }

        if let Some(tick) = msg.downcast_ref::<TickMsg>() {
            if !self.running || (tick.id != 0 && tick.id != self.id) {
                return None;
            }
            // Frames from a superseded arming would tick too fast (or
            // after a stop); the tag identifies the current arming.
            if tick.tag > 0 && tick.tag != self.tag {
                return None;
            }
            if tick.now > self.now {
                self.now = tick.now;
            }
            return Some(self.frame());
        }

        None
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
        if self.running {
            "ticking".to_string()
        } else {
            "held".to_string()
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        new()
    }
}
