//! Circular progress dial for Bubble Tea applications.
//!
//! The dial paints a circular arc on a character canvas where the painted
//! fraction of the circumference equals a progress value in `[0, 1]`. The
//! arc begins at 12 o'clock (plus an optional start angle) and sweeps
//! clockwise, mirroring the dash-offset technique of vector clock faces:
//! progress 0 paints nothing, progress 1 paints the full ring, and the
//! painted length is linear in between.
//!
//! The dial never clamps its input; callers are expected to clamp. Out of
//! range values saturate to an empty or full ring and never panic.
//!
//! # Basic Usage
//!
//! ```rust
//! use handy_widgets::dial::{new, with_radius, with_start_degree};
//!
//! // A dial with default geometry
//! let dial = new(&[]);
//!
//! // A thinner dial, rotated a quarter turn
//! let dial = new(&[with_radius(40.0), with_start_degree(90.0)]);
//!
//! let frame = dial.view_as(0.5); // half the ring painted
//! ```

use lipgloss_extras::prelude::*;
use unicode_width::UnicodeWidthChar;

/// Side length of the square coordinate space the dial is modeled in.
/// Geometry is specified in these units and mapped onto the cell canvas.
const VIEWBOX: f64 = 100.0;

const DEFAULT_RADIUS: f64 = 25.0;
const DEFAULT_SEGMENTS: usize = 240;
const DEFAULT_WIDTH: usize = 41;
const DEFAULT_HEIGHT: usize = 21;

// Radial sampling step, in viewbox units. Small enough that thick rings
// have no unpainted holes on the default canvas.
const RADIAL_STEP: f64 = 1.25;

/// Configuration options for the dial, applied at construction.
///
/// # Examples
///
/// ```rust
/// use handy_widgets::dial::{new, with_fill, with_segments, with_size};
///
/// let dial = new(&[
///     with_size(21, 11),
///     with_segments(120),
///     with_fill('#'),
/// ]);
/// ```
pub enum DialOption {
    /// Sets the stored progress fraction rendered by `view()`.
    WithProgress(f64),
    /// Sets the ring radius in viewbox units (default 25).
    WithRadius(f64),
    /// Rotates the arc's start clockwise from 12 o'clock, in degrees.
    WithStartDegree(f64),
    /// Sets how many slots the circumference is divided into.
    WithSegments(usize),
    /// Sets the radial thickness of the ring in viewbox units.
    /// The default equals the diameter, which fills the dial to its hub.
    WithThickness(f64),
    /// Sets the canvas size in cells (columns, rows).
    WithSize(usize, usize),
    /// Sets the character used for painted cells.
    WithFill(char),
    /// Sets the style applied to painted cells.
    WithFillStyle(Style),
    /// Sets the character used for the track (unpainted ring).
    WithTrack(char),
    /// Sets the style applied to track cells.
    WithTrackStyle(Style),
    /// Sets the character painted at the dial's center in stacked
    /// rendering.
    WithHub(char),
    /// Sets the style applied to the hub cell.
    WithHubStyle(Style),
}

impl DialOption {
    fn apply(&self, m: &mut Model) {
        match self {
            DialOption::WithProgress(p) => m.progress = *p,
            DialOption::WithRadius(r) => m.radius = *r,
            DialOption::WithStartDegree(d) => m.start_degree = *d,
            DialOption::WithSegments(s) => m.segments = (*s).max(1),
            DialOption::WithThickness(t) => m.thickness = t.max(0.0),
            DialOption::WithSize(w, h) => {
                m.width = (*w).max(3);
                m.height = (*h).max(3);
            }
            DialOption::WithFill(c) => m.full = *c,
            DialOption::WithFillStyle(s) => m.full_style = s.clone(),
            DialOption::WithTrack(c) => m.track = *c,
            DialOption::WithTrackStyle(s) => m.track_style = s.clone(),
            DialOption::WithHub(c) => m.hub = Some(*c),
            DialOption::WithHubStyle(s) => m.hub_style = s.clone(),
        }
    }
}

/// Sets the stored progress fraction.
pub fn with_progress(p: f64) -> DialOption {
    DialOption::WithProgress(p)
}

/// Sets the ring radius in viewbox units.
pub fn with_radius(r: f64) -> DialOption {
    DialOption::WithRadius(r)
}

/// Rotates the arc start clockwise from 12 o'clock, in degrees.
pub fn with_start_degree(d: f64) -> DialOption {
    DialOption::WithStartDegree(d)
}

/// Sets the number of slots the circumference is divided into.
pub fn with_segments(s: usize) -> DialOption {
    DialOption::WithSegments(s)
}

/// Sets the radial thickness of the ring in viewbox units.
pub fn with_thickness(t: f64) -> DialOption {
    DialOption::WithThickness(t)
}

/// Sets the canvas size in cells (columns, rows).
///
/// Terminal cells are roughly twice as tall as wide, so a round-looking
/// dial wants about twice as many columns as rows.
pub fn with_size(width: usize, height: usize) -> DialOption {
    DialOption::WithSize(width, height)
}

/// Sets the character painted for the filled arc.
pub fn with_fill(c: char) -> DialOption {
    DialOption::WithFill(c)
}

/// Sets the style applied to the filled arc.
pub fn with_fill_style(s: Style) -> DialOption {
    DialOption::WithFillStyle(s)
}

/// Sets the character painted for the track ring.
pub fn with_track(c: char) -> DialOption {
    DialOption::WithTrack(c)
}

/// Sets the style applied to the track ring.
pub fn with_track_style(s: Style) -> DialOption {
    DialOption::WithTrackStyle(s)
}

/// Sets the character painted at the dial's center in stacked
/// rendering.
pub fn with_hub(c: char) -> DialOption {
    DialOption::WithHub(c)
}

/// Sets the style applied to the hub cell.
pub fn with_hub_style(s: Style) -> DialOption {
    DialOption::WithHubStyle(s)
}

/// The dial model: geometry, canvas size and styling.
#[derive(Debug, Clone)]
pub struct Model {
    /// Progress fraction rendered by `view()`. Not clamped here.
    pub progress: f64,
    /// Ring radius in viewbox units.
    pub radius: f64,
    /// Arc start, degrees clockwise from 12 o'clock.
    pub start_degree: f64,
    /// Number of slots the circumference is divided into.
    pub segments: usize,
    /// Radial thickness of the ring in viewbox units.
    pub thickness: f64,
    /// Canvas width in cells.
    pub width: usize,
    /// Canvas height in rows.
    pub height: usize,
    /// Character for painted cells.
    pub full: char,
    /// Style for painted cells.
    pub full_style: Style,
    /// Character for track cells.
    pub track: char,
    /// Style for track cells.
    pub track_style: Style,
    /// Character painted at the center in stacked rendering, if any.
    pub hub: Option<char>,
    /// Style for the hub cell.
    pub hub_style: Style,
}

/// Creates a dial with the given options applied over the defaults.
pub fn new(opts: &[DialOption]) -> Model {
    let mut m = Model {
        progress: 0.0,
        radius: DEFAULT_RADIUS,
        start_degree: 0.0,
        segments: DEFAULT_SEGMENTS,
        // Matches a stroke as wide as the diameter: the ring reaches
        // from the hub to twice the radius.
        thickness: DEFAULT_RADIUS * 2.0,
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        full: '█',
        full_style: Style::new(),
        track: '░',
        track_style: Style::new().foreground(Color::from("240")),
        hub: None,
        hub_style: Style::new(),
    };
    for opt in opts {
        opt.apply(&mut m);
    }
    m
}

impl Model {
    /// Number of circumference slots painted for a progress value.
    ///
    /// Linear in `progress` and saturating: anything at or below zero
    /// paints nothing, anything at or above one paints the full ring.
    pub fn lit_segments(&self, progress: f64) -> usize {
        if !(progress > 0.0) {
            return 0;
        }
        let lit = (self.segments as f64 * progress).round() as usize;
        lit.min(self.segments)
    }

    /// Renders the stored progress fraction.
    pub fn view(&self) -> String {
        self.view_as(self.progress)
    }

    /// Renders an explicit progress fraction, arc only.
    pub fn view_as(&self, progress: f64) -> String {
        let mut canvas = self.blank_canvas();
        self.plot_arc(&mut canvas, progress, Paint::Fill);
        self.render_canvas(&canvas)
    }

    /// Renders a full-circle backdrop: the same pass with progress
    /// forced to one, painted in the fill style.
    pub fn background(&self) -> String {
        self.view_as(1.0)
    }

    /// Renders the full stack: track ring, progress arc over it, and
    /// the hub cell at the center when one is configured.
    pub fn view_with_track(&self, progress: f64) -> String {
        let mut canvas = self.blank_canvas();
        self.plot_arc(&mut canvas, 1.0, Paint::Track);
        self.plot_arc(&mut canvas, progress, Paint::Fill);
        if self.hub.is_some() {
            canvas[(self.height - 1) / 2][(self.width - 1) / 2] = Some(Paint::Hub);
        }
        self.render_canvas(&canvas)
    }

    fn blank_canvas(&self) -> Vec<Vec<Option<Paint>>> {
        vec![vec![None; self.width]; self.height]
    }

    fn plot_arc(&self, canvas: &mut [Vec<Option<Paint>>], progress: f64, paint: Paint) {
        let lit = self.lit_segments(progress);
        let inner = (self.radius - self.thickness / 2.0).max(0.0);
        let outer = (self.radius + self.thickness / 2.0).min(VIEWBOX / 2.0);
        for k in 0..lit {
            let frac = k as f64 / self.segments as f64;
            let theta = (self.start_degree - 90.0 + frac * 360.0).to_radians();
            let mut r = inner;
            loop {
                let x = VIEWBOX / 2.0 + r * theta.cos();
                let y = VIEWBOX / 2.0 + r * theta.sin();
                let col = (x / VIEWBOX * (self.width - 1) as f64).round() as i64;
                let row = (y / VIEWBOX * (self.height - 1) as f64).round() as i64;
                if (0..self.width as i64).contains(&col) && (0..self.height as i64).contains(&row)
                {
                    canvas[row as usize][col as usize] = Some(paint);
                }
                if r >= outer {
                    break;
                }
                r = (r + RADIAL_STEP).min(outer);
            }
        }
    }

    fn render_canvas(&self, canvas: &[Vec<Option<Paint>>]) -> String {
        // Wide fill characters would shear the grid; blanks pad to the
        // widest painted glyph so columns stay aligned.
        let cell_width = UnicodeWidthChar::width(self.full)
            .unwrap_or(1)
            .max(UnicodeWidthChar::width(self.track).unwrap_or(1))
            .max(
                self.hub
                    .and_then(UnicodeWidthChar::width)
                    .unwrap_or(1),
            )
            .max(1);
        let blank = " ".repeat(cell_width);

        let mut out = String::new();
        for (i, row) in canvas.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for cell in row {
                match cell {
                    Some(Paint::Fill) => {
                        out.push_str(&self.full_style.render(&self.full.to_string()))
                    }
                    Some(Paint::Track) => {
                        out.push_str(&self.track_style.render(&self.track.to_string()))
                    }
                    Some(Paint::Hub) => {
                        let hub = self.hub.unwrap_or(' ');
                        out.push_str(&self.hub_style.render(&hub.to_string()))
                    }
                    None => out.push_str(&blank),
                }
            }
        }
        out
    }
}

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Paint {
    Fill,
    Track,
    Hub,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_dial() -> Model {
        new(&[
            with_fill('#'),
            with_fill_style(Style::new()),
            with_track('.'),
            with_track_style(Style::new()),
        ])
    }

    fn count_char(s: &str, c: char) -> usize {
        s.chars().filter(|&x| x == c).count()
    }

    #[test]
    fn test_lit_segments_linear() {
        let dial = new(&[with_segments(240)]);
        assert_eq!(dial.lit_segments(0.0), 0);
        assert_eq!(dial.lit_segments(0.25), 60);
        assert_eq!(dial.lit_segments(0.5), 120);
        assert_eq!(dial.lit_segments(1.0), 240);
    }

    #[test]
    fn test_lit_segments_saturates_without_clamping_input() {
        let dial = new(&[with_segments(100)]);
        assert_eq!(dial.lit_segments(-0.5), 0);
        assert_eq!(dial.lit_segments(1.7), 100);
        assert_eq!(dial.lit_segments(f64::NAN), 0);
    }

    #[test]
    fn test_zero_progress_paints_nothing() {
        let dial = plain_dial();
        assert_eq!(count_char(&dial.view_as(0.0), '#'), 0);
    }

    #[test]
    fn test_full_progress_equals_background() {
        let dial = plain_dial();
        assert_eq!(dial.view_as(1.0), dial.background());
    }

    #[test]
    fn test_background_ignores_stored_progress() {
        let mut dial = plain_dial();
        dial.progress = 0.3;
        assert_eq!(dial.background(), dial.view_as(1.0));
    }

    #[test]
    fn test_painted_cells_grow_with_progress() {
        let dial = plain_dial();
        let none = count_char(&dial.view_as(0.0), '#');
        let half = count_char(&dial.view_as(0.5), '#');
        let full = count_char(&dial.view_as(1.0), '#');
        assert_eq!(none, 0);
        assert!(half > 0);
        assert!(full > half);
    }

    #[test]
    fn test_track_fully_painted_under_partial_arc() {
        let dial = plain_dial();
        let with_track = dial.view_with_track(0.0);
        let background_cells = count_char(&dial.background(), '#');
        // Empty arc over the track: every ring cell carries the track
        // glyph instead.
        assert_eq!(count_char(&with_track, '.'), background_cells);
        assert_eq!(count_char(&with_track, '#'), 0);
    }

    #[test]
    fn test_full_arc_covers_track() {
        let dial = plain_dial();
        let covered = dial.view_with_track(1.0);
        assert_eq!(count_char(&covered, '.'), 0);
        assert_eq!(count_char(&covered, '#'), count_char(&dial.background(), '#'));
    }

    #[test]
    fn test_first_quarter_sits_top_right() {
        let dial = plain_dial();
        let frame = dial.view_as(0.25);
        let center_col = (dial.width - 1) / 2;
        let center_row = (dial.height - 1) / 2;
        for (row, line) in frame.lines().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch == '#' {
                    assert!(col >= center_col, "cell ({row},{col}) left of center");
                    assert!(row <= center_row, "cell ({row},{col}) below center");
                }
            }
        }
    }

    #[test]
    fn test_start_degree_rotates_arc() {
        let dial = plain_dial();
        let rotated = new(&[
            with_fill('#'),
            with_fill_style(Style::new()),
            with_track('.'),
            with_track_style(Style::new()),
            with_start_degree(180.0),
        ]);
        assert_ne!(dial.view_as(0.25), rotated.view_as(0.25));
    }

    #[test]
    fn test_hub_painted_at_center_of_stack() {
        let dial = new(&[
            with_fill('#'),
            with_fill_style(Style::new()),
            with_track('.'),
            with_track_style(Style::new()),
            with_hub('o'),
            with_hub_style(Style::new()),
        ]);
        let frame = dial.view_with_track(0.5);
        let center_row = (dial.height - 1) / 2;
        let center_col = (dial.width - 1) / 2;
        let line = frame.lines().nth(center_row).unwrap();
        assert_eq!(line.chars().nth(center_col), Some('o'));

        // Arc-only rendering carries no hub
        assert_eq!(count_char(&dial.view_as(1.0), 'o'), 0);
    }

    #[test]
    fn test_out_of_range_progress_does_not_panic() {
        let dial = plain_dial();
        let _ = dial.view_as(-3.0);
        let _ = dial.view_as(42.0);
        let _ = dial.view_as(f64::NAN);
    }

    #[test]
    fn test_canvas_dimensions() {
        let dial = new(&[with_size(21, 11), with_fill('#')]);
        let frame = dial.view_as(1.0);
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines.len(), 11);
    }
}
