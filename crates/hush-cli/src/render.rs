//! Single-line terminal status display.

use hush_core::format::format_clock;
use hush_core::{BreathingPhase, PhaseCursor, SessionState, Theme};

pub const BAR_WIDTH: usize = 20;

/// Cells lit for a phase at `progress`: the bar fills while inhaling, empties
/// while exhaling, and holds at whichever end the breath is at.
pub fn filled_cells(phase: &BreathingPhase, progress: f64) -> usize {
    let level = match phase.name.as_str() {
        "inhale" => progress,
        "exhale" => 1.0 - progress,
        "hold-bottom" => 0.0,
        _ => 1.0,
    };
    ((level * BAR_WIDTH as f64).round().max(0.0) as usize).min(BAR_WIDTH)
}

/// Everything one status frame shows.
pub struct Frame<'a> {
    pub title: &'a str,
    pub state: SessionState,
    pub phase: &'a BreathingPhase,
    pub cursor: PhaseCursor,
    pub remaining_secs: f64,
    /// `(current, total)` for round-based sessions.
    pub round: Option<(u64, u64)>,
}

pub struct Renderer {
    theme: Theme,
    color: bool,
}

impl Renderer {
    pub fn new(theme: Theme, color: bool) -> Self {
        Self { theme, color }
    }

    fn paint(&self, text: &str) -> String {
        if self.color {
            format!("\x1b[{}m{text}\x1b[0m", self.theme.accent)
        } else {
            text.to_string()
        }
    }

    pub fn bar(&self, phase: &BreathingPhase, progress: f64) -> String {
        let filled = filled_cells(phase, progress);
        let lit: String = std::iter::repeat(self.theme.bar_fill).take(filled).collect();
        let unlit: String = std::iter::repeat(self.theme.bar_empty)
            .take(BAR_WIDTH - filled)
            .collect();
        format!("{}{unlit}", self.paint(&lit))
    }

    /// The frame as one line, without the leading carriage return.
    pub fn line(&self, frame: &Frame<'_>) -> String {
        let marker = if frame.state == SessionState::Paused {
            "paused".to_string()
        } else {
            format!("{:<6}", self.theme.dot)
        };
        let mut line = format!(
            "{} {}  {:<11} {}  {}",
            self.paint(&marker),
            frame.title,
            frame.phase.label,
            self.bar(frame.phase, frame.cursor.progress),
            format_clock(frame.remaining_secs),
        );
        if let Some((current, total)) = frame.round {
            line.push_str(&format!("  round {current}/{total}"));
        }
        line
    }
}
