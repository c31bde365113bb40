use chrono::{DateTime, TimeDelta, Utc};

/// Measures how long the current question has been on screen.
///
/// Time spent with the app in the background is not counted: going to the background drops
/// the start time, and coming back restarts the clock if a question is still showing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuestionTimer {
    started_at: Option<DateTime<Utc>>,
    question_visible: bool,
}

impl QuestionTimer {
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.started_at = Some(now);
        self.question_visible = true;
    }

    /// Called once the question has been answered.
    pub fn stop(&mut self) {
        self.started_at = None;
        self.question_visible = false;
    }

    pub fn on_background(&mut self) {
        self.started_at = None;
    }

    pub fn on_foreground(&mut self, now: DateTime<Utc>) {
        if self.question_visible {
            self.started_at = Some(now);
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Zero when the clock is not running.
    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        match self.started_at {
            Some(started_at) => (now - started_at).max(TimeDelta::zero()),
            None => TimeDelta::zero(),
        }
    }
}
