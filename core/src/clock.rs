//! Season clock: owns the season cycle and the transition cue timer.

use crate::types::Seconds;
use serde::{Deserialize, Serialize};

/// The four seasons, in cycle order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Season {
    #[default]
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn next(self) -> Season {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Fall,
            Season::Fall   => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall   => "Fall",
            Season::Winter => "Winter",
        }
    }

    /// Position in the cycle, Spring = 0.
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonClock {
    pub season:           Season,
    /// Time accrued in the current season.
    pub elapsed:          Seconds,
    /// Countdown for the presentation-only season change cue.
    pub transition_timer: Seconds,
    season_duration:      Seconds,
    transition_duration:  Seconds,
}

impl SeasonClock {
    pub fn new(season: Season, season_duration: Seconds, transition_duration: Seconds) -> Self {
        Self {
            season,
            elapsed: 0.0,
            transition_timer: 0.0,
            season_duration,
            transition_duration,
        }
    }

    /// Advance by `dt` seconds. Returns how many season changes happened.
    ///
    /// A `dt` spanning several seasons rolls over once per full season and
    /// carries the remainder, so splitting the same total time into
    /// different step sizes lands on the same season.
    pub fn advance(&mut self, dt: Seconds) -> u32 {
        if !(dt.is_finite() && dt > 0.0) {
            return 0;
        }

        self.elapsed += dt;
        let mut rollovers = 0;
        if self.season_duration > 0.0 {
            while self.elapsed >= self.season_duration {
                self.elapsed -= self.season_duration;
                self.season = self.season.next();
                self.transition_timer = self.transition_duration;
                rollovers += 1;
            }
        }

        self.transition_timer = (self.transition_timer - dt).max(0.0);
        rollovers
    }

    pub fn season_duration(&self) -> Seconds {
        self.season_duration
    }

    /// Fraction of the current season already elapsed, in [0, 1).
    pub fn progress(&self) -> f64 {
        if self.season_duration > 0.0 {
            self.elapsed / self.season_duration
        } else {
            0.0
        }
    }

    pub fn time_left(&self) -> Seconds {
        (self.season_duration - self.elapsed).max(0.0)
    }

    /// Visual intensity of the season change cue, 0..=255.
    pub fn transition_alpha(&self) -> u8 {
        if self.transition_timer <= 0.0 || self.transition_duration <= 0.0 {
            return 0;
        }
        let ratio = (self.transition_timer / self.transition_duration).clamp(0.0, 1.0);
        (ratio * 255.0) as u8
    }
}
