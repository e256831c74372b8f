//! Scoreboard projection for the host HUD

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::{SessionClock, SessionTally};

/// Read-only snapshot of the numbers a HUD shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u32,
    pub coins: u32,
    pub gates_collected: u32,
    pub gates_total: u32,
    pub remaining_secs: u32,
    pub ended: bool,
}

impl Scoreboard {
    pub fn project(tally: &SessionTally, clock: &SessionClock, ended: bool) -> Self {
        Self {
            score: tally.score,
            coins: tally.coins,
            gates_collected: tally.gates_collected,
            gates_total: tally.gates_total,
            remaining_secs: clock.remaining(),
            ended,
        }
    }

    /// Remaining time as `m:ss`
    pub fn time_label(&self) -> String {
        format!("{}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Score {} | Coins {} | Gates {}/{} | {}",
            self.score,
            self.coins,
            self.gates_collected,
            self.gates_total,
            self.time_label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let tally = SessionTally {
            coins: 4,
            score: 40,
            gates_collected: 1,
            gates_total: 3,
            correct_answers: 0,
        };
        let mut clock = SessionClock::new(46);
        clock.advance(1.0);
        let board = Scoreboard::project(&tally, &clock, false);
        assert_eq!(board.to_string(), "Score 40 | Coins 4 | Gates 1/3 | 0:45");
    }

    #[test]
    fn test_time_label() {
        let board = Scoreboard {
            score: 0,
            coins: 0,
            gates_collected: 0,
            gates_total: 0,
            remaining_secs: 125,
            ended: false,
        };
        assert_eq!(board.time_label(), "2:05");
    }
}
