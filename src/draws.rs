//! # Draw history
//!
//! Historical draws, one `d`-number draw per line in the ticket file format, and the win
//! check: a collection wins a draw when at least one of its tickets contains every number
//! of that draw.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::DesignParameters;
use crate::error::{CoverError, Result, ResultExt};
use crate::io::parse_line;
use crate::ticket::{Ticket, TicketCollection};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawHistory {
    draws: Vec<Ticket>,
}

impl DrawHistory {
    pub fn new(draws: Vec<Ticket>) -> Self {
        Self { draws }
    }

    /// Reads draws, requiring exactly `draw_size` numbers per line.
    pub fn read<R: BufRead>(reader: R, params: &DesignParameters) -> Result<Self> {
        let mut draws = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let Some(draw) = parse_line(&line?, line_number, params.universe_size())? else {
                continue;
            };
            draw.expect_size(params.draw_size())
                .map_err(|e| CoverError::Parse {
                    line: line_number,
                    message: e.to_string(),
                })?;
            draws.push(draw);
        }
        Ok(Self { draws })
    }

    pub fn load(path: impl AsRef<Path>, params: &DesignParameters) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).context(format!("Failed to open {}", path.display()))?;
        Self::read(BufReader::new(file), params)
    }

    pub fn draws(&self) -> &[Ticket] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Checks every draw against `tickets`.
    pub fn check(&self, tickets: &TicketCollection) -> WinReport {
        let wins = self
            .draws
            .iter()
            .enumerate()
            .filter(|(_, draw)| tickets.iter().any(|t| t.is_superset_of(draw.elements())))
            .map(|(i, _)| i)
            .collect();
        WinReport {
            wins,
            draws: self.draws.len(),
        }
    }
}

/// Which draws a collection won.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinReport {
    /// Indices of the won draws, ascending.
    pub wins: Vec<usize>,
    pub draws: usize,
}

impl WinReport {
    pub fn win_count(&self) -> usize {
        self.wins.len()
    }

    /// Share of draws won; zero without draws.
    pub fn win_rate(&self) -> f64 {
        if self.draws == 0 {
            0.0
        } else {
            self.wins.len() as f64 / self.draws as f64
        }
    }
}

impl fmt::Display for WinReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} draws won ({:.2}%)",
            self.win_count(),
            self.draws,
            self.win_rate() * 100.0
        )
    }
}
