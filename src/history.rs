use std::fmt;

use crate::coord::Coord;
use crate::event::Event;
use crate::piece::{Color, Piece};

/// Log of applied events.
///
/// Also counts, per square, how many recorded relocations started there. The
/// count goes back down when an event is popped, so undoing a king or rook
/// move restores the castling right it forfeited.
#[derive(Clone, Debug)]
pub struct History {
    events: Vec<Event>,
    departures: [u32; 64],
    captured: [Vec<Piece>; 2],
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        History {
            events: Vec::with_capacity(64),
            departures: [0; 64],
            captured: [Vec::new(), Vec::new()],
        }
    }

    pub fn add_event(&mut self, event: Event) {
        for from_to in &event.relocations {
            self.departures[from_to.from.key() as usize] += 1;
        }
        if let Some(captured) = event.captured {
            self.captured[captured.piece.color.index()].push(captured.piece);
        }
        self.events.push(event);
    }

    /// Remove and return the most recent event, reversing its bookkeeping.
    /// The caller is responsible for undoing it on the board.
    pub fn pop_event(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        for from_to in &event.relocations {
            self.departures[from_to.from.key() as usize] -= 1;
        }
        if let Some(captured) = event.captured {
            self.captured[captured.piece.color.index()].pop();
        }
        Some(event)
    }

    pub fn last_event(&self) -> Option<&Event> {
        self.events.last()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Whether a piece has ever departed `coord` in the recorded events.
    pub fn has_moved(&self, coord: Coord) -> bool {
        self.departures[coord.key() as usize] > 0
    }

    /// Pieces of `color` that have been captured, in capture order.
    pub fn captured(&self, color: Color) -> &[Piece] {
        &self.captured[color.index()]
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, event) in self.events.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write!(f, "{event}")?;
        }
        Ok(())
    }
}
