//! Message-passing boundary between the engine and a renderer.
//!
//! The board never calls into presentation code directly; every visible
//! mutation pushes a `DisplayEvent` into a channel, and whatever thread owns
//! the visual surface drains it. A board without a sender attached simply
//! drops the events.

use crate::constants::{PieceKind, Side};
use std::sync::mpsc::Sender;

/// What a renderer needs to redraw one square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    EmptySquare {
        row: usize,
        col: usize,
    },
    FilledSquare {
        row: usize,
        col: usize,
        side: Side,
        kind: PieceKind,
        glyph: char,
    },
    Highlight {
        on: bool,
        row: usize,
        col: usize,
    },
}

/// Non-blocking event sink held by `Board`. A disconnected receiver is not an
/// error; the game outlives its renderer during shutdown.
#[derive(Debug, Clone, Default)]
pub struct DisplaySink {
    tx: Option<Sender<DisplayEvent>>,
}

impl DisplaySink {
    pub fn detached() -> Self {
        Self { tx: None }
    }

    pub fn attached(tx: Sender<DisplayEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn send(&self, event: DisplayEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}
