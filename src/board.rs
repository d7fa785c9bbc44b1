//! The mutable grid that holds the pieces of one game.
//!
//! The board owns every `Piece` for the lifetime of the game in a slab;
//! squares store slab indices. Captured pieces stay in the slab (off the
//! grid) so that speculative move application can put them back exactly
//! where they were.
//!
//! Every mutation path comes in two flavors with identical bookkeeping:
//! `add_piece`/`remove_piece` additionally push a `DisplayEvent`, while the
//! `simulate_` pair is silent and exists for the check-detection engine.
//! The core consistency invariant is that a piece's stored (row, col) and
//! its slot in the grid always agree.

use crate::constants::{PieceKind, Side};
use crate::display::{DisplayEvent, DisplaySink};
use crate::piece::Piece;
use crate::position::Position;
use std::fmt;

/// Stable handle to a piece in the board's slab. Valid for the lifetime of
/// the board that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId(pub(crate) usize);

#[derive(Debug)]
pub struct Board {
    rows: usize,
    cols: usize,
    grid: Vec<Option<PieceId>>,
    pieces: Vec<Piece>,
    display: DisplaySink,
}

impl Board {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_display(rows, cols, DisplaySink::detached())
    }

    pub fn with_display(rows: usize, cols: usize, display: DisplaySink) -> Self {
        Self {
            rows,
            cols,
            grid: vec![None; rows * cols],
            pieces: Vec::new(),
            display,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && (row as usize) < self.rows && col >= 0 && (col as usize) < self.cols
    }

    fn idx(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    pub fn has_piece(&self, row: usize, col: usize) -> bool {
        self.grid[self.idx(row, col)].is_some()
    }

    pub fn piece_at(&self, row: usize, col: usize) -> Option<PieceId> {
        self.grid[self.idx(row, col)]
    }

    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.0]
    }

    pub fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.pieces[id.0]
    }

    /// Creates a piece at setup time and places it visibly.
    pub fn spawn(
        &mut self,
        side: Side,
        kind: PieceKind,
        glyph: char,
        row: usize,
        col: usize,
    ) -> PieceId {
        let id = PieceId(self.pieces.len());
        self.pieces.push(Piece::new(side, kind, glyph, row, col));
        self.add_piece(id, row, col);
        id
    }

    // --- Shared bookkeeping for all four mutation paths ---

    fn place(&mut self, id: PieceId, row: usize, col: usize) {
        let slot = self.idx(row, col);
        debug_assert!(self.grid[slot].is_none(), "square already occupied");
        self.grid[slot] = Some(id);
        let piece = &mut self.pieces[id.0];
        piece.row = row;
        piece.col = col;
        piece.on_board = true;
    }

    fn lift(&mut self, row: usize, col: usize) -> Option<PieceId> {
        let slot = self.idx(row, col);
        let id = self.grid[slot].take()?;
        self.pieces[id.0].on_board = false;
        Some(id)
    }

    // --- Visible mutation: identical bookkeeping plus display traffic ---

    pub fn add_piece(&mut self, id: PieceId, row: usize, col: usize) {
        self.place(id, row, col);
        let piece = &self.pieces[id.0];
        self.display.send(DisplayEvent::FilledSquare {
            row,
            col,
            side: piece.side,
            kind: piece.kind,
            glyph: piece.glyph,
        });
    }

    pub fn remove_piece(&mut self, row: usize, col: usize) -> Option<PieceId> {
        let id = self.lift(row, col)?;
        self.display.send(DisplayEvent::EmptySquare { row, col });
        Some(id)
    }

    // --- Silent mutation, used only while probing moves for check ---

    pub fn simulate_add_piece(&mut self, id: PieceId, row: usize, col: usize) {
        self.place(id, row, col);
    }

    pub fn simulate_remove_piece(&mut self, row: usize, col: usize) -> Option<PieceId> {
        self.lift(row, col)
    }

    /// Re-emits the display event for one square, e.g. after a promotion
    /// changed the piece standing on it.
    pub fn redisplay(&self, row: usize, col: usize) {
        match self.piece_at(row, col) {
            Some(id) => {
                let piece = &self.pieces[id.0];
                self.display.send(DisplayEvent::FilledSquare {
                    row,
                    col,
                    side: piece.side,
                    kind: piece.kind,
                    glyph: piece.glyph,
                });
            }
            None => self.display.send(DisplayEvent::EmptySquare { row, col }),
        }
    }

    pub fn highlight(&self, on: bool, row: usize, col: usize) {
        self.display.send(DisplayEvent::Highlight { on, row, col });
    }

    // --- Queries used by the rule layer ---

    /// Every piece currently standing on the grid.
    pub fn piece_ids(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.pieces
            .iter()
            .enumerate()
            .filter(|(_, p)| p.on_board)
            .map(|(i, _)| PieceId(i))
    }

    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = PieceId> + '_ {
        self.pieces
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.on_board && p.side == side)
            .map(|(i, _)| PieceId(i))
    }

    /// The royal piece of `side`, if it is on the board. Setup places
    /// exactly one per side, so a missing royal only happens in
    /// hand-constructed test positions.
    pub fn royal_of(&self, side: Side) -> Option<PieceId> {
        self.pieces_of(side)
            .find(|&id| self.piece(id).kind.is_royal())
    }

    /// Clears the one-ply special-move window on every piece except the
    /// ones that just moved.
    pub fn clear_just_moved_except(&mut self, movers: &[PieceId]) {
        for (i, piece) in self.pieces.iter_mut().enumerate() {
            if !movers.contains(&PieceId(i)) {
                piece.just_moved = false;
            }
        }
    }

    /// Deep-copies the current occupancy into a snapshot for repetition
    /// counting.
    pub fn snapshot(&self, to_move: Side) -> Position {
        let entries = self
            .pieces
            .iter()
            .filter(|p| p.on_board)
            .map(|p| (p.kind, p.side, p.row, p.col))
            .collect();
        Position::new(entries, to_move)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                match self.piece_at(row, col) {
                    Some(id) => write!(f, "{} ", self.piece(id).glyph)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{PieceKind, Side};
    use std::sync::mpsc;

    #[test]
    fn add_and_remove_keep_piece_coordinates_in_sync() {
        let mut board = Board::new(8, 8);
        let id = board.spawn(Side::South, PieceKind::Rook, 'R', 4, 4);
        assert_eq!(board.piece_at(4, 4), Some(id));
        assert_eq!((board.piece(id).row, board.piece(id).col), (4, 4));

        let lifted = board.remove_piece(4, 4).unwrap();
        assert_eq!(lifted, id);
        assert!(!board.has_piece(4, 4));
        assert!(!board.piece(id).on_board);

        board.add_piece(id, 2, 7);
        assert_eq!(board.piece_at(2, 7), Some(id));
        assert_eq!((board.piece(id).row, board.piece(id).col), (2, 7));
    }

    #[test]
    fn simulate_paths_match_visible_paths_without_display_traffic() {
        let (tx, rx) = mpsc::channel();
        let mut board = Board::with_display(8, 8, DisplaySink::attached(tx));
        let id = board.spawn(Side::North, PieceKind::Knight, 'n', 0, 1);
        assert!(rx.try_recv().is_ok()); // spawn is visible
        assert!(rx.try_recv().is_err());

        board.simulate_remove_piece(0, 1);
        board.simulate_add_piece(id, 2, 2);
        assert!(rx.try_recv().is_err()); // silent
        assert_eq!(board.piece_at(2, 2), Some(id));
        assert_eq!((board.piece(id).row, board.piece(id).col), (2, 2));

        board.highlight(true, 2, 2);
        assert_eq!(
            rx.try_recv().unwrap(),
            DisplayEvent::Highlight {
                on: true,
                row: 2,
                col: 2
            }
        );
    }

    #[test]
    fn remove_from_empty_square_is_none() {
        let mut board = Board::new(8, 8);
        assert_eq!(board.remove_piece(3, 3), None);
    }

    #[test]
    fn royal_lookup_finds_only_the_matching_side() {
        let mut board = Board::new(8, 8);
        board.spawn(Side::South, PieceKind::King, 'K', 7, 4);
        board.spawn(Side::North, PieceKind::Rook, 'r', 0, 0);
        assert!(board.royal_of(Side::South).is_some());
        assert!(board.royal_of(Side::North).is_none());
    }

    #[test]
    fn snapshot_ignores_captured_pieces() {
        let mut board = Board::new(8, 8);
        board.spawn(Side::South, PieceKind::King, 'K', 7, 4);
        let pawn = board.spawn(Side::North, PieceKind::Pawn, 'p', 1, 0);
        let before = board.snapshot(Side::South);
        board.remove_piece(1, 0);
        let after = board.snapshot(Side::South);
        assert_ne!(before, after);
        assert_eq!(after.piece_count(), before.piece_count() - 1);
        board.add_piece(pawn, 1, 0);
        assert_eq!(before, board.snapshot(Side::South));
    }
}
