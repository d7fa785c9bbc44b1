//! Immutable position snapshots for repetition detection.
//!
//! A snapshot is the full board contents plus the side to move. Snapshots
//! accumulate for the life of a game and are only ever counted, never
//! removed. Equality is structural (kind, side, square, side-to-move); the
//! Zobrist hash is a pre-filter so most comparisons stop at one `u64`.

use crate::constants::{PieceKind, Side, MAX_DIM};
use crate::zobrist::ZOBRIST;

#[derive(Debug, Clone)]
pub struct Position {
    /// Sorted by square so equal occupancies compare equal regardless of
    /// slab order.
    pieces: Vec<(PieceKind, Side, usize, usize)>,
    to_move: Side,
    hash: u64,
}

impl Position {
    pub fn new(mut pieces: Vec<(PieceKind, Side, usize, usize)>, to_move: Side) -> Self {
        pieces.sort_by_key(|&(_, _, row, col)| (row, col));
        let mut hash = ZOBRIST.side_to_move[to_move.index()];
        for &(kind, side, row, col) in &pieces {
            hash ^= ZOBRIST.piece_square[kind.index()][side.index()][row * MAX_DIM + col];
        }
        Self {
            pieces,
            to_move,
            hash,
        }
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.to_move == other.to_move && self.pieces == other.pieces
    }
}

impl Eq for Position {}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(pieces: Vec<(PieceKind, Side, usize, usize)>, to_move: Side) -> Position {
        Position::new(pieces, to_move)
    }

    #[test]
    fn equality_ignores_listing_order() {
        let a = pos(
            vec![
                (PieceKind::King, Side::South, 7, 4),
                (PieceKind::Rook, Side::North, 0, 0),
            ],
            Side::South,
        );
        let b = pos(
            vec![
                (PieceKind::Rook, Side::North, 0, 0),
                (PieceKind::King, Side::South, 7, 4),
            ],
            Side::South,
        );
        assert_eq!(a, b);
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.piece_count(), 2);
    }

    #[test]
    fn side_to_move_distinguishes_positions() {
        let pieces = vec![(PieceKind::King, Side::South, 7, 4)];
        let a = pos(pieces.clone(), Side::South);
        let b = pos(pieces, Side::North);
        assert_eq!(a.to_move(), Side::South);
        assert_eq!(b.to_move(), Side::North);
        assert_ne!(a, b);
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn moved_piece_changes_hash_and_equality() {
        let a = pos(vec![(PieceKind::Chariot, Side::North, 0, 0)], Side::South);
        let b = pos(vec![(PieceKind::Chariot, Side::North, 0, 1)], Side::South);
        assert_ne!(a, b);
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn kind_matters_even_on_the_same_square() {
        let a = pos(vec![(PieceKind::Rook, Side::North, 3, 3)], Side::North);
        let b = pos(vec![(PieceKind::Chariot, Side::North, 3, 3)], Side::North);
        assert_ne!(a, b);
    }
}
