//! Zobrist keys for position hashing.
//!
//! Repetition detection compares full position snapshots; the hash is only a
//! cheap pre-filter so the structural comparison runs rarely.

use crate::constants::{NUM_PIECE_KINDS, MAX_DIM};
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct ZobristKeys {
    /// Indexed by [piece kind][side][row * MAX_DIM + col].
    pub piece_square: Vec<[[u64; MAX_DIM * MAX_DIM]; 4]>,
    /// One key per side to move.
    pub side_to_move: [u64; 4],
}

/// Fixed seed so hashes are stable across runs.
const ZOBRIST_SEED: u64 = 0x5eed_c0de_1234_5678;

pub static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
    let mut piece_square = Vec::with_capacity(NUM_PIECE_KINDS);
    for _ in 0..NUM_PIECE_KINDS {
        let mut per_kind = [[0u64; MAX_DIM * MAX_DIM]; 4];
        for per_side in per_kind.iter_mut() {
            for key in per_side.iter_mut() {
                *key = rng.gen();
            }
        }
        piece_square.push(per_kind);
    }
    let mut side_to_move = [0u64; 4];
    for key in side_to_move.iter_mut() {
        *key = rng.gen();
    }
    ZobristKeys {
        piece_square,
        side_to_move,
    }
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{PieceKind, Side};

    #[test]
    fn keys_are_stable_and_nonzero() {
        let k1 = ZOBRIST.piece_square[PieceKind::King.index()][Side::North.index()][0];
        let k2 = ZOBRIST.piece_square[PieceKind::King.index()][Side::North.index()][0];
        assert_eq!(k1, k2);
        assert_ne!(k1, 0);
    }

    #[test]
    fn distinct_slots_get_distinct_keys() {
        let a = ZOBRIST.piece_square[PieceKind::Pawn.index()][Side::South.index()][17];
        let b = ZOBRIST.piece_square[PieceKind::Pawn.index()][Side::South.index()][18];
        let c = ZOBRIST.piece_square[PieceKind::Soldier.index()][Side::South.index()][17];
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
