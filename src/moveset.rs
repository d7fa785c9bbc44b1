//! The move-instruction model: one proposed destination becomes an ordered
//! list of atomic relocations applied (and reverted) as a single
//! transaction.
//!
//! A plain move is one relocation. Castling is two. En passant is one
//! relocation whose captured piece does not stand on the destination
//! square. The `reversible` flag feeds the no-progress draw counter and is
//! deliberately decoupled from "captured something": a pawn or soldier
//! advance resets the counter even though nothing was taken.

use crate::board::{Board, PieceId};
use crate::constants::PieceKind;
use crate::piece::en_passant_victim;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    pub piece: PieceId,
    pub captured: Option<PieceId>,
    pub to: (usize, usize),
    /// False when this relocation counts as progress for draw purposes.
    pub reversible: bool,
}

/// Ordered, non-empty list of relocations making up one move. Order matters
/// only for presentation; application and reversal treat the whole set as
/// one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSet {
    relocations: Vec<Relocation>,
}

impl MoveSet {
    fn single(relocation: Relocation) -> Self {
        Self {
            relocations: vec![relocation],
        }
    }

    pub fn relocations(&self) -> &[Relocation] {
        &self.relocations
    }

    /// True if any relocation in the set resets the no-progress counter.
    pub fn makes_progress(&self) -> bool {
        self.relocations.iter().any(|r| !r.reversible)
    }
}

/// Expands a destination-valid move into its relocations. Assumes the
/// destination already passed `Piece::can_move_to`; this model only decides
/// what gets displaced where.
pub fn move_instructions(board: &Board, id: PieceId, row: usize, col: usize) -> MoveSet {
    let piece = board.piece(id);

    // Castling: the king travels two files, the rook jumps to the square
    // the king crossed. Both relocations stay reversible.
    if piece.kind == PieceKind::King && row == piece.row {
        let dc = col as isize - piece.col as isize;
        if dc.abs() == 2 {
            let rook_col = if dc > 0 { board.cols() - 1 } else { 0 };
            let crossed_col = (piece.col as isize + dc.signum()) as usize;
            let mut relocations = vec![Relocation {
                piece: id,
                captured: None,
                to: (row, col),
                reversible: true,
            }];
            if let Some(rook) = board.piece_at(row, rook_col) {
                relocations.push(Relocation {
                    piece: rook,
                    captured: None,
                    to: (row, crossed_col),
                    reversible: true,
                });
            }
            return MoveSet { relocations };
        }
    }

    // En passant: diagonal pawn move onto an empty square displaces the
    // double-stepped pawn beside the origin.
    if piece.kind == PieceKind::Pawn && col != piece.col && !board.has_piece(row, col) {
        if let Some(victim) = en_passant_victim(board, piece, col) {
            return MoveSet::single(Relocation {
                piece: id,
                captured: Some(victim),
                to: (row, col),
                reversible: false,
            });
        }
    }

    let captured = board.piece_at(row, col);
    let pawn_advance = piece.kind.is_pawn_like() && captured.is_none();
    MoveSet::single(Relocation {
        piece: id,
        captured,
        to: (row, col),
        reversible: captured.is_none() && !pawn_advance,
    })
}
