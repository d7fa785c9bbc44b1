//! Speculative move application and the self-check test.
//!
//! A move set is applied through the board's silent mutation primitives,
//! the mover's royal piece is queried for check, and then every relocation
//! is unwound in reverse. The revert must leave occupancy and every
//! piece's coordinates exactly as they were; all legality queries in the
//! engine lean on that property. The apply/revert pair is formalized as an
//! `UndoToken` so the exact reversal is mechanically checkable in tests
//! instead of relying on call-site discipline.

use crate::board::{Board, PieceId};
use crate::moveset::{move_instructions, MoveSet};
use crate::piece::is_in_check;

#[derive(Debug)]
struct AppliedRelocation {
    piece: PieceId,
    from: (usize, usize),
    captured: Option<(PieceId, (usize, usize))>,
}

/// Proof of a speculative application; consumed by `revert`. Not reentrant:
/// only one token may be outstanding per board.
#[derive(Debug)]
#[must_use = "an applied move set must be reverted"]
pub struct UndoToken {
    steps: Vec<AppliedRelocation>,
}

/// Applies every relocation through the silent mutation primitives and
/// records what it takes to put things back.
pub fn apply_quietly(board: &mut Board, moves: &MoveSet) -> UndoToken {
    let mut steps = Vec::with_capacity(moves.relocations().len());
    for relocation in moves.relocations() {
        let mover = board.piece(relocation.piece);
        let from = (mover.row, mover.col);
        let captured = relocation.captured.map(|id| {
            let victim = board.piece(id);
            (id, (victim.row, victim.col))
        });
        if let Some((_, (vr, vc))) = captured {
            board.simulate_remove_piece(vr, vc);
        }
        board.simulate_remove_piece(from.0, from.1);
        board.simulate_add_piece(relocation.piece, relocation.to.0, relocation.to.1);
        steps.push(AppliedRelocation {
            piece: relocation.piece,
            from,
            captured,
        });
    }
    UndoToken { steps }
}

/// Unwinds a speculative application in reverse order, restoring prior
/// occupancy and piece coordinates bit for bit.
pub fn revert(board: &mut Board, token: UndoToken) {
    for step in token.steps.into_iter().rev() {
        let (row, col) = {
            let mover = board.piece(step.piece);
            (mover.row, mover.col)
        };
        board.simulate_remove_piece(row, col);
        if let Some((victim, (vr, vc))) = step.captured {
            board.simulate_add_piece(victim, vr, vc);
        }
        board.simulate_add_piece(step.piece, step.from.0, step.from.1);
    }
}

/// True when moving `id` to the destination is illegal: either the
/// destination fails ordinary legality, or the completed move would leave
/// (or place) the mover's own royal piece in check.
pub fn is_check_move(board: &mut Board, id: PieceId, row: usize, col: usize) -> bool {
    let side = {
        let piece = board.piece(id);
        if !piece.on_board || !piece.can_move_to(board, row, col) {
            return true;
        }
        piece.side
    };
    let moves = move_instructions(board, id, row, col);
    let token = apply_quietly(board, &moves);
    let exposed = is_in_check(board, side);
    revert(board, token);
    exposed
}
