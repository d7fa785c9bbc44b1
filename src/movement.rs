//! Movement capability predicates, including pre-computed step tables.
//!
//! Each predicate answers "may this piece reach that square?" for one
//! geometric shape, layered on a shared bounds/occupancy base check. None
//! of them mutate the board; per-kind legality composes them in
//! `Piece::can_move_to`.

use crate::board::Board;
use crate::constants::Side;
use crate::piece::Piece;
use once_cell::sync::Lazy;

/// What the base check demands of the destination square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Destination must be vacant (plain relocation).
    Empty,
    /// Destination must hold an opposing piece (capture).
    Enemy,
    /// Vacant or opposing (the common case).
    Any,
    /// Threat probing: occupancy of the destination is ignored.
    Threat,
}

/// Bounds, not-the-origin, and destination occupancy. Every capability
/// predicate starts here; out-of-range coordinates are rejected before any
/// rule logic runs.
pub fn dest_ok(board: &Board, piece: &Piece, row: isize, col: isize, target: Target) -> bool {
    if !board.in_bounds(row, col) {
        return false;
    }
    let (row, col) = (row as usize, col as usize);
    if row == piece.row && col == piece.col {
        return false;
    }
    match target {
        Target::Empty => !board.has_piece(row, col),
        Target::Enemy => board
            .piece_at(row, col)
            .map_or(false, |id| board.piece(id).side != piece.side),
        Target::Any => board
            .piece_at(row, col)
            .map_or(true, |id| board.piece(id).side != piece.side),
        Target::Threat => true,
    }
}

/// Offset tables for the fixed-shape movers. Built once and shared.
pub struct StepTables {
    /// One square in any of the eight directions.
    pub king: Vec<(isize, isize)>,
    /// One square orthogonally.
    pub orthogonal: Vec<(isize, isize)>,
    /// One square diagonally.
    pub diagonal: Vec<(isize, isize)>,
    /// Knight leaps; nothing can block them.
    pub knight: Vec<(isize, isize)>,
    /// Horse leaps paired with the adjacent "leg" square that must be empty.
    pub horse: Vec<((isize, isize), (isize, isize))>,
    /// Elephant leaps paired with the midpoint "eye" square that must be
    /// empty.
    pub elephant: Vec<((isize, isize), (isize, isize))>,
}

pub static STEP_TABLES: Lazy<StepTables> = Lazy::new(|| {
    let orthogonal = vec![(1, 0), (-1, 0), (0, 1), (0, -1)];
    let diagonal = vec![(1, 1), (1, -1), (-1, 1), (-1, -1)];
    let mut king = orthogonal.clone();
    king.extend(&diagonal);

    let mut knight = Vec::new();
    let mut horse = Vec::new();
    for (dr, dc) in [
        (2, 1),
        (2, -1),
        (-2, 1),
        (-2, -1),
        (1, 2),
        (1, -2),
        (-1, 2),
        (-1, -2),
    ] {
        knight.push((dr, dc));
        // The blocking leg sits one orthogonal step along the long axis.
        let leg = if isize::abs(dr) == 2 {
            (dr / 2, 0)
        } else {
            (0, dc / 2)
        };
        horse.push(((dr, dc), leg));
    }

    let elephant = diagonal
        .iter()
        .map(|&(dr, dc)| ((dr * 2, dc * 2), (dr, dc)))
        .collect();

    StepTables {
        king,
        orthogonal,
        diagonal,
        knight,
        horse,
        elephant,
    }
});

/// Single-step mover: the destination is one of the listed offsets away.
pub fn single_step(
    board: &Board,
    piece: &Piece,
    row: isize,
    col: isize,
    steps: &[(isize, isize)],
    target: Target,
) -> bool {
    if !dest_ok(board, piece, row, col, target) {
        return false;
    }
    let (dr, dc) = (row - piece.row as isize, col - piece.col as isize);
    steps.contains(&(dr, dc))
}

/// Unblockable leaper (knight).
pub fn leaper(
    board: &Board,
    piece: &Piece,
    row: isize,
    col: isize,
    leaps: &[(isize, isize)],
    target: Target,
) -> bool {
    single_step(board, piece, row, col, leaps, target)
}

/// Leaper whose leap is void when the paired leg square is occupied
/// (xiangqi horse and elephant).
pub fn blocked_leaper(
    board: &Board,
    piece: &Piece,
    row: isize,
    col: isize,
    leaps: &[((isize, isize), (isize, isize))],
    target: Target,
) -> bool {
    if !dest_ok(board, piece, row, col, target) {
        return false;
    }
    let delta = (row - piece.row as isize, col - piece.col as isize);
    for &(leap, leg) in leaps {
        if leap == delta {
            let (lr, lc) = (piece.row as isize + leg.0, piece.col as isize + leg.1);
            return board.in_bounds(lr, lc) && !board.has_piece(lr as usize, lc as usize);
        }
    }
    false
}

/// Walks from the square adjacent to the origin toward the destination and
/// reports whether every strictly intermediate square is empty. `from` and
/// `to` must be aligned on a row, column, or diagonal.
pub fn path_clear(board: &Board, from: (usize, usize), to: (usize, usize)) -> bool {
    intermediate_occupancy(board, from, to) == 0
}

/// Counts occupied squares strictly between two aligned squares, scanning
/// outward from the origin.
pub fn intermediate_occupancy(board: &Board, from: (usize, usize), to: (usize, usize)) -> usize {
    let dr = (to.0 as isize - from.0 as isize).signum();
    let dc = (to.1 as isize - from.1 as isize).signum();
    let mut count = 0;
    let (mut r, mut c) = (from.0 as isize + dr, from.1 as isize + dc);
    while (r, c) != (to.0 as isize, to.1 as isize) {
        if board.has_piece(r as usize, c as usize) {
            count += 1;
        }
        r += dr;
        c += dc;
    }
    count
}

/// Unobstructed move along a rank or file.
pub fn straight_line(board: &Board, piece: &Piece, row: isize, col: isize, target: Target) -> bool {
    if !dest_ok(board, piece, row, col, target) {
        return false;
    }
    let (row, col) = (row as usize, col as usize);
    if row != piece.row && col != piece.col {
        return false;
    }
    path_clear(board, (piece.row, piece.col), (row, col))
}

/// Unobstructed move along a diagonal.
pub fn diagonal_line(board: &Board, piece: &Piece, row: isize, col: isize, target: Target) -> bool {
    if !dest_ok(board, piece, row, col, target) {
        return false;
    }
    let (row, col) = (row as usize, col as usize);
    let dr = (row as isize - piece.row as isize).abs();
    let dc = (col as isize - piece.col as isize).abs();
    if dr != dc {
        return false;
    }
    path_clear(board, (piece.row, piece.col), (row, col))
}

/// Screen-jump capture (xiangqi cannon): straight line with exactly one
/// occupied square strictly between origin and destination.
pub fn screen_jump(board: &Board, piece: &Piece, row: isize, col: isize, target: Target) -> bool {
    if !dest_ok(board, piece, row, col, target) {
        return false;
    }
    let (row, col) = (row as usize, col as usize);
    if row != piece.row && col != piece.col {
        return false;
    }
    intermediate_occupancy(board, (piece.row, piece.col), (row, col)) == 1
}

// --- Variant geometry helpers (palace and river) ---

/// The 3x3 palace in front of each camp's back rank, centered on the middle
/// file.
pub fn in_palace(board: &Board, side: Side, row: usize, col: usize) -> bool {
    let mid = board.cols() / 2;
    if col + 1 < mid || col > mid + 1 {
        return false;
    }
    match side {
        Side::North => row <= 2,
        Side::South => row + 3 >= board.rows(),
        // Rotated palaces are not used by the shipped rule sets.
        Side::East | Side::West => false,
    }
}

/// Whether `row` lies beyond the river from `side`'s point of view.
pub fn across_river(board: &Board, side: Side, row: usize) -> bool {
    let half = board.rows() / 2;
    match side {
        Side::North => row >= half,
        Side::South => row < half,
        Side::East | Side::West => false,
    }
}
