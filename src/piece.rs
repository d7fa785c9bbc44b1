//! Piece state and per-kind move legality.
//!
//! Legality is a boolean composition of the capability predicates in
//! `movement`, selected by a `match` over `PieceKind` so the dispatch stays
//! closed and exhaustive. "May move there" and "threatens that square" are
//! separate questions: a pawn advances straight but only captures
//! diagonally, so its forward squares are never threats.

use crate::board::{Board, PieceId};
use crate::constants::{PieceKind, Side};
use crate::movement::{
    self, blocked_leaper, diagonal_line, dest_ok, in_palace, leaper, screen_jump, single_step,
    straight_line, Target, STEP_TABLES,
};

#[derive(Debug, Clone)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
    pub row: usize,
    pub col: usize,
    /// Number of completed moves; gates castling and the pawn double step.
    pub move_count: u32,
    /// True for exactly one ply after this piece moved.
    pub just_moved: bool,
    /// Whether the piece currently stands on the grid.
    pub on_board: bool,
    /// Opaque display handle, also the piece's notation character.
    pub glyph: char,
}

impl Piece {
    pub fn new(side: Side, kind: PieceKind, glyph: char, row: usize, col: usize) -> Self {
        Self {
            side,
            kind,
            row,
            col,
            move_count: 0,
            just_moved: false,
            on_board: false,
            glyph,
        }
    }

    pub fn is_royal(&self) -> bool {
        self.kind.is_royal()
    }

    /// Full geometric legality for a proposed destination, not including the
    /// self-check test (that belongs to the check-detection engine).
    pub fn can_move_to(&self, board: &Board, row: usize, col: usize) -> bool {
        let (r, c) = (row as isize, col as isize);
        match self.kind {
            PieceKind::King => {
                single_step(board, self, r, c, &STEP_TABLES.king, Target::Any)
                    || castle_move(board, self, row, col)
            }
            PieceKind::Queen => {
                straight_line(board, self, r, c, Target::Any)
                    || diagonal_line(board, self, r, c, Target::Any)
            }
            PieceKind::Rook | PieceKind::Chariot => straight_line(board, self, r, c, Target::Any),
            PieceKind::Bishop => diagonal_line(board, self, r, c, Target::Any),
            PieceKind::Knight => leaper(board, self, r, c, &STEP_TABLES.knight, Target::Any),
            PieceKind::Pawn => pawn_move(board, self, row, col),
            PieceKind::General => {
                single_step(board, self, r, c, &STEP_TABLES.orthogonal, Target::Any)
                    && in_palace(board, self.side, row, col)
            }
            PieceKind::Advisor => {
                single_step(board, self, r, c, &STEP_TABLES.diagonal, Target::Any)
                    && in_palace(board, self.side, row, col)
            }
            PieceKind::Elephant => {
                blocked_leaper(board, self, r, c, &STEP_TABLES.elephant, Target::Any)
                    && !movement::across_river(board, self.side, row)
            }
            PieceKind::Horse => {
                blocked_leaper(board, self, r, c, &STEP_TABLES.horse, Target::Any)
            }
            PieceKind::Cannon => {
                straight_line(board, self, r, c, Target::Empty)
                    || screen_jump(board, self, r, c, Target::Enemy)
            }
            PieceKind::Soldier => soldier_step(board, self, r, c, Target::Any),
        }
    }

    /// Capture-shape reachability, with destination occupancy ignored. This
    /// is what check detection and castling-transit tests ask: could this
    /// piece capture on that square if an enemy stood there?
    pub fn threatens(&self, board: &Board, row: usize, col: usize) -> bool {
        let (r, c) = (row as isize, col as isize);
        match self.kind {
            PieceKind::King => single_step(board, self, r, c, &STEP_TABLES.king, Target::Threat),
            PieceKind::Queen => {
                straight_line(board, self, r, c, Target::Threat)
                    || diagonal_line(board, self, r, c, Target::Threat)
            }
            PieceKind::Rook | PieceKind::Chariot => {
                straight_line(board, self, r, c, Target::Threat)
            }
            PieceKind::Bishop => diagonal_line(board, self, r, c, Target::Threat),
            PieceKind::Knight => leaper(board, self, r, c, &STEP_TABLES.knight, Target::Threat),
            // Pawns threaten diagonally forward only; the advance squares do
            // not count.
            PieceKind::Pawn => {
                dest_ok(board, self, r, c, Target::Threat)
                    && r == self.row as isize + self.side.forward()
                    && (c - self.col as isize).abs() == 1
            }
            PieceKind::General => {
                single_step(board, self, r, c, &STEP_TABLES.orthogonal, Target::Threat)
                    && in_palace(board, self.side, row, col)
            }
            PieceKind::Advisor => {
                single_step(board, self, r, c, &STEP_TABLES.diagonal, Target::Threat)
                    && in_palace(board, self.side, row, col)
            }
            PieceKind::Elephant => {
                blocked_leaper(board, self, r, c, &STEP_TABLES.elephant, Target::Threat)
                    && !movement::across_river(board, self.side, row)
            }
            PieceKind::Horse => {
                blocked_leaper(board, self, r, c, &STEP_TABLES.horse, Target::Threat)
            }
            PieceKind::Cannon => screen_jump(board, self, r, c, Target::Threat),
            PieceKind::Soldier => soldier_step(board, self, r, c, Target::Threat),
        }
    }

    /// Every geometrically legal destination on the board.
    pub fn destinations(&self, board: &Board) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                if self.can_move_to(board, row, col) {
                    out.push((row, col));
                }
            }
        }
        out
    }
}

/// Pawn legality: one forward onto empty, two forward from the start square
/// with both squares empty, diagonal capture, or en passant against a pawn
/// that double-advanced on the immediately preceding ply.
fn pawn_move(board: &Board, pawn: &Piece, row: usize, col: usize) -> bool {
    let (r, c) = (row as isize, col as isize);
    if !board.in_bounds(r, c) {
        return false;
    }
    let f = pawn.side.forward();
    let (pr, pc) = (pawn.row as isize, pawn.col as isize);

    // Forward advances require empty squares.
    if c == pc && r == pr + f {
        return dest_ok(board, pawn, r, c, Target::Empty);
    }
    if c == pc
        && r == pr + 2 * f
        && pawn.move_count == 0
        && pawn.row == pawn_start_row(board, pawn.side)
    {
        return dest_ok(board, pawn, r, c, Target::Empty)
            && !board.has_piece((pr + f) as usize, pawn.col);
    }

    // Diagonal: plain capture, or en passant onto the empty transit square.
    if r == pr + f && (c - pc).abs() == 1 {
        if dest_ok(board, pawn, r, c, Target::Enemy) {
            return true;
        }
        if !board.has_piece(row, col) {
            return en_passant_victim(board, pawn, col).is_some();
        }
    }
    false
}

/// The enemy pawn that may be captured en passant by `pawn` moving onto
/// file `col`, if the one-ply window is open.
pub fn en_passant_victim(board: &Board, pawn: &Piece, col: usize) -> Option<PieceId> {
    if pawn.kind != PieceKind::Pawn {
        return None;
    }
    let id = board.piece_at(pawn.row, col)?;
    let victim = board.piece(id);
    if victim.side == pawn.side || victim.kind != PieceKind::Pawn {
        return None;
    }
    // Must have double-advanced on the immediately preceding ply: its one
    // and only move landed it two rows from its start rank.
    let start = pawn_start_row(board, victim.side);
    let double_row = start as isize + 2 * victim.side.forward();
    if victim.just_moved && victim.move_count == 1 && victim.row as isize == double_row {
        Some(id)
    } else {
        None
    }
}

pub fn pawn_start_row(board: &Board, side: Side) -> usize {
    match side {
        Side::North => 1,
        _ => board.rows() - 2,
    }
}

/// Soldier step: one square forward, plus one square sideways once the
/// soldier has crossed the river. Never backward; capture geometry is the
/// same as movement.
fn soldier_step(board: &Board, soldier: &Piece, r: isize, c: isize, target: Target) -> bool {
    if !dest_ok(board, soldier, r, c, target) {
        return false;
    }
    let f = soldier.side.forward();
    let (sr, sc) = (soldier.row as isize, soldier.col as isize);
    if r == sr + f && c == sc {
        return true;
    }
    if r == sr && (c - sc).abs() == 1 {
        return movement::across_river(board, soldier.side, soldier.row);
    }
    false
}

/// Castling as a king destination: two files toward an unmoved rook of the
/// same side, all squares between them empty, with the king neither in
/// check now nor passing through or landing on a threatened square. A
/// missing or wrong partner piece simply makes the destination illegal.
fn castle_move(board: &Board, king: &Piece, row: usize, col: usize) -> bool {
    if king.kind != PieceKind::King || king.move_count > 0 {
        return false;
    }
    if row != king.row || !board.in_bounds(row as isize, col as isize) {
        return false;
    }
    let dc = col as isize - king.col as isize;
    if dc.abs() != 2 {
        return false;
    }
    let rook_col = if dc > 0 { board.cols() - 1 } else { 0 };
    let rook = match board.piece_at(row, rook_col) {
        Some(id) => board.piece(id),
        None => return false,
    };
    if rook.kind != PieceKind::Rook || rook.side != king.side || rook.move_count > 0 {
        return false;
    }
    if !movement::path_clear(board, (king.row, king.col), (row, rook_col)) {
        return false;
    }
    // Origin, transit, and destination squares must all be safe.
    let step = dc.signum();
    for i in 0..=2 {
        let transit = (king.col as isize + i * step) as usize;
        if square_threatened_by(board, king.side.opponent(), row, transit) {
            return false;
        }
    }
    true
}

/// Whether any piece of `side` threatens the given square.
pub fn square_threatened_by(board: &Board, side: Side, row: usize, col: usize) -> bool {
    board
        .pieces_of(side)
        .any(|id| board.piece(id).threatens(board, row, col))
}

/// Whether `side`'s royal piece is currently attacked. Covers the
/// flying-general exposure rule when both royals are generals on an open
/// file.
pub fn is_in_check(board: &Board, side: Side) -> bool {
    let royal_id = match board.royal_of(side) {
        Some(id) => id,
        None => return false,
    };
    let royal = board.piece(royal_id);
    if square_threatened_by(board, side.opponent(), royal.row, royal.col) {
        return true;
    }
    if royal.kind == PieceKind::General {
        if let Some(enemy_id) = board.royal_of(side.opponent()) {
            let enemy = board.piece(enemy_id);
            if enemy.kind == PieceKind::General
                && enemy.col == royal.col
                && movement::path_clear(board, (royal.row, royal.col), (enemy.row, enemy.col))
            {
                return true;
            }
        }
    }
    false
}
