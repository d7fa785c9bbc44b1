//! Shared constants and small value types used across the engine.

/// Ownership and turn marker. Four compass values exist so that rule sets
/// with rotated or four-player boards can share the type; the two shipped
/// rule sets use North (top of the grid) and South (bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    /// The side that faces this one across the board.
    pub fn opponent(self) -> Side {
        match self {
            Side::North => Side::South,
            Side::South => Side::North,
            Side::East => Side::West,
            Side::West => Side::East,
        }
    }

    /// Row delta for "forward" from this side's point of view. Row 0 is the
    /// top of the grid, so North advances toward higher rows.
    pub fn forward(self) -> isize {
        match self {
            Side::North => 1,
            Side::South => -1,
            Side::East => 0,
            Side::West => 0,
        }
    }

    /// Index used by the Zobrist tables.
    pub fn index(self) -> usize {
        match self {
            Side::North => 0,
            Side::East => 1,
            Side::South => 2,
            Side::West => 3,
        }
    }
}

/// Every piece type either rule set can place. The movement rules for each
/// kind live in `Piece::can_move_to`; keeping one closed enum makes that
/// dispatch exhaustive-checkable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    // Orthodox chess.
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
    // Xiangqi.
    General,
    Advisor,
    Elephant,
    Horse,
    Chariot,
    Cannon,
    Soldier,
}

pub const NUM_PIECE_KINDS: usize = 13;

impl PieceKind {
    /// Royal pieces are the ones whose safety decides the game.
    pub fn is_royal(self) -> bool {
        matches!(self, PieceKind::King | PieceKind::General)
    }

    /// Pawn-like pieces advance forward and have the one-ply special-move
    /// window (double advance / en passant for chess).
    pub fn is_pawn_like(self) -> bool {
        matches!(self, PieceKind::Pawn | PieceKind::Soldier)
    }

    /// Index used by the Zobrist tables.
    pub fn index(self) -> usize {
        match self {
            PieceKind::King => 0,
            PieceKind::Queen => 1,
            PieceKind::Rook => 2,
            PieceKind::Bishop => 3,
            PieceKind::Knight => 4,
            PieceKind::Pawn => 5,
            PieceKind::General => 6,
            PieceKind::Advisor => 7,
            PieceKind::Elephant => 8,
            PieceKind::Horse => 9,
            PieceKind::Chariot => 10,
            PieceKind::Cannon => 11,
            PieceKind::Soldier => 12,
        }
    }
}

/// Terminal game outcomes. Checkmate is the only decisive one; the rest are
/// draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    ThreefoldRepetition,
    FiftyMoveRule,
}

// --- Board dimensions per rule set ---

pub const CHESS_ROWS: usize = 8;
pub const CHESS_COLS: usize = 8;
pub const XIANGQI_ROWS: usize = 10;
pub const XIANGQI_COLS: usize = 9;

/// Upper bound on either dimension across all rule sets; sizes the Zobrist
/// square tables.
pub const MAX_DIM: usize = 16;
