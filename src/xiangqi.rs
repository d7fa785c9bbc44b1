//! The xiangqi rule set: 10x9 board with palaces and a river, Red at the
//! bottom (South), Black at the top (North).

use crate::board::{Board, PieceId};
use crate::constants::{PieceKind, Side, XIANGQI_COLS, XIANGQI_ROWS};
use crate::rules::Ruleset;

pub struct XiangqiRules;

impl XiangqiRules {
    pub const RED: Side = Side::South;
    pub const BLACK: Side = Side::North;

    const BACK_RANK: [PieceKind; 9] = [
        PieceKind::Chariot,
        PieceKind::Horse,
        PieceKind::Elephant,
        PieceKind::Advisor,
        PieceKind::General,
        PieceKind::Advisor,
        PieceKind::Elephant,
        PieceKind::Horse,
        PieceKind::Chariot,
    ];

    fn place_camp(&self, board: &mut Board, side: Side) {
        let (back, cannon_row, soldier_row) = if side == Self::BLACK {
            (0, 2, 3)
        } else {
            (XIANGQI_ROWS - 1, XIANGQI_ROWS - 3, XIANGQI_ROWS - 4)
        };
        for (col, &kind) in Self::BACK_RANK.iter().enumerate() {
            board.spawn(side, kind, self.fen_char(side, kind), back, col);
        }
        for col in [1, 7] {
            board.spawn(
                side,
                PieceKind::Cannon,
                self.fen_char(side, PieceKind::Cannon),
                cannon_row,
                col,
            );
        }
        for col in [0, 2, 4, 6, 8] {
            board.spawn(
                side,
                PieceKind::Soldier,
                self.fen_char(side, PieceKind::Soldier),
                soldier_row,
                col,
            );
        }
    }
}

impl Ruleset for XiangqiRules {
    fn name(&self) -> &'static str {
        "xiangqi"
    }

    fn dims(&self) -> (usize, usize) {
        (XIANGQI_ROWS, XIANGQI_COLS)
    }

    fn sides(&self) -> [Side; 2] {
        [Self::RED, Self::BLACK]
    }

    fn start_game(&self, board: &mut Board) {
        self.place_camp(board, Self::BLACK);
        self.place_camp(board, Self::RED);
    }

    fn piece_from_fen(&self, ch: char) -> Option<(Side, PieceKind)> {
        let side = if ch.is_ascii_uppercase() {
            Self::RED
        } else {
            Self::BLACK
        };
        let kind = match ch.to_ascii_lowercase() {
            'k' => PieceKind::General,
            'a' => PieceKind::Advisor,
            'b' => PieceKind::Elephant,
            'n' => PieceKind::Horse,
            'r' => PieceKind::Chariot,
            'c' => PieceKind::Cannon,
            'p' => PieceKind::Soldier,
            _ => return None,
        };
        Some((side, kind))
    }

    fn fen_char(&self, side: Side, kind: PieceKind) -> char {
        let ch = match kind {
            PieceKind::General => 'k',
            PieceKind::Advisor => 'a',
            PieceKind::Elephant => 'b',
            PieceKind::Horse => 'n',
            PieceKind::Chariot => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
            // No chess kinds appear on a xiangqi board.
            _ => '?',
        };
        if side == Self::RED {
            ch.to_ascii_uppercase()
        } else {
            ch
        }
    }

    fn promotion_due(&self, _board: &Board, _id: PieceId) -> bool {
        // Soldiers gain their sideways step by crossing the river; there is
        // no piece substitution.
        false
    }

    fn promotion_choices(&self) -> Vec<PieceKind> {
        Vec::new()
    }

    fn strongest_kind(&self) -> PieceKind {
        PieceKind::Chariot
    }

    /// Generals, advisors, and elephants can never enter the enemy palace,
    /// so a board holding nothing else is a dead draw.
    fn insufficient_material(&self, board: &Board) -> bool {
        board.piece_ids().all(|id| {
            matches!(
                board.piece(id).kind,
                PieceKind::General | PieceKind::Advisor | PieceKind::Elephant
            )
        })
    }
}
