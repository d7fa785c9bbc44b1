//! The orthodox chess rule set: 8x8 board, White at the bottom (South),
//! Black at the top (North).

use crate::board::{Board, PieceId};
use crate::constants::{PieceKind, Side, CHESS_COLS, CHESS_ROWS};
use crate::rules::Ruleset;

pub struct ChessRules;

impl ChessRules {
    pub const WHITE: Side = Side::South;
    pub const BLACK: Side = Side::North;

    const BACK_RANK: [PieceKind; 8] = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
    ];
}

impl Ruleset for ChessRules {
    fn name(&self) -> &'static str {
        "chess"
    }

    fn dims(&self) -> (usize, usize) {
        (CHESS_ROWS, CHESS_COLS)
    }

    fn sides(&self) -> [Side; 2] {
        [Self::WHITE, Self::BLACK]
    }

    fn start_game(&self, board: &mut Board) {
        for (col, &kind) in Self::BACK_RANK.iter().enumerate() {
            board.spawn(Self::BLACK, kind, self.fen_char(Self::BLACK, kind), 0, col);
            board.spawn(
                Self::WHITE,
                kind,
                self.fen_char(Self::WHITE, kind),
                CHESS_ROWS - 1,
                col,
            );
        }
        for col in 0..CHESS_COLS {
            board.spawn(Self::BLACK, PieceKind::Pawn, 'p', 1, col);
            board.spawn(Self::WHITE, PieceKind::Pawn, 'P', CHESS_ROWS - 2, col);
        }
    }

    fn piece_from_fen(&self, ch: char) -> Option<(Side, PieceKind)> {
        let side = if ch.is_ascii_uppercase() {
            Self::WHITE
        } else {
            Self::BLACK
        };
        let kind = match ch.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => return None,
        };
        Some((side, kind))
    }

    fn fen_char(&self, side: Side, kind: PieceKind) -> char {
        let ch = match kind {
            PieceKind::King => 'k',
            PieceKind::Queen => 'q',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Pawn => 'p',
            // No xiangqi kinds appear on a chess board.
            _ => '?',
        };
        if side == Self::WHITE {
            ch.to_ascii_uppercase()
        } else {
            ch
        }
    }

    fn promotion_due(&self, board: &Board, id: PieceId) -> bool {
        let piece = board.piece(id);
        if piece.kind != PieceKind::Pawn || !piece.on_board {
            return false;
        }
        match piece.side {
            Side::North => piece.row == CHESS_ROWS - 1,
            _ => piece.row == 0,
        }
    }

    fn promotion_choices(&self) -> Vec<PieceKind> {
        vec![
            PieceKind::Queen,
            PieceKind::Rook,
            PieceKind::Bishop,
            PieceKind::Knight,
        ]
    }

    fn strongest_kind(&self) -> PieceKind {
        PieceKind::Queen
    }

    /// Known drawn material: bare kings, one minor piece total, or a single
    /// bishop per side with both bishops on the same square color.
    fn insufficient_material(&self, board: &Board) -> bool {
        let mut minors: Vec<(Side, PieceKind, usize)> = Vec::new();
        for id in board.piece_ids() {
            let piece = board.piece(id);
            match piece.kind {
                PieceKind::King => {}
                PieceKind::Bishop | PieceKind::Knight => {
                    minors.push((piece.side, piece.kind, (piece.row + piece.col) % 2));
                }
                _ => return false,
            }
        }
        match minors.as_slice() {
            [] => true,
            [_] => true,
            [(side_a, PieceKind::Bishop, color_a), (side_b, PieceKind::Bishop, color_b)] => {
                side_a != side_b && color_a == color_b
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GameResult;
    use crate::rules::Game;

    fn game_from(fen: &str) -> Game {
        Game::from_fen(Box::new(ChessRules), fen).unwrap()
    }

    #[test]
    fn starting_position_matches_standard_fen() {
        let game = Game::new(Box::new(ChessRules));
        assert_eq!(ChessRules.name(), "chess");
        assert_eq!(
            game.board_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );
        assert_eq!(game.side_to_move(), ChessRules::WHITE);
    }

    #[test]
    fn bare_kings_are_insufficient() {
        let game = game_from("k7/8/8/8/8/8/8/7K w");
        assert!(ChessRules.insufficient_material(game.board()));
    }

    #[test]
    fn king_and_minor_versus_bare_king_is_insufficient() {
        let knight = game_from("k7/8/8/8/8/8/8/6NK w");
        assert!(ChessRules.insufficient_material(knight.board()));
        let bishop = game_from("k7/8/8/8/8/8/8/6BK w");
        assert!(ChessRules.insufficient_material(bishop.board()));
    }

    #[test]
    fn same_color_bishops_each_side_are_insufficient() {
        // Both bishops on dark squares: c8 (0,2) and f1 (7,5).
        let game = game_from("k1b5/8/8/8/8/8/8/5B1K w");
        assert!(ChessRules.insufficient_material(game.board()));
    }

    #[test]
    fn opposite_color_bishops_are_sufficient() {
        // b8 (0,1) light, f1 (7,5) dark.
        let game = game_from("kb6/8/8/8/8/8/8/5B1K w");
        assert!(!ChessRules.insufficient_material(game.board()));
    }

    #[test]
    fn two_minors_on_one_side_are_sufficient() {
        let game = game_from("k7/8/8/8/8/8/8/4NNK1 w");
        assert!(!ChessRules.insufficient_material(game.board()));
    }

    #[test]
    fn rook_on_board_is_never_insufficient() {
        let game = game_from("k7/8/8/8/8/8/8/6RK w");
        assert!(!ChessRules.insufficient_material(game.board()));
    }

    #[test]
    fn insufficient_material_ends_the_game_as_a_draw() {
        let mut game = game_from("k7/8/8/8/8/8/8/6NK w");
        assert_eq!(
            game.evaluate_end(),
            Some((GameResult::InsufficientMaterial, None))
        );
    }

    #[test]
    fn stalemate_detected_when_not_in_check_with_no_moves() {
        // Black king a8, boxed in by the white queen on c7; not in check.
        let mut game = game_from("k7/2Q5/8/8/8/8/8/7K b");
        assert_eq!(game.evaluate_end(), Some((GameResult::Stalemate, None)));
    }

    #[test]
    fn loaded_mid_board_pawn_cannot_double_step() {
        let mut game = game_from("7k/8/8/8/4P3/8/8/K7 w");
        let pawn = game.board().piece_at(4, 4).unwrap();
        assert!(!game.make_move(pawn, 2, 4));
        assert!(game.make_move(pawn, 3, 4));
    }

    #[test]
    fn promotion_row_is_side_relative() {
        let game = game_from("8/P6k/8/8/8/8/p6K/8 w");
        let white_pawn = game.board().piece_at(1, 0).unwrap();
        let black_pawn = game.board().piece_at(6, 0).unwrap();
        assert!(!ChessRules.promotion_due(game.board(), white_pawn));
        assert!(!ChessRules.promotion_due(game.board(), black_pawn));
    }
}
