//! Turn order, move execution, and end-of-game detection.
//!
//! `Game` is the state machine shared by every rule set; a `Ruleset`
//! supplies the variant-specific pieces: board size, starting position,
//! promotion policy, and the insufficient-material table.
//!
//! Threading contract: `Game` is synchronous and `Send`. A caller may run
//! `evaluate_end` on a worker thread so it does not block a render loop,
//! but only after `make_move` has returned and never concurrently with any
//! other call on the same `Game` — the speculative mutation used for
//! legality testing is not reentrant.

use crate::board::{Board, PieceId};
use crate::check::is_check_move;
use crate::constants::{GameResult, PieceKind, Side};
use crate::display::DisplaySink;
use crate::fen::{self, FenError};
use crate::moveset::move_instructions;
use crate::piece::{is_in_check, Piece};
use crate::position::Position;

/// Variant hooks. One implementation per rule set.
pub trait Ruleset {
    fn name(&self) -> &'static str;

    /// (rows, cols) of the variant's board.
    fn dims(&self) -> (usize, usize);

    /// The two sides in play; the first entry moves first.
    fn sides(&self) -> [Side; 2];

    /// Places every piece for the standard starting position. Called
    /// exactly once per game instance.
    fn start_game(&self, board: &mut Board);

    /// Notation character mapping, both directions.
    fn piece_from_fen(&self, ch: char) -> Option<(Side, PieceKind)>;
    fn fen_char(&self, side: Side, kind: PieceKind) -> char;

    /// Whether the piece that just moved must now promote.
    fn promotion_due(&self, board: &Board, id: PieceId) -> bool;

    /// Kinds a promoting piece may become; empty when the variant has no
    /// promotion.
    fn promotion_choices(&self) -> Vec<PieceKind>;

    /// Fallback when no promotion collaborator answers.
    fn strongest_kind(&self) -> PieceKind;

    fn insufficient_material(&self, board: &Board) -> bool;

    /// Plies without progress before the draw rule fires (50 full-move
    /// pairs by default).
    fn no_progress_limit(&self) -> u32 {
        100
    }
}

/// Promotion collaborator. Returning `None` falls back to the rule set's
/// strongest kind.
pub trait PromotionPicker: Send {
    fn choose(&mut self, piece: &Piece, options: &[PieceKind]) -> Option<PieceKind>;
}

/// Termination collaborator; notified exactly once per game.
pub trait TerminationSink: Send {
    fn terminate(&mut self, result: GameResult, winner: Option<Side>);
}

pub struct Game {
    rules: Box<dyn Ruleset + Send>,
    board: Board,
    to_move: Side,
    /// Every snapshot since setup, including the initial position. Grows
    /// monotonically; used only for frequency counts.
    history: Vec<Position>,
    /// Plies since the last non-reversible relocation.
    no_progress: u32,
    result: Option<(GameResult, Option<Side>)>,
    promotion: Option<Box<dyn PromotionPicker>>,
    termination: Option<Box<dyn TerminationSink>>,
}

impl Game {
    pub fn new(rules: Box<dyn Ruleset + Send>) -> Self {
        Self::with_display(rules, DisplaySink::detached())
    }

    pub fn with_display(rules: Box<dyn Ruleset + Send>, display: DisplaySink) -> Self {
        let (rows, cols) = rules.dims();
        let mut board = Board::with_display(rows, cols, display);
        rules.start_game(&mut board);
        let to_move = rules.sides()[0];
        let history = vec![board.snapshot(to_move)];
        Self {
            rules,
            board,
            to_move,
            history,
            no_progress: 0,
            result: None,
            promotion: None,
            termination: None,
        }
    }

    /// Builds a game from a placement string plus side-to-move token
    /// (`w` = first side, `b` = second), e.g. `"8/8/... w"`.
    pub fn from_fen(rules: Box<dyn Ruleset + Send>, fen_str: &str) -> Result<Self, FenError> {
        let mut parts = fen_str.split_whitespace();
        let layout = parts.next().ok_or(FenError::MissingField("placement"))?;
        let side_token = parts.next().ok_or(FenError::MissingField("side to move"))?;

        let (rows, cols) = rules.dims();
        let mut board = Board::new(rows, cols);
        fen::parse_placement(&mut board, rules.as_ref(), layout)?;
        let to_move = match side_token {
            "w" => rules.sides()[0],
            "b" => rules.sides()[1],
            other => return Err(FenError::BadSideToMove(other.to_string())),
        };
        let history = vec![board.snapshot(to_move)];
        Ok(Self {
            rules,
            board,
            to_move,
            history,
            no_progress: 0,
            result: None,
            promotion: None,
            termination: None,
        })
    }

    pub fn set_promotion_picker(&mut self, picker: Box<dyn PromotionPicker>) {
        self.promotion = Some(picker);
    }

    pub fn set_termination_sink(&mut self, sink: Box<dyn TerminationSink>) {
        self.termination = Some(sink);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Side {
        self.to_move
    }

    pub fn result(&self) -> Option<(GameResult, Option<Side>)> {
        self.result
    }

    pub fn no_progress_plies(&self) -> u32 {
        self.no_progress
    }

    pub fn board_fen(&self) -> String {
        fen::placement(&self.board)
    }

    /// A piece is selectable this turn iff it belongs to the side to move
    /// and has at least one move that survives the self-check test.
    pub fn legal_piece_to_play(&mut self, id: PieceId) -> bool {
        let piece = self.board.piece(id);
        if !piece.on_board || piece.side != self.to_move {
            return false;
        }
        !self.safe_destinations(id).is_empty()
    }

    /// Destinations for `id` that are geometrically legal and do not leave
    /// the mover's own royal piece in check.
    pub fn safe_destinations(&mut self, id: PieceId) -> Vec<(usize, usize)> {
        let candidates = self.board.piece(id).destinations(&self.board);
        candidates
            .into_iter()
            .filter(|&(r, c)| !is_check_move(&mut self.board, id, r, c))
            .collect()
    }

    /// Applies a move if it is legal. Returns false, mutating nothing, when
    /// the game is over, the piece is not the mover's, or the move fails
    /// geometry or the self-check test.
    pub fn make_move(&mut self, id: PieceId, row: usize, col: usize) -> bool {
        if self.result.is_some() {
            return false;
        }
        {
            let piece = self.board.piece(id);
            if !piece.on_board || piece.side != self.to_move {
                return false;
            }
        }
        if is_check_move(&mut self.board, id, row, col) {
            return false;
        }

        let moves = move_instructions(&self.board, id, row, col);
        let progress = moves.makes_progress();
        let mut movers = Vec::with_capacity(moves.relocations().len());
        for relocation in moves.relocations() {
            if let Some(victim) = relocation.captured {
                let (vr, vc) = {
                    let v = self.board.piece(victim);
                    (v.row, v.col)
                };
                self.board.remove_piece(vr, vc);
            }
            let (fr, fc) = {
                let mover = self.board.piece(relocation.piece);
                (mover.row, mover.col)
            };
            self.board.remove_piece(fr, fc);
            self.board
                .add_piece(relocation.piece, relocation.to.0, relocation.to.1);
            movers.push(relocation.piece);
        }

        self.no_progress = if progress { 0 } else { self.no_progress + 1 };
        for &mover in &movers {
            let piece = self.board.piece_mut(mover);
            piece.move_count += 1;
            piece.just_moved = true;
        }
        self.board.clear_just_moved_except(&movers);

        if self.rules.promotion_due(&self.board, id) {
            let options = self.rules.promotion_choices();
            let chosen = match self.promotion.as_mut() {
                Some(picker) => picker.choose(self.board.piece(id), &options),
                None => None,
            }
            .unwrap_or_else(|| self.rules.strongest_kind());
            self.promote(id, chosen);
        }

        self.to_move = self.to_move.opponent();
        self.history.push(self.board.snapshot(self.to_move));
        true
    }

    /// Substitutes a piece in place, e.g. when the promotion collaborator
    /// answers. The slab entry is reused so outstanding `PieceId`s stay
    /// valid.
    pub fn promote(&mut self, id: PieceId, kind: PieceKind) -> bool {
        let (side, row, col) = {
            let piece = self.board.piece(id);
            if !piece.on_board {
                return false;
            }
            (piece.side, piece.row, piece.col)
        };
        let glyph = self.rules.fen_char(side, kind);
        {
            let piece = self.board.piece_mut(id);
            piece.kind = kind;
            piece.glyph = glyph;
        }
        self.board.redisplay(row, col);
        true
    }

    /// Evaluates end conditions for the side now to move, in order:
    /// checkmate, stalemate, insufficient material, threefold repetition,
    /// fifty-move rule. Records the result and notifies the termination
    /// sink exactly once.
    pub fn evaluate_end(&mut self) -> Option<(GameResult, Option<Side>)> {
        if self.result.is_some() {
            return self.result;
        }
        let side = self.to_move;
        let any_move = self.side_has_legal_move(side);
        let outcome = if !any_move {
            if is_in_check(&self.board, side) {
                Some((GameResult::Checkmate, Some(side.opponent())))
            } else {
                Some((GameResult::Stalemate, None))
            }
        } else if self.rules.insufficient_material(&self.board) {
            Some((GameResult::InsufficientMaterial, None))
        } else if self.repetition_count() >= 3 {
            Some((GameResult::ThreefoldRepetition, None))
        } else if self.no_progress >= self.rules.no_progress_limit() {
            Some((GameResult::FiftyMoveRule, None))
        } else {
            None
        };

        if let Some((result, winner)) = outcome {
            self.result = outcome;
            if let Some(sink) = self.termination.as_mut() {
                sink.terminate(result, winner);
            }
        }
        outcome
    }

    fn side_has_legal_move(&mut self, side: Side) -> bool {
        let ids: Vec<PieceId> = self.board.pieces_of(side).collect();
        for id in ids {
            let candidates = self.board.piece(id).destinations(&self.board);
            for (r, c) in candidates {
                if !is_check_move(&mut self.board, id, r, c) {
                    return true;
                }
            }
        }
        false
    }

    /// How many times the current position has occurred, counting itself.
    fn repetition_count(&self) -> usize {
        let current = match self.history.last() {
            Some(p) => p,
            None => return 0,
        };
        self.history.iter().filter(|p| *p == current).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::ChessRules;

    fn chess_game() -> Game {
        Game::new(Box::new(ChessRules))
    }

    #[test]
    fn white_moves_first_and_turns_alternate() {
        let mut game = chess_game();
        assert_eq!(game.side_to_move(), Side::South);
        let pawn = game.board().piece_at(6, 4).unwrap();
        assert!(game.make_move(pawn, 4, 4));
        assert_eq!(game.side_to_move(), Side::North);
    }

    #[test]
    fn failed_move_leaves_turn_and_board_unchanged() {
        let mut game = chess_game();
        let fen_before = game.board_fen();
        let rook = game.board().piece_at(7, 0).unwrap();
        assert!(!game.make_move(rook, 5, 0)); // blocked by own pawn
        assert_eq!(game.side_to_move(), Side::South);
        assert_eq!(game.board_fen(), fen_before);
    }

    #[test]
    fn wrong_side_piece_is_not_playable() {
        let mut game = chess_game();
        let black_pawn = game.board().piece_at(1, 4).unwrap();
        assert!(!game.legal_piece_to_play(black_pawn));
        assert!(!game.make_move(black_pawn, 3, 4));
    }

    #[test]
    fn no_progress_counter_resets_on_pawn_moves_and_captures() {
        let mut game = chess_game();
        let wp = game.board().piece_at(6, 4).unwrap();
        assert!(game.make_move(wp, 4, 4));
        assert_eq!(game.no_progress_plies(), 0); // pawn advance

        let bn = game.board().piece_at(0, 1).unwrap();
        assert!(game.make_move(bn, 2, 2));
        assert_eq!(game.no_progress_plies(), 1); // quiet knight move

        let wn = game.board().piece_at(7, 6).unwrap();
        assert!(game.make_move(wn, 5, 5));
        assert_eq!(game.no_progress_plies(), 2);

        let bp = game.board().piece_at(1, 3).unwrap();
        assert!(game.make_move(bp, 3, 3)); // pawn double step
        assert_eq!(game.no_progress_plies(), 0);
    }

    #[test]
    fn just_moved_flag_tracks_exactly_the_last_mover() {
        let mut game = chess_game();
        let wp = game.board().piece_at(6, 4).unwrap();
        game.make_move(wp, 4, 4);
        assert!(game.board().piece(wp).just_moved);

        let bp = game.board().piece_at(1, 4).unwrap();
        game.make_move(bp, 3, 4);
        assert!(game.board().piece(bp).just_moved);
        assert!(!game.board().piece(wp).just_moved);
    }

    #[test]
    fn make_move_refused_after_game_over() {
        // Two-rook mate against the black king in the corner.
        let mut game = Game::from_fen(Box::new(ChessRules), "k7/8/8/8/8/8/1R6/R6K b").unwrap();
        assert_eq!(
            game.evaluate_end(),
            Some((GameResult::Checkmate, Some(Side::South)))
        );
        let king = game.board().royal_of(Side::North).unwrap();
        assert!(!game.make_move(king, 1, 0));
    }

    #[test]
    fn promotion_defaults_to_strongest_kind() {
        let mut game = Game::from_fen(Box::new(ChessRules), "8/P6k/8/8/8/8/8/K7 w").unwrap();
        let pawn = game.board().piece_at(1, 0).unwrap();
        assert!(game.make_move(pawn, 0, 0));
        assert_eq!(game.board().piece(pawn).kind, PieceKind::Queen);
        assert_eq!(game.board().piece(pawn).glyph, 'Q');
    }

    struct AlwaysKnight;
    impl PromotionPicker for AlwaysKnight {
        fn choose(&mut self, _piece: &Piece, options: &[PieceKind]) -> Option<PieceKind> {
            options.iter().copied().find(|&k| k == PieceKind::Knight)
        }
    }

    #[test]
    fn promotion_collaborator_answer_is_honored() {
        let mut game = Game::from_fen(Box::new(ChessRules), "8/P6k/8/8/8/8/8/K7 w").unwrap();
        game.set_promotion_picker(Box::new(AlwaysKnight));
        let pawn = game.board().piece_at(1, 0).unwrap();
        assert!(game.make_move(pawn, 0, 0));
        assert_eq!(game.board().piece(pawn).kind, PieceKind::Knight);
    }
}
