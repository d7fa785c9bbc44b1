//! Placement-string parsing and serialization.
//!
//! Both rule sets describe positions FEN-style: ranks from the top of the
//! grid down, `/`-separated, digits for runs of empty squares, one letter
//! per piece with case carrying the side. The letter-to-piece mapping is
//! the rule set's business; this module only walks the grid.

use crate::board::Board;
use crate::rules::Ruleset;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("unknown piece character '{0}'")]
    UnknownPiece(char),
    #[error("rank {rank} does not fit the board: {found} files, expected {expected}")]
    BadRankWidth {
        rank: usize,
        found: usize,
        expected: usize,
    },
    #[error("expected {expected} ranks, found {found}")]
    BadRankCount { expected: usize, found: usize },
    #[error("unknown side to move '{0}'")]
    BadSideToMove(String),
    #[error("missing {0} field")]
    MissingField(&'static str),
}

/// Populates an empty board from a placement string using the rule set's
/// character mapping.
pub fn parse_placement(
    board: &mut Board,
    rules: &dyn Ruleset,
    placement: &str,
) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != board.rows() {
        return Err(FenError::BadRankCount {
            expected: board.rows(),
            found: ranks.len(),
        });
    }
    for (row, rank) in ranks.iter().enumerate() {
        let mut col = 0usize;
        for ch in rank.chars() {
            if let Some(run) = ch.to_digit(10) {
                col += run as usize;
            } else {
                let (side, kind) = rules
                    .piece_from_fen(ch)
                    .ok_or(FenError::UnknownPiece(ch))?;
                if col >= board.cols() {
                    return Err(FenError::BadRankWidth {
                        rank: row,
                        found: col + 1,
                        expected: board.cols(),
                    });
                }
                board.spawn(side, kind, ch, row, col);
                col += 1;
            }
        }
        if col != board.cols() {
            return Err(FenError::BadRankWidth {
                rank: row,
                found: col,
                expected: board.cols(),
            });
        }
    }
    Ok(())
}

/// Serializes the current occupancy back into a placement string. Glyphs
/// were assigned by the same rule set that parses them, so this is a plain
/// grid walk.
pub fn placement(board: &Board) -> String {
    let mut out = String::with_capacity(board.rows() * (board.cols() + 1));
    for row in 0..board.rows() {
        let mut empty_run = 0;
        for col in 0..board.cols() {
            match board.piece_at(row, col) {
                Some(id) => {
                    if empty_run > 0 {
                        out.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    out.push(board.piece(id).glyph);
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            out.push_str(&empty_run.to_string());
        }
        if row + 1 < board.rows() {
            out.push('/');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::ChessRules;
    use crate::xiangqi::XiangqiRules;

    const CHESS_START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";
    const XIANGQI_START: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR";

    #[test]
    fn chess_start_round_trips() {
        let mut board = Board::new(8, 8);
        parse_placement(&mut board, &ChessRules, CHESS_START).unwrap();
        assert_eq!(placement(&board), CHESS_START);
    }

    #[test]
    fn xiangqi_start_round_trips() {
        let mut board = Board::new(10, 9);
        parse_placement(&mut board, &XiangqiRules, XIANGQI_START).unwrap();
        assert_eq!(placement(&board), XIANGQI_START);
    }

    #[test]
    fn unknown_piece_character_is_an_error() {
        let mut board = Board::new(8, 8);
        let err = parse_placement(&mut board, &ChessRules, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNZ")
            .unwrap_err();
        assert_eq!(err, FenError::UnknownPiece('Z'));
    }

    #[test]
    fn wrong_rank_count_is_an_error() {
        let mut board = Board::new(8, 8);
        let err = parse_placement(&mut board, &ChessRules, "8/8/8").unwrap_err();
        assert_eq!(
            err,
            FenError::BadRankCount {
                expected: 8,
                found: 3
            }
        );
    }

    #[test]
    fn overlong_rank_is_an_error() {
        let mut board = Board::new(8, 8);
        let err =
            parse_placement(&mut board, &ChessRules, "rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/8")
                .unwrap_err();
        assert!(matches!(err, FenError::BadRankWidth { rank: 0, .. }));
    }
}
