//! Static evaluation - material plus piece-square tables (PSQT)
//!
//! The search only needs a cheap, bounded score from the side to move's point of
//! view; anything implementing [`Evaluator`] can be plugged in. The default
//! [`PsqtEvaluator`] is colour symmetric: mirroring a position and swapping the
//! side to move negates its score.

use crate::board::{Board, Color, Piece, PieceKind};
use crate::utils::{mirror64, sq120_to_64};

/// Static scoring used at search leaves
pub trait Evaluator: Send {
    /// Score in centipawns, positive when the side to move is better
    fn evaluate(&self, board: &Board) -> i32;
}

/// Material plus PSQT
#[derive(Debug, Clone, Copy, Default)]
pub struct PsqtEvaluator;

impl Evaluator for PsqtEvaluator {
    fn evaluate(&self, board: &Board) -> i32 {
        evaluate(board)
    }
}

const BISHOP_PAIR_BONUS: i32 = 30;

// Tables are written from White's side: index 0 = a1, 63 = h8.
// Black looks them up through a vertical flip.

const PAWN_PSQT: [i32; 64] = [
    0, 0, 0, 0, 0, 0, 0, 0, //
    5, 10, 10, -20, -20, 10, 10, 5, //
    5, -5, -10, 0, 0, -10, -5, 5, //
    0, 0, 0, 20, 20, 0, 0, 0, //
    5, 5, 10, 25, 25, 10, 5, 5, //
    10, 10, 20, 30, 30, 20, 10, 10, //
    50, 50, 50, 50, 50, 50, 50, 50, //
    0, 0, 0, 0, 0, 0, 0, 0,
];

/// Knights prefer the centre and avoid the rim
const KNIGHT_PSQT: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50, //
    -40, -20, 0, 5, 5, 0, -20, -40, //
    -30, 5, 10, 15, 15, 10, 5, -30, //
    -30, 0, 15, 20, 20, 15, 0, -30, //
    -30, 5, 15, 20, 20, 15, 5, -30, //
    -30, 0, 10, 15, 15, 10, 0, -30, //
    -40, -20, 0, 0, 0, 0, -20, -40, //
    -50, -40, -30, -30, -30, -30, -40, -50,
];

const BISHOP_PSQT: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20, //
    -10, 5, 0, 0, 0, 0, 5, -10, //
    -10, 10, 10, 10, 10, 10, 10, -10, //
    -10, 0, 10, 10, 10, 10, 0, -10, //
    -10, 5, 5, 10, 10, 5, 5, -10, //
    -10, 0, 5, 10, 10, 5, 0, -10, //
    -10, 0, 0, 0, 0, 0, 0, -10, //
    -20, -10, -10, -10, -10, -10, -10, -20,
];

/// Rooks like central files and the seventh rank
const ROOK_PSQT: [i32; 64] = [
    0, 0, 0, 5, 5, 0, 0, 0, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    5, 10, 10, 10, 10, 10, 10, 5, //
    0, 0, 0, 0, 0, 0, 0, 0,
];

const QUEEN_PSQT: [i32; 64] = [
    -20, -10, -10, -5, -5, -10, -10, -20, //
    -10, 0, 5, 0, 0, 0, 0, -10, //
    -10, 5, 5, 5, 5, 5, 0, -10, //
    0, 0, 5, 5, 5, 5, 0, -5, //
    -5, 0, 5, 5, 5, 5, 0, -5, //
    -10, 0, 5, 5, 5, 5, 0, -10, //
    -10, 0, 0, 0, 0, 0, 0, -10, //
    -20, -10, -10, -5, -5, -10, -10, -20,
];

/// King stays sheltered behind its pawns
const KING_PSQT: [i32; 64] = [
    20, 30, 10, 0, 0, 10, 30, 20, //
    20, 20, 0, 0, 0, 0, 20, 20, //
    -10, -20, -20, -20, -20, -20, -20, -10, //
    -20, -30, -30, -40, -40, -30, -30, -20, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30,
];

fn psqt(kind: PieceKind) -> &'static [i32; 64] {
    match kind {
        PieceKind::Pawn => &PAWN_PSQT,
        PieceKind::Knight => &KNIGHT_PSQT,
        PieceKind::Bishop => &BISHOP_PSQT,
        PieceKind::Rook => &ROOK_PSQT,
        PieceKind::Queen => &QUEEN_PSQT,
        PieceKind::King => &KING_PSQT,
    }
}

// Score of one side's pieces from that side's own perspective
fn side_score(board: &Board, color: Color) -> i32 {
    let mut score = board.material(color);
    for kind in PieceKind::ALL {
        let table = psqt(kind);
        for &sq in board.piece_squares(Piece::new(kind, color)) {
            let idx = match color {
                Color::White => sq120_to_64(sq),
                Color::Black => mirror64(sq120_to_64(sq)),
            };
            score += table[idx];
        }
    }
    if board.piece_count(Piece::new(PieceKind::Bishop, color)) >= 2 {
        score += BISHOP_PAIR_BONUS;
    }
    score
}

/// Default static evaluation from the side to move's point of view
pub fn evaluate(board: &Board) -> i32 {
    let us = board.side;
    side_score(board, us) - side_score(board, us.opposite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_is_balanced() {
        let board = Board::startpos();
        assert_eq!(evaluate(&board), 0);
    }

    #[test]
    fn side_to_move_negates_score() {
        let white = Board::from_fen("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1").unwrap();
        let black = Board::from_fen("4k3/8/8/8/4P3/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(evaluate(&white), -evaluate(&black));
        assert!(evaluate(&white) > 0);
    }

    #[test]
    fn mirrored_position_scores_the_same_for_its_mover() {
        let white = Board::from_fen("4k3/8/8/8/3NP3/8/8/4K3 w - - 0 1").unwrap();
        let black = Board::from_fen("4k3/8/8/3np3/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(evaluate(&white), evaluate(&black));
    }

    #[test]
    fn central_knight_beats_rim_knight() {
        let central = Board::from_fen("4k3/8/8/8/4N3/8/8/4K3 w - - 0 1").unwrap();
        let rim = Board::from_fen("4k3/8/8/8/N7/8/8/4K3 w - - 0 1").unwrap();
        assert!(evaluate(&central) > evaluate(&rim));
    }

    #[test]
    fn trait_object_matches_free_function() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K1NR w KQkq - 0 1").unwrap();
        let eval: Box<dyn Evaluator> = Box::new(PsqtEvaluator);
        assert_eq!(eval.evaluate(&board), evaluate(&board));
    }
}
