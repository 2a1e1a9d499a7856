//! Move-path enumeration used to validate the generator against reference counts
use crate::board::{move_to_uci, Board};

/// Number of leaf nodes of the legal move tree at `depth`
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = board.generate_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0u64;
    for &mv in &moves {
        board.make_move(mv);
        nodes += perft(board, depth - 1);
        board.undo_move();
    }
    nodes
}

/// Per-root-move breakdown of `perft`, in generation order
pub fn divide(board: &mut Board, depth: u32) -> Vec<(String, u64)> {
    let mut out = Vec::new();
    if depth == 0 {
        return out;
    }
    for &mv in &board.generate_moves() {
        board.make_move(mv);
        let nodes = perft(board, depth - 1);
        board.undo_move();
        out.push((move_to_uci(mv), nodes));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shallow_start_position_counts() {
        let mut board = Board::startpos();
        assert_eq!(perft(&mut board, 0), 1);
        assert_eq!(perft(&mut board, 1), 20);
        assert_eq!(perft(&mut board, 2), 400);
        assert_eq!(perft(&mut board, 3), 8902);
        assert_eq!(board, Board::startpos());
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut board = Board::startpos();
        let parts = divide(&mut board, 2);
        assert_eq!(parts.len(), 20);
        assert!(parts.iter().all(|(_, n)| *n == 20));
        assert_eq!(parts.iter().map(|(_, n)| n).sum::<u64>(), 400);
    }
}
