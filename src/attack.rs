// Square attack detection on the mailbox board
use crate::board::{Board, Cell, Color, Piece, PieceKind};
use crate::utils::{offset, BISHOP_OFFSETS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_OFFSETS};

impl Board {
    /// True if any piece of `by` attacks `sq`. Occupancy of `sq` itself is irrelevant.
    pub fn is_square_attacked(&self, sq: usize, by: Color) -> bool {
        // Pawns attack diagonally forward, so look one rank behind the target from their side
        let pawn = Cell::Occupied(Piece::new(PieceKind::Pawn, by));
        let back = -by.forward();
        if self.cell(offset(sq, back + 1)) == pawn || self.cell(offset(sq, back - 1)) == pawn {
            return true;
        }

        let knight = Cell::Occupied(Piece::new(PieceKind::Knight, by));
        if KNIGHT_OFFSETS
            .iter()
            .any(|&d| self.cell(offset(sq, d)) == knight)
        {
            return true;
        }

        if self.slider_attacks(sq, by, &BISHOP_OFFSETS, PieceKind::Bishop) {
            return true;
        }
        if self.slider_attacks(sq, by, &ROOK_OFFSETS, PieceKind::Rook) {
            return true;
        }

        let king = Cell::Occupied(Piece::new(PieceKind::King, by));
        KING_OFFSETS.iter().any(|&d| self.cell(offset(sq, d)) == king)
    }

    // Walk each ray until the first non-empty cell; `kind` or a queen there attacks `sq`
    fn slider_attacks(&self, sq: usize, by: Color, dirs: &[isize], kind: PieceKind) -> bool {
        for &d in dirs {
            let mut t = offset(sq, d);
            loop {
                match self.cell(t) {
                    Cell::Empty => t = offset(t, d),
                    Cell::Occupied(p) => {
                        if p.color == by && (p.kind == kind || p.kind == PieceKind::Queen) {
                            return true;
                        }
                        break;
                    }
                    Cell::Offboard => break,
                }
            }
        }
        false
    }

    /// Is `color`'s king attacked
    #[inline]
    pub fn in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_sq(color), color.opposite())
    }

    /// Is the side to move in check
    #[inline]
    pub fn side_in_check(&self) -> bool {
        self.in_check(self.side)
    }
}

#[cfg(test)]
mod tests {
    use crate::board::{Board, Color};
    use crate::utils::coord_to_square;

    fn sq(s: &str) -> usize {
        coord_to_square(s).unwrap()
    }

    #[test]
    fn pawn_attacks_point_forward() {
        let board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        assert!(board.is_square_attacked(sq("d5"), Color::White));
        assert!(board.is_square_attacked(sq("f5"), Color::White));
        assert!(!board.is_square_attacked(sq("e5"), Color::White));
        assert!(!board.is_square_attacked(sq("d3"), Color::White));
        assert!(board.is_square_attacked(sq("e4"), Color::Black));
        assert!(board.is_square_attacked(sq("c4"), Color::Black));
        assert!(!board.is_square_attacked(sq("d6"), Color::Black));
    }

    #[test]
    fn sliders_are_blocked() {
        let board = Board::from_fen("4k3/8/8/8/1b6/2N5/8/R3K3 w - - 0 1").unwrap();
        // bishop on b4 hits c3 but not d2 behind the knight
        assert!(board.is_square_attacked(sq("c3"), Color::Black));
        assert!(!board.is_square_attacked(sq("d2"), Color::Black));
        // rook on a1 sees the whole a-file and b1..d1
        assert!(board.is_square_attacked(sq("a8"), Color::White));
        assert!(board.is_square_attacked(sq("d1"), Color::White));
    }

    #[test]
    fn queen_and_knight_and_king() {
        let board = Board::from_fen("4k3/8/8/8/8/5n2/8/q3K3 w - - 0 1").unwrap();
        assert!(board.in_check(Color::White));
        assert!(board.is_square_attacked(sq("d2"), Color::Black));
        assert!(board.is_square_attacked(sq("e1"), Color::Black));
        assert!(board.is_square_attacked(sq("f2"), Color::White));
        assert!(!board.in_check(Color::Black));
    }

    #[test]
    fn edge_squares_do_not_wrap() {
        // a rook on h4 must not see a4's neighbour through the board edge
        let board = Board::from_fen("4k3/8/8/8/7r/8/8/K7 w - - 0 1").unwrap();
        assert!(!board.is_square_attacked(sq("a5"), Color::Black));
        assert!(board.is_square_attacked(sq("a4"), Color::Black));
    }
}
