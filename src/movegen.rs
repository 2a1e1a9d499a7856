// Pseudo-legal move generation, legality filtering and move ordering
use crate::board::{
    Board, Cell, Color, Move, Piece, PieceKind, BK_CASTLE, BQ_CASTLE, WK_CASTLE, WQ_CASTLE,
};
use crate::utils::{
    offset, rank_of, sq120_to_64, B1, B8, BISHOP_OFFSETS, C1, C8, D1, D8, E1, E8, F1, F8, G1,
    G8, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_OFFSETS,
};
use std::ops::Index;

pub const MAX_MOVES: usize = 256;

/// Ordering base for captures, above everything else
pub const CAPTURE_BASE: i32 = 1_000_000;
/// Ordering base for non-capturing promotions
pub const PROMOTION_BASE: i32 = 900_000;
/// Bonus for a quiet move that attacks the enemy king
pub const CHECK_BONUS: i32 = 200_000;
/// Ceiling for history-table entries, keeps quiet moves under the check bonus
pub const HISTORY_MAX: i32 = 100_000;

/// Quiet-move ordering table keyed by (from, to) in 64-square indexing
pub type HistoryTable = [[i32; 64]; 64];

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Bounded move buffer; moves past capacity are dropped
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    count: usize,
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveList {
    pub fn new() -> Self {
        Self {
            moves: [Move::NULL; MAX_MOVES],
            count: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        if self.count < MAX_MOVES {
            self.moves[self.count] = mv;
            self.count += 1;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.count]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    pub fn contains(&self, mv: &Move) -> bool {
        self.as_slice().contains(mv)
    }

    pub fn first(&self) -> Option<Move> {
        self.as_slice().first().copied()
    }

    /// Highest score first; equal scores keep generation order
    pub fn sort_by_score(&mut self) {
        self.moves[..self.count].sort_by(|a, b| b.score.cmp(&a.score));
    }

    fn retain(&mut self, mut keep: impl FnMut(&Move) -> bool) {
        let mut kept = 0;
        for i in 0..self.count {
            if keep(&self.moves[i]) {
                self.moves[kept] = self.moves[i];
                kept += 1;
            }
        }
        self.count = kept;
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, i: usize) -> &Move {
        &self.as_slice()[i]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Attacker rank for MVV-LVA: pawn 1 .. king 6
#[inline]
fn lva_rank(kind: PieceKind) -> i32 {
    kind as i32 + 1
}

/// Most-valuable-victim / least-valuable-aggressor score
#[inline]
pub fn mvv_lva(victim: PieceKind, attacker: PieceKind) -> i32 {
    lva_rank(victim) * 100 + 6 - lva_rank(attacker)
}

#[inline]
pub fn history_index(mv: &Move) -> (usize, usize) {
    (sq120_to_64(mv.from), sq120_to_64(mv.to))
}

impl Board {
    /// Every pseudo-legal move for the side to move (may leave the king in check)
    pub fn generate_pseudo_moves(&self, list: &mut MoveList) {
        self.generate_pseudo(list, false);
    }

    /// Legal moves, ordered without history information
    pub fn generate_moves(&mut self) -> MoveList {
        self.generate_legal(None, false)
    }

    /// Legal moves, quiet moves ordered by `history`
    pub fn generate_moves_with_history(&mut self, history: &HistoryTable) -> MoveList {
        self.generate_legal(Some(history), false)
    }

    /// Legal captures only (including en passant), MVV-LVA ordered
    pub fn generate_captures(&mut self) -> MoveList {
        self.generate_legal(None, true)
    }

    fn generate_legal(&mut self, history: Option<&HistoryTable>, captures_only: bool) -> MoveList {
        let mut list = MoveList::new();
        self.generate_pseudo(&mut list, captures_only);

        let us = self.side;
        let them = us.opposite();
        for i in 0..list.count {
            let mv = list.moves[i];
            self.make_move(mv);
            let legal = !self.in_check(us);
            let checks = legal && self.in_check(them);
            self.undo_move();

            if !legal {
                list.moves[i].score = i32::MIN;
                continue;
            }
            let mut score = self.score_move(&mv, history);
            if checks && mv.is_quiet() {
                score += CHECK_BONUS;
            }
            list.moves[i].score = score;
        }
        list.retain(|m| m.score != i32::MIN);
        list.sort_by_score();
        list
    }

    fn score_move(&self, mv: &Move, history: Option<&HistoryTable>) -> i32 {
        if let Some(victim) = mv.captured {
            let attacker = self
                .piece_at(mv.from)
                .map_or(PieceKind::Pawn, |p| p.kind);
            return CAPTURE_BASE + mvv_lva(victim.kind, attacker);
        }
        if let Some(promo) = mv.promotion {
            return PROMOTION_BASE + promo.value();
        }
        match history {
            Some(table) => {
                let (f, t) = history_index(mv);
                table[f][t].min(HISTORY_MAX)
            }
            None => 0,
        }
    }

    fn generate_pseudo(&self, list: &mut MoveList, captures_only: bool) {
        let us = self.side;
        self.generate_pawn_moves(us, list, captures_only);
        self.generate_leaper_moves(us, PieceKind::Knight, &KNIGHT_OFFSETS, list, captures_only);
        self.generate_slider_moves(us, PieceKind::Bishop, &BISHOP_OFFSETS, list, captures_only);
        self.generate_slider_moves(us, PieceKind::Rook, &ROOK_OFFSETS, list, captures_only);
        self.generate_slider_moves(us, PieceKind::Queen, &BISHOP_OFFSETS, list, captures_only);
        self.generate_slider_moves(us, PieceKind::Queen, &ROOK_OFFSETS, list, captures_only);
        self.generate_leaper_moves(us, PieceKind::King, &KING_OFFSETS, list, captures_only);
        if !captures_only {
            self.generate_castling_moves(us, list);
        }
    }

    fn generate_pawn_moves(&self, us: Color, list: &mut MoveList, captures_only: bool) {
        let fwd = us.forward();
        let (start_rank, last_rank) = match us {
            Color::White => (1, 7),
            Color::Black => (6, 0),
        };

        for &from in self.piece_squares(Piece::new(PieceKind::Pawn, us)) {
            let one = offset(from, fwd);
            let promoting = rank_of(one) == last_rank;

            if !captures_only && self.is_empty(one) {
                push_pawn_move(list, from, one, None, promoting);
                let two = offset(one, fwd);
                if rank_of(from) == start_rank && self.is_empty(two) {
                    list.push(Move::new(from, two));
                }
            }

            for side_step in [1, -1] {
                let to = offset(from, fwd + side_step);
                match self.cell(to) {
                    Cell::Occupied(p) if p.color != us => {
                        push_pawn_move(list, from, to, Some(p), promoting)
                    }
                    Cell::Empty if self.ep == Some(to) => list.push(Move {
                        captured: Some(Piece::new(PieceKind::Pawn, us.opposite())),
                        ..Move::new(from, to)
                    }),
                    _ => {}
                }
            }
        }
    }

    fn generate_leaper_moves(
        &self,
        us: Color,
        kind: PieceKind,
        offsets: &[isize],
        list: &mut MoveList,
        captures_only: bool,
    ) {
        for &from in self.piece_squares(Piece::new(kind, us)) {
            for &d in offsets {
                let to = offset(from, d);
                match self.cell(to) {
                    Cell::Empty if !captures_only => list.push(Move::new(from, to)),
                    Cell::Occupied(p) if p.color != us => list.push(Move {
                        captured: Some(p),
                        ..Move::new(from, to)
                    }),
                    _ => {}
                }
            }
        }
    }

    fn generate_slider_moves(
        &self,
        us: Color,
        kind: PieceKind,
        dirs: &[isize],
        list: &mut MoveList,
        captures_only: bool,
    ) {
        for &from in self.piece_squares(Piece::new(kind, us)) {
            for &d in dirs {
                let mut to = offset(from, d);
                loop {
                    match self.cell(to) {
                        Cell::Empty => {
                            if !captures_only {
                                list.push(Move::new(from, to));
                            }
                            to = offset(to, d);
                        }
                        Cell::Occupied(p) => {
                            if p.color != us {
                                list.push(Move {
                                    captured: Some(p),
                                    ..Move::new(from, to)
                                });
                            }
                            break;
                        }
                        Cell::Offboard => break,
                    }
                }
            }
        }
    }

    // Rights, rook presence, empty path, and no attack on the king's start or transit square.
    // The destination square is covered by the legality filter.
    fn generate_castling_moves(&self, us: Color, list: &mut MoveList) {
        let them = us.opposite();
        let (king_from, k_bit, q_bit) = match us {
            Color::White => (E1, WK_CASTLE, WQ_CASTLE),
            Color::Black => (E8, BK_CASTLE, BQ_CASTLE),
        };
        let king = Piece::new(PieceKind::King, us);
        let rook = Cell::Occupied(Piece::new(PieceKind::Rook, us));
        if self.cell(king_from) != Cell::Occupied(king) || self.castling & (k_bit | q_bit) == 0 {
            return;
        }
        if self.is_square_attacked(king_from, them) {
            return;
        }

        let (f, g, h) = match us {
            Color::White => (F1, G1, offset(G1, 1)),
            Color::Black => (F8, G8, offset(G8, 1)),
        };
        if self.castling & k_bit != 0
            && self.cell(h) == rook
            && self.is_empty(f)
            && self.is_empty(g)
            && !self.is_square_attacked(f, them)
        {
            list.push(Move {
                castle: true,
                ..Move::new(king_from, g)
            });
        }

        let (d, c, b) = match us {
            Color::White => (D1, C1, B1),
            Color::Black => (D8, C8, B8),
        };
        let a = offset(b, -1);
        if self.castling & q_bit != 0
            && self.cell(a) == rook
            && self.is_empty(d)
            && self.is_empty(c)
            && self.is_empty(b)
            && !self.is_square_attacked(d, them)
        {
            list.push(Move {
                castle: true,
                ..Move::new(king_from, c)
            });
        }
    }

    /// Would `mv` leave the opponent in check
    pub fn gives_check(&mut self, mv: Move) -> bool {
        let them = self.side.opposite();
        self.make_move(mv);
        let check = self.in_check(them);
        self.undo_move();
        check
    }
}

fn push_pawn_move(
    list: &mut MoveList,
    from: usize,
    to: usize,
    captured: Option<Piece>,
    promoting: bool,
) {
    if promoting {
        for kind in PROMOTION_KINDS {
            list.push(Move {
                captured,
                promotion: Some(kind),
                ..Move::new(from, to)
            });
        }
    } else {
        list.push(Move {
            captured,
            ..Move::new(from, to)
        });
    }
}
