// Position model on a 10x12 mailbox.
// Square ids are 120-based (see utils); cells outside the 8x8 core hold `Cell::Offboard`
// so ray walks stop on a single sentinel test.

use crate::error::{FenError, MoveParseError};
use crate::utils::{
    coord_to_square, offset, on_board, rank_of, sq64_to_120, square, square_to_coord,
    A1, A8, BOARD_CELLS, C1, C8, D1, D8, E1, E8, F1, F8, G1, G8, H1, H8, NORTH, SOUTH,
};
use crate::zobrist;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    #[inline]
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Forward direction of this side's pawns
    #[inline]
    pub fn forward(self) -> isize {
        match self {
            Color::White => NORTH,
            Color::Black => SOUTH,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    fn not(self) -> Color {
        self.opposite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Material value in centipawns; the king carries none
    #[inline]
    pub fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 0,
        }
    }

    /// Lowercase letter used in FEN and coordinate promotions
    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_char(ch: char) -> Option<PieceKind> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// One of the 12 piece kinds (type plus colour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// Index into per-piece tables: white pieces 0-5, black pieces 6-11
    #[inline]
    pub fn index(self) -> usize {
        self.color.index() * 6 + self.kind as usize
    }

    pub fn from_char(ch: char) -> Option<Piece> {
        let kind = PieceKind::from_char(ch)?;
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, color))
    }

    pub fn to_char(self) -> char {
        let ch = self.kind.to_char();
        match self.color {
            Color::White => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Offboard,
    Empty,
    Occupied(Piece),
}

impl Cell {
    #[inline]
    pub fn piece(self) -> Option<Piece> {
        match self {
            Cell::Occupied(p) => Some(p),
            _ => None,
        }
    }
}

// Castling bit permissions
pub const WK_CASTLE: u8 = 1;
pub const WQ_CASTLE: u8 = 2;
pub const BK_CASTLE: u8 = 4;
pub const BQ_CASTLE: u8 = 8;
pub const ALL_CASTLE: u8 = WK_CASTLE | WQ_CASTLE | BK_CASTLE | BQ_CASTLE;

/// Game-length ceiling in plies
pub const MAX_GAME_PLY: usize = 1024;

/// Capacity of one piece list (8 pawns may promote to the same kind)
pub const MAX_PIECES_PER_KIND: usize = 10;

// Rights that survive a move touching each square
const fn build_castle_mask() -> [u8; BOARD_CELLS] {
    let mut mask = [ALL_CASTLE; BOARD_CELLS];
    mask[A1] = ALL_CASTLE & !WQ_CASTLE;
    mask[E1] = ALL_CASTLE & !(WK_CASTLE | WQ_CASTLE);
    mask[H1] = ALL_CASTLE & !WK_CASTLE;
    mask[A8] = ALL_CASTLE & !BQ_CASTLE;
    mask[E8] = ALL_CASTLE & !(BK_CASTLE | BQ_CASTLE);
    mask[H8] = ALL_CASTLE & !BK_CASTLE;
    mask
}

static CASTLE_MASK: [u8; BOARD_CELLS] = build_castle_mask();

/// Rook relocation paired with a castling king destination
pub fn castle_rook_squares(king_to: usize) -> (usize, usize) {
    match king_to {
        G1 => (H1, F1),
        C1 => (A1, D1),
        G8 => (H8, F8),
        C8 => (A8, D8),
        _ => panic!("castling move with king destination {}", king_to),
    }
}

/// A move plus its ordering score. The score only ranks candidates; equality ignores it.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub from: usize,
    pub to: usize,
    pub captured: Option<Piece>,
    pub promotion: Option<PieceKind>,
    pub castle: bool,
    pub score: i32,
}

impl Move {
    pub const NULL: Move = Move {
        from: 0,
        to: 0,
        captured: None,
        promotion: None,
        castle: false,
        score: 0,
    };

    pub fn new(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            ..Self::NULL
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.from == 0 && self.to == 0
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub fn is_quiet(&self) -> bool {
        self.captured.is_none() && self.promotion.is_none()
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.promotion == other.promotion
            && self.castle == other.castle
    }
}

impl Eq for Move {}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&move_to_uci(*self))
    }
}

/// Convert a Move to coordinate notation (e.g. "e2e4" or "e7e8q")
pub fn move_to_uci(m: Move) -> String {
    if m.is_null() {
        return "0000".to_string();
    }
    let mut uci = format!("{}{}", square_to_coord(m.from), square_to_coord(m.to));
    if let Some(promo) = m.promotion {
        uci.push(promo.to_char());
    }
    uci
}

/// Parse coordinate notation and find the matching generated legal move
pub fn parse_uci_move(board: &mut Board, uci: &str) -> Result<Move, MoveParseError> {
    if uci.len() < 4 || !uci.is_ascii() {
        return Err(MoveParseError::TooShort(uci.to_string()));
    }
    let from =
        coord_to_square(&uci[0..2]).ok_or_else(|| MoveParseError::InvalidSquare(uci.to_string()))?;
    let to =
        coord_to_square(&uci[2..4]).ok_or_else(|| MoveParseError::InvalidSquare(uci.to_string()))?;
    let promotion = match uci[4..].chars().next() {
        None => None,
        Some(ch) => match PieceKind::from_char(ch) {
            Some(kind @ (PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)) => {
                Some(kind)
            }
            _ => return Err(MoveParseError::InvalidPromotion(ch)),
        },
    };

    let legal = board.generate_moves();
    legal
        .iter()
        .find(|m| m.from == from && m.to == to && m.promotion == promotion)
        .copied()
        .ok_or_else(|| MoveParseError::Illegal(uci.to_string()))
}

/// One history entry: state needed to take back a move
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    /// Position hash before the move
    pub hash: u64,
    pub castling: u8,
    pub ep: Option<usize>,
    pub halfmove: u16,
    /// The applied move with its captured piece filled in
    pub mv: Move,
}

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Clone)]
pub struct Board {
    cells: [Cell; BOARD_CELLS],
    piece_list: [[usize; MAX_PIECES_PER_KIND]; 12],
    piece_count: [usize; 12],
    material: [i32; 2],
    pub side: Color,
    pub castling: u8,
    pub ep: Option<usize>,
    pub halfmove: u16,
    pub fullmove: u16,
    pub zobrist: u64,
    // One entry per ply played since the position was set up, at most MAX_GAME_PLY
    history: Vec<Snapshot>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Empty board: every core cell empty, every sentinel cell offboard
    pub fn new() -> Self {
        let mut cells = [Cell::Offboard; BOARD_CELLS];
        for sq in 0..64 {
            cells[sq64_to_120(sq)] = Cell::Empty;
        }
        Self {
            cells,
            piece_list: [[0; MAX_PIECES_PER_KIND]; 12],
            piece_count: [0; 12],
            material: [0; 2],
            side: Color::White,
            castling: 0,
            ep: None,
            halfmove: 0,
            fullmove: 1,
            zobrist: zobrist::castling_key(0),
            history: Vec::with_capacity(MAX_GAME_PLY),
        }
    }

    pub fn startpos() -> Self {
        Self::from_fen(START_FEN).expect("start position FEN is valid")
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Self::new();
        board.parse_fen(fen)?;
        Ok(board)
    }

    /// Replace this position with the one described by `fen`; on error the board is untouched
    pub fn set_from_fen(&mut self, fen: &str) -> Result<(), FenError> {
        *self = Self::from_fen(fen)?;
        Ok(())
    }

    #[inline]
    pub fn cell(&self, sq: usize) -> Cell {
        self.cells[sq]
    }

    #[inline]
    pub fn piece_at(&self, sq: usize) -> Option<Piece> {
        self.cells[sq].piece()
    }

    #[inline]
    pub fn is_empty(&self, sq: usize) -> bool {
        self.cells[sq] == Cell::Empty
    }

    /// Squares holding `piece`, in unspecified order
    #[inline]
    pub fn piece_squares(&self, piece: Piece) -> &[usize] {
        let i = piece.index();
        &self.piece_list[i][..self.piece_count[i]]
    }

    #[inline]
    pub fn piece_count(&self, piece: Piece) -> usize {
        self.piece_count[piece.index()]
    }

    /// Sum of non-king piece values for a side
    #[inline]
    pub fn material(&self, color: Color) -> i32 {
        self.material[color.index()]
    }

    #[inline]
    pub fn king_sq(&self, color: Color) -> usize {
        let king = Piece::new(PieceKind::King, color);
        assert!(self.piece_count(king) > 0, "no {:?} king on the board", color);
        self.piece_list[king.index()][0]
    }

    /// Running hash of the position
    #[inline]
    pub fn position_hash(&self) -> u64 {
        self.zobrist
    }

    /// Hash recomputed from scratch
    pub fn recalc_zobrist(&self) -> u64 {
        zobrist::recalc_zobrist_full(self)
    }

    /// Plies applied since setup; always equals the history depth
    #[inline]
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    pub fn all_pieces() -> impl Iterator<Item = Piece> {
        [Color::White, Color::Black]
            .into_iter()
            .flat_map(|c| PieceKind::ALL.into_iter().map(move |k| Piece::new(k, c)))
    }

    fn add_piece(&mut self, sq: usize, piece: Piece) {
        debug_assert_eq!(self.cells[sq], Cell::Empty);
        let i = piece.index();
        assert!(
            self.piece_count[i] < MAX_PIECES_PER_KIND,
            "piece list for {:?} is full",
            piece
        );
        self.cells[sq] = Cell::Occupied(piece);
        self.piece_list[i][self.piece_count[i]] = sq;
        self.piece_count[i] += 1;
        self.material[piece.color.index()] += piece.kind.value();
        self.zobrist ^= zobrist::piece_key(i, sq);
    }

    fn remove_piece(&mut self, sq: usize, piece: Piece) {
        let i = piece.index();
        let count = self.piece_count[i];
        let slot = self.piece_list[i][..count]
            .iter()
            .position(|&s| s == sq)
            .unwrap_or_else(|| panic!("{:?} not found on {}", piece, square_to_coord(sq)));
        // swap-remove: the last live entry takes the freed slot
        self.piece_list[i][slot] = self.piece_list[i][count - 1];
        self.piece_count[i] = count - 1;
        self.cells[sq] = Cell::Empty;
        self.material[piece.color.index()] -= piece.kind.value();
        self.zobrist ^= zobrist::piece_key(i, sq);
    }

    fn set_ep(&mut self, ep: Option<usize>) {
        if let Some(old) = self.ep {
            self.zobrist ^= zobrist::ep_key(old);
        }
        if let Some(new) = ep {
            self.zobrist ^= zobrist::ep_key(new);
        }
        self.ep = ep;
    }

    fn set_castling(&mut self, rights: u8) {
        if rights != self.castling {
            self.zobrist ^= zobrist::castling_key(self.castling);
            self.zobrist ^= zobrist::castling_key(rights);
            self.castling = rights;
        }
    }

    /// Apply a move generated for this position and push its history entry
    pub fn make_move(&mut self, mv: Move) {
        let us = self.side;
        let piece = self
            .piece_at(mv.from)
            .unwrap_or_else(|| panic!("make_move {}: source square is empty", mv));
        debug_assert_eq!(piece.color, us);

        let en_passant = piece.kind == PieceKind::Pawn && Some(mv.to) == self.ep;
        let captured_sq = if en_passant {
            offset(mv.to, -us.forward())
        } else {
            mv.to
        };
        let captured = self.piece_at(captured_sq);

        debug_assert!(self.history.len() < MAX_GAME_PLY, "game history overflow");
        self.history.push(Snapshot {
            hash: self.zobrist,
            castling: self.castling,
            ep: self.ep,
            halfmove: self.halfmove,
            mv: Move { captured, ..mv },
        });

        if let Some(victim) = captured {
            self.remove_piece(captured_sq, victim);
        }
        self.remove_piece(mv.from, piece);
        let placed = match mv.promotion {
            Some(kind) => Piece::new(kind, us),
            None => piece,
        };
        self.add_piece(mv.to, placed);

        if mv.castle {
            let rook = Piece::new(PieceKind::Rook, us);
            let (rook_from, rook_to) = castle_rook_squares(mv.to);
            self.remove_piece(rook_from, rook);
            self.add_piece(rook_to, rook);
        }

        let double_push = piece.kind == PieceKind::Pawn && mv.from.abs_diff(mv.to) == 20;
        self.set_ep(if double_push {
            Some((mv.from + mv.to) / 2)
        } else {
            None
        });
        self.set_castling(self.castling & CASTLE_MASK[mv.from] & CASTLE_MASK[mv.to]);

        if piece.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove = 0;
        } else {
            self.halfmove += 1;
        }
        if us == Color::Black {
            self.fullmove += 1;
        }
        self.side = us.opposite();
        self.zobrist ^= zobrist::side_key();
    }

    /// Take back the most recent move. Panics when no move has been applied.
    pub fn undo_move(&mut self) {
        let snap = self
            .history
            .pop()
            .expect("undo_move called with an empty history");
        let mv = snap.mv;
        let us = self.side.opposite();
        self.side = us;
        if us == Color::Black {
            self.fullmove -= 1;
        }

        if mv.castle {
            let rook = Piece::new(PieceKind::Rook, us);
            let (rook_from, rook_to) = castle_rook_squares(mv.to);
            self.remove_piece(rook_to, rook);
            self.add_piece(rook_from, rook);
        }

        let placed = self
            .piece_at(mv.to)
            .unwrap_or_else(|| panic!("undo_move {}: destination square is empty", mv));
        self.remove_piece(mv.to, placed);
        let original = if mv.promotion.is_some() {
            Piece::new(PieceKind::Pawn, us)
        } else {
            placed
        };
        self.add_piece(mv.from, original);

        if let Some(victim) = mv.captured {
            let en_passant = original.kind == PieceKind::Pawn && Some(mv.to) == snap.ep;
            let captured_sq = if en_passant {
                offset(mv.to, -us.forward())
            } else {
                mv.to
            };
            self.add_piece(captured_sq, victim);
        }

        self.castling = snap.castling;
        self.ep = snap.ep;
        self.halfmove = snap.halfmove;
        self.zobrist = snap.hash;
    }

    /// Map coordinate notation to a legal move and apply it
    ///
    /// Refused once the history holds `MAX_GAME_PLY - 1` plies so the search
    /// always has a ply of headroom.
    pub fn apply_uci_move(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        if self.history.len() + 1 >= MAX_GAME_PLY {
            return Err(MoveParseError::HistoryFull(self.history.len()));
        }
        let mv = parse_uci_move(self, uci)?;
        self.make_move(mv);
        Ok(mv)
    }

    /// Threefold repetition, scanning back only over the current fifty-move window
    pub fn is_repetition(&self) -> bool {
        let len = self.history.len();
        let start = len.saturating_sub(self.halfmove as usize);
        let mut repeated = 1;
        for snap in &self.history[start..] {
            if snap.hash == self.zobrist {
                repeated += 1;
                if repeated >= 3 {
                    return true;
                }
            }
        }
        false
    }

    #[inline]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove >= 100
    }

    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw() || self.is_repetition()
    }

    /// Check the piece-list, material and hash invariants against the square array
    pub fn validate(&self) -> Result<(), String> {
        let mut material = [0i32; 2];
        for piece in Self::all_pieces() {
            for &sq in self.piece_squares(piece) {
                if self.cells[sq] != Cell::Occupied(piece) {
                    return Err(format!(
                        "{:?} listed on {} but the square holds {:?}",
                        piece,
                        square_to_coord(sq),
                        self.cells[sq]
                    ));
                }
                material[piece.color.index()] += piece.kind.value();
            }
        }
        for sq in 0..BOARD_CELLS {
            match self.cells[sq] {
                Cell::Offboard if on_board(sq) => {
                    return Err(format!("core square {} marked offboard", sq));
                }
                Cell::Empty | Cell::Occupied(_) if !on_board(sq) => {
                    return Err(format!("sentinel cell {} is not offboard", sq));
                }
                Cell::Occupied(p) if !self.piece_squares(p).contains(&sq) => {
                    return Err(format!(
                        "{:?} on {} missing from its list",
                        p,
                        square_to_coord(sq)
                    ));
                }
                _ => {}
            }
        }
        if material != self.material {
            return Err(format!(
                "material {:?} but pieces sum to {:?}",
                self.material, material
            ));
        }
        let fresh = self.recalc_zobrist();
        if fresh != self.zobrist {
            return Err(format!(
                "running hash {:016x} differs from recomputed {:016x}",
                self.zobrist, fresh
            ));
        }
        Ok(())
    }

    fn parse_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let mut parts = fen.split_whitespace();
        let piece_part = parts.next().ok_or(FenError::MissingField("piece placement"))?;
        let side_part = parts.next().ok_or(FenError::MissingField("side to move"))?;
        let castle_part = parts.next().unwrap_or("-");
        let ep_part = parts.next().unwrap_or("-");
        let halfmove_part = parts.next().unwrap_or("0");
        let fullmove_part = parts.next().unwrap_or("1");

        // Ranks are listed from the eighth down to the first
        let mut rank: usize = 7;
        let mut file: usize = 0;
        for ch in piece_part.chars() {
            match ch {
                '/' => {
                    if file != 8 {
                        return Err(FenError::IncompletePlacement);
                    }
                    rank = rank.checked_sub(1).ok_or(FenError::PlacementOverflow)?;
                    file = 0;
                }
                '1'..='8' => file += ch as usize - '0' as usize,
                _ => {
                    let piece = Piece::from_char(ch).ok_or(FenError::InvalidPiece(ch))?;
                    if file > 7 {
                        return Err(FenError::PlacementOverflow);
                    }
                    if self.piece_count(piece) == MAX_PIECES_PER_KIND {
                        return Err(FenError::PlacementOverflow);
                    }
                    self.add_piece(square(file, rank), piece);
                    file += 1;
                }
            }
            if file > 8 {
                return Err(FenError::PlacementOverflow);
            }
        }
        if rank != 0 || file != 8 {
            return Err(FenError::IncompletePlacement);
        }
        for (color, name) in [(Color::White, "white"), (Color::Black, "black")] {
            if self.piece_count(Piece::new(PieceKind::King, color)) != 1 {
                return Err(FenError::MissingKing(name));
            }
            // every pawn may still promote into any piece list
            let pawns = self.piece_count(Piece::new(PieceKind::Pawn, color));
            for kind in [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
                if self.piece_count(Piece::new(kind, color)) + pawns > MAX_PIECES_PER_KIND {
                    return Err(FenError::TooManyPieces(name));
                }
            }
        }

        self.side = match side_part {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidSide(other.to_string())),
        };

        let mut rights = 0u8;
        for ch in castle_part.chars() {
            match ch {
                'K' => rights |= WK_CASTLE,
                'Q' => rights |= WQ_CASTLE,
                'k' => rights |= BK_CASTLE,
                'q' => rights |= BQ_CASTLE,
                '-' => {}
                _ => return Err(FenError::InvalidCastling(ch)),
            }
        }
        self.castling = rights;

        // The target must sit behind a pawn that just made a double push
        let ep_rank = if self.side == Color::White { 5 } else { 2 };
        self.ep = match ep_part {
            "-" => None,
            s => match coord_to_square(s) {
                Some(sq)
                    if rank_of(sq) == ep_rank
                        && self.cells[sq] == Cell::Empty
                        && self.piece_at(offset(sq, -self.side.forward()))
                            == Some(Piece::new(PieceKind::Pawn, !self.side)) =>
                {
                    Some(sq)
                }
                _ => return Err(FenError::InvalidEnPassant(s.to_string())),
            },
        };

        if self.is_square_attacked(self.king_sq(!self.side), self.side) {
            return Err(FenError::OpponentInCheck);
        }

        self.halfmove = halfmove_part
            .parse()
            .map_err(|_| FenError::InvalidCounter(halfmove_part.to_string()))?;
        self.fullmove = fullmove_part
            .parse::<u16>()
            .map_err(|_| FenError::InvalidCounter(fullmove_part.to_string()))?
            .max(1);

        self.history.clear();
        self.zobrist = self.recalc_zobrist();
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_at(square(file, rank)) {
                    Some(p) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(p.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }
        fen.push_str(if self.side == Color::White { " w " } else { " b " });
        if self.castling == 0 {
            fen.push('-');
        } else {
            for (bit, ch) in [
                (WK_CASTLE, 'K'),
                (WQ_CASTLE, 'Q'),
                (BK_CASTLE, 'k'),
                (BQ_CASTLE, 'q'),
            ] {
                if self.castling & bit != 0 {
                    fen.push(ch);
                }
            }
        }
        fen.push(' ');
        match self.ep {
            Some(sq) => fen.push_str(&square_to_coord(sq)),
            None => fen.push('-'),
        }
        fen.push_str(&format!(" {} {}", self.halfmove, self.fullmove));
        fen
    }
}

// Positions compare by content: piece lists by membership, not slot order
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        let same_lists = Self::all_pieces().all(|p| {
            let mut a = self.piece_squares(p).to_vec();
            let mut b = other.piece_squares(p).to_vec();
            a.sort_unstable();
            b.sort_unstable();
            a == b
        });
        same_lists
            && self.cells == other.cells
            && self.material == other.material
            && self.side == other.side
            && self.castling == other.castling
            && self.ep == other.ep
            && self.halfmove == other.halfmove
            && self.fullmove == other.fullmove
            && self.zobrist == other.zobrist
            && self.history.len() == other.history.len()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_fen())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                match self.piece_at(square(file, rank)) {
                    Some(p) => write!(f, "{} ", p.to_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")?;
        writeln!(
            f,
            "{} to move",
            if self.side == Color::White {
                "white"
            } else {
                "black"
            }
        )?;
        if let Some(ep) = self.ep {
            writeln!(f, "en-passant square: {}", square_to_coord(ep))?;
        }
        writeln!(f, "50 move rule: {}", self.halfmove)
    }
}
