// Mailbox geometry: a 10x12 board whose outer cells are sentinels.
// Square ids are 120-based (A1 = 21, H8 = 98); the 64-based index runs A1 = 0 .. H8 = 63.

pub const BOARD_CELLS: usize = 120;

/// Marker returned by `sq120_to_64` for sentinel cells.
pub const OFFBOARD: usize = 99;

pub const A1: usize = 21;
pub const B1: usize = 22;
pub const C1: usize = 23;
pub const D1: usize = 24;
pub const E1: usize = 25;
pub const F1: usize = 26;
pub const G1: usize = 27;
pub const H1: usize = 28;
pub const A8: usize = 91;
pub const B8: usize = 92;
pub const C8: usize = 93;
pub const D8: usize = 94;
pub const E8: usize = 95;
pub const F8: usize = 96;
pub const G8: usize = 97;
pub const H8: usize = 98;

// Direction deltas in 120-space
pub const NORTH: isize = 10;
pub const SOUTH: isize = -10;
pub const EAST: isize = 1;
pub const WEST: isize = -1;
pub const NORTH_EAST: isize = 11;
pub const NORTH_WEST: isize = 9;
pub const SOUTH_EAST: isize = -9;
pub const SOUTH_WEST: isize = -11;

pub const KNIGHT_OFFSETS: [isize; 8] = [21, 19, 12, 8, -8, -12, -19, -21];
pub const BISHOP_OFFSETS: [isize; 4] = [NORTH_EAST, NORTH_WEST, SOUTH_EAST, SOUTH_WEST];
pub const ROOK_OFFSETS: [isize; 4] = [NORTH, EAST, WEST, SOUTH];
pub const KING_OFFSETS: [isize; 8] = [
    NORTH_EAST, NORTH, NORTH_WEST, EAST, WEST, SOUTH_EAST, SOUTH, SOUTH_WEST,
];

const fn build_120_to_64() -> [usize; BOARD_CELLS] {
    let mut table = [OFFBOARD; BOARD_CELLS];
    let mut rank = 0;
    while rank < 8 {
        let mut file = 0;
        while file < 8 {
            table[square(file, rank)] = rank * 8 + file;
            file += 1;
        }
        rank += 1;
    }
    table
}

const fn build_64_to_120() -> [usize; 64] {
    let mut table = [0; 64];
    let mut sq = 0;
    while sq < 64 {
        table[sq] = square(sq % 8, sq / 8);
        sq += 1;
    }
    table
}

static SQ120_TO_64: [usize; BOARD_CELLS] = build_120_to_64();
static SQ64_TO_120: [usize; 64] = build_64_to_120();

/// 120-based square from a file (0 = a) and rank (0 = first rank)
#[inline]
pub const fn square(file: usize, rank: usize) -> usize {
    21 + file + rank * 10
}

#[inline]
pub fn sq120_to_64(sq: usize) -> usize {
    SQ120_TO_64[sq]
}

#[inline]
pub fn sq64_to_120(sq: usize) -> usize {
    SQ64_TO_120[sq]
}

#[inline]
pub fn on_board(sq: usize) -> bool {
    sq < BOARD_CELLS && SQ120_TO_64[sq] != OFFBOARD
}

/// File 0..7 of an on-board 120-based square
#[inline]
pub fn file_of(sq: usize) -> usize {
    sq120_to_64(sq) % 8
}

/// Rank 0..7 of an on-board 120-based square
#[inline]
pub fn rank_of(sq: usize) -> usize {
    sq120_to_64(sq) / 8
}

/// Step from a square along an offset. Squares reached from an on-board square
/// with any piece offset stay inside the 120-cell array.
#[inline]
pub fn offset(sq: usize, delta: isize) -> usize {
    (sq as isize + delta) as usize
}

/// Convert a 120-based square to coordinate notation (e.g. 21 -> "a1")
pub fn square_to_coord(sq: usize) -> String {
    let file = (b'a' + file_of(sq) as u8) as char;
    let rank = (b'1' + rank_of(sq) as u8) as char;
    format!("{}{}", file, rank)
}

/// Parse coordinate notation ("e4") into a 120-based square
pub fn coord_to_square(coord: &str) -> Option<usize> {
    let bytes = coord.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }
    Some(square((file - b'a') as usize, (rank - b'1') as usize))
}

/// Vertical mirror of a 64-based index (a1 <-> a8)
#[inline]
pub fn mirror64(sq: usize) -> usize {
    sq ^ 56
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_squares_map_both_ways() {
        assert_eq!(sq64_to_120(0), A1);
        assert_eq!(sq64_to_120(63), H8);
        assert_eq!(sq120_to_64(A1), 0);
        assert_eq!(sq120_to_64(H8), 63);
        assert_eq!(sq120_to_64(0), OFFBOARD);
        assert_eq!(sq120_to_64(A1 - 1), OFFBOARD);
    }

    #[test]
    fn every_board_square_round_trips() {
        for sq in 0..64 {
            assert_eq!(sq120_to_64(sq64_to_120(sq)), sq);
        }
        let on: usize = (0..BOARD_CELLS).filter(|&s| on_board(s)).count();
        assert_eq!(on, 64);
    }

    #[test]
    fn coordinates() {
        assert_eq!(square_to_coord(E1), "e1");
        assert_eq!(square_to_coord(H8), "h8");
        assert_eq!(coord_to_square("e1"), Some(E1));
        assert_eq!(coord_to_square("a8"), Some(A8));
        assert_eq!(coord_to_square("i1"), None);
        assert_eq!(coord_to_square("a9"), None);
        assert_eq!(coord_to_square("a"), None);
    }

    #[test]
    fn leaper_steps_never_leave_the_array() {
        for sq in 0..64 {
            let from = sq64_to_120(sq);
            for &d in KNIGHT_OFFSETS.iter().chain(KING_OFFSETS.iter()) {
                assert!(offset(from, d) < BOARD_CELLS);
            }
        }
    }
}
