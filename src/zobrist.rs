// Zobrist hashing with precomputed tables
use crate::board::{Board, Color};
use crate::utils::{file_of, sq120_to_64};
use std::sync::OnceLock;

pub struct ZobristKeys {
    /// [piece index][64-based square]
    pub piece: [[u64; 64]; 12],
    pub side: u64,
    /// One key per castling-rights mask (4 bits)
    pub castling: [u64; 16],
    pub ep_file: [u64; 8],
}

static KEYS: OnceLock<ZobristKeys> = OnceLock::new();

// SplitMix64 stream; fixed seed so hashes are reproducible across runs
struct SplitMix64(u64);

impl SplitMix64 {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }
}

fn build_keys() -> ZobristKeys {
    let mut rng = SplitMix64(0xdeadbeefdeadbeef);
    let mut piece = [[0u64; 64]; 12];
    for row in piece.iter_mut() {
        for key in row.iter_mut() {
            *key = rng.next();
        }
    }
    let side = rng.next();
    let mut castling = [0u64; 16];
    for key in castling.iter_mut() {
        *key = rng.next();
    }
    let mut ep_file = [0u64; 8];
    for key in ep_file.iter_mut() {
        *key = rng.next();
    }
    ZobristKeys {
        piece,
        side,
        castling,
        ep_file,
    }
}

pub fn init_zobrist() {
    keys();
}

#[inline]
pub fn keys() -> &'static ZobristKeys {
    KEYS.get_or_init(build_keys)
}

/// Key of a piece (by piece index) standing on a 120-based square
#[inline]
pub fn piece_key(piece_idx: usize, sq: usize) -> u64 {
    keys().piece[piece_idx][sq120_to_64(sq)]
}

#[inline]
pub fn castling_key(rights: u8) -> u64 {
    keys().castling[(rights & 0xF) as usize]
}

#[inline]
pub fn ep_key(ep_sq: usize) -> u64 {
    keys().ep_file[file_of(ep_sq)]
}

#[inline]
pub fn side_key() -> u64 {
    keys().side
}

/// Hash of the board computed from first principles, ignoring the running value
pub fn recalc_zobrist_full(board: &Board) -> u64 {
    let mut h = 0u64;
    for piece in Board::all_pieces() {
        for &sq in board.piece_squares(piece) {
            h ^= piece_key(piece.index(), sq);
        }
    }
    if board.side == Color::Black {
        h ^= side_key();
    }
    h ^= castling_key(board.castling);
    if let Some(ep_sq) = board.ep {
        h ^= ep_key(ep_sq);
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_distinct() {
        let k = keys();
        let mut seen = HashSet::new();
        for row in k.piece.iter() {
            for &key in row.iter() {
                assert!(seen.insert(key));
            }
        }
        assert!(seen.insert(k.side));
        for &key in k.castling.iter().chain(k.ep_file.iter()) {
            assert!(seen.insert(key));
        }
    }

    #[test]
    fn keys_are_stable_between_calls() {
        assert_eq!(piece_key(3, 45), piece_key(3, 45));
        assert_eq!(keys().side, side_key());
    }
}
