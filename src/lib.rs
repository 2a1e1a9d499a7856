pub mod attack;
pub mod board;
pub mod error;
pub mod eval;
pub mod movegen;
pub mod perft;
pub mod search;
pub mod time;
pub mod uci;
pub mod utils;
pub mod zobrist;

pub fn init() {
    zobrist::init_zobrist();
}
