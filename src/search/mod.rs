//! Search engine for the Alfiere chess engine

pub mod params;
pub mod search;
pub mod stats;
pub mod thread_mgr;

pub use self::params::SearchParams;
pub use self::search::{format_score, Search, SearchReport, SearchResult, INFINITE, MATE, MAX_PLY};
pub use self::stats::SearchStats;
pub use self::thread_mgr::SearchThread;
pub use crate::board::Move;
