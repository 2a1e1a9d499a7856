//! Background search task for Alfiere
//!
//! At most one search runs at a time. The search owns the board while it
//! runs; the caller gets it back by joining, which happens on every stop so
//! that no command can touch the position while the worker is using it.

use crate::eval::{Evaluator, PsqtEvaluator};
use crate::search::search::{Search, SearchReport, SearchResult};
use log::{debug, warn};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;

/// Handle to a search running on its own thread
pub struct SearchThread<E: Evaluator + 'static = PsqtEvaluator> {
    stop_flag: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<(Search<E>, SearchResult)>>,
}

impl<E: Evaluator + 'static> SearchThread<E> {
    /// Start `search` in the background.
    ///
    /// `on_iteration` sees each completed depth and `on_finish` the final result;
    /// both run on the worker. With `hold_until_stopped` the worker waits for
    /// a stop request before calling `on_finish` (used for infinite analysis).
    pub fn spawn<R, F>(
        search: Search<E>,
        hold_until_stopped: bool,
        mut on_iteration: R,
        on_finish: F,
    ) -> Self
    where
        R: FnMut(&SearchReport<'_>) + Send + 'static,
        F: FnOnce(&SearchResult) + Send + 'static,
    {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let mut search = search.with_stop_flag(Arc::clone(&stop_flag));
        let worker_flag = Arc::clone(&stop_flag);

        let handle = thread::spawn(move || {
            debug!("search thread started");
            let result = search.run(|report| on_iteration(report));
            // parked until request_stop unparks us; wakeups may be spurious
            if hold_until_stopped {
                while !worker_flag.load(Ordering::Acquire) {
                    thread::park();
                }
            }
            on_finish(&result);
            debug!(
                "search thread finished: depth {} nodes {}",
                result.depth, result.nodes
            );
            (search, result)
        });

        Self {
            stop_flag,
            handle: Some(handle),
        }
    }

    /// True once the worker has returned and `join` will not block
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::Release);
        if let Some(handle) = &self.handle {
            handle.thread().unpark();
        }
    }

    /// Request cancellation and wait for the worker to hand the search back
    pub fn stop(mut self) -> Option<(Search<E>, SearchResult)> {
        self.request_stop();
        self.join_worker()
    }

    /// Wait for the worker without requesting a stop
    pub fn join(mut self) -> Option<(Search<E>, SearchResult)> {
        self.join_worker()
    }

    fn join_worker(&mut self) -> Option<(Search<E>, SearchResult)> {
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(parts) => Some(parts),
            Err(_) => {
                warn!("search thread panicked");
                None
            }
        }
    }
}

impl<E: Evaluator + 'static> Drop for SearchThread<E> {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.request_stop();
            let _ = self.join_worker();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::search::SearchParams;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    #[test]
    fn join_returns_board_unchanged() {
        let board = Board::startpos();
        let search = Search::new(board.clone(), SearchParams::new().max_depth(2));
        let thread = SearchThread::spawn(search, false, |_| {}, |_| {});
        let (search, result) = thread.join().unwrap();
        assert_eq!(result.depth, 2);
        assert_eq!(search.board(), &board);
    }

    #[test]
    fn finish_callback_runs_once() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let search = Search::new(Board::startpos(), SearchParams::new().max_depth(1));
        let thread = SearchThread::spawn(search, false, |_| {}, move |r| {
            sink.lock().unwrap().push(r.best_move);
        });
        let _ = thread.join();
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn held_search_waits_for_stop() {
        let search = Search::new(Board::startpos(), SearchParams::new().max_depth(1));
        let thread = SearchThread::spawn(search, true, |_| {}, |_| {});
        thread::sleep(Duration::from_millis(50));
        assert!(!thread.is_finished());
        let (_, result) = thread.stop().unwrap();
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn stop_wakes_a_parked_worker() {
        let search = Search::new(Board::startpos(), SearchParams::new().max_depth(1));
        let thread = SearchThread::spawn(search, true, |_| {}, |_| {});
        thread::sleep(Duration::from_millis(50));

        // a stray unpark without the flag keeps the worker held
        if let Some(handle) = &thread.handle {
            handle.thread().unpark();
        }
        thread::sleep(Duration::from_millis(20));
        assert!(!thread.is_finished());

        let started = Instant::now();
        let (_, result) = thread.stop().unwrap();
        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(result.depth, 1);
    }
}
