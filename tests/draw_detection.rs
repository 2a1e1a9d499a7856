use alfiere::board::{move_to_uci, Board, START_FEN};
use alfiere::search::{Search, SearchParams};

fn play(board: &mut Board, moves: &[&str]) {
    for m in moves {
        board
            .apply_uci_move(m)
            .unwrap_or_else(|e| panic!("move {} rejected: {}", m, e));
    }
}

#[test]
fn test_threefold_repetition_simple() {
    alfiere::init();
    let mut board = Board::from_fen(START_FEN).unwrap();

    // 1. Nf3 Nf6 2. Ng1 Ng8 3. Nf3 Nf6 4. Ng1 Ng8: the start position occurs a third time
    let moves = [
        "g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8",
    ];
    for (i, m) in moves.iter().enumerate() {
        board.apply_uci_move(m).unwrap();
        if i < 7 {
            assert!(!board.is_repetition(), "no threefold yet after move {}", i + 1);
        }
    }
    assert!(board.is_repetition());
    assert!(board.is_draw());

    board.undo_move();
    assert!(!board.is_repetition());
}

#[test]
fn test_twofold_is_not_a_draw() {
    alfiere::init();
    let mut board = Board::startpos();
    play(&mut board, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    assert!(!board.is_draw());
}

#[test]
fn test_irreversible_move_resets_window() {
    alfiere::init();
    let mut board = Board::startpos();
    play(&mut board, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    // a pawn move makes earlier positions unreachable
    play(&mut board, &["e2e4", "e7e5"]);
    assert_eq!(board.halfmove, 0);
    play(&mut board, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    assert!(!board.is_repetition());
    play(&mut board, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    assert!(board.is_repetition());
}

#[test]
fn test_different_castling_rights_are_different_positions() {
    alfiere::init();
    let mut board =
        Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    // the king walk drops white's rights, so the first position never recurs
    play(
        &mut board,
        &["e1f1", "e8f8", "f1e1", "f8e8", "e1f1", "e8f8", "f1e1", "f8e8"],
    );
    assert!(!board.is_repetition());
    play(&mut board, &["e1f1", "e8f8", "f1e1", "f8e8"]);
    assert!(board.is_repetition());
}

#[test]
fn test_50_move_rule() {
    alfiere::init();
    let mut board = Board::from_fen("8/8/8/8/8/8/1R6/k6K w - - 99 1").unwrap();
    assert!(!board.is_draw(), "99 halfmoves is not yet draw");

    board.apply_uci_move("b2b3").unwrap();
    assert!(board.is_fifty_move_draw());
    assert!(board.is_draw(), "100 halfmoves should be draw (50 move rule)");
}

#[test]
fn test_capture_resets_clock() {
    alfiere::init();
    let mut board = Board::from_fen("4k3/8/8/8/8/8/1r6/1R2K3 w - - 98 60").unwrap();
    board.apply_uci_move("b1b2").unwrap();
    assert_eq!(board.halfmove, 0);
    assert!(!board.is_draw());
}

#[test]
fn test_search_root_ignores_repetition() {
    alfiere::init();
    // perpetual check: the queen shuttles between d8 and d3
    let mut board = Board::from_fen("6k1/5pp1/7p/8/8/8/q4PPP/3Q2K1 w - - 0 1").unwrap();
    let cycle = ["d1d8", "g8h7", "d8d3", "h7g8"];
    play(&mut board, &cycle);
    play(&mut board, &["d3d8", "g8h7", "d8d3", "h7g8"]);
    assert!(!board.is_repetition());
    play(&mut board, &["d3d8", "g8h7", "d8d3", "h7g8"]);
    assert!(board.is_repetition());

    // the root itself is never scored as a draw, so a move is still chosen
    let mut search = Search::new(board, SearchParams::new().max_depth(2));
    let result = search.search();
    assert!(!result.best_move.is_null());
    assert_eq!(result.depth, 2);
}

// White has a bare king against king and rook
const ROOK_DOWN: &str = "7k/r7/8/8/8/8/8/7K w - - 0 1";

fn score_at(board: &Board, depth: u32) -> (i32, String) {
    let result = Search::new(board.clone(), SearchParams::new().max_depth(depth)).search();
    (result.score, move_to_uci(result.best_move))
}

#[test]
fn test_losing_side_takes_the_repetition() {
    alfiere::init();
    let fresh = Board::from_fen(ROOK_DOWN).unwrap();
    let (score, _) = score_at(&fresh, 3);
    assert!(score < -300, "a rook down should look lost, got {}", score);

    // after two king shuffles Kg1 brings the same position up a third time
    let mut board = fresh;
    play(
        &mut board,
        &["h1g1", "h8g8", "g1h1", "g8h8", "h1g1", "h8g8", "g1h1", "g8h8"],
    );
    for depth in [1, 3] {
        let (score, best) = score_at(&board, depth);
        assert_eq!(score, 0, "depth {}", depth);
        assert_eq!(best, "h1g1", "depth {}", depth);
    }
}

#[test]
fn test_fifty_move_rule_inside_search() {
    alfiere::init();
    // every white move is a quiet king move, so each reply completes the hundredth halfmove
    let board = Board::from_fen("7k/r7/8/8/8/8/8/7K w - - 99 80").unwrap();
    for depth in [1, 3] {
        let (score, best) = score_at(&board, depth);
        assert_eq!(score, 0, "depth {}", depth);
        assert_ne!(best, "0000");
    }
}
