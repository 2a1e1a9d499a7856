use alfiere::board::Board;
use alfiere::perft::perft;
use shakmaty::fen::Fen;
use shakmaty::{Chess, Position};

fn run_perft_check(fen_str: &str, depth: u32, name: &str) {
    let mut board = Board::from_fen(fen_str).expect("Valid FEN");
    let ours = perft(&mut board, depth);

    let fen: Fen = fen_str.parse().unwrap();
    let pos: Chess = fen
        .into_position(shakmaty::CastlingMode::Standard)
        .expect("Shakmaty should accept FEN");
    let reference = shakmaty_perft(&pos, depth);

    assert_eq!(ours, reference, "Mismatch in {name} at depth {depth}");
}

fn shakmaty_perft(pos: &Chess, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += shakmaty_perft(&new_pos, depth - 1);
    }
    nodes
}

#[test]
fn perft_en_passant_capture() {
    alfiere::init();
    // White pawn on d5, black just played c7-c5
    let fen = "8/8/8/k1pP4/8/8/8/4K3 w - c6 0 1";
    run_perft_check(fen, 3, "En Passant");
}

#[test]
fn perft_en_passant_exposes_king() {
    alfiere::init();
    // Taking en passant would clear the fifth rank between the rook and the king
    let fen = "8/8/8/KPp4r/8/8/8/6k1 w - c6 0 1";
    run_perft_check(fen, 3, "En Passant Horizontal Pin");
}

#[test]
fn perft_castling_prevented_by_check() {
    alfiere::init();
    let fen = "4k3/8/8/8/8/8/8/R3K2r w Q - 0 1";
    run_perft_check(fen, 2, "Castling in Check");
}

#[test]
fn perft_castling_through_check() {
    alfiere::init();
    // f1 is attacked by the black rook
    let fen = "4k3/8/8/8/8/5r2/8/R3K2R w KQ - 0 1";
    run_perft_check(fen, 2, "Castling Through Check");
}

#[test]
fn perft_queenside_b_file_attack_is_allowed() {
    alfiere::init();
    // b1 attacked does not stop long castling, only its emptiness matters
    let fen = "1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1";
    run_perft_check(fen, 2, "Long Castling With b1 Attacked");
}

#[test]
fn perft_promotion_capture() {
    alfiere::init();
    let fen = "n1n5/P5P1/8/2k5/8/8/8/4K3 w - - 0 1";
    run_perft_check(fen, 2, "Promotion Capture");
}

#[test]
fn perft_black_promotions() {
    alfiere::init();
    let fen = "4k3/8/8/8/8/8/p1p5/1N2K3 b - - 0 1";
    run_perft_check(fen, 3, "Black Promotion");
}

#[test]
fn perft_complex_check_response() {
    alfiere::init();
    let fen = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    run_perft_check(fen, 2, "Complex Check Response");
}
