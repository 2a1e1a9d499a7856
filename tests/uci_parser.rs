use alfiere::time::TimeControl;
use alfiere::uci::{parse_uci_command, GoParams, UciCommand};

#[test]
fn test_parse_full_go_command() {
    let line = "go wtime 300000 btime 290000 winc 2000 binc 1000 movetime 1000 depth 6 nodes 1000000 movestogo 5 infinite ponder";
    match parse_uci_command(line) {
        UciCommand::Go(GoParams {
            time,
            depth,
            nodes,
            infinite,
        }) => {
            assert_eq!(
                time,
                TimeControl {
                    wtime: Some(300000),
                    btime: Some(290000),
                    winc: Some(2000),
                    binc: Some(1000),
                    movestogo: Some(5),
                    movetime: Some(1000),
                }
            );
            assert_eq!(depth, Some(6));
            assert_eq!(nodes, Some(1000000));
            assert!(infinite);
        }
        other => panic!("Expected Go command, got: {:?}", other),
    }
}

#[test]
fn test_bare_go() {
    assert_eq!(parse_uci_command("go"), UciCommand::Go(GoParams::default()));
}

#[test]
fn test_parse_position_startpos_with_moves() {
    assert_eq!(
        parse_uci_command("position startpos moves e2e4 e7e5 e1g1"),
        UciCommand::Position {
            fen: None,
            moves: vec!["e2e4".into(), "e7e5".into(), "e1g1".into()],
        }
    );
}

#[test]
fn test_parse_position_fen() {
    let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
    assert_eq!(
        parse_uci_command(&format!("position fen {}", fen)),
        UciCommand::Position {
            fen: Some(fen.to_string()),
            moves: vec![],
        }
    );
    assert_eq!(
        parse_uci_command(&format!("position fen {} moves e1c1", fen)),
        UciCommand::Position {
            fen: Some(fen.to_string()),
            moves: vec!["e1c1".into()],
        }
    );
}

#[test]
fn test_parse_setoption_multiword_name() {
    assert_eq!(
        parse_uci_command("setoption name Move Overhead value 100"),
        UciCommand::SetOption {
            name: "Move Overhead".into(),
            value: Some("100".into()),
        }
    );
    assert_eq!(
        parse_uci_command("setoption name Clear History"),
        UciCommand::SetOption {
            name: "Clear History".into(),
            value: None,
        }
    );
}

#[test]
fn test_simple_commands() {
    assert_eq!(parse_uci_command("uci"), UciCommand::Uci);
    assert_eq!(parse_uci_command("isready"), UciCommand::IsReady);
    assert_eq!(parse_uci_command("ucinewgame"), UciCommand::UciNewGame);
    assert_eq!(parse_uci_command("  stop  "), UciCommand::Stop);
    assert_eq!(parse_uci_command("quit"), UciCommand::Quit);
    assert_eq!(
        parse_uci_command("register later"),
        UciCommand::Unknown("register later".into())
    );
}
