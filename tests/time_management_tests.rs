use alfiere::board::Color;
use alfiere::time::{TimeControl, TimeManager, MIN_THINK_MS};

#[test]
fn test_allocate_normal() {
    let tm = TimeManager::new(50);
    // 60s left, no inc, white to move
    let tc = TimeControl {
        wtime: Some(60000),
        btime: Some(60000),
        ..Default::default()
    };
    let time = tm.allocate_time(&tc, Color::White).unwrap();
    // 60000 / 30 - 50
    assert_eq!(time, 1950);
}

#[test]
fn test_allocate_increment() {
    let tm = TimeManager::new(50);
    // 10s left, 1s increment, black to move
    let tc = TimeControl {
        wtime: Some(99999),
        btime: Some(10000),
        binc: Some(1000),
        ..Default::default()
    };
    let time = tm.allocate_time(&tc, Color::Black).unwrap();
    assert_eq!(time, 10000 / 30 + 1000 - 50);
    assert!(time < 10000, "Should not use all time");
}

#[test]
fn test_movetime_exact() {
    let tm = TimeManager::new(50);
    let tc = TimeControl {
        movetime: Some(5000),
        wtime: Some(100),
        ..Default::default()
    };
    // movetime wins over the clock
    assert_eq!(tm.allocate_time(&tc, Color::White), Some(4950));
}

#[test]
fn test_moves_to_go() {
    let tm = TimeManager::new(0);
    let tc = TimeControl {
        wtime: Some(60000),
        movestogo: Some(5),
        ..Default::default()
    };
    assert_eq!(tm.allocate_time(&tc, Color::White), Some(12000));

    // zero is treated as one move left
    let tc = TimeControl {
        movestogo: Some(0),
        ..tc
    };
    assert_eq!(tm.allocate_time(&tc, Color::White), Some(60000));
}

#[test]
fn test_low_time_is_capped_and_floored() {
    let tm = TimeManager::new(50);
    // the increment would exceed what is left on the clock
    let tc = TimeControl {
        wtime: Some(500),
        winc: Some(2000),
        ..Default::default()
    };
    assert_eq!(tm.allocate_time(&tc, Color::White), Some(450));

    let tc = TimeControl {
        wtime: Some(20),
        ..Default::default()
    };
    assert_eq!(tm.allocate_time(&tc, Color::White), Some(MIN_THINK_MS));

    let tc = TimeControl {
        movetime: Some(30),
        ..Default::default()
    };
    assert_eq!(tm.allocate_time(&tc, Color::White), Some(MIN_THINK_MS));
}

#[test]
fn test_untimed_search_has_no_budget() {
    let tm = TimeManager::default();
    assert_eq!(tm.allocate_time(&TimeControl::default(), Color::Black), None);
    assert!(!TimeControl::default().is_timed());
}
