use std::str::FromStr;

use gomoku_mcts::board::{Board, ConfigError, Outcome, Player};
use gomoku_mcts::games::gomoku::{Coord, GomokuBoard, ParseBoardError};

#[test]
fn coord_formats() {
    assert_eq!(Ok(Coord::new(3, 4)), "3,4".parse::<Coord>());
    assert_eq!(Ok(Coord::new(3, 4)), " 3 , 4 ".parse::<Coord>());
    assert_eq!(Ok(Coord::new(10, 1)), "(10, 1)".parse::<Coord>());
    assert_eq!(Ok(Coord::new(10, 1)), "( 10,1 )".parse::<Coord>());

    for s in ["", "3", "3;4", "(3, 4", "3, 4)", "a,b", "3,4,5", "-1,2", "300,1"] {
        assert_eq!(Err(ParseBoardError::InvalidCoord(s.to_owned())), Coord::from_str(s), "{:?}", s);
    }
}

#[test]
fn coord_display() {
    let coord = Coord::new(7, 2);
    assert_eq!("(7, 2)", coord.to_string());
    assert_eq!("Coord(7, 2)", format!("{:?}", coord));
    assert_eq!(Ok(coord), coord.to_string().parse());
}

#[test]
fn display_format() {
    let board = GomokuBoard::new(3)
        .unwrap()
        .clone_and_play(Coord::new(2, 2))
        .unwrap()
        .clone_and_play(Coord::new(3, 1))
        .unwrap();
    assert_eq!(". . b\n. a .\n. . .\nwin: 3\nnext: a\n", board.to_string());

    let board = GomokuBoard::with_win_length(3, 2)
        .unwrap()
        .with_candidate_radius(2)
        .unwrap()
        .clone_and_play(Coord::new(1, 1))
        .unwrap();
    assert_eq!("a . .\n. . .\n. . .\nwin: 2\nradius: 2\nnext: b\n", board.to_string());
}

#[test]
fn parse_display_agree() {
    let mut board = GomokuBoard::new(6).unwrap();
    for (x, y) in [(1, 1), (6, 6), (2, 1), (5, 6), (3, 1)] {
        board.play(Coord::new(x, y)).unwrap();

        let parsed: GomokuBoard = board.to_string().parse().unwrap();
        assert_eq!(board.to_string(), parsed.to_string());
        assert_eq!(board.next_player(), parsed.next_player());
        assert_eq!(board.outcome(), parsed.outcome());
        assert_eq!(board.stone_count(), parsed.stone_count());
        assert_eq!(board.legal_moves(), parsed.legal_moves());
        assert_eq!(None, parsed.last_move());
    }
}

#[test]
fn parse_keeps_win_length() {
    let mut board = GomokuBoard::with_win_length(6, 4).unwrap();
    for (x, y) in [(1, 1), (1, 6), (2, 1), (2, 6), (3, 1)] {
        board.play(Coord::new(x, y)).unwrap();
    }

    let mut parsed: GomokuBoard = board.to_string().parse().unwrap();
    assert_eq!(4, parsed.win_length());
    assert_eq!(board.to_string(), parsed.to_string());

    for mv in [Coord::new(3, 6), Coord::new(4, 1)] {
        board.play(mv).unwrap();
        parsed.play(mv).unwrap();
    }
    assert_eq!(Some(Player::A), board.winner());
    assert_eq!(board.winner(), parsed.winner());
}

#[test]
fn parse_keeps_candidate_radius() {
    let board = GomokuBoard::new(7)
        .unwrap()
        .with_candidate_radius(3)
        .unwrap()
        .clone_and_play(Coord::new(4, 4))
        .unwrap();

    let parsed: GomokuBoard = board.to_string().parse().unwrap();
    assert_eq!(3, parsed.candidate_radius());
    assert_eq!(board.candidate_moves(), parsed.candidate_moves());

    let default: GomokuBoard = ". . .\n. a .\n. . .\n".parse().unwrap();
    assert_eq!(1, default.candidate_radius());
    assert_eq!(3, default.win_length());
}

#[test]
fn parse_without_footer() {
    let board: GomokuBoard = "
        a a a a .
        b b b b .
        . . . . .
        . . . . .
        . . . . .
    "
    .parse()
    .unwrap();

    assert_eq!(5, board.size());
    assert_eq!(Player::A, board.next_player());
    assert!(!board.is_done());

    let won = board.clone_and_play(Coord::new(5, 1)).unwrap();
    assert_eq!(Some(Player::A), won.winner());
}

#[test]
fn parse_finished() {
    let board: GomokuBoard = "
        a a a a a
        b b b b .
        . . . . .
        . . . . .
        . . . . .
        won by: a
    "
    .parse()
    .unwrap();
    assert_eq!(Some(Outcome::WonBy(Player::A)), board.outcome());
    assert_eq!(Player::B, board.next_player());
}

#[test]
fn parse_errors() {
    assert_eq!(
        Err(ParseBoardError::NotSquare { rows: 2, columns: 3 }),
        GomokuBoard::from_str("a .\n. . .\n")
    );
    assert_eq!(
        Err(ParseBoardError::InvalidRow("a x .".to_owned())),
        GomokuBoard::from_str(". . .\na x .\n. . .\n")
    );
    assert_eq!(
        Err(ParseBoardError::InvalidStoneCount { a: 0, b: 1 }),
        GomokuBoard::from_str("b . .\n. . .\n. . .\n")
    );
    assert_eq!(
        Err(ParseBoardError::InvalidStoneCount { a: 3, b: 1 }),
        GomokuBoard::from_str("a a .\na . .\nb . .\n")
    );
    assert_eq!(
        Err(ParseBoardError::Config(ConfigError::InvalidWinLength { size: 2, win_length: 3 })),
        GomokuBoard::from_str("a .\n. .\n")
    );
    assert_eq!(
        Err(ParseBoardError::Config(ConfigError::InvalidWinLength { size: 3, win_length: 4 })),
        GomokuBoard::from_str(". . .\n. . .\n. . .\nwin: 4\n")
    );
    assert_eq!(
        Err(ParseBoardError::Config(ConfigError::InvalidCandidateRadius(0))),
        GomokuBoard::from_str(". . .\n. . .\n. . .\nradius: 0\n")
    );
    assert_eq!(
        Err(ParseBoardError::MultipleWinners),
        GomokuBoard::from_str("a a a\nb b b\n. . .\n")
    );
}
