use internal_iterator::InternalIterator;

use gomoku_mcts::board::{Board, BoardMoves, ConfigError, Outcome, PlayError, Player};
use gomoku_mcts::games::gomoku::{Coord, GomokuBoard};
use gomoku_mcts::util::board_gen::random_board_with_moves;
use gomoku_mcts::util::tiny::consistent_rng;

use crate::board::{board_test_main, board_test_main_without_uniform, print_board_with_moves};

fn c(x: u8, y: u8) -> Coord {
    Coord::new(x, y)
}

/// Every tile plus a ring of coordinates just outside the board.
fn all_moves(board: &GomokuBoard) -> Vec<Coord> {
    let size = board.size();
    let mut moves: Vec<Coord> = board.coords().collect();
    for i in 0..=size + 1 {
        moves.extend([c(i, 0), c(0, i), c(i, size + 1), c(size + 1, i)]);
    }
    moves
}

/// Interleave the moves of both players, starting with A.
fn interleave(a: &[(u8, u8)], b: &[(u8, u8)]) -> Vec<Coord> {
    let mut moves = vec![];
    for i in 0..a.len().max(b.len()) {
        moves.extend(a.get(i).map(|&(x, y)| c(x, y)));
        moves.extend(b.get(i).map(|&(x, y)| c(x, y)));
    }
    moves
}

#[test]
fn empty() {
    let board = GomokuBoard::default();
    assert_eq!(10, board.size());
    assert_eq!(5, board.win_length());
    assert_eq!(None, board.last_move());
    assert_eq!(Player::A, board.next_player());

    board_test_main(&board, &all_moves(&board));
}

#[test]
fn small_boards() {
    let board = GomokuBoard::new(3).unwrap();
    assert_eq!(3, board.win_length());
    board_test_main(&board, &all_moves(&board));

    assert_eq!(Err(ConfigError::InvalidSize { size: 0 }), GomokuBoard::new(0));
    assert_eq!(
        Err(ConfigError::InvalidWinLength { size: 4, win_length: 5 }),
        GomokuBoard::with_win_length(4, 5)
    );
    assert_eq!(
        Err(ConfigError::InvalidWinLength { size: 4, win_length: 0 }),
        GomokuBoard::with_win_length(4, 0)
    );
}

#[test]
fn one_move() {
    let board = print_board_with_moves(GomokuBoard::default(), &[c(1, 1)]);

    assert_eq!(Some(c(1, 1)), board.last_move());
    assert_eq!(Player::B, board.next_player());
    assert_eq!(Some(Player::A), board.tile(c(1, 1)));
    assert_eq!(vec![c(2, 1), c(1, 2), c(2, 2)], board.candidate_moves().unwrap());

    board_test_main(&board, &all_moves(&board));
}

#[test]
fn random_boards() {
    let mut rng = consistent_rng();
    let start = GomokuBoard::new(7).unwrap();

    for n in [0, 1, 5, 12, 20] {
        let board = random_board_with_moves(&start, n, &mut rng);
        assert_eq!(n as u16, board.stone_count());
        board_test_main_without_uniform(&board, &all_moves(&board));
    }
}

#[test]
fn legal_move_count() {
    let mut rng = consistent_rng();
    let start = GomokuBoard::default();

    for n in 0..30 {
        let board = random_board_with_moves(&start, n, &mut rng);
        let occupied = board.coords().filter(|&c| board.tile(c).is_some()).count();

        assert_eq!(100 - occupied, board.legal_moves().len());
        assert_eq!(board.legal_moves().len(), board.available_moves().unwrap().count());
    }
}

#[test]
fn legal_moves_row_major() {
    let board = GomokuBoard::new(3).unwrap().clone_and_play(c(2, 1)).unwrap();
    let expected = vec![
        c(1, 1),
        c(3, 1),
        c(1, 2),
        c(2, 2),
        c(3, 2),
        c(1, 3),
        c(2, 3),
        c(3, 3),
    ];
    assert_eq!(expected, board.legal_moves());
}

#[test]
fn clone_diverges() {
    let board = GomokuBoard::default();
    let mut other = board.clone();
    assert_eq!(board, other);

    other.play(c(4, 4)).unwrap();
    assert_ne!(board, other);
    assert_eq!(None, board.tile(c(4, 4)));
    assert_eq!(0, board.stone_count());

    let child = board.clone_and_play(c(4, 4)).unwrap();
    assert_eq!(other, child);
    assert_ne!(board, child);
}

#[test]
fn five_in_row_wins() {
    let moves = interleave(
        &[(3, 5), (4, 5), (5, 5), (6, 5), (7, 5)],
        &[(1, 1), (2, 3), (9, 9), (10, 2)],
    );
    let (last, prefix) = moves.split_last().unwrap();

    let board = print_board_with_moves(GomokuBoard::default(), prefix);
    assert!(!board.is_done());
    assert_eq!(Player::A, board.next_player());

    let board = board.clone_and_play(*last).unwrap();
    assert_eq!(Some(Outcome::WonBy(Player::A)), board.outcome());
    assert_eq!(Some(Player::A), board.winner());
    assert!(board.is_done());

    board_test_main(&board, &all_moves(&board));
}

#[test]
fn five_in_row_open_start_wins() {
    // the fifth stone is placed before the other four
    let moves = interleave(
        &[(2, 5), (3, 5), (4, 5), (5, 5), (1, 5)],
        &[(1, 1), (2, 3), (9, 9), (10, 2)],
    );
    let board = print_board_with_moves(GomokuBoard::default(), &moves);
    assert_eq!(Some(Player::A), board.winner());
}

#[test]
fn middle_stone_wins() {
    let moves = interleave(
        &[(1, 1), (2, 2), (4, 4), (5, 5), (3, 3)],
        &[(1, 10), (2, 10), (3, 10), (4, 9)],
    );
    let board = print_board_with_moves(GomokuBoard::default(), &moves);
    assert_eq!(Some(Player::A), board.winner());
}

#[test]
fn anti_diagonal_wins_for_b() {
    let moves = interleave(
        &[(1, 1), (3, 1), (5, 1), (7, 1), (9, 1)],
        &[(10, 3), (9, 4), (8, 5), (7, 6), (6, 7)],
    );
    let board = print_board_with_moves(GomokuBoard::default(), &moves);
    assert_eq!(Some(Player::B), board.winner());
    assert_eq!(Player::A, board.next_player());
}

#[test]
fn gap_does_not_win() {
    let moves = interleave(
        &[(1, 5), (2, 5), (3, 5), (5, 5), (6, 5)],
        &[(1, 1), (3, 1), (5, 1), (7, 1)],
    );
    let board = print_board_with_moves(GomokuBoard::default(), &moves);
    assert!(!board.is_done());
    assert_eq!(None, board.winner());

    // filling the gap connects six, which also wins
    let board = board.clone_and_play(c(9, 9)).unwrap().clone_and_play(c(4, 5)).unwrap();
    assert_eq!(Some(Player::A), board.winner());
}

#[test]
fn four_is_not_enough() {
    let moves = interleave(&[(1, 1), (2, 1), (3, 1), (4, 1)], &[(1, 3), (2, 3), (3, 3)]);
    let board = print_board_with_moves(GomokuBoard::default(), &moves);
    assert!(!board.is_done());
}

#[test]
fn custom_win_length() {
    let start = GomokuBoard::with_win_length(6, 4).unwrap();
    let moves = interleave(&[(1, 6), (2, 5), (3, 4), (4, 3)], &[(6, 6), (6, 5), (6, 4)]);
    let board = print_board_with_moves(start, &moves);
    assert_eq!(Some(Player::A), board.winner());
}

fn draw_moves() -> Vec<Coord> {
    // pairs of columns alternate every row, which never lines up five
    let board = GomokuBoard::default();
    let (a, b): (Vec<Coord>, Vec<Coord>) = board
        .coords()
        .partition(|c| ((c.x() - 1) / 2 + (c.y() - 1)) % 2 == 0);
    assert_eq!(a.len(), b.len());
    a.into_iter().zip(b).flat_map(|(a, b)| [a, b]).collect()
}

#[test]
fn full_board_draw() {
    let moves = draw_moves();
    let (last, prefix) = moves.split_last().unwrap();

    let board = print_board_with_moves(GomokuBoard::default(), prefix);
    assert!(!board.is_done());
    assert_eq!(vec![*last], board.legal_moves());
    assert_eq!(vec![*last], board.candidate_moves().unwrap());

    let board = board.clone_and_play(*last).unwrap();
    assert!(board.is_full());
    assert!(board.is_done());
    assert_eq!(Some(Outcome::Draw), board.outcome());
    assert_eq!(None, board.winner());
    assert!(board.legal_moves().is_empty());

    board_test_main(&board, &all_moves(&board));
}

#[test]
fn filling_move_that_completes_line_wins() {
    let board: GomokuBoard = "
        a a b b b
        a b b b a
        b a b b b
        b a a b a
        a a a a .
    "
    .parse()
    .unwrap();
    assert!(!board.is_done());
    assert_eq!(Player::A, board.next_player());
    assert_eq!(vec![c(5, 5)], board.legal_moves());

    let board = board.clone_and_play(c(5, 5)).unwrap();
    assert!(board.is_full());
    assert_eq!(Some(Outcome::WonBy(Player::A)), board.outcome());
    assert_ne!(Some(Outcome::Draw), board.outcome());
    assert_eq!(Some(Player::A), board.winner());

    board_test_main(&board, &all_moves(&board));
}

#[test]
fn empty_board_candidates_fallback() {
    let board = GomokuBoard::default();
    assert!(board.adjacent_moves(1).is_empty());
    assert_eq!(board.legal_moves(), board.candidate_moves().unwrap());
    assert_eq!(100, board.candidate_moves().unwrap().len());
}

#[test]
fn candidate_radius() {
    assert_eq!(
        Err(ConfigError::InvalidCandidateRadius(0)),
        GomokuBoard::default().with_candidate_radius(0)
    );

    let start = GomokuBoard::default().with_candidate_radius(2).unwrap();
    assert_eq!(2, start.candidate_radius());
    assert_eq!(start.legal_moves(), start.candidate_moves().unwrap());

    let board = start.clone_and_play(c(1, 1)).unwrap();
    let candidates = board.candidate_moves().unwrap();
    assert_eq!(board.adjacent_moves(2), candidates);
    assert_eq!(8, candidates.len());
    assert!(candidates.contains(&c(3, 3)));

    let mut rng = consistent_rng();
    for n in 1..20 {
        let board = random_board_with_moves(&start, n, &mut rng);
        assert_eq!(2, board.candidate_radius());
        assert_eq!(board.adjacent_moves(2), board.candidate_moves().unwrap());
        board_test_main_without_uniform(&board, &all_moves(&board));
    }
}

#[test]
fn candidates_adjacent_to_stones() {
    let mut rng = consistent_rng();
    let start = GomokuBoard::default();

    for n in 1..20 {
        let board = random_board_with_moves(&start, n, &mut rng);
        let stones: Vec<Coord> = board.coords().filter(|&c| board.tile(c).is_some()).collect();
        let candidates = board.candidate_moves().unwrap();

        for &mv in &candidates {
            assert_eq!(None, board.tile(mv));
            assert!(stones.iter().any(|&s| s.diagonal_distance(mv) == 1));
        }
        for mv in board.legal_moves() {
            if stones.iter().any(|&s| s.diagonal_distance(mv) == 1) {
                assert!(candidates.contains(&mv), "missing candidate {}", mv);
            }
        }

        let mut sorted = candidates.clone();
        sorted.sort();
        assert_eq!(sorted, candidates, "candidates must be row-major");
    }
}

#[test]
fn candidates_clipped_at_corner() {
    let board = GomokuBoard::default().clone_and_play(c(10, 10)).unwrap();
    assert_eq!(vec![c(9, 9), c(10, 9), c(9, 10)], board.candidate_moves().unwrap());

    let radius_two = board.adjacent_moves(2);
    assert_eq!(8, radius_two.len());
}

#[test]
fn unavailable_moves() {
    let mut board = GomokuBoard::default();
    board.play(c(5, 5)).unwrap();

    assert_eq!(Err(PlayError::UnavailableMove), board.clone().play(c(5, 5)));
    assert_eq!(Err(PlayError::UnavailableMove), board.clone().play(c(0, 5)));
    assert_eq!(Err(PlayError::UnavailableMove), board.clone().play(c(5, 0)));
    assert_eq!(Err(PlayError::UnavailableMove), board.clone().play(c(11, 5)));
    assert_eq!(Err(PlayError::UnavailableMove), board.clone().play(c(5, 11)));

    assert!(!board.is_available_move(c(5, 5)).unwrap());
    assert!(!board.is_available_move(c(11, 1)).unwrap());
    assert!(board.is_available_move(c(10, 10)).unwrap());

    // failed moves leave the board untouched
    let before = board.clone();
    assert!(board.play(c(5, 5)).is_err());
    assert_eq!(before, board);
}

#[test]
fn to_input_encoding() {
    let board = GomokuBoard::new(3)
        .unwrap()
        .clone_and_play(c(1, 1))
        .unwrap()
        .clone_and_play(c(3, 2))
        .unwrap();

    let expected = vec![1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0];
    assert_eq!(expected, board.to_input());
}
