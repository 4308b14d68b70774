use gomoku_mcts::board::{Board, PlayError};
use gomoku_mcts::games::gomoku::{Coord, GomokuBoard};
use gomoku_mcts::util::board_gen::{board_with_moves, random_board_with_moves, random_game_samples};
use gomoku_mcts::util::tiny::{consistent_rng, seeded_rng};

#[test]
fn with_moves() {
    let moves = [Coord::new(2, 2), Coord::new(3, 3)];
    let board = board_with_moves(GomokuBoard::default(), &moves).unwrap();
    assert_eq!(2, board.stone_count());
    assert_eq!(Some(Coord::new(3, 3)), board.last_move());

    let moves = [Coord::new(2, 2), Coord::new(2, 2)];
    assert_eq!(
        Err(PlayError::UnavailableMove),
        board_with_moves(GomokuBoard::default(), &moves)
    );
}

#[test]
fn random_with_moves() {
    let mut rng = consistent_rng();
    let start = GomokuBoard::new(5).unwrap();

    for n in 0..15 {
        let board = random_board_with_moves(&start, n, &mut rng);
        assert_eq!(n as u16, board.stone_count());
        assert!(!board.is_done());
    }
}

#[test]
fn game_samples() {
    let start = GomokuBoard::new(6).unwrap();

    for seed in 0..10 {
        let samples = random_game_samples(&start, &mut seeded_rng(seed));
        assert!(!samples.is_empty());
        assert_eq!(start, samples[0].0);

        let outcome = samples[0].1;
        for (i, (board, sample_outcome)) in samples.iter().enumerate() {
            assert!(!board.is_done());
            assert_eq!(i as u16, board.stone_count());
            assert_eq!(outcome, *sample_outcome);
        }

        // one more move on the last position ends the game with the shared outcome
        let (last, _) = samples.last().unwrap();
        let done = last
            .candidate_moves()
            .unwrap()
            .into_iter()
            .map(|mv| last.clone_and_play(mv).unwrap())
            .any(|b| b.outcome() == Some(outcome));
        assert!(done);
    }
}

#[test]
fn game_samples_deterministic() {
    let start = GomokuBoard::default();
    let a = random_game_samples(&start, &mut seeded_rng(5));
    let b = random_game_samples(&start, &mut seeded_rng(5));
    assert_eq!(a, b);
}
