use clap::{ArgEnum, Parser};
use log::LevelFilter;

use gomoku_mcts::ai::mcts::{MCTSBot, MCTSSettings};
use gomoku_mcts::ai::rollout::ScoredRollout;
use gomoku_mcts::ai::simple::RandomBot;
use gomoku_mcts::ai::Bot;
use gomoku_mcts::board::Board;
use gomoku_mcts::games::gomoku::GomokuBoard;
use gomoku_mcts::heuristic::gomoku::LineHeuristic;
use gomoku_mcts::util::bot_game;
use gomoku_mcts::util::bot_game::BotGameResult;
use gomoku_mcts::util::tiny::seeded_rng;

/// Pit an MCTS bot against another bot on a gomoku board
#[derive(Parser)]
struct Args {
    /// Side length of the board
    #[clap(short, long, default_value_t = 10)]
    size: u8,
    /// Number of stones in a row needed to win, defaults to 5 (3 on boards smaller than 5x5)
    #[clap(short, long)]
    win_length: Option<u8>,
    /// Only consider moves within this distance of existing stones
    #[clap(short, long, default_value_t = 1)]
    radius: u8,
    /// MCTS iterations per move
    #[clap(short, long, default_value_t = 300)]
    iterations: u64,
    /// UCB exploration weight
    #[clap(short, long, default_value_t = 1.5)]
    exploration: f32,
    /// Games per side, every start position is played twice with switched sides
    #[clap(short, long, default_value_t = 5)]
    games: u32,
    /// The opponent of the MCTS bot
    #[clap(short, long, arg_enum, default_value = "random")]
    opponent: Opponent,
    #[clap(long, default_value_t = 0)]
    seed: u64,
    /// Log every search
    #[clap(short, long)]
    verbose: bool,
}

#[derive(ArgEnum, Debug, Copy, Clone, Eq, PartialEq)]
enum Opponent {
    /// Uniformly random moves next to existing stones
    Random,
    /// MCTS with a tenth of the iterations
    Weak,
    /// MCTS with the same budget but rollouts guided by a line heuristic
    Scored,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    simple_logging::log_to_stderr(level);

    let start = match args.win_length {
        Some(win_length) => GomokuBoard::with_win_length(args.size, win_length)?,
        None => GomokuBoard::new(args.size)?,
    }
    .with_candidate_radius(args.radius)?;
    println!("Start board:\n{}", start);

    let bot = MCTSBot::new(args.iterations, args.exploration, seeded_rng(args.seed))?;

    let result = match args.opponent {
        Opponent::Random => {
            let opponent = RandomBot::near_stones(seeded_rng(args.seed + 1));
            play(&start, bot, opponent, args.games)?
        }
        Opponent::Weak => {
            let iterations = (args.iterations / 10).max(1);
            let opponent = MCTSBot::new(iterations, args.exploration, seeded_rng(args.seed + 1))?;
            play(&start, bot, opponent, args.games)?
        }
        Opponent::Scored => {
            let settings = MCTSSettings::new(args.iterations, args.exploration);
            let policy = ScoredRollout::new(LineHeuristic::default());
            let opponent = MCTSBot::with_policy(settings, policy, seeded_rng(args.seed + 1))?;
            play(&start, bot, opponent, args.games)?
        }
    };

    println!("{:?}", result);
    Ok(())
}

fn play(
    start: &GomokuBoard,
    left: impl Bot<GomokuBoard>,
    right: impl Bot<GomokuBoard>,
    games: u32,
) -> Result<BotGameResult<GomokuBoard>, Box<dyn std::error::Error>> {
    let result = bot_game::run(|| start.clone(), left, right, games, true, |wdl, replay| {
        let mut board = replay.start.clone();
        for &mv in &replay.moves {
            // SAFETY: unwrap is safe because these moves were just played by the bots
            board.play(mv).unwrap();
        }
        println!("{}left {:?}\n", board, wdl);
    })?;
    Ok(result)
}
