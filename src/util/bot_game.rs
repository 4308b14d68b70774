//! Utilities to run bots against each other and report the results.
use std::fmt::{Debug, Formatter};
use std::ops::AddAssign;
use std::time::Instant;

use log::info;

use crate::ai::Bot;
use crate::board::{Board, BoardDone, Outcome, Player};
use crate::wdl::{NonPov, WDL};

/// Run `bot_l` against `bot_r` on the board given by `start`, one game after the other.
///
/// `games_per_side` games are run, except if `both_sides` is true, in
/// which case every start position is played twice with the bots switching sides.
///
/// `callback` is called after every game with the running score of `bot_l`.
pub fn run<B: Board, L: Bot<B>, R: Bot<B>>(
    start: impl Fn() -> B,
    mut bot_l: L,
    mut bot_r: R,
    games_per_side: u32,
    both_sides: bool,
    mut callback: impl FnMut(WDL<u32>, &Replay<B>),
) -> Result<BotGameResult<B>, BoardDone> {
    let game_count = if both_sides { 2 * games_per_side } else { games_per_side };

    let mut result = BotGameResult {
        game_count,
        replays: Vec::with_capacity(game_count as usize),
        wdl_l: WDL::default(),
        stats_l: SideStats::default(),
        stats_r: SideStats::default(),
        debug_l: format!("{:?}", bot_l),
        debug_r: format!("{:?}", bot_r),
    };

    let mut curr_start = start();
    for game_i in 0..game_count {
        let swap = both_sides && game_i % 2 == 1;
        if !swap {
            curr_start = start();
        }

        let replay = play_single_game(&curr_start, swap, &mut bot_l, &mut bot_r)?;

        result.wdl_l += replay.outcome.pov(replay.player_l).to_wdl();
        result.stats_l += replay.stats_l;
        result.stats_r += replay.stats_r;
        info!(
            "Game {}/{}: {:?} after {} moves, left now at {:?}",
            game_i + 1,
            game_count,
            replay.outcome,
            replay.moves.len(),
            result.wdl_l
        );

        callback(result.wdl_l, &replay);
        result.replays.push(replay);
    }

    Ok(result)
}

fn play_single_game<B: Board>(
    start: &B,
    swap: bool,
    bot_l: &mut impl Bot<B>,
    bot_r: &mut impl Bot<B>,
) -> Result<Replay<B>, BoardDone> {
    let mut board = start.clone();
    let first = board.next_player();
    let player_l = if swap { first.other() } else { first };

    let mut stats_l = SideStats::default();
    let mut stats_r = SideStats::default();
    let mut moves = vec![];

    let outcome = loop {
        if let Some(outcome) = board.outcome() {
            break outcome;
        }

        let timer = Instant::now();
        let (mv, stats) = if board.next_player() == player_l {
            (bot_l.select_move(&board)?, &mut stats_l)
        } else {
            (bot_r.select_move(&board)?, &mut stats_r)
        };
        stats.record(timer.elapsed().as_secs_f32());

        moves.push(mv);
        board
            .play(mv)
            .unwrap_or_else(|e| panic!("Bot played unavailable move {} on\n{}: {}", mv, board, e));
    };

    Ok(Replay {
        start: start.clone(),
        player_l,
        moves,
        outcome,
        stats_l,
        stats_r,
    })
}

/// Thinking time spent by one side.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct SideStats {
    pub move_count: u32,
    /// In seconds.
    pub total_time: f32,
}

impl SideStats {
    fn record(&mut self, seconds: f32) {
        self.move_count += 1;
        self.total_time += seconds;
    }

    /// Average seconds per move, zero if no moves were made.
    pub fn time_per_move(&self) -> f32 {
        if self.move_count == 0 {
            0.0
        } else {
            self.total_time / self.move_count as f32
        }
    }
}

impl AddAssign for SideStats {
    fn add_assign(&mut self, rhs: SideStats) {
        self.move_count += rhs.move_count;
        self.total_time += rhs.total_time;
    }
}

/// A single finished game, enough to replay it from `start`.
#[derive(Debug, Clone)]
pub struct Replay<B: Board> {
    pub start: B,
    /// The player controlled by the left bot.
    pub player_l: Player,

    pub moves: Vec<B::Move>,
    pub outcome: Outcome,

    pub stats_l: SideStats,
    pub stats_r: SideStats,
}

/// Structure returned by the function [`run`].
pub struct BotGameResult<B: Board> {
    pub game_count: u32,
    pub replays: Vec<Replay<B>>,

    pub wdl_l: WDL<u32>,
    pub stats_l: SideStats,
    pub stats_r: SideStats,

    pub debug_l: String,
    pub debug_r: String,
}

impl<B: Board> BotGameResult<B> {
    pub fn average_game_length(&self) -> f32 {
        let total_moves = self.stats_l.move_count + self.stats_r.move_count;
        total_moves as f32 / self.game_count.max(1) as f32
    }
}

impl<B: Board> Debug for BotGameResult<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let wdl = self.wdl_l.cast::<f32>();

        writeln!(f, "BotGameResult {{")?;
        writeln!(
            f,
            "  games: {}, average length: {:.1}",
            self.game_count,
            self.average_game_length()
        )?;
        writeln!(
            f,
            "  left: {:?} = {:.3?}, elo {:.1}",
            self.wdl_l,
            wdl / wdl.sum(),
            wdl.elo()
        )?;
        writeln!(
            f,
            "  seconds per move: left {:.4}, right {:.4}",
            self.stats_l.time_per_move(),
            self.stats_r.time_per_move()
        )?;
        writeln!(f, "  left:  {}", self.debug_l)?;
        writeln!(f, "  right: {}", self.debug_r)?;
        write!(f, "}}")
    }
}
