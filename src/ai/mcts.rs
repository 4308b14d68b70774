//! Monte Carlo Tree Search with UCB child selection and rollouts to the end of the game.
//!
//! Every iteration descends the tree using [Tree::best_child], expands a single untried candidate move,
//! plays the rest of the game using a [RolloutPolicy] and finally propagates the result back up to the root.
//!
//! Values are stored from the POV of the player that played the move leading into a node:
//! `1` for a win, `0` for a draw and `-1` for a loss. The sign flips at every level during backpropagation.
use std::cmp::Reverse;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::marker::PhantomData;
use std::ops::Index;
use std::time::{Duration, Instant};

use decorum::N32;
use itertools::Itertools;
use log::{debug, trace};
use rand::Rng;

use crate::ai::rollout::{RandomRollout, RolloutPolicy};
use crate::ai::Bot;
use crate::board::{Board, BoardDone, ConfigError, Outcome};
use crate::wdl::NonPov;

/// How the move is picked from the root children once the search is done.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FinalSelection {
    /// The child with the most visits, the "robust child".
    MostVisited,
    /// The child with the best mean value, equivalent to [Tree::best_child] with exploration weight zero.
    BestValue,
}

/// Parameters of a search.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MCTSSettings {
    /// The number of iterations (selection, expansion, rollout, backpropagation) to run.
    pub iterations: u64,
    /// The `c` in the UCB formula `value + c * sqrt(ln(parent_visits) / visits)`.
    pub exploration_weight: f32,
    /// During rollouts, always play a move that immediately wins if there is one.
    pub greedy_wins: bool,
    pub final_selection: FinalSelection,
    /// Optional wall-clock limit, the search stops early when it is exceeded.
    /// At least one iteration is always run.
    pub time_limit: Option<Duration>,
}

impl Default for MCTSSettings {
    fn default() -> Self {
        MCTSSettings {
            iterations: 1000,
            exploration_weight: 1.5,
            greedy_wins: true,
            final_selection: FinalSelection::MostVisited,
            time_limit: None,
        }
    }
}

impl MCTSSettings {
    pub fn new(iterations: u64, exploration_weight: f32) -> Self {
        MCTSSettings {
            iterations,
            exploration_weight,
            ..Default::default()
        }
    }

    pub fn with_greedy_wins(mut self, greedy_wins: bool) -> Self {
        self.greedy_wins = greedy_wins;
        self
    }

    pub fn with_final_selection(mut self, final_selection: FinalSelection) -> Self {
        self.final_selection = final_selection;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if !self.exploration_weight.is_finite() || self.exploration_weight < 0.0 {
            return Err(ConfigError::InvalidExplorationWeight(self.exploration_weight));
        }
        Ok(())
    }
}

/// Error returned when a search cannot be started.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SearchError {
    Config(ConfigError),
    BoardDone,
}

impl From<ConfigError> for SearchError {
    fn from(e: ConfigError) -> Self {
        SearchError::Config(e)
    }
}

impl From<BoardDone> for SearchError {
    fn from(_: BoardDone) -> Self {
        SearchError::BoardDone
    }
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::Config(e) => write!(f, "invalid search settings: {}", e),
            SearchError::BoardDone => write!(f, "{}", BoardDone),
        }
    }
}

impl Error for SearchError {}

#[derive(Debug, Clone)]
pub struct Node<M> {
    /// The move that led to this node, `None` for the root.
    pub mv: Option<M>,
    pub parent: Option<usize>,
    /// Indices of the expanded children, in the same order as `candidates`.
    pub children: Vec<usize>,
    /// The candidate moves of the board this node represents, empty if that board is done.
    pub candidates: Vec<M>,
    /// The outcome of the board if it is done.
    pub outcome: Option<Outcome>,

    pub visits: u64,
    /// Sum of the rollout values, from the POV of the player that played `mv`.
    pub total_value: f32,
}

impl<M> Node<M> {
    fn new(mv: Option<M>, parent: Option<usize>, candidates: Vec<M>, outcome: Option<Outcome>) -> Self {
        Node {
            mv,
            parent,
            children: vec![],
            candidates,
            outcome,
            visits: 0,
            total_value: 0.0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Whether every candidate move has a corresponding child.
    /// Terminal nodes are trivially fully expanded.
    pub fn is_fully_expanded(&self) -> bool {
        self.children.len() == self.candidates.len()
    }

    /// The mean value, `0` for a node that has not been visited yet.
    pub fn value(&self) -> f32 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_value / self.visits as f32
        }
    }

    pub fn update(&mut self, value: f32) {
        self.visits += 1;
        self.total_value += value;
    }

    /// The UCB score used to select this node from a parent with `parent_visits` visits.
    pub fn uct(&self, parent_visits: u64, exploration_weight: f32) -> f32 {
        if self.visits == 0 {
            return f32::INFINITY;
        }

        let visits = self.visits as f32;
        let explore = ((parent_visits as f32).ln() / visits).sqrt();
        self.value() + exploration_weight * explore
    }
}

/// A search tree stored as an arena of nodes, the root is at index `0`.
/// Boards are not stored in the nodes, they are recreated by replaying the moves from `root_board`.
#[derive(Debug, Clone)]
pub struct Tree<B: Board> {
    root_board: B,
    nodes: Vec<Node<B::Move>>,
}

impl<B: Board> Tree<B> {
    pub fn new(root_board: B) -> Result<Self, BoardDone> {
        let root = Node::new(None, None, root_board.candidate_moves()?, None);
        Ok(Tree {
            root_board,
            nodes: vec![root],
        })
    }

    pub fn root_board(&self) -> &B {
        &self.root_board
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The child of `node` with the highest UCB score, the first one wins ties.
    /// `None` if `node` has no children.
    pub fn best_child(&self, node: usize, exploration_weight: f32) -> Option<usize> {
        let parent_visits = self[node].visits;
        self[node]
            .children
            .iter()
            .copied()
            .max_by_key(|&c| (N32::from_inner(self[c].uct(parent_visits, exploration_weight)), Reverse(c)))
    }

    /// The child of `node` with the most visits, the first one wins ties.
    pub fn most_visited_child(&self, node: usize) -> Option<usize> {
        self[node].children.iter().copied().max_by_key(|&c| (self[c].visits, Reverse(c)))
    }

    /// The move to play according to `selection`.
    /// Panics if the root has not been expanded, which cannot happen after a search of at least one iteration.
    pub fn best_move(&self, selection: FinalSelection) -> B::Move {
        let child = match selection {
            FinalSelection::MostVisited => self.most_visited_child(0),
            FinalSelection::BestValue => self.best_child(0, 0.0),
        };
        let child = child.unwrap_or_else(|| panic!("Root has no children, board:\n{}", self.root_board));
        // SAFETY: unwrap is safe because only the root has no move
        self[child].mv.unwrap()
    }

    /// Display this tree up to `max_depth`, showing at most `max_children` children per node
    /// sorted by visit count.
    pub fn display(&self, max_depth: usize, max_children: usize) -> TreeDisplay<'_, B> {
        TreeDisplay {
            tree: self,
            node: 0,
            depth: 0,
            max_depth,
            max_children,
        }
    }
}

impl<B: Board> Index<usize> for Tree<B> {
    type Output = Node<B::Move>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.nodes[index]
    }
}

/// Build a search tree from `root_board` using the given settings and rollout policy.
pub fn mcts_build_tree<B: Board, P: RolloutPolicy<B>>(
    root_board: &B,
    settings: &MCTSSettings,
    policy: &mut P,
    rng: &mut impl Rng,
) -> Result<Tree<B>, SearchError> {
    settings.validate()?;
    Ok(build_tree(root_board, settings, policy, rng)?)
}

/// Pick a move for `board` by running `iterations` iterations of MCTS with random rollouts.
pub fn choose_move<B: Board>(
    board: &B,
    iterations: u64,
    exploration_weight: f32,
    rng: &mut impl Rng,
) -> Result<B::Move, SearchError> {
    let settings = MCTSSettings::new(iterations, exploration_weight);
    let tree = mcts_build_tree(board, &settings, &mut RandomRollout, rng)?;
    Ok(tree.best_move(settings.final_selection))
}

/// Play a move from `moves` that wins the game on the spot for the next player, if there is one.
pub fn immediate_win<B: Board>(board: &B, moves: &[B::Move]) -> Option<B::Move> {
    let player = board.next_player();
    moves.iter().copied().find(|&mv| {
        // SAFETY: unwrap is safe because the moves are available on `board`
        let child = board.clone_and_play(mv).unwrap();
        child.outcome() == Some(Outcome::WonBy(player))
    })
}

/// Assumes `settings` has been validated.
fn build_tree<B: Board, P: RolloutPolicy<B>>(
    root_board: &B,
    settings: &MCTSSettings,
    policy: &mut P,
    rng: &mut impl Rng,
) -> Result<Tree<B>, BoardDone> {
    let mut tree = Tree::new(root_board.clone())?;

    let start = Instant::now();
    let mut iterations = 0;
    while iterations < settings.iterations {
        run_iteration(&mut tree, settings, policy, rng);
        iterations += 1;

        if let Some(time_limit) = settings.time_limit {
            if start.elapsed() >= time_limit {
                break;
            }
        }
    }

    if log::log_enabled!(log::Level::Debug) {
        let best = tree.best_move(settings.final_selection);
        let root = &tree[0];
        debug!(
            "MCTS ran {} iterations in {:.3}s, {} nodes, root children {}/{}, selected {}",
            iterations,
            start.elapsed().as_secs_f32(),
            tree.len(),
            root.children.len(),
            root.candidates.len(),
            best,
        );
    }

    Ok(tree)
}

fn run_iteration<B: Board, P: RolloutPolicy<B>>(
    tree: &mut Tree<B>,
    settings: &MCTSSettings,
    policy: &mut P,
    rng: &mut impl Rng,
) {
    let mut board = tree.root_board.clone();

    // selection
    let mut curr = 0;
    while tree[curr].is_fully_expanded() && !tree[curr].children.is_empty() {
        // SAFETY: unwraps are safe because the node has children, and those all have a move available on `board`
        curr = tree.best_child(curr, settings.exploration_weight).unwrap();
        board.play(tree[curr].mv.unwrap()).unwrap();
    }

    // expansion, terminal nodes are simulated from directly
    let leaf = if tree[curr].is_terminal() {
        curr
    } else {
        let node = &tree[curr];
        let mv = node.candidates[node.children.len()];
        // SAFETY: unwrap is safe because candidates are available moves
        board.play(mv).unwrap();

        let candidates = match board.candidate_moves() {
            Ok(candidates) => candidates,
            Err(BoardDone) => vec![],
        };
        let child = tree.nodes.len();
        tree.nodes.push(Node::new(Some(mv), Some(curr), candidates, board.outcome()));
        tree.nodes[curr].children.push(child);

        trace!("Expanded node {} with move {} as node {}", curr, mv, child);
        child
    };

    // simulation
    let mover = board.next_player().other();
    let outcome = match board.outcome() {
        Some(outcome) => outcome,
        None => rollout(board, settings.greedy_wins, policy, rng),
    };

    // backpropagation
    let mut value = outcome.pov(mover).sign::<f32>();
    let mut curr = Some(leaf);
    while let Some(index) = curr {
        let node = &mut tree.nodes[index];
        node.update(value);
        value = -value;
        curr = node.parent;
    }
}

/// Play `board` until the end and return the outcome.
fn rollout<B: Board, P: RolloutPolicy<B>>(
    mut board: B,
    greedy_wins: bool,
    policy: &mut P,
    rng: &mut impl Rng,
) -> Outcome {
    loop {
        if let Some(outcome) = board.outcome() {
            return outcome;
        }

        // SAFETY: unwrap is safe because the board is not done
        let candidates = board.candidate_moves().unwrap();

        // a winning move is always a candidate, so this covers all available moves
        let winning = if greedy_wins {
            immediate_win(&board, &candidates)
        } else {
            None
        };
        let mv = winning.unwrap_or_else(|| policy.choose_move(&board, &candidates, rng));

        // SAFETY: unwrap is safe because the move comes from the candidates
        board.play(mv).unwrap();
    }
}

/// A bot that picks moves using [mcts_build_tree].
pub struct MCTSBot<B: Board, P: RolloutPolicy<B>, R: Rng> {
    settings: MCTSSettings,
    policy: P,
    rng: R,
    ph: PhantomData<B>,
}

impl<B: Board, R: Rng> MCTSBot<B, RandomRollout, R> {
    pub fn new(iterations: u64, exploration_weight: f32, rng: R) -> Result<Self, ConfigError> {
        Self::with_policy(MCTSSettings::new(iterations, exploration_weight), RandomRollout, rng)
    }
}

impl<B: Board, P: RolloutPolicy<B>, R: Rng> MCTSBot<B, P, R> {
    pub fn with_policy(settings: MCTSSettings, policy: P, rng: R) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(MCTSBot {
            settings,
            policy,
            rng,
            ph: PhantomData,
        })
    }

    pub fn settings(&self) -> &MCTSSettings {
        &self.settings
    }

    /// Run a search from `board` and return the whole tree, useful for debugging.
    pub fn build_tree(&mut self, board: &B) -> Result<Tree<B>, BoardDone> {
        build_tree(board, &self.settings, &mut self.policy, &mut self.rng)
    }
}

impl<B: Board, P: RolloutPolicy<B>, R: Rng> Debug for MCTSBot<B, P, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MCTSBot {{ settings: {:?}, policy: {:?} }}",
            self.settings, self.policy
        )
    }
}

impl<B: Board, P: RolloutPolicy<B>, R: Rng> Bot<B> for MCTSBot<B, P, R> {
    fn select_move(&mut self, board: &B) -> Result<B::Move, BoardDone> {
        let tree = self.build_tree(board)?;
        Ok(tree.best_move(self.settings.final_selection))
    }
}

#[derive(Debug)]
pub struct TreeDisplay<'a, B: Board> {
    tree: &'a Tree<B>,
    node: usize,
    depth: usize,
    max_depth: usize,
    max_children: usize,
}

impl<B: Board> Display for TreeDisplay<'_, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let tree = self.tree;
        let node = &tree[self.node];

        if self.depth == 0 {
            writeln!(f, "move: visits value, candidates")?;
        }

        let mv = match node.mv {
            Some(mv) => mv.to_string(),
            None => "root".to_owned(),
        };
        writeln!(
            f,
            "{:indent$}{}: {} {:.3}, {}/{}",
            "",
            mv,
            node.visits,
            node.value(),
            node.children.len(),
            node.candidates.len(),
            indent = 2 * self.depth,
        )?;

        if self.depth == self.max_depth {
            return Ok(());
        }

        let children = node
            .children
            .iter()
            .copied()
            .sorted_by_key(|&c| Reverse(tree[c].visits))
            .take(self.max_children);

        for child in children {
            let display = TreeDisplay {
                tree,
                node: child,
                depth: self.depth + 1,
                max_depth: self.max_depth,
                max_children: self.max_children,
            };
            write!(f, "{}", display)?;
        }

        Ok(())
    }
}
