//! Move-selecting agents
//!
//! Every agent takes a position and returns the column it plays together with the
//! resulting position. Search agents score each successor in ascending column order and keep
//! the first one with a strictly better value for the player to move, so ties always go to the
//! lowest column.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::board::{GameState, Player};
use crate::config::AgentKind;
use crate::error::{GameError, Result};
use crate::evaluation::evaluate;
use crate::search::Search;
use crate::transposition_table::TranspositionTable;

/// Universal interface for move-selecting agents
pub trait Agent {
    /// Chooses a move for the player to move in `state`
    ///
    /// Fails with [`GameError::IllegalState`] if the board is already full.
    fn get_move(&mut self, state: &GameState) -> Result<(usize, GameState)>;

    fn name(&self) -> &str;

    /// The number of states this agent has constructed while searching (for diagnostics only)
    fn node_count(&self) -> usize {
        0
    }
}

/// Options shared by every agent built from an [`AgentKind`]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AgentOptions {
    /// Seed for the random agent, `None` to seed from the operating system
    pub seed: Option<u64>,
    /// Search root moves on the rayon thread pool
    pub parallel: bool,
    /// Memoize exact minimax values across moves
    pub memoize: bool,
}

/// Builds the agent for a tag
///
/// Human players read from the terminal, which is the front end's job, so asking for one
/// here is a configuration error.
pub fn get_agent(kind: AgentKind, options: &AgentOptions) -> Result<Box<dyn Agent>> {
    let agent: Box<dyn Agent> = match kind {
        AgentKind::Random => Box::new(match options.seed {
            Some(seed) => RandomAgent::with_seed(seed),
            None => RandomAgent::new(),
        }),
        AgentKind::Minimax => {
            let agent = if options.memoize {
                MinimaxAgent::with_transposition_table(TranspositionTable::new())
            } else {
                MinimaxAgent::new()
            };
            Box::new(agent.parallel(options.parallel))
        }
        AgentKind::Prune => Box::new(MinimaxPruneAgent::new().parallel(options.parallel)),
        AgentKind::Lookahead(depth_limit) => Box::new(MinimaxLookaheadAgent::new(depth_limit)),
        AgentKind::Human => {
            return Err(GameError::Configuration(
                "human players must be driven by the front end".to_string(),
            ))
        }
    };
    Ok(agent)
}

fn game_over() -> GameError {
    GameError::IllegalState("no legal moves, the board is full".to_string())
}

/// Keeps the first candidate with a strictly better value for the player to move
fn select_best<I>(to_move: Player, candidates: I) -> Result<(usize, GameState, f64)>
where
    I: IntoIterator<Item = Result<(usize, GameState, f64)>>,
{
    let mut best: Option<(usize, GameState, f64)> = None;
    for candidate in candidates {
        let (column, child, value) = candidate?;
        debug!("column {}: value {}", column, value);
        let improves = match &best {
            None => true,
            Some((_, _, best_value)) => match to_move {
                Player::One => value > *best_value,
                Player::Two => value < *best_value,
            },
        };
        if improves {
            best = Some((column, child, value));
        }
    }
    best.ok_or_else(game_over)
}

type ExactEngine = fn(&mut Search, &GameState) -> Result<i32>;

/// Scores every root move with an exact engine, optionally fanning the moves out over rayon
///
/// In parallel each branch gets its own `Search`, so no counters or tables are shared between
/// threads. The results are still compared in column order.
fn exact_root_search(
    search: &mut Search,
    state: &GameState,
    parallel: bool,
    engine: ExactEngine,
) -> Result<(usize, GameState, f64)> {
    let to_move = state.next_player();
    if parallel {
        let branches: Vec<Result<(usize, GameState, i32, usize)>> = state
            .successors()
            .into_par_iter()
            .map(|(column, child)| -> Result<(usize, GameState, i32, usize)> {
                let mut branch = Search::new();
                let value = engine(&mut branch, &child)?;
                Ok((column, child, value, branch.node_count))
            })
            .collect();

        let mut candidates = Vec::with_capacity(branches.len());
        for branch in branches {
            let (column, child, value, node_count) = branch?;
            search.node_count += node_count + 1;
            candidates.push(Ok((column, child, f64::from(value))));
        }
        select_best(to_move, candidates)
    } else {
        select_best(
            to_move,
            state.successor_iter().map(|(column, child)| -> Result<_> {
                search.node_count += 1;
                let value = engine(search, &child)?;
                Ok((column, child, f64::from(value)))
            }),
        )
    }
}

/// Agent that picks a uniformly random legal move
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates an agent that makes the same choices on every run
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn get_move(&mut self, state: &GameState) -> Result<(usize, GameState)> {
        let mut successors = state.successors();
        if successors.is_empty() {
            return Err(game_over());
        }
        let index = self.rng.random_range(0..successors.len());
        Ok(successors.swap_remove(index))
    }

    fn name(&self) -> &str {
        "Random"
    }
}

/// Agent that plays the exact minimax move
#[derive(Clone, Default)]
pub struct MinimaxAgent {
    search: Search,
    parallel: bool,
}

impl MinimaxAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an agent that keeps searched positions between moves
    pub fn with_transposition_table(transposition_table: TranspositionTable) -> Self {
        Self {
            search: Search::new_with_transposition_table(transposition_table),
            parallel: false,
        }
    }

    /// Searches root moves in parallel
    ///
    /// Parallel branches do not consult the transposition table.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Exact minimax value of `state`
    pub fn minimax(&mut self, state: &GameState) -> Result<i32> {
        self.search.minimax(state)
    }
}

impl Agent for MinimaxAgent {
    fn get_move(&mut self, state: &GameState) -> Result<(usize, GameState)> {
        let (column, child, value) =
            exact_root_search(&mut self.search, state, self.parallel, Search::minimax)?;
        info!(
            "{} plays column {} (value {}, {} states searched)",
            self.name(),
            column,
            value,
            self.search.node_count
        );
        Ok((column, child))
    }

    fn name(&self) -> &str {
        "Minimax"
    }

    fn node_count(&self) -> usize {
        self.search.node_count
    }
}

/// Agent that plays the depth-limited minimax move
///
/// Each candidate move is searched `depth_limit` further plies, after which positions are
/// scored with [`evaluate`]. With a limit of 0 the candidates themselves are evaluated.
#[derive(Clone)]
pub struct MinimaxLookaheadAgent {
    depth_limit: u32,
    search: Search,
}

impl MinimaxLookaheadAgent {
    pub fn new(depth_limit: u32) -> Self {
        Self {
            depth_limit,
            search: Search::new(),
        }
    }

    pub fn depth_limit(&self) -> u32 {
        self.depth_limit
    }

    /// Heuristically estimated minimax value of `state`
    pub fn minimax(&mut self, state: &GameState) -> Result<f64> {
        self.search.minimax_depth_limited(state, self.depth_limit)
    }

    pub fn evaluation(&self, state: &GameState) -> f64 {
        evaluate(state)
    }
}

impl Agent for MinimaxLookaheadAgent {
    fn get_move(&mut self, state: &GameState) -> Result<(usize, GameState)> {
        let depth_limit = self.depth_limit;
        let search = &mut self.search;
        let (column, child, value) = select_best(
            state.next_player(),
            state.successor_iter().map(|(column, child)| -> Result<_> {
                search.node_count += 1;
                let value = search.minimax_depth_limited(&child, depth_limit)?;
                Ok((column, child, value))
            }),
        )?;
        info!(
            "{} plays column {} (estimate {}, {} states searched)",
            self.name(),
            column,
            value,
            self.search.node_count
        );
        Ok((column, child))
    }

    fn name(&self) -> &str {
        "Lookahead"
    }

    fn node_count(&self) -> usize {
        self.search.node_count
    }
}

/// Agent that plays the exact minimax move found with alpha-beta pruning
#[derive(Clone, Default)]
pub struct MinimaxPruneAgent {
    search: Search,
    parallel: bool,
}

impl MinimaxPruneAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches root moves in parallel, each with its own full window
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Exact minimax value of `state`
    pub fn minimax(&mut self, state: &GameState) -> Result<i32> {
        self.search.minimax_ab(state)
    }
}

impl Agent for MinimaxPruneAgent {
    fn get_move(&mut self, state: &GameState) -> Result<(usize, GameState)> {
        let (column, child, value) =
            exact_root_search(&mut self.search, state, self.parallel, Search::minimax_ab)?;
        info!(
            "{} plays column {} (value {}, {} states searched)",
            self.name(),
            column,
            value,
            self.search.node_count
        );
        Ok((column, child))
    }

    fn name(&self) -> &str {
        "Prune"
    }

    fn node_count(&self) -> usize {
        self.search.node_count
    }
}
