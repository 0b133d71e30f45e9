use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, LevelFilter};

use std::cmp::Ordering;
use std::io::{stdin, stdout, Write};

use connect383::agent::{get_agent, Agent, AgentOptions};
use connect383::config::{parse_block, AgentKind, GameConfig};
use connect383::{GameState, Player, DEFAULT_COLS, DEFAULT_ROWS};

mod display;

/// Play a game of Connect-383 between humans and search agents
#[derive(Parser)]
#[command(name = "connect383", about = "Play a game of Connect-383")]
struct Cli {
    /// Player one: random, human, mini, prune or look<depth>
    player_one: String,

    /// Player two: random, human, mini, prune or look<depth>
    player_two: String,

    /// Number of rows on the board
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,

    /// Number of columns on the board
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: usize,

    /// Block a cell before the game starts, as ROW,COL (row 0 is the top)
    #[arg(long = "block", value_name = "ROW,COL")]
    blocks: Vec<String>,

    /// Starting board as '/'-separated rows of '.', 'X', 'O' and '#'
    #[arg(long)]
    board: Option<String>,

    /// Seed for random agents
    #[arg(long)]
    seed: Option<u64>,

    /// Search the first move of each turn on all cores
    #[arg(long)]
    parallel: bool,

    /// Remember searched positions between turns (minimax only)
    #[arg(long)]
    memoize: bool,

    /// Log every candidate move
    #[arg(short, long)]
    verbose: bool,
}

enum Controller {
    Human,
    Agent(Box<dyn Agent>),
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn human_move(state: &GameState) -> Result<(usize, GameState)> {
    let stdin = stdin();
    let columns: Vec<usize> = state.successors().into_iter().map(|(c, _)| c).collect();
    loop {
        print!("Enter a column {:?}: ", columns);
        stdout().flush().context("failed to flush to stdout")?;

        let mut buffer = String::new();
        if stdin.read_line(&mut buffer)? == 0 {
            return Err(anyhow!("input closed before the game finished"));
        }
        match buffer.trim().parse::<usize>() {
            Ok(column) => match state.play(column) {
                Ok(next) => return Ok((column, next)),
                Err(err) => println!("{}", err),
            },
            Err(_) => println!("Invalid number: {}", buffer.trim()),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let blocks = cli
        .blocks
        .iter()
        .map(|block| parse_block(block))
        .collect::<connect383::Result<Vec<_>>>()?;
    let config = GameConfig {
        rows: cli.rows,
        cols: cli.cols,
        blocks,
        board: cli.board.clone(),
    };
    let mut state = config
        .initial_state()
        .context("could not set up the board")?;

    let mut controllers = Vec::with_capacity(2);
    for (index, tag) in [&cli.player_one, &cli.player_two].iter().enumerate() {
        let kind = tag
            .parse::<AgentKind>()
            .with_context(|| format!("player {}", index + 1))?;
        let options = AgentOptions {
            // offset the seed so two random players don't mirror each other
            seed: cli.seed.map(|seed| seed.wrapping_add(index as u64)),
            parallel: cli.parallel,
            memoize: cli.memoize,
        };
        controllers.push(match kind {
            AgentKind::Human => Controller::Human,
            kind => Controller::Agent(get_agent(kind, &options)?),
        });
    }

    println!("Welcome to Connect-383\n");

    // game loop
    while !state.is_full() {
        display::draw(&state)?;

        let (player, controller) = match state.next_player() {
            Player::One => (1, &mut controllers[0]),
            Player::Two => (2, &mut controllers[1]),
        };
        let (column, next) = match controller {
            Controller::Human => human_move(&state)?,
            Controller::Agent(agent) => {
                println!("Player {} ({}) is thinking...", player, agent.name());
                stdout().flush().context("failed to flush to stdout")?;
                let (column, next) = agent.get_move(&state)?;
                println!("Player {} plays column {}", player, column);
                (column, next)
            }
        };
        info!("player {} played column {}", player, column);
        state = next;
    }

    display::draw(&state)?;
    let score = state.utility()?;
    match score.cmp(&0) {
        Ordering::Greater => println!("Player 1 wins by {}!", score),
        Ordering::Less => println!("Player 2 wins by {}!", -score),
        Ordering::Equal => println!("Draw!"),
    }
    info!("{} states constructed", GameState::state_count());
    Ok(())
}
