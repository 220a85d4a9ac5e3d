//! Play and evaluate UCT search from the terminal.
//!
//! `play` pits a human against the search on stdin/stdout; `evaluate` plays
//! a batch of games against a uniformly random opponent and reports the
//! tally.

mod board;

use anyhow::{bail, Context, Result};
use board::Board;
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::info;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::convert::Infallible;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use uct_mcts::games::{ConnectFour, Player, TicTacToe};
use uct_mcts::{Mcts, MctsConfig};

/// UCT search player and evaluation tool.
#[derive(Parser)]
#[command(name = "uct-play")]
#[command(about = "Play against UCT search or measure it against a random player")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game against the search.
    Play {
        /// Game to play.
        #[arg(short, long, value_enum, default_value = "connect-four")]
        game: GameKind,

        /// Let the search make the first move.
        #[arg(long)]
        ai_first: bool,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Play the search against a random opponent.
    Evaluate {
        /// Game to play.
        #[arg(short, long, value_enum, default_value = "tic-tac-toe")]
        game: GameKind,

        /// Number of games to play.
        #[arg(short = 'n', long, default_value = "20")]
        games: usize,

        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GameKind {
    ConnectFour,
    TicTacToe,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// JSON file with search settings (`iterations`, `exploration`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Search iterations per move (overrides the config file).
    #[arg(short, long)]
    iterations: Option<usize>,

    /// UCT exploration coefficient (overrides the config file).
    #[arg(short, long, allow_negative_numbers = true)]
    exploration: Option<f64>,

    /// Random seed for reproducibility.
    #[arg(long, default_value = "42")]
    seed: u64,
}

impl SearchArgs {
    /// Resolve the search configuration: defaults, then the config file,
    /// then command-line flags.
    fn resolve(&self) -> Result<MctsConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {:?}", path))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse config file {:?}", path))?
            }
            None => MctsConfig::default(),
        };

        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(exploration) = self.exploration {
            config.exploration = exploration;
        }

        config.validate::<Infallible>()?;
        Ok(config)
    }
}

/// Outcome of one game from the search's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    fn for_player(player: Player, winner: Option<Player>) -> Self {
        match winner {
            Some(w) if w == player => Outcome::Win,
            Some(_) => Outcome::Loss,
            None => Outcome::Draw,
        }
    }
}

/// Evaluation results.
#[derive(Debug, Default)]
struct Tally {
    wins: usize,
    losses: usize,
    draws: usize,
}

impl Tally {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    fn total(&self) -> usize {
        self.wins + self.losses + self.draws
    }

    fn percent(&self, count: usize) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            count as f64 / self.total() as f64 * 100.0
        }
    }
}

/// Read moves from `input` until one is legal in `state`.
fn read_action<G, I>(game: &G, state: &G::State, input: &mut I) -> Result<G::Action>
where
    G: Board,
    G::Error: Send + Sync,
    I: Iterator<Item = io::Result<String>>,
{
    let legal = game.legal_actions(state)?;

    loop {
        print!("Your move: ");
        io::stdout().flush()?;

        let Some(line) = input.next() else {
            bail!("Input closed before the game ended");
        };
        match game.parse_action(&line?) {
            Some(action) if legal.contains(&action) => return Ok(action),
            Some(action) => println!("{:?} is not a legal move", action),
            None => println!("Could not read a move, try again"),
        }
    }
}

/// Play one game between a human on stdin and the search.
fn play_interactive<G>(ai_first: bool, config: MctsConfig, seed: u64) -> Result<()>
where
    G: Board,
    G::Error: Send + Sync,
{
    let ai = if ai_first { Player::X } else { Player::O };
    let game = G::for_player(ai);
    let mut mcts = Mcts::new(config, ChaCha8Rng::seed_from_u64(seed));
    let mut lines = io::stdin().lock().lines();

    println!("{}: you are {}, the search is {}", G::NAME, ai.opposite(), ai);

    let mut state = game.initial_state();
    while !game.is_terminal(&state) {
        println!("\n{}", game.render(&state));

        let action = if game.to_move(&state) == ai {
            let start = Instant::now();
            let result = mcts.search(&game, &state)?;
            println!(
                "Search plays {:?} after {} root visits in {:.2}s",
                result.best_action,
                result.root_visits,
                start.elapsed().as_secs_f64()
            );
            result.best_action
        } else {
            read_action(&game, &state, &mut lines)?
        };

        state = game.apply(&state, action)?;
    }

    println!("\n{}", game.render(&state));
    match Outcome::for_player(ai, game.winner(&state)) {
        Outcome::Win => println!("The search wins!"),
        Outcome::Loss => println!("You win!"),
        Outcome::Draw => println!("Draw."),
    }

    Ok(())
}

/// Play a single game between the search (as `ai`) and a random player.
fn play_vs_random<G>(ai: Player, config: &MctsConfig, seed: u64) -> Result<Outcome>
where
    G: Board,
    G::Error: Send + Sync,
{
    let game = G::for_player(ai);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut mcts = Mcts::new(config.clone(), ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)));

    let mut state = game.initial_state();
    while !game.is_terminal(&state) {
        let action = if game.to_move(&state) == ai {
            mcts.search(&game, &state)?.best_action
        } else {
            game.legal_actions(&state)?
                .choose(&mut rng)
                .cloned()
                .context("Random player has no legal move")?
        };
        state = game.apply(&state, action)?;
    }

    Ok(Outcome::for_player(ai, game.winner(&state)))
}

/// Run `games` games against the random player, alternating who starts.
fn run_evaluation<G>(games: usize, config: &MctsConfig, seed: u64) -> Result<Tally>
where
    G: Board,
    G::Error: Send + Sync,
{
    let outcomes: Vec<Outcome> = (0..games)
        .into_par_iter()
        .map(|i| {
            let ai = if i % 2 == 0 { Player::X } else { Player::O };
            let game_seed = seed.wrapping_add(i as u64 * 1000);
            let outcome = play_vs_random::<G>(ai, config, game_seed)?;
            info!("game {} as {}: {:?}", i, ai, outcome);
            Ok(outcome)
        })
        .collect::<Result<_>>()?;

    let mut tally = Tally::default();
    for outcome in outcomes {
        tally.record(outcome);
    }
    Ok(tally)
}

/// Run the evaluate command.
fn cmd_evaluate<G>(games: usize, config: MctsConfig, seed: u64) -> Result<()>
where
    G: Board,
    G::Error: Send + Sync,
{
    println!(
        "Playing {} games of {}: search ({} iterations, exploration {}) vs random",
        games,
        G::NAME,
        config.iterations,
        config.exploration
    );

    let start = Instant::now();
    let tally = run_evaluation::<G>(games, &config, seed)?;

    println!("\nCompleted in {:.2}s", start.elapsed().as_secs_f64());
    println!("Wins:   {} ({:.1}%)", tally.wins, tally.percent(tally.wins));
    println!("Losses: {} ({:.1}%)", tally.losses, tally.percent(tally.losses));
    println!("Draws:  {} ({:.1}%)", tally.draws, tally.percent(tally.draws));

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            game,
            ai_first,
            search,
        } => {
            let config = search.resolve()?;
            match game {
                GameKind::ConnectFour => play_interactive::<ConnectFour>(ai_first, config, search.seed),
                GameKind::TicTacToe => play_interactive::<TicTacToe>(ai_first, config, search.seed),
            }
        }

        Commands::Evaluate {
            game,
            games,
            search,
        } => {
            let config = search.resolve()?;
            match game {
                GameKind::ConnectFour => cmd_evaluate::<ConnectFour>(games, config, search.seed),
                GameKind::TicTacToe => cmd_evaluate::<TicTacToe>(games, config, search.seed),
            }
        }
    }
}
