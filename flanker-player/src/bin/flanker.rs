use clap::{Parser, Subcommand};
use flanker_othello::test_utils::run_perft;
use flanker_othello::{format_locations, Action, Location, Player};
use flanker_player::arena::{self, ArenaSummary};
use flanker_player::config::{AppConfig, SeatConfig};
use flanker_player::session::Turn;
use flanker_player::strategy::Difficulty;
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flanker", about = "Othello against the computer")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the random strategies
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Board edge length (even, 4 to 26)
    #[arg(long, global = true)]
    size: Option<usize>,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a game in the terminal
    Play {
        /// Your color; the computer takes the other one
        #[arg(long)]
        color: Option<Player>,

        /// Strength of the computer: easy, medium or hard
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Two humans at one terminal
        #[arg(long, conflicts_with_all = ["color", "difficulty"])]
        two_player: bool,
    },

    /// Play computers against each other
    Arena {
        #[arg(long, default_value = "hard")]
        first: Difficulty,

        #[arg(long, default_value = "medium")]
        second: Difficulty,

        /// Number of games; colors alternate
        #[arg(long, default_value_t = 100)]
        games: u32,

        /// Write one JSON game record per line to this path
        #[arg(long)]
        json_out: Option<PathBuf>,
    },

    /// Count leaf positions of the standard opening
    Perft {
        #[arg(default_value_t = 6)]
        depth: u64,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(size) = cli.size {
        config.board_size = size;
    }
    config.validate()?;

    match cli.command {
        Command::Play {
            color,
            difficulty,
            two_player,
        } => {
            if two_player {
                config.black = SeatConfig::Human;
                config.white = SeatConfig::Human;
            } else if color.is_some() || difficulty.is_some() {
                let human = color.unwrap_or_default();
                let computer = SeatConfig::computer(difficulty.unwrap_or(Difficulty::Medium));
                let (black, white) = match human {
                    Player::Black => (SeatConfig::Human, computer),
                    Player::White => (computer, SeatConfig::Human),
                };
                config.black = black;
                config.white = white;
            }
            play(&config)
        }
        Command::Arena {
            first,
            second,
            games,
            json_out,
        } => run_arena(&config, first, second, games, json_out),
        Command::Perft { depth } => {
            for d in 1..=depth {
                let start = Instant::now();
                let leaves = run_perft(d);
                println!("perft({}) = {} ({:.2?})", d, leaves, start.elapsed());
            }
            Ok(())
        }
    }
}

fn describe(turn: &Turn) -> String {
    match turn.action {
        Action::Pass => format!("{} has no legal move and passes.", turn.player),
        Action::MakeMove(loc) => format!(
            "{} plays {}, flipping {}.",
            turn.player,
            loc,
            format_locations(&turn.flipped)
        ),
    }
}

/// Play an interactive game on stdin/stdout.
fn play(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let mut session = config.new_session()?;
    let stdin = io::stdin();

    println!("Black: {}", session.controller(Player::Black).participant());
    println!("White: {}", session.controller(Player::White).participant());

    loop {
        while let Some(turn) = session.step() {
            println!("{}", describe(turn));
        }
        if session.is_finished() {
            break;
        }
        if !session.awaits_human() {
            return Err("the computer failed to produce a legal move".into());
        }

        println!("\n{}\n", session.state());
        println!("Legal moves: {}", format_locations(&session.legal_moves()));
        print!("{}, enter a move: ", session.state().current_player());
        io::stdout().flush()?;

        let mut input_line = String::new();
        if stdin.read_line(&mut input_line)? == 0 {
            println!();
            return Ok(());
        }
        let input = input_line.trim();
        if input.eq_ignore_ascii_case("quit") {
            return Ok(());
        }

        let loc: Location = match input.parse() {
            Ok(loc) => loc,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };
        match session.play(loc) {
            Ok(turn) => println!("{}", describe(turn)),
            Err(err) => println!("{}", err),
        }
    }

    println!("\n{}\n", session.state());
    if let Some(record) = session.record() {
        match record.winner {
            Some(winner) => println!("Winner: {}. {}", winner, record.score),
            None => println!("Draw. {}", record.score),
        }
    }
    Ok(())
}

fn run_arena(
    config: &AppConfig,
    first: Difficulty,
    second: Difficulty,
    games: u32,
    json_out: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let progress = ProgressBar::new(u64::from(games));
    progress.set_style(ProgressStyle::with_template(
        "{bar:40} {pos}/{len} games [{elapsed_precise}<{eta_precise}]",
    )?);

    let played = arena::run(config, first, second, games, |_| progress.inc(1))?;
    progress.finish_and_clear();

    if let Some(path) = json_out {
        let mut writer = BufWriter::new(File::create(&path)?);
        for game in &played {
            serde_json::to_writer(&mut writer, &game.record)?;
            writeln!(writer)?;
        }
        writer.flush()?;
    }

    let summary = ArenaSummary::summarize(&played);
    println!("{} games, {} vs {}", summary.games, first, second);
    println!(
        "{:>8} wins {:>5.1}%",
        first.to_string(),
        100.0 * summary.win_rate_first()
    );
    println!(
        "{:>8} wins {:>5.1}%",
        second.to_string(),
        100.0 * summary.win_rate_second()
    );
    println!("{:>8}      {:>5.1}%", "draws", 100.0 * summary.draw_rate());
    println!("average margin for {}: {:+.2}", first, summary.average_margin);
    Ok(())
}
