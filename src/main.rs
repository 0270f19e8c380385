use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use connect_four_3d::config::AppConfig;
use connect_four_3d::game::{GameState, Outcome, Player, Variant};
use connect_four_3d::record::{export, GameRecord, GameStore, JsonDirStore};
use connect_four_3d::replay::{state_at_move, verify_snapshots, ReplayCursor};
use connect_four_3d::session::Session;
use connect_four_3d::suggest::RandomSuggester;

/// Play, record and replay gravity four-in-a-row games.
#[derive(Parser)]
#[command(name = "connect-four-3d", about = "3D Connect Four engine with game records")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Override the record directory from the config
    #[arg(long, global = true)]
    records_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play random self-play games and store their records
    Play {
        /// Number of games to play
        #[arg(long, default_value_t = 1)]
        games: usize,

        /// Seed for reproducible games
        #[arg(long)]
        seed: Option<u64>,

        /// Board variant, overriding the config
        #[arg(long)]
        variant: Option<VariantArg>,
    },
    /// List stored games, oldest first
    List,
    /// Show a stored game at a given move (default: the final position)
    Show {
        /// Game id or list index
        game: String,

        /// 0-based move index; -1 is the empty board
        #[arg(long = "move", allow_negative_numbers = true)]
        index: Option<isize>,
    },
    /// Step through a stored game from the empty board to the end
    Replay {
        /// Game id or list index
        game: String,
    },
    /// Print one game as JSON, or as a text transcript
    Export {
        /// Game id or list index
        game: String,

        #[arg(long)]
        transcript: bool,
    },
    /// Print every stored game as one JSON array
    ExportAll,
    /// Replay a stored game and check it against its snapshots
    Verify {
        /// Game id or list index
        game: String,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum VariantArg {
    Cube,
    Classic,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Cube => Variant::Cube,
            VariantArg::Classic => Variant::Classic,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(dir) = cli.records_dir {
        config.storage.records_dir = dir;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = JsonDirStore::new(&config.storage.records_dir).with_context(|| {
        format!(
            "opening record directory {}",
            config.storage.records_dir.display()
        )
    })?;

    match cli.command {
        Command::Play {
            games,
            seed,
            variant,
        } => {
            let variant = variant.map_or(config.game.variant, Variant::from);
            play(store, variant, config.game.starting_player, games, seed)
        }
        Command::List => list(&store),
        Command::Show { game, index } => {
            let record = find(&store, &game)?;
            let index = index.unwrap_or(record.total_moves() as isize - 1);
            let state = state_at_move(&record, index)
                .with_context(|| format!("reconstructing game {}", record.id()))?;
            println!("Game {} after move index {}", record.id(), index);
            print_state(&state);
            Ok(())
        }
        Command::Replay { game } => {
            let record = find(&store, &game)?;
            replay(&record)
        }
        Command::Export { game, transcript } => {
            let record = find(&store, &game)?;
            let text = if transcript {
                export::transcript(&record)
                    .with_context(|| format!("building transcript for {}", record.id()))?
            } else {
                export::export_json(&record)?
            };
            println!("{text}");
            Ok(())
        }
        Command::ExportAll => {
            let records = store.list().context("listing stored games")?;
            println!("{}", export::export_all_json(&records)?);
            Ok(())
        }
        Command::Verify { game } => {
            let record = find(&store, &game)?;
            verify_snapshots(&record)
                .with_context(|| format!("game {} failed snapshot check", record.id()))?;
            let final_state = state_at_move(&record, record.total_moves() as isize - 1)
                .with_context(|| format!("game {} failed final replay", record.id()))?;
            if record.outcome() != Some(final_state.outcome()) {
                bail!(
                    "game {} is recorded as {:?} but replays to {:?}",
                    record.id(),
                    record.outcome(),
                    final_state.outcome()
                );
            }
            println!("{}: ok ({} moves)", record.id(), record.total_moves());
            Ok(())
        }
    }
}

fn play(
    store: JsonDirStore,
    variant: Variant,
    starting_player: Player,
    games: usize,
    seed: Option<u64>,
) -> Result<()> {
    let mut suggester = match seed {
        Some(seed) => RandomSuggester::with_seed(seed),
        None => RandomSuggester::new(),
    };
    let mut session = Session::new(variant, starting_player, store);

    for game in 0..games {
        if game > 0 {
            session.reset()?;
        }
        while !session.state().is_terminal() {
            if session.play_suggested(&mut suggester)?.is_none() {
                bail!("no legal move offered on a board that is not finished");
            }
        }

        let record = session
            .record()
            .context("session finished without a record")?;
        println!(
            "{}  {:<8} {} moves",
            record.id(),
            outcome_label(session.state().outcome()),
            record.total_moves()
        );
    }
    info!(games, variant = variant_name(variant), "self-play finished");
    Ok(())
}

fn list(store: &impl GameStore) -> Result<()> {
    let records = store.list().context("listing stored games")?;
    if records.is_empty() {
        println!("No stored games.");
        return Ok(());
    }
    for (i, record) in records.iter().enumerate() {
        let outcome = record.outcome().map_or("open", outcome_label);
        println!(
            "{:>3}  {}  {}  {:<8} {:>2} moves  {}",
            i,
            record.id(),
            record.started_at().format("%Y-%m-%d %H:%M:%S"),
            outcome,
            record.total_moves(),
            record.board_size()
        );
    }
    Ok(())
}

fn replay(record: &GameRecord) -> Result<()> {
    let mut cursor = ReplayCursor::new(record)?;
    println!("Game {} (empty board)", record.id());
    print_state(cursor.state());
    while cursor.step_forward()? {
        let mv = &record.moves()[cursor.index() as usize];
        println!();
        println!("Move {}: {} -> {}", mv.move_number, mv.player, mv.position);
        print_state(cursor.state());
    }
    Ok(())
}

/// Look a game up by id, falling back to its index in `list` order.
fn find(store: &impl GameStore, key: &str) -> Result<GameRecord> {
    if let Some(record) = store.get(key)? {
        return Ok(record);
    }
    if let Ok(index) = key.parse::<usize>() {
        if let Some(record) = store.get_by_index(index)? {
            return Ok(record);
        }
    }
    bail!("no stored game matches '{}'", key)
}

fn print_state(state: &GameState) {
    print!("{}", state.board());
    match state.outcome() {
        Outcome::InProgress => println!("{} to move", state.current_player()),
        outcome => println!("Result: {}", outcome_label(outcome)),
    }
    if !state.winning_line().is_empty() {
        let cells: Vec<String> = state.winning_line().iter().map(|p| p.to_string()).collect();
        println!("Winning line: {}", cells.join(" "));
    }
}

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Won(player) => player.name(),
        Outcome::Draw => "Draw",
        Outcome::InProgress => "open",
    }
}

fn variant_name(variant: Variant) -> &'static str {
    match variant {
        Variant::Cube => "cube",
        Variant::Classic => "classic",
    }
}
