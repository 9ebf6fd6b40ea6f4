use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;

use simple_go::{BOARD_SIZE, GoError, Goban, Selector, Stone, Turn, Weights};

/// Pit the simple-go selector against itself until two passes in a row or the
/// move limit. Set `RUST_LOG=simple_go=trace` to also see rejected candidates.
#[derive(Parser)]
#[command(name = "simple-go-selfplay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Board side length
    #[arg(long, default_value_t = BOARD_SIZE)]
    size: u8,

    /// Stop after this many moves
    #[arg(long, default_value_t = 400)]
    max_moves: usize,

    /// JSON file with positional score weights (missing fields use defaults)
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Print the final position as JSON instead of a summary line
    #[arg(long)]
    json: bool,
}

fn load_weights(path: Option<&PathBuf>) -> anyhow::Result<Weights> {
    let Some(path) = path else {
        return Ok(Weights::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading weights from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing weights in {}", path.display()))
}

fn play_out(goban: &mut Goban, selector: &Selector, max_moves: usize) -> Vec<Turn> {
    let mut moves: Vec<Turn> = Vec::new();
    let mut stone = Stone::Black;

    while moves.len() < max_moves {
        let turn = match selector.select_move(goban, stone) {
            Ok(sel) => {
                tracing::info!(
                    "#{} {stone} {:?} via {} (captured {})",
                    moves.len() + 1,
                    sel.point,
                    sel.phase,
                    sel.captured
                );
                Turn::play(stone, sel.point)
            }
            Err(GoError::NoLegalMove) => {
                tracing::info!("#{} {stone} passes", moves.len() + 1);
                goban.pass();
                Turn::pass(stone)
            }
            Err(e) => {
                tracing::error!("selector failed for {stone}: {e}");
                break;
            }
        };

        let ended = turn.is_pass() && moves.last().is_some_and(Turn::is_pass);
        moves.push(turn);
        if ended {
            break;
        }
        stone = stone.opp();
    }

    moves
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simple_go_selfplay=info,simple_go=info".into()),
        )
        .init();

    let cli = Cli::parse();
    if cli.size == 0 || cli.size > 25 {
        bail!("board size must be between 1 and 25, got {}", cli.size);
    }

    let selector = Selector::new(load_weights(cli.weights.as_ref())?);
    let mut goban = Goban::with_size(cli.size);
    tracing::info!("Starting self-play on {0}x{0}", cli.size);

    let moves = play_out(&mut goban, &selector, cli.max_moves);

    if cli.json {
        let state = serde_json::json!({
            "size": goban.size(),
            "board": goban.board(),
            "captures": goban.captures(),
            "ko": goban.ko(),
            "moves": moves,
        });
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!(
            "{} moves, captures: Black {} / White {}",
            moves.len(),
            goban.captures().black,
            goban.captures().white
        );
    }

    Ok(())
}
