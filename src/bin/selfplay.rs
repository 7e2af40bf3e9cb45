use std::time::Instant;

use minichess::{AiConfig, AiPlayer, Color, Game};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const MAX_PLIES: usize = 200;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match AiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("bad configuration: {e}");
            std::process::exit(2);
        }
    };
    info!(depth = config.depth, seed = ?config.seed, "starting self-play");

    let mut white = AiPlayer::new(Color::White, config.clone());
    let mut black = AiPlayer::new(Color::Black, config);
    let mut game = Game::new();
    let mut plies = 0;
    let mut last_move = Instant::now();

    while !game.state().is_over() && plies < MAX_PLIES {
        let player = match game.turn() {
            Color::White => &mut white,
            Color::Black => &mut black,
        };
        let side = player.color();
        let Some(result) = player.choose_move(&mut game) else {
            break;
        };
        if let Err(e) = game.make_move(&result.mv) {
            error!("engine chose a rejected move: {e}");
            std::process::exit(1);
        }
        plies += 1;
        info!(
            ply = plies,
            ?side,
            mv = %result.mv,
            score = result.score,
            white_points = game.board().points(Color::White),
            black_points = game.board().points(Color::Black),
            nodes = result.nodes,
            cache_hits = result.cache_hits,
            elapsed = ?last_move.elapsed(),
            "played"
        );
        last_move = Instant::now();
    }

    println!("{game}");
    match game.snapshot().to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => error!("could not serialize the final position: {e}"),
    }
    info!("Game over after {plies} plies: {}", game.state());
}
