use std::io::{self, BufRead, Write};

use minichess::{AiConfig, AiPlayer, Color, Game, Move};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const HELP: &str = "enter moves like e2e4 or e7e8q; 'undo' takes back your last move, 'quit' exits";

fn prompt(game: &Game) -> io::Result<()> {
    print!("{game}\n> ");
    io::stdout().flush()
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config = match AiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("bad configuration: {e}");
            std::process::exit(2);
        }
    };
    let mut ai = AiPlayer::new(Color::Black, config);
    let mut game = Game::new();

    println!("{HELP}");
    prompt(&game)?;
    for line in io::stdin().lock().lines() {
        let line = line?;
        let text = line.trim();
        match text {
            "" => {}
            "quit" => break,
            "help" => println!("{HELP}"),
            "undo" => {
                // The AI's reply and the human move before it.
                if game.history().len() < 2 {
                    println!("nothing to undo");
                } else {
                    for _ in 0..2 {
                        if let Err(e) = game.undo_move() {
                            println!("{e}");
                        }
                    }
                }
            }
            _ => match Move::parse(text) {
                Err(e) => println!("{e}"),
                Ok(mv) => {
                    if let Err(e) = game.make_move(&mv) {
                        println!("{e}");
                    } else if !game.state().is_over() {
                        if let Some(result) = ai.choose_move(&mut game) {
                            info!(mv = %result.mv, score = result.score, nodes = result.nodes, "ai move");
                            if let Err(e) = game.make_move(&result.mv) {
                                error!("engine chose a rejected move: {e}");
                                std::process::exit(1);
                            }
                        }
                    }
                }
            },
        }
        if game.state().is_over() {
            println!("{game}");
            info!("game over: {}", game.state());
            break;
        }
        prompt(&game)?;
    }
    Ok(())
}
