use minichess::rules::{is_in_check, is_threatened};
use minichess::{Board, Color, Coord, Game, Move, Piece};

fn c(text: &str) -> Coord {
    Coord::parse(text).unwrap()
}

fn mv(text: &str) -> Move {
    Move::parse(text).unwrap()
}

/// Board holding exactly the listed pieces, given as (square, symbol) with
/// lower case for white.
fn position(pieces: &[(&str, char)]) -> Board {
    let mut board = Board::empty();
    for &(square, symbol) in pieces {
        board.set(c(square), Piece::from_symbol(symbol));
    }
    board
}

fn targets(game: &mut Game, from: &str) -> Vec<String> {
    let mut moves: Vec<String> = game
        .legal_moves_from(c(from))
        .iter()
        .map(|m| m.to_string())
        .collect();
    moves.sort();
    moves
}

fn perft(game: &mut Game, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for m in game.all_moves() {
        game.make_move(&m).unwrap();
        nodes += perft(game, depth - 1);
        game.undo_move().unwrap();
    }
    nodes
}

#[test]
fn perft_from_the_start() {
    let mut game = Game::new();
    assert_eq!(perft(&mut game, 1), 20);
    assert_eq!(perft(&mut game, 2), 400);
    assert_eq!(perft(&mut game, 3), 8902);
    assert_eq!(game.board(), &Board::new());
}

#[test]
fn opening_moves_per_piece() {
    let mut game = Game::new();
    assert_eq!(targets(&mut game, "e2"), vec!["e2e3", "e2e4"]);
    assert_eq!(targets(&mut game, "b1"), vec!["b1a3", "b1c3"]);
    assert!(targets(&mut game, "e1").is_empty());
    assert!(targets(&mut game, "e7").is_empty(), "black pieces listed on white's turn");
    assert!(targets(&mut game, "e4").is_empty());
}

#[test]
fn bishop_and_queen_open_up() {
    let mut game = Game::from_move_text(&["e2e4", "e7e5"]).unwrap();
    assert_eq!(
        targets(&mut game, "f1"),
        vec!["f1a6", "f1b5", "f1c4", "f1d3", "f1e2"]
    );
    assert_eq!(
        targets(&mut game, "d1"),
        vec!["d1e2", "d1f3", "d1g4", "d1h5"]
    );
    assert_eq!(targets(&mut game, "e1"), vec!["e1e2"]);
}

#[test]
fn pinned_piece_cannot_leave_the_line() {
    let board = position(&[("e1", 'k'), ("e2", 'b'), ("e8", 'R'), ("a8", 'K')]);
    let mut game = Game::from_board(board, Color::White);
    assert!(targets(&mut game, "e2").is_empty());
    assert!(game.make_move(&mv("e2d3")).is_err());
}

#[test]
fn king_cannot_step_into_attack_or_take_a_defended_piece() {
    let board = position(&[("e1", 'k'), ("d2", 'R'), ("d8", 'R'), ("h8", 'K')]);
    let mut game = Game::from_board(board, Color::White);
    // d2 is defended by the rook on d8; d1 and the second rank are covered.
    assert_eq!(targets(&mut game, "e1"), vec!["e1f1"]);
}

#[test]
fn must_answer_check() {
    let board = position(&[("e1", 'k'), ("a2", 'p'), ("b1", 'n'), ("e8", 'R'), ("a8", 'K')]);
    let mut game = Game::from_board(board, Color::White);
    assert!(game.is_in_check(Color::White));
    let moves: Vec<String> = game.all_moves().iter().map(|m| m.to_string()).collect();
    assert!(!moves.contains(&"a2a3".to_string()));
    for m in game.all_moves() {
        assert!(m.from == c("e1"), "{m} ignores the check");
    }
}

#[test]
fn blocking_resolves_check() {
    let board = position(&[("e1", 'k'), ("c1", 'n'), ("e8", 'R'), ("a8", 'K')]);
    let mut game = Game::from_board(board, Color::White);
    assert_eq!(targets(&mut game, "c1"), vec!["c1e2"]);
}

#[test]
fn castling_requires_safe_and_empty_path() {
    let base = [("e1", 'k'), ("h1", 'r'), ("a1", 'r'), ("e8", 'K')];

    let mut game = Game::from_board(position(&base), Color::White);
    assert!(game.interpret_move(&mv("e1g1")).is_some());
    assert!(game.interpret_move(&mv("e1c1")).is_some());

    // Rook on f8 covers f1, the square the king passes.
    let mut through = base.to_vec();
    through.push(("f8", 'R'));
    let mut game = Game::from_board(position(&through), Color::White);
    assert!(game.interpret_move(&mv("e1g1")).is_none());
    assert!(game.interpret_move(&mv("e1c1")).is_some());

    // Out of check.
    let mut checked = base.to_vec();
    checked[3] = ("h8", 'K');
    checked.push(("e7", 'R'));
    let mut game = Game::from_board(position(&checked), Color::White);
    assert!(game.interpret_move(&mv("e1g1")).is_none());
    assert!(game.interpret_move(&mv("e1c1")).is_none());

    // Landing square attacked.
    let mut landing = base.to_vec();
    landing.push(("c8", 'R'));
    let mut game = Game::from_board(position(&landing), Color::White);
    assert!(game.interpret_move(&mv("e1c1")).is_none());
    assert!(game.interpret_move(&mv("e1g1")).is_some());

    // A piece between king and rook.
    let mut blocked = base.to_vec();
    blocked.push(("b1", 'n'));
    let mut game = Game::from_board(position(&blocked), Color::White);
    assert!(game.interpret_move(&mv("e1c1")).is_none());
}

#[test]
fn attack_on_b1_does_not_stop_queenside_castling() {
    let board = position(&[("e1", 'k'), ("a1", 'r'), ("e8", 'K'), ("b8", 'R')]);
    let mut game = Game::from_board(board, Color::White);
    assert!(game.interpret_move(&mv("e1c1")).is_some());
}

#[test]
fn moved_rook_forfeits_its_side_only() {
    let board = position(&[("e1", 'k'), ("h1", 'r'), ("a1", 'r'), ("e8", 'K')]);
    let moves = [mv("h1h2"), mv("e8e7"), mv("h2h1"), mv("e7e8")];
    let mut game = Game::load(board, Color::White, &moves).unwrap();
    assert!(game.interpret_move(&mv("e1g1")).is_none());
    assert!(game.interpret_move(&mv("e1c1")).is_some());
}

#[test]
fn castle_move_carries_the_rook() {
    let mut game =
        Game::from_move_text(&["e2e4", "e7e5", "f1c4", "d7d5", "g1f3", "c7c5"]).unwrap();
    let event = game.interpret_move(&mv("e1g1")).unwrap();
    assert!(event.is_castle());
    assert_eq!(event.relocations[1].to_string(), "h1f1");
}

#[test]
fn pawn_geometry() {
    let board = position(&[
        ("e1", 'k'),
        ("e8", 'K'),
        ("d4", 'p'),
        ("d5", 'P'),
        ("e5", 'P'),
        ("a2", 'p'),
        ("a3", 'N'),
    ]);
    let mut game = Game::from_board(board, Color::White);
    // Blocked forward, captures diagonally only onto enemies.
    assert_eq!(targets(&mut game, "d4"), vec!["d4e5"]);
    // Blocked on the first step, so no double step either.
    assert!(targets(&mut game, "a2").is_empty());
}

#[test]
fn pawns_threaten_empty_diagonals() {
    let board = position(&[("e4", 'p'), ("d5", 'P')]);
    assert!(is_threatened(&board, c("d5"), Color::White));
    assert!(is_threatened(&board, c("f5"), Color::White));
    assert!(!is_threatened(&board, c("e5"), Color::White));
    assert!(!is_threatened(&board, c("d3"), Color::White));
    assert!(is_threatened(&board, c("e4"), Color::Black));
    assert!(is_threatened(&board, c("c4"), Color::Black));
}

#[test]
fn check_needs_a_king() {
    let board = position(&[("e4", 'q')]);
    assert!(!is_in_check(&board, Color::Black));
    assert!(!is_in_check(&board, Color::White));
}

#[test]
fn promotion_lists_every_target_including_captures() {
    let board = position(&[("e1", 'k'), ("h8", 'K'), ("b7", 'p'), ("a8", 'R'), ("b8", 'N')]);
    let mut game = Game::from_board(board, Color::White);
    assert_eq!(
        targets(&mut game, "b7"),
        vec!["b7a8b", "b7a8n", "b7a8q", "b7a8r"]
    );
    assert!(game.interpret_move(&mv("b7a8")).is_none());
    assert!(game.interpret_move(&mv("e1e2q")).is_none());
}

#[test]
fn gives_check_is_reported() {
    let mut game = Game::from_move_text(&["e2e4", "f7f6"]).unwrap();
    assert!(game.interpret_move(&mv("d1h5")).unwrap().gives_check);
    assert!(!game.interpret_move(&mv("d1g4")).unwrap().gives_check);
}

#[test]
fn every_generated_move_is_legal_and_reversible() {
    let mut game = Game::from_move_text(&[
        "e2e4", "d7d5", "e4d5", "d8d5", "b1c3", "d5a5", "d2d4", "c7c6", "g1f3", "c8g4",
    ])
    .unwrap();
    let before = game.board().clone();
    let mover = game.turn();
    let moves = game.all_moves();
    assert!(!moves.is_empty());
    for m in moves {
        game.make_move(&m).unwrap_or_else(|e| panic!("{m}: {e}"));
        assert!(!game.is_in_check(mover), "{m} leaves the king in check");
        game.undo_move().unwrap();
        assert_eq!(game.board(), &before, "{m} did not undo cleanly");
    }
}
