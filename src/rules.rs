// =============================================================================
// Move interpretation
//
// Two layers. The attack layer answers "does the piece on `from` hit `to`"
// from board geometry alone and never mutates anything. The legal layer turns
// a requested Move into a fully resolved Event: per-piece geometry, captures,
// en passant, promotion and castling, then the self-check filter, which
// applies the event, asks the attack layer about the mover's king and undoes
// the event before returning.
//
// Coordinate system: row 0 = rank 1, col 0 = file a.
// =============================================================================

use crate::board::Board;
use crate::coord::Coord;
use crate::event::{AppliedEvent, Event};
use crate::game::Game;
use crate::history::History;
use crate::moves::{FromTo, Move};
use crate::piece::{Color, Piece, PieceType};

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1), (0, -1),
    (0, 1), (1, -1), (1, 0), (1, 1),
];

const ROOK_DIRS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const QUEEN_DIRS: [(i32, i32); 8] = [
    (0, 1), (0, -1), (1, 0), (-1, 0),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];

const PROMOTION_TARGETS: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

// =============================================================================
// Geometry helpers
// =============================================================================

fn is_knight_jump(row_diff: i32, col_diff: i32) -> bool {
    row_diff + col_diff == 3 && (row_diff - col_diff).abs() == 1
}

fn is_diagonal(row_diff: i32, col_diff: i32) -> bool {
    row_diff == col_diff && row_diff > 0
}

fn is_orthogonal(row_diff: i32, col_diff: i32) -> bool {
    (row_diff == 0) != (col_diff == 0)
}

fn is_king_step(row_diff: i32, col_diff: i32) -> bool {
    row_diff.max(col_diff) == 1
}

/// Whether every square strictly between `from` and `to` is empty. Expects
/// the two squares to share a row, column or diagonal.
fn empty_between(board: &Board, from: Coord, to: Coord) -> bool {
    let step = ((to.row - from.row).signum(), (to.col - from.col).signum());
    let mut square = from.offset(step.0, step.1);
    while square != to {
        if board.get(square).is_some() {
            return false;
        }
        square = square.offset(step.0, step.1);
    }
    true
}

/// Sliding-piece geometry shared by bishops, rooks and queens.
fn slides_to(piece_type: PieceType, from: Coord, to: Coord, board: &Board) -> bool {
    let (row_diff, col_diff) = FromTo::new(from, to).diff();
    let shape_ok = match piece_type {
        PieceType::Bishop => is_diagonal(row_diff, col_diff),
        PieceType::Rook => is_orthogonal(row_diff, col_diff),
        PieceType::Queen => is_diagonal(row_diff, col_diff) || is_orthogonal(row_diff, col_diff),
        _ => false,
    };
    shape_ok && empty_between(board, from, to)
}

// =============================================================================
// Attack layer
// =============================================================================

/// Whether `piece`, standing on `from`, attacks `to`. Pawns attack their two
/// forward diagonals whether or not anything stands there; no piece attacks a
/// square held by its own side. Castling never attacks.
pub fn attacks(piece: Piece, from: Coord, to: Coord, board: &Board) -> bool {
    if !from.in_range() || !to.in_range() || from == to {
        return false;
    }
    if board.get(to).is_some_and(|p| p.color == piece.color) {
        return false;
    }
    let (row_diff, col_diff) = FromTo::new(from, to).diff();
    match piece.piece_type {
        PieceType::Pawn => to.row - from.row == piece.color.forward() && col_diff == 1,
        PieceType::Knight => is_knight_jump(row_diff, col_diff),
        PieceType::King => is_king_step(row_diff, col_diff),
        sliding => slides_to(sliding, from, to, board),
    }
}

/// Whether any piece of color `by` attacks `square`.
pub fn is_threatened(board: &Board, square: Coord, by: Color) -> bool {
    board
        .pieces(by)
        .iter()
        .any(|(&key, &piece)| attacks(piece, Coord::from_key(key), square, board))
}

/// Whether `color`'s king stands on a square the opponent attacks. A side
/// without a king is never in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.find_king(color) {
        Some(king) => is_threatened(board, king, color.opposite()),
        None => false,
    }
}

// =============================================================================
// Legal layer: candidate events
// =============================================================================

fn interpret_pawn(pawn: Piece, mv: &Move, board: &Board, history: &History) -> Option<Event> {
    let from_to = mv.from_to();
    let forward = pawn.color.forward();
    if (mv.to.row - mv.from.row) * forward <= 0 {
        return None;
    }
    let target = board.get(mv.to);
    match from_to.diff() {
        (2, 0) => {
            let passed = mv.from.offset(forward, 0);
            let ok = mv.from.row == pawn.color.pawn_row()
                && board.get(passed).is_none()
                && target.is_none();
            ok.then(|| Event::relocation(from_to))
        }
        (1, 0) => target.is_none().then(|| Event::relocation(from_to)),
        (1, 1) => match target {
            Some(victim) if victim.color != pawn.color => Some(Event::capture(from_to, victim, mv.to)),
            Some(_) => None,
            None => interpret_en_passant(pawn, mv, board, history),
        },
        _ => None,
    }
}

/// Diagonal step to an empty square: legal only straight after an enemy
/// pawn's double advance that landed beside us on the column we move to.
fn interpret_en_passant(pawn: Piece, mv: &Move, board: &Board, history: &History) -> Option<Event> {
    let last = history.last_event()?.primary();
    let passed_pawn = board.get(last.to)?;
    let ok = passed_pawn.piece_type == PieceType::Pawn
        && passed_pawn.color != pawn.color
        && last.diff() == (2, 0)
        && last.to.row == mv.from.row
        && last.to.col == mv.to.col;
    ok.then(|| Event::capture(mv.from_to(), passed_pawn, last.to))
}

/// Geometry for every piece, ignoring castling, turn order, promotion and
/// check.
fn interpret_simple(piece: Piece, mv: &Move, board: &Board, history: &History) -> Option<Event> {
    if piece.piece_type == PieceType::Pawn {
        return interpret_pawn(piece, mv, board, history);
    }
    let target = board.get(mv.to);
    if target.is_some_and(|p| p.color == piece.color) {
        return None;
    }
    let (row_diff, col_diff) = mv.diff();
    let ok = match piece.piece_type {
        PieceType::Knight => is_knight_jump(row_diff, col_diff),
        PieceType::King => is_king_step(row_diff, col_diff),
        sliding => slides_to(sliding, mv.from, mv.to, board),
    };
    ok.then(|| Event::move_or_capture(mv.from_to(), target))
}

/// King and rook squares for a castle towards `king_to`.
fn castle_rook_move(king_to: Coord) -> FromTo {
    let row = king_to.row;
    if king_to.col == 2 {
        FromTo::new(Coord::new(row, 0), Coord::new(row, 3))
    } else {
        FromTo::new(Coord::new(row, 7), Coord::new(row, 5))
    }
}

fn interpret_castle(king: Piece, mv: &Move, board: &Board, history: &History) -> Option<Event> {
    let home = Coord::new(king.color.home_row(), 4);
    if mv.from != home || mv.to.row != home.row || (mv.to.col - home.col).abs() != 2 {
        return None;
    }
    let rook_move = castle_rook_move(mv.to);
    let has_rook = board.get(rook_move.from) == Some(Piece::new(PieceType::Rook, king.color));
    if !has_rook
        || !empty_between(board, home, rook_move.from)
        || history.has_moved(home)
        || history.has_moved(rook_move.from)
    {
        return None;
    }

    // The king may not start on, pass through or land on an attacked square.
    let enemy = king.color.opposite();
    let step = (mv.to.col - home.col).signum();
    let mut square = home;
    loop {
        if is_threatened(board, square, enemy) {
            return None;
        }
        if square == mv.to {
            break;
        }
        square = square.offset(0, step);
    }
    Some(Event::castle(mv.from_to(), rook_move))
}

// =============================================================================
// Legal layer: public entry points
// =============================================================================

/// Resolve `mv` against the current game. Returns `None` when the move is
/// illegal for the side to move. The board is left exactly as it was found on
/// every path.
pub fn interpret_move(mv: &Move, game: &mut Game) -> Option<Event> {
    resolve(mv, &mut game.board, &game.history, game.turn)
}

fn resolve(mv: &Move, board: &mut Board, history: &History, turn: Color) -> Option<Event> {
    if !mv.in_range() {
        return None;
    }
    let piece = board.get(mv.from).filter(|p| p.color == turn)?;

    let mut event = match interpret_simple(piece, mv, board, history) {
        Some(event) => event,
        None if piece.piece_type == PieceType::King => {
            interpret_castle(piece, mv, board, history)?
        }
        None => return None,
    };

    let promotes = piece.piece_type == PieceType::Pawn && mv.to.row == turn.promotion_row();
    match (promotes, mv.promotion) {
        (true, Some(target)) if target.is_promotion_target() => {
            event.promotion = Some(Piece::new(target, turn));
        }
        (false, None) => {}
        _ => return None,
    }

    let (self_check, gives_check) = {
        let applied = AppliedEvent::new(board, &event);
        (
            is_in_check(applied.board(), turn),
            is_in_check(applied.board(), turn.opposite()),
        )
    };
    if self_check {
        return None;
    }
    event.gives_check = gives_check;
    Some(event)
}

/// Destinations worth asking `interpret_move` about for the piece on `from`.
fn candidate_targets(piece: Piece, from: Coord, board: &Board) -> Vec<Coord> {
    let mut targets = Vec::with_capacity(16);
    match piece.piece_type {
        PieceType::Pawn => {
            let forward = piece.color.forward();
            targets.push(from.offset(forward, 0));
            targets.push(from.offset(2 * forward, 0));
            targets.push(from.offset(forward, -1));
            targets.push(from.offset(forward, 1));
        }
        PieceType::Knight => {
            targets.extend(KNIGHT_OFFSETS.iter().map(|&(dr, dc)| from.offset(dr, dc)));
        }
        PieceType::King => {
            targets.extend(KING_OFFSETS.iter().map(|&(dr, dc)| from.offset(dr, dc)));
            targets.push(from.offset(0, 2));
            targets.push(from.offset(0, -2));
        }
        sliding => {
            let dirs: &[(i32, i32)] = match sliding {
                PieceType::Bishop => &BISHOP_DIRS,
                PieceType::Rook => &ROOK_DIRS,
                _ => &QUEEN_DIRS,
            };
            for &(dr, dc) in dirs {
                let mut to = from.offset(dr, dc);
                while to.in_range() {
                    targets.push(to);
                    if board.get(to).is_some() {
                        break;
                    }
                    to = to.offset(dr, dc);
                }
            }
        }
    }
    targets.retain(|t| t.in_range());
    targets
}

/// Every legal move of the piece on `from`, or nothing if that square does
/// not hold a piece of the side to move. Promotions are listed once per
/// promotion target.
pub fn legal_moves_from(from: Coord, game: &mut Game) -> Vec<Move> {
    moves_from(from, &mut game.board, &game.history, game.turn)
}

fn moves_from(from: Coord, board: &mut Board, history: &History, turn: Color) -> Vec<Move> {
    let piece = match board.get(from) {
        Some(p) if p.color == turn => p,
        _ => return Vec::new(),
    };
    let promotion_row = piece.color.promotion_row();

    let mut moves = Vec::new();
    for to in candidate_targets(piece, from, board) {
        if piece.piece_type == PieceType::Pawn && to.row == promotion_row {
            for target in PROMOTION_TARGETS {
                let mv = Move::promote(from, to, target);
                if resolve(&mv, board, history, turn).is_some() {
                    moves.push(mv);
                }
            }
        } else {
            let mv = Move::new(from, to);
            if resolve(&mv, board, history, turn).is_some() {
                moves.push(mv);
            }
        }
    }
    moves
}

/// Whether `turn` has any legal move. Probes a scratch copy of the board, so
/// callers holding only a shared borrow can ask.
pub(crate) fn has_legal_move(board: &Board, history: &History, turn: Color) -> bool {
    let mut scratch = board.clone();
    let squares: Vec<u8> = board.pieces(turn).keys().copied().collect();
    squares
        .into_iter()
        .any(|key| !moves_from(Coord::from_key(key), &mut scratch, history, turn).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(text: &str) -> Coord {
        Coord::parse(text).unwrap()
    }

    #[test]
    fn pawns_attack_empty_diagonals_but_not_forward() {
        let mut board = Board::empty();
        let pawn = Piece::new(PieceType::Pawn, Color::White);
        board.set(c("e2"), Some(pawn));
        assert!(attacks(pawn, c("e2"), c("d3"), &board));
        assert!(attacks(pawn, c("e2"), c("f3"), &board));
        assert!(!attacks(pawn, c("e2"), c("e3"), &board));
        assert!(!attacks(pawn, c("e2"), c("d1"), &board));
    }

    #[test]
    fn sliders_are_blocked() {
        let mut board = Board::empty();
        let rook = Piece::new(PieceType::Rook, Color::Black);
        board.set(c("a8"), Some(rook));
        board.set(c("a4"), Some(Piece::new(PieceType::Pawn, Color::White)));
        assert!(attacks(rook, c("a8"), c("a4"), &board));
        assert!(!attacks(rook, c("a8"), c("a1"), &board));
        assert!(attacks(rook, c("a8"), c("h8"), &board));
        assert!(!attacks(rook, c("a8"), c("b7"), &board));
        assert!(is_threatened(&board, c("a5"), Color::Black));
        assert!(!is_threatened(&board, c("a3"), Color::Black));
    }

    #[test]
    fn no_piece_attacks_its_own_square_or_friends() {
        let board = Board::new();
        let queen = Piece::new(PieceType::Queen, Color::White);
        assert!(!attacks(queen, c("d1"), c("d1"), &board));
        assert!(!attacks(queen, c("d1"), c("d2"), &board));
        assert!(!is_in_check(&board, Color::White));
    }

    #[test]
    fn knight_shape() {
        assert!(is_knight_jump(2, 1));
        assert!(is_knight_jump(1, 2));
        assert!(!is_knight_jump(3, 0));
        assert!(!is_knight_jump(2, 2));
    }
}
