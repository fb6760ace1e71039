//! Fixed-depth minimax search.
//!
//! Every node is scored from the root player's point of view: the root player maximizes,
//! the opponent minimizes, and leaves are evaluated for the root player regardless of who
//! is to move there. A node is a leaf when the depth runs out or the side to move has no
//! legal move; passes are not searched through.
//!
//! Ties keep the first best move in move-generation order. Alpha-beta pruning and parallel
//! root splitting are both optional and select the same move as the plain search.

use crate::evaluation::Evaluator;
use flanker_othello::{Board, Location, Player};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// The search depth used by the hard opponent.
pub const DEFAULT_DEPTH: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Plies to search below the root. Must be at least 1 to select a move.
    pub depth: u32,
    /// Use alpha-beta pruning. Faster, same result.
    pub pruning: bool,
    /// Score root moves in parallel. Same result.
    pub parallel: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            pruning: false,
            parallel: false,
        }
    }
}

/// The outcome of a search from the root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub best: Location,
    /// Minimax value of `best`, from the root player's point of view.
    pub score: i32,
    /// Number of positions visited, root excluded.
    pub nodes: u64,
}

/// Search `board` for `player` and return the best root move.
/// Returns None if `player` has no legal move or `options.depth` is zero.
pub fn best_move<E: Evaluator>(
    board: &Board,
    player: Player,
    options: &SearchOptions,
    evaluator: &E,
) -> Option<SearchResult> {
    let moves = board.valid_moves(player);
    best_move_among(board, player, &moves, options, evaluator)
}

/// Like [`best_move`], but only considers `moves`, in the given order.
pub fn best_move_among<E: Evaluator>(
    board: &Board,
    player: Player,
    moves: &[Location],
    options: &SearchOptions,
    evaluator: &E,
) -> Option<SearchResult> {
    if moves.is_empty() || options.depth == 0 {
        return None;
    }

    let searcher = Searcher {
        root: player,
        pruning: options.pruning,
        evaluator,
    };

    let scored: Vec<(Location, i32, u64)> = if options.parallel {
        // Each root child is searched with a full window, so every score is exact
        // and the sequential merge below picks the same move as a serial search.
        moves
            .par_iter()
            .map(|&mv| {
                let mut nodes = 0;
                let score = searcher.child(board, mv, options.depth, i32::MIN, &mut nodes);
                (mv, score, nodes)
            })
            .collect()
    } else {
        let mut alpha = i32::MIN;
        moves
            .iter()
            .map(|&mv| {
                let mut nodes = 0;
                let score = searcher.child(board, mv, options.depth, alpha, &mut nodes);
                alpha = alpha.max(score);
                (mv, score, nodes)
            })
            .collect()
    };

    let mut result: Option<SearchResult> = None;
    let mut nodes = 0;
    for (mv, score, child_nodes) in scored {
        trace!(%mv, score, "root move");
        nodes += child_nodes;

        // Strictly greater: the first move reaching the best score is kept.
        if result.map_or(true, |best| score > best.score) {
            result = Some(SearchResult {
                best: mv,
                score,
                nodes: 0,
            });
        }
    }

    let result = result.map(|best| SearchResult { nodes, ..best });
    if let Some(found) = result {
        debug!(
            best = %found.best,
            score = found.score,
            nodes = found.nodes,
            depth = options.depth,
            "search finished"
        );
    }
    result
}

struct Searcher<'a, E> {
    root: Player,
    pruning: bool,
    evaluator: &'a E,
}

impl<'a, E: Evaluator> Searcher<'a, E> {
    /// Score root move `mv` with `depth` plies left at the root.
    ///
    /// With pruning, `alpha` is the best root score so far: a child that cannot beat it may
    /// return any value not above it, which never changes the root choice.
    fn child(&self, board: &Board, mv: Location, depth: u32, alpha: i32, nodes: &mut u64) -> i32 {
        let mut next = board.clone();
        next.apply_move(mv, self.root);
        *nodes += 1;

        if self.pruning {
            self.alpha_beta(&next, !self.root, depth - 1, alpha, i32::MAX, nodes)
        } else {
            self.minimax(&next, !self.root, depth - 1, nodes)
        }
    }

    /// Exhaustive minimax: every child of every node is expanded.
    fn minimax(&self, board: &Board, to_move: Player, depth: u32, nodes: &mut u64) -> i32 {
        let moves = board.valid_moves(to_move);
        if depth == 0 || moves.is_empty() {
            return self.evaluator.evaluate(board, self.root);
        }

        let maximizing = to_move == self.root;
        let scores = moves.into_iter().map(|mv| {
            let mut next = board.clone();
            next.apply_move(mv, to_move);
            *nodes += 1;
            self.minimax(&next, !to_move, depth - 1, nodes)
        });

        if maximizing {
            scores.fold(i32::MIN, i32::max)
        } else {
            scores.fold(i32::MAX, i32::min)
        }
    }

    /// Fail-soft alpha-beta over the same tree as [`Searcher::minimax`].
    /// Exact whenever the true value lies strictly inside `(alpha, beta)`.
    fn alpha_beta(
        &self,
        board: &Board,
        to_move: Player,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        nodes: &mut u64,
    ) -> i32 {
        let moves = board.valid_moves(to_move);
        if depth == 0 || moves.is_empty() {
            return self.evaluator.evaluate(board, self.root);
        }

        let maximizing = to_move == self.root;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for mv in moves {
            let mut next = board.clone();
            next.apply_move(mv, to_move);
            *nodes += 1;
            let score = self.alpha_beta(&next, !to_move, depth - 1, alpha, beta, nodes);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }

            // Cutoff: the parent will never let play reach this line.
            if alpha >= beta {
                break;
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::Heuristic;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    /// Positions reached by random play from the opening, with the side to move.
    fn random_positions(count: usize, seed: u64) -> Vec<(Board, Player)> {
        random_positions_on(8, count, seed)
    }

    fn random_positions_on(size: usize, count: usize, seed: u64) -> Vec<(Board, Player)> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut positions = Vec::new();

        while positions.len() < count {
            let mut board = Board::with_size(size).unwrap();
            let mut player = Player::Black;
            for _ in 0..rng.gen_range(0..size * size - 4) {
                if let Some(&mv) = board.valid_moves(player).choose(&mut rng) {
                    board.apply_move(mv, player);
                }
                player = !player;
            }
            if !board.valid_moves(player).is_empty() {
                positions.push((board, player));
            }
        }

        positions
    }

    /// Plain minimax written out directly: the flag flips every ply, and a node is a leaf
    /// at depth 0 or when the side to move has no moves. Leaves score for `root`.
    fn reference_value(
        board: &Board,
        to_move: Player,
        root: Player,
        depth: u32,
        maximizing: bool,
    ) -> i32 {
        let heuristic = Heuristic::default();
        let moves = board.valid_moves(to_move);
        if depth == 0 || moves.is_empty() {
            return heuristic.evaluate(board, root);
        }

        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        for mv in moves {
            let mut next = board.clone();
            next.apply_move(mv, to_move);
            let score = reference_value(&next, !to_move, root, depth - 1, !maximizing);
            if (maximizing && score > best) || (!maximizing && score < best) {
                best = score;
            }
        }
        best
    }

    fn reference_best(board: &Board, player: Player, depth: u32) -> (i32, Location) {
        let mut best: Option<(i32, Location)> = None;
        for mv in board.valid_moves(player) {
            let mut next = board.clone();
            next.apply_move(mv, player);
            let score = reference_value(&next, !player, player, depth - 1, false);
            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, mv));
            }
        }
        best.unwrap()
    }

    fn all_options(depth: u32) -> Vec<SearchOptions> {
        let mut variants = Vec::new();
        for pruning in [false, true] {
            for parallel in [false, true] {
                variants.push(SearchOptions {
                    depth,
                    pruning,
                    parallel,
                });
            }
        }
        variants
    }

    fn assert_matches_reference(board: &Board, player: Player) {
        let heuristic = Heuristic::default();
        for depth in [2, 3] {
            let expected = reference_best(board, player, depth);
            for options in all_options(depth) {
                let result = best_move(board, player, &options, &heuristic).unwrap();
                assert_eq!(
                    (result.score, result.best),
                    expected,
                    "{:?} {} to move\n{}",
                    options,
                    player,
                    board
                );
            }
        }
    }

    #[test]
    fn stuck_opponent_is_a_leaf() {
        // Black's A1 leaves White's last disc unable to move while Black still can.
        let board: Board = "
            .OX.
            .O..
            ....
            ...."
            .parse()
            .unwrap();
        assert_eq!(
            board.valid_moves(Player::Black),
            vec![Location::new(0, 0), Location::new(2, 0)]
        );
        let mut after = board.clone();
        after.apply_move(Location::new(0, 0), Player::Black);
        assert!(!after.has_valid_move(Player::White));
        assert!(after.has_valid_move(Player::Black));

        assert_matches_reference(&board, Player::Black);
    }

    #[test]
    fn matches_reference_minimax() {
        for (size, seed) in [(4, 21), (6, 22), (8, 23)] {
            for (board, player) in random_positions_on(size, 6, seed) {
                assert_matches_reference(&board, player);
            }
        }
    }

    #[test]
    fn no_moves_no_result() {
        let board: Board = "
            X...
            ....
            ....
            ...."
            .parse()
            .unwrap();
        let options = SearchOptions::default();
        assert_eq!(
            best_move(&board, Player::White, &options, &Heuristic::default()),
            None
        );

        let zero_depth = SearchOptions {
            depth: 0,
            ..options
        };
        assert_eq!(
            best_move(&Board::new(), Player::Black, &zero_depth, &Heuristic::default()),
            None
        );
    }

    #[test]
    fn symmetric_opening_keeps_first_move() {
        // All four openings are equivalent by symmetry, so the first one wins the tie.
        for depth in 1..=3 {
            let options = SearchOptions {
                depth,
                ..SearchOptions::default()
            };
            let result =
                best_move(&Board::new(), Player::Black, &options, &Heuristic::default()).unwrap();
            assert_eq!(result.best, Location::new(2, 3));
        }
    }

    #[test]
    fn depth_one_is_greedy_on_evaluation() {
        let heuristic = Heuristic::default();
        let options = SearchOptions {
            depth: 1,
            ..SearchOptions::default()
        };

        for (board, player) in random_positions(10, 3) {
            let result = best_move(&board, player, &options, &heuristic).unwrap();
            let best_score = board
                .valid_moves(player)
                .into_iter()
                .map(|mv| {
                    let mut next = board.clone();
                    next.apply_move(mv, player);
                    heuristic.evaluate(&next, player)
                })
                .max()
                .unwrap();
            assert_eq!(result.score, best_score);
        }
    }

    #[test]
    fn pruning_and_parallel_agree_with_plain_search() {
        let heuristic = Heuristic::default();
        let plain = SearchOptions::default();
        let variants = [
            SearchOptions {
                pruning: true,
                ..plain
            },
            SearchOptions {
                parallel: true,
                ..plain
            },
            SearchOptions {
                pruning: true,
                parallel: true,
                ..plain
            },
        ];

        for (board, player) in random_positions(8, 11) {
            let expected = best_move(&board, player, &plain, &heuristic).unwrap();
            for options in &variants {
                let result = best_move(&board, player, options, &heuristic).unwrap();
                assert_eq!(result.best, expected.best, "{:?}\n{}", options, board);
                assert_eq!(result.score, expected.score, "{:?}\n{}", options, board);
            }
        }
    }

    #[test]
    fn pruning_visits_fewer_nodes() {
        let heuristic = Heuristic::default();
        let plain = SearchOptions {
            depth: 4,
            ..SearchOptions::default()
        };
        let pruned = SearchOptions {
            pruning: true,
            ..plain
        };

        let mut board = Board::new();
        board.apply_move(Location::new(2, 3), Player::Black);
        board.apply_move(Location::new(2, 2), Player::White);

        let full = best_move(&board, Player::Black, &plain, &heuristic).unwrap();
        let cut = best_move(&board, Player::Black, &pruned, &heuristic).unwrap();
        assert!(cut.nodes <= full.nodes);
        assert_eq!(cut.best, full.best);
    }

    #[test]
    fn repeated_searches_agree() {
        let heuristic = Heuristic::default();
        let options = SearchOptions::default();
        for (board, player) in random_positions(5, 5) {
            let first = best_move(&board, player, &options, &heuristic);
            for _ in 0..3 {
                assert_eq!(best_move(&board, player, &options, &heuristic), first);
            }
        }
    }
}
