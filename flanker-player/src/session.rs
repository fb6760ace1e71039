//! A game session: one game, who controls each color, and what has happened so far.
//!
//! A driver (terminal, GUI, test) owns a [`Session`], feeds it human moves with
//! [`Session::play`] and lets it take forced passes and computer moves with [`Session::step`].

use crate::strategy::MoveSource;
use derive_more::{Display, Error};
use flanker_othello::{Action, GameState, Location, Player, Score};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Who picks the moves for one color.
pub enum Controller {
    Human,
    Computer(Box<dyn MoveSource>),
}

impl Controller {
    pub fn computer(source: impl MoveSource + 'static) -> Self {
        Controller::Computer(Box::new(source))
    }

    pub fn is_human(&self) -> bool {
        matches!(self, Controller::Human)
    }

    pub fn participant(&self) -> Participant {
        match self {
            Controller::Human => Participant::Human,
            Controller::Computer(source) => Participant::Computer(source.name()),
        }
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Controller::Human => f.write_str("Human"),
            Controller::Computer(source) => write!(f, "Computer({})", source.name()),
        }
    }
}

/// A description of a [`Controller`] for records.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum Participant {
    Human,
    Computer(String),
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Human => f.write_str("human"),
            Participant::Computer(name) => write!(f, "computer ({})", name),
        }
    }
}

/// One turn of the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub player: Player,
    pub action: Action,
    /// Discs flipped by the move, in flip order. Empty for a pass.
    pub flipped: Vec<Location>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    #[display(fmt = "the game is over")]
    GameOver,
    #[display(fmt = "{} is not controlled by a human", _0)]
    NotHumanTurn(#[error(not(source))] Player),
    #[display(fmt = "{} is not a legal move", _0)]
    IllegalMove(#[error(not(source))] Location),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

/// Summary of a finished game, for whatever stores game history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub black: Participant,
    pub white: Participant,
    pub board_size: usize,
    pub winner: Option<Player>,
    pub score: Score,
    pub moves: usize,
    pub passes: usize,
    pub duration: Duration,
}

impl GameRecord {
    /// The result of the game as seen by `player`.
    pub fn result_for(&self, player: Player) -> GameResult {
        match self.winner {
            None => GameResult::Draw,
            Some(winner) if winner == player => GameResult::Win,
            Some(_) => GameResult::Loss,
        }
    }

    pub fn participant(&self, player: Player) -> &Participant {
        match player {
            Player::Black => &self.black,
            Player::White => &self.white,
        }
    }
}

/// One game in progress.
pub struct Session {
    state: GameState,
    black: Controller,
    white: Controller,
    history: Vec<Turn>,
    started: Instant,
    finished: Option<Duration>,
}

impl Session {
    pub fn new(state: GameState, black: Controller, white: Controller) -> Self {
        Self {
            state,
            black,
            white,
            history: Vec::new(),
            started: Instant::now(),
            finished: None,
        }
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Every turn taken so far, oldest first.
    #[inline]
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn controller(&self, player: Player) -> &Controller {
        match player {
            Player::Black => &self.black,
            Player::White => &self.white,
        }
    }

    /// The legal moves of the player to move.
    pub fn legal_moves(&self) -> Vec<Location> {
        self.state.valid_moves()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_game_over()
    }

    /// Returns whether the game is waiting for a human to place a disc.
    pub fn awaits_human(&self) -> bool {
        !self.is_finished()
            && self.controller(self.state.current_player()).is_human()
            && !self.legal_moves().is_empty()
    }

    /// Play a human move for the player to move.
    pub fn play(&mut self, loc: Location) -> Result<&Turn, SessionError> {
        if self.is_finished() {
            return Err(SessionError::GameOver);
        }

        let player = self.state.current_player();
        if !self.controller(player).is_human() {
            return Err(SessionError::NotHumanTurn(player));
        }
        if !self.state.board().is_valid_move(loc, player) {
            return Err(SessionError::IllegalMove(loc));
        }

        Ok(self.make_move(loc))
    }

    /// Take one automatic turn: a forced pass, or a computer move.
    ///
    /// Returns None if the game is over, a human has to move, or the computer
    /// failed to produce a legal move.
    pub fn step(&mut self) -> Option<&Turn> {
        if self.is_finished() {
            return None;
        }

        if self.state.pass_if_needed() {
            let player = !self.state.current_player();
            debug!(%player, "forced pass");
            return Some(self.push_turn(Turn {
                player,
                action: Action::Pass,
                flipped: Vec::new(),
            }));
        }

        let player = self.state.current_player();
        let source = match player {
            Player::Black => &mut self.black,
            Player::White => &mut self.white,
        };
        let source = match source {
            Controller::Human => return None,
            Controller::Computer(source) => source,
        };

        let legal = self.state.valid_moves();
        let mv = source.select_move(self.state.board(), player, &legal);
        match mv {
            Some(mv) if legal.contains(&mv) => Some(self.make_move(mv)),
            _ => {
                warn!(%player, source = %source.name(), ?mv, "computer did not pick a legal move");
                None
            }
        }
    }

    /// Take automatic turns until a human has to move or the game ends.
    /// Returns the number of turns taken.
    pub fn advance(&mut self) -> usize {
        let mut turns = 0;
        while self.step().is_some() {
            turns += 1;
        }
        turns
    }

    /// A record of the game, once it is over.
    pub fn record(&self) -> Option<GameRecord> {
        if !self.is_finished() {
            return None;
        }

        let (winner, score) = self.state.winner();
        let passes = self
            .history
            .iter()
            .filter(|turn| turn.action == Action::Pass)
            .count();

        Some(GameRecord {
            black: self.black.participant(),
            white: self.white.participant(),
            board_size: self.state.board().size(),
            winner,
            score,
            moves: self.history.len() - passes,
            passes,
            duration: self.finished.unwrap_or_else(|| self.started.elapsed()),
        })
    }

    fn make_move(&mut self, mv: Location) -> &Turn {
        let player = self.state.current_player();
        let flipped = self.state.play(mv);
        debug!(%player, %mv, flipped = flipped.len(), "move");

        if self.state.is_game_over() {
            self.finished = Some(self.started.elapsed());
            let (winner, score) = self.state.winner();
            info!(?winner, %score, "game over");
        }

        self.push_turn(Turn {
            player,
            action: Action::MakeMove(mv),
            flipped,
        })
    }

    fn push_turn(&mut self, turn: Turn) -> &Turn {
        self.history.push(turn);
        &self.history[self.history.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::Heuristic;
    use crate::search::SearchOptions;
    use crate::strategy::{Difficulty, MoveSelector};
    use flanker_othello::Board;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn computer(difficulty: Difficulty, seed: u64) -> Controller {
        Controller::computer(MoveSelector::with_options(
            difficulty,
            SearchOptions::default(),
            Heuristic::default(),
            StdRng::seed_from_u64(seed),
        ))
    }

    /// Always answers with an occupied square.
    struct Cheater;

    impl MoveSource for Cheater {
        fn select_move(&mut self, _: &Board, _: Player, _: &[Location]) -> Option<Location> {
            Some(Location::new(3, 3))
        }

        fn name(&self) -> String {
            "cheater".to_string()
        }
    }

    #[test]
    fn human_moves() {
        let mut session = Session::new(GameState::default(), Controller::Human, Controller::Human);
        assert!(session.awaits_human());

        let turn = session.play(Location::new(2, 3)).unwrap().clone();
        assert_eq!(turn.player, Player::Black);
        assert_eq!(turn.action, Action::MakeMove(Location::new(2, 3)));
        assert_eq!(turn.flipped, vec![Location::new(3, 3)]);
        assert_eq!(session.state().current_player(), Player::White);

        assert_eq!(
            session.play(Location::new(0, 0)),
            Err(SessionError::IllegalMove(Location::new(0, 0)))
        );
        assert_eq!(session.history().len(), 1);

        // Nothing automatic to do between two humans.
        assert!(session.step().is_none());
    }

    #[test]
    fn computer_answers_human() {
        let mut session = Session::new(
            GameState::default(),
            Controller::Human,
            computer(Difficulty::Medium, 1),
        );
        session.play(Location::new(2, 3)).unwrap();

        assert_eq!(
            session.play(Location::new(2, 2)),
            Err(SessionError::NotHumanTurn(Player::White))
        );

        assert_eq!(session.advance(), 1);
        assert_eq!(session.history()[1].player, Player::White);
        assert_eq!(session.state().current_player(), Player::Black);
        assert!(session.awaits_human());
    }

    #[test]
    fn forced_pass_is_recorded() {
        let board: Board = "
            XO..
            ....
            ....
            ...."
            .parse()
            .unwrap();
        let state = GameState::with_player(board, Player::White);
        let mut session = Session::new(state, Controller::Human, Controller::Human);

        assert!(!session.awaits_human());
        let turn = session.step().unwrap();
        assert_eq!(turn.player, Player::White);
        assert_eq!(turn.action, Action::Pass);
        assert_eq!(session.state().current_player(), Player::Black);
        assert!(session.awaits_human());

        // Black's only move ends the game: nobody can move afterwards.
        session.play(Location::new(0, 2)).unwrap();
        assert!(session.is_finished());
        assert_eq!(session.play(Location::new(1, 1)), Err(SessionError::GameOver));

        let record = session.record().unwrap();
        assert_eq!(record.moves, 1);
        assert_eq!(record.passes, 1);
        assert_eq!(record.winner, Some(Player::Black));
        assert_eq!(record.score, Score { black: 3, white: 0 });
        assert_eq!(record.result_for(Player::Black), GameResult::Win);
        assert_eq!(record.result_for(Player::White), GameResult::Loss);
    }

    #[test]
    fn computers_finish_the_game() {
        let mut session = Session::new(
            GameState::default(),
            computer(Difficulty::Easy, 3),
            computer(Difficulty::Medium, 4),
        );
        assert!(session.record().is_none());

        session.advance();
        assert!(session.is_finished());
        assert!(session.step().is_none());

        let record = session.record().unwrap();
        assert_eq!(record.black, Participant::Computer("easy".to_string()));
        assert_eq!(record.white, Participant::Computer("medium".to_string()));
        assert_eq!(record.moves + record.passes, session.history().len());
        assert_eq!(record.winner, record.score.winner());
        assert_eq!(record.score.black + record.score.white, record.moves + 4);

        // Replaying the history reproduces the final position.
        let mut replay = Board::new();
        for turn in session.history() {
            if let Action::MakeMove(mv) = turn.action {
                assert_eq!(replay.apply_move(mv, turn.player), turn.flipped);
            }
        }
        assert_eq!(&replay, session.state().board());
    }

    #[test]
    fn illegal_computer_move_stalls() {
        let mut session = Session::new(
            GameState::default(),
            Controller::computer(Cheater),
            Controller::Human,
        );
        assert!(session.step().is_none());
        assert_eq!(session.advance(), 0);
        assert!(session.history().is_empty());
    }

    #[test]
    fn record_serializes() {
        let record = GameRecord {
            black: Participant::Human,
            white: Participant::Computer("hard".to_string()),
            board_size: 8,
            winner: None,
            score: Score {
                black: 32,
                white: 32,
            },
            moves: 60,
            passes: 0,
            duration: Duration::from_secs(90),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""white":{"kind":"computer","name":"hard"}"#));
        assert!(json.contains(r#""black":{"kind":"human"}"#));
        let parsed: GameRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
        assert_eq!(parsed.result_for(Player::White), GameResult::Draw);
    }
}
