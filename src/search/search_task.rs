//! Background search handoff for the controller.
//!
//! A `SearchTask` owns one worker thread running an engine on a snapshot of
//! the position. The result comes back through a single-slot channel; the
//! controller polls it between input events and may cancel at any time.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use log::{debug, warn};

use crate::engines::engine_trait::{Engine, EngineOutput, GoParams};
use crate::game_state::game_state::GameState;
use crate::moves::chess_move::Move;
use crate::search::threading::SharedSearchState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPoll {
    Pending,
    /// The engine finished; `None` means it made no decision.
    Ready(Option<Move>),
    Cancelled,
}

pub struct SearchTask {
    shared: Arc<SharedSearchState>,
    receiver: Receiver<EngineOutput>,
    outcome: Option<Option<Move>>,
    cancelled: bool,
}

impl SearchTask {
    /// Starts `engine` on a snapshot of `game_state`; later changes to the
    /// caller's state do not affect the running search.
    pub fn spawn(
        mut engine: Box<dyn Engine>,
        game_state: &GameState,
        legal_moves: &[Move],
        mut params: GoParams,
    ) -> Self {
        let shared = params.stop.clone().unwrap_or_else(SharedSearchState::new_shared);
        params.stop = Some(Arc::clone(&shared));

        let snapshot = game_state.clone();
        let moves = legal_moves.to_vec();
        let (sender, receiver) = mpsc::sync_channel(1);

        debug!(
            "spawning {} for {} with {} legal moves",
            engine.name(),
            snapshot.side_to_move().name(),
            moves.len()
        );

        // Detached: a cancelled worker finishes on its own and its send fails
        // harmlessly once the receiver is gone.
        thread::spawn(move || {
            let output = engine.choose_move(&snapshot, &moves, &params);
            for line in &output.info_lines {
                debug!("{line}");
            }
            let _ = sender.send(output);
        });

        Self {
            shared,
            receiver,
            outcome: None,
            cancelled: false,
        }
    }

    /// Non-blocking check for the result.
    pub fn poll(&mut self) -> TaskPoll {
        if self.cancelled {
            return TaskPoll::Cancelled;
        }
        if let Some(outcome) = self.outcome {
            return TaskPoll::Ready(outcome);
        }

        match self.receiver.try_recv() {
            Ok(output) => {
                self.outcome = Some(output.best_move);
                TaskPoll::Ready(output.best_move)
            }
            Err(TryRecvError::Empty) => TaskPoll::Pending,
            Err(TryRecvError::Disconnected) => {
                warn!("search worker exited without a result");
                self.outcome = Some(None);
                TaskPoll::Ready(None)
            }
        }
    }

    /// Blocks until the worker reports. A cancelled task yields `None`.
    pub fn wait(self) -> Option<Move> {
        if self.cancelled {
            return None;
        }
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        match self.receiver.recv() {
            Ok(output) => output.best_move,
            Err(_) => {
                warn!("search worker exited without a result");
                None
            }
        }
    }

    /// Asks the worker to stop and discards whatever it produces.
    pub fn cancel(&mut self) {
        if !self.cancelled {
            debug!("search task cancelled");
        }
        self.shared.request_stop();
        self.cancelled = true;
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Drop for SearchTask {
    fn drop(&mut self) {
        self.shared.request_stop();
    }
}
