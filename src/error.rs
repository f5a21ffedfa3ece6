//! Error type for the core's fatal, determinism-protecting conditions.
//!
//! Every variant here is a programmer error or an unrecoverable determinism
//! violation. Callers are not expected to match on these and continue, they
//! exist so the panic that follows carries a structured message instead of
//! an ad-hoc string.

use crate::entity::Frame;

#[derive(Debug, thiserror::Error)]
pub enum RollbackError {
    #[error("requested input {requested} frames back, but the ring buffer only holds {capacity}")]
    FrameTooOld { requested: u32, capacity: usize },

    #[error("cannot validate frame {requested}: player {player} inputs only received up to {received:?}")]
    MissingInputsForValidation {
        player: u8,
        requested: Frame,
        received: Option<Frame>,
    },

    #[error("physics state diverged from server for player {player}: local {local:#010x} != server {server:#010x}")]
    PhysicsStateDivergence { player: u8, local: u32, server: u32 },
}

/// Logs `err` and aborts the process. Called only for assertion failures
/// and determinism divergence, conditions the game cannot continue past.
pub(crate) fn fatal(err: RollbackError) -> ! {
    tracing::error!("{err}");
    panic!("{err}");
}
