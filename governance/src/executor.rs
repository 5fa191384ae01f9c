//! The capability the engine dispatches proposal actions through.

use crate::action::Action;

/// Dispatches actions on behalf of an instance.
///
/// The engine takes a checkpoint before dispatching a proposal's actions and
/// rolls back to it if any action fails, so implementations must make
/// `rollback` restore every effect of the `dispatch` calls made since the
/// checkpoint was taken.
pub trait ActionExecutor {
    type Checkpoint;

    fn checkpoint(&self) -> Self::Checkpoint;

    /// Apply one action. The error string is surfaced to the caller.
    fn dispatch(&mut self, action: &Action) -> Result<(), String>;

    fn rollback(&mut self, checkpoint: Self::Checkpoint);
}
