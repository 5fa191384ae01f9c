//! Nullable action executor: records dispatches, fails on demand.

use hdao_governance::{Action, ActionExecutor};

#[derive(Debug, Default)]
pub struct NullExecutor {
    dispatched: Vec<Action>,
    fail_at: Option<usize>,
    attempts: usize,
}

impl NullExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the dispatch attempt with this zero-based number.
    ///
    /// Attempts are counted over the executor's lifetime, rolled-back ones
    /// included, so the failure fires once.
    pub fn failing_at(attempt: usize) -> Self {
        Self {
            fail_at: Some(attempt),
            ..Self::default()
        }
    }

    pub fn set_fail_at(&mut self, attempt: Option<usize>) {
        self.fail_at = attempt;
    }

    /// Actions dispatched and not rolled back.
    pub fn dispatched(&self) -> &[Action] {
        &self.dispatched
    }

    /// Dispatch calls seen, including rolled-back ones.
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl ActionExecutor for NullExecutor {
    type Checkpoint = usize;

    fn checkpoint(&self) -> usize {
        self.dispatched.len()
    }

    fn dispatch(&mut self, action: &Action) -> Result<(), String> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_at == Some(attempt) {
            return Err(format!("null executor configured to fail attempt {attempt}"));
        }
        self.dispatched.push(action.clone());
        Ok(())
    }

    fn rollback(&mut self, checkpoint: usize) {
        self.dispatched.truncate(checkpoint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdao_types::{Address, Amount};

    fn action(byte: u8) -> Action {
        Action::new(Address::new([byte; 20]), Amount::ZERO, vec![byte])
    }

    #[test]
    fn records_in_order() {
        let mut executor = NullExecutor::new();
        executor.dispatch(&action(1)).unwrap();
        executor.dispatch(&action(2)).unwrap();
        assert_eq!(executor.dispatched(), &[action(1), action(2)]);
    }

    #[test]
    fn configured_attempt_fails_and_rolls_back() {
        let mut executor = NullExecutor::failing_at(2);
        executor.dispatch(&action(1)).unwrap();

        let cp = executor.checkpoint();
        executor.dispatch(&action(2)).unwrap();
        assert!(executor.dispatch(&action(3)).is_err());
        executor.rollback(cp);
        assert_eq!(executor.dispatched(), &[action(1)]);
        assert_eq!(executor.attempts(), 3);

        executor.dispatch(&action(2)).unwrap();
        executor.dispatch(&action(3)).unwrap();
        assert_eq!(executor.dispatched(), &[action(1), action(2), action(3)]);
    }

    #[test]
    fn checkpoint_has_no_side_effects() {
        let executor = NullExecutor::failing_at(0);
        assert_eq!(executor.checkpoint(), 0);
        assert_eq!(executor.checkpoint(), 0);
        assert_eq!(executor.attempts(), 0);
    }
}
