//! Pipeline phase state machine.
//!
//! The build's dependency graph is fixed and small, so it is expressed as
//! a tagged state plus a successor function rather than a task scheduler:
//!
//! `Idle → Cleaning → Transforming → Rewriting → Done`
//!
//! `Failed` is terminal and reachable from any non-terminal state.

/// Current position of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Cleaning,
    Transforming,
    Rewriting,
    Done,
    Failed,
}

impl Phase {
    /// Successor on the happy path. Terminal states have none.
    pub const fn next(self) -> Option<Phase> {
        match self {
            Phase::Idle => Some(Phase::Cleaning),
            Phase::Cleaning => Some(Phase::Transforming),
            Phase::Transforming => Some(Phase::Rewriting),
            Phase::Rewriting => Some(Phase::Done),
            Phase::Done | Phase::Failed => None,
        }
    }

    #[allow(dead_code)]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }

    /// Stage name used in logs and error reports.
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Cleaning => "clean",
            Phase::Transforming => "transform",
            Phase::Rewriting => "rewrite",
            Phase::Done => "done",
            Phase::Failed => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_order() {
        let mut visited = Vec::new();
        let mut phase = Phase::Idle;
        while let Some(next) = phase.next() {
            phase = next;
            visited.push(phase);
        }
        assert_eq!(
            visited,
            vec![
                Phase::Cleaning,
                Phase::Transforming,
                Phase::Rewriting,
                Phase::Done
            ]
        );
    }

    #[test]
    fn test_terminal_states_have_no_successor() {
        assert!(Phase::Done.next().is_none());
        assert!(Phase::Failed.next().is_none());
        assert!(Phase::Done.is_terminal());
        assert!(Phase::Failed.is_terminal());
        assert!(!Phase::Transforming.is_terminal());
    }
}
