//! Success and failure streaks

use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Consecutive outcomes counted back from the most recent session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub successes: u32,
    pub failures: u32,
}

impl Streak {
    /// `sessions` must be oldest first
    pub fn from_sessions(sessions: &[Session]) -> Self {
        let mut streak = Streak::default();

        let Some(latest) = sessions.last() else {
            return streak;
        };
        let succeeding = latest.completed();

        for session in sessions.iter().rev() {
            if session.completed() != succeeding {
                break;
            }
            if succeeding {
                streak.successes += 1;
            } else {
                streak.failures += 1;
            }
        }

        streak
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SetResult;
    use chrono::Utc;

    fn session(reps: u32, days_ago: i64) -> Session {
        Session::new(
            Utc::now() - chrono::Duration::days(days_ago),
            "bench press",
            vec![SetResult::new(185.0, reps).with_target(5)],
        )
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(Streak::from_sessions(&[]), Streak::default());
    }

    #[test]
    fn test_success_run() {
        let sessions = vec![session(3, 9), session(5, 6), session(5, 3), session(6, 0)];
        let streak = Streak::from_sessions(&sessions);
        assert_eq!(streak.successes, 3);
        assert_eq!(streak.failures, 0);
    }

    #[test]
    fn test_failure_run() {
        let sessions = vec![session(5, 9), session(4, 6), session(4, 3), session(3, 0)];
        let streak = Streak::from_sessions(&sessions);
        assert_eq!(streak.successes, 0);
        assert_eq!(streak.failures, 3);
    }
}
