//! Participation reporting models.

use serde::Serialize;
use uuid::Uuid;

/// Read-side aggregate over the roster: how many active participants
/// have drawn so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ParticipationStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Rounded percent of completed over total; 0 when the roster is
    /// empty.
    pub percentage: u32,
}

impl ParticipationStats {
    pub fn new(total: usize, completed: usize) -> Self {
        debug_assert!(completed <= total);
        let percentage = if total == 0 {
            0
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        };
        Self {
            total,
            completed,
            pending: total - completed,
            percentage,
        }
    }
}

/// Minimal participant reference in the participation report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ParticipationMember {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Response for the admin participation report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ParticipationResponse {
    pub stats: ParticipationStats,
    pub pending_members: Vec<ParticipationMember>,
    pub completed_members: Vec<ParticipationMember>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_sum_invariant() {
        let stats = ParticipationStats::new(10, 4);
        assert_eq!(stats.completed + stats.pending, stats.total);
        assert_eq!(stats.percentage, 40);
    }

    #[test]
    fn test_stats_empty_roster() {
        let stats = ParticipationStats::new(0, 0);
        assert_eq!(stats.percentage, 0);
        assert_eq!(stats.pending, 0);
    }

    #[test]
    fn test_stats_rounding() {
        // 1/3 rounds to 33, 2/3 rounds to 67.
        assert_eq!(ParticipationStats::new(3, 1).percentage, 33);
        assert_eq!(ParticipationStats::new(3, 2).percentage, 67);
    }

    #[test]
    fn test_stats_complete() {
        let stats = ParticipationStats::new(5, 5);
        assert_eq!(stats.percentage, 100);
        assert_eq!(stats.pending, 0);
    }
}
