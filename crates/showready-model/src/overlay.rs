use serde::{Deserialize, Serialize};

/// Per-user completion record layered over checklist items. Keyed by
/// `(user_id, event_id, item_type)`; at most one row per triple. The row is
/// independent of the shared checklist tables — completing an overlay item
/// never mutates the coordinator-owned record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayItem {
    pub id: i64,
    pub user_id: String,
    pub event_id: String,
    pub item_type: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayStats {
    pub total: i64,
    pub completed: i64,
    pub incomplete: i64,
    /// `round(completed / total * 100)`; `0` when there are no rows.
    #[serde(rename = "completionRate")]
    pub completion_rate: i64,
}

impl OverlayStats {
    #[must_use]
    pub fn from_counts(total: i64, completed: i64) -> Self {
        let completion_rate = if total > 0 {
            ((completed as f64 / total as f64) * 100.0).round() as i64
        } else {
            0
        };
        Self {
            total,
            completed,
            incomplete: total - completed,
            completion_rate,
        }
    }
}

/// Result of the explicit create-vs-toggle entry point: `created` reports
/// whether this call persisted the first row for the triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayTransition {
    pub created: bool,
    pub item: OverlayItem,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_zero_rows_has_zero_rate() {
        let stats = OverlayStats::from_counts(0, 0);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.incomplete, 0);
        assert_eq!(stats.completion_rate, 0);
    }

    #[test]
    fn stats_rounds_to_nearest_percent() {
        assert_eq!(OverlayStats::from_counts(3, 2).completion_rate, 67);
        assert_eq!(OverlayStats::from_counts(3, 1).completion_rate, 33);
        assert_eq!(OverlayStats::from_counts(4, 2).completion_rate, 50);
        assert_eq!(OverlayStats::from_counts(6, 1).completion_rate, 17);
    }

    #[test]
    fn stats_wire_key_is_camel_case() {
        let value = serde_json::to_value(OverlayStats::from_counts(2, 1)).expect("stats json");
        assert!(value.get("completionRate").is_some());
        assert!(value.get("incomplete").is_some());
    }
}
