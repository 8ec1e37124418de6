//! Appointment slot policy
//!
//! Every booking lands on one fixed slot: a configurable number of days
//! ahead at a single time of day. The policy object keeps the labels and
//! the date resolution in one place; it deliberately has no availability
//! logic.

use chrono::{Duration, Utc};

use homedesk_config::BusinessConfig;

/// The single proposed appointment slot
#[derive(Debug, Clone)]
pub struct SlotPolicy {
    /// Days from now to the slot
    pub days_ahead: i64,
    /// Time label stored on appointments, e.g. "10:00 AM"
    pub time_label: String,
    /// How the slot is spoken to the caller
    pub spoken: String,
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self {
            days_ahead: 1,
            time_label: "10:00 AM".to_string(),
            spoken: "tomorrow morning at 10 AM".to_string(),
        }
    }
}

impl SlotPolicy {
    pub fn from_config(business: &BusinessConfig) -> Self {
        Self {
            days_ahead: business.slot_days_ahead,
            time_label: business.slot_time.clone(),
            spoken: business.slot_spoken.clone(),
        }
    }

    /// Label stored on the conversation state while the slot is pending
    pub fn date_label(&self) -> String {
        if self.days_ahead == 1 {
            "tomorrow".to_string()
        } else {
            format!("in {} days", self.days_ahead)
        }
    }

    /// Resolve the pending slot to a concrete calendar date (YYYY-MM-DD)
    pub fn resolve_date(&self) -> String {
        (Utc::now() + Duration::days(self.days_ahead))
            .format("%Y-%m-%d")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_slot() {
        let policy = SlotPolicy::default();
        assert_eq!(policy.date_label(), "tomorrow");
        assert_eq!(policy.time_label, "10:00 AM");
    }

    #[test]
    fn test_resolve_date_is_tomorrow() {
        let policy = SlotPolicy::default();
        let expected = (Utc::now() + Duration::days(1)).format("%Y-%m-%d").to_string();
        assert_eq!(policy.resolve_date(), expected);
    }

    #[test]
    fn test_multi_day_label() {
        let policy = SlotPolicy {
            days_ahead: 3,
            ..SlotPolicy::default()
        };
        assert_eq!(policy.date_label(), "in 3 days");
    }
}
