//! Appointment and technician types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Appointment lifecycle status
///
/// The conversation flow only ever creates appointments as `Scheduled`;
/// later transitions happen through the dashboard API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(Self::Scheduled),
            "confirmed" => Some(Self::Confirmed),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            "no_show" => Some(Self::NoShow),
            _ => None,
        }
    }
}

/// A booked service appointment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    /// Generated identifier
    pub id: Uuid,
    /// Call that produced this booking
    pub call_id: String,
    /// Caller name as captured in conversation
    pub customer_name: String,
    /// Caller phone, "unknown" when never supplied
    pub customer_phone: String,
    /// Problem description as spoken
    pub problem: String,
    /// Concrete date, YYYY-MM-DD
    pub scheduled_date: String,
    /// Slot label, e.g. "10:00 AM"
    pub scheduled_time: String,
    pub technician_id: String,
    pub technician_name: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A service technician from the static roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technician {
    pub id: String,
    pub name: String,
    /// Specialty tags matched against problem keywords, in priority order
    pub specialties: Vec<String>,
    /// Weekday availability labels
    pub availability: Vec<String>,
    pub phone: String,
}

impl Technician {
    pub fn has_specialty(&self, specialty: &str) -> bool {
        self.specialties.iter().any(|s| s == specialty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Confirmed,
            AppointmentStatus::InProgress,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ] {
            assert_eq!(AppointmentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AppointmentStatus::parse("unknown"), None);
    }

    #[test]
    fn test_has_specialty() {
        let tech = Technician {
            id: "tech-001".to_string(),
            name: "John Doe".to_string(),
            specialties: vec!["plumbing".to_string(), "electrical".to_string()],
            availability: vec!["monday".to_string()],
            phone: "+1234567890".to_string(),
        };

        assert!(tech.has_specialty("plumbing"));
        assert!(!tech.has_specialty("hvac"));
    }
}
