//! Technician roster and assignment

use homedesk_core::Technician;

/// Problem keywords mapped to the specialty that handles them, checked in
/// order; the first keyword hit decides the specialty
const SPECIALTY_KEYWORDS: &[(&[&str], &str)] = &[
    (&["dishwasher", "appliance"], "appliances"),
    (&["plumbing", "pipe"], "plumbing"),
    (&["electrical", "wiring"], "electrical"),
];

/// Built-in technician roster
pub fn default_roster() -> Vec<Technician> {
    let weekdays = || {
        vec![
            "monday".to_string(),
            "tuesday".to_string(),
            "wednesday".to_string(),
            "thursday".to_string(),
            "friday".to_string(),
        ]
    };

    vec![
        Technician {
            id: "tech-001".to_string(),
            name: "John Doe".to_string(),
            specialties: vec![
                "plumbing".to_string(),
                "electrical".to_string(),
                "appliances".to_string(),
            ],
            availability: weekdays(),
            phone: "+1234567890".to_string(),
        },
        Technician {
            id: "tech-002".to_string(),
            name: "Jane Smith".to_string(),
            specialties: vec![
                "hvac".to_string(),
                "plumbing".to_string(),
                "general".to_string(),
            ],
            availability: weekdays(),
            phone: "+1234567891".to_string(),
        },
        Technician {
            id: "tech-003".to_string(),
            name: "Mike Johnson".to_string(),
            specialties: vec![
                "electrical".to_string(),
                "appliances".to_string(),
                "general".to_string(),
            ],
            availability: weekdays(),
            phone: "+1234567892".to_string(),
        },
    ]
}

/// Pick the technician for a problem description
///
/// Lowercases the problem, finds the first specialty whose keyword appears,
/// and returns the first roster entry with that specialty. Falls back to
/// the first roster entry when nothing matches or no technician carries the
/// specialty. Returns `None` only for an empty roster.
pub fn assign_technician<'a>(roster: &'a [Technician], problem: &str) -> Option<&'a Technician> {
    let problem = problem.to_lowercase();

    for (keywords, specialty) in SPECIALTY_KEYWORDS {
        if keywords.iter().any(|k| problem.contains(k)) {
            return roster
                .iter()
                .find(|t| t.has_specialty(specialty))
                .or_else(|| roster.first());
        }
    }

    roster.first()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appliance_problems_get_appliance_specialist() {
        let roster = default_roster();

        let tech = assign_technician(&roster, "My dishwasher is broken").unwrap();
        assert!(tech.has_specialty("appliances"));
        assert_eq!(tech.id, "tech-001");
    }

    #[test]
    fn test_plumbing_keywords() {
        let roster = default_roster();

        let tech = assign_technician(&roster, "there's a burst PIPE in the basement").unwrap();
        assert!(tech.has_specialty("plumbing"));
    }

    #[test]
    fn test_electrical_keywords() {
        let roster = default_roster();

        let tech = assign_technician(&roster, "the wiring sparks").unwrap();
        assert!(tech.has_specialty("electrical"));
    }

    #[test]
    fn test_unmatched_problem_gets_first_technician() {
        let roster = default_roster();

        let tech = assign_technician(&roster, "my roof is leaking").unwrap();
        assert_eq!(tech.id, roster[0].id);
    }

    #[test]
    fn test_missing_specialty_falls_back_to_first() {
        let roster = vec![Technician {
            id: "tech-009".to_string(),
            name: "Solo Tech".to_string(),
            specialties: vec!["general".to_string()],
            availability: vec![],
            phone: "+10000000000".to_string(),
        }];

        let tech = assign_technician(&roster, "dishwasher trouble").unwrap();
        assert_eq!(tech.id, "tech-009");
    }

    #[test]
    fn test_empty_roster() {
        assert!(assign_technician(&[], "anything").is_none());
    }
}
