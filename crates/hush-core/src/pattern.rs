//! Breathing pattern library.
//!
//! A pattern is an ordered cycle of timed phases (inhale, hold, exhale, ...)
//! that repeats for the length of a session. The built-in set is fixed;
//! custom patterns are parsed from strings like `"4-7-8"`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Names and display labels handed out to custom phases, by position.
/// Patterns longer than four phases wrap around to `inhale`.
const CUSTOM_PHASE_TABLE: [(&str, &str); 4] = [
    ("inhale", "Breathe in"),
    ("hold", "Hold"),
    ("exhale", "Breathe out"),
    ("hold-bottom", "Hold"),
];

/// One timed segment of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingPhase {
    pub name: String,
    pub label: String,
    pub duration_ms: u64,
}

impl BreathingPhase {
    pub fn new(name: impl Into<String>, label: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            duration_ms,
        }
    }
}

/// A named cycle of phases. `cycle_ms` always equals the sum of the phase
/// durations; the fields are private so it cannot drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreathingPattern {
    id: String,
    name: String,
    description: String,
    phases: Vec<BreathingPhase>,
    cycle_ms: u64,
}

impl BreathingPattern {
    /// Build a pattern, rejecting fewer than two phases or zero-length phases.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] describing the first problem found.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        phases: Vec<BreathingPhase>,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if phases.len() < 2 {
            return Err(ValidationError::TooFewPhases {
                id,
                count: phases.len(),
            });
        }
        if let Some(zero) = phases.iter().find(|p| p.duration_ms == 0) {
            return Err(ValidationError::ZeroDuration {
                phase: zero.name.clone(),
                id,
            });
        }
        let Some(cycle_ms) = cycle_length(&phases) else {
            return Err(ValidationError::CycleOverflow { id });
        };
        Ok(Self::from_parts(id, name.into(), description.into(), phases, cycle_ms))
    }

    fn from_parts(
        id: String,
        name: String,
        description: String,
        phases: Vec<BreathingPhase>,
        cycle_ms: u64,
    ) -> Self {
        Self {
            id,
            name,
            description,
            phases,
            cycle_ms,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn phases(&self) -> &[BreathingPhase] {
        &self.phases
    }

    pub fn cycle_ms(&self) -> u64 {
        self.cycle_ms
    }

    /// Whole seconds per cycle, rounded down.
    pub fn cycle_secs(&self) -> u64 {
        self.cycle_ms / 1000
    }
}

/// Sum of the phase durations, or `None` if it does not fit in a `u64`.
fn cycle_length(phases: &[BreathingPhase]) -> Option<u64> {
    phases
        .iter()
        .try_fold(0u64, |total, p| total.checked_add(p.duration_ms))
}

fn builtin(id: &str, name: &str, description: &str, phases: &[(&str, &str, u64)]) -> BreathingPattern {
    let cycle_ms = phases.iter().map(|&(_, _, secs)| secs * 1000).sum();
    BreathingPattern::from_parts(
        id.to_string(),
        name.to_string(),
        description.to_string(),
        phases
            .iter()
            .map(|&(name, label, secs)| BreathingPhase::new(name, label, secs * 1000))
            .collect(),
        cycle_ms,
    )
}

/// The built-in patterns, in menu order.
pub fn builtin_patterns() -> Vec<BreathingPattern> {
    vec![
        builtin(
            "4-4-4",
            "4-4-4 (Standard)",
            "Balanced breathing: inhale, hold, exhale",
            &[
                ("inhale", "Breathe in", 4),
                ("hold", "Hold", 4),
                ("exhale", "Breathe out", 4),
            ],
        ),
        builtin(
            "4-7-8",
            "4-7-8 (Relaxing)",
            "Calming breath for sleep and anxiety",
            &[
                ("inhale", "Breathe in", 4),
                ("hold", "Hold", 7),
                ("exhale", "Breathe out", 8),
            ],
        ),
        builtin(
            "5-5",
            "5-5 (Coherent)",
            "Simple coherent breathing for focus",
            &[("inhale", "Breathe in", 5), ("exhale", "Breathe out", 5)],
        ),
        builtin(
            "4-4-4-4",
            "4-4-4-4 (Box)",
            "Box breathing: inhale, hold, exhale, hold",
            &[
                ("inhale", "Breathe in", 4),
                ("hold-top", "Hold", 4),
                ("exhale", "Breathe out", 4),
                ("hold-bottom", "Hold", 4),
            ],
        ),
    ]
}

/// Find a built-in pattern by id.
pub fn lookup_pattern(id: &str) -> Option<BreathingPattern> {
    builtin_patterns().into_iter().find(|p| p.id == id)
}

/// Parse `"4-7-8"` style input (seconds per phase) into a custom pattern.
///
/// Returns `None` for fewer than two values, non-numeric tokens, values that
/// are not strictly positive, or a cycle too long to represent in
/// milliseconds. Leading zeros are normalized away in the id.
pub fn parse_custom_pattern(spec: &str) -> Option<BreathingPattern> {
    let seconds = spec
        .split('-')
        .map(|token| token.trim().parse::<u64>().ok().filter(|&n| n > 0))
        .collect::<Option<Vec<_>>>()?;
    if seconds.len() < 2 {
        return None;
    }

    let phases = seconds
        .iter()
        .enumerate()
        .map(|(i, &secs)| {
            let (name, label) = CUSTOM_PHASE_TABLE[i % CUSTOM_PHASE_TABLE.len()];
            Some(BreathingPhase::new(name, label, secs.checked_mul(1000)?))
        })
        .collect::<Option<Vec<_>>>()?;
    let cycle_ms = cycle_length(&phases)?;

    let id = seconds
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join("-");
    Some(BreathingPattern::from_parts(
        id.clone(),
        format!("Custom ({id})"),
        format!("Custom pattern: {id}"),
        phases,
        cycle_ms,
    ))
}

/// Resolve user input to a pattern: built-in id first, then custom syntax.
pub fn resolve_pattern(input: &str) -> Option<BreathingPattern> {
    let input = input.trim();
    lookup_pattern(input).or_else(|| parse_custom_pattern(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn builtins_keep_cycle_invariant() {
        let patterns = builtin_patterns();
        assert_eq!(patterns.len(), 4);
        for p in &patterns {
            assert!(p.phases().len() >= 2, "{} has too few phases", p.id());
            let sum: u64 = p.phases().iter().map(|ph| ph.duration_ms).sum();
            assert_eq!(p.cycle_ms(), sum, "{}", p.id());
        }
    }

    #[test]
    fn builtin_ids_in_menu_order() {
        let ids: Vec<_> = builtin_patterns().iter().map(|p| p.id().to_string()).collect();
        assert_eq!(ids, ["4-4-4", "4-7-8", "5-5", "4-4-4-4"]);
    }

    #[test]
    fn lookup_finds_builtin() {
        let relaxing = lookup_pattern("4-7-8").unwrap();
        assert_eq!(relaxing.cycle_ms(), 19_000);
        assert_eq!(relaxing.phases()[1].label, "Hold");
        assert!(lookup_pattern("9-9-9").is_none());
    }

    #[test]
    fn parses_custom_pattern() {
        let p = parse_custom_pattern("3-6-9").unwrap();
        let durations: Vec<_> = p.phases().iter().map(|ph| ph.duration_ms).collect();
        assert_eq!(durations, [3000, 6000, 9000]);
        assert_eq!(p.cycle_ms(), 18_000);
        assert_eq!(p.id(), "3-6-9");
        assert_eq!(p.name(), "Custom (3-6-9)");
    }

    #[test]
    fn rejects_bad_custom_input() {
        for bad in ["", "abc", "4", "0-4", "-4-4", "4--4", "4-x", "4-4-"] {
            assert!(parse_custom_pattern(bad).is_none(), "accepted {bad:?}");
        }
    }

    #[test]
    fn oversized_custom_phases_fail_softly() {
        for huge in [
            "18446744073709551615-1",
            "18446744073709551-18446744073709551",
            "9223372036854775-9223372036854775-9223372036854775",
        ] {
            assert!(parse_custom_pattern(huge).is_none(), "accepted {huge:?}");
            assert!(resolve_pattern(huge).is_none());
        }
    }

    #[test]
    fn largest_representable_cycle_is_accepted() {
        let p = parse_custom_pattern("9223372036854775-1").unwrap();
        assert_eq!(p.cycle_ms(), 9_223_372_036_854_775_000 + 1000);
    }

    #[test]
    fn tokens_tolerate_whitespace_and_plus_sign() {
        assert_eq!(parse_custom_pattern(" 4 - +7 -8").unwrap().id(), "4-7-8");
        assert_eq!(parse_custom_pattern("+4-+4").unwrap().cycle_ms(), 8000);
    }

    #[test]
    fn custom_id_is_normalized() {
        assert_eq!(parse_custom_pattern("04-4").unwrap().id(), "4-4");
    }

    #[test]
    fn fifth_custom_phase_wraps_to_inhale() {
        let p = parse_custom_pattern("1-2-3-4-5").unwrap();
        let names: Vec<_> = p.phases().iter().map(|ph| ph.name.as_str()).collect();
        assert_eq!(names, ["inhale", "hold", "exhale", "hold-bottom", "inhale"]);
        assert_eq!(p.phases()[4].label, "Breathe in");
    }

    #[test]
    fn resolve_prefers_builtin() {
        let box_pattern = resolve_pattern("4-4-4-4").unwrap();
        assert_eq!(box_pattern.phases()[1].name, "hold-top");
        let custom = resolve_pattern(" 2-2 ").unwrap();
        assert_eq!(custom.name(), "Custom (2-2)");
    }

    #[test]
    fn validated_constructor_rejects_degenerate_patterns() {
        let one = vec![BreathingPhase::new("inhale", "Breathe in", 1000)];
        assert!(matches!(
            BreathingPattern::new("x", "x", "", one),
            Err(ValidationError::TooFewPhases { count: 1, .. })
        ));

        let zero = vec![
            BreathingPhase::new("inhale", "Breathe in", 1000),
            BreathingPhase::new("hold", "Hold", 0),
        ];
        assert!(matches!(
            BreathingPattern::new("x", "x", "", zero),
            Err(ValidationError::ZeroDuration { .. })
        ));

        let huge = vec![
            BreathingPhase::new("inhale", "Breathe in", u64::MAX),
            BreathingPhase::new("exhale", "Breathe out", 1),
        ];
        assert!(matches!(
            BreathingPattern::new("x", "x", "", huge),
            Err(ValidationError::CycleOverflow { .. })
        ));
    }

    proptest! {
        #[test]
        fn parsed_cycle_is_sum_of_inputs(secs in proptest::collection::vec(1u64..600, 2..8)) {
            let spec = secs.iter().map(u64::to_string).collect::<Vec<_>>().join("-");
            let p = parse_custom_pattern(&spec).unwrap();
            prop_assert_eq!(p.phases().len(), secs.len());
            prop_assert_eq!(p.cycle_ms(), secs.iter().sum::<u64>() * 1000);
            prop_assert_eq!(p.id(), spec.as_str());
        }
    }
}
