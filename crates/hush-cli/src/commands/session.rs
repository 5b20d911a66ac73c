use hush_core::format::parse_duration;
use hush_core::{lookup_pattern, resolve_pattern, BreathingPattern, Config, MeditationType};

use crate::runner::{self, SessionPlan};

const BREAK_SECS: u64 = 2 * 60;
const BOX_PATTERN: &str = "4-4-4-4";
const DEFAULT_PATTERN: &str = "4-4-4";

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn duration_arg(raw: Option<&str>, default_secs: u64, hint: &str) -> Result<u64, String> {
    let Some(raw) = raw else {
        return Ok(default_secs);
    };
    match parse_duration(raw) {
        Some(secs) if secs > 0 => Ok(secs),
        _ => Err(format!("invalid duration: \"{raw}\". Try {hint}.")),
    }
}

fn pattern_arg(raw: &str) -> Result<BreathingPattern, String> {
    resolve_pattern(raw).ok_or_else(|| {
        format!("invalid pattern: \"{raw}\". Use a built-in id (see `hs patterns`) or seconds like \"4-2-6\".")
    })
}

fn builtin(id: &str) -> Result<BreathingPattern, String> {
    lookup_pattern(id).ok_or_else(|| format!("missing built-in pattern {id}"))
}

pub fn breathe(duration: Option<&str>, pattern: &str, intro: bool) -> CmdResult {
    let pattern = pattern_arg(pattern)?;
    let default_secs = Config::load_or_default().default_duration;
    let duration_secs = duration_arg(duration, default_secs, "\"5m\", \"90s\", or \"1h30m\"")?;
    breathe_for(duration_secs, pattern, intro)
}

pub fn breathe_for(duration_secs: u64, pattern: BreathingPattern, intro: bool) -> CmdResult {
    runner::run(SessionPlan {
        kind: MeditationType::BreathAwareness,
        duration_secs,
        pattern,
        intro,
        rounds: None,
    })
}

pub fn mindful_break(duration: Option<&str>, intro: bool) -> CmdResult {
    let duration_secs = duration_arg(duration, BREAK_SECS, "\"2m\", \"90s\", or \"30s\"")?;
    break_for(duration_secs, intro)
}

pub fn break_for(duration_secs: u64, intro: bool) -> CmdResult {
    runner::run(SessionPlan {
        kind: MeditationType::MindfulBreak,
        duration_secs,
        pattern: builtin("5-5")?,
        intro,
        rounds: None,
    })
}

pub fn default_pattern() -> Result<BreathingPattern, String> {
    builtin(DEFAULT_PATTERN)
}

pub fn box_breathing(rounds: u32, intro: bool) -> CmdResult {
    if rounds == 0 {
        return Err("rounds must be at least 1".into());
    }
    let pattern = builtin(BOX_PATTERN)?;
    let duration_secs = u64::from(rounds) * pattern.cycle_secs();
    runner::run(SessionPlan {
        kind: MeditationType::BoxBreathing,
        duration_secs,
        pattern,
        intro,
        rounds: Some(u64::from(rounds)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_defaults_and_parses() {
        assert_eq!(duration_arg(None, 120, ""), Ok(120));
        assert_eq!(duration_arg(Some("90s"), 120, ""), Ok(90));
        assert_eq!(duration_arg(Some("5"), 120, ""), Ok(300));
    }

    #[test]
    fn zero_or_garbage_duration_is_rejected() {
        assert!(duration_arg(Some("0m"), 120, "").is_err());
        assert!(duration_arg(Some("soon"), 120, "").is_err());
    }

    #[test]
    fn patterns_resolve_builtin_then_custom() {
        assert_eq!(pattern_arg("4-7-8").unwrap().name(), "4-7-8 (Relaxing)");
        assert_eq!(pattern_arg("3-3").unwrap().id(), "3-3");
        assert!(pattern_arg("4").is_err());
        assert_eq!(builtin(BOX_PATTERN).unwrap().cycle_secs(), 16);
    }
}
