//! Word pools for the dot-probe task. Both lists have the same length so
//! every threat word can be paired.

pub const THREAT_WORDS: [&str; 20] = [
    "ATTACK", "DANGER", "KILL", "THREAT", "ASSAULT", "WEAPON", "VIOLENT", "TERROR", "HOSTILE",
    "AGONY", "PANIC", "HORROR", "CRUEL", "INJURY", "STAB", "VICTIM", "HATRED", "FATAL", "RAGE",
    "SCREAM",
];

pub const NEUTRAL_WORDS: [&str; 20] = [
    "TABLE", "WINDOW", "LAMP", "CARPET", "BOTTLE", "PAPER", "BASKET", "CLOCK", "CURTAIN",
    "BUTTON", "KETTLE", "LADDER", "MIRROR", "PILLOW", "TOWEL", "SPOON", "WALLET", "BUCKET",
    "HANGER", "SHELF",
];

pub const MIN_TRIALS_PER_PHASE: usize = 6;
pub const MAX_TRIALS_PER_PHASE: usize = 20;
pub const DEFAULT_TRIALS_PER_PHASE: usize = 12;

pub fn clamp_trials_per_phase(n: usize) -> usize {
    n.clamp(MIN_TRIALS_PER_PHASE, MAX_TRIALS_PER_PHASE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn pools_are_disjoint_and_unique() {
        let threat: HashSet<_> = THREAT_WORDS.iter().collect();
        let neutral: HashSet<_> = NEUTRAL_WORDS.iter().collect();
        assert_eq!(threat.len(), THREAT_WORDS.len());
        assert_eq!(neutral.len(), NEUTRAL_WORDS.len());
        assert!(threat.is_disjoint(&neutral));
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp_trials_per_phase(0), 6);
        assert_eq!(clamp_trials_per_phase(12), 12);
        assert_eq!(clamp_trials_per_phase(99), 20);
    }
}
