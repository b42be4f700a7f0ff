//! Stroop word pools. Colour words may name colours outside the ink set.

pub const COLOR_WORDS: [&str; 11] = [
    "RED", "BLUE", "GREEN", "YELLOW", "PURPLE", "ORANGE", "PINK", "GRAY", "WHITE", "BROWN",
    "CYAN",
];

pub const NEUTRAL_WORDS: [&str; 20] = [
    "DOOR", "GROUP", "CHAIR", "TELEPHONE", "DOG", "COAT", "SOFA", "DIARY", "NEWSPAPER", "OVEN",
    "FLOOR", "SHOPPING", "UMBRELLA", "RADIO", "PAINTING", "SCHOOL", "BALL", "PENCIL", "MILK",
    "FOOTBALL",
];

pub const MIN_TRIALS_PER_CONDITION: usize = 8;
pub const MAX_TRIALS_PER_CONDITION: usize = 60;
pub const DEFAULT_TRIALS_PER_CONDITION: usize = 12;

pub fn clamp_trials_per_condition(n: usize) -> usize {
    n.clamp(MIN_TRIALS_PER_CONDITION, MAX_TRIALS_PER_CONDITION)
}
