//! Trial generation and the sequencer plan for the dot-probe task.

use rand::Rng;
use tracing::debug;

use crate::tasks::sequencer::{ResponseWindow, TaskPlan};
use crate::tasks::stimulus::{self, Side};

use super::words::{clamp_trials_per_phase, NEUTRAL_WORDS, THREAT_WORDS};
use super::{Phase, Question, Trial, TrialResult};

/// `clamp_trials_per_phase(n)` trials pairing shuffled threat and neutral
/// words index by index, each with its own fair side draw.
pub fn build_trials<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Trial> {
    let n = clamp_trials_per_phase(n);
    let threat = stimulus::sample_distinct(&THREAT_WORDS, n, rng);
    let neutral = stimulus::sample_distinct(&NEUTRAL_WORDS, n, rng);

    threat
        .into_iter()
        .zip(neutral)
        .map(|(threat_word, neutral_word)| Trial {
            id: stimulus::trial_id(rng),
            threat_word: threat_word.to_string(),
            neutral_word: neutral_word.to_string(),
            threat_side: Side::random(rng),
        })
        .collect()
}

/// Two stages of word questions drawn from disjoint halves of each pool, so no
/// word is shown in both stages. `per_stage` is capped at half the pool.
pub fn build_two_stage_questions<R: Rng + ?Sized>(per_stage: usize, rng: &mut R) -> Vec<Question> {
    let threat = stimulus::shuffled(&THREAT_WORDS, rng);
    let neutral = stimulus::shuffled(&NEUTRAL_WORDS, rng);
    let half = threat.len().min(neutral.len()) / 2;
    let count = per_stage.min(half);

    let mut questions = Vec::with_capacity(count * 2);
    for (stage, offset) in [(Phase::Threat, 0), (Phase::Neutral, half)] {
        let prompt = stage.prompt();
        for i in 0..count {
            let threat_word = threat[offset + i];
            let neutral_word = neutral[offset + i];
            let threat_side = Side::random(rng);
            let (left, right) = match threat_side {
                Side::Left => (threat_word, neutral_word),
                Side::Right => (neutral_word, threat_word),
            };
            let correct = match stage {
                Phase::Threat => threat_side,
                Phase::Neutral => threat_side.opposite(),
            };
            let prefix = match stage {
                Phase::Threat => "threat",
                Phase::Neutral => "neutral",
            };
            questions.push(Question {
                id: format!("{prefix}_{}", i + 1),
                stage,
                prompt: prompt.clone(),
                correct,
                left_label: left.to_string(),
                right_label: right.to_string(),
                threat_word: threat_word.to_string(),
                neutral_word: neutral_word.to_string(),
            });
        }
    }
    questions
}

/// One presented pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub trial_id: String,
    pub phase: Phase,
    pub threat_word: String,
    pub neutral_word: String,
    pub threat_side: Side,
    pub correct: Side,
}

impl Slot {
    pub fn word_on(&self, side: Side) -> &str {
        if side == self.threat_side {
            &self.threat_word
        } else {
            &self.neutral_word
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotProbePlan {
    slots: Vec<Slot>,
    trials_per_phase: usize,
}

impl DotProbePlan {
    /// The trial list twice: threat phase first, then neutral phase.
    pub fn standard(trials: Vec<Trial>) -> Self {
        let trials_per_phase = trials.len();
        let slots = [Phase::Threat, Phase::Neutral]
            .into_iter()
            .flat_map(|phase| {
                trials.iter().map(move |trial| Slot {
                    trial_id: trial.id.clone(),
                    phase,
                    threat_word: trial.threat_word.clone(),
                    neutral_word: trial.neutral_word.clone(),
                    threat_side: trial.threat_side,
                    correct: match phase {
                        Phase::Threat => trial.threat_side,
                        Phase::Neutral => trial.threat_side.opposite(),
                    },
                })
            })
            .collect();
        Self {
            slots,
            trials_per_phase,
        }
    }

    /// Questions are presented in the order given. Stage changes become
    /// block breaks.
    pub fn from_questions(questions: &[Question]) -> Self {
        let slots: Vec<Slot> = questions
            .iter()
            .map(|question| Slot {
                trial_id: question.id.clone(),
                phase: question.stage,
                threat_word: question.threat_word.clone(),
                neutral_word: question.neutral_word.clone(),
                threat_side: question.threat_side(),
                correct: question.correct,
            })
            .collect();
        let threat = slots.iter().filter(|s| s.phase == Phase::Threat).count();
        let trials_per_phase = threat.max(slots.len() - threat);
        debug!(slots = slots.len(), trials_per_phase, "question plan built");
        Self {
            slots,
            trials_per_phase,
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn trials_per_phase(&self) -> usize {
        self.trials_per_phase
    }
}

impl TaskPlan for DotProbePlan {
    type Block = Phase;
    type Response = Side;
    type Outcome = TrialResult;

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn block(&self, index: usize) -> Phase {
        self.slots[index].phase
    }

    fn resolve(&self, index: usize, response: Option<Side>, window: ResponseWindow) -> TrialResult {
        let slot = &self.slots[index];
        TrialResult {
            trial_id: slot.trial_id.clone(),
            phase: slot.phase,
            shown_at_ms: window.shown_at.as_ms(),
            response_at_ms: window.responded_at.as_ms(),
            rt_ms: window.rt_ms,
            picked: response,
            correct_side: slot.correct,
            correct: response == Some(slot.correct),
            threat_word: slot.threat_word.clone(),
            neutral_word: slot.neutral_word.clone(),
            threat_side: Some(slot.threat_side),
            timed_out: window.timed_out,
        }
    }
}
