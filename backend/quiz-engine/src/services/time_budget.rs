use crate::config::TimingConfig;
use crate::models::QuestionSet;

/// Allotted seconds for every question position of a session.
///
/// Seeded once from the difficulty table; afterwards only bonus effects
/// change it, and only for questions that have not started yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBudget {
    seconds: Vec<u32>,
}

impl TimeBudget {
    pub fn seeded(questions: &QuestionSet, timing: &TimingConfig) -> Self {
        let seconds = questions
            .iter()
            .map(|q| timing.base_seconds_for(q.difficulty))
            .collect();
        Self { seconds }
    }

    pub fn from_seconds(seconds: Vec<u32>) -> Self {
        Self { seconds }
    }

    pub fn len(&self) -> usize {
        self.seconds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seconds.is_empty()
    }

    pub fn seconds_for(&self, index: usize) -> Option<u32> {
        self.seconds.get(index).copied()
    }

    /// Adds `delta_seconds` to the budget at `index`.
    ///
    /// Past-the-end indices are ignored: a bonus won on the last question
    /// has nothing left to extend.
    pub fn extend(&mut self, index: usize, delta_seconds: u32) {
        if let Some(seconds) = self.seconds.get_mut(index) {
            *seconds = seconds.saturating_add(delta_seconds);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_adds_to_target_only() {
        let mut budget = TimeBudget::from_seconds(vec![30, 30, 30]);
        budget.extend(1, 10);
        assert_eq!(budget, TimeBudget::from_seconds(vec![30, 40, 30]));
    }

    #[test]
    fn extend_past_end_is_noop() {
        let mut budget = TimeBudget::from_seconds(vec![60, 60]);
        budget.extend(2, 10);
        budget.extend(usize::MAX, 10);
        assert_eq!(budget, TimeBudget::from_seconds(vec![60, 60]));
    }
}
