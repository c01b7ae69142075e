use serde::{Deserialize, Serialize};

use super::answer::AnswerOutcome;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    ExtraLife,
    SecondChance,
    ExtraTime,
}

impl BonusKind {
    pub const ALL: [BonusKind; 3] = [
        BonusKind::ExtraLife,
        BonusKind::SecondChance,
        BonusKind::ExtraTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BonusKind::ExtraLife => "extra_life",
            BonusKind::SecondChance => "second_chance",
            BonusKind::ExtraTime => "extra_time",
        }
    }
}

/// Observation emitted by a quiz session in response to a `tick` or an
/// `answer`. A single input can produce several events; they are returned
/// in the order they happened.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SessionEvent {
    QuestionStarted {
        question_index: usize,
        allotted_seconds: u32,
    },
    TimeUpdated {
        remaining_seconds: u32,
    },
    TimeExpired {
        question_index: usize,
    },
    AnswerOutcome {
        question_index: usize,
        outcome: AnswerOutcome,
    },
    BonusGranted {
        kind: BonusKind,
    },
    SecondChanceUsed,
    LifeLost {
        lives_remaining: u32,
    },
    SessionCompleted {
        final_score: u32,
    },
    SessionFailed {
        final_score: u32,
    },
}

impl SessionEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            SessionEvent::QuestionStarted { .. } => "question-started",
            SessionEvent::TimeUpdated { .. } => "time-updated",
            SessionEvent::TimeExpired { .. } => "time-expired",
            SessionEvent::AnswerOutcome { .. } => "answer-outcome",
            SessionEvent::BonusGranted { .. } => "bonus-granted",
            SessionEvent::SecondChanceUsed => "second-chance-used",
            SessionEvent::LifeLost { .. } => "life-lost",
            SessionEvent::SessionCompleted { .. } => "session-completed",
            SessionEvent::SessionFailed { .. } => "session-failed",
        }
    }

    /// True for the two events that end a session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionEvent::SessionCompleted { .. } | SessionEvent::SessionFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_tag_matches_event_name() {
        let events = [
            SessionEvent::TimeUpdated {
                remaining_seconds: 12,
            },
            SessionEvent::SecondChanceUsed,
            SessionEvent::BonusGranted {
                kind: BonusKind::ExtraTime,
            },
            SessionEvent::SessionFailed { final_score: 2 },
        ];

        for event in events {
            let json: serde_json::Value = serde_json::from_str(&event.to_json()).unwrap();
            assert_eq!(json["type"], event.event_name());
        }
    }

    #[test]
    fn bonus_payload_is_snake_case() {
        let event = SessionEvent::BonusGranted {
            kind: BonusKind::SecondChance,
        };
        assert_eq!(
            event.to_json(),
            r#"{"type":"bonus-granted","kind":"second_chance"}"#
        );
    }
}
