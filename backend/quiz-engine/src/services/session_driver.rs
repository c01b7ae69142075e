use anyhow::{bail, Result};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::quiz_session::QuizSession;
use crate::models::{SessionEvent, SessionSummary};

/// A player's choice, addressed to the question it was made on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerInput {
    pub question_index: usize,
    pub option_index: usize,
}

/// Runs a session on a periodic countdown and an answer channel.
///
/// The driver is the only mutator of its session. A resolved question resets
/// the countdown, so a tick scheduled for that question is never delivered.
pub struct SessionDriver {
    session: QuizSession,
    tick_interval: Duration,
}

impl SessionDriver {
    pub fn new(session: QuizSession, tick_interval: Duration) -> Self {
        Self {
            session,
            tick_interval,
        }
    }

    /// Plays until the session ends or `answers` closes.
    ///
    /// Every event is forwarded to `events`; rejected inputs are logged and
    /// dropped. A closed answer channel abandons the session.
    pub async fn run(
        mut self,
        mut answers: mpsc::Receiver<AnswerInput>,
        events: mpsc::Sender<SessionEvent>,
    ) -> Result<SessionSummary> {
        let session_id = self.session.id();
        tracing::info!(
            "Starting session driver: session={}, tick_interval={}ms",
            session_id,
            self.tick_interval.as_millis()
        );

        if let Some(started) = self.session.question_started() {
            if events.send(started).await.is_err() {
                self.abandon();
                bail!("Session event receiver dropped: session={}", session_id);
            }
        }

        let mut ticker = time::interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let result = tokio::select! {
                _ = ticker.tick() => {
                    let index = self.session.current_index();
                    self.session.tick_for(index)
                }
                input = answers.recv() => match input {
                    Some(input) => self.session.answer_for(input.question_index, input.option_index),
                    None => {
                        tracing::info!("Answer channel closed, abandoning session {}", session_id);
                        let summary = self.abandon();
                        return Ok(summary);
                    }
                },
            };

            let produced = match result {
                Ok(produced) => produced,
                Err(err) => {
                    tracing::warn!("Input rejected for session {}: {}", session_id, err);
                    continue;
                }
            };

            let question_resolved = produced
                .iter()
                .any(|e| matches!(e, SessionEvent::QuestionStarted { .. }) || e.is_terminal());

            for event in produced {
                if events.send(event).await.is_err() {
                    self.abandon();
                    bail!("Session event receiver dropped: session={}", session_id);
                }
            }

            if self.session.is_terminal() {
                let summary = self.session.summary();
                tracing::info!(
                    "Session driver finished: session={}, status={}, score={}",
                    session_id,
                    summary.status.as_str(),
                    summary.score
                );
                return Ok(summary);
            }

            // Cancels the tick pending for the question that just resolved
            if question_resolved {
                ticker.reset();
            }
        }
    }

    // The abandoned metric is recorded when the session is dropped
    fn abandon(&self) -> SessionSummary {
        self.session.summary()
    }
}
