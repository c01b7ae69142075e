use anyhow::Context;
use std::io::BufRead;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quiz_engine::{
    config::Config,
    metrics,
    models::{AnswerOutcome, OptionLetter, QuestionSet, SessionEvent},
    services::{
        session_driver::{AnswerInput, SessionDriver},
        AppState,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quiz_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load().context("Failed to load configuration")?;
    let level = config.game.level().map_err(anyhow::Error::msg)?;
    let tick_interval = Duration::from_millis(config.timing.tick_interval_ms);
    tracing::info!("Starting quiz at level {}", level);

    let state = AppState::from_config(config).await?;
    let session = state.start_session(level, None).await?;
    let questions = session.questions().clone();
    let lives = session.lives();

    let (answer_tx, answer_rx) = mpsc::channel::<AnswerInput>(8);
    let (event_tx, mut event_rx) = mpsc::channel::<SessionEvent>(64);
    let active_question = Arc::new(AtomicUsize::new(0));

    // Plain thread: a blocked stdin read must not hold the runtime open
    let reader_question = Arc::clone(&active_question);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.eq_ignore_ascii_case("q") {
                break;
            }
            match line.parse::<OptionLetter>() {
                Ok(letter) => {
                    let input = AnswerInput {
                        question_index: reader_question.load(Ordering::SeqCst),
                        option_index: letter.index(),
                    };
                    if answer_tx.blocking_send(input).is_err() {
                        break;
                    }
                }
                Err(e) => eprintln!("{} (type A-D, or q to quit)", e),
            }
        }
    });

    println!("Lives: {}", lives);
    let driver = SessionDriver::new(session, tick_interval);
    let driver_handle = tokio::spawn(driver.run(answer_rx, event_tx));

    while let Some(event) = event_rx.recv().await {
        render_event(&event, &questions, &active_question);
    }

    let summary = driver_handle.await.context("Session driver panicked")??;
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
    );

    if std::env::var("QUIZ_PRINT_METRICS").map(|v| v == "1").unwrap_or(false) {
        println!("{}", metrics::render_metrics()?);
    }

    Ok(())
}

fn render_event(event: &SessionEvent, questions: &QuestionSet, active_question: &AtomicUsize) {
    match event {
        SessionEvent::QuestionStarted {
            question_index,
            allotted_seconds,
        } => {
            active_question.store(*question_index, Ordering::SeqCst);
            if let Some(question) = questions.get(*question_index) {
                println!();
                println!("{}. {}", question_index + 1, question.prompt);
                for letter in OptionLetter::ALL {
                    println!("   {}) {}", letter, question.option(letter));
                }
                println!("Time: {} seconds", allotted_seconds);
            }
        }
        SessionEvent::TimeUpdated { remaining_seconds } => {
            if *remaining_seconds <= 5 || remaining_seconds % 10 == 0 {
                println!("Time remaining: {} seconds", remaining_seconds);
            }
        }
        SessionEvent::TimeExpired { .. } => println!("Time is up!"),
        SessionEvent::AnswerOutcome { outcome, .. } => match outcome {
            AnswerOutcome::Correct => println!("Correct!"),
            AnswerOutcome::Incorrect => println!("Wrong answer!"),
        },
        SessionEvent::BonusGranted { kind } => println!("Bonus: {}", kind.as_str()),
        SessionEvent::SecondChanceUsed => println!("Your second chance saved a life."),
        SessionEvent::LifeLost { lives_remaining } => {
            println!("You lost a life. Lives: {}", lives_remaining)
        }
        SessionEvent::SessionCompleted { final_score } => {
            println!("Quiz complete! Score: {}/{}", final_score, questions.len())
        }
        SessionEvent::SessionFailed { final_score } => {
            println!("Game over. Score: {}/{}", final_score, questions.len())
        }
    }
}
