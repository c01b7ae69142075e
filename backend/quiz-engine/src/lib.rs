pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{ProviderError, QuizError};
pub use services::quiz_session::{QuizSession, SessionBuilder, SessionState};
pub use services::AppState;
