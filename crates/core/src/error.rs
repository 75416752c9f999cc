use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreakError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Activity already logged for {0}")]
    AlreadyLogged(chrono::NaiveDate),

    #[error("Challenge not found: {0}")]
    ChallengeNotFound(String),

    #[error("User {user_id} not found in challenge {challenge_id}")]
    UserNotFound {
        challenge_id: String,
        user_id: String,
    },
}
