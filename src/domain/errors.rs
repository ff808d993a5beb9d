#[derive(Debug)]
pub enum DatabaseError {
    DuplicateKey,
    ServerError,
}

#[derive(Debug)]
pub enum BotError {
    NotRegistered,
    RegistrationFailed,
    ServerError,
}

impl From<DatabaseError> for BotError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::DuplicateKey => Self::RegistrationFailed,
            DatabaseError::ServerError => Self::ServerError,
        }
    }
}

impl BotError {
    pub fn reply_text(&self) -> &'static str {
        match self {
            Self::NotRegistered => "You are not registered yet. Use /start to sign up.",
            Self::RegistrationFailed => "Registration failed. Please try again.",
            Self::ServerError => "Something went wrong. Please try again later.",
        }
    }
}
