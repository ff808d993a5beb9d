use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use time::{macros::format_description, OffsetDateTime};

use super::model::DbUser;

pub const DEFAULT_CODE_LENGTH: usize = 8;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn inner(&self) -> String {
        self.0.to_owned()
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RefCode(String);

impl RefCode {
    pub fn generate(length: usize) -> Self {
        let code: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect();
        Self(code)
    }

    pub fn inner(&self) -> String {
        self.0.to_owned()
    }
}

impl From<String> for RefCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for RefCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RefCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct User {
    pub user_id: i64,
    pub username: Option<Username>,
    pub ref_code: RefCode,
    pub referred_by: Option<RefCode>,
    pub join_date: OffsetDateTime,
}

impl User {
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(name) => format!("@{}", name),
            None => format!("id:{}", self.user_id),
        }
    }

    pub fn joined_on(&self) -> String {
        let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        self.join_date.format(&format).unwrap_or_default()
    }
}

impl From<DbUser> for User {
    fn from(value: DbUser) -> Self {
        Self {
            user_id: value.user_id,
            username: value.username.map(Username::from),
            ref_code: value.ref_code.into(),
            referred_by: value.referred_by.map(RefCode::from),
            join_date: value.join_date,
        }
    }
}
