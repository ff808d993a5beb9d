use super::reply_error;
use crate::{
    app::AppState,
    domain::{
        errors::{BotError, DatabaseError},
        fields::RefCode,
    },
    repository,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use teloxide::{prelude::*, types::User as TelegramUser};

const MAX_CODE_ATTEMPTS: usize = 3;

pub(crate) enum Registration {
    Created {
        code: RefCode,
        referred_by: Option<String>,
    },
    Existing {
        code: RefCode,
    },
}

impl Registration {
    pub(crate) fn code(&self) -> &RefCode {
        match self {
            Self::Created { code, .. } | Self::Existing { code } => code,
        }
    }

    pub(crate) fn reply_text(&self, bot_username: &str) -> String {
        match self {
            Self::Existing { code } => welcome_back_text(code, bot_username),
            Self::Created { code, referred_by } => {
                welcome_text(code, referred_by.as_deref(), bot_username)
            }
        }
    }
}

pub async fn start(
    bot: &Bot,
    msg: &Message,
    from: &TelegramUser,
    payload: String,
    state: &Arc<AppState>,
) -> ResponseResult<()> {
    let pool = state.get_pool();
    let user_id = from.id.0 as i64;
    tracing::info!("registering user >>> {}", user_id);

    let outcome = register_user(
        &pool,
        user_id,
        from.username.as_deref(),
        &payload,
        state.config.application.ref_code_length,
    )
    .await;

    match outcome {
        Ok(registration) => {
            bot.send_message(
                msg.chat.id,
                registration.reply_text(&state.config.telegram.bot_username),
            )
            .await?;
            Ok(())
        }
        Err(e) => reply_error(bot, msg, e).await,
    }
}

pub(crate) async fn register_user(
    pool: &SqlitePool,
    user_id: i64,
    username: Option<&str>,
    payload: &str,
    code_length: usize,
) -> Result<Registration, BotError> {
    if let Some(user) = repository::get_user_by_id(pool, user_id).await? {
        return Ok(Registration::Existing {
            code: user.ref_code,
        });
    }

    let referred_by = Some(payload.trim())
        .filter(|p| !p.is_empty())
        .map(|p| p.to_owned());

    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = RefCode::generate(code_length);
        match repository::create_new_user(pool, user_id, username, &code, referred_by.as_deref())
            .await
        {
            Ok(()) => return Ok(Registration::Created { code, referred_by }),
            Err(DatabaseError::DuplicateKey) => {
                // lost a race with a concurrent /start, or the code collided
                if let Ok(Some(user)) = repository::get_user_by_id(pool, user_id).await {
                    return Ok(Registration::Existing {
                        code: user.ref_code,
                    });
                }
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::error!("ref code generation kept colliding >>> {}", user_id);
    Err(BotError::RegistrationFailed)
}

pub(crate) fn invite_link(code: &RefCode, bot_username: &str) -> String {
    format!("https://t.me/{}?start={}", bot_username, code)
}

fn welcome_back_text(code: &RefCode, bot_username: &str) -> String {
    format!(
        "Welcome back! Your referral code: {}\nInvite link: {}",
        code,
        invite_link(code, bot_username)
    )
}

fn welcome_text(code: &RefCode, referred_by: Option<&str>, bot_username: &str) -> String {
    let mut text = format!(
        "Welcome! You are now registered.\nYour referral code: {}\nInvite link: {}",
        code,
        invite_link(code, bot_username)
    );
    if let Some(referrer_code) = referred_by {
        text.push_str(&format!("\nYou were invited with code: {}", referrer_code));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::ensure_schema;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        ensure_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn registering_twice_returns_the_same_code() {
        let pool = test_pool().await;

        let first = register_user(&pool, 1, Some("alice"), "", 8).await.unwrap();
        let second = register_user(&pool, 1, Some("alice"), "", 8).await.unwrap();

        assert!(matches!(&first, Registration::Created { .. }));
        assert!(matches!(&second, Registration::Existing { .. }));
        assert_eq!(first.code(), second.code());
    }

    #[tokio::test]
    async fn repeat_registration_ignores_a_new_payload() {
        let pool = test_pool().await;

        let first = register_user(&pool, 1, None, "AbC12XyZ", 8).await.unwrap();
        let second = register_user(&pool, 1, None, "QqQ99ZzZ", 8).await.unwrap();
        assert_eq!(first.code(), second.code());

        let user = repository::get_user_by_id(&pool, 1).await.unwrap().unwrap();
        assert_eq!(
            user.referred_by,
            Some(RefCode::from("AbC12XyZ".to_owned()))
        );
    }

    #[tokio::test]
    async fn blank_payload_registers_without_referrer() {
        let pool = test_pool().await;

        register_user(&pool, 1, Some("alice"), "   ", 8).await.unwrap();
        let user = repository::get_user_by_id(&pool, 1).await.unwrap().unwrap();
        assert!(user.referred_by.is_none());
    }

    #[test]
    fn invite_link_embeds_code_as_start_payload() {
        let code = RefCode::from("AbC12XyZ".to_owned());
        assert_eq!(
            invite_link(&code, "MyReferralBot"),
            "https://t.me/MyReferralBot?start=AbC12XyZ"
        );
    }

    #[test]
    fn welcome_text_mentions_inviter_code_only_when_present() {
        let code = RefCode::from("AbC12XyZ".to_owned());
        let plain = welcome_text(&code, None, "MyReferralBot");
        assert!(!plain.contains("invited with code"));

        let invited = welcome_text(&code, Some("QqQ99ZzZ"), "MyReferralBot");
        assert!(invited.contains("You were invited with code: QqQ99ZzZ"));
    }

    #[test]
    fn reply_text_distinguishes_new_and_returning_users() {
        let code = RefCode::from("AbC12XyZ".to_owned());
        let created = Registration::Created {
            code: code.clone(),
            referred_by: None,
        };
        let existing = Registration::Existing { code };

        assert!(created.reply_text("MyReferralBot").starts_with("Welcome!"));
        let back = existing.reply_text("MyReferralBot");
        assert!(back.starts_with("Welcome back!"));
        assert!(back.contains("AbC12XyZ"));
    }
}
