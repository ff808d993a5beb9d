use super::{chunk_message, reply_error};
use crate::{app::AppState, domain::fields::User, repository};
use std::sync::Arc;
use teloxide::prelude::*;

pub async fn all_users(bot: &Bot, msg: &Message, state: &Arc<AppState>) -> ResponseResult<()> {
    let pool = state.get_pool();

    let users = match repository::fetch_all_users(&pool).await {
        Ok(users) => users,
        Err(e) => return reply_error(bot, msg, e.into()).await,
    };

    if users.is_empty() {
        bot.send_message(msg.chat.id, "The database is empty").await?;
        return Ok(());
    }

    let chunks = chunk_message(
        "📊 All registered users:\n\n",
        "Continuing the list:\n\n",
        users.iter().map(format_user_block),
        state.config.application.chunk_limit,
    );

    for chunk in chunks {
        bot.send_message(msg.chat.id, chunk).await?;
    }
    Ok(())
}

pub(crate) fn format_user_block(user: &User) -> String {
    format!(
        "ID: {}, {}\nRef code: {}, Invited by: {}\nJoined: {}\n\n",
        user.user_id,
        user.display_name(),
        user.ref_code,
        user.referred_by
            .as_ref()
            .map(|code| code.inner())
            .unwrap_or_else(|| "none".to_owned()),
        user.joined_on(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fields::RefCode;
    use time::OffsetDateTime;

    #[test]
    fn user_block_spells_out_missing_referrer() {
        let user = User {
            user_id: 7,
            username: None,
            ref_code: RefCode::from("AbC12XyZ".to_owned()),
            referred_by: None,
            join_date: OffsetDateTime::UNIX_EPOCH,
        };

        let block = format_user_block(&user);
        assert!(block.contains("ID: 7, id:7"));
        assert!(block.contains("Ref code: AbC12XyZ, Invited by: none"));
        assert!(block.contains("Joined: 1970-01-01 00:00:00"));
    }

    #[test]
    fn five_hundred_users_fit_under_the_chunk_limit() {
        let users: Vec<User> = (0..500)
            .map(|i| User {
                user_id: i,
                username: Some(format!("user{i}").into()),
                ref_code: RefCode::generate(8),
                referred_by: Some(RefCode::from("AbC12XyZ".to_owned())),
                join_date: OffsetDateTime::UNIX_EPOCH,
            })
            .collect();

        let chunks = chunk_message(
            "📊 All registered users:\n\n",
            "Continuing the list:\n\n",
            users.iter().map(format_user_block),
            3500,
        );

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.len() <= 3500));
    }
}
