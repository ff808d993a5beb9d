use super::reply_error;
use crate::{
    app::AppState,
    referrals::{get_referral_summary, ReferralSummary},
    repository,
};
use std::sync::Arc;
use teloxide::{prelude::*, types::User as TelegramUser};

pub async fn stats(
    bot: &Bot,
    msg: &Message,
    from: &TelegramUser,
    state: &Arc<AppState>,
) -> ResponseResult<()> {
    let pool = state.get_pool();

    let count = match repository::get_user_by_id(&pool, from.id.0 as i64).await {
        Ok(Some(user)) => match repository::count_referred_by(&pool, &user.ref_code).await {
            Ok(count) => count,
            Err(e) => return reply_error(bot, msg, e.into()).await,
        },
        Ok(None) => 0,
        Err(e) => return reply_error(bot, msg, e.into()).await,
    };

    bot.send_message(msg.chat.id, format!("You have invited {} users!", count))
        .await?;
    Ok(())
}

pub async fn mystats(
    bot: &Bot,
    msg: &Message,
    from: &TelegramUser,
    state: &Arc<AppState>,
) -> ResponseResult<()> {
    let pool = state.get_pool();

    match get_referral_summary(&pool, from.id.0 as i64).await {
        Ok(summary) => {
            bot.send_message(msg.chat.id, format_summary(&summary)).await?;
            Ok(())
        }
        Err(e) => reply_error(bot, msg, e).await,
    }
}

pub(crate) fn format_summary(summary: &ReferralSummary) -> String {
    let mut message = String::from("📊 Your referral stats:\n\n");
    message.push_str(&format!("🆔 Your ID: {}\n", summary.user.user_id));
    message.push_str(&format!("👤 Your username: {}\n", summary.user.display_name()));
    message.push_str(&format!("🎯 Your referral code: {}\n", summary.user.ref_code));
    message.push_str(&format!("📅 Joined: {}\n", summary.user.joined_on()));

    if let Some(name) = &summary.referrer_name {
        message.push_str(&format!("👥 Invited by: @{}\n", name));
    }

    message.push_str(&format!("\n📈 Referrals: {}\n", summary.referrals_count()));

    if !summary.referrals.is_empty() {
        message.push_str("\n🔍 Your referrals:\n");
        for (i, referral) in summary.referrals.iter().enumerate() {
            message.push_str(&format!(
                "{}. {} - {}\n",
                i + 1,
                referral.display_name(),
                referral.joined_on()
            ));
        }
    }

    message
}
