use crate::{
    domain::{
        errors::BotError,
        fields::{User, Username},
    },
    repository::{get_user_by_id, get_user_by_ref_code, list_referred_by},
};
use sqlx::SqlitePool;

#[derive(Debug)]
pub struct ReferralSummary {
    pub user: User,
    pub referrer_name: Option<Username>,
    pub referrals: Vec<User>,
}

impl ReferralSummary {
    pub fn referrals_count(&self) -> usize {
        self.referrals.len()
    }
}

pub async fn get_referral_summary(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<ReferralSummary, BotError> {
    let user = get_user_by_id(pool, user_id)
        .await?
        .ok_or(BotError::NotRegistered)?;

    let referrals = list_referred_by(pool, &user.ref_code).await?;

    // best effort: a stale or made-up code resolves to no referrer
    let referrer_name = match &user.referred_by {
        Some(code) => get_user_by_ref_code(pool, code)
            .await?
            .and_then(|referrer| referrer.username),
        None => None,
    };

    Ok(ReferralSummary {
        user,
        referrer_name,
        referrals,
    })
}
