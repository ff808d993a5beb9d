use crate::domain::{
    errors::DatabaseError,
    fields::{RefCode, User},
    model::DbUser,
};
use sqlx::SqlitePool;
use time::OffsetDateTime;

pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), DatabaseError> {
    sqlx::query(
        "create table if not exists users (
            user_id integer primary key,
            username text,
            ref_code text not null unique,
            referred_by text,
            join_date text not null
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("creating users table failed >>> {}", e);
        DatabaseError::ServerError
    })?;

    Ok(())
}

pub async fn get_user_by_id(pool: &SqlitePool, user_id: i64) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, DbUser>(
        "select user_id, username, ref_code, referred_by, join_date from users where user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("get user by id failed >>> {}", e);
        DatabaseError::ServerError
    })?;

    Ok(user.map(|u| u.into()))
}

pub async fn get_user_by_ref_code(
    pool: &SqlitePool,
    ref_code: &RefCode,
) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, DbUser>(
        "select user_id, username, ref_code, referred_by, join_date from users where ref_code = ?",
    )
    .bind(ref_code.inner())
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("get user by ref code failed >>> {}", e);
        DatabaseError::ServerError
    })?;

    Ok(user.map(|u| u.into()))
}

pub async fn create_new_user(
    pool: &SqlitePool,
    user_id: i64,
    username: Option<&str>,
    ref_code: &RefCode,
    referred_by: Option<&str>,
) -> Result<(), DatabaseError> {
    sqlx::query(
        "insert into users (user_id, username, ref_code, referred_by, join_date) values (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(username.map(|u| u.to_owned()))
    .bind(ref_code.inner())
    .bind(referred_by.map(|r| r.to_owned()))
    .bind(OffsetDateTime::now_utc())
    .execute(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if is_unique_violation(db.as_ref()) => DatabaseError::DuplicateKey,
        _ => {
            tracing::error!("creating user failed >>> {}", e);
            DatabaseError::ServerError
        }
    })?;

    Ok(())
}

pub async fn count_referred_by(
    pool: &SqlitePool,
    ref_code: &RefCode,
) -> Result<i64, DatabaseError> {
    let count = sqlx::query_scalar::<_, i64>("select count(*) from users where referred_by = ?")
        .bind(ref_code.inner())
        .fetch_one(pool)
        .await
        .map_err(|e| {
            tracing::error!("count referrals failed >>> {}", e);
            DatabaseError::ServerError
        })?;

    Ok(count)
}

pub async fn list_referred_by(
    pool: &SqlitePool,
    ref_code: &RefCode,
) -> Result<Vec<User>, DatabaseError> {
    let users = sqlx::query_as::<_, DbUser>(
        "select user_id, username, ref_code, referred_by, join_date from users
         where referred_by = ? order by join_date desc",
    )
    .bind(ref_code.inner())
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("listing referrals failed >>> {}", e);
        DatabaseError::ServerError
    })?;

    Ok(users.into_iter().map(|u| u.into()).collect())
}

pub async fn fetch_all_users(pool: &SqlitePool) -> Result<Vec<User>, DatabaseError> {
    let users = sqlx::query_as::<_, DbUser>(
        "select user_id, username, ref_code, referred_by, join_date from users
         order by join_date desc",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("getting list of users failed >>> {}", e);
        DatabaseError::ServerError
    })?;

    Ok(users.into_iter().map(|u| u.into()).collect())
}

// 1555 = SQLITE_CONSTRAINT_PRIMARYKEY, 2067 = SQLITE_CONSTRAINT_UNIQUE
fn is_unique_violation(err: &dyn sqlx::error::DatabaseError) -> bool {
    matches!(err.code().as_deref(), Some("1555") | Some("2067"))
}
