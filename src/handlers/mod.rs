use crate::{app::AppState, domain::errors::BotError};
use std::sync::Arc;
use teloxide::{prelude::*, utils::command::BotCommands};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Referral bot commands:")]
pub enum Command {
    #[command(description = "register and get your referral code")]
    Start(String),
    #[command(description = "how many users you have invited")]
    Stats,
    #[command(description = "your full referral report")]
    Mystats,
    #[command(description = "list every registered user")]
    Allusers,
}

pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    // channel posts and the like carry no sender
    let from = match msg.from() {
        Some(user) => user.clone(),
        None => return Ok(()),
    };

    match cmd {
        Command::Start(payload) => register::start(&bot, &msg, &from, payload, &state).await,
        Command::Stats => stats::stats(&bot, &msg, &from, &state).await,
        Command::Mystats => stats::mystats(&bot, &msg, &from, &state).await,
        Command::Allusers => admin::all_users(&bot, &msg, &state).await,
    }
}

pub(crate) async fn reply_error(bot: &Bot, msg: &Message, err: BotError) -> ResponseResult<()> {
    bot.send_message(msg.chat.id, err.reply_text()).await?;
    Ok(())
}

pub(crate) fn chunk_message(
    header: &str,
    continuation: &str,
    blocks: impl IntoIterator<Item = String>,
    limit: usize,
) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = header.to_owned();

    for block in blocks {
        if current.len() + block.len() > limit {
            chunks.push(current);
            current = continuation.to_owned();
        }

        // a block longer than a whole chunk gets split outright
        let mut rest = block.as_str();
        while current.len() + rest.len() > limit {
            let (head, tail) = split_at_char_boundary(rest, limit - current.len());
            current.push_str(head);
            chunks.push(current);
            current = continuation.to_owned();
            rest = tail;
        }
        current.push_str(rest);
    }
    chunks.push(current);

    chunks
}

fn split_at_char_boundary(s: &str, max: usize) -> (&str, &str) {
    let mut idx = max.min(s.len());
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    s.split_at(idx)
}

pub mod admin;
pub mod register;
pub mod stats;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_output_stays_in_one_chunk() {
        let chunks = chunk_message("head:", "more:", vec!["a".to_owned(); 3], 100);
        assert_eq!(chunks, vec!["head:aaa".to_owned()]);
    }

    #[test]
    fn oversized_block_is_split_across_chunks() {
        let block = "x".repeat(450);
        let chunks = chunk_message("head:", "more:", vec![block], 200);

        assert!(chunks.iter().all(|c| c.len() <= 200));
        let rejoined = chunks.concat();
        assert_eq!(rejoined.matches('x').count(), 450);
    }

    #[test]
    fn split_never_lands_inside_a_character() {
        let block = "é".repeat(120);
        let chunks = chunk_message("head:", "more:", vec![block], 100);

        assert!(chunks.iter().all(|c| c.len() <= 100));
        let rejoined = chunks.concat();
        assert_eq!(rejoined.matches('é').count(), 120);
    }

    #[test]
    fn chunks_never_exceed_the_limit() {
        let blocks: Vec<String> = (0..500).map(|i| format!("user {i} joined\n")).collect();
        let limit = 200;
        let chunks = chunk_message("All users:\n", "Continuing:\n", blocks.clone(), limit);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.len() <= limit));

        let rejoined: String = chunks.iter().map(String::as_str).collect::<String>();
        for block in &blocks {
            assert!(rejoined.contains(block.as_str()));
        }
    }
}
