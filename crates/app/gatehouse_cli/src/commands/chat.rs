use gatehouse_core::views::ChatSession;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::Context;
use crate::{Result, render};

pub async fn run(ctx: &Context, message: Option<String>) -> Result<()> {
    ctx.require_session()?;
    let mut chat = ChatSession::new(ctx.client.clone());
    for msg in chat.messages() {
        println!("{}", render::chat_message(msg));
    }

    if let Some(message) = message {
        if let Some(reply) = chat.send(&message).await {
            println!("{}", render::chat_message(reply));
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(reply) = chat.send(&line).await {
            println!("{}", render::chat_message(reply));
        }
    }
    Ok(())
}
