use std::sync::Arc;

use gatehouse_core::notify::TracingSink;
use gatehouse_core::views::{AuditLogView, GuardDashboard, ResidentDashboard, UserDirectory};

use super::Context;
use crate::{Result, render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CheckIn,
    CheckOut,
    Approve,
    Deny,
}

/// Issue a visitor command. The reconciled list is printed either way.
pub async fn run(ctx: &Context, command: Command, id: i64) -> Result<()> {
    ctx.require_session()?;
    match command {
        Command::CheckIn | Command::CheckOut => {
            let board = GuardDashboard::new(ctx.client.clone(), ctx.config.poll_interval);
            let result = match command {
                Command::CheckIn => board.check_in(id).await,
                _ => board.check_out(id).await,
            };
            print!("{}", render::board(&board.view()));
            result?;
        }
        Command::Approve | Command::Deny => {
            let dash = ResidentDashboard::new(ctx.client.clone(), Arc::new(TracingSink), ctx.config.poll_interval);
            let result = match command {
                Command::Approve => dash.approve(id).await,
                _ => dash.deny(id).await,
            };
            print!("{}", render::resident(&dash.snapshot()));
            result?;
        }
    }
    Ok(())
}

pub async fn events(ctx: &Context) -> Result<()> {
    ctx.require_session()?;
    let log = AuditLogView::new(ctx.client.clone(), ctx.config.poll_interval);
    log.refresh().await;
    if let Some(error) = log.snapshot().error {
        return Err(crate::Error::Custom(error));
    }
    print!("{}", render::audit(&log.rows()));
    Ok(())
}

pub async fn users(ctx: &Context) -> Result<()> {
    ctx.require_session()?;
    let directory = UserDirectory::new(ctx.client.clone());
    directory.refresh().await;
    if let Some(error) = directory.snapshot().error {
        return Err(crate::Error::Custom(error));
    }
    print!("{}", render::users(&directory.rows()));
    Ok(())
}
