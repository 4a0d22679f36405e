use std::io::BufRead;

use gatehouse_core::auth::Authenticator;
use gatehouse_core::router::Router;

use super::Context;
use crate::{Result, render};

pub async fn login(ctx: &Context, username: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    let auth = Authenticator::new(ctx.client.clone(), ctx.store.clone());
    let session = auth.login(username, &password).await?;
    println!("{}", render::session(&session));
    Ok(())
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn logout(ctx: &Context) -> Result<()> {
    Authenticator::new(ctx.client.clone(), ctx.store.clone()).logout()?;
    println!("Logged out");
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<()> {
    println!("{}", render::session(&ctx.guard().evaluate()));
    Ok(())
}

pub fn open(ctx: &Context, path: &str) -> Result<()> {
    let nav = Router::new(ctx.guard()).navigate(path);
    println!("{}", render::navigation(&nav));
    Ok(())
}
