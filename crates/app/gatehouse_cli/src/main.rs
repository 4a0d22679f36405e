// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::{Cli, Commands};
use commands::Context;
use commands::dashboard::DashboardArgs;
use commands::visitors::Command;

mod cli;
mod commands;
mod logging;
mod render;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let args = Cli::parse();

    if let Commands::Version = &args.command {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    if let Commands::Push { payload } = &args.command {
        return commands::device::push(payload);
    }

    let ctx = Context::from_cli(&args)?;
    match args.command {
        Commands::Login { username, password } => {
            commands::session::login(&ctx, &username, password).await?
        }
        Commands::Logout => commands::session::logout(&ctx)?,
        Commands::Whoami => commands::session::whoami(&ctx)?,
        Commands::Open { path } => commands::session::open(&ctx, &path)?,
        Commands::Dashboard {
            date,
            tab,
            section,
            once,
        } => {
            let args = DashboardArgs {
                date,
                tab: tab.into(),
                section: section.into(),
                once,
            };
            commands::dashboard::run(&ctx, args).await?
        }
        Commands::CheckIn { id } => commands::visitors::run(&ctx, Command::CheckIn, id).await?,
        Commands::CheckOut { id } => commands::visitors::run(&ctx, Command::CheckOut, id).await?,
        Commands::Approve { id } => commands::visitors::run(&ctx, Command::Approve, id).await?,
        Commands::Deny { id } => commands::visitors::run(&ctx, Command::Deny, id).await?,
        Commands::Chat { message } => commands::chat::run(&ctx, message).await?,
        Commands::Events => commands::visitors::events(&ctx).await?,
        Commands::Users => commands::visitors::users(&ctx).await?,
        Commands::RegisterDevice { token } => commands::device::register(&ctx, &token).await?,
        Commands::Version | Commands::Push { .. } => {}
    }

    Ok(())
}
