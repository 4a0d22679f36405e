use std::sync::Arc;

use chrono::NaiveDate;
use gatehouse_core::poll::Snapshot;
use gatehouse_core::router::{DASHBOARD_PATH, DashboardKind, Page, Router};
use gatehouse_core::views::{AdminDashboard, AdminTab, GuardDashboard, GuardTab, ResidentDashboard};
use tokio::sync::watch;
use tracing::info;

use super::Context;
use crate::render::{self, ConsoleSink};
use crate::{Error, Result};

pub struct DashboardArgs {
    pub date: Option<NaiveDate>,
    pub tab: GuardTab,
    pub section: AdminTab,
    pub once: bool,
}

pub async fn run(ctx: &Context, args: DashboardArgs) -> Result<()> {
    let nav = Router::new(ctx.guard()).navigate(DASHBOARD_PATH);
    // One relay per authenticated session, detached when the page goes away.
    let relay = nav.layout.attach_relay(&ctx.push, Arc::new(ConsoleSink));
    let result = match nav.page {
        Page::Dashboard(DashboardKind::Guard) => guard(ctx, &args).await,
        Page::Dashboard(DashboardKind::Resident) => resident(ctx, &args).await,
        Page::Dashboard(DashboardKind::Admin) => admin(ctx, &args).await,
        Page::UnknownRole => Err(Error::UnknownRole),
        Page::Login | Page::NotFound => Err(Error::NotLoggedIn),
    };
    if let Some(relay) = relay {
        relay.shutdown().await;
    }
    result
}

/// Print `render()` on every published snapshot until Ctrl-C.
async fn follow<T>(mut rx: watch::Receiver<Snapshot<T>>, render: impl Fn() -> String) {
    info!("following updates, press Ctrl-C to stop");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                rx.borrow_and_update();
                println!("{}", render());
            }
        }
    }
}

fn configure_board(board: &mut GuardDashboard, args: &DashboardArgs) {
    if let Some(date) = args.date {
        board.select_date(date);
    }
    board.select_tab(args.tab);
}

async fn guard(ctx: &Context, args: &DashboardArgs) -> Result<()> {
    let mut board = GuardDashboard::new(ctx.client.clone(), ctx.config.poll_interval);
    configure_board(&mut board, args);
    if args.once {
        board.refresh().await;
        print!("{}", render::board(&board.view()));
        return Ok(());
    }
    board.mount();
    follow(board.subscribe(), || render::board(&board.view())).await;
    board.unmount();
    Ok(())
}

async fn resident(ctx: &Context, args: &DashboardArgs) -> Result<()> {
    let mut dash = ResidentDashboard::new(ctx.client.clone(), Arc::new(ConsoleSink), ctx.config.poll_interval);
    if args.once {
        dash.refresh().await;
        print!("{}", render::resident(&dash.snapshot()));
        return Ok(());
    }
    dash.mount();
    follow(dash.subscribe(), || render::resident(&dash.snapshot())).await;
    dash.unmount();
    Ok(())
}

fn with_error(error: Option<&str>, body: String) -> String {
    match error {
        Some(e) => format!("! {e}\n{body}"),
        None => body,
    }
}

async fn admin(ctx: &Context, args: &DashboardArgs) -> Result<()> {
    let mut dash = AdminDashboard::new(ctx.client.clone(), ctx.config.poll_interval);
    configure_board(dash.operations_mut(), args);
    dash.select_tab(args.section);
    println!("{}", dash.active_tab());

    let audit = |dash: &AdminDashboard| {
        with_error(dash.audit().snapshot().error.as_deref(), render::audit(&dash.audit().rows()))
    };
    let users = |dash: &AdminDashboard| {
        with_error(dash.users().snapshot().error.as_deref(), render::users(&dash.users().rows()))
    };

    if args.once {
        match dash.active_tab() {
            AdminTab::Operations => {
                dash.operations().refresh().await;
                print!("{}", render::board(&dash.operations().view()));
            }
            AdminTab::Users => {
                dash.users().refresh().await;
                print!("{}", users(&dash));
            }
            AdminTab::Audit => {
                dash.audit().refresh().await;
                print!("{}", audit(&dash));
            }
        }
        return Ok(());
    }

    dash.mount();
    match dash.active_tab() {
        AdminTab::Operations => {
            follow(dash.operations().subscribe(), || render::board(&dash.operations().view())).await
        }
        AdminTab::Users => follow(dash.users().subscribe(), || users(&dash)).await,
        AdminTab::Audit => follow(dash.audit().subscribe(), || audit(&dash)).await,
    }
    dash.unmount();
    Ok(())
}
