use gatehouse_core::notify::{
    DeviceRegistration, NotificationSink, RegistrationOutcome, background_notification,
};

use super::Context;
use crate::render::ConsoleSink;
use crate::Result;

pub async fn register(ctx: &Context, token: &str) -> Result<()> {
    ctx.require_session()?;
    let registration = DeviceRegistration::new(ctx.client.clone(), ctx.store.clone());
    match registration.register(token).await {
        RegistrationOutcome::Registered => println!("Device registered"),
        RegistrationOutcome::AlreadyRegistered => println!("Device already registered"),
        RegistrationOutcome::Skipped => println!("No push token given, skipped"),
        // Registration failures never fail the command.
        RegistrationOutcome::Failed(e) => println!("Device registration failed: {e}"),
    }
    Ok(())
}

pub fn push(payload: &str) -> Result<()> {
    let payload: serde_json::Value = serde_json::from_str(payload)?;
    ConsoleSink.notify(background_notification(&payload));
    Ok(())
}
