//! Runs [`Effect`]s produced by the app and reports back as [`Action`]s

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::app::{Action, Effect};
use crate::client::ChatClient;
use crate::tui::AppEvent;

/// Perform the effect and return the action that settles it
pub async fn settle(client: &ChatClient, effect: Effect) -> Action {
    match effect {
        Effect::Dispatch { message } => {
            tracing::info!(endpoint = client.endpoint(), chars = message.chars().count(), "sending chat message");
            let result = client.send(&message).await;
            if let Ok(reply) = &result {
                tracing::debug!(chars = reply.chars().count(), "chat reply received");
            }
            Action::Settle(result)
        }
    }
}

/// Run the effect in the background, posting the outcome onto the event channel
pub fn spawn(client: ChatClient, effect: Effect, tx: UnboundedSender<AppEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let action = settle(&client, effect).await;
        if tx.send(AppEvent::Settled(action)).is_err() {
            tracing::debug!("event loop gone, dropping chat reply");
        }
    })
}
