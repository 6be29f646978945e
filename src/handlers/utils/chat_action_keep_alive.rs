// Repeats a chat action (e.g. "typing") while a slow reply is prepared.

use teloxide::{prelude::*, types::ChatAction};
use tokio::{
    sync::oneshot,
    task::JoinHandle,
    time::{Duration, interval},
};

/// Telegram clears a chat action after about five seconds.
const REFRESH_SECS: u64 = 4;

pub struct ChatActionKeepAlive {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ChatActionKeepAlive {
    pub fn spawn(bot: Bot, chat_id: ChatId, action: ChatAction) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(REFRESH_SECS));
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        if let Err(err) = bot.send_chat_action(chat_id, action).await {
                            tracing::warn!("send_chat_action failed: {err}");
                        }
                    }
                }
            }
        });

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Stop the ticker and wait for the task, so nothing outlives the update.
    pub async fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

impl Drop for ChatActionKeepAlive {
    fn drop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(h) = &self.handle {
            h.abort();
        }
    }
}
