//! Channel between a transfer form and the gas settings dialog.
//!
//! A channel is created per dialog and handed to the form explicitly; the
//! form's subscription ends when its [`GasSettingsHandle`] is dropped.

use {
    model::gas::GasSettingEvent,
    tokio::sync::broadcast::{self, error::TryRecvError},
};

const CAPACITY: usize = 16;

#[derive(Clone, Debug)]
pub struct GasSettingsChannel {
    sender: broadcast::Sender<GasSettingEvent>,
}

impl Default for GasSettingsChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl GasSettingsChannel {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CAPACITY);
        Self { sender }
    }

    /// Publishes an event to every current subscriber. Events published
    /// without subscribers are dropped.
    pub fn publish(&self, event: GasSettingEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("gas settings event without subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GasSettingEvent> {
        self.sender.subscribe()
    }

    pub fn handle(&self) -> GasSettingsHandle {
        GasSettingsHandle {
            channel: self.clone(),
            receiver: self.subscribe(),
        }
    }
}

/// A subscriber end that can also publish.
#[derive(Debug)]
pub struct GasSettingsHandle {
    channel: GasSettingsChannel,
    receiver: broadcast::Receiver<GasSettingEvent>,
}

impl GasSettingsHandle {
    pub fn publish(&self, event: GasSettingEvent) {
        self.channel.publish(event);
    }

    /// Returns the events received since the last call without waiting.
    pub fn drain(&mut self) -> Vec<GasSettingEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "gas settings subscriber lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::U256, model::gas::GasOption};

    #[test]
    fn handle_receives_published_events() {
        let channel = GasSettingsChannel::new();
        let mut handle = channel.handle();
        let mut dialog = channel.subscribe();

        handle.publish(GasSettingEvent {
            open: true,
            gas_option: Some(GasOption::Medium),
            ..Default::default()
        });
        assert!(dialog.try_recv().unwrap().open);

        channel.publish(GasSettingEvent {
            open: false,
            gas_price: Some(U256::from(7)),
            ..Default::default()
        });
        let events = handle.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].gas_price, Some(U256::from(7)));
        assert!(handle.drain().is_empty());
    }

    #[test]
    fn dropped_handle_unsubscribes() {
        let channel = GasSettingsChannel::new();
        let handle = channel.handle();
        assert_eq!(channel.sender.receiver_count(), 1);
        drop(handle);
        assert_eq!(channel.sender.receiver_count(), 0);
    }
}
