//! The push channel: engine events fanned out to SSE subscribers.
//!
//! The engine publishes an event after every committed mutation. [`OrderBroadcast`] hooks
//! into those events, wraps each one in its notification envelope, serialises it to an SSE
//! frame and hands it to a broadcast channel. Every `/events` subscriber holds a receiver;
//! subscribers only see events published after they connect, and a subscriber that falls
//! too far behind drops messages rather than stalling the rest.
use bytes::Bytes;
use futures::stream::{unfold, Stream};
use log::*;
use tabletab_engine::events::{EventHooks, OrderEvent};
use tokio::sync::broadcast::{self, error::RecvError};

#[derive(Clone)]
pub struct OrderBroadcast {
    sender: broadcast::Sender<Bytes>,
}

impl OrderBroadcast {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Bytes> {
        self.sender.subscribe()
    }

    pub fn broadcast(&self, event: &OrderEvent) {
        match sse_frame(event) {
            Ok(frame) => {
                // A send error just means nobody is listening right now.
                let n = self.sender.send(frame).unwrap_or_default();
                trace!("📬️ Pushed notification to {n} subscribers");
            },
            Err(e) => error!("📬️ Could not serialise push notification. {e}"),
        }
    }

    /// Event hooks that forward every engine event into this broadcast channel.
    pub fn event_hooks(&self) -> EventHooks {
        let mut hooks = EventHooks::default();
        let tx = self.clone();
        hooks.on_order_changed(move |ev| {
            let tx = tx.clone();
            Box::pin(async move {
                tx.broadcast(&OrderEvent::from(ev));
            })
        });
        let tx = self.clone();
        hooks.on_order_item_changed(move |ev| {
            let tx = tx.clone();
            Box::pin(async move {
                tx.broadcast(&OrderEvent::from(ev));
            })
        });
        let tx = self.clone();
        hooks.on_order_completed(move |ev| {
            let tx = tx.clone();
            Box::pin(async move {
                tx.broadcast(&OrderEvent::from(ev));
            })
        });
        hooks
    }
}

fn sse_frame(event: &OrderEvent) -> Result<Bytes, serde_json::Error> {
    let json = serde_json::to_string(event)?;
    Ok(Bytes::from(format!("data: {json}\n\n")))
}

/// Turns a broadcast receiver into the body stream of an SSE response. Lagged receivers
/// skip the missed messages and carry on; the stream ends when the channel closes.
pub fn sse_stream(receiver: broadcast::Receiver<Bytes>) -> impl Stream<Item = Result<Bytes, actix_web::Error>> {
    unfold(receiver, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(frame) => return Some((Ok(frame), rx)),
                Err(RecvError::Lagged(n)) => {
                    warn!("📬️ SSE subscriber lagged and missed {n} notifications");
                    continue;
                },
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

#[cfg(test)]
mod test {
    use tabletab_engine::events::{OrderCompletedEvent, OrderEvent};

    use super::*;

    #[tokio::test]
    async fn broadcast_frames_are_sse_formatted() {
        let fanout = OrderBroadcast::new(8);
        let mut rx = fanout.subscribe();
        let event = OrderEvent::from(OrderCompletedEvent::new(42, "tok-1".to_string()));
        fanout.broadcast(&event);
        let frame = rx.recv().await.unwrap();
        let text = String::from_utf8(frame.to_vec()).unwrap();
        assert!(text.starts_with("data: {"));
        assert!(text.ends_with("\n\n"));
        assert!(text.contains(r#""type":"order_completed_notification""#));
        assert!(text.contains(r#""order_id":42"#));
    }

    #[tokio::test]
    async fn subscribers_only_see_events_after_connecting() {
        let fanout = OrderBroadcast::new(8);
        let early = OrderEvent::from(OrderCompletedEvent::new(1, "a".to_string()));
        // No receivers yet; this goes nowhere.
        fanout.broadcast(&early);
        let mut rx = fanout.subscribe();
        let late = OrderEvent::from(OrderCompletedEvent::new(2, "b".to_string()));
        fanout.broadcast(&late);
        let frame = rx.recv().await.unwrap();
        let text = String::from_utf8(frame.to_vec()).unwrap();
        assert!(text.contains(r#""order_id":2"#));
        assert!(rx.try_recv().is_err());
    }
}
