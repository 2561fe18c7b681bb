use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Events emitted by the order lifecycle. Delivery is best-effort; a full
/// channel or a stopped consumer never fails the operation that emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    OrderCreated(Uuid),
    OrderStatusChanged {
        order_id: Uuid,
        old_status: String,
        new_status: String,
    },
    OrderCancelled(Uuid),
    PaymentCaptured {
        order_id: Uuid,
        gateway_payment_id: String,
    },
    PaymentFailed {
        order_id: Uuid,
    },
    RefundIssued {
        order_id: Uuid,
        refund_id: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event, logging instead of propagating on failure.
    pub async fn send(&self, event: Event) {
        if let Err(e) = self.sender.send(event).await {
            warn!(error = %e, "failed to publish event");
        }
    }
}

/// Background consumer. Downstream notification fan-out would hang off this
/// loop; here each event is logged for observability.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        match &event {
            Event::OrderCreated(order_id) => info!(%order_id, "event: order created"),
            Event::OrderStatusChanged {
                order_id,
                old_status,
                new_status,
            } => info!(%order_id, %old_status, %new_status, "event: order status changed"),
            Event::OrderCancelled(order_id) => info!(%order_id, "event: order cancelled"),
            Event::PaymentCaptured {
                order_id,
                gateway_payment_id,
            } => info!(%order_id, %gateway_payment_id, "event: payment captured"),
            Event::PaymentFailed { order_id } => warn!(%order_id, "event: payment failed"),
            Event::RefundIssued {
                order_id,
                refund_id,
            } => info!(%order_id, %refund_id, "event: refund issued"),
        }
    }
}
