use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;

use crate::entities::order::PaymentStatus;

// Define the various events that can occur in the system. Status changes are
// the hook for downstream ledger/report aggregation.
#[derive(Debug, Clone, Serialize)]
pub enum Event {
    OrderCreated {
        order_id: i32,
        invoice_number: String,
    },
    OrderStatusChanged {
        order_id: i32,
        new_status: PaymentStatus,
    },
    CustomerRegistered {
        customer_id: i32,
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

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging each event. Runs until every sender is
/// dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::OrderCreated {
                order_id,
                invoice_number,
            } => {
                info!(order_id, invoice_number = %invoice_number, "order created");
            }
            Event::OrderStatusChanged {
                order_id,
                new_status,
            } => {
                info!(order_id, new_status = %new_status, "order status changed");
            }
            Event::CustomerRegistered { customer_id } => {
                info!(customer_id, "customer registered");
            }
        }
    }
}
