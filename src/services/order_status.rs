use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::{
    db::DbPool,
    entities::order::{self, PaymentStatus},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Applies payment-status transitions to existing orders. Authorization is
/// the caller's responsibility; this service only touches storage.
#[derive(Clone)]
pub struct OrderStatusService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl OrderStatusService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Writes the new status as one row update, with no read-modify-write
    /// gap. Concurrent settlements by two admins serialize at the row; the
    /// last writer wins. The event fires only after the write is durable.
    #[instrument(skip(self), fields(order_id = order_id, new_status = %new_status))]
    pub async fn set_status(
        &self,
        order_id: i32,
        new_status: PaymentStatus,
    ) -> Result<(), ServiceError> {
        let result = order::Entity::update_many()
            .col_expr(order::Column::Status, Expr::value(new_status.to_string()))
            .filter(order::Column::Id.eq(order_id))
            .exec(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Order {order_id} not found"
            )));
        }

        info!(order_id, status = %new_status, "order status updated");

        if let Err(err) = self
            .event_sender
            .send(Event::OrderStatusChanged {
                order_id,
                new_status,
            })
            .await
        {
            warn!(error = %err, "Failed to send order status changed event");
        }

        Ok(())
    }
}
