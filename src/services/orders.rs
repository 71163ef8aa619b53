use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::{
    db::DbPool,
    entities::{
        category, customer, game_account,
        order::{self, PaymentStatus},
        order_line, payment_method, product,
    },
    errors::{is_unique_violation, ServiceError},
    events::{Event, EventSender},
    services::{game_accounts, invoice::InvoiceGenerator, pricing},
};

/// Request/Response types for the order service. Required fields stay
/// optional at the wire level so absence surfaces as a structured
/// `ValidationError` rather than a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub category_key: Option<String>,
    pub product_id: Option<i32>,
    pub payment_method_id: Option<i32>,
    pub customer_id: Option<i32>,
    pub external_user_id: Option<String>,
    pub server: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreatedOrder {
    pub order_id: i32,
    pub invoice_number: String,
}

/// One flattened order line as served by listings and invoice lookups.
#[derive(Debug, FromQueryResult, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailRow {
    pub order_id: i32,
    pub invoice_number: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub customer_id: Option<i32>,
    pub customer_name: Option<String>,
    pub category_name: String,
    pub product_id: i32,
    pub product_name: String,
    pub payment_method: String,
    pub external_user_id: Option<String>,
    pub server: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Coordinates order capture: one transaction creates the header, its single
/// line, and (when needed) the customer's game account, or nothing at all.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
    invoices: Arc<InvoiceGenerator>,
    guest_phone: String,
    event_sender: EventSender,
}

impl OrderService {
    pub fn new(
        db: Arc<DbPool>,
        invoices: Arc<InvoiceGenerator>,
        guest_phone: String,
        event_sender: EventSender,
    ) -> Self {
        Self {
            db,
            invoices,
            guest_phone,
            event_sender,
        }
    }

    /// Creates an order as a single atomic unit. An invoice-number collision
    /// (possible when several processes share a prefix) fails the whole unit
    /// and is retried exactly once with a fresh number before giving up.
    #[instrument(
        skip(self, request),
        fields(category_key = ?request.category_key, product_id = ?request.product_id)
    )]
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<CreatedOrder, ServiceError> {
        let category_key = request
            .category_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty());
        let (Some(category_key), Some(product_id), Some(payment_method_id)) =
            (category_key, request.product_id, request.payment_method_id)
        else {
            return Err(ServiceError::ValidationError(
                "categoryKey, productId, and paymentMethodId are required".to_string(),
            ));
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .try_create(
                    category_key,
                    product_id,
                    payment_method_id,
                    request.customer_id,
                    request.external_user_id.as_deref(),
                    request.server.as_deref(),
                )
                .await
            {
                Err(ServiceError::Conflict(message)) if attempt == 1 => {
                    warn!(%message, "invoice number collision, retrying order creation once");
                }
                result => return result,
            }
        }
    }

    async fn try_create(
        &self,
        category_key: &str,
        product_id: i32,
        payment_method_id: i32,
        customer_id: Option<i32>,
        external_user_id: Option<&str>,
        server: Option<&str>,
    ) -> Result<CreatedOrder, ServiceError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        match self
            .create_in_txn(
                &txn,
                category_key,
                product_id,
                payment_method_id,
                customer_id,
                external_user_id,
                server,
            )
            .await
        {
            Ok(created) => {
                txn.commit().await.map_err(ServiceError::DatabaseError)?;

                info!(
                    order_id = created.order_id,
                    invoice_number = %created.invoice_number,
                    "order created"
                );

                if let Err(err) = self
                    .event_sender
                    .send(Event::OrderCreated {
                        order_id: created.order_id,
                        invoice_number: created.invoice_number.clone(),
                    })
                    .await
                {
                    warn!(error = %err, "Failed to send order created event");
                }

                Ok(created)
            }
            Err(err) => {
                // No partial customer/game-account/order write may survive.
                if let Err(rollback_err) = txn.rollback().await {
                    error!(error = %rollback_err, "failed to roll back order creation");
                }
                Err(err)
            }
        }
    }

    async fn create_in_txn(
        &self,
        txn: &DatabaseTransaction,
        category_key: &str,
        product_id: i32,
        payment_method_id: i32,
        customer_id: Option<i32>,
        external_user_id: Option<&str>,
        server: Option<&str>,
    ) -> Result<CreatedOrder, ServiceError> {
        let category = category::Entity::find()
            .all(txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .find(|candidate| candidate.key() == category_key)
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Unknown category: {category_key}"))
            })?;

        let product = product::Entity::find_by_id(product_id)
            .one(txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .filter(|product| product.category_id == category.id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Product {product_id} not found in category {}",
                    category.name
                ))
            })?;

        let payment_method = payment_method::Entity::find_by_id(payment_method_id)
            .one(txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Payment method {payment_method_id} not found"))
            })?;

        // Effective customer: explicit id, or the walk-in guest record, or
        // none. Guest resolution only reads; no customer row is ever created
        // on this path.
        let effective_customer_id = match customer_id {
            Some(id) => Some(id),
            None => customer::Entity::find()
                .filter(customer::Column::Phone.eq(self.guest_phone.as_str()))
                .one(txn)
                .await
                .map_err(ServiceError::DatabaseError)?
                .map(|guest| guest.id),
        };

        let game_account = game_accounts::resolve(
            txn,
            &category,
            effective_customer_id,
            external_user_id,
            server,
        )
        .await?;

        let invoice_number = self.invoices.next();

        let order = order::ActiveModel {
            invoice_number: Set(invoice_number.clone()),
            customer_id: Set(effective_customer_id),
            payment_method_id: Set(payment_method.id),
            status: Set(PaymentStatus::Pending.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let order = match order.insert(txn).await {
            Ok(model) => model,
            Err(err) if is_unique_violation(&err) => {
                return Err(ServiceError::Conflict(format!(
                    "Invoice number {invoice_number} already exists"
                )));
            }
            Err(err) => return Err(ServiceError::DatabaseError(err)),
        };

        // Explicit pricing step: snapshot the sell price and margin onto the
        // line before it is written.
        let pricing = pricing::price_line(&product, 1);
        let line = order_line::ActiveModel {
            order_id: Set(order.id),
            product_id: Set(product.id),
            game_account_id: Set(game_account.as_ref().map(|account| account.id)),
            quantity: Set(1),
            unit_price: Set(pricing.unit_price),
            line_total: Set(pricing.line_total),
            margin: Set(pricing.margin),
            ..Default::default()
        };
        line.insert(txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(CreatedOrder {
            order_id: order.id,
            invoice_number,
        })
    }

    /// Lists the 50 most recent order lines, optionally filtered by payment
    /// status and customer.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        status: Option<PaymentStatus>,
        customer_id: Option<i32>,
    ) -> Result<Vec<OrderDetailRow>, ServiceError> {
        let mut query = detail_query();
        if let Some(status) = status {
            query = query.filter(order::Column::Status.eq(status.to_string()));
        }
        if let Some(customer_id) = customer_id {
            query = query.filter(order::Column::CustomerId.eq(customer_id));
        }

        query
            .order_by_desc(order::Column::CreatedAt)
            .limit(50)
            .into_model::<OrderDetailRow>()
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Fetches the line rows for one invoice.
    #[instrument(skip(self))]
    pub async fn find_by_invoice(
        &self,
        invoice_number: &str,
    ) -> Result<Vec<OrderDetailRow>, ServiceError> {
        let rows = detail_query()
            .filter(order::Column::InvoiceNumber.eq(invoice_number))
            .order_by_desc(order::Column::CreatedAt)
            .into_model::<OrderDetailRow>()
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if rows.is_empty() {
            return Err(ServiceError::NotFound("Invoice not found".to_string()));
        }

        Ok(rows)
    }
}

fn detail_query() -> Select<order::Entity> {
    order::Entity::find()
        .select_only()
        .column_as(order::Column::Id, "order_id")
        .column_as(order::Column::InvoiceNumber, "invoice_number")
        .column_as(order::Column::Status, "status")
        .column_as(order::Column::CreatedAt, "created_at")
        .column_as(order::Column::CustomerId, "customer_id")
        .column_as(customer::Column::DisplayName, "customer_name")
        .column_as(category::Column::Name, "category_name")
        .column_as(product::Column::Id, "product_id")
        .column_as(product::Column::Name, "product_name")
        .column_as(payment_method::Column::Name, "payment_method")
        .column_as(game_account::Column::ExternalUserId, "external_user_id")
        .column_as(game_account::Column::Server, "server")
        .column_as(order_line::Column::Quantity, "quantity")
        .column_as(order_line::Column::UnitPrice, "unit_price")
        .column_as(order_line::Column::LineTotal, "line_total")
        .join(JoinType::InnerJoin, order::Relation::OrderLines.def())
        .join(JoinType::InnerJoin, order_line::Relation::Product.def())
        .join(JoinType::InnerJoin, product::Relation::Category.def())
        .join(JoinType::InnerJoin, order::Relation::PaymentMethod.def())
        .join(JoinType::LeftJoin, order::Relation::Customer.def())
        .join(JoinType::LeftJoin, order_line::Relation::GameAccount.def())
}
