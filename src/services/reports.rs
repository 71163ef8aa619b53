use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, FromQueryResult, Statement};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

use crate::{db::DbPool, errors::ServiceError};

/// Per-day settlement totals across all successfully settled orders.
#[derive(Debug, FromQueryResult, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProfitRow {
    pub day: String,
    pub settled_orders: i64,
    pub revenue: Decimal,
    pub net_profit: Decimal,
}

/// Per-category sales totals across all successfully settled orders.
#[derive(Debug, FromQueryResult, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProfitRow {
    pub category: String,
    pub units_sold: i64,
    pub revenue: Decimal,
    pub net_profit: Decimal,
}

/// Read-only reporting aggregates over settled orders. Line-level snapshots
/// (line_total, margin) are the source of truth, so price changes after
/// settlement never rewrite history.
#[derive(Clone)]
pub struct ReportService {
    db: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn daily_profit(&self) -> Result<Vec<DailyProfitRow>, ServiceError> {
        let backend = self.db.get_database_backend();
        let sql = r#"
            SELECT CAST(date(o.created_at) AS TEXT) AS day,
                   COUNT(DISTINCT o.id) AS settled_orders,
                   SUM(l.line_total) AS revenue,
                   SUM(l.margin) AS net_profit
            FROM orders o
            JOIN order_lines l ON l.order_id = o.id
            WHERE o.status = 'Success'
            GROUP BY day
            ORDER BY day DESC
        "#;

        DailyProfitRow::find_by_statement(Statement::from_string(backend, sql))
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn profit_by_category(&self) -> Result<Vec<CategoryProfitRow>, ServiceError> {
        let backend = self.db.get_database_backend();
        let sql = r#"
            SELECT c.name AS category,
                   SUM(l.quantity) AS units_sold,
                   SUM(l.line_total) AS revenue,
                   SUM(l.margin) AS net_profit
            FROM orders o
            JOIN order_lines l ON l.order_id = o.id
            JOIN products p ON p.id = l.product_id
            JOIN categories c ON c.id = p.category_id
            WHERE o.status = 'Success'
            GROUP BY c.name
            ORDER BY net_profit DESC
        "#;

        CategoryProfitRow::find_by_statement(Statement::from_string(backend, sql))
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
