use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::DbPool,
    events::EventSender,
    services::{
        catalog::CatalogService, customers::CustomerDirectory, invoice::InvoiceGenerator,
        order_status::OrderStatusService, orders::OrderService, reports::ReportService,
    },
};

pub mod categories;
pub mod customers;
pub mod health;
pub mod orders;
pub mod payment_methods;
pub mod products;
pub mod reports;

/// Aggregate of the services HTTP handlers reach through `AppState`.
#[derive(Clone)]
pub struct AppServices {
    pub customers: CustomerDirectory,
    pub orders: OrderService,
    pub order_status: OrderStatusService,
    pub catalog: CatalogService,
    pub reports: ReportService,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender, config: &AppConfig) -> Self {
        let invoices = Arc::new(InvoiceGenerator::new(config.invoice_prefix.clone()));

        Self {
            customers: CustomerDirectory::new(db.clone(), event_sender.clone()),
            orders: OrderService::new(
                db.clone(),
                invoices,
                config.guest_contact_phone.clone(),
                event_sender.clone(),
            ),
            order_status: OrderStatusService::new(db.clone(), event_sender),
            catalog: CatalogService::new(db.clone()),
            reports: ReportService::new(db),
        }
    }
}
