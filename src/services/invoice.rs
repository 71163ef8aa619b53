use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Issues invoice numbers of the form `{prefix}-{suffix}`, where the suffix
/// is the wall-clock millisecond count at generation time, bumped past the
/// last issued value so a single process never repeats itself. Global
/// uniqueness across processes is owned by the unique index on
/// `orders.invoice_number`; callers retry once on a conflict there.
#[derive(Debug)]
pub struct InvoiceGenerator {
    prefix: String,
    last_suffix: AtomicI64,
}

impl InvoiceGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            last_suffix: AtomicI64::new(0),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn next(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let prev = self
            .last_suffix
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(std::cmp::max(now, last + 1))
            })
            .unwrap_or(0);
        let suffix = std::cmp::max(now, prev + 1);
        format!("{}-{}", self.prefix, suffix)
    }
}
