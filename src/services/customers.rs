use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::{
    db::DbPool,
    entities::customer,
    errors::{is_unique_violation, ServiceError},
    events::{Event, EventSender},
};

const DUPLICATE_CONTACT: &str = "Customer with this email or phone already exists";

/// Resolves and registers customer identities by their contact details.
#[derive(Clone)]
pub struct CustomerDirectory {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl CustomerDirectory {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Looks a customer up by exact email or phone match. Used both to reject
    /// duplicate signups and to resolve the walk-in guest identity.
    #[instrument(skip(self))]
    pub async fn find_by_contact(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Option<customer::Model>, ServiceError> {
        if email.is_none() && phone.is_none() {
            return Ok(None);
        }

        let mut condition = Condition::any();
        if let Some(email) = email {
            condition = condition.add(customer::Column::Email.eq(email));
        }
        if let Some(phone) = phone {
            condition = condition.add(customer::Column::Phone.eq(phone));
        }

        customer::Entity::find()
            .filter(condition)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Sign-in lookup. Presenting a known email is the whole proof of
    /// identity here; password verification is out of scope.
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<customer::Model>, ServiceError> {
        customer::Entity::find()
            .filter(customer::Column::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Registers a new customer. Contact uniqueness is pre-checked so callers
    /// get a structured conflict; the unique indexes stay authoritative, and
    /// a concurrent insert losing that race maps to the same conflict.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<customer::Model, ServiceError> {
        if self.find_by_contact(Some(email), phone).await?.is_some() {
            return Err(ServiceError::Conflict(DUPLICATE_CONTACT.to_string()));
        }

        let active = customer::ActiveModel {
            display_name: Set(name.to_string()),
            email: Set(Some(email.to_string())),
            phone: Set(phone.map(|p| p.to_string())),
            ..Default::default()
        };

        let created = match active.insert(&*self.db).await {
            Ok(model) => model,
            Err(err) if is_unique_violation(&err) => {
                return Err(ServiceError::Conflict(DUPLICATE_CONTACT.to_string()));
            }
            Err(err) => return Err(ServiceError::DatabaseError(err)),
        };

        info!(customer_id = created.id, "customer registered");

        if let Err(err) = self
            .event_sender
            .send(Event::CustomerRegistered {
                customer_id: created.id,
            })
            .await
        {
            warn!(error = %err, "Failed to send customer registered event");
        }

        Ok(created)
    }
}
