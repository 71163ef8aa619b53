use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::debug;

use crate::{
    entities::{category, game_account},
    errors::{is_unique_violation, ServiceError},
};

/// Resolves the game account an order line should reference, creating it on
/// first use. Runs on the order transaction handle so a freshly created
/// account is never observable without its order.
///
/// Returns `None` when the category does not tie orders to an in-game
/// identity, or when the customer/external id needed to pin one down is
/// absent. Nickname and server are first-write-wins: an existing account is
/// returned unchanged even if the request carries a different server.
pub async fn resolve<C: ConnectionTrait>(
    conn: &C,
    category: &category::Model,
    customer_id: Option<i32>,
    external_user_id: Option<&str>,
    server: Option<&str>,
) -> Result<Option<game_account::Model>, ServiceError> {
    if !category.requires_external_id {
        return Ok(None);
    }
    let (Some(customer_id), Some(external_user_id)) = (customer_id, external_user_id) else {
        return Ok(None);
    };

    if let Some(existing) = find_existing(conn, customer_id, category.id, external_user_id).await? {
        debug!(
            game_account_id = existing.id,
            "reusing existing game account"
        );
        return Ok(Some(existing));
    }

    let active = game_account::ActiveModel {
        customer_id: Set(customer_id),
        category_id: Set(category.id),
        external_user_id: Set(external_user_id.to_string()),
        nickname: Set(None),
        server: Set(server.map(|s| s.to_string())),
        ..Default::default()
    };

    match active.insert(conn).await {
        Ok(created) => {
            debug!(game_account_id = created.id, "created game account");
            Ok(Some(created))
        }
        // Lost a creation race; the unique (customer, category, external id)
        // index guarantees the winner's row satisfies this lookup.
        Err(err) if is_unique_violation(&err) => {
            let existing = find_existing(conn, customer_id, category.id, external_user_id)
                .await?
                .ok_or_else(|| {
                    ServiceError::InternalError(
                        "Game account missing after unique-constraint conflict".to_string(),
                    )
                })?;
            Ok(Some(existing))
        }
        Err(err) => Err(ServiceError::DatabaseError(err)),
    }
}

async fn find_existing<C: ConnectionTrait>(
    conn: &C,
    customer_id: i32,
    category_id: i32,
    external_user_id: &str,
) -> Result<Option<game_account::Model>, ServiceError> {
    game_account::Entity::find()
        .filter(game_account::Column::CustomerId.eq(customer_id))
        .filter(game_account::Column::CategoryId.eq(category_id))
        .filter(game_account::Column::ExternalUserId.eq(external_user_id))
        .one(conn)
        .await
        .map_err(ServiceError::DatabaseError)
}
