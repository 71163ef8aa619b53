use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use std::sync::Arc;
use tracing::instrument;

use crate::{
    db::DbPool,
    entities::{category, payment_method, product},
    errors::{is_foreign_key_violation, is_unique_violation, ServiceError},
};

/// Admin-managed catalog: categories, products, payment methods. Simple
/// single-row CRUD; the order core only reads from these tables.
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DbPool>,
}

#[derive(Debug, Clone)]
pub struct ProductInput {
    pub category_id: i32,
    pub name: String,
    pub sku: Option<String>,
    pub cost_price: Decimal,
    pub sell_price: Decimal,
    pub description: Option<String>,
}

impl CatalogService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    pub async fn list_categories(&self) -> Result<Vec<category::Model>, ServiceError> {
        category::Entity::find()
            .order_by_asc(category::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn category_by_key(&self, key: &str) -> Result<category::Model, ServiceError> {
        self.list_categories()
            .await?
            .into_iter()
            .find(|candidate| candidate.key() == key)
            .ok_or_else(|| ServiceError::NotFound(format!("Unknown category: {key}")))
    }

    #[instrument(skip(self))]
    pub async fn create_category(
        &self,
        name: &str,
        requires_external_id: bool,
    ) -> Result<category::Model, ServiceError> {
        let active = category::ActiveModel {
            name: Set(name.to_string()),
            requires_external_id: Set(requires_external_id),
            ..Default::default()
        };

        match active.insert(&*self.db).await {
            Ok(model) => Ok(model),
            Err(err) if is_unique_violation(&err) => Err(ServiceError::Conflict(format!(
                "Category {name} already exists"
            ))),
            Err(err) => Err(ServiceError::DatabaseError(err)),
        }
    }

    #[instrument(skip(self))]
    pub async fn update_category(
        &self,
        id: i32,
        name: &str,
        requires_external_id: bool,
    ) -> Result<category::Model, ServiceError> {
        let existing = category::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Category not found".to_string()))?;

        let mut active: category::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        active.requires_external_id = Set(requires_external_id);

        match active.update(&*self.db).await {
            Ok(model) => Ok(model),
            Err(err) if is_unique_violation(&err) => Err(ServiceError::Conflict(format!(
                "Category {name} already exists"
            ))),
            Err(err) => Err(ServiceError::DatabaseError(err)),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i32) -> Result<(), ServiceError> {
        match category::Entity::delete_by_id(id).exec(&*self.db).await {
            Ok(result) if result.rows_affected == 0 => {
                Err(ServiceError::NotFound("Category not found".to_string()))
            }
            Ok(_) => Ok(()),
            Err(err) if is_foreign_key_violation(&err) => Err(ServiceError::Conflict(
                "Category is referenced by existing products or game accounts".to_string(),
            )),
            Err(err) => Err(ServiceError::DatabaseError(err)),
        }
    }

    /// Storefront listing for one category key, cheapest denomination first.
    pub async fn storefront_products(
        &self,
        category_key: &str,
    ) -> Result<Vec<product::Model>, ServiceError> {
        let category = self.category_by_key(category_key).await?;

        product::Entity::find()
            .filter(product::Column::CategoryId.eq(category.id))
            .order_by_asc(product::Column::SellPrice)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn list_products(&self) -> Result<Vec<product::Model>, ServiceError> {
        product::Entity::find()
            .order_by_asc(product::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: ProductInput) -> Result<product::Model, ServiceError> {
        self.require_category(input.category_id).await?;

        let active = product::ActiveModel {
            category_id: Set(input.category_id),
            name: Set(input.name),
            sku: Set(input.sku),
            cost_price: Set(input.cost_price),
            sell_price: Set(input.sell_price),
            description: Set(input.description),
            ..Default::default()
        };

        active
            .insert(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn update_product(
        &self,
        id: i32,
        input: ProductInput,
    ) -> Result<product::Model, ServiceError> {
        let existing = product::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Product not found".to_string()))?;

        self.require_category(input.category_id).await?;

        let mut active: product::ActiveModel = existing.into();
        active.category_id = Set(input.category_id);
        active.name = Set(input.name);
        active.sku = Set(input.sku);
        active.cost_price = Set(input.cost_price);
        active.sell_price = Set(input.sell_price);
        active.description = Set(input.description);

        active
            .update(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> Result<(), ServiceError> {
        match product::Entity::delete_by_id(id).exec(&*self.db).await {
            Ok(result) if result.rows_affected == 0 => {
                Err(ServiceError::NotFound("Product not found".to_string()))
            }
            Ok(_) => Ok(()),
            Err(err) if is_foreign_key_violation(&err) => Err(ServiceError::Conflict(
                "Product is referenced by existing orders".to_string(),
            )),
            Err(err) => Err(ServiceError::DatabaseError(err)),
        }
    }

    pub async fn list_payment_methods(&self) -> Result<Vec<payment_method::Model>, ServiceError> {
        payment_method::Entity::find()
            .order_by_asc(payment_method::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    async fn require_category(&self, category_id: i32) -> Result<(), ServiceError> {
        category::Entity::find_by_id(category_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Category {category_id} not found"))
            })?;
        Ok(())
    }
}
