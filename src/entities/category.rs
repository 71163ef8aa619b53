use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A product category (one storefront "game"). `requires_external_id` marks
/// categories whose orders must be tied to an in-game account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub requires_external_id: bool,
}

impl Model {
    /// Kebab-case key used by the storefront to address this category,
    /// e.g. "Mobile Legends" -> "mobile-legends".
    pub fn key(&self) -> String {
        slug(&self.name)
    }
}

/// Lower-cases a category name and collapses whitespace runs into dashes.
pub fn slug(name: &str) -> String {
    name.trim()
        .to_ascii_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
    #[sea_orm(has_many = "super::game_account::Entity")]
    GameAccounts,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::game_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
