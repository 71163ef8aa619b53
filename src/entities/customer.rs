use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A storefront customer. Contact fields are optional but unique: no two
/// customers may share a non-null email or phone.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub display_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
    #[sea_orm(has_many = "super::game_account::Entity")]
    GameAccounts,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::game_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
