use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single line of an order, created together with its header and never
/// independently. `unit_price`, `line_total`, and `margin` are snapshots
/// computed by the pricing step at insert time; later product price changes
/// do not touch them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub game_account_id: Option<i32>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub margin: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::game_account::Entity",
        from = "Column::GameAccountId",
        to = "super::game_account::Column::Id"
    )]
    GameAccount,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::game_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameAccount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
