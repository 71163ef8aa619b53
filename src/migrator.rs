use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_storefront_tables::Migration),
            Box::new(m20250301_000002_create_order_tables::Migration),
            Box::new(m20250301_000003_seed_storefront::Migration),
        ]
    }
}

// Migration implementations

mod m20250301_000001_create_storefront_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_storefront_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Customers::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Customers::DisplayName).string().not_null())
                        .col(ColumnDef::new(Customers::Phone).string().null().unique_key())
                        .col(ColumnDef::new(Customers::Email).string().null().unique_key())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Categories::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Categories::RequiresExternalId)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Products::CategoryId).integer().not_null())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::Sku).string().null())
                        .col(
                            ColumnDef::new(Products::CostPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Products::SellPrice).decimal().not_null())
                        .col(ColumnDef::new(Products::Description).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_category")
                                .from(Products::Table, Products::CategoryId)
                                .to(Categories::Table, Categories::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PaymentMethods::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PaymentMethods::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(PaymentMethods::Name).string().not_null())
                        .col(
                            ColumnDef::new(PaymentMethods::MethodType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PaymentMethods::AdminFee)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(GameAccounts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(GameAccounts::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(GameAccounts::CustomerId).integer().not_null())
                        .col(ColumnDef::new(GameAccounts::CategoryId).integer().not_null())
                        .col(
                            ColumnDef::new(GameAccounts::ExternalUserId)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(GameAccounts::Nickname).string().null())
                        .col(ColumnDef::new(GameAccounts::Server).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_game_accounts_customer")
                                .from(GameAccounts::Table, GameAccounts::CustomerId)
                                .to(Customers::Table, Customers::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_game_accounts_category")
                                .from(GameAccounts::Table, GameAccounts::CategoryId)
                                .to(Categories::Table, Categories::Id),
                        )
                        .to_owned(),
                )
                .await?;

            // Authoritative guard against duplicate accounts under concurrent
            // order creation (lookup-then-insert races resolve here).
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_game_accounts_customer_category_external")
                        .table(GameAccounts::Table)
                        .col(GameAccounts::CustomerId)
                        .col(GameAccounts::CategoryId)
                        .col(GameAccounts::ExternalUserId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(GameAccounts::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PaymentMethods::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Customers {
        Table,
        Id,
        DisplayName,
        Phone,
        Email,
    }

    #[derive(DeriveIden)]
    pub enum Categories {
        Table,
        Id,
        Name,
        RequiresExternalId,
    }

    #[derive(DeriveIden)]
    pub enum Products {
        Table,
        Id,
        CategoryId,
        Name,
        Sku,
        CostPrice,
        SellPrice,
        Description,
    }

    #[derive(DeriveIden)]
    pub enum PaymentMethods {
        Table,
        Id,
        Name,
        MethodType,
        AdminFee,
    }

    #[derive(DeriveIden)]
    pub enum GameAccounts {
        Table,
        Id,
        CustomerId,
        CategoryId,
        ExternalUserId,
        Nickname,
        Server,
    }
}

mod m20250301_000002_create_order_tables {

    use sea_orm_migration::prelude::*;

    use super::m20250301_000001_create_storefront_tables::{
        Customers, GameAccounts, PaymentMethods, Products,
    };

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Orders::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Orders::InvoiceNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Orders::CustomerId).integer().null())
                        .col(
                            ColumnDef::new(Orders::PaymentMethodId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Orders::Status).string().not_null())
                        .col(ColumnDef::new(Orders::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_customer")
                                .from(Orders::Table, Orders::CustomerId)
                                .to(Customers::Table, Customers::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_payment_method")
                                .from(Orders::Table, Orders::PaymentMethodId)
                                .to(PaymentMethods::Table, PaymentMethods::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_created_at")
                        .table(Orders::Table)
                        .col(Orders::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_status")
                        .table(Orders::Table)
                        .col(Orders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrderLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderLines::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(OrderLines::OrderId).integer().not_null())
                        .col(ColumnDef::new(OrderLines::ProductId).integer().not_null())
                        .col(ColumnDef::new(OrderLines::GameAccountId).integer().null())
                        .col(ColumnDef::new(OrderLines::Quantity).integer().not_null())
                        .col(ColumnDef::new(OrderLines::UnitPrice).decimal().not_null())
                        .col(ColumnDef::new(OrderLines::LineTotal).decimal().not_null())
                        .col(ColumnDef::new(OrderLines::Margin).decimal().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_lines_order")
                                .from(OrderLines::Table, OrderLines::OrderId)
                                .to(Orders::Table, Orders::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_lines_product")
                                .from(OrderLines::Table, OrderLines::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_lines_game_account")
                                .from(OrderLines::Table, OrderLines::GameAccountId)
                                .to(GameAccounts::Table, GameAccounts::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_lines_order_id")
                        .table(OrderLines::Table)
                        .col(OrderLines::OrderId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Orders {
        Table,
        Id,
        InvoiceNumber,
        CustomerId,
        PaymentMethodId,
        Status,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub enum OrderLines {
        Table,
        Id,
        OrderId,
        ProductId,
        GameAccountId,
        Quantity,
        UnitPrice,
        LineTotal,
        Margin,
    }
}

mod m20250301_000003_seed_storefront {

    use sea_orm_migration::prelude::*;

    use super::m20250301_000001_create_storefront_tables::{
        Categories, Customers, PaymentMethods,
    };

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_seed_storefront"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Walk-in guest identity used as the fallback for anonymous orders.
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(Customers::Table)
                        .columns([Customers::DisplayName, Customers::Phone])
                        .values_panic(["Walk-in Guest".into(), "081234567890".into()])
                        .to_owned(),
                )
                .await?;

            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(Categories::Table)
                        .columns([Categories::Name, Categories::RequiresExternalId])
                        .values_panic(["Mobile Legends".into(), true.into()])
                        .values_panic(["Genshin Impact".into(), false.into()])
                        .values_panic(["Steam Wallet".into(), false.into()])
                        .to_owned(),
                )
                .await?;

            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(PaymentMethods::Table)
                        .columns([
                            PaymentMethods::Name,
                            PaymentMethods::MethodType,
                            PaymentMethods::AdminFee,
                        ])
                        .values_panic(["QRIS".into(), "ewallet".into(), 0.into()])
                        .values_panic(["Bank Transfer".into(), "bank".into(), 1000.into()])
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .exec_stmt(Query::delete().from_table(PaymentMethods::Table).to_owned())
                .await?;
            manager
                .exec_stmt(Query::delete().from_table(Categories::Table).to_owned())
                .await?;
            manager
                .exec_stmt(Query::delete().from_table(Customers::Table).to_owned())
                .await?;
            Ok(())
        }
    }
}
