use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_menu_tables::Migration),
            Box::new(m20240301_000002_create_tables_table::Migration),
            Box::new(m20240301_000003_create_orders_tables::Migration),
            Box::new(m20240301_000004_create_payments_table::Migration),
            Box::new(m20240301_000005_create_restaurant_settings_table::Migration),
        ]
    }
}

mod m20240301_000001_create_menu_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_menu_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MenuCategories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MenuCategories::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MenuCategories::Name).string().not_null())
                        .col(
                            ColumnDef::new(MenuCategories::DisplayOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MenuCategories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MenuItems::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(MenuItems::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(MenuItems::CategoryId).uuid().null())
                        .col(ColumnDef::new(MenuItems::Name).string().not_null())
                        .col(ColumnDef::new(MenuItems::Description).text().null())
                        .col(
                            ColumnDef::new(MenuItems::Price)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MenuItems::IsAvailable)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(MenuItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MenuItems::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_menu_items_category_id")
                                .from(MenuItems::Table, MenuItems::CategoryId)
                                .to(MenuCategories::Table, MenuCategories::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_menu_items_category_id")
                        .table(MenuItems::Table)
                        .col(MenuItems::CategoryId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MenuItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MenuCategories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum MenuCategories {
        Table,
        Id,
        Name,
        DisplayOrder,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum MenuItems {
        Table,
        Id,
        CategoryId,
        Name,
        Description,
        Price,
        IsAvailable,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000002_create_tables_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_tables_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Tables::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Tables::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Tables::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Tables::Seats).integer().not_null())
                        .col(
                            ColumnDef::new(Tables::Status)
                                .string_len(32)
                                .not_null()
                                .default("available"),
                        )
                        .col(ColumnDef::new(Tables::CurrentOrderId).uuid().null())
                        .col(
                            ColumnDef::new(Tables::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Tables::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Tables::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Tables {
        Table,
        Id,
        Name,
        Seats,
        Status,
        CurrentOrderId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000003_create_orders_tables {
    use super::m20240301_000001_create_menu_tables::MenuItems;
    use super::m20240301_000002_create_tables_table::Tables;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_orders_tables"
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
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Orders::TableId).uuid().null())
                        .col(
                            ColumnDef::new(Orders::Status)
                                .string_len(32)
                                .not_null()
                                .default("pending"),
                        )
                        .col(
                            ColumnDef::new(Orders::Subtotal)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Orders::TaxAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Orders::Total)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Orders::Notes).text().null())
                        .col(
                            ColumnDef::new(Orders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Orders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Orders::Version)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_table_id")
                                .from(Orders::Table, Orders::TableId)
                                .to(Tables::Table, Tables::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            for (name, column) in [
                ("idx_orders_status", Orders::Status),
                ("idx_orders_table_id", Orders::TableId),
                ("idx_orders_created_at", Orders::CreatedAt),
            ] {
                manager
                    .create_index(
                        Index::create()
                            .if_not_exists()
                            .name(name)
                            .table(Orders::Table)
                            .col(column)
                            .to_owned(),
                    )
                    .await?;
            }

            manager
                .create_table(
                    Table::create()
                        .table(OrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderItems::OrderId).uuid().not_null())
                        .col(ColumnDef::new(OrderItems::MenuItemId).uuid().not_null())
                        .col(ColumnDef::new(OrderItems::Name).string().not_null())
                        .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(OrderItems::Price)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OrderItems::Status)
                                .string_len(32)
                                .not_null()
                                .default("pending"),
                        )
                        .col(ColumnDef::new(OrderItems::Notes).text().null())
                        .col(
                            ColumnDef::new(OrderItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_items_order_id")
                                .from(OrderItems::Table, OrderItems::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_items_menu_item_id")
                                .from(OrderItems::Table, OrderItems::MenuItemId)
                                .to(MenuItems::Table, MenuItems::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_items_order_id")
                        .table(OrderItems::Table)
                        .col(OrderItems::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Orders {
        Table,
        Id,
        TableId,
        Status,
        Subtotal,
        TaxAmount,
        Total,
        Notes,
        CreatedAt,
        UpdatedAt,
        Version,
    }

    #[derive(DeriveIden)]
    enum OrderItems {
        Table,
        Id,
        OrderId,
        MenuItemId,
        Name,
        Quantity,
        Price,
        Status,
        Notes,
        CreatedAt,
    }
}

mod m20240301_000004_create_payments_table {
    use super::m20240301_000003_create_orders_tables::Orders;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000004_create_payments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Payments::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Payments::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Payments::OrderId).uuid().not_null())
                        .col(ColumnDef::new(Payments::Amount).decimal_len(12, 2).not_null())
                        .col(
                            ColumnDef::new(Payments::AmountTendered)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Payments::ChangeDue)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Payments::PaymentMethod)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Payments::Status)
                                .string_len(16)
                                .not_null()
                                .default("completed"),
                        )
                        .col(
                            ColumnDef::new(Payments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_payments_order_id")
                                .from(Payments::Table, Payments::OrderId)
                                .to(Orders::Table, Orders::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_payments_order_id")
                        .table(Payments::Table)
                        .col(Payments::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Payments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Payments {
        Table,
        Id,
        OrderId,
        Amount,
        AmountTendered,
        ChangeDue,
        PaymentMethod,
        Status,
        CreatedAt,
    }
}

mod m20240301_000005_create_restaurant_settings_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000005_create_restaurant_settings_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(RestaurantSettings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RestaurantSettings::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RestaurantSettings::RestaurantType)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RestaurantSettings::CityTier)
                                .string_len(16)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(RestaurantSettings::Region)
                                .string_len(16)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(RestaurantSettings::RestaurantName)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(RestaurantSettings::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RestaurantSettings::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RestaurantSettings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum RestaurantSettings {
        Table,
        Id,
        RestaurantType,
        CityTier,
        Region,
        RestaurantName,
        CreatedAt,
        UpdatedAt,
    }
}
