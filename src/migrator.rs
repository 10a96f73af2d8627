use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_dentists_table::Migration),
            Box::new(m20240101_000003_create_patients_table::Migration),
            Box::new(m20240101_000004_create_cases_table::Migration),
            Box::new(m20240101_000005_create_case_status_history_table::Migration),
            Box::new(m20240101_000006_create_invoices_table::Migration),
            Box::new(m20240101_000007_create_invoice_items_table::Migration),
            Box::new(m20240101_000008_create_inventory_tables::Migration),
            Box::new(m20240101_000009_create_messages_table::Migration),
            Box::new(m20240101_000010_create_appointments_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Users::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::FirstName).string().not_null())
                        .col(ColumnDef::new(Users::LastName).string().not_null())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(
                            ColumnDef::new(Users::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Users::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_users_role")
                        .table(Users::Table)
                        .col(Users::Role)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Users {
        Table,
        Id,
        Username,
        Email,
        PasswordHash,
        FirstName,
        LastName,
        Role,
        Active,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_dentists_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_dentists_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Dentists::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Dentists::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Dentists::FirstName).string().not_null())
                        .col(ColumnDef::new(Dentists::LastName).string().not_null())
                        .col(ColumnDef::new(Dentists::Email).string().null())
                        .col(ColumnDef::new(Dentists::Phone).string().null())
                        .col(ColumnDef::new(Dentists::ClinicName).string().null())
                        .col(ColumnDef::new(Dentists::Address).string().null())
                        .col(ColumnDef::new(Dentists::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Dentists::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Dentists::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Dentists {
        Table,
        Id,
        FirstName,
        LastName,
        Email,
        Phone,
        ClinicName,
        Address,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_patients_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_patients_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Patients::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Patients::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Patients::FirstName).string().not_null())
                        .col(ColumnDef::new(Patients::LastName).string().not_null())
                        .col(ColumnDef::new(Patients::Email).string().null())
                        .col(ColumnDef::new(Patients::Phone).string().null())
                        .col(ColumnDef::new(Patients::DateOfBirth).date().null())
                        .col(ColumnDef::new(Patients::DentistId).uuid().null())
                        .col(ColumnDef::new(Patients::Notes).string().null())
                        .col(ColumnDef::new(Patients::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Patients::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_patients_dentist_id")
                        .table(Patients::Table)
                        .col(Patients::DentistId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Patients::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Patients {
        Table,
        Id,
        FirstName,
        LastName,
        Email,
        Phone,
        DateOfBirth,
        DentistId,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_cases_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_cases_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Cases::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Cases::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Cases::CaseNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Cases::Title).string().not_null())
                        .col(ColumnDef::new(Cases::Description).string().null())
                        .col(ColumnDef::new(Cases::Status).string().not_null())
                        .col(ColumnDef::new(Cases::Priority).string().not_null())
                        .col(ColumnDef::new(Cases::PatientId).uuid().not_null())
                        .col(ColumnDef::new(Cases::DentistId).uuid().not_null())
                        .col(ColumnDef::new(Cases::DueDate).date().null())
                        .col(ColumnDef::new(Cases::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Cases::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_cases_status")
                        .table(Cases::Table)
                        .col(Cases::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_cases_dentist_id")
                        .table(Cases::Table)
                        .col(Cases::DentistId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_cases_patient_id")
                        .table(Cases::Table)
                        .col(Cases::PatientId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Cases::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Cases {
        Table,
        Id,
        CaseNumber,
        Title,
        Description,
        Status,
        Priority,
        PatientId,
        DentistId,
        DueDate,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000005_create_case_status_history_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_case_status_history_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CaseStatusHistory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CaseStatusHistory::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CaseStatusHistory::CaseId).uuid().not_null())
                        .col(ColumnDef::new(CaseStatusHistory::Status).string().not_null())
                        .col(ColumnDef::new(CaseStatusHistory::Notes).string().not_null())
                        .col(
                            ColumnDef::new(CaseStatusHistory::ChangedBy)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CaseStatusHistory::ChangedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_case_status_history_case_id")
                        .table(CaseStatusHistory::Table)
                        .col(CaseStatusHistory::CaseId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CaseStatusHistory::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum CaseStatusHistory {
        Table,
        Id,
        CaseId,
        Status,
        Notes,
        ChangedBy,
        ChangedAt,
    }
}

mod m20240101_000006_create_invoices_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_invoices_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Invoices::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Invoices::InvoiceNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Invoices::Status).string().not_null())
                        .col(ColumnDef::new(Invoices::PatientId).uuid().not_null())
                        .col(ColumnDef::new(Invoices::DentistId).uuid().not_null())
                        .col(ColumnDef::new(Invoices::CaseId).uuid().null())
                        .col(
                            ColumnDef::new(Invoices::Amount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Invoices::Tax).decimal().not_null().default(0))
                        .col(
                            ColumnDef::new(Invoices::Total)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Invoices::Notes).string().null())
                        .col(ColumnDef::new(Invoices::IssueDate).date().not_null())
                        .col(ColumnDef::new(Invoices::DueDate).date().not_null())
                        .col(ColumnDef::new(Invoices::PaidDate).date().null())
                        .col(ColumnDef::new(Invoices::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Invoices::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoices_status")
                        .table(Invoices::Table)
                        .col(Invoices::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoices_dentist_id")
                        .table(Invoices::Table)
                        .col(Invoices::DentistId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Invoices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Invoices {
        Table,
        Id,
        InvoiceNumber,
        Status,
        PatientId,
        DentistId,
        CaseId,
        Amount,
        Tax,
        Total,
        Notes,
        IssueDate,
        DueDate,
        PaidDate,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000007_create_invoice_items_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_invoice_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InvoiceItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InvoiceItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InvoiceItems::InvoiceId).uuid().not_null())
                        .col(ColumnDef::new(InvoiceItems::Description).string().not_null())
                        .col(ColumnDef::new(InvoiceItems::Quantity).integer().not_null())
                        .col(ColumnDef::new(InvoiceItems::UnitPrice).decimal().not_null())
                        .col(ColumnDef::new(InvoiceItems::Amount).decimal().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoice_items_invoice_id")
                        .table(InvoiceItems::Table)
                        .col(InvoiceItems::InvoiceId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InvoiceItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum InvoiceItems {
        Table,
        Id,
        InvoiceId,
        Description,
        Quantity,
        UnitPrice,
        Amount,
    }
}

mod m20240101_000008_create_inventory_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_inventory_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryCategories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryCategories::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryCategories::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(InventoryCategories::Description).string().null())
                        .col(
                            ColumnDef::new(InventoryCategories::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryCategories::UpdatedAt)
                                .timestamp()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Suppliers::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Suppliers::Name).string().not_null())
                        .col(ColumnDef::new(Suppliers::ContactPerson).string().null())
                        .col(ColumnDef::new(Suppliers::Email).string().null())
                        .col(ColumnDef::new(Suppliers::Phone).string().null())
                        .col(ColumnDef::new(Suppliers::Address).string().null())
                        .col(ColumnDef::new(Suppliers::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Suppliers::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InventoryItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryItems::Name).string().not_null())
                        .col(ColumnDef::new(InventoryItems::Description).string().null())
                        .col(
                            ColumnDef::new(InventoryItems::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(InventoryItems::Unit).string().not_null())
                        .col(
                            ColumnDef::new(InventoryItems::ReorderLevel)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::UnitPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(InventoryItems::CategoryId).uuid().null())
                        .col(ColumnDef::new(InventoryItems::SupplierId).uuid().null())
                        .col(ColumnDef::new(InventoryItems::LastOrdered).date().null())
                        .col(
                            ColumnDef::new(InventoryItems::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryItems::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_category_id")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::CategoryId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_supplier_id")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::SupplierId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(InventoryCategories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum InventoryCategories {
        Table,
        Id,
        Name,
        Description,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Suppliers {
        Table,
        Id,
        Name,
        ContactPerson,
        Email,
        Phone,
        Address,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum InventoryItems {
        Table,
        Id,
        Name,
        Description,
        Quantity,
        Unit,
        ReorderLevel,
        UnitPrice,
        CategoryId,
        SupplierId,
        LastOrdered,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000009_create_messages_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000009_create_messages_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Messages::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Messages::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Messages::CaseId).uuid().not_null())
                        .col(ColumnDef::new(Messages::SenderId).uuid().not_null())
                        .col(ColumnDef::new(Messages::RecipientId).uuid().not_null())
                        .col(ColumnDef::new(Messages::Content).string().not_null())
                        .col(
                            ColumnDef::new(Messages::Read)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Messages::SentAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_messages_case_id")
                        .table(Messages::Table)
                        .col(Messages::CaseId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_messages_recipient_id")
                        .table(Messages::Table)
                        .col(Messages::RecipientId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Messages::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Messages {
        Table,
        Id,
        CaseId,
        SenderId,
        RecipientId,
        Content,
        Read,
        SentAt,
    }
}

mod m20240101_000010_create_appointments_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000010_create_appointments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Appointments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Appointments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Appointments::PatientId).uuid().not_null())
                        .col(ColumnDef::new(Appointments::DentistId).uuid().not_null())
                        .col(ColumnDef::new(Appointments::CaseId).uuid().null())
                        .col(
                            ColumnDef::new(Appointments::AppointmentDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Appointments::AppointmentTime)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Appointments::AppointmentType)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Appointments::Status).string().not_null())
                        .col(ColumnDef::new(Appointments::Notes).string().null())
                        .col(ColumnDef::new(Appointments::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Appointments::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_appointments_dentist_id")
                        .table(Appointments::Table)
                        .col(Appointments::DentistId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_appointments_date")
                        .table(Appointments::Table)
                        .col(Appointments::AppointmentDate)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Appointments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Appointments {
        Table,
        Id,
        PatientId,
        DentistId,
        CaseId,
        AppointmentDate,
        AppointmentTime,
        AppointmentType,
        Status,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}
