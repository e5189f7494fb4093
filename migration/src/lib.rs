pub use sea_orm_migration::prelude::*;

mod m20260105_000000_create_schema_and_base_db_setup;
mod m20260105_000001_create_learning_tables;
mod m20260112_000000_add_sorting_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000000_create_schema_and_base_db_setup::Migration),
            Box::new(m20260105_000001_create_learning_tables::Migration),
            Box::new(m20260112_000000_add_sorting_indexes::Migration),
        ]
    }
}
