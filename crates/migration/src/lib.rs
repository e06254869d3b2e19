pub use sea_orm_migration::prelude::*;

mod m20250601_000001_ledger;
mod m20250601_000002_directory;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_ledger::Migration),
            Box::new(m20250601_000002_directory::Migration),
        ]
    }
}
