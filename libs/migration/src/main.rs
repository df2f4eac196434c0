use migration::Migrator;
use sea_orm_migration::cli;

/// sea-orm-migration CLI (`up`, `down`, `status`, `fresh`) reading `DATABASE_URL`.
#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
