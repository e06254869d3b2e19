use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, LedgerReconciliation};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "eventzen_admin")]
#[command(about = "Admin utilities for Eventzen (migrations, ledger reconciliation)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./eventzen.db?mode=rwc"
    )]
    database_url: String,

    /// Tracing filter, e.g. `engine=debug`.
    #[arg(long, default_value = "engine=warn")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending migrations and exit.
    Migrate,
    /// Rebuild budget running totals from their expenses and incomes.
    Reconcile(ReconcileArgs),
}

#[derive(Args, Debug)]
struct ReconcileArgs {
    /// Only reconcile this budget.
    #[arg(long)]
    budget: Option<String>,
}

async fn connect_db(database_url: &str) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn print_report(report: &LedgerReconciliation) {
    if report.drifted() {
        println!(
            "{}: expenses {} -> {}, income {} -> {}",
            report.budget_id,
            report.expenses_before,
            report.expenses_after,
            report.income_before,
            report.income_after
        );
    } else {
        println!("{}: ok", report.budget_id);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log.as_str())
        .with_writer(std::io::stderr)
        .init();

    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::Migrate => {
            println!("migrations applied");
        }
        Command::Reconcile(args) => {
            let engine = Engine::builder().database(db).build().await?;
            let reports = match args.budget {
                Some(budget_id) => vec![engine.recompute_budget_totals(&budget_id).await?],
                None => engine.reconcile_all_budgets().await?,
            };

            for report in &reports {
                print_report(report);
            }
            let drifted = reports.iter().filter(|r| r.drifted()).count();
            println!("reconciled {} budgets, {drifted} repaired", reports.len());
        }
    }

    Ok(())
}
