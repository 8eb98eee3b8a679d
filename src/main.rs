use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use scrap_ledger::{
    auth::Actor,
    config::{database, settings},
    core::{
        monthly::format_commission_summary,
        report::{ExpenseFilter, PurchaseFilter, render_period_summary},
        user::ensure_admin,
    },
    entities::{ApprovalStatus, PaymentMethod},
    errors::Result,
    service::{AppContext, commissions, reports},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Purchasing ledger for a scrap yard.
#[derive(Debug, Parser)]
#[command(name = "scrap-ledger", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the schema and seed the administrator
    Init,
    /// Calculate every buyer's commission for a YYYY-MM month
    Commissions {
        /// Reference month, e.g. 2024-03
        month: String,
    },
    /// Print a report
    Report {
        #[command(subcommand)]
        report: ReportCommand,
    },
}

#[derive(Debug, Subcommand)]
enum ReportCommand {
    /// Purchases, newest first
    Purchases {
        /// First day included (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day included (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Only this supplier id
        #[arg(long)]
        supplier: Option<i64>,
        /// Only this approval status
        #[arg(long)]
        status: Option<ApprovalStatus>,
    },
    /// Expenses, newest first
    Expenses {
        /// First day included (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day included (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Only this payment method
        #[arg(long)]
        method: Option<PaymentMethod>,
    },
    /// Purchases against expenses over a period
    Summary {
        /// First day included (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last day included (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dotenv().ok();
    let cli = Cli::parse();

    let settings = settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {e}"))?;

    if std::env::var("DATABASE_URL").is_err() {
        std::fs::create_dir_all("data")?;
    }
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db).await?;

    let admin = ensure_admin(&db, &settings.admin.name, &settings.admin.email).await?;
    let actor = Actor::from(&admin);
    let ctx = AppContext::new(db, settings);

    match cli.command {
        Command::Init => {
            info!(admin_id = admin.id, "database ready");
            println!("Database ready. Administrator: {} <{}>", admin.name, admin.email);
        }
        Command::Commissions { month } => {
            let run = commissions::calculate_all(&ctx, &actor, &month).await?;
            println!("{}", format_commission_summary(&run)?);
        }
        Command::Report { report } => {
            let text = match report {
                ReportCommand::Purchases {
                    from,
                    to,
                    supplier,
                    status,
                } => {
                    let filter = PurchaseFilter {
                        from,
                        to,
                        supplier_id: supplier,
                        approval_status: status,
                    };
                    reports::purchase_report(&ctx, &actor, &filter).await?
                }
                ReportCommand::Expenses { from, to, method } => {
                    let filter = ExpenseFilter {
                        from,
                        to,
                        payment_method: method,
                        ..Default::default()
                    };
                    reports::expense_report(&ctx, &actor, &filter).await?
                }
                ReportCommand::Summary { from, to } => {
                    let summary = reports::summary(&ctx, &actor, from, to).await?;
                    render_period_summary(&summary)?
                }
            };
            println!("{text}");
        }
    }

    Ok(())
}
