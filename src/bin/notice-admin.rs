//! Browse and delete notice board entries straight from the database.
//!
//! Usage:
//!   notice-admin days [--date YYYY-MM-DD]
//!   notice-admin announcements [--date YYYY-MM-DD]
//!   notice-admin delete-day <ID>
//!   notice-admin delete-announcement <ID>

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use notice_board_api::{db, services::admin::AdminService, store::PgNoticeStore};

#[derive(Parser)]
#[command(name = "notice-admin", about = "Browse and delete notice board entries")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List days, most recent first
    Days {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List announcements with the date they belong to
    Announcements {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete a day and all of its announcements
    DeleteDay { id: Uuid },
    /// Delete a single announcement
    DeleteAnnouncement { id: Uuid },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL environment variable not set")?;
    let pool = db::create_pool(&database_url).await?;
    let store = PgNoticeStore::new(pool);

    match args.command {
        Command::Days { date } => {
            let days = AdminService::list_days(&store, date).await?;
            for day in &days {
                println!(
                    "{}  {}  {:<9}  order {:<3}  count {:>4}",
                    day.id, day.notice_date, day.day_name, day.day_order, day.day_count
                );
            }
            tracing::info!("{} day(s)", days.len());
        }
        Command::Announcements { date } => {
            let rows = AdminService::list_announcements(&store, date).await?;
            for row in &rows {
                println!("{}  {}  {}: {}", row.id, row.notice_date, row.title, row.message);
            }
            tracing::info!("{} announcement(s)", rows.len());
        }
        Command::DeleteDay { id } => {
            AdminService::delete_day(&store, id).await?;
        }
        Command::DeleteAnnouncement { id } => {
            AdminService::delete_announcement(&store, id).await?;
        }
    }

    Ok(())
}
