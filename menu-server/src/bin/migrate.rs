//! menu-migrate: schema migrations and sample data
//!
//! ```text
//! menu-migrate up
//! menu-migrate down 2
//! menu-migrate status
//! menu-migrate seed
//! menu-migrate reset --yes
//! ```

use chrono::{DateTime, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use serde_json::json;
use shared::models::restaurant::NewOperatingHour;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use std::collections::HashMap;

use menu_server::Config;
use menu_server::db;
use menu_server::db::content::NewContent;
use menu_server::db::restaurant::NewRestaurant;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Parser)]
#[command(name = "menu-migrate", version, about = "Menu database migrations")]
struct Cli {
    /// Overrides DATABASE_URL / DB_* settings
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply all pending migrations
    Up,
    /// Revert the most recent migrations
    Down {
        #[arg(default_value_t = 1)]
        steps: usize,
    },
    /// Show the current schema version
    Version,
    /// List applied and pending migrations
    Status,
    /// Insert sample restaurant data
    Seed,
    /// Revert every migration, then apply all again
    Reset {
        /// Confirm the reset; all data is lost
        #[arg(long)]
        yes: bool,
    },
}

#[derive(sqlx::FromRow)]
struct AppliedMigration {
    version: i64,
    description: String,
    installed_on: DateTime<Utc>,
    success: bool,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "menu_migrate=info,menu_server=info,sqlx=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let database_url = match cli.database_url {
        Some(url) => url,
        None => Config::from_env()?.database_url,
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await?;

    match cli.command {
        Command::Up => up(&pool).await?,
        Command::Down { steps } => down(&pool, steps).await?,
        Command::Version => version(&pool).await?,
        Command::Status => status(&pool).await?,
        Command::Seed => seed(&pool).await?,
        Command::Reset { yes } => {
            if !yes {
                return Err("reset drops all data; re-run with --yes to confirm".into());
            }
            down(&pool, usize::MAX).await?;
            up(&pool).await?;
        }
    }

    pool.close().await;
    Ok(())
}

async fn applied(pool: &PgPool) -> Result<Vec<AppliedMigration>, BoxError> {
    let exists: bool =
        sqlx::query_scalar("SELECT to_regclass('public._sqlx_migrations') IS NOT NULL")
            .fetch_one(pool)
            .await?;
    if !exists {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, AppliedMigration>(
        "SELECT version, description, installed_on, success FROM _sqlx_migrations ORDER BY version",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn up(pool: &PgPool) -> Result<(), BoxError> {
    let before = applied(pool).await?.len();
    MIGRATOR.run(pool).await?;
    let after = applied(pool).await?.len();
    tracing::info!(applied = after.saturating_sub(before), "Migrations up to date");
    Ok(())
}

/// Version to undo down to after reverting `steps` of `versions` (ascending)
fn undo_target(versions: &[i64], steps: usize) -> i64 {
    if steps >= versions.len() {
        0
    } else {
        versions[versions.len() - steps - 1]
    }
}

async fn down(pool: &PgPool, steps: usize) -> Result<(), BoxError> {
    let versions: Vec<i64> = applied(pool).await?.iter().map(|m| m.version).collect();
    if versions.is_empty() || steps == 0 {
        tracing::info!("Nothing to revert");
        return Ok(());
    }

    let target = undo_target(&versions, steps);
    MIGRATOR.undo(pool, target).await?;
    tracing::info!(
        reverted = steps.min(versions.len()),
        version = target,
        "Migrations reverted"
    );
    Ok(())
}

async fn version(pool: &PgPool) -> Result<(), BoxError> {
    match applied(pool).await?.last() {
        Some(m) => println!("version: {} (dirty: {})", m.version, !m.success),
        None => println!("version: none"),
    }
    Ok(())
}

async fn status(pool: &PgPool) -> Result<(), BoxError> {
    let applied: HashMap<i64, AppliedMigration> = applied(pool)
        .await?
        .into_iter()
        .map(|m| (m.version, m))
        .collect();

    for migration in MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
    {
        match applied.get(&migration.version) {
            Some(m) => println!(
                "[applied] {} {} ({}){}",
                m.version,
                m.description,
                m.installed_on.format("%Y-%m-%d %H:%M:%S"),
                if m.success { "" } else { " DIRTY" }
            ),
            None => println!("[pending] {} {}", migration.version, migration.description),
        }
    }
    Ok(())
}

fn daily_hours() -> Result<Vec<NewOperatingHour>, BoxError> {
    let open = NaiveTime::from_hms_opt(9, 0, 0).ok_or("invalid open time")?;
    let close = NaiveTime::from_hms_opt(23, 0, 0).ok_or("invalid close time")?;
    let late_close = NaiveTime::from_hms_opt(23, 59, 0).ok_or("invalid close time")?;

    // 0 = Sunday; Friday and Saturday stay open late
    Ok((0..7)
        .map(|day| NewOperatingHour {
            day_of_week: day,
            open_time: Some(open),
            close_time: Some(if day == 5 || day == 6 { late_close } else { close }),
            is_closed: false,
        })
        .collect())
}

async fn seed(pool: &PgPool) -> Result<(), BoxError> {
    if db::restaurant::any_exists(pool).await? {
        tracing::info!("Restaurant already present, skipping seed");
        return Ok(());
    }

    let restaurant = db::restaurant::insert(
        pool,
        &NewRestaurant {
            name: "Al Noor Kitchen".into(),
            description: "Modern Emirati and Levantine dishes in the heart of Dubai".into(),
            address: json!({
                "street": "Sheikh Zayed Road",
                "city": "Dubai",
                "country": "United Arab Emirates",
                "postal_code": "00000"
            }),
            contact_info: json!({
                "phone": "+971 4 000 0000",
                "email": "hello@alnoor.example",
                "website": "https://alnoor.example"
            }),
            settings: json!({
                "currency": "AED",
                "timezone": "Asia/Dubai",
                "language": "en"
            }),
        },
    )
    .await?;

    db::restaurant::replace_hours(pool, restaurant.id, &daily_hours()?).await?;

    let sections = [
        NewContent {
            section_name: "hero".into(),
            title: "Welcome to Al Noor".into(),
            content: "Fresh ingredients, family recipes and a view of the city.".into(),
            metadata: json!({ "cta_text": "View menu", "cta_link": "/menu" }),
            image_url: String::new(),
            active: true,
        },
        NewContent {
            section_name: "about".into(),
            title: "Our story".into(),
            content: "Serving Dubai since 2010 with dishes from across the region.".into(),
            metadata: json!({}),
            image_url: String::new(),
            active: true,
        },
    ];
    for section in &sections {
        db::content::insert(pool, section).await?;
    }

    tracing::info!(restaurant_id = restaurant.id, "Seed data inserted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_target() {
        let versions = [1, 2, 3];
        assert_eq!(undo_target(&versions, 1), 2);
        assert_eq!(undo_target(&versions, 2), 1);
        assert_eq!(undo_target(&versions, 3), 0);
        assert_eq!(undo_target(&versions, usize::MAX), 0);
    }

    #[test]
    fn test_daily_hours() {
        let hours = daily_hours().unwrap();
        assert_eq!(hours.len(), 7);
        assert_eq!(hours[0].close_time, NaiveTime::from_hms_opt(23, 0, 0));
        assert_eq!(hours[5].close_time, NaiveTime::from_hms_opt(23, 59, 0));
        assert_eq!(hours[6].close_time, NaiveTime::from_hms_opt(23, 59, 0));
        assert!(hours.iter().all(|h| !h.is_closed));
    }
}
