//! `kitchen-seed`: load starter content into the configured store.
//!
//! ```text
//! kitchen-seed                         seed the menu and tiffin week
//! kitchen-seed --hash-password <pw>    print an ADMIN_PASSWORD_HASH value
//! ```

use anyhow::Context;
use kitchen_api::auth::password::hash_password;
use kitchen_api::seed::seed_store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kitchen_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [flag, password] = args.as_slice() {
        if flag == "--hash-password" {
            let hash = hash_password(password)
                .map_err(|e| anyhow::anyhow!("could not hash password: {e}"))?;
            println!("{hash}");
            return Ok(());
        }
    }
    if !args.is_empty() {
        anyhow::bail!("usage: kitchen-seed [--hash-password <password>]");
    }

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL needs to be provided")?;
    let pool = kitchen_db::create_pool(&database_url)
        .await
        .context("could not connect to db")?;
    kitchen_db::run_migrations(&pool)
        .await
        .context("could not apply migrations")?;

    let store = kitchen_db::PgDocumentStore::new(pool);
    let today = chrono::Local::now().date_naive();
    let report = seed_store(&store, today).await.context("seeding failed")?;

    println!(
        "menu: {}, tiffin days: {}",
        if report.menu { "written" } else { "kept" },
        report.tiffin_days
    );
    Ok(())
}
