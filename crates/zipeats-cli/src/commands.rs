//! Command handlers, called from `main` once config and logging are set up.

use std::sync::Arc;

use zipeats_core::{classify, AppConfig, RestaurantRecord};
use zipeats_db::{MemorySnapshotStore, PgSnapshotStore, SnapshotStore};
use zipeats_pipeline::{Pipeline, Source};

/// Apply pending migrations to the configured database.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset, the database is unreachable,
/// or a migration fails.
pub(crate) async fn run_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = zipeats_db::connect_pool_from_config(config).await?;
    let applied = zipeats_db::run_migrations(&pool).await?;
    println!("applied {applied} migration(s)");
    Ok(())
}

/// Run the lookup pipeline for one zip code and print the result.
///
/// Without `DATABASE_URL` the run uses a throwaway in-memory store, so
/// nothing is cached between invocations.
///
/// # Errors
///
/// Returns an error if the database cannot be reached or the pipeline fails
/// at the request level (validation, configuration, provider, network).
pub(crate) async fn run_search(
    config: &AppConfig,
    zip: &str,
    refresh: bool,
    json: bool,
) -> anyhow::Result<()> {
    let store: Arc<dyn SnapshotStore> = if config.database_url.is_some() {
        let pool = zipeats_db::connect_pool_from_config(config).await?;
        Arc::new(PgSnapshotStore::new(pool))
    } else {
        tracing::warn!("DATABASE_URL not set; results will not be cached");
        Arc::new(MemorySnapshotStore::new())
    };

    let pipeline = Pipeline::from_config(config, store)?;
    let outcome = pipeline.run(zip, refresh).await?;

    if json {
        let body = serde_json::json!({ "restaurants": outcome.restaurants });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    match outcome.source {
        Source::Cache {
            snapshot_id,
            retrieved_at,
        } => println!(
            "{} restaurant(s) for {} from snapshot #{snapshot_id} ({})",
            outcome.restaurants.len(),
            outcome.zip_code,
            retrieved_at.format("%Y-%m-%d %H:%M UTC"),
        ),
        Source::Fresh { snapshot_id } => println!(
            "{} restaurant(s) for {} from the provider ({})",
            outcome.restaurants.len(),
            outcome.zip_code,
            snapshot_id.map_or_else(|| "not saved".to_string(), |id| format!("saved as #{id}")),
        ),
    }
    print_table(&outcome.restaurants);
    Ok(())
}

/// Print metadata for the latest stored snapshot of `zip`.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset or the query fails.
pub(crate) async fn run_history(config: &AppConfig, zip: &str) -> anyhow::Result<()> {
    let pool = zipeats_db::connect_pool_from_config(config).await?;
    let zip = zip.trim();

    match zipeats_db::latest_snapshot(&pool, zip).await? {
        Some(snapshot) => {
            println!(
                "snapshot #{} for {}: {} restaurant(s), retrieved {}",
                snapshot.id,
                snapshot.zip_code,
                snapshot.restaurants.len(),
                snapshot.retrieved_at.format("%Y-%m-%d %H:%M:%S UTC"),
            );
            if !snapshot.is_usable() {
                println!("(empty snapshot: the next lookup will refetch)");
            }
            print_table(&snapshot.restaurants);
        }
        None => println!("no snapshots stored for {zip}"),
    }
    Ok(())
}

pub(crate) fn run_classify(name: &str, tags: &[String]) {
    println!("{}", classify(name, tags));
}

fn print_table(restaurants: &[RestaurantRecord]) {
    for (i, r) in restaurants.iter().enumerate() {
        println!(
            "{:>3}. {:<40} {:<15} {:<5} {}",
            i + 1,
            r.name,
            r.genre.as_str(),
            r.price_level.map_or_else(|| "-".to_string(), |p| p.to_string()),
            match r.is_open {
                Some(true) => "open",
                Some(false) => "closed",
                None => "unknown",
            },
        );
    }
}
