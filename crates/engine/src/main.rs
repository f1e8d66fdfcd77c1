//! SkillQuest Engine - Main entry point.
//!
//! Loads the catalog and local snapshot, reconciles with the progress
//! service when a learner is configured, saves, and reports progress.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skillquest_engine::{App, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skillquest_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SkillQuest Engine");

    let config = AppConfig::from_env();
    tracing::info!(
        catalog = %config.catalog_path.display(),
        snapshot = %config.snapshot_path.display(),
        user_id = ?config.user_id,
        "Configuration loaded"
    );

    let mut app = App::from_config(&config).await?;

    if app.engine().user_id().is_some() {
        if let Err(e) = app.engine_mut().sync_progress().await {
            tracing::warn!(error = %e, "Continuing with local progress");
        }
    }

    // Failures are logged inside persist; memory state is still valid.
    let _ = app.persist().await;

    let progress = app.engine().progress();
    tracing::info!(
        total_xp = progress.total_xp(),
        level = progress.level(),
        badges = progress.badges().len(),
        current_level = ?progress.current_level(),
        "Learner progress"
    );
    for summary in app.course_summaries() {
        tracing::info!(
            course_id = %summary.course_id,
            title = %summary.title,
            completed = summary.completed,
            total = summary.total,
            "Course progress"
        );
    }

    app.shutdown().await;
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
