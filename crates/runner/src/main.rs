//! `swapbench-runner` -- executes one benchmark run end to end.
//!
//! Loads the case set, registers the configured generation tools,
//! creates a run over the requested cases and tools, executes every
//! work item to a terminal state, and prints the final status report
//! as JSON on stdout.
//!
//! # Environment variables
//!
//! | Variable                  | Required | Default                    | Description                             |
//! |---------------------------|----------|----------------------------|-----------------------------------------|
//! | `DATABASE_URL`            | yes      | --                         | Postgres connection string              |
//! | `SWAPBENCH_CASE_FILE`     | no       | `datasets/test_cases.json` | Test case definitions                   |
//! | `SWAPBENCH_RUNS_DIR`      | no       | `runs`                     | Root directory for stored artifacts     |
//! | `SWAPBENCH_MAX_ITEMS`     | no       | `3`                        | Max concurrently executing work items   |
//! | `SWAPBENCH_CASES`         | no       | all known cases            | Comma-separated case id filter          |
//! | `SWAPBENCH_TOOLS`         | no       | all registered tools       | Comma-separated tool id filter          |
//! | `FACESWAP_API_URL`        | no       | --                         | Remote face-swap endpoint; registers the `remote_faceswap` tool when set |
//! | `FACESWAP_API_TOKEN`      | no       | --                         | Bearer token for the remote endpoint    |

use std::sync::Arc;

use swapbench_core::{CaseSet, WorkItemStore};
use swapbench_db::PgStore;
use swapbench_events::NotificationHub;
use swapbench_gateway::plugins::RemoteFaceSwap;
use swapbench_gateway::{PluginGateway, ToolRegistry};
use swapbench_runner::{
    FsArtifactStore, PixelStatScorer, RunCoordinator, DEFAULT_MAX_CONCURRENT_ITEMS,
};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CASE_FILE: &str = "datasets/test_cases.json";
const DEFAULT_RUNS_DIR: &str = "runs";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swapbench_runner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        tracing::error!("DATABASE_URL environment variable is required");
        std::process::exit(1);
    });

    let pool = match swapbench_db::create_pool(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            std::process::exit(1);
        }
    };
    if let Err(e) = swapbench_db::run_migrations(&pool).await {
        tracing::error!(error = %e, "Failed to run migrations");
        std::process::exit(1);
    }
    if let Err(e) = swapbench_db::health_check(&pool).await {
        tracing::error!(error = %e, "Database health check failed");
        std::process::exit(1);
    }

    let case_file =
        std::env::var("SWAPBENCH_CASE_FILE").unwrap_or_else(|_| DEFAULT_CASE_FILE.into());
    let cases = match CaseSet::load(&case_file) {
        Ok(cases) => cases,
        Err(e) => {
            tracing::error!(path = %case_file, error = %e, "Failed to load case file");
            std::process::exit(1);
        }
    };
    tracing::info!(path = %case_file, cases = cases.len(), "Case set loaded");

    let mut registry = ToolRegistry::new();
    if let Ok(endpoint) = std::env::var("FACESWAP_API_URL") {
        let token = std::env::var("FACESWAP_API_TOKEN").ok();
        registry.register(
            "remote_faceswap",
            Arc::new(RemoteFaceSwap::new(endpoint, token)),
        );
    }
    if registry.is_empty() {
        tracing::error!("No generation tools configured; set FACESWAP_API_URL");
        std::process::exit(1);
    }
    tracing::info!(tools = ?registry.tool_ids(), "Tool registry ready");

    let runs_dir = std::env::var("SWAPBENCH_RUNS_DIR").unwrap_or_else(|_| DEFAULT_RUNS_DIR.into());
    let max_items: usize = std::env::var("SWAPBENCH_MAX_ITEMS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_CONCURRENT_ITEMS);

    let case_filter = id_filter("SWAPBENCH_CASES");
    let tool_filter = id_filter("SWAPBENCH_TOOLS");

    let store: Arc<dyn WorkItemStore> = Arc::new(PgStore::new(pool));
    let coordinator = RunCoordinator::new(
        store,
        Arc::new(PluginGateway::new(Arc::new(registry))),
        Arc::new(NotificationHub::new()),
        Arc::new(PixelStatScorer),
        Arc::new(FsArtifactStore::new(runs_dir)),
        Arc::new(cases),
    )
    .with_max_concurrent(max_items);

    let run_id = match coordinator.run(case_filter, tool_filter).await {
        Ok(run_id) => run_id,
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            std::process::exit(1);
        }
    };

    match coordinator.run_status(run_id).await {
        Ok(status) => match serde_json::to_string_pretty(&status) {
            Ok(report) => println!("{report}"),
            Err(e) => tracing::error!(error = %e, "Failed to serialize status report"),
        },
        Err(e) => tracing::error!(run_id, error = %e, "Failed to load run status"),
    }
}

/// Parse a comma-separated id list from an environment variable.
fn id_filter(var: &str) -> Option<Vec<String>> {
    let raw = std::env::var(var).ok()?;
    let ids: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}
