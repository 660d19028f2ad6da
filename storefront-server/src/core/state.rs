use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::checkout::{OrderIntake, OrderLifecycle, OrderVerifier};
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{OrderRepository, ProductRepository};
use crate::inventory::InventoryLedger;
use crate::notify::{NoopNotifier, Notifier, WebhookNotifier};

/// Server state - shared references to every service
///
/// Cloning is shallow; all services sit behind `Arc`.
///
/// | Field | Role |
/// |-------|------|
/// | config | immutable configuration |
/// | db | embedded database handle |
/// | ledger | stock reservation/release |
/// | intake | order placement |
/// | lifecycle | status transitions, payment confirmation |
/// | verifier | anonymous tracking |
/// | notifier | best-effort notification collaborator |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub ledger: Arc<InventoryLedger>,
    pub intake: Arc<OrderIntake>,
    pub lifecycle: Arc<OrderLifecycle>,
    pub verifier: Arc<OrderVerifier>,
    pub notifier: Arc<dyn Notifier>,
}

impl ServerState {
    /// Initialize the server state
    ///
    /// Order of construction: working directory, database, notifier, then
    /// the checkout services on top of both.
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        config
            .ensure_work_dir_structure()
            .context("Failed to create work directory structure")?;

        let db_path = config.database_dir().join("storefront.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .context("Failed to initialize database")?;
        let db = db_service.db;

        let notifier: Arc<dyn Notifier> = match &config.notify_endpoint {
            Some(endpoint) => {
                tracing::info!(endpoint = %endpoint, "Notifications enabled");
                Arc::new(WebhookNotifier::new(endpoint.clone()))
            }
            None => {
                tracing::info!("No notification endpoint configured");
                Arc::new(NoopNotifier)
            }
        };

        Ok(Self::with_services(config.clone(), db, notifier))
    }

    /// Wire the checkout services over an existing database handle and
    /// notifier
    pub fn with_services(config: Config, db: Surreal<Db>, notifier: Arc<dyn Notifier>) -> Self {
        let notify_timeout = Duration::from_millis(config.notify_timeout_ms);

        let products = ProductRepository::new(db.clone());
        let orders = OrderRepository::new(db.clone());
        let ledger = Arc::new(InventoryLedger::new(products));

        let intake = Arc::new(OrderIntake::new(
            ledger.clone(),
            orders.clone(),
            notifier.clone(),
            notify_timeout,
        ));
        let lifecycle = Arc::new(OrderLifecycle::new(
            orders.clone(),
            notifier.clone(),
            notify_timeout,
        ));
        let verifier = Arc::new(OrderVerifier::new(orders));

        Self {
            config,
            db,
            ledger,
            intake,
            lifecycle,
            verifier,
            notifier,
        }
    }
}
