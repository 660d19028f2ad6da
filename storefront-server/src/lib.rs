//! Storefront Server - retail order placement and fulfillment
//!
//! # Architecture
//!
//! - **Checkout** (`checkout`): order intake, status lifecycle, identity
//!   resolution and anonymous tracking
//! - **Inventory** (`inventory`): atomic stock reservation and release
//! - **Database** (`db`): embedded SurrealDB storage and repositories
//! - **Notifications** (`notify`): best-effort collaborator calls
//! - **HTTP API** (`api`): RESTful interface
//!
//! # Module structure
//!
//! ```text
//! storefront-server/src/
//! ├── core/       # configuration, state, server
//! ├── auth/       # identity claims extractors
//! ├── api/        # HTTP routes and handlers
//! ├── checkout/   # order workflow
//! ├── inventory/  # stock ledger
//! ├── notify/     # notification collaborator
//! ├── db/         # database layer
//! └── utils/      # errors, logging, helpers
//! ```

pub mod api;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod db;
pub mod inventory;
pub mod notify;
pub mod utils;

// Re-export public types
pub use auth::CurrentUser;
pub use checkout::{OrderIntake, OrderLifecycle, OrderVerifier};
pub use core::{Config, Server, ServerState};
pub use inventory::InventoryLedger;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Set up the process environment: dotenv and logging
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
   _____ __                  ____                 __
  / ___// /_____  ________  / __/________  ____  / /_
  \__ \/ __/ __ \/ ___/ _ \/ /_/ ___/ __ \/ __ \/ __/
 ___/ / /_/ /_/ / /  /  __/ __/ /  / /_/ / / / / /_
/____/\__/\____/_/   \___/_/ /_/   \____/_/ /_/\__/
    "#
    );
}
