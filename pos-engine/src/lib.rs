//! Restaurant POS engine
//!
//! In-memory point of sale for a small restaurant: table service and counter
//! orders, kitchen display, payments, cash register cuts, inventory, staff,
//! notifications and sales reports.
//!
//! # Module layout
//!
//! ```text
//! pos-engine/src/
//! ├── core/           # Config, engine, background tasks, demo data
//! ├── cart/           # Line-item aggregation
//! ├── menu/           # Dishes, categories, customizations
//! ├── orders/         # Order book and counter board
//! ├── kitchen/        # Kitchen display tickets
//! ├── payments/       # Simulated payment processing
//! ├── register/       # Cash register and cuts
//! ├── tables/         # Floor plan, reservations, table timers
//! ├── inventory/      # Stock levels
//! ├── staff/          # Staff roster
//! ├── notifications/  # In-app notifications
//! ├── reports/        # Sales reports and export
//! ├── routes.rs       # Screen routes
//! ├── money/          # Decimal money helpers
//! └── utils/          # Logging, validation
//! ```

pub mod cart;
pub mod core;
pub mod inventory;
pub mod kitchen;
pub mod menu;
pub mod money;
pub mod notifications;
pub mod orders;
pub mod payments;
pub mod register;
pub mod reports;
pub mod routes;
pub mod staff;
pub mod tables;
pub mod utils;

// Re-export common types
pub use cart::{Cart, LineIdentity, MenuItemRef};
pub use core::{BackgroundTasks, Config, PosEngine};
pub use orders::OrderBook;
pub use routes::Route;
pub use utils::{AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};
