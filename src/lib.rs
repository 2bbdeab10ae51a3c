//! # order-tracker
//!
//! Order tracking over a flat, comma-delimited record file.
//!
//! ## Overview
//!
//! - **Records**: one order per line, six fixed columns
//! - **Header**: an optional schema line, detected from its first character
//! - **Queries**: linear scans by id or by product substring
//! - **Mutations**: update and delete rewrite the whole file through a
//!   temporary file that is renamed into place, so a failure never leaves
//!   the file half-written
//!
//! ## Example
//!
//! ```
//! use order_tracker::{DeleteOutcome, Order, OrderStore};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = OrderStore::new(dir.path().join("orders.csv"));
//!
//! store.append(&Order::new(500, "Ann", "Widget", 1, 1.0, "01-02-2024")).unwrap();
//! store.append(&Order::new(500, "Ben", "Gadget", 2, 2.0, "02-02-2024")).unwrap();
//!
//! assert_eq!(store.find_by_product_substring("WIDGET").unwrap().len(), 1);
//!
//! let outcome = store.delete_selected(500, 2, true).unwrap();
//! assert!(matches!(outcome, DeleteOutcome::Deleted(_)));
//! assert_eq!(store.matches_for(500).unwrap().len(), 1);
//! ```

pub mod date;
pub mod error;
pub mod mutation;
pub mod prompt;
pub mod query;
pub mod record;
pub mod rewrite;
pub mod shell;
pub mod store;

pub use date::{DateFormat, DateRules};
pub use error::{Error, Result};
pub use mutation::{DeleteOutcome, OrderEdit, UpdateOutcome};
pub use prompt::Prompter;
pub use record::{DELIMITER, HEADER, Order, OrderField, TextLimit, sanitize_text};
pub use rewrite::{LineTransform, RemoveNth, ReplaceFirst};
pub use shell::Shell;
pub use store::{Line, OrderStore, RewriteSummary, StoreOptions};
