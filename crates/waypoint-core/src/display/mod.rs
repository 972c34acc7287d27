//! Display formatting for flows, steps and analysis reports.
//!
//! Domain types implement [`std::fmt::Display`] directly (see [`models`]);
//! collections and status messages go through small wrapper types. All output
//! is markdown, rendered by the CLI either richly or as plain text.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │  Wrapper Types  │    │   Formatted     │
//! │  (Flow, Step)   │───▶│ (FlowList, ...) │───▶│    Output       │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (FlowList)
//! - [`status`]: Status and confirmation messages (OperationStatus)
//! - [`datetime`]: Date/time formatting utilities
//! - [`models`]: Display implementations for domain models
//!
//! ## Usage Examples
//!
//! ```rust
//! use waypoint_core::display::{FlowList, OperationStatus};
//!
//! let empty = FlowList(Vec::new());
//! assert_eq!(format!("{empty}"), "No flows found.\n");
//!
//! let status = OperationStatus::failure("Flow not found.".to_string());
//! assert_eq!(format!("{status}"), "Error: Flow not found.\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod status;

pub use collections::FlowList;
pub use datetime::LocalDateTime;
pub use status::OperationStatus;
