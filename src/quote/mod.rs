//! Quote funnel state: the session state machine and the manual item catalog.

pub mod catalog;
pub mod session;

pub use catalog::{CatalogCategory, ManualSelection, CATALOG};
pub use session::{QuoteSession, SessionError};
