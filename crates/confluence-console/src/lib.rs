//! Confluence Console — the admin review surface.
//!
//! Fetches submitted applications, runs them through the filter and
//! sort pipeline, paginates, records approve/reject decisions, and
//! exports a filtered spreadsheet. Access goes through [`gate::AdminGate`].

pub mod console;
pub mod export;
pub mod filter;
pub mod gate;

pub use console::{AdminConsole, PageView};
pub use filter::{ConsoleFilter, PAGE_SIZE, SortKey};
pub use gate::{AdminCredentials, AdminGate, AdminToken};
