pub mod documents;
pub use documents::{DocumentKind, FinancialRecord, LineItem, RenderedDocument};
pub mod totals;
pub use totals::{BalanceTotals, DerivedTotals, LineTotals, TradeTotals};
pub mod print_job;
pub use print_job::{BatchFailure, BatchOutcome, CleanupReport, JobState, PrintJob};
