pub mod ledger_service;
pub mod document_service;
pub use document_service::{DocumentRenderer, DocumentService};
pub mod print_service;
pub use print_service::PrintService;
pub mod cleanup_service;
pub use cleanup_service::CleanupService;
