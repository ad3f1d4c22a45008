// src/lib.rs

//! Motor de documentos financeiros e impressão da Condutor Cabos.
//!
//! A interface gráfica e a persistência ficam de fora: este crate recebe o
//! registro já montado (fatura, devolução ou balanço), deriva os totais com
//! aritmética decimal exata, renderiza o PDF paginado e orquestra a
//! impressão (unitária ou em lote) com confirmação do operador e limpeza
//! dos arquivos temporários.

pub mod common;
pub mod config;
pub mod models;
pub mod services;
pub mod sinks;

// Reexports principais, para quem consome o motor não precisar decorar a
// árvore de módulos.
pub use common::error::AppError;
pub use config::{CompanyProfile, EngineConfig, PrintConfig, RenderConfig};
pub use models::documents::{DocumentKind, FinancialRecord, LineItem, RenderedDocument};
pub use models::print_job::{BatchFailure, BatchOutcome, CleanupReport, JobState, PrintJob};
pub use models::totals::{BalanceTotals, DerivedTotals, LineTotals, TradeTotals};
pub use services::cleanup_service::CleanupService;
pub use services::document_service::{DocumentRenderer, DocumentService};
pub use services::ledger_service::{derive_totals, derive_totals_lenient};
pub use services::print_service::PrintService;
pub use sinks::{ConfirmationGate, DesktopSink, OutputSink};
