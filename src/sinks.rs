pub mod desktop_sink;
pub use desktop_sink::DesktopSink;

use std::path::Path;

use async_trait::async_trait;

use crate::common::error::AppError;
use crate::models::documents::RenderedDocument;

// Os colaboradores externos do motor ficam atrás destes dois traits. A UI
// (ou um front headless) injeta as implementações nos serviços, do mesmo
// jeito que os repositórios são injetados nos serviços de dados.

/// Backend de saída: grava, lista impressoras, imprime e abre visualização.
#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn render_to_file(
        &self,
        document: &RenderedDocument,
        path: &Path,
    ) -> Result<(), AppError>;

    /// Lista possivelmente vazia; lote nenhum começa sem impressora.
    async fn list_available_printers(&self) -> Vec<String>;

    async fn send_to_printer(&self, path: &Path, printer_id: &str) -> Result<(), AppError>;

    /// Entrega o arquivo ao visualizador padrão do sistema.
    async fn open_for_preview(&self, path: &Path) -> Result<(), AppError>;
}

/// Gate síncrono de confirmação com o operador. `false`/`None` é recusa
/// limpa, nunca erro.
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;

    async fn choose(&self, prompt: &str, options: &[String]) -> Option<String>;
}
