// src/sinks/desktop_sink.rs

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::common::error::AppError;
use crate::models::documents::RenderedDocument;
use crate::sinks::OutputSink;

/// Implementação padrão para o desktop: CUPS para imprimir e o visualizador
/// do sistema para a pré-visualização.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopSink;

#[async_trait]
impl OutputSink for DesktopSink {
    async fn render_to_file(
        &self,
        document: &RenderedDocument,
        path: &Path,
    ) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &document.bytes).await?;
        tracing::debug!(
            "{} nº {} gravado em {}",
            document.kind,
            document.document_number,
            path.display()
        );
        Ok(())
    }

    async fn list_available_printers(&self) -> Vec<String> {
        // `lpstat -e` devolve uma fila por linha. Sem CUPS (ou sem fila
        // nenhuma), a lista sai vazia e o orquestrador decide o que fazer.
        let output = match Command::new("lpstat").arg("-e").output().await {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                tracing::warn!("lpstat saiu com status {}", output.status);
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("lpstat indisponível: {}", e);
                return Vec::new();
            }
        };

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }

    async fn send_to_printer(&self, path: &Path, printer_id: &str) -> Result<(), AppError> {
        let status = Command::new("lp")
            .arg("-d")
            .arg(printer_id)
            .arg(path)
            .status()
            .await
            .map_err(|e| AppError::SendFailure(format!("não consegui executar lp: {e}")))?;

        if !status.success() {
            return Err(AppError::SendFailure(format!(
                "lp terminou com status {status} para {}",
                path.display()
            )));
        }
        Ok(())
    }

    async fn open_for_preview(&self, path: &Path) -> Result<(), AppError> {
        #[cfg(target_os = "macos")]
        let viewer = "open";
        #[cfg(not(target_os = "macos"))]
        let viewer = "xdg-open";

        // Só dispara o visualizador; ninguém espera ele fechar.
        Command::new(viewer).arg(path).spawn()?;
        Ok(())
    }
}
