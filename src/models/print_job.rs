// src/models/print_job.rs

use std::path::PathBuf;

use serde::Serialize;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::documents::DocumentKind;

// --- Enums ---

/// Ciclo de vida de um pedido de impressão. `Declined` é encerramento limpo
/// (o operador disse não), só `Failed` carrega causa de erro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobState {
    Requested,
    Rendering,
    Previewed,
    ConfirmationPending,
    Confirmed,
    Declined,
    Sending,
    Sent,
    Failed,
}

// --- Structs ---

/// Uma instância de "transformar registro em papel". Criado por pedido,
/// nunca reaproveitado entre pedidos.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintJob {
    pub id: Uuid,
    pub kind: DocumentKind,
    pub document_number: i64,
    pub output_path: Option<PathBuf>,
    pub state: JobState,
    /// Causa registrada quando o estado é `Failed`.
    pub failure: Option<String>,
}

impl PrintJob {
    pub fn new(kind: DocumentKind, document_number: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            document_number,
            output_path: None,
            state: JobState::Requested,
            failure: None,
        }
    }

    pub(crate) fn advance(&mut self, state: JobState) {
        tracing::debug!(
            "Job {} ({} nº {}): {:?} -> {:?}",
            self.id,
            self.kind,
            self.document_number,
            self.state,
            state
        );
        self.state = state;
    }

    /// Encerra o job em `Failed` guardando a causa; nunca engolimos o erro.
    pub(crate) fn fail(&mut self, cause: &AppError) {
        tracing::error!(
            "Job {} ({} nº {}) falhou: {}",
            self.id,
            self.kind,
            self.document_number,
            cause
        );
        self.failure = Some(cause.to_string());
        self.state = JobState::Failed;
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            JobState::Sent | JobState::Failed | JobState::Declined
        )
    }
}

/// Resultado agregado de um lote: quantos saíram e quem falhou (com causa).
/// Falha parcial é esperada e reportada por inteiro, nunca aborta o lote.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub success_count: usize,
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    pub document_number: i64,
    pub cause: String,
}

/// Contagem da varredura de temporários.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    /// Arquivos que batem com a convenção de nome.
    pub examined: usize,
    pub removed: usize,
    /// Remoções que falharam (ficam para a próxima varredura).
    pub skipped: usize,
}
