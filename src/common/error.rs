// src/common/error.rs

use thiserror::Error;

// Nosso tipo de erro central, com `thiserror` para melhor ergonomia.
// Problemas na limpeza de temporários NÃO aparecem aqui: viram warning de
// tracing e a varredura segue em frente (melhor esforço, nunca bloqueia).
#[derive(Debug, Error)]
pub enum AppError {
    // Dados numéricos fora do contrato (quantidade negativa, desconto fora
    // de 0..=100, documento sem itens). Quem chamou corrige e reenvia.
    #[error("Registro inválido: {0}")]
    InvalidRecord(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    // Falha do backend de renderização. Sem novos dados não há retentativa
    // que resolva, então o job encerra em Failed.
    #[error("Falha ao renderizar o documento: {0}")]
    RenderFailure(String),

    #[error("Nenhuma impressora disponível")]
    NoPrinterAvailable,

    #[error("Falha no envio para a impressora: {0}")]
    SendFailure(String),

    #[error("Erro de E/S: {0}")]
    IoError(#[from] std::io::Error),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno: {0}")]
    InternalError(#[from] anyhow::Error),
}
