// src/services/print_service.rs

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;

use crate::{
    common::error::AppError,
    config::PrintConfig,
    models::documents::{FinancialRecord, RenderedDocument},
    models::print_job::{BatchFailure, BatchOutcome, JobState, PrintJob},
    services::document_service::DocumentRenderer,
    services::ledger_service,
    sinks::{ConfirmationGate, OutputSink},
};

/// Orquestra o ciclo de vida de impressão: pré-visualizar, imprimir um
/// documento ou um lote inteiro. Renderizador, sink e gate chegam
/// injetados: este serviço só sequencia o fluxo.
///
/// Tudo roda em sequência: um documento por vez, sem fila em background.
/// Os gates são pontos de suspensão; cancelar é responder "não" neles.
#[derive(Clone)]
pub struct PrintService<R, S, G> {
    renderer: R,
    sink: S,
    gate: G,
    config: PrintConfig,
}

impl<R, S, G> PrintService<R, S, G>
where
    R: DocumentRenderer,
    S: OutputSink,
    G: ConfirmationGate,
{
    pub fn new(renderer: R, sink: S, gate: G, config: PrintConfig) -> Self {
        Self {
            renderer,
            sink,
            gate,
            config,
        }
    }

    /// Renderiza e entrega ao visualizador padrão, sem imprimir nada.
    /// Aceita documento sem itens (a tabela sai só com o cabeçalho).
    pub async fn preview(&self, record: &FinancialRecord) -> Result<PrintJob, AppError> {
        let mut job = PrintJob::new(record.kind(), record.document_number());

        let totals = match ledger_service::derive_totals_lenient(record) {
            Ok(t) => t,
            Err(e) => {
                job.fail(&e);
                return Err(e);
            }
        };

        job.advance(JobState::Rendering);
        let rendered = match self.renderer.render(record, &totals) {
            Ok(r) => r,
            Err(e) => {
                job.fail(&e);
                return Err(e);
            }
        };

        let path = self.temp_output_path(&rendered);
        if let Err(e) = self.sink.render_to_file(&rendered, &path).await {
            job.fail(&e);
            return Err(e);
        }
        job.output_path = Some(path.clone());

        if let Err(e) = self.sink.open_for_preview(&path).await {
            job.fail(&e);
            return Err(e);
        }

        job.advance(JobState::Previewed);
        Ok(job)
    }

    /// Fluxo completo de impressão de um documento, com os dois gates
    /// (confirmação e escolha de impressora). Recusa em qualquer gate
    /// encerra o job em `Declined`, caminho limpo, não erro.
    pub async fn print(&self, record: &FinancialRecord) -> Result<PrintJob, AppError> {
        let mut job = PrintJob::new(record.kind(), record.document_number());

        // Valida antes de qualquer renderização: registro ruim volta já.
        let totals = match ledger_service::derive_totals(record) {
            Ok(t) => t,
            Err(e) => {
                job.fail(&e);
                return Err(e);
            }
        };

        // Sem impressora também não vale a pena gastar renderização.
        let printers = self.sink.list_available_printers().await;
        if printers.is_empty() {
            let e = AppError::NoPrinterAvailable;
            job.fail(&e);
            return Err(e);
        }

        job.advance(JobState::Rendering);
        let rendered = match self.renderer.render(record, &totals) {
            Ok(r) => r,
            Err(e) => {
                job.fail(&e);
                return Err(e);
            }
        };

        let path = self.temp_output_path(&rendered);
        if let Err(e) = self.sink.render_to_file(&rendered, &path).await {
            job.fail(&e);
            return Err(e);
        }
        job.output_path = Some(path.clone());

        if self.config.preview_before_send {
            // A visualização aqui é cortesia; se o visualizador não abrir,
            // o fluxo de impressão continua.
            if let Err(e) = self.sink.open_for_preview(&path).await {
                tracing::warn!("Pré-visualização indisponível: {}", e);
            } else {
                job.advance(JobState::Previewed);
            }
        }

        job.advance(JobState::ConfirmationPending);
        let prompt = format!(
            "Imprimir {} nº {}?",
            record.kind().title(),
            record.document_number()
        );
        if !self.gate.confirm(&prompt).await {
            job.advance(JobState::Declined);
            tracing::info!("Impressão recusada pelo operador ({})", job.id);
            return Ok(job);
        }
        job.advance(JobState::Confirmed);

        let printer = match self
            .gate
            .choose("Selecione a impressora", &printers)
            .await
        {
            Some(printer) => printer,
            None => {
                job.advance(JobState::Declined);
                return Ok(job);
            }
        };

        job.advance(JobState::Sending);
        match self.sink.send_to_printer(&path, &printer).await {
            Ok(()) => {
                job.advance(JobState::Sent);
                tracing::info!(
                    "{} nº {} enviado para '{}'",
                    record.kind(),
                    record.document_number(),
                    printer
                );
                Ok(job)
            }
            Err(e) => {
                job.fail(&e);
                Err(e)
            }
        }
    }

    /// Lote: uma confirmação e uma impressora para a sequência toda, depois
    /// um documento por vez. Falha no item k não derruba k+1..N: o
    /// resultado agregado conta os sucessos e nomeia cada falha com a
    /// causa. Retentativa é decisão de quem chamou, nunca automática.
    pub async fn print_batch(&self, records: &[FinancialRecord]) -> Result<BatchOutcome, AppError> {
        if records.is_empty() {
            return Ok(BatchOutcome::default());
        }

        let prompt = format!("Imprimir {} documentos?", records.len());
        if !self.gate.confirm(&prompt).await {
            tracing::info!("Lote de {} documentos recusado pelo operador", records.len());
            return Ok(BatchOutcome::default());
        }

        let printers = self.sink.list_available_printers().await;
        if printers.is_empty() {
            return Err(AppError::NoPrinterAvailable);
        }
        let printer = match self
            .gate
            .choose("Selecione a impressora para o lote", &printers)
            .await
        {
            Some(printer) => printer,
            None => return Ok(BatchOutcome::default()),
        };

        let mut outcome = BatchOutcome::default();
        for (idx, record) in records.iter().enumerate() {
            match self.send_one(record, &printer).await {
                Ok(_job) => outcome.success_count += 1,
                Err(e) => {
                    tracing::warn!(
                        "Documento nº {} falhou no lote: {}",
                        record.document_number(),
                        e
                    );
                    outcome.failures.push(BatchFailure {
                        document_number: record.document_number(),
                        cause: e.to_string(),
                    });
                }
            }

            // Pausa entre itens: a impressora é um recurso físico
            // compartilhado, a fila dela não precisa de rajada.
            if idx + 1 < records.len() && self.config.batch_pause_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.batch_pause_ms)).await;
            }
        }

        tracing::info!(
            "Lote concluído: {} enviados, {} falhas",
            outcome.success_count,
            outcome.failures.len()
        );
        Ok(outcome)
    }

    /// Caminho sem gates usado dentro do lote (a confirmação já aconteceu).
    async fn send_one(
        &self,
        record: &FinancialRecord,
        printer: &str,
    ) -> Result<PrintJob, AppError> {
        let mut job = PrintJob::new(record.kind(), record.document_number());

        let totals = ledger_service::derive_totals(record)?;

        job.advance(JobState::Rendering);
        let rendered = match self.renderer.render(record, &totals) {
            Ok(r) => r,
            Err(e) => {
                job.fail(&e);
                return Err(e);
            }
        };

        let path = self.temp_output_path(&rendered);
        self.sink.render_to_file(&rendered, &path).await?;
        job.output_path = Some(path.clone());

        job.advance(JobState::Sending);
        self.sink.send_to_printer(&path, printer).await?;
        job.advance(JobState::Sent);
        Ok(job)
    }

    /// Monta `<Kind>_<Numero>_<aaaaMMdd_HHmmss>[_<seq>].pdf` dentro do
    /// diretório temporário. O sufixo `_<seq>` resolve colisão de dois
    /// documentos no mesmo segundo.
    fn temp_output_path(&self, rendered: &RenderedDocument) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let base = format!(
            "{}_{}_{}",
            rendered.kind.file_prefix(),
            rendered.document_number,
            stamp
        );

        let mut candidate = self.config.temp_dir.join(format!("{base}.pdf"));
        let mut seq = 1u32;
        while candidate.exists() {
            candidate = self.config.temp_dir.join(format!("{base}_{seq}.pdf"));
            seq += 1;
        }
        candidate
    }
}
