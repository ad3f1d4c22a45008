// src/services/cleanup_service.rs

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use crate::models::documents::DocumentKind;
use crate::models::print_job::CleanupReport;

const ARTIFACT_KINDS: [DocumentKind; 3] = [
    DocumentKind::Invoice,
    DocumentKind::Return,
    DocumentKind::BalanceSheet,
];

/// Varredura dos PDFs temporários. Roda sob demanda (não é daemon) e é
/// melhor esforço do começo ao fim: falha de remoção vira warning e a
/// varredura segue, nunca bloqueia quem chamou.
#[derive(Debug, Clone)]
pub struct CleanupService {
    temp_dir: PathBuf,
    retention: Duration,
}

impl CleanupService {
    pub fn new(temp_dir: PathBuf, retention: Duration) -> Self {
        Self {
            temp_dir,
            retention,
        }
    }

    /// Remove os artefatos vencidos do diretório temporário.
    ///
    /// Outros jobs continuam criando arquivos enquanto a varredura roda:
    /// arquivo mais novo que a retenção nunca é tocado, e arquivo que
    /// sumiu entre a listagem e a remoção não é erro (alguém chegou antes).
    pub fn reclaim(&self) -> CleanupReport {
        let now = SystemTime::now();
        let mut report = CleanupReport::default();

        let entries = match fs::read_dir(&self.temp_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // Nunca imprimiu nada ainda; nada a recolher.
                return report;
            }
            Err(e) => {
                tracing::warn!(
                    "Diretório temporário {} inacessível: {}",
                    self.temp_dir.display(),
                    e
                );
                return report;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            // Só mexemos no que nós mesmos geramos.
            if !matches_artifact_name(name) {
                continue;
            }
            report.examined += 1;

            let modified = match entry.metadata().and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    tracing::warn!("Sem metadados de {}: {}", path.display(), e);
                    report.skipped += 1;
                    continue;
                }
            };

            if !is_expired(modified, now, self.retention) {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!("Temporário removido: {}", path.display());
                    report.removed += 1;
                }
                // Sumiu entre a listagem e a remoção: outra varredura (ou o
                // próprio job) chegou primeiro.
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!("Não consegui remover {}: {}", path.display(), e);
                    report.skipped += 1;
                }
            }
        }

        tracing::info!(
            "Varredura em {}: {} examinados, {} removidos, {} pulados",
            self.temp_dir.display(),
            report.examined,
            report.removed,
            report.skipped
        );
        report
    }
}

/// Um arquivo expira quando a idade passa ESTRITAMENTE da retenção:
/// exatamente na janela ainda fica. Relógio que andou para trás (idade
/// "negativa") conta como recente.
pub fn is_expired(modified: SystemTime, now: SystemTime, retention: Duration) -> bool {
    match now.duration_since(modified) {
        Ok(age) => age > retention,
        Err(_) => false,
    }
}

/// Reconhece `<Kind>_<Numero>_<timestamp>[_<seq>].pdf`, a convenção de
/// nome que o orquestrador usa ao gravar.
pub fn matches_artifact_name(name: &str) -> bool {
    if !name.ends_with(".pdf") {
        return false;
    }
    ARTIFACT_KINDS
        .iter()
        .any(|kind| name.starts_with(&format!("{}_", kind.file_prefix())))
}
