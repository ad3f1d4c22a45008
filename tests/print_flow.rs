// tests/print_flow.rs

//! Fluxo completo de lote pela API pública do motor: derivação dos totais,
//! renderização, gravação no diretório temporário, envio com falha parcial
//! e, por fim, a varredura que recolhe os PDFs vencidos. Os colaboradores
//! externos (renderizador, sink, gate) entram como implementações de teste.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

use condutor::services::cleanup_service::matches_artifact_name;
use condutor::{
    AppError, CleanupService, ConfirmationGate, DerivedTotals, DocumentRenderer, FinancialRecord,
    LineItem, OutputSink, PrintConfig, PrintService, RenderedDocument,
};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .try_init()
        .ok();
}

// Renderizador sem genpdf: o teste de fluxo não precisa de fonte instalada,
// só de bytes que pareçam um PDF.
struct PlainRenderer;

impl DocumentRenderer for PlainRenderer {
    fn render(
        &self,
        record: &FinancialRecord,
        _totals: &DerivedTotals,
    ) -> Result<RenderedDocument, AppError> {
        let body = format!("%PDF-1.5 documento {}", record.document_number());
        Ok(RenderedDocument {
            kind: record.kind(),
            document_number: record.document_number(),
            bytes: body.into_bytes(),
        })
    }
}

// Sink que grava de verdade no disco (como o DesktopSink faria), mas cujo
// "envio" só anota o pedido, e falha para um documento escolhido.
struct DiskSink {
    fail_document: Option<i64>,
    sent: Mutex<Vec<PathBuf>>,
}

impl DiskSink {
    fn new(fail_document: Option<i64>) -> Self {
        Self {
            fail_document,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn document_of(path: &Path) -> Option<i64> {
        path.file_name()?
            .to_str()?
            .split('_')
            .nth(1)?
            .parse()
            .ok()
    }
}

#[async_trait]
impl OutputSink for &DiskSink {
    async fn render_to_file(
        &self,
        document: &RenderedDocument,
        path: &Path,
    ) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &document.bytes).await?;
        Ok(())
    }

    async fn list_available_printers(&self) -> Vec<String> {
        vec!["Balcao".to_string(), "Escritorio".to_string()]
    }

    async fn send_to_printer(&self, path: &Path, _printer_id: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(path.to_path_buf());
        if self.fail_document.is_some() && DiskSink::document_of(path) == self.fail_document {
            return Err(AppError::SendFailure("impressora sem papel".into()));
        }
        Ok(())
    }

    async fn open_for_preview(&self, _path: &Path) -> Result<(), AppError> {
        Ok(())
    }
}

// Operador que sempre aceita e escolhe a primeira impressora da lista.
struct FirstPrinterGate;

#[async_trait]
impl ConfirmationGate for FirstPrinterGate {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }

    async fn choose(&self, _prompt: &str, options: &[String]) -> Option<String> {
        options.first().cloned()
    }
}

fn invoice(document_number: i64) -> FinancialRecord {
    FinancialRecord::Invoice {
        document_number,
        party_name: "Elétrica São Jorge".into(),
        party_address: "Rua do Comércio, 12".into(),
        date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        items: vec![LineItem {
            name: "Cabo PP 2x1,5mm (m)".into(),
            quantity: 40,
            unit_price: dec!(5.20),
            discount_percent: dec!(2.5),
        }],
        previous_balance: dec!(120.00),
        paid_amount: dec!(0),
    }
}

#[tokio::test]
async fn batch_writes_artifacts_reports_partial_failure_and_reclaims() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config = PrintConfig {
        temp_dir: dir.path().to_path_buf(),
        batch_pause_ms: 0,
        ..PrintConfig::default()
    };

    let sink = DiskSink::new(Some(3));
    let service = PrintService::new(PlainRenderer, &sink, FirstPrinterGate, config);
    let records: Vec<FinancialRecord> = (1..=5).map(invoice).collect();

    let outcome = service.print_batch(&records).await.unwrap();

    // O nº 3 falhou sozinho; 4 e 5 ainda foram tentados.
    assert_eq!(outcome.success_count, 4);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].document_number, 3);
    assert!(outcome.failures[0].cause.contains("sem papel"));
    assert_eq!(sink.sent.lock().unwrap().len(), 5);

    // Todos os cinco PDFs ficaram no diretório temporário, com o nome que a
    // varredura reconhece.
    let mut artifacts: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    artifacts.sort();
    assert_eq!(artifacts.len(), 5);
    for name in &artifacts {
        assert!(matches_artifact_name(name), "nome fora da convenção: {name}");
    }
    assert!(artifacts[0].starts_with("Invoice_1_"));

    // Um arquivo alheio no mesmo diretório não pertence à varredura.
    let foreign = dir.path().join("contrato_fornecedor.pdf");
    std::fs::write(&foreign, b"%PDF").unwrap();

    // Com retenção zero, qualquer artefato com idade mensurável vence.
    tokio::time::sleep(Duration::from_millis(30)).await;
    let report = CleanupService::new(dir.path().to_path_buf(), Duration::ZERO).reclaim();

    assert_eq!(report.examined, 5);
    assert_eq!(report.removed, 5);
    assert_eq!(report.skipped, 0);
    assert!(foreign.exists());
}

#[tokio::test]
async fn batch_mixes_document_kinds_under_their_own_prefixes() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config = PrintConfig {
        temp_dir: dir.path().to_path_buf(),
        batch_pause_ms: 0,
        ..PrintConfig::default()
    };

    let sink = DiskSink::new(None);
    let service = PrintService::new(PlainRenderer, &sink, FirstPrinterGate, config);

    let records = vec![
        invoice(71),
        FinancialRecord::ReturnInvoice {
            document_number: 72,
            original_document_number: 71,
            party_name: "Elétrica São Jorge".into(),
            date: NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
            items: vec![LineItem {
                name: "Cabo PP 2x1,5mm (m)".into(),
                quantity: 10,
                unit_price: dec!(5.20),
                discount_percent: dec!(0),
            }],
            previous_balance: dec!(328.00),
        },
        FinancialRecord::BalanceSnapshot {
            as_of_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            bank_balance: dec!(15000),
            customers_owe_us: dec!(2300),
            we_owe_customers: dec!(150),
            suppliers_owe_us: dec!(0),
            we_owe_suppliers: dec!(4800),
        },
    ];

    let outcome = service.print_batch(&records).await.unwrap();
    assert_eq!(outcome.success_count, 3);
    assert!(outcome.failures.is_empty());

    let mut prefixes: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .map(|name| name.split('_').next().unwrap().to_string())
        .collect();
    prefixes.sort();
    assert_eq!(prefixes, ["BalanceSheet", "Invoice", "Return"]);
}
