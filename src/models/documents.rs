// src/models/documents.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// --- Enums ---

/// Tipo do documento. O nome ASCII também é o prefixo do arquivo temporário
/// (`<Kind>_<Numero>_<timestamp>.pdf`), que a varredura de limpeza reconhece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Invoice,
    Return,
    BalanceSheet,
}

impl DocumentKind {
    pub fn file_prefix(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "Invoice",
            DocumentKind::Return => "Return",
            DocumentKind::BalanceSheet => "BalanceSheet",
        }
    }

    /// Título impresso no topo do documento.
    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "FATURA DE VENDA",
            DocumentKind::Return => "FATURA DE DEVOLUÇÃO",
            DocumentKind::BalanceSheet => "BALANÇO GERAL",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_prefix())
    }
}

// --- Structs ---

/// Uma linha precificada do documento. Imutável depois de construída e
/// pertence exclusivamente ao registro que a contém.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
}

/// O agregado de documento que chega pronto da camada de cima (UI ou
/// persistência). O nome do cliente vem como campo próprio, nada de
/// extrair nome de dentro da descrição de item.
///
/// A ordem de `items` é a ordem de apresentação: o número da linha impresso
/// é a posição na lista, começando em 1. Correção gera um registro novo,
/// nunca mutação.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FinancialRecord {
    #[serde(rename_all = "camelCase")]
    Invoice {
        document_number: i64,
        party_name: String,
        party_address: String,
        date: NaiveDate,
        items: Vec<LineItem>,
        previous_balance: Decimal,
        paid_amount: Decimal,
    },
    #[serde(rename_all = "camelCase")]
    ReturnInvoice {
        document_number: i64,
        original_document_number: i64,
        party_name: String,
        date: NaiveDate,
        items: Vec<LineItem>,
        previous_balance: Decimal,
    },
    #[serde(rename_all = "camelCase")]
    BalanceSnapshot {
        as_of_date: NaiveDate,
        bank_balance: Decimal,
        customers_owe_us: Decimal,
        we_owe_customers: Decimal,
        suppliers_owe_us: Decimal,
        we_owe_suppliers: Decimal,
    },
}

impl FinancialRecord {
    pub fn kind(&self) -> DocumentKind {
        match self {
            FinancialRecord::Invoice { .. } => DocumentKind::Invoice,
            FinancialRecord::ReturnInvoice { .. } => DocumentKind::Return,
            FinancialRecord::BalanceSnapshot { .. } => DocumentKind::BalanceSheet,
        }
    }

    /// Identificador usado em nomes de arquivo e nos relatórios de lote.
    /// O balanço não tem numeração própria, então usa 0.
    pub fn document_number(&self) -> i64 {
        match self {
            FinancialRecord::Invoice {
                document_number, ..
            } => *document_number,
            FinancialRecord::ReturnInvoice {
                document_number, ..
            } => *document_number,
            FinancialRecord::BalanceSnapshot { .. } => 0,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            FinancialRecord::Invoice { date, .. } => *date,
            FinancialRecord::ReturnInvoice { date, .. } => *date,
            FinancialRecord::BalanceSnapshot { as_of_date, .. } => *as_of_date,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        match self {
            FinancialRecord::Invoice { items, .. } => items,
            FinancialRecord::ReturnInvoice { items, .. } => items,
            FinancialRecord::BalanceSnapshot { .. } => &[],
        }
    }

    pub fn party_name(&self) -> Option<&str> {
        match self {
            FinancialRecord::Invoice { party_name, .. } => Some(party_name),
            FinancialRecord::ReturnInvoice { party_name, .. } => Some(party_name),
            FinancialRecord::BalanceSnapshot { .. } => None,
        }
    }
}

/// Documento já renderizado, pronto para o Output Sink gravar/imprimir.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub kind: DocumentKind,
    pub document_number: i64,
    pub bytes: Vec<u8>,
}
