// src/models/totals.rs

use rust_decimal::Decimal;
use serde::Serialize;

// Totais derivados: calculados sempre, persistidos nunca. Quem precisar de
// novo, recalcula a partir do registro.

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineTotals {
    /// unit_price * quantity
    pub amount: Decimal,
    /// amount * discount_percent / 100
    pub discount: Decimal,
    /// amount - discount
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeTotals {
    /// Uma entrada por linha, na mesma ordem do registro.
    pub lines: Vec<LineTotals>,
    pub subtotal: Decimal,
    pub total_discount: Decimal,
    /// subtotal - total_discount
    pub net_amount: Decimal,
    /// Fatura: saldo anterior + líquido. Devolução: saldo anterior - líquido
    /// (a devolução reduz o que o cliente deve).
    pub total_balance: Decimal,
    /// total_balance - valor pago (devolução não tem pagamento: igual ao
    /// total_balance).
    pub net_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceTotals {
    /// customers_owe_us + suppliers_owe_us
    pub total_receivables: Decimal,
    /// we_owe_customers + we_owe_suppliers
    pub total_payables: Decimal,
    /// bank_balance + total_receivables
    pub total_assets: Decimal,
    /// total_assets - total_payables
    pub net_worth: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DerivedTotals {
    Trade(TradeTotals),
    Balance(BalanceTotals),
}
