// src/services/ledger_service.rs

use rust_decimal::Decimal;

use crate::common::error::AppError;
use crate::models::documents::{FinancialRecord, LineItem};
use crate::models::totals::{BalanceTotals, DerivedTotals, LineTotals, TradeTotals};

// Aritmética do razão: funções puras, determinísticas, sem I/O. Tudo em
// `Decimal`, porque erro binário de ponto flutuante não passa em auditoria.
// Arredondamento só existe na formatação de exibição, nunca aqui no meio
// da conta (senão o erro se acumula linha a linha).

/// Deriva todos os totais do documento, validando antes de calcular.
/// Fatura e devolução exigem ao menos uma linha.
pub fn derive_totals(record: &FinancialRecord) -> Result<DerivedTotals, AppError> {
    validate(record, true)?;
    Ok(compute(record))
}

/// Igual a `derive_totals`, mas aceita documento sem itens: a
/// pré-visualização mostra a tabela só com cabeçalho e totais zerados.
pub fn derive_totals_lenient(record: &FinancialRecord) -> Result<DerivedTotals, AppError> {
    validate(record, false)?;
    Ok(compute(record))
}

fn validate(record: &FinancialRecord, require_items: bool) -> Result<(), AppError> {
    // O balanço não tem linhas; os agregados chegam prontos da persistência.
    if matches!(record, FinancialRecord::BalanceSnapshot { .. }) {
        return Ok(());
    }

    let items = record.items();
    if require_items && items.is_empty() {
        return Err(AppError::InvalidRecord(format!(
            "{} nº {} não tem nenhum item",
            record.kind(),
            record.document_number()
        )));
    }
    for (idx, item) in items.iter().enumerate() {
        validate_item(idx + 1, item)?;
    }
    Ok(())
}

fn validate_item(line: usize, item: &LineItem) -> Result<(), AppError> {
    if item.quantity < 0 {
        return Err(AppError::InvalidRecord(format!(
            "linha {line}: quantidade negativa ({})",
            item.quantity
        )));
    }
    if item.unit_price < Decimal::ZERO {
        return Err(AppError::InvalidRecord(format!(
            "linha {line}: preço unitário negativo ({})",
            item.unit_price
        )));
    }
    if item.discount_percent < Decimal::ZERO || item.discount_percent > Decimal::ONE_HUNDRED {
        return Err(AppError::InvalidRecord(format!(
            "linha {line}: desconto fora de 0..=100 ({}%)",
            item.discount_percent
        )));
    }
    Ok(())
}

fn line_totals(item: &LineItem) -> LineTotals {
    let amount = item.unit_price * Decimal::from(item.quantity);
    let discount = amount * item.discount_percent / Decimal::ONE_HUNDRED;
    LineTotals {
        amount,
        discount,
        net: amount - discount,
    }
}

fn compute(record: &FinancialRecord) -> DerivedTotals {
    match record {
        FinancialRecord::Invoice {
            items,
            previous_balance,
            paid_amount,
            ..
        } => {
            let (lines, subtotal, total_discount) = sum_lines(items);
            let net_amount = subtotal - total_discount;
            let total_balance = *previous_balance + net_amount;
            DerivedTotals::Trade(TradeTotals {
                lines,
                subtotal,
                total_discount,
                net_amount,
                total_balance,
                net_balance: total_balance - *paid_amount,
            })
        }
        FinancialRecord::ReturnInvoice {
            items,
            previous_balance,
            ..
        } => {
            let (lines, subtotal, total_discount) = sum_lines(items);
            let net_amount = subtotal - total_discount;
            // Devolução reduz o que o cliente nos deve.
            let total_balance = *previous_balance - net_amount;
            DerivedTotals::Trade(TradeTotals {
                lines,
                subtotal,
                total_discount,
                net_amount,
                total_balance,
                net_balance: total_balance,
            })
        }
        FinancialRecord::BalanceSnapshot {
            bank_balance,
            customers_owe_us,
            we_owe_customers,
            suppliers_owe_us,
            we_owe_suppliers,
            ..
        } => {
            let total_receivables = *customers_owe_us + *suppliers_owe_us;
            let total_payables = *we_owe_customers + *we_owe_suppliers;
            let total_assets = *bank_balance + total_receivables;
            DerivedTotals::Balance(BalanceTotals {
                total_receivables,
                total_payables,
                total_assets,
                net_worth: total_assets - total_payables,
            })
        }
    }
}

fn sum_lines(items: &[LineItem]) -> (Vec<LineTotals>, Decimal, Decimal) {
    let lines: Vec<LineTotals> = items.iter().map(line_totals).collect();
    let subtotal = lines.iter().map(|l| l.amount).sum();
    let total_discount = lines.iter().map(|l| l.discount).sum();
    (lines, subtotal, total_discount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn any_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    fn item(qty: i64, price: Decimal, discount: Decimal) -> LineItem {
        LineItem {
            name: "Cabo flexível 2,5mm".into(),
            quantity: qty,
            unit_price: price,
            discount_percent: discount,
        }
    }

    fn invoice(items: Vec<LineItem>, previous: Decimal, paid: Decimal) -> FinancialRecord {
        FinancialRecord::Invoice {
            document_number: 101,
            party_name: "Elétrica São Jorge".into(),
            party_address: "Rua do Comércio, 12".into(),
            date: any_date(),
            items,
            previous_balance: previous,
            paid_amount: paid,
        }
    }

    fn trade(totals: DerivedTotals) -> TradeTotals {
        match totals {
            DerivedTotals::Trade(t) => t,
            DerivedTotals::Balance(_) => panic!("esperava totais de fatura"),
        }
    }

    #[test]
    fn invoice_totals_follow_the_discount_identity() {
        let record = invoice(
            vec![
                item(10, dec!(12.50), dec!(10)),
                item(3, dec!(99.90), dec!(0)),
            ],
            dec!(0),
            dec!(0),
        );
        let t = trade(derive_totals(&record).unwrap());

        assert_eq!(t.lines[0].amount, dec!(125.00));
        assert_eq!(t.lines[0].discount, dec!(12.500));
        assert_eq!(t.lines[0].net, dec!(112.500));
        assert_eq!(t.subtotal, dec!(424.70));
        assert_eq!(t.total_discount, dec!(12.500));
        // netAmount = subtotal - totalDiscount, exato.
        assert_eq!(t.net_amount, t.subtotal - t.total_discount);
        for line in &t.lines {
            assert_eq!(line.net, line.amount - line.discount);
        }
    }

    #[test]
    fn derivation_is_deterministic() {
        let record = invoice(
            vec![item(7, dec!(33.33), dec!(12.5)), item(1, dec!(0.01), dec!(100))],
            dec!(250.75),
            dec!(100),
        );
        assert_eq!(
            derive_totals(&record).unwrap(),
            derive_totals(&record).unwrap()
        );
    }

    #[test]
    fn invoice_balance_adds_net_and_subtracts_payment() {
        let record = invoice(vec![item(2, dec!(50.00), dec!(0))], dec!(1000.00), dec!(300.00));
        let t = trade(derive_totals(&record).unwrap());
        assert_eq!(t.total_balance, dec!(1100.00));
        assert_eq!(t.net_balance, dec!(800.00));
    }

    #[test]
    fn unpaid_invoice_net_balance_equals_total_balance() {
        let record = invoice(vec![item(2, dec!(50.00), dec!(0))], dec!(1000.00), dec!(0));
        let t = trade(derive_totals(&record).unwrap());
        assert_eq!(t.net_balance, t.total_balance);
    }

    #[test]
    fn return_reduces_what_the_party_owes() {
        // Saldo 1000, devolvendo 2 x 50 sem desconto => saldo 900.
        let record = FinancialRecord::ReturnInvoice {
            document_number: 55,
            original_document_number: 101,
            party_name: "Elétrica São Jorge".into(),
            date: any_date(),
            items: vec![item(2, dec!(50.00), dec!(0))],
            previous_balance: dec!(1000.00),
        };
        let t = trade(derive_totals(&record).unwrap());
        assert_eq!(t.total_balance, dec!(900.00));
        assert_eq!(t.net_balance, dec!(900.00));
    }

    #[test]
    fn balance_sheet_identities_hold() {
        let record = FinancialRecord::BalanceSnapshot {
            as_of_date: any_date(),
            bank_balance: dec!(5000),
            customers_owe_us: dec!(1200.50),
            we_owe_customers: dec!(80),
            suppliers_owe_us: dec!(300),
            we_owe_suppliers: dec!(2500.25),
        };
        let totals = derive_totals(&record).unwrap();
        let DerivedTotals::Balance(b) = totals else {
            panic!("esperava totais de balanço");
        };
        assert_eq!(b.total_receivables, dec!(1500.50));
        assert_eq!(b.total_payables, dec!(2580.25));
        assert_eq!(b.total_assets, dec!(6500.50));
        assert_eq!(b.net_worth, dec!(3920.25));
    }

    #[test]
    fn all_zero_balance_sheet_has_zero_net_worth() {
        let record = FinancialRecord::BalanceSnapshot {
            as_of_date: any_date(),
            bank_balance: dec!(0),
            customers_owe_us: dec!(0),
            we_owe_customers: dec!(0),
            suppliers_owe_us: dec!(0),
            we_owe_suppliers: dec!(0),
        };
        let DerivedTotals::Balance(b) = derive_totals(&record).unwrap() else {
            panic!("esperava totais de balanço");
        };
        assert_eq!(b.net_worth, Decimal::ZERO);
    }

    #[test]
    fn negative_quantity_is_rejected_with_line_number() {
        let record = invoice(
            vec![item(1, dec!(10), dec!(0)), item(-2, dec!(10), dec!(0))],
            dec!(0),
            dec!(0),
        );
        let err = derive_totals(&record).unwrap_err();
        match err {
            AppError::InvalidRecord(msg) => assert!(msg.contains("linha 2")),
            other => panic!("erro inesperado: {other}"),
        }
    }

    #[test]
    fn negative_price_and_bad_discount_are_rejected() {
        let record = invoice(vec![item(1, dec!(-0.01), dec!(0))], dec!(0), dec!(0));
        assert!(matches!(
            derive_totals(&record),
            Err(AppError::InvalidRecord(_))
        ));

        let record = invoice(vec![item(1, dec!(10), dec!(100.01))], dec!(0), dec!(0));
        assert!(matches!(
            derive_totals(&record),
            Err(AppError::InvalidRecord(_))
        ));
    }

    #[test]
    fn empty_invoice_is_rejected_strict_but_allowed_lenient() {
        let record = invoice(vec![], dec!(40), dec!(0));
        assert!(matches!(
            derive_totals(&record),
            Err(AppError::InvalidRecord(_))
        ));

        let t = trade(derive_totals_lenient(&record).unwrap());
        assert!(t.lines.is_empty());
        assert_eq!(t.subtotal, Decimal::ZERO);
        assert_eq!(t.net_amount, Decimal::ZERO);
        // Sem itens o saldo fica só com o que veio de antes.
        assert_eq!(t.total_balance, dec!(40));
    }

    #[test]
    fn hundred_percent_discount_zeroes_the_line() {
        let record = invoice(vec![item(4, dec!(25.00), dec!(100))], dec!(0), dec!(0));
        let t = trade(derive_totals(&record).unwrap());
        assert_eq!(t.lines[0].net, dec!(0.0000));
        assert_eq!(t.net_amount, dec!(0.0000));
    }
}
