// src/common/format.rs

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Formata um valor monetário: duas casas fixas, separador de milhar e o
/// símbolo na frente. Zero vira "R$ 0.00", porque célula em branco deixaria
/// ambíguo se o valor é zero ou se está faltando.
///
/// O arredondamento acontece SÓ aqui, na exibição. Os totais derivados
/// circulam sempre com a precisão cheia do `Decimal`.
pub fn format_currency(value: Decimal, symbol: &str) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{} {}{}.{}", symbol, sign, group_thousands(whole), cents)
}

/// Datas no formato que o financeiro espera: dd/mm/aaaa.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

// Agrupa a parte inteira de três em três: "1234567" -> "1,234,567".
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
