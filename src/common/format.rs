// src/common/format.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

// Formatação compartilhada entre a resposta JSON e o CSV exportado.
// Relatório e tela têm que mostrar o mesmo número, por isso há um único
// caminho de formatação.

/// Moeda em pesos: duas casas, separador de milhar.
/// Ex.: 1234567.5 -> "₱1,234,567.50"
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let plain = format!("{rounded:.2}");
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}₱{grouped}.{frac_part}")
}

/// Data no formato dia/mês/ano, igual ao exibido na linha do tempo.
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%d/%m/%Y").to_string()
}

/// Quantidade sem zeros à direita ("2.500" -> "2.5", "3.000" -> "3").
pub fn format_quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn moeda_com_separador_de_milhar() {
        assert_eq!(format_currency(Decimal::new(123456750, 2)), "₱1,234,567.50");
        assert_eq!(format_currency(Decimal::new(0, 0)), "₱0.00");
        assert_eq!(format_currency(Decimal::new(999, 0)), "₱999.00");
        assert_eq!(format_currency(Decimal::new(1000, 0)), "₱1,000.00");
    }

    #[test]
    fn moeda_arredonda_para_duas_casas() {
        assert_eq!(format_currency(Decimal::new(10555, 3)), "₱10.56");
    }

    #[test]
    fn moeda_negativa_mantem_sinal_fora_do_simbolo() {
        assert_eq!(format_currency(Decimal::new(-150000, 2)), "-₱1,500.00");
    }

    #[test]
    fn data_dia_mes_ano() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 7, 15, 30, 0).unwrap();
        assert_eq!(format_date(ts), "07/03/2024");
    }

    #[test]
    fn quantidade_normalizada() {
        assert_eq!(format_quantity(Decimal::new(2500, 3)), "2.5");
        assert_eq!(format_quantity(Decimal::new(3000, 3)), "3");
    }
}
