// src/common/numeric.rs

use rust_decimal::{Decimal, RoundingStrategy};

/// Arredonda para 2 casas (meio para longe do zero, igual ao ROUND do Postgres).
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn round2_opt(value: Option<Decimal>) -> Option<Decimal> {
    value.map(round2)
}

/// Divisão protegida: `None` quando o denominador é zero.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }
    numerator.checked_div(denominator)
}

/// Média arredondada de um total sobre uma contagem; 0 quando não há itens.
pub fn average(total: Decimal, count: i64) -> Decimal {
    safe_div(total, Decimal::from(count))
        .map(round2)
        .unwrap_or(Decimal::ZERO)
}

/// `part / whole * 100`, arredondado; 0 quando `whole` é zero.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| safe_div(scaled, whole))
        .map(round2)
        .unwrap_or(Decimal::ZERO)
}

pub fn percentage_of_counts(part: i64, whole: i64) -> Decimal {
    percentage(Decimal::from(part), Decimal::from(whole))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn round2_uses_half_away_from_zero() {
        assert_eq!(round2(d("2.345")), d("2.35"));
        assert_eq!(round2(d("2.344")), d("2.34"));
        assert_eq!(round2(d("-2.345")), d("-2.35"));
        assert!(round2(d("10.123456")).scale() <= 2);
    }

    #[test]
    fn safe_div_guards_zero_denominator() {
        assert_eq!(safe_div(d("10"), Decimal::ZERO), None);
        assert_eq!(safe_div(d("10"), d("4")), Some(d("2.5")));
    }

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(average(d("150"), 0), Decimal::ZERO);
        assert_eq!(average(d("100"), 3), d("33.33"));
    }

    #[test]
    fn percentage_is_guarded_and_rounded() {
        assert_eq!(percentage(d("1"), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percentage(d("1"), d("3")), d("33.33"));
        assert_eq!(percentage_of_counts(2, 8), d("25"));
    }
}
