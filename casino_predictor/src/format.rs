//! Number formatting shared by the predictor and the front ends.

/// Rounds to cents / two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / total` as a percentage rounded to two decimals; 0 when `total` is 0.
pub fn percentage(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    round2(part / total * 100.0)
}

/// Formats an amount as dollars with thousands separators, e.g. `$12,345.67`.
pub fn format_money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(48.648_648), 48.65);
        assert_eq!(round2(2.0), 2.0);
    }

    #[test]
    fn test_percentage_of_zero_total() {
        assert_eq!(percentage(3.0, 0.0), 0.0);
        assert_eq!(percentage(1.0, 3.0), 33.33);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(12_345.678), "$12,345.68");
        assert_eq!(format_money(50_000.0), "$50,000.00");
        assert_eq!(format_money(999.5), "$999.50");
        assert_eq!(format_money(1_234_567.0), "$1,234,567.00");
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(-20.0), "-$20.00");
    }
}
