/// Round to two decimal places, the precision every price field is reported in.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Absolute and percentage change from `previous` to `current`, both rounded
/// to two decimals. A zero `previous` yields no change.
pub fn price_change(current: f64, previous: f64) -> (f64, f64) {
    if previous == 0.0 {
        return (0.0, 0.0);
    }
    let change = current - previous;
    (round2(change), round2(change / previous * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.235_1), 1.24);
        assert_eq!(round2(-0.004), -0.0);
    }

    #[test]
    fn test_price_change() {
        assert_eq!(price_change(110.0, 100.0), (10.0, 10.0));
        assert_eq!(price_change(99.0, 100.0), (-1.0, -1.0));
        assert_eq!(price_change(50.0, 0.0), (0.0, 0.0));
        assert_eq!(price_change(187.44, 185.92), (1.52, 0.82));
    }
}
