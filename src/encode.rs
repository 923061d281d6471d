//! Numeric encoding for instrument parameters that take "EXP" style values.
//!
//! Log-scale and per-division parameters on the AQ6370 accept either a plain
//! decimal (below 10) or a normalized `<mantissa>E<exponent>` form. Wavelengths
//! do not use this encoding; they are plain integers with an `NM` suffix.

/// Render a signed real number in the instrument's exponential notation.
///
/// Values with magnitude below 10 are passed through as plain decimals.
/// Larger magnitudes are reduced by repeated division by 10. The loop bound
/// is strictly `> 10`, so a magnitude landing exactly on 10 keeps a
/// two-digit mantissa (`100.0` encodes as `10.0E1`, not `1.0E2`). The
/// instrument accepts both forms; the bound is kept as observed.
///
/// # Examples
/// ```
/// use osa_remote::encode_exponential;
///
/// assert_eq!(encode_exponential(5.0), "5.0");
/// assert_eq!(encode_exponential(-15.0), "-1.5E1");
/// ```
pub fn encode_exponential(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let mut magnitude = value.abs();

    if magnitude < 10.0 {
        return format!("{sign}{}", decimal_string(magnitude));
    }

    let mut exponent = 1u32;
    magnitude /= 10.0;
    while magnitude > 10.0 {
        exponent += 1;
        magnitude /= 10.0;
    }

    format!("{sign}{}E{exponent}", decimal_string(magnitude))
}

/// Decimal rendering that keeps a trailing `.0` on integral values, the
/// form the instrument parser is known to accept (`5.0` rather than `5`).
fn decimal_string(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_ten_has_no_exponent() {
        assert_eq!(encode_exponential(0.0), "0.0");
        assert_eq!(encode_exponential(5.0), "5.0");
        assert_eq!(encode_exponential(9.5), "9.5");
        assert_eq!(encode_exponential(-7.25), "-7.25");
    }

    #[test]
    fn negative_fifteen() {
        assert_eq!(encode_exponential(-15.0), "-1.5E1");
    }

    #[test]
    fn large_magnitudes_normalize() {
        assert_eq!(encode_exponential(15.0), "1.5E1");
        assert_eq!(encode_exponential(2500.0), "2.5E3");
        assert_eq!(encode_exponential(-123.0), "-1.23E2");
    }

    // Powers of ten land exactly on the loop bound and keep a two-digit
    // mantissa. Locked in so a later cleanup does not silently change the
    // wire format.
    #[test]
    fn power_of_ten_boundary() {
        assert_eq!(encode_exponential(100.0), "10.0E1");
        assert_eq!(encode_exponential(1000.0), "10.0E2");
    }

    #[test]
    fn encoded_value_reconstructs_magnitude() {
        for &v in &[12.0_f64, 47.3, 999.0, 12345.6, -86.5] {
            let encoded = encode_exponential(v);
            let (mantissa, exponent) = match encoded.split_once('E') {
                Some((m, e)) => (
                    m.parse::<f64>().unwrap(),
                    e.parse::<i32>().unwrap(),
                ),
                None => (encoded.parse::<f64>().unwrap(), 0),
            };
            let reconstructed = mantissa * 10f64.powi(exponent);
            assert!(
                (reconstructed - v).abs() < 1e-9 * v.abs(),
                "{v} -> {encoded} -> {reconstructed}"
            );
        }
    }
}
