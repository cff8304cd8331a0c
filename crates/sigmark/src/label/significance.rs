//! Star-symbol significance classes.

/// Map a p-value to its significance symbol.
///
/// | p               | symbol |
/// |-----------------|--------|
/// | `< 0.001`       | `***`  |
/// | `< 0.01`        | `**`   |
/// | `< 0.05`        | `*`    |
/// | `>= 0.05`       | `ns`   |
/// | `None` or NaN   | `NA`   |
pub fn significance_symbol(p: Option<f64>) -> &'static str {
    match super::defined(p) {
        None => "NA",
        Some(p) if p < 0.001 => "***",
        Some(p) if p < 0.01 => "**",
        Some(p) if p < 0.05 => "*",
        Some(_) => "ns",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_belong_to_weaker_class() {
        assert_eq!(significance_symbol(Some(0.0009999)), "***");
        assert_eq!(significance_symbol(Some(0.001)), "**");
        assert_eq!(significance_symbol(Some(0.0099999)), "**");
        assert_eq!(significance_symbol(Some(0.01)), "*");
        assert_eq!(significance_symbol(Some(0.049999)), "*");
        assert_eq!(significance_symbol(Some(0.05)), "ns");
    }

    #[test]
    fn test_extremes() {
        assert_eq!(significance_symbol(Some(0.0)), "***");
        assert_eq!(significance_symbol(Some(1.0)), "ns");
    }

    #[test]
    fn test_undefined() {
        assert_eq!(significance_symbol(None), "NA");
        assert_eq!(significance_symbol(Some(f64::NAN)), "NA");
    }
}
