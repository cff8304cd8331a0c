//! Rounded p-value text.

/// Format a p-value for display.
///
/// Values below 0.001 collapse to `"< 0.001"`, values below 0.01 keep three
/// decimals, everything else keeps two. `None` or NaN gives `"NA"`.
pub fn format_p_value(p: Option<f64>) -> String {
    match super::defined(p) {
        None => "NA".to_string(),
        Some(p) if p < 0.001 => "< 0.001".to_string(),
        Some(p) if p < 0.01 => format!("{p:.3}"),
        Some(p) => format!("{p:.2}"),
    }
}
