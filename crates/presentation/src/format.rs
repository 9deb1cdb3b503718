//! Display strings for KPI tiles.

/// `87.5%`
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// `12.3 days`
pub fn format_days(value: f64) -> String {
    format!("{value:.1} days")
}

/// Explicit sign for non-negative values: `+5.0%`, `-3.2%`.
pub fn format_signed_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.1}%")
    } else {
        format!("{value:.1}%")
    }
}

/// Value already in millions of SAR: `SAR 2.1M`.
pub fn format_sar_millions(value: f64) -> String {
    format!("SAR {value:.1}M")
}

/// Whole units with thousands separators: `12,345`.
pub fn format_count(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
