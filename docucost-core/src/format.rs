//! Display formatting for currency and counts
//!
//! Currency uses compact suffixes (K, M, B, T). Thousands are shown without
//! decimals, everything else with two. Values of a quadrillion and above use
//! the extended suffixes Qa, Qt, Sx and Sp.

const EXTENDED_SUFFIXES: &[(f64, &str)] = &[(1e24, "Sp"), (1e21, "Sx"), (1e18, "Qt"), (1e15, "Qa")];
const LONG_SUFFIXES: &[(f64, &str)] = &[(1e12, "trillion"), (1e9, "billion")];

/// Currency bands in ascending order; bands from `Qa` up trim trailing zeros
const CURRENCY_BANDS: &[(f64, &str)] = &[
    (1.0, ""),
    (1e3, "K"),
    (1e6, "M"),
    (1e9, "B"),
    (1e12, "T"),
    (1e15, "Qa"),
    (1e18, "Qt"),
    (1e21, "Sx"),
    (1e24, "Sp"),
];
const FIRST_EXTENDED_BAND: usize = 5;

/// Format a currency amount, e.g. `$29K`, `$383.33K`, `$1.50M`, `$950.00`
///
/// The amount is rounded before the band is final, so a value that rounds up
/// to 1000 of one band is shown in the next one (`$999.6K` becomes `$1.00M`).
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();

    let mut band = CURRENCY_BANDS
        .iter()
        .rposition(|(divisor, _)| abs >= *divisor)
        .unwrap_or(0);
    loop {
        let (divisor, suffix) = CURRENCY_BANDS[band];
        // Positive thousands drop decimals
        let decimals = if suffix == "K" && value > 0.0 { 0 } else { 2 };
        let scaled = round_to(abs / divisor, decimals);
        if scaled >= 1_000.0 && band + 1 < CURRENCY_BANDS.len() {
            band += 1;
            continue;
        }
        let digits = if band >= FIRST_EXTENDED_BAND {
            trim_decimals(scaled, decimals)
        } else {
            format!("{:.*}", decimals, scaled)
        };
        return format!("{}${}{}", sign, digits, suffix);
    }
}

/// Format a count, e.g. `10,000`, `1,916.667`, `1.5 billion`
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();

    if let Some((divisor, suffix)) = find_suffix(abs, EXTENDED_SUFFIXES) {
        return format!("{}{}{}", sign, trim_decimals(abs / divisor, 2), suffix);
    }
    if value >= 1e9 {
        if let Some((divisor, suffix)) = find_suffix(abs, LONG_SUFFIXES) {
            return format!("{} {}", trim_decimals(abs / divisor, 2), suffix);
        }
    }
    format!("{}{}", sign, group_thousands(abs, 3))
}

/// Rounded whole percentage, e.g. `1,338%`
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_number(value.round()))
}

/// Per-document cost with four decimals, or `n/a` when undefined
pub fn format_per_document(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("${:.4}", v),
        _ => "n/a".to_string(),
    }
}

/// Multiplier such as `14.4x`
pub fn format_ratio(value: f64) -> String {
    format!("{:.1}x", value)
}

fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn find_suffix(abs: f64, table: &[(f64, &'static str)]) -> Option<(f64, &'static str)> {
    table.iter().copied().find(|(divisor, _)| abs >= *divisor)
}

/// Fixed decimals with trailing zeros removed
fn trim_decimals(value: f64, decimals: usize) -> String {
    let s = format!("{:.*}", decimals, value);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Thousands separators on the integer part, up to `max_decimals` fraction digits
fn group_thousands(abs: f64, max_decimals: usize) -> String {
    let fixed = trim_decimals(abs, max_decimals);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (fixed, None),
    };

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}
