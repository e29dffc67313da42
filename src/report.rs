// src/report.rs

use std::fmt::Write;

use crate::state::SheetData;

/// Short audience figure: `12.6M`, `520K`, or the rounded grouped value below a thousand.
pub fn format_compact(n: f64) -> String {
    if n >= 1_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("{:.0}K", n / 1_000.0)
    } else {
        format_grouped(n.round())
    }
}

/// `1234567.891` → `1,234,567.891`. At most three fraction digits, trailing zeros dropped.
pub fn format_grouped(n: f64) -> String {
    let fixed = format!("{:.3}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if n < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

const HEADERS: [&str; 4] = ["Province", "Total Population", "Average Score", "Geo Count"];

/// Province table followed by the two totals.
pub fn render_table(data: &SheetData) -> String {
    let rows: Vec<[String; 4]> = data
        .data
        .iter()
        .map(|p| {
            [
                p.province.clone(),
                format_grouped(p.total_population),
                format!("{}", p.avg_score),
                p.geo_count.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<w0$}  {:>w1$}  {:>w2$}  {:>w3$}",
        HEADERS[0],
        HEADERS[1],
        HEADERS[2],
        HEADERS[3],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3]
    );
    let _ = writeln!(out, "{}", "-".repeat(widths.iter().sum::<usize>() + 6));
    for row in &rows {
        // pad by chars, not bytes, so accented names line up
        let pad = widths[0] - row[0].chars().count();
        let _ = writeln!(
            out,
            "{}{}  {:>w1$}  {:>w2$}  {:>w3$}",
            row[0],
            " ".repeat(pad),
            row[1],
            row[2],
            row[3],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3]
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Total Audience:     {} ({})",
        format_grouped(data.total_audience),
        format_compact(data.total_audience)
    );
    let _ = writeln!(
        out,
        "Total Postal Codes: {} ({})",
        format_grouped(data.total_postal_codes as f64),
        format_compact(data.total_postal_codes as f64)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{AudienceSummary, ProvinceSummary};
    use crate::state::LoadState;

    #[test]
    fn compact_figures() {
        assert_eq!(format_compact(12_600_000.0), "12.6M");
        assert_eq!(format_compact(520.0), "520");
        assert_eq!(format_compact(520.25), "520");
        assert_eq!(format_compact(12.5), "13");
        assert_eq!(format_compact(45_300.0), "45K");
        assert_eq!(format_compact(1_000.0), "1K");
        assert_eq!(format_compact(0.0), "0");
    }

    #[test]
    fn grouped_figures() {
        assert_eq!(format_grouped(1_234_567.0), "1,234,567");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1000.5), "1,000.5");
        assert_eq!(format_grouped(-12_345.25), "-12,345.25");
        assert_eq!(format_grouped(0.0), "0");
    }

    #[test]
    fn table_lists_provinces_and_totals() {
        let summary = AudienceSummary::from_provinces(vec![
            ProvinceSummary {
                province: "Ontario".into(),
                total_population: 1_500_000.0,
                avg_score: 4.0,
                geo_count: 300,
            },
            ProvinceSummary {
                province: "Québec".into(),
                total_population: 820_000.0,
                avg_score: 3.57,
                geo_count: 220,
            },
        ]);
        let text = render_table(&SheetData::from(&LoadState::Ready(summary)));
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("Province"));
        assert!(lines[2].starts_with("Ontario"));
        assert!(lines[2].contains("1,500,000"));
        assert!(lines[3].starts_with("Québec"));
        assert!(lines[3].ends_with("220"));
        assert_eq!(lines[2].chars().count(), lines[3].chars().count());
        assert!(text.contains("Total Audience:     2,320,000 (2.3M)"));
        assert!(text.contains("Total Postal Codes: 520 (520)"));
    }
}
