//! Plain-terminal rendering of the dashboards.

use std::fmt::Write;

use console::{Alignment, measure_text_width, pad_str, style};

use super::{Amount, Count, CostReport, Point, ProductionReport};
use super::production::StockPoint;

const DEFAULT_WIDTH: usize = 80;
const BAR: char = '█';

/// Terminal width in columns, falling back to 80 when not attached to a tty.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(terminal_size::Width(w), _)| w as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Format a value as Brazilian reais with thousands separators: `R$ 1,234.56`.
pub fn format_money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {}.{:02}", sign, grouped, cents % 100)
}

struct Chart {
    width: usize,
}

impl Chart {
    fn new(width: usize) -> Self {
        Self {
            width: width.max(40),
        }
    }

    fn heading(&self, out: &mut String, title: &str) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", style(title).bold().cyan());
    }

    /// Horizontal bars scaled to the largest value.
    fn bars(&self, out: &mut String, rows: &[(String, f64, String)]) {
        if rows.is_empty() {
            let _ = writeln!(out, "  {}", style("(no data)").dim());
            return;
        }
        let label_w = rows
            .iter()
            .map(|(l, _, _)| measure_text_width(l))
            .max()
            .unwrap_or(0)
            .min(self.width / 3);
        let value_w = rows
            .iter()
            .map(|(_, _, v)| measure_text_width(v))
            .max()
            .unwrap_or(0);
        let bar_w = self.width.saturating_sub(label_w + value_w + 6).max(10);
        let max = rows.iter().map(|(_, v, _)| *v).fold(0.0_f64, f64::max);

        for (label, value, shown) in rows {
            let len = if max > 0.0 {
                ((value / max) * bar_w as f64).round() as usize
            } else {
                0
            };
            let _ = writeln!(
                out,
                "  {} {} {}",
                pad_str(label, label_w, Alignment::Left, Some("…")),
                pad_str(shown, value_w, Alignment::Right, None),
                style(BAR.to_string().repeat(len)).green()
            );
        }
    }

    fn counts(&self, out: &mut String, title: &str, counts: &[Count]) {
        self.heading(out, title);
        let rows: Vec<(String, f64, String)> = counts
            .iter()
            .map(|c| (c.label.clone(), c.count as f64, c.count.to_string()))
            .collect();
        self.bars(out, &rows);
    }

    fn amounts(&self, out: &mut String, title: &str, amounts: &[Amount]) {
        self.heading(out, title);
        let rows: Vec<(String, f64, String)> = amounts
            .iter()
            .map(|a| (a.label.clone(), a.value, format_money(a.value)))
            .collect();
        self.bars(out, &rows);
    }

    fn kpis(&self, out: &mut String, cards: &[(&str, String)]) {
        let line: Vec<String> = cards
            .iter()
            .map(|(name, value)| format!("{} {}", style(name).dim(), style(value).bold()))
            .collect();
        let _ = writeln!(out, "  {}", line.join("   "));
    }
}

fn header(out: &mut String, title: &str, report_range: &super::DateRange, group: super::Granularity) {
    let _ = writeln!(
        out,
        "{}  {} → {} (per {})",
        style(title).bold(),
        report_range.start,
        report_range.end,
        group
    );
}

fn skipped_note(out: &mut String, skipped: usize) {
    if skipped > 0 {
        let _ = writeln!(
            out,
            "  {}",
            style(format!("{} unreadable record(s) were left out", skipped)).yellow()
        );
    }
}

/// Render the production dashboard for a terminal `width` columns wide.
pub fn render_production(report: &ProductionReport, width: usize) -> String {
    let chart = Chart::new(width);
    let mut out = String::new();
    header(&mut out, "Production", &report.range, report.group);
    skipped_note(&mut out, report.skipped);
    if report.is_empty() {
        let _ = writeln!(out, "  No formulas in this period.");
        return out;
    }

    let k = &report.kpis;
    chart.kpis(
        &mut out,
        &[
            ("Formulas", report.total.to_string()),
            ("Redo PM", k.redo_pm.to_string()),
            ("Redo exc", k.redo_exc.to_string()),
            ("Stock used", k.stock_used.to_string()),
            ("Stock made", k.stock_made.to_string()),
            ("PM > 20", k.pm_over_20.to_string()),
        ],
    );

    chart.counts(&mut out, "Formulas by type", &report.by_formula_type);
    chart.counts(&mut out, "Formulas by shift", &report.by_shift);
    chart.counts(&mut out, "Formulas per employee (any role)", &report.by_employee);
    chart.counts(&mut out, "Weighing", &report.by_weighing);
    chart.counts(&mut out, "Handling", &report.by_handling);
    chart.counts(&mut out, "PM", &report.by_pm);
    chart.counts(&mut out, "Stock made by handling employee", &report.stock_made_by_handling);
    chart.counts(&mut out, "Redo exc by weighing employee", &report.redo_exc_by_weighing);
    chart.counts(&mut out, "Redo PM by handling employee", &report.redo_pm_by_handling);

    chart.heading(&mut out, "Formulas over time");
    chart.bars(&mut out, &series_rows(&report.over_time, |v| *v as f64, |v| v.to_string()));

    chart.heading(&mut out, "Stock over time (made / used)");
    for StockPoint { date, made, used } in &report.stock_over_time {
        let _ = writeln!(out, "  {}  {:>4} / {:<4}", date, made, used);
    }
    out
}

/// Render the incident cost dashboard for a terminal `width` columns wide.
pub fn render_costs(report: &CostReport, width: usize) -> String {
    let chart = Chart::new(width);
    let mut out = String::new();
    header(&mut out, "Incident costs", &report.range, report.group);
    skipped_note(&mut out, report.skipped);
    if report.is_empty() {
        let _ = writeln!(out, "  No incidents in this period.");
        return out;
    }

    let k = &report.kpis;
    chart.kpis(
        &mut out,
        &[
            ("Total", format_money(k.total_cost)),
            ("Incidents", k.incidents.to_string()),
            ("Average", format_money(k.average_cost)),
        ],
    );

    chart.heading(&mut out, "Cost over time");
    chart.bars(&mut out, &series_rows(&report.over_time, |v| *v, |v| format_money(*v)));
    chart.amounts(&mut out, "Cost per employee", &report.by_employee);
    chart.amounts(&mut out, "Cost per error type", &report.by_error_type);
    chart.amounts(&mut out, "Cost by status", &report.by_status);
    out
}

fn series_rows<V>(
    points: &[Point<V>],
    magnitude: impl Fn(&V) -> f64,
    shown: impl Fn(&V) -> String,
) -> Vec<(String, f64, String)> {
    points
        .iter()
        .map(|p| (p.date.to_string(), magnitude(&p.value), shown(&p.value)))
        .collect()
}
