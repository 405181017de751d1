use chrono::NaiveDate;
use pharmalog_common::FormulaRecord;
use serde::Serialize;

use super::{Count, DateRange, Granularity, Point, ReportFilter, count_by, select, series};

const NO_SHIFT: &str = "Não informado";

/// Exception totals shown as KPI cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductionKpis {
    pub redo_pm: u64,
    pub redo_exc: u64,
    pub stock_used: u64,
    pub stock_made: u64,
    pub pm_over_20: u64,
}

/// Stock made and used per time bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockPoint {
    pub date: NaiveDate,
    pub made: u64,
    pub used: u64,
}

/// The formula production dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ProductionReport {
    pub range: DateRange,
    pub group: Granularity,
    pub total: usize,
    pub skipped: usize,
    pub kpis: ProductionKpis,
    pub by_formula_type: Vec<Count>,
    pub by_shift: Vec<Count>,
    /// Participation in any of the three roles
    pub by_employee: Vec<Count>,
    pub by_weighing: Vec<Count>,
    pub by_handling: Vec<Count>,
    pub by_pm: Vec<Count>,
    pub stock_made_by_handling: Vec<Count>,
    pub redo_exc_by_weighing: Vec<Count>,
    pub redo_pm_by_handling: Vec<Count>,
    pub over_time: Vec<Point<u64>>,
    pub stock_over_time: Vec<StockPoint>,
}

impl ProductionReport {
    pub fn build(
        records: &[FormulaRecord],
        filter: &ReportFilter,
        default_group: Granularity,
        today: NaiveDate,
    ) -> Self {
        let group = filter.group.unwrap_or(default_group);
        let selection = select(records, filter, today);
        let rows: Vec<&FormulaRecord> = selection.rows.iter().map(|(_, r)| *r).collect();

        let kpis = ProductionKpis {
            redo_pm: flagged(&rows, |r| r.redo_pm),
            redo_exc: flagged(&rows, |r| r.redo_exc),
            stock_used: flagged(&rows, |r| r.stock_used),
            stock_made: flagged(&rows, |r| r.stock_made),
            pm_over_20: flagged(&rows, |r| r.pm_over_20),
        };

        let by_employee = count_by(
            rows.iter()
                .flat_map(|r| r.staff())
                .map(|(_, name)| name.trim())
                .filter(|name| !name.is_empty()),
        );

        let over_time = series(selection.rows.iter().map(|(d, _)| (*d, 1u64)), group);
        let made = series(
            selection.rows.iter().map(|(d, r)| (*d, u64::from(r.stock_made))),
            group,
        );
        let used = series(
            selection.rows.iter().map(|(d, r)| (*d, u64::from(r.stock_used))),
            group,
        );
        let stock_over_time = made
            .into_iter()
            .zip(used)
            .map(|(m, u)| StockPoint {
                date: m.date,
                made: m.value,
                used: u.value,
            })
            .collect();

        Self {
            range: selection.range,
            group,
            total: rows.len(),
            skipped: selection.skipped,
            kpis,
            by_formula_type: count_by(rows.iter().map(|r| r.formula_type.as_str())),
            by_shift: count_by(
                rows.iter()
                    .map(|r| r.shift.map(|s| s.label()).unwrap_or(NO_SHIFT)),
            ),
            by_employee,
            by_weighing: names(&rows, |_| true, |r| &r.weighing_employee),
            by_handling: names(&rows, |_| true, |r| &r.handling_employee),
            by_pm: names(&rows, |_| true, |r| &r.pm_employee),
            stock_made_by_handling: names(&rows, |r| r.stock_made, |r| &r.handling_employee),
            redo_exc_by_weighing: names(&rows, |r| r.redo_exc, |r| &r.weighing_employee),
            redo_pm_by_handling: names(&rows, |r| r.redo_pm, |r| &r.handling_employee),
            over_time,
            stock_over_time,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

fn flagged(rows: &[&FormulaRecord], flag: impl Fn(&FormulaRecord) -> bool) -> u64 {
    rows.iter().filter(|r| flag(r)).count() as u64
}

fn names<'a>(
    rows: &[&'a FormulaRecord],
    keep: impl Fn(&FormulaRecord) -> bool,
    field: impl Fn(&'a FormulaRecord) -> &'a String,
) -> Vec<Count> {
    count_by(
        rows.iter()
            .filter(|r| keep(r))
            .map(|r| field(*r).trim())
            .filter(|name| !name.is_empty()),
    )
}
