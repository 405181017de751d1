use std::collections::BTreeMap;

use chrono::NaiveDate;
use pharmalog_common::{IncidentRecord, IncidentStatus};
use serde::Serialize;

use super::{Amount, DateRange, Granularity, Point, ReportFilter, select, series, sum_by};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostKpis {
    pub total_cost: f64,
    pub incidents: usize,
    pub average_cost: f64,
}

/// The incident cost dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct CostReport {
    pub range: DateRange,
    pub group: Granularity,
    pub skipped: usize,
    pub kpis: CostKpis,
    pub over_time: Vec<Point<f64>>,
    /// Smallest loss first
    pub by_employee: Vec<Amount>,
    /// Largest loss first; a record with several error types counts toward each
    pub by_error_type: Vec<Amount>,
    pub by_status: Vec<Amount>,
}

impl CostReport {
    pub fn build(
        records: &[IncidentRecord],
        filter: &ReportFilter,
        default_group: Granularity,
        today: NaiveDate,
    ) -> Self {
        let group = filter.group.unwrap_or(default_group);
        let selection = select(records, filter, today);
        let rows: Vec<&IncidentRecord> = selection.rows.iter().map(|(_, r)| *r).collect();

        let total_cost: f64 = rows.iter().map(|r| r.value).sum();
        let incidents = rows.len();
        let average_cost = if incidents == 0 {
            0.0
        } else {
            total_cost / incidents as f64
        };

        let mut by_employee = sum_by(rows.iter().map(|r| (r.employee.as_str(), r.value)));
        by_employee.sort_by(|a, b| a.value.total_cmp(&b.value).then_with(|| a.label.cmp(&b.label)));

        let mut by_error_type = sum_by(
            rows.iter()
                .flat_map(|r| r.error_types.iter().map(move |t| (t.as_str(), r.value))),
        );
        by_error_type
            .sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.label.cmp(&b.label)));

        let mut statuses: BTreeMap<IncidentStatus, f64> = BTreeMap::new();
        for r in &rows {
            *statuses.entry(r.status()).or_default() += r.value;
        }
        let by_status = statuses
            .into_iter()
            .map(|(status, value)| Amount {
                label: status.label().to_string(),
                value,
            })
            .collect();

        Self {
            range: selection.range,
            group,
            skipped: selection.skipped,
            kpis: CostKpis {
                total_cost,
                incidents,
                average_cost,
            },
            over_time: series(selection.rows.iter().map(|(d, r)| (*d, r.value)), group),
            by_employee,
            by_error_type,
            by_status,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kpis.incidents == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn incident(date: &str, employee: &str, types: &[&str], value: f64) -> IncidentRecord {
        IncidentRecord {
            date: date.into(),
            time: "10:00".into(),
            nr: "100".into(),
            error_types: types.iter().map(|t| t.to_string()).collect(),
            employee: employee.into(),
            value,
            discounted: false,
            billed: false,
            notes: None,
        }
    }

    fn sample() -> Vec<IncidentRecord> {
        let mut billed = incident("2025-10-01", "Alice", &["Rótulo"], 100.0);
        billed.billed = true;
        let mut discounted = incident("2025-10-02", "Bob", &["Pesagem", "Rótulo"], 40.0);
        discounted.discounted = true;
        let open = incident("2025-10-04", "Bob", &["Pesagem"], 10.0);
        vec![billed, discounted, open]
    }

    #[test]
    fn kpis_sum_and_average() {
        let report = CostReport::build(&sample(), &ReportFilter::default(), Granularity::Day, d(2025, 10, 10));
        assert_eq!(report.kpis.incidents, 3);
        assert!((report.kpis.total_cost - 150.0).abs() < 1e-9);
        assert!((report.kpis.average_cost - 50.0).abs() < 1e-9);
    }

    #[test]
    fn employee_costs_ascending_and_type_costs_descending() {
        let report = CostReport::build(&sample(), &ReportFilter::default(), Granularity::Day, d(2025, 10, 10));
        let employees: Vec<(&str, f64)> = report
            .by_employee
            .iter()
            .map(|a| (a.label.as_str(), a.value))
            .collect();
        assert_eq!(employees, vec![("Bob", 50.0), ("Alice", 100.0)]);

        let types: Vec<(&str, f64)> = report
            .by_error_type
            .iter()
            .map(|a| (a.label.as_str(), a.value))
            .collect();
        assert_eq!(types, vec![("Rótulo", 140.0), ("Pesagem", 50.0)]);
    }

    #[test]
    fn status_split_and_daily_series() {
        let report = CostReport::build(&sample(), &ReportFilter::default(), Granularity::Day, d(2025, 10, 10));
        let status: Vec<&str> = report.by_status.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(status, vec!["Cobrado", "Desconto", "Pendente/Prejuízo"]);

        let values: Vec<f64> = report.over_time.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![100.0, 40.0, 0.0, 10.0]);
    }

    #[test]
    fn empty_store_gives_empty_report() {
        let report = CostReport::build(&[], &ReportFilter::default(), Granularity::Month, d(2025, 10, 10));
        assert!(report.is_empty());
        assert_eq!(report.kpis.average_cost, 0.0);
        assert_eq!(report.range.start, d(2025, 10, 10));
    }
}
