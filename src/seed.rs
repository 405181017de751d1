//! Fake-data generators for exercising the dashboards.

use chrono::{Days, Duration, NaiveDate};
use pharmalog_common::{FORMULA_TYPES, FormulaRecord, IncidentRecord, Shift};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Employees used when the store has none.
pub const DEFAULT_ROSTER: [&str; 7] = ["Alice", "Bob", "Charlie", "Dani", "David", "Tati", "cae"];

/// Error types used when the vocabulary is empty.
pub const DEFAULT_ERROR_TYPES: [&str; 5] = [
    "Pesagem",
    "Rótulo",
    "Manipulação",
    "Embalagem",
    "Digitação",
];

const NR_BASE: i64 = 1_000_000;

/// Window of generated dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedWindow {
    pub end: NaiveDate,
    /// Dates fall in `end - days ..= end`
    pub days: i64,
}

impl Default for SeedWindow {
    fn default() -> Self {
        Self {
            end: NaiveDate::from_ymd_opt(2025, 9, 15).unwrap_or_default(),
            days: 180,
        }
    }
}

impl SeedWindow {
    /// `None` when the window would start before the earliest representable date.
    pub fn new(end: NaiveDate, days: i64) -> Option<Self> {
        if days < 0 {
            return None;
        }
        end.checked_sub_signed(Duration::try_days(days)?)?;
        Some(Self { end, days })
    }
}

pub struct Generator {
    rng: StdRng,
    window: SeedWindow,
}

impl Generator {
    /// A seeded generator produces the same records on every run.
    pub fn new(seed: Option<u64>, window: SeedWindow) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, window }
    }

    fn date(&mut self) -> NaiveDate {
        let back = self.rng.gen_range(0..=self.window.days.max(0));
        self.window
            .end
            .checked_sub_days(Days::new(back.unsigned_abs()))
            .unwrap_or(self.window.end)
    }

    fn pick(&mut self, items: &[String]) -> String {
        items.choose(&mut self.rng).cloned().unwrap_or_default()
    }

    pub fn formulas(&mut self, count: usize, roster: &[String]) -> Vec<FormulaRecord> {
        let roster = or_default(roster, &DEFAULT_ROSTER);
        (0..count)
            .map(|_| {
                let hour = self.rng.gen_range(7..=18);
                let minute = self.rng.gen_range(0..=59);
                let shift = if hour < 12 { Shift::Manha } else { Shift::Tarde };
                FormulaRecord {
                    date: self.date().format("%Y-%m-%d").to_string(),
                    time: Some(format!("{:02}:{:02}", hour, minute)),
                    nr: NR_BASE + self.rng.gen_range(1..=1_000_000),
                    shift: Some(shift),
                    formula_type: FORMULA_TYPES
                        .choose(&mut self.rng)
                        .map(|t| t.to_string())
                        .unwrap_or_default(),
                    weighing_employee: self.pick(&roster),
                    handling_employee: self.pick(&roster),
                    pm_employee: self.pick(&roster),
                    redo_pm: self.rng.gen_bool(1.0 / 3.0),
                    redo_exc: self.rng.gen_bool(1.0 / 3.0),
                    stock_used: self.rng.gen_bool(0.5),
                    stock_made: self.rng.gen_bool(0.5),
                    pm_over_20: self.rng.gen_bool(0.1),
                }
            })
            .collect()
    }

    pub fn incidents(
        &mut self,
        count: usize,
        roster: &[String],
        error_types: &[String],
    ) -> Vec<IncidentRecord> {
        let roster = or_default(roster, &DEFAULT_ROSTER);
        let error_types = or_default(error_types, &DEFAULT_ERROR_TYPES);
        (0..count)
            .map(|_| {
                let tags = if error_types.len() > 1 && self.rng.gen_bool(0.2) { 2 } else { 1 };
                let value = (self.rng.gen_range(5.0..=500.0_f64) * 100.0).round() / 100.0;
                IncidentRecord {
                    date: self.date().format("%Y-%m-%d").to_string(),
                    time: format!(
                        "{:02}:{:02}",
                        self.rng.gen_range(7..=18),
                        self.rng.gen_range(0..=59)
                    ),
                    nr: (NR_BASE + self.rng.gen_range(1..=1_000_000)).to_string(),
                    error_types: error_types
                        .choose_multiple(&mut self.rng, tags)
                        .cloned()
                        .collect(),
                    employee: self.pick(&roster),
                    value,
                    discounted: self.rng.gen_bool(0.3),
                    billed: self.rng.gen_bool(0.3),
                    notes: None,
                }
            })
            .collect()
    }
}

fn or_default(given: &[String], fallback: &[&str]) -> Vec<String> {
    if given.is_empty() {
        fallback.iter().map(|s| s.to_string()).collect()
    } else {
        given.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> SeedWindow {
        SeedWindow::default()
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let a = Generator::new(Some(7), window()).formulas(20, &[]);
        let b = Generator::new(Some(7), window()).formulas(20, &[]);
        assert_eq!(a, b);
    }

    #[test]
    fn formulas_stay_in_window_and_roster() {
        let roster = vec!["Ana".to_string(), "Rui".to_string()];
        let records = Generator::new(Some(1), window()).formulas(200, &roster);
        assert_eq!(records.len(), 200);
        let start = window().end - Duration::days(180);
        for r in &records {
            let date = r.parsed_date().unwrap();
            assert!(date >= start && date <= window().end);
            assert!(roster.contains(&r.weighing_employee));
            assert!(r.nr > NR_BASE && r.nr <= NR_BASE + 1_000_000);
            assert!(FORMULA_TYPES.contains(&r.formula_type.as_str()));
        }
        // One in three over 200 rows lands well inside these bounds.
        let redo = records.iter().filter(|r| r.redo_pm).count();
        assert!((30..=110).contains(&redo), "redo_pm count {}", redo);
    }

    #[test]
    fn incidents_use_the_vocabulary() {
        let types = vec!["Rótulo".to_string(), "Pesagem".to_string()];
        let records = Generator::new(Some(3), window()).incidents(100, &[], &types);
        for r in &records {
            assert!(!r.error_types.is_empty());
            assert!(r.error_types.iter().all(|t| types.contains(t)));
            assert!((5.0..=500.0).contains(&r.value));
            assert!(DEFAULT_ROSTER.contains(&r.employee.as_str()));
        }
    }

    #[test]
    fn empty_vocabulary_falls_back_to_defaults() {
        let records = Generator::new(Some(5), window()).incidents(10, &[], &[]);
        assert!(records
            .iter()
            .flat_map(|r| &r.error_types)
            .all(|t| DEFAULT_ERROR_TYPES.contains(&t.as_str())));
    }

    #[test]
    fn window_must_fit_the_calendar() {
        let end = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        assert_eq!(SeedWindow::new(end, 180), Some(SeedWindow { end, days: 180 }));
        assert!(SeedWindow::new(end, -1).is_none());
        assert!(SeedWindow::new(end, 100_000_000).is_none());
        assert!(SeedWindow::new(end, i64::MAX).is_none());
    }
}
