//! Interactive terminal forms.

use anyhow::Result;
use chrono::NaiveDate;
use dialoguer::{Confirm, Input, MultiSelect, Select, theme::ColorfulTheme};
use pharmalog_common::{Employee, FORMULA_TYPES, Role, Shift};

use super::{FormulaDraft, IncidentDraft};
use crate::errors::ValidationError;

const NO_PM: &str = "(none)";

/// Ask for a new employee's name and role.
pub fn employee_form() -> Result<(String, Option<Role>)> {
    let theme = ColorfulTheme::default();
    let name: String = Input::with_theme(&theme)
        .with_prompt("Employee name")
        .interact_text()?;
    let pharmacist = Confirm::with_theme(&theme)
        .with_prompt("Pharmacist (Farmaceutico)?")
        .default(false)
        .interact()?;
    let role = if pharmacist {
        Role::Farmaceutico
    } else {
        Role::Operador
    };
    Ok((name, Some(role)))
}

/// Ask for a single free-text value, e.g. a new error type.
pub fn text(prompt: &str) -> Result<String> {
    Ok(Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()?)
}

/// Pick one entry from `items`.
pub fn choose(prompt: &str, items: &[String]) -> Result<String> {
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()?;
    Ok(items[index].clone())
}

pub fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Collect a formula draft. `default_date` is shown as the hint for an empty date.
pub fn formula_form(employees: &[Employee], default_date: NaiveDate) -> Result<FormulaDraft> {
    let theme = ColorfulTheme::default();
    let names: Vec<String> = employees.iter().map(|e| e.name.clone()).collect();

    let date: String = Input::with_theme(&theme)
        .with_prompt(format!("Date (YYYY-MM-DD, empty for {})", default_date))
        .allow_empty(true)
        .interact_text()?;
    let nr: String = Input::with_theme(&theme)
        .with_prompt("NR")
        .interact_text()?;

    let shift_labels: Vec<&str> = Shift::ALL.iter().map(|s| s.label()).collect();
    let shift = Select::with_theme(&theme)
        .with_prompt("Shift")
        .items(&shift_labels)
        .default(0)
        .interact()?;

    let formula_type = Select::with_theme(&theme)
        .with_prompt("Formula type")
        .items(&FORMULA_TYPES)
        .default(0)
        .interact()?;

    let weighing = pick_employee(&theme, "Weighing", &names)?;
    let handling = pick_employee(&theme, "Handling", &names)?;

    // Pharmacists first; PM verification is usually theirs.
    let mut pm_choices: Vec<String> = vec![NO_PM.to_string()];
    pm_choices.extend(employees.iter().filter(|e| e.is_pharmacist()).map(|e| e.name.clone()));
    pm_choices.extend(employees.iter().filter(|e| !e.is_pharmacist()).map(|e| e.name.clone()));
    let pm = Select::with_theme(&theme)
        .with_prompt("PM")
        .items(&pm_choices)
        .default(0)
        .interact()?;

    let flags = [
        "Redo PM",
        "Redo EXC",
        "Stock used",
        "Stock made",
        "PM over 20",
    ];
    let checked = MultiSelect::with_theme(&theme)
        .with_prompt("Flags (space to toggle)")
        .items(&flags)
        .interact()?;

    Ok(FormulaDraft {
        date,
        nr,
        shift: Shift::ALL[shift].to_string(),
        formula_type: FORMULA_TYPES[formula_type].to_string(),
        weighing_employee: weighing,
        handling_employee: handling,
        pm_employee: if pm == 0 {
            String::new()
        } else {
            pm_choices[pm].clone()
        },
        redo_pm: checked.contains(&0),
        redo_exc: checked.contains(&1),
        stock_used: checked.contains(&2),
        stock_made: checked.contains(&3),
        pm_over_20: checked.contains(&4),
        ..Default::default()
    })
}

/// Collect an incident draft. Refuses to start without an error-type vocabulary.
pub fn incident_form(employees: &[Employee], error_types: &[String]) -> Result<IncidentDraft> {
    if error_types.is_empty() {
        return Err(ValidationError::NoErrorTypes.into());
    }
    let theme = ColorfulTheme::default();
    let names: Vec<String> = employees.iter().map(|e| e.name.clone()).collect();

    let nr: String = Input::with_theme(&theme)
        .with_prompt("NR")
        .interact_text()?;
    let picked = MultiSelect::with_theme(&theme)
        .with_prompt("Error type(s) (space to toggle)")
        .items(error_types)
        .interact()?;
    let employee = pick_employee(&theme, "Responsible employee", &names)?;
    let value: String = Input::with_theme(&theme)
        .with_prompt("Value (R$)")
        .interact_text()?;
    let discounted = Confirm::with_theme(&theme)
        .with_prompt("Discounted?")
        .default(false)
        .interact()?;
    let billed = Confirm::with_theme(&theme)
        .with_prompt("Billed?")
        .default(false)
        .interact()?;
    let notes: String = Input::with_theme(&theme)
        .with_prompt("Notes")
        .allow_empty(true)
        .interact_text()?;

    Ok(IncidentDraft {
        nr,
        error_types: picked.into_iter().map(|i| error_types[i].clone()).collect(),
        employee,
        value,
        discounted,
        billed,
        notes,
        ..Default::default()
    })
}

/// Select from the registered names, or type one when none are registered.
fn pick_employee(theme: &ColorfulTheme, prompt: &str, names: &[String]) -> Result<String> {
    if names.is_empty() {
        return Ok(Input::with_theme(theme)
            .with_prompt(format!("{} (no employees registered)", prompt))
            .interact_text()?);
    }
    let index = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(names)
        .default(0)
        .interact()?;
    Ok(names[index].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incident_form_refuses_without_error_types() {
        let err = incident_form(&[Employee::new("Alice", None)], &[]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::NoErrorTypes)
        );
    }
}
