//! Calendario laboral y cálculo de fecha límite.
//!
//! La fecha límite automática camina hacia adelante desde hoy tantos días
//! hábiles como `ceil(minutos estimados / WORKING_MINUTES_PER_DAY)`, mínimo
//! un día hábil. Qué cuenta como día hábil lo decide un calendario: primero
//! la tabla de excepciones (feriados, sábados laborables), después la regla
//! estándar lunes-viernes.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use onboard_domain::Flow;
use std::collections::HashMap;

use crate::constants::WORKING_MINUTES_PER_DAY;

/// Consulta de días hábiles. Implementada por el calendario por defecto y
/// por la tabla de excepciones; el motor sólo conoce este trait.
pub trait WorkingCalendar: Send + Sync {
    fn is_working_day(&self, date: NaiveDate) -> bool;
}

/// Regla estándar: lunes a viernes.
#[derive(Debug, Default, Clone, Copy)]
pub struct WeekendCalendar;

impl WorkingCalendar for WeekendCalendar {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

/// Tabla de excepciones fecha -> es hábil, con fallback a la regla
/// estándar para fechas no listadas.
#[derive(Debug, Default, Clone)]
pub struct OverrideCalendar {
    overrides: HashMap<NaiveDate, bool>,
}

impl OverrideCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, date: NaiveDate, is_working_day: bool) {
        self.overrides.insert(date, is_working_day);
    }
}

impl WorkingCalendar for OverrideCalendar {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        match self.overrides.get(&date) {
            Some(is_working) => *is_working,
            None => WeekendCalendar.is_working_day(date),
        }
    }
}

/// Suma `days` días hábiles a `start` (exclusivo: el propio `start` no
/// cuenta).
pub fn add_working_days(calendar: &dyn WorkingCalendar, start: NaiveDate, days: u32) -> NaiveDate {
    let mut current = start;
    let mut added = 0;
    while added < days {
        current = current.checked_add_days(Days::new(1)).expect("date overflow");
        if calendar.is_working_day(current) {
            added += 1;
        }
    }
    current
}

/// Fecha límite automática para un flujo a partir de sus tiempos estimados.
pub fn estimate_completion_date(calendar: &dyn WorkingCalendar, flow: &Flow, today: NaiveDate) -> NaiveDate {
    let total_minutes = flow.total_estimated_minutes();
    let days = total_minutes.div_ceil(WORKING_MINUTES_PER_DAY).max(1);
    add_working_days(calendar, today, days)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekend_calendar_excludes_saturday_and_sunday() {
        let cal = WeekendCalendar;
        assert!(cal.is_working_day(date(2024, 1, 5))); // viernes
        assert!(!cal.is_working_day(date(2024, 1, 6))); // sábado
        assert!(!cal.is_working_day(date(2024, 1, 7))); // domingo
        assert!(cal.is_working_day(date(2024, 1, 8))); // lunes
    }

    #[test]
    fn add_working_days_skips_weekend() {
        // viernes + 1 hábil = lunes
        let result = add_working_days(&WeekendCalendar, date(2024, 1, 5), 1);
        assert_eq!(result, date(2024, 1, 8));
    }

    #[test]
    fn add_working_days_consults_overrides_first() {
        let mut cal = OverrideCalendar::new();
        cal.set(date(2024, 1, 8), false); // lunes feriado
        cal.set(date(2024, 1, 6), true); // sábado laborable
        // viernes + 1 hábil = sábado (laborable por excepción)
        assert_eq!(add_working_days(&cal, date(2024, 1, 5), 1), date(2024, 1, 6));
        // viernes + 2 hábiles salta el feriado del lunes
        assert_eq!(add_working_days(&cal, date(2024, 1, 5), 2), date(2024, 1, 9));
    }

    #[test]
    fn add_working_days_zero_returns_start() {
        assert_eq!(add_working_days(&WeekendCalendar, date(2024, 1, 5), 0), date(2024, 1, 5));
    }
}
