//! Built-in national and regional holiday calendar.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};

use super::HolidaySource;

/// Fixed-date national holidays in Spain, as (month, day).
const NATIONAL_FIXED: &[(u32, u32)] = &[
    (1, 1),   // Año Nuevo
    (1, 6),   // Epifanía del Señor
    (5, 1),   // Fiesta del Trabajo
    (8, 15),  // Asunción de la Virgen
    (10, 12), // Fiesta Nacional de España
    (11, 1),  // Todos los Santos
    (12, 6),  // Día de la Constitución
    (12, 8),  // Inmaculada Concepción
    (12, 25), // Navidad
];

/// Fixed-date regional holidays in the Comunidad de Madrid.
const MADRID_FIXED: &[(u32, u32)] = &[
    (5, 2), // Fiesta de la Comunidad de Madrid
];

/// Holidays the Comunidad de Madrid adds by yearly decree, as
/// (year, [(month, day)]). These are Santiago Apóstol or San José in the
/// years the region takes them, and the Monday that replaces a holiday
/// falling on a Sunday.
const MADRID_DECREES: &[(i32, &[(u32, u32)])] = &[
    (2021, &[(3, 19), (5, 3), (8, 16)]),
    (2022, &[(7, 25), (12, 26)]),
    (2023, &[(1, 2), (3, 20)]),
    (2024, &[(7, 25)]),
    (2025, &[(7, 25)]),
    (2026, &[(11, 2), (12, 7)]),
];

/// Spanish national holidays plus the Comunidad de Madrid regional ones.
///
/// Covers the fixed-date holidays, the Easter-relative ones (Holy Thursday
/// and Good Friday) and the dates set by each year's regional decree.
/// Years without a published decree get the fixed and Easter-relative
/// holidays only. Municipal holidays are not included; they come from the
/// local override file.
#[derive(Debug, Clone, Copy, Default)]
pub struct MadridCalendar;

/// Dates added by the regional decree for `year`, if one is known.
fn decree_holidays(year: i32) -> impl Iterator<Item = NaiveDate> {
    MADRID_DECREES
        .iter()
        .filter(move |(y, _)| *y == year)
        .flat_map(|(_, dates)| dates.iter())
        .filter_map(move |&(month, day)| NaiveDate::from_ymd_opt(year, month, day))
}

impl HolidaySource for MadridCalendar {
    fn holidays(&self, year: i32) -> HashSet<NaiveDate> {
        let fixed = NATIONAL_FIXED
            .iter()
            .chain(MADRID_FIXED)
            .filter_map(|&(month, day)| NaiveDate::from_ymd_opt(year, month, day));

        let easter_relative = easter_sunday(year).into_iter().flat_map(|easter| {
            [
                easter.checked_sub_days(Days::new(3)), // Jueves Santo
                easter.checked_sub_days(Days::new(2)), // Viernes Santo
            ]
            .into_iter()
            .flatten()
        });

        fixed
            .chain(easter_relative)
            .chain(decree_holidays(year))
            .collect()
    }
}

/// Gregorian Easter Sunday (anonymous Gregorian algorithm).
///
/// Returns `None` only for years chrono cannot represent.
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b.div_euclid(4);
    let e = b.rem_euclid(4);
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c.div_euclid(4);
    let k = c.rem_euclid(4);
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l).div_euclid(451);
    let month = (h + l - 7 * m + 114).div_euclid(31);
    let day = (h + l - 7 * m + 114).rem_euclid(31) + 1;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}
