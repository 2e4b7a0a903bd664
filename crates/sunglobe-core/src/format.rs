//! Display formatting for zone time
//!
//! Produces a short weekday, the date with an abbreviated month, and the
//! time with seconds, laid out the way each locale's browsers render it.

use chrono::{Datelike, Timelike};

use crate::ZoneTime;

const PT_BR_WEEKDAYS: [&str; 7] = ["seg.", "ter.", "qua.", "qui.", "sex.", "sáb.", "dom."];
const PT_BR_MONTHS: [&str; 12] = [
    "jan.", "fev.", "mar.", "abr.", "mai.", "jun.", "jul.", "ago.", "set.", "out.", "nov.", "dez.",
];

const EN_US_WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const EN_US_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Display locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// `seg., 01 de jan. de 2024, 10:00:05`
    #[default]
    PtBr,
    /// `Mon, Jan 01, 2024, 10:00:05 AM`
    EnUs,
}

impl Locale {
    pub fn format(&self, time: &ZoneTime) -> String {
        let fields = time.naive();
        let weekday = fields.weekday().num_days_from_monday() as usize;
        let month = fields.month0() as usize;
        let (day, year) = (fields.day(), fields.year());
        let (hour, minute, second) = (fields.hour(), fields.minute(), fields.second());

        match self {
            Locale::PtBr => format!(
                "{}, {:02} de {} de {}, {:02}:{:02}:{:02}",
                PT_BR_WEEKDAYS[weekday], day, PT_BR_MONTHS[month], year, hour, minute, second
            ),
            Locale::EnUs => {
                let (is_pm, hour12) = fields.hour12();
                format!(
                    "{}, {} {:02}, {}, {:02}:{:02}:{:02} {}",
                    EN_US_WEEKDAYS[weekday],
                    EN_US_MONTHS[month],
                    day,
                    year,
                    hour12,
                    minute,
                    second,
                    if is_pm { "PM" } else { "AM" }
                )
            }
        }
    }
}
