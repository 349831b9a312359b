//! Admin dashboard figures.
//!
//! Patient and doctor counts and the average consultation time come from the
//! database. Peak hours and the no-show rate are SIMULATED placeholders drawn
//! from fixed ranges: nothing in the store feeds them. Keep them behind the
//! `simulated_*` functions so nobody mistakes them for measurements.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::{Consultation, Role, User};

/// Hour buckets and the inclusive range each simulated count is drawn from
pub const PEAK_HOUR_BUCKETS: [(&str, u32, u32); 3] = [
    ("9-10 AM", 30, 60),
    ("12-1 PM", 50, 80),
    ("3-4 PM", 40, 70),
];

/// Inclusive range of the simulated no-show rate, in percent
pub const NO_SHOW_RATE_RANGE: (f64, f64) = (5.0, 15.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakHour {
    pub hour: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub total_patients: i64,
    pub total_doctors: i64,
    pub avg_consultation_time: f64,
    /// Simulated, see module docs
    pub peak_hours: Vec<PeakHour>,
    /// Simulated, see module docs
    pub no_show_rate: f64,
}

/// Figures derived from stored records
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoredTotals {
    pub total_patients: i64,
    pub total_doctors: i64,
    pub avg_consultation_time: f64,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn simulated_peak_hours<R: Rng>(rng: &mut R) -> Vec<PeakHour> {
    PEAK_HOUR_BUCKETS
        .iter()
        .map(|(hour, low, high)| PeakHour {
            hour: hour.to_string(),
            count: rng.random_range(*low..=*high),
        })
        .collect()
}

pub fn simulated_no_show_rate<R: Rng>(rng: &mut R) -> f64 {
    let (low, high) = NO_SHOW_RATE_RANGE;
    round2(rng.random_range(low..=high))
}

pub async fn stored_totals(db: &SqlitePool) -> Result<StoredTotals, sqlx::Error> {
    let total_patients = User::count_by_role(db, Role::Patient).await?;
    let total_doctors = User::count_by_role(db, Role::Doctor).await?;
    let avg_consultation_time = Consultation::average_duration(db)
        .await?
        .map(round2)
        .unwrap_or(0.0);

    Ok(StoredTotals {
        total_patients,
        total_doctors,
        avg_consultation_time,
    })
}

impl AnalyticsReport {
    pub fn new<R: Rng>(totals: StoredTotals, rng: &mut R) -> Self {
        Self {
            total_patients: totals.total_patients,
            total_doctors: totals.total_doctors,
            avg_consultation_time: totals.avg_consultation_time,
            peak_hours: simulated_peak_hours(rng),
            no_show_rate: simulated_no_show_rate(rng),
        }
    }
}
