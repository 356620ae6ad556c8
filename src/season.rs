use chrono::{Datelike, NaiveDate};

use crate::error::{ClimateError, Result};
use crate::models::Season;

/// Season of each month, January first.
const SEASON_BY_MONTH: [Season; 12] = [
    Season::Winter,
    Season::Winter,
    Season::Spring,
    Season::Spring,
    Season::Spring,
    Season::Summer,
    Season::Summer,
    Season::Summer,
    Season::Autumn,
    Season::Autumn,
    Season::Autumn,
    Season::Winter,
];

/// Maps a calendar month (1-12) to its season.
pub fn season_of(month: u32) -> Result<Season> {
    if !(1..=12).contains(&month) {
        return Err(ClimateError::InvalidInput(format!(
            "month must be in 1..=12, got {}",
            month
        )));
    }
    Ok(SEASON_BY_MONTH[(month - 1) as usize])
}

/// Season of a date. `month0` is always in 0..=11.
pub fn season_of_date(date: NaiveDate) -> Season {
    SEASON_BY_MONTH[date.month0() as usize]
}
