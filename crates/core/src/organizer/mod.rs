//! Organizer module for series folders.
//!
//! Episodes are grouped by the season number found in their file names and
//! moved into one folder per season.

mod season;
mod series;

pub use season::detect_season;
pub use series::{
    organize_series, season_dir_name, OrganizerError, SeriesReport, FALLBACK_SEASON,
};
