//! Regional dust-soiling model with seasonal variation, tilt correction,
//! saturating accumulation and periodic cleaning.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Maximum soiling level [%]: beyond this, wind and gravity shed as much
/// dust as settles.
pub const MAX_SOILING: f64 = 15.0;

const DAYS_PER_YEAR: u16 = 365;

/// Cleaning frequencies evaluated by the schedule optimizer
/// (none, quarterly, bi-monthly, monthly, bi-weekly, weekly, twice weekly).
const CANDIDATE_FREQUENCIES: [u32; 7] = [0, 4, 6, 12, 24, 52, 104];

/// Season bands of the supported climate zones, by day of year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    PreMonsoon,
    Monsoon,
    PostMonsoon,
}

impl Season {
    /// Season band for a day of year: March-May is pre-monsoon,
    /// June-September is monsoon, the rest post-monsoon.
    pub fn from_day(day_of_year: u16) -> Self {
        match day_of_year {
            60..=151 => Season::PreMonsoon,
            152..=273 => Season::Monsoon,
            _ => Season::PostMonsoon,
        }
    }
}

/// Seasonal baseline soiling rates [% per day].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalRates {
    pub pre_monsoon: f64,
    pub monsoon: f64,
    pub post_monsoon: f64,
}

impl SeasonalRates {
    pub fn rate(&self, season: Season) -> f64 {
        match season {
            Season::PreMonsoon => self.pre_monsoon,
            Season::Monsoon => self.monsoon,
            Season::PostMonsoon => self.post_monsoon,
        }
    }
}

/// Gujarat baseline rates; monsoon rain keeps the panels nearly clean.
const GUJARAT_RATES: SeasonalRates = SeasonalRates {
    pre_monsoon: 0.55,
    monsoon: 0.10,
    post_monsoon: 0.35,
};

/// Baseline soiling rates for a climate zone (case-insensitive).
pub fn seasonal_rates(climate_zone: &str) -> Result<SeasonalRates> {
    match climate_zone.to_lowercase().as_str() {
        "gujarat" => Ok(GUJARAT_RATES),
        other => bail!("climate zone '{other}' not supported, only 'gujarat' is available"),
    }
}

/// Tilt correction for the baseline rate: steeper panels shed dust faster.
pub fn tilt_correction_factor(tilt_angle: f64) -> f64 {
    if tilt_angle < 10.0 {
        1.8
    } else if tilt_angle < 20.0 {
        1.3
    } else if tilt_angle < 30.0 {
        1.0
    } else {
        0.7
    }
}

/// Daily soiling rate for a given day, tilt and climate zone [% per day].
pub fn daily_soiling_rate(day_of_year: u16, tilt_angle: f64, climate_zone: &str) -> Result<f64> {
    let rates = seasonal_rates(climate_zone)?;
    Ok(rates.rate(Season::from_day(day_of_year)) * tilt_correction_factor(tilt_angle))
}

/// Average power loss over one year due to soiling [%].
///
/// Day-stepped simulation: accumulation saturates as the level approaches
/// [`MAX_SOILING`], and each cleaning event resets it to zero. The reported
/// loss is the mean of the 365 daily soiling levels.
pub fn annual_soiling_loss(
    climate_zone: &str,
    tilt_angle: f64,
    cleaning_frequency: u32,
) -> Result<f64> {
    let rates = seasonal_rates(climate_zone)?;
    let tilt_factor = tilt_correction_factor(tilt_angle);

    let days_between_cleaning = if cleaning_frequency > 0 {
        (f64::from(DAYS_PER_YEAR) / f64::from(cleaning_frequency)).ceil() as u32
    } else {
        u32::from(DAYS_PER_YEAR)
    };

    let mut total = 0.0;
    let mut current = 0.0_f64;
    let mut days_since_cleaning = 0u32;

    for day in 1..=DAYS_PER_YEAR {
        let daily_rate = rates.rate(Season::from_day(day)) * tilt_factor;

        // Dirtier panels pick up less new dust.
        let saturation = 1.0 - current / MAX_SOILING;
        current = (current + daily_rate * saturation).min(MAX_SOILING);
        total += current;

        if cleaning_frequency > 0 {
            days_since_cleaning += 1;
            if days_since_cleaning >= days_between_cleaning {
                current = 0.0;
                days_since_cleaning = 0;
            }
        }
    }

    Ok(total / f64::from(DAYS_PER_YEAR))
}

/// Cleaning-frequency option evaluated by the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningOption {
    /// Cleaning events per year.
    pub frequency: u32,
    /// Expected annual soiling loss [%], rounded to two decimals.
    pub annual_loss_percent: f64,
    pub description: String,
}

/// Optimized cleaning schedule with the full evaluated table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningPlan {
    pub optimal_frequency: u32,
    pub optimal_description: String,
    pub expected_annual_loss: f64,
    pub all_options: Vec<CleaningOption>,
}

/// Picks the cleaning frequency that balances soiling loss against cleaning
/// effort.
///
/// Each candidate is scored as `annual_loss + 0.1·frequency`; the linear
/// penalty keeps the optimum away from near-daily washing.
pub fn optimize_cleaning_schedule(
    soiling_rate: f64,
    tilt_angle: f64,
    climate_zone: &str,
) -> Result<CleaningPlan> {
    let _rate = soiling_rate; // the zone's seasonal table supersedes a flat caller rate

    let mut all_options = Vec::with_capacity(CANDIDATE_FREQUENCIES.len());
    for &frequency in &CANDIDATE_FREQUENCIES {
        let loss = annual_soiling_loss(climate_zone, tilt_angle, frequency)?;
        all_options.push(CleaningOption {
            frequency,
            annual_loss_percent: (loss * 100.0).round() / 100.0,
            description: frequency_description(frequency),
        });
    }

    let mut best = 0usize;
    let mut best_score = f64::INFINITY;
    for (i, option) in all_options.iter().enumerate() {
        let score = option.annual_loss_percent + 0.1 * f64::from(option.frequency);
        if score < best_score {
            best_score = score;
            best = i;
        }
    }

    Ok(CleaningPlan {
        optimal_frequency: all_options[best].frequency,
        optimal_description: all_options[best].description.clone(),
        expected_annual_loss: all_options[best].annual_loss_percent,
        all_options,
    })
}

fn frequency_description(frequency: u32) -> String {
    match frequency {
        0 => "No cleaning".to_string(),
        4 => "Quarterly".to_string(),
        6 => "Bi-monthly".to_string(),
        12 => "Monthly".to_string(),
        24 => "Bi-weekly".to_string(),
        52 => "Weekly".to_string(),
        104 => "Twice weekly".to_string(),
        other => format!("{other} times per year"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_bands() {
        assert_eq!(Season::from_day(1), Season::PostMonsoon);
        assert_eq!(Season::from_day(59), Season::PostMonsoon);
        assert_eq!(Season::from_day(60), Season::PreMonsoon);
        assert_eq!(Season::from_day(151), Season::PreMonsoon);
        assert_eq!(Season::from_day(152), Season::Monsoon);
        assert_eq!(Season::from_day(273), Season::Monsoon);
        assert_eq!(Season::from_day(274), Season::PostMonsoon);
        assert_eq!(Season::from_day(365), Season::PostMonsoon);
    }

    #[test]
    fn test_monsoon_rain_cleans() {
        let rates = seasonal_rates("gujarat").unwrap();
        assert!(rates.monsoon < rates.pre_monsoon);
        assert!(rates.monsoon < rates.post_monsoon);
    }

    #[test]
    fn test_unknown_zone_rejected() {
        assert!(seasonal_rates("sahara").is_err());
    }

    #[test]
    fn test_zone_name_case_insensitive() {
        assert_eq!(
            seasonal_rates("Gujarat").unwrap(),
            seasonal_rates("gujarat").unwrap()
        );
    }

    #[test]
    fn test_tilt_factor_bands() {
        assert_eq!(tilt_correction_factor(0.0), 1.8);
        assert_eq!(tilt_correction_factor(9.9), 1.8);
        assert_eq!(tilt_correction_factor(10.0), 1.3);
        assert_eq!(tilt_correction_factor(20.0), 1.0);
        assert_eq!(tilt_correction_factor(30.0), 0.7);
        assert_eq!(tilt_correction_factor(89.0), 0.7);
    }

    #[test]
    fn test_daily_rate_combines_season_and_tilt() {
        // Pre-monsoon day at a shallow tilt: 0.55 * 1.8.
        let rate = daily_soiling_rate(100, 5.0, "gujarat").unwrap();
        assert!((rate - 0.99).abs() < 1e-12);
    }

    #[test]
    fn test_uncleaned_gujarat_loss_in_expected_band() {
        let loss = annual_soiling_loss("gujarat", 25.0, 0).unwrap();
        assert!(
            (12.0..=15.0).contains(&loss),
            "Uncleaned Gujarat loss should land in 12-15%, got {loss}"
        );
    }

    #[test]
    fn test_steeper_tilt_soils_less() {
        let shallow = annual_soiling_loss("gujarat", 5.0, 0).unwrap();
        let steep = annual_soiling_loss("gujarat", 35.0, 0).unwrap();
        assert!(steep < shallow);
    }

    #[test]
    fn test_cleaning_reduces_loss() {
        let never = annual_soiling_loss("gujarat", 25.0, 0).unwrap();
        let monthly = annual_soiling_loss("gujarat", 25.0, 12).unwrap();
        let weekly = annual_soiling_loss("gujarat", 25.0, 52).unwrap();
        assert!(monthly < never);
        assert!(weekly < monthly);
    }

    #[test]
    fn test_soiling_never_exceeds_cap() {
        let loss = annual_soiling_loss("gujarat", 0.0, 0).unwrap();
        assert!(loss <= MAX_SOILING);
    }

    #[test]
    fn test_optimizer_covers_all_candidates() {
        let plan = optimize_cleaning_schedule(0.35, 25.0, "gujarat").unwrap();
        assert_eq!(plan.all_options.len(), CANDIDATE_FREQUENCIES.len());

        // The winner must actually minimize the scored table.
        let best_score = plan.expected_annual_loss + 0.1 * f64::from(plan.optimal_frequency);
        for option in &plan.all_options {
            let score = option.annual_loss_percent + 0.1 * f64::from(option.frequency);
            assert!(
                best_score <= score + 1e-9,
                "Option {} scores {score}, better than the chosen {best_score}",
                option.frequency
            );
        }
        assert!(!plan.optimal_description.is_empty());
    }

    #[test]
    fn test_optimizer_rejects_unknown_zone() {
        assert!(optimize_cleaning_schedule(0.35, 25.0, "mars").is_err());
    }
}
