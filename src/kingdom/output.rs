//! Reports and batch statistics

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::kingdom::rules::TERM_YEARS;

/// Read-only copy of a kingdom at the end of a year
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearReport {
    pub year_of_rule: u32,
    pub population: u32,
    pub acreage: u32,
    pub grain: u32,
    pub price_per_acre: u32,
    pub next_year_price_per_acre: u32,
    pub harvest_per_acre: u32,
    pub percent_eaten_by_rats: u32,
    pub plague_happened: bool,
    pub starvation_victims: u32,
    pub plague_victims: u32,
    pub immigrants: u32,
    pub grain_harvested: u32,
    pub grain_eaten_by_rats: u32,
    pub still_in_office: bool,
}

impl YearReport {
    /// The steward's address to the ruler before the coming year
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "_".repeat(67),
            "O Great Hammurabi!".to_string(),
            format!(
                "You are in year {} of your ten year rule.",
                self.year_of_rule + 1
            ),
        ];

        if self.plague_victims > 0 {
            lines.push(format!("A horrible plague killed {} people.", self.plague_victims));
        }
        lines.push(format!(
            "In the previous year {} people starved to death.",
            self.starvation_victims
        ));
        lines.push(format!(
            "In the previous year {} people entered the kingdom.",
            self.immigrants
        ));
        lines.push(format!("The population is now {}.", self.population));
        lines.push(format!(
            "We harvested {} bushels at {} bushels per acre.",
            self.grain_harvested, self.harvest_per_acre
        ));
        if self.grain_eaten_by_rats > 0 {
            lines.push(format!(
                "*** Rats destroyed {} bushels, leaving {} bushels in storage.",
                self.grain_eaten_by_rats, self.grain
            ));
        } else {
            lines.push(format!("We have {} bushels of grain in storage.", self.grain));
        }
        lines.push(format!("The city owns {} acres of land.", self.acreage));
        lines.push(format!(
            "Land is currently worth {} bushels per acre.",
            self.next_year_price_per_acre
        ));

        lines.join("\n")
    }
}

/// How a single reign ended
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub final_state: YearReport,
    /// One report per year played; empty unless history was requested
    pub history: Vec<YearReport>,
}

impl TrialOutcome {
    /// Served the whole term
    pub fn completed_term(&self) -> bool {
        self.final_state.year_of_rule >= TERM_YEARS && self.final_state.population > 0
    }

    /// Thrown out early because too many starved
    pub fn ended_by_starvation(&self) -> bool {
        self.final_state.year_of_rule < TERM_YEARS && self.final_state.population > 0
    }

    /// No subjects left to rule
    pub fn depopulated(&self) -> bool {
        self.final_state.population == 0
    }
}

/// Running totals for a set of trials
///
/// Partial tallies from separate workers combine with [`BatchTally::merge`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchTally {
    pub trials: u64,
    pub completed_terms: u64,
    pub ended_by_starvation: u64,
    pub depopulated: u64,
    pub total_population: u64,
    pub total_acreage: u64,
    pub total_grain: u64,
}

impl BatchTally {
    pub fn record(&mut self, outcome: &TrialOutcome) {
        self.trials += 1;
        if outcome.completed_term() {
            self.completed_terms += 1;
        }
        if outcome.ended_by_starvation() {
            self.ended_by_starvation += 1;
        }
        if outcome.depopulated() {
            self.depopulated += 1;
        }
        self.total_population += u64::from(outcome.final_state.population);
        self.total_acreage += u64::from(outcome.final_state.acreage);
        self.total_grain += u64::from(outcome.final_state.grain);
    }

    pub fn merge(mut self, other: BatchTally) -> BatchTally {
        self.trials += other.trials;
        self.completed_terms += other.completed_terms;
        self.ended_by_starvation += other.ended_by_starvation;
        self.depopulated += other.depopulated;
        self.total_population += other.total_population;
        self.total_acreage += other.total_acreage;
        self.total_grain += other.total_grain;
        self
    }
}

/// Statistics for a finished batch
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchSummary {
    pub threads: usize,
    pub trials: u64,
    pub completed_terms: u64,
    pub ended_by_starvation: u64,
    pub depopulated: u64,
    pub mean_final_population: f64,
    pub mean_final_acreage: f64,
    pub mean_final_grain: f64,
    pub simulation_time_ms: u64,
}

impl BatchSummary {
    pub fn new(threads: usize, tally: BatchTally, elapsed: Duration) -> Self {
        let mean = |total: u64| {
            if tally.trials > 0 {
                total as f64 / tally.trials as f64
            } else {
                0.0
            }
        };

        Self {
            threads,
            trials: tally.trials,
            completed_terms: tally.completed_terms,
            ended_by_starvation: tally.ended_by_starvation,
            depopulated: tally.depopulated,
            mean_final_population: mean(tally.total_population),
            mean_final_acreage: mean(tally.total_acreage),
            mean_final_grain: mean(tally.total_grain),
            simulation_time_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        format!(
            "Ran {} trials on {} threads in {}ms\n{} full terms, {} overthrown for starvation, {} depopulated\nMean final population {:.1}, acreage {:.1}, grain {:.1}",
            self.trials,
            self.threads,
            self.simulation_time_ms,
            self.completed_terms,
            self.ended_by_starvation,
            self.depopulated,
            self.mean_final_population,
            self.mean_final_acreage,
            self.mean_final_grain,
        )
    }
}
