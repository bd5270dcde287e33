//! KingdomState - the per-trial economic and demographic state
//!
//! A reign is advanced one year at a time by [`KingdomState::tally_up_year`].
//! Each year resources are drawn down in a fixed order: land trades, feeding,
//! planting, harvest and rats, then plague, starvation and immigration. The
//! order decides who gets scarce grain first and must not change.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{KingdomError, Result};
use crate::kingdom::events::{EventSource, YearlyDraws};
use crate::kingdom::output::YearReport;
use crate::kingdom::rules::*;

/// The four choices a ruler makes each year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RulerDecisions {
    pub acres_to_buy: u32,
    pub acres_to_sell: u32,
    pub grain_for_food: u32,
    pub acres_to_plant: u32,
}

impl RulerDecisions {
    pub const fn new(acres_to_buy: u32, acres_to_sell: u32, grain_for_food: u32, acres_to_plant: u32) -> Self {
        Self {
            acres_to_buy,
            acres_to_sell,
            grain_for_food,
            acres_to_plant,
        }
    }
}

/// State of one kingdom over one reign
#[derive(Debug, Clone)]
pub struct KingdomState<R = ChaCha8Rng> {
    events: EventSource<R>,

    still_in_office: bool,

    year_of_rule: u32,
    population: u32,
    acreage: u32,
    grain: u32,

    price_per_acre: u32,
    next_year_price_per_acre: u32,

    // This year's random outcomes
    harvest_per_acre: u32,
    percent_eaten_by_rats: u32,
    plague_happened: bool,

    // This year's derived counters, overwritten every year
    starvation_victims: u32,
    plague_victims: u32,
    immigrants: u32,
    grain_harvested: u32,
    grain_eaten_by_rats: u32,
}

impl<R: Rng> KingdomState<R> {
    /// Set up a fresh kingdom at the start of a reign.
    ///
    /// Draws the first year's land price from `events`.
    pub fn new(mut events: EventSource<R>) -> Self {
        let next_year_price_per_acre = events.price_per_acre();

        Self {
            events,
            still_in_office: true,
            year_of_rule: 0,
            population: INITIAL_POPULATION,
            acreage: INITIAL_ACREAGE,
            grain: INITIAL_GRAIN,
            price_per_acre: 0,
            next_year_price_per_acre,
            harvest_per_acre: INITIAL_HARVEST_PER_ACRE,
            percent_eaten_by_rats: INITIAL_RAT_PERCENT,
            plague_happened: false,
            starvation_victims: 0,
            plague_victims: 0,
            immigrants: INITIAL_IMMIGRANTS,
            grain_harvested: INITIAL_GRAIN_HARVESTED,
            grain_eaten_by_rats: INITIAL_GRAIN_EATEN_BY_RATS,
        }
    }

    /// Play one year with the given decisions.
    ///
    /// Returns `LeftOffice` without touching the state if the reign is over.
    pub fn tally_up_year(&mut self, decisions: RulerDecisions) -> Result<()> {
        self.ensure_in_office()?;

        let draws = self.events.draw_year(self.year_of_rule + 1);
        self.resolve_year(decisions, draws)
    }
}

impl<R> KingdomState<R> {
    /// Apply one year's decisions against already drawn events.
    pub fn resolve_year(&mut self, decisions: RulerDecisions, draws: YearlyDraws) -> Result<()> {
        self.ensure_in_office()?;

        let start_of_year_population = self.population;

        self.year_of_rule += 1;
        self.price_per_acre = self.next_year_price_per_acre;

        self.harvest_per_acre = draws.harvest_per_acre;
        self.percent_eaten_by_rats = draws.percent_eaten_by_rats;
        self.plague_happened = draws.plague_happened;
        self.next_year_price_per_acre = draws.next_year_price_per_acre;

        // Buy land; leftover grain short of a whole acre is still spent
        let grain_used_to_buy_land = decisions
            .acres_to_buy
            .saturating_mul(self.price_per_acre)
            .min(self.grain);
        self.grain -= grain_used_to_buy_land;
        self.acreage = self
            .acreage
            .saturating_add(whole_acres(grain_used_to_buy_land, self.price_per_acre));

        // Sell land
        let grain_from_sale_of_land = decisions
            .acres_to_sell
            .min(self.acreage)
            .saturating_mul(self.price_per_acre);
        self.grain = self.grain.saturating_add(grain_from_sale_of_land);
        self.acreage -= whole_acres(grain_from_sale_of_land, self.price_per_acre);

        // Feed the people
        let people_fed = (self.grain.min(decisions.grain_for_food) / GRAIN_PER_PERSON).min(self.population);
        self.grain -= people_fed * GRAIN_PER_PERSON;

        // Plant the fields
        let acres_for_planting = decisions
            .acres_to_plant
            .min(self.population.saturating_mul(ACRES_PER_PERSON))
            .min(self.acreage);
        let grain_planted = self.grain.min(acres_for_planting / ACRES_PER_BUSHEL);
        let acres_planted = grain_planted * ACRES_PER_BUSHEL;
        self.grain -= grain_planted;
        let grain_after_planting = self.grain;

        // Harvest, then the rats take their share of the full store
        self.grain_harvested = acres_planted.saturating_mul(self.harvest_per_acre);
        self.grain = self.grain.saturating_add(self.grain_harvested);
        let eaten = (u64::from(self.percent_eaten_by_rats) * u64::from(self.grain) / 100).min(u64::from(self.grain));
        self.grain_eaten_by_rats = eaten as u32;
        self.grain -= self.grain_eaten_by_rats;

        // Plague
        if self.plague_happened {
            self.plague_victims = self.population / 2;
            self.population -= self.plague_victims;
        } else {
            self.plague_victims = 0;
        }

        // Starvation
        if self.population > people_fed {
            self.starvation_victims = self.population - people_fed;
            self.population -= self.starvation_victims;
        } else {
            self.starvation_victims = 0;
        }

        // Immigration, only into a kingdom where nobody starved
        if self.population > 0 && self.starvation_victims == 0 {
            let land_and_reserves = 20 * u64::from(self.acreage) + u64::from(grain_after_planting);
            let arrivals = land_and_reserves / (100 * u64::from(self.population)) + 1;
            self.immigrants = u32::try_from(arrivals).unwrap_or(u32::MAX);
            self.population = self.population.saturating_add(self.immigrants);
        } else {
            self.immigrants = 0;
        }

        let starvation_limit =
            u64::from(STARVATION_LIMIT_PERCENT) * u64::from(start_of_year_population) / 100;
        self.still_in_office = self.year_of_rule < TERM_YEARS
            && self.population > 0
            && u64::from(self.starvation_victims) < starvation_limit;

        if !self.still_in_office {
            tracing::debug!(
                "Reign ended in year {}: population {}, starved {} of {}",
                self.year_of_rule,
                self.population,
                self.starvation_victims,
                start_of_year_population
            );
        }

        Ok(())
    }

    fn ensure_in_office(&self) -> Result<()> {
        if self.still_in_office {
            Ok(())
        } else {
            Err(KingdomError::LeftOffice {
                year: self.year_of_rule,
            })
        }
    }

    /// Whether another year can be played
    pub fn still_in_office(&self) -> bool {
        self.still_in_office
    }

    pub fn year_of_rule(&self) -> u32 {
        self.year_of_rule
    }

    pub fn population(&self) -> u32 {
        self.population
    }

    pub fn acreage(&self) -> u32 {
        self.acreage
    }

    pub fn grain(&self) -> u32 {
        self.grain
    }

    pub fn price_per_acre(&self) -> u32 {
        self.price_per_acre
    }

    pub fn next_year_price_per_acre(&self) -> u32 {
        self.next_year_price_per_acre
    }

    pub fn harvest_per_acre(&self) -> u32 {
        self.harvest_per_acre
    }

    pub fn percent_eaten_by_rats(&self) -> u32 {
        self.percent_eaten_by_rats
    }

    pub fn plague_happened(&self) -> bool {
        self.plague_happened
    }

    pub fn starvation_victims(&self) -> u32 {
        self.starvation_victims
    }

    pub fn plague_victims(&self) -> u32 {
        self.plague_victims
    }

    pub fn immigrants(&self) -> u32 {
        self.immigrants
    }

    pub fn grain_harvested(&self) -> u32 {
        self.grain_harvested
    }

    pub fn grain_eaten_by_rats(&self) -> u32 {
        self.grain_eaten_by_rats
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self.events, EventSource::Deterministic)
    }

    /// Snapshot of everything a report needs
    pub fn report(&self) -> YearReport {
        YearReport {
            year_of_rule: self.year_of_rule,
            population: self.population,
            acreage: self.acreage,
            grain: self.grain,
            price_per_acre: self.price_per_acre,
            next_year_price_per_acre: self.next_year_price_per_acre,
            harvest_per_acre: self.harvest_per_acre,
            percent_eaten_by_rats: self.percent_eaten_by_rats,
            plague_happened: self.plague_happened,
            starvation_victims: self.starvation_victims,
            plague_victims: self.plague_victims,
            immigrants: self.immigrants,
            grain_harvested: self.grain_harvested,
            grain_eaten_by_rats: self.grain_eaten_by_rats,
            still_in_office: self.still_in_office,
        }
    }
}

/// Whole acres a quantity of grain buys at `price`; nothing at price zero
fn whole_acres(grain: u32, price: u32) -> u32 {
    grain.checked_div(price).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deterministic() -> KingdomState {
        KingdomState::new(EventSource::Deterministic)
    }

    fn quiet_year(plague_happened: bool) -> YearlyDraws {
        YearlyDraws {
            harvest_per_acre: 3,
            percent_eaten_by_rats: 0,
            plague_happened,
            next_year_price_per_acre: 21,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = deterministic();
        assert!(state.still_in_office());
        assert_eq!(state.year_of_rule(), 0);
        assert_eq!(state.population(), 100);
        assert_eq!(state.acreage(), 1000);
        assert_eq!(state.grain(), 2800);
        assert_eq!(state.next_year_price_per_acre(), 21);
        assert_eq!(state.immigrants(), 5);
        assert_eq!(state.starvation_victims(), 0);
        assert_eq!(state.plague_victims(), 0);
        assert!(state.is_deterministic());
    }

    #[test]
    fn test_first_year_arithmetic() {
        let mut state = deterministic();
        state
            .tally_up_year(RulerDecisions::new(10, 0, 1960, 10000))
            .unwrap();

        assert_eq!(state.year_of_rule(), 1);
        assert_eq!(state.price_per_acre(), 21);
        assert_eq!(state.acreage(), 1010);
        assert_eq!(state.grain_harvested(), 3030);
        assert_eq!(state.grain_eaten_by_rats(), 315);
        assert_eq!(state.grain(), 2840);
        assert_eq!(state.starvation_victims(), 2);
        assert_eq!(state.immigrants(), 0);
        assert_eq!(state.population(), 98);
        assert!(state.still_in_office());
    }

    #[test]
    fn test_buying_land_rounds_down_and_spends_remainder() {
        let mut state = deterministic();
        state
            .tally_up_year(RulerDecisions::new(10000, 0, 2000, 0))
            .unwrap();

        // 2800 / 21 = 133 acres; the last 7 bushels buy nothing
        assert_eq!(state.acreage(), 1133);
        assert_eq!(state.grain(), 0);
        assert_eq!(state.starvation_victims(), 100);
        assert_eq!(state.population(), 0);
        assert!(!state.still_in_office());
    }

    #[test]
    fn test_selling_more_land_than_owned() {
        let mut state = deterministic();
        state
            .tally_up_year(RulerDecisions::new(0, 10000, 2000, 500))
            .unwrap();

        assert_eq!(state.acreage(), 0);
        assert_eq!(state.grain_harvested(), 0);
        // 2800 + 21000 - 2000 = 21800, rats take 10%
        assert_eq!(state.grain_eaten_by_rats(), 2180);
        assert_eq!(state.grain(), 19620);
        // (0 + 21800) / (100 * 100) + 1
        assert_eq!(state.immigrants(), 3);
        assert_eq!(state.population(), 103);
    }

    #[test]
    fn test_feeding_limited_by_stated_budget() {
        let mut state = deterministic();
        state
            .tally_up_year(RulerDecisions::new(0, 0, 1120, 0))
            .unwrap();

        assert_eq!(state.starvation_victims(), 44);
        assert_eq!(state.population(), 56);
        assert!(state.still_in_office());
    }

    #[test]
    fn test_starving_45_percent_ends_reign() {
        let mut state = deterministic();
        state
            .tally_up_year(RulerDecisions::new(0, 0, 1100, 0))
            .unwrap();

        assert_eq!(state.starvation_victims(), 45);
        assert_eq!(state.population(), 55);
        assert!(!state.still_in_office());
    }

    #[test]
    fn test_plague_halves_population_before_starvation() {
        let mut state = deterministic();
        state
            .resolve_year(RulerDecisions::new(0, 0, 2000, 0), quiet_year(true))
            .unwrap();

        assert_eq!(state.plague_victims(), 50);
        assert_eq!(state.starvation_victims(), 0);
        // (20 * 1000 + 800) / (100 * 50) + 1
        assert_eq!(state.immigrants(), 5);
        assert_eq!(state.population(), 55);
        assert_eq!(state.grain(), 800);
    }

    #[test]
    fn test_immigration_uses_grain_before_harvest() {
        let mut state = deterministic();
        state
            .resolve_year(RulerDecisions::new(0, 0, 2000, 1000), quiet_year(false))
            .unwrap();

        // 2800 - 2000 fed - 500 seed = 300 before the 3000 bushel harvest
        assert_eq!(state.grain_harvested(), 3000);
        assert_eq!(state.grain(), 3300);
        // (20 * 1000 + 300) / (100 * 100) + 1
        assert_eq!(state.immigrants(), 3);
        assert_eq!(state.population(), 103);
    }

    #[test]
    fn test_planting_limited_by_seed_grain() {
        let mut state = deterministic();
        state
            .resolve_year(RulerDecisions::new(100, 0, 600, 1000), quiet_year(false))
            .unwrap();

        // 2800 - 2100 for land - 600 for food leaves 100 bushels, enough for 200 acres
        assert_eq!(state.acreage(), 1100);
        assert_eq!(state.grain_harvested(), 600);
        assert_eq!(state.grain(), 600);
    }

    #[test]
    fn test_next_price_carries_over() {
        let mut state = deterministic();
        let draws = YearlyDraws {
            next_year_price_per_acre: 26,
            ..quiet_year(false)
        };
        state.resolve_year(RulerDecisions::new(0, 0, 2000, 0), draws).unwrap();
        assert_eq!(state.price_per_acre(), 21);
        assert_eq!(state.next_year_price_per_acre(), 26);

        state.tally_up_year(RulerDecisions::new(1, 0, 2000, 0)).unwrap();
        assert_eq!(state.price_per_acre(), 26);
    }

    #[test]
    fn test_zero_price_buys_nothing() {
        let mut state = deterministic();
        let draws = YearlyDraws {
            next_year_price_per_acre: 0,
            ..quiet_year(false)
        };
        state.resolve_year(RulerDecisions::new(0, 0, 2000, 0), draws).unwrap();
        state
            .resolve_year(RulerDecisions::new(50, 50, 2000, 0), quiet_year(false))
            .unwrap();
        assert_eq!(state.acreage(), 1000);
    }

    #[test]
    fn test_total_rat_loss() {
        let mut state = deterministic();
        let draws = YearlyDraws {
            percent_eaten_by_rats: 100,
            ..quiet_year(false)
        };
        state.resolve_year(RulerDecisions::new(0, 0, 2000, 0), draws).unwrap();
        assert_eq!(state.grain(), 0);
        assert_eq!(state.grain_eaten_by_rats(), 800);
    }

    #[test]
    fn test_reign_ends_after_ten_years() {
        let mut state = deterministic();
        for _ in 0..10 {
            assert!(state.still_in_office());
            let food = state.population() * GRAIN_PER_PERSON;
            state
                .tally_up_year(RulerDecisions::new(0, 0, food, 10000))
                .unwrap();
            assert_eq!(state.starvation_victims(), 0);
        }
        assert_eq!(state.year_of_rule(), 10);
        assert!(!state.still_in_office());
    }

    #[test]
    fn test_tally_after_leaving_office_is_rejected() {
        let mut state = deterministic();
        state
            .tally_up_year(RulerDecisions::new(0, 0, 0, 0))
            .unwrap();
        assert!(!state.still_in_office());

        let before = state.report();
        let result = state.tally_up_year(RulerDecisions::new(0, 0, 2000, 0));
        assert!(matches!(result, Err(KingdomError::LeftOffice { year: 1 })));
        assert_eq!(state.report(), before);
    }
}
