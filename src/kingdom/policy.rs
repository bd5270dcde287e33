//! Ruler decision policies
//!
//! A policy looks at the kingdom entering a year and decides how to trade,
//! feed and plant. The core never asks a human; interactive play would be
//! another implementation of [`RulerPolicy`].

use crate::kingdom::rules::GRAIN_PER_PERSON;
use crate::kingdom::state::{KingdomState, RulerDecisions};

pub trait RulerPolicy<R> {
    fn decide(&self, state: &KingdomState<R>) -> RulerDecisions;
}

/// Same decisions every year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPolicy(pub RulerDecisions);

impl<R> RulerPolicy<R> for FixedPolicy {
    fn decide(&self, _state: &KingdomState<R>) -> RulerDecisions {
        self.0
    }
}

/// Three-year land cycle with shrinking rations.
///
/// Buys `year`% of the land in years 1, 4, 7, 10, sells the same share in
/// years 2, 5, 8, feeds `(100 - 2 * year)`% of what the people need, and
/// always tries to plant 10000 acres. This is the reference reign used to
/// check the year arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduledPolicy;

impl ScheduledPolicy {
    pub const ACRES_TO_PLANT: u32 = 10000;

    pub fn decisions_for(year: u32, acreage: u32, population: u32) -> RulerDecisions {
        let land_share = share_of(u64::from(year), u64::from(acreage));
        let acres_to_buy = if year % 3 == 1 { land_share } else { 0 };
        let acres_to_sell = if year % 3 == 2 { land_share } else { 0 };
        let ration_percent = 100u64.saturating_sub(u64::from(year) * 2);
        let grain_for_food = share_of(ration_percent, u64::from(population) * u64::from(GRAIN_PER_PERSON));

        RulerDecisions::new(acres_to_buy, acres_to_sell, grain_for_food, Self::ACRES_TO_PLANT)
    }
}

fn share_of(percent: u64, amount: u64) -> u32 {
    u32::try_from(percent * amount / 100).unwrap_or(u32::MAX)
}

impl<R> RulerPolicy<R> for ScheduledPolicy {
    fn decide(&self, state: &KingdomState<R>) -> RulerDecisions {
        Self::decisions_for(state.year_of_rule() + 1, state.acreage(), state.population())
    }
}
