//! Fixed rules of the game

/// Bushels one person eats in a year
pub const GRAIN_PER_PERSON: u32 = 20;

/// Acres one person can work in a year
pub const ACRES_PER_PERSON: u32 = 20;

/// Acres sown by one bushel of seed grain
pub const ACRES_PER_BUSHEL: u32 = 2;

/// Length of a full reign in years
pub const TERM_YEARS: u32 = 10;

/// Starving this share (percent) of the start-of-year population ends the reign
pub const STARVATION_LIMIT_PERCENT: u32 = 45;

pub const INITIAL_POPULATION: u32 = 100;
pub const INITIAL_ACREAGE: u32 = 1000;
pub const INITIAL_GRAIN: u32 = 2800;

// Display-only baseline for the year before the reign starts
pub const INITIAL_HARVEST_PER_ACRE: u32 = 3;
pub const INITIAL_RAT_PERCENT: u32 = 10;
pub const INITIAL_IMMIGRANTS: u32 = 5;
pub const INITIAL_GRAIN_HARVESTED: u32 = 3000;
pub const INITIAL_GRAIN_EATEN_BY_RATS: u32 = 400;
