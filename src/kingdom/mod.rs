//! Kingdom Simulation
//!
//! One ruler, one kingdom, ten years. The state machine in [`state`] advances
//! a reign a year at a time using draws from the event model in [`events`].

pub mod events;
pub mod output;
pub mod policy;
pub mod rules;
pub mod simulation;
pub mod state;

pub use events::{EventSource, YearlyDraws};
pub use output::{BatchSummary, BatchTally, TrialOutcome, YearReport};
pub use policy::{FixedPolicy, RulerPolicy, ScheduledPolicy};
pub use simulation::{event_source, run_batch, run_trial};
pub use state::{KingdomState, RulerDecisions};
