pub mod compat;
pub mod config;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod metrics;
pub mod normalize;
pub mod participant;
pub mod report;
pub mod survey;

pub use compat::Compatibility;
pub use config::Config;
pub use error::{MatchError, Result};
pub use matcher::{Assignment, Matcher, SearchOutcome, SearchSettings, Strategy};
pub use normalize::Normalizer;
pub use participant::Participant;
