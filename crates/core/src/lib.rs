pub mod battle;
pub mod error;
pub mod mapgen;
pub mod scenario;
pub mod search;
pub mod state;
pub mod types;

pub use battle::{Battle, simulate};
pub use error::{
    BattleError, GridError, ParseError, SearchError, UnknownFaction, UnknownStrategy,
};
pub use scenario::{Scenario, UnitSpec};
pub use search::{MinimalPower, SearchConfig, SearchStrategy, find_minimal_winning_power};
pub use state::{BattleState, Grid, Unit};
pub use types::*;
