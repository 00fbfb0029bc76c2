//! Minimal-power search over repeated battles.
//! Every candidate power runs on a fresh copy of the scenario, so runs never share state.
//! Candidates are judged in increasing-power order whatever the evaluation strategy.

use std::collections::BTreeMap;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::battle::simulate;
use crate::error::{BattleError, SearchError, UnknownStrategy};
use crate::scenario::Scenario;
use crate::types::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Every power from baseline + 1 upwards, one at a time.
    #[default]
    Linear,
    /// Doubling escalation to bracket a winning power, then bisection inside the bracket.
    /// Assumes a win at some power implies a win at every higher power.
    Bracketed,
    /// Linear order, evaluated `batch_size` candidates at a time on the rayon pool.
    Parallel,
}

impl FromStr for SearchStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(SearchStrategy::Linear),
            "bracketed" => Ok(SearchStrategy::Bracketed),
            "parallel" => Ok(SearchStrategy::Parallel),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_power: i32,
    pub strategy: SearchStrategy,
    pub batch_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_power: 200, strategy: SearchStrategy::Linear, batch_size: 8 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalPower {
    pub power: i32,
    pub outcome: Outcome,
}

/// Smallest attack power for `boosted` that wins without a single loss.
pub fn find_minimal_winning_power(
    scenario: &Scenario,
    boosted: Faction,
    config: &SearchConfig,
) -> Result<MinimalPower, SearchError> {
    let baseline =
        scenario.baseline_power(boosted).ok_or(SearchError::FactionAbsent(boosted))?;
    let mut search = PowerSearch { scenario, boosted, tried: BTreeMap::new() };
    let first = baseline + 1;

    let found = match config.strategy {
        SearchStrategy::Linear => search.linear(first, config.max_power)?,
        SearchStrategy::Bracketed => search.bracketed(first, config.max_power)?,
        SearchStrategy::Parallel => {
            search.parallel(first, config.max_power, config.batch_size.max(1))?
        }
    };
    match found {
        Some(found) => {
            tracing::info!(
                faction = %boosted,
                power = found.power,
                candidates = search.tried.len(),
                "minimal winning power found"
            );
            Ok(found)
        }
        None => Err(SearchError::Exhausted { max_power: config.max_power }),
    }
}

struct PowerSearch<'a> {
    scenario: &'a Scenario,
    boosted: Faction,
    tried: BTreeMap<i32, Option<Outcome>>,
}

impl PowerSearch<'_> {
    fn linear(&mut self, first: i32, last: i32) -> Result<Option<MinimalPower>, SearchError> {
        for power in first..=last {
            if let Some(found) = self.try_power(power)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    fn bracketed(&mut self, first: i32, last: i32) -> Result<Option<MinimalPower>, SearchError> {
        let mut failed_below = first - 1;
        let mut stride: i32 = 1;
        let mut candidate = first;
        let winner = loop {
            if candidate > last {
                return Ok(None);
            }
            if let Some(found) = self.try_power(candidate)? {
                break found;
            }
            failed_below = candidate;
            if candidate == last {
                return Ok(None);
            }
            stride = stride.saturating_mul(2);
            candidate = candidate.saturating_add(stride).min(last);
        };

        let mut best = winner;
        let (mut low, mut high) = (failed_below + 1, winner.power - 1);
        while low <= high {
            let mid = low + (high - low) / 2;
            match self.try_power(mid)? {
                Some(found) => {
                    best = found;
                    high = mid - 1;
                }
                None => low = mid + 1,
            }
        }
        Ok(Some(best))
    }

    fn parallel(
        &mut self,
        first: i32,
        last: i32,
        batch_size: usize,
    ) -> Result<Option<MinimalPower>, SearchError> {
        let (scenario, boosted) = (self.scenario, self.boosted);
        let span = i32::try_from(batch_size).unwrap_or(i32::MAX) - 1;
        let mut start = first;
        while start <= last {
            let end = start.saturating_add(span).min(last);
            let batch: Vec<(i32, Result<Outcome, BattleError>)> = (start..=end)
                .into_par_iter()
                .map(|power| (power, run_with(scenario, boosted, power)))
                .collect();
            for (power, result) in batch {
                if let Some(found) = self.judge(power, result)? {
                    return Ok(Some(found));
                }
            }
            if end == last {
                break;
            }
            start = end + 1;
        }
        Ok(None)
    }

    fn try_power(&mut self, power: i32) -> Result<Option<MinimalPower>, SearchError> {
        if let Some(seen) = self.tried.get(&power) {
            return Ok((*seen)
                .filter(|outcome| outcome.flawless_for(self.boosted))
                .map(|outcome| MinimalPower { power, outcome }));
        }
        let result = run_with(self.scenario, self.boosted, power);
        self.judge(power, result)
    }

    fn judge(
        &mut self,
        power: i32,
        result: Result<Outcome, BattleError>,
    ) -> Result<Option<MinimalPower>, SearchError> {
        let outcome = match result {
            Ok(outcome) => Some(outcome),
            Err(BattleError::Stalemate { rounds }) => {
                tracing::debug!(power, rounds, "candidate stalemated");
                None
            }
            Err(err) => return Err(err.into()),
        };
        if let Some(outcome) = outcome {
            tracing::debug!(
                power,
                winner = %outcome.winner,
                losses = outcome.losses.of(self.boosted),
                score = outcome.score(),
                "candidate evaluated"
            );
        }
        self.tried.insert(power, outcome);
        Ok(outcome
            .filter(|outcome| outcome.flawless_for(self.boosted))
            .map(|outcome| MinimalPower { power, outcome }))
    }
}

fn run_with(scenario: &Scenario, boosted: Faction, power: i32) -> Result<Outcome, BattleError> {
    simulate(scenario, &PowerOverrides::none().with(boosted, power))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKIRMISH: &str = "#######\n#.G...#\n#...EG#\n#.#.#G#\n#..G#E#\n#.....#\n#######";

    #[test]
    fn missing_faction_is_rejected_up_front() {
        let scenario: Scenario = "#####\n#G.G#\n#####".parse().unwrap();
        assert_eq!(
            find_minimal_winning_power(&scenario, Faction::Elf, &SearchConfig::default()),
            Err(SearchError::FactionAbsent(Faction::Elf))
        );
    }

    #[test]
    fn tight_bound_exhausts_instead_of_looping() {
        let scenario: Scenario = SKIRMISH.parse().unwrap();
        let config = SearchConfig { max_power: 10, ..SearchConfig::default() };
        assert_eq!(
            find_minimal_winning_power(&scenario, Faction::Elf, &config),
            Err(SearchError::Exhausted { max_power: 10 })
        );
    }

    #[test]
    fn bound_below_baseline_tries_nothing() {
        let scenario: Scenario = SKIRMISH.parse().unwrap();
        let strategies =
            [SearchStrategy::Linear, SearchStrategy::Bracketed, SearchStrategy::Parallel];
        for strategy in strategies {
            let config = SearchConfig { max_power: 3, strategy, batch_size: 4 };
            assert_eq!(
                find_minimal_winning_power(&scenario, Faction::Elf, &config),
                Err(SearchError::Exhausted { max_power: 3 })
            );
        }
    }

    #[test]
    fn strategy_names_parse_case_insensitively() {
        assert_eq!("linear".parse::<SearchStrategy>(), Ok(SearchStrategy::Linear));
        assert_eq!("Bracketed".parse::<SearchStrategy>(), Ok(SearchStrategy::Bracketed));
        assert_eq!("PARALLEL".parse::<SearchStrategy>(), Ok(SearchStrategy::Parallel));
        assert_eq!("dfs".parse::<SearchStrategy>(), Err(UnknownStrategy("dfs".to_string())));
    }

    #[test]
    fn huge_bounds_and_batches_do_not_overflow() {
        let scenario: Scenario = "#######\n#E.#.G#\n#######".parse().unwrap();
        let (first, last) = (i32::MAX - 2, i32::MAX);

        let mut search =
            PowerSearch { scenario: &scenario, boosted: Faction::Elf, tried: BTreeMap::new() };
        assert_eq!(search.bracketed(first, last), Ok(None));
        assert_eq!(search.tried.keys().copied().collect::<Vec<_>>(), vec![first, last]);

        let mut search =
            PowerSearch { scenario: &scenario, boosted: Faction::Elf, tried: BTreeMap::new() };
        assert_eq!(search.parallel(first, last, usize::MAX), Ok(None));
        assert_eq!(search.tried.len(), 3);
    }

    #[test]
    fn stalemated_candidates_count_as_failures() {
        let scenario: Scenario = "#######\n#E.#.G#\n#######".parse().unwrap();
        let config = SearchConfig { max_power: 6, ..SearchConfig::default() };
        assert_eq!(
            find_minimal_winning_power(&scenario, Faction::Elf, &config),
            Err(SearchError::Exhausted { max_power: 6 })
        );
    }
}
