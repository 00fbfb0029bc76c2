use bandits_core::mapgen::{ArenaSpec, generate_arena};
use bandits_core::{Battle, BattleStatus, PowerOverrides, Scenario, simulate};

fn replay_hashes(scenario: &Scenario) -> Vec<u64> {
    let mut battle = Battle::new(scenario, &PowerOverrides::none()).expect("arena should load");
    let mut hashes = vec![battle.snapshot_hash()];
    while battle.step_round() == &BattleStatus::Running {
        hashes.push(battle.snapshot_hash());
    }
    hashes.push(battle.snapshot_hash());
    hashes
}

#[test]
fn identical_inputs_produce_identical_outcomes() {
    let scenario: Scenario =
        "#######\n#.G...#\n#...EG#\n#.#.#G#\n#..G#E#\n#.....#\n#######".parse().unwrap();
    let first = simulate(&scenario.clone(), &PowerOverrides::none());
    let second = simulate(&scenario.clone(), &PowerOverrides::none());
    assert_eq!(first, second);
}

#[test]
fn round_by_round_hashes_are_stable_across_runs() {
    let spec = ArenaSpec { width: 9, height: 7, wall_percent: 20, elves: 3, goblins: 3 };
    for seed in [1_u64, 42, 12345] {
        let scenario: Scenario = generate_arena(seed, &spec).parse().unwrap();
        assert_eq!(
            replay_hashes(&scenario),
            replay_hashes(&scenario),
            "seed {seed} should replay identically"
        );
    }
}

#[test]
fn battle_log_is_identical_for_identical_inputs() {
    let scenario: Scenario =
        "#######\n#E..EG#\n#.#G.E#\n#E.##E#\n#G..#.#\n#..E#.#\n#######".parse().unwrap();
    let mut left = Battle::new(&scenario, &PowerOverrides::none()).unwrap();
    let mut right = Battle::new(&scenario, &PowerOverrides::none()).unwrap();
    let left_outcome = left.run_to_end().unwrap();
    let right_outcome = right.run_to_end().unwrap();

    assert_eq!(left_outcome, right_outcome);
    assert_eq!(format!("{:?}", left.log()), format!("{:?}", right.log()));
}
