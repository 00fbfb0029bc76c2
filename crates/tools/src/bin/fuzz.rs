use anyhow::{Result, bail};
use bandits_core::mapgen::{ArenaSpec, generate_arena};
use bandits_core::{Battle, BattleStatus, PowerOverrides, Scenario};
use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    arenas: u64,
    #[arg(long, default_value_t = 9)]
    width: usize,
    #[arg(long, default_value_t = 7)]
    height: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let spec = ArenaSpec {
        width: args.width,
        height: args.height,
        ..ArenaSpec::default()
    };

    println!("Starting fuzz harness at seed {} over {} arenas...", args.seed, args.arenas);
    let (mut finished, mut stalemated) = (0, 0);
    for seed in args.seed..args.seed + args.arenas {
        let text = generate_arena(seed, &spec);
        let scenario: Scenario = match text.parse() {
            Ok(scenario) => scenario,
            // An arena can come out all wall; nothing to simulate there.
            Err(_) => continue,
        };
        let mut battle = Battle::new(&scenario, &PowerOverrides::none())?;
        let mut previous_hp = battle.state().total_hit_points();

        loop {
            let status = battle.step_round().clone();

            // Assert invariants
            let state = battle.state();
            if !state.occupancy_is_consistent() {
                bail!("Invariant failed: occupancy drifted on seed {seed}\n{}", battle.draw());
            }
            let hp = state.total_hit_points();
            if hp > previous_hp {
                bail!("Invariant failed: hit points rose from {previous_hp} to {hp} (seed {seed})");
            }
            previous_hp = hp;

            match status {
                BattleStatus::Running => {}
                BattleStatus::Finished(outcome) => {
                    finished += 1;
                    println!(
                        "seed {seed}: {} after {} rounds, score {}",
                        outcome.winner,
                        outcome.rounds_completed,
                        outcome.score()
                    );
                    break;
                }
                BattleStatus::Stalemated { rounds_completed } => {
                    stalemated += 1;
                    println!("seed {seed}: stalemate after {rounds_completed} rounds");
                    break;
                }
            }
        }
    }

    println!("Fuzzing completed: {finished} finished, {stalemated} stalemated.");
    Ok(())
}
