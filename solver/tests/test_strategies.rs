//! Seeded end-to-end games with the built-in strategies.

use yahtzee::adjustment::AdjustmentConfig;
use yahtzee::simulation::{simulate_batch, simulate_game, OneRollLookahead, OptimalStrategy};
use yahtzee::types::YahtzeeContext;

const GAMES: usize = 300;
const SEED: u64 = 20240611;

fn make_ctx() -> Box<YahtzeeContext> {
    YahtzeeContext::build().unwrap()
}

#[test]
fn test_optimal_beats_one_roll_baseline() {
    let ctx = make_ctx();
    let optimal = OptimalStrategy::new(&ctx, AdjustmentConfig::default());
    let baseline = OneRollLookahead::new(&ctx);

    let opt = simulate_batch(&optimal, GAMES, SEED).unwrap();
    let base = simulate_batch(&baseline, GAMES, SEED).unwrap();

    println!(
        "optimal mean {:.2} (sd {:.2}), one-roll mean {:.2} (sd {:.2})",
        opt.mean, opt.std_dev, base.mean, base.std_dev
    );
    assert!(
        opt.mean > base.mean,
        "optimal {:.2} should beat one-roll {:.2}",
        opt.mean,
        base.mean
    );
    assert!(opt.mean > 150.0, "optimal mean {:.2} implausibly low", opt.mean);
}

#[test]
fn test_batch_deterministic() {
    let ctx = make_ctx();
    let optimal = OptimalStrategy::new(&ctx, AdjustmentConfig::default());
    let a = simulate_batch(&optimal, 16, 99).unwrap();
    let b = simulate_batch(&optimal, 16, 99).unwrap();
    assert_eq!(a.scores, b.scores);
    assert_eq!(a.mean, b.mean);
}

#[test]
fn test_batch_matches_single_games() {
    let ctx = make_ctx();
    let baseline = OneRollLookahead::new(&ctx);
    let batch = simulate_batch(&baseline, 8, 5).unwrap();
    let mut singles: Vec<i32> = (0..8u64)
        .map(|i| simulate_game(&baseline, 5 + i).unwrap().total_score)
        .collect();
    singles.sort_unstable();
    assert_eq!(batch.scores, singles);
}

#[test]
fn test_game_summary_consistent() {
    let ctx = make_ctx();
    let optimal = OptimalStrategy::new(&ctx, AdjustmentConfig::default());
    for seed in 0..10u64 {
        let g = simulate_game(&optimal, seed).unwrap();
        assert!(g.total_score >= g.upper_total);
        assert_eq!(g.got_bonus, g.upper_total >= 63);
        assert!(g.yahtzee_bonus_count >= 0);
    }
}
