//! Property-based tests for pathfinding and the damage model

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use gridbound::beings::Creature;
use gridbound::grid::{CellCoord, Grid};
use gridbound::stats::{hit_chance, Damage, DamageRange, Stats};

fn cell(width: u32, height: u32) -> impl Strategy<Value = CellCoord> {
    (0..width, 0..height).prop_map(|(x, y)| CellCoord::new(x, y))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// On an open grid the shortest path is exactly one Manhattan walk
    #[test]
    fn prop_open_grid_path_is_manhattan(
        start in cell(12, 9),
        goal in cell(12, 9)
    ) {
        let grid = Grid::new(12, 9);
        let path = grid.path(std::iter::empty(), start, goal);

        prop_assert_eq!(path.len() as u32, start.manhattan_distance(goal) + 1);
        prop_assert_eq!(path.first(), Some(start));
        prop_assert_eq!(path.last(), Some(goal));
        for pair in path.cells().windows(2) {
            prop_assert!(pair[0].is_adjacent(pair[1]));
        }
    }

    /// Paths never cross blocked cells, apart from the start the mover stands on
    #[test]
    fn prop_path_avoids_blocked_cells(
        start in cell(10, 10),
        goal in cell(10, 10),
        blocked in prop::collection::vec(cell(10, 10), 0..40)
    ) {
        let grid = Grid::new(10, 10);
        let path = grid.path(blocked.iter().copied(), start, goal);

        if start == goal {
            prop_assert_eq!(path.cells(), &[start]);
        } else if blocked.contains(&goal) {
            prop_assert!(path.is_empty());
        } else if !path.is_empty() {
            prop_assert_eq!(path.first(), Some(start));
            prop_assert_eq!(path.last(), Some(goal));
            prop_assert!(path.len() as u32 > start.manhattan_distance(goal));
            for step in &path.cells()[1..] {
                prop_assert!(!blocked.contains(step));
            }
            for pair in path.cells().windows(2) {
                prop_assert!(pair[0].is_adjacent(pair[1]));
            }
        }
    }

    /// Spawn clusters stay strictly inside their radius and on the grid
    #[test]
    fn prop_cluster_within_radius(origin in cell(15, 15), radius in 0.5f32..8.0) {
        let grid = Grid::new(15, 15);
        let cluster = grid.cluster(origin, radius);

        prop_assert!(cluster.contains(origin));
        for &spot in cluster.cells() {
            prop_assert!(grid.contains(spot));
            prop_assert!(spot.distance_to(origin) < radius);
        }
    }

    /// Health stays between zero and its maximum whatever is thrown at it
    #[test]
    fn prop_health_stays_in_bounds(
        max_health in 1i32..500,
        blows in prop::collection::vec(-300i32..300, 1..30)
    ) {
        let stats = Stats { health: max_health, max_health, ..Stats::default() };
        let mut creature = Creature::new(stats, 5);

        for amount in blows {
            let was_dead = creature.is_dead();
            let before = creature.stats.health;
            creature.take_damage(Damage::from_amount(amount));

            prop_assert!(creature.stats.health >= 0);
            prop_assert!(creature.stats.health <= max_health);
            if was_dead {
                // The dead ignore damage and healing alike
                prop_assert_eq!(creature.stats.health, before);
            }
        }
    }

    /// Rolls land inside the range and hit chances stay between 10% and 100%
    #[test]
    fn prop_rolls_and_chances_bounded(
        strength in 0i32..400,
        accuracy in 0i32..200,
        evasion in 0i32..200,
        seed in any::<u64>()
    ) {
        let attacker = Stats { strength, accuracy, ..Stats::default() };
        let defender = Stats { evasion, ..Stats::default() };

        let range = DamageRange::attack(&attacker);
        prop_assert!(range.min <= range.max);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for _ in 0..16 {
            prop_assert!(range.contains(range.roll(&mut rng)));
        }

        let chance = hit_chance(&attacker, &defender);
        prop_assert!((0.1..=1.0).contains(&chance));
    }
}
