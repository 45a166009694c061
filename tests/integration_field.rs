mod common;

use approx::assert_relative_eq;
use wake_farm::field::{Grid, GridCoord, effective_field, evaluate_field, stamp_wakes};
use wake_farm::layout::{Fitness, LayoutEvaluator, SpacingPenalty, decode_layout};
use wake_farm::wake::velocity_deficit_fraction;

use common::{small_params, uniform_field};

#[test]
fn single_turbine_stamps_expected_footprint() {
    let ambient = uniform_field(40, 21, 10.0);
    let params = small_params();
    let deficit = stamp_wakes(&ambient, &[GridCoord::new(10, 5)], &params).unwrap();

    // rows at or upstream of the source are untouched
    for y in 0..=5 {
        for x in 0..21 {
            assert_eq!(deficit.get(y, x), Some(0.0));
        }
    }

    // dy = 25: radius 2 + 0.04·25 = 3, so columns 7..=13 are stamped
    let expected = velocity_deficit_fraction(25.0, 0.8, 2.0, 0.04).unwrap() * 10.0;
    for x in 7..=13 {
        assert_relative_eq!(deficit.get(30, x).unwrap(), expected, max_relative = 1e-12);
    }
    assert_eq!(deficit.get(30, 6), Some(0.0));
    assert_eq!(deficit.get(30, 14), Some(0.0));
}

#[test]
fn overlapping_wakes_take_the_maximum() {
    let ambient = uniform_field(60, 30, 9.0);
    let params = small_params();
    let a = GridCoord::new(15, 2);
    let b = GridCoord::new(16, 20);

    let only_a = stamp_wakes(&ambient, &[a], &params).unwrap();
    let only_b = stamp_wakes(&ambient, &[b], &params).unwrap();
    let both = stamp_wakes(&ambient, &[a, b], &params).unwrap();

    for y in 0..60 {
        for x in 0..30 {
            let expected = only_a.get(y, x).unwrap().max(only_b.get(y, x).unwrap());
            assert_eq!(both.get(y, x).unwrap(), expected);
        }
    }
}

#[test]
fn turbine_order_does_not_change_the_field() {
    let ambient = uniform_field(80, 80, 11.0);
    let params = small_params();
    let coords = vec![
        GridCoord::new(10, 10),
        GridCoord::new(40, 5),
        GridCoord::new(12, 45),
        GridCoord::new(70, 30),
    ];
    let mut reversed = coords.clone();
    reversed.reverse();
    let a = evaluate_field(&ambient, &coords, &params).unwrap();
    let b = evaluate_field(&ambient, &reversed, &params).unwrap();
    assert_eq!(a.deficit, b.deficit);
    assert_eq!(a.energy, b.energy);
}

#[test]
fn deficit_scales_with_source_cell_speed() {
    let mut rows = vec![vec![10.0; 11]; 30];
    rows[3][5] = 5.0;
    let ambient = Grid::from_rows(rows).unwrap();
    let deficit = stamp_wakes(&ambient, &[GridCoord::new(5, 3)], &small_params()).unwrap();
    let expected = velocity_deficit_fraction(10.0, 0.8, 2.0, 0.04).unwrap() * 5.0;
    assert_relative_eq!(deficit.get(13, 5).unwrap(), expected, max_relative = 1e-12);
}

#[test]
fn effective_field_is_clamped_at_zero() {
    let ambient = uniform_field(2, 2, 1.0);
    let deficit = Grid::from_rows(vec![vec![0.5, 2.0], vec![0.0, 1.0]]).unwrap();
    let eff = effective_field(&ambient, &deficit).unwrap();
    assert_eq!(eff.to_rows(), vec![vec![0.5, 0.0], vec![1.0, 0.0]]);
}

#[test]
fn energy_is_sum_of_cubes_at_turbine_cells() {
    let ambient = uniform_field(50, 50, 10.0);
    let eval = evaluate_field(
        &ambient,
        &[GridCoord::new(0, 0), GridCoord::new(49, 0)],
        &small_params(),
    )
    .unwrap();
    assert_relative_eq!(eval.energy, 2000.0, max_relative = 1e-12);
}

#[test]
fn negative_ambient_speed_rejected() {
    let ambient = Grid::from_rows(vec![vec![5.0, -1.0]]).unwrap();
    assert!(stamp_wakes(&ambient, &[GridCoord::new(0, 0)], &small_params()).is_err());
}

#[test]
fn fitness_penalizes_crowded_layouts() {
    let evaluator = LayoutEvaluator::new(
        uniform_field(100, 100, 10.0),
        small_params(),
        SpacingPenalty::default(),
    );
    let spread = evaluator.evaluate(&[10.0, 50.0, 60.0, 50.0]).unwrap();
    let crowded = evaluator.evaluate(&[10.0, 50.0, 15.0, 50.0]).unwrap();
    assert_relative_eq!(spread, 2000.0, max_relative = 1e-12);
    assert_relative_eq!(crowded, 2000.0 - 15.0 * 1000.0, max_relative = 1e-12);
}

#[test]
fn fitness_matches_decoded_score() {
    let evaluator = LayoutEvaluator::new(
        uniform_field(100, 100, 9.0),
        small_params(),
        SpacingPenalty::default(),
    );
    let genes = [20.7, 10.2, 20.1, 70.9, 80.0, 40.0];
    let (energy, penalty) = evaluator.score(&decode_layout(&genes).unwrap()).unwrap();
    assert_eq!(evaluator.evaluate(&genes).unwrap(), energy - penalty);
    // second turbine sits in the first one's wake
    assert!(energy < 3.0 * 729.0);
}
