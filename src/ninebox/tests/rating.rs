use crate::ninebox::rating::{rating_for_score, LOW_BAND_CEILING, MID_BAND_CEILING};

#[test]
fn band_boundaries_are_exact() {
    assert_eq!(rating_for_score(0.329999), 1);
    assert_eq!(rating_for_score(0.33), 2);
    assert_eq!(rating_for_score(0.669999), 2);
    assert_eq!(rating_for_score(0.67), 3);
}

#[test]
fn extremes_map_to_the_outer_bands() {
    assert_eq!(rating_for_score(0.0), 1);
    assert_eq!(rating_for_score(1.0), 3);
}

#[test]
fn rating_is_monotonic_over_the_unit_interval() {
    let mut previous = rating_for_score(0.0);
    for step in 1..=1000 {
        let score = f64::from(step) / 1000.0;
        let rating = rating_for_score(score);
        assert!(
            rating >= previous,
            "rating dropped from {previous} to {rating} at score {score}"
        );
        previous = rating;
    }
}

#[test]
fn out_of_range_scores_clamp_instead_of_panicking() {
    assert_eq!(rating_for_score(-0.25), 1);
    assert_eq!(rating_for_score(1.75), 3);
}

#[test]
fn band_constants_partition_the_interval() {
    assert!(LOW_BAND_CEILING < MID_BAND_CEILING);
    assert!(MID_BAND_CEILING < 1.0);
}
