use rand::Rng;

use crate::models::waypoint::Waypoint;

/// Distance a driver covers per tick, in coordinate degrees.
pub const STEP_SIZE: f64 = 0.0012;

/// Below this distance a driver is snapped onto its target.
pub const ARRIVAL_THRESHOLD: f64 = 0.002;

/// Half-width of the square used by [`random_nearby`].
pub const NEARBY_SPREAD: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct Advance {
    pub position: Waypoint,
    pub arrived: bool,
}

/// Planar distance between two waypoints in coordinate degrees.
pub fn distance(a: &Waypoint, b: &Waypoint) -> f64 {
    let dx = b.lat - a.lat;
    let dy = b.lng - a.lng;
    (dx * dx + dy * dy).sqrt()
}

pub fn has_arrived(current: &Waypoint, target: &Waypoint) -> bool {
    distance(current, target) < ARRIVAL_THRESHOLD
}

/// Moves `current` one step of `step` degrees along the straight line to
/// `target`. Within [`ARRIVAL_THRESHOLD`] the result is snapped to `target`,
/// which also covers the zero-distance case before any normalisation happens.
pub fn advance_toward(current: &Waypoint, target: &Waypoint, step: f64) -> Advance {
    debug_assert!(current.is_finite(), "non-finite driver position {current:?}");
    debug_assert!(target.is_finite(), "non-finite target {target:?}");

    let dist = distance(current, target);
    if dist < ARRIVAL_THRESHOLD {
        return Advance {
            position: *target,
            arrived: true,
        };
    }

    let dx = (target.lat - current.lat) / dist;
    let dy = (target.lng - current.lng) / dist;

    Advance {
        position: Waypoint::new(current.lat + dx * step, current.lng + dy * step),
        arrived: false,
    }
}

/// Uniform point within [`NEARBY_SPREAD`] of `center` on each axis.
pub fn random_nearby(center: &Waypoint, rng: &mut impl Rng) -> Waypoint {
    Waypoint::new(
        center.lat + rng.gen_range(-NEARBY_SPREAD..NEARBY_SPREAD),
        center.lng + rng.gen_range(-NEARBY_SPREAD..NEARBY_SPREAD),
    )
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{
        ARRIVAL_THRESHOLD, NEARBY_SPREAD, STEP_SIZE, advance_toward, distance, has_arrived,
        random_nearby,
    };
    use crate::models::waypoint::Waypoint;

    #[test]
    fn zero_distance_for_same_point() {
        let p = Waypoint::new(33.52, -86.8);
        assert!(distance(&p, &p) < 1e-12);
    }

    #[test]
    fn advance_at_target_is_arrival_without_drift() {
        let p = Waypoint::new(33.52, -86.8);

        let first = advance_toward(&p, &p, STEP_SIZE);
        assert!(first.arrived);
        assert_eq!(first.position, p);

        let second = advance_toward(&first.position, &p, STEP_SIZE);
        assert!(second.arrived);
        assert_eq!(second.position, p);
    }

    #[test]
    fn advance_moves_exactly_one_step_toward_target() {
        let start = Waypoint::new(0.0, 0.0);
        let target = Waypoint::new(0.03, 0.04);

        let next = advance_toward(&start, &target, STEP_SIZE);

        assert!(!next.arrived);
        assert!((distance(&start, &next.position) - STEP_SIZE).abs() < 1e-12);
        assert!((distance(&next.position, &target) - (0.05 - STEP_SIZE)).abs() < 1e-12);
    }

    #[test]
    fn advance_snaps_inside_threshold() {
        let target = Waypoint::new(10.0, 10.0);
        let close = Waypoint::new(10.0 + ARRIVAL_THRESHOLD * 0.9, 10.0);

        assert!(has_arrived(&close, &target));
        let next = advance_toward(&close, &target, STEP_SIZE);

        assert!(next.arrived);
        assert_eq!(next.position, target);
    }

    #[test]
    fn random_nearby_stays_within_spread_and_is_reproducible() {
        let center = Waypoint::new(33.52, -86.8);
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let p = random_nearby(&center, &mut a);
            let q = random_nearby(&center, &mut b);
            assert_eq!(p, q);
            assert!((p.lat - center.lat).abs() <= NEARBY_SPREAD);
            assert!((p.lng - center.lng).abs() <= NEARBY_SPREAD);
        }
    }
}
