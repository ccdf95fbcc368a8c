//! Scalar potential functions used by the conformer force field.
//!
//! Each function returns `(energy, dE/dx)` for its scalar argument so that
//! callers can chain the derivative into Cartesian gradients.

#[inline]
pub fn harmonic(value: f64, target: f64, k: f64) -> (f64, f64) {
    let delta = value - target;
    (k * delta * delta, 2.0 * k * delta)
}

/// One-sided harmonic wall: zero at or beyond `min_dist`, quadratic inside.
#[inline]
pub fn soft_repulsion(dist: f64, min_dist: f64, k: f64) -> (f64, f64) {
    if dist >= min_dist {
        return (0.0, 0.0);
    }
    harmonic(dist, min_dist, k)
}

/// Target distance between the outer atoms of an angle `a-b-c` given the two
/// bond lengths and the angle at `b` in degrees (law of cosines).
#[inline]
pub fn angle_to_distance(r_ab: f64, r_bc: f64, angle_deg: f64) -> f64 {
    let theta = angle_deg.to_radians();
    (r_ab * r_ab + r_bc * r_bc - 2.0 * r_ab * r_bc * theta.cos())
        .max(0.0)
        .sqrt()
}

/// Distance between the outer atoms of `a-b-c-d` with bond lengths
/// `r_ab`, `r_bc`, `r_cd`, angles at `b` and `c`, and the dihedral, all
/// angles in degrees.
pub fn dihedral_to_distance(
    r_ab: f64,
    r_bc: f64,
    r_cd: f64,
    angle_b: f64,
    angle_c: f64,
    dihedral: f64,
) -> f64 {
    let (tb, tc, phi) = (angle_b.to_radians(), angle_c.to_radians(), dihedral.to_radians());
    let dx = r_bc - r_cd * tc.cos() - r_ab * tb.cos();
    let dy = r_cd * tc.sin() * phi.cos() - r_ab * tb.sin();
    let dz = r_cd * tc.sin() * phi.sin();
    (dx * dx + dy * dy + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn harmonic_is_zero_at_target_with_zero_slope() {
        let (e, de) = harmonic(1.5, 1.5, 100.0);
        assert!(f64_approx_equal(e, 0.0));
        assert!(f64_approx_equal(de, 0.0));
    }

    #[test]
    fn harmonic_slope_points_back_to_target() {
        let (e, de) = harmonic(2.0, 1.5, 10.0);
        assert!(f64_approx_equal(e, 2.5));
        assert!(f64_approx_equal(de, 10.0));
        let (_, de) = harmonic(1.0, 1.5, 10.0);
        assert!(de < 0.0);
    }

    #[test]
    fn soft_repulsion_only_acts_inside_the_wall() {
        assert_eq!(soft_repulsion(3.0, 2.5, 10.0), (0.0, 0.0));
        let (e, de) = soft_repulsion(2.0, 2.5, 10.0);
        assert!(e > 0.0);
        assert!(de < 0.0);
    }

    #[test]
    fn angle_to_distance_matches_known_geometries() {
        assert!(f64_approx_equal(angle_to_distance(1.0, 1.0, 180.0), 2.0));
        assert!(f64_approx_equal(angle_to_distance(1.0, 1.0, 60.0), 1.0));
        assert!(f64_approx_equal(
            angle_to_distance(1.0, 1.0, 90.0),
            std::f64::consts::SQRT_2
        ));
    }

    #[test]
    fn dihedral_to_distance_separates_cis_from_trans() {
        // Right angles: cis closes a unit square, trans spans its diagonal.
        assert!(f64_approx_equal(dihedral_to_distance(1.0, 1.0, 1.0, 90.0, 90.0, 0.0), 1.0));
        assert!(f64_approx_equal(
            dihedral_to_distance(1.0, 1.0, 1.0, 90.0, 90.0, 180.0),
            5.0_f64.sqrt()
        ));
        let cis = dihedral_to_distance(1.5, 1.34, 1.5, 120.0, 120.0, 0.0);
        let trans = dihedral_to_distance(1.5, 1.34, 1.5, 120.0, 120.0, 180.0);
        assert!(cis < 3.0 && trans > 3.7, "cis {} trans {}", cis, trans);
    }
}
