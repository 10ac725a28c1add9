//! Tolerance defaults and the per-call geometry configuration.
//!
//! Policy
//! - Defaults are fixed constants; callers override them per call through
//!   `GeomCfg` rather than through any global state. There is no automatic
//!   tolerance tuning.

use serde::{Deserialize, Serialize};

/// Maximum distance of a polygon vertex from its supporting plane.
pub const PLANAR_EPS: f64 = 1e-4;
/// Absolute tolerance when comparing facet plane equations for merging.
pub const MERGE_ATOL: f64 = 1e-8;
/// Relative tolerance when comparing facet plane equations for merging.
pub const MERGE_RTOL: f64 = 1e-5;

/// Two points closer than this are treated as the same point.
pub(crate) const DUP_EPS: f64 = 1e-12;
/// Cross products shorter than this mark a degenerate (collinear) corner.
pub(crate) const DEGEN_EPS: f64 = 1e-12;
/// Relative residual allowed when fitting circles and spheres through vertices.
pub(crate) const FIT_EPS: f64 = 1e-6;
/// Hull visibility threshold, scaled by the extent of the point cloud.
pub(crate) const HULL_EPS: f64 = 1e-10;

/// Fixed seed for shuffling enclosing-ball input; keeps results reproducible.
pub(crate) const WELZL_SEED: u64 = 0x5eed_ba11;

/// Geometry configuration (tolerances).
///
/// `GeomCfg::default()` reproduces the constants above. Every entry point that
/// makes a tolerance decision has a `*_with` or `*_cfg` variant taking this.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeomCfg {
    pub planar_tol: f64,
    pub merge_atol: f64,
    pub merge_rtol: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            planar_tol: PLANAR_EPS,
            merge_atol: MERGE_ATOL,
            merge_rtol: MERGE_RTOL,
        }
    }
}

impl GeomCfg {
    /// Same planar tolerance, different merge tolerances.
    #[inline]
    pub fn with_merge_tolerances(self, atol: f64, rtol: f64) -> Self {
        Self {
            merge_atol: atol,
            merge_rtol: rtol,
            ..self
        }
    }
}

/// `numpy.allclose`-style comparison of two equally sized slices.
#[inline]
pub(crate) fn all_close(a: &[f64], b: &[f64], atol: f64, rtol: f64) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| (x - y).abs() <= atol + rtol * y.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let cfg = GeomCfg::default();
        assert_eq!(cfg.planar_tol, PLANAR_EPS);
        assert_eq!(cfg.merge_atol, MERGE_ATOL);
        assert_eq!(cfg.merge_rtol, MERGE_RTOL);
        let loose = cfg.with_merge_tolerances(1e-3, 0.0);
        assert_eq!(loose.planar_tol, PLANAR_EPS);
        assert_eq!(loose.merge_atol, 1e-3);
    }

    #[test]
    fn all_close_is_relative_to_second_argument() {
        assert!(all_close(&[1.0, 2.0], &[1.0, 2.0 + 1e-6], 0.0, 1e-5));
        assert!(!all_close(&[1.0, 2.0], &[1.0, 2.1], 1e-8, 1e-5));
        assert!(!all_close(&[1.0], &[1.0, 2.0], 1.0, 1.0));
    }
}
