//! Seeded random convex polyhedra.
//!
//! Purpose
//! - Reproducible streams of convex shapes for property tests, benchmarks
//!   and the CLI.
//!
//! Why this design
//! - Every sample carries its params snapshot and a replay token, so any
//!   sample in a stream can be rebuilt alone with `regenerate`.
//! - Per-sample seeds are drawn from a master `StdRng`; the stream seed plus
//!   the sample position is never needed for replay.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::GeomError;

use super::convex::ConvexPolyhedron;

/// One generated polyhedron plus replay metadata.
#[derive(Clone, Debug)]
pub struct PolyhedronSample<P, R> {
    pub polyhedron: ConvexPolyhedron,
    pub params: P,
    pub replay: R,
}

/// Common trait for reproducible polyhedron sources.
pub trait PolyhedronGenerator {
    type Params: Clone;
    type Replay: Clone;

    fn params(&self) -> &Self::Params;

    /// Next sample, or `None` once the stream is exhausted.
    fn generate_next(
        &mut self,
    ) -> Result<Option<PolyhedronSample<Self::Params, Self::Replay>>, GeomError>;

    fn regenerate(&self, replay: &Self::Replay) -> Result<ConvexPolyhedron, GeomError>;
}

/// Hull of `points` random points whose distances from the origin are
/// uniform in `[radius_min, radius_max]` along uniformly random directions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomConvexParams {
    pub points: usize,
    pub radius_min: f64,
    pub radius_max: f64,
    /// Stop the stream after this many samples (`None`: unbounded).
    pub limit: Option<usize>,
}

impl Default for RandomConvexParams {
    fn default() -> Self {
        Self {
            points: 32,
            radius_min: 0.8,
            radius_max: 1.2,
            limit: None,
        }
    }
}

impl RandomConvexParams {
    fn validate(&self) -> Result<(), GeomError> {
        if self.points < 4 {
            return Err(GeomError::invalid(format!(
                "need at least 4 points (got {})",
                self.points
            )));
        }
        if !(self.radius_min.is_finite() && self.radius_max.is_finite()) {
            return Err(GeomError::invalid("radius bounds must be finite"));
        }
        if self.radius_min <= 0.0 {
            return Err(GeomError::invalid("radius_min must be > 0"));
        }
        if self.radius_min > self.radius_max {
            return Err(GeomError::invalid("radius_min <= radius_max required"));
        }
        Ok(())
    }
}

/// Replay token storing the seed that regenerates one sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReplay {
    pub seed: u64,
}

pub struct RandomConvexGenerator {
    params: RandomConvexParams,
    master_rng: StdRng,
    emitted: usize,
}

impl RandomConvexGenerator {
    pub fn new(params: RandomConvexParams, seed: u64) -> Result<Self, GeomError> {
        params.validate()?;
        Ok(Self {
            params,
            master_rng: StdRng::seed_from_u64(seed),
            emitted: 0,
        })
    }

    pub fn generate_single(
        params: &RandomConvexParams,
        seed: u64,
    ) -> Result<ConvexPolyhedron, GeomError> {
        params.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let points: Vec<Vector3<f64>> = (0..params.points)
            .map(|_| {
                let r = if params.radius_max > params.radius_min {
                    rng.gen_range(params.radius_min..=params.radius_max)
                } else {
                    params.radius_min
                };
                sample_unit_vector(&mut rng) * r
            })
            .collect();
        ConvexPolyhedron::new(&points)
    }
}

impl PolyhedronGenerator for RandomConvexGenerator {
    type Params = RandomConvexParams;
    type Replay = SeedReplay;

    fn params(&self) -> &Self::Params {
        &self.params
    }

    fn generate_next(
        &mut self,
    ) -> Result<Option<PolyhedronSample<Self::Params, Self::Replay>>, GeomError> {
        if self.params.limit.is_some_and(|limit| self.emitted >= limit) {
            return Ok(None);
        }
        let seed = self.master_rng.next_u64();
        let polyhedron = Self::generate_single(&self.params, seed)?;
        self.emitted += 1;
        trace!(seed, facets = polyhedron.polyhedron().num_facets(), "random convex sample");
        Ok(Some(PolyhedronSample {
            polyhedron,
            params: self.params.clone(),
            replay: SeedReplay { seed },
        }))
    }

    fn regenerate(&self, replay: &Self::Replay) -> Result<ConvexPolyhedron, GeomError> {
        Self::generate_single(&self.params, replay.seed)
    }
}

/// Rejection sampling from the cube `[-1, 1]³`.
fn sample_unit_vector(rng: &mut StdRng) -> Vector3<f64> {
    loop {
        let v = Vector3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let n = v.norm();
        if n > 1e-6 && n <= 1.0 {
            return v / n;
        }
    }
}
