//! Errors surfaced by shape construction and property queries.
//!
//! All errors are raised at the call that detects them and are never retried:
//! malformed geometry is a caller bug or bad data.

use thiserror::Error;

/// Error taxonomy shared by polygons, polyhedra and descriptors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeomError {
    /// Too few, duplicate, collinear or non-coplanar points; malformed facets.
    #[error("degenerate input: {reason}")]
    DegenerateInput { reason: String },

    /// Facet graph not connected, or an edge shared by more than two facets.
    #[error("disconnected topology: {reason}")]
    DisconnectedTopology { reason: String },

    /// A dihedral angle was requested for facets that share no edge.
    #[error("facets {a} and {b} are not neighbors")]
    NotNeighbors { a: usize, b: usize },

    /// Non-positive radius, volume or area targets; malformed descriptors.
    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    /// A derived object (circumcircle, insphere, ...) does not exist.
    #[error("geometry error: {reason}")]
    Geometry { reason: String },
}

impl GeomError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn disconnected(reason: impl Into<String>) -> Self {
        Self::DisconnectedTopology {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    pub(crate) fn geometry(reason: impl Into<String>) -> Self {
        Self::Geometry {
            reason: reason.into(),
        }
    }
}

/// Require a strictly positive, finite value.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<f64, GeomError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeomError::invalid(format!(
            "{name} must be finite and > 0 (got {value})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let e = GeomError::NotNeighbors { a: 0, b: 5 };
        assert_eq!(e.to_string(), "facets 0 and 5 are not neighbors");
        let e = GeomError::degenerate("only 2 points");
        assert_eq!(e.to_string(), "degenerate input: only 2 points");
    }

    #[test]
    fn positivity_check() {
        assert_eq!(require_positive("volume", 2.0), Ok(2.0));
        assert!(matches!(
            require_positive("volume", 0.0),
            Err(GeomError::InvalidParameter { .. })
        ));
        assert!(require_positive("radius", f64::NAN).is_err());
    }
}
