use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Interpolation constants
// ---------------------------------------------------------------------------

/// Envelope thickness at maximum usage intensity (industry ceiling), cm.
pub const MAX_THICKNESS_CM: f64 = 50.0;
/// Lowest usage-intensity class Q.
pub const MIN_INTENSITY: f64 = 2.0;
/// Highest usage-intensity class Q.
pub const MAX_INTENSITY: f64 = 10.0;

// ---------------------------------------------------------------------------
// Domain errors
// ---------------------------------------------------------------------------

/// Inputs outside the model's domain. Callers must reject these rather than
/// accept a decreasing or extrapolated interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidDomain {
    #[error("usage intensity Q={0} is outside [{MIN_INTENSITY}, {MAX_INTENSITY}]")]
    IntensityOutOfRange(f64),
    #[error("base thickness {0} cm exceeds the {MAX_THICKNESS_CM} cm maximum")]
    BaseAboveMaximum(f64),
    #[error("base thickness must be positive, got {0} cm")]
    BaseNotPositive(f64),
}

// ---------------------------------------------------------------------------
// The model
// ---------------------------------------------------------------------------

/// Adjusted envelope thickness for a usage intensity Q.
///
/// Interpolates linearly between `base_thickness_cm` at Q = 2 and
/// [`MAX_THICKNESS_CM`] at Q = 10, rounded to 2 decimal places:
///
/// ```
/// use baudash::calc::thickness::adjusted_thickness;
///
/// assert_eq!(adjusted_thickness(15.0, 4.0).unwrap(), 23.75);
/// assert_eq!(adjusted_thickness(20.0, 8.0).unwrap(), 42.50);
/// ```
///
/// Pure and stateless; safe to call from anywhere. Errors with
/// [`InvalidDomain`] when Q leaves [2, 10] or the base thickness leaves
/// (0, 50].
pub fn adjusted_thickness(
    base_thickness_cm: f64,
    target_intensity: f64,
) -> Result<f64, InvalidDomain> {
    if !(base_thickness_cm > 0.0) {
        return Err(InvalidDomain::BaseNotPositive(base_thickness_cm));
    }
    if base_thickness_cm > MAX_THICKNESS_CM {
        return Err(InvalidDomain::BaseAboveMaximum(base_thickness_cm));
    }
    if !(MIN_INTENSITY..=MAX_INTENSITY).contains(&target_intensity) {
        return Err(InvalidDomain::IntensityOutOfRange(target_intensity));
    }

    let increment = (MAX_THICKNESS_CM - base_thickness_cm) / (MAX_INTENSITY - MIN_INTENSITY);
    let adjusted = base_thickness_cm + (target_intensity - MIN_INTENSITY) * increment;
    Ok(round2(adjusted))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Occupancy classes
// ---------------------------------------------------------------------------

/// The fixed occupancy categories the calculator produces a row for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OccupancyClass {
    Offices,
    Education,
    Culture,
    Trade,
    Healthcare,
    Hospitality,
    Industry,
}

impl OccupancyClass {
    pub const ALL: [OccupancyClass; 7] = [
        OccupancyClass::Offices,
        OccupancyClass::Education,
        OccupancyClass::Culture,
        OccupancyClass::Trade,
        OccupancyClass::Healthcare,
        OccupancyClass::Hospitality,
        OccupancyClass::Industry,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OccupancyClass::Offices => "Offices",
            OccupancyClass::Education => "Education",
            OccupancyClass::Culture => "Culture",
            OccupancyClass::Trade => "Trade",
            OccupancyClass::Healthcare => "Healthcare",
            OccupancyClass::Hospitality => "Hospitality",
            OccupancyClass::Industry => "Industry",
        }
    }
}

impl fmt::Display for OccupancyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Apply the model once per occupancy class against a single residential
/// base thickness, producing the (class → adjusted thickness) result table.
///
/// Fails on the first out-of-domain input; a partially valid submission is
/// rejected as a whole.
pub fn thickness_table(
    base_thickness_cm: f64,
    intensities: &[(OccupancyClass, f64)],
) -> Result<Vec<(OccupancyClass, f64)>, InvalidDomain> {
    intensities
        .iter()
        .map(|&(class, q)| adjusted_thickness(base_thickness_cm, q).map(|t| (class, t)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_intensity_returns_base_thickness() {
        for base in [0.5, 5.0, 15.0, 33.33, 50.0] {
            assert_eq!(adjusted_thickness(base, MIN_INTENSITY).unwrap(), base);
        }
    }

    #[test]
    fn maximum_intensity_returns_the_ceiling() {
        for base in [0.5, 5.0, 15.0, 33.33, 50.0] {
            assert_eq!(adjusted_thickness(base, MAX_INTENSITY).unwrap(), 50.0);
        }
    }

    #[test]
    fn worked_examples() {
        // increment = (50 - 15) / 8 = 4.375; 15 + 2 * 4.375 = 23.75
        assert_eq!(adjusted_thickness(15.0, 4.0).unwrap(), 23.75);
        // increment = 3.75; 20 + 6 * 3.75 = 42.50
        assert_eq!(adjusted_thickness(20.0, 8.0).unwrap(), 42.5);
    }

    #[test]
    fn monotonically_non_decreasing_in_intensity() {
        for base in [5.0, 15.0, 27.5, 50.0] {
            let mut prev = f64::NEG_INFINITY;
            for q in 2..=10 {
                let adjusted = adjusted_thickness(base, q as f64).unwrap();
                assert!(adjusted >= prev, "base {base}, Q {q}: {adjusted} < {prev}");
                prev = adjusted;
            }
        }
    }

    #[test]
    fn result_is_rounded_to_two_decimals() {
        // increment = (50 - 15.1) / 8 = 4.3625; 15.1 + 4.3625 = 19.4625 → 19.46
        assert_eq!(adjusted_thickness(15.1, 3.0).unwrap(), 19.46);
    }

    #[test]
    fn intensity_outside_domain_is_rejected() {
        assert_eq!(
            adjusted_thickness(15.0, 11.0),
            Err(InvalidDomain::IntensityOutOfRange(11.0))
        );
        assert_eq!(
            adjusted_thickness(15.0, 1.9),
            Err(InvalidDomain::IntensityOutOfRange(1.9))
        );
        assert!(adjusted_thickness(15.0, f64::NAN).is_err());
    }

    #[test]
    fn base_thickness_outside_domain_is_rejected() {
        assert_eq!(
            adjusted_thickness(50.5, 4.0),
            Err(InvalidDomain::BaseAboveMaximum(50.5))
        );
        assert_eq!(
            adjusted_thickness(0.0, 4.0),
            Err(InvalidDomain::BaseNotPositive(0.0))
        );
        assert_eq!(
            adjusted_thickness(-3.0, 4.0),
            Err(InvalidDomain::BaseNotPositive(-3.0))
        );
    }

    #[test]
    fn base_at_ceiling_is_flat_across_intensities() {
        for q in 2..=10 {
            assert_eq!(adjusted_thickness(50.0, q as f64).unwrap(), 50.0);
        }
    }

    #[test]
    fn table_covers_every_class_and_rejects_as_a_whole() {
        let intensities: Vec<(OccupancyClass, f64)> = OccupancyClass::ALL
            .iter()
            .map(|&c| (c, 4.0))
            .collect();
        let rows = thickness_table(15.0, &intensities).unwrap();
        assert_eq!(rows.len(), OccupancyClass::ALL.len());
        assert!(rows.iter().all(|&(_, t)| t == 23.75));

        let mut bad = intensities.clone();
        bad[3].1 = 12.0;
        assert!(thickness_table(15.0, &bad).is_err());
    }
}
