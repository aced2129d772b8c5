use crate::error::{InvalidInputError, Result};
use crate::map::MaxGradient;

/// Default `alpha`.
pub const PRESET_ALPHA: f64 = 0.3;
/// Default `beta`.
pub const PRESET_BETA: f64 = 0.5;

/// Threshold ratios relative to the frozen maximum gradient.
///
/// Both ratios lie in [0, 1]; construction through [`EdgeParams::new`] enforces this.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeParams {
    alpha: f64,
    beta: f64,
}

impl EdgeParams {
    /// Validates both ratios.
    pub fn new(alpha: f64, beta: f64) -> Result<EdgeParams> {
        Ok(EdgeParams {
            alpha: unit_interval("alpha", alpha)?,
            beta: unit_interval("beta", beta)?,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Cutoff of the single-level threshold: `round(alpha * beta * max)`.
    pub fn simple_cutoff(&self, max: MaxGradient) -> u32 {
        round_scaled(self.alpha * self.beta, f64::from(max.get()))
    }

    /// `(min, max)` of the double threshold.
    ///
    /// `max = round(alpha * max_gradient)` and `min = round(beta * max)`: beta scales the
    /// already rounded upper bound, so this is not the simple cutoff under another name.
    pub fn hysteresis_bounds(&self, max: MaxGradient) -> (u32, u32) {
        let upper = round_scaled(self.alpha, f64::from(max.get()));
        let lower = round_scaled(self.beta, f64::from(upper));
        (lower, upper)
    }
}

impl Default for EdgeParams {
    fn default() -> EdgeParams {
        EdgeParams {
            alpha: PRESET_ALPHA,
            beta: PRESET_BETA,
        }
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(InvalidInputError::ParameterOutOfRange { name, value })
    }
}

// Rounds half up; operands are non-negative so this matches `floor(x + 0.5)`.
fn round_scaled(ratio: f64, value: f64) -> u32 {
    (ratio * value).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = EdgeParams::default();
        assert_eq!(p.alpha(), 0.3);
        assert_eq!(p.beta(), 0.5);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            EdgeParams::new(1.5, 0.5),
            Err(InvalidInputError::ParameterOutOfRange { name: "alpha", value: 1.5 })
        );
        assert_eq!(
            EdgeParams::new(0.5, -0.1),
            Err(InvalidInputError::ParameterOutOfRange { name: "beta", value: -0.1 })
        );
        assert!(EdgeParams::new(f64::NAN, 0.5).is_err());
        assert!(EdgeParams::new(0.0, 1.0).is_ok());
    }

    #[test]
    fn simple_and_hysteresis_formulas_differ() {
        let p = EdgeParams::new(0.3, 0.5).unwrap();
        let max = MaxGradient::new(255);
        // 0.15 * 255 = 38.25
        assert_eq!(p.simple_cutoff(max), 38);
        // round(76.5) = 77, round(38.5) = 39
        assert_eq!(p.hysteresis_bounds(max), (39, 77));
    }

    #[test]
    fn zero_alpha_zero_cutoff() {
        let p = EdgeParams::new(0.0, 0.7).unwrap();
        assert_eq!(p.simple_cutoff(MaxGradient::new(1000)), 0);
        assert_eq!(p.hysteresis_bounds(MaxGradient::new(1000)), (0, 0));
    }
}
