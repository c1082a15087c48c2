use crate::animation::ease::Ease;
use crate::foundation::error::{TimelineError, TimelineResult};

/// Behavior outside the first/last input breakpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Extrapolate {
    /// Hold the nearest boundary output.
    #[default]
    Clamp,
    /// Continue the slope of the nearest segment.
    Extend,
    /// Return the input unchanged.
    Identity,
}

/// Piecewise-linear mapping from input breakpoints to output breakpoints.
///
/// Breakpoints are validated once in [`Interpolator::new`]; sampling is infallible.
#[derive(Clone, Debug, PartialEq)]
pub struct Interpolator {
    input: Vec<f64>,
    output: Vec<f64>,
    left: Extrapolate,
    right: Extrapolate,
    ease: Ease,
}

impl Interpolator {
    /// Build an interpolator that clamps on both sides.
    pub fn new(input: impl Into<Vec<f64>>, output: impl Into<Vec<f64>>) -> TimelineResult<Self> {
        let input = input.into();
        let output = output.into();
        if input.len() < 2 {
            return Err(TimelineError::config(
                "interpolation needs at least two breakpoints",
            ));
        }
        if input.len() != output.len() {
            return Err(TimelineError::config(format!(
                "interpolation input has {} breakpoints but output has {}",
                input.len(),
                output.len()
            )));
        }
        if !input.iter().chain(output.iter()).all(|v| v.is_finite()) {
            return Err(TimelineError::config(
                "interpolation breakpoints must be finite",
            ));
        }
        if let Some(i) = input.windows(2).position(|w| w[0] >= w[1]) {
            return Err(TimelineError::config(format!(
                "interpolation input must be strictly increasing ({} at index {} is followed by {})",
                input[i],
                i,
                input[i + 1]
            )));
        }
        Ok(Self {
            input,
            output,
            left: Extrapolate::Clamp,
            right: Extrapolate::Clamp,
            ease: Ease::Linear,
        })
    }

    /// Policy below the first breakpoint.
    pub fn left(mut self, policy: Extrapolate) -> Self {
        self.left = policy;
        self
    }

    /// Policy above the last breakpoint.
    pub fn right(mut self, policy: Extrapolate) -> Self {
        self.right = policy;
        self
    }

    /// Same policy on both sides.
    pub fn extrapolate(self, policy: Extrapolate) -> Self {
        self.left(policy).right(policy)
    }

    /// Easing applied within each segment.
    pub fn ease(mut self, ease: Ease) -> TimelineResult<Self> {
        ease.validate()?;
        self.ease = ease;
        Ok(self)
    }

    /// Map `x` through the breakpoints.
    pub fn sample(&self, x: f64) -> f64 {
        let last = self.input.len() - 1;
        if x < self.input[0] {
            return self.outside(x, 0, self.left);
        }
        if x > self.input[last] {
            return self.outside(x, last - 1, self.right);
        }

        // Segment `i` spans `[input[i], input[i + 1]]`.
        let i = self.input.partition_point(|&b| b <= x).saturating_sub(1).min(last - 1);
        let (x0, x1) = (self.input[i], self.input[i + 1]);
        let (y0, y1) = (self.output[i], self.output[i + 1]);
        match self.ease {
            Ease::Linear => y0 + (x - x0) * (y1 - y0) / (x1 - x0),
            ease => y0 + (y1 - y0) * ease.apply((x - x0) / (x1 - x0)),
        }
    }

    fn outside(&self, x: f64, segment: usize, policy: Extrapolate) -> f64 {
        let (x0, x1) = (self.input[segment], self.input[segment + 1]);
        let (y0, y1) = (self.output[segment], self.output[segment + 1]);
        match policy {
            Extrapolate::Identity => x,
            Extrapolate::Clamp => {
                if x < x0 {
                    y0
                } else {
                    y1
                }
            }
            Extrapolate::Extend => y0 + (x - x0) * (y1 - y0) / (x1 - x0),
        }
    }
}

/// One-shot form of [`Interpolator`]: validate the breakpoints and sample `x`.
pub fn interpolate(
    x: f64,
    input: &[f64],
    output: &[f64],
    left: Extrapolate,
    right: Extrapolate,
) -> TimelineResult<f64> {
    Ok(Interpolator::new(input, output)?
        .left(left)
        .right(right)
        .sample(x))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interpolate.rs"]
mod tests;
