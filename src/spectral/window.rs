//! Window functions for short-time analysis.
//!
//! All cosine-sum shapes are periodic (the DFT-even form), so a Hann window
//! of length `n` has exactly two non-zero bins in its spectrum. The
//! rectangular window is scaled by 0.5 so that its DC gain matches Hann.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowShape {
    Rectangular,
    Bartlett,
    Hamming,
    #[default]
    Hann,
    Blackman,
    Gaussian,
    Parzen,
    Nuttall,
    BlackmanHarris,
}

impl WindowShape {
    pub const ALL: [WindowShape; 9] = [
        WindowShape::Rectangular,
        WindowShape::Bartlett,
        WindowShape::Hamming,
        WindowShape::Hann,
        WindowShape::Blackman,
        WindowShape::Gaussian,
        WindowShape::Parzen,
        WindowShape::Nuttall,
        WindowShape::BlackmanHarris,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WindowShape::Rectangular => "rectangular",
            WindowShape::Bartlett => "bartlett",
            WindowShape::Hamming => "hamming",
            WindowShape::Hann => "hann",
            WindowShape::Blackman => "blackman",
            WindowShape::Gaussian => "gaussian",
            WindowShape::Parzen => "parzen",
            WindowShape::Nuttall => "nuttall",
            WindowShape::BlackmanHarris => "blackman-harris",
        }
    }
}

impl fmt::Display for WindowShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowShape {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "rect" | "rectangular" => Ok(WindowShape::Rectangular),
            "bartlett" | "triangular" => Ok(WindowShape::Bartlett),
            "hamming" => Ok(WindowShape::Hamming),
            "hann" | "hanning" => Ok(WindowShape::Hann),
            "blackman" => Ok(WindowShape::Blackman),
            "gaussian" => Ok(WindowShape::Gaussian),
            "parzen" => Ok(WindowShape::Parzen),
            "nuttall" => Ok(WindowShape::Nuttall),
            "blackman-harris" | "blackmanharris" => Ok(WindowShape::BlackmanHarris),
            _ => Err(AnalysisError::UnknownWindow(s.to_string())),
        }
    }
}

/// A precomputed taper of fixed shape and length.
#[derive(Debug, Clone)]
pub struct Window {
    shape: WindowShape,
    weights: Vec<f32>,
    area: f32,
}

impl Window {
    pub fn new(shape: WindowShape, size: usize) -> Self {
        let weights = compute_weights(shape, size);
        let area = if size == 0 {
            0.0
        } else {
            weights.iter().sum::<f32>() / size as f32
        };
        Self {
            shape,
            weights,
            area,
        }
    }

    pub fn shape(&self) -> WindowShape {
        self.shape
    }

    pub fn size(&self) -> usize {
        self.weights.len()
    }

    /// Mean weight of the window.
    pub fn area(&self) -> f32 {
        self.area
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Multiply `samples` in place by the window weights.
    ///
    /// Only `min(samples.len(), size)` leading samples are touched.
    pub fn cut(&self, samples: &mut [f32]) {
        for (s, w) in samples.iter_mut().zip(self.weights.iter()) {
            *s *= w;
        }
    }
}

fn compute_weights(shape: WindowShape, n: usize) -> Vec<f32> {
    let mut mult = vec![1.0f64; n];
    if n == 0 {
        return Vec::new();
    }

    match shape {
        WindowShape::Rectangular => {
            for m in mult.iter_mut() {
                *m *= 0.5;
            }
        }
        WindowShape::Bartlett => {
            if n == 2 {
                mult[0] = 0.0;
                mult[1] = 0.0;
            } else {
                let half = n / 2;
                for i in 0..half {
                    let r = i as f64 / half as f64;
                    mult[i] *= r;
                    mult[i + n - half] *= 1.0 - r;
                }
            }
        }
        WindowShape::Hamming => cosine_sum(&mut mult, 0.54, 0.46, 0.0, 0.0),
        WindowShape::Hann => cosine_sum(&mut mult, 0.50, 0.50, 0.0, 0.0),
        WindowShape::Blackman => cosine_sum(&mut mult, 0.42, 0.50, 0.08, 0.0),
        WindowShape::Gaussian => {
            if n > 1 {
                let centre = (n - 1) as f64 / 2.0;
                let sigma = centre / 3.0;
                for (i, m) in mult.iter_mut().enumerate() {
                    let d = (i as f64 - centre) / sigma;
                    *m *= 2f64.powf(-(d * d));
                }
            }
        }
        WindowShape::Parzen => {
            let last = n - 1;
            let half = last as f64 / 2.0;
            if half > 0.0 {
                for i in 0..last / 4 {
                    let m = 2.0 * (1.0 - (half - i as f64) / half).powi(3);
                    mult[i] *= m;
                    mult[last - i] *= m;
                }
                for i in last / 4..=last / 2 {
                    let wn = i as f64 - half;
                    let m = 1.0 - 6.0 * (wn / half).powi(2) * (1.0 - wn.abs() / half);
                    mult[i] *= m;
                    if last - i != i {
                        mult[last - i] *= m;
                    }
                }
            }
        }
        WindowShape::Nuttall => cosine_sum(&mut mult, 0.3635819, 0.4891775, 0.1365995, 0.0106411),
        WindowShape::BlackmanHarris => cosine_sum(&mut mult, 0.35875, 0.48829, 0.14128, 0.01168),
    }

    mult.into_iter().map(|m| m as f32).collect()
}

fn cosine_sum(mult: &mut [f64], a0: f64, a1: f64, a2: f64, a3: f64) {
    let n = mult.len() as f64;
    for (i, m) in mult.iter_mut().enumerate() {
        let x = i as f64;
        *m *= a0 - a1 * (2.0 * PI * x / n).cos() + a2 * (4.0 * PI * x / n).cos()
            - a3 * (6.0 * PI * x / n).cos();
    }
}
