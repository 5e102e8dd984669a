// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Iterative Gaussian core estimation for histogram slices.
//!
//! Starting from the mean and RMS of the full slice, the window is
//! repeatedly narrowed to `mean ± window * sigma` and the moments are
//! recomputed from bins whose centers fall inside it. This converges on the
//! core of a peaked distribution and ignores tails.

use crate::utils::histogram::{Histogram1D, Histogram2D};
use crate::errors::HistogramError;

/// Result of estimating one slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussEstimate {
    pub mean: f64,
    pub mean_error: f64,
    pub sigma: f64,
    pub sigma_error: f64,
    pub iterations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussFitOptions {
    /// Half-width of the fit window in units of sigma
    pub window: f64,
    pub max_iterations: usize,
    /// Stop once the mean moves less than `tolerance * sigma`
    pub tolerance: f64,
    /// Slices with less total content are not fitted
    pub min_entries: f64,
}

impl Default for GaussFitOptions {
    fn default() -> Self {
        Self {
            window: 2.0,
            max_iterations: 10,
            tolerance: 1e-3,
            min_entries: 10.0,
        }
    }
}

struct Moments {
    sum: f64,
    mean: f64,
    sigma: f64,
}

fn moments(slice: &Histogram1D, low: f64, high: f64) -> Option<Moments> {
    let mut sum = 0.0;
    let mut first = 0.0;
    let mut second = 0.0;

    for bin in 1..=slice.axis.bins {
        let x = slice.axis.center(bin);
        if x < low || x > high {
            continue;
        }
        let w = slice.bin_content(bin);
        sum += w;
        first += w * x;
        second += w * x * x;
    }

    if sum <= 0.0 {
        return None;
    }
    let mean = first / sum;
    let variance = (second / sum - mean * mean).max(0.0);
    Some(Moments {
        sum,
        mean,
        sigma: variance.sqrt(),
    })
}

/// Estimate the Gaussian core of a 1D distribution, or `None` for slices
/// that are too sparse or degenerate.
pub fn iterative_gauss(slice: &Histogram1D, options: &GaussFitOptions) -> Option<GaussEstimate> {
    if slice.integral() < options.min_entries {
        return None;
    }

    let mut current = moments(slice, f64::NEG_INFINITY, f64::INFINITY)?;
    let mut iterations = 0;

    while iterations < options.max_iterations {
        // Never let the window shrink below one bin on either side.
        let half_width = (options.window * current.sigma).max(slice.axis.width());
        let next = match moments(slice, current.mean - half_width, current.mean + half_width) {
            Some(m) => m,
            None => break,
        };
        iterations += 1;
        let shift = (next.mean - current.mean).abs();
        let converged = shift <= options.tolerance * next.sigma.max(slice.axis.width());
        current = next;
        if converged {
            break;
        }
    }

    let n = current.sum.max(1.0);
    Some(GaussEstimate {
        mean: current.mean,
        mean_error: current.sigma / n.sqrt(),
        sigma: current.sigma,
        sigma_error: current.sigma / (2.0 * n).sqrt(),
        iterations,
    })
}

/// Profile a 2D histogram along x: for each x bin, estimate the y core and
/// store it in `<name>_mu` and `<name>_sigma` histograms over the x axis.
pub fn profile_y(
    histogram: &Histogram2D,
    options: &GaussFitOptions,
) -> Result<(Histogram1D, Histogram1D), HistogramError> {
    let mu_name = format!("{}_mu", histogram.name);
    let sigma_name = format!("{}_sigma", histogram.name);
    let mut mu = Histogram1D::new(mu_name.clone(), mu_name, histogram.x_axis);
    let mut sigma = Histogram1D::new(sigma_name.clone(), sigma_name, histogram.x_axis);

    for x_bin in 1..=histogram.x_axis.bins {
        let slice = histogram.projection_y(x_bin, format!("{}_slice_{}", histogram.name, x_bin));
        if let Some(fit) = iterative_gauss(&slice, options) {
            mu.set_bin(x_bin, fit.mean, fit.mean_error)?;
            sigma.set_bin(x_bin, fit.sigma, fit.sigma_error)?;
            mu.entries += 1;
            sigma.entries += 1;
        }
    }

    Ok((mu, sigma))
}
