//! Statistics of Monte Carlo estimates over several chains.
//!
//! The error of the mean comes from blocking the chain-averaged series into
//! blocks of twice the integrated autocorrelation time. R̂ is the
//! Gelman-Rubin ratio between and within chains.

use std::fmt;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Summary of a sampled observable.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Stats {
    /// Real part of the sample mean
    pub mean: f64,
    /// Imaginary part of the sample mean
    pub mean_imag: f64,
    /// Standard error of the mean
    pub error_of_mean: f64,
    /// Variance ⟨|x - x̄|²⟩ over all samples
    pub variance: f64,
    /// Integrated autocorrelation time of the chain-averaged series
    pub tau_corr: f64,
    /// Gelman-Rubin convergence diagnostic, NaN with fewer than two chains
    pub r_hat: f64,
}

impl Stats {
    /// Statistics of `chains[c][t]`, one inner vector per chain.
    pub fn from_chains(chains: &[Vec<Complex64>]) -> Self {
        let n = chains.iter().map(Vec::len).sum::<usize>() as f64;
        let mean = chains.iter().flatten().sum::<Complex64>() / n;
        let variance = chains.iter()
            .flatten()
            .map(|x| (x - mean).norm_sqr())
            .sum::<f64>() / n;

        let series = chain_averaged_series(chains);
        let tau_corr = autocorrelation_time(&series);
        let error_of_mean = blocking_error(&series, tau_corr)
            .unwrap_or_else(|| (variance / n).sqrt());

        Self {
            mean: mean.re,
            mean_imag: mean.im,
            error_of_mean,
            variance,
            tau_corr,
            r_hat: gelman_rubin(chains),
        }
    }

    /// Statistics of uncorrelated real samples in a single chain.
    pub fn from_samples(samples: &[f64]) -> Self {
        let chain: Vec<Complex64> = samples.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        Self::from_chains(&[chain])
    }

    pub fn is_finite(&self) -> bool {
        self.mean.is_finite() && self.error_of_mean.is_finite()
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6} ± {:.6} [σ²={:.6}, τ={:.2}, R̂={:.4}]",
            self.mean, self.error_of_mean, self.variance, self.tau_corr, self.r_hat
        )
    }
}

/// Real part of the average over chains at each step.
fn chain_averaged_series(chains: &[Vec<Complex64>]) -> Vec<f64> {
    let length = chains.iter().map(Vec::len).min().unwrap_or(0);
    (0..length)
        .map(|t| chains.iter().map(|c| c[t].re).sum::<f64>() / chains.len() as f64)
        .collect()
}

/// Estimate autocorrelation time using initial positive sequence.
fn autocorrelation_time(series: &[f64]) -> f64 {
    let n = series.len();
    if n < 2 {
        return 1.0;
    }
    let mean = series.iter().sum::<f64>() / n as f64;
    let var = series.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n as f64;

    if var == 0.0 {
        return 1.0;
    }

    let mut autocorr = 1.0;
    for t in 1..n / 2 {
        let auto_t: f64 = series[..n - t].iter()
            .zip(series[t..].iter())
            .map(|(&x, &y)| (x - mean) * (y - mean))
            .sum::<f64>() / ((n - t) as f64 * var);

        if auto_t < 0.0 {
            break;
        }
        autocorr += 2.0 * auto_t;
    }
    autocorr
}

/// Error of the mean from block averages, `None` with fewer than two blocks.
fn blocking_error(series: &[f64], autocorrelation_time: f64) -> Option<f64> {
    let block_size = ((2.0 * autocorrelation_time).ceil() as usize).max(1);
    let n_blocks = series.len() / block_size;

    if n_blocks < 2 {
        return None;
    }

    let block_means: Vec<f64> = series.chunks_exact(block_size)
        .map(|block| block.iter().sum::<f64>() / block_size as f64)
        .collect();

    let mean = block_means.iter().sum::<f64>() / n_blocks as f64;
    let variance = block_means.iter()
        .map(|&x| (x - mean).powi(2))
        .sum::<f64>() / (n_blocks - 1) as f64;

    Some((variance / n_blocks as f64).sqrt())
}

/// Potential scale reduction factor over chains of equal length.
fn gelman_rubin(chains: &[Vec<Complex64>]) -> f64 {
    let m = chains.len();
    let length = chains.iter().map(Vec::len).min().unwrap_or(0);
    if m < 2 || length < 2 {
        return f64::NAN;
    }
    let l = length as f64;
    let means: Vec<f64> = chains.iter()
        .map(|c| c[..length].iter().map(|x| x.re).sum::<f64>() / l)
        .collect();
    let within = chains.iter()
        .zip(means.iter())
        .map(|(c, &mu)| c[..length].iter().map(|x| (x.re - mu).powi(2)).sum::<f64>() / (l - 1.0))
        .sum::<f64>() / m as f64;
    let grand = means.iter().sum::<f64>() / m as f64;
    let between = means.iter().map(|mu| (mu - grand).powi(2)).sum::<f64>() / (m as f64 - 1.0);

    if within == 0.0 {
        return if between == 0.0 { 1.0 } else { f64::INFINITY };
    }
    let pooled = (l - 1.0) / l * within + between;
    (pooled / within).sqrt()
}
