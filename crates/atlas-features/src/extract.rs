//! Audio decoding and feature computation.
//!
//! Per file: MFCC and chroma via giggle, spectral contrast over 7 octave
//! bands from a Hann-windowed STFT, and the 6-dimensional tonnetz projection
//! of the chroma frames. Each family is averaged across time frames and the
//! means are concatenated in {MFCC, chroma, contrast, tonnetz} order.

use std::f32::consts::PI;
use std::path::Path;

use anyhow::{Context, Result};
use atlas_core::config::FeaturesConfig;
use atlas_core::records::{FEATURE_COUNT, N_CHROMA, N_CONTRAST, N_MFCC, N_TONNETZ};
use giggle::feature;
use realfft::RealFftPlanner;

/// Load a WAV file and mix it down to mono f32 samples.
pub fn load_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
    };

    let mono = samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    Ok((mono, spec.sample_rate))
}

/// Compute the summary feature vector for one audio file.
pub fn extract_features(path: &Path, config: &FeaturesConfig) -> Result<Vec<f32>> {
    let (mono, sample_rate) = load_mono(path)?;
    if mono.len() < config.n_fft {
        anyhow::bail!(
            "{} is shorter than one analysis frame ({} samples)",
            path.display(),
            config.n_fft
        );
    }

    let mfcc = feature::mfcc::mfcc(
        &mono,
        sample_rate,
        N_MFCC,
        config.n_fft,
        config.hop_length,
        config.n_mels,
    )
    .map_err(|e| anyhow::anyhow!("MFCC extraction failed: {:?}", e))?;

    let chroma = feature::chroma::chroma_stft(
        &mono,
        sample_rate,
        config.n_fft,
        config.hop_length,
        N_CHROMA,
        0.0,
    )
    .map_err(|e| anyhow::anyhow!("chroma extraction failed: {:?}", e))?;

    let spectrogram = stft_magnitudes(&mono, config.n_fft, config.hop_length)?;

    let mut features = Vec::with_capacity(FEATURE_COUNT);

    for i in 0..N_MFCC {
        let row = mfcc.row(i);
        features.push(row.iter().sum::<f32>() / row.len() as f32);
    }
    for i in 0..N_CHROMA {
        let row = chroma.row(i);
        features.push(row.iter().sum::<f32>() / row.len() as f32);
    }
    features.extend(spectral_contrast_means(
        &spectrogram,
        sample_rate,
        config.n_fft,
    ));

    // Tonnetz works on per-frame chroma vectors, L1-normalized.
    let chroma_frames: Vec<Vec<f32>> = (0..chroma.shape()[1])
        .map(|j| chroma.column(j).iter().copied().collect())
        .collect();
    features.extend(tonnetz_means(&chroma_frames));

    Ok(features)
}

/// Magnitude spectrogram: Hann window, one `Vec` of `n_fft / 2 + 1` bin
/// magnitudes per frame.
fn stft_magnitudes(signal: &[f32], n_fft: usize, hop_length: usize) -> Result<Vec<Vec<f32>>> {
    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n_fft);

    let window: Vec<f32> = (0..n_fft)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f32 / n_fft as f32).cos())
        .collect();

    let mut input = fft.make_input_vec();
    let mut output = fft.make_output_vec();
    let mut frames = Vec::new();

    let mut pos = 0;
    while pos + n_fft <= signal.len() {
        for (i, value) in input.iter_mut().enumerate() {
            *value = signal[pos + i] * window[i];
        }
        fft.process(&mut input, &mut output)
            .map_err(|e| anyhow::anyhow!("FFT failed: {:?}", e))?;
        frames.push(output.iter().map(|bin| bin.norm()).collect());
        pos += hop_length;
    }

    Ok(frames)
}

/// Mean spectral contrast per octave band: the log ratio between the top and
/// bottom 20% of bin magnitudes inside each band, per frame, averaged.
fn spectral_contrast_means(frames: &[Vec<f32>], sample_rate: u32, n_fft: usize) -> Vec<f32> {
    let sr = sample_rate as f32;
    let edges: Vec<usize> = [0.0_f32, 100.0, 200.0, 400.0, 800.0, 1600.0, 3200.0, sr / 2.0]
        .iter()
        .map(|&freq| (freq * n_fft as f32 / sr).round() as usize)
        .collect();

    let mut sums = vec![0.0_f32; N_CONTRAST];
    for frame in frames {
        let num_bins = frame.len();
        for band in 0..N_CONTRAST {
            let start = edges[band].min(num_bins);
            let end = edges[band + 1].min(num_bins);
            if end <= start {
                continue;
            }

            let mut magnitudes: Vec<f32> = frame[start..end].to_vec();
            magnitudes
                .sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let n = magnitudes.len();
            let quantile = ((n as f32 * 0.2).ceil() as usize).clamp(1, n);

            let peak: f32 =
                magnitudes[n - quantile..].iter().sum::<f32>() / quantile as f32;
            let valley: f32 = magnitudes[..quantile].iter().sum::<f32>() / quantile as f32;
            sums[band] += ((peak + 1e-10) / (valley + 1e-10)).log10();
        }
    }

    let count = frames.len().max(1) as f32;
    sums.iter().map(|sum| sum / count).collect()
}

/// Angular mapping of the 12 pitch classes onto the three tonnetz circles:
/// fifths, minor thirds, major thirds (sin/cos each).
fn tonnetz_angles() -> [[f32; 6]; 12] {
    let mut angles = [[0.0_f32; 6]; 12];
    for (pc, row) in angles.iter_mut().enumerate() {
        let k = pc as f32;
        *row = [
            (k * 7.0 * PI / 6.0).sin(),
            (k * 7.0 * PI / 6.0).cos(),
            (k * 3.0 * PI / 6.0).sin(),
            (k * 3.0 * PI / 6.0).cos(),
            (k * 4.0 * PI / 6.0).sin(),
            (k * 4.0 * PI / 6.0).cos(),
        ];
    }
    angles
}

/// Mean 6-D tonal centroid across frames of a 12-bin chroma sequence.
fn tonnetz_means(chroma_frames: &[Vec<f32>]) -> Vec<f32> {
    let angles = tonnetz_angles();
    let mut sums = [0.0_f32; N_TONNETZ];

    for frame in chroma_frames {
        let total: f32 = frame.iter().sum::<f32>();
        let norm = if total > 1e-10 { total } else { 1.0 };
        for (pc, value) in frame.iter().enumerate().take(12) {
            let weight = value / norm;
            for d in 0..N_TONNETZ {
                sums[d] += weight * angles[pc][d];
            }
        }
    }

    let count = chroma_frames.len().max(1) as f32;
    sums.iter().map(|sum| sum / count).collect()
}
