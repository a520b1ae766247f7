//! Denoising collaborator seam.
//!
//! The renderer hands three equally sized float RGB planes (noisy
//! color, average albedo, average normal) to a [`Denoiser`] and uses the
//! returned color plane. Failures are non-fatal: the caller logs a
//! warning and keeps the noisy buffer.

use thiserror::Error;

/// Errors from a denoising backend.
#[derive(Debug, Error)]
pub enum DenoiseError {
    #[error("buffer size mismatch: expected {expected} floats, got {got}")]
    BufferSize { expected: usize, got: usize },

    #[error("denoiser device error: {0}")]
    Device(String),
}

/// A denoising backend consuming color/albedo/normal planes.
pub trait Denoiser {
    /// Denoise `color` guided by `albedo` and `normal`.
    ///
    /// All planes are row-major `width * height * 3` f32 RGB.
    fn denoise(
        &self,
        color: &[f32],
        albedo: &[f32],
        normal: &[f32],
        width: u32,
        height: u32,
    ) -> Result<Vec<f32>, DenoiseError>;
}

/// Identity backend: returns the color plane untouched.
///
/// Stands in where no external denoising library is linked.
pub struct Passthrough;

impl Denoiser for Passthrough {
    fn denoise(
        &self,
        color: &[f32],
        albedo: &[f32],
        normal: &[f32],
        width: u32,
        height: u32,
    ) -> Result<Vec<f32>, DenoiseError> {
        let expected = (width * height * 3) as usize;
        for plane in [color, albedo, normal] {
            if plane.len() != expected {
                return Err(DenoiseError::BufferSize {
                    expected,
                    got: plane.len(),
                });
            }
        }
        Ok(color.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_identity() {
        let color = vec![0.5f32; 2 * 2 * 3];
        let albedo = vec![0.1f32; 2 * 2 * 3];
        let normal = vec![0.0f32; 2 * 2 * 3];

        let out = Passthrough.denoise(&color, &albedo, &normal, 2, 2).unwrap();
        assert_eq!(out, color);
    }

    #[test]
    fn test_passthrough_size_mismatch() {
        let color = vec![0.5f32; 5];
        let rest = vec![0.0f32; 2 * 2 * 3];

        assert!(matches!(
            Passthrough.denoise(&color, &rest, &rest, 2, 2),
            Err(DenoiseError::BufferSize { .. })
        ));
    }
}
