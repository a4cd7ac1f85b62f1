//! Scorer seam.
//!
//! Scoring is an external concern; the coordinator only depends on the
//! [`Scorer`] trait and persists whatever opaque JSON value comes back.
//! [`PixelStatScorer`] is the built-in default used when no external
//! scorer is wired in.

use async_trait::async_trait;
use swapbench_core::ScoreError;

/// Evaluates one stored artifact and yields an opaque, serializable
/// score. A scorer failure is fatal to that item only.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn evaluate(
        &self,
        artifact_uri: &str,
        png: &[u8],
    ) -> Result<serde_json::Value, ScoreError>;
}

/// Default scorer: decodes the artifact and reports basic pixel
/// statistics. Placeholder artifacts decode fine, so generation
/// failures still score.
pub struct PixelStatScorer;

#[async_trait]
impl Scorer for PixelStatScorer {
    async fn evaluate(
        &self,
        artifact_uri: &str,
        png: &[u8],
    ) -> Result<serde_json::Value, ScoreError> {
        let img = image::load_from_memory(png)
            .map_err(|e| ScoreError::Rejected(format!("artifact does not decode: {e}")))?
            .to_rgb8();

        let pixel_count = (img.width() as u64 * img.height() as u64).max(1);
        let luminance_sum: u64 = img
            .pixels()
            .map(|p| {
                // Integer Rec. 601 luma approximation.
                (299 * p.0[0] as u64 + 587 * p.0[1] as u64 + 114 * p.0[2] as u64) / 1000
            })
            .sum();

        tracing::debug!(artifact_uri, "Scored artifact with pixel statistics");

        Ok(serde_json::json!({
            "width": img.width(),
            "height": img.height(),
            "mean_luminance": luminance_sum as f64 / pixel_count as f64,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn solid_png(r: u8, g: u8, b: u8) -> Vec<u8> {
        let img = RgbImage::from_pixel(4, 4, Rgb([r, g, b]));
        let mut png = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        png
    }

    #[tokio::test]
    async fn scores_a_valid_png() {
        let score = PixelStatScorer
            .evaluate("/runs/1/t/c.png", &solid_png(255, 255, 255))
            .await
            .unwrap();
        assert_eq!(score["width"], 4);
        assert_eq!(score["height"], 4);
        assert!(score["mean_luminance"].as_f64().unwrap() > 250.0);
    }

    #[tokio::test]
    async fn black_image_scores_zero_luminance() {
        let score = PixelStatScorer
            .evaluate("/runs/1/t/c.png", &solid_png(0, 0, 0))
            .await
            .unwrap();
        assert_eq!(score["mean_luminance"].as_f64().unwrap(), 0.0);
    }

    #[tokio::test]
    async fn undecodable_artifact_is_rejected() {
        let err = PixelStatScorer
            .evaluate("/runs/1/t/c.png", b"not a png")
            .await
            .unwrap_err();
        assert!(matches!(err, ScoreError::Rejected(_)));
    }
}
