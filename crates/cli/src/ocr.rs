//! OCR through the system `tesseract` binary.

use std::process::Command;

use image::{imageops, RgbImage};
use plantilla_core::error::{ParseError, Result};
use plantilla_core::geometry::PixelRect;
use plantilla_core::source::OcrEngine;

/// [`OcrEngine`] backed by a `tesseract` subprocess.
///
/// Each region is cropped out of the page raster, written to a temporary
/// PNG and recognized with `tesseract <png> stdout`.
pub struct TesseractOcr {
    /// Passed to tesseract as `-l <lang>` when set.
    lang: Option<String>,
}

impl TesseractOcr {
    pub fn new() -> Self {
        TesseractOcr { lang: None }
    }

    pub fn with_lang(lang: &str) -> Self {
        TesseractOcr {
            lang: Some(lang.to_string()),
        }
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        TesseractOcr::new()
    }
}

impl OcrEngine for TesseractOcr {
    fn read_region(&self, image: &RgbImage, region: PixelRect) -> Result<String> {
        let crop = imageops::crop_imm(
            image,
            region.x_min,
            region.y_min,
            region.width(),
            region.height(),
        )
        .to_image();

        let tmp = tempfile::Builder::new()
            .prefix("plantilla-ocr-")
            .suffix(".png")
            .tempfile()?;
        crop.save(tmp.path())?;

        let mut command = Command::new("tesseract");
        command.arg(tmp.path()).arg("stdout");
        if let Some(lang) = &self.lang {
            command.arg("-l").arg(lang);
        }
        let output = command.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ParseError::OcrUnavailable
            } else {
                ParseError::Ocr(format!("tesseract failed to start: {e}"))
            }
        })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ParseError::Ocr(format!(
                "tesseract exited with {code}: {}",
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn is_available(&self) -> bool {
        Command::new("tesseract")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}
