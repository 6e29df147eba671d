use crate::error::{AdminError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// アップロード用に正規化した画像
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// 元ファイル名（拡張子は .jpg に置換）
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub sha256: String,
}

impl ImageUpload {
    pub fn short_digest(&self) -> &str {
        &self.sha256[..12.min(self.sha256.len())]
    }
}

/// デコード → 長辺を max_size 以下に縮小 → JPEG再エンコード
pub fn encode_image(path: &Path, max_size: u32, quality: u8) -> Result<ImageUpload> {
    let image = image::open(path)
        .map_err(|e| AdminError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    let resized = if image.width() > max_size || image.height() > max_size {
        image.resize(max_size, max_size, FilterType::Lanczos3)
    } else {
        image
    };

    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    DynamicImage::ImageRgb8(resized.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| AdminError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    let sha256 = hex::encode(Sha256::digest(&bytes));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());

    Ok(ImageUpload {
        file_name: format!("{}.jpg", stem),
        bytes,
        sha256,
    })
}

/// 複数画像を並列に正規化する（入力順を保つ）
pub fn prepare_uploads(paths: &[PathBuf], max_size: u32, quality: u8) -> Result<Vec<ImageUpload>> {
    let uploads = paths
        .par_iter()
        .map(|path| encode_image(path, max_size, quality))
        .collect::<Result<Vec<_>>>()?;

    for upload in &uploads {
        tracing::debug!(
            file = %upload.file_name,
            bytes = upload.bytes.len(),
            sha256 = %upload.short_digest(),
            "prepared upload"
        );
    }

    Ok(uploads)
}
