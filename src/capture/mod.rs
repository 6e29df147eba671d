//! 鼻紋・顔写真の読み込み
//!
//! 引数に渡されたファイル・フォルダから画像を集め、アップロード用に
//! 正規化する。

mod encode;

pub use encode::{encode_image, prepare_uploads, ImageUpload};

use crate::error::{AdminError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// フォルダ直下の画像をファイル名順に返す
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.exists() {
        return Err(AdminError::FileNotFound(folder.display().to_string()));
    }

    let mut images: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_image_path(p))
        .collect();

    images.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
    Ok(images)
}

/// ファイル・フォルダ混在の引数を画像パスの一覧に展開する
pub fn collect_images(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for input in inputs {
        if input.is_dir() {
            images.extend(scan_folder(input)?);
        } else if input.is_file() {
            if !is_image_path(input) {
                return Err(AdminError::ImageLoad(format!(
                    "{} is not a JPEG or PNG file",
                    input.display()
                )));
            }
            images.push(input.clone());
        } else {
            return Err(AdminError::FileNotFound(input.display().to_string()));
        }
    }

    if images.is_empty() {
        let joined = inputs
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(AdminError::NoImagesFound(joined));
    }

    Ok(images)
}
