//! Filesystem layout for baked artifacts.
//!
//! Every image-producing stage writes under `{root}/{base_name}/`, where
//! `base_name` is the input file name without its extension. Face files
//! are named `{prefix}{face}{ext}` with the face names `px`, `nx`, `py`,
//! `ny`, `pz`, `nz`.

use std::path::{Path, PathBuf};

use corona_cubemap::{Cubemap, Face, Image, OutputFormat, encode};

use crate::config::BakeConfig;
use crate::error::BakeError;

/// Input file name without directory or extension, used as the artifact
/// directory name.
pub fn base_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cubemap".to_string())
}

/// Create a directory and its parents.
pub fn ensure_dir(path: &Path) -> Result<(), BakeError> {
    std::fs::create_dir_all(path).map_err(|source| BakeError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Create and return the artifact directory `{root}/{base_name}`.
pub fn asset_dir(root: &Path, base_name: &str) -> Result<PathBuf, BakeError> {
    let dir = root.join(base_name);
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Write the six faces of a cubemap into `dir` as `{prefix}{face}{ext}`.
pub fn write_faces(
    dir: &Path,
    prefix: &str,
    cm: &Cubemap,
    config: &BakeConfig,
) -> Result<(), BakeError> {
    for face in Face::ALL {
        let name = format!("{prefix}{}{}", face.name(), config.format.extension());
        encode(
            &dir.join(name),
            &cm.face_image(face),
            config.format,
            config.compression.as_deref(),
        )?;
    }
    Ok(())
}

/// Write the full horizontal cross of a cubemap as a single PNG, used
/// for the debug visualizations.
pub fn write_cross_debug(path: &Path, cm: &Cubemap) -> Result<(), BakeError> {
    write_cross(path, cm.image(), OutputFormat::Png, None)
}

/// Write a cross (or any backing image) with an explicit format.
pub fn write_cross(
    path: &Path,
    img: &Image,
    format: OutputFormat,
    compression: Option<&str>,
) -> Result<(), BakeError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }
    encode(path, img, format, compression)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use corona_cubemap::Cubemap;

    #[test]
    fn test_base_name_strips_extension() {
        assert_eq!(base_name(Path::new("env/studio.hdr")), "studio");
        assert_eq!(base_name(Path::new("pano.exr")), "pano");
        assert_eq!(base_name(Path::new("noext")), "noext");
    }

    #[test]
    fn test_write_faces_names_and_count() {
        let dir = tempfile::tempdir().unwrap();
        let cm = Cubemap::new(4);
        let config = BakeConfig::new();
        write_faces(dir.path(), "m0_", &cm, &config).unwrap();
        for face in ["px", "nx", "py", "ny", "pz", "nz"] {
            let path = dir.path().join(format!("m0_{face}.png"));
            assert!(path.exists(), "missing {}", path.display());
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 6);
    }

    #[test]
    fn test_asset_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let out = asset_dir(&dir.path().join("a/b"), "studio").unwrap();
        assert!(out.is_dir());
        assert!(out.ends_with("a/b/studio"));
    }
}
