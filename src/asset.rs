use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, SynthError};

/// Reference to the packaged code artifact a function executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    path: PathBuf,
}

impl Code {
    /// Reference a prebuilt archive on the local filesystem. The path is only
    /// resolved (and required to exist) at synthesis time.
    pub fn from_asset(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

/// Staging record tying a function's code parameters to its source archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CodeAsset {
    pub source: PathBuf,
    pub bucket_parameter: String,
    pub key_parameter: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StagedAsset {
    pub file_name: String,
    pub sha256: String,
}

/// Copy `source` into `outdir` under a content-addressed name.
pub(crate) fn stage(source: &Path, outdir: &Path) -> Result<StagedAsset> {
    if !source.is_file() {
        return Err(SynthError::AssetNotFound {
            path: source.to_path_buf(),
        });
    }

    let mut hasher = Sha256::new();
    io::copy(&mut File::open(source)?, &mut hasher)?;
    let sha256: String = hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect();

    let extension = source.extension().and_then(|e| e.to_str()).unwrap_or("zip");
    let file_name = format!("asset.{}.{}", sha256, extension);
    fs::copy(source, outdir.join(&file_name))?;

    debug!("Staged code asset {} as {}", source.display(), file_name);

    Ok(StagedAsset { file_name, sha256 })
}
