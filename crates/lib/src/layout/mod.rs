//! Output layout writer.
//!
//! Copies collected artifacts into `lib/<platform>_<config>/` and
//! `tools/<platform>_<config>/`. Existing files are overwritten; two
//! dependencies producing the same file name simply race to the last copy.

mod types;

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

pub use types::*;

use crate::build::BuildConfig;
use crate::platform::Platform;

#[derive(Debug, Error)]
pub enum CopyError {
  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to copy: {0}")]
  Copy(#[source] std::io::Error),
}

impl OutputLayout {
  /// Copy every instruction into the canonical tree.
  ///
  /// Each file is independent: a failed copy is recorded and the rest still run.
  pub async fn write(&self, instructions: &[CopyInstruction], platform: Platform, config: BuildConfig) -> WriteReport {
    let mut report = WriteReport::default();

    for instruction in instructions {
      let destination = self.destination(instruction, platform, config);
      match copy_file(instruction, &destination).await {
        Ok(()) => {
          info!(
            kind = %instruction.kind,
            file = %instruction.file_name,
            destination = %destination.display(),
            "copied artifact"
          );
          report.copied.push(CopiedArtifact {
            source: instruction.source.clone(),
            destination,
          });
        }
        Err(error) => {
          warn!(source = %instruction.source.display(), error = %error, "copy failed");
          report.failed.push(CopyFailure {
            source: instruction.source.clone(),
            destination,
            error,
          });
        }
      }
    }

    report
  }
}

async fn copy_file(instruction: &CopyInstruction, destination: &std::path::Path) -> Result<(), CopyError> {
  if let Some(parent) = destination.parent() {
    tokio::fs::create_dir_all(parent)
      .await
      .map_err(|source| CopyError::CreateDir {
        path: parent.to_path_buf(),
        source,
      })?;
  }

  debug!(source = %instruction.source.display(), destination = %destination.display(), "copying");
  tokio::fs::copy(&instruction.source, destination)
    .await
    .map_err(CopyError::Copy)?;
  Ok(())
}
