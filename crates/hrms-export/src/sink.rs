use crate::artifact::ExportArtifact;
use crate::errors::{ExportError, ExportResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Receives finished artifacts; stands in for the browser download
pub trait ArtifactSink {
    fn deliver(&mut self, artifact: &ExportArtifact) -> ExportResult<()>;
}

/// Writes artifacts as files into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where an artifact with `filename` would land
    pub fn path_for(&self, filename: &str) -> ExportResult<PathBuf> {
        validate_filename(filename)?;
        Ok(self.dir.join(filename))
    }
}

impl ArtifactSink for DirectorySink {
    fn deliver(&mut self, artifact: &ExportArtifact) -> ExportResult<()> {
        let path = self.path_for(&artifact.filename)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, &artifact.bytes)?;

        info!(
            path = %path.display(),
            bytes = artifact.bytes.len(),
            mime_type = artifact.mime_type,
            "wrote export artifact"
        );
        Ok(())
    }
}

/// Keeps delivered artifacts in memory
impl ArtifactSink for Vec<ExportArtifact> {
    fn deliver(&mut self, artifact: &ExportArtifact) -> ExportResult<()> {
        self.push(artifact.clone());
        Ok(())
    }
}

fn validate_filename(filename: &str) -> ExportResult<()> {
    if filename.is_empty() {
        return Err(ExportError::InvalidFilename(
            "filename is empty".to_string(),
        ));
    }
    if filename.contains(['/', '\\']) || filename == "." || filename == ".." {
        return Err(ExportError::InvalidFilename(format!(
            "'{}' must be a plain file name",
            filename
        )));
    }
    Ok(())
}
