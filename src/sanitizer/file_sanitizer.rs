use crate::cleaner::{decode_lossy, DecodeMode, TextCleaner};
use crate::error::{classify_io, Result, XmlScrubError};
use crate::sanitizer::{FileOutcome, FileStatus};
use crate::validator::WellFormednessChecker;
use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Milestones reported while a single file moves through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeStep {
    Reading,
    Cleaned { chars_before: usize, chars_after: usize },
    Validating,
    Committing,
}

#[derive(Debug, Default)]
struct CharCounts {
    before: Option<usize>,
    after: Option<usize>,
}

/// Cleans one file at a time: read, strip, escape, write a sibling
/// temporary file, validate it, then rename it over the original or drop it.
pub struct FileSanitizer {
    cleaner: TextCleaner,
    checker: Box<dyn WellFormednessChecker>,
    decode_mode: DecodeMode,
    temp_suffix: String,
    dry_run: bool,
}

impl FileSanitizer {
    pub fn new(checker: Box<dyn WellFormednessChecker>) -> Result<Self> {
        Ok(Self {
            cleaner: TextCleaner::new()?,
            checker,
            decode_mode: DecodeMode::Ignore,
            temp_suffix: ".temp".to_string(),
            dry_run: false,
        })
    }

    pub fn with_decode_mode(mut self, mode: DecodeMode) -> Self {
        self.decode_mode = mode;
        self
    }

    pub fn with_temp_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.temp_suffix = suffix.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn checker_name(&self) -> &str {
        self.checker.name()
    }

    pub fn temp_path_for(&self, path: &Path) -> Result<PathBuf> {
        if path.file_name().is_none() {
            return Err(XmlScrubError::InvalidPath {
                path: format!("Not a file path: {}", path.display()),
            });
        }

        // an empty suffix would make the artifact the original itself
        if self.temp_suffix.is_empty() {
            return Err(XmlScrubError::InvalidPath {
                path: format!("Empty temporary suffix for {}", path.display()),
            });
        }

        let mut temp: OsString = path.as_os_str().to_owned();
        temp.push(&self.temp_suffix);
        let temp = PathBuf::from(temp);
        if temp == path {
            return Err(XmlScrubError::InvalidPath {
                path: format!("Temporary file would overwrite {}", path.display()),
            });
        }

        Ok(temp)
    }

    pub fn sanitize(&self, path: &Path) -> FileOutcome {
        self.sanitize_with_progress(path, None)
    }

    /// Never fails: anything that goes wrong is folded into the outcome.
    pub fn sanitize_with_progress(
        &self,
        path: &Path,
        progress_callback: Option<&dyn Fn(SanitizeStep)>,
    ) -> FileOutcome {
        let mut counts = CharCounts::default();

        let status = match self.try_sanitize(path, &mut counts, progress_callback) {
            Ok(status) => status,
            Err(e) => {
                warn!("Failed to process {}: {}", path.display(), e);
                FileStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        FileOutcome {
            path: path.to_path_buf(),
            status,
            chars_before: counts.before,
            chars_after: counts.after,
        }
    }

    fn try_sanitize(
        &self,
        path: &Path,
        counts: &mut CharCounts,
        progress_callback: Option<&dyn Fn(SanitizeStep)>,
    ) -> Result<FileStatus> {
        let notify = |step: SanitizeStep| {
            if let Some(callback) = progress_callback {
                callback(step);
            }
        };

        notify(SanitizeStep::Reading);
        let bytes = fs::read(path).map_err(|e| classify_io(e, path))?;
        let content = decode_lossy(&bytes, self.decode_mode);

        let cleaned = self.cleaner.clean_with_summary(&content);
        let chars_before = content.chars().count();
        let chars_after = cleaned.text.chars().count();
        counts.before = Some(chars_before);
        counts.after = Some(chars_after);

        debug!(
            "{}: removed {} control characters, escaped {} ampersands",
            path.display(),
            cleaned.removed_controls,
            cleaned.escaped_ampersands
        );
        notify(SanitizeStep::Cleaned {
            chars_before,
            chars_after,
        });

        let temp = TempArtifact::create(self.temp_path_for(path)?, cleaned.text.as_bytes())?;

        notify(SanitizeStep::Validating);
        if !self.checker.check(temp.path())? {
            info!(
                "{} rejected cleaned {}; original kept",
                self.checker.name(),
                path.display()
            );
            return Ok(FileStatus::StillInvalid);
        }

        if self.dry_run {
            return Ok(FileStatus::Verified);
        }

        notify(SanitizeStep::Committing);
        temp.commit(path)?;
        info!("Replaced {} with cleaned content", path.display());

        Ok(FileStatus::Cleaned)
    }
}

/// Sibling file holding cleaned content until it is either renamed over the
/// original or removed. Removal happens on drop unless committed.
struct TempArtifact {
    path: PathBuf,
    armed: bool,
}

impl TempArtifact {
    fn create(path: PathBuf, contents: &[u8]) -> Result<Self> {
        // armed before the first write so partial files are cleaned up too
        let artifact = Self { path, armed: true };

        let mut file = fs::File::create(&artifact.path).map_err(|e| classify_io(e, &artifact.path))?;
        file.write_all(contents)?;
        file.sync_all()?;

        Ok(artifact)
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn commit(mut self, target: &Path) -> Result<()> {
        if let Ok(metadata) = fs::metadata(target) {
            if let Err(e) = fs::set_permissions(&self.path, metadata.permissions()) {
                debug!("Could not copy permissions onto {}: {}", self.path.display(), e);
            }
        }

        fs::rename(&self.path, target).map_err(|e| XmlScrubError::CommitFailed {
            path: target.to_path_buf(),
            source: e,
        })?;

        self.armed = false;
        Ok(())
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Could not remove {}: {}", self.path.display(), e),
        }
    }
}
