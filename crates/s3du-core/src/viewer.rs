//! Viewer launcher.
//!
//! Writes an [`NcduExport`] to disk and runs the viewer on it as
//! `<program> [args...] -f <file>`, waiting for it to exit.

use std::io::{BufWriter, Write};
use std::path::Path;

use tokio::process::Command;
use tracing::{debug, info};

use crate::config::S3duConfig;
use crate::error::{S3duError, S3duResult};
use crate::export::NcduExport;

/// The external interactive viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    program: String,
    args: Vec<String>,
}

impl Viewer {
    /// Run `program` with no extra arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Parse a whitespace-separated command line such as `"ncdu --color off"`.
    pub fn from_command(command: &str) -> S3duResult<Self> {
        let mut words = command.split_whitespace();
        let program = words
            .next()
            .ok_or_else(|| S3duError::Config("viewer command is empty".to_owned()))?;
        Ok(Self::new(program).with_args(words))
    }

    /// Use the configured viewer command.
    pub fn from_config(config: &S3duConfig) -> S3duResult<Self> {
        Self::from_command(&config.viewer)
    }

    /// Arguments placed before `-f <file>`.
    #[must_use]
    pub fn with_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Write `export` and open it in the viewer.
    ///
    /// With `filename`, the export is written there and kept. Otherwise it
    /// goes to an `s3du_*` temporary file that is removed once the viewer
    /// exits, whether or not it succeeded.
    pub async fn show(&self, export: &NcduExport<'_>, filename: Option<&Path>) -> S3duResult<()> {
        if let Some(path) = filename {
            let file = std::fs::File::create(path).map_err(|e| S3duError::io(path, e))?;
            write_export(export, file, path)?;
            info!(path = %path.display(), "export written");
            return self.run(path).await;
        }

        let temp = tempfile::Builder::new()
            .prefix("s3du_")
            .suffix(".json")
            .tempfile()
            .map_err(|e| S3duError::io(std::env::temp_dir(), e))?;
        write_export(export, temp.as_file(), temp.path())?;

        let result = self.run(temp.path()).await;
        let path = temp.path().to_path_buf();
        let removed = temp.close().map_err(|e| S3duError::io(&path, e));
        debug!(path = %path.display(), "temporary export removed");
        result.and(removed)
    }

    /// Run the viewer on an existing export file and wait for it.
    pub async fn run(&self, path: &Path) -> S3duResult<()> {
        debug!(program = %self.program, args = ?self.args, path = %path.display(), "launching viewer");
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg("-f")
            .arg(path)
            .status()
            .await
            .map_err(|source| S3duError::ViewerLaunch {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(S3duError::ViewerExit {
                program: self.program.clone(),
                status,
            })
        }
    }
}

fn write_export<W: Write>(export: &NcduExport<'_>, out: W, path: &Path) -> S3duResult<()> {
    let mut out = BufWriter::new(out);
    export.write_to(&mut out).map_err(|err| match err {
        S3duError::Serialize(e) if e.is_io() => S3duError::io(path, e.into()),
        other => other,
    })?;
    out.flush().map_err(|e| S3duError::io(path, e))
}
