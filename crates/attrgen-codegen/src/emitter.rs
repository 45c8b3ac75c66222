//! Writes a generated project to disk, touching only changed files.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{CodegenError, Result};
use crate::generators::{GeneratedFile, GeneratedProject};

/// Files touched by one emit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    /// New or changed files, in project order.
    pub written: Vec<PathBuf>,
    /// Files whose content already matched.
    pub unchanged: Vec<PathBuf>,
    /// Previous contents archived before an overwrite.
    pub backups: Vec<PathBuf>,
}

impl EmitReport {
    pub fn is_noop(&self) -> bool {
        self.written.is_empty()
    }
}

/// The sibling path holding a replaced file's previous content.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Compare-then-write emitter for one output directory.
#[derive(Debug, Clone)]
pub struct OutputEmitter {
    root: PathBuf,
}

impl OutputEmitter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write every file of `project`. Unchanged files are not touched; a
    /// changed file's previous content is copied to `<file>.bak` first.
    pub fn emit(&self, project: &GeneratedProject) -> Result<EmitReport> {
        fs::create_dir_all(&self.root).map_err(|e| CodegenError::io(&self.root, e))?;

        let mut report = EmitReport::default();
        for file in &project.files {
            self.emit_file(file, &mut report)?;
        }

        info!(
            dir = %self.root.display(),
            written = report.written.len(),
            unchanged = report.unchanged.len(),
            "emitted generated files"
        );
        Ok(report)
    }

    fn emit_file(&self, file: &GeneratedFile, report: &mut EmitReport) -> Result<()> {
        let path = self.root.join(&file.path);

        let existing = match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => return Err(CodegenError::io(&path, err)),
        };

        if existing.as_deref() == Some(file.content.as_bytes()) {
            debug!(path = %path.display(), "unchanged");
            report.unchanged.push(path);
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| CodegenError::io(parent, e))?;
        }
        if let Some(previous) = existing {
            let backup = backup_path(&path);
            fs::write(&backup, previous).map_err(|e| CodegenError::io(&backup, e))?;
            debug!(backup = %backup.display(), "archived previous content");
            report.backups.push(backup);
        }

        fs::write(&path, &file.content).map_err(|e| CodegenError::io(&path, e))?;
        debug!(path = %path.display(), "written");
        report.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(files: &[(&str, &str)]) -> GeneratedProject {
        GeneratedProject {
            files: files
                .iter()
                .map(|(path, body)| GeneratedFile::new(*path, body))
                .collect(),
        }
    }

    #[test]
    fn test_creates_directory_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("generated");
        let emitter = OutputEmitter::new(&out);

        let report = emitter.emit(&project(&[("a.h", "int a;\n")])).unwrap();
        assert_eq!(report.written, [out.join("a.h")]);
        assert!(report.backups.is_empty());
        assert!(fs::read_to_string(out.join("a.h")).unwrap().ends_with("int a;\n"));
    }

    #[test]
    fn test_second_emit_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = OutputEmitter::new(dir.path());
        let files = project(&[("a.h", "int a;\n"), ("b.cpp", "int b;\n")]);

        emitter.emit(&files).unwrap();
        let report = emitter.emit(&files).unwrap();
        assert!(report.is_noop());
        assert_eq!(report.unchanged.len(), 2);
        assert!(!dir.path().join("a.h.bak").exists());
    }

    #[test]
    fn test_changed_file_is_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = OutputEmitter::new(dir.path());

        emitter.emit(&project(&[("a.h", "int a;\n")])).unwrap();
        let report = emitter.emit(&project(&[("a.h", "long a;\n")])).unwrap();

        let backup = dir.path().join("a.h.bak");
        assert_eq!(report.backups, [backup.clone()]);
        assert!(fs::read_to_string(&backup).unwrap().ends_with("int a;\n"));
        assert!(fs::read_to_string(dir.path().join("a.h"))
            .unwrap()
            .ends_with("long a;\n"));
    }

    #[test]
    fn test_non_utf8_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.h"), [0xff, 0xfe, 0x00]).unwrap();

        let emitter = OutputEmitter::new(dir.path());
        let report = emitter.emit(&project(&[("a.h", "int a;\n")])).unwrap();

        assert_eq!(report.written, [dir.path().join("a.h")]);
        assert_eq!(fs::read(dir.path().join("a.h.bak")).unwrap(), [0xff, 0xfe, 0x00]);
        assert!(fs::read_to_string(dir.path().join("a.h")).unwrap().ends_with("int a;\n"));
    }

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("out/SVGGetAttribute.cpp")),
            PathBuf::from("out/SVGGetAttribute.cpp.bak")
        );
    }
}
