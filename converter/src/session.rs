//! @ai:module:intent Drive conversion over tree files: discovery, per-file transaction, cancellation, progress
//! @ai:module:layer application
//! @ai:module:public_api discover, load_source, convert_paths, scan_paths, CancellationToken, ProgressSink, LogProgress, ConversionSummary, FileOutcome, FileStatus, ScanEntry
//! @ai:module:depends_on walker, render, config, error

use crate::config::{ConverterConfig, FileConfig};
use crate::error::{Error, Result};
use crate::render;
use crate::tree::SourceFile;
use crate::walker::{self, ConversionReport, LegacyUse};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use walkdir::WalkDir;

/// @ai:intent Shared flag a host sets to stop a run between files
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// @ai:intent Fail with Error::Cancelled once cancellation was requested
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// @ai:intent Receives one call per file before it is converted
pub trait ProgressSink {
    /// `index` counts from zero; the fraction done is `index / total`.
    fn progress(&self, index: usize, total: usize, path: &Path);
}

/// @ai:intent Progress sink writing to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn progress(&self, index: usize, total: usize, path: &Path) {
        let fraction = if total == 0 { 1.0 } else { index as f64 / total as f64 };
        tracing::info!(
            "[{}/{}] {:>3.0}% {}",
            index + 1,
            total,
            fraction * 100.0,
            path.display()
        );
    }
}

/// @ai:intent Result of one file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Converted { report: ConversionReport },
    Unchanged,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
}

/// @ai:intent Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversionSummary {
    pub files: Vec<FileOutcome>,
    pub converted: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub dry_run: bool,
}

impl ConversionSummary {
    /// @ai:intent True when no file was aborted
    pub fn passed(&self) -> bool {
        self.failed == 0
    }

    pub fn record(&mut self, path: &Path, status: FileStatus) {
        match &status {
            FileStatus::Converted { .. } => self.converted += 1,
            FileStatus::Unchanged => self.unchanged += 1,
            FileStatus::Failed { .. } => self.failed += 1,
        }
        self.files.push(FileOutcome {
            path: path.to_path_buf(),
            status,
        });
    }

    /// @ai:intent Markers left across all converted files
    pub fn marker_count(&self) -> usize {
        self.files
            .iter()
            .map(|f| match &f.status {
                FileStatus::Converted { report } => report.markers.len(),
                _ => 0,
            })
            .sum()
    }
}

/// @ai:intent Legacy annotations found in one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanEntry {
    pub path: PathBuf,
    pub uses: Vec<LegacyUse>,
}

/// @ai:intent Tree files under a path, in a stable order
/// @ai:pre path exists
/// @ai:effects fs:read
pub fn discover(path: &Path, files: &FileConfig) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if !files.matches(path) {
            return Err(Error::UnsupportedFileType(path.display().to_string()));
        }
        return Ok(vec![path.to_path_buf()]);
    }

    let mut found: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| files.matches(p))
        .collect();
    found.sort();
    Ok(found)
}

/// @ai:intent Read and parse one tree file
/// @ai:effects fs:read
pub fn load_source(path: &Path) -> Result<SourceFile> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// @ai:intent Where the converted tree of `path` is written
/// @ai:example ("api/UserResource.json", in_place = false) -> "api/UserResource.openapi.json"
/// @ai:effects pure
pub fn output_path(path: &Path, files: &FileConfig) -> PathBuf {
    if files.in_place {
        return path.to_path_buf();
    }
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    path.with_file_name(format!("{}{}.{}", stem, files.output_suffix, files.extension))
}

/// @ai:intent Convert every file, each inside its own all-or-nothing transaction
/// @ai:post an aborted file is left as it was on disk and recorded as failed
/// @ai:effects fs:read, fs:write
pub fn convert_paths(
    paths: &[PathBuf],
    config: &ConverterConfig,
    dry_run: bool,
    cancel: &CancellationToken,
    progress: &dyn ProgressSink,
) -> ConversionSummary {
    let mut summary = ConversionSummary {
        dry_run,
        ..Default::default()
    };

    for (index, path) in paths.iter().enumerate() {
        if let Err(e) = cancel.check() {
            tracing::warn!("{}; {} file(s) not visited", e, paths.len() - index);
            summary.cancelled = true;
            break;
        }
        progress.progress(index, paths.len(), path);

        let status = match convert_one(path, config, dry_run) {
            Ok(status) => status,
            Err(e) => {
                tracing::error!("{}: {}", path.display(), e);
                FileStatus::Failed {
                    error: e.to_string(),
                }
            }
        };
        summary.record(path, status);
    }

    summary
}

fn convert_one(path: &Path, config: &ConverterConfig, dry_run: bool) -> Result<FileStatus> {
    // the file on disk is only replaced once the whole unit converted
    let mut working = load_source(path)?;
    let report = walker::convert_file(&mut working, config)?;
    if report.is_noop() {
        tracing::debug!("{}: nothing to convert", path.display());
        return Ok(FileStatus::Unchanged);
    }

    if !dry_run {
        commit(path, &working, &config.files)?;
    }
    tracing::info!(
        "{}: converted {} annotation(s), {} marker(s)",
        path.display(),
        report.converted,
        report.markers.len()
    );
    Ok(FileStatus::Converted { report })
}

fn commit(path: &Path, converted: &SourceFile, files: &FileConfig) -> Result<()> {
    let target = output_path(path, files);
    std::fs::write(&target, serde_json::to_string_pretty(converted)?)?;
    if files.emit_java {
        std::fs::write(target.with_extension("java"), render::render_unit(&converted.unit))?;
    }
    Ok(())
}

/// @ai:intent List legacy annotations left in each file; files with none are skipped
/// @ai:effects fs:read
pub fn scan_paths(paths: &[PathBuf]) -> Result<Vec<ScanEntry>> {
    let mut entries = Vec::new();
    for path in paths {
        let source = load_source(path)?;
        let uses = walker::scan_unit(&source.unit);
        if !uses.is_empty() {
            entries.push(ScanEntry {
                path: path.clone(),
                uses,
            });
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Annotation, ClassDecl, CompilationUnit, Import, MethodDecl, TypeRef, Value};
    use crate::vocabulary::{legacy, openapi};
    use std::cell::RefCell;
    use tempfile::TempDir;

    fn write_tree(dir: &Path, name: &str, operation: Annotation) -> PathBuf {
        let source = SourceFile {
            unit: CompilationUnit {
                package: Some("com.acme".to_string()),
                imports: vec![Import::single(legacy::API_OPERATION)],
                types: vec![ClassDecl::new("UserResource").with_method(
                    MethodDecl::new("get", TypeRef::named("com.acme.User")).with_annotation(operation),
                )],
            },
            types: Vec::new(),
        };
        let path = dir.join(name);
        std::fs::write(&path, serde_json::to_string(&source).unwrap()).unwrap();
        path
    }

    fn valid() -> Annotation {
        Annotation::new(legacy::API_OPERATION).with_value(Value::string("Get"))
    }

    fn invalid() -> Annotation {
        Annotation::new(legacy::API_OPERATION).with("httpMethod", Value::string("GET"))
    }

    #[derive(Default)]
    struct Recorder(RefCell<Vec<(usize, usize)>>);

    impl ProgressSink for Recorder {
        fn progress(&self, index: usize, total: usize, _path: &Path) {
            self.0.borrow_mut().push((index, total));
        }
    }

    #[test]
    fn test_discover_filters_by_extension() {
        let dir = TempDir::new().unwrap();
        write_tree(dir.path(), "b.json", valid());
        write_tree(dir.path(), "a.json", valid());
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let found = discover(dir.path(), &FileConfig::default()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);

        assert!(matches!(
            discover(&dir.path().join("notes.txt"), &FileConfig::default()),
            Err(Error::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn test_failed_file_is_left_untouched() {
        let dir = TempDir::new().unwrap();
        let good = write_tree(dir.path(), "good.json", valid());
        let bad = write_tree(dir.path(), "bad.json", invalid());
        let bad_before = std::fs::read_to_string(&bad).unwrap();
        let recorder = Recorder::default();

        let summary = convert_paths(
            &[good.clone(), bad.clone()],
            &ConverterConfig::default(),
            false,
            &CancellationToken::new(),
            &recorder,
        );

        assert_eq!(summary.converted, 1);
        assert_eq!(summary.failed, 1);
        assert!(!summary.passed());
        assert_eq!(std::fs::read_to_string(&bad).unwrap(), bad_before);
        assert_eq!(*recorder.0.borrow(), vec![(0, 2), (1, 2)]);

        let converted = load_source(&good).unwrap();
        let method = converted.unit.types[0].methods().next().unwrap();
        assert!(method.modifiers.has_annotation(openapi::OPERATION));
        assert_eq!(converted.unit.imports, vec![Import::single(openapi::OPERATION)]);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = write_tree(dir.path(), "r.json", valid());
        let before = std::fs::read_to_string(&path).unwrap();

        let summary = convert_paths(
            &[path.clone()],
            &ConverterConfig::default(),
            true,
            &CancellationToken::new(),
            &LogProgress,
        );

        assert_eq!(summary.converted, 1);
        assert!(summary.dry_run);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_cancelled_run_visits_nothing() {
        let dir = TempDir::new().unwrap();
        let path = write_tree(dir.path(), "r.json", valid());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let summary = convert_paths(&[path], &ConverterConfig::default(), false, &cancel, &LogProgress);

        assert!(summary.cancelled);
        assert!(summary.files.is_empty());
    }

    #[test]
    fn test_separate_output_with_java() {
        let dir = TempDir::new().unwrap();
        let path = write_tree(dir.path(), "UserResource.json", valid());
        let mut config = ConverterConfig::default();
        config.files.in_place = false;
        config.files.emit_java = true;

        convert_paths(&[path.clone()], &config, false, &CancellationToken::new(), &LogProgress);

        let target = dir.path().join("UserResource.openapi.json");
        assert_eq!(output_path(&path, &config.files), target);
        assert!(target.exists());
        let java = std::fs::read_to_string(dir.path().join("UserResource.openapi.java")).unwrap();
        assert!(java.contains("import io.swagger.v3.oas.annotations.Operation;"));
        assert!(java.contains("@Operation(summary = \"Get\")"));
        assert_eq!(load_source(&path).unwrap().unit.imports[0].name, legacy::API_OPERATION);
    }

    #[test]
    fn test_scan_lists_remaining_annotations() {
        let dir = TempDir::new().unwrap();
        let path = write_tree(dir.path(), "r.json", valid());

        let entries = scan_paths(&[path]).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].uses[0].declaration, "UserResource.get");
        assert_eq!(entries[0].uses[0].annotation, "ApiOperation");
    }
}
