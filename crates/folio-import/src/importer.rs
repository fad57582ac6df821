//! Chapter import pipeline.
//!
//! One import converts a source document into
//! `<content_dir>/<group_href>/<id>/`, registers `/<id>` under the chapters
//! group of the route manifest, and optionally rebuilds the site. Steps run
//! in order and the first failure aborts; nothing already written is rolled
//! back.

use std::path::{Path, PathBuf};

use folio_routes::{ManifestError, ManifestStore, join_href};

use crate::command::{ConvertError, DocumentConverter, SiteRebuilder};
use crate::title::{chapter_id, derive_title};

/// Import error.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Batch import directory does not exist.
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    /// Source document does not exist.
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// Chapter title is empty or whitespace.
    #[error("Empty chapter title for {}", .0.display())]
    EmptyTitle(PathBuf),
    /// Source file name yields no chapter identifier.
    #[error("Cannot derive a chapter id from {}", .0.display())]
    InvalidSourceName(PathBuf),
    /// Filesystem error outside the converter.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Conversion failed.
    #[error(transparent)]
    Convert(#[from] ConvertError),
    /// Rebuild after a successful import failed.
    #[error("Site rebuild failed: {0}")]
    Rebuild(#[source] ConvertError),
    /// Route manifest could not be updated.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Where and how chapters are imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Content store root.
    pub content_dir: PathBuf,
    /// Title of the manifest group holding chapters.
    pub group_title: String,
    /// Href of that group; also the content subdirectory.
    pub group_href: String,
    /// Source extension without the dot, matched case-insensitively.
    pub extension: String,
    /// File the converter must produce in the chapter directory.
    pub index_file: String,
}

/// Result of importing one chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Chapter identifier (source file stem).
    pub id: String,
    /// Display title.
    pub title: String,
    /// Imported source file.
    pub source: PathBuf,
    /// Href of the entry under the chapters group (`/<id>`).
    pub href: String,
    /// Effective page href (group href joined with `href`).
    pub page_href: String,
    /// Directory the converter wrote to.
    pub output_dir: PathBuf,
    /// False when the manifest already had a chapter with this href.
    pub inserted: bool,
}

/// Progress notifications from [`ChapterImporter::import_all`].
#[derive(Debug)]
pub enum ImportEvent<'a> {
    /// Directory scanned.
    Discovered { dir: &'a Path, count: usize },
    /// About to import a file.
    Started { source: &'a Path, title: &'a str },
    /// File imported.
    Imported(&'a ImportOutcome),
    /// File failed; the batch continues.
    Failed {
        source: &'a Path,
        error: &'a ImportError,
    },
}

/// Tally of a batch import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Files imported successfully.
    pub success_count: usize,
    /// Files that failed.
    pub fail_count: usize,
    /// Failed files with their error messages, in processing order.
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchReport {
    /// True if no file failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.fail_count == 0
    }

    /// Number of files processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.success_count + self.fail_count
    }
}

/// Ensure the chapters group exists and add `title`/`href` under it.
///
/// Returns `false` if the group already holds `href`.
///
/// # Errors
///
/// Returns [`ManifestError`] if the manifest cannot be persisted.
pub fn register_chapter(
    manifest: &mut ManifestStore,
    options: &ImportOptions,
    title: &str,
    href: &str,
) -> Result<bool, ManifestError> {
    manifest.ensure_group(&options.group_title, &options.group_href, true)?;
    manifest.add_child(&options.group_title, title, href)
}

/// Imports chapters into the content directory and route manifest.
pub struct ChapterImporter {
    converter: Box<dyn DocumentConverter>,
    rebuilder: Option<Box<dyn SiteRebuilder>>,
    manifest: ManifestStore,
    options: ImportOptions,
}

impl ChapterImporter {
    /// Create an importer without a rebuild step.
    #[must_use]
    pub fn new(
        converter: Box<dyn DocumentConverter>,
        manifest: ManifestStore,
        options: ImportOptions,
    ) -> Self {
        Self {
            converter,
            rebuilder: None,
            manifest,
            options,
        }
    }

    /// Rebuild the site after every successful import.
    #[must_use]
    pub fn with_rebuilder(mut self, rebuilder: Box<dyn SiteRebuilder>) -> Self {
        self.rebuilder = Some(rebuilder);
        self
    }

    /// Route manifest being updated.
    #[must_use]
    pub fn manifest(&self) -> &ManifestStore {
        &self.manifest
    }

    /// Import options.
    #[must_use]
    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Content directory for chapter `id`.
    #[must_use]
    pub fn output_dir(&self, id: &str) -> PathBuf {
        let mut dir = self.options.content_dir.clone();
        dir.extend(self.options.group_href.split('/').filter(|s| !s.is_empty()));
        dir.push(id);
        dir
    }

    /// Import a single chapter.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error: missing source, blank title,
    /// conversion, missing converter output, manifest update, or rebuild.
    pub fn import_chapter(&mut self, source: &Path, title: &str) -> Result<ImportOutcome, ImportError> {
        if !source.is_file() {
            return Err(ImportError::SourceNotFound(source.to_path_buf()));
        }
        if title.trim().is_empty() {
            return Err(ImportError::EmptyTitle(source.to_path_buf()));
        }
        let id = chapter_id(source)
            .ok_or_else(|| ImportError::InvalidSourceName(source.to_path_buf()))?
            .to_owned();

        let output_dir = self.output_dir(&id);
        std::fs::create_dir_all(&output_dir).map_err(|source| ImportError::Io {
            path: output_dir.clone(),
            source,
        })?;

        tracing::info!(source = %source.display(), output = %output_dir.display(), "Converting chapter");
        self.converter.convert(source, &output_dir)?;

        let index = output_dir.join(&self.options.index_file);
        if !index.is_file() {
            return Err(ConvertError::MissingOutput(index).into());
        }

        let href = format!("/{id}");
        let inserted = register_chapter(&mut self.manifest, &self.options, title, &href)?;
        if !inserted {
            tracing::info!(href = %href, "Chapter already registered, manifest unchanged");
        }

        if let Some(rebuilder) = &self.rebuilder {
            tracing::info!("Rebuilding site");
            rebuilder.rebuild().map_err(ImportError::Rebuild)?;
        }

        Ok(ImportOutcome {
            page_href: join_href(&self.options.group_href, &href),
            id,
            title: title.to_owned(),
            source: source.to_path_buf(),
            href,
            output_dir,
            inserted,
        })
    }

    /// Source files in `dir` with the configured extension, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::DirectoryNotFound`] if `dir` is not a directory,
    /// or [`ImportError::Io`] if it cannot be listed.
    pub fn source_files(&self, dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
        if !dir.is_dir() {
            return Err(ImportError::DirectoryNotFound(dir.to_path_buf()));
        }
        let io_error = |source| ImportError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.options.extension));
            if matches && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Import every source file in `dir`, one at a time.
    ///
    /// Titles are derived from file names. Per-file failures are counted
    /// and reported through `on_event`; they do not stop the batch.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::DirectoryNotFound`] if `dir` does not exist, or
    /// [`ImportError::Io`] if it cannot be listed.
    pub fn import_all(
        &mut self,
        dir: &Path,
        mut on_event: impl FnMut(&ImportEvent<'_>),
    ) -> Result<BatchReport, ImportError> {
        let files = self.source_files(dir)?;
        on_event(&ImportEvent::Discovered {
            dir,
            count: files.len(),
        });

        let mut report = BatchReport::default();
        for source in &files {
            let file_name = source
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let title = derive_title(&file_name);
            on_event(&ImportEvent::Started {
                source,
                title: &title,
            });

            match self.import_chapter(source, &title) {
                Ok(outcome) => {
                    report.success_count += 1;
                    on_event(&ImportEvent::Imported(&outcome));
                }
                Err(error) => {
                    tracing::warn!(source = %source.display(), error = %error, "Chapter import failed");
                    report.fail_count += 1;
                    on_event(&ImportEvent::Failed {
                        source,
                        error: &error,
                    });
                    report.failures.push((source.clone(), error.to_string()));
                }
            }
        }

        tracing::info!(
            dir = %dir.display(),
            succeeded = report.success_count,
            failed = report.fail_count,
            "Batch import finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use folio_routes::{MemoryManifestBackend, RouteEntry};
    use pretty_assertions::assert_eq;

    use super::*;

    static_assertions::assert_impl_all!(ImportError: Send, Sync, std::error::Error);
    static_assertions::assert_impl_all!(ChapterImporter: Send, Sync);

    /// Writes `index.mdx` unless the source stem is listed as failing.
    #[derive(Clone, Default)]
    struct FakeConverter {
        calls: Arc<Mutex<Vec<(PathBuf, PathBuf)>>>,
        failing: HashSet<String>,
        skip_output: bool,
    }

    impl FakeConverter {
        fn failing_on(stem: &str) -> Self {
            Self {
                failing: HashSet::from([stem.to_owned()]),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl DocumentConverter for FakeConverter {
        fn convert(&self, source: &Path, output_dir: &Path) -> Result<(), ConvertError> {
            self.calls
                .lock()
                .unwrap()
                .push((source.to_path_buf(), output_dir.to_path_buf()));
            let stem = source.file_stem().unwrap().to_str().unwrap();
            if self.failing.contains(stem) {
                return Err(ConvertError::Spawn {
                    program: "fake".to_owned(),
                    source: std::io::Error::other("conversion failed"),
                });
            }
            if !self.skip_output {
                std::fs::write(output_dir.join("index.mdx"), format!("# {stem}\n")).unwrap();
            }
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct FakeRebuilder {
        runs: Arc<AtomicUsize>,
    }

    impl SiteRebuilder for FakeRebuilder {
        fn rebuild(&self) -> Result<(), ConvertError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn options(content_dir: &Path) -> ImportOptions {
        ImportOptions {
            content_dir: content_dir.to_path_buf(),
            group_title: "Chapters".to_owned(),
            group_href: "/chapters".to_owned(),
            extension: "tex".to_owned(),
            index_file: "index.mdx".to_owned(),
        }
    }

    fn create_importer(content_dir: &Path, converter: FakeConverter) -> ChapterImporter {
        let manifest = ManifestStore::open(Box::new(MemoryManifestBackend::new())).unwrap();
        ChapterImporter::new(Box::new(converter), manifest, options(content_dir))
    }

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, "\\chapter{X}").unwrap();
        path
    }

    fn chapter_titles(importer: &ChapterImporter) -> Vec<String> {
        importer
            .manifest()
            .find_group("Chapters")
            .map(|group| group.children().iter().map(|c| c.title.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_import_chapter_converts_and_registers() {
        let tmp = tempfile::tempdir().unwrap();
        let source = touch(tmp.path(), "optics.tex");
        let content = tmp.path().join("contents/docs");
        let converter = FakeConverter::default();
        let mut importer = create_importer(&content, converter.clone());

        let outcome = importer.import_chapter(&source, "Optics").unwrap();

        assert_eq!(
            outcome,
            ImportOutcome {
                id: "optics".to_owned(),
                title: "Optics".to_owned(),
                source: source.clone(),
                href: "/optics".to_owned(),
                page_href: "/chapters/optics".to_owned(),
                output_dir: content.join("chapters/optics"),
                inserted: true,
            }
        );
        assert_eq!(converter.calls(), vec![(source, content.join("chapters/optics"))]);
        assert!(content.join("chapters/optics/index.mdx").is_file());

        let group = importer.manifest().find_group("Chapters").unwrap();
        assert!(group.no_link);
        assert_eq!(group.href, "/chapters");
        assert_eq!(group.children(), &[RouteEntry::link("Optics", "/optics")]);
        assert_eq!(importer.manifest().pages()[0].href, "/chapters/optics");
    }

    #[test]
    fn test_import_chapter_twice_is_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let source = touch(tmp.path(), "optics.tex");
        let mut importer = create_importer(tmp.path(), FakeConverter::default());

        assert!(importer.import_chapter(&source, "Optics").unwrap().inserted);
        assert!(!importer.import_chapter(&source, "Optics").unwrap().inserted);

        assert_eq!(chapter_titles(&importer), vec!["Optics"]);
        let groups = importer
            .manifest()
            .routes()
            .iter()
            .filter(|r| r.title == "Chapters")
            .count();
        assert_eq!(groups, 1);
    }

    #[test]
    fn test_import_chapter_keeps_introduction_first() {
        let tmp = tempfile::tempdir().unwrap();
        let mut importer = create_importer(tmp.path(), FakeConverter::default());

        for (file, title) in [
            ("zebra.tex", "Zebra"),
            ("apple.tex", "Apple"),
            ("introduction.tex", "Introduction"),
        ] {
            let source = touch(tmp.path(), file);
            importer.import_chapter(&source, title).unwrap();
        }

        assert_eq!(chapter_titles(&importer), vec!["Introduction", "Apple", "Zebra"]);
    }

    #[test]
    fn test_import_chapter_converter_failure_leaves_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let source = touch(tmp.path(), "broken.tex");
        let mut importer = create_importer(tmp.path(), FakeConverter::failing_on("broken"));

        let err = importer.import_chapter(&source, "Broken").unwrap_err();

        assert!(matches!(err, ImportError::Convert(ConvertError::Spawn { .. })));
        assert!(importer.manifest().routes().is_empty());
    }

    #[test]
    fn test_import_chapter_requires_index_file() {
        let tmp = tempfile::tempdir().unwrap();
        let source = touch(tmp.path(), "optics.tex");
        let converter = FakeConverter {
            skip_output: true,
            ..FakeConverter::default()
        };
        let mut importer = create_importer(tmp.path(), converter);

        let err = importer.import_chapter(&source, "Optics").unwrap_err();

        let ImportError::Convert(ConvertError::MissingOutput(path)) = err else {
            panic!("expected MissingOutput, got {err:?}");
        };
        assert_eq!(path, tmp.path().join("chapters/optics/index.mdx"));
        assert!(importer.manifest().routes().is_empty());
    }

    #[test]
    fn test_import_chapter_missing_source() {
        let tmp = tempfile::tempdir().unwrap();
        let converter = FakeConverter::default();
        let mut importer = create_importer(tmp.path(), converter.clone());

        let err = importer
            .import_chapter(&tmp.path().join("nope.tex"), "Nope")
            .unwrap_err();

        assert!(matches!(err, ImportError::SourceNotFound(_)));
        assert!(converter.calls().is_empty());
    }

    #[test]
    fn test_rebuild_only_when_configured() {
        let tmp = tempfile::tempdir().unwrap();
        let source = touch(tmp.path(), "optics.tex");
        let rebuilder = FakeRebuilder::default();

        let mut without = create_importer(tmp.path(), FakeConverter::default());
        without.import_chapter(&source, "Optics").unwrap();
        assert_eq!(rebuilder.runs.load(Ordering::SeqCst), 0);

        let mut with = create_importer(tmp.path(), FakeConverter::default())
            .with_rebuilder(Box::new(rebuilder.clone()));
        with.import_chapter(&source, "Optics").unwrap();
        assert_eq!(rebuilder.runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_output_dir_handles_root_group_href() {
        let tmp = tempfile::tempdir().unwrap();
        let mut opts = options(tmp.path());
        opts.group_href = "/".to_owned();
        let manifest = ManifestStore::open(Box::new(MemoryManifestBackend::new())).unwrap();
        let importer = ChapterImporter::new(Box::new(FakeConverter::default()), manifest, opts);

        assert_eq!(importer.output_dir("optics"), tmp.path().join("optics"));
    }

    #[test]
    fn test_import_all_counts_matching_files() {
        let tmp = tempfile::tempdir().unwrap();
        let chapters = tmp.path().join("chapters");
        std::fs::create_dir(&chapters).unwrap();
        touch(&chapters, "optics.tex");
        touch(&chapters, "heat_transfer_basics.tex");
        touch(&chapters, "Waves.TEX");
        touch(&chapters, "notes.md");
        touch(&chapters, "README");
        std::fs::create_dir(chapters.join("drafts.tex")).unwrap();
        let converter = FakeConverter::default();
        let mut importer = create_importer(&tmp.path().join("content"), converter.clone());

        let report = importer.import_all(&chapters, |_| {}).unwrap();

        assert_eq!(
            report,
            BatchReport {
                success_count: 3,
                fail_count: 0,
                failures: Vec::new(),
            }
        );
        assert_eq!(converter.calls().len(), 3);
        assert_eq!(
            chapter_titles(&importer),
            vec!["Heat Transfer Basics", "Optics", "Waves"]
        );
    }

    #[test]
    fn test_import_all_continues_after_failure() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "a_first.tex");
        touch(tmp.path(), "b_broken.tex");
        touch(tmp.path(), "c_last.tex");
        let content = tempfile::tempdir().unwrap();
        let mut importer = create_importer(content.path(), FakeConverter::failing_on("b_broken"));

        let report = importer.import_all(tmp.path(), |_| {}).unwrap();

        assert_eq!(report.success_count, 2);
        assert_eq!(report.fail_count, 1);
        assert!(!report.is_success());
        assert_eq!(report.total(), 3);
        assert_eq!(report.failures[0].0, tmp.path().join("b_broken.tex"));
        assert!(report.failures[0].1.contains("conversion failed"));
        assert_eq!(chapter_titles(&importer), vec!["A First", "C Last"]);
    }

    #[test]
    fn test_import_all_counts_blank_title_as_failure() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "___.tex");
        touch(tmp.path(), "optics.tex");
        let content = tempfile::tempdir().unwrap();
        let converter = FakeConverter::default();
        let mut importer = create_importer(content.path(), converter.clone());

        let report = importer.import_all(tmp.path(), |_| {}).unwrap();

        assert_eq!(report.success_count, 1);
        assert_eq!(report.fail_count, 1);
        assert_eq!(report.failures[0].0, tmp.path().join("___.tex"));
        assert!(report.failures[0].1.starts_with("Empty chapter title"));
        assert_eq!(chapter_titles(&importer), vec!["Optics"]);
        assert_eq!(converter.calls().len(), 1);
        assert!(!content.path().join("chapters/___").exists());
    }

    #[test]
    fn test_import_chapter_rejects_blank_title() {
        let tmp = tempfile::tempdir().unwrap();
        let source = touch(tmp.path(), "optics.tex");
        let converter = FakeConverter::default();
        let mut importer = create_importer(tmp.path(), converter.clone());

        let err = importer.import_chapter(&source, " \t").unwrap_err();

        assert!(matches!(err, ImportError::EmptyTitle(ref p) if *p == source));
        assert!(converter.calls().is_empty());
        assert!(importer.manifest().routes().is_empty());
    }

    #[test]
    fn test_import_all_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let mut importer = create_importer(tmp.path(), FakeConverter::default());

        let err = importer
            .import_all(&tmp.path().join("missing"), |_| {})
            .unwrap_err();

        assert!(matches!(err, ImportError::DirectoryNotFound(_)));
        assert!(err.to_string().starts_with("Directory not found"));
    }

    #[test]
    fn test_import_all_empty_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let mut importer = create_importer(tmp.path(), FakeConverter::default());

        let report = importer.import_all(tmp.path(), |_| {}).unwrap();

        assert_eq!(report, BatchReport::default());
        assert!(report.is_success());
    }

    #[test]
    fn test_import_all_reports_events_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "beta.tex");
        touch(tmp.path(), "alpha.tex");
        let content = tempfile::tempdir().unwrap();
        let mut importer = create_importer(content.path(), FakeConverter::failing_on("beta"));

        let mut events = Vec::new();
        importer
            .import_all(tmp.path(), |event| {
                events.push(match event {
                    ImportEvent::Discovered { count, .. } => format!("discovered {count}"),
                    ImportEvent::Started { title, .. } => format!("started {title}"),
                    ImportEvent::Imported(outcome) => format!("imported {}", outcome.page_href),
                    ImportEvent::Failed { source, .. } => {
                        format!("failed {}", source.file_name().unwrap().to_string_lossy())
                    }
                });
            })
            .unwrap();

        assert_eq!(
            events,
            vec![
                "discovered 2",
                "started Alpha",
                "imported /chapters/alpha",
                "started Beta",
                "failed beta.tex",
            ]
        );
    }

    #[test]
    fn test_register_chapter_creates_group() {
        let tmp = tempfile::tempdir().unwrap();
        let mut manifest = ManifestStore::open(Box::new(MemoryManifestBackend::new())).unwrap();

        let inserted = register_chapter(&mut manifest, &options(tmp.path()), "Optics", "/optics").unwrap();

        assert!(inserted);
        assert_eq!(manifest.pages()[0].href, "/chapters/optics");
        assert!(!register_chapter(&mut manifest, &options(tmp.path()), "Optics", "/optics").unwrap());
    }
}
