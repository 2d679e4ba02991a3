//! Implementation of `chfl-bindgen generate`, `check` and `dump`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::bindings::{extract, generator_for, normalize, target_config, Bindings, HeaderParser};
use crate::core::Language;
use crate::util::config::Config;
use crate::util::fs;

/// Options shared by every operation on a header.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// C header to read
    pub header: PathBuf,

    /// Directory receiving the generated files
    pub output_dir: PathBuf,

    /// Targets to produce (empty = all)
    pub languages: Vec<Language>,

    /// Explicit configuration file, instead of the one next to the header
    pub config: Option<PathBuf>,
}

impl GenerateOptions {
    pub fn new(header: impl Into<PathBuf>) -> Self {
        GenerateOptions {
            header: header.into(),
            output_dir: PathBuf::from("."),
            languages: Vec::new(),
            config: None,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_languages(mut self, languages: Vec<Language>) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_config(mut self, path: Option<PathBuf>) -> Self {
        self.config = path;
        self
    }

    /// Requested targets, deduplicated and in generation order.
    pub fn selected_languages(&self) -> Vec<Language> {
        if self.languages.is_empty() {
            return Language::ALL.to_vec();
        }
        Language::ALL
            .into_iter()
            .filter(|lang| self.languages.contains(lang))
            .collect()
    }

    /// Configuration for this run.
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path),
            None => Config::for_header(&self.header),
        }
    }
}

/// One generated file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub language: Language,

    /// Destination path
    pub path: PathBuf,

    pub contents: String,
}

/// Parse a header and build the normalized binding model.
pub fn load_bindings(header: &Path, config: &Config) -> Result<Bindings> {
    let decls = HeaderParser::new()
        .with_export_macros(config.export_macros.clone())
        .parse_file(header)?;
    tracing::debug!("parsed {} declarations from {}", decls.len(), header.display());

    let extracted = extract(decls, config)?;
    let functions = normalize(&extracted.functions, config)?;
    tracing::debug!(
        "extracted {} functions and {} enums",
        functions.len(),
        extracted.enums.len()
    );

    Ok(Bindings {
        functions,
        enums: extracted.enums,
    })
}

/// Output path of `language` inside `output_dir`.
pub fn output_path(config: &Config, language: Language, output_dir: &Path) -> PathBuf {
    let name = &target_config(config, language).output;
    if name.trim().is_empty() {
        output_dir.join(language.default_output())
    } else {
        output_dir.join(name)
    }
}

/// Render the requested targets, in generation order.
pub fn render(
    bindings: &Bindings,
    config: &Config,
    languages: &[Language],
    output_dir: &Path,
) -> Result<Vec<RenderedFile>> {
    languages
        .iter()
        .map(|&language| {
            let generator = generator_for(language, config, &bindings.enums);
            let contents = generator
                .generate(bindings)
                .with_context(|| format!("failed to generate {} bindings", language))?;
            Ok(RenderedFile {
                language,
                path: output_path(config, language, output_dir),
                contents,
            })
        })
        .collect()
}

fn render_for(options: &GenerateOptions) -> Result<Vec<RenderedFile>> {
    let config = options.load_config()?;
    let bindings = load_bindings(&options.header, &config)?;
    render(
        &bindings,
        &config,
        &options.selected_languages(),
        &options.output_dir,
    )
}

/// Generate and write the bindings. Nothing is written unless every
/// target renders successfully.
pub fn generate(options: &GenerateOptions) -> Result<Vec<PathBuf>> {
    let files = render_for(options)?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        fs::write_string(&file.path, &file.contents)?;
        tracing::info!("wrote {} bindings to {}", file.language, file.path.display());
        written.push(file.path);
    }
    Ok(written)
}

/// State of one output file compared with a fresh generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    UpToDate,
    Stale,
    Missing,
}

/// Result of [`check`].
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub files: Vec<(Language, PathBuf, FileStatus)>,
}

impl CheckReport {
    /// Whether every file matches what would be generated.
    pub fn is_clean(&self) -> bool {
        self.files
            .iter()
            .all(|(_, _, status)| *status == FileStatus::UpToDate)
    }

    pub fn outdated(&self) -> impl Iterator<Item = &(Language, PathBuf, FileStatus)> {
        self.files
            .iter()
            .filter(|(_, _, status)| *status != FileStatus::UpToDate)
    }
}

/// Compare existing output files with what `generate` would write.
pub fn check(options: &GenerateOptions) -> Result<CheckReport> {
    let mut report = CheckReport::default();
    for file in render_for(options)? {
        let status = match fs::read_if_exists(&file.path)? {
            None => FileStatus::Missing,
            Some(existing) if existing == file.contents => FileStatus::UpToDate,
            Some(_) => FileStatus::Stale,
        };
        tracing::debug!("{}: {:?}", file.path.display(), status);
        report.files.push((file.language, file.path, status));
    }
    Ok(report)
}

/// Format a check report for display.
pub fn format_check_report(report: &CheckReport) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    for (language, path, status) in &report.files {
        let label = match status {
            FileStatus::UpToDate => "[OK]     ",
            FileStatus::Stale => "[STALE]  ",
            FileStatus::Missing => "[MISSING]",
        };
        let _ = writeln!(output, "  {} {} ({})", label, path.display(), language);
    }
    output
}

/// The extracted model as pretty-printed JSON.
pub fn dump(options: &GenerateOptions) -> Result<String> {
    let config = options.load_config()?;
    let bindings = load_bindings(&options.header, &config)?;
    serde_json::to_string_pretty(&bindings).context("failed to serialize bindings")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::BindgenError;
    use crate::test_support::CHEMFILES_HEADER;
    use tempfile::TempDir;

    fn setup() -> (TempDir, GenerateOptions) {
        let tmp = TempDir::new().unwrap();
        let header = tmp.path().join("chemfiles.h");
        std::fs::write(&header, CHEMFILES_HEADER).unwrap();
        let options = GenerateOptions::new(&header).with_output_dir(tmp.path().join("out"));
        (tmp, options)
    }

    #[test]
    fn test_selected_languages() {
        let options = GenerateOptions::new("chemfiles.h");
        assert_eq!(options.selected_languages(), Language::ALL.to_vec());

        let options = options.with_languages(vec![
            Language::Fortran,
            Language::Python,
            Language::Fortran,
        ]);
        assert_eq!(
            options.selected_languages(),
            vec![Language::Python, Language::Fortran]
        );
    }

    #[test]
    fn test_generate_writes_every_target() {
        let (tmp, options) = setup();
        let written = generate(&options).unwrap();

        let out = tmp.path().join("out");
        assert_eq!(
            written,
            vec![out.join("ffi.py"), out.join("ffi.jl"), out.join("ffi.f90")]
        );
        for path in &written {
            assert!(path.exists());
        }
    }

    #[test]
    fn test_generate_is_idempotent() {
        let (tmp, options) = setup();
        generate(&options).unwrap();
        let first = std::fs::read_to_string(tmp.path().join("out/ffi.f90")).unwrap();
        generate(&options).unwrap();
        let second = std::fs::read_to_string(tmp.path().join("out/ffi.f90")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_check_reports_missing_and_stale() {
        let (tmp, options) = setup();
        let report = check(&options).unwrap();
        assert!(!report.is_clean());
        assert!(report
            .files
            .iter()
            .all(|(_, _, status)| *status == FileStatus::Missing));

        generate(&options).unwrap();
        assert!(check(&options).unwrap().is_clean());

        std::fs::write(tmp.path().join("out/ffi.jl"), "# edited\n").unwrap();
        let report = check(&options).unwrap();
        let outdated: Vec<_> = report.outdated().collect();
        assert_eq!(outdated.len(), 1);
        assert_eq!(outdated[0].0, Language::Julia);
        assert_eq!(outdated[0].2, FileStatus::Stale);
        assert!(format_check_report(&report).contains("[STALE]"));
    }

    #[test]
    fn test_sibling_config_is_used() {
        let (tmp, options) = setup();
        std::fs::write(
            tmp.path().join("chfl-bindgen.toml"),
            "string_length = 256\n\n[fortran]\noutput = \"chemfiles.f90\"\n",
        )
        .unwrap();

        let written = generate(&options.with_languages(vec![Language::Fortran])).unwrap();
        assert_eq!(written, vec![tmp.path().join("out/chemfiles.f90")]);
        let text = std::fs::read_to_string(&written[0]).unwrap();
        assert!(text.contains("CHFL_STRING_LENGTH = 256"));
    }

    #[test]
    fn test_failure_writes_nothing() {
        let (tmp, options) = setup();
        let header = tmp.path().join("chemfiles.h");
        std::fs::write(
            &header,
            format!("{}\nchfl_status chfl_mystery(CHFL_MYSTERY* thing);\n", CHEMFILES_HEADER),
        )
        .unwrap();

        let err = generate(&options).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BindgenError>(),
            Some(BindgenError::UnknownType { .. })
        ));
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn test_dump_is_json() {
        let (_tmp, options) = setup();
        let json = dump(&options).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["enums"][0]["name"], "chfl_status");
        assert_eq!(value["functions"][0]["name"], "chfl_version");
    }
}
