//! Template rendering pipeline: read, render with a header, format, write.

use crate::cli::error::{TmplError, TmplErrorKind};

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};


const TEMPLATE_EXTENSION: &str = "tmpl";


/// Everything a template can reference: `In` is the JSON data, `D` the `-d` values.
#[derive(Debug, Serialize)]
pub struct TemplateData {
    #[serde(rename = "In")]
    pub input: serde_json::Value,
    #[serde(rename = "D")]
    pub defines: BTreeMap<String, String>,
}

/// One template argument resolved into its input and output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePath {
    /// The argument as given on the command line.
    pub arg: String,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl TemplatePath {
    /// `in=out` splits at the first `=`; a bare path must end in `.tmpl`.
    pub fn parse(arg: &str) -> Result<Self, TmplError> {
        if let Some((input, output)) = arg.split_once('=') {
            return Ok(Self { arg: arg.to_string(), input: input.into(), output: output.into() });
        }

        let input = PathBuf::from(arg);
        if input.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
            return Err(TmplErrorKind::MissingExtension(arg.to_string()).into());
        }

        Ok(Self { arg: arg.to_string(), output: input.with_extension(""), input })
    }
}


pub fn read_data(path: &Path) -> Result<serde_json::Value, TmplError> {
    let raw = fs::read(path)
        .map_err(|source| TmplErrorKind::IoFileRead { source, path: path.to_path_buf() })?;

    Ok(serde_json::from_slice(&raw)
        .map_err(|source| TmplErrorKind::Json { source, path: path.to_path_buf() })?)
}

/// Render `source` against `data`, preceded by the generated-code header naming `path.arg`.
pub fn render(path: &TemplatePath, source: &str, data: &TemplateData) -> Result<String, TmplError> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::Strict);

    let template = env.template_from_str(source)
        .map_err(|source| TmplErrorKind::TemplateParse { source, path: path.input.clone() })?;

    let body = template
        .render(data)
        .map_err(|source| TmplErrorKind::Render { source, path: path.input.clone() })?;

    Ok(format!("// Code generated by {}. DO NOT EDIT.\n{}", path.arg, body))
}

/// Pipe `source` through `formatter` and return what it prints.
pub fn format_source(formatter: &str, source: &str) -> Result<String, TmplError> {
    let mut words = formatter.split_whitespace();
    let program = words.next()
        .ok_or_else(|| TmplErrorKind::InvalidFormatter(formatter.to_string()))?;

    let mut child = Command::new(program)
        .args(words)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| TmplErrorKind::Process { source, cmd: formatter.to_string() })?;

    // Feed stdin from a separate thread so a chatty formatter cannot deadlock on a full pipe.
    let writer = child.stdin.take().map(|mut stdin| {
        let input = source.as_bytes().to_vec();
        std::thread::spawn(move || stdin.write_all(&input))
    });

    let output = child.wait_with_output()
        .map_err(|source| TmplErrorKind::Process { source, cmd: formatter.to_string() })?;
    let written = writer.map(|w| w.join());

    // A failing formatter may exit before reading all of stdin; its stderr is what matters.
    if !output.status.success() {
        return Err(TmplErrorKind::Format {
            cmd: formatter.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }.into());
    }

    match written {
        Some(Ok(Err(source))) => return Err(TmplErrorKind::Process { source, cmd: formatter.to_string() }.into()),
        Some(Err(_)) => return Err(TmplErrorKind::Format {
            cmd: formatter.to_string(),
            stderr: "stdin writer panicked".to_string(),
        }.into()),
        _ => {}
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Generate every template in `paths`. The first failure aborts the run.
pub fn process(data: &TemplateData, paths: &[TemplatePath], formatter: &str) -> Result<(), TmplError> {
    for path in paths {
        tracing::debug!("Rendering '{}' -> '{}'", path.input.display(), path.output.display());

        let source = fs::read_to_string(&path.input)
            .map_err(|source| TmplErrorKind::IoFileRead { source, path: path.input.clone() })?;

        let generated = render(path, &source, data)?;
        let formatted = format_source(formatter, &generated)?;

        fs::write(&path.output, formatted)
            .map_err(|source| TmplErrorKind::IoFileWrite { source, path: path.output.clone() })?;

        tracing::info!("Generated '{}'", path.output.display());
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data() -> TemplateData {
        TemplateData {
            input: json!({"types": [{"name": "Int"}, {"name": "Float"}]}),
            defines: BTreeMap::from([("Pkg".to_string(), "types".to_string())]),
        }
    }

    #[test]
    fn template_path_forms() {
        let explicit = TemplatePath::parse("in/a.txt=out/a.rs").unwrap();
        assert_eq!(explicit.input, PathBuf::from("in/a.txt"));
        assert_eq!(explicit.output, PathBuf::from("out/a.rs"));

        let bare = TemplatePath::parse("gen/types.rs.tmpl").unwrap();
        assert_eq!(bare.input, PathBuf::from("gen/types.rs.tmpl"));
        assert_eq!(bare.output, PathBuf::from("gen/types.rs"));

        let err = TemplatePath::parse("gen/types.rs").unwrap_err();
        assert_eq!(err.kind.to_string(), "template file 'gen/types.rs' must have .tmpl extension");
    }

    #[test]
    fn render_prefixes_header() {
        let path = TemplatePath::parse("types.rs.tmpl").unwrap();
        let source = "pub mod {{ D.Pkg }} {\n{% for t in In.types %}pub struct {{ t.name }};\n{% endfor %}}\n";

        let out = render(&path, source, &data()).unwrap();
        assert_eq!(
            out,
            "// Code generated by types.rs.tmpl. DO NOT EDIT.\npub mod types {\npub struct Int;\npub struct Float;\n}\n"
        );
    }

    #[test]
    fn render_reports_parse_and_render_errors() {
        let path = TemplatePath::parse("x.tmpl").unwrap();

        let err = render(&path, "{% for %}", &data()).unwrap_err();
        assert!(matches!(err.kind, TmplErrorKind::TemplateParse { .. }));

        let err = render(&path, "{{ In.missing.field }}", &data()).unwrap_err();
        assert!(matches!(err.kind, TmplErrorKind::Render { .. }));
    }

    #[test]
    fn read_data_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = read_data(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing.kind, TmplErrorKind::IoFileRead { .. }));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        let err = read_data(&bad).unwrap_err();
        assert!(matches!(err.kind, TmplErrorKind::Json { .. }));
    }

    #[test]
    fn empty_formatter_is_rejected() {
        let err = format_source("   ", "fn main() {}").unwrap_err();
        assert!(matches!(err.kind, TmplErrorKind::InvalidFormatter(_)));
    }

    #[test]
    fn missing_formatter_binary_is_a_process_error() {
        let err = format_source("definitely-not-a-real-formatter-binary", "x").unwrap_err();
        assert!(matches!(err.kind, TmplErrorKind::Process { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn failing_formatter_aborts() {
        let err = format_source("false", "fn main() {}").unwrap_err();
        assert!(matches!(err.kind, TmplErrorKind::Format { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn failing_formatter_keeps_stderr_with_unread_input() {
        let input = "x".repeat(1 << 20);

        for _ in 0..20 {
            let err = format_source("false", &input).unwrap_err();
            assert!(matches!(err.kind, TmplErrorKind::Format { .. }), "got {:?}", err.kind);
        }

        let err = format_source("ls /definitely/not/a/real/dir", &input).unwrap_err();
        match err.kind {
            TmplErrorKind::Format { stderr, .. } => assert!(!stderr.trim().is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn large_input_passes_through_formatter() {
        let input = "fn main() {}\n".repeat(1 << 16);
        assert_eq!(format_source("cat", &input).unwrap(), input);
    }

    #[cfg(unix)]
    #[test]
    fn process_writes_formatted_output() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("types.rs.tmpl");
        fs::write(&template, "// pkg {{ D.Pkg }}\n").unwrap();

        let arg = template.to_str().unwrap().to_string();
        let paths = vec![TemplatePath::parse(&arg).unwrap()];
        process(&data(), &paths, "cat").unwrap();

        let written = fs::read_to_string(dir.path().join("types.rs")).unwrap();
        assert_eq!(written, format!("// Code generated by {arg}. DO NOT EDIT.\n// pkg types\n"));
    }

    #[cfg(unix)]
    #[test]
    fn process_stops_at_first_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("never.rs");
        let paths = vec![TemplatePath {
            arg: "missing".into(),
            input: dir.path().join("missing.tmpl"),
            output: out.clone(),
        }];

        let err = process(&data(), &paths, "cat").unwrap_err();
        assert!(matches!(err.kind, TmplErrorKind::IoFileRead { .. }));
        assert!(!out.exists());
    }
}
