//! CLI: inputs → documents → (go | summary)
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use tracing::{debug, info};

use jsonstruct::decode::{self, Format};
use jsonstruct::jq_exec::run_jaq;
use jsonstruct::{Error, Generator, OmitEmpty, Options, UnparsableProperties, Value};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer Go struct declarations from sample JSON or YAML documents
#[derive(Parser, Debug)]
#[command(name = "jsonstruct", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Option<Command>,

    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    generate_settings: GenerateSettings,

    /// output file (stdout if omitted)
    #[arg(short, long, global = true)]
    out: Option<PathBuf>,

    /// log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print the accumulated value summary as JSON instead of Go
    Summary,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths, quoted glob patterns, or '-'
    /// for stdin. Reads stdin when omitted.
    #[arg(long, short, num_args = 1.., global = true)]
    input: Vec<String>,

    /// input format (default: by file extension, JSON for stdin)
    #[arg(long, value_enum, global = true)]
    format: Option<Format>,

    /// decompress input with gzip (implied for *.gz files)
    #[arg(short = 'z', long, global = true)]
    gzip: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0)
    #[arg(long, global = true)]
    json_pointer: Option<String>,

    /// jq filter applied to each document; every output is one sample
    #[arg(long, global = true)]
    jq_expr: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
struct GenerateSettings {
    /// JSON or YAML file with generation options; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    package_name: Option<String>,

    #[arg(long)]
    package_comment: Option<String>,

    #[arg(long)]
    type_name: Option<String>,

    #[arg(long)]
    type_comment: Option<String>,

    /// raw text placed at the top of the file
    #[arg(long)]
    file_header: Option<String>,

    /// struct tag name; repeat for several (json, yaml, ...)
    #[arg(long = "struct-tag-name")]
    struct_tag_names: Vec<String>,

    /// Go type for integers
    #[arg(long)]
    int_type: Option<String>,

    /// use json.Number where ints and floats are mixed
    #[arg(long)]
    use_json_number: bool,

    #[arg(long, value_enum)]
    omit_empty: Option<OmitEmpty>,

    /// type strings holding bool/int/float text with the ,string option
    #[arg(long)]
    string_tags: bool,

    #[arg(long, value_enum)]
    unparsable_properties: Option<UnparsableProperties>,

    /// comma-separated list of extra abbreviations
    #[arg(long, value_delimiter = ',')]
    abbreviations: Vec<String>,

    /// explicit field name, as property=Name
    #[arg(long = "rename", value_parser = parse_rename)]
    renames: Vec<(String, String)>,

    /// extra import path
    #[arg(long = "import")]
    imports: Vec<String>,

    /// emit the unformatted declaration
    #[arg(long)]
    no_gofmt: bool,
}

/// Where documents come from.
#[derive(Debug, Clone, PartialEq)]
enum Source {
    Stdin,
    File(PathBuf),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn format_for(&self, source: &Source) -> Format {
        match (self.format, source) {
            (Some(format), _) => format,
            (None, Source::Stdin) => Format::Json,
            (None, Source::File(path)) => Format::from_path(path),
        }
    }

    /// Decodes one source into the documents it contributes, after pointer
    /// and jq selection.
    fn load_source(&self, source: &Source) -> Result<Vec<Value>> {
        let format = self.format_for(source);
        let documents = match source {
            Source::Stdin => {
                let stdin = std::io::stdin().lock();
                let documents = if self.gzip {
                    decode::read_documents(format, flate2::read::GzDecoder::new(stdin))
                } else {
                    decode::read_documents(format, stdin)
                };
                documents.context("failed to decode stdin")?
            }
            Source::File(path) => {
                let reader = decode::open(path, self.gzip)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                decode::read_documents(format, reader)
                    .with_context(|| format!("failed to decode {}", path.display()))?
            }
        };
        debug!(?source, documents = documents.len(), "decoded source");

        let mut out = Vec::with_capacity(documents.len());
        for document in documents {
            self.select(document, &mut out)
                .with_context(|| format!("in {}", source.describe()))?;
        }
        Ok(out)
    }

    fn select(&self, document: Value, out: &mut Vec<Value>) -> jsonstruct::Result<()> {
        let document = match &self.json_pointer {
            None => document,
            Some(pointer) => document
                .pointer(pointer)
                .cloned()
                .ok_or_else(|| Error::Pointer { pointer: pointer.clone() })?,
        };
        match &self.jq_expr {
            None => out.push(document),
            Some(jq_expr) => {
                let input = serde_json::Value::from(&document);
                out.extend(run_jaq(jq_expr, &input)?.into_iter().map(Value::from));
            }
        }
        Ok(())
    }

    /// Files are decoded in parallel; documents come back in input order.
    fn load_process(&self, mut apply: impl FnMut(&Value)) -> Result<()> {
        let sources = resolve_sources(&self.input)?;
        let decoded: Vec<Result<Vec<Value>>> =
            sources.par_iter().map(|source| self.load_source(source)).collect();
        for documents in decoded {
            for document in documents? {
                apply(&document);
            }
        }
        Ok(())
    }
}

impl GenerateSettings {
    fn options(&self) -> Result<Options> {
        let mut options = match &self.config {
            Some(path) => Options::from_path(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => Options::default(),
        };
        self.apply(&mut options);
        Ok(options)
    }

    fn apply(&self, options: &mut Options) {
        if let Some(name) = &self.package_name {
            options.package_name = name.clone();
        }
        if let Some(comment) = &self.package_comment {
            options.package_comment = Some(comment.clone());
        }
        if let Some(name) = &self.type_name {
            options.type_name = name.clone();
        }
        if let Some(comment) = &self.type_comment {
            options.type_comment = Some(comment.clone());
        }
        if let Some(header) = &self.file_header {
            options.file_header = Some(header.clone());
        }
        if !self.struct_tag_names.is_empty() {
            options.struct_tag_names = self.struct_tag_names.clone();
        }
        if let Some(int_type) = &self.int_type {
            options.int_type = int_type.clone();
        }
        if self.use_json_number {
            options.use_json_number = true;
        }
        if let Some(omit_empty) = self.omit_empty {
            options.omit_empty = omit_empty;
        }
        if self.string_tags {
            options.string_tags = true;
        }
        if let Some(mode) = self.unparsable_properties {
            options.unparsable_properties = mode;
        }
        options
            .extra_abbreviations
            .extend(self.abbreviations.iter().filter(|a| !a.is_empty()).cloned());
        options.renames.extend(self.renames.iter().cloned());
        options.imports.extend(self.imports.iter().cloned());
        if self.no_gofmt {
            options.gofmt = false;
        }
    }
}

impl Source {
    fn describe(&self) -> String {
        match self {
            Source::Stdin => "stdin".to_string(),
            Source::File(path) => path.display().to_string(),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn run(&self) -> Result<()> {
        let options = self.generate_settings.options()?;
        let mut generator = Generator::from_options(options);
        self.input_settings.load_process(|document| {
            generator.observe_value(document);
        })?;
        info!(observations = generator.summary().observations, "inputs observed");

        let output = match self.cmd {
            Some(Command::Summary) => {
                let mut text = serde_json::to_string_pretty(generator.summary())?;
                text.push('\n');
                text.into_bytes()
            }
            None => generator.generate()?,
        };
        write_output(self.out.as_deref(), &output)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn parse_rename(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((property, name)) if !name.is_empty() => Ok((property.to_string(), name.to_string())),
        _ => Err(format!("expected property=Name, got {s:?}")),
    }
}

fn write_output(out: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn resolve_sources<I>(patterns: I) -> jsonstruct::Result<Vec<Source>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<Source>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if pattern == "-" {
            out.push(Source::Stdin);
        } else if has_glob_chars(pattern) {
            let entries = glob::glob(pattern).map_err(|e| Error::Glob {
                message: format!("invalid glob pattern {pattern:?}: {e}"),
            })?;
            let before = out.len();
            for entry in entries {
                let path = entry.map_err(|e| Error::Glob { message: e.to_string() })?;
                out.push(Source::File(path));
            }
            if out.len() == before {
                // an explicit glob that matched nothing
                return Err(Error::Glob {
                    message: format!("glob pattern matched no files: {pattern}"),
                });
            }
        } else {
            out.push(Source::File(PathBuf::from(pattern)));
        }
    }

    if out.is_empty() {
        out.push(Source::Stdin);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renames_parse() {
        assert_eq!(parse_rename("id=Identifier"), Ok(("id".into(), "Identifier".into())));
        assert_eq!(parse_rename("a=b=C"), Ok(("a".into(), "b=C".into())));
        assert!(parse_rename("id").is_err());
        assert!(parse_rename("id=").is_err());
    }

    #[test]
    fn sources_default_to_stdin() {
        assert_eq!(resolve_sources(Vec::<String>::new()).unwrap(), vec![Source::Stdin]);
        assert_eq!(
            resolve_sources(["-", "a.json"]).unwrap(),
            vec![Source::Stdin, Source::File(PathBuf::from("a.json"))]
        );
    }

    #[test]
    fn globs_expand_and_must_match() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), "{}").unwrap();
        std::fs::write(dir.path().join("a.json"), "{}").unwrap();
        let pattern = format!("{}/*.json", dir.path().display());
        let sources = resolve_sources([pattern.as_str()]).unwrap();
        assert_eq!(
            sources,
            vec![Source::File(dir.path().join("a.json")), Source::File(dir.path().join("b.json"))]
        );

        let pattern = format!("{}/*.yaml", dir.path().display());
        assert!(matches!(resolve_sources([pattern.as_str()]), Err(Error::Glob { .. })));
    }

    #[test]
    fn flags_override_config() {
        let cli = CommandLineInterface::parse_from([
            "jsonstruct",
            "--type-name",
            "Event",
            "--struct-tag-name",
            "json",
            "--struct-tag-name",
            "yaml",
            "--abbreviations",
            "GPS,RPC",
            "--rename",
            "id=Identifier",
            "--omit-empty",
            "never",
            "--no-gofmt",
        ]);
        let mut options = Options { package_name: "events".into(), ..Options::default() };
        cli.generate_settings.apply(&mut options);
        assert_eq!(options.package_name, "events");
        assert_eq!(options.type_name, "Event");
        assert_eq!(options.struct_tag_names, vec!["json", "yaml"]);
        assert_eq!(options.extra_abbreviations, vec!["GPS", "RPC"]);
        assert_eq!(options.renames.get("id").map(String::as_str), Some("Identifier"));
        assert_eq!(options.omit_empty, OmitEmpty::Never);
        assert!(!options.gofmt);
    }

    #[test]
    fn pointer_and_jq_selection() {
        let settings = InputSettings {
            input: Vec::new(),
            format: None,
            gzip: false,
            json_pointer: Some("/data".into()),
            jq_expr: Some(".[]".into()),
        };
        let document = Value::from(serde_json::json!({"data": [1, "x"]}));
        let mut out = Vec::new();
        settings.select(document, &mut out).unwrap();
        assert_eq!(out, vec![Value::Number("1".into()), Value::String("x".into())]);

        let mut out = Vec::new();
        let err = settings.select(Value::Null, &mut out).unwrap_err();
        assert!(matches!(err, Error::Pointer { .. }));
    }
}
