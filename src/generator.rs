//! The front API: observe documents, then generate one Go declaration.
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::codegen;
use crate::decode::{self, Format};
use crate::error::Result;
use crate::gofmt;
use crate::inference::ValueSummary;
use crate::lower::Lowerer;
use crate::namer::{ExportNameFn, ExportNamer};
use crate::options::{OmitEmpty, Options, UnparsableProperties};
use crate::value::Value;

/// Accumulates observed documents into one root summary.
///
/// ```no_run
/// # fn main() -> jsonstruct::Result<()> {
/// let mut generator = jsonstruct::Generator::new().with_type_name("Event");
/// generator.observe_json_file("events.json")?;
/// let source = generator.generate()?;
/// # Ok(()) }
/// ```
#[derive(Clone, Default)]
pub struct Generator {
    options: Options,
    export_name: Option<ExportNameFn>,
    root: ValueSummary,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: Options) -> Self {
        Self { options, ..Self::default() }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    // ---- options ---- //

    #[must_use]
    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.options.package_name = name.into();
        self
    }

    #[must_use]
    pub fn with_package_comment(mut self, comment: impl Into<String>) -> Self {
        self.options.package_comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn with_type_name(mut self, name: impl Into<String>) -> Self {
        self.options.type_name = name.into();
        self
    }

    #[must_use]
    pub fn with_type_comment(mut self, comment: impl Into<String>) -> Self {
        self.options.type_comment = Some(comment.into());
        self
    }

    /// Raw text placed above everything else, e.g. a `// Code generated` line.
    #[must_use]
    pub fn with_file_header(mut self, header: impl Into<String>) -> Self {
        self.options.file_header = Some(header.into());
        self
    }

    #[must_use]
    pub fn with_struct_tag_name(mut self, name: impl Into<String>) -> Self {
        self.options.struct_tag_names = vec![name.into()];
        self
    }

    #[must_use]
    pub fn with_struct_tag_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.struct_tag_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_add_struct_tag_name(mut self, name: impl Into<String>) -> Self {
        self.options.struct_tag_names.push(name.into());
        self
    }

    #[must_use]
    pub fn with_int_type(mut self, int_type: impl Into<String>) -> Self {
        self.options.int_type = int_type.into();
        self
    }

    #[must_use]
    pub fn with_use_json_number(mut self, use_json_number: bool) -> Self {
        self.options.use_json_number = use_json_number;
        self
    }

    #[must_use]
    pub fn with_omit_empty(mut self, omit_empty: OmitEmpty) -> Self {
        self.options.omit_empty = omit_empty;
        self
    }

    /// Detect strings that always hold bool/int/float text and type them
    /// with the `,string` tag option.
    #[must_use]
    pub fn with_string_tags(mut self, string_tags: bool) -> Self {
        self.options.string_tags = string_tags;
        self
    }

    #[must_use]
    pub fn with_unparsable_properties(mut self, mode: UnparsableProperties) -> Self {
        self.options.unparsable_properties = mode;
        self
    }

    /// Replaces the default abbreviation set.
    #[must_use]
    pub fn with_abbreviations<I, S>(mut self, abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.abbreviations = Some(abbreviations.into_iter().map(Into::into).collect());
        self.options.extra_abbreviations.clear();
        self
    }

    #[must_use]
    pub fn with_extra_abbreviations<I, S>(mut self, abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options
            .extra_abbreviations
            .extend(abbreviations.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_rename(mut self, property: impl Into<String>, name: impl Into<String>) -> Self {
        self.options.renames.insert(property.into(), name.into());
        self
    }

    #[must_use]
    pub fn with_renames(mut self, renames: IndexMap<String, String>) -> Self {
        self.options.renames = renames;
        self
    }

    /// Replaces the abbreviation-aware default; renames still win.
    #[must_use]
    pub fn with_export_name_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let f: ExportNameFn = Arc::new(f);
        self.export_name = Some(f);
        self
    }

    #[must_use]
    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.imports.extend(imports.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_gofmt(mut self, gofmt: bool) -> Self {
        self.options.gofmt = gofmt;
        self
    }

    // ---- observe ---- //

    pub fn observe_value(&mut self, value: &Value) {
        self.root.observe(value);
        debug!(
            kind = value.kind_name(),
            observations = self.root.observations,
            "observed document"
        );
    }

    /// Observes every JSON value in the stream. The first decode error is
    /// returned; values before it stay observed.
    pub fn observe_json_reader<R: Read>(&mut self, reader: R) -> Result<()> {
        self.observe_reader(Format::Json, reader)
    }

    /// Observes every document of a (possibly multi-document) YAML stream.
    pub fn observe_yaml_reader<R: Read>(&mut self, reader: R) -> Result<()> {
        self.observe_reader(Format::Yaml, reader)
    }

    pub fn observe_reader<R: Read>(&mut self, format: Format, reader: R) -> Result<()> {
        decode::for_each_document(format, reader, |value| {
            self.observe_value(&value);
            Ok(())
        })
    }

    pub fn observe_json_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::open(path)?;
        self.observe_json_reader(BufReader::new(file))
    }

    pub fn observe_yaml_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::open(path)?;
        self.observe_yaml_reader(BufReader::new(file))
    }

    pub fn summary(&self) -> &ValueSummary {
        &self.root
    }

    // ---- generate ---- //

    fn namer(&self) -> ExportNamer {
        let mut namer = self.options.namer();
        if let Some(f) = &self.export_name {
            namer.set_custom(Arc::clone(f));
        }
        namer
    }

    /// Go source for everything observed so far.
    pub fn generate(&self) -> Result<Vec<u8>> {
        let namer = self.namer();
        let mut lowerer = Lowerer::new(&self.options, &namer);
        let root = lowerer.lower(&self.root, 0);
        let imports = lowerer.into_imports();
        debug!(
            observations = self.root.observations,
            imports = imports.len(),
            gofmt = self.options.gofmt,
            "generating declaration"
        );

        let src = codegen::assemble(&self.options, &imports, &root.ty);
        if !self.options.gofmt {
            return Ok(src.into_bytes());
        }
        Ok(gofmt::format_source(&src)?.into_bytes())
    }
}
