//! Byte streams → `Value` documents.
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::options::is_yaml_path;
use crate::value::Value;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    /// `.yaml`/`.yml` (optionally followed by `.gz`) is YAML, everything
    /// else JSON.
    pub fn from_path(path: &Path) -> Self {
        let path =
            if is_gzip_path(path) { Path::new(path.file_stem().unwrap_or_default()) } else { path };
        if is_yaml_path(path) { Format::Yaml } else { Format::Json }
    }
}

pub fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Opens `path`, decompressing when asked to or when it ends in `.gz`.
pub fn open(path: &Path, gzip: bool) -> Result<Box<dyn Read>> {
    let file = BufReader::new(File::open(path)?);
    if gzip || is_gzip_path(path) {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Calls `f` with every document in the stream, stopping at the first
/// decode error or the first error from `f`.
pub fn for_each_document<R, F>(format: Format, mut reader: R, mut f: F) -> Result<()>
where
    R: Read,
    F: FnMut(Value) -> Result<()>,
{
    match format {
        Format::Json => {
            let stream =
                serde_json::Deserializer::from_reader(reader).into_iter::<serde_json::Value>();
            for value in stream {
                f(Value::from(value?))?;
            }
        }
        Format::Yaml => {
            let mut src = String::new();
            reader.read_to_string(&mut src)?;
            if src.trim().is_empty() {
                return Ok(());
            }
            for document in serde_yaml::Deserializer::from_str(&src) {
                let value = serde_yaml::Value::deserialize(document)?;
                f(Value::from(value))?;
            }
        }
    }
    Ok(())
}

pub fn read_documents<R: Read>(format: Format, reader: R) -> Result<Vec<Value>> {
    let mut out = Vec::new();
    for_each_document(format, reader, |value| {
        out.push(value);
        Ok(())
    })?;
    Ok(out)
}
