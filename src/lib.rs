//! Infer Go struct declarations from sample JSON and YAML documents.
//!
//! Documents are merged one at a time into a [`ValueSummary`] (counts per
//! position, no retained samples); [`Generator::generate`] turns the summary
//! into the most specific Go type that accepts everything observed.
pub mod codegen;
pub mod decode;
pub mod error;
pub mod generator;
pub mod gofmt;
pub mod ident;
pub mod inference;
pub mod ir;
pub mod jq_exec;
pub mod lower;
pub mod namer;
pub mod options;
pub mod path_de;
pub mod value;

pub use decode::Format;
pub use error::{Error, Result};
pub use generator::Generator;
pub use gofmt::{format_source, FormatError};
pub use inference::ValueSummary;
pub use namer::{ExportNamer, DEFAULT_ABBREVIATIONS};
pub use options::{OmitEmpty, Options, UnparsableProperties};
pub use value::Value;
