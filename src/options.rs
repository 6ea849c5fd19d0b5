//! Generation options, shared by the library builder, the CLI, and the
//! config file.
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::namer::ExportNamer;
use crate::path_de;

/// When a field's tag carries `omitempty`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OmitEmpty {
    Never,
    Always,
    /// Only when some observation of the parent lacked the field.
    #[default]
    Auto,
}

/// What to do with object keys that cannot appear in a struct tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnparsableProperties {
    /// Leave the key out and note it in a comment.
    #[default]
    Skip,
    /// Render the whole object as `map[string]V`.
    Map,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Options {
    pub package_name: String,
    pub package_comment: Option<String>,
    pub type_name: String,
    pub type_comment: Option<String>,
    pub file_header: Option<String>,
    pub struct_tag_names: Vec<String>,
    pub int_type: String,
    pub use_json_number: bool,
    pub omit_empty: OmitEmpty,
    pub string_tags: bool,
    pub unparsable_properties: UnparsableProperties,
    /// Replaces the default abbreviation set when present.
    pub abbreviations: Option<Vec<String>>,
    pub extra_abbreviations: Vec<String>,
    pub renames: IndexMap<String, String>,
    pub imports: Vec<String>,
    pub gofmt: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            package_name: "main".to_string(),
            package_comment: None,
            type_name: "T".to_string(),
            type_comment: None,
            file_header: None,
            struct_tag_names: vec!["json".to_string()],
            int_type: "int".to_string(),
            use_json_number: false,
            omit_empty: OmitEmpty::Auto,
            string_tags: false,
            unparsable_properties: UnparsableProperties::Skip,
            abbreviations: None,
            extra_abbreviations: Vec::new(),
            renames: IndexMap::new(),
            imports: Vec::new(),
            gofmt: true,
        }
    }
}

impl Options {
    /// Loads a config file; `.yaml`/`.yml` is read as YAML, anything else
    /// as JSON. Missing keys keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)?;
        if is_yaml_path(path) {
            path_de::from_yaml_str(&src)
        } else {
            path_de::from_json_str(&src)
        }
    }

    /// Namer configured from the abbreviation and rename settings.
    pub fn namer(&self) -> ExportNamer {
        let mut namer = ExportNamer::new();
        if let Some(abbreviations) = &self.abbreviations {
            namer.set_abbreviations(abbreviations.iter().cloned());
        }
        namer.add_abbreviations(self.extra_abbreviations.iter().cloned());
        namer.set_renames(self.renames.clone());
        namer
    }
}

pub fn is_yaml_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn partial_config_keeps_defaults() {
        let options: Options =
            path_de::from_json_str(r#"{"package-name": "demo", "omit-empty": "never"}"#).unwrap();
        assert_eq!(options.package_name, "demo");
        assert_eq!(options.omit_empty, OmitEmpty::Never);
        assert_eq!(options.type_name, "T");
        assert_eq!(options.struct_tag_names, vec!["json"]);
        assert!(options.gofmt);
    }

    #[test]
    fn yaml_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let yaml = "type-name: Config\nstruct-tag-names: [json, yaml]\nrenames:\n  id: Identifier";
        writeln!(file, "{yaml}").unwrap();
        let options = Options::from_path(file.path()).unwrap();
        assert_eq!(options.type_name, "Config");
        assert_eq!(options.struct_tag_names, vec!["json", "yaml"]);
        assert_eq!(options.namer().export_name("id"), "Identifier");
    }

    #[test]
    fn bad_values_name_their_path() {
        let err = path_de::from_json_str::<Options>(r#"{"omit-empty": "sometimes"}"#).unwrap_err();
        match err {
            Error::Config { path, .. } => assert_eq!(path, "omit-empty"),
            other => panic!("unexpected error: {other}"),
        }
        let err = path_de::from_json_str::<Options>(r#"{"no-such-key": 1}"#).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn namer_abbreviation_settings() {
        let options = Options {
            abbreviations: Some(vec!["GPS".into()]),
            ..Options::default()
        };
        let namer = options.namer();
        assert_eq!(namer.export_name("gps_id"), "GPSId");
    }
}
