use std::fmt::Display;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Deserialize JSON with the failing field's path in the error.
pub fn from_json_str<T: DeserializeOwned>(src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize(de).map_err(with_path)
}

/// Deserialize YAML with the failing field's path in the error.
pub fn from_yaml_str<T: DeserializeOwned>(src: &str) -> Result<T> {
    let de = serde_yaml::Deserializer::from_str(src);
    serde_path_to_error::deserialize(de).map_err(with_path)
}

fn with_path<E: Display>(err: serde_path_to_error::Error<E>) -> Error {
    Error::Config {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    }
}
