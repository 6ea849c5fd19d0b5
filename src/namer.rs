//! Property name → exported Go identifier.
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::ident;

/// Acronyms kept fully upper-cased when they appear as a name component.
pub static DEFAULT_ABBREVIATIONS: Lazy<BTreeSet<String>> = Lazy::new(|| {
    [
        "ACL", "API", "DB", "HTTP", "HTTPS", "ID", "JSON", "OS", "SQL", "SSH", "URI", "URL",
        "UUID", "XML", "YAML",
    ]
    .into_iter()
    .map(String::from)
    .collect()
});

pub type ExportNameFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Derives Go field names from JSON/YAML property names.
///
/// Lookup order: explicit rename, custom function, then the
/// abbreviation-aware default.
#[derive(Clone)]
pub struct ExportNamer {
    abbreviations: BTreeSet<String>,
    renames: IndexMap<String, String>,
    custom: Option<ExportNameFn>,
}

impl fmt::Debug for ExportNamer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportNamer")
            .field("abbreviations", &self.abbreviations)
            .field("renames", &self.renames)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

impl Default for ExportNamer {
    fn default() -> Self {
        Self {
            abbreviations: DEFAULT_ABBREVIATIONS.clone(),
            renames: IndexMap::new(),
            custom: None,
        }
    }
}

impl ExportNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abbreviations(&self) -> &BTreeSet<String> {
        &self.abbreviations
    }

    pub fn set_abbreviations<I, S>(&mut self, abbreviations: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abbreviations = abbreviations.into_iter().map(Into::into).collect();
    }

    pub fn add_abbreviations<I, S>(&mut self, abbreviations: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abbreviations.extend(abbreviations.into_iter().map(Into::into));
    }

    pub fn set_renames(&mut self, renames: IndexMap<String, String>) {
        self.renames = renames;
    }

    pub fn add_rename(&mut self, property: impl Into<String>, name: impl Into<String>) {
        self.renames.insert(property.into(), name.into());
    }

    pub fn set_custom(&mut self, custom: ExportNameFn) {
        self.custom = Some(custom);
    }

    pub fn export_name(&self, property: &str) -> String {
        if let Some(name) = self.renames.get(property) {
            return name.clone();
        }
        match &self.custom {
            Some(custom) => custom(property),
            None => default_export_name(property, &self.abbreviations),
        }
    }
}

/// Abbreviation-aware exported name for `name`.
pub fn default_export_name(name: &str, abbreviations: &BTreeSet<String>) -> String {
    let joined: String = split_components(name)
        .iter()
        .map(|component| transform_component(component, abbreviations))
        .collect();

    ident::sanitize(&joined)
}

fn transform_component(component: &str, abbreviations: &BTreeSet<String>) -> String {
    if component.is_empty() {
        return String::new();
    }
    let upper = component.to_uppercase();
    if abbreviations.contains(&upper) {
        return upper;
    }
    if let Some(stem) = component.strip_suffix('s') {
        let stem_upper = stem.to_uppercase();
        if !stem.is_empty() && abbreviations.contains(&stem_upper) {
            return stem_upper + "s";
        }
    }
    let mut chars = component.chars();
    let Some(first) = chars.next() else { return String::new() };
    if component == upper {
        // SHOUTING → Shouting
        let mut out = first.to_string();
        out.push_str(&chars.as_str().to_lowercase());
        out
    } else {
        let mut out: String = first.to_uppercase().collect();
        out.push_str(chars.as_str());
        out
    }
}

/// Splits kebab case, snake case, or camel case into components.
/// Empty components (from `a--b`) are kept.
pub fn split_components(name: &str) -> Vec<String> {
    if name.contains('-') {
        name.split('-').map(String::from).collect()
    } else if name.contains('_') {
        name.split('_').map(String::from).collect()
    } else {
        split_camel_case(name)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Lower,
    Upper,
    Digit,
    Other,
}

fn char_class(c: char) -> CharClass {
    if c.is_lowercase() {
        CharClass::Lower
    } else if c.is_uppercase() {
        CharClass::Upper
    } else if ident::is_decimal_digit(c) {
        CharClass::Digit
    } else {
        CharClass::Other
    }
}

/// Camel case segmentation by character class runs; an upper-case run
/// followed by a lower-case run hands its last letter over
/// (`PDFLoader` → `PDF`, `Loader`).
pub fn split_camel_case(name: &str) -> Vec<String> {
    let mut runs: Vec<Vec<char>> = Vec::new();
    let mut last = None;
    for c in name.chars() {
        let class = char_class(c);
        match runs.last_mut() {
            Some(run) if last == Some(class) => run.push(c),
            _ => runs.push(vec![c]),
        }
        last = Some(class);
    }

    for i in 0..runs.len().saturating_sub(1) {
        let upper_then_lower = runs[i].first().is_some_and(|c| c.is_uppercase())
            && runs[i + 1].first().is_some_and(|c| c.is_lowercase());
        if upper_then_lower {
            if let Some(moved) = runs[i].pop() {
                runs[i + 1].insert(0, moved);
            }
        }
    }

    runs.into_iter()
        .filter(|run| !run.is_empty())
        .map(|run| run.into_iter().collect())
        .collect()
}

// ------------------------------- Tests ----------------------------------- //
