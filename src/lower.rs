//! Type synthesis: `ValueSummary` → Go type expression.
//!
//! `observations` passed alongside a summary is how often the *parent* was
//! seen (0 at the root and for array elements). A child seen fewer times
//! than its parent was sometimes absent, which is what drives `omitempty`.
use std::collections::BTreeSet;

use tracing::trace;

use crate::inference::{Kind, ValueSummary};
use crate::ir::{Field, Struct, Tag, Ty};
use crate::namer::ExportNamer;
use crate::options::{OmitEmpty, Options, UnparsableProperties};

/// A synthesized type plus what the enclosing struct tag should say about it.
#[derive(Debug, Clone, PartialEq)]
pub struct Lowered {
    pub ty: Ty,
    pub omit_empty: bool,
    /// Value travels as a JSON string (`,string` tag option).
    pub string: bool,
}

impl Lowered {
    fn new(ty: Ty, omit_empty: bool) -> Self {
        Self { ty, omit_empty, string: false }
    }
}

const NON_NULL_KINDS: [Kind; 6] = [
    Kind::Array,
    Kind::Bool,
    Kind::Float64,
    Kind::Int,
    Kind::Object,
    Kind::String,
];

/// Keys that cannot be spelled inside a Go struct tag.
pub fn is_unparsable_property(key: &str) -> bool {
    key.contains([' ', '"', ',', '`'])
}

pub struct Lowerer<'a> {
    options: &'a Options,
    namer: &'a ExportNamer,
    imports: BTreeSet<String>,
}

impl<'a> Lowerer<'a> {
    pub fn new(options: &'a Options, namer: &'a ExportNamer) -> Self {
        Self { options, namer, imports: BTreeSet::new() }
    }

    /// Imports required by every type lowered so far.
    pub fn imports(&self) -> &BTreeSet<String> {
        &self.imports
    }

    pub fn into_imports(self) -> BTreeSet<String> {
        self.imports
    }

    fn require(&mut self, ty: Ty) -> Ty {
        if let Some(path) = ty.import() {
            self.imports.insert(path.to_string());
        }
        ty
    }

    fn int_type(&self) -> Ty {
        Ty::Int(self.options.int_type.clone())
    }

    /// Most specific type consistent with everything observed at `v`.
    pub fn lower(&mut self, v: &ValueSummary, observations: usize) -> Lowered {
        let kinds: Vec<Kind> = NON_NULL_KINDS
            .into_iter()
            .filter(|&k| v.count(k) > 0)
            .collect();

        match kinds.as_slice() {
            [Kind::Array] => {
                let none = ValueSummary::default();
                let elements = v.array_elements.as_deref().unwrap_or(&none);
                let element = self.lower(elements, 0);
                Lowered::new(
                    Ty::slice(element.ty),
                    v.arrays + v.nulls < observations && v.empties == 0,
                )
            }
            [Kind::Bool] => scalar(v, Ty::Bool, v.bools, observations),
            [Kind::Float64] => scalar(v, Ty::Float64, v.float64s, observations),
            [Kind::Int] => scalar(v, self.int_type(), v.ints, observations),
            [Kind::Float64, Kind::Int] => {
                let ty = if self.options.use_json_number {
                    self.require(Ty::Number)
                } else {
                    Ty::Float64
                };
                scalar(v, ty, v.float64s + v.ints, observations)
            }
            [Kind::Object] => self.lower_object(v, observations),
            [Kind::String] => self.lower_string(v, observations),
            // nothing, only nulls, or an incompatible mix
            _ => Lowered::new(Ty::Any, v.kind_total() < observations),
        }
    }

    fn lower_string(&mut self, v: &ValueSummary, observations: usize) -> Lowered {
        if v.all_times() {
            let ty = self.require(Ty::Time);
            return if v.nulls > 0 {
                Lowered::new(Ty::pointer(ty), false)
            } else {
                Lowered::new(ty, v.times < observations)
            };
        }
        if v.nulls > 0 {
            return Lowered::new(Ty::pointer(Ty::String), false);
        }

        let omit_empty = v.strings < observations && v.empties == 0;
        if self.options.string_tags {
            let encoded = if v.bool_strings == v.strings {
                Some(Ty::Bool)
            } else if v.int_strings == v.strings {
                Some(self.int_type())
            } else if v.float64_strings == v.strings {
                Some(Ty::Float64)
            } else {
                None
            };
            if let Some(ty) = encoded {
                return Lowered { ty, omit_empty, string: true };
            }
        }
        Lowered::new(Ty::String, omit_empty)
    }

    fn lower_object(&mut self, v: &ValueSummary, observations: usize) -> Lowered {
        if v.object_properties.is_empty() {
            let empty = Ty::Struct(Struct::default());
            return if observations == 0 && v.nulls == 0 {
                Lowered::new(empty, false)
            } else if v.nulls > 0 {
                Lowered::new(Ty::pointer(empty), false)
            } else if v.objects == observations {
                Lowered::new(empty, false)
            } else {
                Lowered::new(Ty::pointer(empty), v.objects < observations)
            };
        }

        let has_unparsable = v.object_properties.keys().any(|k| is_unparsable_property(k));
        if has_unparsable && self.options.unparsable_properties == UnparsableProperties::Map {
            let none = ValueSummary::default();
            let values = v.all_object_properties.as_deref().unwrap_or(&none);
            let value = self.lower(values, 0);
            return Lowered::new(Ty::map(value.ty), v.objects + v.nulls < observations);
        }

        let mut st = Struct::default();
        for (property, child) in &v.object_properties {
            if is_unparsable_property(property) {
                st.unparsable.push(property.clone());
                continue;
            }
            let lowered = self.lower(child, v.objects);
            let omit_empty = match self.options.omit_empty {
                OmitEmpty::Never => false,
                OmitEmpty::Always => true,
                OmitEmpty::Auto => lowered.omit_empty,
            };
            st.fields.push(Field {
                name: self.namer.export_name(property),
                property: property.clone(),
                ty: lowered.ty,
                tag: Tag {
                    keys: self.options.struct_tag_names.clone(),
                    omit_empty,
                    string: lowered.string,
                },
            });
        }
        trace!(
            fields = st.fields.len(),
            unparsable = st.unparsable.len(),
            objects = v.objects,
            nulls = v.nulls,
            "synthesized struct"
        );

        let ty = Ty::Struct(st);
        if observations == 0 || v.objects == observations {
            Lowered::new(ty, false)
        } else if v.nulls == 0 {
            // sometimes absent, never null
            Lowered::new(Ty::pointer(ty), true)
        } else {
            Lowered::new(Ty::pointer(ty), v.objects + v.nulls < observations)
        }
    }
}

fn scalar(v: &ValueSummary, ty: Ty, count: usize, observations: usize) -> Lowered {
    if v.nulls > 0 {
        Lowered::new(Ty::pointer(ty), false)
    } else {
        Lowered::new(ty, count < observations && v.empties == 0)
    }
}

// ------------------------------- Tests ------------------------------------ //
