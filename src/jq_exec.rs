//! jq pre-selection: every filter output becomes its own document.
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

use crate::error::{Error, Result};

pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader.load(&arena, program).map_err(format_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(format_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    for item in outputs {
        let v = item.map_err(|e| Error::Jq { message: format!("{e:?}") })?;
        // Val renders as JSON text
        let text = v.to_string();
        let value = serde_json::from_str(&text).map_err(|e| Error::Jq {
            message: format!("filter produced a value that is not JSON ({text}): {e}"),
        })?;
        out.push(value);
    }
    Ok(out)
}

fn format_parse_errors(errs: Vec<(load::File<&str, ()>, load::Error<&str>)>) -> Error {
    let message = errs
        .iter()
        .map(|(file, err)| format!("parse error: {err:?} in `{}`", file.code))
        .collect::<Vec<_>>()
        .join("\n");
    Error::Jq { message }
}

fn format_undefined_errors(errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>) -> Error {
    let message = errs
        .iter()
        .flat_map(|(file, list)| {
            list.iter().map(move |(name, undef)| {
                format!("undefined `{name}`: {undef:?} in `{}`", file.code)
            })
        })
        .collect::<Vec<_>>()
        .join("\n");
    Error::Jq { message }
}
