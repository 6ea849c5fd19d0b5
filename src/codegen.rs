//! Raw Go text from the type IR.
//!
//! Output here is unformatted: one field per line, single spaces, no
//! indentation. `gofmt::format_source` turns it into the final layout.
use std::collections::BTreeSet;
use std::fmt::Write;

use crate::ir::{Field, Struct, Tag, Ty};
use crate::options::Options;

// ---- types ---- //

pub fn render_type(ty: &Ty) -> String {
    let mut out = String::new();
    write_type(&mut out, ty);
    out
}

fn write_type(out: &mut String, ty: &Ty) {
    match ty {
        Ty::Any => out.push_str("any"),
        Ty::Bool => out.push_str("bool"),
        Ty::Float64 => out.push_str("float64"),
        Ty::Int(name) => out.push_str(name),
        Ty::Number => out.push_str("json.Number"),
        Ty::Time => out.push_str("time.Time"),
        Ty::String => out.push_str("string"),
        Ty::Slice(elem) => {
            out.push_str("[]");
            write_type(out, elem);
        }
        Ty::Map(value) => {
            out.push_str("map[string]");
            write_type(out, value);
        }
        Ty::Pointer(inner) => {
            out.push('*');
            write_type(out, inner);
        }
        Ty::Struct(st) => write_struct(out, st),
    }
}

fn write_struct(out: &mut String, st: &Struct) {
    if st.fields.is_empty() && st.unparsable.is_empty() {
        out.push_str("struct{}");
        return;
    }
    out.push_str("struct {\n");
    for field in &st.fields {
        write_field(out, field);
    }
    for property in &st.unparsable {
        let _ = writeln!(
            out,
            "// {} cannot be unmarshalled into a struct field by encoding/json.",
            go_quote(property)
        );
    }
    out.push('}');
}

fn write_field(out: &mut String, field: &Field) {
    out.push_str(&field.name);
    out.push(' ');
    write_type(out, &field.ty);
    if !field.tag.keys.is_empty() {
        out.push(' ');
        out.push_str(&render_tag(&field.property, &field.tag));
    }
    out.push('\n');
}

/// `` `json:"key,omitempty" yaml:"key,omitempty"` ``
pub fn render_tag(property: &str, tag: &Tag) -> String {
    let mut options = String::new();
    if tag.omit_empty {
        options.push_str(",omitempty");
    }
    if tag.string {
        options.push_str(",string");
    }
    let body = tag
        .keys
        .iter()
        .map(|key| format!("{key}:\"{property}{options}\""))
        .collect::<Vec<_>>()
        .join(" ");
    format!("`{body}`")
}

/// Double-quoted Go string literal for `s`, escaped the way Go's `%q` does.
pub fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            c if (c as u32) < 0x80 && c.is_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if c.is_control() => {
                if (c as u32) <= 0xFFFF {
                    let _ = write!(out, "\\u{:04x}", c as u32);
                } else {
                    let _ = write!(out, "\\U{:08x}", c as u32);
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// ---- file ---- //

/// Assembles the whole unformatted source file.
pub fn assemble(options: &Options, imports: &BTreeSet<String>, ty: &Ty) -> String {
    let mut out = String::new();
    if let Some(header) = &options.file_header {
        out.push_str(header);
        out.push_str("\n\n");
    }
    if let Some(comment) = &options.package_comment {
        write_comment(&mut out, comment);
    }
    let _ = writeln!(out, "package {}", options.package_name);

    let imports: BTreeSet<&str> = imports
        .iter()
        .map(String::as_str)
        .chain(options.imports.iter().map(String::as_str))
        .collect();
    if !imports.is_empty() {
        out.push_str("import (\n");
        for path in imports {
            let _ = writeln!(out, "{}", go_quote(path));
        }
        out.push_str(")\n");
    }

    if let Some(comment) = &options.type_comment {
        write_comment(&mut out, comment);
    }
    let _ = writeln!(out, "type {} {}", options.type_name, render_type(ty));
    out
}

fn write_comment(out: &mut String, comment: &str) {
    for line in comment.lines() {
        let _ = writeln!(out, "// {line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tag(omit_empty: bool) -> Tag {
        Tag { keys: vec!["json".into()], omit_empty, string: false }
    }

    #[test]
    fn nested_types() {
        assert_eq!(render_type(&Ty::slice(Ty::pointer(Ty::Time))), "[]*time.Time");
        assert_eq!(render_type(&Ty::map(Ty::Int("int64".into()))), "map[string]int64");
        assert_eq!(render_type(&Ty::pointer(Ty::Struct(Struct::default()))), "*struct{}");
    }

    #[test]
    fn struct_with_fields_and_comments() {
        let st = Struct {
            fields: vec![Field {
                name: "ID".into(),
                property: "id".into(),
                ty: Ty::Int("int".into()),
                tag: tag(true),
            }],
            unparsable: vec!["a b".into()],
        };
        assert_eq!(
            render_type(&Ty::Struct(st)),
            "struct {\nID int `json:\"id,omitempty\"`\n// \"a b\" cannot be unmarshalled into a struct field by encoding/json.\n}"
        );
    }

    #[test]
    fn tags_repeat_per_key() {
        let tag = Tag { keys: vec!["json".into(), "yaml".into()], omit_empty: true, string: true };
        assert_eq!(
            render_tag("n", &tag),
            "`json:\"n,omitempty,string\" yaml:\"n,omitempty,string\"`"
        );
    }

    #[test]
    fn quoting() {
        assert_eq!(go_quote("a \"b\""), r#""a \"b\"""#);
        assert_eq!(go_quote("tab\there"), r#""tab\there""#);
        assert_eq!(go_quote("\u{1}"), r#""\x01""#);
        assert_eq!(go_quote("é"), "\"é\"");
    }

    #[test]
    fn raw_file_layout() {
        let options = Options {
            file_header: Some("// Header.".into()),
            package_comment: Some("Package demo.".into()),
            package_name: "demo".into(),
            type_comment: Some("Doc line one.\nDoc line two.".into()),
            imports: vec!["fmt".into()],
            ..Options::default()
        };
        let imports = BTreeSet::from(["time".to_string()]);
        assert_eq!(
            assemble(&options, &imports, &Ty::Time),
            "// Header.\n\n// Package demo.\npackage demo\nimport (\n\"fmt\"\n\"time\"\n)\n// Doc line one.\n// Doc line two.\ntype T time.Time\n"
        );
        assert_eq!(
            assemble(&Options::default(), &BTreeSet::new(), &Ty::Struct(Struct::default())),
            "package main\ntype T struct{}\n"
        );
    }
}
