//! A gofmt for the subset of Go this crate emits.
//!
//! Accepts line comments, one `package` clause, `import` declarations, and
//! `type` declarations built from named, pointer, slice, map, and struct
//! types. Anything else is rejected with a positioned [`FormatError`], so a
//! malformed synthesis result or a bad package/type name never reaches the
//! caller as "formatted" output.
//!
//! Layout follows `go/printer`: tab indentation, one blank line between
//! top-level sections, and struct fields aligned in columns the way
//! `text/tabwriter` aligns them. Two normalizations go further than
//! `go/printer`: imports are always printed as one parenthesized, sorted
//! block, and a struct without fields always prints as `struct{}`.
use std::fmt;

use thiserror::Error;

use crate::ident::is_identifier;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{line}:{column}: {message}")]
pub struct FormatError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

pub type Result<T> = std::result::Result<T, FormatError>;

/// Parses `src` and prints it in gofmt layout.
pub fn format_source(src: &str) -> Result<String> {
    let tokens = Lexer::new(src).tokenize()?;
    let file = Parser { tokens, pos: 0 }.parse_file()?;
    Ok(print_file(&file))
}

// ---- lexer ---- //

const KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

#[derive(Clone, Debug, PartialEq)]
enum Tok {
    Ident(String),
    Number(String),
    /// Interpreted string literal, quotes included.
    Str(String),
    /// Raw string literal, backticks included.
    RawStr(String),
    /// Line comment text, `//` included.
    Comment(String),
    Punct(char),
    /// Explicit `;` or one inserted at a line end.
    Semi { inserted: bool },
    Eof,
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tok::Ident(s) | Tok::Number(s) | Tok::Str(s) | Tok::RawStr(s) => write!(f, "{s}"),
            Tok::Comment(_) => write!(f, "comment"),
            Tok::Punct(c) => write!(f, "'{c}'"),
            Tok::Semi { inserted: true } => write!(f, "newline"),
            Tok::Semi { inserted: false } => write!(f, "';'"),
            Tok::Eof => write!(f, "EOF"),
        }
    }
}

#[derive(Clone, Debug)]
struct Token {
    tok: Tok,
    line: usize,
    column: usize,
}

struct Lexer<'a> {
    src: &'a str,
    offset: usize,
    line: usize,
    line_start: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, offset: 0, line: 1, line_start: 0, tokens: Vec::new() }
    }

    fn column(&self) -> usize {
        self.offset - self.line_start + 1
    }

    fn error(&self, message: impl Into<String>) -> FormatError {
        FormatError { line: self.line, column: self.column(), message: message.into() }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.offset..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.line_start = self.offset;
        }
        Some(c)
    }

    fn push(&mut self, tok: Tok, line: usize, column: usize) {
        self.tokens.push(Token { tok, line, column });
    }

    /// Go's automatic semicolon rule, applied to the last non-comment token.
    fn wants_semi(&self) -> bool {
        let last = self.tokens.iter().rev().find(|t| !matches!(t.tok, Tok::Comment(_)));
        match last.map(|t| &t.tok) {
            Some(Tok::Ident(name)) => {
                !is_keyword(name)
                    || matches!(name.as_str(), "break" | "continue" | "fallthrough" | "return")
            }
            Some(Tok::Number(_) | Tok::Str(_) | Tok::RawStr(_)) => true,
            Some(Tok::Punct(')' | ']' | '}')) => true,
            _ => false,
        }
    }

    fn insert_semi(&mut self) {
        if self.wants_semi() {
            let (line, column) = (self.line, self.column());
            self.push(Tok::Semi { inserted: true }, line, column);
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>> {
        while let Some(c) = self.peek() {
            let (line, column) = (self.line, self.column());
            match c {
                '\n' => {
                    self.insert_semi();
                    self.bump();
                }
                ' ' | '\t' | '\r' => {
                    self.bump();
                }
                '/' if self.src[self.offset..].starts_with("//") => {
                    self.insert_semi();
                    let rest = &self.src[self.offset..];
                    let end = rest.find('\n').unwrap_or(rest.len());
                    let text = rest[..end].trim_end().to_string();
                    self.offset += end;
                    self.push(Tok::Comment(text), line, column);
                }
                '/' if self.src[self.offset..].starts_with("/*") => {
                    return Err(self.error("block comments are not supported"));
                }
                '"' => {
                    let text = self.interpreted_string()?;
                    self.push(Tok::Str(text), line, column);
                }
                '`' => {
                    let text = self.raw_string()?;
                    self.push(Tok::RawStr(text), line, column);
                }
                ';' => {
                    self.bump();
                    self.push(Tok::Semi { inserted: false }, line, column);
                }
                '*' | '[' | ']' | '{' | '}' | '(' | ')' | '.' => {
                    self.bump();
                    self.push(Tok::Punct(c), line, column);
                }
                c if c.is_ascii_digit() => {
                    let text = self.take_while(|c| c.is_alphanumeric() || c == '.' || c == '_');
                    self.push(Tok::Number(text), line, column);
                }
                c if c.is_alphabetic() || c == '_' => {
                    let text = self.take_while(|c| c.is_alphanumeric() || c == '_');
                    if !is_identifier(&text) {
                        return Err(FormatError {
                            line,
                            column,
                            message: format!("invalid identifier {text:?}"),
                        });
                    }
                    self.push(Tok::Ident(text), line, column);
                }
                c => {
                    return Err(self.error(format!("illegal character U+{:04X} {c:?}", c as u32)));
                }
            }
        }
        self.insert_semi();
        let (line, column) = (self.line, self.column());
        self.push(Tok::Eof, line, column);
        Ok(self.tokens)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.offset;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        self.src[start..self.offset].to_string()
    }

    fn interpreted_string(&mut self) -> Result<String> {
        let start = self.offset;
        self.bump();
        loop {
            match self.peek() {
                None | Some('\n') => return Err(self.error("string literal not terminated")),
                Some('\\') => {
                    self.bump();
                    if self.peek().is_none_or(|c| c == '\n') {
                        return Err(self.error("string literal not terminated"));
                    }
                    self.bump();
                }
                Some('"') => {
                    self.bump();
                    return Ok(self.src[start..self.offset].to_string());
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn raw_string(&mut self) -> Result<String> {
        let (line, column) = (self.line, self.column());
        let start = self.offset;
        self.bump();
        loop {
            match self.bump() {
                None => {
                    return Err(FormatError {
                        line,
                        column,
                        message: "raw string literal not terminated".into(),
                    });
                }
                Some('`') => return Ok(self.src[start..self.offset].to_string()),
                Some(_) => {}
            }
        }
    }
}

// ---- syntax tree ---- //

#[derive(Debug, Clone, PartialEq)]
struct CommentGroup {
    lines: Vec<String>,
    /// Directly above the next declaration, no blank line in between.
    attached: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum TypeExpr {
    /// Plain or package-qualified name.
    Name(String),
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
    Struct(Vec<StructItem>),
}

#[derive(Debug, Clone, PartialEq)]
enum StructItem {
    Field { name: String, ty: TypeExpr, tag: Option<String> },
    Comment(String),
}

#[derive(Debug, Clone, PartialEq)]
struct TypeDecl {
    comments: Vec<CommentGroup>,
    name: String,
    ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
struct File {
    comments: Vec<CommentGroup>,
    package: String,
    imports: Vec<String>,
    decls: Vec<TypeDecl>,
    trailing: Vec<CommentGroup>,
}

// ---- parser ---- //

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // the lexer always ends the stream with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn error_at(token: &Token, message: impl Into<String>) -> FormatError {
        FormatError { line: token.line, column: token.column, message: message.into() }
    }

    fn expected(&self, what: &str) -> FormatError {
        let token = self.peek();
        Self::error_at(token, format!("expected {what}, found {}", token.tok))
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(&self.peek().tok, Tok::Ident(s) if s == keyword)
    }

    fn at_punct(&self, c: char) -> bool {
        self.peek().tok == Tok::Punct(c)
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        if !self.at_keyword(keyword) {
            return Err(self.expected(&format!("'{keyword}'")));
        }
        self.next();
        Ok(())
    }

    fn expect_punct(&mut self, c: char) -> Result<()> {
        if !self.at_punct(c) {
            return Err(self.expected(&format!("'{c}'")));
        }
        self.next();
        Ok(())
    }

    fn expect_semi(&mut self) -> Result<()> {
        match self.peek().tok {
            Tok::Semi { .. } => {
                self.next();
                Ok(())
            }
            Tok::Eof => Ok(()),
            _ => Err(self.expected("';' or newline")),
        }
    }

    /// A non-keyword identifier.
    fn name(&mut self, what: &str) -> Result<String> {
        match &self.peek().tok {
            Tok::Ident(s) if !is_keyword(s) => {
                let s = s.clone();
                self.next();
                Ok(s)
            }
            _ => Err(self.expected(what)),
        }
    }

    /// Consecutive comment lines, split into groups at blank lines.
    fn comment_groups(&mut self) -> Vec<CommentGroup> {
        let mut groups: Vec<CommentGroup> = Vec::new();
        let mut last_line = 0;
        loop {
            match &self.peek().tok {
                Tok::Comment(text) => {
                    let text = text.clone();
                    let line = self.peek().line;
                    match groups.last_mut() {
                        Some(group) if line == last_line + 1 => group.lines.push(text),
                        _ => groups.push(CommentGroup { lines: vec![text], attached: false }),
                    }
                    last_line = line;
                    self.next();
                }
                Tok::Semi { inserted: true } => {
                    self.next();
                }
                _ => break,
            }
        }
        let next_line = self.peek().line;
        if let Some(group) = groups.last_mut() {
            group.attached = next_line == last_line + 1;
        }
        groups
    }

    fn parse_file(mut self) -> Result<File> {
        let comments = self.comment_groups();
        self.expect_keyword("package")?;
        let package_token = self.peek().clone();
        let package = self.name("package name")?;
        if package == "_" {
            return Err(Self::error_at(&package_token, "invalid package name _"));
        }
        self.expect_semi()?;

        let mut imports = Vec::new();
        let mut decls = Vec::new();
        loop {
            let groups = self.comment_groups();
            if self.at_keyword("import") {
                if !decls.is_empty() {
                    return Err(Self::error_at(
                        self.peek(),
                        "imports must appear before other declarations",
                    ));
                }
                if !groups.is_empty() {
                    return Err(Self::error_at(
                        self.peek(),
                        "comments on import declarations are not supported",
                    ));
                }
                self.parse_import(&mut imports)?;
            } else if self.at_keyword("type") {
                self.next();
                let name = self.name("type name")?;
                let ty = self.parse_type()?;
                self.expect_semi()?;
                decls.push(TypeDecl { comments: groups, name, ty });
            } else if self.peek().tok == Tok::Eof {
                return Ok(File { comments, package, imports, decls, trailing: groups });
            } else {
                return Err(self.expected("declaration"));
            }
        }
    }

    fn parse_import(&mut self, imports: &mut Vec<String>) -> Result<()> {
        self.expect_keyword("import")?;
        if self.at_punct('(') {
            self.next();
            loop {
                match self.peek().tok {
                    Tok::Punct(')') => break,
                    Tok::Semi { .. } => {
                        self.next();
                    }
                    _ => {
                        imports.push(self.import_path()?);
                        if !self.at_punct(')') {
                            self.expect_semi()?;
                        }
                    }
                }
            }
            self.expect_punct(')')?;
        } else {
            imports.push(self.import_path()?);
        }
        self.expect_semi()
    }

    fn import_path(&mut self) -> Result<String> {
        let token = self.peek().clone();
        match &token.tok {
            Tok::Str(path) if path.len() > 2 => {
                self.next();
                Ok(path.clone())
            }
            Tok::Str(path) => {
                Err(Self::error_at(&token, format!("invalid import path: {path}")))
            }
            _ => Err(self.expected("import path")),
        }
    }

    fn parse_type(&mut self) -> Result<TypeExpr> {
        let token = self.peek().clone();
        match &token.tok {
            Tok::Punct('*') => {
                self.next();
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            Tok::Punct('[') => {
                self.next();
                self.expect_punct(']')?;
                Ok(TypeExpr::Slice(Box::new(self.parse_type()?)))
            }
            Tok::Ident(s) if s == "map" => {
                self.next();
                self.expect_punct('[')?;
                let key = self.parse_type()?;
                self.expect_punct(']')?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map(Box::new(key), Box::new(value)))
            }
            Tok::Ident(s) if s == "struct" => {
                self.next();
                self.parse_struct_body()
            }
            Tok::Ident(s) if !is_keyword(s) => {
                self.next();
                if self.at_punct('.') {
                    self.next();
                    let selector = self.name("selector")?;
                    Ok(TypeExpr::Name(format!("{s}.{selector}")))
                } else {
                    Ok(TypeExpr::Name(s.clone()))
                }
            }
            _ => Err(self.expected("type")),
        }
    }

    fn parse_struct_body(&mut self) -> Result<TypeExpr> {
        self.expect_punct('{')?;
        let mut items = Vec::new();
        loop {
            let token = self.peek().clone();
            match token.tok {
                Tok::Punct('}') => break,
                Tok::Comment(text) => {
                    self.next();
                    items.push(StructItem::Comment(text));
                }
                Tok::Semi { .. } => {
                    self.next();
                }
                Tok::Ident(_) => {
                    let name = self.name("field name")?;
                    let ty = self.parse_type()?;
                    let tag = match &self.peek().tok {
                        Tok::Str(s) | Tok::RawStr(s) => {
                            let s = s.clone();
                            self.next();
                            Some(s)
                        }
                        _ => None,
                    };
                    if !self.at_punct('}') {
                        self.expect_semi()?;
                    }
                    items.push(StructItem::Field { name, ty, tag });
                }
                _ => return Err(self.expected("field name or '}'")),
            }
        }
        self.expect_punct('}')?;
        Ok(TypeExpr::Struct(items))
    }
}

// ---- printer ---- //

fn print_file(file: &File) -> String {
    let mut out = String::new();
    print_comments(&mut out, &file.comments);
    out.push_str("package ");
    out.push_str(&file.package);
    out.push('\n');

    let mut imports: Vec<&str> = file.imports.iter().map(String::as_str).collect();
    imports.sort_by(|a, b| unquote(a).cmp(unquote(b)));
    imports.dedup();
    if !imports.is_empty() {
        out.push_str("\nimport (\n");
        for path in imports {
            out.push('\t');
            out.push_str(path);
            out.push('\n');
        }
        out.push_str(")\n");
    }

    for decl in &file.decls {
        out.push('\n');
        print_comments(&mut out, &decl.comments);
        out.push_str("type ");
        out.push_str(&decl.name);
        out.push(' ');
        print_type(&mut out, &decl.ty, 0);
        out.push('\n');
    }

    for group in &file.trailing {
        out.push('\n');
        for line in &group.lines {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

fn unquote(literal: &str) -> &str {
    literal.trim_matches('"')
}

fn print_comments(out: &mut String, groups: &[CommentGroup]) {
    for group in groups {
        for line in &group.lines {
            out.push_str(line);
            out.push('\n');
        }
        if !group.attached {
            out.push('\n');
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

fn print_type(out: &mut String, ty: &TypeExpr, depth: usize) {
    match ty {
        TypeExpr::Name(name) => out.push_str(name),
        TypeExpr::Pointer(inner) => {
            out.push('*');
            print_type(out, inner, depth);
        }
        TypeExpr::Slice(elem) => {
            out.push_str("[]");
            print_type(out, elem, depth);
        }
        TypeExpr::Map(key, value) => {
            out.push_str("map[");
            print_type(out, key, depth);
            out.push(']');
            print_type(out, value, depth);
        }
        TypeExpr::Struct(items) if items.is_empty() => out.push_str("struct{}"),
        TypeExpr::Struct(items) => {
            out.push_str("struct {\n");
            print_struct_body(out, items, depth + 1);
            indent(out, depth);
            out.push('}');
        }
    }
}

/// Struct fields at `depth`, aligned section by section. A section ends
/// after a field whose type spans several lines, and at comment lines.
fn print_struct_body(out: &mut String, items: &[StructItem], depth: usize) {
    // go/printer separates the only field's parts with blanks instead of cells
    let single = items.iter().filter(|item| matches!(item, StructItem::Field { .. })).count() == 1;
    let mut section: Vec<Vec<String>> = Vec::new();

    for item in items {
        match item {
            StructItem::Comment(text) => {
                flush_section(out, &mut section, depth);
                indent(out, depth);
                out.push_str(text);
                out.push('\n');
            }
            StructItem::Field { name, ty, tag } => {
                let mut ty_text = String::new();
                print_type(&mut ty_text, ty, depth);
                if let Some((first, rest)) = ty_text.split_once('\n') {
                    if single {
                        section.push(vec![format!("{name} {first}")]);
                    } else {
                        section.push(vec![name.clone(), first.to_string()]);
                    }
                    flush_section(out, &mut section, depth);
                    out.push_str(rest);
                    if let Some(tag) = tag {
                        out.push(' ');
                        out.push_str(tag);
                    }
                    out.push('\n');
                    continue;
                }
                let row = match (single, tag) {
                    (true, Some(tag)) => vec![format!("{name} {ty_text} {tag}")],
                    (true, None) => vec![format!("{name} {ty_text}")],
                    (false, Some(tag)) => vec![name.clone(), ty_text, tag.clone()],
                    (false, None) => vec![name.clone(), ty_text],
                };
                section.push(row);
            }
        }
    }
    flush_section(out, &mut section, depth);
}

fn flush_section(out: &mut String, section: &mut Vec<Vec<String>>, depth: usize) {
    for line in align(section) {
        indent(out, depth);
        out.push_str(&line);
        out.push('\n');
    }
    section.clear();
}

// ---- tabwriter ---- //

/// Pads cells the way `text/tabwriter` does with padding 1. Every row's
/// last cell is trailing text and never padded; a column block is a run of
/// consecutive rows that all have a terminated cell in that column.
fn align(rows: &[Vec<String>]) -> Vec<String> {
    let mut widths = vec![Vec::new(); rows.len()];
    column_widths(rows, 0, 0, rows.len(), &mut widths);

    rows.iter()
        .zip(widths)
        .map(|(cells, widths)| {
            let mut line = String::new();
            if let Some((trailing, terminated)) = cells.split_last() {
                for (cell, width) in terminated.iter().zip(widths) {
                    line.push_str(cell);
                    let pad = width.saturating_sub(cell.chars().count());
                    line.extend(std::iter::repeat_n(' ', pad));
                }
                line.push_str(trailing);
            }
            line
        })
        .collect()
}

fn terminated_cells(row: &[String]) -> usize {
    row.len().saturating_sub(1)
}

fn column_widths(
    rows: &[Vec<String>],
    column: usize,
    start: usize,
    end: usize,
    widths: &mut [Vec<usize>],
) {
    let mut this = start;
    while this < end {
        if column >= terminated_cells(&rows[this]) {
            this += 1;
            continue;
        }
        let block = this;
        let mut width = 0;
        while this < end && column < terminated_cells(&rows[this]) {
            width = width.max(rows[this][column].chars().count() + 1);
            this += 1;
        }
        for row in &mut widths[block..this] {
            row.push(width);
        }
        column_widths(rows, column + 1, block, this, widths);
    }
}

// ------------------------------- Tests ----------------------------------- //
