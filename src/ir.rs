// Strongly-typed Go type expressions produced by synthesis. Rendering lives in codegen.

#[derive(Debug, Clone, PartialEq)]
pub enum Ty {
    Any,
    Bool,
    Float64,
    /// Configured integer spelling (`int`, `int64`, ...).
    Int(String),
    /// `json.Number`
    Number,
    /// `time.Time`
    Time,
    String,
    Slice(Box<Ty>),
    /// `map[string]V`
    Map(Box<Ty>),
    Pointer(Box<Ty>),
    Struct(Struct),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Struct {
    pub fields: Vec<Field>,      // sorted by property
    pub unparsable: Vec<String>, // properties left out, rendered as comments
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,     // Go identifier
    pub property: String, // wire name
    pub ty: Ty,
    pub tag: Tag,
}

/// One struct tag payload, repeated for every tag key (`json`, `yaml`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub keys: Vec<String>,
    pub omit_empty: bool,
    pub string: bool,
}

impl Ty {
    pub fn pointer(ty: Ty) -> Ty {
        Ty::Pointer(Box::new(ty))
    }

    pub fn slice(ty: Ty) -> Ty {
        Ty::Slice(Box::new(ty))
    }

    pub fn map(ty: Ty) -> Ty {
        Ty::Map(Box::new(ty))
    }

    /// Import path the type needs, if any.
    pub fn import(&self) -> Option<&'static str> {
        match self {
            Ty::Number => Some("encoding/json"),
            Ty::Time => Some("time"),
            _ => None,
        }
    }
}
