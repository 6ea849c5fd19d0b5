use jsonstruct::{Error, Generator, OmitEmpty, UnparsableProperties};
use pretty_assertions::assert_eq;

fn go(generator: Generator, json: &str) -> String {
    let mut generator = generator;
    generator.observe_json_reader(json.as_bytes()).unwrap();
    String::from_utf8(generator.generate().unwrap()).unwrap()
}

fn go_yaml(generator: Generator, yaml: &str) -> String {
    let mut generator = generator;
    generator.observe_yaml_reader(yaml.as_bytes()).unwrap();
    String::from_utf8(generator.generate().unwrap()).unwrap()
}

#[test]
fn empty_input_is_any() {
    assert_eq!(go(Generator::new(), ""), "package main\n\ntype T any\n");
    assert_eq!(go_yaml(Generator::new(), ""), "package main\n\ntype T any\n");
}

#[test]
fn scalars_and_nullability() {
    assert_eq!(go(Generator::new(), "true"), "package main\n\ntype T bool\n");
    assert_eq!(go(Generator::new(), "false null"), "package main\n\ntype T *bool\n");
    assert_eq!(go(Generator::new(), "1 2.5"), "package main\n\ntype T float64\n");
    assert_eq!(go(Generator::new(), "null {}"), "package main\n\ntype T *struct{}\n");
    assert_eq!(go(Generator::new(), "1 \"a\""), "package main\n\ntype T any\n");
}

#[test]
fn number_literals_classify_by_text() {
    assert_eq!(go(Generator::new(), "-0"), "package main\n\ntype T int\n");
    assert_eq!(go(Generator::new(), "1e400"), "package main\n\ntype T float64\n");
    assert_eq!(
        go(Generator::new(), "123456789012345678901234567890"),
        "package main\n\ntype T float64\n"
    );
}

#[test]
fn comments_and_names() {
    let generator = Generator::new()
        .with_package_comment("package demo.")
        .with_package_name("demo")
        .with_type_comment("MyType is my type.")
        .with_type_name("MyType");
    assert_eq!(
        go(generator, "true"),
        "// package demo.\npackage demo\n\n// MyType is my type.\ntype MyType bool\n"
    );
}

#[test]
fn file_header() {
    let generator = Generator::new().with_file_header("// File header.");
    assert_eq!(go(generator, "true"), "// File header.\n\npackage main\n\ntype T bool\n");
}

#[test]
fn timestamps_import_time() {
    assert_eq!(
        go(Generator::new(), r#""1985-04-12T23:20:50.52Z""#),
        "package main\n\nimport (\n\t\"time\"\n)\n\ntype T time.Time\n"
    );
    // one plain string disqualifies the position for good
    assert_eq!(
        go(Generator::new(), r#""x" "1985-04-12T23:20:50.52Z""#),
        "package main\n\ntype T string\n"
    );
}

#[test]
fn auto_omitempty() {
    assert_eq!(
        go(Generator::new(), r#"{"intKey":0,"boolKey":true}{"intKey":0}"#),
        "package main\n\ntype T struct {\n\tBoolKey bool `json:\"boolKey,omitempty\"`\n\tIntKey  int  `json:\"intKey\"`\n}\n"
    );
}

#[test]
fn key_order_does_not_change_output() {
    let a = go(Generator::new(), r#"{"b":1,"a":"x"}{"a":"y"}"#);
    let b = go(Generator::new(), r#"{"a":"x","b":1}{"a":"y"}"#);
    assert_eq!(a, b);
}

#[test]
fn multiple_tags() {
    assert_eq!(
        go(Generator::new().with_add_struct_tag_name("yaml"), r#"{"intKey":0,"boolKey":true}"#),
        "package main\n\ntype T struct {\n\tBoolKey bool `json:\"boolKey\" yaml:\"boolKey\"`\n\tIntKey  int  `json:\"intKey\" yaml:\"intKey\"`\n}\n"
    );
    assert_eq!(
        go(
            Generator::new().with_struct_tag_names(["json", "yaml"]),
            r#"{"intKey":0,"boolKey":true}{"intKey":0}"#
        ),
        "package main\n\ntype T struct {\n\tBoolKey bool `json:\"boolKey,omitempty\" yaml:\"boolKey,omitempty\"`\n\tIntKey  int  `json:\"intKey\" yaml:\"intKey\"`\n}\n"
    );
}

#[test]
fn property_names() {
    assert_eq!(
        go(Generator::new(), r#"{"int--key":0}"#),
        "package main\n\ntype T struct {\n\tIntKey int `json:\"int--key\"`\n}\n"
    );
    assert_eq!(
        go(Generator::new().with_extra_abbreviations(["ABBR"]), r#"{"my-abbr":true}"#),
        "package main\n\ntype T struct {\n\tMyABBR bool `json:\"my-abbr\"`\n}\n"
    );
    assert_eq!(
        go(Generator::new().with_export_name_fn(|s| s.to_uppercase()), r#"{"myproperty":true}"#),
        "package main\n\ntype T struct {\n\tMYPROPERTY bool `json:\"myproperty\"`\n}\n"
    );
    assert_eq!(
        go(Generator::new(), r#"{"a²":1}"#),
        "package main\n\ntype T struct {\n\tA_ int `json:\"a²\"`\n}\n"
    );
    assert_eq!(
        go(Generator::new(), r#"{"Ⅻ":true,"x½":false}"#),
        "package main\n\ntype T struct {\n\tX_ bool `json:\"x½\"`\n\t_  bool `json:\"Ⅻ\"`\n}\n"
    );
    assert_eq!(
        go(Generator::new().with_rename("name", "Rename"), r#"{"name":true}"#),
        "package main\n\ntype T struct {\n\tRename bool `json:\"name\"`\n}\n"
    );
}

#[test]
fn slices_and_objects() {
    assert_eq!(
        go(Generator::new(), r#"{"slice":[]}{"slice":[0]}"#),
        "package main\n\ntype T struct {\n\tSlice []int `json:\"slice\"`\n}\n"
    );
    assert_eq!(go(Generator::new(), "{}"), "package main\n\ntype T struct{}\n");
    assert_eq!(
        go(Generator::new().with_gofmt(false), "{}"),
        "package main\ntype T struct{}\n"
    );
}

#[test]
fn nested_object_presence() {
    assert_eq!(
        go(Generator::new(), r#"{"object":null}{"object":{"int":1}}"#),
        "package main\n\ntype T struct {\n\tObject *struct {\n\t\tInt int `json:\"int\"`\n\t} `json:\"object\"`\n}\n"
    );
    assert_eq!(
        go(Generator::new(), r#"{"object":{}}{"object":{"int":1}}"#),
        "package main\n\ntype T struct {\n\tObject struct {\n\t\tInt int `json:\"int,omitempty\"`\n\t} `json:\"object\"`\n}\n"
    );
    assert_eq!(
        go(Generator::new(), r#"{}{"object":{"int":1}}"#),
        "package main\n\ntype T struct {\n\tObject *struct {\n\t\tInt int `json:\"int\"`\n\t} `json:\"object,omitempty\"`\n}\n"
    );
    assert_eq!(
        go(Generator::new(), r#"{}{"object":null}{"object":{}}"#),
        "package main\n\ntype T struct {\n\tObject *struct{} `json:\"object\"`\n}\n"
    );
    assert_eq!(
        go(Generator::new(), r#"{}{"object":{}}"#),
        "package main\n\ntype T struct {\n\tObject *struct{} `json:\"object,omitempty\"`\n}\n"
    );
}

#[test]
fn json_number_and_imports() {
    assert_eq!(
        go(Generator::new().with_use_json_number(true), r#"{"foo":1}{"foo":2.0}"#),
        "package main\n\nimport (\n\t\"encoding/json\"\n)\n\ntype T struct {\n\tFoo json.Number `json:\"foo\"`\n}\n"
    );
    assert_eq!(
        go(Generator::new().with_imports(["custom_import_two", "custom_import_one"]), "{}"),
        "package main\n\nimport (\n\t\"custom_import_one\"\n\t\"custom_import_two\"\n)\n\ntype T struct{}\n"
    );
}

#[test]
fn string_tags() {
    assert_eq!(
        go(Generator::new().with_string_tags(true), r#"{"n":"1"}{"n":"2"}{"b":"true"}"#),
        "package main\n\ntype T struct {\n\tB bool `json:\"b,omitempty,string\"`\n\tN int  `json:\"n,omitempty,string\"`\n}\n"
    );
}

#[test]
fn unparsable_properties() {
    assert_eq!(
        go(Generator::new(), r#"{"a b":1,"ok":true}"#),
        "package main\n\ntype T struct {\n\tOk bool `json:\"ok\"`\n\t// \"a b\" cannot be unmarshalled into a struct field by encoding/json.\n}\n"
    );
    assert_eq!(
        go(
            Generator::new().with_unparsable_properties(UnparsableProperties::Map),
            r#"{"a b":1,"ok":2}"#
        ),
        "package main\n\ntype T map[string]int\n"
    );
}

#[test]
fn omit_empty_modes() {
    let json = r#"{"a":1}{}"#;
    let tagged = |mode, json| go(Generator::new().with_omit_empty(mode), json);
    assert!(tagged(OmitEmpty::Never, json).contains("`json:\"a\"`"));
    assert!(tagged(OmitEmpty::Auto, json).contains("`json:\"a,omitempty\"`"));
    assert!(tagged(OmitEmpty::Always, r#"{"a":1}"#).contains("`json:\"a,omitempty\"`"));
}

#[test]
fn yaml_documents() {
    assert_eq!(go_yaml(Generator::new(), "true"), "package main\n\ntype T bool\n");
    assert_eq!(go_yaml(Generator::new(), "---\n\"a\"\n---\n\"b\"\n"), "package main\n\ntype T string\n");
    assert_eq!(
        go_yaml(Generator::new().with_struct_tag_name("yaml"), "int: 0\n"),
        "package main\n\ntype T struct {\n\tInt int `yaml:\"int\"`\n}\n"
    );
    let mut generator = Generator::new();
    assert!(matches!(generator.observe_yaml_reader("\"".as_bytes()), Err(Error::Yaml(_))));
}

#[test]
fn example_files() {
    let mut generator = Generator::new();
    generator.observe_json_file("tests/data/example.json").unwrap();
    assert_eq!(
        String::from_utf8(generator.generate().unwrap()).unwrap(),
        "package main\n\ntype T struct {\n\
         \tAge           int      `json:\"age\"`\n\
         \tFavoriteFoods []string `json:\"favoriteFoods,omitempty\"`\n\
         \tUserHeightM   float64  `json:\"user_height_m\"`\n\
         }\n"
    );

    let mut generator = Generator::new()
        .with_file_header("// Code generated by jsonstruct. DO NOT EDIT.")
        .with_package_name("mypackage")
        .with_type_name("MyType");
    generator.observe_yaml_file("tests/data/example.yaml").unwrap();
    assert_eq!(
        String::from_utf8(generator.generate().unwrap()).unwrap(),
        "// Code generated by jsonstruct. DO NOT EDIT.\n\n\
         package mypackage\n\n\
         type MyType struct {\n\
         \tNested struct {\n\
         \t\tBar bool    `json:\"bar\"`\n\
         \t\tFoo *string `json:\"foo\"`\n\
         \t} `json:\"nested\"`\n\
         }\n"
    );
}

#[test]
fn missing_files_are_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = Generator::new().observe_json_file(dir.path().join("not_exist.json")).unwrap_err();
    assert!(err.is_not_found());
    let err = Generator::new().observe_yaml_file(dir.path().join("not_exist.yaml")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn invalid_package_name_fails_to_format() {
    let mut generator = Generator::new().with_package_name("_");
    generator.observe_json_reader("1".as_bytes()).unwrap();
    match generator.generate() {
        Err(Error::Format(err)) => assert_eq!(err.message, "invalid package name _"),
        other => panic!("unexpected result: {other:?}"),
    }
}
