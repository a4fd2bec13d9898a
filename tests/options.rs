//! Behavioural tests for parse and serialize options through the public API.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use xmldict::{
    parse_file, parse_file_with_options, parse_str, parse_str_with_options, to_xml,
    to_xml_with_options, AttributesMode, DocumentMap, Error, KeySpace, NodeNameMode,
    ParseOptions, SerializeOptions, Value,
};

const CATALOG: &str = r#"<root><book id="bk101">Title</book><book id="bk102">Extra</book></root>"#;
const CATALOG_BOOKS: &str = "<book id=\"bk101\">Title</book>\n<book id=\"bk102\">Extra</book>";

fn map(entries: Vec<(&str, Value)>) -> DocumentMap {
    entries.into_iter().collect()
}

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("xmldict-{}-{name}", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_book_catalog_defaults() {
    let result = parse_str(CATALOG).unwrap();
    let expected = map(vec![
        ("__name", "root".into()),
        (
            "book",
            Value::List(vec![
                map(vec![("_id", "bk101".into()), ("__text", "Title".into())]).into(),
                map(vec![("_id", "bk102".into()), ("__text", "Extra".into())]).into(),
            ]),
        ),
    ]);
    assert_eq!(result, expected);
}

#[test]
fn test_array_promotion() {
    let result = parse_str("<r><a>1</a><a>2</a><b>3</b></r>").unwrap();
    assert_eq!(result["a"].as_list().unwrap().len(), 2);
    assert_eq!(result["b"], "3");
}

#[test]
fn test_attribute_modes_agree() {
    let xml = r#"<r><item id="7" kind="x" note="a &amp; b">v</item></r>"#;
    let prefixed = parse_str(xml).unwrap();
    let dictionary = parse_str_with_options(
        xml,
        &ParseOptions::default().attributes_mode(AttributesMode::Dictionary),
    )
    .unwrap();

    let left = prefixed["item"].as_map().unwrap().attributes().unwrap();
    let right = dictionary["item"].as_map().unwrap().attributes().unwrap();
    assert_eq!(left, right);
    assert_eq!(left["note"], "a & b");
}

#[test]
fn test_empty_element_policy() {
    let stripped = parse_str("<r><a/><b>x</b></r>").unwrap();
    assert!(stripped.get("a").is_none());

    let opts = ParseOptions::default()
        .strip_empty_nodes(false)
        .collapse_text_nodes(false);
    let kept = parse_str_with_options("<r><a/><b>x</b></r>", &opts).unwrap();
    assert_eq!(kept["a"].as_map().unwrap().inner_text().unwrap(), "");
    assert_eq!(kept["b"]["__text"], "x");
}

#[test]
fn test_empty_root_marker() {
    let opts = ParseOptions::default()
        .strip_empty_nodes(false)
        .collapse_text_nodes(false);
    let result = parse_str_with_options("<r/>", &opts).unwrap();
    assert_eq!(result, map(vec![("__name", "r".into()), ("__text", "".into())]));

    // Defaults never strip or collapse the root itself.
    let result = parse_str("<r/>").unwrap();
    assert_eq!(result, map(vec![("__name", "r".into())]));
    let result = parse_str("<r>only text</r>").unwrap();
    assert_eq!(result["__text"], "only text");
}

#[test]
fn test_serialize_fragment_and_forced_root() {
    let m = map(vec![("a", "x".into())]);
    assert_eq!(to_xml(&m), "<a>x</a>");
    let opts = SerializeOptions::default().force_root(true);
    assert_eq!(to_xml_with_options(&m, &opts), "<root><a>x</a></root>");
}

#[test]
fn test_roundtrip_with_comments_and_names() {
    let opts = ParseOptions::default()
        .preserve_comments(true)
        .node_name_mode(NodeNameMode::Always)
        .collapse_text_nodes(false);
    let xml = "<doc><!-- header --><section><title>One</title></section><section><title>Two</title></section></doc>";
    let first = parse_str_with_options(xml, &opts).unwrap();
    assert_eq!(first["section"][1]["title"]["__name"], "title");

    let rendered = to_xml(&first);
    assert!(rendered.starts_with("<doc><!-- header -->\n<section>"), "{rendered}");
    let second = parse_str_with_options(&rendered, &opts).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_wrapped_root_roundtrip() {
    let opts = ParseOptions::default().wrap_root_node(true);
    let first = parse_str_with_options(CATALOG, &opts).unwrap();
    assert_eq!(first["root"]["book"][0]["_id"], "bk101");

    let rendered = to_xml(&first);
    assert!(rendered.starts_with("<root><book"), "{rendered}");
    let second = parse_str_with_options(&rendered, &opts).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_custom_key_space_roundtrip() {
    let keys = KeySpace {
        text: "#text".into(),
        node_name: "#name".into(),
        attribute_prefix: "@".into(),
        ..KeySpace::default()
    };
    let parse_opts = ParseOptions::default().keys(keys.clone());
    let first = parse_str_with_options(CATALOG, &parse_opts).unwrap();
    assert_eq!(first["#name"], "root");
    assert_eq!(first["book"][1]["@id"], "bk102");

    let rendered = to_xml_with_options(&first, &SerializeOptions::default().keys(keys));
    assert_eq!(rendered, format!("<root>{}</root>", CATALOG_BOOKS));
}

#[test]
fn test_parse_file() {
    let path = temp_file("catalog.xml", CATALOG);
    let from_file = parse_file(&path).unwrap();
    let opts = ParseOptions::default().always_use_arrays(true);
    let with_options = parse_file_with_options(&path, &opts).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(from_file, parse_str(CATALOG).unwrap());
    assert_eq!(with_options["book"].as_list().unwrap().len(), 2);
}

#[test]
fn test_parse_missing_file() {
    let path = std::env::temp_dir().join("xmldict-definitely-missing.xml");
    let err = parse_file(&path).unwrap_err();
    match &err {
        Error::Io { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("expected an I/O error, got {other:?}"),
    }
    assert!(std::error::Error::source(&err).is_some());
    assert!(err.location().is_none());
}

#[test]
fn test_options_are_reusable_across_threads() {
    let opts = ParseOptions::default().always_use_arrays(true);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let opts = opts.clone();
            std::thread::spawn(move || {
                let xml = format!("<r><n>{i}</n></r>");
                parse_str_with_options(&xml, &opts).unwrap()
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.join().unwrap();
        assert_eq!(result["n"][0], i.to_string().as_str());
    }
}
