use std::rc::Rc;

use pretty_assertions::assert_eq;
use weft_core::{Host, Value};
use weft_dom::Document;
use weft_runtime::{BindConfig, ConfigError, Mount, ViewConfig, ViewModel};

#[test]
fn json_config_mounts() {
    let config = ViewConfig::from_json(
        r##"{
            "el": "#app",
            "data": { "name": "World", "count": 2, "tags": ["a", "b"] }
        }"##,
    )
    .unwrap();
    assert_eq!(config.options.el, Mount::Selector("#app".into()));
    assert_eq!(config.bind, BindConfig::default());

    let doc = Rc::new(
        Document::parse(r#"<div id="app"><p>{{ name }}</p><i>{{ count }}</i><b>{{ tags }}</b></div>"#)
            .unwrap(),
    );
    let vm = ViewModel::from_config(Rc::clone(&doc), config).unwrap();
    assert_eq!(
        doc.inner_html(vm.root()),
        "<p>World</p><i>2</i><b>a,b</b>"
    );
}

#[test]
fn toml_config_with_bind_section() {
    let config = ViewConfig::from_toml(
        r#"
el = "main"

[data]
msg = "hi"
ready = true

[bind]
directive_prefix = "x-"
delimiters = ["<%", "%>"]
echo_model_updates = true
"#,
    )
    .unwrap();
    assert_eq!(config.bind.directive_prefix, "x-");
    assert_eq!(config.bind.delimiters, ("<%".to_owned(), "%>".to_owned()));
    assert!(config.bind.echo_model_updates);

    let data = config.options.data.clone().unwrap();
    assert_eq!(data.get("ready"), Some(&Value::Bool(true)));

    let doc = Rc::new(Document::new());
    let main = doc.append_element(doc.root(), "main", &[]).unwrap();
    let span = doc.append_element(main, "span", &[("x-text", "msg")]).unwrap();
    let p = doc.append_element(main, "p", &[]).unwrap();
    doc.append_text(p, "<% msg %>!").unwrap();

    let vm = ViewModel::from_config(Rc::clone(&doc), config).unwrap();
    assert_eq!(doc.text_content(span).as_deref(), Some("hi"));
    assert_eq!(doc.text_content(p).as_deref(), Some("hi!"));
    assert_eq!(vm.binding_count("msg"), 2);
}

#[test]
fn partial_bind_section_keeps_defaults() {
    let config = ViewConfig::from_toml(
        r#"
el = "#app"
[bind]
echo_model_updates = true
"#,
    )
    .unwrap();
    assert_eq!(config.bind.directive_prefix, "v-");
    assert!(config.options.data.is_none());
}

#[test]
fn malformed_documents_are_reported() {
    let err = ViewConfig::from_json("{ \"data\": {} }").unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));

    let err = ViewConfig::from_toml("el = ").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}
