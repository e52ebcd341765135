use std::rc::Rc;

use proptest::prelude::*;
use weft_core::Host;
use weft_dom::Document;
use weft_runtime::{MountOptions, ViewModel};

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}"
}

fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,!?-]{0,16}"
}

proptest! {
    #[test]
    fn notify_is_idempotent(
        prefix in text_strategy(),
        suffix in text_strategy(),
        key in key_strategy(),
        value in text_strategy(),
    ) {
        let doc = Rc::new(Document::new());
        let p = doc.append_element(doc.root(), "p", &[]).unwrap();
        let text = doc.append_text(p, &format!("{prefix}{{{{ {key} }}}}{suffix}")).unwrap();
        let vm = ViewModel::new(Rc::clone(&doc), MountOptions::node(p).entry(key.as_str(), value.as_str())).unwrap();

        let expected = format!("{prefix}{value}{suffix}");
        prop_assert_eq!(doc.text_content(text), Some(expected.clone()));
        vm.notify(&key);
        vm.notify(&key);
        prop_assert_eq!(doc.text_content(text), Some(expected));
    }

    #[test]
    fn every_binding_on_a_key_sees_the_new_value(
        key in key_strategy(),
        copies in 1usize..6,
        value in text_strategy(),
    ) {
        let doc = Rc::new(Document::new());
        let mut spans = Vec::new();
        for i in 0..copies {
            let tag = if i % 2 == 0 { "span" } else { "p" };
            let node = if i % 2 == 0 {
                doc.append_element(doc.root(), tag, &[("v-text", key.as_str())]).unwrap()
            } else {
                let node = doc.append_element(doc.root(), tag, &[]).unwrap();
                doc.append_text(node, &format!("{{{{{key}}}}}")).unwrap();
                node
            };
            spans.push(node);
        }
        let other = doc.append_element(doc.root(), "b", &[("v-text", "zz_other")]).unwrap();
        let vm = ViewModel::new(
            Rc::clone(&doc),
            MountOptions::node(doc.root()).entry("zz_other", "fixed"),
        )
        .unwrap();

        prop_assert_eq!(vm.binding_count(&key), copies);
        vm.write(&key, value.as_str());
        prop_assert_eq!(vm.notify(&key), copies);
        for node in spans {
            prop_assert_eq!(doc.text_content(node), Some(value.clone()));
        }
        let other_text = doc.text_content(other);
        prop_assert_eq!(other_text.as_deref(), Some("fixed"));
    }

    #[test]
    fn typed_value_lands_in_store_verbatim(key in key_strategy(), typed in ".{0,24}") {
        let doc = Rc::new(Document::new());
        let input = doc.append_element(doc.root(), "input", &[("v-model", key.as_str())]).unwrap();
        let mirror = doc.append_element(doc.root(), "span", &[("v-text", key.as_str())]).unwrap();
        let vm = ViewModel::new(Rc::clone(&doc), MountOptions::node(doc.root())).unwrap();

        doc.dispatch_change(input, &typed);
        prop_assert_eq!(vm.get(&key).map(|v| v.render()), Some(typed.clone()));
        prop_assert_eq!(doc.text_content(mirror), Some(typed));
    }
}
