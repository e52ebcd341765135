#![no_main]

use std::rc::Rc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use weft_core::Host;
use weft_dom::Document;
use weft_runtime::{MountOptions, ViewModel};

const KEYS: [&str; 3] = ["a", "b", "c"];

#[derive(Debug, Arbitrary)]
enum Op {
    Set { key: u8, value: String },
    Notify { key: u8 },
    Type { input: u8, value: String },
    Dispose,
}

#[derive(Debug, Arbitrary)]
struct Input {
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let doc = Rc::new(
        Document::parse(
            r#"<div id="app"><input v-model="a"><input v-model="b"><p v-text="a"></p><i>{{ b }}</i><b>{{ c }}</b></div>"#,
        )
        .expect("fixture parses"),
    );
    let Ok(vm) = ViewModel::new(Rc::clone(&doc), MountOptions::selector("#app")) else {
        return;
    };
    let inputs = [
        doc.query_selector("input").expect("first input"),
        doc.child_nodes(vm.root())[1],
    ];

    for op in input.ops.into_iter().take(64) {
        match op {
            Op::Set { key, value } => {
                vm.set(KEYS[usize::from(key) % KEYS.len()], value);
            }
            Op::Notify { key } => {
                vm.notify(KEYS[usize::from(key) % KEYS.len()]);
            }
            Op::Type { input, value } => {
                doc.dispatch_change(inputs[usize::from(input) % inputs.len()], &value);
            }
            Op::Dispose => vm.dispose(),
        }
    }

    if !vm.is_disposed() {
        // Every bound node reflects the store after a final notify.
        for key in KEYS {
            vm.notify(key);
        }
        let p = doc.query_selector("p").expect("p");
        let a = vm.get("a").map(|v| v.render()).unwrap_or_default();
        assert_eq!(doc.text_content(p).unwrap_or_default(), a);
    }
});
