#![no_main]

use libfuzzer_sys::fuzz_target;
use weft_dom::Document;

fuzz_target!(|data: &[u8]| {
    let Ok(markup) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(doc) = Document::parse(markup) {
        let html = doc.inner_html(doc.root());
        if let Ok(again) = Document::parse(&html) {
            assert_eq!(again.inner_html(again.root()), html);
        }
    }
});
