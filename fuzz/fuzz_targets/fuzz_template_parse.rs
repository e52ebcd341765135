#![no_main]

use libfuzzer_sys::fuzz_target;
use weft_runtime::Template;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Some(template) = Template::parse(text) {
        assert!(!template.key().is_empty());
        assert_eq!(template.key(), template.key().trim());
        let rendered = template.render("x");
        assert!(rendered.len() <= text.len() + 1);
    }
});
