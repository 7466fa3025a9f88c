#![no_main]

use libfuzzer_sys::fuzz_target;
use weft::backend::Generator;
use weft_graph::Workspace;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Loading may reject the document; generation may reject a node. Neither may panic.
        if let Ok(workspace) = Workspace::from_json(s) {
            let _ = Generator::zig().generate(&workspace);
        }
    }
});
