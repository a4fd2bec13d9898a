#![no_main]
use libfuzzer_sys::fuzz_target;
use xmldict::{parse_bytes_with_options, AttributesMode, NodeNameMode, ParseOptions};

fuzz_target!(|data: &[u8]| {
    // Parsing arbitrary bytes should never panic, whatever the options
    let _ = parse_bytes_with_options(data, &ParseOptions::default());
    let opts = ParseOptions::default()
        .collapse_text_nodes(false)
        .strip_empty_nodes(false)
        .always_use_arrays(true)
        .preserve_comments(true)
        .wrap_root_node(true)
        .attributes_mode(AttributesMode::Unprefixed)
        .node_name_mode(NodeNameMode::Always);
    let _ = parse_bytes_with_options(data, &opts);
});
