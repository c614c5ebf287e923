#![no_main]

use benchdelta::collection::Collection;
use benchdelta::config::CompareConfig;
use benchdelta::table::assemble;
use benchdelta::text_output;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Split into two sources so the comparison path is exercised too
        let mut mid = input.len() / 2;
        while !input.is_char_boundary(mid) {
            mid += 1;
        }
        let (old, new) = input.split_at(mid);
        let mut collection = Collection::new();
        collection.ingest("old", old);
        collection.ingest("new", new);
        collection.finalize();

        let config = CompareConfig {
            geomean: true,
            ..CompareConfig::default()
        };
        let tables = assemble(&collection, &config);
        let _ = text_output::render(&tables);
    }
});
