use std::fs;

use pseudo9608::{interpreter::io::MemoryIo, run_source_with_io};
use walkdir::WalkDir;

#[test]
fn demo_programs_run_cleanly() {
    let mut count = 0;

    for entry in
        WalkDir::new("demos").into_iter()
                             .filter_map(Result::ok)
                             .filter(|e| e.path().extension().is_some_and(|ext| ext == "pseudo"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        count += 1;
        let mut io = MemoryIo::new();
        if let Err(e) = run_source_with_io(&source, &mut io) {
            panic!("Demo {path:?} failed: {e}");
        }
    }

    assert!(count > 0, "No demo programs found in demos/");
}
