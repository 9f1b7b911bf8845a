//! Fixture builders for function modules and archives.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Module exporting `handler` bound to the `recording` test class
pub const RECORDING_MODULE: &str = r#"
name: recording-fixture
functions:
  handler:
    handler_class: recording
    handler_config:
      label: fixture
"#;

/// Module exporting `handler` bound to the built-in `system_metrics` class
pub const SYSTEM_METRICS_MODULE: &str = r#"
name: system-metrics
description: Host metrics summary
functions:
  handler:
    handler_class: system_metrics
    handler_config:
      window_seconds: 60
      interface: eth0
"#;

/// Write a function module file under `dir`
pub fn write_module(dir: &Path, file_name: &str, contents: &str) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, contents).expect("write module file");
    path
}

/// Write a zip archive under `dir` holding the given `(entry, contents)` pairs
pub fn write_archive(dir: &Path, file_name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(file_name);
    let file = File::create(&path).expect("create archive");
    let mut zip = ZipWriter::new(file);

    for (name, contents) in entries {
        zip.start_file(*name, SimpleFileOptions::default())
            .expect("start archive entry");
        zip.write_all(contents.as_bytes())
            .expect("write archive entry");
    }

    zip.finish().expect("finish archive");
    path
}

/// Whether `dir` has no entries left
pub fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .expect("read scratch root")
        .next()
        .is_none()
}
