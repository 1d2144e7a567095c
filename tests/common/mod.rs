#![allow(dead_code)]

pub mod command;
pub mod file;

use assert_fs::TempDir;
use kit::areas::repository::Repository;
use rstest::fixture;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Freshly initialised repository, together with the directory keeping it alive
#[fixture]
pub fn repository(repository_dir: TempDir) -> (TempDir, Repository) {
    let repository = Repository::init(repository_dir.path())
        .expect("Failed to init repository")
        .into_repository();

    (repository_dir, repository)
}

/// Repository with `1.txt`, `a/2.txt` and `a/b/3.txt` committed on master
#[fixture]
pub fn committed_repository(repository: (TempDir, Repository)) -> (TempDir, Repository) {
    let (dir, mut repository) = repository;

    file::write_file(file::FileSpec::new(dir.path().join("1.txt"), "one"));
    file::write_file(file::FileSpec::new(dir.path().join("a/2.txt"), "two"));
    file::write_file(file::FileSpec::new(dir.path().join("a/b/3.txt"), "three"));

    repository
        .add(dir.path())
        .expect("Failed to stage initial files");
    repository
        .commit("Initial commit")
        .expect("Failed to create initial commit");

    (dir, repository)
}

/// Hexdump used to make index byte mismatches readable
pub fn to_hexdump(data: &[u8]) -> String {
    let mut result = String::new();
    for (i, chunk) in data.chunks(16).enumerate() {
        result.push_str(&format!("{:08x}: ", i * 16));
        for byte in chunk {
            result.push_str(&format!("{byte:02x} "));
        }
        for _ in chunk.len()..16 {
            result.push_str("   ");
        }

        result.push_str(" |");
        for byte in chunk {
            if byte.is_ascii_graphic() {
                result.push(*byte as char);
            } else {
                result.push('.');
            }
        }
        result.push_str("|\n");
    }
    result
}

#[macro_export]
macro_rules! assert_bytes_eq {
    ($actual:expr, $expected:expr) => {
        if $actual != $expected {
            pretty_assertions::assert_eq!(
                common::to_hexdump($actual),
                common::to_hexdump($expected),
                "\n=== BYTES DIFFER === actual ({} bytes) vs expected ({} bytes)",
                $actual.len(),
                $expected.len()
            );
        }
    };
}
