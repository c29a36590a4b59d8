use std::path::{Path, PathBuf};

use crate::consts::DIR_INDEX;

/// Maps an archive-internal path to a path below `prefix`, one component at
/// a time so no `..` or absolute component escapes the output directory.
pub fn entry_path_to_fs(prefix: impl AsRef<Path>, path: &str) -> PathBuf {
    let mut buf = prefix.as_ref().to_path_buf();

    for item in path.split('/') {
        if item.is_empty() || item == "." || item == ".." {
            continue;
        }
        buf.push(item);
    }

    buf
}

/// Path of a sibling archive, or of the directory file itself for
/// `DIR_INDEX`.
pub fn archive_path(dirpath: impl AsRef<Path>, prefix: &str, archive_index: u16) -> PathBuf {
    let mut path = dirpath.as_ref().to_path_buf();

    if archive_index == DIR_INDEX {
        path.push(format!("{}_dir.vpk", prefix));
    } else {
        path.push(format!("{}_{:03}.vpk", prefix, archive_index));
    }

    path
}

pub fn format_size(size: u64) -> String {
    const UNITS: [&str; 4] = ["B", "K", "M", "G"];

    let mut value = size;
    let mut unit = 0;
    while value >= 1024 && unit + 1 < UNITS.len() {
        value /= 1024;
        unit += 1;
    }

    format!("{} {}", value, UNITS[unit])
}

/// Prints a blob as hex, 16 bytes per row.
pub fn print_hex(data: &[u8], indent: &str) {
    for chunk in data.chunks(16) {
        print!("{}", indent);
        for byte in chunk {
            print!("{:02x} ", byte);
        }
        println!();
    }
}

/// Splits `dir/sub/file.ext` into directory, bare name and extension the
/// way the VPK directory tree stores them.
pub fn split_entry_name(path: &str) -> (String, String, String) {
    let path = path.trim_matches('/');

    let (dir, file) = match path.rfind('/') {
        Some(index) => (&path[..index], &path[index + 1..]),
        None => ("", path),
    };

    let (name, ext) = match file.rfind('.') {
        Some(index) if index > 0 && index + 1 < file.len() => (&file[..index], &file[index + 1..]),
        _ => (file, ""),
    };

    (dir.to_owned(), name.to_owned(), ext.to_owned())
}
