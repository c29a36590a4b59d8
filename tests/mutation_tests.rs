mod common;

use std::fs;

use gamepak::{Archive, Format, VpkSettings};

use common::*;

#[test]
fn split_vpk2_reads_from_sibling() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foo_dir.vpk");
    fs::write(&path, split_v2(&[("b", 0, 4)])).unwrap();
    fs::write(dir.path().join("foo_000.vpk"), [0x01, 0x02, 0x03, 0x04]).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    assert_eq!(archive.format(), Format::Vpk2);

    let handle = archive.find("a/b.bin").unwrap();
    assert_eq!(archive.archive_index(handle), 0);
    assert_eq!(archive.read(handle).unwrap(), vec![0x01, 0x02, 0x03, 0x04]);
    assert_eq!(archive.open_sibling_handles(), 1);
}

#[test]
fn sibling_handle_is_shared_between_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foo_dir.vpk");
    fs::write(&path, split_v2(&[("b", 0, 4), ("c", 4, 4)])).unwrap();
    fs::write(dir.path().join("foo_000.vpk"), [1, 2, 3, 4, 5, 6, 7, 8]).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    assert_eq!(archive.open_sibling_handles(), 0);

    let b = archive.find("a/b.bin").unwrap();
    let c = archive.find("a/c.bin").unwrap();
    assert_eq!(archive.read(b).unwrap(), vec![1, 2, 3, 4]);
    assert_eq!(archive.read(c).unwrap(), vec![5, 6, 7, 8]);
    assert_eq!(archive.read(b).unwrap(), vec![1, 2, 3, 4]);

    // one open handle no matter how many entries read through it
    assert_eq!(archive.open_sibling_handles(), 1);
}

#[test]
fn missing_sibling_fails_the_read_but_not_the_archive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foo_dir.vpk");
    fs::write(&path, split_v2(&[("b", 0, 4)])).unwrap();
    // no foo_000.vpk on disk

    let mut archive = Archive::read_from_disk(&path).unwrap();
    let handle = archive.find("a/b.bin").unwrap();
    assert!(archive.read(handle).is_err());

    // the archive itself stays usable
    assert_eq!(archive.file_count(), 1);
    assert_eq!(archive.find("a/b.bin"), Some(handle));
}

#[test]
fn vpk2_refuses_to_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foo_dir.vpk");
    fs::write(&path, split_v2(&[("b", 0, 4)])).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    assert!(archive.write(None).is_err());
}

#[test]
fn vpk1_add_small_file_and_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pak01_dir.vpk");
    fs::write(&path, single_inline_v1()).unwrap();

    let source = dir.path().join("data.bin");
    let content = vec![0x5Au8; 1024];
    fs::write(&source, &content).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    archive.set_vpk_settings(VpkSettings {
        max_preload_size: 2048,
        size_budget: 512 * 1024 * 1024,
    });

    let handle = archive.add_file_from_disk("stuff/data.bin", &source).unwrap();
    assert_eq!(archive.preload_size(handle), 1024);
    assert_eq!(archive.archive_index(handle), 0);
    assert_eq!(archive.size(handle), 1024);

    archive.write(None).unwrap();

    let mut reloaded = Archive::read_from_disk(&path).unwrap();
    assert_eq!(reloaded.file_count(), 2);
    assert_eq!(reloaded.read_by_name("readme.txt").unwrap(), b"hello");
    assert_eq!(reloaded.read_by_name("stuff/data.bin").unwrap(), content);
}

#[test]
fn vpk1_add_large_file_streams_into_a_sibling() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pak01_dir.vpk");
    fs::write(&path, single_inline_v1()).unwrap();

    let source = dir.path().join("big.bin");
    let content: Vec<u8> = (0..4096u32).map(|value| value as u8).collect();
    fs::write(&source, &content).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    archive.set_vpk_settings(VpkSettings {
        max_preload_size: 16,
        size_budget: 512 * 1024 * 1024,
    });

    let handle = archive.add_file_from_disk("models/big.mdl", &source).unwrap();
    assert_eq!(archive.preload_size(handle), 0);
    assert_eq!(archive.archive_index(handle), 0);

    archive.write(None).unwrap();

    let sibling = dir.path().join("pak01_000.vpk");
    assert_eq!(fs::read(&sibling).unwrap(), content);

    let mut reloaded = Archive::read_from_disk(&path).unwrap();
    let handle = reloaded.find("models/big.mdl").unwrap();
    assert_eq!(reloaded.read(handle).unwrap(), content);
    // the CRC is produced while the file streams out
    assert_ne!(reloaded.crc32(handle), 0);
}

#[test]
fn vpk1_vanished_source_fails_the_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pak01_dir.vpk");
    fs::write(&path, minimal_v1()).unwrap();

    let source = dir.path().join("gone.bin");
    fs::write(&source, vec![1u8; 4096]).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    archive.set_vpk_settings(VpkSettings {
        max_preload_size: 16,
        size_budget: 512 * 1024 * 1024,
    });
    archive.add_file_from_disk("a/b.bin", &source).unwrap();

    fs::remove_file(&source).unwrap();
    assert!(archive.write(None).is_err());
}

#[test]
fn wad_add_and_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.wad");
    fs::write(&path, two_lump_pwad()).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    archive.add_file_data("LUMP3", b"CCCC".to_vec()).unwrap();
    archive.write(None).unwrap();

    let mut reloaded = Archive::read_from_disk(&path).unwrap();
    assert_eq!(reloaded.file_count(), 3);
    assert_eq!(reloaded.read_by_name("LUMP1   ").unwrap(), b"AAAAAAAA");
    assert_eq!(reloaded.read_by_name("LUMP2   ").unwrap(), b"BBBBBBBB");
    assert_eq!(reloaded.read_by_name("LUMP3").unwrap(), b"CCCC");
}

#[test]
fn wad_remove_and_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.wad");
    fs::write(&path, two_lump_pwad()).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    archive.remove_file("LUMP1   ").unwrap();
    archive.write(None).unwrap();

    let mut reloaded = Archive::read_from_disk(&path).unwrap();
    assert_eq!(reloaded.file_count(), 1);
    assert!(!reloaded.contains("LUMP1   "));
    assert_eq!(reloaded.read_by_name("LUMP2   ").unwrap(), b"BBBBBBBB");
}

#[test]
fn pak_write_appends_a_trailing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quake.pak");
    fs::write(&path, two_entry_pak()).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    let out = dir.path().join("rebuilt.pak");
    archive.write(Some(&out)).unwrap();

    let data = fs::read(&out).unwrap();
    assert_eq!(&data[0..4], b"PACK");

    let dir_offset = u32::from_le_bytes([data[4], data[5], data[6], data[7]]) as usize;
    let dir_size = u32::from_le_bytes([data[8], data[9], data[10], data[11]]) as usize;

    // payloads sit between header and directory, in entry order
    assert_eq!(dir_offset, 12 + 16 + 8);
    assert_eq!(dir_size, 2 * 64);
    assert_eq!(&data[12..28], &[0xAAu8; 16][..]);
    assert_eq!(&data[28..36], &[0xBBu8; 8][..]);
    assert_eq!(data.len(), dir_offset + dir_size);

    // first record names the first entry
    let name_field = &data[dir_offset..dir_offset + 13];
    assert_eq!(name_field, b"maps/demo.bsp");
}

#[test]
fn extraction_respects_patterns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pak01_dir.vpk");
    fs::write(&path, single_inline_v1()).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    let outdir = dir.path().join("out");

    let patterns = vec![regex::Regex::new("\\.txt$").unwrap()];
    gamepak::unpack(&mut archive, &outdir, gamepak::UnpackOptions {
        patterns: &patterns,
        verbose: false,
    }).unwrap();

    assert_eq!(fs::read(outdir.join("readme.txt")).unwrap(), b"hello");

    let none = vec![regex::Regex::new("\\.wav$").unwrap()];
    let outdir2 = dir.path().join("out2");
    gamepak::unpack(&mut archive, &outdir2, gamepak::UnpackOptions {
        patterns: &none,
        verbose: false,
    }).unwrap();
    assert!(!outdir2.join("readme.txt").exists());
}

#[test]
fn extract_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.wad");
    fs::write(&path, two_lump_pwad()).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    let dest = dir.path().join("lump1.bin");
    archive.extract_file("LUMP1   ", &dest).unwrap();
    assert_eq!(fs::read(&dest).unwrap(), b"AAAAAAAA");
}
