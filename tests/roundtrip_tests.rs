mod common;

use std::fs;

use gamepak::{Archive, Format, WadKind};

use common::*;

#[test]
fn minimal_vpk1_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty_dir.vpk");
    fs::write(&path, minimal_v1()).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    assert_eq!(archive.format(), Format::Vpk1);
    assert_eq!(archive.file_count(), 0);

    let out = dir.path().join("copy_dir.vpk");
    archive.write(Some(&out)).unwrap();

    assert_eq!(fs::read(&out).unwrap(), minimal_v1());
}

#[test]
fn vpk1_single_inline_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pak01_dir.vpk");
    fs::write(&path, single_inline_v1()).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    assert_eq!(archive.file_count(), 1);
    assert_eq!(archive.base_name(), dir.path().join("pak01").to_string_lossy().to_string());

    let handle = archive.find("readme.txt").unwrap();
    let entry = &archive.files()[handle];
    assert_eq!(entry.directory(), "");
    assert_eq!(entry.name(), "readme");

    assert_eq!(archive.size(handle), 5);
    assert_eq!(archive.crc32(handle), 0xDEADBEEF);
    assert_eq!(archive.read(handle).unwrap(), b"hello");
}

#[test]
fn vpk1_serialize_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pak01_dir.vpk");
    fs::write(&path, single_inline_v1()).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    let out = dir.path().join("copy_dir.vpk");
    archive.write(Some(&out)).unwrap();

    assert_eq!(fs::read(&out).unwrap(), single_inline_v1());
}

#[test]
fn read_matches_size_and_preload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pak01_dir.vpk");
    fs::write(&path, single_inline_v1()).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    for handle in 0..archive.file_count() {
        let data = archive.read(handle).unwrap();
        assert_eq!(data.len() as u64, archive.size(handle));

        let preload = archive.read_preload(handle);
        assert_eq!(preload.len() as u64, archive.preload_size(handle));
        assert_eq!(&data[..preload.len()], &preload[..]);
    }
}

#[test]
fn wad_round_trip_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.wad");
    fs::write(&path, two_lump_pwad()).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    assert_eq!(archive.format(), Format::Wad);
    assert_eq!(archive.wad_kind(), Some(WadKind::Pwad));
    assert_eq!(archive.file_count(), 2);

    let out = dir.path().join("copy.wad");
    archive.write(Some(&out)).unwrap();

    assert_eq!(fs::read(&out).unwrap(), two_lump_pwad());
}

#[test]
fn wad_rewrite_over_itself_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.wad");
    fs::write(&path, two_lump_pwad()).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    archive.write(None).unwrap();

    assert_eq!(fs::read(&path).unwrap(), two_lump_pwad());

    // the archive object must stay readable after writing over its source
    let handle = archive.find("LUMP1   ").unwrap();
    assert_eq!(archive.read(handle).unwrap(), b"AAAAAAAA");
}

#[test]
fn pak_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quake.pak");
    fs::write(&path, two_entry_pak()).unwrap();

    let mut archive = Archive::read_from_disk(&path).unwrap();
    assert_eq!(archive.format(), Format::Pak);
    assert_eq!(archive.file_count(), 2);

    let handle = archive.find("maps/demo.bsp").unwrap();
    let entry = &archive.files()[handle];
    assert_eq!(entry.directory(), "maps");
    assert_eq!(entry.extension(), ".bsp");
    assert_eq!(archive.size(handle), 16);
    assert_eq!(archive.read(handle).unwrap(), vec![0xAAu8; 16]);

    let other = archive.find("sound/boom.wav").unwrap();
    assert_eq!(archive.read(other).unwrap(), vec![0xBBu8; 8]);
}

#[test]
fn find_agrees_with_iteration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quake.pak");
    fs::write(&path, two_entry_pak()).unwrap();

    let archive = Archive::read_from_disk(&path).unwrap();
    for (handle, name) in archive.iter() {
        assert_eq!(archive.find(name), Some(handle));
    }
}

#[test]
fn unknown_magic_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.bin");
    fs::write(&path, b"ZZZZ and more garbage").unwrap();

    assert!(Archive::read_from_disk(&path).is_err());
}

#[test]
fn missing_file_is_an_open_error() {
    assert!(Archive::read_from_disk("/no/such/file_dir.vpk").is_err());
}
