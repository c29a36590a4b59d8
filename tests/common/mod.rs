// Shared builders for synthetic archives used by the integration tests.

#![allow(dead_code)]

pub const DIR_INDEX: u16 = 0x7FFF;
pub const TERMINATOR: u16 = 0xFFFF;
pub const VPK_MAGIC: [u8; 4] = [0x34, 0x12, 0xAA, 0x55];

pub fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn push_str(out: &mut Vec<u8>, value: &str) {
    out.extend_from_slice(value.as_bytes());
    out.push(0);
}

pub fn push_dirent(out: &mut Vec<u8>, crc: u32, preload: u16, archive_index: u16, offset: u32, length: u32) {
    push_u32(out, crc);
    push_u16(out, preload);
    push_u16(out, archive_index);
    push_u32(out, offset);
    push_u32(out, length);
    push_u16(out, TERMINATOR);
}

/// The smallest well-formed v1 archive: header plus the tree-ending NUL.
pub fn minimal_v1() -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&VPK_MAGIC);
    push_u32(&mut out, 1);
    push_u32(&mut out, 1);
    out.push(0);
    out
}

/// A v1 archive holding one preload-only file `readme.txt` in the root.
pub fn single_inline_v1() -> Vec<u8> {
    let mut tree = Vec::new();
    push_str(&mut tree, "txt");
    push_str(&mut tree, " ");
    push_str(&mut tree, "readme");
    push_dirent(&mut tree, 0xDEADBEEF, 5, DIR_INDEX, 0, 0);
    tree.extend_from_slice(b"hello");
    push_str(&mut tree, "");
    push_str(&mut tree, "");
    tree.push(0);

    let mut out = Vec::new();
    out.extend_from_slice(&VPK_MAGIC);
    push_u32(&mut out, 1);
    push_u32(&mut out, tree.len() as u32);
    out.extend_from_slice(&tree);
    out
}

/// A v2 directory file whose entries live in sibling archive 000.
/// `files` lists `(name, offset, length)` under directory `a` with
/// extension `bin`.
pub fn split_v2(files: &[(&str, u32, u32)]) -> Vec<u8> {
    let mut tree = Vec::new();
    push_str(&mut tree, "bin");
    push_str(&mut tree, "a");
    for (name, offset, length) in files {
        push_str(&mut tree, name);
        push_dirent(&mut tree, 0, 0, 0, *offset, *length);
    }
    push_str(&mut tree, "");
    push_str(&mut tree, "");
    tree.push(0);

    let mut out = Vec::new();
    out.extend_from_slice(&VPK_MAGIC);
    push_u32(&mut out, 2);
    push_u32(&mut out, tree.len() as u32);
    push_u32(&mut out, 0);  // file data section
    push_u32(&mut out, 0);  // archive MD5 section
    push_u32(&mut out, 48); // other MD5 section
    push_u32(&mut out, 0);  // signature section
    out.extend_from_slice(&tree);
    out.extend_from_slice(&[0u8; 48]);
    out
}

/// The PWAD from the round-trip scenario: two 8 byte lumps at offsets 12
/// and 20, directory at 28.
pub fn two_lump_pwad() -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"PWAD");
    push_u32(&mut out, 2);
    push_u32(&mut out, 28);
    out.extend_from_slice(b"AAAAAAAA");
    out.extend_from_slice(b"BBBBBBBB");
    push_u32(&mut out, 12);
    push_u32(&mut out, 8);
    out.extend_from_slice(b"LUMP1   ");
    push_u32(&mut out, 20);
    push_u32(&mut out, 8);
    out.extend_from_slice(b"LUMP2   ");
    out
}

pub fn push_pak_entry(out: &mut Vec<u8>, name: &str, offset: u32, size: u32) {
    let mut raw = [0u8; 56];
    raw[..name.len()].copy_from_slice(name.as_bytes());
    out.extend_from_slice(&raw);
    push_u32(out, offset);
    push_u32(out, size);
}

/// Two entry PAK with the directory right behind the header and payloads
/// after it.
pub fn two_entry_pak() -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"PACK");
    push_u32(&mut out, 12);
    push_u32(&mut out, 128);
    push_pak_entry(&mut out, "maps/demo.bsp", 140, 16);
    push_pak_entry(&mut out, "sound/boom.wav", 156, 8);
    out.extend_from_slice(&[0xAAu8; 16]);
    out.extend_from_slice(&[0xBBu8; 8]);
    out
}
