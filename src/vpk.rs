// This file is part of gamepak.
//
// gamepak is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// gamepak is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with gamepak.  If not, see <https://www.gnu.org/licenses/>.

use std::path::{Path, PathBuf};

use crate::consts::{
    ARCHIVE_MD5_SIZE, DIR_INDEX, MAX_TOKEN_SIZE, Md5, TERMINATOR,
    V1_HEADER_SIZE, V2_HEADER_SIZE, VPK_MAGIC,
};
use crate::entry::{EntryData, FileEntry, VpkEntry};
use crate::io::SliceReader;
use crate::result::{Result, Error};

/// One record of the v2 archive MD5 section. The checksums are carried,
/// never verified.
pub struct ArchiveMd5 {
    pub(crate) archive_index: u32,
    pub(crate) start_offset:  u32,
    pub(crate) count:         u32,
    pub(crate) checksum:      Md5,
}

impl ArchiveMd5 {
    #[inline]
    pub fn archive_index(&self) -> u32 {
        self.archive_index
    }

    #[inline]
    pub fn start_offset(&self) -> u32 {
        self.start_offset
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn checksum(&self) -> &Md5 {
        &self.checksum
    }
}

/// The single v2 record following the archive MD5 section.
pub struct OtherMd5 {
    pub(crate) tree_checksum:        Md5,
    pub(crate) archive_md5_checksum: Md5,
    pub(crate) unknown:              Md5,
}

impl OtherMd5 {
    #[inline]
    pub fn tree_checksum(&self) -> &Md5 {
        &self.tree_checksum
    }

    #[inline]
    pub fn archive_md5_checksum(&self) -> &Md5 {
        &self.archive_md5_checksum
    }

    #[inline]
    pub fn unknown(&self) -> &Md5 {
        &self.unknown
    }
}

pub(crate) struct VpkDirEntry {
    pub(crate) crc:           u32,
    pub(crate) preload_bytes: u16,
    pub(crate) archive_index: u16,
    pub(crate) entry_offset:  u32,
    pub(crate) entry_length:  u32,
}

pub(crate) fn read_dir_entry(reader: &mut SliceReader) -> Result<VpkDirEntry> {
    let crc           = reader.read_u32()?;
    let preload_bytes = reader.read_u16()?;
    let archive_index = reader.read_u16()?;
    let entry_offset  = reader.read_u32()?;
    let entry_length  = reader.read_u32()?;
    let terminator    = reader.read_u16()?;

    if terminator != TERMINATOR {
        return Err(Error::malformed(format!(
            "illegal directory entry terminator 0x{:04X} at offset {}",
            terminator, reader.pos() - 2)));
    }

    Ok(VpkDirEntry {
        crc,
        preload_bytes,
        archive_index,
        entry_offset,
        entry_length,
    })
}

pub(crate) struct ParsedVpk {
    pub(crate) version:       u32,
    pub(crate) tree_size:     u32,
    pub(crate) header_size:   u32,
    pub(crate) entries:       Vec<FileEntry>,
    pub(crate) archive_sizes: Vec<u64>,
    pub(crate) archive_md5s:  Vec<ArchiveMd5>,
    pub(crate) other_md5:     Option<OtherMd5>,
    pub(crate) public_key:    Vec<u8>,
    pub(crate) signature:     Vec<u8>,
}

/// Splits a directory file path into its parent directory, the sibling
/// prefix and whether the `_dir.vpk` convention applies. The suffix is
/// located by substring search; a path without it is a standalone archive.
pub(crate) fn parse_path(path: &Path) -> Result<(PathBuf, String, bool)> {
    let dirpath = match path.parent() {
        Some(parent) => parent.to_path_buf(),
        None => return Err(Error::other("could not get parent directory").with_path(path)),
    };

    let name = match path.file_name().and_then(|name| name.to_str()) {
        Some(name) => name,
        None => return Err(Error::other("could not get file name of path").with_path(path)),
    };

    match name.find("_dir.vpk") {
        Some(index) => Ok((dirpath, name[..index].to_owned(), true)),
        None        => Ok((dirpath, name.to_owned(), false)),
    }
}

/// Decodes a whole `_dir.vpk` file held in memory.
pub(crate) fn parse(data: &[u8]) -> Result<ParsedVpk> {
    let mut reader = SliceReader::new(data);

    let mut magic = [0u8; 4];
    reader.read_into(&mut magic)?;
    if magic != VPK_MAGIC {
        return Err(Error::illegal_magic(magic));
    }

    let version = reader.read_u32()?;
    if version != 1 && version != 2 {
        return Err(Error::unsupported_version(version));
    }

    let tree_size = reader.read_u32()?;

    let header_size;
    let mut archive_md5_size = 0u32;
    let mut signature_size   = 0u32;

    if version == 2 {
        header_size = V2_HEADER_SIZE as u32;
        let _file_data_size = reader.read_u32()?;
        archive_md5_size    = reader.read_u32()?;
        let _other_md5_size = reader.read_u32()?;
        signature_size      = reader.read_u32()?;
    } else {
        header_size = V1_HEADER_SIZE as u32;
    }

    let mut entries: Vec<FileEntry> = Vec::new();
    let mut archive_sizes: Vec<u64> = Vec::new();
    let mut inline_data_size = 0u64;

    // Three nested NUL terminated string loops: extension, directory, file
    // name. An empty string ends the enclosing level.
    loop {
        let ext = reader.read_str(MAX_TOKEN_SIZE)?;
        if ext.is_empty() {
            break;
        }

        loop {
            let mut dir = reader.read_str(MAX_TOKEN_SIZE)?;
            if dir.is_empty() {
                break;
            }
            // a single space marks the archive root
            if dir == " " {
                dir.clear();
            }

            loop {
                let name = reader.read_str(MAX_TOKEN_SIZE)?;
                if name.is_empty() {
                    break;
                }

                let dirent = read_dir_entry(&mut reader)?;
                let preload = reader.read_vec(dirent.preload_bytes as usize)?;

                let offset;
                if dirent.archive_index == DIR_INDEX {
                    offset = dirent.entry_offset as u64 + header_size as u64 + tree_size as u64;
                    inline_data_size += dirent.entry_length as u64;
                } else {
                    offset = dirent.entry_offset as u64;

                    let slot = dirent.archive_index as usize;
                    if slot >= archive_sizes.len() {
                        archive_sizes.resize(slot + 1, 0);
                    }
                    let end = dirent.entry_offset as u64 + dirent.entry_length as u64;
                    if end > archive_sizes[slot] {
                        archive_sizes[slot] = end;
                    }
                }

                entries.push(FileEntry {
                    name,
                    dir: dir.clone(),
                    ext: ext.clone(),
                    size: dirent.preload_bytes as u64 + dirent.entry_length as u64,
                    offset,
                    on_disk: true,
                    dirty: false,
                    data: EntryData::Vpk(VpkEntry {
                        crc32:         dirent.crc,
                        preload_size:  dirent.preload_bytes,
                        archive_index: dirent.archive_index,
                        entry_offset:  dirent.entry_offset,
                        entry_length:  dirent.entry_length,
                        preload,
                        pending:       None,
                    }),
                });
            }
        }
    }

    let walked = reader.pos() as u32 - header_size;
    if walked != tree_size {
        eprintln!("*** warning: directory tree is {} bytes, header says {}", walked, tree_size);
    }

    let mut archive_md5s = Vec::new();
    let mut other_md5    = None;
    let mut public_key   = Vec::new();
    let mut signature    = Vec::new();

    if version == 2 {
        // skip the file data stored inline in this file
        reader.skip(inline_data_size as usize)?;

        let count = archive_md5_size as usize / ARCHIVE_MD5_SIZE;
        for _ in 0..count {
            let archive_index = reader.read_u32()?;
            let start_offset  = reader.read_u32()?;
            let chunk_count   = reader.read_u32()?;
            let mut checksum: Md5 = [0; 16];
            reader.read_into(&mut checksum)?;

            archive_md5s.push(ArchiveMd5 {
                archive_index,
                start_offset,
                count: chunk_count,
                checksum,
            });
        }

        let trailing = archive_md5_size as usize % ARCHIVE_MD5_SIZE;
        if trailing > 0 {
            eprintln!("*** warning: {} bytes left after archive MD5 section", trailing);
            reader.skip(trailing)?;
        }

        let mut tree_checksum:        Md5 = [0; 16];
        let mut archive_md5_checksum: Md5 = [0; 16];
        let mut unknown:              Md5 = [0; 16];
        reader.read_into(&mut tree_checksum)?;
        reader.read_into(&mut archive_md5_checksum)?;
        reader.read_into(&mut unknown)?;
        other_md5 = Some(OtherMd5 {
            tree_checksum,
            archive_md5_checksum,
            unknown,
        });

        if signature_size > 0 {
            let pubkey_size = reader.read_u32()?;
            public_key = reader.read_vec(pubkey_size as usize)?;

            let sig_size = reader.read_u32()?;
            signature = reader.read_vec(sig_size as usize)?;
        }
    }

    Ok(ParsedVpk {
        version,
        tree_size,
        header_size,
        entries,
        archive_sizes,
        archive_md5s,
        other_md5,
        public_key,
        signature,
    })
}

#[cfg(test)]
pub(crate) mod testdata {
    use crate::consts::{DIR_INDEX, TERMINATOR};

    pub fn push_u16(out: &mut Vec<u8>, value: u16) {
        out.extend_from_slice(&[value as u8, (value >> 8) as u8]);
    }

    pub fn push_u32(out: &mut Vec<u8>, value: u32) {
        out.extend_from_slice(&[value as u8, (value >> 8) as u8, (value >> 16) as u8, (value >> 24) as u8]);
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

    pub fn v1_header(tree_size: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&crate::consts::VPK_MAGIC);
        push_u32(&mut out, 1);
        push_u32(&mut out, tree_size);
        out
    }

    /// The 13 byte smallest well-formed v1 archive: header plus a single
    /// NUL ending the extension loop.
    pub fn minimal_v1() -> Vec<u8> {
        let mut out = v1_header(1);
        out.push(0);
        out
    }

    /// A v1 archive with one preload-only file `readme.txt` in the root.
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

        let mut out = v1_header(tree.len() as u32);
        out.extend_from_slice(&tree);
        out
    }

    /// A v2 archive with one entry `a/b.bin` stored in sibling archive 000,
    /// empty MD5 and signature sections.
    pub fn split_v2() -> Vec<u8> {
        let mut tree = Vec::new();
        push_str(&mut tree, "bin");
        push_str(&mut tree, "a");
        push_str(&mut tree, "b");
        push_dirent(&mut tree, 0, 0, 0, 0, 4);
        push_str(&mut tree, "");
        push_str(&mut tree, "");
        tree.push(0);

        let mut out = Vec::new();
        out.extend_from_slice(&crate::consts::VPK_MAGIC);
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
}
