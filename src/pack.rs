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

use std::collections::HashMap;
use std::fs;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use crate::archive::{Archive, Backend};
use crate::consts::{DIR_INDEX, TERMINATOR, V1_HEADER_SIZE, VPK_MAGIC};
use crate::entry::PendingData;
use crate::io::{copy_with_crc32, write_u16, write_u32, write_str};
use crate::result::{Result, Error};
use crate::util::archive_path;

/// Copies a file into `out` at its current position, returning the byte
/// count and the CRC32 of the copied data.
fn stream_file(source: &Path, out: &mut fs::File) -> Result<(u32, u32)> {
    let mut reader = match fs::File::open(source) {
        Ok(reader) => reader,
        Err(error) => return Err(Error::write_failed(format!("source file {:?}: {}", source, error))),
    };

    match copy_with_crc32(&mut reader, out) {
        Ok((total, crc)) => Ok((total as u32, crc)),
        Err(error) => Err(Error::io_with_path(error, source)),
    }
}

/// Rewrites the directory file of a v1 archive from the current entry set.
///
/// Dirty payloads destined for sibling archives are streamed out first and
/// their directory entries patched. The tree is then emitted grouped by
/// `(extension, directory)` in the order those pairs first appear in the
/// entry list, which reproduces the on-disk order for unchanged archives.
/// Inline payloads follow the tree, and the computed tree size is patched
/// into the header last.
pub(crate) fn write_v1(archive: &mut Archive, dest: &Path) -> Result<()> {
    let (dirpath, prefix) = match &archive.backend {
        Backend::Vpk(info) => (info.cache.dirpath().to_path_buf(), info.cache.prefix().to_owned()),
        _ => return Err(Error::other("not a VPK archive")),
    };

    // Step 1: append pending payloads to their sibling archives at the
    // offsets assigned when they were added.
    let mut streamed = Vec::new();
    for index in 0..archive.entries.len() {
        let (archive_index, entry_offset) = match archive.entries[index].vpk() {
            Some(vpk) if vpk.pending.is_some() && vpk.archive_index != DIR_INDEX => {
                (vpk.archive_index, vpk.entry_offset)
            },
            _ => continue,
        };

        let sibling = archive_path(&dirpath, &prefix, archive_index);
        let mut out = match fs::OpenOptions::new().write(true).create(true).open(&sibling) {
            Ok(out) => out,
            Err(error) => return Err(Error::write_failed(format!("could not open {:?}: {}", sibling, error))),
        };
        if let Err(error) = out.seek(SeekFrom::Start(entry_offset as u64)) {
            return Err(Error::io_with_path(error, sibling));
        }

        let written = match archive.entries[index].vpk().and_then(|vpk| vpk.pending.as_ref()) {
            Some(PendingData::Memory(data)) => {
                if let Err(error) = out.write_all(data) {
                    return Err(Error::io_with_path(error, sibling));
                }
                None
            },
            Some(PendingData::Disk(source)) => {
                let source = source.clone();
                Some(stream_file(&source, &mut out)?)
            },
            None => continue,
        };

        let entry = &mut archive.entries[index];
        let vpk = entry.vpk_mut().unwrap();
        if let Some((length, crc)) = written {
            if length != vpk.entry_length {
                eprintln!("*** warning: {:?} changed size since it was added: {} -> {}",
                    archive.names[index], vpk.entry_length, length);
            }
            vpk.entry_length = length;
            vpk.crc32 = crc;
        }
        let length = vpk.entry_length;
        entry.size = entry.preload_size() as u64 + length as u64;
        entry.offset = entry_offset as u64;
        streamed.push(index);

        if let Backend::Vpk(info) = &mut archive.backend {
            let slot = archive_index as usize;
            if slot >= info.archive_sizes.len() {
                info.archive_sizes.resize(slot + 1, 0);
            }
            let end = entry_offset as u64 + length as u64;
            if end > info.archive_sizes[slot] {
                info.archive_sizes[slot] = end;
            }
        }
    }

    // Step 2: gather inline payloads and assign them offsets relative to
    // the end of the tree, cumulative in entry order. Reading happens
    // before the output file is created, the target may be the file the
    // data still lives in.
    let mut inline: Vec<(usize, u32, Vec<u8>)> = Vec::new();
    let mut rel = 0u32;
    for index in 0..archive.entries.len() {
        let (length, offset) = match archive.entries[index].vpk() {
            Some(vpk) if vpk.archive_index == DIR_INDEX && vpk.entry_length > 0 => {
                (vpk.entry_length, archive.entries[index].offset)
            },
            _ => continue,
        };

        let data = match &mut archive.backend {
            Backend::Vpk(info) => info.cache.read_dir_range(offset, length as usize)?,
            _ => unreachable!(),
        };

        inline.push((index, rel, data));
        rel += length;
    }
    let inline_rel: HashMap<usize, u32> =
        inline.iter().map(|(index, rel, _)| (*index, *rel)).collect();

    // Step 3: group entries by (extension, directory), first appearance
    // order on both levels.
    let mut groups: Vec<(String, Vec<(String, Vec<usize>)>)> = Vec::new();
    let mut ext_pos: HashMap<String, usize> = HashMap::new();
    let mut dir_pos: HashMap<(String, String), usize> = HashMap::new();

    for (index, entry) in archive.entries.iter().enumerate() {
        let group = match ext_pos.get(&entry.ext) {
            Some(pos) => *pos,
            None => {
                groups.push((entry.ext.clone(), Vec::new()));
                ext_pos.insert(entry.ext.clone(), groups.len() - 1);
                groups.len() - 1
            }
        };

        let key = (entry.ext.clone(), entry.dir.clone());
        let sub = match dir_pos.get(&key) {
            Some(pos) => *pos,
            None => {
                groups[group].1.push((entry.dir.clone(), Vec::new()));
                dir_pos.insert(key, groups[group].1.len() - 1);
                groups[group].1.len() - 1
            }
        };

        groups[group].1[sub].1.push(index);
    }

    // Step 4: emit header and tree.
    let file = match fs::File::create(dest) {
        Ok(file) => file,
        Err(error) => return Err(Error::write_failed(format!("could not create {:?}: {}", dest, error))),
    };
    let mut writer = BufWriter::new(file);
    let ioerr = |error: std::io::Error| Error::io_with_path(error, dest);

    writer.write_all(&VPK_MAGIC).map_err(ioerr)?;
    write_u32(&mut writer, 1).map_err(ioerr)?;
    write_u32(&mut writer, 0).map_err(ioerr)?; // tree size, patched below

    for (ext, dirs) in &groups {
        write_str(&mut writer, ext).map_err(ioerr)?;

        for (dir, items) in dirs {
            // the root directory is stored as a single space
            write_str(&mut writer, if dir.is_empty() { " " } else { dir }).map_err(ioerr)?;

            for &index in items {
                let entry = &archive.entries[index];
                let vpk = entry.vpk().unwrap();

                write_str(&mut writer, &entry.name).map_err(ioerr)?;

                let entry_offset = match inline_rel.get(&index) {
                    Some(rel) => *rel,
                    None => vpk.entry_offset,
                };
                write_u32(&mut writer, vpk.crc32).map_err(ioerr)?;
                write_u16(&mut writer, vpk.preload_size).map_err(ioerr)?;
                write_u16(&mut writer, vpk.archive_index).map_err(ioerr)?;
                write_u32(&mut writer, entry_offset).map_err(ioerr)?;
                write_u32(&mut writer, vpk.entry_length).map_err(ioerr)?;
                write_u16(&mut writer, TERMINATOR).map_err(ioerr)?;
                writer.write_all(&vpk.preload).map_err(ioerr)?;
            }
            writer.write_all(&[0]).map_err(ioerr)?;
        }
        writer.write_all(&[0]).map_err(ioerr)?;
    }
    writer.write_all(&[0]).map_err(ioerr)?;

    let tree_end = writer.seek(SeekFrom::Current(0)).map_err(ioerr)?;
    let tree_size = tree_end as u32 - V1_HEADER_SIZE as u32;

    // Step 5: inline payloads follow the tree directly.
    for (_, _, data) in &inline {
        writer.write_all(data).map_err(ioerr)?;
    }

    // Step 6: patch the header.
    writer.seek(SeekFrom::Start(8)).map_err(ioerr)?;
    write_u32(&mut writer, tree_size).map_err(ioerr)?;
    writer.flush().map_err(ioerr)?;
    drop(writer);

    // Step 7: the entries now describe the file just written.
    for (index, rel, _) in &inline {
        let entry = &mut archive.entries[*index];
        entry.offset = V1_HEADER_SIZE as u64 + tree_size as u64 + *rel as u64;
        entry.vpk_mut().unwrap().entry_offset = *rel;
    }
    for index in streamed {
        archive.entries[index].vpk_mut().unwrap().pending = None;
    }
    for entry in archive.entries.iter_mut() {
        entry.dirty = false;
        entry.on_disk = true;
    }

    if let Backend::Vpk(info) = &mut archive.backend {
        info.tree_size = tree_size;
        match fs::File::open(dest) {
            Ok(file) => info.cache.set_dir_handle(file),
            Err(error) => return Err(Error::io_with_path(error, dest)),
        }
    }
    archive.path = dest.to_path_buf();

    Ok(())
}
