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

use std::fs;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use crate::archive::Archive;
use crate::consts::{IWAD_MAGIC, PWAD_MAGIC, WAD_HEADER_SIZE, WAD_NAME_SIZE};
use crate::entry::{EntryData, FileEntry, WadEntry};
use crate::io::{write_i32, SliceReader};
use crate::result::{Result, Error};

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum WadKind {
    Iwad,
    Pwad,
}

impl WadKind {
    pub(crate) fn magic(self) -> [u8; 4] {
        match self {
            WadKind::Iwad => IWAD_MAGIC,
            WadKind::Pwad => PWAD_MAGIC,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WadKind::Iwad => "IWAD",
            WadKind::Pwad => "PWAD",
        }
    }
}

pub(crate) struct ParsedWad {
    pub(crate) kind:       WadKind,
    pub(crate) dir_offset: i32,
    pub(crate) entries:    Vec<FileEntry>,
}

pub(crate) fn parse(data: &[u8]) -> Result<ParsedWad> {
    let mut reader = SliceReader::new(data);

    let mut magic = [0u8; 4];
    reader.read_into(&mut magic)?;
    let kind = if magic == IWAD_MAGIC {
        WadKind::Iwad
    } else if magic == PWAD_MAGIC {
        WadKind::Pwad
    } else {
        return Err(Error::illegal_magic(magic));
    };

    let count      = reader.read_i32()?;
    let dir_offset = reader.read_i32()?;

    if count < 0 {
        return Err(Error::malformed(format!("negative lump count: {}", count)));
    }
    if dir_offset < 0 {
        return Err(Error::malformed(format!("negative directory offset: {}", dir_offset)));
    }

    reader.seek(dir_offset as usize)?;

    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let offset = reader.read_i32()?;
        let size   = reader.read_i32()?;
        let mut raw = [0u8; WAD_NAME_SIZE];
        reader.read_into(&mut raw)?;

        if offset < 0 || size < 0 {
            return Err(Error::malformed(format!("negative lump bounds: offset {}, size {}", offset, size)));
        }

        // lump names need not be NUL terminated, the 9th byte is implied
        let end = raw.iter().position(|&byte| byte == 0).unwrap_or(WAD_NAME_SIZE);
        let name = std::str::from_utf8(&raw[..end])?.to_owned();

        entries.push(FileEntry {
            name,
            dir: String::new(),
            ext: String::new(),
            size: size as u64,
            offset: offset as u64,
            on_disk: true,
            dirty: false,
            data: EntryData::Wad(WadEntry {
                lump_offset: offset,
                lump_size:   size,
                pending:     None,
            }),
        });
    }

    Ok(ParsedWad {
        kind,
        dir_offset,
        entries,
    })
}

/// Writes the whole archive: header, every lump payload in entry order, the
/// trailing directory, then the patched directory offset. All payloads are
/// materialized up front so the target may be the file being replaced.
pub(crate) fn write(archive: &mut Archive, dest: &Path) -> Result<()> {
    let count = archive.entries.len();
    let mut payloads = Vec::with_capacity(count);
    for index in 0..count {
        payloads.push(archive.entry_bytes_for_write(index)?);
    }

    let kind = archive.wad_kind().unwrap_or(WadKind::Pwad);

    let file = match fs::File::create(dest) {
        Ok(file) => file,
        Err(error) => return Err(Error::write_failed(format!("could not create {:?}: {}", dest, error))),
    };
    let mut writer = BufWriter::new(file);

    writer.write_all(&kind.magic()).map_err(|e| Error::io_with_path(e, dest))?;
    write_i32(&mut writer, count as i32).map_err(|e| Error::io_with_path(e, dest))?;
    write_i32(&mut writer, 0).map_err(|e| Error::io_with_path(e, dest))?;

    let mut offsets = Vec::with_capacity(count);
    let mut cursor = WAD_HEADER_SIZE as i32;
    for payload in &payloads {
        writer.write_all(payload).map_err(|e| Error::io_with_path(e, dest))?;
        offsets.push((cursor, payload.len() as i32));
        cursor += payload.len() as i32;
    }

    let dir_offset = cursor;
    for (entry, (offset, size)) in archive.entries.iter().zip(offsets.iter()) {
        write_i32(&mut writer, *offset).map_err(|e| Error::io_with_path(e, dest))?;
        write_i32(&mut writer, *size).map_err(|e| Error::io_with_path(e, dest))?;

        let mut raw = [0u8; WAD_NAME_SIZE];
        let bytes = entry.name.as_bytes();
        let len = if bytes.len() > WAD_NAME_SIZE { WAD_NAME_SIZE } else { bytes.len() };
        raw[..len].copy_from_slice(&bytes[..len]);
        writer.write_all(&raw).map_err(|e| Error::io_with_path(e, dest))?;
    }

    writer.seek(SeekFrom::Start(8)).map_err(|e| Error::io_with_path(e, dest))?;
    write_i32(&mut writer, dir_offset).map_err(|e| Error::io_with_path(e, dest))?;
    writer.flush().map_err(|e| Error::io_with_path(e, dest))?;
    drop(writer);

    for (entry, (offset, size)) in archive.entries.iter_mut().zip(offsets.iter()) {
        entry.offset  = *offset as u64;
        entry.size    = *size as u64;
        entry.on_disk = true;
        entry.dirty   = false;
        if let EntryData::Wad(wad) = &mut entry.data {
            wad.lump_offset = *offset;
            wad.lump_size   = *size;
            wad.pending     = None;
        }
    }

    archive.reopen_wad(dest, dir_offset)?;

    Ok(())
}
