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
use crate::consts::{PAK_ENTRY_SIZE, PAK_HEADER_SIZE, PAK_MAGIC, PAK_NAME_SIZE};
use crate::entry::{EntryData, FileEntry, PakEntry};
use crate::io::{write_u32, SliceReader};
use crate::result::{Result, Error};

pub(crate) struct ParsedPak {
    pub(crate) dir_offset: u32,
    pub(crate) dir_size:   u32,
    pub(crate) entries:    Vec<FileEntry>,
}

/// Splits a stored PAK path into its directory part and extension. The
/// extension keeps its leading dot, the way the original tooling reported
/// it.
pub(crate) fn split_name(name: &str) -> (String, String) {
    let dir = match name.rfind('/') {
        Some(index) => name[..index].to_owned(),
        None => String::new(),
    };
    let ext = match name.rfind('.') {
        Some(index) => name[index..].to_owned(),
        None => String::new(),
    };
    (dir, ext)
}

pub(crate) fn parse(data: &[u8]) -> Result<ParsedPak> {
    let mut reader = SliceReader::new(data);

    let mut magic = [0u8; 4];
    reader.read_into(&mut magic)?;
    if magic != PAK_MAGIC {
        return Err(Error::illegal_magic(magic));
    }

    let dir_offset = reader.read_u32()?;
    let dir_size   = reader.read_u32()?;

    // Directory records follow the header directly; a dir_size that is not
    // a whole number of records loses the tail.
    let count = dir_size as usize / PAK_ENTRY_SIZE;

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let mut raw = [0u8; PAK_NAME_SIZE];
        reader.read_into(&mut raw)?;
        let offset = reader.read_u32()?;
        let size   = reader.read_u32()?;

        // force termination even for a full 56 byte name
        let end = raw.iter().position(|&byte| byte == 0).unwrap_or(PAK_NAME_SIZE);
        let name = std::str::from_utf8(&raw[..end])?.to_owned();
        let (dir, ext) = split_name(&name);

        entries.push(FileEntry {
            name,
            dir,
            ext,
            size: size as u64,
            offset: offset as u64,
            on_disk: true,
            dirty: false,
            data: EntryData::Pak(PakEntry {
                data_offset: offset,
                data_size:   size,
                pending:     None,
            }),
        });
    }

    Ok(ParsedPak {
        dir_offset,
        dir_size,
        entries,
    })
}

/// Mirror of the WAD writer: header, payloads in entry order, trailing 64
/// byte directory records, then the patched directory fields.
pub(crate) fn write(archive: &mut Archive, dest: &Path) -> Result<()> {
    let count = archive.entries.len();
    let mut payloads = Vec::with_capacity(count);
    for index in 0..count {
        payloads.push(archive.entry_bytes_for_write(index)?);
    }

    let file = match fs::File::create(dest) {
        Ok(file) => file,
        Err(error) => return Err(Error::write_failed(format!("could not create {:?}: {}", dest, error))),
    };
    let mut writer = BufWriter::new(file);

    writer.write_all(&PAK_MAGIC).map_err(|e| Error::io_with_path(e, dest))?;
    write_u32(&mut writer, 0).map_err(|e| Error::io_with_path(e, dest))?;
    write_u32(&mut writer, 0).map_err(|e| Error::io_with_path(e, dest))?;

    let mut offsets = Vec::with_capacity(count);
    let mut cursor = PAK_HEADER_SIZE as u32;
    for payload in &payloads {
        writer.write_all(payload).map_err(|e| Error::io_with_path(e, dest))?;
        offsets.push((cursor, payload.len() as u32));
        cursor += payload.len() as u32;
    }

    let dir_offset = cursor;
    for (entry, (offset, size)) in archive.entries.iter().zip(offsets.iter()) {
        let mut raw = [0u8; PAK_NAME_SIZE];
        let bytes = entry.name.as_bytes();
        let len = if bytes.len() > PAK_NAME_SIZE { PAK_NAME_SIZE } else { bytes.len() };
        raw[..len].copy_from_slice(&bytes[..len]);
        writer.write_all(&raw).map_err(|e| Error::io_with_path(e, dest))?;
        write_u32(&mut writer, *offset).map_err(|e| Error::io_with_path(e, dest))?;
        write_u32(&mut writer, *size).map_err(|e| Error::io_with_path(e, dest))?;
    }

    let dir_size = (count * PAK_ENTRY_SIZE) as u32;
    writer.seek(SeekFrom::Start(4)).map_err(|e| Error::io_with_path(e, dest))?;
    write_u32(&mut writer, dir_offset).map_err(|e| Error::io_with_path(e, dest))?;
    write_u32(&mut writer, dir_size).map_err(|e| Error::io_with_path(e, dest))?;
    writer.flush().map_err(|e| Error::io_with_path(e, dest))?;
    drop(writer);

    for (entry, (offset, size)) in archive.entries.iter_mut().zip(offsets.iter()) {
        entry.offset  = *offset as u64;
        entry.size    = *size as u64;
        entry.on_disk = true;
        entry.dirty   = false;
        if let EntryData::Pak(pak) = &mut entry.data {
            pak.data_offset = *offset;
            pak.data_size   = *size;
            pak.pending     = None;
        }
    }

    archive.reopen_pak(dest, dir_offset, dir_size)?;

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::parse;
    use super::testdata::{push_entry, two_entry_pak};
    use crate::result::ErrorType;
    use crate::vpk::testdata::push_u32;

    #[test]
    fn parses_directory_records() {
        let parsed = parse(&two_entry_pak()).unwrap();
        assert_eq!(parsed.dir_offset, 12);
        assert_eq!(parsed.entries.len(), 2);

        let entry = &parsed.entries[0];
        assert_eq!(entry.name(), "maps/demo.bsp");
        assert_eq!(entry.directory(), "maps");
        assert_eq!(entry.extension(), ".bsp");
        assert_eq!(entry.size(), 16);
        assert_eq!(entry.offset(), 140);

        assert_eq!(parsed.entries[1].directory(), "sound");
        assert_eq!(parsed.entries[1].extension(), ".wav");
    }

    #[test]
    fn bad_magic_is_rejected() {
        let data = b"PAK0\x0c\x00\x00\x00\x00\x00\x00\x00";
        match parse(data) {
            Err(error) => match error.error_type() {
                ErrorType::IllegalMagic(_) => {},
                other => panic!("unexpected error: {:?}", other),
            },
            Ok(_) => panic!("parse should have failed"),
        }
    }

    #[test]
    fn ragged_dir_size_floors() {
        let mut data = Vec::new();
        data.extend_from_slice(b"PACK");
        push_u32(&mut data, 12);
        push_u32(&mut data, 64 + 63);
        push_entry(&mut data, "one.bin", 139, 0);
        data.extend_from_slice(&[0u8; 63]);
        let parsed = parse(&data).unwrap();
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].name(), "one.bin");
    }

    #[test]
    fn short_directory_is_truncated() {
        let mut data = Vec::new();
        data.extend_from_slice(b"PACK");
        push_u32(&mut data, 12);
        push_u32(&mut data, 64);
        data.extend_from_slice(&[1u8; 10]);
        match parse(&data) {
            Err(error) => match error.error_type() {
                ErrorType::UnexpectedEOF => {},
                other => panic!("unexpected error: {:?}", other),
            },
            Ok(_) => panic!("parse should have failed"),
        }
    }
}
