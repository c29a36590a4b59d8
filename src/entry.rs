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

use std::path::PathBuf;

use crate::consts::DIR_INDEX;

/// Backing bytes of an entry that was added or replaced and is not yet
/// stored in the archive.
pub enum PendingData {
    Memory(Vec<u8>),
    Disk(PathBuf),
}

/// VPK directory entry state.
///
/// `entry_offset` is kept exactly as stored on disk: relative to the sibling
/// archive, or to the end of the directory tree for `DIR_INDEX` entries.
pub struct VpkEntry {
    pub(crate) crc32:         u32,
    pub(crate) preload_size:  u16,
    pub(crate) archive_index: u16,
    pub(crate) entry_offset:  u32,
    pub(crate) entry_length:  u32,
    pub(crate) preload:       Vec<u8>,
    pub(crate) pending:       Option<PendingData>,
}

pub struct WadEntry {
    pub(crate) lump_offset: i32,
    pub(crate) lump_size:   i32,
    pub(crate) pending:     Option<PendingData>,
}

pub struct PakEntry {
    pub(crate) data_offset: u32,
    pub(crate) data_size:   u32,
    pub(crate) pending:     Option<PendingData>,
}

pub(crate) enum EntryData {
    Vpk(VpkEntry),
    Wad(WadEntry),
    Pak(PakEntry),
}

/// One archived file, independent of the containing format.
///
/// Name conventions follow the formats themselves: a VPK name is the bare
/// file name without directory or extension, a WAD name is the lump name,
/// a PAK name is the full path as stored in its 56 byte field.
pub struct FileEntry {
    pub(crate) name:    String,
    pub(crate) dir:     String,
    pub(crate) ext:     String,
    pub(crate) size:    u64,
    pub(crate) offset:  u64,
    pub(crate) on_disk: bool,
    pub(crate) dirty:   bool,
    pub(crate) data:    EntryData,
}

impl FileEntry {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn directory(&self) -> &str {
        &self.dir
    }

    #[inline]
    pub fn extension(&self) -> &str {
        &self.ext
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[inline]
    pub fn on_disk(&self) -> bool {
        self.on_disk
    }

    #[inline]
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// The name the entry is looked up by: `dir/name.ext` for VPK entries,
    /// the plain entry name for WAD and PAK.
    pub fn full_name(&self) -> String {
        match &self.data {
            EntryData::Vpk(_) => {
                if self.dir.is_empty() {
                    format!("{}.{}", self.name, self.ext)
                } else {
                    format!("{}/{}.{}", self.dir, self.name, self.ext)
                }
            },
            EntryData::Wad(_) | EntryData::Pak(_) => self.name.clone(),
        }
    }

    pub fn preload_size(&self) -> u16 {
        match &self.data {
            EntryData::Vpk(vpk) => vpk.preload_size,
            _ => 0,
        }
    }

    pub fn crc32(&self) -> u32 {
        match &self.data {
            EntryData::Vpk(vpk) => vpk.crc32,
            _ => 0,
        }
    }

    pub fn archive_index(&self) -> u16 {
        match &self.data {
            EntryData::Vpk(vpk) => vpk.archive_index,
            _ => 0,
        }
    }

    /// True for VPK entries whose payload lives in the `_dir.vpk` file.
    pub fn is_inline(&self) -> bool {
        match &self.data {
            EntryData::Vpk(vpk) => vpk.archive_index == DIR_INDEX,
            _ => false,
        }
    }

    #[inline]
    pub(crate) fn vpk(&self) -> Option<&VpkEntry> {
        match &self.data {
            EntryData::Vpk(vpk) => Some(vpk),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn vpk_mut(&mut self) -> Option<&mut VpkEntry> {
        match &mut self.data {
            EntryData::Vpk(vpk) => Some(vpk),
            _ => None,
        }
    }
}
