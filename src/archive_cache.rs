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
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::consts::DIR_INDEX;
use crate::entry::VpkEntry;
use crate::io::transfer;
use crate::result::{Result, Error};
use crate::util::archive_path;

/// Pool of handles to the sibling archives of a split VPK.
///
/// Siblings are opened read-only on first use and stay open until the pool
/// is dropped. The `DIR_INDEX` sentinel is served from the separate handle
/// to the `_dir.vpk` file and never enters the sibling slots.
pub struct ArchiveCache {
    dirpath:    PathBuf,
    prefix:     String,
    dir_handle: Option<fs::File>,
    archives:   Vec<Option<fs::File>>,
}

impl ArchiveCache {
    pub fn new(dirpath: PathBuf, prefix: String, dir_handle: Option<fs::File>, archive_count: usize) -> ArchiveCache {
        let mut archives = Vec::new();
        archives.resize_with(archive_count, || None);

        ArchiveCache {
            dirpath,
            prefix,
            dir_handle,
            archives,
        }
    }

    #[inline]
    pub fn dirpath(&self) -> &Path {
        &self.dirpath
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[inline]
    pub fn archive_count(&self) -> usize {
        self.archives.len()
    }

    pub fn open_count(&self) -> usize {
        self.archives.iter().filter(|handle| handle.is_some()).count()
    }

    #[inline]
    pub fn archive_path(&self, index: u16) -> PathBuf {
        archive_path(&self.dirpath, &self.prefix, index)
    }

    /// Entries added after load may name a sibling one past the pool.
    pub(crate) fn ensure_capacity(&mut self, archive_count: usize) {
        if archive_count > self.archives.len() {
            self.archives.resize_with(archive_count, || None);
        }
    }

    pub fn get(&mut self, index: u16) -> Result<&mut fs::File> {
        if index == DIR_INDEX {
            if self.dir_handle.is_none() {
                let path = self.archive_path(DIR_INDEX);
                match fs::File::open(&path) {
                    Ok(file) => {
                        self.dir_handle = Some(file);
                    },
                    Err(error) => {
                        return Err(Error::io_with_path(error, path));
                    }
                }
            }
            return Ok(self.dir_handle.as_mut().unwrap());
        }

        let slot = index as usize;
        if slot >= self.archives.len() {
            return Err(Error::missing_archive(index));
        }

        if self.archives[slot].is_none() {
            let path = self.archive_path(index);
            match fs::File::open(&path) {
                Ok(file) => {
                    self.archives[slot] = Some(file);
                },
                Err(_) => {
                    return Err(Error::missing_archive(index).with_path(path));
                }
            }
        }

        Ok(self.archives[slot].as_mut().unwrap())
    }

    pub(crate) fn set_dir_handle(&mut self, handle: fs::File) {
        self.dir_handle = Some(handle);
    }

    /// Reads the full content of a VPK entry: the preload bytes followed by
    /// `entry_length` bytes at `offset` in the containing archive.
    pub fn read(&mut self, entry: &VpkEntry, offset: u64) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(entry.preload.len() + entry.entry_length as usize);
        data.extend_from_slice(&entry.preload);

        if entry.entry_length > 0 {
            let archive_index = entry.archive_index;
            let reader = self.get(archive_index)?;

            if let Err(error) = reader.seek(SeekFrom::Start(offset)) {
                return Err(Error::io_with_path(error, self.archive_path(archive_index)));
            }

            let start = data.len();
            data.resize(start + entry.entry_length as usize, 0);
            if let Err(error) = reader.read_exact(&mut data[start..]) {
                return Err(Error::io_with_path(error, self.archive_path(archive_index)));
            }
        }

        Ok(data)
    }

    /// Streams the full content of a VPK entry into `writer` without
    /// buffering the whole payload.
    pub fn transfer(&mut self, entry: &VpkEntry, offset: u64, writer: &mut fs::File) -> Result<()> {
        use std::io::Write;

        writer.write_all(&entry.preload)?;

        if entry.entry_length > 0 {
            let archive_index = entry.archive_index;
            let reader = self.get(archive_index)?;

            if let Err(error) = reader.seek(SeekFrom::Start(offset)) {
                return Err(Error::io_with_path(error, self.archive_path(archive_index)));
            }

            transfer(reader, writer, entry.entry_length as usize)?;
        }

        Ok(())
    }

    /// Reads an arbitrary range out of the `_dir.vpk` file itself.
    pub(crate) fn read_dir_range(&mut self, offset: u64, length: usize) -> Result<Vec<u8>> {
        let reader = self.get(DIR_INDEX)?;
        reader.seek(SeekFrom::Start(offset))?;

        let mut data = vec![0; length];
        reader.read_exact(&mut data)?;
        Ok(data)
    }
}
