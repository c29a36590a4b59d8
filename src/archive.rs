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
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::archive_cache::ArchiveCache;
use crate::consts::{
    DEFAULT_MAX_PRELOAD_SIZE, DEFAULT_SIZE_BUDGET, DIR_INDEX, IWAD_MAGIC,
    PAK_MAGIC, PWAD_MAGIC, V1_HEADER_SIZE, V2_HEADER_SIZE, VPK_MAGIC,
};
use crate::entry::{EntryData, FileEntry, PendingData, VpkEntry, WadEntry, PakEntry};
use crate::io::crc32_of;
use crate::result::{Result, Error};
use crate::util::split_entry_name;
use crate::vpk::{self, ArchiveMd5, OtherMd5};
use crate::wad::{self, WadKind};
use crate::pak;
use crate::pack;

/// Index of an entry within its archive. Handles stay valid until an entry
/// is removed, which compacts the list.
pub type FileHandle = usize;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Format {
    Vpk1,
    Vpk2,
    Wad,
    Pak,
}

impl Format {
    pub fn name(self) -> &'static str {
        match self {
            Format::Vpk1 => "VPK1",
            Format::Vpk2 => "VPK2",
            Format::Wad  => "WAD",
            Format::Pak  => "PAK",
        }
    }
}

/// Limits consulted when files are added to a VPK: files up to
/// `max_preload_size` are inlined into the directory, larger ones go to
/// the first sibling archive that stays within `size_budget`.
#[derive(Clone, Copy)]
pub struct VpkSettings {
    pub max_preload_size: u16,
    pub size_budget:      u64,
}

impl Default for VpkSettings {
    #[inline]
    fn default() -> Self {
        Self {
            max_preload_size: DEFAULT_MAX_PRELOAD_SIZE,
            size_budget:      DEFAULT_SIZE_BUDGET,
        }
    }
}

pub(crate) struct VpkInfo {
    pub(crate) version:      u32,
    pub(crate) tree_size:    u32,
    pub(crate) header_size:  u32,
    pub(crate) settings:     VpkSettings,
    /// Highest used byte per sibling archive, indexed by archive index.
    pub(crate) archive_sizes: Vec<u64>,
    pub(crate) cache:        ArchiveCache,
    pub(crate) archive_md5s: Vec<ArchiveMd5>,
    pub(crate) other_md5:    Option<OtherMd5>,
    pub(crate) public_key:   Vec<u8>,
    pub(crate) signature:    Vec<u8>,
}

pub(crate) struct WadInfo {
    pub(crate) kind:       WadKind,
    pub(crate) dir_offset: i32,
    pub(crate) handle:     Option<fs::File>,
}

pub(crate) struct PakInfo {
    pub(crate) dir_offset: u32,
    pub(crate) dir_size:   u32,
    pub(crate) handle:     Option<fs::File>,
}

pub(crate) enum Backend {
    Vpk(VpkInfo),
    Wad(WadInfo),
    Pak(PakInfo),
}

/// One archive of any supported format. Owns all entries, their buffers and
/// every file handle; dropping the archive closes them all.
pub struct Archive {
    pub(crate) path:    PathBuf,
    pub(crate) entries: Vec<FileEntry>,
    pub(crate) names:   Vec<String>,
    pub(crate) handles: HashMap<String, FileHandle>,
    pub(crate) backend: Backend,
}

/// Iterator over a handle range, yielding `(handle, full name)` pairs.
pub struct Search<'a> {
    names: &'a [String],
    next:  usize,
    end:   usize,
}

impl<'a> Iterator for Search<'a> {
    type Item = (FileHandle, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let item = (self.next, self.names[self.next].as_str());
        self.next += 1;
        Some(item)
    }
}

fn index_names(entries: &[FileEntry]) -> (Vec<String>, HashMap<String, FileHandle>) {
    let mut names = Vec::with_capacity(entries.len());
    let mut handles = HashMap::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let name = entry.full_name();
        if handles.contains_key(&name) {
            eprintln!("*** warning: duplicate entry name: {:?}", name);
        } else {
            handles.insert(name.clone(), index);
        }
        names.push(name);
    }

    (names, handles)
}

impl Archive {
    /// Creates an empty archive that will be written to `path`.
    pub fn new(format: Format, path: impl AsRef<Path>) -> Result<Archive> {
        let path = path.as_ref().to_path_buf();

        let backend = match format {
            Format::Vpk1 | Format::Vpk2 => {
                let (dirpath, prefix, _) = vpk::parse_path(&path)?;
                let version = if format == Format::Vpk2 { 2 } else { 1 };
                Backend::Vpk(VpkInfo {
                    version,
                    tree_size: 0,
                    header_size: if version == 2 { V2_HEADER_SIZE as u32 } else { V1_HEADER_SIZE as u32 },
                    settings: VpkSettings::default(),
                    archive_sizes: Vec::new(),
                    cache: ArchiveCache::new(dirpath, prefix, None, 0),
                    archive_md5s: Vec::new(),
                    other_md5: None,
                    public_key: Vec::new(),
                    signature: Vec::new(),
                })
            },
            Format::Wad => Backend::Wad(WadInfo {
                kind: WadKind::Pwad,
                dir_offset: 0,
                handle: None,
            }),
            Format::Pak => Backend::Pak(PakInfo {
                dir_offset: 0,
                dir_size: 0,
                handle: None,
            }),
        };

        Ok(Archive {
            path,
            entries: Vec::new(),
            names: Vec::new(),
            handles: HashMap::new(),
            backend,
        })
    }

    /// Loads an archive, deciding the format from its magic bytes.
    pub fn read_from_disk(path: impl AsRef<Path>) -> Result<Archive> {
        let path = path.as_ref();

        let mut file = match fs::File::open(path) {
            Ok(file) => file,
            Err(error) => return Err(Error::io_with_path(error, path)),
        };

        let mut data = Vec::new();
        if let Err(error) = file.read_to_end(&mut data) {
            return Err(Error::io_with_path(error, path));
        }

        if data.len() < 4 {
            return Err(Error::unexpected_eof().with_path(path));
        }

        let magic = [data[0], data[1], data[2], data[3]];

        let backend;
        let entries;

        if magic == VPK_MAGIC {
            let parsed = match vpk::parse(&data) {
                Ok(parsed) => parsed,
                Err(error) => return Err(error.with_path(path)),
            };

            let (dirpath, prefix, _) = vpk::parse_path(path)?;
            let cache = ArchiveCache::new(dirpath, prefix, Some(file), parsed.archive_sizes.len());

            entries = parsed.entries;
            backend = Backend::Vpk(VpkInfo {
                version:       parsed.version,
                tree_size:     parsed.tree_size,
                header_size:   parsed.header_size,
                settings:      VpkSettings::default(),
                archive_sizes: parsed.archive_sizes,
                cache,
                archive_md5s:  parsed.archive_md5s,
                other_md5:     parsed.other_md5,
                public_key:    parsed.public_key,
                signature:     parsed.signature,
            });
        } else if magic == IWAD_MAGIC || magic == PWAD_MAGIC {
            let parsed = match wad::parse(&data) {
                Ok(parsed) => parsed,
                Err(error) => return Err(error.with_path(path)),
            };

            entries = parsed.entries;
            backend = Backend::Wad(WadInfo {
                kind:       parsed.kind,
                dir_offset: parsed.dir_offset,
                handle:     Some(file),
            });
        } else if magic == PAK_MAGIC {
            let parsed = match pak::parse(&data) {
                Ok(parsed) => parsed,
                Err(error) => return Err(error.with_path(path)),
            };

            entries = parsed.entries;
            backend = Backend::Pak(PakInfo {
                dir_offset: parsed.dir_offset,
                dir_size:   parsed.dir_size,
                handle:     Some(file),
            });
        } else {
            return Err(Error::illegal_magic(magic).with_path(path));
        }

        let (names, handles) = index_names(&entries);

        Ok(Archive {
            path: path.to_path_buf(),
            entries,
            names,
            handles,
            backend,
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> Format {
        match &self.backend {
            Backend::Vpk(info) => if info.version == 2 { Format::Vpk2 } else { Format::Vpk1 },
            Backend::Wad(_) => Format::Wad,
            Backend::Pak(_) => Format::Pak,
        }
    }

    /// For split VPKs the path with the `_dir.vpk` suffix stripped, the
    /// on-disk path otherwise.
    pub fn base_name(&self) -> String {
        match &self.backend {
            Backend::Vpk(info) => {
                info.cache.dirpath().join(info.cache.prefix()).to_string_lossy().into_owned()
            },
            _ => self.path.to_string_lossy().into_owned(),
        }
    }

    #[inline]
    pub fn file_count(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn files(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn version(&self) -> Option<u32> {
        match &self.backend {
            Backend::Vpk(info) => Some(info.version),
            _ => None,
        }
    }

    pub fn tree_size(&self) -> Option<u32> {
        match &self.backend {
            Backend::Vpk(info) => Some(info.tree_size),
            _ => None,
        }
    }

    pub fn wad_kind(&self) -> Option<WadKind> {
        match &self.backend {
            Backend::Wad(info) => Some(info.kind),
            _ => None,
        }
    }

    pub fn set_wad_kind(&mut self, kind: WadKind) {
        if let Backend::Wad(info) = &mut self.backend {
            info.kind = kind;
        }
    }

    pub fn set_vpk_settings(&mut self, settings: VpkSettings) {
        if let Backend::Vpk(info) = &mut self.backend {
            info.settings = settings;
        }
    }

    pub fn archive_md5s(&self) -> &[ArchiveMd5] {
        match &self.backend {
            Backend::Vpk(info) => &info.archive_md5s,
            _ => &[],
        }
    }

    pub fn other_md5(&self) -> Option<&OtherMd5> {
        match &self.backend {
            Backend::Vpk(info) => info.other_md5.as_ref(),
            _ => None,
        }
    }

    pub fn public_key(&self) -> &[u8] {
        match &self.backend {
            Backend::Vpk(info) => &info.public_key,
            _ => &[],
        }
    }

    pub fn signature(&self) -> &[u8] {
        match &self.backend {
            Backend::Vpk(info) => &info.signature,
            _ => &[],
        }
    }

    /// Number of sibling handles currently held open by the pool.
    pub fn open_sibling_handles(&self) -> usize {
        match &self.backend {
            Backend::Vpk(info) => info.cache.open_count(),
            _ => 0,
        }
    }

    #[inline]
    pub fn find(&self, name: &str) -> Option<FileHandle> {
        self.handles.get(name).copied()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.handles.contains_key(name)
    }

    #[inline]
    pub fn file_name(&self, handle: FileHandle) -> Option<&str> {
        self.names.get(handle).map(|name| name.as_str())
    }

    pub fn size(&self, handle: FileHandle) -> u64 {
        self.entries.get(handle).map(|entry| entry.size()).unwrap_or(0)
    }

    pub fn preload_size(&self, handle: FileHandle) -> u64 {
        self.entries.get(handle).map(|entry| entry.preload_size() as u64).unwrap_or(0)
    }

    pub fn crc32(&self, handle: FileHandle) -> u32 {
        self.entries.get(handle).map(|entry| entry.crc32()).unwrap_or(0)
    }

    pub fn archive_index(&self, handle: FileHandle) -> u16 {
        self.entries.get(handle).map(|entry| entry.archive_index()).unwrap_or(0)
    }

    /// Copy of the entry's inline preload bytes; empty for entries without
    /// preload data and for non-VPK formats.
    pub fn read_preload(&self, handle: FileHandle) -> Vec<u8> {
        match self.entries.get(handle) {
            Some(entry) => match entry.vpk() {
                Some(vpk) => vpk.preload.clone(),
                None => Vec::new(),
            },
            None => Vec::new(),
        }
    }

    /// All entries in insertion order.
    pub fn iter(&self) -> Search {
        Search {
            names: &self.names,
            next:  0,
            end:   self.names.len(),
        }
    }

    /// The first contiguous run of entries whose full name starts with
    /// `prefix`. The on-disk tree groups by extension before directory, so
    /// a directory spread over several extensions yields only its first
    /// run; use `iter()` with a predicate for an exhaustive walk.
    pub fn iter_in_directory(&self, prefix: &str) -> Search {
        let mut start = None;
        let mut end = self.names.len();

        for (index, name) in self.names.iter().enumerate() {
            if name.starts_with(prefix) {
                if start.is_none() {
                    start = Some(index);
                }
            } else if start.is_some() {
                end = index;
                break;
            }
        }

        match start {
            Some(start) => Search { names: &self.names, next: start, end },
            None        => Search { names: &self.names, next: 0,     end: 0 },
        }
    }

    /// Full content of an entry: preload bytes followed by archive data.
    /// The returned buffer is freshly allocated on every call.
    pub fn read(&mut self, handle: FileHandle) -> Result<Vec<u8>> {
        if handle >= self.entries.len() {
            return Err(Error::no_such_entry(format!("#{}", handle)));
        }

        // entries added or replaced since load are served from their
        // pending backing store
        let pending = match &self.entries[handle].data {
            EntryData::Vpk(vpk) => vpk.pending.as_ref(),
            EntryData::Wad(wad) => wad.pending.as_ref(),
            EntryData::Pak(pak) => pak.pending.as_ref(),
        };
        if let Some(pending) = pending {
            let mut data = match &self.entries[handle].data {
                EntryData::Vpk(vpk) => vpk.preload.clone(),
                _ => Vec::new(),
            };
            match pending {
                PendingData::Memory(buf) => data.extend_from_slice(buf),
                PendingData::Disk(src) => {
                    let mut file = match fs::File::open(src) {
                        Ok(file) => file,
                        Err(error) => return Err(Error::io_with_path(error, src)),
                    };
                    if let Err(error) = file.read_to_end(&mut data) {
                        return Err(Error::io_with_path(error, src));
                    }
                },
            }
            return Ok(data);
        }

        let entry = &self.entries[handle];
        match (&entry.data, &mut self.backend) {
            (EntryData::Vpk(vpk), Backend::Vpk(info)) => {
                info.cache.read(vpk, entry.offset)
            },
            (EntryData::Wad(_), Backend::Wad(info)) => {
                Self::read_plain(&mut info.handle, &self.path, entry.offset, entry.size as usize)
            },
            (EntryData::Pak(_), Backend::Pak(info)) => {
                Self::read_plain(&mut info.handle, &self.path, entry.offset, entry.size as usize)
            },
            _ => Err(Error::other("entry does not belong to this archive")),
        }
    }

    pub fn read_by_name(&mut self, name: &str) -> Result<Vec<u8>> {
        match self.find(name) {
            Some(handle) => self.read(handle),
            None => Err(Error::no_such_entry(name)),
        }
    }

    fn read_plain(handle: &mut Option<fs::File>, path: &Path, offset: u64, size: usize) -> Result<Vec<u8>> {
        if handle.is_none() {
            match fs::File::open(path) {
                Ok(file) => *handle = Some(file),
                Err(error) => return Err(Error::io_with_path(error, path)),
            }
        }

        let file = handle.as_mut().unwrap();
        if let Err(error) = file.seek(SeekFrom::Start(offset)) {
            return Err(Error::io_with_path(error, path));
        }

        let mut data = vec![0; size];
        if let Err(error) = file.read_exact(&mut data) {
            return Err(Error::io_with_path(error, path));
        }

        Ok(data)
    }

    /// Extracts one entry to `dest`, streaming archive data where possible.
    pub fn extract_to(&mut self, handle: FileHandle, dest: impl AsRef<Path>) -> Result<()> {
        let dest = dest.as_ref();
        if handle >= self.entries.len() {
            return Err(Error::no_such_entry(format!("#{}", handle)));
        }

        let mut out = match fs::File::create(dest) {
            Ok(file) => file,
            Err(error) => return Err(Error::io_with_path(error, dest)),
        };

        let streamable = match &self.entries[handle].data {
            EntryData::Vpk(vpk) => vpk.pending.is_none(),
            _ => false,
        };

        if streamable {
            let entry = &self.entries[handle];
            if let (EntryData::Vpk(vpk), Backend::Vpk(info)) = (&entry.data, &mut self.backend) {
                info.cache.transfer(vpk, entry.offset, &mut out)?;
            }
        } else {
            let data = self.read(handle)?;
            if let Err(error) = out.write_all(&data) {
                return Err(Error::io_with_path(error, dest));
            }
        }

        Ok(())
    }

    pub fn extract_file(&mut self, name: &str, dest: impl AsRef<Path>) -> Result<()> {
        match self.find(name) {
            Some(handle) => self.extract_to(handle, dest),
            None => Err(Error::no_such_entry(name)),
        }
    }

    /// Adds a file held in memory. The data is not written out until
    /// `write`.
    pub fn add_file_data(&mut self, name: &str, data: Vec<u8>) -> Result<FileHandle> {
        self.add_entry(name, PendingData::Memory(data))
    }

    /// Adds a file backed by a path on disk; the bytes are pulled in at
    /// write time. The file must exist when it is added.
    pub fn add_file_from_disk(&mut self, name: &str, source: impl AsRef<Path>) -> Result<FileHandle> {
        self.add_entry(name, PendingData::Disk(source.as_ref().to_path_buf()))
    }

    fn add_entry(&mut self, name: &str, source: PendingData) -> Result<FileHandle> {
        let name = name.trim_matches('/');
        if name.is_empty() {
            return Err(Error::other("entry name must not be empty"));
        }
        if self.handles.contains_key(name) {
            return Err(Error::other(format!("entry already exists: {:?}", name)));
        }

        let size = match &source {
            PendingData::Memory(data) => data.len() as u64,
            PendingData::Disk(path) => match fs::metadata(path) {
                Ok(meta) => meta.len(),
                Err(error) => return Err(Error::io_with_path(error, path)),
            },
        };

        let entry = match &mut self.backend {
            Backend::Vpk(info) => Self::new_vpk_entry(info, name, source, size)?,
            Backend::Wad(_) => {
                FileEntry {
                    name: name.to_owned(),
                    dir: String::new(),
                    ext: String::new(),
                    size,
                    offset: 0,
                    on_disk: false,
                    dirty: true,
                    data: EntryData::Wad(WadEntry {
                        lump_offset: 0,
                        lump_size:   size as i32,
                        pending:     Some(source),
                    }),
                }
            },
            Backend::Pak(_) => {
                let (dir, ext) = pak::split_name(name);
                FileEntry {
                    name: name.to_owned(),
                    dir,
                    ext,
                    size,
                    offset: 0,
                    on_disk: false,
                    dirty: true,
                    data: EntryData::Pak(PakEntry {
                        data_offset: 0,
                        data_size:   size as u32,
                        pending:     Some(source),
                    }),
                }
            },
        };

        let handle = self.entries.len();
        let full = entry.full_name();
        self.entries.push(entry);
        self.names.push(full.clone());
        self.handles.insert(full, handle);
        Ok(handle)
    }

    fn new_vpk_entry(info: &mut VpkInfo, name: &str, source: PendingData, size: u64) -> Result<FileEntry> {
        let (dir, base, ext) = split_entry_name(name);
        if ext.is_empty() {
            return Err(Error::other(format!("file names must be of format \"NAME.EXT\": {:?}", name)));
        }

        // small files become preload data inside the directory file
        if size <= info.settings.max_preload_size as u64 {
            let data = match source {
                PendingData::Memory(data) => data,
                PendingData::Disk(path) => match fs::read(&path) {
                    Ok(data) => data,
                    Err(error) => return Err(Error::io_with_path(error, path)),
                },
            };

            let crc = crc32_of(&data);

            return Ok(FileEntry {
                name: base,
                dir,
                ext,
                size: data.len() as u64,
                offset: 0,
                on_disk: false,
                dirty: true,
                data: EntryData::Vpk(VpkEntry {
                    crc32:         crc,
                    preload_size:  data.len() as u16,
                    archive_index: 0,
                    entry_offset:  0,
                    entry_length:  0,
                    preload:       data,
                    pending:       None,
                }),
            });
        }

        // otherwise the lowest sibling with room, or a brand new one
        let mut archive_index = None;
        for (index, used) in info.archive_sizes.iter().enumerate() {
            if used + size <= info.settings.size_budget {
                archive_index = Some(index as u16);
                break;
            }
        }
        let archive_index = match archive_index {
            Some(index) => index,
            None => {
                if info.archive_sizes.len() >= DIR_INDEX as usize {
                    return Err(Error::other("too many sibling archives"));
                }
                info.archive_sizes.push(0);
                (info.archive_sizes.len() - 1) as u16
            }
        };

        let entry_offset = info.archive_sizes[archive_index as usize];
        info.archive_sizes[archive_index as usize] = entry_offset + size;
        info.cache.ensure_capacity(info.archive_sizes.len());

        let crc = match &source {
            PendingData::Memory(data) => crc32_of(data),
            // computed while the file is streamed at write time
            PendingData::Disk(_) => 0,
        };

        Ok(FileEntry {
            name: base,
            dir,
            ext,
            size,
            offset: entry_offset,
            on_disk: false,
            dirty: true,
            data: EntryData::Vpk(VpkEntry {
                crc32:         crc,
                preload_size:  0,
                archive_index,
                entry_offset:  entry_offset as u32,
                entry_length:  size as u32,
                preload:       Vec::new(),
                pending:       Some(source),
            }),
        })
    }

    /// Removes an entry. Handles handed out earlier are invalidated, the
    /// entry list is compacted and re-indexed.
    pub fn remove_file(&mut self, name: &str) -> Result<()> {
        let handle = match self.handles.get(name) {
            Some(handle) => *handle,
            None => return Err(Error::no_such_entry(name)),
        };

        self.entries.remove(handle);
        let (names, handles) = index_names(&self.entries);
        self.names = names;
        self.handles = handles;
        Ok(())
    }

    /// Writes the archive out. `path` overrides the target; the default is
    /// the path the archive was opened with. A complete new directory file
    /// is always produced.
    pub fn write(&mut self, path: Option<&Path>) -> Result<()> {
        let dest = match path {
            Some(path) => path.to_path_buf(),
            None => self.path.clone(),
        };

        match self.format() {
            Format::Vpk1 => pack::write_v1(self, &dest),
            Format::Vpk2 => Err(Error::unsupported_version(2).with_path(dest)),
            Format::Wad  => wad::write(self, &dest),
            Format::Pak  => pak::write(self, &dest),
        }
    }

    /// Payload bytes of one entry as they must appear in a rewritten
    /// archive. A dirty source that disappeared surfaces as `WriteFailed`.
    pub(crate) fn entry_bytes_for_write(&mut self, handle: FileHandle) -> Result<Vec<u8>> {
        {
            let pending = match &self.entries[handle].data {
                EntryData::Vpk(vpk) => vpk.pending.as_ref(),
                EntryData::Wad(wad) => wad.pending.as_ref(),
                EntryData::Pak(pak) => pak.pending.as_ref(),
            };

            match pending {
                Some(PendingData::Memory(data)) => return Ok(data.clone()),
                Some(PendingData::Disk(source)) => {
                    return match fs::read(source) {
                        Ok(data) => Ok(data),
                        Err(error) => Err(Error::write_failed(
                            format!("source file {:?}: {}", source, error))),
                    };
                },
                None => {},
            }
        }

        self.read(handle)
    }

    pub(crate) fn reopen_wad(&mut self, dest: &Path, dir_offset: i32) -> Result<()> {
        if let Backend::Wad(info) = &mut self.backend {
            info.dir_offset = dir_offset;
            match fs::File::open(dest) {
                Ok(file) => info.handle = Some(file),
                Err(error) => return Err(Error::io_with_path(error, dest)),
            }
        }
        self.path = dest.to_path_buf();
        Ok(())
    }

    pub(crate) fn reopen_pak(&mut self, dest: &Path, dir_offset: u32, dir_size: u32) -> Result<()> {
        if let Backend::Pak(info) = &mut self.backend {
            info.dir_offset = dir_offset;
            info.dir_size = dir_size;
            match fs::File::open(dest) {
                Ok(file) => info.handle = Some(file),
                Err(error) => return Err(Error::io_with_path(error, dest)),
            }
        }
        self.path = dest.to_path_buf();
        Ok(())
    }

    pub(crate) fn wad_dir_offset(&self) -> Option<i32> {
        match &self.backend {
            Backend::Wad(info) => Some(info.dir_offset),
            _ => None,
        }
    }

    pub(crate) fn pak_dir(&self) -> Option<(u32, u32)> {
        match &self.backend {
            Backend::Pak(info) => Some((info.dir_offset, info.dir_size)),
            _ => None,
        }
    }
}
