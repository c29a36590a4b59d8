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

pub(crate) mod io;
pub(crate) mod pack;
pub(crate) mod util;

pub mod archive;
pub use self::archive::{Archive, FileHandle, Format, Search, VpkSettings};

pub mod archive_cache;
pub use self::archive_cache::ArchiveCache;

pub mod consts;
pub mod entry;
pub use self::entry::FileEntry;

pub mod result;
pub use self::result::{Error, ErrorType, Result};

pub mod vpk;
pub use self::vpk::{ArchiveMd5, OtherMd5};

pub mod wad;
pub use self::wad::WadKind;

pub mod pak;

pub mod list;
pub use self::list::{list, ListOptions};

pub mod info;
pub use self::info::info;

pub mod unpack;
pub use self::unpack::{unpack, UnpackOptions};
