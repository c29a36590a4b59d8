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

pub type Magic = [u8; 4];
pub type Md5 = [u8; 16];

/// 0x55AA1234 in on-disk byte order.
pub const VPK_MAGIC: Magic = [0x34, 0x12, 0xAA, 0x55];
pub const IWAD_MAGIC: Magic = *b"IWAD";
pub const PWAD_MAGIC: Magic = *b"PWAD";
pub const PAK_MAGIC: Magic = *b"PACK";

/// Archive index meaning "data lives in the _dir.vpk file itself".
pub const DIR_INDEX:  u16 = 0x7FFF;
pub const TERMINATOR: u16 = 0xFFFF;

pub const V1_HEADER_SIZE: usize = 4 * 3;
pub const V2_HEADER_SIZE: usize = 4 * 3 + 4 * 4;
pub const VPK_DIRENT_SIZE: usize = 4 + 2 + 2 + 4 + 4 + 2;
pub const ARCHIVE_MD5_SIZE: usize = 4 * 3 + 16;
pub const OTHER_MD5_SIZE: usize = 16 * 3;

pub const WAD_HEADER_SIZE: usize = 4 + 4 + 4;
pub const WAD_DIRENT_SIZE: usize = 4 + 4 + 8;
pub const WAD_NAME_SIZE: usize = 8;

pub const PAK_HEADER_SIZE: usize = 4 + 4 + 4;
pub const PAK_ENTRY_SIZE: usize = 56 + 4 + 4;
pub const PAK_NAME_SIZE: usize = 56;

/// Longest NUL terminated string the tree walk will accept.
pub const MAX_TOKEN_SIZE: usize = 512;

pub const BUFFER_SIZE: usize = 1024 * 1024;

/// Files at most this big are inlined into the directory as preload data.
pub const DEFAULT_MAX_PRELOAD_SIZE: u16 = 2048;
/// A sibling archive is not grown past this many bytes by added files.
pub const DEFAULT_SIZE_BUDGET: u64 = 512 * 1024 * 1024;
