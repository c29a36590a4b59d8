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

use crate::archive::{Archive, Format};
use crate::result::Result;
use crate::util::print_hex;

/// Prints a short summary of the archive. Signature bytes are dumped as
/// hex, they are carried verbatim and never validated here.
pub fn info(archive: &Archive) -> Result<()> {
    println!("Archive:   {}", archive.path().display());
    println!("Format:    {}", archive.format().name());
    println!("Base name: {}", archive.base_name());
    println!("Files:     {}", archive.file_count());

    match archive.format() {
        Format::Vpk1 | Format::Vpk2 => {
            if let Some(version) = archive.version() {
                println!("Version:   {}", version);
            }
            if let Some(tree_size) = archive.tree_size() {
                println!("Tree size: {}", tree_size);
            }
        },
        Format::Wad => {
            if let Some(kind) = archive.wad_kind() {
                println!("Type:      {}", kind.name());
            }
            if let Some(dir_offset) = archive.wad_dir_offset() {
                println!("Directory offset: {}", dir_offset);
            }
        },
        Format::Pak => {
            if let Some((dir_offset, dir_size)) = archive.pak_dir() {
                println!("Directory offset: {}", dir_offset);
                println!("Directory size:   {}", dir_size);
            }
        },
    }

    if archive.format() == Format::Vpk2 {
        println!("Archive MD5 records: {}", archive.archive_md5s().len());

        let public_key = archive.public_key();
        if public_key.is_empty() {
            println!("Public key: (none)");
        } else {
            println!("Public key: {} bytes", public_key.len());
            print_hex(public_key, "    ");
        }

        let signature = archive.signature();
        if signature.is_empty() {
            println!("Signature: (none)");
        } else {
            println!("Signature: {} bytes", signature.len());
            print_hex(signature, "    ");
        }
    }

    Ok(())
}
