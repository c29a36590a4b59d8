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

use crate::archive::Archive;
use crate::result::Result;
use crate::util::format_size;

pub struct ListOptions {
    pub details:        bool,
    pub human_readable: bool,
}

impl ListOptions {
    #[inline]
    pub fn new() -> Self {
        ListOptions::default()
    }
}

impl Default for ListOptions {
    #[inline]
    fn default() -> Self {
        Self {
            details:        false,
            human_readable: false,
        }
    }
}

struct DetailRow {
    size:    String,
    preload: String,
    archive: String,
    crc:     String,
    name:    String,
}

/// The numeric columns grow to their widest value and align right, the
/// file name runs flush left at the end of the line.
fn print_details(rows: &[DetailRow]) {
    let mut size_w    = "Size".len();
    let mut preload_w = "Preload".len();
    let mut archive_w = "Archive".len();
    let mut crc_w     = "CRC32".len();

    for row in rows {
        size_w    = size_w.max(row.size.len());
        preload_w = preload_w.max(row.preload.len());
        archive_w = archive_w.max(row.archive.len());
        crc_w     = crc_w.max(row.crc.len());
    }

    println!("{:>sw$}  {:>pw$}  {:>aw$}  {:>cw$}  {}",
        "Size", "Preload", "Archive", "CRC32", "Filename",
        sw = size_w, pw = preload_w, aw = archive_w, cw = crc_w);

    for row in rows {
        println!("{:>sw$}  {:>pw$}  {:>aw$}  {:>cw$}  {}",
            row.size, row.preload, row.archive, row.crc, row.name,
            sw = size_w, pw = preload_w, aw = archive_w, cw = crc_w);
    }
}

pub fn list(archive: &Archive, options: ListOptions) -> Result<()> {
    if !options.details {
        for (_, name) in archive.iter() {
            println!("{}", name);
        }
        return Ok(());
    }

    let fmt_size = if options.human_readable {
        |size: u64| format_size(size)
    } else {
        |size: u64| format!("{}", size)
    };

    let mut rows = Vec::with_capacity(archive.file_count());
    for (handle, name) in archive.iter() {
        let entry = &archive.files()[handle];
        rows.push(DetailRow {
            size:    fmt_size(entry.size()),
            preload: fmt_size(entry.preload_size() as u64),
            archive: if entry.is_inline() {
                "dir".to_owned()
            } else {
                format!("{}", entry.archive_index())
            },
            crc:     format!("0x{:08x}", entry.crc32()),
            name:    name.to_owned(),
        });
    }

    print_details(&rows);

    Ok(())
}
