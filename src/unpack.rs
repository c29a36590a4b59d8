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
use std::path::Path;

use regex::Regex;

use crate::archive::Archive;
use crate::result::{Result, Error};
use crate::util::entry_path_to_fs;

pub struct UnpackOptions<'a> {
    /// Entries matching any pattern are extracted; no patterns means all.
    pub patterns: &'a [Regex],
    pub verbose:  bool,
}

impl UnpackOptions<'_> {
    #[inline]
    pub fn new() -> Self {
        UnpackOptions::default()
    }
}

impl Default for UnpackOptions<'_> {
    #[inline]
    fn default() -> Self {
        Self {
            patterns: &[],
            verbose:  false,
        }
    }
}

pub fn unpack(archive: &mut Archive, outdir: impl AsRef<Path>, options: UnpackOptions) -> Result<()> {
    let outdir = outdir.as_ref();

    for handle in 0..archive.file_count() {
        let name = match archive.file_name(handle) {
            Some(name) => name.to_owned(),
            None => continue,
        };

        if !options.patterns.is_empty() && !options.patterns.iter().any(|pattern| pattern.is_match(&name)) {
            continue;
        }

        let outpath = entry_path_to_fs(outdir, &name);
        if options.verbose {
            println!("writing {:?}", outpath);
        }

        if let Some(parent) = outpath.parent() {
            if let Err(error) = fs::create_dir_all(parent) {
                return Err(Error::io_with_path(error, parent));
            }
        }

        archive.extract_to(handle, &outpath)?;
    }

    Ok(())
}
