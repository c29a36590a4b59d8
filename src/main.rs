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

use clap::{App, Arg};
use regex::Regex;

use gamepak::archive::Archive;
use gamepak::info::info;
use gamepak::list::{list, ListOptions};
use gamepak::result::{Result, Error};
use gamepak::unpack::{unpack, UnpackOptions};

fn run() -> Result<()> {
    let matches = App::new("gamepak")
        .version("1.0")
        .about("list, inspect, extract and modify VPK, WAD and PAK archives")
        .arg(Arg::with_name("list")
            .long("list")
            .short("l")
            .takes_value(false)
            .help("List fully qualified file names, one per line."))
        .arg(Arg::with_name("details")
            .long("details")
            .short("d")
            .takes_value(false)
            .help("With --list: also print size, preload size, archive index and CRC32."))
        .arg(Arg::with_name("info")
            .long("info")
            .short("i")
            .takes_value(false)
            .help("Print version, file count, base name and signature information."))
        .arg(Arg::with_name("extract")
            .long("extract")
            .short("x")
            .takes_value(false)
            .help("Extract files."))
        .arg(Arg::with_name("pattern")
            .long("pattern")
            .short("p")
            .takes_value(true)
            .multiple(true)
            .number_of_values(1)
            .value_name("REGEX")
            .help("Only extract entries matching any of the given regular expressions."))
        .arg(Arg::with_name("outdir")
            .long("outdir")
            .short("o")
            .takes_value(true)
            .value_name("DIR")
            .help("Extract below DIR instead of the archive base name."))
        .arg(Arg::with_name("find")
            .long("find")
            .short("f")
            .takes_value(true)
            .multiple(true)
            .number_of_values(1)
            .value_name("NAME")
            .help("Report whether each NAME is present in the archive."))
        .arg(Arg::with_name("add")
            .long("add")
            .takes_value(true)
            .multiple(true)
            .number_of_values(1)
            .value_name("NAME=PATH")
            .help("Add the file at PATH to the archive as NAME, then rewrite it."))
        .arg(Arg::with_name("remove")
            .long("remove")
            .takes_value(true)
            .multiple(true)
            .number_of_values(1)
            .value_name("NAME")
            .help("Remove NAME from the archive, then rewrite it."))
        .arg(Arg::with_name("human-readable")
            .long("human-readable")
            .takes_value(false)
            .help("Print sizes like 1 K, 2 M, 4 G etc."))
        .arg(Arg::with_name("verbose")
            .long("verbose")
            .short("v")
            .takes_value(false)
            .help("Print verbose output."))
        .arg(Arg::with_name("files")
            .index(1)
            .multiple(true)
            .required(true)
            .value_name("FILE")
            .help("Archive files to process."))
        .get_matches();

    let mut patterns = Vec::new();
    if let Some(values) = matches.values_of("pattern") {
        for value in values {
            match Regex::new(value) {
                Ok(pattern) => patterns.push(pattern),
                Err(error) => return Err(Error::other(format!("invalid pattern {:?}: {}", value, error))),
            }
        }
    }

    let mut additions = Vec::new();
    if let Some(values) = matches.values_of("add") {
        for value in values {
            match value.find('=') {
                Some(index) => additions.push((&value[..index], &value[index + 1..])),
                None => return Err(Error::other(format!("--add expects NAME=PATH, got {:?}", value))),
            }
        }
    }

    let removals: Vec<&str> = matches.values_of("remove").map(|v| v.collect()).unwrap_or_default();
    let finds:    Vec<&str> = matches.values_of("find").map(|v| v.collect()).unwrap_or_default();

    let details        = matches.is_present("details");
    let human_readable = matches.is_present("human-readable");
    let verbose        = matches.is_present("verbose");

    for path in matches.values_of("files").unwrap() {
        let mut archive = Archive::read_from_disk(path)?;

        if !removals.is_empty() || !additions.is_empty() {
            for &name in &removals {
                archive.remove_file(name)?;
            }
            for &(name, source) in &additions {
                archive.add_file_from_disk(name, source)?;
            }
            archive.write(None)?;
        }

        if matches.is_present("info") {
            info(&archive)?;
        }

        for &name in &finds {
            if archive.contains(name) {
                println!("{}: found", name);
            } else {
                println!("{}: not found", name);
            }
        }

        if matches.is_present("list") {
            list(&archive, ListOptions {
                details,
                human_readable,
            })?;
        }

        if matches.is_present("extract") {
            let outdir = match matches.value_of("outdir") {
                Some(outdir) => outdir.to_owned(),
                None => archive.base_name(),
            };

            unpack(&mut archive, &outdir, UnpackOptions {
                patterns: &patterns,
                verbose,
            })?;
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{}", error);
        std::process::exit(1);
    }
}
