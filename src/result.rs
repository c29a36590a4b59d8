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

use std::path::{Path, PathBuf};

use crate::consts::Magic;

#[derive(Debug)]
pub enum ErrorType {
    IO(std::io::Error),
    StrFromUTF8(std::str::Utf8Error),
    IllegalMagic(Magic),
    UnsupportedVersion(u32),
    UnexpectedEOF,
    Malformed(String),
    NoSuchEntry(String),
    MissingArchive(u16),
    WriteFailed(String),
    Other(String),
}

/// An error, carrying the path of the file it concerns when one is known.
#[derive(Debug)]
pub struct Error {
    pub(crate) error_type: ErrorType,
    pub(crate) path:       Option<PathBuf>,
}

impl Error {
    fn of(error_type: ErrorType) -> Self {
        Error {
            error_type,
            path: None,
        }
    }

    #[inline]
    pub fn error_type(&self) -> &ErrorType {
        &self.error_type
    }

    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn io_with_path(error: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::of(ErrorType::IO(error)).with_path(path)
    }

    pub fn illegal_magic(magic: Magic) -> Self {
        Error::of(ErrorType::IllegalMagic(magic))
    }

    pub fn unsupported_version(version: u32) -> Self {
        Error::of(ErrorType::UnsupportedVersion(version))
    }

    pub fn unexpected_eof() -> Self {
        Error::of(ErrorType::UnexpectedEOF)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Error::of(ErrorType::Malformed(message.into()))
    }

    pub fn no_such_entry(name: impl Into<String>) -> Self {
        Error::of(ErrorType::NoSuchEntry(name.into()))
    }

    pub fn missing_archive(index: u16) -> Self {
        Error::of(ErrorType::MissingArchive(index))
    }

    pub fn write_failed(message: impl Into<String>) -> Self {
        Error::of(ErrorType::WriteFailed(message.into()))
    }

    pub fn other(message: impl Into<String>) -> Self {
        Error::of(ErrorType::Other(message.into()))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{}: ", path.display())?;
        }

        match &self.error_type {
            ErrorType::IO(error) => error.fmt(f),
            ErrorType::StrFromUTF8(error) => error.fmt(f),
            ErrorType::IllegalMagic(magic) => {
                f.write_str("bad file magic")?;
                for byte in magic.iter() {
                    write!(f, " {:02X}", byte)?;
                }
                Ok(())
            },
            ErrorType::UnsupportedVersion(version) => {
                write!(f, "unsupported version {}", version)
            },
            ErrorType::UnexpectedEOF => f.write_str("unexpected end of file"),
            ErrorType::Malformed(message) => write!(f, "malformed archive: {}", message),
            ErrorType::NoSuchEntry(name) => write!(f, "entry not found: {:?}", name),
            ErrorType::MissingArchive(index) => {
                write!(f, "could not open sibling archive {:03}", index)
            },
            ErrorType::WriteFailed(message) => write!(f, "write failed: {}", message),
            ErrorType::Other(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.error_type {
            ErrorType::IO(error) => Some(error),
            ErrorType::StrFromUTF8(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::of(ErrorType::IO(error))
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(error: std::str::Utf8Error) -> Self {
        Error::of(ErrorType::StrFromUTF8(error))
    }
}

pub type Result<T> = core::result::Result<T, Error>;
