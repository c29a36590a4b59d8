use std::io::{Read, Write};

use crc::{crc32, Hasher32};

use crate::consts::BUFFER_SIZE;
use crate::result::{Result, Error};

/// Bounds checked cursor over an in-memory byte slice. Values are always
/// copied out; malformed input surfaces as `UnexpectedEOF` instead of an
/// out-of-range access.
pub struct SliceReader<'a> {
    data: &'a [u8],
    pos:  usize,
}

impl<'a> SliceReader<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        SliceReader {
            data,
            pos: 0,
        }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        if self.remaining() < 2 {
            return Err(Error::unexpected_eof());
        }
        let buf = &self.data[self.pos..];
        self.pos += 2;
        Ok((buf[1] as u16) << 8 | buf[0] as u16)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        if self.remaining() < 4 {
            return Err(Error::unexpected_eof());
        }
        let buf = &self.data[self.pos..];
        self.pos += 4;
        Ok((buf[3] as u32) << 24 | (buf[2] as u32) << 16 | (buf[1] as u32) << 8 | buf[0] as u32)
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_into(&mut self, buffer: &mut [u8]) -> Result<()> {
        if self.remaining() < buffer.len() {
            return Err(Error::unexpected_eof());
        }
        buffer.copy_from_slice(&self.data[self.pos..self.pos + buffer.len()]);
        self.pos += buffer.len();
        Ok(())
    }

    pub fn read_vec(&mut self, count: usize) -> Result<Vec<u8>> {
        if self.remaining() < count {
            return Err(Error::unexpected_eof());
        }
        let vec = self.data[self.pos..self.pos + count].to_vec();
        self.pos += count;
        Ok(vec)
    }

    /// Reads a NUL terminated string, truncated to `max - 1` bytes. The
    /// cursor always advances one past the NUL. A string running off the
    /// end of the slice is an error, no partial value is returned.
    pub fn read_str(&mut self, max: usize) -> Result<String> {
        let nul = match self.data[self.pos..].iter().position(|&byte| byte == 0) {
            Some(index) => index,
            None => return Err(Error::unexpected_eof()),
        };
        let end = if nul > max - 1 { max - 1 } else { nul };
        let value = std::str::from_utf8(&self.data[self.pos..self.pos + end])?.to_owned();
        self.pos += nul + 1;
        Ok(value)
    }

    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Error::unexpected_eof());
        }
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, count: usize) -> Result<()> {
        if self.remaining() < count {
            return Err(Error::unexpected_eof());
        }
        self.pos += count;
        Ok(())
    }
}

/// CRC32 (IEEE) of a byte buffer, the checksum the VPK directory stores
/// per entry.
#[inline]
pub(crate) fn crc32_of(data: &[u8]) -> u32 {
    crc32::checksum_ieee(data)
}

/// Copies `reader` to `writer` until EOF, returning the byte count and the
/// CRC32 of everything copied.
pub(crate) fn copy_with_crc32(reader: &mut impl Read, writer: &mut impl Write) -> std::io::Result<(u64, u32)> {
    let mut digest = crc32::Digest::new(crc32::IEEE);
    let mut buf = vec![0u8; BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let count = reader.read(&mut buf)?;
        if count == 0 {
            break;
        }
        digest.write(&buf[..count]);
        writer.write_all(&buf[..count])?;
        total += count as u64;
    }

    Ok((total, digest.sum32()))
}

#[inline]
pub(crate) fn write_u16(file: &mut impl Write, value: u16) -> std::io::Result<()> {
    let buffer = [value as u8, (value >> 8) as u8];
    file.write_all(&buffer)?;
    Ok(())
}

#[inline]
pub(crate) fn write_u32(file: &mut impl Write, value: u32) -> std::io::Result<()> {
    let buffer = [value as u8, (value >> 8) as u8, (value >> 16) as u8, (value >> 24) as u8];
    file.write_all(&buffer)?;
    Ok(())
}

#[inline]
pub(crate) fn write_i32(file: &mut impl Write, value: i32) -> std::io::Result<()> {
    write_u32(file, value as u32)
}

#[inline]
pub(crate) fn write_str(file: &mut impl Write, value: &str) -> std::io::Result<()> {
    file.write_all(value.as_bytes())?;
    file.write_all(&[0])?;
    Ok(())
}

#[cfg(target_os = "linux")]
pub fn transfer(in_file: &mut std::fs::File, out_file: &mut std::fs::File, count: usize) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;

    let in_fd  = in_file.as_raw_fd();
    let out_fd = out_file.as_raw_fd();

    let mut remaining = count;
    while remaining > 0 {
        unsafe {
            let result = libc::sendfile(out_fd, in_fd, std::ptr::null_mut(), remaining as libc::size_t);

            if result < 0 {
                return Err(std::io::Error::last_os_error());
            }

            remaining -= result as usize;
        }
    }

    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn transfer(in_file: &mut std::fs::File, out_file: &mut std::fs::File, count: usize) -> std::io::Result<()> {
    let mut buf = [0u8; BUFFER_SIZE];

    let mut remaining = count;
    while remaining >= BUFFER_SIZE {
        in_file.read_exact(&mut buf)?;
        out_file.write_all(&buf)?;
        remaining -= BUFFER_SIZE;
    }

    if remaining > 0 {
        let buf = &mut buf[..remaining];
        in_file.read_exact(buf)?;
        out_file.write_all(buf)?;
    }

    Ok(())
}
