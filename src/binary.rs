use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use log::debug;
use crate::platform::BinaryType;

const IMAGE_FILE_MACHINE_I386: u16 = 0x014C;
const IMAGE_FILE_MACHINE_AMD64: u16 = 0x8664;

/// Classifies an executable as 32- or 64-bit by its PE COFF header.
///
/// Only the DOS stub and the six bytes at `e_lfanew` are read. Anything that
/// is not a well-formed PE image, or cannot be read at all, classifies as
/// [`BinaryType::Unknown`].
pub fn binary_type<P: AsRef<Path>>(path: P) -> BinaryType {
    let path = path.as_ref();
    match read_machine(path) {
        Ok(IMAGE_FILE_MACHINE_I386) => BinaryType::Bit32,
        Ok(IMAGE_FILE_MACHINE_AMD64) => BinaryType::Bit64,
        Ok(machine) => {
            debug!("Unrecognized PE machine {:#06x} in {}", machine, path.display());
            BinaryType::Unknown
        }
        Err(err) => {
            debug!("Could not classify {}: {}", path.display(), err);
            BinaryType::Unknown
        }
    }
}

fn read_machine(path: &Path) -> io::Result<u16> {
    let mut file = File::open(path)?;
    let mut dos_header = [0u8; 0x40];
    file.read_exact(&mut dos_header)?;
    if &dos_header[0..2] != b"MZ" {
        return Err(io::Error::other("missing MZ signature"));
    }
    let e_lfanew = u32::from_le_bytes([
        dos_header[0x3C],
        dos_header[0x3D],
        dos_header[0x3E],
        dos_header[0x3F],
    ]);
    file.seek(SeekFrom::Start(u64::from(e_lfanew)))?;
    // PE\0\0 signature followed by the COFF machine field
    let mut pe_header = [0u8; 6];
    file.read_exact(&mut pe_header)?;
    if &pe_header[0..4] != b"PE\0\0" {
        return Err(io::Error::other("missing PE signature"));
    }
    Ok(u16::from_le_bytes([pe_header[4], pe_header[5]]))
}
