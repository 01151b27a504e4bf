//! Just enough of the dBase III format to list the attribute columns of a shapefile.

use std::{io::Read, path::Path};

use crate::error::GenerateError;

const HEADER_LEN: usize = 32;
const FIELD_DESCRIPTOR_LEN: usize = 32;
const FIELD_NAME_LEN: usize = 11;
const HEADER_TERMINATOR: u8 = 0x0D;

/// Column names from the header of the `.dbf` file at `path`.
pub fn read_field_names(path: &Path) -> Result<Vec<String>, GenerateError> {
    let read_error = |source| GenerateError::Read {
        path: path.to_owned(),
        source,
    };
    let mut file = std::fs::File::open(path).map_err(read_error)?;

    let mut header = [0u8; HEADER_LEN];
    file.read_exact(&mut header).map_err(read_error)?;
    let header_len = usize::from(u16::from_le_bytes([header[8], header[9]]));

    let mut descriptors = vec![0u8; header_len.saturating_sub(HEADER_LEN)];
    file.read_exact(&mut descriptors).map_err(read_error)?;
    Ok(parse_field_names(&descriptors))
}

fn parse_field_names(descriptors: &[u8]) -> Vec<String> {
    descriptors
        .chunks(FIELD_DESCRIPTOR_LEN)
        .take_while(|descriptor| {
            descriptor.len() == FIELD_DESCRIPTOR_LEN && descriptor[0] != HEADER_TERMINATOR
        })
        .map(|descriptor| {
            let name = &descriptor[..FIELD_NAME_LEN];
            let end = name.iter().position(|b| *b == 0).unwrap_or(FIELD_NAME_LEN);
            String::from_utf8_lossy(&name[..end]).trim().to_owned()
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A header-only `.dbf` with character columns `names`.
    pub(crate) fn dbf_header(names: &[&str]) -> Vec<u8> {
        let header_len = HEADER_LEN + names.len() * FIELD_DESCRIPTOR_LEN + 1;
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes[0] = 0x03;
        bytes[8..10].copy_from_slice(&(header_len as u16).to_le_bytes());
        for name in names {
            let mut descriptor = [0u8; FIELD_DESCRIPTOR_LEN];
            descriptor[..name.len()].copy_from_slice(name.as_bytes());
            descriptor[11] = b'C';
            descriptor[16] = 10;
            bytes.extend_from_slice(&descriptor);
        }
        bytes.push(HEADER_TERMINATOR);
        bytes
    }

    #[test]
    fn reads_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CL4-Point-BOYCAR.dbf");
        std::fs::write(&path, dbf_header(&["OBJNAM", "BOYSHP", "COLOUR"])).unwrap();

        assert_eq!(
            read_field_names(&path).unwrap(),
            vec!["OBJNAM", "BOYSHP", "COLOUR"]
        );
    }

    #[test]
    fn stops_at_the_terminator() {
        let mut descriptors = dbf_header(&["DRVAL1"])[HEADER_LEN..].to_vec();
        descriptors.extend_from_slice(&[b'X'; FIELD_DESCRIPTOR_LEN]);
        assert_eq!(parse_field_names(&descriptors), vec!["DRVAL1"]);
    }

    #[test]
    fn truncated_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.dbf");
        std::fs::write(&path, [0x03, 0, 0]).unwrap();
        assert!(matches!(
            read_field_names(&path),
            Err(GenerateError::Read { .. })
        ));
    }
}
