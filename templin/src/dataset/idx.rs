use crate::error::{Error, Result};
use crate::tensor::{Dim3, Tensor1, Tensor3};
use std::io::Read;

/// Magic number of an idx3 file holding unsigned bytes (images).
pub const IMAGES_MAGIC: u32 = 0x0000_0803;
/// Magic number of an idx1 file holding unsigned bytes (labels).
pub const LABELS_MAGIC: u32 = 0x0000_0801;

fn invalid<R: Into<String>>(name: &str, reason: R) -> Error {
    Error::InvalidIdx {
        name: name.to_owned(),
        reason: reason.into(),
    }
}

fn read_u32<R: Read>(reader: &mut R, name: &str) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .map_err(|e| invalid(name, format!("truncated header: {e}")))?;
    Ok(u32::from_be_bytes(buf))
}

fn read_magic<R: Read>(reader: &mut R, name: &str, expected: u32) -> Result<()> {
    let magic = read_u32(reader, name)?;
    if magic != expected {
        return Err(invalid(
            name,
            format!("magic number {magic:#010x}, expected {expected:#010x}"),
        ));
    }
    Ok(())
}

/// Reads exactly `len` bytes. The buffer grows with the data actually present, so a corrupt
/// header cannot request an arbitrary allocation up front.
fn read_body<R: Read>(reader: &mut R, name: &str, len: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader
        .take(len as u64)
        .read_to_end(&mut data)
        .map_err(|e| invalid(name, format!("failed to read data: {e}")))?;
    if data.len() != len {
        return Err(invalid(
            name,
            format!("expected {len} data bytes, found {}", data.len()),
        ));
    }
    Ok(data)
}

/// Reads an idx3 image file: a big-endian header `magic, count, rows, cols` followed by
/// `count * rows * cols` pixel bytes.
pub fn read_idx_images<R: Read>(mut reader: R, name: &str) -> Result<Tensor3<u8>> {
    read_magic(&mut reader, name, IMAGES_MAGIC)?;
    let count = read_u32(&mut reader, name)? as usize;
    let rows = read_u32(&mut reader, name)? as usize;
    let cols = read_u32(&mut reader, name)? as usize;
    let len = count
        .checked_mul(rows)
        .and_then(|n| n.checked_mul(cols))
        .ok_or_else(|| invalid(name, format!("{count}x{rows}x{cols} images overflow the address space")))?;
    let data = read_body(&mut reader, name, len)?;
    Ok(Tensor3::from_vec(data, Dim3(count, rows, cols)))
}

/// Reads an idx1 label file: a big-endian header `magic, count` followed by `count` labels.
pub fn read_idx_labels<R: Read>(mut reader: R, name: &str) -> Result<Tensor1<u8>> {
    read_magic(&mut reader, name, LABELS_MAGIC)?;
    let count = read_u32(&mut reader, name)? as usize;
    let data = read_body(&mut reader, name, count)?;
    Ok(Tensor1::from_vec_1d(data))
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::tensor::ITensor;

    pub(crate) fn encode_images(count: u32, rows: u32, cols: u32, pixels: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for v in [IMAGES_MAGIC, count, rows, cols] {
            bytes.extend_from_slice(&v.to_be_bytes());
        }
        bytes.extend_from_slice(pixels);
        bytes
    }

    pub(crate) fn encode_labels(labels: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&LABELS_MAGIC.to_be_bytes());
        bytes.extend_from_slice(&(labels.len() as u32).to_be_bytes());
        bytes.extend_from_slice(labels);
        bytes
    }

    #[test]
    fn test_read_images() {
        let pixels: Vec<u8> = (0..12).collect();
        let images = read_idx_images(&encode_images(3, 2, 2, &pixels)[..], "images").unwrap();
        assert_eq!(images.dims(), &Dim3(3, 2, 2));
        assert_eq!(images.as_ref(), &pixels[..]);
    }

    #[test]
    fn test_read_labels() {
        let labels = read_idx_labels(&encode_labels(&[7, 2, 1])[..], "labels").unwrap();
        assert_eq!(labels.as_ref(), &[7, 2, 1]);
    }

    #[test]
    fn test_wrong_magic() {
        let err = read_idx_labels(&encode_images(1, 1, 1, &[0])[..], "labels").unwrap_err();
        assert!(matches!(err, Error::InvalidIdx { .. }));
        assert!(err.to_string().contains("0x00000803"));
    }

    #[test]
    fn test_oversized_header() {
        let err = read_idx_images(&encode_images(u32::MAX, u32::MAX, u32::MAX, &[])[..], "images").unwrap_err();
        assert!(matches!(err, Error::InvalidIdx { .. }));
        // plausible dimensions but far more pixels than the file holds
        let err = read_idx_images(&encode_images(1 << 20, 1 << 10, 1 << 10, &[0; 16])[..], "images").unwrap_err();
        assert!(matches!(err, Error::InvalidIdx { .. }));
        assert!(err.to_string().contains("found 16"));
        let mut labels = encode_labels(&[1, 2]);
        labels[4..8].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(read_idx_labels(&labels[..], "labels"), Err(Error::InvalidIdx { .. })));
    }

    #[test]
    fn test_truncated() {
        let mut bytes = encode_images(2, 28, 28, &[0; 784]);
        assert!(matches!(read_idx_images(&bytes[..], "images"), Err(Error::InvalidIdx { .. })));
        bytes.truncate(10);
        assert!(matches!(read_idx_images(&bytes[..], "images"), Err(Error::InvalidIdx { .. })));
    }
}
