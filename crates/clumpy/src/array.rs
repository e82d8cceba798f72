//! Reading and writing NumPy `.npy` arrays.
//!
//! Supports C-order little-endian `float32` (`<f4`) and `uint8` (`|u1`) arrays, which is
//! everything the toolbox exchanges with its plotting scripts. Files are written as format
//! version 1.0; versions 2.0 and 3.0 are accepted on read.
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

const MAGIC: &[u8; 6] = b"\x93NUMPY";
/// Data starts at a multiple of this many bytes.
const HEADER_ALIGN: usize = 64;

/// Element storage of an [`NpyArray`].
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    F32(Vec<f32>),
    U8(Vec<u8>),
}

impl ArrayData {
    /// NumPy dtype descriptor.
    pub fn descr(&self) -> &'static str {
        match self {
            ArrayData::F32(_) => "<f4",
            ArrayData::U8(_) => "|u1",
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            ArrayData::F32(v) => v.len(),
            ArrayData::U8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An n-dimensional array in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct NpyArray {
    pub shape: Vec<usize>,
    pub data: ArrayData,
}

impl NpyArray {
    /// Builds a `float32` array, checking that `data` fills `shape` exactly.
    pub fn from_f32(shape: Vec<usize>, data: Vec<f32>) -> Result<Self> {
        Self::new(shape, ArrayData::F32(data))
    }

    /// Builds a `uint8` array, checking that `data` fills `shape` exactly.
    pub fn from_u8(shape: Vec<usize>, data: Vec<u8>) -> Result<Self> {
        Self::new(shape, ArrayData::U8(data))
    }

    fn new(shape: Vec<usize>, data: ArrayData) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(Error::InvalidInput(format!(
                "shape {:?} needs {} elements, got {}",
                shape,
                expected,
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// Borrows the elements as `f32`, or fails with the actual dtype.
    pub fn as_f32(&self) -> Result<&[f32]> {
        match &self.data {
            ArrayData::F32(v) => Ok(v),
            other => Err(Error::UnsupportedDtype {
                descr: other.descr().to_owned(),
            }),
        }
    }

    /// Borrows the elements as `u8`, or fails with the actual dtype.
    pub fn as_u8(&self) -> Result<&[u8]> {
        match &self.data {
            ArrayData::U8(v) => Ok(v),
            other => Err(Error::UnsupportedDtype {
                descr: other.descr().to_owned(),
            }),
        }
    }

    /// Parses an array from `.npy` bytes.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 6];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(Error::Format("missing \\x93NUMPY magic".into()));
        }

        let mut version = [0u8; 2];
        reader.read_exact(&mut version)?;
        let header_len = match version[0] {
            1 => {
                let mut len = [0u8; 2];
                reader.read_exact(&mut len)?;
                u16::from_le_bytes(len) as usize
            }
            2 | 3 => {
                let mut len = [0u8; 4];
                reader.read_exact(&mut len)?;
                u32::from_le_bytes(len) as usize
            }
            v => return Err(Error::Format(format!("unsupported format version {v}"))),
        };

        let header = read_payload(&mut reader, header_len)?;
        let header = String::from_utf8(header)
            .map_err(|_| Error::Format("header is not valid text".into()))?;
        let header = Header::parse(&header)?;

        let count = header
            .shape
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
            .ok_or_else(|| Error::Format("shape too large".into()))?;
        let data = match header.descr.as_str() {
            "<f4" => {
                let len = count
                    .checked_mul(4)
                    .ok_or_else(|| Error::Format("shape too large".into()))?;
                let bytes = read_payload(&mut reader, len)?;
                ArrayData::F32(
                    bytes
                        .chunks_exact(4)
                        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                        .collect(),
                )
            }
            "|u1" | "<u1" => ArrayData::U8(read_payload(&mut reader, count)?),
            other => {
                return Err(Error::UnsupportedDtype {
                    descr: other.to_owned(),
                })
            }
        };

        Ok(Self {
            shape: header.shape,
            data,
        })
    }

    /// Serialises the array as a version 1.0 `.npy` stream.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let mut header = format!(
            "{{'descr': '{}', 'fortran_order': False, 'shape': {}, }}",
            self.data.descr(),
            shape_tuple(&self.shape)
        );
        // magic + version + u16 length + header + '\n'
        let unpadded = MAGIC.len() + 2 + 2 + header.len() + 1;
        let padding = (HEADER_ALIGN - unpadded % HEADER_ALIGN) % HEADER_ALIGN;
        header.extend(std::iter::repeat_n(' ', padding));
        header.push('\n');

        let header_len = u16::try_from(header.len())
            .map_err(|_| Error::InvalidInput(format!("shape {:?} is too long", self.shape)))?;

        writer.write_all(MAGIC)?;
        writer.write_all(&[1, 0])?;
        writer.write_all(&header_len.to_le_bytes())?;
        writer.write_all(header.as_bytes())?;

        match &self.data {
            ArrayData::F32(values) => {
                for v in values {
                    writer.write_all(&v.to_le_bytes())?;
                }
            }
            ArrayData::U8(values) => writer.write_all(values)?,
        }
        writer.flush()?;
        Ok(())
    }
}

/// Reads exactly `len` bytes, growing the buffer only as data arrives.
fn read_payload<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let limit = u64::try_from(len).map_err(|_| Error::Format("shape too large".into()))?;
    reader.take(limit).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("expected {len} data bytes, found {}", bytes.len()),
        )));
    }
    Ok(bytes)
}

/// Loads an `.npy` file.
pub fn load(path: impl AsRef<Path>) -> Result<NpyArray> {
    let path = path.as_ref();
    let array = NpyArray::read_from(BufReader::new(File::open(path)?))?;
    debug!(
        "Loaded {} {:?} ({}).",
        path.display(),
        array.shape,
        array.data.descr()
    );
    Ok(array)
}

/// Saves an array as an `.npy` file, replacing any existing file.
pub fn save(path: impl AsRef<Path>, array: &NpyArray) -> Result<()> {
    let path = path.as_ref();
    array.write_to(BufWriter::new(File::create(path)?))?;
    debug!(
        "Saved {} {:?} ({}).",
        path.display(),
        array.shape,
        array.data.descr()
    );
    Ok(())
}

fn shape_tuple(shape: &[usize]) -> String {
    match shape {
        [n] => format!("({n},)"),
        dims => {
            let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
            format!("({})", parts.join(", "))
        }
    }
}

struct Header {
    descr: String,
    shape: Vec<usize>,
}

impl Header {
    /// Parses the Python dict literal of an `.npy` header.
    fn parse(text: &str) -> Result<Self> {
        let descr = quoted_value(text, "descr")?;

        let fortran = value_after_key(text, "fortran_order")?;
        if fortran.starts_with("True") {
            return Err(Error::Format("Fortran-order arrays are not supported".into()));
        }
        if !fortran.starts_with("False") {
            return Err(Error::Format("bad 'fortran_order' value".into()));
        }

        let shape_text = value_after_key(text, "shape")?;
        let inner = shape_text
            .strip_prefix('(')
            .and_then(|rest| rest.split_once(')'))
            .map(|(inner, _)| inner)
            .ok_or_else(|| Error::Format("bad 'shape' value".into()))?;
        let shape = inner
            .split(',')
            .map(str::trim)
            .filter(|dim| !dim.is_empty())
            .map(|dim| {
                dim.trim_end_matches('L')
                    .parse::<usize>()
                    .map_err(|_| Error::Format(format!("bad dimension '{dim}'")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { descr, shape })
    }
}

/// Text following `'key':`, with leading whitespace removed.
fn value_after_key<'a>(text: &'a str, key: &str) -> Result<&'a str> {
    let pattern = format!("'{key}':");
    let start = text
        .find(&pattern)
        .ok_or_else(|| Error::Format(format!("header has no '{key}' entry")))?;
    Ok(text[start + pattern.len()..].trim_start())
}

fn quoted_value(text: &str, key: &str) -> Result<String> {
    let value = value_after_key(text, key)?;
    value
        .strip_prefix('\'')
        .and_then(|rest| rest.split_once('\''))
        .map(|(inner, _)| inner.to_owned())
        .ok_or_else(|| Error::Format(format!("bad '{key}' value")))
}
