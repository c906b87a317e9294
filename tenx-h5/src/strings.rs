use crate::h5err;
use hdf5::types::{FixedAscii, FixedUnicode, TypeDescriptor, VarLenAscii, VarLenUnicode};
use tenx_types::MatrixError;

/// Longest fixed-length string we read; 10x ids and barcodes are far shorter.
pub(crate) const MAX_STRING_LEN: usize = 256;

/// Read a 1-d string dataset, whatever its string encoding. Returns `None` if `path`
/// does not exist.
pub(crate) fn read_strings(file: &hdf5::File, path: &str) -> Result<Option<Vec<String>>, MatrixError> {
    if !file.link_exists(path) {
        return Ok(None);
    }
    let ds = file.dataset(path).map_err(h5err)?;
    let descriptor = ds.dtype().and_then(|t| t.to_descriptor()).map_err(h5err)?;

    let strings = match descriptor {
        TypeDescriptor::VarLenAscii => ds
            .read_raw::<VarLenAscii>()
            .map_err(h5err)?
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        TypeDescriptor::VarLenUnicode => ds
            .read_raw::<VarLenUnicode>()
            .map_err(h5err)?
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        TypeDescriptor::FixedAscii(n) if n <= MAX_STRING_LEN => ds
            .read_raw::<FixedAscii<MAX_STRING_LEN>>()
            .map_err(h5err)?
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        TypeDescriptor::FixedUnicode(n) if n <= MAX_STRING_LEN => ds
            .read_raw::<FixedUnicode<MAX_STRING_LEN>>()
            .map_err(h5err)?
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        other => {
            return Err(MatrixError::format(format!(
                "{path}: expected a string dataset, found {other:?}"
            )))
        }
    };
    Ok(Some(strings))
}

/// Encode strings as fixed-length ASCII of `MAX_STRING_LEN` bytes.
pub(crate) fn to_fixed_ascii(strings: &[String]) -> anyhow::Result<Vec<FixedAscii<MAX_STRING_LEN>>> {
    strings
        .iter()
        .map(|s| {
            FixedAscii::<MAX_STRING_LEN>::from_ascii(s.as_bytes())
                .map_err(|e| anyhow::format_err!("cannot store {s:?} as ASCII: {e}"))
        })
        .collect()
}
