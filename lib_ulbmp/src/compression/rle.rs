use thiserror::Error;

use crate::constants::MAX_RUN;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RleDecompressionError {
    #[error("Invalid input length: expected multiple of {record} bytes, got {length}")]
    InvalidInputLength { record: usize, length: usize },
}

/// Groups consecutive equal values into `(count, value)` runs of at most 255.
///
/// A run reaching 255 is closed and the next equal value starts a new run at 1.
pub fn runs<T, I>(values: I) -> Vec<(u8, T)>
where
    T: PartialEq + Copy,
    I: IntoIterator<Item = T>,
{
    values
        .into_iter()
        .fold(Vec::new(), |mut runs: Vec<(u8, T)>, value| {
            let last = runs.len().wrapping_sub(1);
            match runs.last() {
                Some(&(count, current)) if current == value && count < MAX_RUN => runs[last].0 += 1,
                _ => runs.push((1, value)),
            }
            runs
        })
}

/// Encodes runs as `count` followed by the bytes `write` emits for the value.
pub fn rle_compression<T, I, F>(values: I, mut write: F) -> Vec<u8>
where
    T: PartialEq + Copy,
    I: IntoIterator<Item = T>,
    F: FnMut(&mut Vec<u8>, T),
{
    let runs = runs(values);
    let mut encoded = Vec::with_capacity(runs.len() * 2);

    for (count, value) in runs {
        encoded.push(count);
        write(&mut encoded, value);
    }

    encoded
}

/// Decodes fixed-size `(count, value..)` records, repeating each value `count` times.
///
/// # Errors
/// - Returns `RleDecompressionError::InvalidInputLength` if the data ends inside a record
pub fn rle_decompression<T, F>(
    data: &[u8],
    value_size: usize,
    mut read: F,
) -> Result<Vec<T>, RleDecompressionError>
where
    T: Copy,
    F: FnMut(&[u8]) -> T,
{
    let record = value_size + 1;
    if data.len() % record != 0 {
        return Err(RleDecompressionError::InvalidInputLength {
            record,
            length: data.len(),
        });
    }

    let mut decoded = Vec::with_capacity(data.len());
    for chunk in data.chunks_exact(record) {
        let value = read(&chunk[1..]);
        decoded.extend(std::iter::repeat(value).take(chunk[0] as usize));
    }

    Ok(decoded)
}
