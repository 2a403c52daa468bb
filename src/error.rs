use rootcause::Report;
use thiserror::Error;

/// Errors raised while resolving offsets and reading geometry data.
///
/// All of these are scoped to a single chunk or sub-mesh: the decode driver
/// logs them and moves on to the next sibling rather than aborting the file.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("read of {len} bytes at 0x{offset:X} runs past end of buffer (len 0x{buffer_len:X})")]
    TruncatedData {
        offset: usize,
        len: usize,
        buffer_len: usize,
    },
    #[error("resolved offset 0x{offset:X} is outside the buffer (len 0x{buffer_len:X})")]
    OffsetOutOfRange { offset: usize, buffer_len: usize },
    #[error(
        "invalid vertex stride: total size 0x{total_size:X} with stride 0x{stride:X} \
         does not describe a whole number of vertex records"
    )]
    InvalidStride { total_size: u32, stride: u32 },
}

/// Common result type for decode operations.
pub type DecodeResult<T> = Result<T, Report<DecodeError>>;
