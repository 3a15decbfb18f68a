use std::{
    path::PathBuf,
    fmt,
    io,
};

use crate::constant::Version;


/// Possible errors encountered while parsing arguments.
#[derive(Debug)]
pub enum ConfigError {
    InvalidMode(String),
    InvalidMemory(String),
    OutOfRangeMemory(u64),
    InvalidInput(PathBuf),
    MissingInput,
    MissingOutput,
    IoError(io::Error),
}
impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMode(m) => {
                write!(f, "
                    \r{m} is not a valid mode.\n
                    \rModes:\n
                    \r    c    Compress
                    \r    x    Extract\n"
                )
            }
            ConfigError::InvalidMemory(mem) => {
                write!(f, "
                    \r{mem} is not a valid memory option.\n
                    \rMemory Options:\n
                    \r-mem 0  9 MB   -mem 5  131 MB
                    \r-mem 1  13 MB  -mem 6  260 MB
                    \r-mem 2  20 MB  -mem 7  518 MB
                    \r-mem 3  34 MB  -mem 8  1034 MB
                    \r-mem 4  67 MB  -mem 9  2066 MB\n"
                )
            }
            ConfigError::OutOfRangeMemory(mem) => {
                write!(f, "
                    \r{mem} is outside the valid range of memory options (0..9).\n"
                )
            }
            ConfigError::InvalidInput(path) => {
                write!(f, "
                    \r{} is not a valid path.\n",
                    path.display()
                )
            }
            ConfigError::MissingInput => {
                write!(f, "
                    \rNo input file specified.\n"
                )
            }
            ConfigError::MissingOutput => {
                write!(f, "
                    \rNo output file specified.\n"
                )
            }
            ConfigError::IoError(err) => {
                write!(f, "
                    \r{err}\n"
                )
            }
        }
    }
}
impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> ConfigError {
        ConfigError::IoError(err)
    }
}


/// Possible errors encountered while reading a compressed stream.
#[derive(Debug)]
pub enum CodecError {
    InvalidMagicNumber(u32),
    InvalidVersion(Version),
    InvalidLevel(u8),
    TruncatedStream,
    IoError(io::Error),
}
impl From<io::Error> for CodecError {
    fn from(err: io::Error) -> CodecError {
        CodecError::IoError(err)
    }
}
impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::InvalidMagicNumber(magic) => {
                write!(f, "
                    \rDid not find a valid magic number (found {magic:#X}).\n"
                )
            }
            CodecError::InvalidVersion(version) => {
                write!(f, "
                    \rThis archive was created with version {version},
                    \rand cannot be extracted with version {}.\n",
                    Version::current()
                )
            }
            CodecError::InvalidLevel(level) => {
                write!(f, "
                    \r{level} is not a valid memory level (0..9).\n"
                )
            }
            CodecError::TruncatedStream => {
                write!(f, "
                    \rUnexpected end of compressed stream.\n"
                )
            }
            CodecError::IoError(err) => {
                write!(f, "
                    \r{err}.\n"
                )
            }
        }
    }
}
