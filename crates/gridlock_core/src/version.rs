use derive_more::Display;
use thiserror::Error;

/// Format version in the `x.y` form the container header stores at `0x18`
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[display("{major}.{minor}")]
pub struct Version {
    major: u8,
    minor: u8,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("version should be `<major>.<minor>` with one digit each, found {found:?}")]
pub struct VersionError {
    pub found: Vec<u8>,
}

impl Version {
    /// Parse the `x.y` form, with or without the trailing NUL
    pub fn new(bytes: &[u8]) -> Result<Self, VersionError> {
        let err = || VersionError {
            found: bytes.to_vec(),
        };

        let version = bytes.strip_suffix(&[0]).unwrap_or(bytes);

        let [major, dot, minor] = version else {
            return Err(err());
        };

        if !(major.is_ascii_digit() && *dot == b'.' && minor.is_ascii_digit()) {
            return Err(err());
        }

        Ok(Self {
            major: major - b'0',
            minor: minor - b'0',
        })
    }

    /// The four header bytes, NUL included
    pub fn as_bytes(&self) -> [u8; 4] {
        [b'0' + self.major, b'.', b'0' + self.minor, b'\0']
    }
}

impl Default for Version {
    fn default() -> Self {
        Self { major: 1, minor: 2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_matches_the_header_bytes() {
        assert_eq!(Version::default().as_bytes(), *b"1.2\0");
        assert_eq!(Version::default().to_string(), "1.2");
    }

    #[rstest]
    #[case(b"1.2\0")]
    #[case(b"2.0")]
    fn parse_accepts_the_wire_form(#[case] bytes: &[u8]) {
        let version = Version::new(bytes).unwrap();
        assert_eq!(&version.as_bytes()[..bytes.len().min(3)], &bytes[..3]);
    }

    #[rstest]
    #[case(b"12\0\0".as_slice())]
    #[case(b"1,2\0".as_slice())]
    #[case(b"".as_slice())]
    fn parse_rejects_junk(#[case] bytes: &[u8]) {
        assert!(Version::new(bytes).is_err());
    }
}
