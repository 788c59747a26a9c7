//! Messages understood by the background surface
//!
//! The inter-process contract is a copy-data message whose tag selects the
//! command and whose payload is little-endian UTF-16 text.

use std::path::{Path, PathBuf};

/// Copy-data tag: payload is the new background image path
pub const SET_BACKGROUND_IMAGE: usize = 101;

/// Copy-data tag: reserved for a background color, currently ignored
pub const SET_BACKGROUND_COLOR: usize = 102;

/// Meaning of a copy-data tag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyDataTag {
    SetBackgroundImage,
    /// Reserved. Accepted and ignored.
    SetBackgroundColor,
    Unknown(usize),
}

impl From<usize> for CopyDataTag {
    fn from(tag: usize) -> Self {
        match tag {
            SET_BACKGROUND_IMAGE => CopyDataTag::SetBackgroundImage,
            SET_BACKGROUND_COLOR => CopyDataTag::SetBackgroundColor,
            other => CopyDataTag::Unknown(other),
        }
    }
}

/// A window message, reduced to the cases the surface cares about
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceMessage<'a> {
    /// Data-copy message with its tag and raw payload
    CopyData { tag: usize, payload: &'a [u8] },
    /// Repaint request
    Paint,
    /// Anything else
    Other,
}

/// What the window procedure should do after the surface saw a message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Consumed; the window procedure returns 0
    Handled,
    /// Fall through to the platform's default handling
    Default,
}

/// Decode a copy-data payload into a path.
///
/// The payload holds `len / 2` UTF-16 code units; a trailing odd byte is
/// dropped and decoding stops at the first NUL.
pub fn decode_path(payload: &[u8]) -> PathBuf {
    let units: Vec<u16> = payload
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .collect();

    path_from_wide(&units)
}

/// Encode a path as a copy-data payload (no terminator)
pub fn encode_path(path: &Path) -> Vec<u8> {
    wide_from_path(path)
        .into_iter()
        .flat_map(u16::to_le_bytes)
        .collect()
}

#[cfg(windows)]
fn path_from_wide(units: &[u16]) -> PathBuf {
    use std::os::windows::ffi::OsStringExt;
    PathBuf::from(std::ffi::OsString::from_wide(units))
}

#[cfg(not(windows))]
fn path_from_wide(units: &[u16]) -> PathBuf {
    PathBuf::from(String::from_utf16_lossy(units))
}

#[cfg(windows)]
fn wide_from_path(path: &Path) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;
    path.as_os_str().encode_wide().collect()
}

#[cfg(not(windows))]
fn wide_from_path(path: &Path) -> Vec<u16> {
    path.to_string_lossy().encode_utf16().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16_bytes(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    #[test]
    fn test_tag_mapping() {
        assert_eq!(CopyDataTag::from(101), CopyDataTag::SetBackgroundImage);
        assert_eq!(CopyDataTag::from(102), CopyDataTag::SetBackgroundColor);
        assert_eq!(CopyDataTag::from(7), CopyDataTag::Unknown(7));
    }

    #[test]
    fn test_decode_path() {
        let payload = utf16_bytes("C:\\wallpapers\\dusk.bmp");
        assert_eq!(decode_path(&payload), PathBuf::from("C:\\wallpapers\\dusk.bmp"));
    }

    #[test]
    fn test_decode_non_ascii_path() {
        let payload = utf16_bytes("D:\\图片\\背景.bmp");
        assert_eq!(decode_path(&payload), PathBuf::from("D:\\图片\\背景.bmp"));
    }

    #[test]
    fn test_decode_stops_at_nul() {
        let mut payload = utf16_bytes("a.bmp");
        payload.extend_from_slice(&[0, 0]);
        payload.extend(utf16_bytes("garbage"));
        assert_eq!(decode_path(&payload), PathBuf::from("a.bmp"));
    }

    #[test]
    fn test_decode_drops_odd_byte() {
        let mut payload = utf16_bytes("x.bmp");
        payload.push(0x41);
        assert_eq!(decode_path(&payload), PathBuf::from("x.bmp"));
    }

    #[test]
    fn test_decode_empty_payload() {
        assert_eq!(decode_path(&[]), PathBuf::new());
    }

    #[test]
    fn test_encode_matches_wire_format() {
        let path = Path::new("bg.bmp");
        assert_eq!(encode_path(path), utf16_bytes("bg.bmp"));
        assert_eq!(decode_path(&encode_path(path)), path);
    }
}
