//! Editor facing positions.
//!
//! Lines are zero based, `pos` counts UTF-16 code units like the LSP protocol does.
//! Tree nodes use byte based [`crate::syntax::Point`] instead, conversion goes through
//! [`crate::shader_text::ShaderText`].
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShaderPosition {
    pub line: u32,
    pub pos: u32,
}

impl ShaderPosition {
    pub fn new(line: u32, pos: u32) -> Self {
        Self { line, pos }
    }
    pub fn zero() -> Self {
        Self { line: 0, pos: 0 }
    }
}

impl fmt::Display for ShaderPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.pos)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShaderRange {
    pub start: ShaderPosition,
    pub end: ShaderPosition,
}

impl ShaderRange {
    pub fn new(start: ShaderPosition, end: ShaderPosition) -> Self {
        Self { start, end }
    }
    pub fn at(position: ShaderPosition) -> Self {
        Self {
            start: position,
            end: position,
        }
    }
    pub fn into_file(self, file: Url) -> ShaderFileRange {
        ShaderFileRange { file, range: self }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderFileRange {
    pub file: Url,
    pub range: ShaderRange,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_order() {
        assert!(ShaderPosition::new(1, 4) < ShaderPosition::new(1, 5));
        assert!(ShaderPosition::new(1, 100) < ShaderPosition::new(2, 0));
        let file = Url::parse("file:///project/main.azsl").unwrap();
        let range = ShaderRange::at(ShaderPosition::new(3, 2)).into_file(file.clone());
        assert_eq!(range.file, file);
        assert_eq!(range.range.end, ShaderPosition::new(3, 2));
    }
}
