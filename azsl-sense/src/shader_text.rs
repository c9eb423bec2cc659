//! Document text with a line start index.
//!
//! Editors address text with `{line, character}` pairs counted in UTF-16 code
//! units, the syntax tree uses bytes. [`ShaderText`] converts between both and turns
//! editor range replacements into [`InputEdit`] for [`crate::syntax::SyntaxTree::edit`].
use crate::{
    position::{ShaderPosition, ShaderRange},
    syntax::{InputEdit, Point},
};

#[derive(Debug, Default, Clone)]
pub struct ShaderText {
    content: String,
    line_offsets: Vec<usize>,
}

fn compute_line_offsets(content: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(
            content
                .bytes()
                .enumerate()
                .filter(|(_, byte)| *byte == b'\n')
                .map(|(index, _)| index + 1),
        )
        .collect()
}

impl ShaderText {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let line_offsets = compute_line_offsets(&content);
        Self {
            content,
            line_offsets,
        }
    }
    pub fn as_str(&self) -> &str {
        &self.content
    }
    pub fn len(&self) -> usize {
        self.content.len()
    }
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
    pub fn line_count(&self) -> usize {
        self.line_offsets.len()
    }

    // Byte range of a line, without its terminator.
    fn line_bounds(&self, line: usize) -> (usize, usize) {
        let start = self.line_offsets[line];
        let end = match self.line_offsets.get(line + 1) {
            Some(next) => next - 1,
            None => self.content.len(),
        };
        let end = if end > start && self.content.as_bytes()[end - 1] == b'\r' {
            end - 1
        } else {
            end
        };
        (start, end)
    }

    /// Byte offset of an editor position. A line past the last one maps to the end
    /// of the text, a character past the end of its line to the end of that line.
    pub fn offset_at(&self, position: &ShaderPosition) -> usize {
        let line = position.line as usize;
        if line >= self.line_offsets.len() {
            return self.content.len();
        }
        let (start, end) = self.line_bounds(line);
        let mut units = 0;
        for (index, c) in self.content[start..end].char_indices() {
            if units >= position.pos as usize {
                return start + index;
            }
            units += c.len_utf16();
        }
        end
    }

    fn line_of(&self, offset: usize) -> usize {
        self.line_offsets.partition_point(|start| *start <= offset) - 1
    }

    /// Row and byte column of a byte offset, as stored in syntax nodes.
    pub fn point_at(&self, offset: usize) -> Point {
        let offset = offset.min(self.content.len());
        let line = self.line_of(offset);
        Point::new(line, offset - self.line_offsets[line])
    }

    /// Editor position of a byte offset.
    pub fn position_at(&self, offset: usize) -> ShaderPosition {
        let point = self.point_at(offset);
        self.position_of(point)
    }

    /// Editor position of a tree point.
    pub fn position_of(&self, point: Point) -> ShaderPosition {
        if point.row >= self.line_offsets.len() {
            return self.position_at(self.content.len());
        }
        let start = self.line_offsets[point.row];
        let end = (start + point.column).min(self.content.len());
        let pos = self
            .content
            .get(start..end)
            .map(|text| text.encode_utf16().count())
            .unwrap_or(point.column);
        ShaderPosition::new(point.row as u32, pos as u32)
    }

    /// Editor range of a byte range.
    pub fn range_of(&self, start_byte: usize, end_byte: usize) -> ShaderRange {
        ShaderRange::new(self.position_at(start_byte), self.position_at(end_byte))
    }

    /// Replace `range` with `text` and describe the change for the syntax tree.
    /// Line starts are rebuilt from scratch after every change.
    pub fn apply_change(&mut self, range: &ShaderRange, text: &str) -> InputEdit {
        let start_byte = self.offset_at(&range.start);
        let old_end_byte = self.offset_at(&range.end).max(start_byte);
        let start_position = self.point_at(start_byte);
        let old_end_position = self.point_at(old_end_byte);
        self.content.replace_range(start_byte..old_end_byte, text);
        self.line_offsets = compute_line_offsets(&self.content);
        let new_end_byte = start_byte + text.len();
        InputEdit {
            start_byte,
            old_end_byte,
            new_end_byte,
            start_position,
            old_end_position,
            new_end_position: self.point_at(new_end_byte),
        }
    }
}
