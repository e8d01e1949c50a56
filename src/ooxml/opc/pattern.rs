//! Wildcard matching for ZIP member names.
//!
//! Part names with an unknown numeric suffix (`drawing1.xml`, `drawing7.xml`)
//! are located with patterns such as `*/drawings/*.xml`. A `*` matches any run
//! of characters inside one path segment and never crosses a `/`.

/// Member name pattern for drawing relationship parts.
pub const DRAWING_RELS_PATTERN: &str = "*/drawings/_rels/*.xml.rels";

/// Member name pattern for drawing parts.
pub const DRAWING_PATTERN: &str = "*/drawings/*.xml";

/// Member name pattern for worksheet parts.
pub const WORKSHEET_PATTERN: &str = "*/worksheets/*.xml";

/// Check whether a member name matches a wildcard pattern.
pub fn matches(pattern: &str, name: &str) -> bool {
    let mut pattern_segments = pattern.split('/');
    let mut name_segments = name.split('/');

    loop {
        match (pattern_segments.next(), name_segments.next()) {
            (None, None) => return true,
            (Some(p), Some(n)) if segment_matches(p.as_bytes(), n.as_bytes()) => {},
            _ => return false,
        }
    }
}

/// Match a single path segment; iterative with single-star backtracking.
fn segment_matches(pattern: &[u8], text: &[u8]) -> bool {
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            star = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((star_p, star_t)) = star {
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&b| b == b'*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drawing_patterns() {
        assert!(matches(DRAWING_PATTERN, "xl/drawings/drawing1.xml"));
        assert!(matches(DRAWING_PATTERN, "xl/drawings/drawing12.xml"));
        assert!(!matches(DRAWING_PATTERN, "xl/drawings/_rels/drawing1.xml.rels"));
        assert!(!matches(DRAWING_PATTERN, "xl/drawings/vmlDrawing1.vml"));
        assert!(!matches(DRAWING_PATTERN, "drawings/drawing1.xml"));

        assert!(matches(DRAWING_RELS_PATTERN, "xl/drawings/_rels/drawing1.xml.rels"));
        assert!(!matches(DRAWING_RELS_PATTERN, "xl/drawings/_rels/vmlDrawing1.vml.rels"));
        assert!(!matches(DRAWING_RELS_PATTERN, "xl/worksheets/_rels/sheet1.xml.rels"));
    }

    #[test]
    fn test_star_does_not_cross_segments() {
        assert!(!matches("*/worksheets/*.xml", "a/b/worksheets/sheet1.xml"));
        assert!(matches("*/worksheets/*.xml", "xl/worksheets/sheet1.xml"));
        assert!(!matches("*.xml", "xl/workbook.xml"));
    }

    #[test]
    fn test_literal_and_multi_star_segments() {
        assert!(matches("xl/media/image*.*", "xl/media/image1.png"));
        assert!(!matches("xl/media/image*.*", "xl/media/photo1.png"));
        assert!(matches("*", ""));
        assert!(matches("a*b*c", "aXXbYYc"));
        assert!(!matches("a*b*c", "aXXbYY"));
    }
}
