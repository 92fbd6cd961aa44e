//! Shape generation for 2D primitives
//!
//! All shapes come out as triangle lists in field coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Segments used for the ball outline
pub const CIRCLE_SEGMENTS: u32 = 32;

/// Glyph grid: 5 columns by 7 rows, one bit per cell (MSB = left column)
const GLYPH_COLUMNS: usize = 5;
const GLYPH_ROWS: usize = 7;
/// Horizontal advance in cells (glyph plus one cell of spacing)
const GLYPH_ADVANCE: usize = GLYPH_COLUMNS + 1;

/// Block glyphs for the letters the overlays use. Unknown characters render
/// as a blank cell.
fn glyph(c: char) -> Option<[u8; GLYPH_ROWS]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        _ => return None,
    };
    Some(rows)
}

/// Generate vertices for an axis-aligned filled rectangle
pub fn rect(origin: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let min = origin;
    let max = origin + size;

    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Width of `text` at cap height `size`
pub fn text_width(text: &str, size: f32) -> f32 {
    let chars = text.chars().count();
    if chars == 0 {
        return 0.0;
    }
    let cell = size / GLYPH_ROWS as f32;
    (chars * GLYPH_ADVANCE - 1) as f32 * cell
}

/// Generate vertices for block-glyph text centred on `center`
pub fn text(text: &str, center: Vec2, size: f32, color: [f32; 4]) -> Vec<Vertex> {
    let cell = size / GLYPH_ROWS as f32;
    let left = center.x - text_width(text, size) / 2.0;
    let top = center.y - size / 2.0;
    let cell_size = Vec2::splat(cell);

    let mut vertices = Vec::new();
    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else {
            continue;
        };
        let glyph_left = left + (i * GLYPH_ADVANCE) as f32 * cell;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_COLUMNS {
                if bits & (1 << (GLYPH_COLUMNS - 1 - col)) != 0 {
                    let origin = Vec2::new(
                        glyph_left + col as f32 * cell,
                        top + row as f32 * cell,
                    );
                    vertices.extend(rect(origin, cell_size, color));
                }
            }
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_rect_covers_corners() {
        let vertices = rect(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), WHITE);
        assert_eq!(vertices.len(), 6);
        let xs: Vec<f32> = vertices.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = vertices.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_circle_stays_within_radius() {
        let center = Vec2::new(100.0, 100.0);
        let vertices = circle(center, 10.0, WHITE, CIRCLE_SEGMENTS);
        assert_eq!(vertices.len(), (CIRCLE_SEGMENTS * 3) as usize);
        for v in vertices {
            let d = Vec2::from(v.position).distance(center);
            assert!(d <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_text_is_centred() {
        let center = Vec2::new(400.0, 300.0);
        let vertices = text("PAUSED", center, 49.0, WHITE);
        assert!(!vertices.is_empty());

        let min_x = vertices.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_x = vertices.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        let min_y = vertices.iter().map(|v| v.position[1]).fold(f32::MAX, f32::min);
        let max_y = vertices.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert!(((min_x + max_x) / 2.0 - 400.0).abs() < 1e-3);
        assert!(((min_y + max_y) / 2.0 - 300.0).abs() < 1e-3);
        assert!((max_x - min_x - text_width("PAUSED", 49.0)).abs() < 1e-3);
    }

    #[test]
    fn test_unknown_characters_are_blank() {
        assert!(text("??", Vec2::ZERO, 14.0, WHITE).is_empty());
        assert_eq!(text_width("", 14.0), 0.0);
    }
}
