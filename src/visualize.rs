//! Polygon overlays for spot-checking converted labels.
//!
//! Each retained polygon is drawn as a closed outline on a copy of the source
//! image so a reviewer can confirm the vertex order and scaling at a glance.

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use std::path::Path;

use crate::error::TaskError;
use crate::types::AbsolutePolygon;

const OUTLINE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const OUTLINE_THICKNESS: i64 = 2;

/// Draw every polygon as a closed outline on the image in place.
pub fn draw_polygons(img: &mut RgbImage, polygons: &[AbsolutePolygon]) {
    for polygon in polygons {
        let vertices: Vec<(f32, f32)> = polygon
            .vertices()
            .map(|(x, y)| (x as f32, y as f32))
            .collect();
        if vertices.len() < 2 {
            continue;
        }

        let closing = std::iter::once((vertices[vertices.len() - 1], vertices[0]));
        let edges = vertices.windows(2).map(|w| (w[0], w[1])).chain(closing);
        for (start, end) in edges {
            draw_thick_segment(img, start, end);
        }
    }
}

// imageproc has no stroke width, so offset parallel 1px segments
fn draw_thick_segment(img: &mut RgbImage, start: (f32, f32), end: (f32, f32)) {
    let steep = (end.1 - start.1).abs() > (end.0 - start.0).abs();
    for offset in 0..OUTLINE_THICKNESS {
        let d = offset as f32;
        let (s, e) = if steep {
            ((start.0 + d, start.1), (end.0 + d, end.1))
        } else {
            ((start.0, start.1 + d), (end.0, end.1 + d))
        };
        draw_line_segment_mut(img, s, e, OUTLINE_COLOR);
    }
}

/// Draw the polygons on a copy of the decoded image and save the overlay.
pub fn render_overlay(
    source: &DynamicImage,
    polygons: &[AbsolutePolygon],
    output_path: &Path,
) -> Result<(), TaskError> {
    let mut img = source.to_rgb8();

    draw_polygons(&mut img, polygons);

    img.save(output_path).map_err(|source| TaskError::Visualize {
        path: output_path.to_path_buf(),
        source,
    })
}
