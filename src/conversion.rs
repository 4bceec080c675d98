use std::path::Path;

use crate::error::{ConvertError, TaskError};
use crate::types::{AbsolutePolygon, AnnotationRecord};

/// Convert normalized YOLO segmentation coordinates to absolute pixel coordinates.
///
/// The exported coordinates are walked from the last value to the first, two at a
/// time, so the final vertex of the input becomes the first vertex of the output.
/// Each scaled value is truncated toward zero.
///
/// Fails without partial output if the sequence has an odd length, if either
/// dimension is zero, or if any pair scales to NaN or infinity.
pub fn yolo_segmentation_to_absolute(
    segmentation: &[f64],
    image_width: u32,
    image_height: u32,
) -> Result<Vec<i64>, ConvertError> {
    if segmentation.len() % 2 != 0 {
        return Err(ConvertError::InvalidRecordLength {
            len: segmentation.len(),
        });
    }
    if image_width == 0 || image_height == 0 {
        return Err(ConvertError::InvalidImageDimensions {
            width: image_width,
            height: image_height,
        });
    }

    let width = f64::from(image_width);
    let height = f64::from(image_height);
    let mut absolute = Vec::with_capacity(segmentation.len());

    for pair in segmentation.chunks_exact(2).rev() {
        let x = pair[0] * width;
        let y = pair[1] * height;
        if !x.is_finite() || !y.is_finite() {
            return Err(ConvertError::MalformedCoordinate { x, y });
        }
        absolute.push(x.trunc() as i64);
        absolute.push(y.trunc() as i64);
    }

    Ok(absolute)
}

/// Parse one label line into a record.
///
/// Blank lines yield `Ok(None)`. `path` and `line` only feed error context.
pub fn parse_record(
    text: &str,
    path: &Path,
    line: usize,
) -> Result<Option<AnnotationRecord>, TaskError> {
    let mut tokens = text.split_whitespace();
    let Some(class_token) = tokens.next() else {
        return Ok(None);
    };

    let class_id = class_token
        .parse::<u32>()
        .map_err(|_| TaskError::InvalidClassId {
            path: path.to_path_buf(),
            line,
            token: class_token.to_string(),
        })?;

    let coordinates = tokens
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| TaskError::InvalidCoordinate {
                    path: path.to_path_buf(),
                    line,
                    token: token.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(AnnotationRecord {
        class_id,
        coordinates,
    }))
}

/// Convert every retained record of a label file.
///
/// Records whose class is excluded are counted and dropped. The first failing
/// record aborts the whole file, so callers never see a partial result.
pub fn convert_records(
    content: &str,
    path: &Path,
    image_width: u32,
    image_height: u32,
    is_excluded: impl Fn(u32) -> bool,
) -> Result<(Vec<AbsolutePolygon>, usize), TaskError> {
    let mut polygons = Vec::new();
    let mut excluded = 0;

    for (idx, text) in content.lines().enumerate() {
        let line = idx + 1;
        let Some(record) = parse_record(text, path, line)? else {
            continue;
        };
        if is_excluded(record.class_id) {
            log::debug!(
                "Skipping class {} at {}:{}",
                record.class_id,
                path.display(),
                line
            );
            excluded += 1;
            continue;
        }

        let points = yolo_segmentation_to_absolute(&record.coordinates, image_width, image_height)
            .map_err(|source| TaskError::Conversion {
                path: path.to_path_buf(),
                line,
                source,
            })?;
        polygons.push(AbsolutePolygon {
            class_id: record.class_id,
            points,
        });
    }

    Ok((polygons, excluded))
}

/// Render a polygon as `x1,y1,...,xn,yn,class_id`
pub fn format_polygon(polygon: &AbsolutePolygon) -> String {
    let coords = polygon
        .points
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("{},{}", coords, polygon.class_id)
}

/// Render every polygon, one newline-terminated line each
pub fn format_polygons(polygons: &[AbsolutePolygon]) -> String {
    let mut out = String::with_capacity(polygons.len() * 64);
    for polygon in polygons {
        out.push_str(&format_polygon(polygon));
        out.push('\n');
    }
    out
}
