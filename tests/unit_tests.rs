use clap::Parser;
use std::path::{Path, PathBuf};

use yoloseg2abs::config::validate_extension;
use yoloseg2abs::conversion::{convert_records, format_polygons};
use yoloseg2abs::{
    format_polygon, parse_record, yolo_segmentation_to_absolute, AbsolutePolygon, Args,
    ConvertError, ProcessingStats, TaskError, TaskSummary,
};

#[test]
fn test_conversion_reverses_point_order() {
    let absolute = yolo_segmentation_to_absolute(&[0.5, 0.5, 0.75, 0.75], 100, 200).unwrap();
    assert_eq!(absolute, vec![75, 150, 50, 100]);
}

#[test]
fn test_conversion_last_vertex_comes_first() {
    let segmentation = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
    let absolute = yolo_segmentation_to_absolute(&segmentation, 10, 10).unwrap();
    assert_eq!(absolute, vec![5, 6, 3, 4, 1, 2]);
}

#[test]
fn test_conversion_preserves_length_and_bounds() {
    let segmentation = [0.0, 0.999, 0.1, 0.2, 0.33, 0.67, 0.999_9, 0.0];
    let (width, height) = (640, 480);
    let absolute = yolo_segmentation_to_absolute(&segmentation, width, height).unwrap();

    assert_eq!(absolute.len(), segmentation.len());
    for pair in absolute.chunks_exact(2) {
        assert!((0..width as i64).contains(&pair[0]), "x out of range: {}", pair[0]);
        assert!((0..height as i64).contains(&pair[1]), "y out of range: {}", pair[1]);
    }
}

#[test]
fn test_conversion_truncates_toward_zero() {
    let absolute = yolo_segmentation_to_absolute(&[0.999, -0.015], 10, 100).unwrap();
    assert_eq!(absolute, vec![9, -1]);
}

#[test]
fn test_conversion_of_empty_sequence() {
    let absolute = yolo_segmentation_to_absolute(&[], 10, 10).unwrap();
    assert!(absolute.is_empty());
}

#[test]
fn test_conversion_rejects_nan_at_any_position() {
    for position in 0..4 {
        let mut segmentation = vec![0.1, 0.2, 0.3, 0.4];
        segmentation[position] = f64::NAN;
        let result = yolo_segmentation_to_absolute(&segmentation, 100, 100);
        assert!(
            matches!(result, Err(ConvertError::MalformedCoordinate { .. })),
            "NaN at position {} was accepted: {:?}",
            position,
            result
        );
    }
}

#[test]
fn test_conversion_rejects_infinity() {
    let result = yolo_segmentation_to_absolute(&[f64::INFINITY, 0.5], 100, 100);
    assert!(matches!(
        result,
        Err(ConvertError::MalformedCoordinate { .. })
    ));
}

#[test]
fn test_conversion_rejects_odd_length() {
    let result = yolo_segmentation_to_absolute(&[0.1, 0.2, 0.3], 100, 100);
    assert_eq!(result, Err(ConvertError::InvalidRecordLength { len: 3 }));
}

#[test]
fn test_conversion_rejects_zero_dimensions() {
    assert_eq!(
        yolo_segmentation_to_absolute(&[0.1, 0.2], 0, 100),
        Err(ConvertError::InvalidImageDimensions {
            width: 0,
            height: 100
        })
    );
    assert_eq!(
        yolo_segmentation_to_absolute(&[0.1, 0.2], 100, 0),
        Err(ConvertError::InvalidImageDimensions {
            width: 100,
            height: 0
        })
    );
}

#[test]
fn test_parse_record() {
    let path = Path::new("labels/a.txt");

    let record = parse_record("3 0.25 0.5 0.75 1.0", path, 1).unwrap().unwrap();
    assert_eq!(record.class_id, 3);
    assert_eq!(record.coordinates, vec![0.25, 0.5, 0.75, 1.0]);

    assert!(parse_record("", path, 2).unwrap().is_none());
    assert!(parse_record("   \t", path, 3).unwrap().is_none());
}

#[test]
fn test_parse_record_reports_bad_tokens() {
    let path = Path::new("labels/a.txt");

    match parse_record("car 0.1 0.2", path, 4) {
        Err(TaskError::InvalidClassId { line, token, .. }) => {
            assert_eq!(line, 4);
            assert_eq!(token, "car");
        }
        other => panic!("unexpected result: {:?}", other),
    }

    match parse_record("0 0.1 abc", path, 7) {
        Err(TaskError::InvalidCoordinate { path, line, token }) => {
            assert_eq!(path, PathBuf::from("labels/a.txt"));
            assert_eq!(line, 7);
            assert_eq!(token, "abc");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_convert_records_skips_excluded_classes() {
    let content = "1 0.1 0.1 0.2 0.2\n0 0.5 0.5 0.75 0.75\n\n2 0.1 0.2 0.3 0.4\n";
    let (polygons, excluded) =
        convert_records(content, Path::new("a.txt"), 100, 200, |id| id == 1).unwrap();

    assert_eq!(excluded, 1);
    assert_eq!(
        polygons,
        vec![
            AbsolutePolygon {
                class_id: 0,
                points: vec![75, 150, 50, 100],
            },
            AbsolutePolygon {
                class_id: 2,
                points: vec![30, 80, 10, 40],
            },
        ]
    );
}

#[test]
fn test_convert_records_fails_whole_file_on_nan() {
    let content = "0 0.5 0.5 0.75 0.75\n0 0.1 nan 0.2 0.2\n";
    match convert_records(content, Path::new("a.txt"), 100, 100, |_| false) {
        Err(TaskError::Conversion { line, source, .. }) => {
            assert_eq!(line, 2);
            assert!(matches!(source, ConvertError::MalformedCoordinate { .. }));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_format_polygon() {
    let polygon = AbsolutePolygon {
        class_id: 0,
        points: vec![75, 150, 50, 100],
    };
    assert_eq!(format_polygon(&polygon), "75,150,50,100,0");

    let empty = AbsolutePolygon {
        class_id: 3,
        points: vec![],
    };
    assert_eq!(format_polygon(&empty), ",3");

    assert_eq!(format_polygons(&[polygon, empty]), "75,150,50,100,0\n,3\n");
}

#[test]
fn test_validate_extension() {
    assert_eq!(validate_extension("png"), Ok("png".to_string()));
    assert_eq!(validate_extension(".jpg"), Ok("jpg".to_string()));
    assert!(validate_extension("").is_err());
    assert!(validate_extension(".").is_err());
    assert!(validate_extension("a/b").is_err());
    assert!(validate_extension("p ng").is_err());
}

#[test]
fn test_args_defaults() {
    let args = Args::parse_from([
        "yoloseg2abs",
        "-i",
        "data/val/*.txt",
        "-l",
        "/data/out/test_gts",
        "-o",
        "/data/out/test_images",
    ]);

    assert_eq!(args.image_ext, "png");
    assert_eq!(args.exclude_classes, vec![1]);
    assert_eq!(args.workers, 0);
    assert!(args.visualize_dir.is_none());
    assert!(args.is_excluded(1));
    assert!(!args.is_excluded(0));
    assert_eq!(
        args.manifest_path(),
        PathBuf::from("/data/out/test_list.txt")
    );
}

#[test]
fn test_args_overrides() {
    let args = Args::parse_from([
        "yoloseg2abs",
        "--input_glob",
        "data/*.txt",
        "--output_label_dir",
        "gts",
        "--output_image_dir",
        "images",
        "--manifest",
        "lists/val.txt",
        "--image_ext",
        ".jpg",
        "--exclude_classes",
        "1,4",
        "--workers",
        "3",
    ]);

    assert_eq!(args.image_ext, "jpg");
    assert_eq!(args.exclude_classes, vec![1, 4]);
    assert_eq!(args.workers, 3);
    assert_eq!(args.manifest_path(), PathBuf::from("lists/val.txt"));
}

#[test]
fn test_args_exclude_classes_without_values_keeps_every_class() {
    let args = Args::parse_from([
        "yoloseg2abs",
        "-i",
        "*.txt",
        "-l",
        "gts",
        "-o",
        "images",
        "--exclude_classes",
    ]);

    assert!(args.exclude_classes.is_empty());
    assert!(!args.is_excluded(1));
}

#[test]
fn test_class_ids_are_canonicalized() {
    let content = "01 0.5 0.5 0.75 0.75
002 0.5 0.5 0.75 0.75
";
    let (polygons, excluded) =
        convert_records(content, Path::new("a.txt"), 100, 200, |id| id == 1).unwrap();

    assert_eq!(excluded, 1);
    assert_eq!(format_polygons(&polygons), "75,150,50,100,2\n");

    match parse_record("-1 0.1 0.2", Path::new("a.txt"), 1) {
        Err(TaskError::InvalidClassId { token, .. }) => assert_eq!(token, "-1"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_args_reject_bad_extension() {
    let result = Args::try_parse_from([
        "yoloseg2abs",
        "-i",
        "*.txt",
        "-l",
        "gts",
        "-o",
        "images",
        "--image_ext",
        "a/b",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_processing_stats_classifies_failures() {
    let mut stats = ProcessingStats::new();
    stats.record_success(&TaskSummary {
        records_written: 3,
        records_excluded: 1,
    });
    stats.record_failure(&TaskError::InvalidFileName {
        path: PathBuf::from(".txt"),
    });
    stats.record_failure(&TaskError::Conversion {
        path: PathBuf::from("a.txt"),
        line: 1,
        source: ConvertError::InvalidRecordLength { len: 3 },
    });
    stats.record_failure(&TaskError::Io {
        path: PathBuf::from("out"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    });

    assert_eq!(stats.total_files_processed, 4);
    assert_eq!(stats.successful_conversions, 1);
    assert_eq!(stats.records_written, 3);
    assert_eq!(stats.records_excluded, 1);
    assert_eq!(stats.failed_malformed_record, 1);
    assert_eq!(stats.failed_other, 2);
    assert_eq!(stats.failed_missing_image, 0);
    assert_eq!(stats.failed_conversions(), 3);
}
