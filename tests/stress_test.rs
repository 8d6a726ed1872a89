//! Stress tests with large datasets and complex scenarios.

use voc_eval::collection::BoxCollection;
use voc_eval::config::EvaluationConfig;
use voc_eval::evaluator::evaluate;
use voc_eval::metrics::ap::InterpolationMethod;
use voc_eval::types::{BoundingBox, BoxRecord};

fn square(x: f64, y: f64, size: f64) -> BoundingBox {
    BoundingBox::from_xywh(x, y, size, size)
}

#[test]
fn test_1000_boxes_single_image() {
    let mut records = Vec::new();

    for i in 0..1000 {
        let x = (i % 100) as f64 * 10.0;
        let y = (i / 100) as f64 * 10.0;
        records.push(BoxRecord::ground_truth("1", "object", square(x, y, 8.0)));
        records.push(BoxRecord::detection(
            "1",
            "object",
            square(x, y, 8.0),
            0.9 - (i as f64 / 10000.0),
        ));
    }

    let collection = BoxCollection::from_records(records);
    let report = evaluate(&collection, &EvaluationConfig::default()).unwrap();
    let class = report.class("object").unwrap();
    assert_eq!(class.true_positives, 1000);
    assert_eq!(class.false_positives, 0);
    assert!((report.map - 1.0).abs() < 1e-9, "Should have mAP 1.0 with 1000 perfect matches");
}

#[test]
fn test_10_classes_10_images_10_boxes() {
    let mut records = Vec::new();

    for class_id in 1..=10 {
        for image_id in 1..=10 {
            for obj_id in 0..10 {
                let x = (obj_id * 20) as f64;
                let y = (class_id * 10) as f64;
                let image = format!("image_{}", image_id);
                let class = format!("class_{:02}", class_id);

                records.push(BoxRecord::ground_truth(image.clone(), class.clone(), square(x, y, 15.0)));
                records.push(BoxRecord::detection(
                    image,
                    class,
                    square(x, y, 15.0),
                    0.85 + (obj_id as f64 / 100.0),
                ));
            }
        }
    }

    let collection = BoxCollection::from_records(records);
    for method in [InterpolationMethod::ElevenPoint, InterpolationMethod::EveryPoint] {
        let config = EvaluationConfig::new(0.5, method).unwrap();
        let report = evaluate(&collection, &config).unwrap();

        assert_eq!(report.classes.len(), 10, "Should have 10 classes");
        assert_eq!(report.classes[0].class_label, "class_01");
        assert_eq!(report.classes[9].class_label, "class_10");
        assert!((report.map - 1.0).abs() < 1e-9, "Should have mAP 1.0");
    }
}

#[test]
fn test_mixed_precision_scenario() {
    // 100 ground truths: 50 perfect detections, 25 shifted detections, 25 false positives
    let mut records = Vec::new();

    for i in 0..100 {
        let x = (i % 10) as f64 * 50.0;
        let y = (i / 10) as f64 * 50.0;
        records.push(BoxRecord::ground_truth("1", "object", square(x, y, 40.0)));
    }

    for i in 0..50 {
        let x = (i % 10) as f64 * 50.0;
        let y = (i / 10) as f64 * 50.0;
        records.push(BoxRecord::detection("1", "object", square(x, y, 40.0), 0.95));
    }

    for i in 50..75 {
        let x = (i % 10) as f64 * 50.0 + 5.0;
        let y = (i / 10) as f64 * 50.0 + 5.0;
        records.push(BoxRecord::detection("1", "object", square(x, y, 40.0), 0.75));
    }

    for i in 0..25 {
        records.push(BoxRecord::detection(
            "1",
            "object",
            square(1000.0 + i as f64 * 50.0, 1000.0, 40.0),
            0.5,
        ));
    }

    let collection = BoxCollection::from_records(records);
    let report = evaluate(&collection, &EvaluationConfig::default()).unwrap();
    let class = report.class("object").unwrap();

    assert_eq!(class.true_positives, 75);
    assert_eq!(class.false_positives, 25);
    assert_eq!(*class.recall.last().unwrap(), 0.75);
    // All TPs rank above the FPs, so the envelope is flat at 1.0 up to recall 0.75
    assert!((class.ap - 0.75).abs() < 1e-9, "AP should be 0.75, got {}", class.ap);
}

#[test]
fn test_many_images_sparse_classes() {
    let mut records = Vec::new();

    for image_id in 0..500 {
        let image = format!("{:04}", image_id);
        let class = if image_id % 2 == 0 { "even" } else { "odd" };
        records.push(BoxRecord::ground_truth(image.clone(), class, square(0.0, 0.0, 10.0)));
        // Every fifth image gets a detection in the wrong image slot: a false positive
        let target = if image_id % 5 == 0 {
            format!("missing-{}", image_id)
        } else {
            image
        };
        records.push(BoxRecord::detection(target, class, square(0.0, 0.0, 10.0), 0.9));
    }

    let collection = BoxCollection::from_records(records);
    let report = evaluate(&collection, &EvaluationConfig::default()).unwrap();

    assert_eq!(report.classes.len(), 2);
    for class in &report.classes {
        assert_eq!(class.total_ground_truth, 250);
        assert_eq!(class.true_positives + class.false_positives, 250);
        assert!(class.ap > 0.0 && class.ap < 1.0);
    }
}
