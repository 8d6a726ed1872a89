//! Basic evaluation example demonstrating core functionality.

use voc_eval::{
    evaluate, load_from_string, metrics::iou::calculate_iou, BoundingBox, BoxCollection, BoxKind,
    EvaluationConfig, InterpolationMethod, LoadOptions,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== PASCAL VOC Evaluation Example ===\n");

    // Example 1: IoU Calculation
    println!("1. IoU Calculation");
    let bbox1 = BoundingBox::new(10.0, 10.0, 50.0, 50.0);
    let bbox2 = BoundingBox::new(12.0, 12.0, 48.0, 48.0);
    println!("   IoU between nested boxes: {:.4}", calculate_iou(&bbox1, &bbox2));
    println!();

    // Example 2: Load ground truth
    println!("2. Loading Ground Truth");
    let ground_truth_json = r#"{
        "boxes": [
            {"image_id": "000001", "class_label": "person", "bbox": [100.0, 100.0, 200.0, 150.0]},
            {"image_id": "000001", "class_label": "car", "bbox": [350.0, 200.0, 100.0, 120.0]},
            {"image_id": "000002", "class_label": "person", "bbox": [40.0, 60.0, 80.0, 160.0]}
        ]
    }"#;
    let options = LoadOptions::default();
    let ground_truth = load_from_string(ground_truth_json, BoxKind::GroundTruth, &options)?;
    println!("   Loaded {} ground truth boxes", ground_truth.len());
    println!();

    // Example 3: Load detections
    println!("3. Loading Detections");
    let detections_json = r#"{
        "boxes": [
            {"image_id": "000001", "class_label": "person", "bbox": [105.0, 98.0, 195.0, 155.0], "confidence": 0.95},
            {"image_id": "000001", "class_label": "car", "bbox": [348.0, 198.0, 105.0, 125.0], "confidence": 0.87},
            {"image_id": "000001", "class_label": "person", "bbox": [50.0, 50.0, 80.0, 90.0], "confidence": 0.42},
            {"image_id": "000002", "class_label": "person", "bbox": [45.0, 58.0, 75.0, 150.0], "confidence": 0.66},
            {"image_id": "000002", "class_label": "bicycle", "bbox": [300.0, 300.0, 60.0, 40.0], "confidence": 0.31}
        ]
    }"#;
    let detections = load_from_string(detections_json, BoxKind::Detection, &options)?;
    println!("   Loaded {} detections", detections.len());
    println!();

    let collection = BoxCollection::from_records(ground_truth.into_iter().chain(detections));

    // Example 4: Evaluation with both interpolation methods
    println!("4. Running Evaluation");
    for method in [InterpolationMethod::EveryPoint, InterpolationMethod::ElevenPoint] {
        let config = EvaluationConfig::new(0.5, method)?;
        let report = evaluate(&collection, &config)?;

        println!("   {}:", method);
        for class in &report.classes {
            println!(
                "   ├─ {}: AP {:.4} (TP={}, FP={}, GT={})",
                class.class_label, class.ap, class.true_positives, class.false_positives,
                class.total_ground_truth
            );
        }
        println!("   └─ mAP: {:.4}", report.map);
        if !report.excluded_classes.is_empty() {
            println!("   Excluded (no ground truth): {:?}", report.excluded_classes);
        }
        println!();
    }

    // Example 5: Text report and plot data
    println!("5. Report");
    let report = evaluate(&collection, &EvaluationConfig::default())?;
    println!("{}", report.render_text());
    if let Some(person) = report.class("person") {
        println!("   Precision x Recall points for 'person': {:?}", person.plot_series());
    }
    println!();

    println!("=== Example Complete ===");

    Ok(())
}
