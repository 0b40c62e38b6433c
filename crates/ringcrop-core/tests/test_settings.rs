use ringcrop_core::config::CropLimits;
use ringcrop_core::geometry::{
    default_crop, fit_to_container, CropRectangle, DisplayMetrics, Point, Size,
};
use ringcrop_core::settings::{
    remap, serialize, CropSettings, MemoryImageSink, MemorySettingsStore, ImageSink,
    SettingsStore,
};

fn metrics(container: (f64, f64), image: (f64, f64)) -> DisplayMetrics {
    fit_to_container(Size::new(container.0, container.1), Size::new(image.0, image.1)).unwrap()
}

// ---------------------------------------------------------------------------
// Serialize / remap
// ---------------------------------------------------------------------------

#[test]
fn test_round_trip_same_metrics_is_exact() {
    let limits = CropLimits::default();
    let containers = [(800.0, 800.0), (640.0, 480.0), (333.0, 777.0)];
    let images = [(1000.0, 500.0), (300.0, 900.0), (512.0, 512.0)];
    let rotations = [0.0, 12.5, -179.9, 180.0];

    for &container in &containers {
        for &image in &images {
            let m = metrics(container, image);
            let default = default_crop(&m, &limits);
            let candidates = [
                default,
                CropRectangle::new(m.left(), m.top(), default.width, default.height),
                CropRectangle::new(
                    m.right() - default.width,
                    m.bottom() - default.height,
                    default.width,
                    default.height,
                ),
            ];
            for rect in candidates {
                for &rotation in &rotations {
                    let restored = remap(&serialize(&rect, rotation, &m), &m).unwrap();
                    assert_eq!(restored.rect, rect, "container {container:?} image {image:?}");
                    assert_eq!(restored.rotation, rotation);
                }
            }
        }
    }
}

#[test]
fn test_remap_scales_with_display() {
    let small = metrics((500.0, 400.0), (400.0, 400.0));
    let large = metrics((1000.0, 800.0), (400.0, 400.0));
    assert_eq!(small.display_offset, Point::new(50.0, 0.0));
    assert_eq!(large.display_offset, Point::new(100.0, 0.0));

    let rect = CropRectangle::new(150.0, 100.0, 120.0, 120.0);
    let restored = remap(&serialize(&rect, 30.0, &small), &large).unwrap();
    assert_eq!(restored.rect, CropRectangle::new(300.0, 200.0, 240.0, 240.0));
    assert_eq!(restored.rotation, 30.0);
}

#[test]
fn test_remap_clamps_into_smaller_display() {
    let m = metrics((400.0, 400.0), (400.0, 400.0));
    let saved = CropSettings {
        x: 390.0,
        y: -50.0,
        width: 600.0,
        height: 300.0,
        ..serialize(&CropRectangle::new(0.0, 0.0, 1.0, 1.0), 0.0, &m)
    };
    let restored = remap(&saved, &m).unwrap();
    assert_eq!(restored.rect, CropRectangle::new(100.0, 0.0, 300.0, 300.0));
}

#[test]
fn test_remap_normalizes_rotation() {
    let m = metrics((400.0, 400.0), (400.0, 400.0));
    let rect = CropRectangle::new(100.0, 100.0, 200.0, 200.0);
    let restored = remap(&serialize(&rect, 370.0, &m), &m).unwrap();
    assert!((restored.rotation - 10.0).abs() < 1e-9);
}

#[test]
fn test_remap_rejects_degenerate_geometry() {
    let m = metrics((400.0, 400.0), (400.0, 400.0));
    let rect = CropRectangle::new(100.0, 100.0, 200.0, 200.0);

    let mut saved = serialize(&rect, 0.0, &m);
    saved.image_display_width = 0.0;
    assert!(remap(&saved, &m).is_none());

    let saved = serialize(&rect, 0.0, &m);
    let degenerate = DisplayMetrics {
        container: Size::new(0.0, 0.0),
        display_size: Size::new(0.0, 0.0),
        display_offset: Point::new(0.0, 0.0),
    };
    assert!(remap(&saved, &degenerate).is_none());
}

// ---------------------------------------------------------------------------
// JSON shape
// ---------------------------------------------------------------------------

#[test]
fn test_json_field_names() {
    let m = metrics((800.0, 800.0), (1000.0, 500.0));
    let settings = serialize(&CropRectangle::new(300.0, 300.0, 200.0, 200.0), 15.0, &m)
        .with_quarter_turns(5);
    let value = serde_json::to_value(&settings).unwrap();

    assert_eq!(value["version"], 1);
    assert_eq!(value["x"], 300.0);
    assert_eq!(value["rotationAngle"], 15.0);
    assert_eq!(value["imageDisplayWidth"], 800.0);
    assert_eq!(value["imageDisplayHeight"], 400.0);
    assert_eq!(value["imageDisplayOffsetX"], 0.0);
    assert_eq!(value["imageDisplayOffsetY"], 200.0);
    assert_eq!(value["quarterTurns"], 1);
}

#[test]
fn test_json_optional_fields_default() {
    let json = r#"{
        "x": 10.0, "y": 20.0, "width": 100.0, "height": 100.0,
        "imageDisplayWidth": 400.0, "imageDisplayHeight": 300.0
    }"#;
    let settings: CropSettings = serde_json::from_str(json).unwrap();
    assert_eq!(settings.version, 1);
    assert_eq!(settings.rotation_angle, 0.0);
    assert_eq!(settings.image_display_offset_x, 0.0);
    assert_eq!(settings.quarter_turns, 0);
}

// ---------------------------------------------------------------------------
// In-memory collaborators
// ---------------------------------------------------------------------------

#[test]
fn test_memory_store_persist_load_remove() {
    let m = metrics((400.0, 400.0), (400.0, 400.0));
    let settings = serialize(&CropRectangle::new(100.0, 100.0, 200.0, 200.0), 0.0, &m);

    let mut store = MemorySettingsStore::new();
    assert!(store.load("a").unwrap().is_none());
    store.persist("a", &settings).unwrap();
    assert_eq!(store.load("a").unwrap(), Some(settings));
    assert_eq!(store.len(), 1);

    store.remove("a").unwrap();
    assert!(store.is_empty());
    store.remove("a").unwrap();
}

#[test]
fn test_memory_sink_failure_toggle() {
    let mut sink = MemoryImageSink::failing();
    assert!(sink.save(b"png").is_err());
    assert!(sink.saved().is_empty());

    sink.set_failing(false);
    let location = sink.save(b"png").unwrap();
    assert!(location.starts_with("memory://"));
    assert_eq!(sink.saved().len(), 1);
}
