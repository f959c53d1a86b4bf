use super::*;
use serde_json::json;

fn doc(v: serde_json::Value) -> DiagramDoc {
    serde_json::from_value(v).unwrap()
}

#[test]
fn stack_item_uses_theme_defaults() {
    let d = doc(json!({
        "items": [
            {"kind": "stack", "name": "fc1", "shape": "neuron", "count": 5}
        ]
    }))
    .build()
    .unwrap();

    let fc1 = d.stack("fc1").unwrap();
    assert_eq!(fc1.len(), 5);
    let last = fc1.positions()[4];
    assert_eq!(last.x, 0.0);
    assert!((last.y + 1.2).abs() < 1e-12);
}

#[test]
fn explicit_offset_and_position_are_honored() {
    let d = doc(json!({
        "items": [
            {"kind": "stack", "name": "s", "shape": "block", "fill": "purple",
             "at": [0, 0], "count": 3, "offset": [0, -1]}
        ]
    }))
    .build()
    .unwrap();
    let s = d.stack("s").unwrap();
    assert_eq!(
        s.positions(),
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, -1.0),
            Point::new(0.0, -2.0)
        ]
    );
    assert!(s.iter().all(|sh| sh.style.fill == Color::PURPLE));
}

#[test]
fn non_positive_counts_fail_with_invalid_count() {
    for count in [0, -2] {
        let err = doc(json!({
            "items": [{"kind": "stack", "name": "s", "shape": "block", "count": count}]
        }))
        .build()
        .unwrap_err();
        assert!(matches!(err, StackdiagError::InvalidCount(n) if n == count));
    }
}

#[test]
fn wrong_dimension_coordinates_fail_with_invalid_geometry() {
    let err = doc(json!({
        "items": [{"kind": "stack", "name": "s", "shape": "block", "count": 1, "at": [0, 0, 0]}]
    }))
    .build()
    .unwrap_err();
    assert!(matches!(err, StackdiagError::InvalidGeometry(_)));

    let err = doc(json!({
        "items": [{"kind": "connector", "name": "c", "start": [0, 0], "end": [1, 1],
                   "offsets": [[1]]}]
    }))
    .build()
    .unwrap_err();
    assert!(matches!(err, StackdiagError::InvalidGeometry(_)));
}

#[test]
fn references_must_point_backwards() {
    let d = doc(json!({
        "items": [
            {"kind": "mesh", "name": "m", "from": "a", "to": "b"},
            {"kind": "stack", "name": "a", "shape": "neuron", "count": 2},
            {"kind": "stack", "name": "b", "shape": "neuron", "count": 2}
        ]
    }));
    let err = d.validate().unwrap_err();
    assert!(matches!(err, StackdiagError::Validation(_)));
    assert!(err.to_string().contains("'m' refers to 'a'"));
}

#[test]
fn duplicate_names_are_rejected() {
    let d = doc(json!({
        "items": [
            {"kind": "stack", "name": "a", "shape": "neuron", "count": 2},
            {"kind": "stack", "name": "a", "shape": "neuron", "count": 2}
        ]
    }));
    assert!(matches!(d.validate(), Err(StackdiagError::Validation(_))));
}

#[test]
fn next_to_and_mesh_compose() {
    let d = doc(json!({
        "items": [
            {"kind": "stack", "name": "fc1", "shape": "neuron", "count": 3},
            {"kind": "stack", "name": "fc2", "shape": "neuron", "count": 2,
             "next_to": {"target": "fc1", "direction": "right", "buff": 0.5}},
            {"kind": "mesh", "name": "dense", "from": "fc1", "to": "fc2"}
        ]
    }))
    .build()
    .unwrap();

    let fc1 = d.stack("fc1").unwrap().bounds();
    let fc2 = d.stack("fc2").unwrap().bounds();
    assert!((fc2.x0 - fc1.x1 - 0.5).abs() < 1e-12);
    assert!((fc2.center().y - fc1.center().y).abs() < 1e-12);

    let Geometry::Mesh { edges, .. } = &d.element("dense").unwrap().geometry else {
        panic!("expected mesh");
    };
    assert_eq!(edges.len(), 6);
}

#[test]
fn mesh_requires_stacks() {
    let err = doc(json!({
        "items": [
            {"kind": "stack", "name": "a", "shape": "neuron", "count": 2},
            {"kind": "arrow", "name": "x", "start": [0, 0], "end": [1, 0]},
            {"kind": "mesh", "name": "m", "from": "a", "to": "x"}
        ]
    }))
    .build()
    .unwrap_err();
    assert!(err.to_string().contains("'x' is not a stack (found arrow)"));
}

#[test]
fn arrow_between_elements_uses_facing_sides() {
    let d = doc(json!({
        "items": [
            {"kind": "stack", "name": "a", "shape": "block", "count": 1, "at": [0, 0]},
            {"kind": "stack", "name": "b", "shape": "block", "count": 1, "at": [4, 0]},
            {"kind": "arrow", "name": "ab", "from": "a", "to": "b", "buff": 0}
        ]
    }))
    .build()
    .unwrap();
    let Geometry::Arrow { arrow } = &d.element("ab").unwrap().geometry else {
        panic!("expected arrow");
    };
    assert_eq!(arrow.start(), Point::new(0.25, 0.0));
    assert_eq!(arrow.end(), Point::new(3.75, 0.0));
}

#[test]
fn arrow_without_endpoints_is_rejected() {
    let err = doc(json!({
        "items": [{"kind": "arrow", "name": "lonely"}]
    }))
    .build()
    .unwrap_err();
    assert!(err.to_string().contains("needs `start` or `from`"));
}

#[test]
fn connector_endpoints_can_anchor_on_stack_elements() {
    let d = doc(json!({
        "items": [
            {"kind": "stack", "name": "layer", "shape": "block", "count": 3,
             "at": [0, 0], "offset": [1, 0]},
            {"kind": "connector", "name": "skip",
             "start": [0, 2],
             "end": {"of": "layer", "index": -1, "anchor": "top"},
             "offsets": [[0, 1], [3, 0]]}
        ]
    }))
    .build()
    .unwrap();
    let Geometry::Connector { connector, style } = &d.element("skip").unwrap().geometry else {
        panic!("expected connector");
    };
    assert_eq!(connector.segments().len(), 3);
    assert_eq!(connector.end(), Point::new(2.0, 0.25));
    assert_eq!(connector.marker().center, Point::new(0.0, 2.0));
    assert!(style.dashed);
}

#[test]
fn out_of_range_index_is_rejected() {
    let err = doc(json!({
        "items": [
            {"kind": "stack", "name": "layer", "shape": "block", "count": 2},
            {"kind": "connector", "name": "c", "start": [0, 0],
             "end": {"of": "layer", "index": 2}}
        ]
    }))
    .build()
    .unwrap_err();
    assert!(err.to_string().contains("index 2 out of range"));
}

#[test]
fn levels_item_builds_one_block_per_fill() {
    let d = doc(json!({
        "items": [
            {"kind": "levels", "name": "reshape", "fills": ["purple", "orange", "blue"],
             "per_level": 3, "scale": 0.2, "width_delta": 0.3}
        ]
    }))
    .build()
    .unwrap();
    let s = d.stack("reshape").unwrap();
    assert_eq!(s.len(), 9);
    assert_eq!(s.shapes()[3].style.fill, Color::ORANGE);
    assert!(s.iter().all(|sh| (sh.width() - (0.1 + 0.3)).abs() < 1e-12));
    assert!(s.iter().all(|sh| (sh.height() - 0.1).abs() < 1e-12));
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        DiagramDoc::from_json("{\"items\": ["),
        Err(StackdiagError::Serde(_))
    ));
}

#[test]
fn missing_file_is_reported() {
    let err = DiagramDoc::from_path(Path::new("does/not/exist.json")).unwrap_err();
    assert!(err.to_string().contains("does/not/exist.json"));
}

#[test]
fn huge_counts_fail_before_allocating() {
    for count in [i64::MAX, MAX_STACK_LEN as i64 + 1] {
        let err = doc(json!({
            "items": [{"kind": "stack", "name": "s", "shape": "block", "count": count}]
        }))
        .build()
        .unwrap_err();
        assert!(matches!(err, StackdiagError::InvalidCount(n) if n == count));
    }

    let err = doc(json!({
        "items": [{"kind": "levels", "name": "l", "fills": ["blue", "orange"],
                   "per_level": MAX_STACK_LEN}]
    }))
    .build()
    .unwrap_err();
    assert!(matches!(err, StackdiagError::InvalidCount(_)));
}

#[test]
fn overflowing_placement_is_invalid_geometry() {
    let err = doc(json!({
        "items": [{"kind": "stack", "name": "far", "shape": "block", "count": 2,
                   "at": [1e300, 0], "offset": [1e300, 0], "scale": 1e10}]
    }))
    .build()
    .unwrap_err();
    assert!(matches!(err, StackdiagError::InvalidGeometry(_)), "{err}");
}

#[test]
fn narrowing_blocks_below_zero_width_is_an_error() {
    let err = doc(json!({
        "items": [{"kind": "stack", "name": "s", "shape": "block", "count": 2,
                   "scale": 0.2, "width_delta": -5}]
    }))
    .build()
    .unwrap_err();
    assert!(matches!(err, StackdiagError::InvalidGeometry(_)), "{err}");
}

#[test]
fn arrow_ends_must_not_be_given_twice() {
    let err = doc(json!({
        "items": [
            {"kind": "stack", "name": "a", "shape": "block", "count": 1},
            {"kind": "arrow", "name": "x", "start": [0, 0], "from": "a", "end": [1, 0]}
        ]
    }))
    .validate()
    .unwrap_err();
    assert!(matches!(err, StackdiagError::Validation(_)));
    assert!(err.to_string().contains("gives both `start` and `from`"));

    let err = doc(json!({
        "items": [
            {"kind": "stack", "name": "a", "shape": "block", "count": 1},
            {"kind": "arrow", "name": "x", "start": [0, 0], "end": [1, 0], "to": "a"}
        ]
    }))
    .build()
    .unwrap_err();
    assert!(err.to_string().contains("gives both `end` and `to`"));
}

#[test]
fn stack_items_can_override_seed_size_and_opacity() {
    let d = doc(json!({
        "items": [
            {"kind": "stack", "name": "noise", "shape": "block", "count": 1,
             "width": 0.1, "height": 1.0, "fill_opacity": 0.5},
            {"kind": "stack", "name": "fc", "shape": "neuron", "count": 2, "radius": 0.2}
        ]
    }))
    .build()
    .unwrap();

    let noise = d.stack("noise").unwrap().first();
    assert_eq!(
        noise.kind,
        ShapeKind::Rect {
            width: 0.1,
            height: 1.0
        }
    );
    assert_eq!(noise.style.fill_opacity, 0.5);
    assert!(
        d.stack("fc")
            .unwrap()
            .iter()
            .all(|s| s.kind == ShapeKind::Circle { radius: 0.2 })
    );
}

#[test]
fn size_overrides_must_match_the_seed_shape() {
    let err = doc(json!({
        "items": [{"kind": "stack", "name": "s", "shape": "neuron", "count": 1, "width": 1.0}]
    }))
    .build()
    .unwrap_err();
    assert!(matches!(err, StackdiagError::Validation(_)));

    let err = doc(json!({
        "items": [{"kind": "stack", "name": "s", "shape": "block", "count": 1, "radius": 1.0}]
    }))
    .build()
    .unwrap_err();
    assert!(matches!(err, StackdiagError::Validation(_)));

    let err = doc(json!({
        "items": [{"kind": "stack", "name": "s", "shape": "block", "count": 1, "height": -1.0}]
    }))
    .build()
    .unwrap_err();
    assert!(matches!(err, StackdiagError::InvalidGeometry(_)));
}

#[test]
fn surround_outlines_one_stack_element() {
    let d = doc(json!({
        "items": [
            {"kind": "stack", "name": "layer", "shape": "block", "count": 3,
             "at": [0, 0], "offset": [1, 0]},
            {"kind": "surround", "name": "pick", "target": "layer", "index": -1}
        ]
    }))
    .build()
    .unwrap();
    let Geometry::Surround { shape } = &d.element("pick").unwrap().geometry else {
        panic!("expected surround");
    };
    assert_eq!(shape.center, Point::new(2.0, 0.0));
    assert!((shape.width() - 0.7).abs() < 1e-12);
    assert_eq!(shape.style.stroke, Color::YELLOW);
    assert_eq!(shape.style.fill_opacity, 0.0);

    let err = doc(json!({
        "items": [{"kind": "surround", "name": "pick", "target": "nothing"}]
    }))
    .validate()
    .unwrap_err();
    assert!(err.to_string().contains("refers to 'nothing'"));
}
