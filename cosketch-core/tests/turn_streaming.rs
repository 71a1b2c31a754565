//! Turn Streaming Integration Tests
//!
//! Tests the complete per-turn flow including:
//! - Streaming extraction under arbitrary fragmentation
//! - Exactly-once, in-order emission
//! - Canvas encoding of the extracted shapes for the next turn

use cosketch_core::{
    encode, render, AsciiBlock, PathCommand, ScalarField, Shape, StreamEvent, StreamExtractor,
    Stroke, TurnOutput, Usage,
};

/// A realistic full model turn.
const FULL_TURN: &str = r##"{
  "observation": "a red scribble near the top left",
  "intention": "add a blue box and label it",
  "shapes": [
    {"type":"circle","cx":10,"cy":10,"r":5,"color":"#ef4444"},
    {"type":"rect","x":40,"y":40,"width":30,"height":20,"fill":"#3b82f6"},
    {"type":"path","commands":[{"type":"move","x":0,"y":0},{"type":"line","x":12,"y":12}],"color":"green"}
  ],
  "blocks": [
    {"text":"hello\nworld","x":80,"y":20,"color":"#a855f7"}
  ],
  "say": "I boxed in your scribble."
}"##;

/// Feed text to a fresh extractor in chunks of `size` bytes and finalize.
fn stream_in_chunks(text: &str, size: usize) -> Vec<StreamEvent> {
    let mut extractor = StreamExtractor::new();
    let mut events = Vec::new();
    for chunk in text.as_bytes().chunks(size) {
        let fragment = std::str::from_utf8(chunk).expect("test input is ASCII");
        events.extend(extractor.feed(fragment));
    }
    events.extend(extractor.finish(None));
    events
}

fn shapes_of(events: &[StreamEvent]) -> Vec<Shape> {
    events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Shape { value, .. } => Some(value.clone()),
            _ => None,
        })
        .collect()
}

fn blocks_of(events: &[StreamEvent]) -> Vec<AsciiBlock> {
    events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Block { value, .. } => Some(value.clone()),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Equivalence: streaming never changes the final result
// ============================================================================

#[test]
fn test_chunking_equivalence() {
    let one_shot = TurnOutput::from_json(FULL_TURN).expect("turn should parse");

    for size in [1, 2, 3, 7, 16, 64, FULL_TURN.len()] {
        let events = stream_in_chunks(FULL_TURN, size);

        assert_eq!(
            shapes_of(&events),
            one_shot.shapes,
            "shape mismatch at chunk size {size}"
        );
        assert_eq!(
            blocks_of(&events),
            one_shot.blocks,
            "block mismatch at chunk size {size}"
        );
        assert!(
            matches!(events.last(), Some(StreamEvent::Done { .. })),
            "missing done at chunk size {size}"
        );
    }
}

#[test]
fn test_scalar_fields_extracted_under_chunking() {
    for size in [1, 5, 13] {
        let events = stream_in_chunks(FULL_TURN, size);

        let fields: Vec<(ScalarField, &str)> = events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Field { name, value } => Some((*name, value.as_str())),
                _ => None,
            })
            .collect();

        assert_eq!(fields.len(), 3, "at chunk size {size}");
        assert!(fields.contains(&(
            ScalarField::Observation,
            "a red scribble near the top left"
        )));
        assert!(fields.contains(&(ScalarField::Intention, "add a blue box and label it")));
        assert!(fields.contains(&(ScalarField::Say, "I boxed in your scribble.")));
    }
}

// ============================================================================
// Monotonic, exactly-once emission
// ============================================================================

#[test]
fn test_indices_monotonic_and_unique() {
    for size in [1, 4, 9] {
        let events = stream_in_chunks(FULL_TURN, size);

        let shape_indices: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Shape { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(shape_indices, vec![0, 1, 2], "at chunk size {size}");

        let block_indices: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Block { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(block_indices, vec![0], "at chunk size {size}");
    }
}

#[test]
fn test_early_emission_before_turn_completes() {
    let mut extractor = StreamExtractor::new();

    // First shape closed and delimited; the rest of the turn still pending
    let head = r#"{"shapes":[{"type":"circle","cx":1,"cy":1,"r":1},"#;
    let events = extractor.feed(head);

    assert_eq!(
        shapes_of(&events).len(),
        1,
        "first shape should arrive before the turn is anywhere near complete"
    );
}

#[test]
fn test_no_false_positive_on_dangling_object() {
    let mut extractor = StreamExtractor::new();
    let events = extractor.feed(r#"{"shapes":[{"type":"circle","cx":1,"cy"#);
    assert!(events.is_empty());
}

// ============================================================================
// Representative turn fragments
// ============================================================================

#[test]
fn test_scenario_single_circle_two_fragments() {
    let mut extractor = StreamExtractor::new();

    let first =
        extractor.feed(r##"{"shapes":[{"type":"circle","cx":10,"cy":10,"r":5,"color":"#ef4444"}"##);
    assert!(first.is_empty(), "no event after the first fragment");

    let second = extractor.feed("]}");
    assert_eq!(second.len(), 1, "exactly one event after the second");
    match &second[0] {
        StreamEvent::Shape { index: 0, value } => match value {
            Shape::Circle { r, style, .. } => {
                assert_eq!(*r, Some(5.0));
                assert_eq!(style.color.as_deref(), Some("#ef4444"));
            }
            other => panic!("Expected a circle, got {other:?}"),
        },
        other => panic!("Expected a shape event, got {other:?}"),
    }
}

#[test]
fn test_scenario_rect_in_single_cell() {
    let shapes = vec![Shape::Rect {
        x: Some(0.0),
        y: Some(0.0),
        width: Some(20.0),
        height: Some(20.0),
        style: cosketch_core::ShapeStyle {
            color: Some("#3b82f6".to_string()),
            ..cosketch_core::ShapeStyle::default()
        },
    }];
    let grid = render(&[], &shapes, 40, 40, 20);

    assert_eq!((grid.width(), grid.height()), (2, 2));
    assert_eq!(grid.get(0, 0), Some('b'));
    for (col, row) in [(1, 0), (0, 1), (1, 1)] {
        assert_eq!(grid.get(col, row), Some('.'), "cell ({col},{row})");
    }
}

#[test]
fn test_scenario_white_stroke_leaves_grid_unchanged() {
    let strokes = vec![Stroke::new(
        vec![
            PathCommand::Move { x: 5.0, y: 5.0 },
            PathCommand::Line { x: 35.0, y: 35.0 },
        ],
        "#ffffff",
    )];

    let before = render(&[], &[], 40, 40, 20);
    let after = render(&strokes, &[], 40, 40, 20);
    assert_eq!(before, after);
}

#[test]
fn test_finish_twice_returns_done_only() {
    let mut extractor = StreamExtractor::new();
    let _ = extractor.feed(FULL_TURN);

    let first = extractor.finish(Some(Usage {
        input_tokens: Some(900),
        output_tokens: Some(210),
    }));
    assert!(matches!(first.last(), Some(StreamEvent::Done { .. })));

    let second = extractor.finish(None);
    assert_eq!(second, vec![StreamEvent::Done { usage: None }]);
}

// ============================================================================
// Grid bounds
// ============================================================================

#[test]
fn test_grid_bounds_for_various_canvas_sizes() {
    for (w, h, cell) in [(1, 1, 20), (800, 600, 20), (799, 601, 20), (50, 50, 7)] {
        let grid = render(&[], &[], w, h, cell);
        assert_eq!(grid.width() as u32, w.div_ceil(cell), "{w}x{h}@{cell}");
        assert_eq!(grid.height() as u32, h.div_ceil(cell), "{w}x{h}@{cell}");
    }
}

#[test]
fn test_wild_coordinates_never_panic() {
    let shapes = vec![
        Shape::Circle {
            cx: Some(f64::MAX),
            cy: Some(-1e300),
            r: Some(1e12),
            style: cosketch_core::ShapeStyle::default(),
        },
        Shape::Line {
            x1: Some(f64::NAN),
            y1: Some(0.0),
            x2: Some(f64::INFINITY),
            y2: Some(3.0),
            style: cosketch_core::ShapeStyle::default(),
        },
    ];
    let grid = render(&[], &shapes, 100, 100, 20);
    assert_eq!((grid.width(), grid.height()), (5, 5));
}

// ============================================================================
// Round trip: extracted shapes feed the next turn's encoding
// ============================================================================

#[test]
fn test_extracted_shapes_encode_for_next_turn() {
    let events = stream_in_chunks(FULL_TURN, 11);
    let shapes = shapes_of(&events);

    let strokes = vec![Stroke::new(
        vec![
            PathCommand::Move { x: 5.0, y: 95.0 },
            PathCommand::Line { x: 95.0, y: 95.0 },
        ],
        "red",
    )];

    let text = encode(
        &strokes,
        &shapes,
        100,
        100,
        20,
        "R=red (you)  b=blue (AI)",
    );

    // Human baseline in uppercase, AI rect in lowercase, legend appended
    assert!(text.contains('R'));
    assert!(text.contains('b'));
    assert!(text.contains("R=red (you)"));
    // header + one line per row
    assert_eq!(text.lines().count(), 1 + 5 + 1 + 1);
}
