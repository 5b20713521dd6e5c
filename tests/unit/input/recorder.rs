use super::*;

fn brush() -> Brush {
    Brush {
        color: Rgba8::opaque(200, 0, 0),
        width: 6.0,
    }
}

fn record(book: &mut StrokeBook, samples: usize, t0: f64) -> Option<u32> {
    let mut rec = StrokeRecorder::new();
    rec.begin(Point::new(0.0, 0.0), t0, brush());
    for i in 1..samples {
        assert!(rec.append(Point::new(i as f64, i as f64 * 2.0), t0 + i as f64 * 16.0));
    }
    rec.finish(t0 + samples as f64 * 16.0, book)
}

#[test]
fn finalized_stroke_keeps_every_sample() {
    for n in 2..12 {
        let mut book = StrokeBook::new();
        assert_eq!(record(&mut book, n, 1000.0), Some(1));
        assert_eq!(book.as_slice()[0].points.len(), n);
    }
}

#[test]
fn short_gestures_are_discarded() {
    let mut book = StrokeBook::new();
    assert_eq!(record(&mut book, 1, 0.0), None);
    assert!(book.is_empty());

    let mut rec = StrokeRecorder::new();
    assert_eq!(rec.finish(10.0, &mut book), None);
}

#[test]
fn timestamps_are_relative_to_pointer_down() {
    let mut book = StrokeBook::new();
    record(&mut book, 3, 5000.0);
    let s = &book.as_slice()[0];
    let ts: Vec<f64> = s.points.iter().map(|p| p.timestamp).collect();
    assert_eq!(ts, vec![0.0, 16.0, 32.0]);
    assert_eq!(s.start_time, 5000.0);
    assert_eq!(s.end_time, 5048.0);
    assert_eq!(s.duration_ms(), 48.0);
    assert_eq!(s.brush(), brush());
}

#[test]
fn append_is_ignored_while_idle() {
    let mut rec = StrokeRecorder::new();
    assert!(!rec.append(Point::new(1.0, 1.0), 10.0));
    assert!(!rec.is_recording());
    rec.begin(Point::new(0.0, 0.0), 0.0, brush());
    assert!(rec.is_recording());
    assert_eq!(rec.pending_points(), 1);
}

#[test]
fn strokes_are_numbered_sequentially() {
    let mut book = StrokeBook::new();
    assert_eq!(record(&mut book, 2, 0.0), Some(1));
    assert_eq!(record(&mut book, 1, 100.0), None);
    assert_eq!(record(&mut book, 4, 200.0), Some(2));
    let numbers: Vec<u32> = book.iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[test]
fn removal_renumbers_remaining_strokes_in_order() {
    let mut book = StrokeBook::new();
    for i in 0..5 {
        record(&mut book, 2 + i, i as f64 * 1000.0);
    }
    let removed = book.remove(1).unwrap();
    assert_eq!(removed.points.len(), 3);
    book.remove(2).unwrap();

    let numbers: Vec<u32> = book.iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    let lens: Vec<usize> = book.iter().map(|s| s.points.len()).collect();
    assert_eq!(lens, vec![2, 4, 6]);
}

#[test]
fn removal_out_of_range_is_a_precondition_failure() {
    let mut book = StrokeBook::new();
    let err = book.remove(0).unwrap_err();
    assert!(err.to_string().contains("precondition failed"));
}

#[test]
fn from_strokes_renumbers_and_validates() {
    let mut book = StrokeBook::new();
    record(&mut book, 3, 0.0);
    record(&mut book, 3, 100.0);
    let mut strokes = book.as_slice().to_vec();
    strokes[0].number = 9;
    strokes[1].number = 4;
    let rebuilt = StrokeBook::from_strokes(strokes.clone()).unwrap();
    assert_eq!(
        rebuilt.iter().map(|s| s.number).collect::<Vec<_>>(),
        vec![1, 2]
    );

    strokes[1].points.truncate(1);
    assert!(StrokeBook::from_strokes(strokes).is_err());
}

#[test]
fn stroke_serializes_with_camel_case_fields() {
    let mut book = StrokeBook::new();
    record(&mut book, 2, 0.0);
    let v = serde_json::to_value(&book.as_slice()[0]).unwrap();
    assert_eq!(v["brushWidth"], 6.0);
    assert_eq!(v["color"], "#c80000");
    assert!(v.get("startTime").is_some());
    assert!(v.get("endTime").is_some());
}
