use super::*;
use crate::input::recorder::TimedPoint;
use crate::render::freehand::Brush;
use crate::render::surface::Raster;

fn stroke(number: u32, n: usize, y: f64, color: Rgba8) -> Stroke {
    Stroke {
        number,
        points: (0..n)
            .map(|i| TimedPoint {
                x: 4.0 + i as f64 * 4.0,
                y,
                timestamp: i as f64 * 10.0,
            })
            .collect(),
        color,
        brush_width: 3.0,
        start_time: 0.0,
        end_time: n as f64 * 10.0,
    }
}

fn params(k: usize, pause: u64, hold: u64, interval: u64) -> SynthParams {
    SynthParams {
        points_per_frame: k,
        pause_ms: pause,
        hold_ms: hold,
        frame_interval_ms: interval,
    }
}

fn canvas() -> Canvas {
    Canvas::new(64, 48).unwrap()
}

/// Records every polyline; snapshots encode the number of draw calls so far.
struct TraceSurface {
    paths: Vec<Vec<Point>>,
    fills: usize,
}

impl RasterSurface for TraceSurface {
    fn canvas(&self) -> Canvas {
        Canvas::new(2, 2).unwrap()
    }

    fn fill(&mut self, _color: Rgba8) {
        self.fills += 1;
    }

    fn stroke_polyline(&mut self, points: &[Point], _brush: &Brush) -> SketchResult<()> {
        self.paths.push(points.to_vec());
        Ok(())
    }

    fn snapshot(&self) -> Raster {
        let tag = self.paths.len() as u8;
        Raster::filled(self.canvas(), Rgba8::opaque(tag, 0, 0))
    }

    fn restore(&mut self, _raster: &Raster) -> SketchResult<()> {
        Ok(())
    }
}

#[test]
fn worked_example_frame_count() {
    let strokes = vec![
        stroke(1, 10, 10.0, Rgba8::BLACK),
        stroke(2, 10, 30.0, Rgba8::opaque(255, 0, 0)),
    ];
    let p = params(5, 200, 800, 100);
    assert_eq!(predicted_frame_count(&strokes, &p), 15);
    let frames = synthesize(canvas(), &strokes, &p).unwrap();
    assert_eq!(frames.len(), 15);
}

#[test]
fn frame_count_matches_prediction_across_parameters() {
    let strokes = vec![
        stroke(1, 7, 10.0, Rgba8::BLACK),
        stroke(2, 3, 20.0, Rgba8::BLACK),
        stroke(3, 12, 30.0, Rgba8::BLACK),
    ];
    for k in [1, 2, 5, 50] {
        for (pause, hold, interval) in [(0, 0, 100), (150, 1000, 100), (99, 1, 33)] {
            let p = params(k, pause, hold, interval);
            let mut surface = TraceSurface {
                paths: Vec::new(),
                fills: 0,
            };
            let frames = synthesize_on(&mut surface, &strokes, &p).unwrap();
            let chunks: u64 = strokes
                .iter()
                .map(|s| (s.points.len() as u64).div_ceil(k as u64))
                .sum();
            let lower = 1 + chunks + 2 * pause.div_ceil(interval) + hold.div_ceil(interval);
            assert_eq!(frames.len() as u64, lower, "k={k} pause={pause}");
            assert_eq!(predicted_frame_count(&strokes, &p), lower);
        }
    }
}

#[test]
fn chunks_continue_from_previous_chunk_end() {
    let strokes = vec![stroke(1, 10, 5.0, Rgba8::BLACK)];
    let mut surface = TraceSurface {
        paths: Vec::new(),
        fills: 0,
    };
    synthesize_on(&mut surface, &strokes, &params(4, 0, 0, 100)).unwrap();

    let pts: Vec<Point> = strokes[0].points.iter().map(|p| p.point()).collect();
    assert_eq!(surface.fills, 1);
    assert_eq!(surface.paths.len(), 3);
    assert_eq!(surface.paths[0], pts[0..4].to_vec());
    assert_eq!(surface.paths[1], pts[3..8].to_vec());
    assert_eq!(surface.paths[2], pts[7..10].to_vec());
}

#[test]
fn each_stroke_starts_at_its_own_first_point() {
    let strokes = vec![
        stroke(1, 3, 5.0, Rgba8::BLACK),
        stroke(2, 3, 25.0, Rgba8::BLACK),
    ];
    let mut surface = TraceSurface {
        paths: Vec::new(),
        fills: 0,
    };
    synthesize_on(&mut surface, &strokes, &params(2, 0, 0, 100)).unwrap();
    assert_eq!(surface.paths.len(), 4);
    assert_eq!(surface.paths[2][0], strokes[1].points[0].point());
    assert_eq!(surface.paths[2].len(), 2);
}

#[test]
fn oversized_step_yields_one_chunk_per_stroke() {
    let strokes = vec![stroke(1, 6, 5.0, Rgba8::BLACK)];
    let mut surface = TraceSurface {
        paths: Vec::new(),
        fills: 0,
    };
    let frames = synthesize_on(&mut surface, &strokes, &params(100, 0, 0, 100)).unwrap();
    assert_eq!(surface.paths.len(), 1);
    assert_eq!(surface.paths[0].len(), 6);
    assert_eq!(frames.len(), 2);
}

#[test]
fn pause_and_hold_repeat_the_latest_frame() {
    let strokes = vec![
        stroke(1, 2, 5.0, Rgba8::BLACK),
        stroke(2, 2, 25.0, Rgba8::BLACK),
    ];
    let mut surface = TraceSurface {
        paths: Vec::new(),
        fills: 0,
    };
    let frames = synthesize_on(&mut surface, &strokes, &params(2, 250, 100, 100)).unwrap();
    // blank, s1, pause x3, s2, hold x1
    let tags: Vec<u8> = frames
        .iter()
        .map(|f| f.decode().unwrap().data[0])
        .collect();
    assert_eq!(tags, vec![0, 1, 1, 1, 1, 2, 2]);
}

#[test]
fn synthesis_is_deterministic() {
    let strokes = vec![
        stroke(1, 9, 10.0, Rgba8::opaque(0, 0, 255)),
        stroke(2, 5, 30.0, Rgba8::opaque(0, 128, 0)),
    ];
    let p = params(3, 120, 300, 100);
    let a = synthesize(canvas(), &strokes, &p).unwrap();
    let b = synthesize(canvas(), &strokes, &p).unwrap();
    assert_eq!(a.len(), b.len());
    assert_eq!(a.last().unwrap().png(), b.last().unwrap().png());
    assert_eq!(
        a.iter().map(Frame::fingerprint).collect::<Vec<_>>(),
        b.iter().map(Frame::fingerprint).collect::<Vec<_>>()
    );
}

#[test]
fn strokes_compose_additively() {
    let strokes = vec![
        stroke(1, 8, 10.0, Rgba8::BLACK),
        stroke(2, 8, 30.0, Rgba8::BLACK),
    ];
    let frames = synthesize(canvas(), &strokes, &params(8, 0, 0, 100)).unwrap();
    let first = frames[0].decode().unwrap();
    assert!(first.data.iter().all(|&b| b == 255));

    let last = frames.last().unwrap().decode().unwrap();
    assert!(last.pixel(16, 10).unwrap()[0] < 64);
    assert!(last.pixel(16, 30).unwrap()[0] < 64);
}

#[test]
fn rejects_empty_input_and_bad_parameters() {
    let err = synthesize(canvas(), &[], &params(3, 0, 0, 100)).unwrap_err();
    assert!(err.to_string().contains("precondition failed"));

    let strokes = vec![stroke(1, 4, 5.0, Rgba8::BLACK)];
    assert!(synthesize(canvas(), &strokes, &params(0, 0, 0, 100)).is_err());
    assert!(synthesize(canvas(), &strokes, &params(2, 0, 0, 0)).is_err());
}

#[test]
fn huge_pacing_saturates_instead_of_overflowing() {
    let strokes = vec![
        stroke(1, 4, 5.0, Rgba8::BLACK),
        stroke(2, 4, 9.0, Rgba8::BLACK),
    ];
    let p = params(1, u64::MAX, u64::MAX, 1);
    assert_eq!(predicted_frame_count(&strokes, &p), u64::MAX);
    assert!(p.validate().is_err());
    assert!(params(1, 0, 1 << 60, 1).validate().is_err());

    let err = synthesize(canvas(), &strokes, &params(1, 0, 1 << 60, 1)).unwrap_err();
    assert!(matches!(err, SketchError::Validation(_)));
}

#[test]
fn runs_over_the_frame_limit_are_rejected_before_drawing() {
    let strokes = vec![
        stroke(1, 4, 5.0, Rgba8::BLACK),
        stroke(2, 4, 9.0, Rgba8::BLACK),
        stroke(3, 4, 13.0, Rgba8::BLACK),
    ];
    // Each pause is within bounds; together they are not.
    let p = params(1, 60_000, 0, 1);
    p.validate().unwrap();
    assert!(predicted_frame_count(&strokes, &p) > MAX_SYNTH_FRAMES);

    let mut surface = TraceSurface {
        paths: Vec::new(),
        fills: 0,
    };
    let err = synthesize_on(&mut surface, &strokes, &p).unwrap_err();
    assert!(err.to_string().contains("limit"));
    assert_eq!(surface.fills, 0);
    assert!(surface.paths.is_empty());
}
