use super::*;

fn viewport() -> Viewport {
    Viewport {
        origin: Point::new(100.0, 50.0),
        displayed: Vec2::new(400.0, 300.0),
        backing: Canvas::new(800, 600).unwrap(),
    }
}

#[test]
fn mouse_coordinates_scale_from_css_to_backing_pixels() {
    let p = viewport().map(&PointerInput::mouse(300.0, 200.0)).unwrap();
    assert_eq!(p, Point::new(400.0, 300.0));
}

#[test]
fn touch_uses_primary_touch_point() {
    let mut input = PointerInput::touch(100.0, 50.0);
    if let PointerInput::Touch { touches } = &mut input {
        touches.push(Point::new(500.0, 350.0));
    }
    assert_eq!(viewport().map(&input), Some(Point::new(0.0, 0.0)));
}

#[test]
fn axes_scale_independently() {
    let vp = Viewport {
        origin: Point::ORIGIN,
        displayed: Vec2::new(100.0, 400.0),
        backing: Canvas::new(200, 200).unwrap(),
    };
    assert_eq!(
        vp.map(&PointerInput::mouse(10.0, 40.0)),
        Some(Point::new(20.0, 20.0))
    );
}

#[test]
fn empty_touch_list_maps_to_none() {
    let input = PointerInput::Touch {
        touches: SmallVec::new(),
    };
    assert_eq!(viewport().map(&input), None);
}

#[test]
fn collapsed_display_falls_back_to_unit_scale() {
    let vp = Viewport {
        origin: Point::ORIGIN,
        displayed: Vec2::new(0.0, 0.0),
        backing: Canvas::new(200, 200).unwrap(),
    };
    assert_eq!(
        vp.map(&PointerInput::mouse(3.0, 4.0)),
        Some(Point::new(3.0, 4.0))
    );
}

#[test]
fn identity_viewport_is_passthrough() {
    let vp = Viewport::identity(Canvas::new(64, 32).unwrap());
    assert_eq!(
        vp.map(&PointerInput::mouse(7.5, 9.0)),
        Some(Point::new(7.5, 9.0))
    );
}
