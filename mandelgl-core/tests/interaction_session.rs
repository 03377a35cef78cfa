use mandelgl_core::{
    frame_uniforms, step, visible_half_extents, Canvas, Complex, Gestures, InputEvent, Key,
    PointerButton, TouchPoint, ViewSettings, ViewportState,
};

fn canvas() -> Canvas {
    Canvas::new(1280.0, 720.0, 1.0)
}

/// Run easing until it reports settled.
fn settle(state: &mut ViewportState, settings: &ViewSettings) {
    for _ in 0..2000 {
        if !step(state, settings).animating {
            return;
        }
    }
    panic!("view never settled");
}

fn feed(gestures: &Gestures, state: &mut ViewportState, canvas: &Canvas, events: &[InputEvent]) {
    for event in events {
        gestures.handle(state, canvas, event);
    }
}

#[test]
fn wheel_zoom_keeps_cursor_point_after_easing() {
    let settings = ViewSettings::default();
    let gestures = Gestures::new(settings.clone());
    let canvas = canvas();
    let mut state = ViewportState::new(&settings);
    let (x, y) = (1000.0, 200.0);
    let before = state
        .current_view()
        .to_complex_plane(x, y, &canvas, settings.scale_per_zoom)
        .unwrap();

    for _ in 0..3 {
        gestures.handle(
            &mut state,
            &canvas,
            &InputEvent::Wheel {
                x,
                y,
                delta_y: -100.0,
            },
        );
    }
    settle(&mut state, &settings);

    let after = state
        .current_view()
        .to_complex_plane(x, y, &canvas, settings.scale_per_zoom)
        .unwrap();
    // Residual is bounded by the easing tolerance, measured in view heights.
    let half = visible_half_extents(state.zoom, 1.0, settings.scale_per_zoom);
    assert!(
        before.distance(after) < half.im * 0.01,
        "cursor point drifted: {before} -> {after}"
    );
}

#[test]
fn repeated_wheel_in_shrinks_visible_extent() {
    let settings = ViewSettings::default();
    let gestures = Gestures::new(settings.clone());
    let canvas = canvas();
    let mut state = ViewportState::new(&settings);

    let mut previous = visible_half_extents(state.target_zoom, canvas.aspect(), 1.5);
    for _ in 0..10 {
        gestures.handle(
            &mut state,
            &canvas,
            &InputEvent::Wheel {
                x: 640.0,
                y: 360.0,
                delta_y: -40.0,
            },
        );
        let half = visible_half_extents(state.target_zoom, canvas.aspect(), 1.5);
        assert!(half.re < previous.re && half.im < previous.im);
        previous = half;
    }
}

#[test]
fn drag_session_moves_content_with_pointer() {
    let settings = ViewSettings::default();
    let gestures = Gestures::new(settings.clone());
    let canvas = canvas();
    let mut state = ViewportState::new(&settings);

    feed(
        &gestures,
        &mut state,
        &canvas,
        &[
            InputEvent::PointerMoved {
                x: 500.0,
                y: 300.0,
                movement_x: 0.0,
                movement_y: 0.0,
                primary_down: true,
            },
            InputEvent::PointerMoved {
                x: 500.0,
                y: 340.0,
                movement_x: 0.0,
                movement_y: 40.0,
                primary_down: true,
            },
        ],
    );
    assert!(state.target_center.im > 0.0, "screen-down drag raises the center");
    assert_eq!(state.center, Complex::new(-0.5, 0.0), "drag is eased, not applied");

    settle(&mut state, &settings);
    assert!(state.center.im > 0.0);
}

#[test]
fn touch_gesture_does_not_reuse_stale_distance() {
    let settings = ViewSettings::default();
    let gestures = Gestures::new(settings.clone());
    let canvas = canvas();
    let mut state = ViewportState::new(&settings);

    feed(
        &gestures,
        &mut state,
        &canvas,
        &[
            InputEvent::TouchStart(vec![
                TouchPoint::new(1, 100.0, 100.0),
                TouchPoint::new(2, 200.0, 100.0),
            ]),
            InputEvent::TouchMove(vec![
                TouchPoint::new(1, 90.0, 100.0),
                TouchPoint::new(2, 210.0, 100.0),
            ]),
            InputEvent::TouchEnd(vec![]),
        ],
    );
    assert_eq!(state.touch.prev_distance, None);
    assert_eq!(state.touch.prev_position, None);

    let zoom_after_pinch = state.zoom;
    feed(
        &gestures,
        &mut state,
        &canvas,
        &[
            InputEvent::TouchStart(vec![TouchPoint::new(3, 400.0, 400.0)]),
            InputEvent::TouchMove(vec![TouchPoint::new(3, 400.0, 400.0)]),
        ],
    );
    assert_eq!(state.touch.prev_distance, None);
    assert_eq!(state.zoom, zoom_after_pinch);
}

#[test]
fn recenter_then_pointer_sync() {
    let settings = ViewSettings::default();
    let gestures = Gestures::new(settings.clone());
    let canvas = canvas();
    let mut state = ViewportState::new(&settings);

    feed(
        &gestures,
        &mut state,
        &canvas,
        &[
            InputEvent::KeyDown(Key::Control),
            InputEvent::PointerPressed {
                x: 0.0,
                y: 0.0,
                button: PointerButton::Primary,
            },
            InputEvent::KeyUp(Key::Control),
        ],
    );
    let target = state.target_center;
    assert!(target.re < -0.5 && target.im > 0.0);

    settle(&mut state, &settings);
    let outcome = gestures.handle(
        &mut state,
        &canvas,
        &InputEvent::PointerMoved {
            x: 640.0,
            y: 360.0,
            movement_x: 1.0,
            movement_y: 0.0,
            primary_down: false,
        },
    );
    assert!(outcome.julia_changed);
    assert!(state.julia_constant.distance(state.center) < 1e-12);

    let frame = frame_uniforms(&state, &canvas, &Canvas::new(256.0, 256.0, 1.0), &settings);
    let julia = frame.julia.unwrap();
    assert_eq!(julia.julia_constant, state.julia_constant);
    assert_eq!(julia.cursor_position, state.julia_constant);
}

#[test]
fn resize_is_read_fresh() {
    let settings = ViewSettings::default();
    let mut state = ViewportState::new(&settings);
    state.zoom = 1.0;
    let wide = frame_uniforms(&state, &Canvas::new(1600.0, 800.0, 1.0), &canvas(), &settings);
    let tall = frame_uniforms(&state, &Canvas::new(800.0, 1600.0, 1.0), &canvas(), &settings);
    let (wide, tall) = (wide.mandelbrot.unwrap(), tall.mandelbrot.unwrap());
    assert!((wide.half_extents.re / tall.half_extents.re - 4.0).abs() < 1e-12);
    assert_eq!(wide.half_extents.im, tall.half_extents.im);
}

#[test]
fn keyboard_zoom_eases_in() {
    let settings = ViewSettings::default();
    let gestures = Gestures::new(settings.clone());
    let canvas = canvas();
    let mut state = ViewportState::new(&settings);
    for _ in 0..5 {
        gestures.handle(&mut state, &canvas, &InputEvent::KeyDown(Key::Char('e')));
    }
    assert!((state.target_zoom - 1.0).abs() < 1e-12);
    step(&mut state, &settings);
    assert!(state.zoom > 0.0 && state.zoom < 1.0);

    gestures.handle(&mut state, &canvas, &InputEvent::KeyDown(Key::Char('r')));
    settle(&mut state, &settings);
    assert!(state.zoom.abs() <= settings.zoom_epsilon);
}

#[test]
fn long_zoom_out_stays_finite_and_resets() {
    let settings = ViewSettings::default();
    let gestures = Gestures::new(settings.clone());
    let canvas = canvas();
    let mut state = ViewportState::new(&settings);

    for _ in 0..2000 {
        gestures.handle(
            &mut state,
            &canvas,
            &InputEvent::Wheel {
                x: 700.0,
                y: 100.0,
                delta_y: 500.0,
            },
        );
        step(&mut state, &settings);
    }
    assert!(state.zoom >= settings.min_zoom);
    assert!(state.center.is_finite(), "center after zoom-out: {}", state.center);
    assert!(state.target_center.is_finite());

    gestures.handle(&mut state, &canvas, &InputEvent::KeyDown(Key::Char('r')));
    settle(&mut state, &settings);
    assert!(state.center.is_finite());
    assert!(state.center.distance(settings.initial_center) < 1e-2);
    assert!((state.zoom - settings.initial_zoom).abs() <= settings.zoom_epsilon);
}
