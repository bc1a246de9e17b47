//! Notification handling: coalescing, deferred resizes, enable/disable and
//! font changes

mod common;

use std::rc::Rc;

use common::*;
use line_gutter::commands::Cmd;
use line_gutter::error::GutterError;
use line_gutter::font::{FontHandle, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE_PT};
use line_gutter::gutter::{GutterOptions, GutterWidget};
use line_gutter::model::TextView;
use line_gutter::schedule::{RepaintState, MAX_SELF_CORRECTIONS};
use line_gutter::theme::{Color, GutterPalette};
use line_gutter::view::{Rect, Size};

// ========================================================================
// Construction
// ========================================================================

#[test]
fn test_create_without_editor_fails() {
    let result = GutterWidget::<TextView, _>::create(None, FixedAdvance(7.0), true, None, 12);
    assert!(matches!(result, Err(GutterError::InvalidArgument(_))));
}

#[test]
fn test_create_falls_back_to_default_font() {
    let editor = test_view("abc");
    for (family, size) in [(Some(""), 12), (None, 12), (Some("Mono"), 1), (Some("Mono"), 0)] {
        let gutter =
            GutterWidget::create(Some(Rc::clone(&editor)), FixedAdvance(7.0), true, family, size)
                .unwrap();
        assert_eq!(gutter.font().family(), DEFAULT_FONT_FAMILY);
        assert_eq!(gutter.font().size_pt(), DEFAULT_FONT_SIZE_PT);
    }
}

#[test]
fn test_enabled_gutter_subscribes_to_every_channel() {
    let editor = test_view("abc");
    let gutter = test_gutter(&editor);
    assert_eq!(editor.borrow().listener_count(), 3);
    assert_eq!(gutter.margin_width(), 26);
    assert_eq!(gutter.preferred_size(), Size::new(26, LINE_HEIGHT));
    assert_eq!(gutter.repaint_state(), RepaintState::Idle);
}

#[test]
fn test_disabled_gutter_does_not_subscribe() {
    let editor = test_view("abc");
    let gutter =
        GutterWidget::create(Some(Rc::clone(&editor)), FixedAdvance(7.0), false, None, 12).unwrap();
    assert_eq!(editor.borrow().listener_count(), 0);
    assert!(!gutter.is_enabled());
    assert_eq!(gutter.preferred_width(), 0);
}

// ========================================================================
// Coalescing
// ========================================================================

#[test]
fn test_document_edits_coalesce_into_one_redraw() {
    let editor = test_view("abc");
    let mut gutter = test_gutter(&editor);

    for _ in 0..10 {
        let end = editor.borrow().len_chars();
        editor.borrow_mut().insert(end, "\nmore").unwrap();
    }

    assert_eq!(gutter.repaint_state(), RepaintState::RepaintScheduled);
    assert_eq!(gutter.on_idle(), Cmd::Redraw);
    assert_eq!(gutter.coalesced_repaints(), 9);
    assert_eq!(gutter.on_idle(), Cmd::None);
    assert_eq!(gutter.repaint_state(), RepaintState::Idle);
}

#[test]
fn test_caret_move_requests_resize_and_redraw() {
    let editor = test_view(&numbered_text(3));
    let mut gutter = test_gutter(&editor);

    editor.borrow_mut().set_caret(4).unwrap();

    assert_eq!(
        gutter.on_idle(),
        Cmd::Batch(vec![Cmd::Resize(Size::new(26, 3 * LINE_HEIGHT)), Cmd::Redraw])
    );
    assert_eq!(gutter.on_idle(), Cmd::None);
}

#[test]
fn test_resize_picks_up_new_host_height() {
    let editor = test_view("abcdefghij");
    let mut gutter = test_gutter(&editor);
    assert_eq!(gutter.preferred_height(), LINE_HEIGHT);

    editor.borrow_mut().set_wrap(Some(4));

    let cmd = gutter.on_idle();
    assert_eq!(cmd.resize(), Some(Size::new(26, 3 * LINE_HEIGHT)));
    assert!(cmd.needs_redraw());
    assert_eq!(gutter.preferred_height(), 3 * LINE_HEIGHT);
}

#[test]
fn test_hidden_does_nothing_and_shown_resizes() {
    let editor = test_view("abc");
    let mut gutter = test_gutter(&editor);

    editor.borrow_mut().set_visible(false);
    assert_eq!(gutter.repaint_state(), RepaintState::Idle);
    assert_eq!(gutter.on_idle(), Cmd::None);

    editor.borrow_mut().set_visible(true);
    let cmd = gutter.on_idle();
    assert!(cmd.resize().is_some());
    assert!(cmd.needs_redraw());
}

#[test]
fn test_move_resizes() {
    let editor = test_view("abc");
    let mut gutter = test_gutter(&editor);

    editor.borrow_mut().move_to();
    assert!(gutter.on_idle().resize().is_some());
}

#[test]
fn test_palette_change_schedules_repaint() {
    let editor = test_view("abc");
    let mut gutter = test_gutter(&editor);

    gutter.set_palette(GutterPalette::classic());
    assert_eq!(gutter.on_idle(), Cmd::None);

    let dark = GutterPalette {
        background: Color::rgb(0x1E, 0x1E, 0x1E),
        line_number: Color::rgb(0x85, 0x85, 0x85),
        current_line_number: Color::rgb(0xC6, 0xC6, 0xC6),
    };
    gutter.set_palette(dark);
    assert_eq!(gutter.on_idle(), Cmd::Redraw);
    assert_eq!(gutter.palette(), &dark);
}

// ========================================================================
// Enable / disable
// ========================================================================

#[test]
fn test_disabled_gutter_ignores_notifications() {
    let editor = test_view(&numbered_text(3));
    let mut gutter = test_gutter(&editor);

    gutter.set_enabled(false).unwrap();
    assert_eq!(
        gutter.on_idle(),
        Cmd::Batch(vec![Cmd::Resize(Size::new(0, 3 * LINE_HEIGHT)), Cmd::Redraw])
    );

    editor.borrow_mut().insert(0, "x").unwrap();
    editor.borrow_mut().set_caret(2).unwrap();
    assert_eq!(gutter.repaint_state(), RepaintState::Idle);
    assert_eq!(gutter.on_idle(), Cmd::None);

    let mut canvas = RecordingCanvas::new();
    assert_eq!(gutter.render(&mut canvas, full_clip(&editor, 26)), Cmd::None);
    assert!(canvas.ops.is_empty());
}

#[test]
fn test_enable_round_trip_restores_baseline() {
    let editor = test_view(&numbered_text(1200));
    let mut gutter = test_gutter(&editor);
    let baseline = gutter.margin_width();

    let mut canvas = RecordingCanvas::new();
    gutter.render(&mut canvas, full_clip(&editor, baseline));
    assert_eq!(gutter.margin_width(), 34);

    gutter.set_enabled(false).unwrap();
    assert_eq!(gutter.margin_width(), 0);
    assert_eq!(gutter.preferred_width(), 0);

    gutter.set_enabled(true).unwrap();
    assert!(gutter.is_enabled());
    assert_eq!(gutter.margin_width(), baseline);
    assert_eq!(gutter.preferred_width(), baseline);
    // Subscriptions are reused, not duplicated
    assert_eq!(editor.borrow().listener_count(), 3);

    // Notifications flow again
    gutter.on_idle();
    editor.borrow_mut().set_caret(1).unwrap();
    assert!(gutter.on_idle().needs_redraw());
}

#[test]
fn test_enabling_late_subscribes_once() {
    let editor = test_view("abc");
    let mut gutter =
        GutterWidget::create(Some(Rc::clone(&editor)), FixedAdvance(7.0), false, Some("Mono"), 12)
            .unwrap();

    gutter.set_enabled(true).unwrap();
    gutter.set_enabled(false).unwrap();
    gutter.set_enabled(true).unwrap();

    assert_eq!(editor.borrow().listener_count(), 3);
    assert_eq!(gutter.margin_width(), 26);
}

// ========================================================================
// Fonts
// ========================================================================

#[test]
fn test_font_handle_reused_when_unchanged() {
    let editor = test_view("abc");
    let mut gutter = test_gutter(&editor);
    let before: FontHandle = gutter.font().clone();

    gutter.set_font("Mono", 12);
    assert!(FontHandle::ptr_eq(&before, gutter.font()));

    let mut canvas = RecordingCanvas::new();
    gutter.render(&mut canvas, full_clip(&editor, 26));
    assert!(FontHandle::ptr_eq(&before, gutter.font()));

    gutter.set_font("Mono", 16);
    assert!(!FontHandle::ptr_eq(&before, gutter.font()));
    assert_eq!(gutter.font().size_pt(), 16);

    gutter.set_font("", 0);
    assert_eq!(gutter.font().family(), DEFAULT_FONT_FAMILY);
    assert_eq!(gutter.font().size_pt(), DEFAULT_FONT_SIZE_PT);
}

#[test]
fn test_font_change_resizes_on_next_paint() {
    let editor = test_view(&numbered_text(3));
    let mut gutter =
        GutterWidget::with_options(Some(Rc::clone(&editor)), SizeProportional, test_options())
            .unwrap();
    // 3 digits * 6px * 1.2
    assert_eq!(gutter.margin_width(), 22);

    gutter.set_font("Mono", 20);
    let idle = gutter.on_idle();
    assert!(idle.needs_redraw());

    let mut canvas = RecordingCanvas::new();
    // 3 digits * 10px * 1.2
    assert_eq!(
        gutter.render(&mut canvas, full_clip(&editor, 22)),
        Cmd::Resize(Size::new(36, 3 * LINE_HEIGHT))
    );
    for op in &canvas.ops {
        if let CanvasOp::Text { spec, .. } = op {
            assert_eq!(spec.size_pt, 20);
        }
    }
}

// ========================================================================
// Oscillation guard
// ========================================================================

#[test]
fn test_alternating_metrics_stop_repainting() {
    let editor = test_view(&numbered_text(5));
    let mut gutter = GutterWidget::with_options(
        Some(Rc::clone(&editor)),
        AlternatingAdvance::default(),
        GutterOptions {
            antialias: true,
            ..test_options()
        },
    )
    .unwrap();
    let clip = full_clip(&editor, 40);

    let mut passes = 0;
    let mut resizes = 0;
    loop {
        passes += 1;
        let mut canvas = RecordingCanvas::new();
        if gutter.render(&mut canvas, clip).resize().is_some() {
            resizes += 1;
        }
        if !gutter.on_idle().needs_redraw() {
            break;
        }
        assert!(passes < 10, "repaints never settled");
    }

    let expected = 1 + usize::from(MAX_SELF_CORRECTIONS);
    assert_eq!(passes, expected);
    // Every pass still reports the width it ended with
    assert_eq!(resizes, expected);
    assert_eq!(gutter.repaint_state(), RepaintState::Idle);
}

#[test]
fn test_external_notification_renews_correction_budget() {
    let editor = test_view(&numbered_text(5));
    let mut gutter = GutterWidget::with_options(
        Some(Rc::clone(&editor)),
        AlternatingAdvance::default(),
        test_options(),
    )
    .unwrap();
    let clip = full_clip(&editor, 40);

    for _ in 0..=MAX_SELF_CORRECTIONS {
        let mut canvas = RecordingCanvas::new();
        gutter.render(&mut canvas, clip);
        gutter.on_idle();
    }
    assert_eq!(gutter.repaint_state(), RepaintState::Idle);

    editor.borrow_mut().set_caret(3).unwrap();
    gutter.on_idle();
    let mut canvas = RecordingCanvas::new();
    gutter.render(&mut canvas, clip);
    assert_eq!(gutter.repaint_state(), RepaintState::RepaintScheduled);
}

#[test]
fn test_host_relayout_after_resize_settles() {
    // The host rewraps whenever the gutter's width changes: a wider gutter
    // leaves 9 columns for text, pushing line 1 onto a second row and line
    // 1000 out of the clip, which makes the gutter want to narrow again.
    let text = format!("abcdefghij\n{}", numbered_text(1000).split_once('\n').unwrap().1);
    let editor = TextView::new(&text).with_wrap(Some(10)).into_shared();
    let mut gutter = test_gutter(&editor);
    let clip = Rect::new(0, 0, 40, 999 * LINE_HEIGHT);

    let relayout = |cmd: &Cmd| {
        if let Some(size) = cmd.resize() {
            let wrap = if size.width > 26 { 9 } else { 10 };
            editor.borrow_mut().set_wrap(Some(wrap));
        }
    };

    let mut passes = 0;
    loop {
        passes += 1;
        assert!(passes <= 10, "repaint loop never settled");
        let mut canvas = RecordingCanvas::new();
        relayout(&gutter.render(&mut canvas, clip));
        let idle = gutter.on_idle();
        relayout(&idle);
        if !idle.needs_redraw() {
            break;
        }
    }

    assert_eq!(passes, 2 + usize::from(MAX_SELF_CORRECTIONS));
    // Settles on the wider width, which fits every label either layout shows
    assert_eq!(gutter.margin_width(), 34);
    assert_eq!(editor.borrow().wrap_columns(), Some(9));
    assert_eq!(gutter.repaint_state(), RepaintState::Idle);

    // Further repaints keep the width
    let mut canvas = RecordingCanvas::new();
    assert_eq!(gutter.render(&mut canvas, clip), Cmd::None);

    // A caret move renews the budget, so the gutter may narrow again
    editor.borrow_mut().set_caret(1).unwrap();
    gutter.on_idle();
    let mut canvas = RecordingCanvas::new();
    assert_eq!(
        gutter.render(&mut canvas, clip).resize().map(|size| size.width),
        Some(26)
    );
}
