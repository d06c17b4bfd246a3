//! # Frame Pipeline Tests
//!
//! Drives whole frames: pointer input, interaction states, queued style edits,
//! theme reloads and the emitted draw commands.

use std::cell::RefCell;
use std::rc::Rc;

use trellis_ui::{
    Anchor, Color, Frame, InputEvent, InputState, Interaction, Label, LayoutKind, MouseButton, NotifyEvent,
    NotifyInfo, Prop, Rect, RenderCommand, Size, Style, StyleLayerKind, StyleProperty, TextMeasurer, Theme,
    UIRenderer, UiResult, WidgetId, WidgetTree,
};

struct Monospace;

impl TextMeasurer for Monospace {
    fn measure_text(&self, text: &str, font_size: f32) -> UiResult<Size> {
        Ok(Size::new(text.len() as f32 * font_size * 0.5, font_size))
    }
}

/// Root 100×100 with an absolute panel (10,10,60,60) holding a child (10,10,20,20).
fn nested() -> (WidgetTree, WidgetId, WidgetId) {
    let mut tree = WidgetTree::new(100.0, 100.0);
    let root = tree.root();
    let panel = tree.create(root, Frame).unwrap();
    tree.configure_size(panel, Some(60.0), Some(60.0)).unwrap();
    tree.place(panel, 10.0, 10.0).unwrap();
    let child = tree.create(panel, Frame).unwrap();
    tree.configure_size(child, Some(20.0), Some(20.0)).unwrap();
    tree.place(child, 10.0, 10.0).unwrap();
    (tree, panel, child)
}

fn move_to(input: &mut InputState, x: f32, y: f32) {
    input.apply(InputEvent::PointerMoved { x, y });
}

/// Non-resting widgets must form a single root-to-leaf path in one state.
fn assert_single_path(tree: &WidgetTree) {
    let engaged: Vec<_> = tree
        .iter_dfs()
        .filter(|&id| tree.interaction(id) != Some(Interaction::Normal))
        .collect();

    for &id in &engaged {
        if let Some(parent) = tree.parent(id) {
            assert!(engaged.contains(&parent), "{id:?} engaged without its parent");
            let engaged_siblings = tree
                .children(parent)
                .into_iter()
                .filter(|sibling| engaged.contains(sibling))
                .count();
            assert_eq!(engaged_siblings, 1);
        }
    }
    let states: Vec<_> = engaged.iter().filter_map(|&id| tree.interaction(id)).collect();
    assert!(states.windows(2).all(|pair| pair[0] == pair[1]));
}

/// Test: states follow the pointer with at most one engaged path.
#[test]
fn test_interaction_is_mutually_exclusive() {
    let (mut tree, panel, child) = nested();
    let mut input = InputState::new();
    let mut renderer = UIRenderer::new();

    let route = [(25.0, 25.0, false), (15.0, 15.0, false), (25.0, 25.0, true), (90.0, 90.0, true), (-5.0, 0.0, false)];
    for (x, y, pressed) in route {
        move_to(&mut input, x, y);
        if pressed {
            input.apply(InputEvent::ButtonDown(MouseButton::Left));
        } else {
            input.apply(InputEvent::ButtonUp(MouseButton::Left));
        }
        tree.run_frame(&input, &mut renderer).unwrap();
        assert_single_path(&tree);
    }

    move_to(&mut input, 25.0, 25.0);
    input.apply(InputEvent::ButtonDown(MouseButton::Left));
    let stats = tree.run_frame(&input, &mut renderer).unwrap();
    assert_eq!(stats.hit, Some(child));
    assert_eq!(tree.interaction(panel), Some(Interaction::Active));
    assert_eq!(tree.interaction(child), Some(Interaction::Active));

    let notes = tree.take_notifications();
    let pressed = notes
        .iter()
        .rev()
        .find(|n| n.widget == child && n.event == NotifyEvent::SetActive)
        .unwrap();
    assert_eq!(pressed.info, NotifyInfo::Pointer { x: 5.0, y: 5.0 });
}

/// Test: hover and active layers are applied exclusively.
#[test]
fn test_cascade_follows_interaction() {
    let (mut tree, _, child) = nested();
    tree.edit_style(child, StyleLayerKind::Base, |s| s.background_color = Prop::Value(Color::RED))
        .unwrap();
    tree.edit_style(child, StyleLayerKind::Active, |s| s.background_color = Prop::Value(Color::BLUE))
        .unwrap();

    let mut input = InputState::new();
    let mut renderer = UIRenderer::new();

    move_to(&mut input, 25.0, 25.0);
    let stats = tree.run_frame(&input, &mut renderer).unwrap();
    assert_eq!(stats.style_edits, 2);
    assert_eq!(tree.effective_style(child).unwrap().background_color, Color::RED);

    input.apply(InputEvent::ButtonDown(MouseButton::Left));
    tree.run_frame(&input, &mut renderer).unwrap();
    assert_eq!(tree.effective_style(child).unwrap().background_color, Color::BLUE);
    assert!(renderer.commands().contains(&RenderCommand::Rect {
        bounds: Rect::new(20.0, 20.0, 20.0, 20.0),
        color: Color::BLUE,
        radii: Default::default(),
    }));
}

/// Test: a margin edit is queued, then picked up by the next frame's layout.
#[test]
fn test_margin_edit_reenters_layout() {
    let mut tree = WidgetTree::new(100.0, 100.0);
    let root = tree.root();
    tree.set_layout(root, LayoutKind::Pack).unwrap();
    let bar = tree.create(root, Frame).unwrap();
    tree.configure_size(bar, Some(100.0), Some(10.0)).unwrap();
    tree.pack(bar, Anchor::Top).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    tree.observe_style(root, StyleLayerKind::Base, move |_, changed, _| {
        sink.borrow_mut().extend_from_slice(changed);
    })
    .unwrap();

    let input = InputState::new();
    let mut renderer = UIRenderer::new();
    tree.run_frame(&input, &mut renderer).unwrap();
    assert_eq!(tree.rect(bar).unwrap().y, 0.0);

    tree.edit_style(root, StyleLayerKind::Base, |s| s.margin = Prop::Value(5.0))
        .unwrap();
    assert_eq!(tree.pending_style_edits(), 1);
    assert_eq!(tree.rect(bar).unwrap().y, 0.0);

    let stats = tree.run_frame(&input, &mut renderer).unwrap();
    assert_eq!(stats.style_edits, 1);
    assert_eq!(*seen.borrow(), vec![StyleProperty::Margin]);
    assert!(tree.geometry_stale());
    assert!(tree
        .take_notifications()
        .iter()
        .any(|n| n.info == NotifyInfo::Property(StyleProperty::Margin)));

    let stats = tree.run_frame(&input, &mut renderer).unwrap();
    assert!(stats.refreshed_before_hit);
    assert_eq!(tree.rect(bar).unwrap().y, 5.0);
}

/// Test: reloading the theme notifies every widget and feeds layout.
#[test]
fn test_theme_reload() {
    let mut tree = WidgetTree::new(200.0, 200.0);
    tree.set_text_measurer(Monospace);
    let root = tree.root();
    let panel = tree.create(root, Frame).unwrap();
    tree.set_layout(panel, LayoutKind::Pack).unwrap();
    tree.place(panel, 0.0, 0.0).unwrap();
    let label = tree.create(panel, Label::new("hello")).unwrap();
    tree.pack(label, Anchor::Left).unwrap();

    let input = InputState::new();
    let mut renderer = UIRenderer::new();
    tree.run_frame(&input, &mut renderer).unwrap();
    assert_eq!(tree.size(panel), Some(Size::new(35.0, 14.0)));
    tree.take_notifications();

    let slate = Theme::from_toml_str(include_str!("../../../data/themes/slate.toml")).unwrap();
    tree.reload_theme(slate).unwrap();

    let reloaded: Vec<_> = tree
        .take_notifications()
        .into_iter()
        .filter(|n| n.event == NotifyEvent::ThemeReload)
        .map(|n| n.widget)
        .collect();
    assert_eq!(reloaded, vec![root, panel, label]);

    tree.run_frame(&input, &mut renderer).unwrap();
    // slate frames carry a 4px margin
    assert_eq!(tree.size(panel), Some(Size::new(43.0, 22.0)));
    assert_eq!(tree.rect(label).unwrap().x, 4.0);

    let text = renderer
        .commands()
        .iter()
        .find_map(|c| match c {
            RenderCommand::Text { text, font_size, .. } => Some((text.clone(), *font_size)),
            _ => None,
        })
        .unwrap();
    assert_eq!(text, ("hello".to_string(), 14.0));
}

/// Test: a style given at creation is the base layer.
#[test]
fn test_initial_style_is_base_layer() {
    let mut tree = WidgetTree::new(50.0, 50.0);
    let root = tree.root();
    let style = Style {
        border_width: Prop::Value(2.0),
        border_color: Prop::Value(Color::RED),
        ..Style::default()
    };
    let boxed = tree.create_with_style(root, Frame, style).unwrap();
    tree.configure_size(boxed, Some(10.0), Some(10.0)).unwrap();
    tree.place(boxed, 0.0, 0.0).unwrap();

    let mut renderer = UIRenderer::new();
    tree.run_frame(&InputState::new(), &mut renderer).unwrap();

    assert!(renderer
        .commands()
        .iter()
        .any(|c| matches!(c, RenderCommand::RectOutline { width, color, .. } if *width == 2.0 && *color == Color::RED)));
}
