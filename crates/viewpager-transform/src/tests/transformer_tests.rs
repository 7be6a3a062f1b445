use super::*;

const PAGE: PageSize = PageSize::new(400.0, 800.0);

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

fn transformer(kind: TransformerKind, horizontal: bool) -> PageTransformer {
    PageTransformer::new(TransformerConfig::new(kind), horizontal)
}

fn apply(transformer: &mut PageTransformer, position: f32) -> PageTransform {
    let mut page = PageTransform::IDENTITY;
    transformer.transform_page(1, &mut page, PAGE, position);
    page
}

#[test]
fn card_scales_neighbours_around_moving_pivot() {
    let mut card = transformer(TransformerKind::Card, true);

    let selected = apply(&mut card, 0.0);
    assert_close(selected.scale, 1.0);
    assert_eq!(selected.pivot, Some(Pivot { x: 200.0, y: 400.0 }));

    let half = apply(&mut card, 0.5);
    assert_close(half.scale, 0.925);
    assert_close(half.pivot.unwrap().x, 100.0);

    let far_left = apply(&mut card, -2.0);
    assert_close(far_left.scale, 0.85);
    assert_close(far_left.pivot.unwrap().x, 400.0);

    let far_right = apply(&mut card, 3.0);
    assert_close(far_right.pivot.unwrap().x, 0.0);
    assert_close(far_right.alpha, 1.0);
}

#[test]
fn card_vertical_moves_pivot_on_y() {
    let mut card = transformer(TransformerKind::Card, false);
    let page = apply(&mut card, -1.0);
    let pivot = page.pivot.unwrap();
    assert_close(pivot.x, 200.0);
    assert_close(pivot.y, 800.0);
}

#[test]
fn card_fades_and_translates_with_padding() {
    let config = TransformerConfig::new(TransformerKind::Card)
        .with_min_alpha(0.4)
        .with_padding(60.0);
    let mut card = PageTransformer::new(config, true);

    let page = apply(&mut card, 0.5);
    assert_close(page.alpha, 0.7);
    assert_close(page.translation_x, 15.0);
    assert_close(page.translation_y, 0.0);

    card.set_config(config.with_margin(10.0));
    let page = apply(&mut card, -2.0);
    assert_close(page.alpha, 0.4);
    assert_close(page.translation_x, -20.0);
}

#[test]
fn card_with_full_scale_leaves_scale_untouched() {
    let config = TransformerConfig::new(TransformerKind::Card).with_min_scale(1.0);
    let mut card = PageTransformer::new(config, true);
    let mut page = PageTransform {
        scale: 0.3,
        ..PageTransform::IDENTITY
    };
    card.transform_page(7, &mut page, PAGE, 0.5);
    assert_close(page.scale, 0.3);
    assert_eq!(page.pivot, None);
}

#[test]
fn zoom_out_hides_offscreen_pages() {
    let mut zoom = transformer(TransformerKind::ZoomOut, true);
    let page = apply(&mut zoom, 1.5);
    assert_close(page.alpha, 0.0);
    assert_close(page.scale, 1.0);
}

#[test]
fn zoom_out_shrinks_and_fades() {
    let mut zoom = transformer(TransformerKind::ZoomOut, true);

    let page = apply(&mut zoom, -0.5);
    // Scale is clamped to the minimum, alpha to its minimum.
    assert_close(page.scale, 0.85);
    assert_close(page.alpha, 0.5);
    let vertical = 800.0 * 0.15 / 2.0;
    let horizontal = 400.0 * 0.15 / 2.0;
    assert_close(page.translation_x, -(vertical / 2.0 - horizontal));

    let page = apply(&mut zoom, 0.1);
    assert_close(page.scale, 0.9);
    assert_close(page.alpha, 0.5 + (0.05 / 0.15) * 0.5);
}

#[test]
fn zoom_out_with_full_scale_stays_opaque() {
    let config = TransformerConfig::new(TransformerKind::ZoomOut).with_min_scale(1.0);
    let mut zoom = PageTransformer::new(config, false);
    let page = apply(&mut zoom, 0.5);
    assert_close(page.scale, 1.0);
    assert_close(page.alpha, 1.0);
    assert!(page.alpha.is_finite());
}

#[test]
fn depth_slides_left_pages_and_stacks_right_pages() {
    let mut depth = transformer(TransformerKind::Depth, true);

    let left = apply(&mut depth, -0.5);
    assert_eq!(left, PageTransform::IDENTITY);

    let right = apply(&mut depth, 0.5);
    assert_close(right.alpha, 0.5);
    assert_close(right.translation_x, -200.0);
    assert_close(right.scale, 0.875);

    assert_close(apply(&mut depth, -1.5).alpha, 0.0);
    assert_close(apply(&mut depth, 1.5).alpha, 0.0);
}

#[test]
fn depth_vertical_uses_height() {
    let mut depth = transformer(TransformerKind::Depth, false);
    let page = apply(&mut depth, 0.25);
    assert_close(page.translation_y, -200.0);
    assert_close(page.translation_x, 0.0);
}

#[test]
fn orientation_or_kind_change_requests_reset_of_seen_pages() {
    let mut effect = transformer(TransformerKind::Card, true);
    let mut page = PageTransform::IDENTITY;
    effect.transform_page(4, &mut page, PAGE, 0.3);
    effect.transform_page(2, &mut page, PAGE, 0.3);
    assert!(effect.take_reset_request().is_empty());

    assert!(!effect.set_horizontal(true));
    assert!(effect.set_horizontal(false));
    assert_eq!(effect.take_reset_request(), vec![2, 4]);
    assert!(effect.take_reset_request().is_empty());

    effect.set_config(TransformerConfig::new(TransformerKind::Card).with_min_alpha(0.2));
    assert!(effect.take_reset_request().is_empty());

    effect.set_config(TransformerConfig::new(TransformerKind::Depth));
    assert_eq!(effect.take_reset_request(), vec![2, 4]);
}
