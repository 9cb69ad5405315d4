//! Box layout
//!
//! Sizes come from attributes, then shared styles, then the widget's default.
//! Children of a flex container are stacked along its main axis and count as
//! layout positioned; all other children are aligned inside the parent's
//! content box and offset by their `x`/`y`. All arithmetic saturates, so
//! extreme sizes and offsets clamp instead of overflowing.

use crate::object::{Area, Coord, FlexFlow, ObjId, Object};
use crate::tree::ObjectTree;

/// Advance of one glyph in the built-in monospace font
pub const GLYPH_WIDTH: i32 = 8;
/// Height of one text line
pub const LINE_HEIGHT: i32 = 16;

/// Size of a text block in the built-in font
#[must_use]
pub fn text_size(text: &str) -> (i32, i32) {
    let lines: Vec<&str> = text.split('\n').collect();
    let widest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    (scaled(widest, GLYPH_WIDTH), scaled(lines.len(), LINE_HEIGHT))
}

fn scaled(count: usize, unit: i32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX).saturating_mul(unit)
}

fn total(values: impl IntoIterator<Item = i32>) -> i32 {
    values.into_iter().fold(0, i32::saturating_add)
}

/// Lay out `root` and its subtree inside `area`
pub fn layout_subtree(tree: &mut ObjectTree, root: ObjId, area: Area) {
    place(tree, root, area, false);
}

fn gaps(obj: &Object) -> (i32, i32) {
    (
        obj.style_int("pad_column").unwrap_or(0),
        obj.style_int("pad_row").unwrap_or(0),
    )
}

fn visible_children(tree: &ObjectTree, obj: &Object) -> Vec<ObjId> {
    obj.children
        .iter()
        .copied()
        .filter(|child| tree.get(*child).is_some_and(|c| !c.hidden))
        .collect()
}

fn measure(tree: &ObjectTree, id: ObjId, avail_w: i32, avail_h: i32) -> (i32, i32) {
    let Some(obj) = tree.get(id) else {
        return (0, 0);
    };

    let (left, top, right, bottom) = obj.padding();
    let width = obj.width_spec();
    let height = obj.height_spec();

    let (content_w, content_h) = if width == Coord::Content || height == Coord::Content {
        content_size(
            tree,
            obj,
            avail_w.saturating_sub(left).saturating_sub(right),
            avail_h.saturating_sub(top).saturating_sub(bottom),
        )
    } else {
        (0, 0)
    };

    (
        width.resolve(avail_w, total([content_w, left, right])),
        height.resolve(avail_h, total([content_h, top, bottom])),
    )
}

fn content_size(tree: &ObjectTree, obj: &Object, inner_w: i32, inner_h: i32) -> (i32, i32) {
    if let Some(text) = &obj.text {
        return text_size(text);
    }

    let children = visible_children(tree, obj);
    let sizes: Vec<(i32, i32)> = children
        .iter()
        .map(|child| measure(tree, *child, inner_w, inner_h))
        .collect();
    let spacing = |gap: i32| scaled(sizes.len().saturating_sub(1), gap);
    let (gap_col, gap_row) = gaps(obj);

    match obj.flex {
        Some(FlexFlow::Row) => (
            total(sizes.iter().map(|s| s.0)).saturating_add(spacing(gap_col)),
            sizes.iter().map(|s| s.1).max().unwrap_or(0),
        ),
        Some(FlexFlow::Column) => (
            sizes.iter().map(|s| s.0).max().unwrap_or(0),
            total(sizes.iter().map(|s| s.1)).saturating_add(spacing(gap_row)),
        ),
        None => children.iter().zip(&sizes).fold((0, 0), |(w, h), (child, size)| {
            let (x, y) = tree.get(*child).map_or((0, 0), |c| (c.x.max(0), c.y.max(0)));
            (w.max(x.saturating_add(size.0)), h.max(y.saturating_add(size.1)))
        }),
    }
}

fn place(tree: &mut ObjectTree, id: ObjId, area: Area, layout_positioned: bool) {
    let Some(obj) = tree.get_mut(id) else {
        return;
    };
    obj.area = area;
    obj.layout_positioned = layout_positioned;

    let (left, top, right, bottom) = obj.padding();
    let content = area.inset(left, top, right, bottom);
    let flex = obj.flex;
    let (gap_col, gap_row) = gaps(obj);
    let children = obj.children.clone();

    let mut cursor = match flex {
        Some(FlexFlow::Row) => content.x1,
        _ => content.y1,
    };

    for child in children {
        let (width, height) = measure(tree, child, content.width(), content.height());
        let Some((hidden, align, x, y)) = tree.get(child).map(|c| (c.hidden, c.align, c.x, c.y)) else {
            continue;
        };

        match flex {
            Some(FlexFlow::Row) if !hidden => {
                place(tree, child, Area::from_size(cursor, content.y1, width, height), true);
                cursor = total([cursor, width, gap_col]);
            }
            Some(FlexFlow::Column) if !hidden => {
                place(tree, child, Area::from_size(content.x1, cursor, width, height), true);
                cursor = total([cursor, height, gap_row]);
            }
            _ => {
                let (ox, oy) = align.origin(&content, width, height);
                let placed = Area::from_size(ox.saturating_add(x), oy.saturating_add(y), width, height);
                place(tree, child, placed, false);
            }
        }
    }
}
