//! Pointer position to parameter value for the inline slider, cycle-list
//! and checkbox controls.

use chiptrack_types::ParamInfo;

use super::geometry::Geometry;

/// Absolute slider value for a pointer at `x`.
pub fn slider_value(info: &ParamInfo, x: i32, slider_left: i32, slider_width: i32) -> i32 {
    let t = ((x - slider_left) as f32 / slider_width.max(1) as f32).clamp(0.0, 1.0);
    let value = (info.min as f32 + (info.max - info.min) as f32 * t).round() as i32;
    info.snap_and_clamp(value)
}

/// Fine-adjust step: one parameter step per `divisor` pixels moved since
/// `last_x`. `None` until the pointer has moved far enough, in which case
/// the caller keeps its anchor.
pub fn fine_adjust(info: &ParamInfo, current: i32, x: i32, last_x: i32, divisor: i32) -> Option<i32> {
    let delta = (x - last_x) / divisor.max(1);
    if delta == 0 {
        return None;
    }
    let value = (current + delta * info.step.max(1)).clamp(info.min, info.max);
    Some(info.snap_and_clamp(value))
}

/// Strictly inside the slider box, `x` absolute and `rel_y` row-relative.
pub fn inside_slider(geometry: &Geometry, x: i32, rel_y: i32) -> bool {
    let left = geometry.slider_left();
    x > left
        && x < left + geometry.slider_size_x
        && rel_y > geometry.slider_pos_y
        && rel_y < geometry.slider_pos_y + geometry.slider_size_y
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListArrow {
    Decrement,
    Increment,
}

pub fn list_arrow_at(geometry: &Geometry, x: i32) -> Option<ListArrow> {
    let left = geometry.slider_left();
    let right = left + geometry.slider_size_x;
    if x > left && x < left + geometry.list_arrow_size_x {
        Some(ListArrow::Decrement)
    } else if x > right - geometry.list_arrow_size_x && x < right {
        Some(ListArrow::Increment)
    } else {
        None
    }
}

/// Value after pressing an arrow, one snapped step away.
pub fn list_step(info: &ParamInfo, current: i32, arrow: ListArrow) -> i32 {
    let step = info.step.max(1);
    match arrow {
        ListArrow::Decrement => info.snap_and_clamp(current - step),
        ListArrow::Increment => info.snap_and_clamp(current + step),
    }
}

/// Arrows dim when they would not change the value.
pub fn list_arrow_enabled(info: &ParamInfo, current: i32, arrow: ListArrow, enabled: bool) -> bool {
    enabled && list_step(info, current, arrow) != current
}

pub fn in_checkbox_column(geometry: &Geometry, x: i32) -> bool {
    x >= geometry.check_box_left()
}

pub fn checkbox_toggle(current: i32) -> i32 {
    if current == 0 {
        1
    } else {
        0
    }
}

/// Slider fill width in pixels for a value.
pub fn slider_fill_width(info: &ParamInfo, value: i32, slider_width: i32) -> i32 {
    let range = (info.max - info.min).max(1) as f32;
    ((value - info.min) as f32 / range * slider_width as f32).round() as i32
}
