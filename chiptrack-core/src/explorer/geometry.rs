//! Pixel metrics, all derived from base constants and the UI scale.

use super::{ExplorerSettings, ScrollBarStyle};

const ROW_HEIGHT: i32 = 21;
const EXPAND_SIZE_X: i32 = 8;
const EXPAND_POS_X: i32 = 3;
const EXPAND_POS_Y: i32 = 8;
const ICON_POS_X: i32 = 3;
const ICON_POS_Y: i32 = 3;
const TEXT_POS_X: i32 = 21;
const TEXT_POS_Y: i32 = 3;
const TEXT_NO_ICON_POS_X: i32 = 4;
const SUB_BUTTON_SPACING_X: i32 = 18;
const SUB_BUTTON_POS_Y: i32 = 3;
const SUB_BUTTON_SIZE: i32 = 16;
const SLIDER_POS_X: i32 = 100;
const SLIDER_POS_Y: i32 = 3;
const SLIDER_SIZE_X: i32 = 96;
const SLIDER_SIZE_Y: i32 = 15;
const SLIDER_THUMB_SIZE_X: i32 = 3;
const CHECK_BOX_POS_X: i32 = 20;
const CHECK_BOX_POS_Y: i32 = 3;
const DRAGGED_LINE_SIZE_Y: i32 = 5;

impl ScrollBarStyle {
    fn base_thickness(self) -> i32 {
        match self {
            ScrollBarStyle::None => 0,
            ScrollBarStyle::Thin => 10,
            ScrollBarStyle::Thick => 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub row_height: i32,
    pub expand_size_x: i32,
    pub expand_pos_x: i32,
    pub expand_pos_y: i32,
    pub icon_pos_x: i32,
    pub icon_pos_y: i32,
    pub text_pos_x: i32,
    pub text_pos_y: i32,
    pub text_no_icon_pos_x: i32,
    pub sub_button_spacing_x: i32,
    pub sub_button_pos_y: i32,
    pub sub_button_size: i32,
    /// Distance of the slider's left edge from the usable right edge.
    pub slider_pos_x: i32,
    pub slider_pos_y: i32,
    pub slider_size_x: i32,
    pub slider_size_y: i32,
    pub slider_thumb_size_x: i32,
    pub list_arrow_size_x: i32,
    pub check_box_pos_x: i32,
    pub check_box_pos_y: i32,
    pub dragged_line_size_y: i32,

    pub width: i32,
    pub height: i32,
    pub content_height: i32,
    /// Zero when the scroll bar is hidden.
    pub scroll_bar_thickness: i32,
    /// Width left of the scroll bar.
    pub usable_width: i32,
}

impl Geometry {
    /// Content height decides whether the scroll bar shows; its thickness
    /// then decides the usable width.
    pub fn compute(settings: &ExplorerSettings, width: i32, height: i32, row_count: usize) -> Self {
        let s = |base: i32| (base as f32 * settings.ui_scale) as i32;

        let row_height = s(ROW_HEIGHT).max(1);
        let content_height = row_height * row_count as i32;
        let needs_scroll_bar =
            settings.scroll_bar != ScrollBarStyle::None && content_height > height;
        let scroll_bar_thickness = if needs_scroll_bar {
            s(settings.scroll_bar.base_thickness())
        } else {
            0
        };

        Self {
            row_height,
            expand_size_x: s(EXPAND_SIZE_X),
            expand_pos_x: s(EXPAND_POS_X),
            expand_pos_y: s(EXPAND_POS_Y),
            icon_pos_x: s(ICON_POS_X),
            icon_pos_y: s(ICON_POS_Y),
            text_pos_x: s(TEXT_POS_X),
            text_pos_y: s(TEXT_POS_Y),
            text_no_icon_pos_x: s(TEXT_NO_ICON_POS_X),
            sub_button_spacing_x: s(SUB_BUTTON_SPACING_X),
            sub_button_pos_y: s(SUB_BUTTON_POS_Y),
            sub_button_size: s(SUB_BUTTON_SIZE),
            slider_pos_x: s(SLIDER_POS_X),
            slider_pos_y: s(SLIDER_POS_Y),
            slider_size_x: s(SLIDER_SIZE_X).max(1),
            slider_size_y: s(SLIDER_SIZE_Y),
            slider_thumb_size_x: s(SLIDER_THUMB_SIZE_X),
            list_arrow_size_x: s(SLIDER_SIZE_Y),
            check_box_pos_x: s(CHECK_BOX_POS_X),
            check_box_pos_y: s(CHECK_BOX_POS_Y),
            dragged_line_size_y: s(DRAGGED_LINE_SIZE_Y),
            width,
            height,
            content_height,
            scroll_bar_thickness,
            usable_width: width - scroll_bar_thickness,
        }
    }

    pub fn has_scroll_bar(&self) -> bool {
        self.scroll_bar_thickness > 0
    }

    pub fn in_scroll_bar(&self, x: i32) -> bool {
        self.has_scroll_bar() && x >= self.usable_width
    }

    /// Left edge of sub-button slot `slot`, counted from the right.
    pub fn sub_button_x(&self, slot: usize) -> i32 {
        self.usable_width - self.sub_button_spacing_x * (slot as i32 + 1)
    }

    pub fn slider_left(&self) -> i32 {
        self.usable_width - self.slider_pos_x
    }

    pub fn check_box_left(&self) -> i32 {
        self.usable_width - self.check_box_pos_x
    }

    pub fn inside(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }
}
