//! Session renderer
//!
//! Paints a [`DisplaySession`] onto any `embedded-graphics` target. The
//! screen is split into two label groups, each a title line followed by two
//! value rows (text on the left, bar on the right). Panels with a history
//! graph give the lower half to it.
//!
//! ```text
//! ┌────────────────────────────┐
//! │CPU                         │
//! │55%    [██████████        ] │
//! │45°    [███████           ] │
//! │GPU                         │
//! │12%    [██                ] │
//! │61°    [██████████        ] │
//! ├────────────────────────────┤
//! │        history graph       │
//! └────────────────────────────┘
//! ```

use embedded_graphics::mono_font::iso_8859_1::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::{BinaryColor, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use espmon_core::aggregate::{HistorySeries, HISTORY_LEN};
use espmon_core::{Channel, Group};
use espmon_protocol::Rgba;

use crate::session::{BarState, DisplaySession, LabelState, DISCONNECTED_TEXT};

/// Glyph width of the label font
const CHAR_WIDTH: u32 = 6;

/// Line height of the label font
const LINE_HEIGHT: u32 = 10;

/// Width reserved for value text left of each bar ("65535°" plus a gap)
const VALUE_COLUMN: u32 = 7 * CHAR_WIDTH;

/// Pixel color the renderer can produce from wire colors
pub trait PaletteColor: PixelColor {
    /// Screen background
    const BACKGROUND: Self;

    /// Convert an RGBA color, blending against the background
    fn from_rgba(color: Rgba) -> Self;
}

impl PaletteColor for BinaryColor {
    const BACKGROUND: Self = BinaryColor::Off;

    fn from_rgba(color: Rgba) -> Self {
        let lit = color.luma() as u16 * color.a as u16 / 255;
        if lit >= 128 {
            BinaryColor::On
        } else {
            BinaryColor::Off
        }
    }
}

impl PaletteColor for Rgb565 {
    const BACKGROUND: Self = <Rgb565 as RgbColor>::BLACK;

    fn from_rgba(color: Rgba) -> Self {
        let scale = |c: u8| (c as u16 * color.a as u16 / 255) as u8;
        Rgb565::new(scale(color.r) >> 3, scale(color.g) >> 2, scale(color.b) >> 3)
    }
}

/// Widget placement for a given panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    bounds: Rectangle,
    history: bool,
}

impl Layout {
    pub fn new(bounds: Rectangle, history: bool) -> Self {
        Self { bounds, history }
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn bars_height(&self) -> u32 {
        if self.history {
            self.bounds.size.height / 2
        } else {
            self.bounds.size.height
        }
    }

    fn group_height(&self) -> u32 {
        self.bars_height() / 2
    }

    fn row_height(&self) -> u32 {
        self.group_height().saturating_sub(LINE_HEIGHT) / 2
    }

    fn group_top(&self, group: Group) -> i32 {
        let index = match group {
            Group::Top => 0,
            Group::Bottom => 1,
        };
        self.bounds.top_left.y + (index * self.group_height()) as i32
    }

    fn row_top(&self, channel: Channel) -> i32 {
        let row = (channel.index() % 2) as u32;
        self.group_top(channel.group()) + (LINE_HEIGHT + row * self.row_height()) as i32
    }

    /// Top-left of a group's title text
    pub fn title_origin(&self, group: Group) -> Point {
        Point::new(self.bounds.top_left.x, self.group_top(group))
    }

    /// Top-left of a channel's value text
    pub fn value_origin(&self, channel: Channel) -> Point {
        Point::new(self.bounds.top_left.x, self.row_top(channel))
    }

    /// Area of a channel's bar
    pub fn bar_area(&self, channel: Channel) -> Rectangle {
        Rectangle::new(
            Point::new(
                self.bounds.top_left.x + VALUE_COLUMN as i32,
                self.row_top(channel) + 1,
            ),
            Size::new(
                self.bounds.size.width.saturating_sub(VALUE_COLUMN),
                self.row_height().saturating_sub(2).max(1),
            ),
        )
    }

    /// Area of the history graph, if this layout has one
    pub fn graph_area(&self) -> Option<Rectangle> {
        if !self.history {
            return None;
        }
        let top = self.bounds.top_left.y + self.bars_height() as i32;
        Some(Rectangle::new(
            Point::new(self.bounds.top_left.x, top),
            Size::new(
                self.bounds.size.width,
                self.bounds.size.height - self.bars_height(),
            ),
        ))
    }
}

/// Paint the whole session
pub fn render<D>(session: &DisplaySession, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget,
    D::Color: PaletteColor,
{
    let layout = Layout::new(target.bounding_box(), session.history_shown());
    target.clear(D::Color::BACKGROUND)?;

    for group in Group::ALL {
        draw_label(target, session.title(group), layout.title_origin(group))?;
    }
    for channel in Channel::ALL {
        draw_label(target, session.value(channel), layout.value_origin(channel))?;
        draw_bar(target, session.bar(channel), layout.bar_area(channel))?;
    }
    if let Some(area) = layout.graph_area() {
        for channel in Channel::ALL {
            let color = D::Color::from_rgba(session.history().color(channel));
            draw_series(target, session.history().series(channel), area, color)?;
        }
    }
    if session.overlay_visible() {
        draw_overlay(target, layout.bounds())?;
    }
    Ok(())
}

fn draw_label<D>(target: &mut D, label: &LabelState, origin: Point) -> Result<(), D::Error>
where
    D: DrawTarget,
    D::Color: PaletteColor,
{
    if !label.visible || label.text.is_empty() {
        return Ok(());
    }
    let style = MonoTextStyle::new(&FONT_6X10, D::Color::from_rgba(label.colors.foreground));
    Text::with_baseline(&label.text, origin, style, Baseline::Top).draw(target)?;
    Ok(())
}

fn draw_bar<D>(target: &mut D, bar: &BarState, area: Rectangle) -> Result<(), D::Error>
where
    D: DrawTarget,
    D::Color: PaletteColor,
{
    if !bar.visible {
        return Ok(());
    }
    let fill = D::Color::from_rgba(bar.colors.foreground);
    let back = D::Color::from_rgba(bar.colors.background);
    area.into_styled(PrimitiveStyle::with_fill(back)).draw(target)?;

    let width = area.size.width;
    let filled = ((bar.value * width as f32 + 0.5) as u32).min(width);
    if filled > 0 {
        if bar.gradient {
            for x in 0..filled {
                let color = blend(bar.colors.background, bar.colors.foreground, x, width - 1);
                let column = Point::new(x as i32, 0);
                Rectangle::new(area.top_left + column, Size::new(1, area.size.height))
                    .into_styled(PrimitiveStyle::with_fill(D::Color::from_rgba(color)))
                    .draw(target)?;
            }
        } else {
            Rectangle::new(area.top_left, Size::new(filled, area.size.height))
                .into_styled(PrimitiveStyle::with_fill(fill))
                .draw(target)?;
        }
    }

    area.into_styled(PrimitiveStyle::with_stroke(fill, 1)).draw(target)?;
    Ok(())
}

fn draw_series<D>(
    target: &mut D,
    series: &HistorySeries<HISTORY_LEN>,
    area: Rectangle,
    color: D::Color,
) -> Result<(), D::Error>
where
    D: DrawTarget,
{
    let style = PrimitiveStyle::with_stroke(color, 1);
    let span_x = area.size.width.saturating_sub(1) as i32;
    let span_y = area.size.height.saturating_sub(1) as i32;
    let bottom = area.top_left.y + span_y;
    let point = |i: usize, level: u8| {
        Point::new(
            area.top_left.x + i as i32 * span_x / (HISTORY_LEN as i32 - 1),
            bottom - level as i32 * span_y / 255,
        )
    };

    let mut previous: Option<Point> = None;
    for (i, level) in series.iter().enumerate() {
        let current = point(i, level);
        if let Some(start) = previous {
            Line::new(start, current).into_styled(style).draw(target)?;
        }
        previous = Some(current);
    }
    Ok(())
}

fn draw_overlay<D>(target: &mut D, bounds: Rectangle) -> Result<(), D::Error>
where
    D: DrawTarget,
    D::Color: PaletteColor,
{
    let center = bounds.center();
    let text_width = DISCONNECTED_TEXT.len() as u32 * CHAR_WIDTH;
    let white = D::Color::from_rgba(Rgba::WHITE);

    Rectangle::with_center(center, Size::new(text_width + 4, LINE_HEIGHT + 4))
        .into_styled(PrimitiveStyle::with_fill(D::Color::BACKGROUND))
        .draw(target)?;

    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    Text::with_text_style(
        DISCONNECTED_TEXT,
        center,
        MonoTextStyle::new(&FONT_6X10, white),
        text_style,
    )
    .draw(target)?;
    Ok(())
}

/// Linear mix from `from` to `to`, `step` of `steps`
fn blend(from: Rgba, to: Rgba, step: u32, steps: u32) -> Rgba {
    if steps == 0 {
        return to;
    }
    let mix = |a: u8, b: u8| {
        let a = a as i32;
        let b = b as i32;
        (a + (b - a) * step as i32 / steps as i32) as u8
    };
    Rgba::new(
        mix(from.r, to.r),
        mix(from.g, to.g),
        mix(from.b, to.b),
        mix(from.a, to.a),
    )
}
