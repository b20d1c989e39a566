//! Screen rendering onto the 128x64 monochrome panel.
//!
//! Every screen is redrawn wholesale on each state change: clear the buffer,
//! draw the three-line list window (the entry above, the highlighted entry
//! marked with `"> "`, the entry below), the `OK`/`Back` button hints, then
//! flush. Rendering is generic over any [`DrawTarget`] with
//! [`BinaryColor`] pixels, so tests draw into a mock display and the device
//! crate hands in the SSD1306.

use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_7X13_BOLD};
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;

use crate::menu::{wrap_down, wrap_up, LogStep, MenuScreen, MAIN_OPTIONS};
use crate::types::{EventType, Rating};

/// Panel width in pixels.
pub const WIDTH: u32 = 128;
/// Panel height in pixels.
pub const HEIGHT: u32 = 64;

/// A physical display: a monochrome draw target whose buffer can be pushed
/// to the panel. `kit-device` implements this for the SSD1306; tests
/// implement it for a mock display with a no-op flush.
pub trait Panel: DrawTarget<Color = BinaryColor> {
    /// Push the drawn frame to the panel.
    fn flush_frame(&mut self);
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

fn selected_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_7X13_BOLD)
        .text_color(BinaryColor::On)
        .build()
}

// Baselines for the three list rows and the hint row.
const ROW_PREV_Y: i32 = 10;
const ROW_SELECTED_Y: i32 = 26;
const ROW_NEXT_Y: i32 = 40;
const HINT_Y: i32 = 62;

/// The three-line window around `cursor`: the entry above, the selected
/// entry, the entry below, wrapping at both ends. Lists of one entry get
/// blank neighbours instead of the same name three times.
#[must_use]
pub fn window3(items: &[String], cursor: usize) -> [Option<&str>; 3] {
    if items.is_empty() {
        return [None, None, None];
    }
    let prev = (items.len() > 1).then(|| items[wrap_up(cursor, items.len())].as_str());
    let next = (items.len() > 1).then(|| items[wrap_down(cursor, items.len())].as_str());
    [prev, Some(items[cursor].as_str()), next]
}

fn draw_list<D>(target: &mut D, items: &[String], cursor: usize, empty_message: &str)
where
    D: DrawTarget<Color = BinaryColor>,
{
    if items.is_empty() {
        let _ = Text::new(empty_message, Point::new(10, ROW_SELECTED_Y), text_style()).draw(target);
        return;
    }

    let [prev, selected, next] = window3(items, cursor);
    if let Some(prev) = prev {
        let _ = Text::new(prev, Point::new(0, ROW_PREV_Y), text_style()).draw(target);
    }
    if let Some(selected) = selected {
        let mut line = String::with_capacity(selected.len() + 2);
        line.push_str("> ");
        line.push_str(selected);
        let _ = Text::new(&line, Point::new(0, ROW_SELECTED_Y), selected_style()).draw(target);
    }
    if let Some(next) = next {
        let _ = Text::new(next, Point::new(0, ROW_NEXT_Y), text_style()).draw(target);
    }
}

fn draw_hints<D>(target: &mut D, back: bool)
where
    D: DrawTarget<Color = BinaryColor>,
{
    if back {
        let _ = Text::new("Back", Point::new(0, HINT_Y), text_style()).draw(target);
    }
    // Right-aligned "OK" in the 6x10 font.
    let ok_x = WIDTH as i32 - 2 * 6 - 2;
    let _ = Text::new("OK", Point::new(ok_x, HINT_Y), text_style()).draw(target);
}

fn names(contacts: &[crate::types::Contact]) -> Vec<String> {
    contacts.iter().map(|c| c.name.clone()).collect()
}

/// Redraw `screen` into the panel buffer and flush it.
pub fn draw<P: Panel>(panel: &mut P, screen: &MenuScreen) {
    let _ = panel.clear(BinaryColor::Off);

    match screen {
        MenuScreen::Main { cursor } => {
            let options: Vec<String> = MAIN_OPTIONS.iter().map(|s| (*s).to_string()).collect();
            draw_list(panel, &options, *cursor, "");
            // No Back hint: there is nothing above the main menu.
            draw_hints(panel, false);
        }
        MenuScreen::Today { contacts, cursor } => {
            draw_list(panel, &names(contacts), *cursor, "No contacts today!");
            draw_hints(panel, true);
        }
        MenuScreen::Contacts { contacts, cursor } => {
            draw_list(panel, &names(contacts), *cursor, "No contacts available");
            draw_hints(panel, true);
        }
        MenuScreen::LogEvent(flow) => {
            let items: Vec<String> = match flow.step {
                LogStep::SelectContact => flow.contacts.iter().map(|c| c.name.clone()).collect(),
                LogStep::SelectType => {
                    EventType::ALL.iter().map(|t| t.as_str().to_string()).collect()
                }
                LogStep::SelectRating => Rating::ALL.iter().map(ToString::to_string).collect(),
            };
            draw_list(panel, &items, flow.cursor, "No contacts available");
            draw_hints(panel, true);
        }
        MenuScreen::Confirmed { .. } => {
            let _ = Text::new(
                "Event logged :)",
                Point::new(WIDTH as i32 / 4, HEIGHT as i32 / 2),
                text_style(),
            )
            .draw(panel);
        }
    }

    panel.flush_frame();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::Menu;
    use crate::types::{Contact, ContactId};
    use chrono::NaiveDate;
    use embedded_graphics::mock_display::MockDisplay;

    struct MockPanel(MockDisplay<BinaryColor>);

    impl MockPanel {
        fn new() -> Self {
            let mut display = MockDisplay::new();
            // The mock is stricter than a real panel: whole-frame redraws
            // legitimately repaint pixels.
            display.set_allow_overdraw(true);
            display.set_allow_out_of_bounds_drawing(true);
            Self(display)
        }
    }

    impl DrawTarget for MockPanel {
        type Color = BinaryColor;
        type Error = std::convert::Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            self.0.draw_iter(pixels)
        }
    }

    impl OriginDimensions for MockPanel {
        fn size(&self) -> Size {
            Size::new(WIDTH, HEIGHT)
        }
    }

    impl Panel for MockPanel {
        fn flush_frame(&mut self) {}
    }

    fn contact(id: i64, name: &str) -> Contact {
        Contact {
            id: ContactId(id),
            name: name.into(),
            frequency_days: 7,
            last_contact: NaiveDate::from_ymd_opt(2026, 8, 1).expect("test date"),
        }
    }

    #[test]
    fn window_wraps_at_both_ends() {
        let items: Vec<String> = ["a", "b", "c"].map(String::from).to_vec();
        assert_eq!(window3(&items, 0), [Some("c"), Some("a"), Some("b")]);
        assert_eq!(window3(&items, 2), [Some("b"), Some("c"), Some("a")]);
    }

    #[test]
    fn window_of_one_has_blank_neighbours() {
        let items = vec!["only".to_string()];
        assert_eq!(window3(&items, 0), [None, Some("only"), None]);
    }

    #[test]
    fn window_of_none_is_blank() {
        assert_eq!(window3(&[], 0), [None, None, None]);
    }

    #[test]
    fn every_screen_draws_without_panicking() {
        let mut menu = Menu::new();
        let mut panel = MockPanel::new();
        draw(&mut panel, menu.screen());

        menu.enter_today(vec![contact(1, "Alice"), contact(2, "Bob")]);
        draw(&mut MockPanel::new(), menu.screen());

        menu.enter_today(Vec::new());
        draw(&mut MockPanel::new(), menu.screen());

        menu.enter_contacts(vec![contact(1, "Alice")]);
        draw(&mut MockPanel::new(), menu.screen());

        menu.enter_log_event(vec![contact(1, "Alice")]);
        draw(&mut MockPanel::new(), menu.screen());

        menu.event_committed("Alice".to_string());
        draw(&mut MockPanel::new(), menu.screen());
    }
}
