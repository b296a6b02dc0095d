/// Project card UI components
use crate::gui::Message;
use crate::presenter::Presentation;
use iced::{
    alignment::Horizontal,
    widget::{image, Column, Container, Image, Space, Text},
    Alignment, Element, Length,
};

const ICON_SIZE: f32 = 320.0;

/// Centered icon with the project text beneath it
pub fn render_project<'a>(
    presentation: &'a Presentation,
    icon: Option<&image::Handle>,
    position: (usize, usize),
) -> Element<'a, Message> {
    let mut content = Column::new().spacing(20).align_items(Alignment::Center);

    if let Some(handle) = icon {
        content = content.push(
            Image::new(handle.clone())
                .width(Length::Fixed(ICON_SIZE))
                .height(Length::Fixed(ICON_SIZE)),
        );
    }

    let (index, total) = position;
    content = content
        .push(
            Text::new(presentation.text.as_str())
                .size(28)
                .horizontal_alignment(Horizontal::Center),
        )
        .push(Space::new(Length::Shrink, Length::Fixed(10.0)))
        .push(Text::new(format!("◀  {} / {}  ▶", index + 1, total)).size(16));

    Container::new(content)
        .width(Length::Fill)
        .center_x()
        .into()
}

/// Shown when the projects folder has nothing to launch
pub fn render_empty(root: &std::path::Path) -> Element<'static, Message> {
    Column::new()
        .spacing(10)
        .align_items(Alignment::Center)
        .push(Text::new("No projects found").size(28))
        .push(Text::new(format!("{}", root.display())).size(14))
        .into()
}
