use gtk::prelude::*;
use relm4::prelude::*;

use crate::models::{Message, Role};
use crate::services::format::{parse_result_blocks, ResultLine};

pub struct MessageWidget {
    pub message: Message,
    bubble: gtk::Box,
    action_bar: gtk::Box,
}

#[derive(Debug)]
pub enum MessageWidgetMsg {
    RequestCopy,
}

#[derive(Debug)]
pub enum MessageWidgetOutput {
    CopyFullContent(String),
}

#[relm4::factory(pub)]
impl FactoryComponent for MessageWidget {
    type Init = Message;
    type Input = MessageWidgetMsg;
    type Output = MessageWidgetOutput;
    type CommandOutput = ();
    type ParentWidget = gtk::Box;

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Vertical,
            set_spacing: 0,
        }
    }

    fn init_model(message: Self::Init, _index: &DynamicIndex, _sender: FactorySender<Self>) -> Self {
        let bubble = gtk::Box::builder()
            .orientation(gtk::Orientation::Vertical)
            .spacing(4)
            .build();

        let action_bar = gtk::Box::builder()
            .orientation(gtk::Orientation::Horizontal)
            .spacing(4)
            .halign(gtk::Align::End)
            .valign(gtk::Align::Start)
            .margin_top(2)
            .margin_end(4)
            .visible(false)
            .build();
        action_bar.add_css_class("message-actions");

        Self {
            message,
            bubble,
            action_bar,
        }
    }

    fn init_widgets(
        &mut self,
        _index: &DynamicIndex,
        root: Self::Root,
        _returned_widget: &<Self::ParentWidget as relm4::factory::FactoryView>::ReturnedWidget,
        sender: FactorySender<Self>,
    ) -> Self::Widgets {
        let is_user = self.message.role == Role::User;

        self.bubble
            .add_css_class(&format!("message-bubble-{}", self.message.role.as_str()));
        self.bubble.add_css_class("card");
        if self.message.is_error() {
            self.bubble.add_css_class("message-error");
        }

        let role_label = gtk::Label::builder()
            .label(if is_user { "You" } else { crate::config::APP_NAME })
            .halign(gtk::Align::Start)
            .margin_start(8)
            .margin_top(4)
            .build();
        role_label.add_css_class("caption");
        role_label.add_css_class("dim-label");
        self.bubble.append(&role_label);

        let content_box = gtk::Box::builder()
            .orientation(gtk::Orientation::Vertical)
            .spacing(4)
            .margin_start(8)
            .margin_end(8)
            .margin_top(4)
            .margin_bottom(8)
            .build();

        if !is_user && self.message.is_search_result() {
            render_result_blocks(&content_box, &self.message.content);
        } else {
            let label = text_label(&self.message.content);
            if self.message.is_error() {
                label.add_css_class("error");
            }
            content_box.append(&label);
        }
        self.bubble.append(&content_box);

        // Copy button revealed on hover
        let overlay = gtk::Overlay::new();
        overlay.set_child(Some(&self.bubble));

        let copy_btn = gtk::Button::builder()
            .icon_name("edit-copy-symbolic")
            .tooltip_text("Copy message")
            .build();
        copy_btn.add_css_class("flat");
        copy_btn.add_css_class("circular");
        let sender_copy = sender.input_sender().clone();
        copy_btn.connect_clicked(move |_| {
            sender_copy.send(MessageWidgetMsg::RequestCopy).unwrap();
        });
        self.action_bar.append(&copy_btn);
        overlay.add_overlay(&self.action_bar);

        let motion = gtk::EventControllerMotion::new();
        let action_bar_enter = self.action_bar.clone();
        motion.connect_enter(move |_, _, _| {
            action_bar_enter.set_visible(true);
        });
        let action_bar_leave = self.action_bar.clone();
        motion.connect_leave(move |_| {
            action_bar_leave.set_visible(false);
        });
        overlay.add_controller(motion);

        let message_row = gtk::Box::builder()
            .orientation(gtk::Orientation::Horizontal)
            .margin_top(4)
            .margin_bottom(4)
            .margin_start(if is_user { 96 } else { 12 })
            .margin_end(if is_user { 12 } else { 64 })
            .halign(if is_user {
                gtk::Align::End
            } else {
                gtk::Align::Start
            })
            .build();
        message_row.append(&overlay);
        root.append(&message_row);

        let widgets = view_output!();
        widgets
    }

    fn update(&mut self, msg: Self::Input, sender: FactorySender<Self>) {
        match msg {
            MessageWidgetMsg::RequestCopy => {
                let _ = sender.output(MessageWidgetOutput::CopyFullContent(
                    self.message.content.clone(),
                ));
            }
        }
    }
}

fn text_label(text: &str) -> gtk::Label {
    gtk::Label::builder()
        .label(text)
        .halign(gtk::Align::Start)
        .xalign(0.0)
        .wrap(true)
        .wrap_mode(gtk::pango::WrapMode::WordChar)
        .selectable(true)
        .build()
}

/// Lay out search-mode content as one card per result.
fn render_result_blocks(container: &gtk::Box, content: &str) {
    for block in parse_result_blocks(content) {
        let card = gtk::Box::builder()
            .orientation(gtk::Orientation::Vertical)
            .spacing(2)
            .margin_bottom(8)
            .build();
        card.add_css_class("search-result");

        for line in block {
            match line {
                ResultLine::Title(title) => {
                    let label = text_label(&title);
                    label.add_css_class("heading");
                    card.append(&label);
                }
                ResultLine::Text(text) => card.append(&text_label(&text)),
                ResultLine::Link(url) => {
                    let link = gtk::LinkButton::with_label(&url, &url);
                    link.set_halign(gtk::Align::Start);
                    link.add_css_class("search-result-link");
                    card.append(&link);
                }
                ResultLine::Image(url) => {
                    let link = gtk::LinkButton::with_label(&url, "View image");
                    link.set_halign(gtk::Align::Start);
                    link.add_css_class("search-result-image");
                    card.append(&link);
                }
            }
        }

        container.append(&card);
    }
}
