use gtk::prelude::*;
use relm4::prelude::*;

pub struct InputArea {
    entry: gtk::Entry,
    sending: bool,
    search_mode: bool,
    has_text: bool,
}

#[derive(Debug)]
pub enum InputAreaMsg {
    SendClicked,
    SetSending(bool),
    /// Placeholder hint after a `/search` submission
    SetSearchMode(bool),
    /// Prefill from the welcome page
    SetText(String),
    TextChanged,
}

#[derive(Debug)]
pub enum InputAreaOutput {
    SendMessage(String),
}

#[relm4::component(pub)]
impl Component for InputArea {
    type Init = ();
    type Input = InputAreaMsg;
    type Output = InputAreaOutput;
    type CommandOutput = ();

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Horizontal,
            set_spacing: 8,
            set_margin_top: 8,
            set_margin_bottom: 8,
            set_margin_start: 12,
            set_margin_end: 12,
            add_css_class: "input-card",

            #[local_ref]
            entry -> gtk::Entry {
                set_hexpand: true,
                add_css_class: "input-entry",
                #[watch]
                set_sensitive: !model.sending,
                #[watch]
                set_placeholder_text: Some(if model.search_mode {
                    "Type your search query..."
                } else {
                    "Type your message..."
                }),
                connect_activate => InputAreaMsg::SendClicked,
                connect_changed => InputAreaMsg::TextChanged,
            },

            gtk::Button {
                set_label: "Send",
                set_tooltip_text: Some("Send message (Enter)"),
                add_css_class: "suggested-action",
                add_css_class: "pill",
                #[watch]
                set_sensitive: !model.sending && model.has_text,
                connect_clicked => InputAreaMsg::SendClicked,
            },
        }
    }

    fn init(
        _init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let model = Self {
            entry: gtk::Entry::new(),
            sending: false,
            search_mode: false,
            has_text: false,
        };

        let entry = &model.entry;
        let widgets = view_output!();

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>, _root: &Self::Root) {
        match msg {
            InputAreaMsg::SendClicked => {
                let text = self.entry.text().to_string();
                if !text.trim().is_empty() && !self.sending {
                    let _ = sender.output(InputAreaOutput::SendMessage(text));
                    self.entry.set_text("");
                }
            }
            InputAreaMsg::SetSending(sending) => {
                self.sending = sending;
                if !sending {
                    self.entry.grab_focus();
                }
            }
            InputAreaMsg::SetSearchMode(search_mode) => {
                self.search_mode = search_mode;
            }
            InputAreaMsg::SetText(text) => {
                self.entry.set_text(&text);
                self.entry.grab_focus();
                self.entry.set_position(-1);
            }
            InputAreaMsg::TextChanged => {
                self.has_text = !self.entry.text().trim().is_empty();
            }
        }
    }
}
