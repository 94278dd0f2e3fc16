use gtk::prelude::*;
use relm4::factory::FactoryVecDeque;
use relm4::prelude::*;

use crate::models::{Message, ThreadId};
use crate::ui::input_area::{InputArea, InputAreaMsg, InputAreaOutput};
use crate::ui::message_widget::{MessageWidget, MessageWidgetOutput};

/// Example queries offered on the welcome page: (button label, query).
const EXAMPLE_QUERIES: [(&str, &str); 4] = [
    ("Latest AI News", "What are the latest AI developments?"),
    ("Programming Trends", "/search best programming languages 2024"),
    ("ML Applications", "Tell me about machine learning applications"),
    ("Tech Companies", "/search top tech companies"),
];

const SEARCH_TIPS: [&str; 4] = [
    "Type normally for conversational search",
    "Use \"/search\" for direct search results",
    "Click on any example to try a query",
    "Your chat history is automatically saved",
];

pub struct ChatView {
    messages: FactoryVecDeque<MessageWidget>,
    input_area: Controller<InputArea>,
    thread_id: Option<ThreadId>,
    loading: bool,
    scrolled_window: gtk::ScrolledWindow,
    user_scrolled_up: bool,
}

#[derive(Debug)]
pub enum ChatViewMsg {
    /// Display a thread's messages. Repeated calls for the same thread only
    /// append what is new.
    ShowThread {
        id: Option<ThreadId>,
        messages: Vec<Message>,
    },
    SetLoading(bool),
    SetSearchMode(bool),
    PrefillInput(String),
    ScrollToBottom,
    ScrollPositionChanged,
    UserSendMessage(String),
    CopyToClipboard(String),
}

#[derive(Debug)]
pub enum ChatViewOutput {
    SendMessage(String),
}

#[relm4::component(pub)]
impl Component for ChatView {
    type Init = ();
    type Input = ChatViewMsg;
    type Output = ChatViewOutput;
    type CommandOutput = ();

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Vertical,
            set_vexpand: true,

            gtk::Stack {
                set_vexpand: true,
                set_transition_type: gtk::StackTransitionType::Crossfade,

                add_named[Some("welcome")] = &gtk::ScrolledWindow {
                    set_hscrollbar_policy: gtk::PolicyType::Never,

                    #[local_ref]
                    welcome_page -> adw::StatusPage {
                        set_icon_name: Some("system-search-symbolic"),
                        set_title: "Welcome to Scout",
                        set_description: Some("How can I help you today?"),
                    },
                },

                add_named[Some("messages")] = &gtk::Overlay {
                    #[local_ref]
                    scrolled_window -> gtk::ScrolledWindow {
                        set_vexpand: true,
                        set_hscrollbar_policy: gtk::PolicyType::Never,

                        #[local_ref]
                        message_list -> gtk::Box {
                            set_orientation: gtk::Orientation::Vertical,
                            set_spacing: 0,
                            set_margin_top: 8,
                            set_margin_bottom: 8,
                            set_margin_start: 16,
                            set_margin_end: 16,
                        },
                    },

                    add_overlay = &gtk::Button {
                        set_icon_name: "go-down-symbolic",
                        set_tooltip_text: Some("Scroll to bottom"),
                        set_halign: gtk::Align::Center,
                        set_valign: gtk::Align::End,
                        set_margin_bottom: 8,
                        add_css_class: "circular",
                        add_css_class: "osd",
                        #[watch]
                        set_visible: model.user_scrolled_up,
                        connect_clicked => ChatViewMsg::ScrollToBottom,
                    },
                },

                #[watch]
                set_visible_child_name: if model.messages.is_empty() { "welcome" } else { "messages" },
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Horizontal,
                set_halign: gtk::Align::Start,
                set_margin_start: 20,
                set_margin_bottom: 8,
                set_spacing: 8,
                #[watch]
                set_visible: model.loading,

                gtk::Spinner {
                    #[watch]
                    set_spinning: model.loading,
                },

                gtk::Label {
                    set_label: "Searching...",
                    add_css_class: "dim-label",
                },
            },

            gtk::Separator {
                set_orientation: gtk::Orientation::Horizontal,
            },

            model.input_area.widget().clone(),
        }
    }

    fn init(
        _init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let messages = FactoryVecDeque::builder()
            .launch(gtk::Box::default())
            .forward(sender.input_sender(), |output| match output {
                MessageWidgetOutput::CopyFullContent(content) => {
                    ChatViewMsg::CopyToClipboard(content)
                }
            });

        let input_area = InputArea::builder()
            .launch(())
            .forward(sender.input_sender(), |output| match output {
                InputAreaOutput::SendMessage(text) => ChatViewMsg::UserSendMessage(text),
            });

        let scrolled_window = gtk::ScrolledWindow::new();
        let welcome_page = adw::StatusPage::new();
        welcome_page.set_child(Some(&build_welcome_content(&sender)));

        let model = Self {
            messages,
            input_area,
            thread_id: None,
            loading: false,
            scrolled_window: scrolled_window.clone(),
            user_scrolled_up: false,
        };

        let message_list = model.messages.widget();
        let welcome_page = &welcome_page;
        let scrolled_window = &scrolled_window;
        let widgets = view_output!();

        let sender_scroll = sender.input_sender().clone();
        scrolled_window
            .vadjustment()
            .connect_value_changed(move |_| {
                sender_scroll
                    .send(ChatViewMsg::ScrollPositionChanged)
                    .unwrap();
            });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>, _root: &Self::Root) {
        match msg {
            ChatViewMsg::ShowThread { id, messages } => {
                let mut guard = self.messages.guard();
                let shown = guard.len();
                let same_thread = id.is_some() && id == self.thread_id;

                if same_thread && messages.len() >= shown {
                    for message in messages.into_iter().skip(shown) {
                        guard.push_back(message);
                    }
                } else {
                    guard.clear();
                    for message in messages {
                        guard.push_back(message);
                    }
                }
                drop(guard);

                self.thread_id = id;
                sender.input(ChatViewMsg::ScrollToBottom);
            }
            ChatViewMsg::SetLoading(loading) => {
                self.loading = loading;
                self.input_area.emit(InputAreaMsg::SetSending(loading));
                if loading {
                    sender.input(ChatViewMsg::ScrollToBottom);
                }
            }
            ChatViewMsg::SetSearchMode(search_mode) => {
                self.input_area.emit(InputAreaMsg::SetSearchMode(search_mode));
            }
            ChatViewMsg::PrefillInput(text) => {
                self.input_area.emit(InputAreaMsg::SetText(text));
            }
            ChatViewMsg::ScrollToBottom => {
                self.user_scrolled_up = false;
                let adj = self.scrolled_window.vadjustment();
                glib::idle_add_local_once(move || {
                    adj.set_value(adj.upper());
                });
            }
            ChatViewMsg::ScrollPositionChanged => {
                let adj = self.scrolled_window.vadjustment();
                let at_bottom = adj.value() >= adj.upper() - adj.page_size() - 50.0;
                self.user_scrolled_up = !at_bottom;
            }
            ChatViewMsg::UserSendMessage(text) => {
                let _ = sender.output(ChatViewOutput::SendMessage(text));
            }
            ChatViewMsg::CopyToClipboard(content) => {
                if let Some(display) = gtk::gdk::Display::default() {
                    display.clipboard().set_text(&content);
                }
            }
        }
    }
}

fn build_welcome_content(sender: &ComponentSender<ChatView>) -> gtk::Box {
    let content = gtk::Box::builder()
        .orientation(gtk::Orientation::Vertical)
        .spacing(24)
        .halign(gtk::Align::Center)
        .build();

    let examples = gtk::FlowBox::builder()
        .selection_mode(gtk::SelectionMode::None)
        .max_children_per_line(2)
        .min_children_per_line(1)
        .column_spacing(8)
        .row_spacing(8)
        .homogeneous(true)
        .build();
    for (label, query) in EXAMPLE_QUERIES {
        let button = gtk::Button::builder()
            .label(label)
            .tooltip_text(query)
            .build();
        button.add_css_class("pill");
        let sender_example = sender.input_sender().clone();
        button.connect_clicked(move |_| {
            sender_example
                .send(ChatViewMsg::PrefillInput(query.to_string()))
                .unwrap();
        });
        examples.append(&button);
    }
    content.append(&examples);

    let tips = gtk::Box::builder()
        .orientation(gtk::Orientation::Vertical)
        .spacing(4)
        .halign(gtk::Align::Center)
        .build();
    let tips_heading = gtk::Label::new(Some("Search Tips"));
    tips_heading.add_css_class("heading");
    tips.append(&tips_heading);
    for tip in SEARCH_TIPS {
        let tip_label = gtk::Label::builder()
            .label(format!("• {}", tip))
            .halign(gtk::Align::Start)
            .build();
        tip_label.add_css_class("dim-label");
        tips.append(&tip_label);
    }
    content.append(&tips);

    content
}
