use std::sync::Arc;

use adw::prelude::*;
use relm4::prelude::*;

use crate::config::{self, SearchConfig};
use crate::models::{Category, ChatThread, Message, ThreadId};
use crate::providers::{GoogleSearchProvider, SearchProvider};
use crate::services::chat::{self, SearchRequest};
use crate::services::filter::new_thread_title;
use crate::services::format::ResponseMode;
use crate::services::{ChatStore, Database, HistoryService};
use crate::ui::chat_view::{ChatView, ChatViewMsg, ChatViewOutput};
use crate::ui::sidebar::{Sidebar, SidebarMsg, SidebarOutput};
use crate::ui::window::{NEW_CHAT_ACCEL, SHORTCUTS_ACCEL, TOGGLE_SIDEBAR_ACCEL};

pub struct App {
    db: Option<Database>,
    store: ChatStore,
    provider: Option<Arc<dyn SearchProvider>>,
    sidebar: Controller<Sidebar>,
    chat_view: Controller<ChatView>,
    toast_overlay: adw::ToastOverlay,
    initialized: bool,
    busy: bool,
}

#[derive(Debug)]
pub enum AppMsg {
    NewChat,
    NewCategoryChat(Category),
    ThreadSelected(ThreadId),
    DeleteThread(ThreadId),
    SetCategory(ThreadId, Category),
    ClearAll,
    SendMessage(String),
    ShowAbout,
    ShowShortcuts,
}

#[derive(Debug)]
pub enum AppCmd {
    Initialized(Database, Vec<ChatThread>),
    InitFailed(String),
    SearchFinished {
        thread_id: ThreadId,
        message: Message,
    },
}

#[relm4::component(pub, async)]
impl AsyncComponent for App {
    type Init = ();
    type Input = AppMsg;
    type Output = ();
    type CommandOutput = AppCmd;

    view! {
        adw::ApplicationWindow {
            set_title: Some(config::APP_NAME),
            set_default_width: 1100,
            set_default_height: 760,
            set_width_request: 360,
            set_height_request: 480,

            #[local_ref]
            toast_overlay -> adw::ToastOverlay {},
        }
    }

    async fn init(
        _init: Self::Init,
        root: Self::Root,
        sender: AsyncComponentSender<Self>,
    ) -> AsyncComponentParts<Self> {
        let sidebar = Sidebar::builder()
            .launch(())
            .forward(sender.input_sender(), |output| match output {
                SidebarOutput::NewChat(category) => AppMsg::NewCategoryChat(category),
                SidebarOutput::ThreadSelected(id) => AppMsg::ThreadSelected(id),
                SidebarOutput::DeleteThread(id) => AppMsg::DeleteThread(id),
                SidebarOutput::SetCategory(id, category) => AppMsg::SetCategory(id, category),
                SidebarOutput::ClearAll => AppMsg::ClearAll,
            });

        let chat_view = ChatView::builder()
            .launch(())
            .forward(sender.input_sender(), |output| match output {
                ChatViewOutput::SendMessage(text) => AppMsg::SendMessage(text),
            });

        let google = Self::build_provider();

        let toast_overlay = adw::ToastOverlay::new();
        toast_overlay.set_hexpand(true);
        toast_overlay.set_vexpand(true);

        // Content side: header with sidebar toggle and app menu, then the chat view
        let content_header = adw::HeaderBar::new();

        let sidebar_toggle = gtk::ToggleButton::builder()
            .icon_name("sidebar-show-symbolic")
            .tooltip_text("Toggle Sidebar")
            .active(true)
            .build();
        content_header.pack_start(&sidebar_toggle);

        let menu = gio::Menu::new();
        menu.append(Some("Keyboard Shortcuts"), Some("app.show-shortcuts"));
        menu.append(Some("About Scout"), Some("app.about"));
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu)
            .build();
        content_header.pack_end(&menu_button);

        let content_toolbar = adw::ToolbarView::new();
        content_toolbar.add_top_bar(&content_header);
        content_toolbar.set_content(Some(chat_view.widget()));

        let split_view = adw::OverlaySplitView::new();
        split_view.set_hexpand(true);
        split_view.set_vexpand(true);
        split_view.set_min_sidebar_width(220.0);
        split_view.set_max_sidebar_width(320.0);
        split_view.set_sidebar(Some(sidebar.widget()));
        split_view.set_content(Some(&content_toolbar));

        sidebar_toggle
            .bind_property("active", &split_view, "show-sidebar")
            .bidirectional()
            .sync_create()
            .build();

        // Narrow windows overlay the sidebar instead of docking it
        if let Ok(condition) = adw::BreakpointCondition::parse("max-width: 600px") {
            let breakpoint = adw::Breakpoint::new(condition);
            breakpoint.add_setter(&split_view, "collapsed", Some(&true.to_value()));
            root.add_breakpoint(breakpoint);
        }

        toast_overlay.set_child(Some(&split_view));

        let model = App {
            db: None,
            store: ChatStore::default(),
            provider: google.clone().map(|g| g as Arc<dyn SearchProvider>),
            sidebar,
            chat_view,
            toast_overlay: toast_overlay.clone(),
            initialized: false,
            busy: false,
        };

        let toast_overlay = &model.toast_overlay;
        let widgets = view_output!();

        // Set up app actions
        let app = relm4::main_adw_application();

        let sender_about = sender.input_sender().clone();
        let about_action = gio::SimpleAction::new("about", None);
        about_action.connect_activate(move |_, _| {
            sender_about.send(AppMsg::ShowAbout).unwrap();
        });
        app.add_action(&about_action);

        let sender_shortcuts = sender.input_sender().clone();
        let shortcuts_action = gio::SimpleAction::new("show-shortcuts", None);
        shortcuts_action.connect_activate(move |_, _| {
            sender_shortcuts.send(AppMsg::ShowShortcuts).unwrap();
        });
        app.add_action(&shortcuts_action);
        app.set_accels_for_action("app.show-shortcuts", &[SHORTCUTS_ACCEL]);

        let sender_new = sender.input_sender().clone();
        let new_chat_action = gio::SimpleAction::new("new-chat", None);
        new_chat_action.connect_activate(move |_, _| {
            sender_new.send(AppMsg::NewChat).unwrap();
        });
        app.add_action(&new_chat_action);
        app.set_accels_for_action("app.new-chat", &[NEW_CHAT_ACCEL]);

        let toggle_action = gio::SimpleAction::new("toggle-sidebar", None);
        let split_view_toggle = split_view.clone();
        toggle_action.connect_activate(move |_, _| {
            split_view_toggle.set_show_sidebar(!split_view_toggle.shows_sidebar());
        });
        app.add_action(&toggle_action);
        app.set_accels_for_action("app.toggle-sidebar", &[TOGGLE_SIDEBAR_ACCEL]);

        // Startup check: a bad key or engine id shows up in the log right away
        if let Some(google) = google {
            sender.command(move |_out, _| {
                Box::pin(async move {
                    match google.check_connection().await {
                        Ok(()) => tracing::info!("Search API reachable"),
                        Err(e) => tracing::warn!("Search API check failed: {}", e),
                    }
                })
            });
        }

        // Async initialization
        sender.command(|out, _| {
            Box::pin(async move {
                match Self::async_init().await {
                    Ok((db, threads)) => out.send(AppCmd::Initialized(db, threads)).unwrap(),
                    Err(e) => out.send(AppCmd::InitFailed(format!("{:#}", e))).unwrap(),
                }
            })
        });

        AsyncComponentParts { model, widgets }
    }

    async fn update(
        &mut self,
        msg: Self::Input,
        sender: AsyncComponentSender<Self>,
        root: &Self::Root,
    ) {
        match msg {
            AppMsg::NewChat => {
                if self.initialized {
                    self.store.create_thread();
                }
            }
            AppMsg::NewCategoryChat(category) => {
                if self.initialized {
                    let id = self.store.create_thread().id;
                    self.store.set_category(id, Some(category));
                    self.store.rename_thread(id, new_thread_title(category));
                }
            }
            AppMsg::ThreadSelected(id) => {
                if !self.store.select_thread(id) {
                    tracing::warn!(id, "Selected thread no longer exists");
                }
            }
            AppMsg::DeleteThread(id) => {
                self.store.delete_thread(id);
            }
            AppMsg::SetCategory(id, category) => {
                self.store.set_category(id, Some(category));
            }
            AppMsg::ClearAll => {
                self.store.clear_all();
            }
            AppMsg::SendMessage(text) => {
                self.handle_send_message(text, &sender);
            }
            AppMsg::ShowAbout => {
                crate::ui::window::create_about_dialog(root);
            }
            AppMsg::ShowShortcuts => {
                crate::ui::window::create_shortcuts_window(root);
            }
        }

        self.commit().await;
    }

    async fn update_cmd(
        &mut self,
        msg: Self::CommandOutput,
        _sender: AsyncComponentSender<Self>,
        _root: &Self::Root,
    ) {
        match msg {
            AppCmd::Initialized(db, threads) => {
                tracing::info!(count = threads.len(), "Loaded chat history");
                self.db = Some(db);
                self.store = ChatStore::new(threads);
                self.initialized = true;
                self.refresh_views();
            }
            AppCmd::InitFailed(err) => {
                tracing::error!("Failed to open chat history: {}", err);
                self.show_toast("Chat history is unavailable; this session will not be saved");
                self.initialized = true;
                self.refresh_views();
            }
            AppCmd::SearchFinished { thread_id, message } => {
                self.busy = false;
                self.chat_view.emit(ChatViewMsg::SetLoading(false));
                if self.store.append_message(Some(thread_id), message).is_none() {
                    tracing::info!(thread_id, "Dropping reply for deleted thread");
                }
                self.commit().await;
            }
        }
    }
}

impl App {
    async fn async_init() -> anyhow::Result<(Database, Vec<ChatThread>)> {
        let db = Database::new().await?;
        let threads = HistoryService::load(&db).await?;
        Ok((db, threads))
    }

    fn build_provider() -> Option<Arc<GoogleSearchProvider>> {
        match SearchConfig::from_env() {
            Ok(config) => {
                tracing::debug!(?config, "Search configured");
                Some(Arc::new(GoogleSearchProvider::new(&config)))
            }
            Err(e) => {
                tracing::warn!("Search disabled: {}", e);
                None
            }
        }
    }

    fn handle_send_message(&mut self, text: String, sender: &AsyncComponentSender<Self>) {
        if self.busy || !self.initialized {
            return;
        }

        let request = SearchRequest::from_input(&text);
        let Some(thread_id) = self.store.append_message(None, Message::user(text)) else {
            return;
        };

        let is_first = self
            .store
            .get(thread_id)
            .is_some_and(|t| t.messages.len() == 1);
        if is_first && !request.query.trim().is_empty() {
            self.store
                .rename_thread(thread_id, chat::truncate_title(&request.query));
        }

        self.busy = true;
        self.chat_view.emit(ChatViewMsg::SetLoading(true));
        self.chat_view.emit(ChatViewMsg::SetSearchMode(
            request.mode == ResponseMode::Search,
        ));

        let provider = self.provider.clone();
        sender.command(move |out, _| {
            Box::pin(async move {
                let message = chat::run_search(provider, request).await;
                out.send(AppCmd::SearchFinished { thread_id, message })
                    .unwrap();
            })
        });
    }

    /// Persist and redraw once per handled event, if anything changed.
    async fn commit(&mut self) {
        if !self.store.take_changed() {
            return;
        }

        if let Some(db) = &self.db {
            if let Err(e) = HistoryService::sync(db, self.store.threads()).await {
                tracing::error!("Failed to save chat history: {:#}", e);
                self.show_toast("Failed to save chat history");
            }
        }

        self.refresh_views();
    }

    fn refresh_views(&self) {
        self.sidebar.emit(SidebarMsg::SetThreads {
            threads: self.store.threads().to_vec(),
            active: self.store.active_id(),
        });
        self.chat_view.emit(ChatViewMsg::ShowThread {
            id: self.store.active_id(),
            messages: self
                .store
                .active()
                .map(|t| t.messages.clone())
                .unwrap_or_default(),
        });
    }

    fn show_toast(&self, message: &str) {
        let toast = adw::Toast::new(message);
        toast.set_timeout(3);
        self.toast_overlay.add_toast(toast);
    }
}
