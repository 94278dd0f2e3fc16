use adw::prelude::*;
use chrono::{Local, NaiveDate};
use relm4::factory::FactoryVecDeque;
use relm4::prelude::*;

use crate::models::{Category, CategoryFilter, ChatThread, ThreadId};
use crate::services::filter::{category_count, group_by_date, new_thread_title, ThreadFilter};

const MENU_WIDTH: f64 = 200.0;
const MENU_HEIGHT: f64 = 250.0;
const MENU_MARGIN: f64 = 10.0;

/// Keep a context menu opened at (x, y) fully inside a viewport of the given
/// size, at least `MENU_MARGIN` away from every edge.
pub fn clamp_menu_position(x: f64, y: f64, viewport_width: f64, viewport_height: f64) -> (f64, f64) {
    let max_x = (viewport_width - MENU_WIDTH - MENU_MARGIN).max(MENU_MARGIN);
    let max_y = (viewport_height - MENU_HEIGHT - MENU_MARGIN).max(MENU_MARGIN);
    (x.clamp(MENU_MARGIN, max_x), y.clamp(MENU_MARGIN, max_y))
}

/// Clamp a menu opened at list coordinates (x, y) against the visible part
/// of a list scrolled down by `scroll_offset`. Returns list coordinates.
pub fn menu_anchor(
    x: f64,
    y: f64,
    scroll_offset: f64,
    viewport_width: f64,
    viewport_height: f64,
) -> (f64, f64) {
    let (x, y) = clamp_menu_position(x, y - scroll_offset, viewport_width, viewport_height);
    (x, y + scroll_offset)
}

/// Rows shown for `threads` under `filter`: a header per date group followed
/// by its threads. Positions shift whenever the visible set changes, so rows
/// are addressed by thread id once an action is pending.
fn sidebar_rows(
    threads: &[ChatThread],
    filter: &ThreadFilter,
    active: Option<ThreadId>,
    today: NaiveDate,
) -> Vec<SidebarItem> {
    let visible = filter.apply(threads);
    let mut rows = Vec::with_capacity(visible.len());
    for group in group_by_date(&visible, today) {
        rows.push(SidebarItem::Header(group.label));
        for thread in group.threads {
            rows.push(SidebarItem::thread(thread, Some(thread.id) == active));
        }
    }
    rows
}

// --- SidebarItem: date headers vs thread rows ---

#[derive(Debug, Clone)]
pub enum SidebarItem {
    Header(String), // "Today", "Yesterday", "Oct 3, 2026"
    Thread {
        id: ThreadId,
        title: String,
        category: Option<Category>,
        message_count: usize,
        active: bool,
    },
}

impl SidebarItem {
    fn thread(thread: &ChatThread, active: bool) -> Self {
        SidebarItem::Thread {
            id: thread.id,
            title: thread.title.clone(),
            category: thread.category,
            message_count: thread.messages.len(),
            active,
        }
    }

    fn thread_id(&self) -> Option<ThreadId> {
        match self {
            SidebarItem::Header(_) => None,
            SidebarItem::Thread { id, .. } => Some(*id),
        }
    }
}

// --- ThreadRow factory component ---

#[derive(Debug)]
pub struct ThreadRow {
    pub item: SidebarItem,
}

#[relm4::factory(pub)]
impl FactoryComponent for ThreadRow {
    type Init = SidebarItem;
    type Input = ();
    type Output = ();
    type CommandOutput = ();
    type ParentWidget = gtk::ListBox;

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Vertical,
            set_spacing: 2,
            set_margin_all: 6,
        }
    }

    fn init_model(item: Self::Init, _index: &DynamicIndex, _sender: FactorySender<Self>) -> Self {
        Self { item }
    }

    fn init_widgets(
        &mut self,
        _index: &DynamicIndex,
        root: Self::Root,
        returned_widget: &<Self::ParentWidget as relm4::factory::FactoryView>::ReturnedWidget,
        _sender: FactorySender<Self>,
    ) -> Self::Widgets {
        match &self.item {
            SidebarItem::Header(label) => {
                let header_label = gtk::Label::builder()
                    .label(label)
                    .halign(gtk::Align::Start)
                    .margin_top(8)
                    .margin_bottom(2)
                    .margin_start(4)
                    .build();
                header_label.add_css_class("dim-label");
                header_label.add_css_class("caption");
                header_label.add_css_class("sidebar-date-header");
                root.append(&header_label);

                returned_widget.set_activatable(false);
                returned_widget.set_selectable(false);
            }
            SidebarItem::Thread {
                title,
                category,
                message_count,
                active,
                ..
            } => {
                let title_box = gtk::Box::builder()
                    .orientation(gtk::Orientation::Horizontal)
                    .spacing(6)
                    .build();

                if let Some(category) = category {
                    let icon = gtk::Label::new(Some(category.icon()));
                    icon.set_tooltip_text(Some(category.display_name()));
                    title_box.append(&icon);
                }

                let title_label = gtk::Label::builder()
                    .label(title)
                    .halign(gtk::Align::Start)
                    .ellipsize(gtk::pango::EllipsizeMode::End)
                    .max_width_chars(30)
                    .build();
                title_label.add_css_class("heading");
                title_box.append(&title_label);
                root.append(&title_box);

                let count_label = gtk::Label::builder()
                    .label(match message_count {
                        1 => "1 message".to_string(),
                        n => format!("{} messages", n),
                    })
                    .halign(gtk::Align::Start)
                    .build();
                count_label.add_css_class("dim-label");
                count_label.add_css_class("caption");
                root.append(&count_label);

                if *active {
                    returned_widget.add_css_class("active-thread");
                }
            }
        }

        let widgets = view_output!();
        widgets
    }
}

// --- Sidebar component ---

pub struct Sidebar {
    rows: FactoryVecDeque<ThreadRow>,
    scrolled_window: gtk::ScrolledWindow,
    threads: Vec<ChatThread>,
    active: Option<ThreadId>,
    filter: ThreadFilter,
    category_buttons: Vec<(CategoryFilter, gtk::ToggleButton)>,
}

#[derive(Debug)]
pub enum SidebarMsg {
    SetThreads {
        threads: Vec<ChatThread>,
        active: Option<ThreadId>,
    },
    NewChat,
    RowActivated(usize),
    SearchChanged(String),
    CategorySelected(CategoryFilter),
    ClearAll,
    // Context menu
    ShowContextMenu(f64, f64, usize), // x, y, index
    DeleteThread(ThreadId),
    MoveThread(ThreadId, Category),
}

#[derive(Debug)]
pub enum SidebarOutput {
    NewChat(Category),
    ThreadSelected(ThreadId),
    DeleteThread(ThreadId),
    SetCategory(ThreadId, Category),
    ClearAll,
}

#[relm4::component(pub)]
impl Component for Sidebar {
    type Init = ();
    type Input = SidebarMsg;
    type Output = SidebarOutput;
    type CommandOutput = ();

    view! {
        adw::ToolbarView {
            add_top_bar = &adw::HeaderBar {
                set_show_end_title_buttons: false,

                pack_start = &gtk::Button {
                    set_icon_name: "list-add-symbolic",
                    #[watch]
                    set_tooltip_text: Some(new_thread_title(model.filter.category.new_thread_category()).as_str()),
                    connect_clicked => SidebarMsg::NewChat,
                },

                #[wrap(Some)]
                set_title_widget = &adw::WindowTitle {
                    set_title: crate::config::APP_NAME,
                },
            },

            #[wrap(Some)]
            set_content = &gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 0,

                gtk::SearchEntry {
                    set_placeholder_text: Some("Search chats..."),
                    set_margin_start: 8,
                    set_margin_end: 8,
                    set_margin_top: 4,
                    set_margin_bottom: 4,
                    connect_search_changed[sender] => move |entry| {
                        sender.input(SidebarMsg::SearchChanged(entry.text().to_string()));
                    },
                },

                #[local_ref]
                category_box -> gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: 2,
                    set_margin_start: 8,
                    set_margin_end: 8,
                    set_margin_bottom: 4,
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_margin_start: 12,
                    set_margin_end: 8,
                    set_margin_top: 4,

                    gtk::Label {
                        set_label: "Chat History",
                        set_hexpand: true,
                        set_halign: gtk::Align::Start,
                        add_css_class: "heading",
                    },

                    gtk::Button {
                        set_label: "Clear All",
                        add_css_class: "flat",
                        add_css_class: "destructive-action",
                        #[watch]
                        set_sensitive: !model.threads.is_empty(),
                        connect_clicked => SidebarMsg::ClearAll,
                    },
                },

                #[local_ref]
                scrolled_window -> gtk::ScrolledWindow {
                    set_hscrollbar_policy: gtk::PolicyType::Never,
                    set_vexpand: true,

                    #[local_ref]
                    thread_list -> gtk::ListBox {
                        set_selection_mode: gtk::SelectionMode::Single,
                        add_css_class: "navigation-sidebar",
                    },
                },
            },
        }
    }

    fn init(
        _init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let rows = FactoryVecDeque::builder()
            .launch(gtk::ListBox::default())
            .detach();

        let category_box = gtk::Box::default();
        let mut category_buttons = Vec::with_capacity(CategoryFilter::TAGS.len());
        for tag in CategoryFilter::TAGS {
            let button = gtk::ToggleButton::builder()
                .label(category_label(tag, 0))
                .active(tag == CategoryFilter::All)
                .build();
            button.add_css_class("flat");
            button.set_widget_name(tag.as_str());
            if let Some(child) = button.child().and_downcast::<gtk::Label>() {
                child.set_xalign(0.0);
            }
            if let Some((_, first)) = category_buttons.first() {
                button.set_group(Some(first));
            }
            let sender_tag = sender.input_sender().clone();
            button.connect_toggled(move |b| {
                if b.is_active() {
                    sender_tag.send(SidebarMsg::CategorySelected(tag)).unwrap();
                }
            });
            category_box.append(&button);
            category_buttons.push((tag, button));
        }

        let model = Self {
            rows,
            scrolled_window: gtk::ScrolledWindow::new(),
            threads: Vec::new(),
            active: None,
            filter: ThreadFilter::new(CategoryFilter::All, ""),
            category_buttons,
        };

        let thread_list = model.rows.widget();
        let scrolled_window = &model.scrolled_window;
        let category_box = &category_box;
        let widgets = view_output!();

        let sender_row = sender.clone();
        thread_list.connect_row_activated(move |_, row| {
            sender_row.input(SidebarMsg::RowActivated(row.index() as usize));
        });

        // Right-click context menu
        let gesture = gtk::GestureClick::new();
        gesture.set_button(3);
        let list = thread_list.clone();
        let sender_rc = sender.clone();
        gesture.connect_released(move |_, _, x, y| {
            if let Some(row) = list.row_at_y(y as i32) {
                sender_rc.input(SidebarMsg::ShowContextMenu(x, y, row.index() as usize));
            }
        });
        thread_list.add_controller(gesture);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>, _root: &Self::Root) {
        match msg {
            SidebarMsg::SetThreads { threads, active } => {
                self.threads = threads;
                self.active = active;
                self.rebuild();
            }
            SidebarMsg::NewChat => {
                let category = self.filter.category.new_thread_category();
                self.select_category(CategoryFilter::Only(category));
                let _ = sender.output(SidebarOutput::NewChat(category));
            }
            SidebarMsg::RowActivated(index) => {
                if let Some(id) = self.thread_at(index) {
                    let _ = sender.output(SidebarOutput::ThreadSelected(id));
                }
            }
            SidebarMsg::SearchChanged(term) => {
                self.filter.set_search(&term);
                self.rebuild();
            }
            SidebarMsg::CategorySelected(tag) => {
                if self.filter.category != tag {
                    self.filter.category = tag;
                    self.rebuild();
                }
            }
            SidebarMsg::ClearAll => {
                let _ = sender.output(SidebarOutput::ClearAll);
            }
            SidebarMsg::ShowContextMenu(x, y, index) => {
                if let Some(id) = self.thread_at(index) {
                    self.show_context_menu(x, y, id, &sender);
                }
            }
            SidebarMsg::DeleteThread(id) => {
                let _ = sender.output(SidebarOutput::DeleteThread(id));
            }
            SidebarMsg::MoveThread(id, category) => {
                let _ = sender.output(SidebarOutput::SetCategory(id, category));
            }
        }
    }
}

impl Sidebar {
    fn thread_at(&self, index: usize) -> Option<ThreadId> {
        self.rows.get(index).and_then(|row| row.item.thread_id())
    }

    /// Activate a category tag; the toggle handler then applies the filter.
    fn select_category(&mut self, tag: CategoryFilter) {
        if let Some((_, button)) = self.category_buttons.iter().find(|(t, _)| *t == tag) {
            button.set_active(true);
        }
        self.filter.category = tag;
    }

    fn rebuild(&mut self) {
        let today = Local::now().date_naive();
        let rows = sidebar_rows(&self.threads, &self.filter, self.active, today);
        let active_index = rows
            .iter()
            .position(|row| matches!(row, SidebarItem::Thread { active: true, .. }));

        let mut guard = self.rows.guard();
        guard.clear();
        for row in rows {
            guard.push_back(row);
        }
        drop(guard);

        let list = self.rows.widget();
        match active_index.and_then(|i| list.row_at_index(i as i32)) {
            Some(row) => list.select_row(Some(&row)),
            None => list.unselect_all(),
        }

        for (tag, button) in &self.category_buttons {
            button.set_label(&category_label(*tag, category_count(&self.threads, *tag)));
        }
    }

    fn show_context_menu(
        &self,
        x: f64,
        y: f64,
        id: ThreadId,
        sender: &ComponentSender<Self>,
    ) {
        let list_widget = self.rows.widget();

        let menu = gio::Menu::new();
        menu.append(Some("Delete"), Some("sidebar.delete"));
        let move_section = gio::Menu::new();
        for category in Category::ALL {
            let item = gio::MenuItem::new(
                Some(&format!("Move to {} {}", category.icon(), category.display_name())),
                None,
            );
            item.set_action_and_target_value(
                Some("sidebar.move"),
                Some(&category.as_str().to_variant()),
            );
            move_section.append_item(&item);
        }
        menu.append_section(None, &move_section);

        let action_group = gio::SimpleActionGroup::new();

        let sender_delete = sender.input_sender().clone();
        let delete_action = gio::SimpleAction::new("delete", None);
        delete_action.connect_activate(move |_, _| {
            sender_delete.send(SidebarMsg::DeleteThread(id)).unwrap();
        });
        action_group.add_action(&delete_action);

        let sender_move = sender.input_sender().clone();
        let move_action = gio::SimpleAction::new("move", Some(glib::VariantTy::STRING));
        move_action.connect_activate(move |_, param| {
            let category = param
                .and_then(|p| p.get::<String>())
                .and_then(|s| Category::from_str(&s));
            if let Some(category) = category {
                sender_move.send(SidebarMsg::MoveThread(id, category)).unwrap();
            }
        });
        action_group.add_action(&move_action);

        list_widget.insert_action_group("sidebar", Some(&action_group));

        let (x, y) = menu_anchor(
            x,
            y,
            self.scrolled_window.vadjustment().value(),
            self.scrolled_window.width() as f64,
            self.scrolled_window.height() as f64,
        );
        let popover = gtk::PopoverMenu::from_model(Some(&menu));
        popover.set_parent(list_widget);
        popover.set_pointing_to(Some(&gtk::gdk::Rectangle::new(x as i32, y as i32, 1, 1)));
        popover.set_has_arrow(true);

        // Unparent after the action has run
        let parent = list_widget.clone();
        popover.connect_closed(move |p| {
            let popover = p.clone();
            let parent = parent.clone();
            glib::idle_add_local_once(move || {
                popover.unparent();
                parent.insert_action_group("sidebar", None::<&gio::SimpleActionGroup>);
            });
        });

        popover.popup();
    }
}

fn category_label(tag: CategoryFilter, count: usize) -> String {
    format!("{} {} ({})", tag.icon(), tag.display_name(), count)
}
