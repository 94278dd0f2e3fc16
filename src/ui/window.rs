use adw::prelude::*;

use crate::config;

pub const NEW_CHAT_ACCEL: &str = "<Control>n";
pub const TOGGLE_SIDEBAR_ACCEL: &str = "F9";
pub const SHORTCUTS_ACCEL: &str = "<Control>slash";

/// Rows of the shortcuts window, grouped: (group title, [(title, accelerator)]).
const SHORTCUT_GROUPS: [(&str, &[(&str, &str)]); 2] = [
    (
        "General",
        &[
            ("New chat", NEW_CHAT_ACCEL),
            ("Toggle sidebar", TOGGLE_SIDEBAR_ACCEL),
            ("Keyboard shortcuts", SHORTCUTS_ACCEL),
        ],
    ),
    ("Chat", &[("Send message", "Return")]),
];

pub fn create_shortcuts_window(parent: &adw::ApplicationWindow) {
    let section = gtk::ShortcutsSection::builder()
        .title(config::APP_NAME)
        .build();

    for (group_title, shortcuts) in SHORTCUT_GROUPS {
        let group = gtk::ShortcutsGroup::builder().title(group_title).build();
        for &(title, accelerator) in shortcuts {
            let shortcut = gtk::ShortcutsShortcut::builder()
                .title(title)
                .accelerator(accelerator)
                .build();
            group.add_shortcut(&shortcut);
        }
        section.add_group(&group);
    }

    let window = gtk::ShortcutsWindow::builder()
        .transient_for(parent)
        .modal(true)
        .build();
    window.add_section(&section);
    window.present();
}

pub fn create_about_dialog(parent: &adw::ApplicationWindow) {
    let about = adw::AboutWindow::builder()
        .application_name(config::APP_NAME)
        .version(config::VERSION)
        .developer_name("Scout Contributors")
        .license_type(gtk::License::Gpl30)
        .comments("Chat with the web: search results as answers")
        .application_icon("system-search")
        .build();
    about.set_transient_for(Some(parent));
    about.present();
}
