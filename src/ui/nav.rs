const NAV_ITEMS: [(&str, &str); 3] = [
    ("/", "Home"),
    ("/conversations", "Conversations"),
    ("/alerts", "Alerts"),
];

/// Home is active only on `/`; other tabs stay active on their sub-paths.
pub fn is_active(tab: &str, path: &str) -> bool {
    if tab == "/" {
        path == "/"
    } else {
        path.starts_with(tab)
    }
}

pub fn render(path: &str) -> String {
    let tabs: Vec<String> = NAV_ITEMS
        .iter()
        .map(|(to, label)| {
            if is_active(to, path) {
                format!("[{}]", label)
            } else {
                format!(" {} ", label)
            }
        })
        .collect();
    format!("{}\n{}\n", tabs.join(" | "), "=".repeat(48))
}
