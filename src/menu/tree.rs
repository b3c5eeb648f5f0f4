use serde::{Deserialize, Serialize};

/// One node of the configured navigation tree. `label` is a translation key;
/// `permission` gates visibility; nodes without children are navigable leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub permission: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub children: Vec<MenuItem>,
}

fn default_active() -> bool {
    true
}

impl MenuItem {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            url: None,
            icon: None,
            permission: None,
            order: None,
            active: true,
            children: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn with_permission(mut self, permission: &str) -> Self {
        self.permission = Some(permission.to_string());
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_children(mut self, children: Vec<MenuItem>) -> Self {
        self.children = children;
        self
    }
}

/// Sort one sibling level: explicitly ordered nodes ascending first, the rest
/// in their configured sequence. Applied independently at every depth.
pub fn sort_siblings(items: &mut [MenuItem]) {
    items.sort_by_key(|item| match item.order {
        Some(order) => (0, order),
        None => (1, 0),
    });
    for item in items.iter_mut() {
        sort_siblings(&mut item.children);
    }
}

/// Load a menu tree from a JSON file.
pub fn load_menu_file(path: &str) -> anyhow::Result<Vec<MenuItem>> {
    let raw = std::fs::read_to_string(path)?;
    let items: Vec<MenuItem> = serde_json::from_str(&raw)?;
    Ok(items)
}

/// Built-in tree used when no menu file is configured. Mirrors the default
/// HEMIS navigation groups.
pub fn default_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::new("dashboard", "menu.dashboard")
            .with_url("/dashboard")
            .with_icon("home")
            .with_order(1),
        MenuItem::new("students", "menu.students")
            .with_url("/students")
            .with_icon("users")
            .with_permission("student.view")
            .with_order(2),
        MenuItem::new("employees", "menu.employees")
            .with_url("/employees")
            .with_icon("briefcase")
            .with_permission("employee.view")
            .with_order(3),
        MenuItem::new("groups", "menu.groups")
            .with_url("/groups")
            .with_icon("layers")
            .with_permission("group.view")
            .with_order(4),
        MenuItem::new("reports", "menu.reports")
            .with_icon("bar-chart")
            .with_permission("report.*")
            .with_order(5)
            .with_children(vec![
                MenuItem::new("reports-contingent", "menu.reports.contingent")
                    .with_url("/reports/contingent")
                    .with_permission("report.contingent"),
                MenuItem::new("reports-performance", "menu.reports.performance")
                    .with_url("/reports/performance")
                    .with_permission("report.performance"),
                MenuItem::new("reports-export", "menu.reports.export")
                    .with_url("/reports/export")
                    .with_permission("report.export"),
            ]),
        MenuItem::new("administration", "menu.administration")
            .with_icon("settings")
            .with_children(vec![
                MenuItem::new("admin-roles", "menu.administration.roles")
                    .with_url("/admin/roles")
                    .with_permission("admin.roles"),
                MenuItem::new("admin-clients", "menu.administration.clients")
                    .with_url("/admin/oauth-clients")
                    .with_permission("admin.clients"),
            ]),
    ]
}
