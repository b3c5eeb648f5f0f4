use std::collections::HashMap;

/// Label lookup keyed by (label, locale). A missing table or key falls back
/// to the raw label, never an error.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    tables: HashMap<String, HashMap<String, String>>,
}

impl Translations {
    pub fn new(tables: HashMap<String, HashMap<String, String>>) -> Self {
        Self { tables }
    }

    /// Load one `<locale>.json` table per file from a directory, on top of
    /// the built-in defaults.
    pub fn load_dir(dir: &str) -> anyhow::Result<Self> {
        let mut translations = Self::default_tables();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(locale) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let raw = std::fs::read_to_string(&path)?;
            let table: HashMap<String, String> = serde_json::from_str(&raw)?;
            translations
                .tables
                .entry(locale.to_string())
                .or_default()
                .extend(table);
        }
        Ok(translations)
    }

    pub fn resolve(&self, label: &str, locale: &str) -> String {
        self.tables
            .get(locale)
            .and_then(|table| table.get(label))
            .cloned()
            .unwrap_or_else(|| label.to_string())
    }

    /// Built-in tables for the stock menu labels.
    pub fn default_tables() -> Self {
        let mut tables: HashMap<String, HashMap<String, String>> = HashMap::new();
        let entries: &[(&str, &[(&str, &str)])] = &[
            (
                "uz",
                &[
                    ("menu.dashboard", "Boshqaruv paneli"),
                    ("menu.students", "Talabalar"),
                    ("menu.employees", "Xodimlar"),
                    ("menu.groups", "Guruhlar"),
                    ("menu.reports", "Hisobotlar"),
                    ("menu.reports.contingent", "Kontingent"),
                    ("menu.reports.performance", "O'zlashtirish"),
                    ("menu.reports.export", "Eksport"),
                    ("menu.administration", "Boshqaruv"),
                    ("menu.administration.roles", "Rollar"),
                    ("menu.administration.clients", "OAuth mijozlar"),
                ],
            ),
            (
                "ru",
                &[
                    ("menu.dashboard", "Панель управления"),
                    ("menu.students", "Студенты"),
                    ("menu.employees", "Сотрудники"),
                    ("menu.groups", "Группы"),
                    ("menu.reports", "Отчёты"),
                    ("menu.reports.contingent", "Контингент"),
                    ("menu.reports.performance", "Успеваемость"),
                    ("menu.reports.export", "Экспорт"),
                    ("menu.administration", "Администрирование"),
                    ("menu.administration.roles", "Роли"),
                    ("menu.administration.clients", "OAuth клиенты"),
                ],
            ),
            (
                "en",
                &[
                    ("menu.dashboard", "Dashboard"),
                    ("menu.students", "Students"),
                    ("menu.employees", "Employees"),
                    ("menu.groups", "Groups"),
                    ("menu.reports", "Reports"),
                    ("menu.reports.contingent", "Contingent"),
                    ("menu.reports.performance", "Performance"),
                    ("menu.reports.export", "Export"),
                    ("menu.administration", "Administration"),
                    ("menu.administration.roles", "Roles"),
                    ("menu.administration.clients", "OAuth clients"),
                ],
            ),
        ];
        for (locale, pairs) in entries {
            let table = pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect();
            tables.insert(locale.to_string(), table);
        }
        Self { tables }
    }
}

#[cfg(test)]
mod tests {
    use super::Translations;

    #[test]
    fn resolves_known_labels_per_locale() {
        let translations = Translations::default_tables();

        assert_eq!(translations.resolve("menu.students", "uz"), "Talabalar");
        assert_eq!(translations.resolve("menu.students", "ru"), "Студенты");
        assert_eq!(translations.resolve("menu.students", "en"), "Students");
    }

    #[test]
    fn missing_key_or_locale_falls_back_to_raw_label() {
        let translations = Translations::default_tables();

        assert_eq!(
            translations.resolve("menu.unknown", "en"),
            "menu.unknown"
        );
        assert_eq!(
            translations.resolve("menu.students", "de"),
            "menu.students"
        );
    }
}
