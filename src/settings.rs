use anyhow::{bail, Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};

pub const KEY_TOKEN: &str = "token";
pub const KEY_MARK_COMPLETED: &str = "mark_completed";
pub const KEY_ENABLE_LINK: &str = "enable_link";
pub const KEY_SHOW_ARCHIVED: &str = "show_archived";
pub const KEY_PIN_DEFAULT_LIST: &str = "pin_default_list";
pub const KEY_PINNED_PROJECTS: &str = "pinned_projects";

pub const KNOWN_KEYS: [&str; 6] = [
    KEY_TOKEN,
    KEY_MARK_COMPLETED,
    KEY_ENABLE_LINK,
    KEY_SHOW_ARCHIVED,
    KEY_PIN_DEFAULT_LIST,
    KEY_PINNED_PROJECTS,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub token: Option<String>,
    pub mark_completed: bool,
    pub pinned_projects: Vec<String>,
    pub enable_link: bool,
    pub show_archived: bool,
    pub pin_default_list: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            token: None,
            mark_completed: false,
            pinned_projects: Vec::new(),
            enable_link: true,
            show_archived: false,
            pin_default_list: false,
        }
    }
}

impl Settings {
    /// Token to authenticate with, ignoring blank values.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    pub fn is_pinned(&self, id: &str, name: &str) -> bool {
        self.pinned_projects
            .iter()
            .any(|pin| pin == id || pin == name)
    }

    /// Replace the stored token with `ASANA_TOKEN` when it is set.
    pub fn with_env_token(mut self) -> Self {
        if let Ok(token) = std::env::var("ASANA_TOKEN") {
            if !token.trim().is_empty() {
                self.token = Some(token);
            }
        }
        self
    }
}

pub fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => bail!("'{}' is not a boolean (use true/false)", other),
    }
}

pub fn parse_pinned(value: &str) -> Vec<String> {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn default_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("TASKLINK_DB") {
        return PathBuf::from(path);
    }
    let home_dir = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home_dir).join(".tasklink.db")
}

/// Key/value settings persisted in SQLite.
pub struct SettingsStore {
    conn: Connection,
}

impl SettingsStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open settings database at {}", path.display()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        Ok(SettingsStore { conn })
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Validate and store a single setting.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let normalized = match key {
            KEY_TOKEN => value.trim().to_string(),
            KEY_PINNED_PROJECTS => parse_pinned(value).join("\n"),
            KEY_MARK_COMPLETED | KEY_ENABLE_LINK | KEY_SHOW_ARCHIVED | KEY_PIN_DEFAULT_LIST => {
                parse_bool(value)?.to_string()
            }
            _ => bail!(
                "Unknown setting '{}'. Known settings: {}",
                key,
                KNOWN_KEYS.join(", ")
            ),
        };
        self.put(key, &normalized)
    }

    pub fn delete(&self, key: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM settings WHERE key = ?1", [key])?;
        Ok(removed > 0)
    }

    pub fn list(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM settings ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    pub fn load(&self) -> Result<Settings> {
        let mut settings = Settings::default();
        for (key, value) in self.list()? {
            match key.as_str() {
                KEY_TOKEN => settings.token = Some(value).filter(|t| !t.is_empty()),
                KEY_MARK_COMPLETED => settings.mark_completed = parse_bool(&value)?,
                KEY_ENABLE_LINK => settings.enable_link = parse_bool(&value)?,
                KEY_SHOW_ARCHIVED => settings.show_archived = parse_bool(&value)?,
                KEY_PIN_DEFAULT_LIST => settings.pin_default_list = parse_bool(&value)?,
                KEY_PINNED_PROJECTS => settings.pinned_projects = parse_pinned(&value),
                other => log::warn!("Ignoring unknown setting '{}'", other),
            }
        }
        Ok(settings)
    }

    /// Persist every field of `settings`.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        match &settings.token {
            Some(token) => self.put(KEY_TOKEN, token)?,
            None => {
                self.delete(KEY_TOKEN)?;
            }
        }
        self.put(KEY_MARK_COMPLETED, &settings.mark_completed.to_string())?;
        self.put(KEY_ENABLE_LINK, &settings.enable_link.to_string())?;
        self.put(KEY_SHOW_ARCHIVED, &settings.show_archived.to_string())?;
        self.put(KEY_PIN_DEFAULT_LIST, &settings.pin_default_list.to_string())?;
        self.put(KEY_PINNED_PROJECTS, &settings.pinned_projects.join("\n"))?;
        Ok(())
    }

    /// Add a project name or id to the pinned list. Returns false if it was already pinned.
    pub fn pin(&self, project: &str) -> Result<bool> {
        let project = project.trim();
        if project.is_empty() {
            bail!("Project to pin must not be empty");
        }
        let mut settings = self.load()?;
        if settings.pinned_projects.iter().any(|p| p == project) {
            return Ok(false);
        }
        settings.pinned_projects.push(project.to_string());
        self.save(&settings)?;
        Ok(true)
    }

    pub fn unpin(&self, project: &str) -> Result<bool> {
        let mut settings = self.load()?;
        let before = settings.pinned_projects.len();
        settings.pinned_projects.retain(|p| p != project.trim());
        if settings.pinned_projects.len() == before {
            return Ok(false);
        }
        self.save(&settings)?;
        Ok(true)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
            [key, value],
        )?;
        Ok(())
    }
}

/// Hide all but the last four characters of a secret.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store() -> (TempDir, SettingsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(&dir.path().join("settings.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn empty_store_loads_defaults() {
        let (_dir, store) = store();
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn save_then_load_keeps_every_field() {
        let (_dir, store) = store();
        let settings = Settings {
            token: Some("secret".into()),
            mark_completed: true,
            pinned_projects: vec!["Inbox".into(), "1203".into()],
            enable_link: false,
            show_archived: true,
            pin_default_list: true,
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn set_validates_keys_and_booleans() {
        let (_dir, store) = store();
        store.set(KEY_MARK_COMPLETED, "yes").unwrap();
        assert_eq!(store.get(KEY_MARK_COMPLETED).unwrap().as_deref(), Some("true"));

        assert!(store.set(KEY_MARK_COMPLETED, "maybe").is_err());
        assert!(store.set("colour", "blue").is_err());
    }

    #[test]
    fn pinned_projects_are_newline_delimited() {
        let (_dir, store) = store();
        store.set(KEY_PINNED_PROJECTS, "Inbox\n\n  Roadmap  \n").unwrap();
        assert_eq!(
            store.load().unwrap().pinned_projects,
            vec!["Inbox".to_string(), "Roadmap".to_string()]
        );
    }

    #[test]
    fn pin_and_unpin_update_the_list() {
        let (_dir, store) = store();
        assert!(store.pin("Inbox").unwrap());
        assert!(!store.pin("Inbox").unwrap());
        assert!(store.pin("42").unwrap());
        assert_eq!(store.load().unwrap().pinned_projects, vec!["Inbox", "42"]);

        assert!(store.unpin("Inbox").unwrap());
        assert!(!store.unpin("Inbox").unwrap());
        assert_eq!(store.load().unwrap().pinned_projects, vec!["42"]);
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let settings = Settings {
            token: Some("   ".into()),
            ..Settings::default()
        };
        assert_eq!(settings.token(), None);
    }

    #[test]
    fn pinned_match_by_id_or_name() {
        let settings = Settings {
            pinned_projects: vec!["Inbox".into(), "77".into()],
            ..Settings::default()
        };
        assert!(settings.is_pinned("1", "Inbox"));
        assert!(settings.is_pinned("77", "Other"));
        assert!(!settings.is_pinned("2", "inbox"));
    }

    #[test]
    fn mask_secret_keeps_last_four() {
        assert_eq!(mask_secret("abcdefgh"), "****efgh");
        assert_eq!(mask_secret("abc"), "***");
    }
}
