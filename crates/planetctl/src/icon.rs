use derive_more::{AsRef, Deref, Display, From, Into};
use freedesktop_icons::lookup;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const LOOKUP_SIZE: u16 = 64;
const USER_ICON_EXTENSIONS: [&str; 2] = ["svg", "png"];

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct IconName(String);

crate::impl_string_newtype!(IconName);

/// Icon style prefix such as `fas`; carried along but not used for lookup.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct IconPrefix(String);

crate::impl_string_newtype!(IconPrefix);

/// Icon identifier as sent by the host: `"palette"`, `["fas", "palette"]` or
/// `{"prefix": "fas", "iconName": "palette"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IconId {
    Name(IconName),
    Prefixed(IconPrefix, IconName),
    Lookup {
        prefix: IconPrefix,
        #[serde(rename = "iconName")]
        icon_name: IconName,
    },
}

impl IconId {
    pub fn name(&self) -> &IconName {
        match self {
            Self::Name(name) | Self::Prefixed(_, name) => name,
            Self::Lookup { icon_name, .. } => icon_name,
        }
    }
}

impl From<&str> for IconId {
    fn from(name: &str) -> Self {
        Self::Name(IconName::from(name))
    }
}

static RESOLVED: OnceLock<RwLock<HashMap<IconName, Option<PathBuf>>>> = OnceLock::new();

fn cache() -> &'static RwLock<HashMap<IconName, Option<PathBuf>>> {
    RESOLVED.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Resolves an icon to an image file. Lookups are remembered for the life of
/// the process, misses included.
pub fn find_icon_path(icon_name: &IconName) -> Option<PathBuf> {
    if let Some(hit) = cache().read().get(icon_name) {
        return hit.clone();
    }

    let found = resolve(icon_name);
    if found.is_none() {
        log::debug!("No icon found for '{}'", icon_name);
    }
    cache().write().insert(icon_name.clone(), found.clone());
    found
}

fn resolve(icon_name: &IconName) -> Option<PathBuf> {
    if icon_name.is_empty() {
        return None;
    }

    let path = Path::new(icon_name.as_str());
    if path.is_absolute() {
        return path.exists().then(|| path.to_path_buf());
    }

    find_user_icon(icon_name).or_else(|| find_theme_icon(icon_name))
}

/// `$XDG_DATA_HOME/planet/icons/<name>.{svg,png}` lets users supply glyphs
/// that icon themes lack.
fn find_user_icon(icon_name: &IconName) -> Option<PathBuf> {
    let xdg = xdg::BaseDirectories::with_prefix("planet");
    USER_ICON_EXTENSIONS
        .iter()
        .find_map(|ext| xdg.find_data_file(format!("icons/{}.{}", icon_name, ext)))
}

fn find_theme_icon(icon_name: &IconName) -> Option<PathBuf> {
    [icon_name.to_string(), format!("{}-symbolic", icon_name)]
        .iter()
        .find_map(|name| {
            lookup(name)
                .with_size(LOOKUP_SIZE)
                .with_scale(1)
                .find()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_id_accepts_every_host_shape() {
        let cases = [
            r#""palette""#,
            r#"["fas", "palette"]"#,
            r#"{"prefix": "fas", "iconName": "palette"}"#,
        ];

        for json in cases {
            let id: IconId = serde_json::from_str(json).unwrap();
            assert_eq!(id.name().as_str(), "palette", "{json}");
        }
    }

    #[test]
    fn empty_and_missing_absolute_names_do_not_resolve() {
        assert_eq!(find_icon_path(&IconName::from("")), None);
        assert_eq!(
            find_icon_path(&IconName::from("/nonexistent/planet/icon.svg")),
            None
        );
    }
}
