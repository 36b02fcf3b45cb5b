//! Issue category presentation helpers: locale-aware labels and the
//! icon-tag mapping.

use serde::{Deserialize, Serialize};

use crate::api::models::IssueCategory;

/// Display locale for taxonomy labels. The payload carries both; English
/// is the fallback when the Arabic label is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl IssueCategory {
    /// Label in the requested locale, falling back to English.
    pub fn label(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.name_en,
            Locale::Ar => self.name_ar.as_deref().unwrap_or(&self.name_en),
        }
    }

    /// A category with no children is directly selectable.
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }
}

/// Known icon tags, mapped to terminal glyphs. The wire value is an open
/// string; anything unrecognized lands on [`CategoryIcon::Other`] instead
/// of being dispatched by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryIcon {
    Electrical,
    Plumbing,
    Hvac,
    Cleaning,
    Safety,
    It,
    Elevator,
    General,
    Other,
}

impl CategoryIcon {
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            None => CategoryIcon::General,
            Some(tag) => match tag.to_ascii_lowercase().as_str() {
                "electrical" | "power" => CategoryIcon::Electrical,
                "plumbing" | "water" => CategoryIcon::Plumbing,
                "hvac" | "cooling" | "heating" => CategoryIcon::Hvac,
                "cleaning" | "housekeeping" => CategoryIcon::Cleaning,
                "safety" | "fire" => CategoryIcon::Safety,
                "it" | "network" => CategoryIcon::It,
                "elevator" | "lift" => CategoryIcon::Elevator,
                "general" => CategoryIcon::General,
                _ => CategoryIcon::Other,
            },
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            CategoryIcon::Electrical => "⚡",
            CategoryIcon::Plumbing => "◉",
            CategoryIcon::Hvac => "❄",
            CategoryIcon::Cleaning => "✦",
            CategoryIcon::Safety => "⚠",
            CategoryIcon::It => "⌨",
            CategoryIcon::Elevator => "⇕",
            CategoryIcon::General => "▪",
            CategoryIcon::Other => "·",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name_en: &str, name_ar: Option<&str>, children: Vec<IssueCategory>) -> IssueCategory {
        IssueCategory {
            id: "c".to_string(),
            name_en: name_en.to_string(),
            name_ar: name_ar.map(str::to_string),
            icon: None,
            color: None,
            children,
        }
    }

    #[test]
    fn test_label_prefers_requested_locale() {
        let cat = category("Electrical", Some("كهرباء"), vec![]);
        assert_eq!(cat.label(Locale::En), "Electrical");
        assert_eq!(cat.label(Locale::Ar), "كهرباء");
    }

    #[test]
    fn test_label_falls_back_to_english() {
        let cat = category("Plumbing", None, vec![]);
        assert_eq!(cat.label(Locale::Ar), "Plumbing");
    }

    #[test]
    fn test_terminal_means_no_children() {
        let leaf = category("Leak", None, vec![]);
        assert!(leaf.is_terminal());
        let parent = category("Plumbing", None, vec![category("Leak", None, vec![])]);
        assert!(!parent.is_terminal());
    }

    #[test]
    fn test_icon_known_tags() {
        assert_eq!(CategoryIcon::from_tag(Some("electrical")), CategoryIcon::Electrical);
        assert_eq!(CategoryIcon::from_tag(Some("LIFT")), CategoryIcon::Elevator);
    }

    #[test]
    fn test_icon_unknown_tag_falls_back() {
        assert_eq!(CategoryIcon::from_tag(Some("quantum")), CategoryIcon::Other);
        assert_eq!(CategoryIcon::from_tag(None), CategoryIcon::General);
    }

    #[test]
    fn test_every_icon_has_a_glyph() {
        for icon in [
            CategoryIcon::Electrical,
            CategoryIcon::Plumbing,
            CategoryIcon::Hvac,
            CategoryIcon::Cleaning,
            CategoryIcon::Safety,
            CategoryIcon::It,
            CategoryIcon::Elevator,
            CategoryIcon::General,
            CategoryIcon::Other,
        ] {
            assert!(!icon.glyph().is_empty());
        }
    }
}
