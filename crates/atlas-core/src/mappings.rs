//! Static mapping tables loaded once at startup and immutable afterward.
//!
//! Both files are JSON. Section order matters for the genre table
//! (first matching genre wins), so entries are kept in file order rather
//! than in a hash map.

use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{DataError, Result};

/// Sentinel genre for tags absent from every genre's list.
pub const OTHER_GENRE: &str = "Other";

/// Genre → tag-list table from `genre_mapping.json`:
///
/// ```json
/// { "genre_mapping": { "Rock": ["rock", "indie rock"], ... } }
/// ```
#[derive(Debug, Clone)]
pub struct GenreMapping {
    entries: Vec<(String, Vec<String>)>,
}

impl GenreMapping {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&raw)?;
        let map = value
            .get("genre_mapping")
            .and_then(Value::as_object)
            .ok_or_else(|| DataError::MissingSection {
                path: path.to_path_buf(),
                section: "genre_mapping",
            })?;

        let entries = map
            .iter()
            .map(|(genre, tags)| {
                let tags = tags
                    .as_array()
                    .map(|list| {
                        list.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_lowercase)
                            .collect()
                    })
                    .unwrap_or_default();
                (genre.clone(), tags)
            })
            .collect();

        Ok(Self { entries })
    }

    #[cfg(test)]
    pub fn from_entries(entries: Vec<(String, Vec<String>)>) -> Self {
        Self { entries }
    }

    /// Genre for a search tag: membership of the lowercased tag in each
    /// genre's list, in file order, first match wins; [`OTHER_GENRE`] when
    /// nothing matches.
    pub fn categorize(&self, tag: &str) -> &str {
        let tag = tag.to_lowercase();
        for (genre, tags) in &self.entries {
            if tags.iter().any(|t| *t == tag) {
                return genre;
            }
        }
        OTHER_GENRE
    }
}

/// Tag → country table from `tag_to_country.json`, with three sections:
/// `with_country` (tag → country), `without_country` (tags carrying no
/// country), and `countries` (tags that are themselves country names).
/// All sections are optional.
#[derive(Debug, Clone, Default)]
pub struct TagCountryTable {
    with_country: Vec<(String, String)>,
    without_country: Vec<String>,
    countries: Vec<(String, String)>,
}

impl TagCountryTable {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&raw)?;

        Ok(Self {
            with_country: string_map(&value, "with_country"),
            without_country: value
                .get("without_country")
                .and_then(Value::as_array)
                .map(|list| {
                    list.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            countries: string_map(&value, "countries"),
        })
    }

    #[cfg(test)]
    pub fn from_parts(
        with_country: Vec<(String, String)>,
        without_country: Vec<String>,
        countries: Vec<(String, String)>,
    ) -> Self {
        Self {
            with_country,
            without_country,
            countries,
        }
    }

    /// All search tags, in file order: country-mapped tags first, then the
    /// countryless ones, then the country-name tags.
    pub fn all_tags(&self) -> Vec<String> {
        self.with_country
            .iter()
            .map(|(tag, _)| tag.clone())
            .chain(self.without_country.iter().cloned())
            .chain(self.countries.iter().map(|(tag, _)| tag.clone()))
            .collect()
    }

    /// Country associated with a tag, if any. The country-name section takes
    /// precedence over the tag → country section.
    pub fn country_for_tag(&self, tag: &str) -> Option<&str> {
        self.countries
            .iter()
            .chain(self.with_country.iter())
            .find(|(t, _)| t == tag)
            .map(|(_, country)| country.as_str())
    }
}

fn string_map(value: &Value, section: &str) -> Vec<(String, String)> {
    value
        .get(section)
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_json(contents: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mapping.json");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_genre_first_match_wins_in_file_order() {
        let (_dir, path) = write_json(
            r#"{
                "genre_mapping": {
                    "Electronic": ["techno", "ambient"],
                    "Experimental": ["ambient", "drone"]
                }
            }"#,
        );
        let mapping = GenreMapping::load(&path).unwrap();
        assert_eq!(mapping.categorize("ambient"), "Electronic");
        assert_eq!(mapping.categorize("drone"), "Experimental");
    }

    #[test]
    fn test_genre_lowercases_tag() {
        let mapping = GenreMapping::from_entries(vec![(
            "Rock".to_string(),
            vec!["rock".to_string(), "indie rock".to_string()],
        )]);
        assert_eq!(mapping.categorize("Indie Rock"), "Rock");
        assert_eq!(mapping.categorize("ROCK"), "Rock");
    }

    #[test]
    fn test_genre_unknown_tag_is_other() {
        let mapping = GenreMapping::from_entries(vec![(
            "Jazz".to_string(),
            vec!["jazz".to_string()],
        )]);
        assert_eq!(mapping.categorize("polka"), OTHER_GENRE);
        assert_eq!(mapping.categorize(""), OTHER_GENRE);
    }

    #[test]
    fn test_genre_missing_section_errors() {
        let (_dir, path) = write_json(r#"{"genres": {}}"#);
        let err = GenreMapping::load(&path).unwrap_err();
        assert!(matches!(err, DataError::MissingSection { section, .. } if section == "genre_mapping"));
    }

    #[test]
    fn test_tag_country_sections_and_order() {
        let (_dir, path) = write_json(
            r#"{
                "with_country": {"afrobeat": "Nigeria", "tango": "Argentina"},
                "without_country": ["rock", "pop"],
                "countries": {"japan": "Japan"}
            }"#,
        );
        let table = TagCountryTable::load(&path).unwrap();
        assert_eq!(
            table.all_tags(),
            vec!["afrobeat", "tango", "rock", "pop", "japan"]
        );
        assert_eq!(table.country_for_tag("afrobeat"), Some("Nigeria"));
        assert_eq!(table.country_for_tag("japan"), Some("Japan"));
        assert_eq!(table.country_for_tag("rock"), None);
        assert_eq!(table.country_for_tag("polka"), None);
    }

    #[test]
    fn test_tag_country_sections_optional() {
        let (_dir, path) = write_json(r#"{"countries": {"mali": "Mali"}}"#);
        let table = TagCountryTable::load(&path).unwrap();
        assert_eq!(table.all_tags(), vec!["mali"]);
        assert_eq!(table.country_for_tag("mali"), Some("Mali"));
    }

    #[test]
    fn test_countries_section_takes_precedence() {
        let table = TagCountryTable::from_parts(
            vec![("brazil".to_string(), "Wrongland".to_string())],
            vec![],
            vec![("brazil".to_string(), "Brazil".to_string())],
        );
        assert_eq!(table.country_for_tag("brazil"), Some("Brazil"));
    }
}
