//! @ai:module:intent Configuration structs for the converter
//! @ai:module:layer infrastructure
//! @ai:module:public_api ConverterConfig, PostProcessConfig, FileConfig
//! @ai:module:stateless true

use crate::error::Result;
use crate::vocabulary::DEFAULT_MEDIA_TYPE_ANNOTATION;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// @ai:intent Main configuration for a conversion run
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Annotations whose first value becomes `@Content(mediaType = ...)`, first match wins.
    #[serde(default = "default_media_type_annotations")]
    pub media_type_annotations: Vec<String>,
    #[serde(default)]
    pub postprocess: PostProcessConfig,
    #[serde(default)]
    pub files: FileConfig,
}

/// @ai:intent Which normalization steps run after a unit is converted
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostProcessConfig {
    /// Tidies inserted comments. Annotation layout is left to [`crate::render`].
    #[serde(default = "default_true")]
    pub reformat: bool,
    #[serde(default = "default_true")]
    pub shorten_references: bool,
    #[serde(default = "default_true")]
    pub remove_unused_imports: bool,
}

/// @ai:intent Which files are converted and where results are written
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    /// File name suffix of tree documents, without a leading dot.
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_true")]
    pub in_place: bool,
    /// Appended to the file stem when not converting in place.
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
    /// Also write the rendered `.java` source next to each converted tree.
    #[serde(default)]
    pub emit_java: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            media_type_annotations: default_media_type_annotations(),
            postprocess: PostProcessConfig::default(),
            files: FileConfig::default(),
        }
    }
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            reformat: true,
            shorten_references: true,
            remove_unused_imports: true,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            in_place: true,
            output_suffix: default_output_suffix(),
            emit_java: false,
        }
    }
}

fn default_media_type_annotations() -> Vec<String> {
    vec![DEFAULT_MEDIA_TYPE_ANNOTATION.to_string()]
}

fn default_true() -> bool {
    true
}

fn default_extension() -> String {
    "json".to_string()
}

fn default_output_suffix() -> String {
    ".openapi".to_string()
}

impl ConverterConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

impl FileConfig {
    /// @ai:intent True when the file carries the configured tree extension
    /// @ai:effects pure
    pub fn matches(&self, path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some(self.extension.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config: ConverterConfig = toml::from_str("").unwrap();
        assert_eq!(config, ConverterConfig::default());
        assert_eq!(config.media_type_annotations, vec!["javax.ws.rs.Produces".to_string()]);
        assert!(config.postprocess.remove_unused_imports);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("swagger2oas.toml");
        std::fs::write(
            &path,
            r#"
media_type_annotations = ["org.springframework.web.bind.annotation.Produces"]

[postprocess]
shorten_references = false

[files]
in_place = false
emit_java = true
"#,
        )
        .unwrap();

        let config = ConverterConfig::load(&path).unwrap();
        assert_eq!(
            config.media_type_annotations,
            vec!["org.springframework.web.bind.annotation.Produces".to_string()]
        );
        assert!(!config.postprocess.shorten_references);
        assert!(config.postprocess.reformat);
        assert!(!config.files.in_place);
        assert!(config.files.emit_java);
        assert_eq!(config.files.output_suffix, ".openapi");
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[postprocess\nreformat = ").unwrap();

        assert!(matches!(
            ConverterConfig::load(&path),
            Err(crate::error::Error::Config(_))
        ));
    }

    #[test]
    fn test_extension_filter() {
        let files = FileConfig::default();
        assert!(files.matches(Path::new("src/UserResource.json")));
        assert!(!files.matches(Path::new("src/UserResource.java")));
    }
}
