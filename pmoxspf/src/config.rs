//! Options de sérialisation des documents XSPF

use serde::{Deserialize, Serialize};
use xmltree::EmitterConfig;

/// Configuration de l'écriture d'une playlist
///
/// Peut être chargée depuis un fragment YAML :
///
/// ```
/// use pmoxspf::WriterConfig;
///
/// let config = WriterConfig::from_yaml("indent: \"\\t\"\n").unwrap();
/// assert_eq!(config.indent, "\t");
/// assert!(config.write_declaration);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Chaîne d'indentation (vide = pas d'indentation)
    pub indent: String,

    /// Émettre l'en-tête `<?xml ...?>`
    pub write_declaration: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            write_declaration: true,
        }
    }
}

impl WriterConfig {
    /// Charge une configuration depuis du YAML (les clés absentes gardent leur défaut)
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Configuration compacte, sans indentation
    pub fn compact() -> Self {
        Self {
            indent: String::new(),
            ..Self::default()
        }
    }

    pub(crate) fn emitter_config(&self) -> EmitterConfig {
        EmitterConfig::new()
            .perform_indent(!self.indent.is_empty())
            .indent_string(self.indent.clone())
            .write_document_declaration(self.write_declaration)
    }
}
