//! # pmoxspf - Playlists XSPF
//!
//! Lecture et écriture de playlists au format XSPF (XML Shareable Playlist
//! Format, <http://www.xspf.org/xspf-v1.html>).
//!
//! Seul le sous-ensemble utile est modélisé :
//! - **Playlist** : séquence ordonnée de morceaux, chargée depuis ou sauvée vers un fichier
//! - **PlaylistItem** : un `<track>` avec ses neuf champs (`location`, `title`,
//!   `creator`, `annotation`, `info`, `image`, `album`, `trackNum`, `duration`)
//!
//! Les éléments `link`, `meta`, les extensions et les métadonnées de niveau
//! playlist sont ignorés à la lecture et jamais produits.
//!
//! # Exemple d'utilisation
//!
//! ```no_run
//! use pmoxspf::{Playlist, PlaylistItem};
//!
//! # fn main() -> pmoxspf::Result<()> {
//! let mut playlist = Playlist::load("in.xspf")?;
//!
//! playlist.push(
//!     PlaylistItem::builder()
//!         .location("file:///music/track.flac")
//!         .title("Track")
//!         .duration_seconds(215.5)
//!         .build()?,
//! );
//!
//! for item in &playlist {
//!     println!("{:?} ({}s)", item.title, item.duration_seconds());
//! }
//!
//! playlist.save("out.xspf")?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod playlist;
mod track;

// Réexports publics
pub use config::WriterConfig;
pub use error::{Error, Result};
pub use playlist::Playlist;
pub use track::{Field, PlaylistItem, PlaylistItemBuilder, DURATION_SECONDS};

use std::borrow::Cow;
use std::io::Read;
use xmltree::{Element, ParserConfig, XMLNode};

/// Namespace des documents XSPF version 1
pub const XSPF_NAMESPACE: &str = "http://xspf.org/ns/0/";

/// Version écrite dans l'attribut `version` de `<playlist>`
pub const XSPF_VERSION: &str = "1";

/// Parse un document XML en conservant le texte blanc et les commentaires
///
/// Un champ ne contenant que des espaces reste ainsi renseigné, et le texte
/// d'un champ s'arrête au premier nœud qui n'est pas du texte.
pub(crate) fn parse_document<R: Read>(reader: R) -> Result<Element> {
    let config = ParserConfig::new()
        .whitespace_to_characters(true)
        .ignore_comments(false);
    Ok(Element::parse_with_config(reader, config)?)
}

/// Texte placé avant le premier nœud enfant non textuel
pub(crate) fn leading_text(element: &Element) -> Option<Cow<'_, str>> {
    let mut texts = element.children.iter().map_while(|node| match node {
        XMLNode::Text(text) | XMLNode::CData(text) => Some(text.as_str()),
        _ => None,
    });

    let first = texts.next()?;
    match texts.next() {
        None => Some(Cow::Borrowed(first)),
        Some(second) => {
            let mut text = format!("{first}{second}");
            texts.for_each(|t| text.push_str(t));
            Some(Cow::Owned(text))
        }
    }
}
