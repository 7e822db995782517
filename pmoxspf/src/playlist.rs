//! Playlist : séquence ordonnée de morceaux et (dé)sérialisation XSPF

use crate::{
    parse_document, Error, PlaylistItem, Result, WriterConfig, XSPF_NAMESPACE, XSPF_VERSION,
};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, trace};
use xmltree::{Element, XMLNode};

/// Une playlist XSPF
///
/// Se comporte comme une séquence ordonnée de [`PlaylistItem`] : l'ordre
/// d'insertion est conservé à l'écriture et les doublons sont permis.
/// Les opérations de lecture sur slice (`len`, `iter`, indexation...) sont
/// disponibles via `Deref<Target = [PlaylistItem]>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    tracks: Vec<PlaylistItem>,
}

impl Playlist {
    /// Crée une playlist vide
    pub fn new() -> Self {
        Self::default()
    }

    /// Charge une playlist depuis un fichier XSPF
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] si le fichier ne peut pas être lu
    /// - [`Error::XmlParse`] si le document est mal formé
    /// - [`Error::MissingTrackList`] si la racine n'a pas de `<trackList>` XSPF
    /// - les erreurs de [`PlaylistItem::from_element`] pour chaque morceau
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let playlist = Self::from_reader(BufReader::new(file))?;

        debug!(
            "📋 Loaded {} tracks from {}",
            playlist.len(),
            path.display()
        );
        Ok(playlist)
    }

    /// Parse un document XSPF depuis un flux
    ///
    /// Le texte blanc est conservé : un champ `<title> </title>` reste renseigné.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let root = parse_document(reader)?;
        Self::from_root(&root)
    }

    /// Construit la playlist depuis la racine d'un document déjà parsé
    pub fn from_root(root: &Element) -> Result<Self> {
        let track_list = root
            .get_child(("trackList", XSPF_NAMESPACE))
            .ok_or(Error::MissingTrackList)?;

        let tracks = track_list
            .children
            .iter()
            .filter_map(XMLNode::as_element)
            .map(PlaylistItem::from_element)
            .collect::<Result<Vec<_>>>()?;

        trace!("trackList parsed: {} entries", tracks.len());
        Ok(Self { tracks })
    }

    /// Construit l'élément racine `<playlist>`
    pub fn to_element(&self) -> Element {
        let mut track_list = Element::new("trackList");
        track_list.children.extend(
            self.tracks
                .iter()
                .map(|track| XMLNode::Element(track.to_element())),
        );

        let mut playlist = Element::new("playlist");
        playlist
            .attributes
            .insert("version".to_string(), XSPF_VERSION.to_string());
        playlist
            .attributes
            .insert("xmlns".to_string(), XSPF_NAMESPACE.to_string());
        playlist.children.push(XMLNode::Element(track_list));

        playlist
    }

    /// Écrit le document XSPF complet dans un flux
    pub fn write_to<W: Write>(&self, writer: W, config: &WriterConfig) -> Result<()> {
        self.to_element()
            .write_with_config(writer, config.emitter_config())?;
        Ok(())
    }

    /// Sérialise la playlist avec la configuration par défaut
    pub fn to_xml_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf, &WriterConfig::default())?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Sauve la playlist dans un fichier (écrasé s'il existe)
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_with_config(path, &WriterConfig::default())
    }

    /// Sauve la playlist avec une configuration d'écriture explicite
    ///
    /// L'écriture n'est pas atomique : une interruption peut laisser un
    /// fichier tronqué.
    pub fn save_with_config(&self, path: impl AsRef<Path>, config: &WriterConfig) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer, config)?;
        writer.flush()?;

        debug!("💾 Saved {} tracks to {}", self.len(), path.display());
        Ok(())
    }

    /// Ajoute un morceau en fin de playlist
    pub fn push(&mut self, item: PlaylistItem) {
        self.tracks.push(item);
    }

    /// Insère un morceau à la position donnée
    ///
    /// # Panics
    ///
    /// Si `index > len`.
    pub fn insert(&mut self, index: usize, item: PlaylistItem) {
        self.tracks.insert(index, item);
    }

    /// Retire et retourne le morceau à la position donnée
    ///
    /// # Panics
    ///
    /// Si `index >= len`.
    pub fn remove(&mut self, index: usize) -> PlaylistItem {
        self.tracks.remove(index)
    }

    /// Retire la première occurrence égale à `item` (retourne true si supprimé)
    pub fn remove_item(&mut self, item: &PlaylistItem) -> bool {
        match self.tracks.iter().position(|track| track == item) {
            Some(index) => {
                self.tracks.remove(index);
                true
            }
            None => false,
        }
    }

    /// Retire le dernier morceau
    pub fn pop(&mut self) -> Option<PlaylistItem> {
        self.tracks.pop()
    }

    /// Vide complètement la playlist
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Consomme la playlist et retourne ses morceaux
    pub fn into_vec(self) -> Vec<PlaylistItem> {
        self.tracks
    }

    /// Génère une représentation Markdown
    pub fn to_markdown(&self) -> String {
        let mut buf = String::new();
        buf.push_str("### XSPF Playlist\n\n");

        for (index, track) in self.tracks.iter().enumerate() {
            let title = track.title.as_deref().unwrap_or("(untitled)");
            writeln!(buf, "{}. **{}**", index + 1, title).unwrap();

            for (field, value) in track.fields() {
                writeln!(buf, "   - {}: `{}`", field, value).unwrap();
            }
        }

        buf
    }
}

impl Deref for Playlist {
    type Target = [PlaylistItem];

    fn deref(&self) -> &Self::Target {
        &self.tracks
    }
}

impl DerefMut for Playlist {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tracks
    }
}

impl From<Vec<PlaylistItem>> for Playlist {
    fn from(tracks: Vec<PlaylistItem>) -> Self {
        Self { tracks }
    }
}

impl FromIterator<PlaylistItem> for Playlist {
    fn from_iter<I: IntoIterator<Item = PlaylistItem>>(iter: I) -> Self {
        Self {
            tracks: iter.into_iter().collect(),
        }
    }
}

impl Extend<PlaylistItem> for Playlist {
    fn extend<I: IntoIterator<Item = PlaylistItem>>(&mut self, iter: I) {
        self.tracks.extend(iter);
    }
}

impl IntoIterator for Playlist {
    type Item = PlaylistItem;
    type IntoIter = std::vec::IntoIter<PlaylistItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.into_iter()
    }
}

impl<'a> IntoIterator for &'a Playlist {
    type Item = &'a PlaylistItem;
    type IntoIter = std::slice::Iter<'a, PlaylistItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}

impl<'a> IntoIterator for &'a mut Playlist {
    type Item = &'a mut PlaylistItem;
    type IntoIter = std::slice::IterMut<'a, PlaylistItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter_mut()
    }
}

impl FromStr for Playlist {
    type Err = Error;

    fn from_str(xml: &str) -> Result<Self> {
        Self::from_reader(xml.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_TRACK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<playlist version="1" xmlns="http://xspf.org/ns/0/">
  <title>Ignored playlist title</title>
  <trackList>
    <track>
      <title>Test</title>
      <duration>5000</duration>
    </track>
  </trackList>
</playlist>"#;

    fn item(title: &str, duration: i64) -> PlaylistItem {
        PlaylistItem::builder()
            .title(title)
            .duration(duration)
            .build()
            .unwrap()
    }

    #[test]
    fn test_parse_one_track() {
        let playlist: Playlist = ONE_TRACK.parse().unwrap();
        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist[0].title.as_deref(), Some("Test"));
        assert_eq!(playlist[0].duration_seconds(), 5.0);
    }

    #[test]
    fn test_parse_empty_track_list() {
        let playlist: Playlist =
            r#"<playlist version="1" xmlns="http://xspf.org/ns/0/"><trackList/></playlist>"#
                .parse()
                .unwrap();
        assert!(playlist.is_empty());
    }

    #[test]
    fn test_missing_track_list() {
        let result: Result<Playlist> =
            r#"<playlist version="1" xmlns="http://xspf.org/ns/0/"><title>x</title></playlist>"#
                .parse();
        assert!(matches!(result, Err(Error::MissingTrackList)));
    }

    #[test]
    fn test_track_list_outside_namespace() {
        // Un document sans namespace XSPF n'a pas de trackList reconnu
        let result: Result<Playlist> =
            "<playlist version=\"1\"><trackList><track><duration>1</duration></track></trackList></playlist>"
                .parse();
        assert!(matches!(result, Err(Error::MissingTrackList)));
    }

    #[test]
    fn test_malformed_xml() {
        let result: Result<Playlist> = "<playlist><trackList>".parse();
        assert!(matches!(result, Err(Error::XmlParse(_))));
    }

    #[test]
    fn test_track_error_propagates() {
        let result: Result<Playlist> = r#"<playlist xmlns="http://xspf.org/ns/0/"><trackList>
                <track><duration>1</duration></track>
                <track><title>no duration</title></track>
            </trackList></playlist>"#
            .parse();
        assert!(matches!(result, Err(Error::MissingDuration)));
    }

    #[test]
    fn test_to_element_structure() {
        let playlist: Playlist = vec![item("a", 1), item("b", 2)].into();
        let root = playlist.to_element();

        assert_eq!(root.name, "playlist");
        assert_eq!(root.attributes.get("version").map(String::as_str), Some("1"));
        assert_eq!(
            root.attributes.get("xmlns").map(String::as_str),
            Some(XSPF_NAMESPACE)
        );

        let track_list = root.get_child("trackList").unwrap();
        let titles: Vec<String> = track_list
            .children
            .iter()
            .filter_map(XMLNode::as_element)
            .map(|track| {
                track
                    .get_child("title")
                    .and_then(|t| t.get_text())
                    .unwrap()
                    .into_owned()
            })
            .collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn test_xml_string_roundtrip_preserves_order_and_duplicates() {
        let mut playlist = Playlist::new();
        playlist.push(item("first", 1000));
        playlist.push(item("second", 2000));
        playlist.push(item("first", 1000));

        let xml = playlist.to_xml_string().unwrap();
        assert!(xml.starts_with("<?xml"));

        let reloaded: Playlist = xml.parse().unwrap();
        assert_eq!(reloaded, playlist);
    }

    #[test]
    fn test_whitespace_only_fields_roundtrip() {
        let playlist: Playlist = vec![
            PlaylistItem::builder()
                .title(" ")
                .creator("  a  ")
                .album("\n\t")
                .duration(1)
                .build()
                .unwrap(),
        ]
        .into();

        let xml = playlist.to_xml_string().unwrap();
        assert!(xml.contains("<title> </title>"));

        let reloaded: Playlist = xml.parse().unwrap();
        assert_eq!(reloaded[0].title.as_deref(), Some(" "));
        assert_eq!(reloaded[0].creator.as_deref(), Some("  a  "));
        assert_eq!(reloaded, playlist);
    }

    #[test]
    fn test_whitespace_between_elements_is_ignored() {
        let playlist: Playlist = r#"<playlist xmlns="http://xspf.org/ns/0/">
            <trackList>
                <track>
                    <title>Spaced</title>
                    <duration>
                        42
                    </duration>
                </track>
            </trackList>
        </playlist>"#
            .parse()
            .unwrap();

        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist[0].title.as_deref(), Some("Spaced"));
        assert_eq!(playlist[0].duration, 42);
    }

    #[test]
    fn test_field_text_stops_at_comment() {
        let playlist: Playlist = r#"<playlist xmlns="http://xspf.org/ns/0/"><trackList>
                <track><title>a<!-- c -->b</title><duration>1</duration></track>
            </trackList></playlist>"#
            .parse()
            .unwrap();

        assert_eq!(playlist[0].title.as_deref(), Some("a"));
    }

    #[test]
    fn test_compact_writer() {
        let playlist: Playlist = vec![item("a", 1)].into();
        let mut buf = Vec::new();
        let config = WriterConfig {
            write_declaration: false,
            ..WriterConfig::compact()
        };
        playlist.write_to(&mut buf, &config).unwrap();

        let xml = String::from_utf8(buf).unwrap();
        assert!(xml.starts_with("<playlist"));
        assert!(!xml.contains('\n'));
        assert_eq!(xml.parse::<Playlist>().unwrap(), playlist);
    }

    #[test]
    fn test_sequence_operations() {
        let mut playlist: Playlist = [item("a", 1), item("b", 2)].into_iter().collect();
        playlist.insert(0, item("z", 3));
        playlist.extend([item("c", 4)]);

        let titles: Vec<&str> = playlist
            .iter()
            .filter_map(|t| t.title.as_deref())
            .collect();
        assert_eq!(titles, vec!["z", "a", "b", "c"]);

        assert!(playlist.remove_item(&item("a", 1)));
        assert!(!playlist.remove_item(&item("a", 1)));
        assert_eq!(playlist.remove(0).title.as_deref(), Some("z"));
        assert_eq!(playlist.pop().unwrap().title.as_deref(), Some("c"));
        assert_eq!(playlist.len(), 1);

        for track in &mut playlist {
            track.set_duration_seconds(1.5).unwrap();
        }
        assert_eq!(playlist[0].duration, 1500);

        playlist.clear();
        assert!(playlist.is_empty());
    }

    #[test]
    fn test_markdown() {
        let playlist: Playlist = vec![item("Song", 1000)].into();
        let md = playlist.to_markdown();
        assert!(md.contains("1. **Song**"));
        assert!(md.contains("duration: `1000`"));
    }
}
