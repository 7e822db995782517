//! PlaylistItem : une entrée `<track>` d'une playlist XSPF

use crate::{leading_text, Error, Result, XSPF_NAMESPACE};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use xmltree::{Element, XMLNode};

/// Alias accepté à la construction pour fixer la durée en secondes
pub const DURATION_SECONDS: &str = "duration_seconds";

/// Les champs reconnus d'un `<track>`, dans l'ordre d'écriture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Location,
    Title,
    Creator,
    Annotation,
    Info,
    Image,
    Album,
    TrackNum,
    Duration,
}

impl Field {
    /// Tous les champs, dans l'ordre du schéma XSPF
    pub const ALL: [Field; 9] = [
        Field::Location,
        Field::Title,
        Field::Creator,
        Field::Annotation,
        Field::Info,
        Field::Image,
        Field::Album,
        Field::TrackNum,
        Field::Duration,
    ];

    /// Nom de l'élément XML correspondant
    pub fn name(self) -> &'static str {
        match self {
            Field::Location => "location",
            Field::Title => "title",
            Field::Creator => "creator",
            Field::Annotation => "annotation",
            Field::Info => "info",
            Field::Image => "image",
            Field::Album => "album",
            Field::TrackNum => "trackNum",
            Field::Duration => "duration",
        }
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Un morceau d'une playlist XSPF
///
/// Tous les champs textuels sont optionnels : un champ à `None` n'est pas
/// écrit dans le document. La durée est toujours présente, en millisecondes.
///
/// # Exemples
///
/// ```
/// use pmoxspf::PlaylistItem;
///
/// let mut item = PlaylistItem::builder()
///     .title("Test")
///     .duration(5000)
///     .build()
///     .unwrap();
///
/// assert_eq!(item.duration_seconds(), 5.0);
/// item.set_duration_seconds(3.5).unwrap();
/// assert_eq!(item.duration, 3500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,

    /// Numéro de piste, conservé tel quel (texte)
    #[serde(rename = "trackNum", default, skip_serializing_if = "Option::is_none")]
    pub track_num: Option<String>,

    /// Durée en millisecondes
    pub duration: i64,
}

impl PlaylistItem {
    /// Démarre la construction d'un morceau champ par champ
    pub fn builder() -> PlaylistItemBuilder {
        PlaylistItemBuilder::default()
    }

    /// Construit un morceau à partir de paires (nom XSPF, valeur)
    ///
    /// Les noms acceptés sont ceux de [`Field`] plus `duration_seconds`.
    /// Un nom inconnu est refusé immédiatement avec [`Error::UnknownField`].
    pub fn from_fields<I, K, V>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        fields
            .into_iter()
            .try_fold(Self::builder(), |builder, (name, value)| {
                builder.set(name.as_ref(), value)
            })?
            .build()
    }

    /// Construit un morceau depuis un élément `<track>` parsé
    ///
    /// Seuls les enfants dans le namespace XSPF sont pris en compte ; un
    /// élément absent (ou sans texte) laisse le champ à `None`. Le texte d'un
    /// champ s'arrête au premier nœud enfant qui n'est pas du texte.
    pub fn from_element(track: &Element) -> Result<Self> {
        let mut builder = Self::builder();

        for field in Field::ALL {
            let Some(text) = track
                .get_child((field.name(), XSPF_NAMESPACE))
                .and_then(leading_text)
            else {
                continue;
            };

            match field {
                Field::Duration => builder.duration = Some(parse_duration(&text)?),
                _ => {
                    if let Some(slot) = builder.item.text_slot(field) {
                        *slot = Some(text.into_owned());
                    }
                }
            }
        }

        builder.build()
    }

    /// Sérialise le morceau en élément `<track>`
    ///
    /// Un enfant par champ renseigné, dans l'ordre de [`Field::ALL`].
    pub fn to_element(&self) -> Element {
        let mut track = Element::new("track");

        for (field, value) in self.fields() {
            let mut child = Element::new(field.name());
            child.children.push(XMLNode::Text(value.into_owned()));
            track.children.push(XMLNode::Element(child));
        }

        track
    }

    /// Durée en secondes (fractionnaire)
    pub fn duration_seconds(&self) -> f64 {
        self.duration as f64 / 1000.0
    }

    /// Fixe la durée à partir d'une valeur en secondes
    ///
    /// Une valeur non finie (ou hors de la plage des millisecondes `i64`)
    /// donne [`Error::InvalidDuration`] et laisse la durée inchangée.
    pub fn set_duration_seconds(&mut self, seconds: f64) -> Result<()> {
        self.duration = seconds_to_millis(seconds)?;
        Ok(())
    }

    /// Numéro de piste interprété comme entier, si possible
    pub fn track_number(&self) -> Option<u32> {
        self.track_num.as_deref()?.trim().parse().ok()
    }

    /// Valeur textuelle d'un champ, telle qu'elle serait écrite
    pub fn get(&self, field: Field) -> Option<Cow<'_, str>> {
        match field {
            Field::Duration => Some(Cow::Owned(self.duration.to_string())),
            _ => self.text(field)?.as_deref().map(Cow::Borrowed),
        }
    }

    /// Itère sur les champs renseignés, dans l'ordre du schéma
    pub fn fields(&self) -> impl Iterator<Item = (Field, Cow<'_, str>)> + '_ {
        Field::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|value| (field, value)))
    }

    fn text(&self, field: Field) -> Option<&Option<String>> {
        match field {
            Field::Location => Some(&self.location),
            Field::Title => Some(&self.title),
            Field::Creator => Some(&self.creator),
            Field::Annotation => Some(&self.annotation),
            Field::Info => Some(&self.info),
            Field::Image => Some(&self.image),
            Field::Album => Some(&self.album),
            Field::TrackNum => Some(&self.track_num),
            Field::Duration => None,
        }
    }

    fn text_slot(&mut self, field: Field) -> Option<&mut Option<String>> {
        match field {
            Field::Location => Some(&mut self.location),
            Field::Title => Some(&mut self.title),
            Field::Creator => Some(&mut self.creator),
            Field::Annotation => Some(&mut self.annotation),
            Field::Info => Some(&mut self.info),
            Field::Image => Some(&mut self.image),
            Field::Album => Some(&mut self.album),
            Field::TrackNum => Some(&mut self.track_num),
            Field::Duration => None,
        }
    }
}

/// Constructeur de [`PlaylistItem`]
///
/// La durée est obligatoire : [`build`](Self::build) échoue avec
/// [`Error::MissingDuration`] si elle n'a jamais été fixée, ou avec
/// [`Error::InvalidDuration`] si la dernière valeur fournie n'était pas finie.
#[derive(Debug, Clone)]
pub struct PlaylistItemBuilder {
    item: PlaylistItem,
    duration: Option<i64>,
    invalid_duration: Option<String>,
}

impl Default for PlaylistItemBuilder {
    fn default() -> Self {
        Self {
            item: PlaylistItem {
                location: None,
                title: None,
                creator: None,
                annotation: None,
                info: None,
                image: None,
                album: None,
                track_num: None,
                duration: 0,
            },
            duration: None,
            invalid_duration: None,
        }
    }
}

impl PlaylistItemBuilder {
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.item.location = Some(location.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.item.title = Some(title.into());
        self
    }

    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.item.creator = Some(creator.into());
        self
    }

    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.item.annotation = Some(annotation.into());
        self
    }

    pub fn info(mut self, info: impl Into<String>) -> Self {
        self.item.info = Some(info.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.item.image = Some(image.into());
        self
    }

    pub fn album(mut self, album: impl Into<String>) -> Self {
        self.item.album = Some(album.into());
        self
    }

    pub fn track_num(mut self, track_num: impl Into<String>) -> Self {
        self.item.track_num = Some(track_num.into());
        self
    }

    /// Durée en millisecondes
    pub fn duration(mut self, millis: i64) -> Self {
        self.set_duration(millis);
        self
    }

    /// Durée en secondes, convertie en millisecondes
    ///
    /// Une valeur non finie est signalée par [`build`](Self::build).
    pub fn duration_seconds(mut self, seconds: f64) -> Self {
        match seconds_to_millis(seconds) {
            Ok(millis) => self.set_duration(millis),
            Err(_) => {
                self.duration = None;
                self.invalid_duration = Some(seconds.to_string());
            }
        }
        self
    }

    fn set_duration(&mut self, millis: i64) {
        self.duration = Some(millis);
        self.invalid_duration = None;
    }

    /// Fixe un champ par son nom XSPF (ou `duration_seconds`)
    ///
    /// Les durées sont converties immédiatement : une valeur non numérique
    /// donne [`Error::InvalidDuration`].
    pub fn set(mut self, name: &str, value: impl Into<String>) -> Result<Self> {
        let value = value.into();

        if name == DURATION_SECONDS {
            let millis = parse_duration_seconds(&value)?;
            self.set_duration(millis);
            return Ok(self);
        }

        let field: Field = name.parse()?;
        match field {
            Field::Duration => {
                let millis = parse_duration(&value)?;
                self.set_duration(millis);
            }
            _ => {
                if let Some(slot) = self.item.text_slot(field) {
                    *slot = Some(value);
                }
            }
        }

        Ok(self)
    }

    pub fn build(self) -> Result<PlaylistItem> {
        if let Some(value) = self.invalid_duration {
            return Err(Error::InvalidDuration { value });
        }
        let duration = self.duration.ok_or(Error::MissingDuration)?;
        Ok(PlaylistItem {
            duration,
            ..self.item
        })
    }
}

fn seconds_to_millis(seconds: f64) -> Result<i64> {
    let millis = (seconds * 1000.0).round();
    // i64::MAX n'est pas représentable exactement en f64 : borne exclusive
    if millis.is_finite() && millis >= i64::MIN as f64 && millis < i64::MAX as f64 {
        Ok(millis as i64)
    } else {
        Err(Error::InvalidDuration {
            value: seconds.to_string(),
        })
    }
}

fn parse_duration(text: &str) -> Result<i64> {
    text.trim().parse().map_err(|_| Error::InvalidDuration {
        value: text.to_string(),
    })
}

fn parse_duration_seconds(text: &str) -> Result<i64> {
    let invalid = || Error::InvalidDuration {
        value: text.to_string(),
    };
    let seconds: f64 = text.trim().parse().map_err(|_| invalid())?;
    seconds_to_millis(seconds).map_err(|_| invalid())
}
