//! Playlist and video records as they travel through both services.
//!
//! Stored playlists only reference videos by id (`VideoStub`); the aggregation
//! service swaps every stub for the full `Video` returned by the lookup service.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Payload returned by the lookup service when a video id is unknown.
pub const NOT_FOUND_PAYLOAD: &str = "{}";

/// A fully resolved video record.
///
/// Every field is optional so that the not-found sentinel (`{}`) decodes into
/// an empty record and serializes back to `{}` unchanged. Any other record
/// always serializes all five fields, with `""` for the missing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub imageurl: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

impl Video {
    /// The "no such video" record.
    pub fn not_found() -> Self {
        Self::default()
    }

    /// True for the not-found sentinel.
    pub fn is_not_found(&self) -> bool {
        *self == Self::default()
    }
}

impl Serialize for Video {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_not_found() {
            return serializer.serialize_map(Some(0))?.end();
        }
        fn field(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or_default()
        }
        let mut record = serializer.serialize_struct("Video", 5)?;
        record.serialize_field("id", field(&self.id))?;
        record.serialize_field("title", field(&self.title))?;
        record.serialize_field("description", field(&self.description))?;
        record.serialize_field("imageurl", field(&self.imageurl))?;
        record.serialize_field("url", field(&self.url))?;
        record.end()
    }
}

/// Missing and `null` both decode to the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Reference to a video that still needs a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStub {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
}

/// Playlist as stored under the playlist key. Absent or `null` fields are
/// read as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistStub {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub videos: Vec<VideoStub>,
}

/// Playlist with every resolvable video expanded, in stub order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydratedPlaylist {
    pub id: String,
    pub name: String,
    pub videos: Vec<Video>,
}

impl HydratedPlaylist {
    /// Start an empty hydrated playlist carrying the stub's identity.
    pub fn from_stub(stub: &PlaylistStub) -> Self {
        Self {
            id: stub.id.clone(),
            name: stub.name.clone(),
            videos: Vec::with_capacity(stub.videos.len()),
        }
    }
}
