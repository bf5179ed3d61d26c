use serde::{Deserialize, Deserializer, Serialize};

const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Treats an explicit `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub page: i32,
    #[serde(default, deserialize_with = "nullable")]
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub total_pages: i32,
    #[serde(default)]
    pub total_results: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i32,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub original_title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub adult: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: i32,
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub original_title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub overview: String,
    #[serde(default, deserialize_with = "nullable")]
    pub tagline: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<i32>,
    #[serde(default)]
    pub budget: Option<i64>,
    #[serde(default)]
    pub revenue: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub adult: bool,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i32>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub external_ids: Option<ExternalIds>,
    #[serde(default, deserialize_with = "nullable")]
    pub genres: Vec<GenreRecord>,
    #[serde(default, deserialize_with = "nullable")]
    pub production_companies: Vec<CompanyRecord>,
    #[serde(default, deserialize_with = "nullable")]
    pub credits: Credits,
    #[serde(default, deserialize_with = "nullable")]
    pub videos: Videos,
}

impl MovieRecord {
    /// IMDb id from `external_ids`, falling back to the top-level field.
    pub fn imdb_id(&self) -> Option<String> {
        self.external_ids
            .as_ref()
            .and_then(|ids| ids.imdb_id.clone())
            .or_else(|| self.imdb_id.clone())
            .filter(|id| !id.trim().is_empty())
    }

    /// Watch URL of the first YouTube trailer, empty when there is none.
    pub fn trailer_url(&self) -> String {
        self.videos
            .results
            .iter()
            .find(|video| video.site == "YouTube" && video.kind == "Trailer" && !video.key.is_empty())
            .map(|video| format!("{}{}", YOUTUBE_WATCH_URL, video.key))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalIds {
    #[serde(default)]
    pub imdb_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreRecord {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenreList {
    #[serde(default, deserialize_with = "nullable")]
    pub genres: Vec<GenreRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default, deserialize_with = "nullable")]
    pub cast: Vec<CastRecord>,
    #[serde(default, deserialize_with = "nullable")]
    pub crew: Vec<CrewRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastRecord {
    pub id: i32,
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub character: String,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewRecord {
    pub id: i32,
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub job: String,
    #[serde(default, deserialize_with = "nullable")]
    pub department: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: i32,
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub biography: String,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub deathday: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub place_of_birth: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Videos {
    #[serde(default, deserialize_with = "nullable")]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    #[serde(default, deserialize_with = "nullable")]
    pub key: String,
    #[serde(default, deserialize_with = "nullable")]
    pub site: String,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn movie_record_tolerates_nulls() {
        let record: MovieRecord = serde_json::from_value(json!({
            "id": 603,
            "title": "The Matrix",
            "tagline": null,
            "genres": null,
            "credits": {"cast": null, "crew": []},
            "runtime": null
        }))
        .unwrap();

        assert_eq!(record.tagline, "");
        assert!(record.genres.is_empty());
        assert!(record.credits.cast.is_empty());
        assert_eq!(record.runtime, None);
    }

    #[test]
    fn movie_record_requires_title() {
        let result = serde_json::from_value::<MovieRecord>(json!({"id": 1}));
        assert!(result.is_err());
    }

    #[test]
    fn imdb_id_prefers_external_ids() {
        let record: MovieRecord = serde_json::from_value(json!({
            "id": 1,
            "title": "x",
            "imdb_id": "tt0000001",
            "external_ids": {"imdb_id": "tt0000002"}
        }))
        .unwrap();
        assert_eq!(record.imdb_id().as_deref(), Some("tt0000002"));

        let record: MovieRecord =
            serde_json::from_value(json!({"id": 1, "title": "x", "imdb_id": ""})).unwrap();
        assert_eq!(record.imdb_id(), None);
    }

    #[test]
    fn trailer_is_first_youtube_trailer() {
        let record: MovieRecord = serde_json::from_value(json!({
            "id": 1,
            "title": "x",
            "videos": {"results": [
                {"key": "teaser1", "site": "YouTube", "type": "Teaser"},
                {"key": "vimeo1", "site": "Vimeo", "type": "Trailer"},
                {"key": "abc123", "site": "YouTube", "type": "Trailer"},
                {"key": "later", "site": "YouTube", "type": "Trailer"}
            ]}
        }))
        .unwrap();

        assert_eq!(record.trailer_url(), "https://www.youtube.com/watch?v=abc123");
    }
}
