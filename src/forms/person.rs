use crate::models;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct PersonForm {
    #[validate(min_length = 1)]
    #[validate(max_length = 100)]
    pub name: String,
    #[serde(default)]
    pub biography: String,
    pub birthday: Option<NaiveDate>,
    pub deathday: Option<NaiveDate>,
    #[serde(default)]
    #[validate(max_length = 200)]
    pub place_of_birth: String,
    #[serde(default)]
    pub profile_image_url: String,
    #[validate(max_length = 20)]
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<i32>,
}

impl PersonForm {
    pub fn update(self, person: &mut models::Person) {
        person.name = self.name.trim().to_string();
        person.biography = self.biography;
        person.birthday = self.birthday;
        person.deathday = self.deathday;
        person.place_of_birth = self.place_of_birth;
        person.profile_image_url = self.profile_image_url;
        person.imdb_id = self.imdb_id.filter(|id| !id.trim().is_empty());
        person.tmdb_id = self.tmdb_id;
        person.updated_at = Utc::now();
    }
}

impl Into<models::Person> for PersonForm {
    fn into(self) -> models::Person {
        let mut person = models::Person::new(String::new());
        self.update(&mut person);
        person
    }
}

#[derive(Serialize, Deserialize, Debug, Validate, Default)]
pub struct PersonPatch {
    #[validate(min_length = 1)]
    #[validate(max_length = 100)]
    pub name: Option<String>,
    pub biography: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub deathday: Option<NaiveDate>,
    #[validate(max_length = 200)]
    pub place_of_birth: Option<String>,
    pub profile_image_url: Option<String>,
    #[validate(max_length = 20)]
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<i32>,
}

impl PersonPatch {
    pub fn update(self, person: &mut models::Person) {
        if let Some(name) = self.name {
            person.name = name.trim().to_string();
        }
        if let Some(biography) = self.biography {
            person.biography = biography;
        }
        if self.birthday.is_some() {
            person.birthday = self.birthday;
        }
        if self.deathday.is_some() {
            person.deathday = self.deathday;
        }
        if let Some(place_of_birth) = self.place_of_birth {
            person.place_of_birth = place_of_birth;
        }
        if let Some(profile_image_url) = self.profile_image_url {
            person.profile_image_url = profile_image_url;
        }
        if let Some(imdb_id) = self.imdb_id {
            person.imdb_id = Some(imdb_id).filter(|id| !id.trim().is_empty());
        }
        if self.tmdb_id.is_some() {
            person.tmdb_id = self.tmdb_id;
        }
        person.updated_at = Utc::now();
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PersonFilter {
    pub search: Option<String>,
    pub name: Option<String>,
    pub place_of_birth: Option<String>,
    pub birth_year_gte: Option<i32>,
    pub birth_year_lte: Option<i32>,
    pub is_alive: Option<bool>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<i32>,
}
