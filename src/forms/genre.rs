use crate::models;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct GenreForm {
    #[validate(min_length = 1)]
    #[validate(max_length = 50)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Into<models::Genre> for GenreForm {
    fn into(self) -> models::Genre {
        models::Genre::new(self.name.trim().to_string(), self.description)
    }
}

#[derive(Serialize, Deserialize, Debug, Validate, Default)]
pub struct GenrePatch {
    #[validate(min_length = 1)]
    #[validate(max_length = 50)]
    pub name: Option<String>,
    pub description: Option<String>,
}

impl GenrePatch {
    pub fn update(self, genre: &mut models::Genre) {
        if let Some(name) = self.name {
            genre.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            genre.description = description;
        }
    }
}

impl From<GenreForm> for GenrePatch {
    fn from(form: GenreForm) -> Self {
        Self {
            name: Some(form.name),
            description: Some(form.description),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GenreFilter {
    pub search: Option<String>,
    pub name: Option<String>,
}
