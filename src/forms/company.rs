use crate::models;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct CompanyForm {
    #[validate(min_length = 1)]
    #[validate(max_length = 100)]
    pub name: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    #[validate(max_length = 2)]
    pub origin_country: String,
}

impl Into<models::ProductionCompany> for CompanyForm {
    fn into(self) -> models::ProductionCompany {
        models::ProductionCompany::new(
            self.name.trim().to_string(),
            self.logo_url,
            self.origin_country.to_uppercase(),
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Validate, Default)]
pub struct CompanyPatch {
    #[validate(min_length = 1)]
    #[validate(max_length = 100)]
    pub name: Option<String>,
    pub logo_url: Option<String>,
    #[validate(max_length = 2)]
    pub origin_country: Option<String>,
}

impl CompanyPatch {
    pub fn update(self, company: &mut models::ProductionCompany) {
        if let Some(name) = self.name {
            company.name = name.trim().to_string();
        }
        if let Some(logo_url) = self.logo_url {
            company.logo_url = logo_url;
        }
        if let Some(origin_country) = self.origin_country {
            company.origin_country = origin_country.to_uppercase();
        }
    }
}

impl From<CompanyForm> for CompanyPatch {
    fn from(form: CompanyForm) -> Self {
        Self {
            name: Some(form.name),
            logo_url: Some(form.logo_url),
            origin_country: Some(form.origin_country),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct CompanyFilter {
    pub search: Option<String>,
    pub name: Option<String>,
    pub origin_country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn origin_country_is_two_letters() {
        let form: CompanyForm = serde_json::from_value(json!({"name": "Pixar", "origin_country": "USA"})).unwrap();
        assert!(form.validate().is_err());

        let form: CompanyForm = serde_json::from_value(json!({"name": "Pixar", "origin_country": "us"})).unwrap();
        assert!(form.validate().is_ok());
        let company: models::ProductionCompany = form.into();
        assert_eq!(company.origin_country, "US");
    }
}
