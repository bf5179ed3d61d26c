//! Get-or-create of catalog entities referenced by TMDB payloads.
//!
//! Every lookup is followed by an `INSERT .. ON CONFLICT DO NOTHING` and a
//! re-select, so a writer that loses a race to a concurrent sync picks up the
//! winner's row instead of creating a duplicate or failing. The insert keeps
//! its key locked until commit: callers holding a transaction must resolve
//! entities in a fixed order (genres, companies, people, each sorted by key).

use crate::connectors::{CompanyRecord, GenreRecord, ImageSize, ImageUrlBuilder, TmdbConnector};
use crate::db;
use crate::models;
use sqlx::PgConnection;

/// ISO 3166 codes are two letters; longer values are cut.
const COUNTRY_CODE_LEN: usize = 2;
pub const GENRE_NAME_LEN: usize = 50;
pub const COMPANY_NAME_LEN: usize = 100;
pub const PERSON_NAME_LEN: usize = 100;

/// Trims `value` and cuts it to `width` characters.
pub fn clip(value: &str, width: usize) -> String {
    value.trim().chars().take(width).collect()
}

pub fn genre_description(name: &str) -> String {
    format!("Genre: {}", name)
}

pub async fn resolve_genre(
    conn: &mut PgConnection,
    record: &GenreRecord,
) -> Result<models::Genre, sqlx::Error> {
    let name = clip(&record.name, GENRE_NAME_LEN);
    if let Some(genre) = db::genre::find_by_name(&mut *conn, &name).await? {
        return Ok(genre);
    }

    let genre = models::Genre::new(name.clone(), genre_description(&name));
    if db::genre::insert_if_absent(&mut *conn, &genre).await? {
        tracing::info!(name = %genre.name, "Created new genre");
        return Ok(genre);
    }

    db::genre::find_by_name(&mut *conn, &name)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

/// Completes a company that arrives without a logo from `company/{id}`,
/// unless the catalog already has it. A failed lookup only costs the logo.
///
/// Runs before the sync transaction opens so no key stays locked while the
/// remote call is in flight.
pub async fn complete_company(
    conn: &mut PgConnection,
    tmdb: &dyn TmdbConnector,
    record: &mut CompanyRecord,
) -> Result<(), sqlx::Error> {
    let Some(company_id) = record.id else {
        return Ok(());
    };
    if record.logo_path.is_some() {
        return Ok(());
    }
    let name = clip(&record.name, COMPANY_NAME_LEN);
    if db::company::find_by_name(&mut *conn, &name).await?.is_some() {
        return Ok(());
    }

    match tmdb.fetch_company(company_id).await {
        Ok(remote) => {
            record.logo_path = remote.logo_path;
            if record.origin_country.as_deref().unwrap_or_default().is_empty() {
                record.origin_country = remote.origin_country;
            }
        }
        Err(err) => {
            tracing::warn!(company_id, error = %err, "Could not complete production company");
        }
    }

    Ok(())
}

pub async fn resolve_production_company(
    conn: &mut PgConnection,
    images: &ImageUrlBuilder,
    record: &CompanyRecord,
) -> Result<models::ProductionCompany, sqlx::Error> {
    let name = clip(&record.name, COMPANY_NAME_LEN);
    if let Some(company) = db::company::find_by_name(&mut *conn, &name).await? {
        return Ok(company);
    }

    let origin_country = record.origin_country.as_deref().unwrap_or_default();
    let company = models::ProductionCompany::new(
        name.clone(),
        images.build_opt(record.logo_path.as_deref(), ImageSize::Poster),
        clip(origin_country, COUNTRY_CODE_LEN),
    );
    if db::company::insert_if_absent(&mut *conn, &company).await? {
        tracing::info!(name = %company.name, "Created new production company");
        return Ok(company);
    }

    db::company::find_by_name(&mut *conn, &name)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

/// Person keyed by TMDB id. Name and picture only apply on creation.
pub async fn resolve_person(
    conn: &mut PgConnection,
    images: &ImageUrlBuilder,
    tmdb_id: i32,
    name: &str,
    profile_path: Option<&str>,
) -> Result<models::Person, sqlx::Error> {
    if let Some(person) = db::person::find_by_tmdb_id(&mut *conn, tmdb_id).await? {
        return Ok(person);
    }

    let mut person = models::Person::new(clip(name, PERSON_NAME_LEN));
    person.tmdb_id = Some(tmdb_id);
    person.profile_image_url = images.build_opt(profile_path, ImageSize::Profile);
    if db::person::insert_if_absent(&mut *conn, &person).await? {
        tracing::info!(name = %person.name, tmdb_id, "Created new person");
        return Ok(person);
    }

    db::person::find_by_tmdb_id(&mut *conn, tmdb_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_description_names_the_genre() {
        assert_eq!(genre_description("Drama"), "Genre: Drama");
    }

    #[test]
    fn clip_trims_and_cuts_on_characters() {
        assert_eq!(clip("  Drama ", GENRE_NAME_LEN), "Drama");
        assert_eq!(clip("Amélie", 3), "Amé");
        assert_eq!(clip(&"x".repeat(120), PERSON_NAME_LEN).chars().count(), 100);
    }
}
