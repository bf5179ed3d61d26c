use crate::configuration::{ImageSizes, TmdbSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Poster,
    Backdrop,
    Profile,
}

/// Turns TMDB relative image paths into absolute URLs.
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    base_url: String,
    sizes: ImageSizes,
}

impl ImageUrlBuilder {
    pub fn new(base_url: &str, sizes: ImageSizes) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            sizes,
        }
    }

    pub fn from_settings(settings: &TmdbSettings) -> Self {
        Self::new(&settings.image_base_url, settings.image_sizes.clone())
    }

    pub fn build(&self, path: &str, size: ImageSize) -> String {
        if path.is_empty() {
            return String::new();
        }

        let size = match size {
            ImageSize::Poster => &self.sizes.poster,
            ImageSize::Backdrop => &self.sizes.backdrop,
            ImageSize::Profile => &self.sizes.profile,
        };

        format!("{}/{}{}", self.base_url, size, path)
    }

    pub fn build_opt(&self, path: Option<&str>, size: ImageSize) -> String {
        path.map(|path| self.build(path, size)).unwrap_or_default()
    }
}
