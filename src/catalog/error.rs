use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("A catalog needs at least one point")]
    Empty,

    #[error("Point name '{0}' appears more than once in the catalog")]
    DuplicateName(String),

    #[error("Point '{name}' has an invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate {
        name: String,
        latitude: f64,
        longitude: f64,
    },
}
