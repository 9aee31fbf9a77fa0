//! Slot names and their fallback values

pub const APP_NAME: &str = "appName";
pub const MOVIE: &str = "movie";
pub const CITY: &str = "city";
pub const DATE: &str = "date";
pub const LOCATION: &str = "location";
pub const QUERY: &str = "query";
pub const MESSAGE: &str = "message";

/// Values used when the request text does not supply a slot
pub mod defaults {
    pub const MOVIE: &str = "Deadpool";
    pub const CITY: &str = "Hyderabad";
    pub const LOCATION: &str = "Hyderabad";
    pub const QUERY: &str = "lofi beats";
}
