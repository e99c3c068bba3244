/// Application name
pub const APP_NAME: &str = "SilverHome";

/// Storage entry holding the serialized portal document
pub const DATA_ENTRY: &str = "silverHomeData";

/// Storage entry holding the serialized session user (absent when logged out)
pub const SESSION_ENTRY: &str = "silverHomeUser";

/// Lowest accepted feedback rating
pub const RATING_MIN: u8 = 1;

/// Highest accepted feedback rating
pub const RATING_MAX: u8 = 5;
