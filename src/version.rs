/// Build version, taken from `MOODBOARD_VERSION` at compile time when set
/// (release builds stamp the git tag there), otherwise the crate version.
pub const VERSION: &str = match option_env!("MOODBOARD_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
