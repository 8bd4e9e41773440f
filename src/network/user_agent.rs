//! User agent generation

use rand::seq::SliceRandom;

/// Desktop platforms a browser session may claim to run on
const PLATFORMS: [&str; 4] = [
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "X11; Linux x86_64",
    "X11; Ubuntu; Linux x86_64",
];

/// Recent Chrome releases
const CHROME_VERSIONS: [&str; 6] = [
    "120.0.0.0",
    "121.0.0.0",
    "122.0.0.0",
    "123.0.0.0",
    "124.0.0.0",
    "125.0.0.0",
];

/// Generate a desktop Chrome user agent with a random platform and version
///
/// Result pages are only served with the expected markup to mainstream
/// desktop browsers, so every session looks like Chrome.
pub fn generate_user_agent() -> String {
    let mut rng = rand::thread_rng();
    let platform = PLATFORMS.choose(&mut rng).copied().unwrap_or(PLATFORMS[0]);
    let version = CHROME_VERSIONS
        .choose(&mut rng)
        .copied()
        .unwrap_or(CHROME_VERSIONS[0]);

    format!(
        "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
        platform, version
    )
}

/// Standard accept headers for HTML requests
pub fn accept_html() -> &'static str {
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"
}

/// Accept-Language header for a language tag such as "en-US"
pub fn accept_language(lang: &str) -> String {
    match lang.split_once('-') {
        _ if lang == "all" || lang.is_empty() => "en-US,en;q=0.9".to_string(),
        Some((primary, _)) => format!("{},{};q=0.9", lang, primary),
        None => format!("{},en-US;q=0.9,en;q=0.8", lang),
    }
}
