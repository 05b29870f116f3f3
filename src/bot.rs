//! Best-effort detection of automated user agents.
//!
//! This is a substring heuristic, not a guarantee. Bots that send a browser
//! user agent slip through, and real browsers whose agent happens to contain
//! one of the signals (the "Cubot" phone brand, for instance) are treated as
//! bots. Both mistakes only cost one uncounted or read-only visit.

/// Lowercase substrings that mark an agent as automated.
pub const BOT_SIGNALS: [&str; 12] = [
    "bot",
    "crawl",
    "spider",
    "slurp",
    "bingpreview",
    "facebookexternalhit",
    "curl",
    "wget",
    "python-requests",
    "httpclient",
    "postman",
    "headless",
];

/// `automated` is the environment's own automation marker (webdriver).
pub fn looks_like_bot(user_agent: &str, automated: bool) -> bool {
    if automated {
        return true;
    }
    let lower = user_agent.to_lowercase();
    BOT_SIGNALS.iter().any(|signal| lower.contains(signal))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIREFOX: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:128.0) Gecko/20100101 Firefox/128.0";

    #[test]
    fn crawlers_and_tools_are_flagged() {
        for agent in [
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
            "curl/8.5.0",
            "python-requests/2.31.0",
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 HeadlessChrome/120.0",
            "facebookexternalhit/1.1",
            "Mozilla/5.0 (compatible; Yahoo! Slurp)",
        ] {
            assert!(looks_like_bot(agent, false), "{agent}");
        }
    }

    #[test]
    fn regular_browser_passes() {
        assert!(!looks_like_bot(FIREFOX, false));
        assert!(!looks_like_bot("", false));
    }

    #[test]
    fn automation_marker_wins_over_agent() {
        assert!(looks_like_bot(FIREFOX, true));
    }

    #[test]
    fn substring_false_positive_is_accepted() {
        let cubot = "Mozilla/5.0 (Linux; Android 12; CUBOT P80) AppleWebKit/537.36 Mobile";
        assert!(looks_like_bot(cubot, false));
    }
}
