use lazy_regex::regex;
use reqwest::Url;
use scraper::ElementRef;

/// First whitespace separated token that reads as an integer. Accepts `12,421` style separators.
pub fn first_integer(text: &str) -> Option<u64> {
    text.split_whitespace().find_map(|word| {
        let word = word.trim_matches(|c: char| !c.is_ascii_digit());
        if word.is_empty() || !word.chars().all(|c| c.is_ascii_digit() || c == ',') {
            return None;
        }
        word.replace(',', "").parse().ok()
    })
}

/// Joins a site-relative `path` onto the scheme and host of `base`.
pub fn absolute_url(base: &str, path: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    base.join(path).ok().map(String::from)
}

/// Element text with runs of whitespace collapsed and the ends trimmed.
pub fn element_text(el: &ElementRef) -> String {
    let text = el.text().collect::<String>();
    regex!(r"\s+").replace_all(text.trim(), " ").into_owned()
}
