//! Directory listing pages (HTML) as a business source.
//!
//! Page layout knowledge lives in a [`ListingProfile`]: where the search page
//! is, which elements are listings, and for every field an ordered list of
//! candidate selectors. The first candidate that yields a value wins; when none
//! does the field stays empty.

use crate::domain::model::{RawCategory, RawListing};
use crate::domain::ports::SourceAdapter;
use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::{validate_non_empty_string, validate_url};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::core::fetcher::USER_AGENT;

/// One candidate for a field: take the element's text, or an attribute when `attr` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSelector {
    pub selector: String,
    #[serde(default)]
    pub attr: Option<String>,
}

impl FieldSelector {
    pub fn text(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            attr: None,
        }
    }

    pub fn attr(selector: &str, attr: &str) -> Self {
        Self {
            selector: selector.to_string(),
            attr: Some(attr.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingProfile {
    /// Value written to `Business::source`, e.g. "yell.ie".
    pub source: String,
    pub base_url: String,
    /// Path appended to `base_url`; `{query}` and `{location}` are substituted.
    pub path_template: String,
    /// Container selectors; the first one matching anything is used.
    pub containers: Vec<String>,
    #[serde(default)]
    pub name: Vec<FieldSelector>,
    #[serde(default)]
    pub address: Vec<FieldSelector>,
    #[serde(default)]
    pub phone: Vec<FieldSelector>,
    #[serde(default)]
    pub website: Vec<FieldSelector>,
    /// Website candidates pointing at these domains (the directory itself) are skipped.
    #[serde(default)]
    pub exclude_website_domains: Vec<String>,
    #[serde(default = "default_listing_timeout")]
    pub timeout_secs: u64,
}

fn default_listing_timeout() -> u64 {
    15
}

impl ListingProfile {
    pub fn yell() -> Self {
        Self {
            source: "yell.ie".to_string(),
            base_url: "https://www.yell.ie".to_string(),
            path_template: "/s/{query}/{location}".to_string(),
            containers: vec!["div.businessCapsule".to_string()],
            name: vec![FieldSelector::text("h2.businessCapsule--title")],
            address: vec![FieldSelector::text("span[itemprop=\"address\"]")],
            phone: vec![FieldSelector::text("span.business--telephoneNumber")],
            website: vec![FieldSelector::attr("a.businessCapsule--ctaItem", "href")],
            exclude_website_domains: vec!["yell.ie".to_string()],
            timeout_secs: 10,
        }
    }

    pub fn golden_pages() -> Self {
        Self {
            source: "goldenpages.ie".to_string(),
            base_url: "https://www.goldenpages.ie".to_string(),
            path_template: "/q/{query}/{location}/".to_string(),
            containers: vec![
                "div.listing, div.result".to_string(),
                "article.listing".to_string(),
            ],
            name: vec![
                FieldSelector::text("h2"),
                FieldSelector::text("h3"),
                FieldSelector::text("a.listing__title"),
            ],
            address: vec![
                FieldSelector::text("p.listing__address"),
                FieldSelector::text("address"),
                FieldSelector::text("div.address"),
            ],
            phone: vec![
                FieldSelector::text("a[href^=\"tel:\"]"),
                FieldSelector::text("span.phone"),
                FieldSelector::text("div.telephone"),
            ],
            website: vec![FieldSelector::attr("a[href^=\"http\"]", "href")],
            exclude_website_domains: vec!["goldenpages.ie".to_string()],
            timeout_secs: 15,
        }
    }

    /// Looks up a built-in profile by source key.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "yell" | "yell.ie" => Some(Self::yell()),
            "golden_pages" | "goldenpages" | "goldenpages.ie" => Some(Self::golden_pages()),
            _ => None,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    fn all_selectors(&self) -> impl Iterator<Item = &str> {
        self.containers.iter().map(String::as_str).chain(
            self.name
                .iter()
                .chain(&self.address)
                .chain(&self.phone)
                .chain(&self.website)
                .map(|f| f.selector.as_str()),
        )
    }

    pub fn validate(&self) -> Result<()> {
        validate_non_empty_string("listings.source", &self.source)?;
        validate_url("listings.base_url", &self.base_url)?;
        if self.containers.is_empty() {
            return Err(ScoutError::MissingConfigError {
                field: format!("listings.{}.containers", self.source),
            });
        }
        for selector in self.all_selectors() {
            Selector::parse(selector).map_err(|e| ScoutError::InvalidConfigValueError {
                field: format!("listings.{}", self.source),
                value: selector.to_string(),
                reason: format!("Invalid CSS selector: {:?}", e),
            })?;
        }
        Ok(())
    }

    pub fn search_url(&self, query: &str, location: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| ScoutError::InvalidConfigValueError {
            field: "listings.base_url".to_string(),
            value: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ScoutError::config(format!("{} cannot take a path", self.base_url)))?;
            segments.pop_if_empty();
            for part in self.path_template.trim_start_matches('/').split('/') {
                let part = part.replace("{query}", query).replace("{location}", location);
                segments.push(&part);
            }
        }

        Ok(url)
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    Selector::parse(selector).ok()
}

fn element_text(element: &ElementRef) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

fn first_text(listing: &ElementRef, candidates: &[FieldSelector]) -> Option<String> {
    candidates.iter().find_map(|candidate| {
        let selector = parse_selector(&candidate.selector)?;
        listing.select(&selector).find_map(|el| {
            let value = match &candidate.attr {
                Some(attr) => el.value().attr(attr).map(|v| v.trim().to_string()),
                None => Some(element_text(&el)),
            }?;
            (!value.is_empty()).then_some(value)
        })
    })
}

fn first_website(
    listing: &ElementRef,
    candidates: &[FieldSelector],
    excluded: &[String],
) -> Option<String> {
    candidates.iter().find_map(|candidate| {
        let selector = parse_selector(&candidate.selector)?;
        let attr = candidate.attr.as_deref().unwrap_or("href");
        listing.select(&selector).find_map(|el| {
            let href = el.value().attr(attr)?.trim();
            let absolute = href.starts_with("http://") || href.starts_with("https://");
            let own_domain = excluded.iter().any(|domain| href.contains(domain.as_str()));
            (absolute && !own_domain).then(|| href.to_string())
        })
    })
}

fn extract_listing(
    listing: &ElementRef,
    profile: &ListingProfile,
    query: &str,
    location: &str,
) -> Result<RawListing> {
    let name = first_text(listing, &profile.name);
    let address = first_text(listing, &profile.address);
    let phone = first_text(listing, &profile.phone);
    let website = first_website(listing, &profile.website, &profile.exclude_website_domains);

    if name.is_none() && address.is_none() && phone.is_none() && website.is_none() {
        return Err(ScoutError::extraction(format!(
            "{} listing had no recognisable fields",
            profile.source
        )));
    }

    Ok(RawListing {
        name,
        address,
        website,
        phone,
        category: RawCategory::Label(query.to_string()),
        location: Some(location.to_string()),
        source: profile.source.clone(),
        ..Default::default()
    })
}

/// Parses a search results page into raw listings, dropping listings that
/// fail extraction.
pub fn parse_listings(
    html: &str,
    profile: &ListingProfile,
    query: &str,
    location: &str,
    max_results: usize,
) -> Vec<RawListing> {
    let document = Html::parse_document(html);

    let containers = profile.containers.iter().find_map(|container| {
        let selector = parse_selector(container)?;
        let found: Vec<ElementRef> = document.select(&selector).collect();
        (!found.is_empty()).then_some(found)
    });

    let Some(containers) = containers else {
        tracing::warn!("No listings found on {} page", profile.source);
        return Vec::new();
    };
    tracing::debug!("Found {} listings on {} page", containers.len(), profile.source);

    containers
        .iter()
        .take(max_results)
        .filter_map(|listing| match extract_listing(listing, profile, query, location) {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::warn!("Skipping listing: {}", e);
                None
            }
        })
        .collect()
}

#[derive(Debug)]
pub struct ListingAdapter {
    profile: ListingProfile,
    client: Client,
}

impl ListingAdapter {
    pub fn new(profile: ListingProfile) -> Result<Self> {
        profile.validate()?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(profile.timeout_secs))
            .build()?;
        Ok(Self { profile, client })
    }

    pub fn profile(&self) -> &ListingProfile {
        &self.profile
    }
}

#[async_trait]
impl SourceAdapter for ListingAdapter {
    fn name(&self) -> &str {
        &self.profile.source
    }

    async fn search(
        &self,
        query: &str,
        location: &str,
        max_results: usize,
    ) -> Result<Vec<RawListing>> {
        let url = self.profile.search_url(query, location)?;
        tracing::info!("🔎 Searching {}: {} in {}", self.profile.source, query, location);

        let html = self
            .client
            .get(url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let listings = parse_listings(&html, &self.profile, query, location, max_results);
        tracing::info!("Found {} businesses on {}", listings.len(), self.profile.source);
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YELL_PAGE: &str = r#"
        <html><body>
          <div class="businessCapsule">
            <h2 class="businessCapsule--title"> The Old Mill </h2>
            <span itemprop="address">12 Temple Bar, Dublin 2</span>
            <span class="business--telephoneNumber">01 123 4567</span>
            <a class="businessCapsule--ctaItem" href="https://theoldmill.ie">Website</a>
          </div>
          <div class="businessCapsule">
            <h2 class="businessCapsule--title">No Site Diner</h2>
            <a class="businessCapsule--ctaItem" href="/biz/no-site-diner">More</a>
          </div>
          <div class="businessCapsule"></div>
        </body></html>
    "#;

    #[test]
    fn test_parse_yell_listings() {
        let listings = parse_listings(YELL_PAGE, &ListingProfile::yell(), "restaurants", "Dublin", 10);

        // the empty capsule is dropped, not replaced with a placeholder
        assert_eq!(listings.len(), 2);

        let first = &listings[0];
        assert_eq!(first.name.as_deref(), Some("The Old Mill"));
        assert_eq!(first.address.as_deref(), Some("12 Temple Bar, Dublin 2"));
        assert_eq!(first.phone.as_deref(), Some("01 123 4567"));
        assert_eq!(first.website.as_deref(), Some("https://theoldmill.ie"));
        assert_eq!(first.category, RawCategory::Label("restaurants".to_string()));
        assert_eq!(first.source, "yell.ie");

        let second = &listings[1];
        assert_eq!(second.name.as_deref(), Some("No Site Diner"));
        assert!(second.website.is_none());
        assert!(second.address.is_none());
    }

    #[test]
    fn test_max_results_caps_listings() {
        let listings = parse_listings(YELL_PAGE, &ListingProfile::yell(), "restaurants", "Dublin", 1);
        assert_eq!(listings.len(), 1);
    }

    #[test]
    fn test_golden_pages_fallback_selectors() {
        let page = r#"
            <article class="listing">
              <h3>Smith &amp; Sons Builders</h3>
              <address>4 Main St</address>
              <a href="https://www.goldenpages.ie/smith">Profile</a>
              <a href="https://smithbuilders.ie">Visit</a>
              <span class="phone">087 000 0000</span>
            </article>
        "#;
        let listings =
            parse_listings(page, &ListingProfile::golden_pages(), "builders", "Dublin", 5);

        assert_eq!(listings.len(), 1);
        let listing = &listings[0];
        assert_eq!(listing.name.as_deref(), Some("Smith & Sons Builders"));
        assert_eq!(listing.address.as_deref(), Some("4 Main St"));
        assert_eq!(listing.phone.as_deref(), Some("087 000 0000"));
        assert_eq!(listing.website.as_deref(), Some("https://smithbuilders.ie"));
    }

    #[test]
    fn test_first_matching_selector_wins() {
        let page = r#"
            <div class="listing">
              <h2>Primary Name</h2>
              <h3>Secondary Name</h3>
              <a href="tel:+35315550000">+353 1 555 0000</a>
              <div class="telephone">ignored</div>
            </div>
        "#;
        let listings =
            parse_listings(page, &ListingProfile::golden_pages(), "dentists", "Dublin", 5);
        assert_eq!(listings[0].name.as_deref(), Some("Primary Name"));
        assert_eq!(listings[0].phone.as_deref(), Some("+353 1 555 0000"));
    }

    #[test]
    fn test_page_without_listings_is_empty() {
        let listings = parse_listings(
            "<html><body><p>Nothing here</p></body></html>",
            &ListingProfile::yell(),
            "plumbers",
            "Dublin",
            10,
        );
        assert!(listings.is_empty());
    }

    #[test]
    fn test_search_url_encodes_segments() {
        let url = ListingProfile::golden_pages()
            .search_url("hair salons", "Dublin")
            .unwrap();
        assert_eq!(url.as_str(), "https://www.goldenpages.ie/q/hair%20salons/Dublin/");

        let url = ListingProfile::yell()
            .with_base_url("http://127.0.0.1:8080")
            .search_url("cafes", "Dublin")
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/s/cafes/Dublin");
    }

    #[test]
    fn test_invalid_profile_is_a_configuration_error() {
        let mut profile = ListingProfile::yell();
        profile.name = vec![FieldSelector::text("h2[[")];
        let err = ListingAdapter::new(profile).unwrap_err();
        assert!(err.is_fatal());

        let mut profile = ListingProfile::yell();
        profile.containers.clear();
        assert!(ListingAdapter::new(profile).unwrap_err().is_fatal());
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(ListingProfile::builtin("yell").unwrap().source, "yell.ie");
        assert_eq!(
            ListingProfile::builtin("golden_pages").unwrap().source,
            "goldenpages.ie"
        );
        assert!(ListingProfile::builtin("unknown").is_none());
    }
}
