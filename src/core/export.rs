use crate::core::normalize::normalize;
use crate::domain::model::{Business, RawCategory, RawListing, ScoredBusiness};
use crate::utils::error::{Result, ScoutError};
use serde::Deserialize;

const BUSINESS_COLUMNS: [&str; 7] = [
    "name", "address", "website", "phone", "category", "location", "source",
];
const API_COLUMNS: [&str; 3] = ["rating", "reviews", "place_id"];
const SCORE_COLUMNS: [&str; 5] = ["score", "has_website", "needs_website", "details", "url"];

fn business_fields(business: &Business, with_api_columns: bool) -> Vec<String> {
    let mut fields = vec![
        business.name.clone(),
        business.address.clone(),
        business.website.clone(),
        business.phone.clone(),
        business.category.to_string(),
        business.location.clone(),
        business.source.clone(),
    ];
    if with_api_columns {
        fields.push(business.rating.map(|r| r.to_string()).unwrap_or_default());
        fields.push(business.reviews.map(|r| r.to_string()).unwrap_or_default());
        fields.push(business.place_id.clone().unwrap_or_default());
    }
    fields
}

fn has_api_columns<'a>(mut businesses: impl Iterator<Item = &'a Business>) -> bool {
    businesses.any(|b| b.place_id.is_some() || b.rating.is_some() || b.reviews.is_some())
}

fn header(with_api_columns: bool, with_scores: bool) -> Vec<&'static str> {
    let mut columns: Vec<&str> = BUSINESS_COLUMNS.to_vec();
    if with_api_columns {
        columns.extend(API_COLUMNS);
    }
    if with_scores {
        columns.extend(SCORE_COLUMNS);
    }
    columns
}

fn into_bytes(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| ScoutError::IoError(e.into_error()))
}

pub fn businesses_to_csv(businesses: &[Business]) -> Result<Vec<u8>> {
    let with_api = has_api_columns(businesses.iter());
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(header(with_api, false))?;
    for business in businesses {
        writer.write_record(business_fields(business, with_api))?;
    }

    into_bytes(writer)
}

pub fn scored_to_csv(scored: &[ScoredBusiness]) -> Result<Vec<u8>> {
    let with_api = has_api_columns(scored.iter().map(|s| &s.business));
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(header(with_api, true))?;
    for entry in scored {
        let mut fields = business_fields(&entry.business, with_api);
        fields.push(entry.result.score.to_string());
        fields.push(entry.result.has_website.to_string());
        fields.push(entry.result.needs_website.to_string());
        fields.push(entry.result.details_joined());
        fields.push(entry.result.url.clone().unwrap_or_default());
        writer.write_record(&fields)?;
    }

    into_bytes(writer)
}

#[derive(Debug, Deserialize)]
struct BusinessRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    reviews: Option<u64>,
    #[serde(default)]
    place_id: Option<String>,
}

/// Reads a business CSV (ours or a hand-made one) back through the normalizer,
/// so any category label is folded into the taxonomy.
pub fn businesses_from_csv(data: &[u8]) -> Result<Vec<Business>> {
    let mut reader = csv::Reader::from_reader(data);
    let mut businesses = Vec::new();

    for row in reader.deserialize::<BusinessRow>() {
        let row = row?;
        let category = row
            .category
            .map(RawCategory::Label)
            .unwrap_or(RawCategory::Missing);
        businesses.push(normalize(RawListing {
            name: row.name,
            address: row.address,
            website: row.website,
            phone: row.phone,
            category,
            location: row.location,
            source: row.source.unwrap_or_else(|| "csv".to_string()),
            rating: row.rating,
            reviews: row.reviews,
            place_id: row.place_id.filter(|p| !p.is_empty()),
        }));
    }

    Ok(businesses)
}
