use crate::domain::model::{Business, Category, RawCategory, RawListing, UNKNOWN_NAME};

/// Provider type tags per category, checked in taxonomy order.
const TYPE_TABLE: &[(Category, &[&str])] = &[
    (
        Category::Restaurant,
        &["restaurant", "food", "meal_takeaway", "meal_delivery"],
    ),
    (Category::Dentist, &["dentist", "dental_clinic"]),
    (Category::Plumber, &["plumber", "plumbing"]),
    (Category::Cafe, &["cafe", "coffee_shop"]),
    (Category::Hotel, &["lodging", "hotel"]),
    (Category::Electrician, &["electrician"]),
    (Category::Doctor, &["doctor", "physician", "health"]),
    (Category::Lawyer, &["lawyer", "attorney"]),
    (Category::Accountant, &["accounting"]),
    (Category::Hairdresser, &["hair_care", "beauty_salon"]),
    (Category::Builder, &["general_contractor", "home_builder"]),
    (Category::Retail, &["store", "shopping_mall"]),
];

/// Keywords matched against free-form labels such as search terms.
const LABEL_TABLE: &[(Category, &[&str])] = &[
    (
        Category::Restaurant,
        &["restaurant", "takeaway", "bistro", "diner"],
    ),
    (Category::Dentist, &["dentist", "dental", "orthodont"]),
    (Category::Plumber, &["plumb"]),
    (Category::Cafe, &["cafe", "café", "coffee"]),
    (Category::Hotel, &["hotel", "lodging", "guesthouse", "hostel"]),
    (Category::Electrician, &["electrician", "electrical"]),
    (Category::Doctor, &["doctor", "physician", "surgery", "medical"]),
    (Category::Lawyer, &["lawyer", "solicitor", "attorney", "barrister"]),
    (Category::Accountant, &["accountant", "accounting", "bookkeep"]),
    (Category::Hairdresser, &["hairdresser", "hair", "barber", "salon"]),
    (Category::Builder, &["builder", "contractor", "construction"]),
    (Category::Retail, &["retail", "store", "shop", "boutique"]),
];

pub fn category_from_types(types: &[String]) -> Category {
    TYPE_TABLE
        .iter()
        .find(|(_, tags)| types.iter().any(|t| tags.contains(&t.as_str())))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

pub fn category_from_label(label: &str) -> Category {
    let label = label.trim().to_lowercase();
    if label.is_empty() {
        return Category::Other;
    }

    LABEL_TABLE
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| label.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

pub fn normalize_category(raw: &RawCategory) -> Category {
    match raw {
        RawCategory::Types(types) => category_from_types(types),
        RawCategory::Label(label) => category_from_label(label),
        RawCategory::Missing => Category::Other,
    }
}

fn clean(field: Option<String>) -> String {
    field.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Maps one adapter record onto the canonical `Business` shape. Total: any
/// missing field becomes its empty value and the name falls back to "Unknown".
pub fn normalize(raw: RawListing) -> Business {
    let category = normalize_category(&raw.category);

    let name = clean(raw.name);
    let name = if name.is_empty() {
        UNKNOWN_NAME.to_string()
    } else {
        name
    };

    Business {
        name,
        address: clean(raw.address),
        website: clean(raw.website),
        phone: clean(raw.phone),
        category,
        location: clean(raw.location),
        source: raw.source,
        rating: raw.rating,
        reviews: raw.reviews,
        place_id: raw.place_id,
    }
}
